//! Blog post service
//!
//! Every listing is restricted to published posts. Apart from the
//! "most recent" listing, results are grouped by author and newest first
//! within an author.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::CatalogError;
use crate::db::repositories::BlogPostRepository;
use crate::models::{BlogPost, PostCategory};
use crate::query::{post, PostCriteria};

/// Parse the raw `last_days` request parameter
///
/// The value is required and must be a non-negative integer.
pub fn parse_last_days(raw: Option<&str>) -> Result<u32, CatalogError> {
    let raw = raw
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| CatalogError::invalid("last_days is required"))?;

    let days: i64 = raw.parse().map_err(|_| {
        CatalogError::invalid(format!("last_days must be an integer, got '{}'", raw))
    })?;
    if days < 0 {
        return Err(CatalogError::invalid("last_days must not be negative"));
    }
    u32::try_from(days).map_err(|_| CatalogError::invalid("last_days is out of range"))
}

/// Blog post service
pub struct BlogPostService {
    repo: Arc<dyn BlogPostRepository>,
    recent_limit: u32,
}

impl BlogPostService {
    /// Create a service listing `recent_limit` posts from `recent()`
    pub fn new(repo: Arc<dyn BlogPostRepository>, recent_limit: u32) -> Self {
        Self {
            repo,
            recent_limit: recent_limit.max(1),
        }
    }

    /// The most recently published posts
    pub async fn recent(&self) -> Result<Vec<BlogPost>, CatalogError> {
        Ok(self.repo.find(&post::recent(self.recent_limit)).await?)
    }

    /// Published posts whose title or body contains the given text
    ///
    /// # Errors
    /// `InvalidParameter` when both `title` and `body` are missing or blank
    pub async fn search(
        &self,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Vec<BlogPost>, CatalogError> {
        let criteria = PostCriteria::search(title, body);
        if !criteria.has_text() {
            return Err(CatalogError::invalid("title or body is required"));
        }
        self.find(&criteria).await
    }

    /// Published posts stored without a category
    pub async fn untagged(&self) -> Result<Vec<BlogPost>, CatalogError> {
        self.find(&PostCriteria::untagged()).await
    }

    /// Published posts in any of the comma-separated categories
    ///
    /// # Errors
    /// `InvalidParameter` when the list is empty or names an unknown category
    pub async fn by_categories(&self, raw: &str) -> Result<Vec<BlogPost>, CatalogError> {
        let categories = PostCategory::parse_list(raw)?;
        if categories.is_empty() {
            return Err(CatalogError::invalid("category is required"));
        }
        self.find(&PostCriteria::categories(categories)).await
    }

    /// Published posts with `published_at` no earlier than `now - days`
    ///
    /// # Errors
    /// `InvalidParameter` when the cutoff falls outside the representable
    /// date range
    pub async fn published_within(
        &self,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<BlogPost>, CatalogError> {
        let cutoff = Duration::try_days(i64::from(days))
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| CatalogError::invalid("last_days is out of range"))?;
        self.find(&PostCriteria::published_since(cutoff)).await
    }

    async fn find(&self, criteria: &PostCriteria) -> Result<Vec<BlogPost>, CatalogError> {
        let posts = self.repo.find(&post::filtered(criteria)).await?;
        tracing::debug!("Post query matched {} records", posts.len());
        Ok(posts)
    }
}
