//! Blog post listing queries
//!
//! Only published posts are ever listed; every criterion narrows that set.

use chrono::{DateTime, Utc};

use super::{CatalogQuery, Column, OrderBy, Predicate, Value};
use crate::models::{PostCategory, PostStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostColumn {
    Id,
    /// Lowercased title, searched by text filters
    TitleFolded,
    /// Lowercased body, searched by text filters
    BodyFolded,
    Author,
    Status,
    Category,
    PublishedAt,
    Created,
}

impl Column for PostColumn {
    fn name(&self) -> &'static str {
        match self {
            PostColumn::Id => "id",
            PostColumn::TitleFolded => "title_folded",
            PostColumn::BodyFolded => "body_folded",
            PostColumn::Author => "author",
            PostColumn::Status => "status",
            PostColumn::Category => "category",
            PostColumn::PublishedAt => "published_at",
            PostColumn::Created => "created",
        }
    }
}

/// Optional post filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostCriteria {
    /// Substring of the title; OR'd with `body`
    pub title: Option<String>,
    /// Substring of the body; OR'd with `title`
    pub body: Option<String>,
    /// Category membership
    pub categories: Option<Vec<PostCategory>>,
    /// Lower bound on `published_at`, inclusive
    pub published_since: Option<DateTime<Utc>>,
    /// Only posts stored without a category
    pub untagged: bool,
}

impl PostCriteria {
    pub fn search(title: Option<String>, body: Option<String>) -> Self {
        Self {
            title,
            body,
            ..Self::default()
        }
    }

    pub fn categories(categories: Vec<PostCategory>) -> Self {
        Self {
            categories: Some(categories),
            ..Self::default()
        }
    }

    pub fn published_since(cutoff: DateTime<Utc>) -> Self {
        Self {
            published_since: Some(cutoff),
            ..Self::default()
        }
    }

    pub fn untagged() -> Self {
        Self {
            untagged: true,
            ..Self::default()
        }
    }

    /// Whether any text search field carries a non-blank value
    pub fn has_text(&self) -> bool {
        non_blank(&self.title).is_some() || non_blank(&self.body).is_some()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Build the filter for `criteria`; always requires status = published.
///
/// Blank text fields are ignored rather than matched, so a title-only
/// search never degrades into "body contains empty string".
pub fn filter(criteria: &PostCriteria) -> Predicate<PostColumn> {
    let mut predicate = Predicate::Eq(PostColumn::Status, PostStatus::Published.as_str().into());

    let text: Vec<_> = [
        (PostColumn::TitleFolded, non_blank(&criteria.title)),
        (PostColumn::BodyFolded, non_blank(&criteria.body)),
    ]
    .into_iter()
    .filter_map(|(col, needle)| needle.map(|n| Predicate::Contains(col, n.to_string())))
    .collect();
    if !text.is_empty() {
        predicate = predicate.and(Predicate::Or(text));
    }

    if let Some(categories) = &criteria.categories {
        let values = categories.iter().map(|c| Value::from(c.as_str())).collect();
        predicate = predicate.and(Predicate::In(PostColumn::Category, values));
    }
    if criteria.untagged {
        predicate = predicate.and(Predicate::IsNull(PostColumn::Category));
    }
    if let Some(cutoff) = criteria.published_since {
        predicate = predicate.and(Predicate::Gte(PostColumn::PublishedAt, Value::Timestamp(cutoff)));
    }

    predicate
}

/// Grouped by author, newest first within an author
pub fn by_recency() -> Vec<OrderBy<PostColumn>> {
    vec![
        OrderBy::asc(PostColumn::Author),
        OrderBy::desc(PostColumn::Created),
        OrderBy::desc(PostColumn::Id),
    ]
}

/// Most recently published first
pub fn by_published_desc() -> Vec<OrderBy<PostColumn>> {
    vec![OrderBy::desc(PostColumn::PublishedAt), OrderBy::desc(PostColumn::Id)]
}

/// Posts matching `criteria`, grouped by author
pub fn filtered(criteria: &PostCriteria) -> CatalogQuery<PostColumn> {
    CatalogQuery::new(filter(criteria)).order_by(by_recency())
}

/// The `limit` most recently published posts
pub fn recent(limit: u32) -> CatalogQuery<PostColumn> {
    CatalogQuery::new(filter(&PostCriteria::default()))
        .order_by(by_published_desc())
        .limit(limit)
}
