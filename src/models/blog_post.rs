//! Blog post model
//!
//! This module provides:
//! - `BlogPost` entity
//! - `PostStatus` and `PostCategory` closed value sets
//! - Input types for creating and updating posts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::UnknownVariant;

pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_AUTHOR_LEN: usize = 150;

/// Blog post entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub status: PostStatus,
    /// `None` for posts that were stored without any category
    pub category: Option<PostCategory>,
    pub published_at: Option<DateTime<Utc>>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// Post publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Visible on every listing
    Published,
    /// Draft, never listed
    #[default]
    Unpublished,
    /// Removed by moderation, never listed
    Banned,
}

impl PostStatus {
    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Published => "published",
            PostStatus::Unpublished => "unpublished",
            PostStatus::Banned => "banned",
        }
    }
}

impl FromStr for PostStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "published" => Ok(PostStatus::Published),
            "unpublished" => Ok(PostStatus::Unpublished),
            "banned" => Ok(PostStatus::Banned),
            other => Err(UnknownVariant::new(
                "status",
                other,
                "published, unpublished, banned",
            )),
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Post category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostCategory {
    #[default]
    News,
    Tips,
    Trends,
}

impl PostCategory {
    /// Convert category to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PostCategory::News => "news",
            PostCategory::Tips => "tips",
            PostCategory::Trends => "trends",
        }
    }

    /// Parse a comma-separated category list such as `news,tips`.
    ///
    /// Blank entries are skipped; duplicates collapse. Any unknown entry
    /// fails the whole list.
    pub fn parse_list(raw: &str) -> Result<Vec<PostCategory>, UnknownVariant> {
        let mut categories = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let category = part.parse::<PostCategory>()?;
            if !categories.contains(&category) {
                categories.push(category);
            }
        }
        Ok(categories)
    }
}

impl FromStr for PostCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "news" => Ok(PostCategory::News),
            "tips" => Ok(PostCategory::Tips),
            "trends" => Ok(PostCategory::Trends),
            other => Err(UnknownVariant::new("category", other, "news, tips, trends")),
        }
    }
}

impl std::fmt::Display for PostCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_category() -> Option<PostCategory> {
    Some(PostCategory::News)
}

/// Input for creating a new post
///
/// An omitted `category` defaults to news; an explicit `null` stores the
/// post without a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub body: String,
    pub author: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default = "default_category")]
    pub category: Option<PostCategory>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl CreatePostInput {
    pub fn new(title: impl Into<String>, body: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            author: author.into(),
            status: PostStatus::default(),
            category: default_category(),
            published_at: None,
        }
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_category(mut self, category: Option<PostCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Check required fields and length limits
    pub fn validate(&self) -> Result<(), String> {
        validate_text("title", &self.title, MAX_TITLE_LEN)?;
        validate_text("author", &self.author, MAX_AUTHOR_LEN)?;
        Ok(())
    }
}

/// Input for updating an existing post
///
/// `category` and `published_at` use a nested option so a field can be
/// cleared (`Some(None)`) as well as left alone (`None`).
#[derive(Debug, Clone, Default)]
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub body: Option<String>,
    pub author: Option<String>,
    pub status: Option<PostStatus>,
    pub category: Option<Option<PostCategory>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl UpdatePostInput {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_category(mut self, category: Option<PostCategory>) -> Self {
        self.category = Some(category);
        self
    }

    /// Check if any field is set
    pub fn has_changes(&self) -> bool {
        self.title.is_some()
            || self.body.is_some()
            || self.author.is_some()
            || self.status.is_some()
            || self.category.is_some()
            || self.published_at.is_some()
    }

    /// Check length limits of the fields being changed
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            validate_text("title", title, MAX_TITLE_LEN)?;
        }
        if let Some(author) = &self.author {
            validate_text("author", author, MAX_AUTHOR_LEN)?;
        }
        Ok(())
    }
}

fn validate_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    if value.chars().count() > max_len {
        return Err(format!("{} exceeds {} characters", field, max_len));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        for status in [PostStatus::Published, PostStatus::Unpublished, PostStatus::Banned] {
            assert_eq!(status.as_str().parse::<PostStatus>(), Ok(status));
            assert_eq!(status.to_string(), status.as_str());
        }
        assert!("draft".parse::<PostStatus>().is_err());
        assert_eq!(PostStatus::default(), PostStatus::Unpublished);
    }

    #[test]
    fn test_parse_category_list() {
        assert_eq!(
            PostCategory::parse_list("news,tips").unwrap(),
            vec![PostCategory::News, PostCategory::Tips]
        );
        assert_eq!(
            PostCategory::parse_list(" trends , ,news,trends").unwrap(),
            vec![PostCategory::Trends, PostCategory::News]
        );
        assert!(PostCategory::parse_list("").unwrap().is_empty());

        let err = PostCategory::parse_list("news,gossip").unwrap_err();
        assert_eq!(err.kind, "category");
        assert_eq!(err.value, "gossip");
    }

    #[test]
    fn test_create_input_category_default_and_null() {
        let omitted: CreatePostInput =
            serde_json::from_str(r#"{"title": "t", "body": "b", "author": "a"}"#).unwrap();
        assert_eq!(omitted.category, Some(PostCategory::News));
        assert_eq!(omitted.status, PostStatus::Unpublished);

        let explicit_null: CreatePostInput =
            serde_json::from_str(r#"{"title": "t", "body": "b", "author": "a", "category": null}"#)
                .unwrap();
        assert_eq!(explicit_null.category, None);
    }

    #[test]
    fn test_validate_lengths() {
        assert!(CreatePostInput::new("Title", "Body", "Ann").validate().is_ok());
        assert!(CreatePostInput::new("", "Body", "Ann").validate().is_err());

        let long_author = "a".repeat(MAX_AUTHOR_LEN + 1);
        let err = CreatePostInput::new("Title", "Body", long_author).validate().unwrap_err();
        assert!(err.contains("author"));

        let long_title = "t".repeat(MAX_TITLE_LEN + 1);
        assert!(UpdatePostInput::default().with_title(long_title).validate().is_err());
    }

    #[test]
    fn test_serialize_flat_mapping() {
        let now = Utc::now();
        let post = BlogPost {
            id: 1,
            title: "Go basics".to_string(),
            body: "...".to_string(),
            author: "ann".to_string(),
            status: PostStatus::Published,
            category: None,
            published_at: Some(now),
            created: now,
            modified: now,
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["status"], "published");
        assert!(json["category"].is_null());
        assert!(json["published_at"].is_string());
    }
}
