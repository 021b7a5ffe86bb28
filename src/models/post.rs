use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::content::toc::TocEntry;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    Draft,
}

impl Default for PostStatus {
    // Posts go live unless the editor says otherwise.
    fn default() -> Self {
        Self::Published
    }
}

impl PostStatus {
    pub fn to_str(&self) -> &str {
        match self {
            Self::Published => "published",
            Self::Draft => "draft",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub category: String,
    pub status: PostStatus,
    pub featured: bool,
    #[serde(rename = "featuredImage")]
    pub featured_image: String,
    #[serde(rename = "metaKeywords")]
    pub meta_keywords: String,
    /// Minutes, recomputed from content on every save.
    #[serde(rename = "readingTime")]
    pub reading_time: i32,
    /// Serialized `[{id, text, level}]`, recomputed from content on every save.
    pub toc: String,
    #[serde(rename = "publishedAt")]
    pub published_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Editor payload for create and update. Update is a full replace, so
/// both operations share the same shape; `readingTime` and `toc` are
/// never accepted from the client.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SavePostDto {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// Derived from the title when left blank; a hand-edited slug is
    /// preserved as sent.
    #[serde(default)]
    pub slug: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[serde(default)]
    pub excerpt: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, rename = "featuredImage")]
    pub featured_image: String,
    #[serde(default, rename = "metaKeywords")]
    pub meta_keywords: String,
}

/// Detail view for the public post page: content has anchor ids ensured
/// and `toc` is the render-path extraction (h1-h3) over that content.
#[derive(Debug, Serialize)]
pub struct PostDetailDto {
    pub post: Post,
    pub toc: Vec<TocEntry>,
}
