use std::sync::Arc;

use chrono::Utc;
use tracing::error;
use uuid::Uuid;

use crate::{
    content::{self, toc},
    models::{
        post::{Post, PostDetailDto, SavePostDto},
        query::StatsDto,
    },
    repositories::post_repo::PostRepository,
    Error, Result,
};

#[derive(Clone)]
pub struct BlogService {
    repo: Arc<dyn PostRepository>,
}

impl BlogService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self { repo }
    }

    // Public read path: a failed fetch is logged and degraded to an
    // empty result so the pages render empty states instead of erroring.

    pub async fn published_posts(&self) -> Vec<Post> {
        self.repo.published_posts().await.unwrap_or_else(|err| {
            error!("Error fetching all posts: {err:?}");
            Vec::new()
        })
    }

    pub async fn featured_posts(&self, limit: i64) -> Vec<Post> {
        self.repo.featured_posts(limit).await.unwrap_or_else(|err| {
            error!("Error fetching featured posts: {err:?}");
            Vec::new()
        })
    }

    pub async fn recent_posts(&self, limit: i64) -> Vec<Post> {
        self.repo.recent_posts(limit).await.unwrap_or_else(|err| {
            error!("Error fetching recent posts: {err:?}");
            Vec::new()
        })
    }

    pub async fn posts_by_category(&self, category: &str) -> Vec<Post> {
        self.repo
            .posts_by_category(category)
            .await
            .unwrap_or_else(|err| {
                error!("Error fetching posts by category {category}: {err:?}");
                Vec::new()
            })
    }

    pub async fn search_posts(&self, term: &str) -> Vec<Post> {
        let term = term.trim();
        if term.is_empty() {
            return self.published_posts().await;
        }
        self.repo.search_posts(term).await.unwrap_or_else(|err| {
            error!("Error searching posts: {err:?}");
            Vec::new()
        })
    }

    pub async fn categories(&self) -> Vec<String> {
        self.repo.categories().await.unwrap_or_else(|err| {
            error!("Error fetching categories: {err:?}");
            Vec::new()
        })
    }

    /// Detail view for the public post page. Heading ids are ensured on
    /// the content and the TOC is extracted from the processed content,
    /// so the anchors always match.
    pub async fn post_by_slug(&self, slug: &str) -> Option<PostDetailDto> {
        let post = match self.repo.post_by_slug(slug).await {
            Ok(post) => post?,
            Err(err) => {
                error!("Error fetching post with slug {slug}: {err:?}");
                return None;
            }
        };

        let mut post = post;
        post.content = toc::ensure_heading_ids(&post.content);
        let entries = toc::extract_toc(&post.content);

        Some(PostDetailDto {
            post,
            toc: entries,
        })
    }

    // Admin path: errors surface to the caller.

    pub async fn all_posts(&self) -> Result<Vec<Post>> {
        self.repo.all_posts().await
    }

    pub async fn post_by_id(&self, id: Uuid) -> Result<Post> {
        self.repo.post_by_id(id).await?.ok_or(Error::NotFound)
    }

    pub async fn create_post(&self, data: SavePostDto) -> Result<Post> {
        let now = Utc::now();
        let post = build_post(Uuid::now_v7(), data, now, now);
        self.repo.create_post(&post).await
    }

    /// Full replace: every stored field is overwritten from the payload
    /// and the derived fields are recomputed. `published_at` is the one
    /// exception, it survives from the original record.
    pub async fn update_post(&self, id: Uuid, data: SavePostDto) -> Result<Post> {
        let existing = self.repo.post_by_id(id).await?.ok_or(Error::NotFound)?;
        let post = build_post(id, data, existing.published_at, Utc::now());
        self.repo.update_post(&post).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<()> {
        self.repo.delete_post(id).await
    }

    pub async fn stats(&self) -> Result<StatsDto> {
        self.repo.stats().await
    }
}

/// Applies the derivation pipeline: slug from title when the editor left
/// it blank, reading time and TOC always recomputed from the content.
fn build_post(
    id: Uuid,
    data: SavePostDto,
    published_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
) -> Post {
    let slug = if data.slug.trim().is_empty() {
        content::slugify(&data.title)
    } else {
        data.slug
    };
    let reading_time = content::reading_time(&data.content);
    let toc = toc::generate_toc(&data.content);

    Post {
        id,
        title: data.title,
        slug,
        content: data.content,
        excerpt: data.excerpt,
        category: data.category,
        status: data.status,
        featured: data.featured,
        featured_image: data.featured_image,
        meta_keywords: data.meta_keywords,
        reading_time,
        toc,
        published_at,
        updated_at,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::post::PostStatus;

    /// In-memory stand-in for the Postgres repository.
    #[derive(Default)]
    struct FakeRepo {
        posts: Mutex<Vec<Post>>,
    }

    impl FakeRepo {
        fn published(&self) -> Vec<Post> {
            let mut posts: Vec<Post> = self
                .posts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.status == PostStatus::Published)
                .cloned()
                .collect();
            posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            posts
        }
    }

    #[async_trait]
    impl PostRepository for FakeRepo {
        async fn published_posts(&self) -> Result<Vec<Post>> {
            Ok(self.published())
        }

        async fn featured_posts(&self, limit: i64) -> Result<Vec<Post>> {
            let posts = self
                .published()
                .into_iter()
                .filter(|p| p.featured)
                .take(limit as usize)
                .collect();
            Ok(posts)
        }

        async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>> {
            Ok(self.published().into_iter().take(limit as usize).collect())
        }

        async fn posts_by_category(&self, category: &str) -> Result<Vec<Post>> {
            let posts = self
                .published()
                .into_iter()
                .filter(|p| p.category.eq_ignore_ascii_case(category))
                .collect();
            Ok(posts)
        }

        async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
            Ok(self.published().into_iter().find(|p| p.slug == slug))
        }

        async fn search_posts(&self, term: &str) -> Result<Vec<Post>> {
            let needle = term.to_lowercase();
            let posts = self
                .published()
                .into_iter()
                .filter(|p| {
                    p.title.to_lowercase().contains(&needle)
                        || p.content.to_lowercase().contains(&needle)
                        || p.excerpt.to_lowercase().contains(&needle)
                        || p.category.to_lowercase().contains(&needle)
                })
                .collect();
            Ok(posts)
        }

        async fn categories(&self) -> Result<Vec<String>> {
            let mut categories: Vec<String> =
                self.published().into_iter().map(|p| p.category).collect();
            categories.sort();
            categories.dedup();
            Ok(categories)
        }

        async fn all_posts(&self) -> Result<Vec<Post>> {
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
            Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn create_post(&self, post: &Post) -> Result<Post> {
            let mut posts = self.posts.lock().unwrap();
            if posts.iter().any(|p| p.slug == post.slug) {
                return Err(Error::BadRequest(
                    "A post with this slug already exists".to_string(),
                ));
            }
            posts.push(post.clone());
            Ok(post.clone())
        }

        async fn update_post(&self, post: &Post) -> Result<Post> {
            let mut posts = self.posts.lock().unwrap();
            let slot = posts
                .iter_mut()
                .find(|p| p.id == post.id)
                .ok_or(Error::NotFound)?;
            *slot = post.clone();
            Ok(post.clone())
        }

        async fn delete_post(&self, id: Uuid) -> Result<()> {
            let mut posts = self.posts.lock().unwrap();
            let before = posts.len();
            posts.retain(|p| p.id != id);
            if posts.len() == before {
                return Err(Error::NotFound);
            }
            Ok(())
        }

        async fn stats(&self) -> Result<StatsDto> {
            let posts = self.posts.lock().unwrap();
            Ok(StatsDto {
                total: posts.len() as i64,
                published: posts
                    .iter()
                    .filter(|p| p.status == PostStatus::Published)
                    .count() as i64,
                drafts: posts
                    .iter()
                    .filter(|p| p.status == PostStatus::Draft)
                    .count() as i64,
                featured: posts
                    .iter()
                    .filter(|p| p.featured && p.status == PostStatus::Published)
                    .count() as i64,
            })
        }
    }

    /// Repository whose reads always fail, for the degrade-to-empty path.
    struct BrokenRepo;

    #[async_trait]
    impl PostRepository for BrokenRepo {
        async fn published_posts(&self) -> Result<Vec<Post>> {
            Err(Error::InternalServerError)
        }
        async fn featured_posts(&self, _limit: i64) -> Result<Vec<Post>> {
            Err(Error::InternalServerError)
        }
        async fn recent_posts(&self, _limit: i64) -> Result<Vec<Post>> {
            Err(Error::InternalServerError)
        }
        async fn posts_by_category(&self, _category: &str) -> Result<Vec<Post>> {
            Err(Error::InternalServerError)
        }
        async fn post_by_slug(&self, _slug: &str) -> Result<Option<Post>> {
            Err(Error::InternalServerError)
        }
        async fn search_posts(&self, _term: &str) -> Result<Vec<Post>> {
            Err(Error::InternalServerError)
        }
        async fn categories(&self) -> Result<Vec<String>> {
            Err(Error::InternalServerError)
        }
        async fn all_posts(&self) -> Result<Vec<Post>> {
            Err(Error::InternalServerError)
        }
        async fn post_by_id(&self, _id: Uuid) -> Result<Option<Post>> {
            Err(Error::InternalServerError)
        }
        async fn create_post(&self, _post: &Post) -> Result<Post> {
            Err(Error::InternalServerError)
        }
        async fn update_post(&self, _post: &Post) -> Result<Post> {
            Err(Error::InternalServerError)
        }
        async fn delete_post(&self, _id: Uuid) -> Result<()> {
            Err(Error::InternalServerError)
        }
        async fn stats(&self) -> Result<StatsDto> {
            Err(Error::InternalServerError)
        }
    }

    fn service() -> BlogService {
        BlogService::new(Arc::new(FakeRepo::default()))
    }

    fn draft(title: &str) -> SavePostDto {
        SavePostDto {
            title: title.to_string(),
            content: "<h2>Intro</h2> some words here".to_string(),
            category: "Internships".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn create_derives_slug_reading_time_and_toc() {
        let svc = service();
        let post = svc.create_post(draft("Senior SWE Internship!")).await.unwrap();

        assert_eq!(post.slug, "senior-swe-internship");
        assert_eq!(post.reading_time, 1);
        assert_eq!(post.status, PostStatus::Published);
        assert!(post.toc.contains("\"id\":\"intro\""));
    }

    #[tokio::test]
    async fn hand_edited_slug_survives_title_changes() {
        let svc = service();
        let mut data = draft("First Title");
        data.slug = "my-custom-slug".to_string();
        let post = svc.create_post(data).await.unwrap();
        assert_eq!(post.slug, "my-custom-slug");

        let mut update = draft("Completely Different Title");
        update.slug = "my-custom-slug".to_string();
        let updated = svc.update_post(post.id, update).await.unwrap();
        assert_eq!(updated.slug, "my-custom-slug");
        assert_eq!(updated.title, "Completely Different Title");
    }

    #[tokio::test]
    async fn update_is_full_replace_and_recomputes_derived_fields() {
        let svc = service();
        let post = svc.create_post(draft("Original")).await.unwrap();

        let mut update = draft("Original");
        update.content = vec!["word"; 450].join(" ");
        update.excerpt = "fresh excerpt".to_string();
        let updated = svc.update_post(post.id, update).await.unwrap();

        assert_eq!(updated.reading_time, 3);
        assert_eq!(updated.excerpt, "fresh excerpt");
        assert_eq!(updated.toc, "[]");
        assert_eq!(updated.published_at, post.published_at);
        assert!(updated.updated_at >= post.updated_at);
    }

    #[tokio::test]
    async fn duplicate_slug_is_rejected() {
        let svc = service();
        svc.create_post(draft("Same Title")).await.unwrap();
        let err = svc.create_post(draft("Same Title")).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn deleted_post_disappears_from_subsequent_lists() {
        let svc = service();
        let keep = svc.create_post(draft("Keep Me")).await.unwrap();
        let gone = svc.create_post(draft("Delete Me")).await.unwrap();

        svc.delete_post(gone.id).await.unwrap();

        let posts = svc.all_posts().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, keep.id);
        assert!(matches!(
            svc.post_by_id(gone.id).await.unwrap_err(),
            Error::NotFound
        ));
    }

    #[tokio::test]
    async fn drafts_stay_out_of_the_published_listing() {
        let svc = service();
        let mut data = draft("Hidden Draft");
        data.status = PostStatus::Draft;
        svc.create_post(data).await.unwrap();
        svc.create_post(draft("Visible Post")).await.unwrap();

        let published = svc.published_posts().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].title, "Visible Post");

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.drafts, 1);
    }

    #[tokio::test]
    async fn detail_view_has_anchored_content_and_matching_toc() {
        let svc = service();
        let mut data = draft("Anchors");
        data.content = "<h2>First Part</h2><p>text</p><h3>Nested</h3>".to_string();
        svc.create_post(data).await.unwrap();

        let detail = svc.post_by_slug("anchors").await.unwrap();
        assert!(detail.post.content.contains("id=\"first-part\""));
        let ids: Vec<_> = detail.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["first-part", "nested"]);
    }

    #[tokio::test]
    async fn public_reads_degrade_to_empty_on_repo_failure() {
        let svc = BlogService::new(Arc::new(BrokenRepo));
        assert!(svc.published_posts().await.is_empty());
        assert!(svc.featured_posts(3).await.is_empty());
        assert!(svc.categories().await.is_empty());
        assert!(svc.post_by_slug("anything").await.is_none());
        // The admin path surfaces the failure instead.
        assert!(svc.all_posts().await.is_err());
    }

    #[tokio::test]
    async fn blank_search_term_falls_back_to_the_full_listing() {
        let svc = service();
        svc.create_post(draft("Rust Internship Guide")).await.unwrap();
        svc.create_post(draft("Design Roles")).await.unwrap();

        assert_eq!(svc.search_posts("  ").await.len(), 2);
        let hits = svc.search_posts("rust").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Rust Internship Guide");
    }
}
