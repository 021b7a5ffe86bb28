use async_trait::async_trait;
use sqlx::Row;
use uuid::Uuid;

use crate::{
    models::{post::Post, query::StatsDto},
    Error, Result,
};

use super::PostgresRepo;

const POST_COLUMNS: &str = "id, title, slug, content, excerpt, category, status, featured, \
     featured_image, meta_keywords, reading_time, toc, published_at, updated_at";

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn published_posts(&self) -> Result<Vec<Post>>;
    async fn featured_posts(&self, limit: i64) -> Result<Vec<Post>>;
    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>>;
    async fn posts_by_category(&self, category: &str) -> Result<Vec<Post>>;
    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>>;
    async fn search_posts(&self, term: &str) -> Result<Vec<Post>>;
    async fn categories(&self) -> Result<Vec<String>>;

    async fn all_posts(&self) -> Result<Vec<Post>>;
    async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>>;
    async fn create_post(&self, post: &Post) -> Result<Post>;
    async fn update_post(&self, post: &Post) -> Result<Post>;
    async fn delete_post(&self, id: Uuid) -> Result<()>;
    async fn stats(&self) -> Result<StatsDto>;
}

/// Slug uniqueness lives in the database; surface a violation as a
/// client error instead of a 500.
fn map_post_error(err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Error::BadRequest("A post with this slug already exists".to_string())
        }
        _ => Error::from(err),
    }
}

#[async_trait]
impl PostRepository for PostgresRepo {
    async fn published_posts(&self) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE status = 'published' \
             ORDER BY published_at DESC"
        );
        let posts = sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn featured_posts(&self, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE status = 'published' AND featured \
             ORDER BY published_at DESC LIMIT $1"
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn recent_posts(&self, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE status = 'published' \
             ORDER BY published_at DESC LIMIT $1"
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn posts_by_category(&self, category: &str) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE status = 'published' AND LOWER(category) = LOWER($1) \
             ORDER BY published_at DESC"
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(category)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE slug = $1 AND status = 'published'"
        );
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn search_posts(&self, term: &str) -> Result<Vec<Post>> {
        let pattern = format!("%{term}%");
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE status = 'published' AND \
                   (title ILIKE $1 OR content ILIKE $1 OR excerpt ILIKE $1 OR category ILIKE $1) \
             ORDER BY published_at DESC"
        );
        let posts = sqlx::query_as::<_, Post>(&sql)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM posts WHERE status = 'published' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    async fn all_posts(&self) -> Result<Vec<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY published_at DESC");
        let posts = sqlx::query_as::<_, Post>(&sql).fetch_all(&self.pool).await?;
        Ok(posts)
    }

    async fn post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let post = sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(post)
    }

    async fn create_post(&self, post: &Post) -> Result<Post> {
        let sql = format!(
            "INSERT INTO posts (id, title, slug, content, excerpt, category, status, featured, \
                                featured_image, meta_keywords, reading_time, toc, published_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {POST_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Post>(&sql)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.slug)
            .bind(&post.content)
            .bind(&post.excerpt)
            .bind(&post.category)
            .bind(post.status)
            .bind(post.featured)
            .bind(&post.featured_image)
            .bind(&post.meta_keywords)
            .bind(post.reading_time)
            .bind(&post.toc)
            .bind(post.published_at)
            .bind(post.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_post_error)?;
        Ok(created)
    }

    async fn update_post(&self, post: &Post) -> Result<Post> {
        let sql = format!(
            "UPDATE posts \
             SET title = $2, slug = $3, content = $4, excerpt = $5, category = $6, \
                 status = $7, featured = $8, featured_image = $9, meta_keywords = $10, \
                 reading_time = $11, toc = $12, updated_at = $13 \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Post>(&sql)
            .bind(post.id)
            .bind(&post.title)
            .bind(&post.slug)
            .bind(&post.content)
            .bind(&post.excerpt)
            .bind(&post.category)
            .bind(post.status)
            .bind(post.featured)
            .bind(&post.featured_image)
            .bind(&post.meta_keywords)
            .bind(post.reading_time)
            .bind(&post.toc)
            .bind(post.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_post_error)?;
        updated.ok_or(Error::NotFound)
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn stats(&self) -> Result<StatsDto> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'published') AS published, \
                    COUNT(*) FILTER (WHERE status = 'draft') AS drafts, \
                    COUNT(*) FILTER (WHERE featured AND status = 'published') AS featured \
             FROM posts",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StatsDto {
            total: row.try_get("total")?,
            published: row.try_get("published")?,
            drafts: row.try_get("drafts")?,
            featured: row.try_get("featured")?,
        })
    }
}
