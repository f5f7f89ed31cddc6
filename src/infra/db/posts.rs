use async_trait::async_trait;

use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::BlogPostRecord;
use crate::domain::types::PostId;

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct BlogPostRow {
    id: PostId,
    title: String,
    content: String,
}

impl From<BlogPostRow> for BlogPostRecord {
    fn from(row: BlogPostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
        }
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self) -> Result<Vec<BlogPostRecord>, RepoError> {
        let rows = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, content
            FROM blog_posts
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(BlogPostRecord::from).collect())
    }

    async fn find_post(&self, id: PostId) -> Result<Option<BlogPostRecord>, RepoError> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, content
            FROM blog_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(BlogPostRecord::from))
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<BlogPostRecord, RepoError> {
        let CreatePostParams { title, content } = params;

        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            INSERT INTO blog_posts (title, content)
            VALUES ($1, $2)
            RETURNING id, title, content
            "#,
        )
        .bind(title)
        .bind(content)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BlogPostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<BlogPostRecord, RepoError> {
        let UpdatePostParams { id, title, content } = params;

        // RETURNING on a missing id yields no row, surfaced as `RepoError::NotFound`.
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            UPDATE blog_posts
            SET title = $2,
                content = $3
            WHERE id = $1
            RETURNING id, title, content
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(BlogPostRecord::from(row))
    }

    async fn delete_post(&self, id: PostId) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM blog_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
