use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::info;

use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::BlogPostRecord;
use crate::domain::posts::{PostDraft, PostFormErrors, validate_post_form};
use crate::domain::types::PostId;

pub const POSTS_CREATED_TOTAL: &str = "blogpad_posts_created_total";
pub const POSTS_UPDATED_TOTAL: &str = "blogpad_posts_updated_total";
pub const POSTS_DELETED_TOTAL: &str = "blogpad_posts_deleted_total";
pub const POST_FORM_REJECTED_TOTAL: &str = "blogpad_post_form_rejected_total";

#[derive(Debug, Error)]
pub enum PostServiceError {
    #[error("blog post {id} not found")]
    NotFound { id: PostId },
    #[error(transparent)]
    Invalid(#[from] PostFormErrors),
    #[error(transparent)]
    Repo(RepoError),
}

impl PostServiceError {
    fn from_repo(id: PostId, err: RepoError) -> Self {
        match err {
            RepoError::NotFound => Self::NotFound { id },
            other => Self::Repo(other),
        }
    }
}

/// Raw form values as submitted by the client.
#[derive(Debug, Clone, Default)]
pub struct PostSubmission {
    pub title: String,
    pub content: String,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>, writer: Arc<dyn PostsWriteRepo>) -> Self {
        Self { reader, writer }
    }

    pub async fn list(&self) -> Result<Vec<BlogPostRecord>, PostServiceError> {
        self.reader.list_posts().await.map_err(PostServiceError::Repo)
    }

    pub async fn detail(&self, id: PostId) -> Result<BlogPostRecord, PostServiceError> {
        self.reader
            .find_post(id)
            .await
            .map_err(PostServiceError::Repo)?
            .ok_or(PostServiceError::NotFound { id })
    }

    pub async fn add(&self, submission: PostSubmission) -> Result<BlogPostRecord, PostServiceError> {
        let draft = validate(&submission)?;

        let post = self
            .writer
            .create_post(CreatePostParams {
                title: draft.title,
                content: draft.content,
            })
            .await
            .map_err(PostServiceError::Repo)?;

        counter!(POSTS_CREATED_TOTAL).increment(1);
        info!(target = "blogpad::posts", post_id = %post.id, "post created");
        Ok(post)
    }

    pub async fn edit(
        &self,
        id: PostId,
        submission: PostSubmission,
    ) -> Result<BlogPostRecord, PostServiceError> {
        let draft = validate(&submission)?;

        let post = self
            .writer
            .update_post(UpdatePostParams {
                id,
                title: draft.title,
                content: draft.content,
            })
            .await
            .map_err(|err| PostServiceError::from_repo(id, err))?;

        counter!(POSTS_UPDATED_TOTAL).increment(1);
        info!(target = "blogpad::posts", post_id = %id, "post updated");
        Ok(post)
    }

    pub async fn remove(&self, id: PostId) -> Result<(), PostServiceError> {
        self.writer
            .delete_post(id)
            .await
            .map_err(|err| PostServiceError::from_repo(id, err))?;

        counter!(POSTS_DELETED_TOTAL).increment(1);
        info!(target = "blogpad::posts", post_id = %id, "post deleted");
        Ok(())
    }
}

fn validate(submission: &PostSubmission) -> Result<PostDraft, PostFormErrors> {
    validate_post_form(&submission.title, &submission.content).inspect_err(|_| {
        counter!(POST_FORM_REJECTED_TOTAL).increment(1);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::domain::posts::{FieldError, PostField};

    #[derive(Default)]
    struct StubPostsRepo {
        posts: Mutex<Vec<BlogPostRecord>>,
        next_id: Mutex<i64>,
    }

    impl StubPostsRepo {
        fn with_posts(posts: Vec<BlogPostRecord>) -> Self {
            let next_id = posts.iter().map(|post| post.id.get()).max().unwrap_or(0);
            Self {
                posts: Mutex::new(posts),
                next_id: Mutex::new(next_id),
            }
        }

        fn snapshot(&self) -> Vec<BlogPostRecord> {
            self.posts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PostsRepo for StubPostsRepo {
        async fn list_posts(&self) -> Result<Vec<BlogPostRecord>, RepoError> {
            Ok(self.snapshot())
        }

        async fn find_post(&self, id: PostId) -> Result<Option<BlogPostRecord>, RepoError> {
            Ok(self.snapshot().into_iter().find(|post| post.id == id))
        }
    }

    #[async_trait]
    impl PostsWriteRepo for StubPostsRepo {
        async fn create_post(&self, params: CreatePostParams) -> Result<BlogPostRecord, RepoError> {
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let post = BlogPostRecord {
                id: PostId::new(*next_id),
                title: params.title,
                content: params.content,
            };
            self.posts.lock().unwrap().push(post.clone());
            Ok(post)
        }

        async fn update_post(&self, params: UpdatePostParams) -> Result<BlogPostRecord, RepoError> {
            let mut posts = self.posts.lock().unwrap();
            let post = posts
                .iter_mut()
                .find(|post| post.id == params.id)
                .ok_or(RepoError::NotFound)?;
            post.title = params.title;
            post.content = params.content;
            Ok(post.clone())
        }

        async fn delete_post(&self, id: PostId) -> Result<(), RepoError> {
            let mut posts = self.posts.lock().unwrap();
            let before = posts.len();
            posts.retain(|post| post.id != id);
            if posts.len() == before {
                return Err(RepoError::NotFound);
            }
            Ok(())
        }
    }

    struct FailingRepo;

    #[async_trait]
    impl PostsRepo for FailingRepo {
        async fn list_posts(&self) -> Result<Vec<BlogPostRecord>, RepoError> {
            Err(RepoError::Timeout)
        }

        async fn find_post(&self, _id: PostId) -> Result<Option<BlogPostRecord>, RepoError> {
            Err(RepoError::Timeout)
        }
    }

    #[async_trait]
    impl PostsWriteRepo for FailingRepo {
        async fn create_post(&self, _params: CreatePostParams) -> Result<BlogPostRecord, RepoError> {
            unreachable!("not used in these tests")
        }

        async fn update_post(&self, _params: UpdatePostParams) -> Result<BlogPostRecord, RepoError> {
            Err(RepoError::Timeout)
        }

        async fn delete_post(&self, _id: PostId) -> Result<(), RepoError> {
            Err(RepoError::Persistence("connection reset".into()))
        }
    }

    fn sample_post(id: i64, title: &str, content: &str) -> BlogPostRecord {
        BlogPostRecord {
            id: PostId::new(id),
            title: title.into(),
            content: content.into(),
        }
    }

    fn service(repo: &Arc<StubPostsRepo>) -> PostService {
        PostService::new(repo.clone(), repo.clone())
    }

    fn submission(title: &str, content: &str) -> PostSubmission {
        PostSubmission {
            title: title.into(),
            content: content.into(),
        }
    }

    #[tokio::test]
    async fn add_stores_cleaned_values() {
        let repo = Arc::new(StubPostsRepo::default());
        let post = service(&repo)
            .add(submission(" Hello ", "World"))
            .await
            .expect("post created");

        assert_eq!(post, sample_post(1, "Hello", "World"));
        assert_eq!(repo.snapshot(), vec![sample_post(1, "Hello", "World")]);
    }

    #[tokio::test]
    async fn add_rejects_invalid_form_without_writing() {
        let repo = Arc::new(StubPostsRepo::default());
        let err = service(&repo)
            .add(submission("", "World"))
            .await
            .unwrap_err();

        match err {
            PostServiceError::Invalid(errors) => {
                assert_eq!(errors.errors(), &[FieldError::Required(PostField::Title)]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(repo.snapshot().is_empty());
    }

    #[tokio::test]
    async fn detail_reports_missing_post() {
        let repo = Arc::new(StubPostsRepo::default());
        let err = service(&repo).detail(PostId::new(7)).await.unwrap_err();
        assert!(matches!(err, PostServiceError::NotFound { id } if id == PostId::new(7)));
    }

    #[tokio::test]
    async fn edit_overwrites_only_the_target_post() {
        let repo = Arc::new(StubPostsRepo::with_posts(vec![
            sample_post(1, "Hello", "World"),
            sample_post(2, "Other", "Post"),
        ]));

        service(&repo)
            .edit(PostId::new(1), submission("Hi", "World"))
            .await
            .expect("post updated");

        assert_eq!(
            repo.snapshot(),
            vec![
                sample_post(1, "Hi", "World"),
                sample_post(2, "Other", "Post"),
            ]
        );
    }

    #[tokio::test]
    async fn edit_validates_before_looking_up_the_post() {
        let repo = Arc::new(StubPostsRepo::default());
        let err = service(&repo)
            .edit(PostId::new(99), submission("Hi", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, PostServiceError::Invalid(_)));
    }

    #[tokio::test]
    async fn edit_of_missing_post_is_not_found() {
        let repo = Arc::new(StubPostsRepo::default());
        let err = service(&repo)
            .edit(PostId::new(3), submission("Hi", "World"))
            .await
            .unwrap_err();
        assert!(matches!(err, PostServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn remove_twice_only_deletes_once() {
        let repo = Arc::new(StubPostsRepo::with_posts(vec![
            sample_post(1, "Hello", "World"),
            sample_post(2, "Other", "Post"),
        ]));
        let service = service(&repo);

        service.remove(PostId::new(1)).await.expect("first delete");
        let err = service.remove(PostId::new(1)).await.unwrap_err();

        assert!(matches!(err, PostServiceError::NotFound { .. }));
        assert_eq!(repo.snapshot(), vec![sample_post(2, "Other", "Post")]);
    }

    #[tokio::test]
    async fn store_failures_are_not_reported_as_missing() {
        let repo = Arc::new(FailingRepo);
        let service = PostService::new(repo.clone(), repo);

        assert!(matches!(
            service.list().await,
            Err(PostServiceError::Repo(RepoError::Timeout))
        ));
        assert!(matches!(
            service.edit(PostId::new(1), submission("a", "b")).await,
            Err(PostServiceError::Repo(RepoError::Timeout))
        ));
        assert!(matches!(
            service.remove(PostId::new(1)).await,
            Err(PostServiceError::Repo(RepoError::Persistence(_)))
        ));
    }
}
