pub mod view;

use crate::api::{ApiClient, Comment, NewComment};
use crate::error::{ClientError, ClientResult};

pub use view::{ParentBlock, ReplyBlock, ThreadView};

/// Comment thread of one post. The server is the only source of truth:
/// every mutation is followed by a full re-fetch.
pub struct CommentPresenter {
    api: ApiClient,
    post_id: u64,
    comments: Vec<Comment>,
}

impl CommentPresenter {
    pub fn new(api: ApiClient, post_id: u64) -> Self {
        Self {
            api,
            post_id,
            comments: Vec::new(),
        }
    }

    pub fn post_id(&self) -> u64 {
        self.post_id
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        self.comments = self.api.comments().list(self.post_id).await?;
        tracing::debug!(
            "Loaded {} comments for post {}",
            self.comments.len(),
            self.post_id
        );
        Ok(())
    }

    /// Build the view for the current session.
    pub async fn view(&self) -> ClientResult<ThreadView> {
        let viewer = self.api.session().username().await?;
        Ok(ThreadView::build(&self.comments, viewer.as_deref()))
    }

    pub async fn render(&self) -> ClientResult<String> {
        Ok(self.view().await?.render())
    }

    /// Post a top-level comment, or a reply when `parent` is given.
    pub async fn post_comment(&mut self, content: &str, parent: Option<u64>) -> ClientResult<()> {
        if !self.api.session().is_authenticated().await? {
            return Err(ClientError::AuthRequired);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::Validation(
                "Comment cannot be empty.".to_string(),
            ));
        }

        let parent = match parent {
            Some(id) => Some(self.thread_root(id)?),
            None => None,
        };

        self.api
            .comments()
            .create(
                self.post_id,
                &NewComment {
                    content: content.to_string(),
                    parent,
                },
            )
            .await?;
        tracing::info!("Posted comment on post {} (parent {:?})", self.post_id, parent);
        self.refresh().await
    }

    /// Delete a comment the current session authored.
    pub async fn delete_comment(&mut self, comment_id: u64) -> ClientResult<()> {
        let viewer = self
            .api
            .session()
            .username()
            .await?
            .ok_or(ClientError::AuthRequired)?;
        let comment = self
            .find(comment_id)
            .ok_or_else(|| ClientError::NotFound(format!("Comment {} not found", comment_id)))?;
        if comment.author != viewer {
            return Err(ClientError::Forbidden(
                "You can only delete your own comments.".to_string(),
            ));
        }

        self.api.comments().delete(self.post_id, comment_id).await?;
        tracing::info!("Deleted comment {} on post {}", comment_id, self.post_id);
        self.refresh().await
    }

    fn find(&self, id: u64) -> Option<&Comment> {
        self.comments.iter().find_map(|c| {
            if c.id == id {
                Some(c)
            } else {
                c.replies.iter().find(|r| r.id == id)
            }
        })
    }

    // Replies hang off top-level comments only; replying to a reply
    // targets that reply's parent.
    fn thread_root(&self, id: u64) -> ClientResult<u64> {
        self.comments
            .iter()
            .find(|c| c.id == id || c.replies.iter().any(|r| r.id == id))
            .map(|c| c.id)
            .ok_or_else(|| ClientError::NotFound(format!("Comment {} not found", id)))
    }
}
