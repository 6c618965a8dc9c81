use reqwest::Method;
use serde::Serialize;

use super::models::Comment;
use super::response::Listing;
use super::ApiClient;
use crate::error::ClientResult;

/// Body of a comment create request. `parent` is only sent for replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,
}

pub struct Comments<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn comments(&self) -> Comments<'_> {
        Comments { api: self }
    }
}

impl Comments<'_> {
    /// Top-level comments of a post with their replies attached.
    pub async fn list(&self, post_id: u64) -> ClientResult<Vec<Comment>> {
        let builder = self
            .api
            .request(Method::GET, &format!("posts/{}/comments/", post_id))?;
        let listing: Listing<Comment> = self.api.send_json(builder).await?;
        Ok(listing.into_vec())
    }

    pub async fn create(&self, post_id: u64, comment: &NewComment) -> ClientResult<()> {
        let builder = self
            .api
            .authed(Method::POST, &format!("posts/{}/comments/", post_id))
            .await?
            .json(comment);
        self.api.send(builder).await?;
        Ok(())
    }

    pub async fn delete(&self, post_id: u64, comment_id: u64) -> ClientResult<()> {
        let builder = self
            .api
            .authed(
                Method::DELETE,
                &format!("posts/{}/comments/{}/", post_id, comment_id),
            )
            .await?;
        self.api.send(builder).await?;
        Ok(())
    }
}
