// Like and bookmark endpoints, addressed by post slug
use reqwest::{Method, StatusCode};

use super::ApiClient;
use crate::error::ClientResult;

/// What the server did with an add request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// 201: a new like/bookmark row exists.
    Created,
    /// 200: it was already there.
    AlreadyPresent,
}

impl AddOutcome {
    fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::CREATED {
            AddOutcome::Created
        } else {
            AddOutcome::AlreadyPresent
        }
    }
}

impl ApiClient {
    async fn add(&self, path: String) -> ClientResult<AddOutcome> {
        let builder = self.authed(Method::POST, &path).await?;
        let response = self.send(builder).await?;
        Ok(AddOutcome::from_status(response.status()))
    }

    async fn remove(&self, path: String) -> ClientResult<()> {
        let builder = self.authed(Method::DELETE, &path).await?;
        self.send(builder).await?;
        Ok(())
    }

    pub async fn like(&self, slug: &str) -> ClientResult<AddOutcome> {
        self.add(format!("posts/{}/like/", slug)).await
    }

    pub async fn unlike(&self, slug: &str) -> ClientResult<()> {
        self.remove(format!("posts/{}/unlike/", slug)).await
    }

    pub async fn bookmark(&self, slug: &str) -> ClientResult<AddOutcome> {
        self.add(format!("posts/{}/bookmark/", slug)).await
    }

    pub async fn unbookmark(&self, slug: &str) -> ClientResult<()> {
        self.remove(format!("posts/{}/unbookmark/", slug)).await
    }
}
