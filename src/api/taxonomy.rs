// Categories and tags: read-only reference data
use reqwest::Method;

use super::models::{Category, Tag};
use super::response::Listing;
use super::ApiClient;
use crate::error::ClientResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    pub categories: Vec<Category>,
    pub tags: Vec<Tag>,
}

impl Taxonomy {
    pub fn category(&self, id: u64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn tag(&self, id: u64) -> Option<&Tag> {
        self.tags.iter().find(|t| t.id == id)
    }
}

impl ApiClient {
    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        let builder = self.request(Method::GET, "categories/")?;
        let listing: Listing<Category> = self.send_json(builder).await?;
        Ok(listing.into_vec())
    }

    pub async fn tags(&self) -> ClientResult<Vec<Tag>> {
        let builder = self.request(Method::GET, "tags/")?;
        let listing: Listing<Tag> = self.send_json(builder).await?;
        Ok(listing.into_vec())
    }

    /// Both lists, fetched concurrently. Fails if either request fails.
    pub async fn taxonomy(&self) -> ClientResult<Taxonomy> {
        let (categories, tags) = tokio::try_join!(self.categories(), self.tags())?;
        Ok(Taxonomy { categories, tags })
    }
}
