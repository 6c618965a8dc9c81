use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::models::{Post, PostAck};
use super::response::Page;
use super::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Filters for the post list. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub search: Option<String>,
    pub category: Option<u64>,
    pub tag: Option<u64>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PostQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref search) = self.search {
            if !search.trim().is_empty() {
                pairs.push(("search", search.clone()));
            }
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if let Some(tag) = self.tag {
            pairs.push(("tags", tag.to_string()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("page_size", page_size.to_string()));
        }
        pairs
    }
}

/// An image to upload with a post or profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ClientError::Validation(format!("Not a file: {}", path.display())))?
            .to_string();
        Ok(Self { file_name, bytes })
    }

    pub fn mime(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .to_string()
    }

    pub(crate) fn into_part(self) -> ClientResult<Part> {
        let mime = self.mime();
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&mime)?)
    }
}

/// Text fields plus an optional image, sent as multipart for create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub category: Option<u64>,
    pub tags: Vec<u64>,
    pub image: Option<ImageUpload>,
}

impl PostForm {
    fn validate(&self) -> ClientResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::Validation("Title is required.".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(ClientError::Validation("Content is required.".to_string()));
        }
        Ok(())
    }

    pub(crate) fn into_multipart(self) -> ClientResult<Form> {
        let mut form = Form::new()
            .text("title", self.title)
            .text("content", self.content);
        if let Some(category) = self.category {
            form = form.text("category", category.to_string());
        }
        for tag in self.tags {
            form = form.text("tags", tag.to_string());
        }
        if let Some(image) = self.image {
            form = form.part("image", image.into_part()?);
        }
        Ok(form)
    }
}

pub struct Posts<'a> {
    api: &'a ApiClient,
}

impl ApiClient {
    pub fn posts(&self) -> Posts<'_> {
        Posts { api: self }
    }
}

impl Posts<'_> {
    /// Authenticated when a session exists so the server can fill in the
    /// like/bookmark flags; anonymous otherwise.
    async fn read(&self, path: &str) -> ClientResult<reqwest::RequestBuilder> {
        if self.api.session().is_authenticated().await? {
            self.api.authed(Method::GET, path).await
        } else {
            self.api.request(Method::GET, path)
        }
    }

    pub async fn list(&self, query: &PostQuery) -> ClientResult<Page<Post>> {
        let builder = self.read("posts/").await?.query(&query.pairs());
        self.api.send_json(builder).await
    }

    pub async fn get(&self, slug: &str) -> ClientResult<Post> {
        let builder = self.read(&format!("posts/{}/", slug)).await?;
        self.api.send_json(builder).await
    }

    pub async fn create(&self, form: PostForm) -> ClientResult<PostAck> {
        form.validate()?;
        let builder = self.api.authed(Method::POST, "posts/create/").await?;
        let ack: PostAck = self
            .api
            .send_json(builder.multipart(form.into_multipart()?))
            .await?;
        tracing::info!("Created post {}", ack.slug);
        Ok(ack)
    }

    pub async fn update(&self, slug: &str, form: PostForm) -> ClientResult<PostAck> {
        form.validate()?;
        let builder = self
            .api
            .authed(Method::PUT, &format!("posts/{}/update/", slug))
            .await?;
        let ack: PostAck = self
            .api
            .send_json(builder.multipart(form.into_multipart()?))
            .await?;
        tracing::info!("Updated post {}", slug);
        Ok(ack)
    }

    /// Fetch a post and fail locally unless the session authored it.
    pub async fn get_own(&self, slug: &str) -> ClientResult<Post> {
        let username = self
            .api
            .session()
            .username()
            .await?
            .ok_or(ClientError::AuthRequired)?;
        let post = self.get(slug).await?;
        if !post.is_authored_by(&username) {
            return Err(ClientError::Forbidden(
                "You can only change your own blog posts.".to_string(),
            ));
        }
        Ok(post)
    }

    pub async fn delete(&self, slug: &str) -> ClientResult<()> {
        let builder = self
            .api
            .authed(Method::DELETE, &format!("posts/{}/delete/", slug))
            .await?;
        self.api.send(builder).await?;
        tracing::info!("Deleted post {}", slug);
        Ok(())
    }

    /// Posts the current user bookmarked.
    pub async fn bookmarked(&self) -> ClientResult<Vec<Post>> {
        let builder = self.api.authed(Method::GET, "profile/bookmarked/").await?;
        let listing: super::Listing<Post> = self.api.send_json(builder).await?;
        Ok(listing.into_vec())
    }

    /// Posts the current user authored.
    pub async fn mine(&self) -> ClientResult<Vec<Post>> {
        let builder = self.api.authed(Method::GET, "profile/blogs/").await?;
        let listing: super::Listing<Post> = self.api.send_json(builder).await?;
        Ok(listing.into_vec())
    }
}
