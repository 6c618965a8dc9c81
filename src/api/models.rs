use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub author: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub likes_count: u64,
}

impl Post {
    /// The excerpt, or the first 100 characters of the content.
    pub fn summary(&self) -> String {
        match self.excerpt.as_deref() {
            Some(excerpt) if !excerpt.trim().is_empty() => excerpt.to_string(),
            _ => self.content.chars().take(100).collect(),
        }
    }

    pub fn is_authored_by(&self, username: &str) -> bool {
        self.author == username
    }
}

/// What create and update answer with: relations come back as ids, not
/// objects. Fetch the post by slug for the full detail shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostAck {
    pub id: u64,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<u64>,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub post: Option<u64>,
    #[serde(rename = "user", alias = "author")]
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: Option<u64>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}
