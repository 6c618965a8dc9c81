pub mod state;

use crate::api::{AddOutcome, ApiClient, Post};
use crate::error::{ClientError, ClientResult};

pub use state::{ToggleState, TransitionError};

impl From<TransitionError> for ClientError {
    fn from(e: TransitionError) -> Self {
        ClientError::NotReady(e.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Like,
    Bookmark,
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Like => "like",
            Interaction::Bookmark => "bookmark",
        }
    }
}

/// Like/bookmark state of one post for the current session.
///
/// Values only change when the server acknowledges a request or when a
/// fresh read of the post is applied with [`PostInteractions::sync`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInteractions {
    slug: String,
    liked: ToggleState,
    bookmarked: ToggleState,
    likes_count: Option<u64>,
}

impl PostInteractions {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            liked: ToggleState::Unknown,
            bookmarked: ToggleState::Unknown,
            likes_count: None,
        }
    }

    pub fn from_post(post: &Post) -> Self {
        let mut interactions = Self::new(post.slug.clone());
        interactions.sync(post);
        interactions
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn liked(&self) -> Option<bool> {
        self.liked.value()
    }

    pub fn bookmarked(&self) -> Option<bool> {
        self.bookmarked.value()
    }

    pub fn likes_count(&self) -> Option<u64> {
        self.likes_count
    }

    pub fn state(&self, interaction: Interaction) -> ToggleState {
        match interaction {
            Interaction::Like => self.liked,
            Interaction::Bookmark => self.bookmarked,
        }
    }

    fn set_state(&mut self, interaction: Interaction, state: ToggleState) {
        match interaction {
            Interaction::Like => self.liked = state,
            Interaction::Bookmark => self.bookmarked = state,
        }
    }

    /// Adopt the server's view of the post.
    pub fn sync(&mut self, post: &Post) {
        self.liked = self.liked.sync(post.is_liked);
        self.bookmarked = self.bookmarked.sync(post.is_bookmarked);
        if !self.liked.is_pending() {
            self.likes_count = Some(post.likes_count);
        }
    }

    /// Re-read the post and sync.
    pub async fn refresh(&mut self, api: &ApiClient) -> ClientResult<()> {
        let post = api.posts().get(&self.slug).await?;
        self.sync(&post);
        Ok(())
    }

    pub async fn toggle_like(&mut self, api: &ApiClient) -> ClientResult<bool> {
        self.toggle(api, Interaction::Like).await
    }

    pub async fn toggle_bookmark(&mut self, api: &ApiClient) -> ClientResult<bool> {
        self.toggle(api, Interaction::Bookmark).await
    }

    /// Remove when currently set, add otherwise; the value flips only after
    /// the server acknowledges. Anonymous sessions fail before any request.
    pub async fn toggle(&mut self, api: &ApiClient, interaction: Interaction) -> ClientResult<bool> {
        if !api.session().is_authenticated().await? {
            return Err(ClientError::AuthRequired);
        }

        let (pending, current) = self.state(interaction).begin()?;
        self.set_state(interaction, pending);

        let result = match (interaction, current) {
            (Interaction::Like, true) => api.unlike(&self.slug).await.map(|_| None),
            (Interaction::Like, false) => api.like(&self.slug).await.map(Some),
            (Interaction::Bookmark, true) => api.unbookmark(&self.slug).await.map(|_| None),
            (Interaction::Bookmark, false) => api.bookmark(&self.slug).await.map(Some),
        };

        match result {
            Ok(outcome) => {
                let value = !current;
                self.set_state(interaction, pending.confirm(value)?);
                if interaction == Interaction::Like {
                    self.apply_like_count(outcome);
                }
                tracing::info!("{} on {} confirmed as {}", interaction.name(), self.slug, value);
                Ok(value)
            }
            Err(e) => {
                self.set_state(interaction, pending.revert()?);
                tracing::warn!("{} on {} failed: {}", interaction.name(), self.slug, e);
                Err(e)
            }
        }
    }

    // `None` means a like was removed.
    fn apply_like_count(&mut self, outcome: Option<AddOutcome>) {
        let Some(count) = self.likes_count else {
            return;
        };
        self.likes_count = Some(match outcome {
            None => count.saturating_sub(1),
            Some(AddOutcome::Created) => count + 1,
            Some(AddOutcome::AlreadyPresent) => count,
        });
    }
}
