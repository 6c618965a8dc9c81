use reqwest::multipart::Form;
use reqwest::Method;

use super::models::Profile;
use super::posts::ImageUpload;
use super::ApiClient;
use crate::error::ClientResult;

/// Multipart body for profile updates. The server wants username and email
/// echoed back alongside the editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profile_picture: Option<ImageUpload>,
}

impl ProfileForm {
    /// Start from the current profile so unchanged fields round-trip.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone(),
            bio: profile.bio.clone().unwrap_or_default(),
            profile_picture: None,
        }
    }

    fn into_multipart(self) -> ClientResult<Form> {
        let mut form = Form::new()
            .text("username", self.username)
            .text("email", self.email)
            .text("bio", self.bio);
        if let Some(picture) = self.profile_picture {
            form = form.part("profile_picture", picture.into_part()?);
        }
        Ok(form)
    }
}

impl ApiClient {
    pub async fn profile(&self) -> ClientResult<Profile> {
        let builder = self.authed(Method::GET, "profile/").await?;
        self.send_json(builder).await
    }

    pub async fn update_profile(&self, form: ProfileForm) -> ClientResult<Profile> {
        let builder = self
            .authed(Method::PUT, "profile/")
            .await?
            .multipart(form.into_multipart()?);
        let profile: Profile = self.send_json(builder).await?;
        tracing::info!("Updated profile of {}", profile.username);
        Ok(profile)
    }
}
