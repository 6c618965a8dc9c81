use reqwest::Method;

use super::models::Notification;
use super::response::Listing;
use super::ApiClient;
use crate::error::ClientResult;

pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

impl ApiClient {
    pub async fn notifications(&self) -> ClientResult<Vec<Notification>> {
        let builder = self.authed(Method::GET, "notifications/").await?;
        let listing: Listing<Notification> = self.send_json(builder).await?;
        Ok(listing.into_vec())
    }

    pub async fn mark_all_notifications_read(&self) -> ClientResult<()> {
        let builder = self
            .authed(Method::POST, "notifications/mark-all-read/")
            .await?;
        self.send(builder).await?;
        Ok(())
    }

    pub async fn mark_notification_read(&self, id: u64) -> ClientResult<()> {
        let builder = self
            .authed(Method::POST, &format!("notifications/{}/read/", id))
            .await?;
        self.send(builder).await?;
        Ok(())
    }
}
