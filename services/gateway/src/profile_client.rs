//! HTTP client for the internal profile service
//!
//! The durable store lives behind a sibling service; every trait method
//! maps to exactly one endpoint. A 404 on a point operation becomes
//! `StoreError::NotFound`, transport problems and non-success statuses
//! become `Unavailable`, and an undecodable body is `Corrupt`.

use async_trait::async_trait;
use match_engine::store::{CandidateQuery, MessageStore, ProfileStore, StoreError};
use reqwest::{Client, Response, StatusCode};
use serde_json::json;
use types::ids::UserId;
use types::message::Message;
use types::profile::UserProfile;

pub struct ProfileServiceClient {
    http: Client,
    base_url: String,
}

impl ProfileServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn unavailable(err: reqwest::Error) -> StoreError {
    StoreError::Unavailable(format!("profile service error: {err}"))
}

fn corrupt(err: reqwest::Error) -> StoreError {
    StoreError::Corrupt(format!("profile service response: {err}"))
}

/// Map a non-success status; `user` names the record a 404 refers to.
fn check(res: Response, user: Option<&UserId>) -> Result<Response, StoreError> {
    match res.status() {
        StatusCode::NOT_FOUND => match user {
            Some(user) => Err(StoreError::NotFound(user.clone())),
            None => Err(StoreError::Unavailable(
                "profile service returned 404".to_string(),
            )),
        },
        status if status.is_success() => Ok(res),
        status => Err(StoreError::Unavailable(format!(
            "profile service returned {status}"
        ))),
    }
}

#[async_trait]
impl ProfileStore for ProfileServiceClient {
    async fn fetch(&self, user: &UserId) -> Result<UserProfile, StoreError> {
        let res = self
            .http
            .get(self.url(&format!("/internal/profiles/{user}")))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user))?.json().await.map_err(corrupt)
    }

    async fn fetch_many(&self, users: &[UserId]) -> Result<Vec<UserProfile>, StoreError> {
        let ids = users
            .iter()
            .map(UserId::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let res = self
            .http
            .get(self.url("/internal/profiles"))
            .query(&[("ids", ids)])
            .send()
            .await
            .map_err(unavailable)?;
        check(res, None)?.json().await.map_err(corrupt)
    }

    async fn find_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<UserProfile>, StoreError> {
        let res = self
            .http
            .post(self.url("/internal/profiles/query"))
            .json(query)
            .send()
            .await
            .map_err(unavailable)?;
        check(res, None)?.json().await.map_err(corrupt)
    }

    async fn append_swiped_right(
        &self,
        user: &UserId,
        target: &UserId,
    ) -> Result<(), StoreError> {
        let res = self
            .http
            .post(self.url(&format!("/internal/profiles/{user}/swiped-right")))
            .json(&json!({ "user_id": target }))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }

    async fn append_swiped_left(
        &self,
        user: &UserId,
        target: &UserId,
    ) -> Result<(), StoreError> {
        let res = self
            .http
            .post(self.url(&format!("/internal/profiles/{user}/swiped-left")))
            .json(&json!({ "user_id": target }))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }

    async fn append_match(&self, user: &UserId, other: &UserId) -> Result<(), StoreError> {
        let res = self
            .http
            .post(self.url(&format!("/internal/profiles/{user}/matches")))
            .json(&json!({ "user_id": other }))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }

    async fn remove_match(&self, user: &UserId, other: &UserId) -> Result<(), StoreError> {
        let res = self
            .http
            .delete(self.url(&format!("/internal/profiles/{user}/matches/{other}")))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }

    async fn remove_swiped_right(
        &self,
        user: &UserId,
        other: &UserId,
    ) -> Result<(), StoreError> {
        let res = self
            .http
            .delete(self.url(&format!("/internal/profiles/{user}/swiped-right/{other}")))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }

    async fn add_pending_notification(
        &self,
        user: &UserId,
        sender: &UserId,
    ) -> Result<(), StoreError> {
        let res = self
            .http
            .put(self.url(&format!("/internal/profiles/{user}/notifications/{sender}")))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }

    async fn remove_pending_notification(
        &self,
        user: &UserId,
        sender: &UserId,
    ) -> Result<(), StoreError> {
        let res = self
            .http
            .delete(self.url(&format!("/internal/profiles/{user}/notifications/{sender}")))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }

    async fn delete_profile(&self, user: &UserId) -> Result<(), StoreError> {
        let res = self
            .http
            .delete(self.url(&format!("/internal/profiles/{user}")))
            .send()
            .await
            .map_err(unavailable)?;
        check(res, Some(user)).map(|_| ())
    }
}

#[async_trait]
impl MessageStore for ProfileServiceClient {
    async fn append(&self, message: &Message) -> Result<(), StoreError> {
        let res = self
            .http
            .post(self.url("/internal/messages"))
            .json(message)
            .send()
            .await
            .map_err(unavailable)?;
        check(res, None).map(|_| ())
    }

    async fn conversation(
        &self,
        sender: &UserId,
        recipient: &UserId,
    ) -> Result<Vec<Message>, StoreError> {
        let res = self
            .http
            .get(self.url("/internal/messages"))
            .query(&[("sender", sender.as_str()), ("recipient", recipient.as_str())])
            .send()
            .await
            .map_err(unavailable)?;
        check(res, None)?.json().await.map_err(corrupt)
    }

    async fn purge_conversation(
        &self,
        sender: &UserId,
        recipient: &UserId,
    ) -> Result<(), StoreError> {
        let res = self
            .http
            .delete(self.url("/internal/messages"))
            .query(&[("sender", sender.as_str()), ("recipient", recipient.as_str())])
            .send()
            .await
            .map_err(unavailable)?;
        check(res, None).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_normalized() {
        let client = ProfileServiceClient::new("http://profiles:8081/");
        assert_eq!(
            client.url("/internal/profiles/alice"),
            "http://profiles:8081/internal/profiles/alice"
        );
    }
}
