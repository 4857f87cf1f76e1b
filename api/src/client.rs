//! HTTP client for the leave backend. The bearer token is always handed in
//! by the caller; nothing here reads ambient storage.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{ApiError, ErrorBody};
use crate::leave::{Dashboard, LeaveDraft, LeaveRequest};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

const DASHBOARD_PATH: &str = "gestion-absences-conges/employe/dashboard/";
const REQUESTS_PATH: &str = "gestion-absences-conges/demande-conge/";

/// Where to reach the backend and how to authenticate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    base_url: String,
    token: String,
}

impl Credentials {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Path of one leave request, relative to the base URL.
pub fn request_path(id: u64) -> String {
    format!("{REQUESTS_PATH}{id}/")
}

#[derive(Debug, Clone)]
pub struct LeaveClient {
    http: Client,
    credentials: Credentials,
}

/// Two clients are interchangeable when they talk to the same backend as the
/// same user.
impl PartialEq for LeaveClient {
    fn eq(&self, other: &Self) -> bool {
        self.credentials == other.credentials
    }
}

impl LeaveClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            http: Client::new(),
            credentials,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Balance and every request of the signed-in employee.
    pub async fn dashboard(&self) -> Result<Dashboard, ApiError> {
        let request = self.http.get(self.credentials.endpoint(DASHBOARD_PATH));
        self.send_json(request).await
    }

    pub async fn create(&self, draft: &LeaveDraft) -> Result<LeaveRequest, ApiError> {
        self.send_json(self.save_request(None, draft)).await
    }

    pub async fn update(&self, id: u64, draft: &LeaveDraft) -> Result<LeaveRequest, ApiError> {
        self.send_json(self.save_request(Some(id), draft)).await
    }

    /// PUT on the stored request when `existing` is set, POST otherwise.
    fn save_request(&self, existing: Option<u64>, draft: &LeaveDraft) -> RequestBuilder {
        let request = match existing {
            Some(id) => self.http.put(self.credentials.endpoint(&request_path(id))),
            None => self.http.post(self.credentials.endpoint(REQUESTS_PATH)),
        };
        request.json(&draft.payload())
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        let request = self.http.delete(self.credentials.endpoint(&request_path(id)));
        self.send(request).await.map(|_| ())
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .header(reqwest::header::AUTHORIZATION, self.credentials.authorization())
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            tracing::warn!(%status, "backend refused the credentials");
            return Err(ApiError::Unauthorized);
        }

        let body = response.text().await.unwrap_or_default();
        let body = ErrorBody::from_text(&body);
        tracing::debug!(%status, error = %body, "backend rejected the request");
        Err(ApiError::Rejected(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_without_double_slashes() {
        let credentials = Credentials::new("http://localhost:8000/", "abc");
        assert_eq!(
            credentials.endpoint(DASHBOARD_PATH),
            "http://localhost:8000/gestion-absences-conges/employe/dashboard/"
        );
        assert_eq!(
            credentials.endpoint(&request_path(42)),
            "http://localhost:8000/gestion-absences-conges/demande-conge/42/"
        );
        assert_eq!(credentials.authorization(), "Bearer abc");
    }

    #[test]
    fn saving_targets_put_for_existing_requests() {
        let client = LeaveClient::new(Credentials::new(DEFAULT_BASE_URL, "abc"));
        let draft = LeaveDraft {
            start: "2024-02-05".into(),
            end: "2024-02-06".into(),
            comment: "Ski".into(),
            ..LeaveDraft::new()
        };

        let update = client.save_request(Some(7), &draft).build().unwrap();
        assert_eq!(update.method(), reqwest::Method::PUT);
        assert_eq!(
            update.url().as_str(),
            "http://localhost:8000/gestion-absences-conges/demande-conge/7/"
        );

        let create = client.save_request(None, &draft).build().unwrap();
        assert_eq!(create.method(), reqwest::Method::POST);
        assert_eq!(
            create.url().as_str(),
            "http://localhost:8000/gestion-absences-conges/demande-conge/"
        );
    }

    #[test]
    fn blank_tokens_are_reported() {
        assert!(!Credentials::new(DEFAULT_BASE_URL, "  ").has_token());
        assert!(Credentials::new(DEFAULT_BASE_URL, "t").has_token());
    }
}
