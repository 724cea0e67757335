// src/core/service_client.rs
//! HTTP client for the job-board REST API, behind the `JobBoardApi` seam

use std::future::Future;
use std::time::Duration;

use reqwest::RequestBuilder;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde_json::Value;

use crate::app_log;
use crate::environment::ClientConfig;
use crate::error::ClientError;
use crate::types::{
    ApiResponse, Job, JobPage, ListPayload, ListingQuery, LoginPayload, LoginRequest,
    Organization, ProfileUpdate, RegisterRequest,
};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const REGISTER_ENDPOINT: &str = "/api/auth/register";
pub const JOBS_ENDPOINT: &str = "/api/job-board";
pub const POPULAR_ENDPOINT: &str = "/api/job-board/popular";
pub const ORGANIZATIONS_ENDPOINT: &str = "/api/job-board/organizations";
pub const PROFILE_ENDPOINT: &str = "/api/users/profile";
pub const HEALTH_ENDPOINT: &str = "/api/health";

/// Operations the client components need from the backend.
///
/// Futures are `Send` so the listing controller can run fetches on spawned tasks.
pub trait JobBoardApi: Send + Sync + 'static {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginPayload, ClientError>> + Send;

    fn register(
        &self,
        request: &RegisterRequest,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn list_jobs(
        &self,
        token: &str,
        query: &ListingQuery,
    ) -> impl Future<Output = Result<JobPage, ClientError>> + Send;

    fn popular_jobs(&self) -> impl Future<Output = Result<Vec<Job>, ClientError>> + Send;

    fn organizations(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<Organization>, ClientError>> + Send;

    fn update_profile(
        &self,
        token: &str,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn health(&self) -> impl Future<Output = Result<Value, ClientError>> + Send;
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClientError::Config("base URL must not be empty".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(config.api_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and decode the `{success, ...}` envelope. The HTTP status is
    /// only logged: error statuses still carry the envelope with the message.
    async fn send_envelope<T>(&self, request: RequestBuilder, label: &str) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            app_log!(error, "{} request failed: {}", label, e);
            ClientError::Transport(e)
        })?;

        let status = response.status();
        app_log!(debug, "{} responded {}", label, status);

        let body = response.text().await?;

        match ApiResponse::<T>::decode(&body) {
            Ok(decoded) => decoded.into_result(),
            Err(e) => {
                app_log!(
                    warn,
                    "{} returned an undecodable body (status {}): {}",
                    label,
                    status,
                    e
                );
                Err(e)
            }
        }
    }
}

impl JobBoardApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginPayload, ClientError> {
        let url = self.url(LOGIN_ENDPOINT);
        app_log!(info, "POST {}", url);
        self.send_envelope(self.client.post(&url).json(request), "login")
            .await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        let url = self.url(REGISTER_ENDPOINT);
        app_log!(info, "POST {}", url);
        self.send_envelope::<IgnoredAny>(self.client.post(&url).json(request), "register")
            .await
            .map(|_| ())
    }

    async fn list_jobs(&self, token: &str, query: &ListingQuery) -> Result<JobPage, ClientError> {
        let url = self.url(JOBS_ENDPOINT);
        app_log!(info, "GET {}?{}", url, query.query_string());
        let request = self
            .client
            .get(&url)
            .query(&query.query_pairs())
            .bearer_auth(token);
        self.send_envelope::<ListPayload<Job>>(request, "job listing")
            .await
            .map(JobPage::from)
    }

    async fn popular_jobs(&self) -> Result<Vec<Job>, ClientError> {
        let url = self.url(POPULAR_ENDPOINT);
        app_log!(info, "GET {}", url);
        self.send_envelope::<ListPayload<Job>>(self.client.get(&url), "popular jobs")
            .await
            .map(ListPayload::items)
    }

    async fn organizations(&self, token: &str) -> Result<Vec<Organization>, ClientError> {
        let url = self.url(ORGANIZATIONS_ENDPOINT);
        app_log!(info, "GET {}", url);
        let request = self.client.get(&url).bearer_auth(token);
        self.send_envelope::<ListPayload<Organization>>(request, "organizations")
            .await
            .map(ListPayload::items)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<(), ClientError> {
        let url = self.url(PROFILE_ENDPOINT);
        app_log!(info, "PUT {}", url);
        let request = self.client.put(&url).json(update).bearer_auth(token);
        self.send_envelope::<IgnoredAny>(request, "profile update")
            .await
            .map(|_| ())
    }

    /// Liveness probe. The body is arbitrary JSON, so no envelope is enforced.
    async fn health(&self) -> Result<Value, ClientError> {
        let url = self.url(HEALTH_ENDPOINT);
        app_log!(info, "GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Rejected {
                message: Some(format!("health check returned {}", status)),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| ClientError::Decode(format!("health body is not JSON: {}", e)))
    }
}
