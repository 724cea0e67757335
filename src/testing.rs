// src/testing.rs
//! In-process `JobBoardApi` double for component tests

use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};

use crate::core::JobBoardApi;
use crate::error::ClientError;
use crate::types::{
    ApiResponse, Job, JobPage, ListPayload, ListingQuery, LoginPayload, LoginRequest,
    Organization, ProfileUpdate, RegisterRequest,
};
use serde::de::IgnoredAny;

type JobsReply = Box<dyn Fn(&ListingQuery) -> (Duration, String) + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Login(LoginRequest),
    Register(RegisterRequest),
    ListJobs { token: String, query: ListingQuery },
    Popular,
    Organizations(String),
    UpdateProfile { token: String, update: ProfileUpdate },
    Health,
}

/// Replies with canned response bodies, decoded through the real envelope
/// decoder, and records every call.
pub(crate) struct FakeApi {
    jobs: JobsReply,
    login_body: String,
    register_body: String,
    popular_body: String,
    organizations_body: String,
    profile_body: String,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            jobs: Box::new(|_| (Duration::ZERO, jobs_body(0, 0, 0))),
            login_body: r#"{"success":false,"message":"no login scripted"}"#.to_string(),
            register_body: r#"{"success":true}"#.to_string(),
            popular_body: r#"{"success":true,"data":[]}"#.to_string(),
            organizations_body: r#"{"success":true,"data":[]}"#.to_string(),
            profile_body: r#"{"success":true}"#.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub(crate) fn with_jobs<F>(mut self, reply: F) -> Self
    where
        F: Fn(&ListingQuery) -> (Duration, String) + Send + Sync + 'static,
    {
        self.jobs = Box::new(reply);
        self
    }

    pub(crate) fn with_login(mut self, body: &str) -> Self {
        self.login_body = body.to_string();
        self
    }

    pub(crate) fn with_register(mut self, body: &str) -> Self {
        self.register_body = body.to_string();
        self
    }

    pub(crate) fn with_popular(mut self, body: &str) -> Self {
        self.popular_body = body.to_string();
        self
    }

    pub(crate) fn with_organizations(mut self, body: &str) -> Self {
        self.organizations_body = body.to_string();
        self
    }

    pub(crate) fn with_profile(mut self, body: &str) -> Self {
        self.profile_body = body.to_string();
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn listing_queries(&self) -> Vec<ListingQuery> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListJobs { query, .. } => Some(query),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Listing envelope with `count` numbered jobs.
pub(crate) fn jobs_body(count: usize, total: u64, total_pages: u32) -> String {
    let data: Vec<Value> = (1..=count)
        .map(|n| json!({"id": n, "title": format!("Job {}", n), "organization": "Acme"}))
        .collect();
    json!({
        "success": true,
        "data": data,
        "pagination": {"total": total, "totalPages": total_pages}
    })
    .to_string()
}

impl JobBoardApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginPayload, ClientError> {
        self.record(Call::Login(request.clone()));
        ApiResponse::<LoginPayload>::decode(&self.login_body)?.into_result()
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ClientError> {
        self.record(Call::Register(request.clone()));
        ApiResponse::<IgnoredAny>::decode(&self.register_body)?
            .into_result()
            .map(|_| ())
    }

    async fn list_jobs(&self, token: &str, query: &ListingQuery) -> Result<JobPage, ClientError> {
        self.record(Call::ListJobs {
            token: token.to_string(),
            query: query.clone(),
        });
        let (delay, body) = (self.jobs)(query);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        ApiResponse::<ListPayload<Job>>::decode(&body)?
            .into_result()
            .map(JobPage::from)
    }

    async fn popular_jobs(&self) -> Result<Vec<Job>, ClientError> {
        self.record(Call::Popular);
        ApiResponse::<ListPayload<Job>>::decode(&self.popular_body)?
            .into_result()
            .map(ListPayload::items)
    }

    async fn organizations(&self, token: &str) -> Result<Vec<Organization>, ClientError> {
        self.record(Call::Organizations(token.to_string()));
        ApiResponse::<ListPayload<Organization>>::decode(&self.organizations_body)?
            .into_result()
            .map(ListPayload::items)
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> Result<(), ClientError> {
        self.record(Call::UpdateProfile {
            token: token.to_string(),
            update: update.clone(),
        });
        ApiResponse::<IgnoredAny>::decode(&self.profile_body)?
            .into_result()
            .map(|_| ())
    }

    async fn health(&self) -> Result<Value, ClientError> {
        self.record(Call::Health);
        Ok(json!({"status": "ok"}))
    }
}
