// src/status.rs
//! One-shot connectivity probe against the configured backend

use crate::core::JobBoardApi;

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Ok(String),
    Failed(String),
    Skipped(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub name: &'static str,
    pub endpoint: &'static str,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn is_ok(&self) -> bool {
        !matches!(self.outcome, ProbeOutcome::Failed(_))
    }
}

/// Hit health, popular jobs and, with a token, organizations. Each probe runs
/// once; one failing does not stop the others.
pub async fn probe<A: JobBoardApi>(api: &A, token: Option<&str>) -> Vec<ProbeResult> {
    use crate::core::service_client::{HEALTH_ENDPOINT, ORGANIZATIONS_ENDPOINT, POPULAR_ENDPOINT};

    let health = match api.health().await {
        Ok(body) => ProbeOutcome::Ok(body.to_string()),
        Err(e) => ProbeOutcome::Failed(e.to_string()),
    };

    let popular = match api.popular_jobs().await {
        Ok(jobs) => ProbeOutcome::Ok(format!("{} jobs", jobs.len())),
        Err(e) => ProbeOutcome::Failed(e.to_string()),
    };

    let organizations = match token {
        Some(token) => match api.organizations(token).await {
            Ok(orgs) => ProbeOutcome::Ok(format!("{} organizations", orgs.len())),
            Err(e) => ProbeOutcome::Failed(e.to_string()),
        },
        None => ProbeOutcome::Skipped("not logged in"),
    };

    vec![
        ProbeResult {
            name: "Health",
            endpoint: HEALTH_ENDPOINT,
            outcome: health,
        },
        ProbeResult {
            name: "Popular Jobs",
            endpoint: POPULAR_ENDPOINT,
            outcome: popular,
        },
        ProbeResult {
            name: "Organizations",
            endpoint: ORGANIZATIONS_ENDPOINT,
            outcome: organizations,
        },
    ]
}
