// src/popular.rs
use crate::app_log;
use crate::core::JobBoardApi;
use crate::types::Job;

/// Featured jobs for the landing page. No session needed; failures are logged
/// and show up as an empty list.
pub async fn fetch_popular<A: JobBoardApi>(api: &A) -> Vec<Job> {
    match api.popular_jobs().await {
        Ok(jobs) => jobs,
        Err(e) => {
            app_log!(error, "Error fetching popular jobs: {}", e);
            Vec::new()
        }
    }
}
