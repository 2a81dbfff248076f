//! Job-list state for the dashboard.
//!
//! DESIGN
//! ======
//! Kept apart from the session so a failed fetch only touches the list's own
//! error line. A 401 is handed back to the caller instead of being rendered,
//! since it means the session is over rather than that the list failed.

#[cfg(test)]
#[path = "jobs_test.rs"]
mod jobs_test;

use crate::net::api::ApiError;
use crate::net::types::Job;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobsState {
    pub items: Vec<Job>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded,
    Failed,
    /// The API rejected the token; the caller should sign out and redirect.
    Unauthorized,
}

impl JobsState {
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn finish_fetch(&mut self, result: Result<Vec<Job>, ApiError>) -> FetchOutcome {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                FetchOutcome::Loaded
            }
            Err(ApiError::Unauthorized { .. }) => FetchOutcome::Unauthorized,
            Err(err) => {
                self.error = Some(fetch_error_message(&err));
                FetchOutcome::Failed
            }
        }
    }
}

/// Inline message shown above the job list when a fetch fails.
pub fn fetch_error_message(err: &ApiError) -> String {
    let detail = err
        .server_message()
        .map_or_else(|| err.to_string(), str::to_owned);
    let status = err
        .status()
        .map_or_else(|| "Unknown".to_owned(), |s| s.to_string());
    format!("Error fetching job list: {detail} (Status code: {status})")
}
