//! Task-local trace id for the request being served.
//!
//! `TraceSpan` opens the scope; `AppError::error_response` and the JSON
//! extractor read it. Outside a scope the id is `"unknown"`.

use tokio::task_local;

task_local! {
    static TRACE_ID: String;
}

pub const UNKNOWN_TRACE_ID: &str = "unknown";

/// Trace id of the current task, or `"unknown"`.
pub fn trace_id() -> String {
    TRACE_ID
        .try_with(Clone::clone)
        .unwrap_or_else(|_| UNKNOWN_TRACE_ID.to_string())
}

/// Run `future` with `trace_id` visible to `trace_id()`.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
