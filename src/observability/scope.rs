//! QueryScope for dispatch/complete/failed logging around one execution
//!
//! - Logs QUERY_DISPATCH on creation
//! - Logs QUERY_COMPLETE or QUERY_FAILED when finished
//! - Logs QUERY_INCOMPLETE on drop if never finished (future dropped)

use std::time::Instant;

use super::events::Event;
use super::logger::{Logger, Severity};

/// Tracks one query execution from dispatch to completion
///
/// # Usage
///
/// ```ignore
/// let scope = QueryScope::dispatch("classes/post", Severity::Info);
/// // ... await transport ...
/// scope.complete(records.len());
/// ```
pub struct QueryScope {
    route: String,
    min: Severity,
    timer: Timer,
    finished: bool,
}

impl QueryScope {
    /// Start tracking a query sent to `route`, logging nothing below `min`
    pub fn dispatch(route: impl Into<String>, min: Severity) -> Self {
        let route = route.into();
        Logger::event_at(min, Event::QueryDispatch, &[("route", route.as_str())]);

        Self {
            route,
            min,
            timer: Timer::new(),
            finished: false,
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    /// Mark the query as successfully completed
    pub fn complete(mut self, records: usize) {
        self.finished = true;
        let records = records.to_string();
        let elapsed = self.timer.elapsed_ms();
        Logger::event_at(
            self.min,
            Event::QueryComplete,
            &[
                ("elapsed_ms", elapsed.as_str()),
                ("records", records.as_str()),
                ("route", self.route.as_str()),
            ],
        );
    }

    /// Mark the query as failed with a reason
    pub fn fail(mut self, code: &str, reason: &str) {
        self.finished = true;
        Logger::event_at(
            self.min,
            Event::QueryFailed,
            &[("code", code), ("reason", reason), ("route", self.route.as_str())],
        );
    }

    pub fn min_severity(&self) -> Severity {
        self.min
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Drop for QueryScope {
    fn drop(&mut self) {
        if !self.finished {
            Logger::log_at(
                self.min,
                Severity::Warn,
                "QUERY_INCOMPLETE",
                &[
                    ("reason", "dropped before completion"),
                    ("route", self.route.as_str()),
                ],
            );
        }
    }
}

/// A simple duration timer for logging elapsed time
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed milliseconds as a string
    pub fn elapsed_ms(&self) -> String {
        self.start.elapsed().as_millis().to_string()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
