//! Observability for the query client
//!
//! Structured JSON-line logging of query dispatch, completion and failure,
//! and of best-effort collection iteration aborts.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never fails the caller's operation
//! 3. Deterministic output (sorted fields)
//! 4. Each client filters its own query events; the process-wide threshold
//!    only applies where no client is in scope
//!
//! # Usage
//!
//! ```ignore
//! use objquery::observability::{Event, Logger, QueryScope, Severity};
//!
//! Logger::event_at(Severity::Info, Event::ClientInitialized, &[("timeout_ms", "5000")]);
//!
//! let scope = QueryScope::dispatch("classes/post", Severity::Info);
//! // ... await transport ...
//! scope.complete(12);
//! ```

mod events;
mod logger;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use scope::{QueryScope, Timer};
