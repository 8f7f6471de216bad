//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//! ```
//!
//! # Design Decisions
//! - The library records through the `metrics` facade only; installing a
//!   recorder/exporter is the embedding application's concern
//! - Request ID flows through every log event for one call

pub mod logging;
pub mod metrics;
