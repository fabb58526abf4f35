//! Metric computation engine for ticket-tracking exports (Jira/Sheets,
//! PT/EN). Ingests a CSV of unknown delimiter/encoding, normalizes column
//! names and timestamps, classifies ticket types, and computes per-analyst
//! and per-period service metrics. The presentation layer (tables, charts,
//! upload handling) is a separate client of [`session::AnalysisSession`].

pub mod analyzer;
pub mod config;
pub mod error;
pub mod parser;
pub mod session;

pub use config::EngineConfig;
pub use error::AppError;
pub use session::{AnalysisSession, AnalystFilter, FilterParams, Report};

// ─── E2E Integration Tests ──────────────────────────────────────────────────
