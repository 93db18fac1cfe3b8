//! `feataudit-recon`: feature-table reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded tables, returns findings.
//! No CLI or IO dependencies.

pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod rename;
pub mod summary;
pub mod table;

pub use config::{AuditConfig, FieldNames};
pub use engine::{
    backward_existence, deletion_verification, forward_existence, run_audit, run_pass,
    AuditContext, OutputTable, DEFAULT_BACKWARD_ORDER,
};
pub use error::AuditError;
pub use model::{AuditReport, FeatureCounts, Finding, Pass, PassReport};
pub use table::{AttributeSet, Table};
