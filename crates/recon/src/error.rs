use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (no outputs, duplicate names, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A table lacks a column the audit depends on.
    #[error("table '{table}': missing column '{column}'")]
    MissingColumn { table: String, column: String },
    /// Output slot name not present in the context.
    #[error("unknown output table: {0}")]
    UnknownOutput(String),
}
