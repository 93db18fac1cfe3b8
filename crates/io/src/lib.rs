// File I/O - pipe-delimited feature tables

pub mod header;
pub mod loader;

pub use header::verify_header;
pub use loader::{load_table, parse_table, LoadError, LoadedTable, RowDiagnostic};
