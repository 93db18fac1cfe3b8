//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain    | Description                                   |
//! |---------|-----------|-----------------------------------------------|
//! | 0       | Universal | Success                                       |
//! | 1       | Universal | General error (unspecified)                   |
//! | 2       | Universal | CLI usage error (bad args)                    |
//! | 3-9     | input     | Dataset / config could not be loaded          |
//! | 10-19   | audit     | `--strict` outcomes of a completed audit      |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed. Findings alone do not fail a run
/// unless `--strict` is given.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure (e.g. cannot write results).
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments or no command given.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-9)
// =============================================================================

/// A table or config file is missing or unreadable.
pub const EXIT_INPUT_MISSING: u8 = 3;

/// A table has no header, an invalid header shape, or lacks a required column.
pub const EXIT_INPUT_FORMAT: u8 = 4;

/// The audit config cannot be parsed or fails validation.
pub const EXIT_INPUT_CONFIG: u8 = 5;

// =============================================================================
// Audit (10-19)
// =============================================================================

/// `run --strict`: at least one pass produced findings.
pub const EXIT_AUDIT_FINDINGS: u8 = 10;

/// `check --strict`: at least one table has malformed rows.
pub const EXIT_AUDIT_DIAGNOSTICS: u8 = 11;
