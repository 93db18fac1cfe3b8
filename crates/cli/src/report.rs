// Issue logs, counts summary and load diagnostics

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use feataudit_io::{LoadedTable, RowDiagnostic};
use feataudit_recon::{FeatureCounts, PassReport};
use tracing::debug;

pub const COUNTS_FILE: &str = "feature_counts.csv";

/// Write a pass's findings, one per line, to its log file in `dir`.
///
/// A clean pass writes nothing and removes any log left by an earlier run.
/// Returns the path written, if any.
pub fn write_pass_log(dir: &Path, report: &PassReport) -> io::Result<Option<PathBuf>> {
    let path = dir.join(report.pass.log_file_name());

    if report.is_clean() {
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "removed stale log"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        return Ok(None);
    }

    let mut content = String::new();
    for finding in &report.findings {
        let _ = writeln!(content, "{finding}");
    }
    std::fs::write(&path, content)?;
    Ok(Some(path))
}

pub fn counts_text(counts: &FeatureCounts) -> String {
    format!(
        "Number of original features: {}\n\
         Number of output features: {}\n\
         Number of deletions: {}\n\
         Difference in feature number: {}\n",
        counts.reference, counts.output, counts.deletions, counts.difference,
    )
}

pub fn write_counts(dir: &Path, counts: &FeatureCounts) -> io::Result<PathBuf> {
    let path = dir.join(COUNTS_FILE);
    std::fs::write(&path, counts_text(counts))?;
    Ok(path)
}

/// Render the row diagnostics of a loaded table. Empty when there are none.
pub fn format_diagnostics(loaded: &LoadedTable) -> String {
    let mut out = String::new();
    let path = loaded.path.display();
    section(&mut out, &format!("Feature lines without name in {path}:"), &loaded.nameless_rows);
    section(
        &mut out,
        &format!("Feature lines with too many attributes in {path}:"),
        &loaded.overwide_rows,
    );
    out
}

fn section(out: &mut String, title: &str, rows: &[RowDiagnostic]) {
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}");
    for row in rows {
        let _ = writeln!(out, "{}: {}", row.line, row.raw);
    }
}

pub fn print_diagnostics(loaded: &LoadedTable) {
    let text = format_diagnostics(loaded);
    if !text.is_empty() {
        eprint!("{text}");
    }
}
