// run / check / counts commands

use std::path::{Path, PathBuf};

use feataudit_io::{load_table, LoadError, LoadedTable};
use feataudit_recon::summary::compute_counts;
use feataudit_recon::{run_audit, AuditConfig, AuditContext, AuditError, OutputTable, Pass};
use tracing::{debug, info};

use crate::exit_codes::{
    EXIT_AUDIT_DIAGNOSTICS, EXIT_AUDIT_FINDINGS, EXIT_ERROR, EXIT_INPUT_CONFIG, EXIT_INPUT_FORMAT,
    EXIT_INPUT_MISSING,
};
use crate::report;
use crate::CliError;

/// Global options shared by every command.
pub struct LoadOptions {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

/// Size and diagnostic count of one loaded table.
struct TableStats {
    label: String,
    path: PathBuf,
    features: usize,
    attributes: usize,
    diagnostics: usize,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

fn load_config(opts: &LoadOptions) -> Result<AuditConfig, CliError> {
    let mut config = match &opts.config {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::new(
                    EXIT_INPUT_MISSING,
                    format!("config not found: {}", path.display()),
                ));
            }
            let text = std::fs::read_to_string(path).map_err(|e| {
                CliError::new(EXIT_INPUT_MISSING, format!("cannot read config: {e}"))
            })?;
            let mut config = AuditConfig::from_toml(&text)
                .map_err(|e| CliError::new(EXIT_INPUT_CONFIG, e.to_string()))?;

            // Relative dirs resolve against the config file's directory
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            config.rebase(base_dir);
            debug!(path = %path.display(), "loaded config");
            config
        }
        None => AuditConfig::default(),
    };

    if let Some(dir) = &opts.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn load_err(err: LoadError) -> CliError {
    let code = match err {
        LoadError::NotFound { .. } | LoadError::Read { .. } => EXIT_INPUT_MISSING,
        LoadError::Empty { .. } | LoadError::InvalidHeader { .. } | LoadError::Parse { .. } => {
            EXIT_INPUT_FORMAT
        }
    };
    let hint = match err {
        LoadError::NotFound { .. } => "check data_dir in the config or pass --data-dir",
        LoadError::Read { .. } => "check file permissions",
        _ => "the first line must hold the key column and attribute names, separated by '|'",
    };
    CliError::new(code, err.to_string()).with_hint(hint)
}

fn context_err(err: AuditError) -> CliError {
    match err {
        AuditError::MissingColumn { .. } => CliError::new(EXIT_INPUT_FORMAT, err.to_string())
            .with_hint("set the [fields] section of the config to the table's column names"),
        AuditError::ConfigParse(_) | AuditError::ConfigValidation(_) => {
            CliError::new(EXIT_INPUT_CONFIG, err.to_string())
        }
        AuditError::UnknownOutput(_) => CliError::new(EXIT_ERROR, err.to_string()),
    }
}

/// Load one table and record its stats. Diagnostics are printed and counted
/// for validated tables only.
fn load_one(
    config: &AuditConfig,
    label: &str,
    file: &Path,
    validate: bool,
    stats: &mut Vec<TableStats>,
) -> Result<LoadedTable, CliError> {
    let path = config.table_path(file);
    let loaded = load_table(&path, validate).map_err(load_err)?;

    let diagnostics = if validate {
        report::print_diagnostics(&loaded);
        loaded.nameless_rows.len() + loaded.overwide_rows.len()
    } else {
        if !loaded.nameless_rows.is_empty() {
            debug!(
                path = %loaded.path.display(),
                nameless = loaded.nameless_rows.len(),
                "skipped name-less rows"
            );
        }
        0
    };

    stats.push(TableStats {
        label: label.to_string(),
        path: loaded.path.clone(),
        features: loaded.table.len(),
        attributes: loaded.table.attribute_names().len(),
        diagnostics,
    });
    Ok(loaded)
}

/// Load every table the config names. `force_validate` turns on row
/// validation for all of them.
fn load_context(
    config: &AuditConfig,
    force_validate: bool,
) -> Result<(AuditContext, Vec<TableStats>), CliError> {
    let mut stats = Vec::new();

    let mut outputs = Vec::with_capacity(config.outputs.len());
    for source in &config.outputs {
        let validate = force_validate || source.validate_rows;
        let loaded = load_one(config, &source.name, &source.file, validate, &mut stats)?;
        outputs.push(OutputTable::new(source.name.clone(), loaded.table));
    }

    let renamed = load_one(
        config,
        "renamed",
        &config.renamed.file,
        force_validate || config.renamed.validate_rows,
        &mut stats,
    )?;
    let edited = load_one(
        config,
        "edited",
        &config.edited.file,
        force_validate || config.edited.validate_rows,
        &mut stats,
    )?;
    let reference = load_one(
        config,
        "reference",
        &config.reference.file,
        force_validate || config.reference.validate_rows,
        &mut stats,
    )?;

    let mut ctx = AuditContext::new(
        reference.table,
        outputs,
        renamed.table,
        edited.table,
        config.fields.clone(),
    )
    .map_err(context_err)?;
    if let Some(order) = &config.backward_order {
        ctx = ctx.with_backward_order(order.as_slice()).map_err(context_err)?;
    }

    Ok((ctx, stats))
}

/// Passes in first-mention order, or the default order when none are given.
fn select_passes(requested: &[Pass]) -> Vec<Pass> {
    if requested.is_empty() {
        return Pass::ALL.to_vec();
    }
    let mut passes = Vec::with_capacity(requested.len());
    for &pass in requested {
        if !passes.contains(&pass) {
            passes.push(pass);
        }
    }
    passes
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub fn cmd_run(
    opts: &LoadOptions,
    passes: &[Pass],
    results: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    strict: bool,
) -> Result<(), CliError> {
    let config = load_config(opts)?;
    let (ctx, _) = load_context(&config, false)?;

    let passes = select_passes(passes);
    let result = run_audit(&ctx, &passes, &config.name);

    let results_dir = results.unwrap_or_else(|| config.results_dir.clone());
    let write_err = |e: std::io::Error| {
        CliError::new(
            EXIT_ERROR,
            format!("cannot write results to {}: {e}", results_dir.display()),
        )
    };
    std::fs::create_dir_all(&results_dir).map_err(write_err)?;

    for pass_report in &result.passes {
        match report::write_pass_log(&results_dir, pass_report).map_err(write_err)? {
            Some(path) => eprintln!(
                "{} check: Issues that have been found were output to {}!",
                pass_report.pass,
                path.display()
            ),
            None => eprintln!("{} check: No issues were found!", pass_report.pass),
        }
    }
    let counts_path = report::write_counts(&results_dir, &result.counts).map_err(write_err)?;
    info!(path = %counts_path.display(), "wrote feature counts");

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let c = &result.counts;
    let total = result.total_findings();
    eprintln!(
        "{}: {} finding(s) in {} pass(es), {} reference, {} output, {} deleted, difference {}",
        result.meta.config_name,
        total,
        result.passes.len(),
        c.reference,
        c.output,
        c.deletions,
        c.difference,
    );

    if strict && total > 0 {
        return Err(CliError::new(EXIT_AUDIT_FINDINGS, format!("{total} finding(s)")));
    }
    Ok(())
}

pub fn cmd_check(opts: &LoadOptions, strict: bool) -> Result<(), CliError> {
    let config = load_config(opts)?;
    let (_, stats) = load_context(&config, true)?;

    for s in &stats {
        eprintln!(
            "  {:<12} {} feature(s), {} attribute(s), {} diagnostic(s)  {}",
            s.label,
            s.features,
            s.attributes,
            s.diagnostics,
            s.path.display(),
        );
    }

    let diagnostics: usize = stats.iter().map(|s| s.diagnostics).sum();
    eprintln!("checked {} table(s): {} diagnostic row(s)", stats.len(), diagnostics);

    if strict && diagnostics > 0 {
        return Err(CliError::new(
            EXIT_AUDIT_DIAGNOSTICS,
            format!("{diagnostics} malformed row(s)"),
        ));
    }
    Ok(())
}

pub fn cmd_counts(opts: &LoadOptions, json_output: bool) -> Result<(), CliError> {
    let config = load_config(opts)?;
    let (ctx, _) = load_context(&config, false)?;
    let counts = compute_counts(&ctx);

    if json_output {
        let json_str = serde_json::to_string_pretty(&counts)
            .map_err(|e| CliError::new(EXIT_ERROR, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        print!("{}", report::counts_text(&counts));
    }
    Ok(())
}
