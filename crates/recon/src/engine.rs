use std::collections::HashSet;

use tracing::{debug, info};

use crate::compare::compare_attributes;
use crate::config::FieldNames;
use crate::error::AuditError;
use crate::model::{AuditMeta, AuditReport, Finding, Pass, PassReport};
use crate::rename::RenameIndex;
use crate::summary::compute_counts;
use crate::table::{AttributeSet, Table};

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// A curated output table together with its slot name.
#[derive(Debug, Clone)]
pub struct OutputTable {
    pub name: String,
    pub table: Table,
}

impl OutputTable {
    pub fn new(name: impl Into<String>, table: Table) -> Self {
        Self { name: name.into(), table }
    }
}

/// Output slots the backward pass walks first, in this order. Slots with
/// other names follow in priority order.
pub const DEFAULT_BACKWARD_ORDER: [&str; 3] = ["indoor", "buildings", "outdoor"];

/// The six loaded tables plus the field rules every pass reads.
///
/// Passes borrow the context immutably; swapping an output slot needs
/// `&mut self`, so it can only happen between passes.
#[derive(Debug, Clone)]
pub struct AuditContext {
    reference: Table,
    outputs: Vec<OutputTable>,
    /// Indices into `outputs` in backward-pass order.
    backward_order: Vec<usize>,
    renamed: Table,
    edited: Table,
    fields: FieldNames,
}

impl AuditContext {
    /// Build a context, checking that the rename and edit tables declare the
    /// columns named in `fields`.
    pub fn new(
        reference: Table,
        outputs: Vec<OutputTable>,
        renamed: Table,
        edited: Table,
        fields: FieldNames,
    ) -> Result<Self, AuditError> {
        if !renamed.has_attribute(&fields.new_name) {
            return Err(AuditError::MissingColumn {
                table: "renamed".into(),
                column: fields.new_name.clone(),
            });
        }
        if !edited.has_attribute(&fields.correction) {
            return Err(AuditError::MissingColumn {
                table: "edited".into(),
                column: fields.correction.clone(),
            });
        }

        let backward_order = slot_order(&outputs, &DEFAULT_BACKWARD_ORDER);
        Ok(Self { reference, outputs, backward_order, renamed, edited, fields })
    }

    /// Walk output slots in `names` order during the backward pass. Unlisted
    /// slots follow in priority order.
    pub fn with_backward_order<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self, AuditError> {
        if let Some(unknown) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|name| !self.outputs.iter().any(|o| o.name == *name))
        {
            return Err(AuditError::UnknownOutput(unknown.to_string()));
        }
        self.backward_order = slot_order(&self.outputs, names);
        Ok(self)
    }

    /// Output slot names in backward-pass order.
    pub fn backward_order(&self) -> impl Iterator<Item = &str> {
        self.backward_order.iter().map(|&i| self.outputs[i].name.as_str())
    }

    pub fn reference(&self) -> &Table {
        &self.reference
    }

    pub fn outputs(&self) -> &[OutputTable] {
        &self.outputs
    }

    pub fn edited(&self) -> &Table {
        &self.edited
    }

    /// Point output slot `name` at `table`, returning the table it held.
    pub fn replace_output(&mut self, name: &str, table: Table) -> Result<Table, AuditError> {
        let slot = self
            .outputs
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| AuditError::UnknownOutput(name.to_string()))?;
        Ok(std::mem::replace(&mut slot.table, table))
    }

    /// Replace the edit table. Its header must still carry the correction column.
    pub fn replace_edited(&mut self, table: Table) -> Result<Table, AuditError> {
        if !table.has_attribute(&self.fields.correction) {
            return Err(AuditError::MissingColumn {
                table: "edited".into(),
                column: self.fields.correction.clone(),
            });
        }
        Ok(std::mem::replace(&mut self.edited, table))
    }

    /// First output (in priority order) holding `name`.
    fn find_output(&self, name: &str) -> Option<(&str, &AttributeSet)> {
        self.outputs
            .iter()
            .find_map(|o| o.table.get(name).map(|attrs| (o.name.as_str(), attrs)))
    }

    fn in_any_output(&self, name: &str) -> bool {
        self.outputs.iter().any(|o| o.table.contains(name))
    }

    /// Whether an edit record's correction code documents a deletion.
    pub fn marks_deletion(&self, edit: &AttributeSet) -> bool {
        edit.get(&self.fields.correction)
            .is_some_and(|code| code.contains(self.fields.deletion_marker.as_str()))
    }

    fn rename_index(&self) -> RenameIndex<'_> {
        RenameIndex::build(&self.renamed, &self.fields.new_name)
    }
}

/// Indices of `outputs`: those named in `preferred` first, then the rest in
/// their original order.
fn slot_order<S: AsRef<str>>(outputs: &[OutputTable], preferred: &[S]) -> Vec<usize> {
    let mut order: Vec<usize> = Vec::with_capacity(outputs.len());
    for name in preferred {
        if let Some(i) = outputs.iter().position(|o| o.name == name.as_ref()) {
            if !order.contains(&i) {
                order.push(i);
            }
        }
    }
    for i in 0..outputs.len() {
        if !order.contains(&i) {
            order.push(i);
        }
    }
    order
}

// ---------------------------------------------------------------------------
// Forward existence
// ---------------------------------------------------------------------------

/// Every reference feature must reach an output table, under its own name or
/// through one rename, unless its deletion is documented.
pub fn forward_existence(ctx: &AuditContext) -> Vec<Finding> {
    let renames = ctx.rename_index();
    let mut findings = Vec::new();

    for (name, reference_attrs) in ctx.reference.iter() {
        debug!(feature = name, "forward check");

        if let Some((slot, attrs)) = ctx.find_output(name) {
            debug!(feature = name, output = slot, "found under original name");
            findings.extend(compare_attributes(reference_attrs, attrs, name));
        } else if let Some(new_name) = renames.new_name(name) {
            // A renamed feature is never treated as deleted.
            match ctx.find_output(new_name) {
                Some((slot, attrs)) => {
                    debug!(feature = name, renamed_to = new_name, output = slot, "found under new name");
                    findings.extend(compare_attributes(reference_attrs, attrs, name));
                }
                None => findings.push(Finding::MissingFeature { feature: name.to_string() }),
            }
        } else if let Some(edit) = ctx.edited.get(name) {
            if !ctx.marks_deletion(edit) {
                findings.push(Finding::MissingFeature { feature: name.to_string() });
            }
        } else {
            findings.push(Finding::MissingFeature { feature: name.to_string() });
        }
    }

    findings
}

// ---------------------------------------------------------------------------
// Backward existence
// ---------------------------------------------------------------------------

/// Every output feature must trace back to the reference (directly or via
/// its old name) and appear only once across all output tables. Tables are
/// walked in backward order, so the later copy of a duplicate is flagged.
pub fn backward_existence(ctx: &AuditContext) -> Vec<Finding> {
    let renames = ctx.rename_index();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut findings = Vec::new();
    debug!(order = ?ctx.backward_order().collect::<Vec<_>>(), "backward slot order");

    let names = ctx
        .backward_order
        .iter()
        .flat_map(|&i| ctx.outputs[i].table.keys());
    for name in names {
        debug!(feature = name, "backward check");

        if seen.contains(name) {
            findings.push(Finding::DuplicateFeature { feature: name.to_string() });
        }

        let origin = renames.old_name(name).unwrap_or(name);
        if !ctx.reference.contains(origin) {
            findings.push(Finding::UntracedFeature { feature: name.to_string() });
        }

        seen.insert(name);
    }

    findings
}

// ---------------------------------------------------------------------------
// Deletion verification
// ---------------------------------------------------------------------------

/// Every feature whose edit record documents a deletion must be absent from
/// all outputs. Renamed features are checked under their new name only.
pub fn deletion_verification(ctx: &AuditContext) -> Vec<Finding> {
    let renames = ctx.rename_index();
    let mut findings = Vec::new();

    for (name, edit) in ctx.edited.iter() {
        if !ctx.marks_deletion(edit) {
            continue;
        }
        debug!(feature = name, "deletion check");

        let identity = renames.new_name(name).unwrap_or(name);
        if ctx.in_any_output(identity) {
            findings.push(Finding::UndeletedFeature { feature: name.to_string() });
        }
    }

    findings
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub fn run_pass(ctx: &AuditContext, pass: Pass) -> PassReport {
    let findings = match pass {
        Pass::Forward => forward_existence(ctx),
        Pass::Backward => backward_existence(ctx),
        Pass::Deletion => deletion_verification(ctx),
    };
    info!(%pass, findings = findings.len(), "pass complete");
    PassReport { pass, findings }
}

/// Run `passes` in the given order and attach the feature counts.
pub fn run_audit(ctx: &AuditContext, passes: &[Pass], config_name: &str) -> AuditReport {
    let passes = passes.iter().map(|&pass| run_pass(ctx, pass)).collect();

    AuditReport {
        meta: AuditMeta {
            config_name: config_name.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        counts: compute_counts(ctx),
        passes,
    }
}
