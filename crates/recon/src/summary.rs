use crate::engine::AuditContext;
use crate::model::FeatureCounts;

/// Count reference, output and documented-deletion features.
///
/// `difference = reference - deletions - output`; zero means every reference
/// feature is either deleted or lives in exactly one output.
pub fn compute_counts(ctx: &AuditContext) -> FeatureCounts {
    let reference = ctx.reference().len();
    let output: usize = ctx.outputs().iter().map(|o| o.table.len()).sum();
    let deletions = ctx
        .edited()
        .iter()
        .filter(|(_, edit)| ctx.marks_deletion(edit))
        .count();

    FeatureCounts {
        reference,
        output,
        deletions,
        difference: reference as i64 - deletions as i64 - output as i64,
    }
}
