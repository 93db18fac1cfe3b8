use crate::model::Finding;
use crate::table::AttributeSet;

/// Compare `candidate` against `reference` over the reference's attribute
/// names only. A name missing from `candidate` counts as a mismatch.
///
/// Returns `None` when every reference attribute matches.
pub fn compare_attributes(
    reference: &AttributeSet,
    candidate: &AttributeSet,
    feature: &str,
) -> Option<Finding> {
    let attributes: Vec<String> = reference
        .iter()
        .filter(|(name, value)| candidate.get(name) != Some(*value))
        .map(|(name, _)| name.to_string())
        .collect();

    if attributes.is_empty() {
        None
    } else {
        Some(Finding::AttributeMismatch {
            feature: feature.to_string(),
            attributes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> AttributeSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn identical_sets_match() {
        let a = attrs(&[("a", "1"), ("b", "x")]);
        assert_eq!(compare_attributes(&a, &a.clone(), "F"), None);
    }

    #[test]
    fn single_difference_named() {
        let reference = attrs(&[("a", "1"), ("b", "x")]);
        let candidate = attrs(&[("a", "1"), ("b", "y")]);
        let finding = compare_attributes(&reference, &candidate, "F").unwrap();
        assert_eq!(
            finding,
            Finding::AttributeMismatch { feature: "F".into(), attributes: vec!["b".into()] }
        );
    }

    #[test]
    fn multiple_differences_in_reference_order() {
        let reference = attrs(&[("c", "3"), ("a", "1"), ("b", "2")]);
        let candidate = attrs(&[("a", "9"), ("b", "9"), ("c", "9")]);
        let finding = compare_attributes(&reference, &candidate, "F").unwrap();
        assert_eq!(
            finding.to_string(),
            "Mismatch of following attributes of feature 'F': c, a, b"
        );
    }

    #[test]
    fn candidate_extra_attributes_ignored() {
        let reference = attrs(&[("a", "1")]);
        let candidate = attrs(&[("a", "1"), ("note", "curated by hand")]);
        assert_eq!(compare_attributes(&reference, &candidate, "F"), None);
    }

    #[test]
    fn missing_candidate_attribute_is_mismatch() {
        let reference = attrs(&[("a", "1"), ("b", "")]);
        let candidate = attrs(&[("a", "1")]);
        let finding = compare_attributes(&reference, &candidate, "F").unwrap();
        assert_eq!(
            finding,
            Finding::AttributeMismatch { feature: "F".into(), attributes: vec!["b".into()] }
        );
    }

    #[test]
    fn values_compare_exactly() {
        let reference = attrs(&[("a", "Clinic")]);
        let candidate = attrs(&[("a", "clinic")]);
        assert!(compare_attributes(&reference, &candidate, "F").is_some());
    }
}
