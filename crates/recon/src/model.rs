use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// One detected inconsistency. `Display` renders the issue-log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Feature found downstream, but reference attributes differ.
    AttributeMismatch {
        feature: String,
        attributes: Vec<String>,
    },
    /// Reference feature absent from every output without documented deletion.
    MissingFeature { feature: String },
    /// Output feature seen more than once across output tables.
    DuplicateFeature { feature: String },
    /// Output feature that cannot be traced back to the reference.
    UntracedFeature { feature: String },
    /// Feature documented as deleted but still present downstream.
    UndeletedFeature { feature: String },
}

impl Finding {
    pub fn feature(&self) -> &str {
        match self {
            Self::AttributeMismatch { feature, .. }
            | Self::MissingFeature { feature }
            | Self::DuplicateFeature { feature }
            | Self::UntracedFeature { feature }
            | Self::UndeletedFeature { feature } => feature,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeMismatch { feature, attributes } => write!(
                f,
                "Mismatch of following attributes of feature '{feature}': {}",
                attributes.join(", ")
            ),
            Self::MissingFeature { feature } => write!(f, "Missing feature: {feature}"),
            Self::DuplicateFeature { feature } => {
                write!(f, "Feature that exists multiple times: {feature}")
            }
            Self::UntracedFeature { feature } => {
                write!(f, "Feature that's not in original Alignment.csv: {feature}")
            }
            Self::UndeletedFeature { feature } => {
                write!(f, "Feature existing despite claimed deletion: {feature}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Forward,
    Backward,
    Deletion,
}

impl Pass {
    /// Default run order.
    pub const ALL: [Pass; 3] = [Pass::Forward, Pass::Deletion, Pass::Backward];

    /// File name of the issue log this pass writes into the results directory.
    pub fn log_file_name(&self) -> &'static str {
        match self {
            Self::Forward => "forward_existance_issues_log.csv",
            Self::Backward => "backward_existance_issues_log.csv",
            Self::Deletion => "deletion_issues_log.csv",
        }
    }
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
            Self::Deletion => write!(f, "deletion"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Feature counts across the dataset. A zero `difference` indicates the
/// reference, deletions and outputs add up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureCounts {
    pub reference: usize,
    pub output: usize,
    pub deletions: usize,
    pub difference: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub pass: Pass,
    pub findings: Vec<Finding>,
}

impl PassReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub meta: AuditMeta,
    pub counts: FeatureCounts,
    pub passes: Vec<PassReport>,
}

impl AuditReport {
    pub fn total_findings(&self) -> usize {
        self.passes.iter().map(|p| p.findings.len()).sum()
    }

    pub fn pass(&self, pass: Pass) -> Option<&PassReport> {
        self.passes.iter().find(|p| p.pass == pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_lines() {
        let mismatch = Finding::AttributeMismatch {
            feature: "clinic".into(),
            attributes: vec!["OSM tags".into(), "level".into()],
        };
        assert_eq!(
            mismatch.to_string(),
            "Mismatch of following attributes of feature 'clinic': OSM tags, level"
        );
        assert_eq!(
            Finding::MissingFeature { feature: "X".into() }.to_string(),
            "Missing feature: X"
        );
        assert_eq!(
            Finding::DuplicateFeature { feature: "Y".into() }.to_string(),
            "Feature that exists multiple times: Y"
        );
        assert_eq!(
            Finding::UntracedFeature { feature: "Y".into() }.to_string(),
            "Feature that's not in original Alignment.csv: Y"
        );
        assert_eq!(
            Finding::UndeletedFeature { feature: "Z".into() }.to_string(),
            "Feature existing despite claimed deletion: Z"
        );
    }

    #[test]
    fn finding_json_is_tagged() {
        let json = serde_json::to_value(Finding::MissingFeature { feature: "X".into() }).unwrap();
        assert_eq!(json["kind"], "missing_feature");
        assert_eq!(json["feature"], "X");
    }

    #[test]
    fn default_pass_order() {
        assert_eq!(Pass::ALL, [Pass::Forward, Pass::Deletion, Pass::Backward]);
        assert_eq!(Pass::Deletion.log_file_name(), "deletion_issues_log.csv");
    }
}
