use feataudit_recon::{
    run_audit, AttributeSet, AuditContext, FieldNames, Finding, OutputTable, Pass, Table,
};

const HEADER: [&str; 3] = ["Beschreibung", "OSM tags", "Ebene"];

fn row(description: &str, tags: &str, level: &str) -> AttributeSet {
    HEADER.iter().copied().zip([description, tags, level]).collect()
}

fn alignment() -> Table {
    let mut t = Table::new(HEADER);
    t.insert("(health) clinic", row("medical practice", "amenity=clinic", "0"));
    t.insert("a bioreactor", row("lab equipment", "man_made=bioreactor", "1"));
    t.insert("a passage on foot", row("walkway", "highway=footway", "0"));
    t.insert("lecture hall", row("room", "room=lecture", "1"));
    t.insert("bike shed", row("shelter", "amenity=bicycle_parking", "0"));
    t.insert("main building", row("building", "building=university", ""));
    t
}

fn renamed() -> Table {
    let mut t = Table::new(["neuer Name"]);
    t.insert("lecture hall", [("neuer Name", "auditorium")].into_iter().collect::<AttributeSet>());
    t
}

fn edited() -> Table {
    let mut t = Table::new(["Korrektur", "Kommentar"]);
    t.insert(
        "bike shed",
        [("Korrektur", "Loeschung"), ("Kommentar", "duplicate of parking")]
            .into_iter()
            .collect::<AttributeSet>(),
    );
    t.insert(
        "(health) clinic",
        [("Korrektur", "Tags angepasst"), ("Kommentar", "")].into_iter().collect::<AttributeSet>(),
    );
    t
}

fn indoor_correct() -> Table {
    let mut t = Table::new(HEADER);
    t.insert("(health) clinic", row("medical practice", "amenity=clinic", "0"));
    t.insert("a bioreactor", row("lab equipment", "man_made=bioreactor", "1"));
    t.insert("auditorium", row("room", "room=lecture", "1"));
    t
}

fn outdoor() -> Table {
    let mut t = Table::new(HEADER);
    t.insert("a passage on foot", row("walkway", "highway=footway", "0"));
    t
}

fn buildings() -> Table {
    let mut t = Table::new(HEADER);
    t.insert("main building", row("building", "building=university", ""));
    t
}

fn context(indoor: Table) -> AuditContext {
    AuditContext::new(
        alignment(),
        vec![
            OutputTable::new("indoor", indoor),
            OutputTable::new("outdoor", outdoor()),
            OutputTable::new("buildings", buildings()),
        ],
        renamed(),
        edited(),
        FieldNames::default(),
    )
    .unwrap()
}

fn findings(ctx: &AuditContext, pass: Pass) -> Vec<String> {
    run_audit(ctx, &[pass], "integration")
        .passes
        .into_iter()
        .flat_map(|p| p.findings)
        .map(|f| f.to_string())
        .collect()
}

// -------------------------------------------------------------------------
// Consistent dataset
// -------------------------------------------------------------------------

#[test]
fn consistent_dataset_has_no_findings() {
    let ctx = context(indoor_correct());
    let report = run_audit(&ctx, &Pass::ALL, "integration");
    assert_eq!(report.total_findings(), 0, "{:#?}", report.passes);
    assert_eq!(report.counts.reference, 6);
    assert_eq!(report.counts.output, 5);
    assert_eq!(report.counts.deletions, 1);
    assert_eq!(report.counts.difference, 0);
}

// -------------------------------------------------------------------------
// Forward
// -------------------------------------------------------------------------

#[test]
fn forward_reports_missing_features() {
    let mut indoor = Table::new(HEADER);
    indoor.insert("(health) clinic", row("medical practice", "amenity=clinic", "0"));
    indoor.insert("auditorium", row("room", "room=lecture", "1"));

    let mut ctx = context(indoor_correct());
    ctx.replace_output("indoor", indoor).unwrap();
    ctx.replace_output("outdoor", Table::new(HEADER)).unwrap();

    assert_eq!(
        findings(&ctx, Pass::Forward),
        vec!["Missing feature: a bioreactor", "Missing feature: a passage on foot"]
    );
}

#[test]
fn forward_reports_wrong_attributes() {
    let mut indoor = indoor_correct();
    indoor.insert("(health) clinic", row("medical practice", "healthcare=clinic", "0"));

    let ctx = context(indoor);
    assert_eq!(
        findings(&ctx, Pass::Forward),
        vec!["Mismatch of following attributes of feature '(health) clinic': OSM tags"]
    );
}

#[test]
fn forward_candidate_with_narrower_header_mismatches() {
    let mut indoor = Table::new(["Beschreibung", "OSM tags"]);
    for (key, attrs) in indoor_correct().iter() {
        let narrowed: AttributeSet = attrs.iter().filter(|(n, _)| *n != "Ebene").collect();
        indoor.insert(key, narrowed);
    }

    let ctx = context(indoor);
    let lines = findings(&ctx, Pass::Forward);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.ends_with(": Ebene")));
}

// -------------------------------------------------------------------------
// Backward
// -------------------------------------------------------------------------

#[test]
fn backward_reports_new_feature() {
    let mut indoor = indoor_correct();
    indoor.insert("abbreviation (lab)", row("lab", "room=lab", "1"));

    let ctx = context(indoor);
    assert_eq!(
        findings(&ctx, Pass::Backward),
        vec!["Feature that's not in original Alignment.csv: abbreviation (lab)"]
    );
}

#[test]
fn backward_reports_feature_in_two_outputs() {
    let mut ctx = context(indoor_correct());
    let mut buildings = buildings();
    buildings.insert("a passage on foot", row("walkway", "highway=footway", "0"));
    ctx.replace_output("buildings", buildings).unwrap();

    let report = run_audit(&ctx, &[Pass::Backward], "integration");
    let pass = report.pass(Pass::Backward).unwrap();
    assert_eq!(
        pass.findings,
        vec![Finding::DuplicateFeature { feature: "a passage on foot".into() }]
    );
}

// -------------------------------------------------------------------------
// Deletion
// -------------------------------------------------------------------------

#[test]
fn deletion_not_done() {
    let mut ctx = context(indoor_correct());
    let mut outdoor = outdoor();
    outdoor.insert("bike shed", row("shelter", "amenity=bicycle_parking", "0"));
    ctx.replace_output("outdoor", outdoor).unwrap();

    assert_eq!(
        findings(&ctx, Pass::Deletion),
        vec!["Feature existing despite claimed deletion: bike shed"]
    );
    // The leftover feature also traces back, so backward stays clean.
    assert!(findings(&ctx, Pass::Backward).is_empty());
}

#[test]
fn custom_marker_and_fields() {
    let mut renamed = Table::new(["new_name"]);
    renamed.insert("lecture hall", [("new_name", "auditorium")].into_iter().collect::<AttributeSet>());
    let mut edited = Table::new(["code"]);
    edited.insert("bike shed", [("code", "DELETE")].into_iter().collect::<AttributeSet>());

    let fields = FieldNames {
        new_name: "new_name".into(),
        correction: "code".into(),
        deletion_marker: "DELETE".into(),
    };
    let ctx = AuditContext::new(
        alignment(),
        vec![
            OutputTable::new("indoor", indoor_correct()),
            OutputTable::new("outdoor", outdoor()),
            OutputTable::new("buildings", buildings()),
        ],
        renamed,
        edited,
        fields,
    )
    .unwrap();

    assert_eq!(run_audit(&ctx, &Pass::ALL, "custom").total_findings(), 0);
}
