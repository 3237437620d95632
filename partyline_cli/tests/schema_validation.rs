use partyline_lib::{Db, Engine, EngineConfig, SortOrder, SummaryFilter};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

/// Small store: one House bill vote (one member with no classified ballot),
/// one nomination with an independent senator, one vote on an unsponsored bill.
fn engine() -> Engine {
    let db = Db::open_in_memory().expect("open db");
    db.init().expect("init db");
    db.conn()
        .execute_batch(
            "INSERT INTO legislators (id, bioguide_id, lis_id, name, term_type, state, district, party, caucus)
             VALUES
               ('king', 'K000383', 'S363', 'Angus King', 'sen', 'ME', '', 'I', 'D'),
               ('cruz', 'C001098', 'S355', 'Ted Cruz', 'sen', 'TX', '', 'R', 'R'),
               ('pelosi', 'P000197', NULL, 'Nancy Pelosi', 'rep', 'CA', '11', 'D', 'D'),
               ('roy', 'R000614', NULL, 'Chip Roy', 'rep', 'TX', '21', 'R', 'R');

             INSERT INTO bills (bill_id, bill_type, bill_number, title, sponsor_id, status, status_at, congress)
             VALUES
               ('hr22-119', 'hr', '22', 'SAVE Act', 'R000614', 'passed_house', '2025-04-10', '119'),
               ('hr9-119', 'hr', '9', 'Orphan Bill', NULL, 'introduced', '2025-03-01', '119');

             INSERT INTO vote_meta (vote_id, vote_number, bill_id, chamber, date, result, category, nomination_title)
             VALUES
               ('h102-2025', 102, 'hr22-119', 'rep', '2025-04-15 15:30:00', 'Passed', 'passage', NULL),
               ('h120-2025', 120, 'hr9-119', 'rep', '2025-04-25 10:00:00', 'Passed', 'passage', NULL),
               ('s30-2025', 30, NULL, 'sen', '2025-02-11 12:00:00', 'Confirmed', 'nomination', 'Jane Doe, of Texas, to be Judge');

             INSERT INTO votes (vote_id, legislator_id, position, original_position)
             VALUES
               ('h102-2025', 'pelosi', 'Not Voting', 'Not Voting'),
               ('h102-2025', 'roy', 'Yea', 'Aye'),
               ('h120-2025', 'roy', 'Nay', 'No'),
               ('s30-2025', 'S363', 'Nay', 'Nay'),
               ('s30-2025', 'S355', 'Yea', 'Yea');

             INSERT INTO site_meta (last_update) VALUES ('2025-05-01 06:00:00');",
        )
        .expect("seed store");
    Engine::open(&db, &EngineConfig::default()).expect("open engine")
}

fn summary_json() -> Value {
    let summaries = engine().per_legislator_summary(&SummaryFilter::default(), SortOrder::Descending);
    serde_json::to_value(summaries).expect("summaries serialize")
}

fn breakdown_json() -> Value {
    let breakdowns = engine()
        .per_vote_breakdown(&["h102-2025", "h120-2025", "s30-2025"])
        .expect("votes exist");
    serde_json::to_value(breakdowns).expect("breakdowns serialize")
}

// ---------------------------------------------------------------------------
// Positive validation: engine output conforms to the published schemas
// ---------------------------------------------------------------------------

#[test]
fn test_summary_output_conforms_to_schema() {
    let schema = load_schema("legislator_summary.schema.json");
    let data = summary_json();
    assert_eq!(data.as_array().map(Vec::len), Some(4));

    let validator = jsonschema::draft202012::new(&schema).expect("summary schema compiles");
    let result = validator.validate(&data);
    if let Err(e) = &result {
        panic!("summary output failed validation: {e}");
    }
}

#[test]
fn test_breakdown_output_conforms_to_schema() {
    let schema = load_schema("vote_breakdown.schema.json");
    let data = breakdown_json();

    let validator = jsonschema::draft202012::new(&schema).expect("breakdown schema compiles");
    let result = validator.validate(&data);
    if let Err(e) = &result {
        panic!("breakdown output failed validation: {e}");
    }
    // The unsponsored bill vote carries a null sponsor and an unclassifiable ballot.
    assert_eq!(data[1]["sponsorParty"], Value::Null);
    assert_eq!(data[1]["unclassifiableCount"], 1);
    assert_eq!(data[2]["otherPartyLine"], 0);
    assert_eq!(data[2]["demPartyLine"], 1);
}

#[test]
fn test_abstaining_member_has_null_percent() {
    let data = summary_json();
    let pelosi = data
        .as_array()
        .expect("array")
        .iter()
        .find(|s| s["legislatorId"] == "pelosi")
        .expect("pelosi present");
    assert_eq!(pelosi["totalCount"], 0);
    assert_eq!(pelosi["brokePercent"], Value::Null);
}

// ---------------------------------------------------------------------------
// Negative validation: schemas reject invalid data
// ---------------------------------------------------------------------------

#[test]
fn test_summary_schema_rejects_missing_required_field() {
    let schema = load_schema("legislator_summary.schema.json");
    let mut data = summary_json();

    data[0]
        .as_object_mut()
        .expect("summary is an object")
        .remove("brokeCount");

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&data).is_err(),
        "schema should reject summary missing brokeCount"
    );
}

#[test]
fn test_summary_schema_rejects_percent_out_of_range() {
    let schema = load_schema("legislator_summary.schema.json");
    let mut data = summary_json();

    data[0]
        .as_object_mut()
        .expect("summary is an object")
        .insert("brokePercent".to_string(), serde_json::json!(37.5));

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&data).is_err(),
        "schema should reject a percent expressed out of 100"
    );
}

#[test]
fn test_breakdown_schema_rejects_invalid_chamber() {
    let schema = load_schema("vote_breakdown.schema.json");
    let mut data = breakdown_json();

    data[0]
        .as_object_mut()
        .expect("breakdown is an object")
        .insert("chamber".to_string(), Value::String("joint".to_string()));

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&data).is_err(),
        "schema should reject invalid chamber"
    );
}

// ---------------------------------------------------------------------------
// Edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_breakdown_schema_rejects_additional_properties() {
    let schema = load_schema("vote_breakdown.schema.json");
    let mut data = breakdown_json();

    data[0]
        .as_object_mut()
        .expect("breakdown is an object")
        .insert("bogusField".to_string(), Value::Number(123.into()));

    let validator = jsonschema::draft202012::new(&schema).expect("schema compiles");
    assert!(
        validator.validate(&data).is_err(),
        "schema should reject additional properties"
    );
}

#[test]
fn test_empty_array_conforms_to_all_schemas() {
    let empty = serde_json::json!([]);

    for schema_name in ["legislator_summary.schema.json", "vote_breakdown.schema.json"] {
        let schema = load_schema(schema_name);
        let validator =
            jsonschema::draft202012::new(&schema).unwrap_or_else(|e| panic!("{schema_name}: {e}"));
        let result = validator.validate(&empty);
        if let Err(e) = &result {
            panic!("empty array should conform to {schema_name}: {e}");
        }
    }
}
