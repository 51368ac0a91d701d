//! Integration tests for assembling URLs from recorded update sequences.
//!
//! Fixtures describe an initial parameter set and the updates applied afterwards, together
//! with the URL expected after each step.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use solr_url::{BuilderConfig, ParamKind, QueryBuilder, QueryUpdate, TokenStyle};

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture from disk.
fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[derive(Deserialize)]
struct DocumentedUsage {
    root: String,
    initial: QueryUpdate,
    expected_url: String,
    refinement: QueryUpdate,
    expected_refined_url: String,
}

#[derive(Deserialize)]
struct UpdateSequence {
    root: String,
    steps: Vec<Step>,
}

#[derive(Deserialize)]
struct Step {
    #[serde(default)]
    toggle_merge: bool,
    update: QueryUpdate,
    expected_url: String,
}

fn documented_usage() -> DocumentedUsage {
    serde_json::from_str(&load_fixture("documented_usage.json"))
        .unwrap_or_else(|e| panic!("Failed to deserialize documented usage fixture: {}", e))
}

#[test]
fn test_documented_usage_initial_url() {
    let fixture = documented_usage();
    let builder = QueryBuilder::with_params(&fixture.root, fixture.initial);

    assert_eq!(builder.url(), fixture.expected_url);
    assert_eq!(builder.root(), fixture.root);
}

#[test]
fn test_documented_usage_refinement_merges_filters() {
    let fixture = documented_usage();
    let mut builder = QueryBuilder::with_params(&fixture.root, fixture.initial);

    let url = builder.apply(fixture.refinement).to_string();
    assert_eq!(url, fixture.expected_refined_url);

    // Earlier filter is kept ahead of the merged one
    let first = url.find("&fq=filter_field:filter_field_value").unwrap();
    let second = url.find("&fq=group_field:(1+2+3)").unwrap();
    assert!(first < second);
    assert_eq!(builder.url_len(), fixture.expected_refined_url.len());
}

#[test]
fn test_documented_usage_fragment_order() {
    let fixture = documented_usage();
    let builder = QueryBuilder::with_params(&fixture.root, fixture.initial);
    let url = builder.url();

    let markers = [
        "?q=*:*",
        "&wt=json",
        "&fl=field_value,field_date",
        "&fq=filter_field:filter_field_value",
        "&sort=group_field+asc",
        "&group=true&group.ngroups=true&group.field=group_field&group.limit=3&group.sort=field_date+desc",
        "&start=0",
        "&rows=10",
    ];

    let positions: Vec<usize> = markers
        .iter()
        .map(|marker| {
            url.find(marker)
                .unwrap_or_else(|| panic!("Missing `{}` in {}", marker, url))
        })
        .collect();

    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_documented_usage_encoded_tokens() {
    let fixture = documented_usage();
    let config = BuilderConfig::new().with_token_style(TokenStyle::Encoded);
    let mut builder = QueryBuilder::with_config(&fixture.root, config, fixture.initial);
    builder.apply(fixture.refinement);

    assert_eq!(
        builder.fragment(ParamKind::Filters),
        Some("&fq=filter_field%3Afilter_field_value&fq=group_field%3A(1+2+3)")
    );
    assert_eq!(
        builder.fragment(ParamKind::Fields),
        Some("&fl=field_value%2Cfield_date")
    );
}

#[test]
fn test_update_sequence() {
    let sequence: UpdateSequence = serde_json::from_str(&load_fixture("update_sequence.json"))
        .unwrap_or_else(|e| panic!("Failed to deserialize update sequence fixture: {}", e));

    let mut builder = QueryBuilder::new(&sequence.root);
    for (index, step) in sequence.steps.into_iter().enumerate() {
        if step.toggle_merge {
            builder.toggle_filter_merge_mode();
        }

        let url = builder.apply(step.update);
        assert_eq!(url, step.expected_url, "step {} produced an unexpected URL", index);
    }

    assert!(!builder.merge_filters());
}

#[test]
fn test_dump_state_after_documented_usage() {
    let fixture = documented_usage();
    let mut builder = QueryBuilder::with_params(&fixture.root, fixture.initial);
    builder.apply(fixture.refinement);

    let dump = builder.dump_state();
    assert_eq!(dump.url, fixture.expected_refined_url);
    assert_eq!(dump.entries.len(), ParamKind::all().len());

    let text = dump.to_string();
    assert!(text.contains(r#"filters: {"filter_field":"filter_field_value","group_field":["1","2","3"]}"#));
    assert!(text.contains("group_str: &group=true&group.ngroups=true&group.field=group_field"));
    assert!(text.ends_with(&format!("url: {}", fixture.expected_refined_url)));
}
