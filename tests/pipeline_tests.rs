//! End-to-end pipeline tests over fixture templates
//!
//! Fixtures live under `tests/fixtures/` and are loaded by path, so the
//! loader's file classification is exercised on every run.

use pretty_assertions::assert_eq;
use serde_yaml::Value;

use tosca_submitter::{set_template, ParsedParams, SubmitterError, TemplateSource};

const SINGLE_NODE: &str = "tests/fixtures/single_node.yaml";
const MISSING_INPUT: &str = "tests/fixtures/missing_input.yaml";
const TWO_TIER: &str = "tests/fixtures/two_tier.yaml";

fn overrides(pairs: &[(&str, Value)]) -> ParsedParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

#[test]
fn test_fixture_classifies_as_file() {
    let source = TemplateSource::classify(SINGLE_NODE).expect("Should classify");
    assert!(source.is_file());
}

#[test]
fn test_default_resolved_at_reference_site() {
    let template = set_template(SINGLE_NODE, None).expect("Should parse");
    let node = template.node_template("db_server").expect("Should exist");
    assert_eq!(node.property("size"), Some(&Value::from(10)));
}

#[test]
fn test_override_dominates_default() {
    let params = overrides(&[("disk_size", Value::from(50))]);
    let template = set_template(SINGLE_NODE, Some(params)).expect("Should parse");
    let node = template.node_template("db_server").expect("Should exist");
    assert_eq!(node.property("size"), Some(&Value::from(50)));

    let properties = serde_yaml::to_string(&node.properties).expect("Should serialize");
    insta::assert_snapshot!(properties, @"size: 50");
}

#[test]
fn test_undeclared_input_left_unresolved() {
    // Parse succeeds; the reference site survives as-is and nothing raises.
    let template = set_template(MISSING_INPUT, None).expect("Should parse");
    let node = template.node_template("db_server").expect("Should exist");

    let expected: Value = serde_yaml::from_str("{ get_input: missing_input }").unwrap();
    assert_eq!(node.property("size"), Some(&expected));
}

#[test]
fn test_source_not_found_carries_input() {
    let result = set_template("not a path://??", None);
    match result {
        Err(SubmitterError::Source(e)) => {
            assert_eq!(e.input(), "not a path://??");
            assert!(e.to_string().contains("not a path://??"));
        }
        other => panic!("Expected Source error, got {:?}", other),
    }
}

#[test]
fn test_pipeline_is_deterministic() {
    let params = overrides(&[("disk_size", Value::from(42))]);

    let first = set_template(TWO_TIER, Some(params.clone())).expect("Should parse");
    let second = set_template(TWO_TIER, Some(params)).expect("Should parse");

    assert_eq!(first.node_templates, second.node_templates);
    assert_eq!(first.raw(), second.raw());
}

#[test]
fn test_mutator_is_idempotent() {
    let mut template = set_template(TWO_TIER, None).expect("Should parse");
    let first = template.node_templates.clone();

    template.refresh_node_properties();
    assert_eq!(first, template.node_templates);
}

#[test]
fn test_two_tier_mixed_resolution() {
    // worker_image and disk_size have defaults; ssh_key has neither a
    // default nor an override and must stay unresolved.
    let template = set_template(TWO_TIER, None).expect("Should parse");

    let app = template.node_template("app").expect("Should exist");
    assert_eq!(app.property("image"), Some(&Value::from("ubuntu-22.04")));

    let unresolved: Value = serde_yaml::from_str("{ get_input: ssh_key }").unwrap();
    assert_eq!(app.property("key"), Some(&unresolved));

    let db = template.node_template("db_server").expect("Should exist");
    assert_eq!(db.property("size"), Some(&Value::from(10)));
}

#[test]
fn test_two_tier_override_for_defaultless_input() {
    let params = overrides(&[("ssh_key", Value::from("ssh-ed25519 AAAA"))]);
    let template = set_template(TWO_TIER, Some(params)).expect("Should parse");

    let app = template.node_template("app").expect("Should exist");
    assert_eq!(app.property("key"), Some(&Value::from("ssh-ed25519 AAAA")));
}

#[test]
fn test_requirements_and_outputs_survive_resolution() {
    let template = set_template(TWO_TIER, None).expect("Should parse");

    let app = template.node_template("app").expect("Should exist");
    assert_eq!(app.requirements.len(), 1);
    assert_eq!(app.requirements[0].name, "host");
    assert_eq!(app.requirements[0].target.as_deref(), Some("db_server"));

    assert!(template.outputs.contains_key("server_ip"));
}
