#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use apihelp::reflect::{KeyValuePair, Queryable, UntypedMap};
use apihelp::sample::{ObjectGenerator, SampleConfig, SampleRegistry, SampleValue};
use apihelp::Describe;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Describe, Serialize)]
#[serde(rename_all = "PascalCase")]
struct Contact {
    phone: String,
    email: String,
    extra: ExtraData,
}

#[derive(Describe, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExtraData {
    data: String,
}

#[derive(Describe)]
struct Point {
    x: i32,
    y: i32,
}

#[derive(Describe)]
struct TreeNode {
    label: String,
    children: Vec<TreeNode>,
    parent: Option<Box<TreeNode>>,
}

#[derive(Describe)]
#[describe(no_default)]
struct Handle {
    raw: u64,
}

#[derive(Describe)]
#[describe(interface)]
struct Repository;

#[derive(Describe)]
struct Wrapper {
    repository: Repository,
    count: i32,
}

#[derive(Describe)]
enum Empty {}

#[derive(Describe)]
#[describe(data_contract)]
struct Order {
    #[describe(data_member = "order_id")]
    id: i64,
    note: String,
}

fn generator_with(registry: SampleRegistry) -> ObjectGenerator {
    ObjectGenerator::new(Arc::new(registry), SampleConfig::default())
}

#[test]
fn test_counter_continues_across_calls() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(samples.sample::<i32>(), Some(SampleValue::Int(1)));
    assert_eq!(samples.sample::<i32>(), Some(SampleValue::Int(2)));
    assert_eq!(
        samples.sample::<Vec<i32>>().map(|sample| sample.to_json()),
        Some(json!([3, 4]))
    );
}

#[test]
fn test_integer_fields_are_distinct() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(
        samples.sample::<Point>().map(|sample| sample.to_json()),
        Some(json!({"x": 1, "y": 2}))
    );
    assert_eq!(
        samples.sample::<Point>().map(|sample| sample.to_json()),
        Some(json!({"x": 3, "y": 4}))
    );
}

#[test]
fn test_queryable_materializes_as_list() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(
        samples.sample::<Queryable<String>>().map(|sample| sample.to_json()),
        Some(json!(["sample string 1", "sample string 2"]))
    );
}

#[test]
fn test_overrides_win_at_any_depth() {
    let mut registry = SampleRegistry::new();
    registry
        .insert::<ExtraData, _>(&json!({"Data": "Some additional data"}))
        .unwrap();
    let mut samples = generator_with(registry);

    let sample = samples.sample::<Contact>().unwrap();
    assert_eq!(
        sample.to_json(),
        json!({
            "Phone": "sample string 1",
            "Email": "sample string 2",
            "Extra": {"Data": "Some additional data"},
        })
    );
}

#[test]
fn test_override_of_primitive() {
    let mut registry = SampleRegistry::new();
    registry.insert::<String, _>("fixed").unwrap();
    let mut samples = generator_with(registry);
    assert_eq!(
        samples.sample::<Vec<String>>().map(|sample| sample.to_json()),
        Some(json!(["fixed", "fixed"]))
    );
}

#[test]
fn test_factory_runs_per_lookup() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&calls);
    let mut registry = SampleRegistry::new();
    registry.insert_factory::<u32, _>(move || {
        SampleValue::UInt(u64::from(counter.fetch_add(1, Ordering::SeqCst)) * 10)
    });
    let mut samples = generator_with(registry);
    assert_eq!(
        samples.sample::<[u32; 2]>().map(|sample| sample.to_json()),
        Some(json!([0, 10]))
    );
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_non_constructible_types_have_no_sample() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(samples.sample::<Handle>(), None);
    assert_eq!(samples.sample::<Repository>(), None);
    assert_eq!(samples.sample::<Empty>(), None);
    assert_eq!(samples.sample::<Vec<Handle>>(), None);
}

#[test]
fn test_unavailable_member_becomes_null() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(
        samples.sample::<Wrapper>().map(|sample| sample.to_json()),
        Some(json!({"repository": null, "count": 1}))
    );
}

#[test]
fn test_dictionary_keys_are_distinct() {
    let mut samples = ObjectGenerator::default();
    let sample = samples.sample::<HashMap<String, i32>>().unwrap();
    let SampleValue::Map(entries) = &sample else {
        panic!("expected a map, got {sample:?}");
    };
    assert_eq!(entries.len(), 2);
    assert_ne!(entries[0].0, entries[1].0);
    assert_eq!(sample.to_json(), json!({"sample string 1": 2, "sample string 3": 4}));
}

#[test]
fn test_integer_keys_are_distinct() {
    let mut samples = ObjectGenerator::default();
    let sample = samples.sample::<HashMap<i32, String>>().unwrap();
    assert_eq!(
        sample,
        SampleValue::Map(vec![
            (SampleValue::Int(1), SampleValue::String("sample string 2".into())),
            (SampleValue::Int(3), SampleValue::String("sample string 4".into())),
        ])
    );
}

#[test]
fn test_duplicate_keys_are_skipped() {
    let mut samples = ObjectGenerator::default();
    // Every bool sample is `true`, so only the first entry survives.
    let sample = samples.sample::<BTreeMap<bool, String>>().unwrap();
    assert_eq!(sample.to_json(), json!({"true": "sample string 2"}));
}

#[test]
fn test_untyped_map_has_object_values() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(
        samples.sample::<UntypedMap>().map(|sample| sample.to_json()),
        Some(json!({"{}": {}}))
    );
}

#[test]
fn test_cycles_become_references() {
    let mut samples = ObjectGenerator::default();
    let sample = samples.sample::<TreeNode>().unwrap();
    assert_eq!(
        sample.to_json(),
        json!({
            "$id": "1",
            "label": "sample string 1",
            "children": [{"$ref": "1"}, {"$ref": "1"}],
            "parent": {"$ref": "1"},
        })
    );
}

#[test]
fn test_siblings_are_not_references() {
    let mut samples = ObjectGenerator::default();
    let sample = samples.sample::<Vec<ExtraData>>().unwrap();
    assert_eq!(
        sample.to_json(),
        json!([{"Data": "sample string 1"}, {"Data": "sample string 2"}])
    );
}

#[test]
fn test_all_null_slots_drop_the_container() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(samples.sample::<KeyValuePair<Handle, Repository>>(), None);
    assert_eq!(samples.sample::<(Handle, Repository)>(), None);
    assert_eq!(
        samples
            .sample::<(Handle, bool)>()
            .map(|sample| sample.to_json()),
        Some(json!([null, true]))
    );
}

#[test]
fn test_data_contract_members_only() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(
        samples.sample::<Order>().map(|sample| sample.to_json()),
        Some(json!({"order_id": 1}))
    );
}

#[test]
fn test_collection_size_zero() {
    let mut samples = ObjectGenerator::new(
        Arc::new(SampleRegistry::default()),
        SampleConfig { collection_size: 0 },
    );
    assert_eq!(samples.sample::<Vec<i32>>(), None);
    assert_eq!(
        samples.sample::<HashMap<i32, i32>>().map(|sample| sample.to_json()),
        Some(json!({}))
    );
}

#[test]
fn test_eight_slot_tuple_renders_as_array() {
    let mut samples = ObjectGenerator::default();
    let sample = samples.sample::<(i32, String, bool, u8, i64, f64, u32, u64)>();
    assert_eq!(
        sample.map(|sample| sample.to_json()),
        Some(json!([1, "sample string 2", true, 64, 5, 6.1, 7, 8]))
    );
}

#[test]
fn test_tuple_slot_without_sample_is_null() {
    let mut samples = ObjectGenerator::default();
    assert_eq!(
        samples.sample::<(i32, Repository)>().map(|sample| sample.to_json()),
        Some(json!([1, null]))
    );
    assert_eq!(
        samples.sample::<(Handle, String)>().map(|sample| sample.to_json()),
        Some(json!([null, "sample string 2"]))
    );
}
