use std::collections::HashMap;

use capwire::capability;
use capwire::primitives::{SignatureRecord, TypeDescriptor, descriptor_of};
use capwire::registry::CapabilityRegistry;
use serde::Deserialize;
use serde_json::{Value, json};

#[capability]
fn add(a: i64, b: i64) -> i64 {
    a + b
}

#[capability]
async fn greet(name: String, excited: Option<bool>) -> String {
    if excited.unwrap_or(false) {
        format!("Hello, {name}!")
    } else {
        format!("Hello, {name}")
    }
}

#[capability]
fn tally(scores: HashMap<String, i64>) -> i64 {
    scores.values().sum()
}

#[capability]
fn mean(samples: Vec<f64>) -> f64 {
    samples.iter().sum::<f64>() / samples.len() as f64
}

#[capability]
fn ping() {}

#[derive(Deserialize, capwire::Describe)]
struct Invoice {
    total: f64,
}

#[capability]
fn invoice_total(invoice: Invoice) -> f64 {
    invoice.total
}

#[test]
fn captured_signature_matches_the_wire_contract() {
    assert_eq!(
        serde_json::to_value(add_signature()).expect("serialize"),
        json!({
            "name": "add",
            "args": [
                ["a", { "type_name": "int" }],
                ["b", { "type_name": "int" }],
            ],
            "return_type": { "type_name": "int" },
        })
    );
}

#[test]
fn annotation_leaves_direct_calls_untouched() {
    assert_eq!(add(2, 3), 5);
}

#[tokio::test]
async fn registered_capability_invokes_like_the_function() {
    let registry = CapabilityRegistry::new();
    registry.register_binding(add_binding());

    let named = registry.invoke("add", json!({ "a": 2, "b": 3 })).await.unwrap();
    assert_eq!(named, json!(5));

    let positional = registry.invoke("add", json!([2, 3])).await.unwrap();
    assert_eq!(positional, json!(5));
}

#[tokio::test]
async fn later_registration_replaces_the_earlier_entry() {
    let registry = CapabilityRegistry::new();
    registry.register(
        SignatureRecord::builder("add").build(),
        |_: Value| async move { Ok(json!(0)) },
    );
    registry.register_binding(add_binding());

    let output = registry.invoke("add", json!({ "a": 2, "b": 3 })).await.unwrap();
    assert_eq!(output, json!(5));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn optional_parameters_are_unions_and_may_be_omitted() {
    let signature = greet_signature();
    assert_eq!(
        signature.args()[1].descriptor(),
        &TypeDescriptor::union([TypeDescriptor::named("bool"), TypeDescriptor::None])
    );

    let registry = CapabilityRegistry::new();
    registry.register_binding(greet_binding());

    let plain = registry
        .invoke("greet", json!({ "name": "Ada" }))
        .await
        .unwrap();
    assert_eq!(plain, json!("Hello, Ada"));

    let excited = registry
        .invoke("greet", json!({ "name": "Ada", "excited": true }))
        .await
        .unwrap();
    assert_eq!(excited, json!("Hello, Ada!"));
}

#[tokio::test]
async fn mapping_parameters_follow_the_dict_shape() {
    assert_eq!(
        serde_json::to_value(tally_signature()).expect("serialize")["args"],
        json!([
            ["scores", {
                "type_name": "Dict",
                "args": { "type_name": "str" },
                "values": { "type_name": "int" },
            }],
        ])
    );

    let registry = CapabilityRegistry::new();
    registry.register_binding(tally_binding());
    let output = registry
        .invoke("tally", json!({ "scores": { "a": 1, "b": 2 } }))
        .await
        .unwrap();
    assert_eq!(output, json!(3));
}

#[tokio::test]
async fn sequence_parameters_follow_the_list_shape() {
    assert_eq!(
        mean_signature().args()[0].descriptor(),
        &TypeDescriptor::list(TypeDescriptor::named("float"))
    );

    let registry = CapabilityRegistry::new();
    registry.register_binding(mean_binding());
    let output = registry
        .invoke("mean", json!({ "samples": [1.0, 2.0, 3.0] }))
        .await
        .unwrap();
    assert_eq!(output, json!(2.0));
}

#[tokio::test]
async fn zero_parameter_capabilities_advertise_an_empty_args_list() {
    let signature = ping_signature();
    assert_eq!(
        serde_json::to_value(&signature).expect("serialize")["args"],
        json!([])
    );
    assert_eq!(signature.return_type(), &TypeDescriptor::None);

    let registry = CapabilityRegistry::new();
    registry.register_binding(ping_binding());
    let output = registry.invoke("ping", Value::Null).await.unwrap();
    assert_eq!(output, Value::Null);
}

#[tokio::test]
async fn derived_types_describe_as_named_leaves() {
    assert_eq!(descriptor_of::<Invoice>(), TypeDescriptor::named("Invoice"));

    let registry = CapabilityRegistry::new();
    registry.register_binding(invoice_total_binding());
    let output = registry
        .invoke("invoice_total", json!({ "invoice": { "total": 12.5 } }))
        .await
        .unwrap();
    assert_eq!(output, json!(12.5));
}

#[tokio::test]
async fn discovery_installs_every_annotated_function() {
    let registry = CapabilityRegistry::new();
    let installed = registry.install_discovered();
    assert!(installed >= 6);

    for name in ["add", "greet", "tally", "mean", "ping", "invoice_total"] {
        assert!(registry.get(name).is_some(), "missing `{name}`");
    }

    let output = registry.invoke("add", json!([2, 3])).await.unwrap();
    assert_eq!(output, json!(5));
}

#[tokio::test]
async fn undecodable_arguments_name_the_parameter() {
    let registry = CapabilityRegistry::new();
    registry.register_binding(add_binding());

    let err = registry
        .invoke("add", json!({ "a": "two", "b": 3 }))
        .await
        .expect_err("string is not an int");
    assert!(err.to_string().contains("parameter `a`"));
}
