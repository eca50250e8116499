//! Common test utilities for building step graphs, catalogs and bindings.
use kensa::prelude::*;
use serde_json::json;
use std::sync::Once;

static INIT: Once = Once::new();

/// Routes `tracing` output through the test harness. Safe to call from every test.
#[allow(dead_code)]
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// A small catalog of DeFi-flavoured step types used across the tests.
///
/// - `fetchPrice`: `symbol: Text` -> `price: Decimal`, `timestamp: Timestamp`
/// - `swap`: `amount: Decimal`, `recipient: Address` (optional) -> `amountOut: Decimal`, `transactionId: Text`
/// - `notify`: `message: Text` -> nothing
/// - `relay`: `input: Integer` -> `output: Integer`
/// - `textSource`: no parameters -> `value: Text`
#[allow(dead_code)]
pub fn create_catalog() -> Catalog {
    Catalog::new()
        .with_step_type(
            "fetchPrice",
            StepSchema::new()
                .with_parameter("symbol", "Text", true)
                .with_output("price", "Decimal")
                .with_output("timestamp", "Timestamp"),
        )
        .with_step_type(
            "swap",
            StepSchema::new()
                .with_parameter("amount", "Decimal", true)
                .with_parameter("recipient", "Address", false)
                .with_output("amountOut", "Decimal")
                .with_output("transactionId", "Text"),
        )
        .with_step_type(
            "notify",
            StepSchema::new().with_parameter("message", "Text", true),
        )
        .with_step_type(
            "relay",
            StepSchema::new()
                .with_parameter("input", "Integer", true)
                .with_output("output", "Integer"),
        )
        .with_step_type(
            "textSource",
            StepSchema::new().with_output("value", "Text"),
        )
}

/// `price` (fetchPrice) feeds `trade` (swap), whose transaction id feeds `alert` (notify).
#[allow(dead_code)]
pub fn create_linear_graph() -> (StepGraph, Bindings) {
    let graph = StepGraph::new(vec![
        StepDefinition::new("price", "fetchPrice").with_next("trade"),
        StepDefinition::new("trade", "swap").with_next("alert"),
        StepDefinition::new("alert", "notify"),
    ])
    .with_roots(["price"]);

    let bindings = Bindings::new()
        .bind("price", "symbol", json!("ETH"))
        .bind("trade", "amount", json!("price.price"))
        .bind("alert", "message", json!("trade.transactionId"));

    (graph, bindings)
}

/// A chain of `relay` steps `r1 -> r2 -> ... -> rN` where each step reads the previous one.
/// When `closed` is set, `r1` reads from `rN`, forming a single cycle of `n` steps.
#[allow(dead_code)]
pub fn create_relay_chain(
    prefix: &str,
    n: usize,
    closed: bool,
    bindings: Bindings,
) -> (Vec<StepDefinition>, Bindings) {
    let ids: Vec<String> = (1..=n).map(|i| format!("{}{}", prefix, i)).collect();
    let steps = ids.iter().map(|id| StepDefinition::new(id, "relay")).collect();

    let mut bindings = bindings;
    for (i, id) in ids.iter().enumerate() {
        let value = if i == 0 {
            if closed {
                json!(format!("{}.output", ids[n - 1]))
            } else {
                json!(1)
            }
        } else {
            json!(format!("{}.output", ids[i - 1]))
        };
        bindings.insert(id, "input", value);
    }

    (steps, bindings)
}

#[allow(dead_code)]
pub const NATIVE_GRAPH_JSON: &str = r#"{
    "steps": [
        {
            "id": "source",
            "stepType": "textSource",
            "parameters": [],
            "nextSteps": ["trade"]
        },
        {
            "id": "trade",
            "stepType": "swap",
            "parameters": [
                { "name": "amount", "type": "Decimal", "value": "source.value" }
            ],
            "nextSteps": []
        }
    ],
    "executionOrder": ["source", "trade"],
    "rootSteps": ["source"],
    "metadata": { "stepCount": 2, "connectionCount": 1 }
}"#;

#[allow(dead_code)]
pub const CATALOG_JSON: &str = r#"{
    "textSource": {
        "parameters": [],
        "outputs": [ { "name": "value", "type": "Text" } ]
    },
    "swap": {
        "parameters": [
            { "name": "amount", "type": "Decimal", "required": true },
            { "name": "recipient", "type": "Address", "required": false }
        ],
        "outputs": [
            { "name": "amountOut", "type": "Decimal" },
            { "name": "transactionId", "type": "Text" }
        ]
    }
}"#;
