use clap::Parser;
use kensa::logging::init_logging;
use kensa::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Step types the generator draws from: (tag, parameters, outputs).
const STEP_TYPES: &[(&str, &[(&str, &str)], &[(&str, &str)])] = &[
    ("fetchPrice", &[("symbol", "Text")], &[("price", "Decimal"), ("timestamp", "Timestamp")]),
    ("swap", &[("amount", "Decimal"), ("recipient", "Address")], &[("amountOut", "Decimal"), ("transactionId", "Text")]),
    ("transfer", &[("amount", "Decimal"), ("to", "Address")], &[("transactionId", "Text"), ("success", "Boolean")]),
    ("format", &[("value", "Text")], &[("text", "Text")]),
    ("counter", &[("start", "Integer")], &[("count", "Integer")]),
    ("notify", &[("message", "Text"), ("ok", "Boolean")], &[]),
];

/// A CLI tool to generate synthetic step graphs for the Kensa analyzer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to write graph.json, catalog.json and bindings.json into
    #[arg(short, long, default_value = "generated")]
    output: String,

    /// Number of steps to generate
    #[arg(short, long, default_value_t = 50)]
    steps: usize,

    /// Probability that a parameter is bound to an earlier step's output
    #[arg(long, default_value_t = 0.6)]
    reference_rate: f64,

    /// Probability that a reference points forward, possibly creating a cycle
    #[arg(long, default_value_t = 0.0)]
    back_edge_rate: f64,

    /// Probability that a reference points at a step that does not exist
    #[arg(long, default_value_t = 0.0)]
    dangling_rate: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(false);

    for (flag, rate) in [
        ("--reference-rate", cli.reference_rate),
        ("--back-edge-rate", cli.back_edge_rate),
        ("--dangling-rate", cli.dangling_rate),
    ] {
        if !(0.0..=1.0).contains(&rate) {
            eprintln!("Error: {} must be between 0 and 1 (got {})", flag, rate);
            std::process::exit(1);
        }
    }

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Generating a step graph with {} steps...", cli.steps);

    let catalog = build_catalog();
    let (graph, bindings) = generate_graph(&mut rng, &cli);

    let out_dir = Path::new(&cli.output);
    fs::create_dir_all(out_dir)?;
    fs::write(out_dir.join("graph.json"), serde_json::to_string_pretty(&graph)?)?;
    fs::write(out_dir.join("catalog.json"), serde_json::to_string_pretty(&catalog)?)?;
    fs::write(out_dir.join("bindings.json"), serde_json::to_string_pretty(&bindings)?)?;

    println!("Successfully wrote graph, catalog and bindings to '{}'", cli.output);
    Ok(())
}

fn build_catalog() -> Catalog {
    STEP_TYPES
        .iter()
        .map(|(tag, params, outputs)| {
            let mut schema = StepSchema::new();
            for (name, value_type) in params.iter() {
                schema = schema.with_parameter(name, value_type, true);
            }
            for (name, value_type) in outputs.iter() {
                schema = schema.with_output(name, value_type);
            }
            (tag.to_string(), schema)
        })
        .collect()
}

fn generate_graph(rng: &mut StdRng, cli: &Cli) -> (StepGraph, Bindings) {
    let type_indices: Vec<usize> = (0..cli.steps)
        .map(|_| rng.random_range(0..STEP_TYPES.len()))
        .collect();
    let ids: Vec<String> = (0..cli.steps).map(|i| format!("step{}", i + 1)).collect();

    let mut bindings = Bindings::new();
    let mut steps = Vec::with_capacity(cli.steps);

    for (i, &type_index) in type_indices.iter().enumerate() {
        let (tag, params, _) = STEP_TYPES[type_index];
        let mut step = StepDefinition::new(&ids[i], tag);

        for (name, value_type) in params.iter() {
            step.parameters.push(ParameterDefinition {
                name: name.to_string(),
                value_type: value_type.to_string(),
                value: serde_json::Value::Null,
            });

            let value = if rng.random_bool(cli.dangling_rate) {
                json!(format!("missing{}.value", rng.random_range(0..1000)))
            } else if rng.random_bool(cli.reference_rate) {
                pick_source(rng, cli, i, &type_indices, &ids)
                    .unwrap_or_else(|| literal_for(value_type))
            } else {
                literal_for(value_type)
            };
            bindings.insert(&ids[i], name, value);
        }

        if i + 1 < ids.len() {
            step = step.with_next(&ids[i + 1]);
        }
        steps.push(step);
    }

    let graph = StepGraph::new(steps).with_roots(ids.first().cloned());
    debug!(steps = graph.steps.len(), "generated graph");
    (graph, bindings)
}

/// Picks a producing step and one of its outputs, earlier in the list unless a back edge is drawn.
fn pick_source(
    rng: &mut StdRng,
    cli: &Cli,
    index: usize,
    type_indices: &[usize],
    ids: &[String],
) -> Option<serde_json::Value> {
    let candidates: Vec<usize> = if rng.random_bool(cli.back_edge_rate) {
        (index + 1..ids.len()).collect()
    } else {
        (0..index).collect()
    };
    let producers: Vec<usize> = candidates
        .into_iter()
        .filter(|&c| !STEP_TYPES[type_indices[c]].2.is_empty())
        .collect();
    if producers.is_empty() {
        return None;
    }
    let source = producers[rng.random_range(0..producers.len())];
    let outputs = STEP_TYPES[type_indices[source]].2;
    let (output, _) = outputs[rng.random_range(0..outputs.len())];
    Some(json!(format!("{}.{}", ids[source], output)))
}

fn literal_for(value_type: &str) -> serde_json::Value {
    match ValueType::parse(value_type) {
        ValueType::Decimal => json!("1.5"),
        ValueType::Integer => json!(1),
        ValueType::Boolean => json!(true),
        ValueType::Address => json!("0x0000000000000000000000000000000000000000"),
        _ => json!("hello"),
    }
}
