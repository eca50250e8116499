use clap::{Parser, ValueEnum};
use kensa::analysis::{AnalysisConfig, Analyzer};
use kensa::logging::init_logging;
use kensa::prelude::*;
use serde::Deserialize;
use std::fs;
use std::time::Instant;
use tracing::info;

// --- JSON Deserialization Structs (Editor Format Specific) ---
// These structs match the node/edge export of a flow editor and are only used here for conversion.

#[derive(Deserialize)]
struct EditorFlow {
    nodes: Vec<EditorNode>,
    #[serde(default)]
    edges: Vec<EditorEdge>,
}

#[derive(Deserialize)]
struct EditorNode {
    id: String,
    data: EditorNodeData,
    #[serde(default)]
    position: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct EditorNodeData {
    #[serde(alias = "stepType", alias = "actionType")]
    step_type: Option<String>,
    #[serde(default)]
    parameters: Vec<EditorParameter>,
}

#[derive(Deserialize)]
struct EditorParameter {
    name: String,
    #[serde(default, rename = "type")]
    value_type: String,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Deserialize)]
struct EditorEdge {
    source: String,
    target: String,
}

// --- Converter Implementation ---
// Declared successors come from the editor's edges; data flow comes from parameter references.

impl IntoStepGraph for EditorFlow {
    fn into_step_graph(self) -> std::result::Result<StepGraph, GraphConversionError> {
        let mut steps = self
            .nodes
            .into_iter()
            .map(|node| -> std::result::Result<StepDefinition, GraphConversionError> {
                let step_type = node.data.step_type.ok_or_else(|| {
                    GraphConversionError::MissingField {
                        step_id: node.id.clone(),
                        field: "stepType".to_string(),
                    }
                })?;
                let mut step = StepDefinition::new(&node.id, &step_type);
                step.position = node.position;
                step.parameters = node
                    .data
                    .parameters
                    .into_iter()
                    .map(|p| ParameterDefinition {
                        name: p.name,
                        value_type: p.value_type,
                        value: p.value,
                    })
                    .collect();
                Ok(step)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for edge in self.edges {
            let source = steps
                .iter_mut()
                .find(|s| s.id == edge.source)
                .ok_or_else(|| {
                    GraphConversionError::ValidationError(format!(
                        "edge references unknown source node '{}'",
                        edge.source
                    ))
                })?;
            source.next_steps.push(edge.target);
        }

        Ok(StepGraph::new(steps))
    }
}

/// Input layout of the graph file.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum GraphFormat {
    /// Kensa's own `StepGraph` JSON
    Native,
    /// Node/edge export of a flow editor
    Editor,
}

/// How to print the result.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Dot,
}

/// Step graph dependency analyzer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the step graph JSON file
    graph_path: String,
    /// Path to the step catalog JSON file
    catalog_path: String,
    /// Optional path to the parameter bindings JSON file
    bindings_path: Option<String>,

    /// Layout of the graph file
    #[arg(long, value_enum, default_value = "native")]
    format: GraphFormat,

    /// What to print
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Optional analysis config JSON file
    #[arg(short, long)]
    config: Option<String>,

    /// Exit with status 2 when the graph is not executable
    #[arg(long)]
    strict: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let total_start = Instant::now();
    let graph = load_graph(&cli.graph_path, cli.format)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load graph: {}", e)));
    let catalog = Catalog::from_file(&cli.catalog_path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load catalog: {}", e)));
    let bindings = match &cli.bindings_path {
        Some(path) => Bindings::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load bindings: {}", e))),
        None => Bindings::new(),
    };
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load config: {}", e))),
        None => AnalysisConfig::default(),
    };

    let analyzer = Analyzer::builder().with_config(config).build();
    let analysis_start = Instant::now();
    let report = analyzer.analyze(&graph, &catalog, &bindings);
    info!(
        elapsed = ?analysis_start.elapsed(),
        total = ?total_start.elapsed(),
        "analysis complete"
    );

    match cli.output {
        OutputFormat::Text => print!("{}", ReportFormatter::format(&report)),
        OutputFormat::Json => {
            let json = report
                .to_json()
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize report: {}", e)));
            println!("{}", json);
        }
        OutputFormat::Dot => print!("{}", report.visualization.to_dot()),
    }

    if cli.strict && !report.is_executable() {
        std::process::exit(2);
    }
}

fn load_graph(path: &str, format: GraphFormat) -> std::result::Result<StepGraph, LoadError> {
    match format {
        GraphFormat::Native => StepGraph::from_file(path),
        GraphFormat::Editor => {
            let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_string(),
                source,
            })?;
            let flow: EditorFlow =
                serde_json::from_str(&content).map_err(|source| LoadError::Json {
                    what: "editor flow",
                    source,
                })?;
            Ok(flow.into_step_graph()?)
        }
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
