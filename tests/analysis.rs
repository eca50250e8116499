//! Integration tests for the analysis engine
//!
//! End-to-end tests that run full analyses over small hand-built graphs.
//!
mod common;
use common::*;
use kensa::prelude::*;
use serde_json::json;

#[cfg(test)]
mod linear_graph_tests {
    use super::*;

    #[test]
    fn test_linear_graph_is_executable() {
        init_tracing();
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.is_executable());
        assert!(!report.has_findings());
        assert_eq!(report.execution_order, vec!["price", "trade", "alert"]);
        assert_eq!(report.connections.len(), 2);
        assert!(report.connections.iter().all(|c| c.compatible));
        assert!(report.circular_dependencies.is_empty());
        assert!(report.orphaned_steps.is_empty());
        assert!(report.type_issues.is_empty());
    }

    #[test]
    fn test_dependency_records_link_both_directions() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let report = analyze(&graph, &catalog, &bindings);
        let trade = &report.dependency_map["trade"];

        assert_eq!(trade.step_type, "swap");
        assert_eq!(trade.depends_on, vec!["price"]);
        assert_eq!(trade.provides, vec!["trade.amountOut", "trade.transactionId"]);
        assert_eq!(trade.parameter_dependencies.len(), 1);

        let dep = &trade.parameter_dependencies[0];
        assert_eq!(dep.parameter_name, "amount");
        assert_eq!(dep.source_step_id, "price");
        assert_eq!(dep.source_output, "price");
        assert!(dep.compatible);
        assert!(!dep.conversion_needed);
        assert!(dep.suggestion.is_none());

        let price = &report.dependency_map["price"];
        assert_eq!(price.output_dependents.len(), 1);
        assert_eq!(price.output_dependents[0].output_name, "price");
        assert_eq!(price.output_dependents[0].consumers[0].step_id, "trade");
        assert!(price.output_dependents[0].consumers[0].types_match);

        // Unconsumed outputs are left out
        assert!(
            report.dependency_map["alert"]
                .output_dependents
                .is_empty()
        );
    }

    #[test]
    fn test_connection_ids_and_strength() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let report = analyze(&graph, &catalog, &bindings);

        let ids: Vec<_> = report.connections.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["price.price->trade.amount", "trade.transactionId->alert.message"]
        );
        assert!(report.connections.iter().all(|c| c.strength == 1.0));
    }

    #[test]
    fn test_declared_order_hint_is_compared() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let report = analyze(&graph, &catalog, &bindings);
        assert_eq!(report.hint_matches_order, None);
        assert!(!ReportFormatter::format(&report).contains("differs from the declared"));

        let hinted = graph.clone().with_execution_order(["price", "trade", "alert"]);
        let report = analyze(&hinted, &catalog, &bindings);
        assert_eq!(report.hint_matches_order, Some(true));

        let stale = graph.with_execution_order(["alert", "trade", "price"]);
        let report = analyze(&stale, &catalog, &bindings);
        assert_eq!(report.hint_matches_order, Some(false));
        assert!(
            ReportFormatter::format(&report).contains("(differs from the declared execution order)")
        );
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let first = analyze(&graph, &catalog, &bindings);
        let second = analyze(&graph, &catalog, &bindings);

        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod type_compatibility_tests {
    use super::*;

    #[test]
    fn test_text_into_decimal_is_convertible_but_not_auto_fixable() {
        init_tracing();
        let graph = StepGraph::from_json_str(NATIVE_GRAPH_JSON).expect("valid graph JSON");
        let catalog = Catalog::from_json_str(CATALOG_JSON).expect("valid catalog JSON");

        let report = analyze(&graph, &catalog, &Bindings::new());

        assert_eq!(report.type_issues.len(), 1);
        let issue = &report.type_issues[0];
        assert_eq!(issue.source_step_id, "source");
        assert_eq!(issue.source_field, "value");
        assert_eq!(issue.target_step_id, "trade");
        assert_eq!(issue.target_field, "amount");
        assert_eq!(issue.source_type, ValueType::Text);
        assert_eq!(issue.target_type, ValueType::Decimal);
        assert!(issue.can_convert);
        assert_eq!(issue.complexity, ConversionComplexity::Simple);
        assert!(!issue.auto_fix_available);
        assert!(issue.suggestion.is_some());

        // Convertible mismatches do not block execution
        assert!(report.is_executable());
        assert_eq!(report.hint_matches_order, Some(true));

        let dep = &report.dependency_map["trade"].parameter_dependencies[0];
        assert!(dep.conversion_needed);
        assert_eq!(dep.suggestion, issue.suggestion);
        assert_eq!(report.connections[0].strength, 0.6);
    }

    #[test]
    fn test_unconvertible_mismatch_blocks_execution() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("price", "fetchPrice"),
            StepDefinition::new("trade", "swap"),
        ]);
        let bindings = Bindings::new()
            .bind("price", "symbol", json!("ETH"))
            .bind("trade", "amount", json!("price.timestamp"));

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.type_issues.len(), 1);
        let issue = &report.type_issues[0];
        assert!(!issue.can_convert);
        assert!(!issue.auto_fix_available);
        assert!(issue.suggestion.is_none());
        assert!(!report.is_executable());
        assert_eq!(report.summary().unconvertible_type_issues, 1);
        assert_eq!(report.connections[0].strength, 0.0);
    }

    #[test]
    fn test_optional_parameters_weigh_less() {
        let catalog = Catalog::new()
            .with_step_type("source", StepSchema::new().with_output("n", "Integer"))
            .with_step_type(
                "sink",
                StepSchema::new()
                    .with_parameter("required", "Decimal", true)
                    .with_parameter("optional", "Decimal", false),
            );
        let graph = StepGraph::new(vec![
            StepDefinition::new("a", "source"),
            StepDefinition::new("b", "sink"),
        ]);
        let bindings = Bindings::new()
            .bind("b", "required", json!("a.n"))
            .bind("b", "optional", json!("a.n"));

        let report = analyze(&graph, &catalog, &bindings);

        // Integer -> Decimal is simple and lossless
        assert_eq!(report.connections[0].strength, 0.8);
        assert!((report.connections[1].strength - 0.72).abs() < 1e-9);
        assert!(report.type_issues.iter().all(|i| i.auto_fix_available));
    }
}

#[cfg(test)]
mod cycle_tests {
    use super::*;

    #[test]
    fn test_three_step_cycle_is_a_warning() {
        init_tracing();
        let catalog = create_catalog();
        let (steps, bindings) = create_relay_chain("r", 3, true, Bindings::new());
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.circular_dependencies.len(), 1);
        let cycle = &report.circular_dependencies[0];
        assert_eq!(cycle.severity, CycleSeverity::Warning);
        assert_eq!(cycle.len(), 3);
        assert_eq!(cycle.cycle.first(), cycle.cycle.last());
        for id in ["r1", "r2", "r3"] {
            assert!(cycle.contains(id));
        }
        assert_eq!(cycle.suggestions.len(), 2);
        assert!(cycle.suggestions[0].starts_with("Remove the dependency between"));
        assert!(!report.is_executable());
    }

    #[test]
    fn test_order_is_total_even_with_cycles() {
        let catalog = create_catalog();
        let (steps, bindings) = create_relay_chain("r", 3, true, Bindings::new());
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        let mut order = report.execution_order.clone();
        order.sort();
        assert_eq!(order, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_deep_chain_declared_in_reverse() {
        let catalog = create_catalog();
        let (mut steps, bindings) = create_relay_chain("r", 50_000, false, Bindings::new());
        steps.reverse();
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.circular_dependencies.is_empty());
        assert!(report.unresolved_references.is_empty());
        assert!(report.orphaned_steps.is_empty());
        assert_eq!(report.execution_order.len(), 50_000);
        assert_eq!(report.execution_order[0], "r1");
        assert_eq!(report.execution_order[49_999], "r50000");
    }

    #[test]
    fn test_deep_cycle_is_found_without_recursion() {
        let catalog = create_catalog();
        let (steps, bindings) = create_relay_chain("r", 50_000, true, Bindings::new());
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.circular_dependencies.len(), 1);
        assert_eq!(report.circular_dependencies[0].len(), 50_000);
        assert_eq!(report.circular_dependencies[0].severity, CycleSeverity::Error);
        assert_eq!(report.execution_order.len(), 50_000);
    }

    #[test]
    fn test_long_cycle_is_an_error() {
        let catalog = create_catalog();
        let (steps, bindings) = create_relay_chain("r", 5, true, Bindings::new());
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.circular_dependencies.len(), 1);
        let cycle = &report.circular_dependencies[0];
        assert_eq!(cycle.severity, CycleSeverity::Error);
        assert_eq!(cycle.len(), 5);
        assert_eq!(cycle.suggestions.len(), 1);
        assert_eq!(report.summary().cycle_errors, 1);
    }

    #[test]
    fn test_disjoint_cycles_are_all_reported() {
        let catalog = create_catalog();
        let (mut steps, bindings) = create_relay_chain("a", 2, true, Bindings::new());
        let (more, bindings) = create_relay_chain("b", 4, true, bindings);
        steps.extend(more);
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.circular_dependencies.len(), 2);
        let summary = report.summary();
        assert_eq!(summary.cycle_warnings, 1);
        assert_eq!(summary.cycle_errors, 1);
        assert!(report.circular_dependencies[0].contains("a1"));
        assert!(report.circular_dependencies[1].contains("b1"));
    }

    #[test]
    fn test_warning_threshold_is_configurable() {
        let catalog = create_catalog();
        let (steps, bindings) = create_relay_chain("r", 5, true, Bindings::new());
        let graph = StepGraph::new(steps);

        let analyzer = Analyzer::builder().with_warning_cycle_max_len(5).build();
        let report = analyzer.analyze(&graph, &catalog, &bindings);

        assert_eq!(
            report.circular_dependencies[0].severity,
            CycleSeverity::Warning
        );
    }

    #[test]
    fn test_self_reference_is_not_a_cycle() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![StepDefinition::new("loop", "relay")]);
        let bindings = Bindings::new().bind("loop", "input", json!("loop.output"));

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.circular_dependencies.is_empty());
        assert!(report.dependency_map["loop"].depends_on.is_empty());
        assert_eq!(report.connections.len(), 1);
        assert_eq!(report.connections[0].id, "loop.output->loop.input");
        assert_eq!(report.execution_order, vec!["loop"]);
        assert!(report.orphaned_steps.is_empty());
    }
}

#[cfg(test)]
mod unresolved_reference_tests {
    use super::*;

    #[test]
    fn test_reference_to_missing_step() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();
        let bindings = {
            let mut bindings = bindings;
            bindings.insert("alert", "message", json!("ghost.total"));
            bindings
        };

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.unresolved_references.len(), 1);
        let unresolved = &report.unresolved_references[0];
        assert_eq!(unresolved.step_id, "alert");
        assert_eq!(unresolved.parameter_name, "message");
        assert_eq!(unresolved.raw_value, "ghost.total");
        assert_eq!(unresolved.referenced_step.as_deref(), Some("ghost"));
        assert_eq!(unresolved.referenced_output.as_deref(), Some("total"));
        assert_eq!(unresolved.reason, UnresolvedReason::MissingStep);
        assert!(!unresolved.suggestions.is_empty());

        // No edge is created for the missing source
        assert!(report.dependency_map["alert"].depends_on.is_empty());
        assert!(!report.is_executable());
    }

    #[test]
    fn test_misspelled_step_gets_a_hint() {
        let catalog = create_catalog();
        let (graph, mut bindings) = create_linear_graph();
        bindings.insert("trade", "amount", json!("prise.price"));

        let report = analyze(&graph, &catalog, &bindings);

        let unresolved = &report.unresolved_references[0];
        assert_eq!(unresolved.reason, UnresolvedReason::MissingStep);
        assert_eq!(unresolved.suggestions[0], "Did you mean 'price'?");
    }

    #[test]
    fn test_reference_to_missing_output_lists_real_outputs() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("real", "fetchPrice"),
            StepDefinition::new("trade", "swap"),
        ]);
        let bindings = Bindings::new()
            .bind("real", "symbol", json!("ETH"))
            .bind("trade", "amount", json!("real.bogus"));

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.unresolved_references.len(), 1);
        let unresolved = &report.unresolved_references[0];
        assert_eq!(unresolved.referenced_step.as_deref(), Some("real"));
        assert_eq!(unresolved.referenced_output.as_deref(), Some("bogus"));
        assert_eq!(unresolved.reason, UnresolvedReason::MissingOutput);
        let hints = unresolved.suggestions.join(" ");
        assert!(hints.contains("price"));
        assert!(hints.contains("timestamp"));
    }

    #[test]
    fn test_misspelled_output_gets_a_hint() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("real", "fetchPrice"),
            StepDefinition::new("trade", "swap"),
        ]);
        let bindings = Bindings::new()
            .bind("real", "symbol", json!("ETH"))
            .bind("trade", "amount", json!("real.prcie"));

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(
            report.unresolved_references[0].suggestions[0],
            "Did you mean 'price'?"
        );
    }

    #[test]
    fn test_references_resolve_against_the_first_duplicate() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("dup", "fetchPrice"),
            StepDefinition::new("dup", "notify"),
            StepDefinition::new("trade", "swap"),
        ]);
        let bindings = Bindings::new()
            .bind("dup", "symbol", json!("ETH"))
            .bind("trade", "amount", json!("dup.price"));

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.unresolved_references.is_empty());
        assert_eq!(report.dependency_map["trade"].depends_on, vec!["dup"]);
    }

    #[test]
    fn test_every_dangling_reference_in_a_chain_is_reported() {
        let catalog = create_catalog();
        let (steps, mut bindings) = create_relay_chain("r", 2_000, false, Bindings::new());
        for i in (2..=2_000).step_by(2) {
            bindings.insert(&format!("r{}", i), "input", json!(format!("gone{}.output", i)));
        }
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.unresolved_references.len(), 1_000);
        assert!(
            report
                .unresolved_references
                .iter()
                .all(|u| u.reason == UnresolvedReason::MissingStep)
        );
    }

    #[test]
    fn test_malformed_references_are_flagged() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("trade", "swap"),
            StepDefinition::new("alert", "notify"),
        ]);
        let bindings = Bindings::new()
            .bind("trade", "amount", json!("1step.out"))
            .bind("alert", "message", json!("trade."));

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.unresolved_references.len(), 2);
        assert!(
            report
                .unresolved_references
                .iter()
                .all(|u| u.reason == UnresolvedReason::InvalidFormat)
        );
        assert_eq!(report.unresolved_references[1].referenced_step.as_deref(), Some("trade"));
        assert!(
            report.unresolved_references[0].suggestions[0]
                .starts_with("Use the form '<stepId>.<outputName>'")
        );
    }

    #[test]
    fn test_numbers_are_literals() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![StepDefinition::new("trade", "swap")]);
        let bindings = Bindings::new().bind("trade", "amount", json!("1.5"));

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.unresolved_references.is_empty());
        assert!(report.is_executable());
    }

    #[test]
    fn test_bindings_for_undeclared_parameters_are_checked() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![StepDefinition::new("alert", "notify")]);
        let bindings = Bindings::new()
            .bind("alert", "message", json!("hello"))
            .bind("alert", "extra", json!("ghost.value"));

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.unresolved_references.len(), 1);
        assert_eq!(report.unresolved_references[0].parameter_name, "extra");
    }
}

#[cfg(test)]
mod reachability_tests {
    use super::*;

    fn graph_with_lonely_step() -> (StepGraph, Bindings) {
        let graph = StepGraph::new(vec![
            StepDefinition::new("price", "fetchPrice"),
            StepDefinition::new("trade", "swap"),
            StepDefinition::new("lonely", "fetchPrice"),
        ]);
        let bindings = Bindings::new()
            .bind("price", "symbol", json!("ETH"))
            .bind("trade", "amount", json!("price.price"))
            .bind("lonely", "symbol", json!("BTC"));
        (graph, bindings)
    }

    #[test]
    fn test_steps_unreachable_from_declared_roots_are_orphans() {
        let catalog = create_catalog();
        let (graph, bindings) = graph_with_lonely_step();
        let graph = graph.with_roots(["price"]);

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.orphaned_steps, vec!["lonely"]);
        // Orphans are informational
        assert!(report.is_executable());
        assert!(report.has_findings());
    }

    #[test]
    fn test_roots_are_inferred_when_none_are_declared() {
        let catalog = create_catalog();
        let (graph, bindings) = graph_with_lonely_step();

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.orphaned_steps.is_empty());
    }

    #[test]
    fn test_unknown_declared_roots_are_ignored() {
        let catalog = create_catalog();
        let (graph, bindings) = graph_with_lonely_step();
        let graph = graph.with_roots(["nowhere"]);

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.orphaned_steps.is_empty());
    }

    #[test]
    fn test_fully_cyclic_graph_has_no_provable_roots() {
        let catalog = create_catalog();
        let (steps, bindings) = create_relay_chain("r", 3, true, Bindings::new());
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.orphaned_steps, vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn test_without_root_inference_everything_is_orphaned() {
        let catalog = create_catalog();
        let (graph, bindings) = graph_with_lonely_step();

        let analyzer = Analyzer::builder().with_root_inference(false).build();
        let report = analyzer.analyze(&graph, &catalog, &bindings);

        assert_eq!(report.orphaned_steps, vec!["price", "trade", "lonely"]);
    }
}

#[cfg(test)]
mod malformed_input_tests {
    use super::*;

    #[test]
    fn test_unknown_step_type_degrades_gracefully() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("mystery", "teleport"),
            StepDefinition::new("alert", "notify"),
        ]);
        let bindings = Bindings::new().bind("alert", "message", json!("mystery.anything"));

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.unknown_step_types.len(), 1);
        assert_eq!(report.unknown_step_types[0].step_id, "mystery");
        assert_eq!(report.unknown_step_types[0].step_type, "teleport");

        let record = &report.dependency_map["mystery"];
        assert!(record.provides.is_empty());
        assert!(record.parameter_dependencies.is_empty());

        // Outputs of an unknown type cannot be checked
        assert!(report.unresolved_references.is_empty());
        assert!(report.connections.is_empty());
        assert_eq!(report.execution_order.len(), 2);
        assert!(!report.is_executable());
    }

    #[test]
    fn test_missing_required_parameters() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("trade", "swap"),
            StepDefinition::new("alert", "notify"),
        ]);
        let bindings = Bindings::new().bind("alert", "message", serde_json::Value::Null);

        let report = analyze(&graph, &catalog, &bindings);

        let missing: Vec<_> = report
            .missing_parameters
            .iter()
            .map(|m| (m.step_id.as_str(), m.parameter_name.as_str()))
            .collect();
        // Optional `recipient` is not reported
        assert_eq!(missing, vec![("trade", "amount"), ("alert", "message")]);
        assert_eq!(report.missing_parameters[0].parameter_type, ValueType::Decimal);
        assert!(!report.is_executable());
    }

    #[test]
    fn test_step_parameters_are_used_when_unbound() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("price", "fetchPrice")
                .with_parameter("symbol", "Text", json!("ETH")),
            StepDefinition::new("trade", "swap")
                .with_parameter("amount", "Decimal", json!("price.price")),
        ]);

        let report = analyze(&graph, &catalog, &Bindings::new());

        assert!(report.is_executable());
        assert_eq!(report.connections.len(), 1);
    }

    #[test]
    fn test_bindings_override_step_parameters() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("price", "fetchPrice")
                .with_parameter("symbol", "Text", json!("ETH")),
            StepDefinition::new("trade", "swap")
                .with_parameter("amount", "Decimal", json!("price.price")),
        ]);
        let bindings = Bindings::new().bind("trade", "amount", json!("2.5"));

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.connections.is_empty());
    }

    #[test]
    fn test_duplicate_step_ids_keep_the_first() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("dup", "fetchPrice"),
            StepDefinition::new("dup", "notify"),
        ]);
        let bindings = Bindings::new().bind("dup", "symbol", json!("ETH"));

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(report.dependency_map.len(), 1);
        assert_eq!(report.dependency_map["dup"].step_type, "fetchPrice");
        assert_eq!(report.execution_order, vec!["dup"]);
    }

    #[test]
    fn test_empty_graph() {
        let report = analyze(&StepGraph::default(), &Catalog::new(), &Bindings::new());

        assert!(report.is_executable());
        assert!(report.execution_order.is_empty());
        assert!(report.visualization.nodes.is_empty());
    }
}

#[cfg(test)]
mod presentation_tests {
    use super::*;

    #[test]
    fn test_visualization_nodes_edges_and_clusters() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let report = analyze(&graph, &catalog, &bindings);
        let visual = &report.visualization;

        assert!(visual.node("step:price").is_some());
        assert!(visual.node("param:trade.amount").is_some());
        assert!(visual.node("output:price.timestamp").is_some());
        assert_eq!(visual.edges.len(), 2);
        assert_eq!(visual.edges[0].source, "output:price.price");
        assert_eq!(visual.edges[0].target, "param:trade.amount");
        assert!(!visual.edges[0].style.dashed);

        assert_eq!(visual.clusters.len(), 1);
        assert_eq!(visual.clusters[0].id, "cluster-0");
        assert_eq!(visual.clusters[0].step_ids, vec!["price", "trade", "alert"]);
        assert_eq!(report.summary().clusters, 1);
    }

    #[test]
    fn test_isolated_steps_form_no_cluster() {
        let catalog = create_catalog();
        let graph = StepGraph::new(vec![
            StepDefinition::new("a", "fetchPrice"),
            StepDefinition::new("b", "fetchPrice"),
        ]);
        let bindings = Bindings::new()
            .bind("a", "symbol", json!("ETH"))
            .bind("b", "symbol", json!("BTC"));

        let report = analyze(&graph, &catalog, &bindings);

        assert!(report.visualization.clusters.is_empty());
        assert!(report.visualization.cluster_of("a").is_none());
    }

    #[test]
    fn test_dot_export() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let report = analyze(&graph, &catalog, &bindings);
        let dot = report.visualization.to_dot();

        assert!(dot.starts_with("digraph steps {"));
        assert!(dot.contains("\"output:price.price\" -> \"param:trade.amount\""));
        assert!(dot.contains("subgraph \"cluster_cluster-0\""));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_json_report_uses_wire_names() {
        let catalog = create_catalog();
        let (graph, mut bindings) = create_linear_graph();
        bindings.insert("alert", "message", json!("ghost.total"));

        let report = analyze(&graph, &catalog, &bindings);
        let json = report.to_json().expect("report serializes");

        assert!(json.contains("\"dependencies\""));
        assert!(json.contains("\"typeCompatibilityIssues\""));
        assert!(json.contains("\"orphanedActions\""));
        assert!(json.contains("\"referencedAction\": \"ghost\""));
        assert!(json.contains("\"reason\": \"missingStep\""));
    }

    #[test]
    fn test_text_report_sections() {
        let catalog = create_catalog();
        let (steps, bindings) = create_relay_chain("r", 3, true, Bindings::new());
        let graph = StepGraph::new(steps);

        let report = analyze(&graph, &catalog, &bindings);
        let text = ReportFormatter::format(&report);

        assert!(text.contains("--- EXECUTION ORDER ---"));
        assert!(text.contains("--- CIRCULAR DEPENDENCIES ---"));
        assert!(text.contains("[warning]"));
        assert!(ReportFormatter::verdict(&report).starts_with("not executable"));
    }

    #[test]
    fn test_verdict_for_executable_graph() {
        let catalog = create_catalog();
        let (graph, bindings) = create_linear_graph();

        let report = analyze(&graph, &catalog, &bindings);

        assert_eq!(
            ReportFormatter::verdict(&report),
            "executable: 3 steps, 2 connections"
        );
    }
}

#[cfg(test)]
mod two_step_scenario_tests {
    use super::*;

    fn two_step(reference: &str) -> AnalysisReport {
        let catalog = Catalog::new()
            .with_step_type(
                "quote",
                StepSchema::new()
                    .with_output("amountOut", "Decimal")
                    .with_output("transactionId", "Text"),
            )
            .with_step_type(
                "swap",
                StepSchema::new().with_parameter("amount", "Decimal", true),
            );
        let graph = StepGraph::new(vec![
            StepDefinition::new("step1", "quote").with_next("step2"),
            StepDefinition::new("step2", "swap"),
        ]);
        let bindings = Bindings::new().bind("step2", "amount", json!(reference));
        analyze(&graph, &catalog, &bindings)
    }

    #[test]
    fn test_matching_types_connect_cleanly() {
        let report = two_step("step1.amountOut");

        assert_eq!(report.connections.len(), 1);
        assert!(report.circular_dependencies.is_empty());
        assert_eq!(report.execution_order, vec!["step1", "step2"]);
        assert!(report.orphaned_steps.is_empty());
        assert!(report.type_issues.is_empty());
    }

    #[test]
    fn test_text_output_into_decimal_parameter() {
        let report = two_step("step1.transactionId");

        assert_eq!(report.type_issues.len(), 1);
        assert!(report.type_issues[0].can_convert);
        assert!(!report.type_issues[0].auto_fix_available);
        assert_eq!(report.connections.len(), 1);
        assert!(!report.connections[0].compatible);
        assert_eq!(report.visualization.edges[0].style.color, "#f59e0b");
    }
}
