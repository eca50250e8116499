use crate::analysis::AnalysisReport;
use itertools::Itertools;
use std::fmt::{self, Write};

/// Formats analysis reports into human-readable text.
pub struct ReportFormatter;

impl ReportFormatter {
    /// Format a report, one section per finding kind.
    pub fn format(report: &AnalysisReport) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = Self::write_report(&mut output, report);
        output
    }

    /// One-line verdict, e.g. for a status bar.
    pub fn verdict(report: &AnalysisReport) -> String {
        let summary = report.summary();
        if report.is_executable() {
            format!(
                "executable: {} steps, {} connections",
                summary.steps, summary.connections
            )
        } else {
            format!(
                "not executable: {} cycle(s), {} unresolved reference(s), {} unconvertible type issue(s), {} missing parameter(s), {} unknown step type(s)",
                summary.cycle_warnings + summary.cycle_errors,
                summary.unresolved_references,
                summary.unconvertible_type_issues,
                summary.missing_parameters,
                summary.unknown_step_types
            )
        }
    }

    fn write_report(out: &mut String, report: &AnalysisReport) -> fmt::Result {
        writeln!(out, "======== STEP GRAPH ANALYSIS ========")?;
        writeln!(out, "{}", Self::verdict(report))?;

        writeln!(out, "\n--- EXECUTION ORDER ---")?;
        for (i, step) in report.execution_order.iter().enumerate() {
            writeln!(out, "{:>3}. {}", i + 1, step)?;
        }
        if report.hint_matches_order == Some(false) {
            writeln!(out, "(differs from the declared execution order)")?;
        }

        if !report.circular_dependencies.is_empty() {
            writeln!(out, "\n--- CIRCULAR DEPENDENCIES ---")?;
            for cycle in &report.circular_dependencies {
                writeln!(out, "[{}] {}", cycle.severity, cycle)?;
                for suggestion in &cycle.suggestions {
                    writeln!(out, "      hint: {}", suggestion)?;
                }
            }
        }

        if !report.unresolved_references.is_empty() {
            writeln!(out, "\n--- UNRESOLVED REFERENCES ---")?;
            for unresolved in &report.unresolved_references {
                writeln!(
                    out,
                    "{}.{} -> '{}': {}",
                    unresolved.step_id, unresolved.parameter_name, unresolved.raw_value, unresolved.reason
                )?;
                for suggestion in &unresolved.suggestions {
                    writeln!(out, "      hint: {}", suggestion)?;
                }
            }
        }

        if !report.type_issues.is_empty() {
            writeln!(out, "\n--- TYPE COMPATIBILITY ---")?;
            for issue in &report.type_issues {
                let status = match (issue.can_convert, issue.auto_fix_available) {
                    (true, true) => format!("convertible ({}, auto-fix)", issue.complexity),
                    (true, false) => format!("convertible ({})", issue.complexity),
                    (false, _) => "not convertible".to_string(),
                };
                writeln!(
                    out,
                    "{}.{} ({}) -> {}.{} ({}): {}",
                    issue.source_step_id,
                    issue.source_field,
                    issue.source_type,
                    issue.target_step_id,
                    issue.target_field,
                    issue.target_type,
                    status
                )?;
                if let Some(suggestion) = &issue.suggestion {
                    writeln!(out, "      hint: {}", suggestion)?;
                }
            }
        }

        if !report.missing_parameters.is_empty() {
            writeln!(out, "\n--- MISSING REQUIRED PARAMETERS ---")?;
            for missing in &report.missing_parameters {
                writeln!(
                    out,
                    "{}.{} ({})",
                    missing.step_id, missing.parameter_name, missing.parameter_type
                )?;
            }
        }

        if !report.unknown_step_types.is_empty() {
            writeln!(out, "\n--- UNKNOWN STEP TYPES ---")?;
            for unknown in &report.unknown_step_types {
                writeln!(out, "{}: '{}'", unknown.step_id, unknown.step_type)?;
            }
        }

        if !report.orphaned_steps.is_empty() {
            writeln!(out, "\n--- ORPHANED STEPS ---")?;
            writeln!(out, "{}", report.orphaned_steps.iter().join(", "))?;
        }

        if !report.visualization.clusters.is_empty() {
            writeln!(out, "\n--- CLUSTERS ---")?;
            for cluster in &report.visualization.clusters {
                writeln!(out, "{}: {}", cluster.id, cluster.step_ids.iter().join(", "))?;
            }
        }

        writeln!(out, "\n=====================================")
    }
}
