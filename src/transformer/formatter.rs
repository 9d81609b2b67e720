//! Prometheus Exposition Format output
//!
//! This module handles formatting of collected samples into the text
//! exposition format (version 0.0.4).
//!
//! # Format Specification
//!
//! ```text
//! # HELP <metric_name> <help_text>
//! # TYPE <metric_name> <type>
//! <metric_name>{<label1>="<value1>",<label2>="<value2>"} <value>
//! ```

use std::collections::HashMap;

use super::catalog::Sample;

/// Content type of the text exposition format
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Prometheus exposition format formatter
///
/// # Example
///
/// ```ignore
/// use kibana_exporter::transformer::{Catalog, PrometheusFormatter, Sample};
///
/// let catalog = Catalog::new();
/// let samples = vec![Sample::new(&catalog.up, 1.0)];
/// let output = PrometheusFormatter::new().format(&samples);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PrometheusFormatter;

impl PrometheusFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Format samples into Prometheus exposition format
    ///
    /// # Notes
    ///
    /// - HELP and TYPE lines are emitted once per metric name
    /// - Samples with the same name are grouped together, in order of first occurrence
    /// - Labels keep the descriptor's label order
    pub fn format(&self, samples: &[Sample<'_>]) -> String {
        if samples.is_empty() {
            return String::new();
        }

        let mut output = String::with_capacity(samples.len() * 100);

        for group in Self::group_by_name(samples) {
            let descriptor = group[0].descriptor;

            output.push_str(&format!(
                "# HELP {} {}\n",
                descriptor.name,
                Self::escape_help(&descriptor.help)
            ));
            output.push_str(&format!(
                "# TYPE {} {}\n",
                descriptor.name,
                descriptor.metric_type.as_str()
            ));

            for sample in group {
                output.push_str(&Self::format_sample_line(sample));
                output.push('\n');
            }
        }

        output
    }

    /// Group samples by name, preserving order of first occurrence
    fn group_by_name<'s, 'a>(samples: &'s [Sample<'a>]) -> Vec<Vec<&'s Sample<'a>>> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut groups: Vec<Vec<&Sample>> = Vec::new();

        for sample in samples {
            match index.get(sample.name()) {
                Some(&i) => groups[i].push(sample),
                None => {
                    index.insert(sample.name(), groups.len());
                    groups.push(vec![sample]);
                }
            }
        }

        groups
    }

    /// Format a single sample line
    fn format_sample_line(sample: &Sample<'_>) -> String {
        let mut line = sample.name().to_string();

        if !sample.label_values.is_empty() {
            let label_pairs: Vec<String> = sample
                .labels()
                .map(|(k, v)| format!("{}=\"{}\"", k, Self::escape_label_value(v)))
                .collect();

            line.push('{');
            line.push_str(&label_pairs.join(","));
            line.push('}');
        }

        line.push(' ');
        line.push_str(&Self::format_value(sample.value));

        line
    }

    /// Format a numeric value for Prometheus
    ///
    /// - NaN → "NaN"
    /// - +Inf → "+Inf"
    /// - -Inf → "-Inf"
    /// - Integers are formatted without decimal point
    /// - Everything else uses the shortest round-trip representation
    fn format_value(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else if value.is_infinite() {
            if value.is_sign_positive() {
                "+Inf".to_string()
            } else {
                "-Inf".to_string()
            }
        } else if value.fract() == 0.0 && value.abs() < 1e15 {
            format!("{}", value as i64)
        } else {
            format!("{}", value)
        }
    }

    /// Escape help text
    ///
    /// Escapes backslash and newline characters.
    fn escape_help(help: &str) -> String {
        help.replace('\\', "\\\\").replace('\n', "\\n")
    }

    /// Escape label value
    ///
    /// Escapes backslash, double-quote, and newline characters.
    fn escape_label_value(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len());
        for c in value.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                _ => escaped.push(c),
            }
        }
        escaped
    }
}
