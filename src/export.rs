//! Metric export: write published metric vectors for external tools.
//!
//! ```text
//! AnalysisPipeline::current_metrics() → write_metrics_json() → JSON document
//!                                      → write_metrics_csv()  → one row per node
//! ```
//!
//! Undefined values (`NaN`) become `null` in JSON and empty cells in CSV.
//! Infinite integration is written as `null` in JSON (it has no JSON
//! number) and as `inf` in CSV.

use std::io::Write;

use serde::Serialize;

use crate::metrics::Metric;
use crate::Result;

#[derive(Serialize)]
struct MetricRecord<'a> {
    name: &'a str,
    min: Option<f32>,
    max: Option<f32>,
    values: Vec<Option<f32>>,
}

#[derive(Serialize)]
struct MetricsDocument<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    metrics: Vec<MetricRecord<'a>>,
}

/// Write `{ "generated_at", "metrics": [{ name, min, max, values }] }`.
pub fn write_metrics_json<'a>(
    metrics: impl IntoIterator<Item = &'a Metric>,
    writer: &mut dyn Write,
) -> Result<()> {
    let metrics = metrics
        .into_iter()
        .map(|metric| {
            let range = metric.value_range();
            MetricRecord {
                name: &metric.name,
                min: range.map(|(min, _)| min),
                max: range.map(|(_, max)| max),
                values: metric
                    .values
                    .iter()
                    .map(|&v| v.is_finite().then_some(v))
                    .collect(),
            }
        })
        .collect();
    let document = MetricsDocument {
        generated_at: chrono::Utc::now(),
        metrics,
    };
    serde_json::to_writer_pretty(&mut *writer, &document)?;
    writeln!(writer)?;
    Ok(())
}

/// Write a `node,<metric>...` header and one row per node index.
pub fn write_metrics_csv<'a>(
    metrics: impl IntoIterator<Item = &'a Metric>,
    writer: &mut dyn Write,
) -> Result<()> {
    let metrics: Vec<&Metric> = metrics.into_iter().collect();
    let rows = metrics.iter().map(|m| m.values.len()).max().unwrap_or(0);

    write!(writer, "node")?;
    for metric in &metrics {
        write!(writer, ",{}", csv_field(&metric.name))?;
    }
    writeln!(writer)?;

    for node in 0..rows {
        write!(writer, "{node}")?;
        for metric in &metrics {
            match metric.values.get(node) {
                Some(v) if v.is_nan() => write!(writer, ",")?,
                Some(v) => write!(writer, ",{v}")?,
                None => write!(writer, ",")?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Metric> {
        vec![
            Metric::new("Depth", vec![0.0, 1.0, f32::NAN]),
            Metric::new("Integration", vec![f32::INFINITY, 0.5, f32::NAN]),
        ]
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_metrics_csv(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "node,Depth,Integration\n0,0,inf\n1,1,0.5\n2,,\n");
    }

    #[test]
    fn test_json_nulls_for_undefined() {
        let mut out = Vec::new();
        write_metrics_json(&sample(), &mut out).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();

        let depth = &parsed["metrics"][0];
        assert_eq!(depth["name"], "Depth");
        assert_eq!(depth["values"], serde_json::json!([0.0, 1.0, null]));
        assert_eq!(depth["max"], 1.0);

        let integration = &parsed["metrics"][1];
        assert_eq!(integration["values"][0], serde_json::Value::Null);
        assert_eq!(integration["min"], 0.5);
        assert_eq!(integration["max"], 0.5);
    }

    #[test]
    fn test_csv_quotes_names() {
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("plain"), "plain");
    }
}
