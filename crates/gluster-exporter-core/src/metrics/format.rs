//! Prometheus text exposition format renderer.

use std::fmt::Write;

use super::{Desc, Sample};

/// Content type of the rendered output.
pub const TEXT_FORMAT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Renders samples grouped by family, families in order of first
/// appearance. `# HELP` and `# TYPE` are written once per family.
pub fn render_samples(samples: &[Sample]) -> String {
    let mut families: Vec<(&'static Desc, Vec<&Sample>)> = Vec::new();
    for sample in samples {
        match families
            .iter_mut()
            .find(|(desc, _)| std::ptr::eq(*desc, sample.desc))
        {
            Some((_, members)) => members.push(sample),
            None => families.push((sample.desc, vec![sample])),
        }
    }

    let mut output = String::new();
    for (desc, members) in families {
        let name = desc.fq_name();
        let _ = writeln!(output, "# HELP {} {}", name, escape_help(desc.help));
        let _ = writeln!(output, "# TYPE {} {}", name, desc.metric_type.as_str());

        for sample in members {
            if desc.labels.is_empty() {
                let _ = writeln!(output, "{} {}", name, format_value(sample.value));
            } else {
                let labels: Vec<String> = desc
                    .labels
                    .iter()
                    .zip(&sample.label_values)
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label_value(v)))
                    .collect();
                let _ = writeln!(
                    output,
                    "{}{{{}}} {}",
                    name,
                    labels.join(","),
                    format_value(sample.value)
                );
            }
        }
    }

    output
}

fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v.is_sign_positive() { "+Inf" } else { "-Inf" }.to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{:.0}", v)
    } else {
        format!("{}", v)
    }
}
