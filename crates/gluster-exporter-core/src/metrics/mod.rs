//! Metric descriptors, samples and the registry that gathers them.
//!
//! Families are declared as `static Desc` values; collectors produce
//! `Sample`s pointing at those descriptors, and the registry renders them
//! in the Prometheus text exposition format.

mod format;
mod registry;

pub use format::{TEXT_FORMAT, render_samples};
pub use registry::{Collect, Registry, RegistryError};

/// Prometheus metric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
        }
    }
}

/// Description of a metric family.
#[derive(Debug)]
pub struct Desc {
    pub namespace: &'static str,
    pub name: &'static str,
    pub help: &'static str,
    pub metric_type: MetricType,
    /// Label names, in the order label values are given.
    pub labels: &'static [&'static str],
}

impl Desc {
    /// Fully qualified name, `namespace_name`.
    pub fn fq_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.to_string()
        } else {
            format!("{}_{}", self.namespace, self.name)
        }
    }
}

/// One observation of a metric family.
#[derive(Debug, Clone)]
pub struct Sample {
    pub desc: &'static Desc,
    pub label_values: Vec<String>,
    pub value: f64,
}

impl Sample {
    /// Creates a sample. `label_values` must match `desc.labels` in length.
    pub fn new(desc: &'static Desc, value: f64, label_values: &[&str]) -> Self {
        debug_assert_eq!(
            desc.labels.len(),
            label_values.len(),
            "label values do not match {}",
            desc.name
        );
        Self {
            desc,
            label_values: label_values.iter().map(|v| v.to_string()).collect(),
            value,
        }
    }

    /// Label value by name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.desc
            .labels
            .iter()
            .position(|l| *l == name)
            .and_then(|i| self.label_values.get(i))
            .map(String::as_str)
    }
}
