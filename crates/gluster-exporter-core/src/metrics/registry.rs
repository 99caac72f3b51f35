//! Registry of metric collectors.
//!
//! Built once at startup and shared with the HTTP handler; every scrape
//! calls [`Registry::gather`] which runs each collector in turn.

use std::collections::HashSet;

use tracing::debug;

use super::{Desc, Sample, render_samples};

/// A source of samples.
pub trait Collect: Send + Sync {
    /// All metric families this collector may produce.
    fn describe(&self) -> Vec<&'static Desc>;

    /// Produces the current samples.
    fn collect(&self) -> Vec<Sample>;
}

/// Error type for registration failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two collectors describe the same family.
    Duplicate(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::Duplicate(name) => {
                write!(f, "metric family {} is already registered", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

/// Explicit collection of registered collectors.
#[derive(Default)]
pub struct Registry {
    collectors: Vec<Box<dyn Collect>>,
    families: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a collector. Fails if any of its families is already
    /// provided by another collector.
    pub fn register(&mut self, collector: Box<dyn Collect>) -> Result<(), RegistryError> {
        let names: Vec<String> = collector.describe().iter().map(|d| d.fq_name()).collect();
        let mut seen = HashSet::new();
        for name in &names {
            if self.families.contains(name) || !seen.insert(name.as_str()) {
                return Err(RegistryError::Duplicate(name.clone()));
            }
        }
        self.families.extend(names);
        self.collectors.push(collector);
        Ok(())
    }

    /// Number of registered metric families.
    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    /// Runs every collector and returns all samples.
    pub fn gather(&self) -> Vec<Sample> {
        let mut samples = Vec::new();
        for collector in &self.collectors {
            samples.extend(collector.collect());
        }
        debug!(samples = samples.len(), "gathered samples");
        samples
    }

    /// Gathers and renders in the text exposition format.
    pub fn render(&self) -> String {
        render_samples(&self.gather())
    }
}
