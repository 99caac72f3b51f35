//! Build information of the exporter itself.

use crate::metrics::{Collect, Desc, MetricType, Sample};

pub static BUILD_INFO: Desc = Desc {
    namespace: "gluster_exporter",
    name: "build_info",
    help: "A metric with a constant '1' value labeled by version and revision of the exporter.",
    metric_type: MetricType::Gauge,
    labels: &["version", "revision"],
};

/// Reports the crate version and git revision as labels of a constant gauge.
#[derive(Debug, Clone)]
pub struct BuildInfoCollector {
    version: String,
    revision: String,
}

impl BuildInfoCollector {
    pub fn new(version: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            revision: revision.into(),
        }
    }
}

impl Default for BuildInfoCollector {
    fn default() -> Self {
        Self::new(crate::VERSION, crate::GIT_SHA)
    }
}

impl Collect for BuildInfoCollector {
    fn describe(&self) -> Vec<&'static Desc> {
        vec![&BUILD_INFO]
    }

    fn collect(&self) -> Vec<Sample> {
        vec![Sample::new(&BUILD_INFO, 1.0, &[&self.version, &self.revision])]
    }
}
