//! gluster-exporter-core: collection pipeline for the GlusterFS exporter.
//!
//! Provides:
//! - `cli`: invocation of the `gluster` command surface (real and mocked)
//! - `xml`: conversion of `--xml` output into a generic JSON document
//! - `schema`: typed decoders, one per query kind
//! - `mount`: mount table parsing and writability probing
//! - `collector`: one full collection cycle producing metric samples
//! - `metrics`: metric descriptors, registry, text exposition rendering

pub mod cli;
pub mod collector;
pub mod metrics;
pub mod mount;
pub mod schema;
pub mod xml;

pub use collector::{BuildInfoCollector, CollectorConfig, GlusterCollector, VolumeScope};
pub use metrics::{Collect, Registry};

/// Crate version reported by the build info metric.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git revision embedded by `build.rs`.
pub const GIT_SHA: &str = env!("GIT_SHA");
