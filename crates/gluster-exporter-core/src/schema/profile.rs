//! `gluster volume profile <volume> info cumulative`.

use serde::Deserialize;
use serde_json::Value;

use super::{CliStatus, DecodeError, cli_output, decode_at, one_or_many, or_default};

/// Decoded cumulative profile of one volume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeProfile {
    pub status: CliStatus,
    pub volname: String,
    pub brick_count: String,
    pub bricks: Vec<BrickProfile>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrickProfile {
    /// `hostname:path` of the brick.
    pub brick_name: String,
    #[serde(rename = "cumulativeStats", deserialize_with = "or_default")]
    pub cumulative: CumulativeStats,
}

/// Counters accumulated since profiling was started on the brick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CumulativeStats {
    /// Seconds.
    pub duration: String,
    /// Bytes.
    pub total_read: String,
    /// Bytes.
    pub total_write: String,
    #[serde(deserialize_with = "or_default")]
    fop_stats: FopStats,
}

impl CumulativeStats {
    pub fn fops(&self) -> &[Fop] {
        &self.fop_stats.fop
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct FopStats {
    #[serde(default, deserialize_with = "one_or_many")]
    fop: Vec<Fop>,
}

/// Statistics of one file operation type. Latencies are in the unit
/// gluster reports (microseconds) and are not rescaled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fop {
    pub name: String,
    pub hits: String,
    pub avg_latency: String,
    pub min_latency: String,
    pub max_latency: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VolProfile {
    volname: String,
    brick_count: String,
    #[serde(deserialize_with = "one_or_many")]
    brick: Vec<BrickProfile>,
}

pub fn decode_volume_profile(doc: &Value) -> Result<VolumeProfile, DecodeError> {
    let cli = cli_output(doc)?;
    let profile: VolProfile = decode_at(cli, "/volProfile")?;
    Ok(VolumeProfile {
        status: CliStatus::decode(cli)?,
        volname: profile.volname,
        brick_count: profile.brick_count,
        bricks: profile.brick,
    })
}
