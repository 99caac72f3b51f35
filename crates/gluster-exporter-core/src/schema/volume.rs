//! `gluster volume info` and `gluster volume list`.

use serde::Deserialize;
use serde_json::Value;

use super::{CliStatus, DecodeError, cli_output, decode_at, one_or_many, or_default};
use crate::xml::strip_root;

/// Decoded `gluster volume info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeInfo {
    pub status: CliStatus,
    /// Declared number of volumes.
    pub count: String,
    pub volumes: Vec<Volume>,
}

/// A volume as described by `gluster volume info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    pub name: String,
    pub id: String,
    /// Numeric status code (`1` = started).
    pub status: String,
    pub status_str: String,
    pub type_str: String,
    /// Declared brick count. May disagree with `bricks.len()`.
    pub brick_count: String,
    pub dist_count: String,
    pub replica_count: String,
    #[serde(deserialize_with = "or_default")]
    bricks: Bricks,
}

impl Volume {
    pub fn bricks(&self) -> &[Brick] {
        &self.bricks.brick
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
struct Bricks {
    #[serde(default, deserialize_with = "one_or_many")]
    brick: Vec<Brick>,
}

/// A brick of a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brick {
    #[serde(rename = "-uuid")]
    pub uuid: String,
    /// Conventionally `hostname:path`.
    pub name: String,
    pub host_uuid: String,
    pub is_arbiter: String,
}

impl Brick {
    pub fn is_arbiter(&self) -> bool {
        self.is_arbiter.trim() == "1"
    }
}

#[derive(Debug, Default, Deserialize)]
struct Volumes {
    #[serde(default)]
    count: String,
    #[serde(default, deserialize_with = "one_or_many")]
    volume: Vec<Volume>,
}

pub fn decode_volume_info(doc: &Value) -> Result<VolumeInfo, DecodeError> {
    let cli = cli_output(doc)?;
    let volumes: Volumes = decode_at(cli, "/volInfo/volumes")?;
    Ok(VolumeInfo {
        status: CliStatus::decode(cli)?,
        count: volumes.count,
        volumes: volumes.volume,
    })
}

/// Decoded `gluster volume list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeList {
    pub status: CliStatus,
    pub count: String,
    pub volumes: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VolList {
    #[serde(default)]
    count: String,
    #[serde(default, deserialize_with = "one_or_many")]
    volume: Vec<String>,
}

/// Decodes `gluster volume list`, which is read relative to its root element.
pub fn decode_volume_list(doc: &Value) -> Result<VolumeList, DecodeError> {
    let cli = strip_root(doc.clone())?;
    let list: VolList = decode_at(&cli, "/volList")?;
    Ok(VolumeList {
        status: CliStatus::decode(&cli)?,
        count: list.count,
        volumes: list.volume,
    })
}
