//! `gluster volume status all detail`.

use serde::Deserialize;
use serde_json::Value;

use super::{CliStatus, DecodeError, cli_output, decode_at, one_or_many};

/// Decoded `gluster volume status all detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeStatus {
    pub status: CliStatus,
    pub volumes: Vec<VolumeStatusEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeStatusEntry {
    pub vol_name: String,
    pub node_count: String,
    #[serde(rename = "node", deserialize_with = "one_or_many")]
    pub nodes: Vec<VolumeStatusNode>,
}

/// One brick process (or self-heal/NFS daemon) of a volume on a node.
///
/// Size and inode fields are text; daemons other than bricks report none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VolumeStatusNode {
    pub hostname: String,
    pub path: String,
    pub peerid: String,
    pub status: String,
    pub port: String,
    pub pid: String,
    pub size_total: String,
    pub size_free: String,
    pub device: String,
    pub block_size: String,
    pub mnt_options: String,
    pub fs_name: String,
    pub inodes_total: String,
    pub inodes_free: String,
}

#[derive(Debug, Default, Deserialize)]
struct Volumes {
    #[serde(default, deserialize_with = "one_or_many")]
    volume: Vec<VolumeStatusEntry>,
}

pub fn decode_volume_status(doc: &Value) -> Result<VolumeStatus, DecodeError> {
    let cli = cli_output(doc)?;
    let volumes: Volumes = decode_at(cli, "/volStatus/volumes")?;
    Ok(VolumeStatus {
        status: CliStatus::decode(cli)?,
        volumes: volumes.volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::scenarios::VOLUME_STATUS_DETAIL;
    use crate::xml::normalize;

    #[test]
    fn test_decode_volume_status() {
        let doc = normalize(VOLUME_STATUS_DETAIL.as_bytes()).unwrap();
        let status = decode_volume_status(&doc).unwrap();

        assert_eq!(status.volumes.len(), 2);
        let gv0 = &status.volumes[0];
        assert_eq!(gv0.vol_name, "gv0");
        assert_eq!(gv0.nodes.len(), 2);
        assert_eq!(gv0.nodes[0].hostname, "node1");
        assert_eq!(gv0.nodes[0].path, "/data/gv0/brick1");
        assert_eq!(gv0.nodes[0].size_total, "107374182400");
        assert_eq!(gv0.nodes[0].size_free, "53687091200");
        assert_eq!(gv0.nodes[0].inodes_total, "52428800");
        assert_eq!(gv0.nodes[0].inodes_free, "52428000");

        // Self-heal daemon entry carries no sizes.
        assert_eq!(gv0.nodes[1].hostname, "Self-heal Daemon");
        assert!(gv0.nodes[1].size_total.is_empty());

        assert_eq!(status.volumes[1].nodes.len(), 1);
    }
}
