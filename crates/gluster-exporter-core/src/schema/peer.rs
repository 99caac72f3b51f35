//! `gluster peer status`.

use serde::Deserialize;
use serde_json::Value;

use super::{CliStatus, DecodeError, cli_output, decode_at, one_or_many};

/// Decoded `gluster peer status`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerStatus {
    pub status: CliStatus,
    /// Other members of the trusted pool; the local node is not listed.
    pub peers: Vec<Peer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Peer {
    pub uuid: String,
    pub hostname: String,
    /// `1` when connected.
    pub connected: String,
    pub state: String,
    pub state_str: String,
}

#[derive(Debug, Default, Deserialize)]
struct Peers {
    #[serde(default, deserialize_with = "one_or_many")]
    peer: Vec<Peer>,
}

pub fn decode_peer_status(doc: &Value) -> Result<PeerStatus, DecodeError> {
    let cli = cli_output(doc)?;
    let peers: Peers = decode_at(cli, "/peerStatus")?;
    Ok(PeerStatus {
        status: CliStatus::decode(cli)?,
        peers: peers.peer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::scenarios::PEER_STATUS;
    use crate::xml::normalize;

    #[test]
    fn test_decode_peer_status() {
        let status = decode_peer_status(&normalize(PEER_STATUS.as_bytes()).unwrap()).unwrap();

        assert_eq!(status.peers.len(), 2);
        assert_eq!(status.peers[0].hostname, "node2");
        assert_eq!(status.peers[0].connected, "1");
        assert_eq!(status.peers[0].state_str, "Peer in Cluster");
        assert_eq!(status.peers[1].hostname, "node3");
    }

    #[test]
    fn test_decode_peer_status_no_peers() {
        let xml = "<cliOutput><opRet>0</opRet><opErrno>0</opErrno><opErrstr/><peerStatus/></cliOutput>";
        let status = decode_peer_status(&normalize(xml.as_bytes()).unwrap()).unwrap();
        assert!(status.peers.is_empty());
    }
}
