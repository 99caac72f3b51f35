//! `gluster volume quota <volume> list`.

use serde::Deserialize;
use serde_json::Value;

use super::{CliStatus, DecodeError, cli_output, decode_at, one_or_many};

/// Flag value gluster prints for a limit that is not exceeded.
const NOT_EXCEEDED: &str = "No";

/// Decoded quota limits of one volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotaList {
    pub status: CliStatus,
    pub limits: Vec<QuotaLimit>,
}

/// A quota configured on a directory of a volume. Sizes are in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuotaLimit {
    pub path: String,
    pub hard_limit: String,
    pub soft_limit_percent: String,
    pub soft_limit_value: String,
    pub used_space: String,
    pub avail_space: String,
    pub sl_exceeded: String,
    pub hl_exceeded: String,
}

impl QuotaLimit {
    /// Anything but `No` counts as exceeded.
    pub fn soft_limit_exceeded(&self) -> bool {
        self.sl_exceeded != NOT_EXCEEDED
    }

    pub fn hard_limit_exceeded(&self) -> bool {
        self.hl_exceeded != NOT_EXCEEDED
    }
}

#[derive(Debug, Default, Deserialize)]
struct VolQuota {
    #[serde(default, deserialize_with = "one_or_many")]
    limit: Vec<QuotaLimit>,
}

pub fn decode_quota_list(doc: &Value) -> Result<QuotaList, DecodeError> {
    let cli = cli_output(doc)?;
    let quota: VolQuota = decode_at(cli, "/volQuota")?;
    Ok(QuotaList {
        status: CliStatus::decode(cli)?,
        limits: quota.limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::scenarios::QUOTA_LIST_GV0;
    use crate::xml::normalize;

    #[test]
    fn test_decode_quota_list() {
        let list = decode_quota_list(&normalize(QUOTA_LIST_GV0.as_bytes()).unwrap()).unwrap();

        assert_eq!(list.limits.len(), 2);
        let home = &list.limits[0];
        assert_eq!(home.path, "/home");
        assert_eq!(home.hard_limit, "10737418240");
        assert_eq!(home.soft_limit_percent, "80%");
        assert_eq!(home.soft_limit_value, "8589934592");
        assert_eq!(home.used_space, "9663676416");
        assert_eq!(home.avail_space, "1073741824");
        assert!(home.soft_limit_exceeded());
        assert!(!home.hard_limit_exceeded());
    }

    #[test]
    fn test_exceeded_flags() {
        let limit = QuotaLimit {
            sl_exceeded: "No".into(),
            hl_exceeded: "Yes".into(),
            ..Default::default()
        };
        assert!(!limit.soft_limit_exceeded());
        assert!(limit.hard_limit_exceeded());
    }
}
