//! `gluster volume heal <volume> info`.

use serde::Deserialize;
use serde_json::Value;

use super::{CliStatus, DecodeError, FieldParseError, cli_output, decode_at, one_or_many, parse_u64};

const ENTRIES_FIELD: &str = "numberOfEntries";

/// Decoded heal info of one volume.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealInfo {
    pub status: CliStatus,
    pub bricks: Vec<HealBrick>,
}

impl HealInfo {
    /// Sum of entries pending heal across all bricks.
    ///
    /// A single brick whose count is not a number (`-` for a disconnected
    /// brick), or a sum that does not fit in `u64`, fails the whole sum.
    pub fn entries_out_of_sync(&self) -> Result<u64, FieldParseError> {
        self.bricks.iter().try_fold(0u64, |total, brick| {
            let entries = parse_u64(ENTRIES_FIELD, &brick.number_of_entries)?;
            total.checked_add(entries).ok_or_else(|| FieldParseError {
                field: ENTRIES_FIELD,
                value: brick.number_of_entries.clone(),
            })
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HealBrick {
    #[serde(rename = "-hostUuid")]
    pub host_uuid: String,
    pub name: String,
    pub status: String,
    pub number_of_entries: String,
}

#[derive(Debug, Default, Deserialize)]
struct Bricks {
    #[serde(default, deserialize_with = "one_or_many")]
    brick: Vec<HealBrick>,
}

pub fn decode_heal_info(doc: &Value) -> Result<HealInfo, DecodeError> {
    let cli = cli_output(doc)?;
    let bricks: Bricks = decode_at(cli, "/healInfo/bricks")?;
    Ok(HealInfo {
        status: CliStatus::decode(cli)?,
        bricks: bricks.brick,
    })
}
