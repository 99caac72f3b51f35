//! Typed decoders for normalized `gluster --xml` documents.
//!
//! One decoder per query kind. Numeric fields stay text here: the
//! collector coerces them when it emits a sample, so a field that exists
//! but holds `N/A` or `-` degrades to "value absent" instead of failing
//! the whole document.

pub mod heal;
pub mod peer;
pub mod profile;
pub mod quota;
pub mod status;
pub mod volume;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

pub use crate::xml::DecodeError;
pub use heal::{HealBrick, HealInfo, decode_heal_info};
pub use peer::{Peer, PeerStatus, decode_peer_status};
pub use profile::{BrickProfile, CumulativeStats, Fop, VolumeProfile, decode_volume_profile};
pub use quota::{QuotaLimit, QuotaList, decode_quota_list};
pub use status::{VolumeStatus, VolumeStatusEntry, VolumeStatusNode, decode_volume_status};
pub use volume::{Brick, Volume, VolumeInfo, VolumeList, decode_volume_info, decode_volume_list};

/// Root element of every gluster XML document.
pub const CLI_OUTPUT: &str = "cliOutput";

/// Operation result header present in every response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CliStatus {
    pub op_ret: String,
    /// Nonzero when glusterd reported a failure.
    pub op_errno: String,
    pub op_errstr: String,
}

impl CliStatus {
    pub fn decode(cli: &Value) -> Result<Self, DecodeError> {
        decode_lenient(cli)
    }
}

/// A text field that did not hold the expected number, or a value that
/// is out of range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldParseError {
    pub field: &'static str,
    pub value: String,
}

impl std::fmt::Display for FieldParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} is not a valid number: {:?}", self.field, self.value)
    }
}

impl std::error::Error for FieldParseError {}

/// Parses an unsigned integer carried as text.
pub fn parse_u64(field: &'static str, text: &str) -> Result<u64, FieldParseError> {
    text.trim().parse().map_err(|_| FieldParseError {
        field,
        value: text.to_string(),
    })
}

/// Parses a float carried as text.
pub fn parse_f64(field: &'static str, text: &str) -> Result<f64, FieldParseError> {
    text.trim().parse().map_err(|_| FieldParseError {
        field,
        value: text.to_string(),
    })
}

/// Returns the `cliOutput` element of a normalized document.
pub fn cli_output(doc: &Value) -> Result<&Value, DecodeError> {
    doc.get(CLI_OUTPUT)
        .ok_or(DecodeError::MissingElement(CLI_OUTPUT))
}

/// Decodes the node at `pointer` below `node`. A missing node decodes as
/// the default value: gluster omits payload elements on failed operations.
pub(crate) fn decode_at<T>(node: &Value, pointer: &str) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Default,
{
    match node.pointer(pointer) {
        Some(value) => decode_lenient(value),
        None => Ok(T::default()),
    }
}

/// Decodes a value, treating an empty element as the default value.
pub(crate) fn decode_lenient<T>(value: &Value) -> Result<T, DecodeError>
where
    T: DeserializeOwned + Default,
{
    if is_empty_element(value) {
        return Ok(T::default());
    }
    Ok(T::deserialize(value)?)
}

fn is_empty_element(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Deserializes a repeated element, which normalizes to an array when it
/// occurs more than once and to a single value otherwise.
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| T::deserialize(item).map_err(de::Error::custom))
            .collect(),
        value if is_empty_element(&value) => Ok(Vec::new()),
        value => T::deserialize(value)
            .map(|item| vec![item])
            .map_err(de::Error::custom),
    }
}

/// Deserializes a nested element, accepting an empty element as default.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    if is_empty_element(&value) {
        return Ok(T::default());
    }
    T::deserialize(value).map_err(de::Error::custom)
}
