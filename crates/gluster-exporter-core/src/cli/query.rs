//! Query kinds and their execution against the `gluster` binary.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

use super::runner::{CommandError, CommandRunner};
use crate::schema::{
    self, DecodeError, FieldParseError, HealInfo, PeerStatus, QuotaList, VolumeInfo, VolumeList,
    VolumeProfile, VolumeStatus,
};
use crate::xml;

/// Flag appended to every invocation to request structured output.
pub const XML_FLAG: &str = "--xml";

/// One of the status queries the collector issues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    VolumeInfo,
    VolumeList,
    PeerStatus,
    VolumeProfile(String),
    VolumeStatusAllDetail,
    HealInfo(String),
    QuotaList(String),
}

impl Query {
    /// Subcommand arguments, without the XML flag.
    pub fn args(&self) -> Vec<&str> {
        match self {
            Query::VolumeInfo => vec!["volume", "info"],
            Query::VolumeList => vec!["volume", "list"],
            Query::PeerStatus => vec!["peer", "status"],
            Query::VolumeProfile(volume) => {
                vec!["volume", "profile", volume.as_str(), "info", "cumulative"]
            }
            Query::VolumeStatusAllDetail => vec!["volume", "status", "all", "detail"],
            Query::HealInfo(volume) => vec!["volume", "heal", volume.as_str(), "info"],
            Query::QuotaList(volume) => vec!["volume", "quota", volume.as_str(), "list"],
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gluster {}", self.args().join(" "))
    }
}

/// Error type for a failed query.
#[derive(Debug)]
pub enum QueryError {
    /// The command could not be run or timed out.
    Execution(CommandError),
    /// The command exited nonzero and its output could not be decoded.
    Exit { code: Option<i32>, output: String },
    /// The output did not have the expected shape.
    Decode(DecodeError),
    /// A text field did not hold a number.
    Parse(FieldParseError),
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Execution(e) => write!(f, "{}", e),
            QueryError::Exit { code, output } => match code {
                Some(code) => write!(f, "exited with code {}: {}", code, output),
                None => write!(f, "terminated by signal: {}", output),
            },
            QueryError::Decode(e) => write!(f, "{}", e),
            QueryError::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for QueryError {}

impl From<CommandError> for QueryError {
    fn from(e: CommandError) -> Self {
        QueryError::Execution(e)
    }
}

impl From<DecodeError> for QueryError {
    fn from(e: DecodeError) -> Self {
        QueryError::Decode(e)
    }
}

impl From<FieldParseError> for QueryError {
    fn from(e: FieldParseError) -> Self {
        QueryError::Parse(e)
    }
}

/// Client for the `gluster` command line.
pub struct GlusterCli<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> GlusterCli<R> {
    /// Creates a client invoking `program` (usually `gluster`) through `runner`.
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs a query and returns its output as a generic document.
    ///
    /// A nonzero exit alone does not fail the query: gluster reports most
    /// failures inside the XML (`opErrno`), which the caller inspects.
    pub fn fetch(&self, query: &Query) -> Result<Value, QueryError> {
        let mut args = query.args();
        args.push(XML_FLAG);

        debug!(%query, "running query");
        let out = self.runner.run(&self.program, &args)?;
        if !out.is_success() {
            warn!(%query, code = ?out.code, output = %out.text().trim(), "gluster exited with failure");
        }

        match xml::normalize(&out.output) {
            Ok(doc) => Ok(doc),
            Err(_) if !out.is_success() => Err(QueryError::Exit {
                code: out.code,
                output: out.text().trim().to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    pub fn volume_info(&self) -> Result<VolumeInfo, QueryError> {
        let doc = self.fetch(&Query::VolumeInfo)?;
        Ok(schema::decode_volume_info(&doc)?)
    }

    pub fn volume_list(&self) -> Result<VolumeList, QueryError> {
        let doc = self.fetch(&Query::VolumeList)?;
        Ok(schema::decode_volume_list(&doc)?)
    }

    pub fn peer_status(&self) -> Result<PeerStatus, QueryError> {
        let doc = self.fetch(&Query::PeerStatus)?;
        Ok(schema::decode_peer_status(&doc)?)
    }

    pub fn volume_profile(&self, volume: &str) -> Result<VolumeProfile, QueryError> {
        let doc = self.fetch(&Query::VolumeProfile(volume.to_string()))?;
        Ok(schema::decode_volume_profile(&doc)?)
    }

    pub fn volume_status(&self) -> Result<VolumeStatus, QueryError> {
        let doc = self.fetch(&Query::VolumeStatusAllDetail)?;
        Ok(schema::decode_volume_status(&doc)?)
    }

    pub fn heal_info(&self, volume: &str) -> Result<HealInfo, QueryError> {
        let doc = self.fetch(&Query::HealInfo(volume.to_string()))?;
        Ok(schema::decode_heal_info(&doc)?)
    }

    /// Number of entries of `volume` pending heal, summed over its bricks.
    pub fn heal_entries(&self, volume: &str) -> Result<u64, QueryError> {
        Ok(self.heal_info(volume)?.entries_out_of_sync()?)
    }

    pub fn quota_list(&self, volume: &str) -> Result<QuotaList, QueryError> {
        let doc = self.fetch(&Query::QuotaList(volume.to_string()))?;
        Ok(schema::decode_quota_list(&doc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::mock::MockCli;
    use crate::cli::runner::CommandOutput;
    use crate::cli::scenarios::{HEAL_INFO_DISCONNECTED, HEAL_INFO_GV0, VOLUME_INFO_TWO_VOLUMES};

    #[test]
    fn test_query_args() {
        assert_eq!(Query::VolumeInfo.args(), vec!["volume", "info"]);
        assert_eq!(
            Query::VolumeProfile("gv0".into()).args(),
            vec!["volume", "profile", "gv0", "info", "cumulative"]
        );
        assert_eq!(
            Query::HealInfo("gv0".into()).to_string(),
            "gluster volume heal gv0 info"
        );
    }

    #[test]
    fn test_fetch_appends_xml_flag() {
        let mut mock = MockCli::new();
        mock.add_gluster(&["volume", "info"], VOLUME_INFO_TWO_VOLUMES);
        let cli = GlusterCli::new(mock, "gluster");

        let info = cli.volume_info().unwrap();
        assert_eq!(info.volumes.len(), 2);
        assert_eq!(
            cli.runner().calls(),
            vec!["gluster volume info --xml".to_string()]
        );
    }

    #[test]
    fn test_nonzero_exit_with_xml_is_decoded() {
        let xml = "<cliOutput><opRet>-1</opRet><opErrno>30800</opErrno><opErrstr>Another transaction is in progress</opErrstr></cliOutput>";
        let mut mock = MockCli::new();
        mock.add_response("gluster", &["volume", "info", "--xml"], CommandOutput::failure(1, xml));
        let cli = GlusterCli::new(mock, "gluster");

        let info = cli.volume_info().unwrap();
        assert_eq!(info.status.op_errno, "30800");
    }

    #[test]
    fn test_nonzero_exit_without_xml() {
        let mut mock = MockCli::new();
        mock.add_response(
            "gluster",
            &["peer", "status", "--xml"],
            CommandOutput::failure(1, "Connection failed. Please check if gluster daemon is operational.\n"),
        );
        let cli = GlusterCli::new(mock, "gluster");

        let err = cli.peer_status().unwrap_err();
        assert!(matches!(err, QueryError::Exit { code: Some(1), .. }));
        assert!(err.to_string().contains("Connection failed"));
    }

    #[test]
    fn test_unreachable_binary() {
        let cli = GlusterCli::new(MockCli::new(), "gluster");
        assert!(matches!(
            cli.volume_info(),
            Err(QueryError::Execution(CommandError::Spawn { .. }))
        ));
    }

    #[test]
    fn test_successful_exit_with_garbage() {
        let mut mock = MockCli::new();
        mock.add_gluster(&["volume", "info"], "not xml at all");
        let cli = GlusterCli::new(mock, "gluster");
        assert!(matches!(cli.volume_info(), Err(QueryError::Decode(_))));
    }

    #[test]
    fn test_heal_entries() {
        let mut mock = MockCli::new();
        mock.add_gluster(&["volume", "heal", "gv0", "info"], HEAL_INFO_GV0);
        mock.add_gluster(&["volume", "heal", "gv1", "info"], HEAL_INFO_DISCONNECTED);
        let cli = GlusterCli::new(mock, "gluster");

        assert_eq!(cli.heal_entries("gv0").unwrap(), 5);
        assert!(matches!(cli.heal_entries("gv1"), Err(QueryError::Parse(_))));
    }
}
