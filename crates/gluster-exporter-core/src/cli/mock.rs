//! In-memory command surface for testing the collector without gluster.
//!
//! `MockCli` answers invocations from a table of canned outputs keyed by
//! the full command line. Anything not in the table fails as if the program
//! were not installed.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use super::query::XML_FLAG;
use super::runner::{CommandError, CommandOutput, CommandRunner};

/// Canned command runner.
#[derive(Debug, Clone, Default)]
pub struct MockCli {
    responses: HashMap<String, CommandOutput>,
    /// Invocations in the order they happened, shared between clones.
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockCli {
    /// Creates a mock that knows no commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the output of `program args...`.
    pub fn add_response(&mut self, program: &str, args: &[&str], output: CommandOutput) {
        self.responses.insert(command_line(program, args), output);
    }

    /// Registers successful XML output for a `gluster` subcommand.
    /// The XML flag is appended to `args`.
    pub fn add_gluster(&mut self, args: &[&str], xml: &str) {
        let mut args = args.to_vec();
        args.push(XML_FLAG);
        self.add_response("gluster", &args, CommandOutput::success(xml));
    }

    /// Forgets the output of `program args...`, making it unreachable.
    pub fn remove_response(&mut self, program: &str, args: &[&str]) {
        self.responses.remove(&command_line(program, args));
    }

    /// Command lines executed so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for MockCli {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        let line = command_line(program, args);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(line.clone());
        }
        self.responses
            .get(&line)
            .cloned()
            .ok_or_else(|| CommandError::Spawn {
                program: program.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            })
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_commands() {
        let mut mock = MockCli::new();
        mock.add_response("mount", &["-t", "fuse.glusterfs"], CommandOutput::success("x"));

        let out = mock.run("mount", &["-t", "fuse.glusterfs"]).unwrap();
        assert_eq!(out.output, b"x");
        assert!(mock.run("mount", &[]).is_err());

        assert_eq!(
            mock.calls(),
            vec!["mount -t fuse.glusterfs".to_string(), "mount".to_string()]
        );
    }

    #[test]
    fn test_clones_share_call_log() {
        let mock = MockCli::new();
        let clone = mock.clone();
        let _ = clone.run("gluster", &["peer", "status", "--xml"]);
        assert_eq!(mock.calls().len(), 1);
    }

    #[test]
    fn test_remove_response() {
        let mut mock = MockCli::new();
        mock.add_gluster(&["volume", "list"], "<cliOutput/>");
        mock.remove_response("gluster", &["volume", "list", "--xml"]);
        assert!(mock.run("gluster", &["volume", "list", "--xml"]).is_err());
    }
}
