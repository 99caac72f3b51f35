//! Mount table inspection and writability probing of mounted volumes.
//!
//! The mount table is read with `mount -t fuse.glusterfs`, whose lines look
//! like:
//!
//! ```text
//! node1:/gv0 on /mnt/gv0 type fuse.glusterfs (rw,relatime,...)
//! ```
//!
//! The first column is the mounted volume, the third the mount point.

mod fs;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::debug;

pub use fs::{FileSystem, RealFs};

use crate::cli::{CommandError, CommandRunner};

/// Filesystem type of native GlusterFS client mounts.
pub const MOUNT_FS_TYPE: &str = "fuse.glusterfs";

/// Prefix of the marker file created by the writability probe.
const MARKER_PREFIX: &str = "gluster_mount.test";

/// A mounted volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
    /// Mount source, e.g. `node1:/gv0`.
    pub volume: String,
    pub mount_point: String,
}

/// Error type for mount table and writability probes.
#[derive(Debug)]
pub enum ProbeError {
    /// The mount table could not be queried.
    Command(CommandError),
    /// `mount` exited nonzero.
    MountTable { code: Option<i32>, output: String },
    /// The marker file could not be created.
    Create { path: PathBuf, source: std::io::Error },
    /// The marker file was created but could not be removed.
    Remove { path: PathBuf, source: std::io::Error },
}

impl std::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeError::Command(e) => write!(f, "mount table query failed: {}", e),
            ProbeError::MountTable { code, output } => {
                write!(f, "mount exited with {:?}: {}", code, output)
            }
            ProbeError::Create { path, source } => {
                write!(f, "cannot create {}: {}", path.display(), source)
            }
            ProbeError::Remove { path, source } => {
                write!(f, "cannot remove {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ProbeError {}

impl From<CommandError> for ProbeError {
    fn from(e: CommandError) -> Self {
        ProbeError::Command(e)
    }
}

/// Parses `mount` output into mount entries.
///
/// Columns are split on single spaces; lines too short to carry a mount
/// point are skipped.
pub fn parse_mount_output(output: &str) -> Vec<MountEntry> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .filter_map(|line| {
            let columns: Vec<&str> = line.trim().split(' ').collect();
            if columns.len() < 3 {
                return None;
            }
            Some(MountEntry {
                volume: columns[0].to_string(),
                mount_point: columns[2].to_string(),
            })
        })
        .collect()
}

/// Lists gluster mounts and checks whether they accept writes.
pub struct MountProbe<R: CommandRunner, F: FileSystem> {
    runner: R,
    fs: F,
}

impl<R: CommandRunner, F: FileSystem> MountProbe<R, F> {
    pub fn new(runner: R, fs: F) -> Self {
        Self { runner, fs }
    }

    /// Returns the active gluster mounts.
    pub fn list_mounts(&self) -> Result<Vec<MountEntry>, ProbeError> {
        let out = self.runner.run("mount", &["-t", MOUNT_FS_TYPE])?;
        if !out.is_success() {
            return Err(ProbeError::MountTable {
                code: out.code,
                output: out.text().trim().to_string(),
            });
        }
        Ok(parse_mount_output(&out.text()))
    }

    /// Creates and immediately removes a uniquely named file below
    /// `mount_point`. Succeeds only if both operations do.
    pub fn probe_writable(&self, mount_point: &str) -> Result<(), ProbeError> {
        let path = marker_path(Path::new(mount_point));
        debug!(path = %path.display(), "probing writability");

        self.fs
            .create_file(&path)
            .map_err(|source| ProbeError::Create {
                path: path.clone(),
                source,
            })?;
        self.fs
            .remove_file(&path)
            .map_err(|source| ProbeError::Remove { path, source })
    }
}

fn marker_path(mount_point: &Path) -> PathBuf {
    let now = Utc::now();
    let stamp = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros());
    mount_point.join(format!("{MARKER_PREFIX}_{stamp}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::scenarios::mount_line;
    use crate::cli::{CommandOutput, MockCli};
    use std::io;

    const MOUNT_OUTPUT: &str = "\
node1:/gv0 on /mnt/gv0 type fuse.glusterfs (rw,relatime,user_id=0,group_id=0,default_permissions,allow_other,max_read=131072)
node2:/gv1 on /srv/data type fuse.glusterfs (rw,relatime,user_id=0,group_id=0,default_permissions,allow_other,max_read=131072)

x
";

    /// Filesystem where nothing can be written.
    struct ReadOnlyFs;

    impl FileSystem for ReadOnlyFs {
        fn create_file(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn remove_file(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"))
        }
    }

    /// Filesystem where files can be created but never removed.
    struct StickyFs;

    impl FileSystem for StickyFs {
        fn create_file(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }

        fn remove_file(&self, _path: &Path) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "sticky"))
        }
    }

    #[test]
    fn test_parse_mount_output() {
        let mounts = parse_mount_output(MOUNT_OUTPUT);
        assert_eq!(
            mounts,
            vec![
                MountEntry {
                    volume: "node1:/gv0".into(),
                    mount_point: "/mnt/gv0".into(),
                },
                MountEntry {
                    volume: "node2:/gv1".into(),
                    mount_point: "/srv/data".into(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_mount_output_is_stable() {
        let first = parse_mount_output(MOUNT_OUTPUT);
        for _ in 0..3 {
            assert_eq!(parse_mount_output(MOUNT_OUTPUT), first);
        }
    }

    #[test]
    fn test_parse_mount_output_short_lines() {
        assert!(parse_mount_output("").is_empty());
        assert!(parse_mount_output("a b\n").is_empty());
        assert!(parse_mount_output("abc\n\n").is_empty());
    }

    #[test]
    fn test_list_mounts() {
        let mut mock = MockCli::new();
        mock.add_response(
            "mount",
            &["-t", MOUNT_FS_TYPE],
            CommandOutput::success(mount_line("gv0", "/mnt/gv0")),
        );
        let probe = MountProbe::new(mock, RealFs::new());

        let mounts = probe.list_mounts().unwrap();
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].volume, "node1:/gv0");
        assert_eq!(mounts[0].mount_point, "/mnt/gv0");
    }

    #[test]
    fn test_list_mounts_failure() {
        let mut mock = MockCli::new();
        mock.add_response(
            "mount",
            &["-t", MOUNT_FS_TYPE],
            CommandOutput::failure(32, "mount: permission denied"),
        );
        let probe = MountProbe::new(mock, RealFs::new());
        assert!(matches!(
            probe.list_mounts(),
            Err(ProbeError::MountTable { code: Some(32), .. })
        ));

        let probe = MountProbe::new(MockCli::new(), RealFs::new());
        assert!(matches!(probe.list_mounts(), Err(ProbeError::Command(_))));
    }

    #[test]
    fn test_probe_writable_leaves_no_marker() {
        let dir = tempfile::tempdir().unwrap();
        let probe = MountProbe::new(MockCli::new(), RealFs::new());

        probe
            .probe_writable(dir.path().to_str().unwrap())
            .unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_probe_not_writable() {
        let probe = MountProbe::new(MockCli::new(), ReadOnlyFs);
        assert!(matches!(
            probe.probe_writable("/mnt/gv0"),
            Err(ProbeError::Create { .. })
        ));

        let probe = MountProbe::new(MockCli::new(), StickyFs);
        assert!(matches!(
            probe.probe_writable("/mnt/gv0"),
            Err(ProbeError::Remove { .. })
        ));
    }

    #[test]
    fn test_marker_path() {
        let path = marker_path(Path::new("/mnt/gv0"));
        assert!(path.starts_with("/mnt/gv0"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("gluster_mount.test_"));
    }
}
