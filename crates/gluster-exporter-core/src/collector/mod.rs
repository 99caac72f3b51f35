//! One collection cycle over the gluster command surface.
//!
//! Every sub-query is independent: a failed query is logged and only the
//! samples it would have produced are missing. The cycle always completes.

mod build_info;
pub mod descs;

use std::time::Instant;

use tracing::{debug, warn};

pub use build_info::{BUILD_INFO, BuildInfoCollector};

use crate::cli::{CommandRunner, GlusterCli};
use crate::metrics::{Collect, Desc, Sample};
use crate::mount::{FileSystem, MountProbe};
use crate::schema::{Volume, parse_f64, parse_u64};
use descs::*;

/// Scope value meaning every volume of the cluster.
pub const ALL_VOLUMES: &str = "_all";

/// Which volumes per-volume metrics are collected for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VolumeScope {
    #[default]
    All,
    Only(Vec<String>),
}

impl VolumeScope {
    /// Parses a comma separated volume list. `_all` as the first entry, or
    /// an empty list, selects every volume. Repeated names are kept once.
    pub fn parse(list: &str) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        match names.first() {
            None => VolumeScope::All,
            Some(first) if first == ALL_VOLUMES => VolumeScope::All,
            Some(_) => VolumeScope::Only(names),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, VolumeScope::All)
    }

    pub fn contains(&self, volume: &str) -> bool {
        match self {
            VolumeScope::All => true,
            VolumeScope::Only(names) => names.iter().any(|n| n == volume),
        }
    }
}

/// Collector settings.
#[derive(Debug, Clone, Default)]
pub struct CollectorConfig {
    pub scope: VolumeScope,
    /// Query `volume profile` for in-scope volumes.
    pub profile: bool,
    /// Query `volume quota list` for in-scope volumes.
    pub quota: bool,
    /// Host name used to pick the bricks owned by this node.
    pub hostname: String,
}

/// Collects gluster metrics by running the gluster CLI on each scrape.
pub struct GlusterCollector<R: CommandRunner + Clone, F: FileSystem> {
    cli: GlusterCli<R>,
    probe: MountProbe<R, F>,
    config: CollectorConfig,
}

impl<R: CommandRunner + Clone, F: FileSystem> GlusterCollector<R, F> {
    pub fn new(runner: R, fs: F, program: impl Into<String>, config: CollectorConfig) -> Self {
        Self {
            cli: GlusterCli::new(runner.clone(), program),
            probe: MountProbe::new(runner, fs),
            config,
        }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Runs one collection cycle.
    pub fn collect_cycle(&self) -> Vec<Sample> {
        let started = Instant::now();
        let mut out = Vec::new();

        let volumes = self.collect_volume_info(&mut out);
        self.collect_peers(&mut out);
        if self.config.profile {
            self.collect_profiles(&volumes, &mut out);
        }
        self.collect_node_status(&mut out);
        self.collect_heal(&mut out);
        self.collect_mounts(&mut out);
        if self.config.quota {
            self.collect_quotas(&volumes, &mut out);
        }

        debug!(
            samples = out.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "collection cycle finished"
        );
        out
    }

    /// Liveness, volume count and per-volume status. Returns the in-scope
    /// volumes.
    fn collect_volume_info(&self, out: &mut Vec<Sample>) -> Vec<Volume> {
        let info = match self.cli.volume_info() {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "volume info query failed");
                out.push(Sample::new(&UP, 0.0, &[]));
                return Vec::new();
            }
        };

        // glusterd reports its own failures through opErrno, the exit code
        // of the CLI is not reliable for that.
        let errno = info.status.op_errno.trim().parse::<i64>().unwrap_or(0);
        let up = if errno != 0 { 0.0 } else { 1.0 };
        out.push(Sample::new(&UP, up, &[]));

        push_nonzero(out, &VOLUMES_COUNT, &info.count, &[]);

        let volumes: Vec<Volume> = info
            .volumes
            .into_iter()
            .filter(|v| self.config.scope.contains(&v.name))
            .collect();
        for volume in &volumes {
            let labels = [volume.name.as_str()];
            push_nonzero(out, &BRICK_COUNT, &volume.brick_count, &labels);
            push_nonzero(out, &VOLUME_STATUS, &volume.status, &labels);
        }
        volumes
    }

    fn collect_peers(&self, out: &mut Vec<Sample>) {
        let connected = match self.cli.peer_status() {
            Ok(status) => status.peers.len(),
            Err(e) => {
                warn!(error = %e, "peer status query failed");
                0
            }
        };
        out.push(Sample::new(&PEERS_CONNECTED, connected as f64, &[]));
    }

    fn collect_profiles(&self, volumes: &[Volume], out: &mut Vec<Sample>) {
        for volume in volumes {
            let profile = match self.cli.volume_profile(&volume.name) {
                Ok(profile) => profile,
                Err(e) => {
                    warn!(volume = %volume.name, error = %e, "volume profile query failed");
                    continue;
                }
            };

            for brick in profile
                .bricks
                .iter()
                .filter(|b| self.is_local_brick(&b.brick_name))
            {
                let labels = [volume.name.as_str(), brick.brick_name.as_str()];
                let stats = &brick.cumulative;
                push_u64(out, &BRICK_DURATION, &stats.duration, &labels);
                push_u64(out, &BRICK_DATA_READ, &stats.total_read, &labels);
                push_u64(out, &BRICK_DATA_WRITTEN, &stats.total_write, &labels);

                for fop in stats.fops() {
                    let labels = [
                        volume.name.as_str(),
                        brick.brick_name.as_str(),
                        fop.name.as_str(),
                    ];
                    push_u64(out, &BRICK_FOP_HITS, &fop.hits, &labels);
                    push_f64(out, &BRICK_FOP_LATENCY_AVG, &fop.avg_latency, &labels);
                    push_f64(out, &BRICK_FOP_LATENCY_MIN, &fop.min_latency, &labels);
                    push_f64(out, &BRICK_FOP_LATENCY_MAX, &fop.max_latency, &labels);
                }
            }
        }
    }

    /// Bricks are named `host:/path`; only bricks of this host are reported
    /// so that every brick is exported by exactly one node.
    fn is_local_brick(&self, brick_name: &str) -> bool {
        brick_name
            .strip_prefix(self.config.hostname.as_str())
            .is_some_and(|rest| rest.starts_with(':'))
    }

    fn collect_node_status(&self, out: &mut Vec<Sample>) {
        let status = match self.cli.volume_status() {
            Ok(status) => status,
            Err(e) => {
                warn!(error = %e, "volume status query failed");
                return;
            }
        };

        for volume in &status.volumes {
            for node in &volume.nodes {
                let labels = [
                    node.hostname.as_str(),
                    node.path.as_str(),
                    volume.vol_name.as_str(),
                ];
                push_nonzero(out, &NODE_SIZE_TOTAL, &node.size_total, &labels);
                push_nonzero(out, &NODE_SIZE_FREE, &node.size_free, &labels);
                push_nonzero(out, &NODE_INODES_TOTAL, &node.inodes_total, &labels);
                push_nonzero(out, &NODE_INODES_FREE, &node.inodes_free, &labels);
            }
        }
    }

    /// Volumes heal info is collected for.
    fn working_volumes(&self) -> Vec<String> {
        match &self.config.scope {
            VolumeScope::Only(names) => names.clone(),
            VolumeScope::All => match self.cli.volume_list() {
                Ok(list) => list.volumes,
                Err(e) => {
                    warn!(error = %e, "volume list query failed");
                    Vec::new()
                }
            },
        }
    }

    fn collect_heal(&self, out: &mut Vec<Sample>) {
        for volume in self.working_volumes() {
            match self.cli.heal_entries(&volume) {
                Ok(entries) => {
                    out.push(Sample::new(&HEAL_INFO_FILES, entries as f64, &[&volume]))
                }
                Err(e) => warn!(volume = %volume, error = %e, "heal info query failed"),
            }
        }
    }

    fn collect_mounts(&self, out: &mut Vec<Sample>) {
        let mounts = match self.probe.list_mounts() {
            Ok(mounts) => mounts,
            Err(e) => {
                warn!(error = %e, "mount table query failed");
                return;
            }
        };

        for mount in &mounts {
            let labels = [mount.volume.as_str(), mount.mount_point.as_str()];
            out.push(Sample::new(&MOUNT_SUCCESSFUL, 1.0, &labels));

            let writable = match self.probe.probe_writable(&mount.mount_point) {
                Ok(()) => 1.0,
                Err(e) => {
                    warn!(mountpoint = %mount.mount_point, error = %e, "volume is not writable");
                    0.0
                }
            };
            out.push(Sample::new(&VOLUME_WRITEABLE, writable, &labels));
        }
    }

    fn collect_quotas(&self, volumes: &[Volume], out: &mut Vec<Sample>) {
        for volume in volumes {
            let list = match self.cli.quota_list(&volume.name) {
                Ok(list) => list,
                Err(e) => {
                    warn!(volume = %volume.name, error = %e, "quota list query failed, is quota enabled?");
                    continue;
                }
            };

            for limit in &list.limits {
                let labels = [limit.path.as_str(), volume.name.as_str()];
                push_u64(out, &QUOTA_HARD_LIMIT, &limit.hard_limit, &labels);
                push_u64(out, &QUOTA_SOFT_LIMIT, &limit.soft_limit_value, &labels);
                push_u64(out, &QUOTA_USED, &limit.used_space, &labels);
                push_u64(out, &QUOTA_AVAILABLE, &limit.avail_space, &labels);
                out.push(Sample::new(
                    &QUOTA_SOFT_LIMIT_EXCEEDED,
                    flag(limit.soft_limit_exceeded()),
                    &labels,
                ));
                out.push(Sample::new(
                    &QUOTA_HARD_LIMIT_EXCEEDED,
                    flag(limit.hard_limit_exceeded()),
                    &labels,
                ));
            }
        }
    }
}

impl<R, F> Collect for GlusterCollector<R, F>
where
    R: CommandRunner + Clone,
    F: FileSystem,
{
    fn describe(&self) -> Vec<&'static Desc> {
        ALL.to_vec()
    }

    fn collect(&self) -> Vec<Sample> {
        self.collect_cycle()
    }
}

fn flag(set: bool) -> f64 {
    if set { 1.0 } else { 0.0 }
}

fn push_u64(out: &mut Vec<Sample>, desc: &'static Desc, text: &str, labels: &[&str]) {
    match parse_u64(desc.name, text) {
        Ok(value) => out.push(Sample::new(desc, value as f64, labels)),
        Err(e) => debug!(error = %e, "sample skipped"),
    }
}

fn push_f64(out: &mut Vec<Sample>, desc: &'static Desc, text: &str, labels: &[&str]) {
    match parse_f64(desc.name, text) {
        Ok(value) => out.push(Sample::new(desc, value, labels)),
        Err(e) => debug!(error = %e, "sample skipped"),
    }
}

/// Zero and unparsable values are omitted.
fn push_nonzero(out: &mut Vec<Sample>, desc: &'static Desc, text: &str, labels: &[&str]) {
    if let Ok(value) = parse_u64(desc.name, text)
        && value != 0
    {
        out.push(Sample::new(desc, value as f64, labels));
    }
}
