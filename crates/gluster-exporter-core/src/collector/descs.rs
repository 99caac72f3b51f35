//! Metric families exported for a gluster node.

use crate::metrics::{Desc, MetricType};

pub const NAMESPACE: &str = "gluster";

const VOLUME: &[&str] = &["volume"];
const VOLUME_BRICK: &[&str] = &["volume", "brick"];
const VOLUME_BRICK_FOP: &[&str] = &["volume", "brick", "fop_name"];
const NODE: &[&str] = &["hostname", "path", "volume"];
const MOUNT: &[&str] = &["volume", "mountpoint"];
const QUOTA: &[&str] = &["path", "volume"];

macro_rules! desc {
    ($ident:ident, $name:literal, $type:ident, $labels:expr, $help:literal) => {
        pub static $ident: Desc = Desc {
            namespace: NAMESPACE,
            name: $name,
            help: $help,
            metric_type: MetricType::$type,
            labels: $labels,
        };
    };
}

desc!(UP, "up", Gauge, &[], "Was the last query of Gluster successful.");
desc!(VOLUMES_COUNT, "volumes_available", Gauge, &[], "How many volumes were up at the last query.");
desc!(VOLUME_STATUS, "volume_status", Gauge, VOLUME, "Status code of requested volume.");
desc!(BRICK_COUNT, "brick_available", Gauge, VOLUME, "Number of bricks available at last query.");
desc!(
    BRICK_DURATION,
    "brick_duration_seconds_total",
    Counter,
    VOLUME_BRICK,
    "Time running volume brick in seconds."
);
desc!(
    BRICK_DATA_READ,
    "brick_data_read_bytes_total",
    Counter,
    VOLUME_BRICK,
    "Total amount of bytes of data read by brick."
);
desc!(
    BRICK_DATA_WRITTEN,
    "brick_data_written_bytes_total",
    Counter,
    VOLUME_BRICK,
    "Total amount of bytes of data written by brick."
);
desc!(
    BRICK_FOP_HITS,
    "brick_fop_hits_total",
    Counter,
    VOLUME_BRICK_FOP,
    "Total amount of file operation hits."
);
desc!(
    BRICK_FOP_LATENCY_AVG,
    "brick_fop_latency_avg",
    Gauge,
    VOLUME_BRICK_FOP,
    "Average file operation latency over total uptime."
);
desc!(
    BRICK_FOP_LATENCY_MIN,
    "brick_fop_latency_min",
    Gauge,
    VOLUME_BRICK_FOP,
    "Minimum file operation latency over total uptime."
);
desc!(
    BRICK_FOP_LATENCY_MAX,
    "brick_fop_latency_max",
    Gauge,
    VOLUME_BRICK_FOP,
    "Maximum file operation latency over total uptime."
);
desc!(PEERS_CONNECTED, "peers_connected", Gauge, &[], "Number of peers connected to the gluster cluster.");
desc!(
    NODE_SIZE_TOTAL,
    "node_size_bytes_total",
    Counter,
    NODE,
    "Total bytes reported for each node on each instance. Labels are to distinguish origins."
);
desc!(
    NODE_SIZE_FREE,
    "node_size_bytes_bytes",
    Gauge,
    NODE,
    "Free bytes reported for each node on each instance. Labels are to distinguish origins."
);
desc!(
    NODE_INODES_TOTAL,
    "node_inodes_total",
    Counter,
    NODE,
    "Total inodes reported for each node on each instance. Labels are to distinguish origins."
);
desc!(
    NODE_INODES_FREE,
    "node_inodes_free",
    Gauge,
    NODE,
    "Free inodes reported for each node on each instance. Labels are to distinguish origins."
);
desc!(
    HEAL_INFO_FILES,
    "heal_info_files_count",
    Counter,
    VOLUME,
    "File count of files out of sync, when calling 'gluster v heal VOLNAME info'."
);
desc!(
    MOUNT_SUCCESSFUL,
    "mount_successful",
    Gauge,
    MOUNT,
    "Checks if mountpoint exists, returns a bool value 0 or 1."
);
desc!(
    VOLUME_WRITEABLE,
    "volume_writeable",
    Gauge,
    MOUNT,
    "Writes and deletes file in Volume and checks if it is writeable."
);
desc!(QUOTA_HARD_LIMIT, "volume_quota_hardlimit", Counter, QUOTA, "Quota hard limit (bytes) in a volume.");
desc!(QUOTA_SOFT_LIMIT, "volume_quota_softlimit", Counter, QUOTA, "Quota soft limit (bytes) in a volume.");
desc!(QUOTA_USED, "volume_quota_used", Counter, QUOTA, "Current data (bytes) used in a quota.");
desc!(QUOTA_AVAILABLE, "volume_quota_available", Counter, QUOTA, "Current data (bytes) available in a quota.");
desc!(
    QUOTA_SOFT_LIMIT_EXCEEDED,
    "volume_quota_softlimit_exceeded",
    Counter,
    QUOTA,
    "Is the quota soft-limit exceeded."
);
desc!(
    QUOTA_HARD_LIMIT_EXCEEDED,
    "volume_quota_hardlimit_exceeded",
    Counter,
    QUOTA,
    "Is the quota hard-limit exceeded."
);

/// Every family the gluster collector can produce.
pub static ALL: &[&Desc] = &[
    &UP,
    &VOLUME_STATUS,
    &VOLUMES_COUNT,
    &BRICK_COUNT,
    &BRICK_DURATION,
    &BRICK_DATA_READ,
    &BRICK_DATA_WRITTEN,
    &PEERS_CONNECTED,
    &NODE_SIZE_FREE,
    &NODE_SIZE_TOTAL,
    &NODE_INODES_TOTAL,
    &NODE_INODES_FREE,
    &BRICK_FOP_HITS,
    &BRICK_FOP_LATENCY_AVG,
    &BRICK_FOP_LATENCY_MIN,
    &BRICK_FOP_LATENCY_MAX,
    &HEAL_INFO_FILES,
    &VOLUME_WRITEABLE,
    &MOUNT_SUCCESSFUL,
    &QUOTA_HARD_LIMIT,
    &QUOTA_SOFT_LIMIT,
    &QUOTA_USED,
    &QUOTA_AVAILABLE,
    &QUOTA_SOFT_LIMIT_EXCEEDED,
    &QUOTA_HARD_LIMIT_EXCEEDED,
];
