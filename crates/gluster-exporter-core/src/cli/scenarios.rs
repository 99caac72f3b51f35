//! Pre-built gluster outputs for testing.
//!
//! The XML below follows what GlusterFS 9-11 prints with `--xml` for a
//! two-volume cluster of three nodes, seen from `node1`.

use super::mock::MockCli;
use super::runner::CommandOutput;
use crate::mount::MOUNT_FS_TYPE;

pub const VOLUME_INFO_TWO_VOLUMES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
  <volInfo>
    <volumes>
      <volume>
        <name>gv0</name>
        <id>0c2a3d6e-7a5b-4c1f-8e2d-9b0a1c2d3e4f</id>
        <status>1</status>
        <statusStr>Started</statusStr>
        <snapshotCount>0</snapshotCount>
        <brickCount>4</brickCount>
        <distCount>2</distCount>
        <replicaCount>2</replicaCount>
        <arbiterCount>0</arbiterCount>
        <disperseCount>0</disperseCount>
        <redundancyCount>0</redundancyCount>
        <type>7</type>
        <typeStr>Distributed-Replicate</typeStr>
        <transport>0</transport>
        <bricks>
          <brick uuid="5b2a1c3e-0f6d-4a8e-9f3c-111111111111">node1:/data/gv0/brick1<name>node1:/data/gv0/brick1</name><hostUuid>5b2a1c3e-0f6d-4a8e-9f3c-111111111111</hostUuid><isArbiter>0</isArbiter></brick>
          <brick uuid="5b2a1c3e-0f6d-4a8e-9f3c-222222222222">node2:/data/gv0/brick2<name>node2:/data/gv0/brick2</name><hostUuid>5b2a1c3e-0f6d-4a8e-9f3c-222222222222</hostUuid><isArbiter>0</isArbiter></brick>
          <brick uuid="5b2a1c3e-0f6d-4a8e-9f3c-333333333333">node3:/data/gv0/brick3<name>node3:/data/gv0/brick3</name><hostUuid>5b2a1c3e-0f6d-4a8e-9f3c-333333333333</hostUuid><isArbiter>0</isArbiter></brick>
          <brick uuid="5b2a1c3e-0f6d-4a8e-9f3c-111111111111">node1:/data/gv0/brick4<name>node1:/data/gv0/brick4</name><hostUuid>5b2a1c3e-0f6d-4a8e-9f3c-111111111111</hostUuid><isArbiter>0</isArbiter></brick>
        </bricks>
        <optCount>2</optCount>
        <options>
          <option><name>performance.client-io-threads</name><value>off</value></option>
          <option><name>transport.address-family</name><value>inet</value></option>
        </options>
      </volume>
      <volume>
        <name>gv1</name>
        <id>1d3b4e7f-8b6c-4d2a-9f3e-0c1b2d3e4f5a</id>
        <status>1</status>
        <statusStr>Started</statusStr>
        <brickCount>1</brickCount>
        <distCount>1</distCount>
        <replicaCount>1</replicaCount>
        <typeStr>Distribute</typeStr>
        <bricks>
          <brick uuid="5b2a1c3e-0f6d-4a8e-9f3c-111111111111">node1:/data/gv1/brick1<name>node1:/data/gv1/brick1</name><hostUuid>5b2a1c3e-0f6d-4a8e-9f3c-111111111111</hostUuid><isArbiter>0</isArbiter></brick>
        </bricks>
        <optCount>0</optCount>
        <options/>
      </volume>
      <count>2</count>
    </volumes>
  </volInfo>
</cliOutput>
"#;

pub const VOLUME_LIST: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
  <volList>
    <count>2</count>
    <volume>gv0</volume>
    <volume>gv1</volume>
  </volList>
</cliOutput>
"#;

pub const PEER_STATUS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
  <peerStatus>
    <peer>
      <uuid>5b2a1c3e-0f6d-4a8e-9f3c-222222222222</uuid>
      <hostname>node2</hostname>
      <hostnames><hostname>node2</hostname></hostnames>
      <connected>1</connected>
      <state>3</state>
      <stateStr>Peer in Cluster</stateStr>
    </peer>
    <peer>
      <uuid>5b2a1c3e-0f6d-4a8e-9f3c-333333333333</uuid>
      <hostname>node3</hostname>
      <hostnames><hostname>node3</hostname></hostnames>
      <connected>1</connected>
      <state>3</state>
      <stateStr>Peer in Cluster</stateStr>
    </peer>
  </peerStatus>
</cliOutput>
"#;

pub const VOLUME_PROFILE_GV0: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
  <volProfile>
    <volname>gv0</volname>
    <profileOp>3</profileOp>
    <brickCount>2</brickCount>
    <brick>
      <brickName>node1:/data/gv0/brick1</brickName>
      <cumulativeStats>
        <blockStats>
          <block><size>4096</size><reads>1</reads><writes>256</writes></block>
        </blockStats>
        <fopStats>
          <fop><name>WRITE</name><hits>58</hits><avgLatency>224.5</avgLatency><minLatency>183.0</minLatency><maxLatency>807.0</maxLatency></fop>
          <fop><name>LOOKUP</name><hits>12</hits><avgLatency>45.25</avgLatency><minLatency>10.0</minLatency><maxLatency>120.0</maxLatency></fop>
        </fopStats>
        <duration>3600</duration>
        <totalRead>4096</totalRead>
        <totalWrite>1048576</totalWrite>
      </cumulativeStats>
    </brick>
    <brick>
      <brickName>node2:/data/gv0/brick2</brickName>
      <cumulativeStats>
        <fopStats>
          <fop><name>WRITE</name><hits>40</hits><avgLatency>300.0</avgLatency><minLatency>200.0</minLatency><maxLatency>900.0</maxLatency></fop>
        </fopStats>
        <duration>3500</duration>
        <totalRead>0</totalRead>
        <totalWrite>524288</totalWrite>
      </cumulativeStats>
    </brick>
  </volProfile>
</cliOutput>
"#;

pub const VOLUME_STATUS_DETAIL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
  <volStatus>
    <volumes>
      <volume>
        <volName>gv0</volName>
        <nodeCount>2</nodeCount>
        <node>
          <hostname>node1</hostname>
          <path>/data/gv0/brick1</path>
          <peerid>5b2a1c3e-0f6d-4a8e-9f3c-111111111111</peerid>
          <status>1</status>
          <port>49152</port>
          <ports><tcp>49152</tcp><rdma>N/A</rdma></ports>
          <pid>2107</pid>
          <sizeTotal>107374182400</sizeTotal>
          <sizeFree>53687091200</sizeFree>
          <device>/dev/sdb1</device>
          <blockSize>4096</blockSize>
          <mntOptions>rw,relatime,attr2,inode64,noquota</mntOptions>
          <fsName>xfs</fsName>
          <inodeSize>512</inodeSize>
          <inodesTotal>52428800</inodesTotal>
          <inodesFree>52428000</inodesFree>
        </node>
        <node>
          <hostname>Self-heal Daemon</hostname>
          <path>localhost</path>
          <peerid>5b2a1c3e-0f6d-4a8e-9f3c-111111111111</peerid>
          <status>1</status>
          <port>N/A</port>
          <pid>2130</pid>
        </node>
      </volume>
      <volume>
        <volName>gv1</volName>
        <nodeCount>1</nodeCount>
        <node>
          <hostname>node1</hostname>
          <path>/data/gv1/brick1</path>
          <peerid>5b2a1c3e-0f6d-4a8e-9f3c-111111111111</peerid>
          <status>1</status>
          <port>49153</port>
          <pid>2118</pid>
          <sizeTotal>10737418240</sizeTotal>
          <sizeFree>0</sizeFree>
          <device>/dev/sdc1</device>
          <fsName>xfs</fsName>
          <inodesTotal>5242880</inodesTotal>
          <inodesFree>N/A</inodesFree>
        </node>
      </volume>
    </volumes>
  </volStatus>
</cliOutput>
"#;

pub const HEAL_INFO_GV0: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <healInfo>
    <bricks>
      <brick hostUuid="5b2a1c3e-0f6d-4a8e-9f3c-111111111111">
        <name>node1:/data/gv0/brick1</name>
        <file gfid="8a1c5e2b-3d4f-4a6b-9c8d-7e6f5a4b3c2d">/dir/a.txt</file>
        <status>Connected</status>
        <numberOfEntries>3</numberOfEntries>
      </brick>
      <brick hostUuid="5b2a1c3e-0f6d-4a8e-9f3c-222222222222">
        <name>node2:/data/gv0/brick2</name>
        <status>Connected</status>
        <numberOfEntries>2</numberOfEntries>
      </brick>
    </bricks>
  </healInfo>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
</cliOutput>
"#;

/// Heal info with one brick whose process is down.
pub const HEAL_INFO_DISCONNECTED: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <healInfo>
    <bricks>
      <brick hostUuid="5b2a1c3e-0f6d-4a8e-9f3c-111111111111">
        <name>node1:/data/gv1/brick1</name>
        <status>Connected</status>
        <numberOfEntries>4</numberOfEntries>
      </brick>
      <brick hostUuid="5b2a1c3e-0f6d-4a8e-9f3c-222222222222">
        <name>node2:/data/gv1/brick2</name>
        <status>Transport endpoint is not connected</status>
        <numberOfEntries>-</numberOfEntries>
      </brick>
    </bricks>
  </healInfo>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
</cliOutput>
"#;

pub const QUOTA_LIST_GV0: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cliOutput>
  <opRet>0</opRet>
  <opErrno>0</opErrno>
  <opErrstr/>
  <volQuota>
    <limit>
      <path>/home</path>
      <hard_limit>10737418240</hard_limit>
      <soft_limit_percent>80%</soft_limit_percent>
      <soft_limit_value>8589934592</soft_limit_value>
      <used_space>9663676416</used_space>
      <avail_space>1073741824</avail_space>
      <sl_exceeded>Yes</sl_exceeded>
      <hl_exceeded>No</hl_exceeded>
    </limit>
    <limit>
      <path>/scratch</path>
      <hard_limit>1073741824</hard_limit>
      <soft_limit_percent>80%</soft_limit_percent>
      <soft_limit_value>858993459</soft_limit_value>
      <used_space>N/A</used_space>
      <avail_space>N/A</avail_space>
      <sl_exceeded>No</sl_exceeded>
      <hl_exceeded>No</hl_exceeded>
    </limit>
  </volQuota>
</cliOutput>
"#;

/// `mount -t fuse.glusterfs` output line for a volume mounted at `mount_point`.
pub fn mount_line(volume: &str, mount_point: &str) -> String {
    format!(
        "node1:/{volume} on {mount_point} type fuse.glusterfs (rw,relatime,user_id=0,group_id=0,default_permissions,allow_other,max_read=131072)\n"
    )
}

impl MockCli {
    /// A healthy cluster: two started volumes, two peers, one local mount
    /// of `gv0` at `mount_point`. Quota is configured on `gv0` only.
    pub fn healthy_cluster(mount_point: &str) -> Self {
        let mut mock = Self::new();
        mock.add_gluster(&["volume", "info"], VOLUME_INFO_TWO_VOLUMES);
        mock.add_gluster(&["volume", "list"], VOLUME_LIST);
        mock.add_gluster(&["peer", "status"], PEER_STATUS);
        mock.add_gluster(
            &["volume", "profile", "gv0", "info", "cumulative"],
            VOLUME_PROFILE_GV0,
        );
        mock.add_gluster(&["volume", "status", "all", "detail"], VOLUME_STATUS_DETAIL);
        mock.add_gluster(&["volume", "heal", "gv0", "info"], HEAL_INFO_GV0);
        mock.add_gluster(&["volume", "heal", "gv1", "info"], HEAL_INFO_DISCONNECTED);
        mock.add_gluster(&["volume", "quota", "gv0", "list"], QUOTA_LIST_GV0);
        mock.add_response(
            "gluster",
            &["volume", "quota", "gv1", "list", "--xml"],
            CommandOutput::failure(
                1,
                "<cliOutput><opRet>-1</opRet><opErrno>30800</opErrno>",
            ),
        );
        mock.add_response(
            "mount",
            &["-t", MOUNT_FS_TYPE],
            CommandOutput::success(mount_line("gv0", mount_point)),
        );
        mock
    }

    /// Nothing answers: neither gluster nor mount can be executed.
    pub fn unreachable() -> Self {
        Self::new()
    }
}
