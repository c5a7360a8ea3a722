use serde::Deserialize;

use crate::merger::MergeBy;
use crate::models::ReportMode;
use crate::summarizer::CapacityPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// How rrdtool is reached: over ssh on the monitoring host, or locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Ssh,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_transport")]
    pub transport: Transport,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Remote login. Authentication is left to ssh-agent / keys.
    #[serde(default)]
    pub user: Option<String>,
    /// Directory the series ids are relative to (e.g. the cacti rra dir).
    pub rrd_root: String,
    #[serde(default = "default_rrdtool_bin")]
    pub rrdtool_bin: String,
    #[serde(default = "default_ssh_bin")]
    pub ssh_bin: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Upper bound for one fetch, session setup included.
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,
}

fn default_transport() -> Transport {
    Transport::Ssh
}

fn default_port() -> u16 {
    22
}

fn default_rrdtool_bin() -> String {
    "rrdtool".into()
}

fn default_ssh_bin() -> String {
    "ssh".into()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_command_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Concurrent remote sessions. Kept small so the monitoring host is not flooded.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
        }
    }
}

fn default_parallelism() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_mode")]
    pub mode: ReportMode,
    /// Overrides the mode's default capacity policy.
    #[serde(default)]
    pub capacity_policy: Option<CapacityPolicy>,
    #[serde(default = "default_merge_by")]
    pub merge_by: MergeBy,
    #[serde(default = "default_topology_path")]
    pub topology_path: String,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    /// Window length used when --start is not given.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            capacity_policy: None,
            merge_by: default_merge_by(),
            topology_path: default_topology_path(),
            output_path: default_output_path(),
            lookback_days: default_lookback_days(),
        }
    }
}

impl ReportConfig {
    pub fn effective_policy(&self) -> CapacityPolicy {
        self.capacity_policy
            .unwrap_or_else(|| self.mode.default_capacity_policy())
    }
}

fn default_mode() -> ReportMode {
    ReportMode::Access
}

fn default_merge_by() -> MergeBy {
    MergeBy::Ring
}

fn default_topology_path() -> String {
    "BW_Access.json".into()
}

fn default_output_path() -> String {
    "rrd_ring_summary.csv".into()
}

fn default_lookback_days() -> u32 {
    7
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "ringcap.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source.transport == Transport::Ssh {
            anyhow::ensure!(
                !self.source.host.is_empty(),
                "source.host must be non-empty for the ssh transport"
            );
            anyhow::ensure!(
                self.source.port > 0,
                "source.port must be between 1 and 65535, got {}",
                self.source.port
            );
            anyhow::ensure!(
                self.source.connect_timeout_secs > 0,
                "source.connect_timeout_secs must be > 0, got {}",
                self.source.connect_timeout_secs
            );
        }
        anyhow::ensure!(
            !self.source.rrd_root.is_empty(),
            "source.rrd_root must be non-empty"
        );
        anyhow::ensure!(
            self.source.command_timeout_secs > 0,
            "source.command_timeout_secs must be > 0, got {}",
            self.source.command_timeout_secs
        );
        anyhow::ensure!(
            (1..=64).contains(&self.fetch.parallelism),
            "fetch.parallelism must be between 1 and 64, got {}",
            self.fetch.parallelism
        );
        anyhow::ensure!(
            !self.report.topology_path.is_empty(),
            "report.topology_path must be non-empty"
        );
        anyhow::ensure!(
            !self.report.output_path.is_empty(),
            "report.output_path must be non-empty"
        );
        anyhow::ensure!(
            self.report.lookback_days > 0,
            "report.lookback_days must be > 0, got {}",
            self.report.lookback_days
        );
        Ok(())
    }
}
