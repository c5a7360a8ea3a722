// Config loading and validation tests

use ringcap::config::{AppConfig, Transport};
use ringcap::merger::MergeBy;
use ringcap::models::ReportMode;
use ringcap::summarizer::CapacityPolicy;

const VALID_CONFIG: &str = r#"
[source]
transport = "ssh"
host = "cacti.example.net"
port = 2222
user = "report"
rrd_root = "/var/www/html/cacti"
connect_timeout_secs = 5
command_timeout_secs = 60

[fetch]
parallelism = 6

[report]
mode = "upstream"
capacity_policy = "commit_with_zero_guard"
merge_by = "region"
topology_path = "BW_Upstream.json"
output_path = "out/upstream.csv"
lookback_days = 14
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.source.transport, Transport::Ssh);
    assert_eq!(config.source.host, "cacti.example.net");
    assert_eq!(config.source.port, 2222);
    assert_eq!(config.source.user.as_deref(), Some("report"));
    assert_eq!(config.source.rrd_root, "/var/www/html/cacti");
    assert_eq!(config.fetch.parallelism, 6);
    assert_eq!(config.report.mode, ReportMode::Upstream);
    assert_eq!(config.report.merge_by, MergeBy::Region);
    assert_eq!(config.report.lookback_days, 14);
    assert_eq!(
        config.report.effective_policy(),
        CapacityPolicy::CommitWithZeroGuard
    );
}

#[test]
fn test_config_defaults_when_omitted() {
    let minimal = r#"
[source]
host = "cacti"
rrd_root = "/srv/rra"
"#;
    let config = AppConfig::load_from_str(minimal).expect("valid");
    assert_eq!(config.source.transport, Transport::Ssh);
    assert_eq!(config.source.port, 22);
    assert_eq!(config.source.rrdtool_bin, "rrdtool");
    assert_eq!(config.source.ssh_bin, "ssh");
    assert_eq!(config.source.connect_timeout_secs, 10);
    assert_eq!(config.source.command_timeout_secs, 120);
    assert_eq!(config.fetch.parallelism, 4);
    assert_eq!(config.report.mode, ReportMode::Access);
    assert_eq!(config.report.merge_by, MergeBy::Ring);
    assert_eq!(config.report.topology_path, "BW_Access.json");
    assert_eq!(config.report.output_path, "rrd_ring_summary.csv");
    assert_eq!(config.report.lookback_days, 7);
    assert_eq!(
        config.report.effective_policy(),
        CapacityPolicy::CommitWithZeroGuard
    );
}

#[test]
fn test_config_mode_selects_default_policy() {
    let bad = VALID_CONFIG.replace("capacity_policy = \"commit_with_zero_guard\"\n", "");
    let config = AppConfig::load_from_str(&bad).expect("valid");
    assert_eq!(
        config.report.effective_policy(),
        CapacityPolicy::BurstablePlusCommitScaled
    );
}

#[test]
fn test_config_local_transport_needs_no_host() {
    let local = r#"
[source]
transport = "local"
rrd_root = "/srv/rra"
"#;
    let config = AppConfig::load_from_str(local).expect("valid");
    assert_eq!(config.source.transport, Transport::Local);
    assert!(config.source.host.is_empty());
}

#[test]
fn test_config_validation_rejects_empty_host_for_ssh() {
    let bad = VALID_CONFIG.replace("host = \"cacti.example.net\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.host"));
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 2222", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.port"));
}

#[test]
fn test_config_validation_rejects_empty_rrd_root() {
    let bad = VALID_CONFIG.replace("rrd_root = \"/var/www/html/cacti\"", "rrd_root = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.rrd_root"));
}

#[test]
fn test_config_validation_rejects_connect_timeout_zero() {
    let bad = VALID_CONFIG.replace("connect_timeout_secs = 5", "connect_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("connect_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_command_timeout_zero() {
    let bad = VALID_CONFIG.replace("command_timeout_secs = 60", "command_timeout_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("command_timeout_secs"));
}

#[test]
fn test_config_validation_rejects_parallelism_out_of_range() {
    for value in ["0", "65"] {
        let bad = VALID_CONFIG.replace("parallelism = 6", &format!("parallelism = {}", value));
        let err = AppConfig::load_from_str(&bad).unwrap_err();
        assert!(err.to_string().contains("fetch.parallelism"));
    }
}

#[test]
fn test_config_validation_rejects_empty_output_path() {
    let bad = VALID_CONFIG.replace("output_path = \"out/upstream.csv\"", "output_path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("report.output_path"));
}

#[test]
fn test_config_validation_rejects_lookback_zero() {
    let bad = VALID_CONFIG.replace("lookback_days = 14", "lookback_days = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("lookback_days"));
}

#[test]
fn test_config_rejects_unknown_mode() {
    let bad = VALID_CONFIG.replace("mode = \"upstream\"", "mode = \"backbone\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("ringcap.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.source.port, 2222);
    assert_eq!(config.report.topology_path, "BW_Upstream.json");
}
