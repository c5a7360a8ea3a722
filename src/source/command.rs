// rrdtool fetch over ssh or as a local process

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{MetricSource, Session, rrd_fetch_args};
use crate::config::{SourceConfig, Transport};
use crate::error::FetchError;
use crate::window::FetchWindow;

#[derive(Debug, Clone)]
enum Target {
    Ssh {
        ssh_bin: String,
        destination: String,
        port: u16,
        connect_timeout_secs: u64,
    },
    Local,
}

#[derive(Debug, Clone)]
pub struct CommandSource {
    target: Target,
    rrdtool_bin: String,
    rrd_root: String,
    timeout: Duration,
}

impl CommandSource {
    pub fn from_config(config: &SourceConfig) -> Self {
        let target = match config.transport {
            Transport::Ssh => Target::Ssh {
                ssh_bin: config.ssh_bin.clone(),
                destination: match &config.user {
                    Some(user) => format!("{}@{}", user, config.host),
                    None => config.host.clone(),
                },
                port: config.port,
                connect_timeout_secs: config.connect_timeout_secs,
            },
            Transport::Local => Target::Local,
        };
        Self {
            target,
            rrdtool_bin: config.rrdtool_bin.clone(),
            rrd_root: config.rrd_root.clone(),
            timeout: Duration::from_secs(config.command_timeout_secs),
        }
    }

    /// Program and arguments for one fetch.
    pub fn command_line(&self, series_id: &str, window: &FetchWindow) -> (String, Vec<String>) {
        let rrd_args = rrd_fetch_args(&self.rrd_root, series_id, window);
        match &self.target {
            Target::Local => (self.rrdtool_bin.clone(), rrd_args),
            Target::Ssh {
                ssh_bin,
                destination,
                port,
                connect_timeout_secs,
            } => {
                let remote = std::iter::once(self.rrdtool_bin.as_str())
                    .chain(rrd_args.iter().map(String::as_str))
                    .map(shell_quote)
                    .collect::<Vec<_>>()
                    .join(" ");
                let args = vec![
                    "-p".into(),
                    port.to_string(),
                    "-o".into(),
                    "BatchMode=yes".into(),
                    "-o".into(),
                    format!("ConnectTimeout={}", connect_timeout_secs),
                    destination.clone(),
                    remote,
                ];
                (ssh_bin.clone(), args)
            }
        }
    }
}

#[async_trait]
impl MetricSource for CommandSource {
    #[instrument(skip(self, window), fields(start = window.start, end = window.end))]
    async fn fetch(&self, series_id: &str, window: &FetchWindow) -> Result<String, FetchError> {
        let (program, args) = self.command_line(series_id, window);
        let session = Session::open(&program, &args, series_id)?;
        let output = tokio::time::timeout(self.timeout, session.finish())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;
        debug!(bytes = output.len(), "rrdtool fetch complete");
        Ok(output)
    }
}

/// Single-quotes a word for the remote shell unless it is plainly safe.
fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+@".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_quote_leaves_paths_alone() {
        assert_eq!(shell_quote("/var/www/rra/a_b-1.rrd"), "/var/www/rra/a_b-1.rrd");
    }

    #[test]
    fn shell_quote_wraps_spaces_and_quotes() {
        assert_eq!(shell_quote("my file.rrd"), "'my file.rrd'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
    }
}
