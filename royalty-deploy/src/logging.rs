// Copyright 2024 MaidSafe.net limited.
//
// This SAFE Network Software is licensed to you under The General Public License (GPL), version 3.
// Unless required by applicable law or agreed to in writing, the SAFE Network Software distributed
// under the GPL Licence is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied. Please review the Licences for the specific language governing
// permissions and limitations relating to use of the SAFE Network Software.

use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

/// Overrides the default logging targets, e.g. `DEPLOY_LOG=contract_deployer=trace,alloy=debug`.
pub(crate) const LOG_ENV_VAR: &str = "DEPLOY_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LogOutputDest {
    Stderr,
    Stdout,
    Path(PathBuf),
}

impl LogOutputDest {
    pub(crate) fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "stderr" => Ok(LogOutputDest::Stderr),
            "stdout" => Ok(LogOutputDest::Stdout),
            "" => Err(eyre!("The log output destination cannot be empty")),
            // The path should be a directory, but we can't use something like `is_dir` to check
            // because the path doesn't need to exist. We can create it for the user.
            value => Ok(LogOutputDest::Path(PathBuf::from(value))),
        }
    }
}

impl std::fmt::Display for LogOutputDest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LogOutputDest::Stderr => write!(f, "stderr"),
            LogOutputDest::Stdout => write!(f, "stdout"),
            LogOutputDest::Path(p) => write!(f, "{}", p.to_string_lossy()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LogFormat {
    Default,
    Json,
}

impl LogFormat {
    pub(crate) fn parse_from_str(val: &str) -> Result<Self> {
        match val {
            "default" => Ok(LogFormat::Default),
            "json" => Ok(LogFormat::Json),
            _ => Err(eyre!(
                "The only valid values for this argument are \"default\" or \"json\""
            )),
        }
    }
}

fn default_logging_targets() -> Vec<(String, Level)> {
    vec![
        ("contract_deployer".to_string(), Level::INFO),
        ("royalty_deploy".to_string(), Level::INFO),
    ]
}

/// The targets filter: `DEPLOY_LOG` when set, our own crates at INFO otherwise.
pub(crate) fn targets_filter(env_value: Option<&str>) -> Result<Targets> {
    match env_value {
        Some(value) if !value.trim().is_empty() => value
            .parse::<Targets>()
            .wrap_err_with(|| format!("Invalid {LOG_ENV_VAR} value: {value}")),
        _ => Ok(Targets::new().with_targets(default_logging_targets())),
    }
}

/// Set up the global subscriber. The returned guard must be held until the program exits,
/// otherwise buffered log lines are lost.
pub(crate) fn init_logging(format: LogFormat, output_dest: &LogOutputDest) -> Result<WorkerGuard> {
    let targets = targets_filter(std::env::var(LOG_ENV_VAR).ok().as_deref())?;

    let (writer, guard) = match output_dest {
        LogOutputDest::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutputDest::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutputDest::Path(dir) => {
            std::fs::create_dir_all(dir)
                .wrap_err_with(|| format!("Failed to create log directory {dir:?}"))?;
            let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
            let appender =
                tracing_appender::rolling::never(dir, format!("royalty-deploy_{timestamp}.log"));
            tracing_appender::non_blocking(appender)
        }
    };
    let ansi = !matches!(output_dest, LogOutputDest::Path(_));

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Default => tracing_subscriber::fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
    };

    if tracing_subscriber::registry()
        .with(layer.with_filter(targets))
        .try_init()
        .is_err()
    {
        eprintln!("Tried to initialize and set global default subscriber more than once");
    }

    Ok(guard)
}
