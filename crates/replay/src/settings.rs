//! Replay settings

use crate::ReplayError;
use chrono::Local;
use collector::CollectorConfig;
use serde::{Deserialize, Serialize};
use sink::SinkConfig;
use std::path::{Path, PathBuf};

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "REPLAY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Recorded event stream, one JSON object per line
    pub input: Option<PathBuf>,
    /// Session directory name under `sink.directory`; timestamped when absent
    pub session: Option<String>,
    /// Replay speed relative to recorded time; 0 replays as fast as possible
    pub speed: f64,
    pub sink: SinkConfig,
    pub collector: CollectorConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: None,
            session: None,
            speed: 0.0,
            sink: SinkConfig::default(),
            collector: CollectorConfig::default(),
        }
    }
}

impl Settings {
    /// Layer defaults, an optional settings file and `REPLAY__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ReplayError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let settings: Settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.collector.validate()?;
        Ok(settings)
    }

    /// Directory the session's stream files are written to
    pub fn session_dir(&self) -> PathBuf {
        let name = self
            .session
            .clone()
            .unwrap_or_else(|| Local::now().format("session-%Y%m%d-%H%M%S").to_string());
        self.sink.directory.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file() -> NamedTempFile {
        tempfile::Builder::new().suffix(".toml").tempfile().unwrap()
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = toml_file();
        writeln!(
            file,
            r#"
speed = 2.0
session = "run-1"

[sink]
directory = "out"
max_batch = 5

[collector.mouse]
segment_timeout = 4.0
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.speed, 2.0);
        assert_eq!(settings.sink.max_batch, 5);
        assert_eq!(settings.sink.flush_interval_secs, 2.0);
        assert_eq!(settings.collector.mouse.segment_timeout, 4.0);
        assert_eq!(settings.collector.mouse.temporal_window, 60);
        assert_eq!(settings.session_dir(), PathBuf::from("out").join("run-1"));
    }

    #[test]
    fn test_invalid_collector_settings_rejected() {
        let mut file = toml_file();
        writeln!(file, "[collector.mouse]\ntemporal_window = 0").unwrap();
        assert!(matches!(
            Settings::load(Some(file.path())),
            Err(ReplayError::Collector(_))
        ));
    }

    #[test]
    fn test_timestamped_session_dir() {
        let settings = Settings::default();
        let dir = settings.session_dir();
        let name = dir.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        assert!(name.starts_with("session-"));
        assert!(dir.starts_with("telemetry"));
    }
}
