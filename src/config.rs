use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const SERVICE_URL_ENV: &str = "FITNESS_SERVICE_URL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the recommendation service, without the route.
    pub service_base_url: String,
    /// `None` leaves requests without a client-side timeout.
    pub request_timeout_secs: Option<u64>,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_base_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout_secs: None,
            window_width: 1280.0,
            window_height: 900.0,
        }
    }
}

impl ClientConfig {
    /// Reads a TOML config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            log::debug!("no config at {}, using defaults", path_ref.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading client config {}", path_ref.display()))?;
        let config: ClientConfig = toml::from_str(&contents)
            .with_context(|| format!("parsing client config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Layers the config file, then the environment URL, then the command-line URL.
    pub fn resolve(
        path: Option<&Path>,
        env_url: Option<String>,
        cli_url: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(url) = env_url.filter(|url| !url.trim().is_empty()) {
            config.service_base_url = url;
        }
        if let Some(url) = cli_url {
            config.service_base_url = url;
        }
        Ok(config)
    }

    pub fn with_base_url(url: impl Into<String>) -> Self {
        Self {
            service_base_url: url.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.service_base_url.trim().trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = ClientConfig::with_base_url("http://fitness.local:8000/");
        assert_eq!(cfg.endpoint("/recommend"), "http://fitness.local:8000/recommend");
        assert_eq!(cfg.endpoint(""), "http://fitness.local:8000/");
    }

    #[test]
    fn defaults_have_no_timeout() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.service_base_url, DEFAULT_SERVICE_URL);
        assert!(cfg.request_timeout().is_none());
    }

    #[test]
    fn config_load_reads_toml_with_partial_fields() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"service_base_url = \"http://10.0.0.5:9000\"\nrequest_timeout_secs = 12\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = ClientConfig::load(&path).unwrap();
        assert_eq!(cfg.service_base_url, "http://10.0.0.5:9000");
        assert_eq!(cfg.request_timeout(), Some(Duration::from_secs(12)));
        assert_eq!(cfg.window_width, ClientConfig::default().window_width);
    }

    #[test]
    fn config_load_rejects_malformed_file() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"service_base_url = [").unwrap();
        let path = temp.into_temp_path();
        let err = ClientConfig::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing client config"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ClientConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn command_line_url_wins_over_environment() {
        let cfg = ClientConfig::resolve(
            None,
            Some("http://from-env:8000".into()),
            Some("http://from-cli:8000".into()),
        )
        .unwrap();
        assert_eq!(cfg.service_base_url, "http://from-cli:8000");

        let cfg = ClientConfig::resolve(None, Some("http://from-env:8000".into()), None).unwrap();
        assert_eq!(cfg.service_base_url, "http://from-env:8000");
    }
}
