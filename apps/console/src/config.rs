use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "rsa_console.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub gateway_url: String,
    pub export_dir: PathBuf,
    pub request_timeout_secs: Option<u64>,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:5000".into(),
            export_dir: PathBuf::from("."),
            request_timeout_secs: None,
            log_filter: "info".into(),
        }
    }
}

impl Settings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    gateway_url: Option<String>,
    export_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    log_filter: Option<String>,
}

/// Defaults, then the TOML file, then the environment. A missing file is fine; an explicit
/// `path` that cannot be read or any malformed file is an error.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let file_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(file_path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("failed to parse config '{}'", file_path.display()))?;
            apply_file(&mut settings, file_cfg);
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound && path.is_none() => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config '{}'", file_path.display()));
        }
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.gateway_url {
        settings.gateway_url = v;
    }
    if let Some(v) = file_cfg.export_dir {
        settings.export_dir = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file_cfg.log_filter {
        settings.log_filter = v;
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("RSA_GATEWAY_URL") {
        settings.gateway_url = v;
    }
    if let Some(v) = lookup("APP__GATEWAY_URL") {
        settings.gateway_url = v;
    }

    if let Some(v) = lookup("APP__EXPORT_DIR") {
        settings.export_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_local_gateway() {
        let settings = Settings::default();
        assert_eq!(settings.gateway_url, "http://localhost:5000");
        assert_eq!(settings.request_timeout(), None);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("console.toml");
        fs::write(
            &path,
            "gateway_url = \"http://gateway.internal:8080\"\nrequest_timeout_secs = 15\n",
        )
        .expect("write config");

        let settings = load_settings(Some(path.as_path())).expect("load settings");

        assert_eq!(settings.gateway_url, "http://gateway.internal:8080");
        assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("console.toml");
        fs::write(&path, "gateway_url = [").expect("write config");

        let err = load_settings(Some(path.as_path())).expect_err("malformed config");
        assert!(err.to_string().contains("failed to parse config"), "{err}");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_settings(Some(dir.path().join("absent.toml").as_path())).is_err());
    }

    #[test]
    fn app_prefixed_env_wins_over_legacy_name() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            env(&[
                ("RSA_GATEWAY_URL", "http://legacy:5000"),
                ("APP__GATEWAY_URL", "http://preferred:5000"),
                ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
                ("APP__EXPORT_DIR", "/tmp/exports"),
            ]),
        );

        assert_eq!(settings.gateway_url, "http://preferred:5000");
        assert_eq!(settings.request_timeout_secs, None);
        assert_eq!(settings.export_dir, PathBuf::from("/tmp/exports"));
    }

    #[test]
    fn zero_timeout_means_transport_default() {
        let settings = Settings {
            request_timeout_secs: Some(0),
            ..Settings::default()
        };
        assert_eq!(settings.request_timeout(), None);
    }
}
