//! gradewise configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use gradewise_core::store::{default_dataset_path, DATASET_EXTENSION, DATASET_STEM};

use crate::ocr::TesseractExtractor;
use crate::viewer::{OpenStrategy, SystemViewer};

/// Top-level gradewise configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradewiseConfig {
    /// Directory holding the result dataset. Defaults to `~/Documents`.
    #[serde(default)]
    pub dataset_dir: Option<PathBuf>,
    /// OCR binary to run on answer images.
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: String,
    /// Value for `TESSDATA_PREFIX` when running the OCR binary.
    #[serde(default)]
    pub tessdata_prefix: Option<PathBuf>,
    /// Time limit for one OCR run, in seconds.
    #[serde(default = "default_ocr_timeout")]
    pub ocr_timeout_secs: u64,
    /// Open the dataset in the default viewer after saving.
    #[serde(default = "default_true")]
    pub open_after_save: bool,
    /// Program (and leading args) used instead of the platform opener.
    #[serde(default)]
    pub viewer_command: Option<Vec<String>>,
}

fn default_tesseract_cmd() -> String {
    "tesseract".to_string()
}
fn default_ocr_timeout() -> u64 {
    60
}
fn default_true() -> bool {
    true
}

impl Default for GradewiseConfig {
    fn default() -> Self {
        Self {
            dataset_dir: None,
            tesseract_cmd: default_tesseract_cmd(),
            tessdata_prefix: None,
            ocr_timeout_secs: default_ocr_timeout(),
            open_after_save: true,
            viewer_command: None,
        }
    }
}

impl GradewiseConfig {
    /// Where the canonical dataset lives.
    pub fn dataset_path(&self) -> Result<PathBuf> {
        match &self.dataset_dir {
            Some(dir) => Ok(dir.join(format!("{DATASET_STEM}.{DATASET_EXTENSION}"))),
            None => default_dataset_path()
                .context("cannot resolve the home directory; set dataset_dir"),
        }
    }

    /// Build the OCR adapter described by this config.
    pub fn extractor(&self) -> TesseractExtractor {
        let mut extractor = TesseractExtractor::new(&self.tesseract_cmd)
            .with_timeout(Duration::from_secs(self.ocr_timeout_secs));
        if let Some(prefix) = &self.tessdata_prefix {
            extractor = extractor.with_tessdata_prefix(prefix);
        }
        extractor
    }

    /// Build the file viewer described by this config.
    pub fn viewer(&self) -> SystemViewer {
        match &self.viewer_command {
            Some(argv) if !argv.is_empty() => SystemViewer::new(OpenStrategy::Custom(argv.clone())),
            _ => SystemViewer::default(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    let resolved = resolve_env_vars(&raw);
    match resolved.strip_prefix("~/") {
        Some(rest) => home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(&resolved)),
        None => PathBuf::from(resolved),
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradewise.toml` in the current directory
/// 2. `~/.config/gradewise/config.toml`
///
/// Environment variable overrides: `GRADEWISE_DATASET_DIR`, `GRADEWISE_TESSERACT_CMD`.
pub fn load_config() -> Result<GradewiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradewiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("gradewise.toml");
        if local.exists() {
            Some(local)
        } else if let Some(dir) = config_dir() {
            let global = dir.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradewiseConfig::default(),
    };

    if let Some(dir) = std::env::var_os("GRADEWISE_DATASET_DIR").filter(|d| !d.is_empty()) {
        config.dataset_dir = Some(PathBuf::from(dir));
    }
    if let Ok(cmd) = std::env::var("GRADEWISE_TESSERACT_CMD") {
        if !cmd.is_empty() {
            config.tesseract_cmd = cmd;
        }
    }

    Ok(config)
}

/// Parse a TOML config document and expand `${VAR}` and `~/` in its paths.
pub fn parse_config(content: &str) -> Result<GradewiseConfig> {
    let mut config: GradewiseConfig = toml::from_str(content)?;
    config.dataset_dir = config.dataset_dir.as_deref().map(resolve_path);
    config.tessdata_prefix = config.tessdata_prefix.as_deref().map(resolve_path);
    config.tesseract_cmd = resolve_env_vars(&config.tesseract_cmd);
    Ok(config)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

fn config_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".config").join("gradewise"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_GRADEWISE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_GRADEWISE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_GRADEWISE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars here"), "no vars here");
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_GRADEWISE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = GradewiseConfig::default();
        assert_eq!(config.tesseract_cmd, "tesseract");
        assert_eq!(config.ocr_timeout_secs, 60);
        assert!(config.open_after_save);
        assert!(config.dataset_dir.is_none());
    }

    #[test]
    fn parse_full_config() {
        let config = parse_config(
            r#"
dataset_dir = "/srv/grades"
tesseract_cmd = "/usr/local/bin/tesseract"
tessdata_prefix = "/usr/share/tessdata"
ocr_timeout_secs = 15
open_after_save = false
viewer_command = ["libreoffice", "--calc"]
"#,
        )
        .unwrap();

        assert_eq!(config.dataset_dir, Some(PathBuf::from("/srv/grades")));
        assert_eq!(config.tesseract_cmd, "/usr/local/bin/tesseract");
        assert_eq!(config.ocr_timeout_secs, 15);
        assert!(!config.open_after_save);
        assert_eq!(
            config.dataset_path().unwrap(),
            PathBuf::from("/srv/grades/evaluation_results.csv")
        );
        assert_eq!(
            config.viewer_command,
            Some(vec!["libreoffice".to_string(), "--calc".to_string()])
        );
    }

    #[test]
    fn parse_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, GradewiseConfig::default());
    }

    #[test]
    fn parse_rejects_bad_types() {
        assert!(parse_config("ocr_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradewise.toml");
        std::fs::write(&path, "ocr_timeout_secs = 5\nopen_after_save = false\n").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.ocr_timeout_secs, 5);
        assert!(!config.open_after_save);
    }

    #[test]
    fn extractor_and_viewer_follow_config() {
        let config = GradewiseConfig {
            tesseract_cmd: "my-ocr".into(),
            viewer_command: Some(vec!["true".into()]),
            ..Default::default()
        };
        assert_eq!(config.extractor().command(), "my-ocr");
        assert_eq!(
            config.viewer().strategy(),
            &OpenStrategy::Custom(vec!["true".into()])
        );
    }
}
