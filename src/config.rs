// src/config.rs
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;
use url::Url;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "SHEETCHECK_CONFIG";

static DEFAULT_SOURCE_URL: &str =
    "https://drive.google.com/uc?export=download&id=14bOzCd_cD6IDMu9_9gGLLqKaBL-_gqaA";
static DEFAULT_WORKSPACE_DIR: &str = "/var/lib/jenkins/workspace/IT Talent - Task 4";
static DEFAULT_INPUT_FILE_NAME: &str = "consultas_previas.csv";
static DEFAULT_REPORT_FILE_NAME: &str = "relatorio.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid source_url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("{field} must be a plain file name, got {value:?}")]
    NotAFileName { field: &'static str, value: String },
}

/// Everything a run needs to know. Defaults reproduce the fixed Jenkins job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet to download.
    pub source_url: String,
    /// Directory holding the downloaded file and the report.
    pub workspace_dir: PathBuf,
    /// Name of the intermediate CSV inside `workspace_dir`. Removed after every run.
    pub input_file_name: String,
    /// Name of the report inside `workspace_dir`. Kept.
    pub report_file_name: String,
    /// Optional whole-request timeout for the download (None = wait forever).
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            workspace_dir: PathBuf::from(DEFAULT_WORKSPACE_DIR),
            input_file_name: DEFAULT_INPUT_FILE_NAME.to_string(),
            report_file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Parse a TOML document; keys left out keep their defaults.
    pub fn from_toml_str(s: &str, origin: &Path) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s, path)
    }

    /// Load from `$SHEETCHECK_CONFIG` if it is set, otherwise use the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::from_file(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.source_url).map_err(|source| ConfigError::InvalidUrl {
            url: self.source_url.clone(),
            source,
        })?;
        check_file_name("input_file_name", &self.input_file_name)?;
        check_file_name("report_file_name", &self.report_file_name)?;
        Ok(())
    }

    pub fn input_path(&self) -> PathBuf {
        self.workspace_dir.join(&self.input_file_name)
    }

    pub fn report_path(&self) -> PathBuf {
        self.workspace_dir.join(&self.report_file_name)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Both files must live directly in the workspace.
fn check_file_name(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let p = Path::new(value);
    let single = p.file_name().map(|n| n == p.as_os_str()).unwrap_or(false);
    if value.is_empty() || !single {
        return Err(ConfigError::NotAFileName {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_jenkins_job() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.input_path(),
            PathBuf::from("/var/lib/jenkins/workspace/IT Talent - Task 4/consultas_previas.csv")
        );
        assert_eq!(
            cfg.report_path(),
            PathBuf::from("/var/lib/jenkins/workspace/IT Talent - Task 4/relatorio.txt")
        );
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str(
            r#"
workspace_dir = "/tmp/job"
timeout_secs = 30
"#,
            Path::new("inline.toml"),
        )
        .unwrap();
        assert_eq!(cfg.workspace_dir, PathBuf::from("/tmp/job"));
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cfg.input_file_name, "consultas_previas.csv");
        assert_eq!(cfg.source_url, Config::default().source_url);
    }

    #[test]
    fn test_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "source_url = \"http://127.0.0.1:9/data.csv\"").unwrap();
        writeln!(tmp, "report_file_name = \"out.txt\"").unwrap();
        let cfg = Config::from_file(tmp.path()).unwrap();
        assert_eq!(cfg.source_url, "http://127.0.0.1:9/data.csv");
        assert_eq!(cfg.report_file_name, "out.txt");
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = Config::from_toml_str("source_url = \"not a url\"", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_rejects_nested_file_names() {
        let err = Config::from_toml_str("input_file_name = \"../escape.csv\"", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotAFileName {
                field: "input_file_name",
                ..
            }
        ));

        let err = Config::from_toml_str("report_file_name = \"\"", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotAFileName { .. }));
    }

    #[test]
    fn test_unknown_syntax_is_parse_error() {
        let err = Config::from_toml_str("workspace_dir = [", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
