use crate::utils::error::{ExtractorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "extractor.toml";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex"));

/// 整體設定檔，所有區段皆可省略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub enrichment: EnrichmentConfig,
    pub gemini: GeminiConfig,
    pub launcher: LauncherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_url(&self) -> String {
        format!("http://{}", self.address())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept_language: String,
    /// 影片頁面的逾時秒數
    pub page_timeout_secs: u64,
    /// 連結標題查詢的逾時秒數
    pub title_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            page_timeout_secs: 30,
            title_timeout_secs: 5,
        }
    }
}

impl HttpConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn title_timeout(&self) -> Duration {
        Duration::from_secs(self.title_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub max_concurrent: usize,
    pub cache_capacity: usize,
    pub short_title_max_chars: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrent: 10,
            cache_capacity: 100,
            short_title_max_chars: 25,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-pro".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl GeminiConfig {
    /// 設定檔的金鑰優先，其次是 GEMINI_API_KEY 環境變數
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub venv_dir: String,
    pub manifest: String,
    pub entry: String,
    pub python: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            venv_dir: "venv".to_string(),
            manifest: "requirements.txt".to_string(),
            entry: "app.py".to_string(),
            python: "python3".to_string(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExtractorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ExtractorError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 指定路徑時必須存在；未指定時若目錄下有預設檔案就載入，否則使用預設值
    pub fn load(explicit: Option<&Path>, base_dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => {
                tracing::debug!("Loading configuration from: {}", path.display());
                Self::from_file(path)
            }
            None => {
                let candidate = base_dir.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    tracing::debug!("Loading configuration from: {}", candidate.display());
                    Self::from_file(candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_range("server.port", self.server.port, 1, u16::MAX)?;

        validation::validate_non_empty_string("http.user_agent", &self.http.user_agent)?;
        validation::validate_range("http.page_timeout_secs", self.http.page_timeout_secs, 1, 600)?;
        validation::validate_range("http.title_timeout_secs", self.http.title_timeout_secs, 1, 300)?;

        validation::validate_positive_number(
            "enrichment.max_concurrent",
            self.enrichment.max_concurrent,
            1,
        )?;
        validation::validate_positive_number(
            "enrichment.cache_capacity",
            self.enrichment.cache_capacity,
            1,
        )?;
        validation::validate_positive_number(
            "enrichment.short_title_max_chars",
            self.enrichment.short_title_max_chars,
            1,
        )?;

        validation::validate_url("gemini.endpoint", &self.gemini.endpoint)?;
        validation::validate_non_empty_string("gemini.model", &self.gemini.model)?;

        validation::validate_path("launcher.venv_dir", &self.launcher.venv_dir)?;
        validation::validate_path("launcher.manifest", &self.launcher.manifest)?;
        validation::validate_path("launcher.entry", &self.launcher.entry)?;
        validation::validate_non_empty_string("launcher.python", &self.launcher.python)?;

        Ok(())
    }
}
