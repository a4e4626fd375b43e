use crate::core::controller::{ExportConfig, EXPORT_PATH};
use crate::core::response::ServerErrorParser;
use crate::domain::model::{default_users, ExportVariant, UserRecord};
use crate::utils::error::{AppError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub export: ExportSection,
    #[serde(default)]
    pub download: DownloadSection,
    #[serde(default = "default_users")]
    pub users: Vec<UserRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSection {
    pub base_url: String,
    #[serde(default)]
    pub variant: ExportVariant,
    pub path: Option<String>,
    pub filename: Option<String>,
    /// 覆寫媒體類型限制；空字串代表不檢查
    pub media_type: Option<String>,
    #[serde(default)]
    pub error_detail: ErrorDetail,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorDetail {
    #[default]
    Structured,
    StatusOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSection {
    pub dir: String,
}

impl Default for DownloadSection {
    fn default() -> Self {
        Self {
            dir: DEFAULT_DOWNLOAD_DIR.to_string(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            export: ExportSection {
                base_url: DEFAULT_BASE_URL.to_string(),
                variant: ExportVariant::default(),
                path: None,
                filename: None,
                media_type: None,
                error_detail: ErrorDetail::default(),
                timeout_seconds: None,
            },
            download: DownloadSection::default(),
            users: default_users(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AppError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AppError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${REPORT_HOST})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AppError::ConfigParseError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 命令列參數優先於檔案
    pub fn apply_overrides(
        &mut self,
        base_url: Option<String>,
        variant: Option<ExportVariant>,
        download_dir: Option<String>,
    ) {
        if let Some(base_url) = base_url {
            tracing::debug!("🔧 base_url overridden to: {}", base_url);
            self.export.base_url = base_url;
        }
        if let Some(variant) = variant {
            tracing::debug!("🔧 variant overridden to: {:?}", variant);
            self.export.variant = variant;
        }
        if let Some(dir) = download_dir {
            tracing::debug!("🔧 download dir overridden to: {}", dir);
            self.download.dir = dir;
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("export.base_url", &self.export.base_url)?;

        if let Some(path) = &self.export.path {
            if !path.starts_with('/') {
                return Err(AppError::InvalidConfigValueError {
                    field: "export.path".to_string(),
                    value: path.clone(),
                    reason: "Path must start with '/'".to_string(),
                });
            }
        }

        validation::validate_filename("export.filename", &self.filename())?;
        validation::validate_path("download.dir", &self.download.dir)?;
        validation::validate_unique_ids("users", self.users.iter().map(|u| u.id))?;

        if self.export.timeout_seconds == Some(0) {
            return Err(AppError::InvalidConfigValueError {
                field: "export.timeout_seconds".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        Ok(())
    }

    pub fn filename(&self) -> String {
        self.export
            .filename
            .clone()
            .unwrap_or_else(|| self.export.variant.filename().to_string())
    }

    pub fn download_dir(&self) -> &str {
        &self.download.dir
    }

    /// 組出 controller 需要的固定參數
    pub fn export_config(&self) -> ExportConfig {
        let section = &self.export;
        let path = section.path.as_deref().unwrap_or(EXPORT_PATH);

        let media_type = match section.media_type.as_deref() {
            Some("") => None,
            Some(media_type) => Some(media_type.to_string()),
            None => section.variant.media_type_constraint().map(str::to_string),
        };

        let error_parser = match section.error_detail {
            ErrorDetail::Structured => ServerErrorParser::Structured,
            ErrorDetail::StatusOnly => ServerErrorParser::StatusOnly,
        };

        ExportConfig {
            url: format!("{}{}", section.base_url.trim_end_matches('/'), path),
            media_type,
            filename: self.filename(),
            action_label: section.variant.action_label().to_string(),
            error_parser,
            timeout: section.timeout_seconds.map(Duration::from_secs),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
