use std::fmt;
use thiserror::Error;

/// 匯出失敗的分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportErrorKind {
    /// 伺服器回傳非 2xx 狀態
    Http,
    /// 2xx 但宣告的媒體類型不符合限制
    UnexpectedType,
    /// 請求已送出但沒有收到回應
    Network,
    /// 請求無法建立或送出
    Client,
    /// 儲存端失敗 (暫存或觸發儲存)
    Save,
}

impl ExportErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportErrorKind::Http => "http",
            ExportErrorKind::UnexpectedType => "unexpected_type",
            ExportErrorKind::Network => "network",
            ExportErrorKind::Client => "client",
            ExportErrorKind::Save => "save",
        }
    }
}

impl fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 匯出流程對外唯一的錯誤形狀
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ExportError {
    pub kind: ExportErrorKind,
    pub message: String,
}

impl ExportError {
    pub fn new(kind: ExportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::new(ExportErrorKind::Http, message)
    }

    pub fn unexpected_type(message: impl Into<String>) -> Self {
        Self::new(ExportErrorKind::UnexpectedType, message)
    }

    pub fn save(message: impl Into<String>) -> Self {
        Self::new(ExportErrorKind::Save, format!("save failed: {}", message.into()))
    }

    /// 將 reqwest 的錯誤區分為「請求未送出」與「沒有收到回應」
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            Self::new(
                ExportErrorKind::Client,
                format!("request could not be sent: {}", err),
            )
        } else if err.is_body() || err.is_decode() {
            Self::new(
                ExportErrorKind::Network,
                format!("response body could not be read: {}", err),
            )
        } else {
            Self::new(
                ExportErrorKind::Network,
                format!("no response received: {}", err),
            )
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Export failed ({}): {}", .0.kind, .0.message)]
    ExportError(#[from] ExportError),

    #[error("Save error: {message}")]
    SaveError { message: String },
}

impl AppError {
    /// CLI 的結束碼
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ExportError(_) | AppError::SaveError { .. } => 2,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
