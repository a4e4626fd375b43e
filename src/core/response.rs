use crate::utils::error::{ExportError, Result as AppResult};
use serde_json::Value;

/// 非 2xx 回應時，如何從 body 取出錯誤訊息
#[derive(Debug, Clone, Copy, Default)]
pub enum ServerErrorParser {
    /// 先試 JSON 的 `message`，失敗再附上原始文字
    #[default]
    Structured,
    /// 只回報狀態碼
    StatusOnly,
    Custom(fn(u16, &[u8]) -> String),
}

impl ServerErrorParser {
    pub fn parse(&self, status: u16, body: &[u8]) -> String {
        match self {
            ServerErrorParser::Structured => structured_message(status, body),
            ServerErrorParser::StatusOnly => status_message(status),
            ServerErrorParser::Custom(parse) => parse(status, body),
        }
    }
}

pub fn status_message(status: u16) -> String {
    format!("HTTP error, status={}", status)
}

pub fn structured_message(status: u16, body: &[u8]) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_slice::<Value>(body) {
        if let Some(message) = obj.get("message").and_then(scalar_text) {
            return message;
        }
    }

    let mut message = status_message(status);
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        message.push_str(": ");
        message.push_str(text);
    }
    message
}

/// 字串、數字、布林轉成文字；null、空字串、物件與陣列不算
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// 比對時忽略大小寫與參數 (例如 `; charset=utf-8`)
pub fn media_type_matches(expected: &str, declared: &str) -> bool {
    let expected = essence(expected);
    !expected.is_empty() && essence(declared).contains(&expected)
}

fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// 沒有限制時直接通過
pub fn check_media_type(
    constraint: Option<&str>,
    declared: Option<&str>,
) -> std::result::Result<(), ExportError> {
    let Some(expected) = constraint else {
        return Ok(());
    };

    match declared {
        Some(declared) if media_type_matches(expected, declared) => Ok(()),
        Some(declared) => Err(ExportError::unexpected_type(declared)),
        None => Err(ExportError::unexpected_type("missing content type")),
    }
}

pub fn disposition_filename(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            if key.trim().eq_ignore_ascii_case("filename") {
                Some(value.trim().trim_matches('"').to_string())
            } else {
                None
            }
        })
        .filter(|name| !name.is_empty())
}

/// 儲存端錯誤轉成匯出錯誤
pub(crate) fn save_failure<T>(result: AppResult<T>) -> std::result::Result<T, ExportError> {
    result.map_err(|e| match e {
        crate::utils::error::AppError::SaveError { message } => ExportError::save(message),
        other => ExportError::save(other.to_string()),
    })
}
