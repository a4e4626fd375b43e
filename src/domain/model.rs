use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub name: String,
    pub email: String,
}

impl UserRecord {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }
}

/// 啟動時的預設名單
pub fn default_users() -> Vec<UserRecord> {
    vec![
        UserRecord::new(1, "Alice Smith", "alice@example.com"),
        UserRecord::new(2, "Bob Johnson", "bob@example.com"),
    ]
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRequestState {
    pub busy: bool,
    pub last_error: Option<String>,
}

/// 從回應建立、交給儲存端後即丟棄
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub payload: Vec<u8>,
    pub declared_media_type: Option<String>,
    pub suggested_filename: String,
    /// Content-Disposition 帶的檔名，只記錄不採用
    pub disposition_filename: Option<String>,
}

/// 匯出種類，決定固定檔名與媒體類型限制
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportVariant {
    #[default]
    Csv,
    Ppt,
    Markdown,
}

impl ExportVariant {
    pub fn filename(&self) -> &'static str {
        match self {
            ExportVariant::Csv => "users.csv",
            ExportVariant::Ppt => "users.ppt",
            ExportVariant::Markdown => "user_list.md",
        }
    }

    pub fn media_type_constraint(&self) -> Option<&'static str> {
        match self {
            ExportVariant::Markdown => Some("markdown"),
            ExportVariant::Csv | ExportVariant::Ppt => None,
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            ExportVariant::Csv => "Export to CSV",
            ExportVariant::Ppt => "Export to PPT",
            ExportVariant::Markdown => "Export to Markdown",
        }
    }
}
