use crate::core::response::{check_media_type, disposition_filename, save_failure, ServerErrorParser};
use crate::domain::model::{ExportArtifact, ExportVariant};
use crate::domain::ports::{present_artifact_for_save, Exporter, SaveTarget};
use crate::utils::error::ExportError;
use reqwest::header::{HeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::sync::Mutex;

pub const EXPORT_PATH: &str = "/api/users/export";

/// 單一匯出流程的固定參數
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub url: String,
    pub media_type: Option<String>,
    pub filename: String,
    pub action_label: String,
    pub error_parser: ServerErrorParser,
    pub timeout: Option<Duration>,
}

impl ExportConfig {
    pub fn for_variant(base_url: &str, variant: ExportVariant) -> Self {
        Self {
            url: format!("{}{}", base_url.trim_end_matches('/'), EXPORT_PATH),
            media_type: variant.media_type_constraint().map(str::to_string),
            filename: variant.filename().to_string(),
            action_label: variant.action_label().to_string(),
            error_parser: ServerErrorParser::default(),
            timeout: None,
        }
    }

    pub fn with_error_parser(mut self, parser: ServerErrorParser) -> Self {
        self.error_parser = parser;
        self
    }

    /// 空字串視為不檢查
    pub fn with_media_type(mut self, media_type: Option<String>) -> Self {
        self.media_type = media_type.filter(|m| !m.trim().is_empty());
        self
    }
}

pub struct ExportController<S: SaveTarget> {
    config: ExportConfig,
    target: S,
    client: Client,
    in_flight: Mutex<()>,
}

impl<S: SaveTarget> ExportController<S> {
    pub fn new(config: ExportConfig, target: S) -> Self {
        Self::with_client(config, target, Client::new())
    }

    pub fn with_client(config: ExportConfig, target: S, client: Client) -> Self {
        Self {
            config,
            target,
            client,
            in_flight: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    /// 取得成品並交給儲存端。成功只代表儲存已觸發。
    pub async fn export(&self) -> Result<(), ExportError> {
        // 同一個 controller 的呼叫依序執行
        let _in_flight = self.in_flight.lock().await;

        match self.run().await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!(kind = e.kind.as_str(), "❌ Export failed: {}", e.message);
                Err(e)
            }
        }
    }

    async fn run(&self) -> Result<(), ExportError> {
        tracing::debug!("Making export request to: {}", self.config.url);

        let mut request = self.client.get(&self.config.url);
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ExportError::from_transport(&e))?;

        let status = response.status();
        tracing::debug!("Export response status: {}", status);

        if !status.is_success() {
            // body 讀取失敗時仍回報原本的 HTTP 錯誤
            let body = match response.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    tracing::debug!("Failed to read error body: {}", e);
                    Vec::new()
                }
            };
            let message = self.config.error_parser.parse(status.as_u16(), &body);
            return Err(ExportError::http(message));
        }

        let artifact = self.read_artifact(response).await?;
        check_media_type(
            self.config.media_type.as_deref(),
            artifact.declared_media_type.as_deref(),
        )?;

        save_failure(present_artifact_for_save(&self.target, &artifact))?;

        tracing::info!(
            "✅ Export saved as {} ({} bytes)",
            artifact.suggested_filename,
            artifact.payload.len()
        );
        Ok(())
    }

    async fn read_artifact(&self, response: Response) -> Result<ExportArtifact, ExportError> {
        let headers = response.headers();
        let declared_media_type = headers.get(CONTENT_TYPE).map(header_text);
        let disposition = headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(disposition_filename);

        if let Some(name) = &disposition {
            tracing::debug!(
                "Server suggested filename '{}', using '{}'",
                name,
                self.config.filename
            );
        }

        let payload = response
            .bytes()
            .await
            .map_err(|e| ExportError::from_transport(&e))?
            .to_vec();

        tracing::debug!(
            "Received {} bytes, content type: {:?}",
            payload.len(),
            declared_media_type
        );

        Ok(ExportArtifact {
            payload,
            declared_media_type,
            suggested_filename: self.config.filename.clone(),
            disposition_filename: disposition,
        })
    }
}

/// 非 ASCII 的 header 也保留原值，錯誤訊息才看得到宣告的類型
fn header_text(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

#[async_trait::async_trait]
impl<S: SaveTarget> Exporter for ExportController<S> {
    fn action_label(&self) -> &str {
        &self.config.action_label
    }

    async fn export(&self) -> Result<(), ExportError> {
        ExportController::export(self).await
    }
}
