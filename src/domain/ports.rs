use crate::domain::model::ExportArtifact;
use crate::utils::error::{ExportError, Result};
use async_trait::async_trait;

/// 暫存內容的短期參照，只在單次匯出內有效
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceId(pub u64);

/// 儲存端能力：暫存位元組、觸發儲存、釋放參照
pub trait SaveTarget: Send + Sync {
    fn create_reference(&self, payload: &[u8], media_type: Option<&str>) -> Result<ReferenceId>;
    fn activate(&self, reference: ReferenceId, filename: &str) -> Result<()>;
    fn revoke(&self, reference: ReferenceId);
}

/// 持有參照，drop 時釋放且只釋放一次
pub struct EphemeralReference<'a, S: SaveTarget + ?Sized> {
    target: &'a S,
    id: ReferenceId,
}

impl<'a, S: SaveTarget + ?Sized> EphemeralReference<'a, S> {
    pub fn create(target: &'a S, payload: &[u8], media_type: Option<&str>) -> Result<Self> {
        let id = target.create_reference(payload, media_type)?;
        tracing::debug!("Created ephemeral reference {:?}", id);
        Ok(Self { target, id })
    }

    pub fn id(&self) -> ReferenceId {
        self.id
    }
}

impl<S: SaveTarget + ?Sized> Drop for EphemeralReference<'_, S> {
    fn drop(&mut self) {
        self.target.revoke(self.id);
        tracing::debug!("Revoked ephemeral reference {:?}", self.id);
    }
}

/// 把成品交給儲存端：建立參照、觸發儲存，離開時釋放參照
pub fn present_artifact_for_save<S: SaveTarget + ?Sized>(
    target: &S,
    artifact: &ExportArtifact,
) -> Result<()> {
    let reference = EphemeralReference::create(
        target,
        &artifact.payload,
        artifact.declared_media_type.as_deref(),
    )?;
    target.activate(reference.id(), &artifact.suggested_filename)
}

#[async_trait]
pub trait Exporter: Send + Sync {
    fn action_label(&self) -> &str;
    async fn export(&self) -> std::result::Result<(), ExportError>;
}
