use crate::domain::ports::{ReferenceId, SaveTarget};
use crate::utils::error::{AppError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
struct Staged {
    payload: Vec<u8>,
    media_type: Option<String>,
}

/// 以本機下載目錄模擬瀏覽器的儲存流程：
/// 暫存內容並發出參照，觸發時寫入 `<dir>/<filename>`，最後釋放參照。
#[derive(Debug)]
pub struct DownloadDir {
    base_path: PathBuf,
    next_id: AtomicU64,
    staged: Mutex<HashMap<ReferenceId, Staged>>,
}

impl DownloadDir {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            next_id: AtomicU64::new(1),
            staged: Mutex::new(HashMap::new()),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 尚未釋放的參照數量
    pub fn live_references(&self) -> usize {
        self.staged().len()
    }

    fn staged(&self) -> MutexGuard<'_, HashMap<ReferenceId, Staged>> {
        self.staged.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SaveTarget for DownloadDir {
    fn create_reference(&self, payload: &[u8], media_type: Option<&str>) -> Result<ReferenceId> {
        let id = ReferenceId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.staged().insert(
            id,
            Staged {
                payload: payload.to_vec(),
                media_type: media_type.map(str::to_string),
            },
        );
        Ok(id)
    }

    fn activate(&self, reference: ReferenceId, filename: &str) -> Result<()> {
        let staged = self
            .staged()
            .get(&reference)
            .cloned()
            .ok_or_else(|| AppError::SaveError {
                message: format!("unknown reference {:?}", reference),
            })?;

        let full_path = self.base_path.join(filename);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, &staged.payload)?;

        tracing::info!(
            "📁 Saved {} ({} bytes, {})",
            full_path.display(),
            staged.payload.len(),
            staged.media_type.as_deref().unwrap_or("unknown type")
        );
        Ok(())
    }

    fn revoke(&self, reference: ReferenceId) {
        if self.staged().remove(&reference).is_none() {
            tracing::warn!("Reference {:?} was already revoked", reference);
        }
    }
}
