use crate::domain::model::{ExportRequestState, UserRecord};
use crate::domain::ports::Exporter;
use crate::utils::error::ExportError;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub const BUSY_LABEL: &str = "Exporting...";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred during export.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Completed,
    Failed(ExportError),
    /// 匯出進行中，按鈕停用
    Ignored,
}

/// 使用者名單畫面：持有名單、匯出狀態與匯出按鈕
pub struct DirectoryView<E: Exporter> {
    users: Vec<UserRecord>,
    exporter: E,
    state: Mutex<ExportRequestState>,
}

/// drop 時一定把 busy 清掉 (錯誤、panic 或 future 被丟棄都一樣)
struct BusyGuard<'a> {
    state: &'a Mutex<ExportRequestState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .busy = false;
    }
}

impl<E: Exporter> DirectoryView<E> {
    pub fn new(users: Vec<UserRecord>, exporter: E) -> Self {
        Self {
            users,
            exporter,
            state: Mutex::new(ExportRequestState::default()),
        }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    pub fn state(&self) -> ExportRequestState {
        self.lock_state().clone()
    }

    pub fn action_enabled(&self) -> bool {
        !self.lock_state().busy
    }

    pub fn action_label(&self) -> String {
        if self.lock_state().busy {
            BUSY_LABEL.to_string()
        } else {
            self.exporter.action_label().to_string()
        }
    }

    /// 按下匯出按鈕。進行中再按視為無效操作。
    pub async fn trigger_export(&self) -> TriggerOutcome {
        {
            let mut state = self.lock_state();
            if state.busy {
                tracing::debug!("Export already in progress, ignoring trigger");
                return TriggerOutcome::Ignored;
            }
            state.busy = true;
            state.last_error = None;
        }
        let _busy = BusyGuard { state: &self.state };

        match self.exporter.export().await {
            Ok(()) => TriggerOutcome::Completed,
            Err(e) => {
                let message = if e.message.trim().is_empty() {
                    UNEXPECTED_ERROR_MESSAGE.to_string()
                } else {
                    e.message.clone()
                };
                self.lock_state().last_error = Some(message);
                TriggerOutcome::Failed(e)
            }
        }
    }

    pub fn render(&self) -> String {
        let state = self.state();

        let name_width = self
            .users
            .iter()
            .map(|u| u.name.chars().count())
            .chain(std::iter::once("Name".len()))
            .max()
            .unwrap_or_default();
        let email_width = self
            .users
            .iter()
            .map(|u| u.email.chars().count())
            .chain(std::iter::once("Email".len()))
            .max()
            .unwrap_or_default();

        let mut lines = vec![
            "User Directory".to_string(),
            String::new(),
            format!("{:<name_width$} | {:<email_width$}", "Name", "Email"),
            format!("{}-+-{}", "-".repeat(name_width), "-".repeat(email_width)),
        ];
        for user in &self.users {
            lines.push(format!(
                "{:<name_width$} | {:<email_width$}",
                user.name, user.email
            ));
        }
        lines.push(String::new());

        if state.busy {
            lines.push(format!("[{}] (disabled)", BUSY_LABEL));
        } else {
            lines.push(format!("[{}]", self.exporter.action_label()));
        }

        if let Some(error) = &state.last_error {
            lines.push(format!("Error: {}", error));
        }

        lines
            .into_iter()
            .map(|line| line.trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn lock_state(&self) -> MutexGuard<'_, ExportRequestState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
