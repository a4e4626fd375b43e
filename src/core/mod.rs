pub mod controller;
pub mod directory;
pub mod response;

pub use crate::domain::model::{ExportArtifact, ExportRequestState, ExportVariant, UserRecord};
pub use crate::domain::ports::{Exporter, ReferenceId, SaveTarget};
pub use crate::utils::error::{ExportError, ExportErrorKind};
