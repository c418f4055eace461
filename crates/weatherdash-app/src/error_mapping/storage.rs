use weatherdash_core::{AppError, StorageError};
use weatherdash_store::StoreError;

use super::IntoAppError;

impl IntoAppError for StoreError {
    fn into_app_error(self) -> AppError {
        let mapped = match &self {
            StoreError::Read { .. } => StorageError::ReadFailed(self.to_string()),
            StoreError::Write { .. } => StorageError::WriteFailed(self.to_string()),
            StoreError::Serialization(e) => StorageError::Serialization(e.to_string()),
        };
        AppError::Storage(mapped)
    }
}
