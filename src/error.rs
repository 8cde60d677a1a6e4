use sea_orm::DbErr;
use thiserror::Error;

/// Failures surfaced by the photo store.
///
/// Nothing is retried internally, the caller of the failing operation decides
/// what to do.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Photo storage is unavailable: {0}")]
    StorageUnavailable(#[from] DbErr),

    #[error("No photo with id {0}")]
    NotFound(i64),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(StoreError::NotFound(7).to_string(), "No photo with id 7");

        let err: StoreError = DbErr::Custom("disk full".into()).into();
        assert!(err.to_string().starts_with("Photo storage is unavailable"));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(StoreError::NotFound(1).is_not_found());
        assert!(!StoreError::from(DbErr::Custom("x".into())).is_not_found());
    }
}
