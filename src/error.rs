#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => message.as_str(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<crate::db::dao::DaoLayerError> for AppError {
    fn from(err: crate::db::dao::DaoLayerError) -> Self {
        match err {
            crate::db::dao::DaoLayerError::NotFound { .. } => {
                AppError::not_found(err.to_string())
            }
            crate::db::dao::DaoLayerError::InvalidPagination { .. } => {
                AppError::bad_request(err.to_string())
            }
            crate::db::dao::DaoLayerError::Db(_) => AppError::internal(err.to_string()),
        }
    }
}

impl From<crate::resources::ResourceError> for AppError {
    fn from(err: crate::resources::ResourceError) -> Self {
        use crate::resources::ResourceError;

        match err {
            ResourceError::NotAuthenticated => AppError::unauthorized(err.to_string()),
            ResourceError::NotAuthorized(message) => AppError::forbidden(message),
            ResourceError::NotFound(message) => AppError::not_found(message),
            ResourceError::Validation(message) => AppError::bad_request(message),
            ResourceError::CountFailed { .. }
            | ResourceError::RangeFailed { .. }
            | ResourceError::Store { .. } => AppError::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use crate::db::dao::DaoLayerError;
    use crate::resources::ResourceError;

    use super::AppError;

    #[test]
    fn dao_not_found_maps_to_not_found() {
        let err = AppError::from(DaoLayerError::NotFound {
            entity: "scooter",
            id: Uuid::nil(),
        });
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn resource_errors_keep_their_message() {
        let err = AppError::from(ResourceError::NotAuthorized(
            "You are not authorized to delete this station".to_string(),
        ));
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(err.message(), "You are not authorized to delete this station");

        let err = AppError::from(ResourceError::CountFailed {
            resource: "partner stations",
            message: "connection reset".to_string(),
        });
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(
            err.message(),
            "Failed to fetch partner stations count: connection reset"
        );
    }
}
