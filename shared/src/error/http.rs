//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::DepartmentNotAllowed => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists | Self::DuplicateEmail => StatusCode::CONFLICT,

            // 422 Unprocessable Entity (form re-rendered with field errors)
            Self::RegistrationRejected | Self::VegetarianCountExceeded => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 503 Service Unavailable (storage schema absent)
            Self::RegistrationTypeMissing => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::TemplateError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_status() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
    }

    #[test]
    fn test_registration_statuses() {
        assert_eq!(
            ErrorCode::DepartmentNotAllowed.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ErrorCode::DuplicateEmail.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::RegistrationRejected.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::RegistrationTypeMissing.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::TemplateError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_general_statuses() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::AlreadyExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::VegetarianCountExceeded.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
