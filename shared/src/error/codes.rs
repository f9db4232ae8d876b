//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Registration errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,

    // ==================== 1xxx: Registration ====================
    /// Submitted form failed input or business-rule checks
    RegistrationRejected = 1001,
    /// Email address already registered
    DuplicateEmail = 1002,
    /// More vegetarians than people
    VegetarianCountExceeded = 1003,
    /// Department segment not in the vocabulary
    DepartmentNotAllowed = 1004,
    /// Registration record type is missing from storage
    RegistrationTypeMissing = 1005,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Template rendering failed
    TemplateError = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",

            // Registration
            ErrorCode::RegistrationRejected => "Registration was rejected",
            ErrorCode::DuplicateEmail => "Email address already registered",
            ErrorCode::VegetarianCountExceeded => {
                "Number of vegetarians is higher than number of people"
            }
            ErrorCode::DepartmentNotAllowed => "Department is not allowed",
            ErrorCode::RegistrationTypeMissing => "Registration record type is not configured",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::TemplateError => "Template rendering failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),

            // Registration
            1001 => Ok(ErrorCode::RegistrationRejected),
            1002 => Ok(ErrorCode::DuplicateEmail),
            1003 => Ok(ErrorCode::VegetarianCountExceeded),
            1004 => Ok(ErrorCode::DepartmentNotAllowed),
            1005 => Ok(ErrorCode::RegistrationTypeMissing),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9006 => Ok(ErrorCode::TemplateError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::DuplicateEmail.code(), 1002);
        assert_eq!(ErrorCode::DepartmentNotAllowed.code(), 1004);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_u16() {
        assert_eq!(ErrorCode::try_from(1005), Ok(ErrorCode::RegistrationTypeMissing));
        assert_eq!(ErrorCode::try_from(9002), Ok(ErrorCode::DatabaseError));
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(2), Err(InvalidErrorCode(2)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
        assert_eq!(ErrorCode::DuplicateEmail.to_string(), "E1002");
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::DepartmentNotAllowed).unwrap();
        assert_eq!(json, "1004");
        let code: ErrorCode = serde_json::from_str("1001").unwrap();
        assert_eq!(code, ErrorCode::RegistrationRejected);
        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }
}
