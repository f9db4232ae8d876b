//! Registration Model

use serde::{Deserialize, Serialize};

/// Record type name used for annual event registrations
pub const REGISTRATION_TYPE: &str = "registration";

/// Publication status of a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[serde(rename_all = "snake_case")]
#[repr(i32)]
pub enum RecordStatus {
    Unpublished = 0,
    Active = 1,
}

impl RecordStatus {
    pub fn from_published(published: bool) -> Self {
        if published {
            Self::Active
        } else {
            Self::Unpublished
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Registration entity (one employee's attendance for the annual event)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Registration {
    pub id: i64,
    pub record_type: String,
    /// Sanitized employee name as an HTML fragment.
    /// Text is entity-encoded (`Tom &amp; Jerry`); render it without escaping again.
    pub title: String,
    /// Employee name exactly as submitted
    pub employee_name: String,
    pub brings_plus_one: bool,
    pub kids_count: i64,
    pub vegetarian_count: i64,
    pub email_address: String,
    pub department: Option<String>,
    pub status: RecordStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Registration {
    /// Registering employee + optional plus one + kids
    pub fn total_people(&self) -> i64 {
        self.kids_count + i64::from(self.brings_plus_one) + 1
    }
}

/// Create registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationCreate {
    pub record_type: String,
    pub title: String,
    pub employee_name: String,
    pub brings_plus_one: bool,
    pub kids_count: i64,
    pub vegetarian_count: i64,
    pub email_address: String,
    pub department: Option<String>,
    pub status: RecordStatus,
}

/// Searchable registration columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    EmailAddress,
    EmployeeName,
    Department,
}

impl RecordField {
    /// Column name in the `record` table
    pub fn column(&self) -> &'static str {
        match self {
            Self::EmailAddress => "email_address",
            Self::EmployeeName => "employee_name",
            Self::Department => "department",
        }
    }
}

/// Filter for aggregate counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountFilter {
    pub record_type: String,
    pub status: RecordStatus,
}

impl CountFilter {
    /// Active records of the given type
    pub fn active(record_type: impl Into<String>) -> Self {
        Self {
            record_type: record_type.into(),
            status: RecordStatus::Active,
        }
    }
}

/// Count payload returned by the registrations API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationCount {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_status_from_published() {
        assert_eq!(RecordStatus::from_published(true), RecordStatus::Active);
        assert_eq!(RecordStatus::from_published(false), RecordStatus::Unpublished);
        assert!(RecordStatus::Active.is_active());
        assert!(!RecordStatus::Unpublished.is_active());
    }

    #[test]
    fn test_total_people() {
        let registration = Registration {
            id: 1,
            record_type: REGISTRATION_TYPE.to_string(),
            title: "Alice".to_string(),
            employee_name: "Alice".to_string(),
            brings_plus_one: true,
            kids_count: 2,
            vegetarian_count: 0,
            email_address: "alice@example.com".to_string(),
            department: Some("it".to_string()),
            status: RecordStatus::Active,
            created_at: 0,
            updated_at: 0,
        };
        assert_eq!(registration.total_people(), 4);
    }

    #[test]
    fn test_count_filter_active() {
        let filter = CountFilter::active(REGISTRATION_TYPE);
        assert_eq!(filter.record_type, "registration");
        assert_eq!(filter.status, RecordStatus::Active);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&RecordStatus::Unpublished).unwrap();
        assert_eq!(json, "\"unpublished\"");
    }
}
