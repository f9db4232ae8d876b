//! Department Model

use serde::{Deserialize, Serialize};

/// Vocabulary holding the departments allowed to register
pub const DEPARTMENT_VOCABULARY: &str = "annual_departments";

/// Department term (read-only reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DepartmentTerm {
    pub id: i64,
    pub vocabulary: String,
    pub name: String,
    pub weight: i64,
}

impl DepartmentTerm {
    /// Case-insensitive exact match against a URL segment
    pub fn matches(&self, candidate: &str) -> bool {
        self.name.to_lowercase() == candidate.to_lowercase()
    }
}
