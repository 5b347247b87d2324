use thiserror::Error;

use crate::lifecycle::StatusCategory;
use crate::store::EmployeeId;

#[derive(Debug, Error)]
pub enum TenureError {
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    #[error("Employee is deleted: {0}")]
    EmployeeDeleted(EmployeeId),

    #[error("Employee already exists: {0}")]
    DuplicateEmployee(EmployeeId),

    #[error("No status definition with id {0} in the catalog")]
    UnknownStatus(u32),

    #[error("No status definition for category {0}; run the bootstrap first")]
    MissingCanonicalStatus(StatusCategory),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
