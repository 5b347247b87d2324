use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::EmployeeId;

/// Append-only record of one automatic (or forced) status transition.
/// Created only by the reconciler; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub old_status: String,
    pub new_status: String,
    /// The resolver's justification for the transition.
    pub reason: String,
    /// True for engine-driven transitions, false for manual overrides.
    pub automatic: bool,
    /// Triggering actor; `None` means the system itself.
    pub actor: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub contract_type: String,
    pub days_since_start: Option<i64>,
    /// Whether this came from a `force=true` reconciliation.
    pub forced: bool,
}

impl TransitionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        employee_id: EmployeeId,
        old_status: &str,
        new_status: &str,
        reason: &str,
        actor: Option<String>,
        contract_type: &str,
        days_since_start: Option<i64>,
        forced: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            old_status: old_status.to_string(),
            new_status: new_status.to_string(),
            reason: reason.to_string(),
            automatic: actor.is_none(),
            actor,
            timestamp: Utc::now(),
            contract_type: contract_type.to_string(),
            days_since_start,
            forced,
        }
    }
}

/// Audit entry for a contract extension. An extension is a contract event,
/// not a status transition, so it gets its own record type; the status
/// consequence (if any) shows up as a separate [`TransitionRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractExtensionRecord {
    pub id: Uuid,
    pub employee_id: EmployeeId,
    pub previous_end: Option<NaiveDate>,
    pub new_end: NaiveDate,
    /// 1 for the first extension, counting up.
    pub extension_number: u32,
    pub actor: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ContractExtensionRecord {
    pub fn new(
        employee_id: EmployeeId,
        previous_end: Option<NaiveDate>,
        new_end: NaiveDate,
        extension_number: u32,
        actor: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            employee_id,
            previous_end,
            new_end,
            extension_number,
            actor,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_transitions_are_automatic() {
        let record = TransitionRecord::new(
            EmployeeId::from("e1"),
            "Onboarding",
            "Probation",
            "onboarding day 8 of 7",
            None,
            "3_MONTHS",
            Some(8),
            false,
        );
        assert!(record.automatic);
        assert_eq!(record.old_status, "Onboarding");
        assert_eq!(record.new_status, "Probation");
    }

    #[test]
    fn actor_initiated_transitions_are_not_automatic() {
        let record = TransitionRecord::new(
            EmployeeId::from("e1"),
            "Suspended",
            "Active",
            "forced back into the automatic lifecycle",
            Some("hr.lead".into()),
            "PERMANENT",
            Some(400),
            true,
        );
        assert!(!record.automatic);
        assert!(record.forced);
        assert_eq!(record.actor.as_deref(), Some("hr.lead"));
    }

    #[test]
    fn transition_record_serializes() {
        let record = TransitionRecord::new(
            EmployeeId::from("e2"),
            "Probation",
            "Active",
            "onboarding and probation completed",
            None,
            "6_MONTHS",
            Some(40),
            false,
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: TransitionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
