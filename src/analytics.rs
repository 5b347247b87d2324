//! Read-only aggregations for dashboards and reports. Everything here
//! re-runs the resolver through `preview` and reads the store; nothing
//! ever reconciles or writes.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::lifecycle::PolicyRegistry;
use crate::reconciler::LifecycleEngine;
use crate::store::{EmployeeId, EmployeeStore};

/// Urgency buckets for contracts approaching their end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryUrgency {
    Critical,
    High,
    Medium,
    Low,
}

impl ExpiryUrgency {
    /// ≤7 days is critical, ≤14 high, ≤30 medium, anything further low.
    pub fn for_days_left(days_left: i64) -> Self {
        match days_left {
            d if d <= 7 => ExpiryUrgency::Critical,
            d if d <= 14 => ExpiryUrgency::High,
            d if d <= 30 => ExpiryUrgency::Medium,
            _ => ExpiryUrgency::Low,
        }
    }
}

/// One row of the expiry report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiringContract {
    pub employee_id: EmployeeId,
    pub name: String,
    pub contract_type: String,
    pub end_date: NaiveDate,
    pub days_left: i64,
    pub urgency: ExpiryUrgency,
    pub manager_id: Option<EmployeeId>,
}

/// Employees whose contract ends within the window, soonest first.
///
/// `window_days: None` uses each contract type's own `expiry_notice_days`,
/// which is what the notification side of the HR application wants;
/// an explicit window serves ad-hoc reports. Contracts already past their
/// end date are the reconciler's business and are excluded here.
pub fn expiring_contracts_at<S: EmployeeStore>(
    engine: &LifecycleEngine<S>,
    today: NaiveDate,
    window_days: Option<i64>,
) -> Vec<ExpiringContract> {
    let registry = engine.registry_snapshot();
    let mut rows = Vec::new();

    for id in engine.store().all_ids() {
        let Ok(record) = engine.store().get(&id) else {
            continue;
        };
        let end = record.contract_end_date.or_else(|| {
            record
                .start_date
                .and_then(|start| PolicyRegistry::derive_end_date(&record.contract_type, start))
        });
        let Some(end) = end else { continue };
        if end < today {
            continue;
        }

        let days_left = (end - today).num_days();
        let window = window_days.unwrap_or_else(|| {
            registry
                .get(&record.contract_type)
                .map(|p| i64::from(p.expiry_notice_days))
                .unwrap_or(0)
        });
        if days_left > window {
            continue;
        }

        rows.push(ExpiringContract {
            employee_id: record.id.clone(),
            name: record.name.clone(),
            contract_type: record.contract_type.clone(),
            end_date: end,
            days_left,
            urgency: ExpiryUrgency::for_days_left(days_left),
            manager_id: record.manager_id.clone(),
        });
    }

    rows.sort_by_key(|r| (r.days_left, r.employee_id.clone()));
    rows
}

pub fn expiring_contracts<S: EmployeeStore>(
    engine: &LifecycleEngine<S>,
    window_days: Option<i64>,
) -> Vec<ExpiringContract> {
    expiring_contracts_at(engine, Utc::now().date_naive(), window_days)
}

/// Current vs. required status across the population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionMatrix {
    /// Count of employees per current category.
    pub distribution: BTreeMap<String, usize>,
    /// Pending transitions as "FROM -> TO" pairs.
    pub pending: BTreeMap<String, usize>,
    /// Pending-transition counts grouped by line manager.
    pub pending_by_manager: BTreeMap<String, usize>,
    /// Records the resolver could not evaluate.
    pub errors: usize,
}

impl TransitionMatrix {
    pub fn total_pending(&self) -> usize {
        self.pending.values().sum()
    }
}

/// Build the dashboard breakdown by previewing every employee. Never
/// reconciles.
pub fn transition_matrix_at<S: EmployeeStore>(
    engine: &LifecycleEngine<S>,
    today: NaiveDate,
) -> TransitionMatrix {
    let mut matrix = TransitionMatrix::default();

    for id in engine.store().all_ids() {
        let preview = match engine.preview_at(&id, today) {
            Ok(p) => p,
            Err(_) => {
                matrix.errors += 1;
                continue;
            }
        };

        *matrix
            .distribution
            .entry(preview.current_category.to_string())
            .or_insert(0) += 1;

        if preview.needs_update {
            let pair = format!("{} -> {}", preview.current_category, preview.required_category);
            *matrix.pending.entry(pair).or_insert(0) += 1;

            let manager = engine
                .store()
                .get(&id)
                .ok()
                .and_then(|r| r.manager_id)
                .map(|m| m.to_string())
                .unwrap_or_else(|| "(no manager)".to_string());
            *matrix.pending_by_manager.entry(manager).or_insert(0) += 1;
        }
    }

    matrix
}

pub fn transition_matrix<S: EmployeeStore>(engine: &LifecycleEngine<S>) -> TransitionMatrix {
    transition_matrix_at(engine, Utc::now().date_naive())
}
