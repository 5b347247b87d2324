use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::policy::ContractPolicy;
use super::status::StatusCategory;

/// The contract fields of an employee record the resolver reads. A plain
/// value type so the resolver stays a pure function of its inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmployeeSnapshot {
    pub start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
    pub current: StatusCategory,
}

/// The category an employee *should* be in, with a human-readable
/// justification that ends up in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub target: StatusCategory,
    pub reason: String,
}

impl Resolution {
    fn hold(current: StatusCategory, reason: impl Into<String>) -> Self {
        Self {
            target: current,
            reason: reason.into(),
        }
    }
}

/// Whole days elapsed since the start date, truncating, never negative.
/// A start date in the future counts as day zero (still onboarding).
pub fn days_since_start(start: NaiveDate, today: NaiveDate) -> i64 {
    (today - start).num_days().max(0)
}

/// Compute the status category that should currently apply.
///
/// Pure function of the snapshot, the policy and "today"; it never reads
/// prior calls and never writes anything. Rules in priority order:
///
/// 1. A manual current category (LEAVE, SUSPENDED, ...) is held as-is;
///    moving such an employee back into the automatic lifecycle takes an
///    explicit forced reconciliation.
/// 2. A passed contract end date forces INACTIVE when the policy expires
///    contracts to inactive. This dominates the phase rules below.
/// 3. Policies with automatic transitions disabled hold the current
///    category for any "today".
/// 4. Otherwise the phase is a function of whole days since the start
///    date: onboarding, then probation, then active.
pub fn resolve(snapshot: &EmployeeSnapshot, policy: &ContractPolicy, today: NaiveDate) -> Resolution {
    if snapshot.current.is_manual() {
        return Resolution::hold(
            snapshot.current,
            format!("manual status {} is held until forced", snapshot.current),
        );
    }
    resolve_forced(snapshot, policy, today)
}

/// [`resolve`] without the manual-status hold: used by forced
/// reconciliations that deliberately move an employee back into the
/// automatic lifecycle.
pub fn resolve_forced(
    snapshot: &EmployeeSnapshot,
    policy: &ContractPolicy,
    today: NaiveDate,
) -> Resolution {
    if policy.expire_to_inactive
        && let Some(end) = snapshot.contract_end_date
        && end <= today
    {
        return Resolution {
            target: StatusCategory::Inactive,
            reason: format!("contract ended on {end}"),
        };
    }

    if !policy.auto_transitions_enabled {
        return Resolution::hold(
            snapshot.current,
            format!(
                "auto transitions disabled for contract type {}",
                policy.contract_type
            ),
        );
    }

    let Some(start) = snapshot.start_date else {
        // Degraded record; surface the problem but never fail the caller.
        return Resolution::hold(snapshot.current, "start date missing, status unchanged");
    };

    let days = days_since_start(start, today);
    if days <= i64::from(policy.onboarding_days) {
        return Resolution {
            target: StatusCategory::Onboarding,
            reason: format!("onboarding day {days} of {}", policy.onboarding_days),
        };
    }

    let probation_ends = i64::from(policy.probation_ends_day());
    if days <= probation_ends {
        let remaining = probation_ends - days;
        return Resolution {
            target: StatusCategory::Probation,
            reason: format!("in probation, {remaining} days remaining"),
        };
    }

    Resolution {
        target: StatusCategory::Active,
        reason: "onboarding and probation completed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fixed_term_policy() -> ContractPolicy {
        ContractPolicy {
            contract_type: "3_MONTHS".into(),
            onboarding_days: 7,
            probation_days: 7,
            auto_transitions_enabled: true,
            expire_to_inactive: true,
            expiry_notice_days: 14,
        }
    }

    fn snapshot(start: NaiveDate, end: Option<NaiveDate>, current: StatusCategory) -> EmployeeSnapshot {
        EmployeeSnapshot {
            start_date: Some(start),
            contract_end_date: end,
            current,
        }
    }

    #[test]
    fn phases_in_order_for_seven_seven_policy() {
        let policy = fixed_term_policy();
        let start = date(2024, 1, 1);
        let snap = snapshot(start, None, StatusCategory::Onboarding);

        let r = resolve(&snap, &policy, date(2024, 1, 4)); // T+3
        assert_eq!(r.target, StatusCategory::Onboarding);

        let r = resolve(&snap, &policy, date(2024, 1, 11)); // T+10
        assert_eq!(r.target, StatusCategory::Probation);

        let r = resolve(&snap, &policy, date(2024, 1, 21)); // T+20
        assert_eq!(r.target, StatusCategory::Active);
    }

    #[test]
    fn resolver_is_pure_across_call_order() {
        let policy = fixed_term_policy();
        let snap = snapshot(date(2024, 1, 1), None, StatusCategory::Onboarding);

        let late = resolve(&snap, &policy, date(2024, 1, 21));
        let early = resolve(&snap, &policy, date(2024, 1, 4));
        assert_eq!(late.target, StatusCategory::Active);
        assert_eq!(early.target, StatusCategory::Onboarding);
        // Same inputs, same answer, regardless of what ran before.
        assert_eq!(resolve(&snap, &policy, date(2024, 1, 21)), late);
    }

    #[test]
    fn forced_expiry_dominates_phase_rules() {
        let policy = fixed_term_policy();
        // Day 2 of onboarding, but the contract already ended yesterday.
        let snap = snapshot(
            date(2024, 1, 1),
            Some(date(2024, 1, 2)),
            StatusCategory::Onboarding,
        );
        let r = resolve(&snap, &policy, date(2024, 1, 3));
        assert_eq!(r.target, StatusCategory::Inactive);
        assert!(r.reason.contains("contract ended on 2024-01-02"));
    }

    #[test]
    fn expiry_on_the_end_date_itself_counts() {
        let policy = fixed_term_policy();
        let snap = snapshot(
            date(2024, 1, 1),
            Some(date(2024, 4, 1)),
            StatusCategory::Active,
        );
        let r = resolve(&snap, &policy, date(2024, 4, 1));
        assert_eq!(r.target, StatusCategory::Inactive);
    }

    #[test]
    fn permanent_policy_ignores_end_date() {
        let policy = ContractPolicy {
            contract_type: "PERMANENT".into(),
            onboarding_days: 14,
            probation_days: 0,
            auto_transitions_enabled: true,
            expire_to_inactive: false,
            expiry_notice_days: 0,
        };
        let snap = snapshot(
            date(2023, 1, 1),
            Some(date(2023, 6, 1)),
            StatusCategory::Active,
        );
        let r = resolve(&snap, &policy, date(2024, 1, 1));
        assert_eq!(r.target, StatusCategory::Active);
    }

    #[test]
    fn disabled_auto_transitions_freeze_current_category() {
        let mut policy = fixed_term_policy();
        policy.auto_transitions_enabled = false;
        policy.expire_to_inactive = false;
        let snap = snapshot(date(2020, 1, 1), None, StatusCategory::Probation);

        for today in [date(2020, 1, 2), date(2022, 6, 1), date(2030, 12, 31)] {
            let r = resolve(&snap, &policy, today);
            assert_eq!(r.target, StatusCategory::Probation);
            assert!(r.reason.contains("auto transitions disabled"));
        }
    }

    #[test]
    fn manual_status_is_held() {
        let policy = fixed_term_policy();
        // Day 100: would be ACTIVE, but HR suspended them.
        let snap = snapshot(date(2024, 1, 1), None, StatusCategory::Suspended);
        let r = resolve(&snap, &policy, date(2024, 4, 10));
        assert_eq!(r.target, StatusCategory::Suspended);
    }

    #[test]
    fn forced_resolution_ignores_manual_hold() {
        let policy = fixed_term_policy();
        let snap = snapshot(date(2024, 1, 1), None, StatusCategory::Suspended);
        let r = resolve_forced(&snap, &policy, date(2024, 4, 10));
        assert_eq!(r.target, StatusCategory::Active);
    }

    #[test]
    fn future_start_date_is_day_zero() {
        let policy = fixed_term_policy();
        let snap = snapshot(date(2024, 6, 1), None, StatusCategory::Onboarding);
        let r = resolve(&snap, &policy, date(2024, 1, 1));
        assert_eq!(r.target, StatusCategory::Onboarding);
        assert!(r.reason.contains("day 0"));
    }

    #[test]
    fn missing_start_date_degrades_to_current() {
        let policy = fixed_term_policy();
        let snap = EmployeeSnapshot {
            start_date: None,
            contract_end_date: None,
            current: StatusCategory::Probation,
        };
        let r = resolve(&snap, &policy, date(2024, 1, 1));
        assert_eq!(r.target, StatusCategory::Probation);
        assert!(r.reason.contains("start date missing"));
    }

    #[test]
    fn phase_boundaries_are_inclusive() {
        let policy = fixed_term_policy();
        let snap = snapshot(date(2024, 1, 1), None, StatusCategory::Onboarding);

        // Day 7 is still onboarding, day 8 is probation.
        let r = resolve(&snap, &policy, date(2024, 1, 8));
        assert_eq!(r.target, StatusCategory::Onboarding);
        let r = resolve(&snap, &policy, date(2024, 1, 9));
        assert_eq!(r.target, StatusCategory::Probation);

        // Day 14 is still probation, day 15 is active.
        let r = resolve(&snap, &policy, date(2024, 1, 15));
        assert_eq!(r.target, StatusCategory::Probation);
        assert_eq!(r.reason, "in probation, 0 days remaining");
        let r = resolve(&snap, &policy, date(2024, 1, 16));
        assert_eq!(r.target, StatusCategory::Active);
    }

    #[test]
    fn concrete_three_month_scenario() {
        // Contract type 3_MONTHS, default policy, start 2024-01-01.
        let policy = fixed_term_policy();
        let start = date(2024, 1, 1);
        let end = Some(date(2024, 4, 1));
        let snap = snapshot(start, end, StatusCategory::Onboarding);

        assert_eq!(
            resolve(&snap, &policy, date(2024, 1, 3)).target,
            StatusCategory::Onboarding
        );
        let r = resolve(&snap, &policy, date(2024, 1, 10));
        assert_eq!(r.target, StatusCategory::Probation);
        assert!(r.reason.contains("5 days remaining"));
        // Day 10: probation ends at day 14, so 4 days remain.
        let r = resolve(&snap, &policy, date(2024, 1, 11));
        assert!(r.reason.contains("4 days remaining"));
        assert_eq!(
            resolve(&snap, &policy, date(2024, 1, 20)).target,
            StatusCategory::Active
        );
        assert_eq!(
            resolve(&snap, &policy, date(2024, 4, 1)).target,
            StatusCategory::Inactive
        );
        assert_eq!(
            resolve(&snap, &policy, date(2024, 5, 15)).target,
            StatusCategory::Inactive
        );
    }
}
