use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Per contract-type configuration of the automatic lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractPolicy {
    /// Contract-type identifier, e.g. "3_MONTHS" or "PERMANENT". Unique.
    pub contract_type: String,
    /// Length of the onboarding phase in days.
    pub onboarding_days: u32,
    /// Length of the probation phase in days.
    pub probation_days: u32,
    /// When false, the resolver freezes the employee's current category.
    pub auto_transitions_enabled: bool,
    /// When true, a passed contract end date forces INACTIVE.
    pub expire_to_inactive: bool,
    /// How many days before expiry the contract shows up in reports.
    pub expiry_notice_days: u32,
}

impl ContractPolicy {
    /// End of the probation phase, in days since start.
    pub fn probation_ends_day(&self) -> u32 {
        self.onboarding_days + self.probation_days
    }
}

/// Contract-type families used for default policy synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContractFamily {
    /// Fixed-term, 3 months or shorter.
    ShortFixedTerm,
    /// Fixed-term, longer than 3 months.
    LongFixedTerm,
    Permanent,
}

/// Parse the month count out of an "<N>_MONTHS" contract-type identifier.
fn parse_term_months(contract_type: &str) -> Option<u32> {
    let upper = contract_type.to_uppercase();
    let rest = upper.strip_suffix("_MONTHS").or_else(|| upper.strip_suffix("_MONTH"))?;
    rest.parse().ok()
}

fn classify(contract_type: &str) -> ContractFamily {
    let upper = contract_type.to_uppercase();
    if upper.contains("PERMANENT") || upper.contains("INDEFINITE") {
        return ContractFamily::Permanent;
    }
    match parse_term_months(contract_type) {
        Some(months) if months > 3 => ContractFamily::LongFixedTerm,
        // Unknown identifiers default to the short family: a too-short
        // probation is easier to correct than a missed expiry.
        _ => ContractFamily::ShortFixedTerm,
    }
}

/// Holds one [`ContractPolicy`] per contract type and synthesizes defaults
/// for types it has never seen. Read-mostly configuration; the engine
/// re-ensures defaults each sweep cycle so administrative edits are picked
/// up within one cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyRegistry {
    policies: BTreeMap<String, ContractPolicy>,
}

impl PolicyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently provision policies for the well-known contract types.
    pub fn ensure_defaults(&mut self) {
        for contract_type in ["3_MONTHS", "6_MONTHS", "12_MONTHS", "PERMANENT"] {
            if !self.policies.contains_key(contract_type) {
                let policy = Self::synthesize(contract_type);
                self.policies.insert(contract_type.to_string(), policy);
            }
        }
    }

    /// Look up the policy for a contract type, synthesizing and persisting
    /// a default when absent. A missing policy is expected on first use,
    /// not exceptional; persisting keeps future lookups stable.
    pub fn get_or_synthesize(&mut self, contract_type: &str) -> ContractPolicy {
        if let Some(policy) = self.policies.get(contract_type) {
            return policy.clone();
        }
        let policy = Self::synthesize(contract_type);
        self.policies.insert(contract_type.to_string(), policy.clone());
        policy
    }

    pub fn get(&self, contract_type: &str) -> Option<&ContractPolicy> {
        self.policies.get(contract_type)
    }

    /// Install or replace a policy (administrative edits, test fixtures).
    pub fn insert(&mut self, policy: ContractPolicy) {
        self.policies.insert(policy.contract_type.clone(), policy);
    }

    /// Default policy for a contract type, by family:
    ///
    /// - short fixed-term (≤ 3 months, and anything unrecognized):
    ///   onboarding 7, probation 7, expiry on, 14-day notice
    /// - long fixed-term: onboarding 14, probation 30 (14 for 6 months),
    ///   expiry on, 30-day notice
    /// - permanent: onboarding 14, no probation, expiry off
    fn synthesize(contract_type: &str) -> ContractPolicy {
        match classify(contract_type) {
            ContractFamily::ShortFixedTerm => ContractPolicy {
                contract_type: contract_type.to_string(),
                onboarding_days: 7,
                probation_days: 7,
                auto_transitions_enabled: true,
                expire_to_inactive: true,
                expiry_notice_days: 14,
            },
            ContractFamily::LongFixedTerm => {
                let probation = if parse_term_months(contract_type) <= Some(6) {
                    14
                } else {
                    30
                };
                ContractPolicy {
                    contract_type: contract_type.to_string(),
                    onboarding_days: 14,
                    probation_days: probation,
                    auto_transitions_enabled: true,
                    expire_to_inactive: true,
                    expiry_notice_days: 30,
                }
            }
            ContractFamily::Permanent => ContractPolicy {
                contract_type: contract_type.to_string(),
                onboarding_days: 14,
                probation_days: 0,
                auto_transitions_enabled: true,
                expire_to_inactive: false,
                expiry_notice_days: 0,
            },
        }
    }

    /// Derive the contract end date for a fixed-term contract that has
    /// none recorded: start date plus the term length. Permanent and
    /// unrecognized types yield `None`.
    pub fn derive_end_date(contract_type: &str, start: NaiveDate) -> Option<NaiveDate> {
        if classify(contract_type) == ContractFamily::Permanent {
            return None;
        }
        let months = parse_term_months(contract_type)?;
        start.checked_add_months(Months::new(months))
    }

    pub fn policies(&self) -> impl Iterator<Item = &ContractPolicy> {
        self.policies.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_month_defaults() {
        let mut registry = PolicyRegistry::new();
        let policy = registry.get_or_synthesize("3_MONTHS");
        assert_eq!(policy.onboarding_days, 7);
        assert_eq!(policy.probation_days, 7);
        assert!(policy.auto_transitions_enabled);
        assert!(policy.expire_to_inactive);
        assert_eq!(policy.expiry_notice_days, 14);
    }

    #[test]
    fn permanent_defaults_have_no_probation_or_expiry() {
        let mut registry = PolicyRegistry::new();
        let policy = registry.get_or_synthesize("PERMANENT");
        assert_eq!(policy.probation_days, 0);
        assert!(!policy.expire_to_inactive);
        assert_eq!(policy.expiry_notice_days, 0);
    }

    #[test]
    fn synthesized_policy_is_persisted() {
        let mut registry = PolicyRegistry::new();
        assert!(registry.get("9_MONTHS").is_none());
        let first = registry.get_or_synthesize("9_MONTHS");
        assert_eq!(registry.get("9_MONTHS"), Some(&first));
        // Stable on repeat lookup.
        assert_eq!(registry.get_or_synthesize("9_MONTHS"), first);
    }

    #[test]
    fn ensure_defaults_is_idempotent_and_keeps_edits() {
        let mut registry = PolicyRegistry::new();
        registry.ensure_defaults();
        let mut edited = registry.get("3_MONTHS").unwrap().clone();
        edited.probation_days = 21;
        registry.insert(edited.clone());

        registry.ensure_defaults();
        assert_eq!(registry.get("3_MONTHS"), Some(&edited));
    }

    #[test]
    fn unknown_types_fall_back_to_short_family() {
        let mut registry = PolicyRegistry::new();
        let policy = registry.get_or_synthesize("SEASONAL");
        assert_eq!(policy.onboarding_days, 7);
        assert_eq!(policy.probation_days, 7);
        assert!(policy.expire_to_inactive);
    }

    #[test]
    fn long_fixed_term_probation_scales_with_term() {
        let mut registry = PolicyRegistry::new();
        assert_eq!(registry.get_or_synthesize("6_MONTHS").probation_days, 14);
        assert_eq!(registry.get_or_synthesize("12_MONTHS").probation_days, 30);
    }

    #[test]
    fn derive_end_date_for_fixed_term() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            PolicyRegistry::derive_end_date("3_MONTHS", start),
            NaiveDate::from_ymd_opt(2024, 4, 1)
        );
        assert_eq!(PolicyRegistry::derive_end_date("PERMANENT", start), None);
        assert_eq!(PolicyRegistry::derive_end_date("SEASONAL", start), None);
    }
}
