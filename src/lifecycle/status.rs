use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of employee status categories.
///
/// The first four are the automatic lifecycle the engine drives:
/// ONBOARDING → PROBATION → ACTIVE → INACTIVE. The rest are manual
/// categories set by HR; the resolver never targets them and the
/// reconciler never overrides them without an explicit force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCategory {
    Onboarding,
    Probation,
    Active,
    Inactive,
    Leave,
    Suspended,
    Terminated,
    Resigned,
    Vacant,
}

impl StatusCategory {
    /// Whether this category belongs to the automatic lifecycle.
    pub fn is_automatic(self) -> bool {
        matches!(
            self,
            StatusCategory::Onboarding
                | StatusCategory::Probation
                | StatusCategory::Active
                | StatusCategory::Inactive
        )
    }

    /// Whether this category is a manual HR-set state.
    pub fn is_manual(self) -> bool {
        !self.is_automatic()
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusCategory::Onboarding => "ONBOARDING",
            StatusCategory::Probation => "PROBATION",
            StatusCategory::Active => "ACTIVE",
            StatusCategory::Inactive => "INACTIVE",
            StatusCategory::Leave => "LEAVE",
            StatusCategory::Suspended => "SUSPENDED",
            StatusCategory::Terminated => "TERMINATED",
            StatusCategory::Resigned => "RESIGNED",
            StatusCategory::Vacant => "VACANT",
        };
        write!(f, "{s}")
    }
}

/// A single entry in the status catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDefinition {
    pub id: u32,
    pub name: String,
    pub category: StatusCategory,
    /// Whether employees in this status count toward headcount.
    pub affects_headcount: bool,
    /// Whether employees in this status appear on the org chart.
    pub visible_in_org_chart: bool,
    /// Whether new hires start in this status.
    pub default_for_new_hires: bool,
    /// Soft-delete flag; deleted definitions are never resolver targets.
    #[serde(default)]
    pub deleted: bool,
}

/// The fixed set of status definitions, provisioned once at bootstrap and
/// otherwise slow-changing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCatalog {
    definitions: Vec<StatusDefinition>,
}

impl StatusCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently provision one definition per category.
    ///
    /// Safe to call at every bootstrap and at the start of every sweep
    /// cycle; categories that already have a non-deleted definition are
    /// left untouched.
    pub fn ensure_defaults(&mut self) {
        let defaults: &[(StatusCategory, &str, bool, bool, bool)] = &[
            (StatusCategory::Onboarding, "Onboarding", true, true, true),
            (StatusCategory::Probation, "Probation", true, true, false),
            (StatusCategory::Active, "Active", true, true, false),
            (StatusCategory::Inactive, "Inactive", false, false, false),
            (StatusCategory::Leave, "On leave", true, true, false),
            (StatusCategory::Suspended, "Suspended", false, true, false),
            (StatusCategory::Terminated, "Terminated", false, false, false),
            (StatusCategory::Resigned, "Resigned", false, false, false),
            (StatusCategory::Vacant, "Vacant position", false, true, false),
        ];

        for &(category, name, headcount, org_chart, new_hire) in defaults {
            if self.canonical_for(category).is_some() {
                continue;
            }
            let id = self.next_id();
            self.definitions.push(StatusDefinition {
                id,
                name: name.to_string(),
                category,
                affects_headcount: headcount,
                visible_in_org_chart: org_chart,
                default_for_new_hires: new_hire,
                deleted: false,
            });
        }
    }

    fn next_id(&self) -> u32 {
        self.definitions.iter().map(|d| d.id).max().unwrap_or(0) + 1
    }

    /// The canonical definition for a category: the non-deleted entry with
    /// the lowest id. Duplicate definitions per category can exist after
    /// administrative edits; lowest-id wins so resolution is deterministic.
    pub fn canonical_for(&self, category: StatusCategory) -> Option<&StatusDefinition> {
        self.definitions
            .iter()
            .filter(|d| !d.deleted && d.category == category)
            .min_by_key(|d| d.id)
    }

    pub fn by_id(&self, id: u32) -> Option<&StatusDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// The status new hires are created in (the ONBOARDING canonical).
    pub fn default_for_new_hires(&self) -> Option<&StatusDefinition> {
        self.definitions
            .iter()
            .filter(|d| !d.deleted && d.default_for_new_hires)
            .min_by_key(|d| d.id)
            .or_else(|| self.canonical_for(StatusCategory::Onboarding))
    }

    /// Insert a definition as-is (administrative edits, test fixtures).
    pub fn insert(&mut self, definition: StatusDefinition) {
        self.definitions.push(definition);
    }

    pub fn definitions(&self) -> &[StatusDefinition] {
        &self.definitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_display() {
        assert_eq!(StatusCategory::Onboarding.to_string(), "ONBOARDING");
        assert_eq!(StatusCategory::Probation.to_string(), "PROBATION");
        assert_eq!(StatusCategory::Active.to_string(), "ACTIVE");
        assert_eq!(StatusCategory::Inactive.to_string(), "INACTIVE");
        assert_eq!(StatusCategory::Suspended.to_string(), "SUSPENDED");
    }

    #[test]
    fn automatic_vs_manual_split() {
        assert!(StatusCategory::Onboarding.is_automatic());
        assert!(StatusCategory::Active.is_automatic());
        assert!(StatusCategory::Inactive.is_automatic());
        assert!(StatusCategory::Leave.is_manual());
        assert!(StatusCategory::Terminated.is_manual());
        assert!(StatusCategory::Vacant.is_manual());
    }

    #[test]
    fn ensure_defaults_is_idempotent() {
        let mut catalog = StatusCatalog::new();
        catalog.ensure_defaults();
        let count = catalog.definitions().len();
        assert_eq!(count, 9);

        catalog.ensure_defaults();
        assert_eq!(catalog.definitions().len(), count);
    }

    #[test]
    fn canonical_picks_lowest_id_among_duplicates() {
        let mut catalog = StatusCatalog::new();
        catalog.insert(StatusDefinition {
            id: 7,
            name: "Active (new)".into(),
            category: StatusCategory::Active,
            affects_headcount: true,
            visible_in_org_chart: true,
            default_for_new_hires: false,
            deleted: false,
        });
        catalog.insert(StatusDefinition {
            id: 3,
            name: "Active".into(),
            category: StatusCategory::Active,
            affects_headcount: true,
            visible_in_org_chart: true,
            default_for_new_hires: false,
            deleted: false,
        });

        let canonical = catalog.canonical_for(StatusCategory::Active).unwrap();
        assert_eq!(canonical.id, 3);
    }

    #[test]
    fn canonical_skips_deleted_definitions() {
        let mut catalog = StatusCatalog::new();
        catalog.insert(StatusDefinition {
            id: 1,
            name: "Active (retired)".into(),
            category: StatusCategory::Active,
            affects_headcount: true,
            visible_in_org_chart: true,
            default_for_new_hires: false,
            deleted: true,
        });
        catalog.insert(StatusDefinition {
            id: 2,
            name: "Active".into(),
            category: StatusCategory::Active,
            affects_headcount: true,
            visible_in_org_chart: true,
            default_for_new_hires: false,
            deleted: false,
        });

        assert_eq!(catalog.canonical_for(StatusCategory::Active).unwrap().id, 2);
    }

    #[test]
    fn new_hire_default_is_onboarding() {
        let mut catalog = StatusCatalog::new();
        catalog.ensure_defaults();
        let def = catalog.default_for_new_hires().unwrap();
        assert_eq!(def.category, StatusCategory::Onboarding);
    }

    #[test]
    fn category_serde_roundtrip() {
        let json = serde_json::to_string(&StatusCategory::Probation).unwrap();
        assert_eq!(json, "\"PROBATION\"");
        let back: StatusCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StatusCategory::Probation);
    }
}
