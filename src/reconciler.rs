use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TenureError;
use crate::lifecycle::{
    days_since_start, resolve, resolve_forced, ContractExtensionRecord, ContractPolicy,
    EmployeeSnapshot, PolicyRegistry, Resolution, StatusCatalog, StatusCategory, StatusDefinition,
    TransitionRecord,
};
use crate::store::{EmployeeId, EmployeeRecord, EmployeeStore, RenewalStatus};

/// Read-only answer to "would reconciliation change this employee".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPreview {
    pub employee_id: EmployeeId,
    pub current_status: String,
    pub current_category: StatusCategory,
    pub required_category: StatusCategory,
    pub needs_update: bool,
    pub reason: String,
}

/// Outcome of a batch reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepSummary {
    pub scanned: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub errors: usize,
    /// Per-employee failures, as (id, error) pairs.
    pub failures: Vec<(EmployeeId, String)>,
}

impl SweepSummary {
    fn record_failure(&mut self, id: &EmployeeId, error: &TenureError) {
        self.errors += 1;
        self.failures.push((id.clone(), error.to_string()));
    }

    /// Fold another summary into this one (used by observed sweeps).
    pub fn merge(&mut self, other: SweepSummary) {
        self.scanned += other.scanned;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.errors += other.errors;
        self.failures.extend(other.failures);
    }
}

/// Compares each employee's persisted status against what the resolver says
/// it should be, and applies the difference with an audit trail.
///
/// All status writes go through the store's narrow `apply_transition` path,
/// which the post-write hook does not observe; that is the re-entrancy
/// guard of the whole engine.
pub struct LifecycleEngine<S: EmployeeStore> {
    store: Arc<S>,
    catalog: Mutex<StatusCatalog>,
    registry: Mutex<PolicyRegistry>,
}

impl<S: EmployeeStore> LifecycleEngine<S> {
    pub fn new(store: Arc<S>, catalog: StatusCatalog, registry: PolicyRegistry) -> Self {
        Self {
            store,
            catalog: Mutex::new(catalog),
            registry: Mutex::new(registry),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn catalog(&self) -> MutexGuard<'_, StatusCatalog> {
        self.catalog.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn registry(&self) -> MutexGuard<'_, PolicyRegistry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Idempotently provision the canonical status definitions and the
    /// well-known contract policies. Run at startup and re-run at the
    /// start of every sweep cycle so administrative edits are picked up
    /// within one cycle.
    pub fn bootstrap(&self) {
        self.catalog().ensure_defaults();
        self.registry().ensure_defaults();
    }

    /// Clone of the current catalog, for persistence.
    pub fn catalog_snapshot(&self) -> StatusCatalog {
        self.catalog().clone()
    }

    /// Clone of the current policy registry, for persistence.
    pub fn registry_snapshot(&self) -> PolicyRegistry {
        self.registry().clone()
    }

    /// Install an administratively edited policy. Takes effect on the
    /// next resolution, replacing any cached policy for the same
    /// contract type.
    pub fn install_policy(&self, policy: ContractPolicy) {
        self.registry().insert(policy);
    }

    /// Install an administratively edited status definition.
    pub fn install_status(&self, definition: StatusDefinition) {
        self.catalog().insert(definition);
    }

    /// Replace the cached catalog and policy registry wholesale, then
    /// re-ensure the canonical defaults. The watch loop calls this at
    /// the start of every cycle so edits to the data file are honored
    /// within one cycle.
    pub fn reload_config(&self, catalog: StatusCatalog, registry: PolicyRegistry) {
        {
            let mut guard = self.catalog();
            *guard = catalog;
            guard.ensure_defaults();
        }
        let mut guard = self.registry();
        *guard = registry;
        guard.ensure_defaults();
    }

    /// Load the employee plus everything resolution needs. The contract
    /// end date falls back to `start + term` for fixed-term contracts
    /// whose record carries none.
    fn load_for_resolution(
        &self,
        id: &EmployeeId,
    ) -> Result<(EmployeeRecord, EmployeeSnapshot, ContractPolicy), TenureError> {
        let employee = self.store.get(id)?;
        if employee.deleted {
            return Err(TenureError::EmployeeDeleted(id.clone()));
        }

        let current = self
            .catalog()
            .by_id(employee.status_id)
            .map(|d| d.category)
            .ok_or(TenureError::UnknownStatus(employee.status_id))?;

        let policy = self.registry().get_or_synthesize(&employee.contract_type);

        let end = employee.contract_end_date.or_else(|| {
            employee
                .start_date
                .and_then(|start| PolicyRegistry::derive_end_date(&employee.contract_type, start))
        });

        let snapshot = EmployeeSnapshot {
            start_date: employee.start_date,
            contract_end_date: end,
            current,
        };
        Ok((employee, snapshot, policy))
    }

    /// Reconcile one employee against "today". Returns whether the status
    /// changed. With `force=false` a manual status is never overridden and
    /// an already-correct status is a no-op.
    pub fn reconcile_one_at(
        &self,
        id: &EmployeeId,
        force: bool,
        actor: Option<&str>,
        today: NaiveDate,
    ) -> Result<bool, TenureError> {
        let (employee, snapshot, policy) = self.load_for_resolution(id)?;

        let resolution = if force {
            resolve_forced(&snapshot, &policy, today)
        } else {
            resolve(&snapshot, &policy, today)
        };

        if !force && resolution.target == snapshot.current {
            return Ok(false);
        }

        let (old_name, new_id, new_name) = {
            let catalog = self.catalog();
            let old_name = catalog
                .by_id(employee.status_id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|| snapshot.current.to_string());
            let new_def = catalog
                .canonical_for(resolution.target)
                .ok_or(TenureError::MissingCanonicalStatus(resolution.target))?;
            (old_name, new_def.id, new_def.name.clone())
        };

        let days = employee
            .start_date
            .map(|start| days_since_start(start, today));
        let record = TransitionRecord::new(
            id.clone(),
            &old_name,
            &new_name,
            &resolution.reason,
            actor.map(str::to_string),
            &employee.contract_type,
            days,
            force,
        );
        self.store.apply_transition(id, new_id, record)?;
        Ok(true)
    }

    pub fn reconcile_one(
        &self,
        id: &EmployeeId,
        force: bool,
        actor: Option<&str>,
    ) -> Result<bool, TenureError> {
        self.reconcile_one_at(id, force, actor, Utc::now().date_naive())
    }

    /// Reconcile an explicit set of employees, continuing past failures.
    pub fn reconcile_many_at(
        &self,
        ids: &[EmployeeId],
        force: bool,
        today: NaiveDate,
    ) -> SweepSummary {
        let mut summary = SweepSummary::default();
        for id in ids {
            summary.scanned += 1;
            match self.reconcile_one_at(id, force, None, today) {
                Ok(true) => summary.updated += 1,
                Ok(false) => summary.unchanged += 1,
                Err(err) => summary.record_failure(id, &err),
            }
        }
        summary
    }

    pub fn reconcile_many(&self, ids: &[EmployeeId], force: bool) -> SweepSummary {
        self.reconcile_many_at(ids, force, Utc::now().date_naive())
    }

    /// Post-write hook, called by the data-access layer after a successful
    /// employee update. `created` is true for brand-new records, which are
    /// skipped: their status was set at hire time and the periodic sweep
    /// covers them from then on. Failures are logged, never propagated;
    /// status correctness is eventually consistent, not a write
    /// precondition.
    pub fn on_employee_saved(&self, id: &EmployeeId, created: bool) {
        if created {
            return;
        }
        match self.store.get(id) {
            Ok(employee) if employee.deleted => {}
            Ok(_) => {
                if let Err(err) = self.reconcile_one(id, false, None) {
                    eprintln!("tenure: post-save reconciliation of {id} failed: {err}");
                }
            }
            Err(err) => {
                eprintln!("tenure: post-save hook could not load {id}: {err}");
            }
        }
    }

    /// Create a new hire in the catalog's default status (ONBOARDING).
    /// Fixed-term contracts get their end date derived from the term.
    pub fn hire(
        &self,
        id: EmployeeId,
        name: &str,
        contract_type: &str,
        start_date: NaiveDate,
    ) -> Result<EmployeeRecord, TenureError> {
        let status_id = self
            .catalog()
            .default_for_new_hires()
            .map(|d| d.id)
            .ok_or(TenureError::MissingCanonicalStatus(StatusCategory::Onboarding))?;
        // Make sure the policy exists from day one.
        self.registry().get_or_synthesize(contract_type);

        let record = EmployeeRecord {
            id: id.clone(),
            name: name.to_string(),
            contract_type: contract_type.to_string(),
            start_date: Some(start_date),
            contract_end_date: PolicyRegistry::derive_end_date(contract_type, start_date),
            status_id,
            manager_id: None,
            extension_count: 0,
            renewal_status: RenewalStatus::default(),
            deleted: false,
        };
        self.store.insert(record.clone())?;
        Ok(record)
    }

    /// Extend a contract to `new_end`: bumps the extension counter, writes
    /// a contract-extension audit entry, then reconciles (an extension
    /// usually clears the forced-expiry condition).
    pub fn extend_contract_at(
        &self,
        id: &EmployeeId,
        new_end: NaiveDate,
        actor: Option<&str>,
        today: NaiveDate,
    ) -> Result<bool, TenureError> {
        let employee = self.store.get(id)?;
        if employee.deleted {
            return Err(TenureError::EmployeeDeleted(id.clone()));
        }
        let record = ContractExtensionRecord::new(
            id.clone(),
            employee.contract_end_date,
            new_end,
            employee.extension_count + 1,
            actor.map(str::to_string),
        );
        self.store.apply_extension(id, new_end, record)?;
        self.reconcile_one_at(id, false, actor, today)
    }

    pub fn extend_contract(
        &self,
        id: &EmployeeId,
        new_end: NaiveDate,
        actor: Option<&str>,
    ) -> Result<bool, TenureError> {
        self.extend_contract_at(id, new_end, actor, Utc::now().date_naive())
    }

    /// Run the resolver without reconciling. Never writes.
    pub fn preview_at(&self, id: &EmployeeId, today: NaiveDate) -> Result<StatusPreview, TenureError> {
        let (employee, snapshot, policy) = self.load_for_resolution(id)?;
        let Resolution { target, reason } = resolve(&snapshot, &policy, today);
        let current_status = self
            .catalog()
            .by_id(employee.status_id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| snapshot.current.to_string());
        Ok(StatusPreview {
            employee_id: id.clone(),
            current_status,
            current_category: snapshot.current,
            required_category: target,
            needs_update: target != snapshot.current,
            reason,
        })
    }

    pub fn preview(&self, id: &EmployeeId) -> Result<StatusPreview, TenureError> {
        self.preview_at(id, Utc::now().date_naive())
    }
}
