use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TenureError;
use crate::lifecycle::{ContractExtensionRecord, PolicyRegistry, StatusCatalog, TransitionRecord};

/// Opaque employee identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(pub String);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EmployeeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EmployeeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Where a fixed-term contract stands in the renewal process. Flips to
/// `Approved` when an extension is applied; HR sets `Pending` while a
/// renewal is under review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalStatus {
    #[default]
    None,
    Pending,
    Approved,
}

/// The slice of an employee record the lifecycle engine works with.
///
/// The engine reads the contract fields and writes exactly one of them:
/// `status_id`, and that only through [`EmployeeStore::apply_transition`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub name: String,
    pub contract_type: String,
    /// Missing on degraded records; the resolver treats that as "hold".
    pub start_date: Option<NaiveDate>,
    /// `None` for permanent contracts.
    pub contract_end_date: Option<NaiveDate>,
    pub status_id: u32,
    /// Line manager, read only by analytics rollups.
    #[serde(default)]
    pub manager_id: Option<EmployeeId>,
    /// How many times the contract has been extended.
    #[serde(default)]
    pub extension_count: u32,
    #[serde(default)]
    pub renewal_status: RenewalStatus,
    /// Soft-delete flag; deleted records are skipped by hook and sweep.
    #[serde(default)]
    pub deleted: bool,
}

/// Read/write seam between the lifecycle engine and the HR record store.
///
/// `apply_transition` is the narrow system-originated write path: it sets
/// the status field and appends the audit record in one atomic step and is
/// never followed by the post-write hook, which is what keeps the engine
/// from re-triggering itself (the hook belongs to the general `update`
/// path the surrounding application uses).
pub trait EmployeeStore: Send + Sync {
    fn get(&self, id: &EmployeeId) -> Result<EmployeeRecord, TenureError>;

    /// Ids of all non-deleted employees, in stable order.
    fn all_ids(&self) -> Vec<EmployeeId>;

    /// Create a new record. Rejects an id that already belongs to a
    /// non-deleted employee; re-hiring over a soft-deleted record is
    /// allowed.
    fn insert(&self, record: EmployeeRecord) -> Result<(), TenureError>;

    /// General record write, used by the surrounding application. Callers
    /// are expected to follow it with the engine's post-write hook.
    fn update(&self, record: EmployeeRecord) -> Result<(), TenureError>;

    /// Atomically set the employee's status and append the transition
    /// record. Either both happen or neither does.
    fn apply_transition(
        &self,
        id: &EmployeeId,
        new_status_id: u32,
        record: TransitionRecord,
    ) -> Result<(), TenureError>;

    /// Atomically set the new contract end date, bump the extension
    /// counter and append the extension record.
    fn apply_extension(
        &self,
        id: &EmployeeId,
        new_end: NaiveDate,
        record: ContractExtensionRecord,
    ) -> Result<(), TenureError>;

    fn transitions_for(&self, id: &EmployeeId) -> Vec<TransitionRecord>;

    fn extensions_for(&self, id: &EmployeeId) -> Vec<ContractExtensionRecord>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    employees: BTreeMap<EmployeeId, EmployeeRecord>,
    transitions: Vec<TransitionRecord>,
    extensions: Vec<ContractExtensionRecord>,
}

/// Mutex-guarded in-memory store. The lock is the transactional boundary:
/// status writes and audit appends happen under one acquisition.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreData> {
        // A poisoned lock means a panic mid-write elsewhere; the data is
        // still the best copy we have.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn employee_count(&self) -> usize {
        self.lock().employees.values().filter(|e| !e.deleted).count()
    }
}

impl EmployeeStore for InMemoryStore {
    fn get(&self, id: &EmployeeId) -> Result<EmployeeRecord, TenureError> {
        self.lock()
            .employees
            .get(id)
            .cloned()
            .ok_or_else(|| TenureError::EmployeeNotFound(id.clone()))
    }

    fn all_ids(&self) -> Vec<EmployeeId> {
        self.lock()
            .employees
            .values()
            .filter(|e| !e.deleted)
            .map(|e| e.id.clone())
            .collect()
    }

    fn insert(&self, record: EmployeeRecord) -> Result<(), TenureError> {
        let mut data = self.lock();
        if data.employees.get(&record.id).is_some_and(|e| !e.deleted) {
            return Err(TenureError::DuplicateEmployee(record.id.clone()));
        }
        data.employees.insert(record.id.clone(), record);
        Ok(())
    }

    fn update(&self, record: EmployeeRecord) -> Result<(), TenureError> {
        let mut data = self.lock();
        if !data.employees.contains_key(&record.id) {
            return Err(TenureError::EmployeeNotFound(record.id.clone()));
        }
        data.employees.insert(record.id.clone(), record);
        Ok(())
    }

    fn apply_transition(
        &self,
        id: &EmployeeId,
        new_status_id: u32,
        record: TransitionRecord,
    ) -> Result<(), TenureError> {
        let mut data = self.lock();
        let employee = data
            .employees
            .get_mut(id)
            .ok_or_else(|| TenureError::EmployeeNotFound(id.clone()))?;
        employee.status_id = new_status_id;
        data.transitions.push(record);
        Ok(())
    }

    fn apply_extension(
        &self,
        id: &EmployeeId,
        new_end: NaiveDate,
        record: ContractExtensionRecord,
    ) -> Result<(), TenureError> {
        let mut data = self.lock();
        let employee = data
            .employees
            .get_mut(id)
            .ok_or_else(|| TenureError::EmployeeNotFound(id.clone()))?;
        employee.contract_end_date = Some(new_end);
        employee.extension_count += 1;
        employee.renewal_status = RenewalStatus::Approved;
        data.extensions.push(record);
        Ok(())
    }

    fn transitions_for(&self, id: &EmployeeId) -> Vec<TransitionRecord> {
        self.lock()
            .transitions
            .iter()
            .filter(|t| &t.employee_id == id)
            .cloned()
            .collect()
    }

    fn extensions_for(&self, id: &EmployeeId) -> Vec<ContractExtensionRecord> {
        self.lock()
            .extensions
            .iter()
            .filter(|e| &e.employee_id == id)
            .cloned()
            .collect()
    }
}

/// On-disk shape of the CLI's data file: the employee population plus the
/// slow-changing catalog and policy configuration and the audit log.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DataFile {
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
    #[serde(default)]
    pub catalog: StatusCatalog,
    #[serde(default)]
    pub policies: PolicyRegistry,
    #[serde(default)]
    pub transitions: Vec<TransitionRecord>,
    #[serde(default)]
    pub extensions: Vec<ContractExtensionRecord>,
}

impl DataFile {
    /// Load from a JSON file; a missing file is an empty data set.
    pub fn load(path: &Path) -> Result<Self, TenureError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), TenureError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Build an in-memory store from the file contents.
    pub fn into_store(self) -> (InMemoryStore, StatusCatalog, PolicyRegistry) {
        let store = InMemoryStore::new();
        {
            let mut data = store.lock();
            for employee in self.employees {
                data.employees.insert(employee.id.clone(), employee);
            }
            data.transitions = self.transitions;
            data.extensions = self.extensions;
        }
        (store, self.catalog, self.policies)
    }

    /// Snapshot a store (plus configuration) back into file form.
    pub fn from_store(
        store: &InMemoryStore,
        catalog: &StatusCatalog,
        policies: &PolicyRegistry,
    ) -> Self {
        let data = store.lock();
        Self {
            employees: data.employees.values().cloned().collect(),
            catalog: catalog.clone(),
            policies: policies.clone(),
            transitions: data.transitions.clone(),
            extensions: data.extensions.clone(),
        }
    }
}
