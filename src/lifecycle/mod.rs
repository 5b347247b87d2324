mod audit;
mod policy;
mod resolver;
mod status;

pub use audit::{ContractExtensionRecord, TransitionRecord};
pub use policy::{ContractPolicy, PolicyRegistry};
pub use resolver::{days_since_start, resolve, resolve_forced, EmployeeSnapshot, Resolution};
pub use status::{StatusCatalog, StatusCategory, StatusDefinition};
