//! tenure — contract-driven employee status lifecycle engine.
//!
//! Every employee carries a lifecycle status (ONBOARDING → PROBATION →
//! ACTIVE → INACTIVE, plus manual HR states) that must track elapsed time
//! against a per-contract-type policy. This crate resolves the status an
//! employee *should* have, reconciles the persisted status against it, and
//! appends an audit record for every automatic transition. Triggering is
//! two-fold: a post-write hook the data-access layer calls after employee
//! updates, and a periodic sweep over the whole population.

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod reconciler;
pub mod store;
pub mod sweep;
pub mod ui;
