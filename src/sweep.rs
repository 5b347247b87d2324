//! The periodic trigger surface: one sweep pass over the whole employee
//! population, plus the interval loop a scheduler (or `sweep --watch`)
//! drives. The core owns only the callable entry points; cron/queue setup
//! belongs to the surrounding deployment.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};

use crate::reconciler::{LifecycleEngine, SweepSummary};
use crate::store::EmployeeStore;

/// One reconciliation pass over every non-deleted employee.
///
/// Re-ensures catalog and policy defaults first, so administrative edits
/// are reflected within one cycle. Per-employee failures are counted and
/// the pass continues; a degraded record never aborts the sweep.
pub fn run_sweep_at<S: EmployeeStore>(engine: &LifecycleEngine<S>, today: NaiveDate) -> SweepSummary {
    run_sweep_observed(engine, today, |_, _| {})
}

/// [`run_sweep_at`] with a per-employee observer, used by the CLI to drive
/// a progress bar. `observe(done, total)` fires after each reconciliation.
pub fn run_sweep_observed<S: EmployeeStore>(
    engine: &LifecycleEngine<S>,
    today: NaiveDate,
    mut observe: impl FnMut(usize, usize),
) -> SweepSummary {
    engine.bootstrap();
    let ids = engine.store().all_ids();
    let total = ids.len();
    let mut summary = SweepSummary::default();
    for (done, id) in ids.iter().enumerate() {
        summary.merge(engine.reconcile_many_at(std::slice::from_ref(id), false, today));
        observe(done + 1, total);
    }
    summary
}

pub fn run_sweep<S: EmployeeStore>(engine: &LifecycleEngine<S>) -> SweepSummary {
    run_sweep_at(engine, Utc::now().date_naive())
}

/// Run [`run_sweep`] on a fixed interval. `before_cycle` fires before each
/// pass; the watch daemon uses it to re-read administrative configuration
/// so catalog and policy edits are honored within one cycle. `on_cycle`
/// receives each summary. `max_cycles` bounds the loop (None runs until
/// the task is dropped); the first sweep fires immediately.
pub async fn run_scheduled_sweep<S, B, F>(
    engine: Arc<LifecycleEngine<S>>,
    every: Duration,
    max_cycles: Option<u64>,
    mut before_cycle: B,
    mut on_cycle: F,
) where
    S: EmployeeStore,
    B: FnMut(u64),
    F: FnMut(u64, &SweepSummary),
{
    let mut interval = tokio::time::interval(every);
    let mut cycle: u64 = 0;
    loop {
        interval.tick().await;
        cycle += 1;
        before_cycle(cycle);
        let summary = run_sweep(&engine);
        on_cycle(cycle, &summary);
        if let Some(max) = max_cycles
            && cycle >= max
        {
            return;
        }
    }
}
