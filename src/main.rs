use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use tenure::cli::{Cli, Command};
use tenure::config::TenureConfig;
use tenure::reconciler::LifecycleEngine;
use tenure::store::{DataFile, EmployeeId, EmployeeStore, InMemoryStore};
use tenure::{analytics, sweep, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = TenureConfig::load()?;
    let data_path = PathBuf::from(
        cli.data
            .clone()
            .unwrap_or_else(|| config.data_file.clone()),
    );

    let (store, catalog, policies) = DataFile::load(&data_path)
        .with_context(|| format!("failed to load {}", data_path.display()))?
        .into_store();
    let engine = Arc::new(LifecycleEngine::new(Arc::new(store), catalog, policies));
    engine.bootstrap();

    match cli.command {
        Command::Hire {
            id,
            name,
            contract,
            start,
        } => {
            let record = engine.hire(EmployeeId::from(id), &name, &contract, start)?;
            println!(
                "Hired {} ({}) starting {}, contract {}{}",
                record.name,
                record.id,
                start,
                record.contract_type,
                record
                    .contract_end_date
                    .map(|end| format!(", ends {end}"))
                    .unwrap_or_default(),
            );
        }

        Command::Preview { id } => {
            let preview = engine.preview(&EmployeeId::from(id))?;
            if cli.verbose {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else {
                ui::print_preview(&preview);
            }
        }

        Command::Reconcile { id, force, actor } => {
            let id = EmployeeId::from(id);
            let changed = engine.reconcile_one(&id, force, actor.as_deref())?;
            if changed {
                let transitions = engine.store().transitions_for(&id);
                if let Some(last) = transitions.last() {
                    println!(
                        "{}: {} -> {} ({})",
                        id, last.old_status, last.new_status, last.reason
                    );
                }
            } else {
                println!("{id}: no change needed");
            }
        }

        Command::Sweep { watch, ids } => {
            if !ids.is_empty() {
                let ids: Vec<EmployeeId> = ids.into_iter().map(EmployeeId::from).collect();
                let summary = engine.reconcile_many(&ids, false);
                ui::print_summary(&summary);
            } else if watch {
                let every = Duration::from_secs(config.sweep_interval_secs);
                println!(
                    "Sweeping every {}s over {} (ctrl-c to stop)",
                    config.sweep_interval_secs,
                    data_path.display()
                );
                let reload_engine = Arc::clone(&engine);
                let reload_path = data_path.clone();
                let loop_engine = Arc::clone(&engine);
                let loop_path = data_path.clone();
                sweep::run_scheduled_sweep(
                    Arc::clone(&engine),
                    every,
                    None,
                    // Re-read catalog and policy edits made to the data
                    // file while the daemon runs, before reconciling and
                    // persisting would clobber them.
                    move |_| match DataFile::load(&reload_path) {
                        Ok(file) => reload_engine.reload_config(file.catalog, file.policies),
                        Err(err) => eprintln!(
                            "tenure: failed to re-read {}: {err}",
                            reload_path.display()
                        ),
                    },
                    move |cycle, summary| {
                        println!("cycle {cycle}:");
                        ui::print_summary(summary);
                        if let Err(err) = persist(&loop_engine, &loop_path) {
                            eprintln!("tenure: failed to persist after sweep: {err}");
                        }
                    },
                )
                .await;
            } else {
                let progress = ui::SweepProgress::start(engine.store().employee_count() as u64);
                let summary = sweep::run_sweep_observed(
                    &engine,
                    chrono::Utc::now().date_naive(),
                    |_, _| progress.tick(),
                );
                progress.finish(&summary);
            }
        }

        Command::Extend { id, until, actor } => {
            let id = EmployeeId::from(id);
            let changed = engine.extend_contract(&id, until, actor.as_deref())?;
            let record = engine.store().get(&id)?;
            println!(
                "Extended {} to {until} (extension #{}){}",
                id,
                record.extension_count,
                if changed { ", status updated" } else { "" },
            );
        }

        Command::Expiring { days } => {
            let window = days.or(config.expiry_window_days);
            let rows = analytics::expiring_contracts(&engine, window);
            ui::print_expiry_report(&rows);
        }

        Command::Report => {
            let matrix = analytics::transition_matrix(&engine);
            if cli.verbose {
                println!("{}", serde_json::to_string_pretty(&matrix)?);
            } else {
                ui::print_matrix(&matrix);
            }
        }

        Command::History { id } => {
            let id = EmployeeId::from(id);
            // Make sure the employee exists before printing empty lists.
            engine.store().get(&id)?;
            ui::print_history(
                &engine.store().transitions_for(&id),
                &engine.store().extensions_for(&id),
            );
        }
    }

    persist(&engine, &data_path)
}

/// Write the store plus the slow-changing configuration back to disk.
fn persist(engine: &LifecycleEngine<InMemoryStore>, path: &Path) -> Result<()> {
    DataFile::from_store(
        engine.store(),
        &engine.catalog_snapshot(),
        &engine.registry_snapshot(),
    )
    .save(path)
    .with_context(|| format!("failed to save {}", path.display()))
}
