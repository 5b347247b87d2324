//! Terminal output — progress bar for sweeps and colored report printing.
//!
//! Uses `indicatif` for the sweep progress bar and `console` for styled
//! output, the same way the rest of the toolchain around this engine does.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analytics::{ExpiringContract, ExpiryUrgency, TransitionMatrix};
use crate::lifecycle::{ContractExtensionRecord, TransitionRecord};
use crate::reconciler::{StatusPreview, SweepSummary};

/// Visual progress for a batch sweep over the employee population.
pub struct SweepProgress {
    pb: ProgressBar,
}

impl SweepProgress {
    pub fn start(total: u64) -> Self {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30.cyan} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb.set_message("reconciling");
        Self { pb }
    }

    pub fn tick(&self) {
        self.pb.inc(1);
    }

    /// Finish the bar and print the sweep result counts.
    pub fn finish(&self, summary: &SweepSummary) {
        self.pb.finish_and_clear();
        print_summary(summary);
    }
}

/// Print sweep result counts and per-employee failures.
pub fn print_summary(summary: &SweepSummary) {
    let green = Style::new().green().bold();
    let yellow = Style::new().yellow();
    let red = Style::new().red().bold();
    println!(
        "  {} {} updated, {} unchanged, {} errors ({} scanned)",
        if summary.errors == 0 {
            green.apply_to("✓")
        } else {
            yellow.apply_to("!")
        },
        summary.updated,
        summary.unchanged,
        summary.errors,
        summary.scanned,
    );
    for (id, error) in &summary.failures {
        println!("    {} {id}: {error}", red.apply_to("✗"));
    }
}

pub fn print_preview(preview: &StatusPreview) {
    let green = Style::new().green().bold();
    let yellow = Style::new().yellow().bold();
    println!(
        "{}: {} ({})",
        preview.employee_id, preview.current_status, preview.current_category
    );
    if preview.needs_update {
        println!(
            "  {} would become {} — {}",
            yellow.apply_to("→"),
            preview.required_category,
            preview.reason
        );
    } else {
        println!("  {} up to date — {}", green.apply_to("✓"), preview.reason);
    }
}

pub fn print_expiry_report(rows: &[ExpiringContract]) {
    if rows.is_empty() {
        println!("No contracts expiring in the window.");
        return;
    }
    let styles = (
        Style::new().red().bold(),
        Style::new().red(),
        Style::new().yellow(),
        Style::new().dim(),
    );
    for row in rows {
        let style = match row.urgency {
            ExpiryUrgency::Critical => &styles.0,
            ExpiryUrgency::High => &styles.1,
            ExpiryUrgency::Medium => &styles.2,
            ExpiryUrgency::Low => &styles.3,
        };
        println!(
            "  {} {} — {} ends {} ({} days, {:?})",
            style.apply_to("●"),
            row.employee_id,
            row.contract_type,
            row.end_date,
            row.days_left,
            row.urgency,
        );
    }
}

pub fn print_matrix(matrix: &TransitionMatrix) {
    println!("─── Status distribution ───");
    for (category, count) in &matrix.distribution {
        println!("  {category}: {count}");
    }
    println!("─── Pending transitions ({}) ───", matrix.total_pending());
    for (pair, count) in &matrix.pending {
        println!("  {pair}: {count}");
    }
    if !matrix.pending_by_manager.is_empty() {
        println!("─── Pending by manager ───");
        for (manager, count) in &matrix.pending_by_manager {
            println!("  {manager}: {count}");
        }
    }
    if matrix.errors > 0 {
        let red = Style::new().red().bold();
        println!("  {} {} unresolvable records", red.apply_to("✗"), matrix.errors);
    }
}

/// Print an employee's audit trail as pretty JSON.
pub fn print_history(transitions: &[TransitionRecord], extensions: &[ContractExtensionRecord]) {
    let bold = Style::new().bold();
    println!("{}", bold.apply_to("─── Transitions ───"));
    println!(
        "{}",
        serde_json::to_string_pretty(transitions).unwrap_or_default()
    );
    if !extensions.is_empty() {
        println!("{}", bold.apply_to("─── Extensions ───"));
        println!(
            "{}",
            serde_json::to_string_pretty(extensions).unwrap_or_default()
        );
    }
}
