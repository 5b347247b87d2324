//! clap-based command-line interface.
//!
//! Defines the [`Cli`] struct with subcommands [`Command`] and global flags
//! (--data, --verbose). Dates are accepted in ISO `YYYY-MM-DD` form.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// tenure — contract-driven employee status lifecycle engine.
#[derive(Debug, Parser)]
#[command(name = "tenure", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the JSON data file (overrides tenure.toml).
    #[arg(long, global = true)]
    pub data: Option<String>,

    /// Enable detailed output.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an employee record in the default new-hire status.
    Hire {
        /// Employee identifier.
        id: String,
        /// Display name.
        name: String,
        /// Contract type, e.g. 3_MONTHS, 12_MONTHS, PERMANENT.
        #[arg(long, default_value = "3_MONTHS")]
        contract: String,
        /// Start date (YYYY-MM-DD).
        #[arg(long)]
        start: NaiveDate,
    },

    /// Show what reconciliation would do, without writing anything.
    Preview {
        /// Employee identifier.
        id: String,
    },

    /// Reconcile one employee's status now.
    Reconcile {
        /// Employee identifier.
        id: String,
        /// Override a manual status / write even when unchanged.
        #[arg(long)]
        force: bool,
        /// Actor recorded in the audit trail (defaults to the system).
        #[arg(long)]
        actor: Option<String>,
    },

    /// Reconcile the whole population (or an explicit subset).
    Sweep {
        /// Keep sweeping on the configured interval.
        #[arg(long)]
        watch: bool,
        /// Restrict the sweep to these employee ids.
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Extend an employee's contract to a new end date.
    Extend {
        /// Employee identifier.
        id: String,
        /// New contract end date (YYYY-MM-DD).
        #[arg(long)]
        until: NaiveDate,
        /// Actor recorded in the audit trail.
        #[arg(long)]
        actor: Option<String>,
    },

    /// List contracts expiring soon, bucketed by urgency.
    Expiring {
        /// Report window in days (default: the configured window, else
        /// each policy's own notice window).
        #[arg(long)]
        days: Option<i64>,
    },

    /// Status distribution and pending-transition breakdown.
    Report,

    /// Print an employee's transition and extension audit trail.
    History {
        /// Employee identifier.
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_reconcile_with_force() {
        let cli = Cli::parse_from(["tenure", "reconcile", "e42", "--force", "--actor", "hr.lead"]);
        match cli.command {
            Command::Reconcile { id, force, actor } => {
                assert_eq!(id, "e42");
                assert!(force);
                assert_eq!(actor.as_deref(), Some("hr.lead"));
            }
            _ => panic!("expected Reconcile command"),
        }
    }

    #[test]
    fn cli_parses_sweep_subset() {
        let cli = Cli::parse_from(["tenure", "sweep", "--ids", "e1,e2,e3"]);
        match cli.command {
            Command::Sweep { watch, ids } => {
                assert!(!watch);
                assert_eq!(ids, vec!["e1", "e2", "e3"]);
            }
            _ => panic!("expected Sweep command"),
        }
    }

    #[test]
    fn cli_parses_hire_with_dates() {
        let cli = Cli::parse_from([
            "tenure", "hire", "e1", "Dana", "--contract", "12_MONTHS", "--start", "2024-01-01",
        ]);
        match cli.command {
            Command::Hire { id, name, contract, start } => {
                assert_eq!(id, "e1");
                assert_eq!(name, "Dana");
                assert_eq!(contract, "12_MONTHS");
                assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
            }
            _ => panic!("expected Hire command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["tenure", "--data", "people.json", "--verbose", "report"]);
        assert!(cli.verbose);
        assert_eq!(cli.data.as_deref(), Some("people.json"));
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
