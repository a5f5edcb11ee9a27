//! Line-oriented command driver.
//!
//! Reads one command per line, runs it against the registry selected by
//! [`Mode`], and writes one result line per command:
//!
//! ```text
//! add_ship: SUCCESS
//! get_treasure: SUCCESS, 90
//! get_richest_pirate: FAILURE
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

pub mod command;
pub mod config;

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::{info, warn};

use crate::error::{Result, Status};
use crate::fleets::Fleets;
use crate::ocean::Ocean;

pub use command::{parse_line, Command, FleetCommand, OceanCommand, ParseError};
pub use config::{ConfigError, DriverConfig, Mode};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Parse { line: usize, source: ParseError },
}

/// Counts of what a run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub executed: usize,
    pub succeeded: usize,
    pub malformed: usize,
    /// Set when `fail_fast` cut the run short.
    pub stopped_early: bool,
}

/// Result line for one executed command.
pub fn format_outcome(name: &str, outcome: &Result<Option<i64>>) -> String {
    match outcome {
        Ok(None) => format!("{name}: {}", Status::Success),
        Ok(Some(value)) => format!("{name}: {}, {value}", Status::Success),
        Err(err) => format!("{name}: {}", err.status()),
    }
}

/// Owns both registries; only the one matching the mode is ever touched.
#[derive(Debug, Default)]
pub struct Driver {
    mode: Mode,
    fail_fast: bool,
    ocean: Ocean,
    fleets: Fleets,
}

impl Driver {
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            mode: config.mode,
            fail_fast: config.fail_fast,
            ..Self::default()
        }
    }

    pub fn ocean(&self) -> &Ocean {
        &self.ocean
    }

    pub fn fleets(&self) -> &Fleets {
        &self.fleets
    }

    /// Runs a parsed command; queries yield their value.
    pub fn execute(&mut self, command: Command) -> Result<Option<i64>> {
        match command {
            Command::Ocean(cmd) => self.execute_ocean(cmd),
            Command::Fleet(cmd) => self.execute_fleet(cmd),
        }
    }

    fn execute_ocean(&mut self, cmd: OceanCommand) -> Result<Option<i64>> {
        let ocean = &mut self.ocean;
        match cmd {
            OceanCommand::AddShip { ship, cannons } => ocean.add_ship(ship, cannons).map(|_| None),
            OceanCommand::RemoveShip { ship } => ocean.remove_ship(ship).map(|_| None),
            OceanCommand::AddPirate {
                pirate,
                ship,
                treasure,
            } => ocean.add_pirate(pirate, ship, treasure).map(|_| None),
            OceanCommand::RemovePirate { pirate } => ocean.remove_pirate(pirate).map(|_| None),
            OceanCommand::Treason { source, dest } => {
                ocean.transfer_youngest_pirate(source, dest).map(|_| None)
            }
            OceanCommand::UpdatePirateTreasure { pirate, change } => {
                ocean.update_treasure(pirate, change).map(|_| None)
            }
            OceanCommand::GetTreasure { pirate } => ocean.actual_treasure(pirate).map(Some),
            OceanCommand::GetCannons { ship } => {
                ocean.cannons(ship).map(|c| Some(i64::from(c)))
            }
            OceanCommand::GetRichestPirate { ship } => {
                ocean.richest_pirate(ship).map(|p| Some(i64::from(p)))
            }
            OceanCommand::ShipsBattle { first, second } => ocean.battle(first, second).map(|_| None),
        }
    }

    fn execute_fleet(&mut self, cmd: FleetCommand) -> Result<Option<i64>> {
        let fleets = &mut self.fleets;
        match cmd {
            FleetCommand::AddFleet { fleet } => fleets.add_fleet(fleet).map(|_| None),
            FleetCommand::AddPirate { pirate, fleet } => fleets.add_pirate(pirate, fleet).map(|_| None),
            FleetCommand::PayPirate { pirate, salary } => fleets.pay_pirate(pirate, salary).map(|_| None),
            FleetCommand::NumShipsForFleet { fleet } => {
                fleets.num_ships(fleet).map(|n| Some(n as i64))
            }
            FleetCommand::GetPirateMoney { pirate } => fleets.money(pirate).map(Some),
            FleetCommand::UniteFleets { first, second } => fleets.unite(first, second).map(|_| None),
            FleetCommand::PirateArgument { first, second } => {
                fleets.settle_argument(first, second).map(|_| None)
            }
        }
    }

    /// Feeds every line of `input` through the registry, writing results to
    /// `out`. Malformed lines are skipped with a warning unless `fail_fast`
    /// is set, in which case they end the run with an error.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> std::result::Result<Summary, DriverError> {
        let mut summary = Summary::default();
        for (i, line) in input.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let command = match parse_line(self.mode, trimmed) {
                Ok(command) => command,
                Err(source) if self.fail_fast => {
                    return Err(DriverError::Parse { line: i + 1, source });
                }
                Err(err) => {
                    warn!(line = i + 1, error = %err, "skipping malformed command");
                    summary.malformed += 1;
                    continue;
                }
            };

            let outcome = self.execute(command);
            writeln!(out, "{}", format_outcome(command.name(), &outcome))?;
            summary.executed += 1;
            if outcome.is_ok() {
                summary.succeeded += 1;
            } else if self.fail_fast {
                summary.stopped_early = true;
                break;
            }
        }
        out.flush()?;
        info!(
            executed = summary.executed,
            succeeded = summary.succeeded,
            malformed = summary.malformed,
            "run finished"
        );
        Ok(summary)
    }
}
