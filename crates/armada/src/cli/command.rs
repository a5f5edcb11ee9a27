//! Parsing of driver command lines.

use std::str::FromStr;

use thiserror::Error;

use super::config::Mode;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` takes {expected} argument(s), got {got}")]
    Arity {
        command: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("`{0}` is not an integer")]
    NotAnInteger(String),
}

/// One command for the ship registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OceanCommand {
    AddShip { ship: i32, cannons: i32 },
    RemoveShip { ship: i32 },
    AddPirate { pirate: i32, ship: i32, treasure: i64 },
    RemovePirate { pirate: i32 },
    Treason { source: i32, dest: i32 },
    UpdatePirateTreasure { pirate: i32, change: i64 },
    GetTreasure { pirate: i32 },
    GetCannons { ship: i32 },
    GetRichestPirate { ship: i32 },
    ShipsBattle { first: i32, second: i32 },
}

/// One command for the fleet registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FleetCommand {
    AddFleet { fleet: i32 },
    AddPirate { pirate: i32, fleet: i32 },
    PayPirate { pirate: i32, salary: i64 },
    NumShipsForFleet { fleet: i32 },
    GetPirateMoney { pirate: i32 },
    UniteFleets { first: i32, second: i32 },
    PirateArgument { first: i32, second: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ocean(OceanCommand),
    Fleet(FleetCommand),
}

impl Command {
    /// Name the command is reported under.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ocean(cmd) => match cmd {
                OceanCommand::AddShip { .. } => "add_ship",
                OceanCommand::RemoveShip { .. } => "remove_ship",
                OceanCommand::AddPirate { .. } => "add_pirate",
                OceanCommand::RemovePirate { .. } => "remove_pirate",
                OceanCommand::Treason { .. } => "treason",
                OceanCommand::UpdatePirateTreasure { .. } => "update_pirate_treasure",
                OceanCommand::GetTreasure { .. } => "get_treasure",
                OceanCommand::GetCannons { .. } => "get_cannons",
                OceanCommand::GetRichestPirate { .. } => "get_richest_pirate",
                OceanCommand::ShipsBattle { .. } => "ships_battle",
            },
            Command::Fleet(cmd) => match cmd {
                FleetCommand::AddFleet { .. } => "add_fleet",
                FleetCommand::AddPirate { .. } => "add_pirate",
                FleetCommand::PayPirate { .. } => "pay_pirate",
                FleetCommand::NumShipsForFleet { .. } => "num_ships_for_fleet",
                FleetCommand::GetPirateMoney { .. } => "get_pirate_money",
                FleetCommand::UniteFleets { .. } => "unite_fleets",
                FleetCommand::PirateArgument { .. } => "pirate_argument",
            },
        }
    }
}

struct Args<'a> {
    words: Vec<&'a str>,
}

impl<'a> Args<'a> {
    fn expect(command: &'static str, words: Vec<&'a str>, expected: usize) -> Result<Self, ParseError> {
        if words.len() != expected {
            return Err(ParseError::Arity {
                command,
                expected,
                got: words.len(),
            });
        }
        Ok(Self { words })
    }

    fn int<T: FromStr>(&self, i: usize) -> Result<T, ParseError> {
        let word = self.words[i];
        word.parse()
            .map_err(|_| ParseError::NotAnInteger(word.to_string()))
    }
}

/// Parses one non-blank, non-comment line in the given mode.
pub fn parse_line(mode: Mode, line: &str) -> Result<Command, ParseError> {
    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();
    match mode {
        Mode::Ocean => parse_ocean(name, rest).map(Command::Ocean),
        Mode::Fleets => parse_fleet(name, rest).map(Command::Fleet),
    }
}

fn parse_ocean(name: &str, words: Vec<&str>) -> Result<OceanCommand, ParseError> {
    let cmd = match name {
        "add_ship" => {
            let a = Args::expect("add_ship", words, 2)?;
            OceanCommand::AddShip {
                ship: a.int(0)?,
                cannons: a.int(1)?,
            }
        }
        "remove_ship" => {
            let a = Args::expect("remove_ship", words, 1)?;
            OceanCommand::RemoveShip { ship: a.int(0)? }
        }
        "add_pirate" => {
            let a = Args::expect("add_pirate", words, 3)?;
            OceanCommand::AddPirate {
                pirate: a.int(0)?,
                ship: a.int(1)?,
                treasure: a.int(2)?,
            }
        }
        "remove_pirate" => {
            let a = Args::expect("remove_pirate", words, 1)?;
            OceanCommand::RemovePirate { pirate: a.int(0)? }
        }
        "treason" => {
            let a = Args::expect("treason", words, 2)?;
            OceanCommand::Treason {
                source: a.int(0)?,
                dest: a.int(1)?,
            }
        }
        "update_pirate_treasure" => {
            let a = Args::expect("update_pirate_treasure", words, 2)?;
            OceanCommand::UpdatePirateTreasure {
                pirate: a.int(0)?,
                change: a.int(1)?,
            }
        }
        "get_treasure" => {
            let a = Args::expect("get_treasure", words, 1)?;
            OceanCommand::GetTreasure { pirate: a.int(0)? }
        }
        "get_cannons" => {
            let a = Args::expect("get_cannons", words, 1)?;
            OceanCommand::GetCannons { ship: a.int(0)? }
        }
        "get_richest_pirate" => {
            let a = Args::expect("get_richest_pirate", words, 1)?;
            OceanCommand::GetRichestPirate { ship: a.int(0)? }
        }
        "ships_battle" => {
            let a = Args::expect("ships_battle", words, 2)?;
            OceanCommand::ShipsBattle {
                first: a.int(0)?,
                second: a.int(1)?,
            }
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(cmd)
}

fn parse_fleet(name: &str, words: Vec<&str>) -> Result<FleetCommand, ParseError> {
    let cmd = match name {
        "add_fleet" => {
            let a = Args::expect("add_fleet", words, 1)?;
            FleetCommand::AddFleet { fleet: a.int(0)? }
        }
        "add_pirate" => {
            let a = Args::expect("add_pirate", words, 2)?;
            FleetCommand::AddPirate {
                pirate: a.int(0)?,
                fleet: a.int(1)?,
            }
        }
        "pay_pirate" => {
            let a = Args::expect("pay_pirate", words, 2)?;
            FleetCommand::PayPirate {
                pirate: a.int(0)?,
                salary: a.int(1)?,
            }
        }
        "num_ships_for_fleet" => {
            let a = Args::expect("num_ships_for_fleet", words, 1)?;
            FleetCommand::NumShipsForFleet { fleet: a.int(0)? }
        }
        "get_pirate_money" => {
            let a = Args::expect("get_pirate_money", words, 1)?;
            FleetCommand::GetPirateMoney { pirate: a.int(0)? }
        }
        "unite_fleets" => {
            let a = Args::expect("unite_fleets", words, 2)?;
            FleetCommand::UniteFleets {
                first: a.int(0)?,
                second: a.int(1)?,
            }
        }
        "pirate_argument" => {
            let a = Args::expect("pirate_argument", words, 2)?;
            FleetCommand::PirateArgument {
                first: a.int(0)?,
                second: a.int(1)?,
            }
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(cmd)
}
