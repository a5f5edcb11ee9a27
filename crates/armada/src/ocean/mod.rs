//! Ship/pirate registry.
//!
//! Each ship keeps three balanced indexes over its crew (by pirate id, by
//! arrival order, by adjusted treasure) plus a lazy [`TreasureOffset`].
//! Battles shift offsets instead of rewriting pirates, and every crew change
//! recomputes the ship's cached richest pirate in O(log n).
//!
//! Identifiers live in flat tables; the per-ship indexes store ids only, so
//! a pirate's record exists exactly once.

mod ship;
pub mod treasure;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{check_id, check_pair, Error, Result};

pub use ship::Ship;
pub use treasure::{Treasure, TreasureOffset};

pub type ShipId = i32;
pub type PirateId = i32;

/// Primary record of a pirate in the ship subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pirate {
    pub id: PirateId,
    pub ship: ShipId,
    /// Arrival order within the current ship.
    pub order: u64,
    /// Treasure minus the ship's offset at the time of the last write.
    pub adjusted: Treasure,
}

/// Registry of ships and the pirates aboard them.
#[derive(Debug, Default)]
pub struct Ocean {
    ships: IndexMap<ShipId, Ship>,
    pirates: IndexMap<PirateId, Pirate>,
}

fn log_rejection(op: &'static str) -> impl FnOnce(&Error) {
    move |err| debug!(op, error = %err, "ocean operation rejected")
}

impl Ocean {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.get(&id)
    }

    pub fn pirate(&self, id: PirateId) -> Option<&Pirate> {
        self.pirates.get(&id)
    }

    pub fn add_ship(&mut self, id: ShipId, cannons: i32) -> Result<()> {
        self.try_add_ship(id, cannons)
            .inspect_err(log_rejection("add_ship"))
    }

    fn try_add_ship(&mut self, id: ShipId, cannons: i32) -> Result<()> {
        check_id(id)?;
        let cannons = u32::try_from(cannons).map_err(|_| Error::InvalidInput)?;
        if self.ships.contains_key(&id) {
            return Err(Error::AlreadyExists);
        }
        self.ships.try_reserve(1)?;
        self.ships.insert(id, Ship::new(id, cannons));
        debug!(ship = id, cannons, "ship added");
        Ok(())
    }

    /// Removes an empty ship.
    pub fn remove_ship(&mut self, id: ShipId) -> Result<()> {
        self.try_remove_ship(id)
            .inspect_err(log_rejection("remove_ship"))
    }

    fn try_remove_ship(&mut self, id: ShipId) -> Result<()> {
        check_id(id)?;
        let ship = self.ships.get(&id).ok_or(Error::NotFound)?;
        if !ship.is_empty() {
            return Err(Error::Conflict);
        }
        self.ships.swap_remove(&id);
        debug!(ship = id, "ship removed");
        Ok(())
    }

    /// Boards a new pirate whose visible treasure is `treasure`.
    pub fn add_pirate(&mut self, id: PirateId, ship_id: ShipId, treasure: Treasure) -> Result<()> {
        self.try_add_pirate(id, ship_id, treasure)
            .inspect_err(log_rejection("add_pirate"))
    }

    fn try_add_pirate(&mut self, id: PirateId, ship_id: ShipId, treasure: Treasure) -> Result<()> {
        check_id(id)?;
        check_id(ship_id)?;
        if self.pirates.contains_key(&id) {
            return Err(Error::AlreadyExists);
        }
        let ship = self.ships.get_mut(&ship_id).ok_or(Error::NotFound)?;

        let adjusted = ship.offset().adjusted(treasure).ok_or(Error::InvalidInput)?;
        self.pirates.try_reserve(1)?;
        let slot = ship.reserve_member(adjusted)?;
        let order = ship.admit(slot, id, adjusted)?;
        self.pirates.insert(
            id,
            Pirate {
                id,
                ship: ship_id,
                order,
                adjusted,
            },
        );
        debug!(pirate = id, ship = ship_id, treasure, adjusted, order, "pirate boarded");
        Ok(())
    }

    pub fn remove_pirate(&mut self, id: PirateId) -> Result<()> {
        self.try_remove_pirate(id)
            .inspect_err(log_rejection("remove_pirate"))
    }

    fn try_remove_pirate(&mut self, id: PirateId) -> Result<()> {
        check_id(id)?;
        let pirate = self.pirates.get(&id).ok_or(Error::NotFound)?;
        let ship = self.ships.get_mut(&pirate.ship).ok_or(Error::NotFound)?;
        ship.discharge(id, pirate.order, pirate.adjusted);
        let ship_id = pirate.ship;
        self.pirates.swap_remove(&id);
        debug!(pirate = id, ship = ship_id, "pirate removed");
        Ok(())
    }

    /// Moves the longest-serving pirate of `source` (smallest arrival order)
    /// to `dest`, keeping its visible treasure.
    ///
    /// Returns the id of the pirate that moved.
    pub fn transfer_youngest_pirate(&mut self, source: ShipId, dest: ShipId) -> Result<PirateId> {
        self.try_transfer(source, dest)
            .inspect_err(log_rejection("transfer_youngest_pirate"))
    }

    fn try_transfer(&mut self, source: ShipId, dest: ShipId) -> Result<PirateId> {
        check_pair(source, dest)?;
        let src = self.ships.get(&source).ok_or(Error::NotFound)?;
        if !self.ships.contains_key(&dest) {
            return Err(Error::NotFound);
        }
        let id = src.earliest_arrival().ok_or(Error::NotFound)?;
        let pirate = self.pirates.get(&id).ok_or(Error::NotFound)?;
        let (old_order, old_adjusted) = (pirate.order, pirate.adjusted);
        let actual = src.offset().actual(old_adjusted).ok_or(Error::InvalidInput)?;

        let dst = self.ships.get_mut(&dest).ok_or(Error::NotFound)?;
        let adjusted = dst.offset().adjusted(actual).ok_or(Error::InvalidInput)?;
        let slot = dst.reserve_member(adjusted)?;

        if let Some(src) = self.ships.get_mut(&source) {
            src.discharge(id, old_order, old_adjusted);
        }
        let dst = self.ships.get_mut(&dest).ok_or(Error::NotFound)?;
        let order = dst.admit(slot, id, adjusted)?;

        if let Some(pirate) = self.pirates.get_mut(&id) {
            pirate.ship = dest;
            pirate.order = order;
            pirate.adjusted = adjusted;
        }
        debug!(pirate = id, from = source, to = dest, actual, adjusted, order, "pirate transferred");
        Ok(id)
    }

    /// Adds `delta` to a pirate's treasure. A zero delta succeeds without
    /// looking the pirate up; a result outside the [`Treasure`] range is
    /// [`Error::InvalidInput`].
    pub fn update_treasure(&mut self, id: PirateId, delta: Treasure) -> Result<()> {
        self.try_update_treasure(id, delta)
            .inspect_err(log_rejection("update_treasure"))
    }

    fn try_update_treasure(&mut self, id: PirateId, delta: Treasure) -> Result<()> {
        check_id(id)?;
        if delta == 0 {
            return Ok(());
        }
        let pirate = self.pirates.get_mut(&id).ok_or(Error::NotFound)?;
        let ship = self.ships.get_mut(&pirate.ship).ok_or(Error::NotFound)?;

        let from = pirate.adjusted;
        let to = from
            .checked_add(delta)
            .filter(|&to| ship.offset().actual(to).is_some())
            .ok_or(Error::InvalidInput)?;
        let slot = ship.reserve_treasure(to)?;
        ship.retreasure(slot, id, from, to)?;
        pirate.adjusted = to;
        debug!(pirate = id, ship = pirate.ship, delta, adjusted = to, "treasure updated");
        Ok(())
    }

    /// Visible treasure: stored value plus the owning ship's current offset.
    pub fn actual_treasure(&self, id: PirateId) -> Result<Treasure> {
        check_id(id)?;
        let pirate = self.pirates.get(&id).ok_or(Error::NotFound)?;
        let ship = self.ships.get(&pirate.ship).ok_or(Error::NotFound)?;
        ship.offset().actual(pirate.adjusted).ok_or(Error::InvalidInput)
    }

    pub fn cannons(&self, id: ShipId) -> Result<u32> {
        check_id(id)?;
        self.ships.get(&id).map(Ship::cannons).ok_or(Error::NotFound)
    }

    /// Richest pirate aboard; ties go to the highest id.
    pub fn richest_pirate(&self, id: ShipId) -> Result<PirateId> {
        check_id(id)?;
        self.ships
            .get(&id)
            .ok_or(Error::NotFound)?
            .richest()
            .ok_or(Error::NotFound)
    }

    /// Number of pirates aboard `id`.
    pub fn ship_len(&self, id: ShipId) -> Result<usize> {
        check_id(id)?;
        self.ships.get(&id).map(Ship::len).ok_or(Error::NotFound)
    }

    /// Current treasure offset of `id`.
    pub fn offset(&self, id: ShipId) -> Result<i64> {
        check_id(id)?;
        self.ships
            .get(&id)
            .map(|ship| ship.offset().value())
            .ok_or(Error::NotFound)
    }

    /// Fights two ships. The stronger one gains the loser's crew size on
    /// every pirate; the loser's pirates each lose the winner's crew size.
    /// Equal power is a draw and changes nothing. A shift that would push
    /// any visible treasure out of range is [`Error::InvalidInput`].
    pub fn battle(&mut self, first: ShipId, second: ShipId) -> Result<()> {
        self.try_battle(first, second)
            .inspect_err(log_rejection("battle"))
    }

    fn try_battle(&mut self, first: ShipId, second: ShipId) -> Result<()> {
        check_pair(first, second)?;
        let a = self.ships.get(&first).ok_or(Error::NotFound)?;
        let b = self.ships.get(&second).ok_or(Error::NotFound)?;

        let (winner, loser) = match a.power().cmp(&b.power()) {
            std::cmp::Ordering::Equal => {
                debug!(first, second, "battle drawn");
                return Ok(());
            }
            std::cmp::Ordering::Greater => (first, second),
            std::cmp::Ordering::Less => (second, first),
        };
        let crew = |ship: &Ship| ship.len() as i64;
        let (winner_ship, loser_ship) = if winner == first { (a, b) } else { (b, a) };
        let (winner_crew, loser_crew) = (crew(winner_ship), crew(loser_ship));
        let gained = winner_ship
            .shifted_offset(loser_crew)
            .ok_or(Error::InvalidInput)?;
        let lost = loser_ship
            .shifted_offset(-winner_crew)
            .ok_or(Error::InvalidInput)?;

        if let Some(ship) = self.ships.get_mut(&winner) {
            ship.set_offset(gained);
        }
        if let Some(ship) = self.ships.get_mut(&loser) {
            ship.set_offset(lost);
        }
        debug!(winner, loser, gain = loser_crew, loss = winner_crew, "battle fought");
        Ok(())
    }
}
