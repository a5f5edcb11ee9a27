//! Fleet registry: weighted union-find with lazy rank offsets.
//!
//! Fleets merge by attaching one root under another. Pirates never move;
//! instead every attached fleet carries `extra_rank`, the rank shift its
//! pirates picked up relative to the fleet it points at. [`Fleets::find`]
//! compresses paths and folds those shifts so that after a lookup every
//! visited fleet points straight at the root and its `extra_rank` is the
//! whole shift from there to the root.
//!
//! Effective rank of a pirate is `base rank + extra_rank(origin fleet)`
//! once the origin fleet has been compressed.

use armada_forest::AvlSet;
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{check_id, check_pair, Error, Result};
use crate::ocean::PirateId;

pub type FleetId = i32;

/// A node of the union-find forest.
///
/// `ships` and `pirates` are only meaningful while the fleet is a root.
#[derive(Debug)]
pub struct Fleet {
    id: FleetId,
    parent: Option<FleetId>,
    extra_rank: i64,
    ships: usize,
    pirates: usize,
    /// Pirates that joined this fleet directly.
    members: AvlSet<PirateId>,
}

impl Fleet {
    fn new(id: FleetId) -> Self {
        Self {
            id,
            parent: None,
            extra_rank: 0,
            ships: 1,
            pirates: 0,
            members: AvlSet::new(),
        }
    }

    pub fn id(&self) -> FleetId {
        self.id
    }

    pub fn parent(&self) -> Option<FleetId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn extra_rank(&self) -> i64 {
        self.extra_rank
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetPirate {
    pub id: PirateId,
    /// 1-based join order within the group its fleet rooted at join time.
    pub base_rank: i64,
    pub money: i64,
    /// Fleet the pirate joined; never changes.
    pub fleet: FleetId,
}

#[derive(Debug, Default)]
pub struct Fleets {
    fleets: IndexMap<FleetId, Fleet>,
    pirates: IndexMap<PirateId, FleetPirate>,
}

fn log_rejection(op: &'static str) -> impl FnOnce(&Error) {
    move |err| debug!(op, error = %err, "fleet operation rejected")
}

impl Fleets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.fleets.get(&id)
    }

    pub fn pirate(&self, id: PirateId) -> Option<&FleetPirate> {
        self.pirates.get(&id)
    }

    pub fn add_fleet(&mut self, id: FleetId) -> Result<()> {
        self.try_add_fleet(id).inspect_err(log_rejection("add_fleet"))
    }

    fn try_add_fleet(&mut self, id: FleetId) -> Result<()> {
        check_id(id)?;
        if self.fleets.contains_key(&id) {
            return Err(Error::AlreadyExists);
        }
        self.fleets.try_reserve(1)?;
        self.fleets.insert(id, Fleet::new(id));
        debug!(fleet = id, "fleet added");
        Ok(())
    }

    /// Root of the group containing `id`, compressing the path on the way.
    pub fn find(&mut self, id: FleetId) -> Result<FleetId> {
        check_id(id)?;
        self.find_root(id).ok_or(Error::NotFound)
    }

    /// Two passes without recursion or scratch space: the first locates the
    /// root and totals the shifts on the way, the second repoints every
    /// visited fleet at the root with the shift still ahead of it.
    fn find_root(&mut self, id: FleetId) -> Option<FleetId> {
        let mut root = id;
        let mut total = 0;
        loop {
            let fleet = self.fleets.get(&root)?;
            match fleet.parent {
                Some(parent) => {
                    total += fleet.extra_rank;
                    root = parent;
                }
                None => break,
            }
        }

        let mut curr = id;
        let mut remaining = total;
        let mut hops = 0usize;
        while curr != root {
            let fleet = self.fleets.get_mut(&curr)?;
            let next = fleet.parent.unwrap_or(root);
            let own = fleet.extra_rank;
            fleet.extra_rank = remaining;
            fleet.parent = Some(root);
            remaining -= own;
            curr = next;
            hops += 1;
        }
        if hops > 1 {
            trace!(fleet = id, root, hops, "path compressed");
        }
        Some(root)
    }

    /// Adds a pirate to a root fleet; its base rank is the group's size
    /// after joining.
    pub fn add_pirate(&mut self, id: PirateId, fleet_id: FleetId) -> Result<()> {
        self.try_add_pirate(id, fleet_id)
            .inspect_err(log_rejection("add_pirate"))
    }

    fn try_add_pirate(&mut self, id: PirateId, fleet_id: FleetId) -> Result<()> {
        check_id(id)?;
        check_id(fleet_id)?;
        if self.pirates.contains_key(&id) {
            return Err(Error::AlreadyExists);
        }
        let fleet = self.fleets.get_mut(&fleet_id).ok_or(Error::NotFound)?;
        if !fleet.is_root() {
            return Err(Error::NotFound);
        }

        self.pirates.try_reserve(1)?;
        fleet.members.try_reserve(1)?;
        fleet.members.insert(id)?;
        fleet.pirates += 1;
        let base_rank = fleet.pirates as i64;
        self.pirates.insert(
            id,
            FleetPirate {
                id,
                base_rank,
                money: 0,
                fleet: fleet_id,
            },
        );
        debug!(pirate = id, fleet = fleet_id, base_rank, "pirate joined fleet");
        Ok(())
    }

    /// Credits `amount`; a balance that would overflow is rejected as
    /// [`Error::InvalidInput`].
    pub fn pay_pirate(&mut self, id: PirateId, amount: i64) -> Result<()> {
        self.try_pay_pirate(id, amount)
            .inspect_err(log_rejection("pay_pirate"))
    }

    fn try_pay_pirate(&mut self, id: PirateId, amount: i64) -> Result<()> {
        check_id(id)?;
        if amount <= 0 {
            return Err(Error::InvalidInput);
        }
        let pirate = self.pirates.get_mut(&id).ok_or(Error::NotFound)?;
        pirate.money = pirate.money.checked_add(amount).ok_or(Error::InvalidInput)?;
        debug!(pirate = id, amount, money = pirate.money, "pirate paid");
        Ok(())
    }

    /// Ships in the group rooted at `id`; merged-away fleets are not found.
    pub fn num_ships(&self, id: FleetId) -> Result<usize> {
        check_id(id)?;
        match self.fleets.get(&id) {
            Some(fleet) if fleet.is_root() => Ok(fleet.ships),
            _ => Err(Error::NotFound),
        }
    }

    /// Pirates in the group rooted at `id`; merged-away fleets are not found.
    pub fn num_pirates(&self, id: FleetId) -> Result<usize> {
        check_id(id)?;
        match self.fleets.get(&id) {
            Some(fleet) if fleet.is_root() => Ok(fleet.pirates),
            _ => Err(Error::NotFound),
        }
    }

    pub fn money(&self, id: PirateId) -> Result<i64> {
        check_id(id)?;
        self.pirates
            .get(&id)
            .map(|p| p.money)
            .ok_or(Error::NotFound)
    }

    /// Ids of the pirates that joined `id` directly, in id order.
    pub fn members(&self, id: FleetId) -> Result<impl Iterator<Item = PirateId> + '_> {
        check_id(id)?;
        let fleet = self.fleets.get(&id).ok_or(Error::NotFound)?;
        Ok(fleet.members.iter().copied())
    }

    /// Effective rank of a pirate within its current group.
    pub fn rank(&mut self, id: PirateId) -> Result<i64> {
        check_id(id)?;
        let pirate = self.pirates.get(&id).ok_or(Error::NotFound)?;
        let (base, origin) = (pirate.base_rank, pirate.fleet);
        self.effective_rank(base, origin).ok_or(Error::NotFound)
    }

    fn effective_rank(&mut self, base: i64, origin: FleetId) -> Option<i64> {
        let root = self.find_root(origin)?;
        if root == origin {
            return Some(base);
        }
        Some(base + self.fleets.get(&origin)?.extra_rank)
    }

    /// Merges two non-empty root fleets. The one with fewer pirates goes
    /// under the other (ties: `second` under `first`) and its pirates rank
    /// after all of the new parent's.
    pub fn unite(&mut self, first: FleetId, second: FleetId) -> Result<()> {
        self.try_unite(first, second)
            .inspect_err(log_rejection("unite"))
    }

    fn try_unite(&mut self, first: FleetId, second: FleetId) -> Result<()> {
        check_pair(first, second)?;
        let a = self.fleets.get(&first).ok_or(Error::NotFound)?;
        let b = self.fleets.get(&second).ok_or(Error::NotFound)?;
        if !a.is_root() || !b.is_root() || a.pirates == 0 || b.pirates == 0 {
            return Err(Error::NotFound);
        }

        let (parent, child) = if a.pirates >= b.pirates {
            (first, second)
        } else {
            (second, first)
        };
        let (parent_ships, parent_pirates) = {
            let p = if parent == first { a } else { b };
            (p.ships, p.pirates)
        };

        let c = self.fleets.get_mut(&child).ok_or(Error::NotFound)?;
        c.parent = Some(parent);
        c.extra_rank += parent_pirates as i64;
        let (child_ships, child_pirates) = (c.ships, c.pirates);

        let p = self.fleets.get_mut(&parent).ok_or(Error::NotFound)?;
        p.ships = parent_ships + child_ships;
        p.pirates = parent_pirates + child_pirates;
        debug!(
            parent,
            child,
            shift = parent_pirates,
            ships = p.ships,
            pirates = p.pirates,
            "fleets united"
        );
        Ok(())
    }

    /// Settles an argument between two pirates of the same group: the one
    /// with the larger rank number pays the rank difference to the other.
    pub fn settle_argument(&mut self, first: PirateId, second: PirateId) -> Result<()> {
        self.try_settle_argument(first, second)
            .inspect_err(log_rejection("settle_argument"))
    }

    fn try_settle_argument(&mut self, first: PirateId, second: PirateId) -> Result<()> {
        check_pair(first, second)?;
        let a = self.pirates.get(&first).ok_or(Error::NotFound)?;
        let b = self.pirates.get(&second).ok_or(Error::NotFound)?;
        let (a_base, a_fleet, b_base, b_fleet) = (a.base_rank, a.fleet, b.base_rank, b.fleet);

        let a_root = self.find_root(a_fleet).ok_or(Error::NotFound)?;
        let b_root = self.find_root(b_fleet).ok_or(Error::NotFound)?;
        if a_root != b_root {
            return Err(Error::NotFound);
        }
        let a_rank = self.effective_rank(a_base, a_fleet).ok_or(Error::NotFound)?;
        let b_rank = self.effective_rank(b_base, b_fleet).ok_or(Error::NotFound)?;

        let (payer, payee) = if a_rank > b_rank {
            (first, second)
        } else {
            (second, first)
        };
        let amount = (a_rank - b_rank).abs();
        let balance = |id: PirateId| self.pirates.get(&id).map(|p| p.money).ok_or(Error::NotFound);
        let payer_money = balance(payer)?
            .checked_sub(amount)
            .ok_or(Error::InvalidInput)?;
        let payee_money = balance(payee)?
            .checked_add(amount)
            .ok_or(Error::InvalidInput)?;
        if let Some(p) = self.pirates.get_mut(&payer) {
            p.money = payer_money;
        }
        if let Some(p) = self.pirates.get_mut(&payee) {
            p.money = payee_money;
        }
        debug!(payer, payee, amount, "argument settled");
        Ok(())
    }
}
