use std::collections::TryReserveError;

use armada_forest::{AvlMap, AvlSet};

use super::treasure::{power, Treasure, TreasureOffset};
use super::{PirateId, ShipId};

/// Pirates sharing one adjusted treasure value, ordered by id.
type Bucket = AvlSet<PirateId>;

/// Capacity set aside in a ship's treasure index for one more pirate.
///
/// Holds a pre-grown bucket when the target treasure value has no bucket
/// yet, so that placing the pirate later cannot allocate.
#[derive(Debug, Default)]
pub(crate) struct TreasureSlot {
    fresh: Option<Bucket>,
}

/// The three per-ship indexes, kept mutually consistent: a pirate in
/// `by_id` has exactly one `by_arrival` entry and sits in exactly one
/// `by_treasure` bucket. Empty buckets are removed eagerly.
#[derive(Debug, Default)]
pub(crate) struct ShipIndexSet {
    by_id: AvlSet<PirateId>,
    by_arrival: AvlMap<u64, PirateId>,
    by_treasure: AvlMap<Treasure, Bucket>,
}

impl ShipIndexSet {
    fn len(&self) -> usize {
        self.by_id.len()
    }

    fn reserve_treasure(&mut self, adjusted: Treasure) -> Result<TreasureSlot, TryReserveError> {
        if let Some(bucket) = self.by_treasure.get_mut(&adjusted) {
            bucket.try_reserve(1)?;
            return Ok(TreasureSlot::default());
        }
        self.by_treasure.try_reserve(1)?;
        let mut fresh = Bucket::new();
        fresh.try_reserve(1)?;
        Ok(TreasureSlot { fresh: Some(fresh) })
    }

    fn reserve_member(&mut self, adjusted: Treasure) -> Result<TreasureSlot, TryReserveError> {
        self.by_id.try_reserve(1)?;
        self.by_arrival.try_reserve(1)?;
        self.reserve_treasure(adjusted)
    }

    fn place_treasure(
        &mut self,
        slot: TreasureSlot,
        id: PirateId,
        adjusted: Treasure,
    ) -> Result<(), TryReserveError> {
        match self.by_treasure.get_mut(&adjusted) {
            Some(bucket) => {
                bucket.insert(id)?;
            }
            None => {
                let mut bucket = slot.fresh.unwrap_or_default();
                bucket.insert(id)?;
                self.by_treasure.insert(adjusted, bucket)?;
            }
        }
        Ok(())
    }

    fn take_treasure(&mut self, id: PirateId, adjusted: Treasure) {
        let Some(bucket) = self.by_treasure.get_mut(&adjusted) else {
            return;
        };
        bucket.remove(&id);
        if bucket.is_empty() {
            self.by_treasure.remove(&adjusted);
        }
    }

    fn insert(
        &mut self,
        slot: TreasureSlot,
        id: PirateId,
        order: u64,
        adjusted: Treasure,
    ) -> Result<(), TryReserveError> {
        self.by_id.insert(id)?;
        self.by_arrival.insert(order, id)?;
        self.place_treasure(slot, id, adjusted)
    }

    fn remove(&mut self, id: PirateId, order: u64, adjusted: Treasure) {
        self.by_id.remove(&id);
        self.by_arrival.remove(&order);
        self.take_treasure(id, adjusted);
    }

    /// Highest adjusted treasure, then highest id within that bucket.
    fn richest(&self) -> Option<PirateId> {
        let (_, bucket) = self.by_treasure.last()?;
        bucket.last().copied()
    }

    /// Smallest and largest adjusted treasure aboard.
    fn treasure_bounds(&self) -> Option<(Treasure, Treasure)> {
        let (lo, _) = self.by_treasure.first()?;
        let (hi, _) = self.by_treasure.last()?;
        Some((*lo, *hi))
    }

    fn earliest_arrival(&self) -> Option<PirateId> {
        self.by_arrival.first().map(|(_, id)| *id)
    }

    #[cfg(test)]
    fn assert_consistent(&self) -> Result<(), String> {
        self.by_id.assert_valid()?;
        self.by_arrival.assert_valid()?;
        self.by_treasure.assert_valid()?;
        if self.by_arrival.len() != self.by_id.len() {
            return Err("arrival index out of step with membership".to_string());
        }
        let mut bucketed = 0;
        for (treasure, bucket) in self.by_treasure.iter() {
            if bucket.is_empty() {
                return Err(format!("empty bucket left at {treasure}"));
            }
            bucket.assert_valid()?;
            bucketed += bucket.len();
        }
        if bucketed != self.by_id.len() {
            return Err("treasure index out of step with membership".to_string());
        }
        Ok(())
    }
}

/// One ship: immutable cannon count, lazy treasure offset, and the indexes
/// over its current crew.
#[derive(Debug)]
pub struct Ship {
    id: ShipId,
    cannons: u32,
    last_order: u64,
    offset: TreasureOffset,
    richest: Option<PirateId>,
    crew: ShipIndexSet,
}

impl Ship {
    pub(crate) fn new(id: ShipId, cannons: u32) -> Self {
        Self {
            id,
            cannons,
            last_order: 0,
            offset: TreasureOffset::default(),
            richest: None,
            crew: ShipIndexSet::default(),
        }
    }

    pub fn id(&self) -> ShipId {
        self.id
    }

    pub fn cannons(&self) -> u32 {
        self.cannons
    }

    /// Number of pirates currently aboard.
    pub fn len(&self) -> usize {
        self.crew.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crew.len() == 0
    }

    pub fn offset(&self) -> TreasureOffset {
        self.offset
    }

    /// Cached richest pirate, `None` when the ship is empty.
    pub fn richest(&self) -> Option<PirateId> {
        self.richest
    }

    pub(crate) fn power(&self) -> usize {
        power(self.cannons, self.len())
    }

    /// The offset after adding `delta`, or `None` if it, or the visible
    /// treasure of anyone aboard, would leave the [`Treasure`] range.
    pub(crate) fn shifted_offset(&self, delta: i64) -> Option<TreasureOffset> {
        let offset = self.offset.shifted(delta)?;
        if let Some((lo, hi)) = self.crew.treasure_bounds() {
            offset.actual(lo)?;
            offset.actual(hi)?;
        }
        Some(offset)
    }

    pub(crate) fn set_offset(&mut self, offset: TreasureOffset) {
        self.offset = offset;
    }

    pub(crate) fn earliest_arrival(&self) -> Option<PirateId> {
        self.crew.earliest_arrival()
    }

    pub(crate) fn reserve_member(&mut self, adjusted: Treasure) -> Result<TreasureSlot, TryReserveError> {
        self.crew.reserve_member(adjusted)
    }

    pub(crate) fn reserve_treasure(&mut self, adjusted: Treasure) -> Result<TreasureSlot, TryReserveError> {
        self.crew.reserve_treasure(adjusted)
    }

    /// Takes a pirate aboard under the next arrival order, which is returned.
    ///
    /// Cannot fail when `slot` came from [`Ship::reserve_member`] for the
    /// same adjusted treasure.
    pub(crate) fn admit(
        &mut self,
        slot: TreasureSlot,
        id: PirateId,
        adjusted: Treasure,
    ) -> Result<u64, TryReserveError> {
        let order = self.last_order + 1;
        self.crew.insert(slot, id, order, adjusted)?;
        self.last_order = order;
        self.refresh_richest();
        Ok(order)
    }

    pub(crate) fn discharge(&mut self, id: PirateId, order: u64, adjusted: Treasure) {
        self.crew.remove(id, order, adjusted);
        self.refresh_richest();
    }

    /// Moves a pirate between treasure buckets.
    pub(crate) fn retreasure(
        &mut self,
        slot: TreasureSlot,
        id: PirateId,
        from: Treasure,
        to: Treasure,
    ) -> Result<(), TryReserveError> {
        self.crew.take_treasure(id, from);
        self.crew.place_treasure(slot, id, to)?;
        self.refresh_richest();
        Ok(())
    }

    fn refresh_richest(&mut self) {
        self.richest = self.crew.richest();
        tracing::trace!(ship = self.id, richest = ?self.richest, "richest pirate recomputed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(ship: &mut Ship, id: PirateId, adjusted: Treasure) -> u64 {
        let slot = ship.reserve_member(adjusted).unwrap();
        ship.admit(slot, id, adjusted).unwrap()
    }

    #[test]
    fn test_arrival_orders_start_at_one_and_increase() {
        let mut ship = Ship::new(1, 3);
        assert_eq!(board(&mut ship, 10, 5), 1);
        assert_eq!(board(&mut ship, 11, 5), 2);
        ship.discharge(11, 2, 5);
        assert_eq!(board(&mut ship, 12, 5), 3);
        ship.crew.assert_consistent().unwrap();
    }

    #[test]
    fn test_richest_prefers_higher_id_on_ties() {
        let mut ship = Ship::new(1, 3);
        board(&mut ship, 4, 100);
        board(&mut ship, 9, 100);
        board(&mut ship, 7, 100);
        assert_eq!(ship.richest(), Some(9));
        board(&mut ship, 2, 101);
        assert_eq!(ship.richest(), Some(2));
    }

    #[test]
    fn test_empty_buckets_are_dropped() {
        let mut ship = Ship::new(1, 0);
        let order = board(&mut ship, 3, 40);
        let slot = ship.reserve_treasure(41).unwrap();
        ship.retreasure(slot, 3, 40, 41).unwrap();
        assert!(!ship.crew.by_treasure.contains_key(&40));
        ship.crew.assert_consistent().unwrap();

        ship.discharge(3, order, 41);
        assert!(ship.crew.by_treasure.is_empty());
        assert_eq!(ship.richest(), None);
        assert!(ship.is_empty());
    }

    #[test]
    fn test_offset_shift_keeps_crew_in_range() {
        let mut ship = Ship::new(1, 1);
        assert!(ship.shifted_offset(i64::MAX).is_some());
        board(&mut ship, 5, i64::MAX - 1);
        board(&mut ship, 6, -3);
        assert_eq!(ship.shifted_offset(1).map(|o| o.value()), Some(1));
        assert_eq!(ship.shifted_offset(2), None);
        assert_eq!(ship.crew.treasure_bounds(), Some((-3, i64::MAX - 1)));
    }

    #[test]
    fn test_earliest_arrival_is_fifo() {
        let mut ship = Ship::new(1, 1);
        let first = board(&mut ship, 30, 0);
        board(&mut ship, 20, 0);
        assert_eq!(ship.earliest_arrival(), Some(30));
        ship.discharge(30, first, 0);
        assert_eq!(ship.earliest_arrival(), Some(20));
    }
}
