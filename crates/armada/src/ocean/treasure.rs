//! Lazy per-ship treasure offset.
//!
//! Pirates store an *adjusted* treasure; the ship carries one signed offset
//! that is added on read. Shifting the offset therefore changes the visible
//! treasure of every pirate aboard in O(1) without touching their records:
//!
//! ```text
//! actual = adjusted + offset
//! ```

/// Treasure amount, either actual or adjusted depending on context.
pub type Treasure = i64;

/// Signed accumulator applied uniformly to every member of one ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreasureOffset(i64);

impl TreasureOffset {
    pub fn value(self) -> i64 {
        self.0
    }

    /// Stored form of a visible treasure under the current offset; `None`
    /// when it does not fit in a [`Treasure`].
    #[inline]
    pub fn adjusted(self, actual: Treasure) -> Option<Treasure> {
        actual.checked_sub(self.0)
    }

    /// Visible form of a stored treasure under the current offset; `None`
    /// when it does not fit in a [`Treasure`].
    #[inline]
    pub fn actual(self, adjusted: Treasure) -> Option<Treasure> {
        adjusted.checked_add(self.0)
    }

    pub fn shifted(self, delta: i64) -> Option<Self> {
        self.0.checked_add(delta).map(Self)
    }
}

/// Fighting strength of a ship: its crew, capped by its cannons.
#[inline]
pub fn power(cannons: u32, crew: usize) -> usize {
    (cannons as usize).min(crew)
}
