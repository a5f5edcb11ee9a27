use std::collections::BTreeMap;

use armada::{Error, Ocean};
use proptest::prelude::*;

const SHIPS: i32 = 3;

#[derive(Clone, Debug)]
enum Op {
    Add(i32, i32, i64),
    Remove(i32),
    Treason(i32, i32),
    Update(i32, i64),
    Battle(i32, i32),
}

fn op() -> impl Strategy<Value = Op> {
    let pirate = 1..=10i32;
    let ship = 1..=SHIPS;
    prop_oneof![
        3 => (pirate.clone(), ship.clone(), -50i64..50).prop_map(|(p, s, t)| Op::Add(p, s, t)),
        1 => pirate.clone().prop_map(Op::Remove),
        2 => (ship.clone(), ship.clone()).prop_map(|(a, b)| Op::Treason(a, b)),
        2 => (pirate, -20i64..20).prop_map(|(p, d)| Op::Update(p, d)),
        2 => (ship.clone(), ship).prop_map(|(a, b)| Op::Battle(a, b)),
    ]
}

#[derive(Clone, Copy, Debug)]
struct Member {
    ship: i32,
    treasure: i64,
    order: u64,
}

/// Straightforward model: every pirate stores its visible treasure and
/// battles rewrite each member.
#[derive(Default)]
struct Model {
    cannons: BTreeMap<i32, u32>,
    counters: BTreeMap<i32, u64>,
    pirates: BTreeMap<i32, Member>,
}

impl Model {
    fn crew(&self, ship: i32) -> usize {
        self.pirates.values().filter(|m| m.ship == ship).count()
    }

    fn next_order(&mut self, ship: i32) -> u64 {
        let counter = self.counters.entry(ship).or_default();
        *counter += 1;
        *counter
    }

    fn richest(&self, ship: i32) -> Option<i32> {
        self.pirates
            .iter()
            .filter(|(_, m)| m.ship == ship)
            .max_by_key(|(id, m)| (m.treasure, **id))
            .map(|(id, _)| *id)
    }

    fn apply(&mut self, op: &Op) -> Result<(), Error> {
        match *op {
            Op::Add(p, s, t) => {
                if self.pirates.contains_key(&p) {
                    return Err(Error::AlreadyExists);
                }
                let order = self.next_order(s);
                self.pirates.insert(p, Member { ship: s, treasure: t, order });
            }
            Op::Remove(p) => {
                self.pirates.remove(&p).ok_or(Error::NotFound)?;
            }
            Op::Treason(a, b) => {
                if a == b {
                    return Err(Error::InvalidInput);
                }
                let (&id, _) = self
                    .pirates
                    .iter()
                    .filter(|(_, m)| m.ship == a)
                    .min_by_key(|(_, m)| m.order)
                    .ok_or(Error::NotFound)?;
                let order = self.next_order(b);
                if let Some(m) = self.pirates.get_mut(&id) {
                    m.ship = b;
                    m.order = order;
                }
            }
            Op::Update(p, d) => {
                if d != 0 {
                    self.pirates.get_mut(&p).ok_or(Error::NotFound)?.treasure += d;
                }
            }
            Op::Battle(a, b) => {
                if a == b {
                    return Err(Error::InvalidInput);
                }
                let (ca, cb) = (self.crew(a), self.crew(b));
                let power_a = ca.min(self.cannons[&a] as usize);
                let power_b = cb.min(self.cannons[&b] as usize);
                if power_a == power_b {
                    return Ok(());
                }
                let (winner, loser, gain, loss) = if power_a > power_b {
                    (a, b, cb, ca)
                } else {
                    (b, a, ca, cb)
                };
                for m in self.pirates.values_mut() {
                    if m.ship == winner {
                        m.treasure += gain as i64;
                    } else if m.ship == loser {
                        m.treasure -= loss as i64;
                    }
                }
            }
        }
        Ok(())
    }
}

proptest! {
    #[test]
    fn ocean_matches_model(
        cannons in prop::collection::vec(0..5i32, SHIPS as usize),
        ops in prop::collection::vec(op(), 0..150),
    ) {
        let mut ocean = Ocean::new();
        let mut model = Model::default();
        for (i, &c) in cannons.iter().enumerate() {
            let id = i as i32 + 1;
            ocean.add_ship(id, c).unwrap();
            model.cannons.insert(id, c as u32);
        }

        for op in &ops {
            let got = match *op {
                Op::Add(p, s, t) => ocean.add_pirate(p, s, t),
                Op::Remove(p) => ocean.remove_pirate(p),
                Op::Treason(a, b) => ocean.transfer_youngest_pirate(a, b).map(drop),
                Op::Update(p, d) => ocean.update_treasure(p, d),
                Op::Battle(a, b) => ocean.battle(a, b),
            };
            prop_assert_eq!(got, model.apply(op), "{:?}", op);

            for (&id, m) in &model.pirates {
                prop_assert_eq!(ocean.actual_treasure(id), Ok(m.treasure));
                prop_assert_eq!(ocean.pirate(id).map(|p| (p.ship, p.order)), Some((m.ship, m.order)));
            }
            for ship in 1..=SHIPS {
                prop_assert_eq!(ocean.ship_len(ship), Ok(model.crew(ship)));
                prop_assert_eq!(ocean.richest_pirate(ship).ok(), model.richest(ship));
            }
        }
    }
}
