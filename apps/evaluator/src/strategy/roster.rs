use std::collections::BTreeMap;

use crate::domain::{Entrant, PlayerId};

use super::trait_def::Strategy;

/// Live strategy instances keyed by player id.
#[derive(Default)]
pub struct Roster {
    strategies: BTreeMap<PlayerId, Box<dyn Strategy>>,
}

impl Roster {
    pub fn insert(&mut self, player_id: PlayerId, strategy: Box<dyn Strategy>) {
        self.strategies.insert(player_id, strategy);
    }

    /// Sorted player ids.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.strategies.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.strategies.contains_key(player_id)
    }

    pub fn describe(&self, player_id: &str) -> Option<String> {
        self.strategies.get(player_id).map(|s| s.describe())
    }

    /// Seats the strategies named in `ids`. Unknown ids are ignored.
    pub fn entrants<'a>(&'a mut self, ids: &[PlayerId]) -> Vec<Entrant<'a>> {
        self.strategies
            .iter_mut()
            .filter(|(id, _)| ids.contains(id))
            .map(|(id, strategy)| Entrant::new(id.clone(), strategy.as_mut()))
            .collect()
    }
}
