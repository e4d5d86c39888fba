//! How to register a strategy
//!
//! 1) Implement `Strategy` for your type in its module.
//! 2) Either add a `StrategyFactory` entry to the static list below (built-ins),
//!    or hand a `Registration` with your own factory closure to the catalog.
//! 3) Registering a player id that is already present replaces the earlier
//!    entry; the new version takes effect on the next reload.
//! 4) Determinism: same seed ⇒ same behavior (where applicable).

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use super::guard;
use super::roster::Roster;
use super::trait_def::{Strategy, StrategyError};
use super::{CallingStation, CardReader, RandomStrategy};
use crate::domain::PlayerId;

type MakeStrategy = dyn Fn() -> Result<Box<dyn Strategy>, StrategyError> + Send + Sync;

/// A loadable strategy source: the id it plays under and how to build it.
#[derive(Clone)]
pub struct Registration {
    pub player_id: PlayerId,
    pub version: String,
    factory: Arc<MakeStrategy>,
}

impl Registration {
    pub fn new<F>(player_id: impl Into<PlayerId>, version: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Strategy>, StrategyError> + Send + Sync + 'static,
    {
        Self {
            player_id: player_id.into(),
            version: version.into(),
            factory: Arc::new(factory),
        }
    }

    /// Builds a fresh instance. Constructor panics come back as `Load` errors.
    pub fn instantiate(&self) -> Result<Box<dyn Strategy>, StrategyError> {
        guard::construct(|| (self.factory)())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("player_id", &self.player_id)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Ordered set of registrations, at most one per player id.
#[derive(Debug, Clone, Default)]
pub struct StrategyCatalog {
    registrations: Vec<Registration>,
}

impl StrategyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `registration`, shadowing any earlier one with the same player id.
    /// Returns the shadowed registration.
    pub fn register(&mut self, registration: Registration) -> Option<Registration> {
        match self
            .registrations
            .iter_mut()
            .find(|r| r.player_id == registration.player_id)
        {
            Some(existing) => {
                info!(
                    player_id = %registration.player_id,
                    old_version = %existing.version,
                    new_version = %registration.version,
                    "Strategy registration replaced"
                );
                Some(std::mem::replace(existing, registration))
            }
            None => {
                info!(player_id = %registration.player_id, version = %registration.version, "Strategy registered");
                self.registrations.push(registration);
                None
            }
        }
    }

    pub fn unregister(&mut self, player_id: &str) -> Option<Registration> {
        let idx = self
            .registrations
            .iter()
            .position(|r| r.player_id == player_id)?;
        Some(self.registrations.remove(idx))
    }

    pub fn get(&self, player_id: &str) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.player_id == player_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.registrations.iter().map(|r| r.player_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Builds every registered strategy. Registrations that fail to build are
    /// logged and left out of the roster.
    pub fn instantiate_all(&self) -> Roster {
        let mut roster = Roster::default();
        for registration in &self.registrations {
            match registration.instantiate() {
                Ok(strategy) => roster.insert(registration.player_id.clone(), strategy),
                Err(err) => warn!(
                    player_id = %registration.player_id,
                    version = %registration.version,
                    error = %err,
                    "Skipping strategy that failed to load"
                ),
            }
        }
        info!(
            loaded = roster.len(),
            registered = self.registrations.len(),
            "Strategies instantiated"
        );
        roster
    }
}

/// Factory definition for the built-in strategies.
pub struct StrategyFactory {
    pub name: &'static str,
    pub version: &'static str,
    pub make: fn(player_id: &str, seed: Option<u64>) -> Box<dyn Strategy>,
}

impl StrategyFactory {
    /// Registration that builds this strategy under `player_id`.
    pub fn registration(&'static self, player_id: impl Into<PlayerId>, seed: Option<u64>) -> Registration {
        let player_id = player_id.into();
        let id = player_id.clone();
        Registration::new(player_id, self.version, move || Ok((self.make)(&id, seed)))
    }
}

static STRATEGY_FACTORIES: &[StrategyFactory] = &[
    StrategyFactory {
        name: RandomStrategy::NAME,
        version: RandomStrategy::VERSION,
        make: make_random,
    },
    StrategyFactory {
        name: CallingStation::NAME,
        version: CallingStation::VERSION,
        make: make_calling_station,
    },
    StrategyFactory {
        name: CardReader::NAME,
        version: CardReader::VERSION,
        make: make_card_reader,
    },
];

/// Returns the statically registered strategy factories.
pub fn registered_strategies() -> &'static [StrategyFactory] {
    STRATEGY_FACTORIES
}

/// Finds a built-in strategy factory by its name.
pub fn by_name(name: &str) -> Option<&'static StrategyFactory> {
    registered_strategies()
        .iter()
        .find(|factory| factory.name == name)
}

/// Catalog with every built-in registered under its own name.
pub fn builtin_catalog(seed: Option<u64>) -> StrategyCatalog {
    let mut catalog = StrategyCatalog::new();
    for (offset, factory) in (0u64..).zip(registered_strategies()) {
        catalog.register(factory.registration(factory.name, seed.map(|s| s.wrapping_add(offset))));
    }
    catalog
}

fn make_random(player_id: &str, seed: Option<u64>) -> Box<dyn Strategy> {
    Box::new(RandomStrategy::new(player_id, seed))
}

fn make_calling_station(player_id: &str, _seed: Option<u64>) -> Box<dyn Strategy> {
    Box::new(CallingStation::new(player_id))
}

fn make_card_reader(player_id: &str, _seed: Option<u64>) -> Box<dyn Strategy> {
    Box::new(CardReader::new(player_id))
}
