//! Strategy module - pluggable betting decisions.
//!
//! This module provides:
//! - The `Strategy` capability every participant implements
//! - Panic containment for strategy calls
//! - Registration, shadowing and instantiation of strategy sources
//! - Built-in strategies: RandomStrategy, CallingStation, CardReader

mod calling_station;
mod card_reader;
pub mod guard;
mod random;
pub mod registry;
mod roster;
mod trait_def;

pub use calling_station::CallingStation;
pub use card_reader::CardReader;
pub use random::RandomStrategy;
pub use registry::{
    builtin_catalog, by_name, registered_strategies, Registration, StrategyCatalog,
    StrategyFactory,
};
pub use roster::Roster;
pub use trait_def::{Strategy, StrategyError};
