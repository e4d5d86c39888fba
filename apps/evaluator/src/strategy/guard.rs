//! Panic containment around strategy calls.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use super::trait_def::{Strategy, StrategyError};
use crate::domain::{Action, RoundState};

pub fn decide(strategy: &mut dyn Strategy, view: &RoundState) -> Result<Action, StrategyError> {
    catch_unwind(AssertUnwindSafe(|| strategy.decide(view)))
        .unwrap_or_else(|payload| Err(panicked(payload.as_ref())))
}

pub fn reveal(strategy: &mut dyn Strategy, state: &RoundState) -> Result<(), StrategyError> {
    catch_unwind(AssertUnwindSafe(|| strategy.reveal(state)))
        .unwrap_or_else(|payload| Err(panicked(payload.as_ref())))
}

/// Runs a strategy constructor, turning a panic into a load error.
pub fn construct<F>(make: F) -> Result<Box<dyn Strategy>, StrategyError>
where
    F: FnOnce() -> Result<Box<dyn Strategy>, StrategyError>,
{
    catch_unwind(AssertUnwindSafe(make)).unwrap_or_else(|payload| {
        Err(StrategyError::Load(format!(
            "constructor panicked: {}",
            panic_message(payload.as_ref())
        )))
    })
}

fn panicked(payload: &(dyn Any + Send)) -> StrategyError {
    StrategyError::Internal(format!("panicked: {}", panic_message(payload)))
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
