use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Chips, PlayerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Call,
    Raise,
    Check,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Fold,
        ActionKind::Call,
        ActionKind::Raise,
        ActionKind::Check,
    ];

    fn carries_chips(self) -> bool {
        matches!(self, ActionKind::Call | ActionKind::Raise)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Fold => "fold",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
            ActionKind::Check => "check",
        };
        f.write_str(name)
    }
}

/// One betting decision.
///
/// `delta` is incremental: the chips this single action adds to the pot, not
/// the player's running total for the round. Folds and checks never carry
/// chips regardless of what the strategy asked for. The actor is stamped by
/// the engine when the action is recorded, so strategies can leave it empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    kind: ActionKind,
    actor: PlayerId,
    delta: Chips,
}

impl Action {
    pub fn new(kind: ActionKind, delta: Chips) -> Self {
        Self {
            kind,
            actor: PlayerId::new(),
            delta: if kind.carries_chips() { delta } else { 0 },
        }
    }

    pub fn fold() -> Self {
        Self::new(ActionKind::Fold, 0)
    }

    pub fn check() -> Self {
        Self::new(ActionKind::Check, 0)
    }

    pub fn call(delta: Chips) -> Self {
        Self::new(ActionKind::Call, delta)
    }

    pub fn raise(delta: Chips) -> Self {
        Self::new(ActionKind::Raise, delta)
    }

    pub(crate) fn by(mut self, actor: &str) -> Self {
        self.actor = actor.to_owned();
        self
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn delta(&self) -> Chips {
        self.delta
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ActionKind::Fold | ActionKind::Check => write!(f, "{} {}", self.actor, self.kind),
            _ => write!(f, "{} {} {}", self.actor, self.kind, self.delta),
        }
    }
}
