use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::domain::{DomainError, PlayerId};

/// An unordered group of three distinct strategies, stored sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Trio([PlayerId; 3]);

impl Trio {
    pub fn new(
        a: impl Into<PlayerId>,
        b: impl Into<PlayerId>,
        c: impl Into<PlayerId>,
    ) -> Result<Self, DomainError> {
        let mut members = [a.into(), b.into(), c.into()];
        members.sort();
        if members[0] == members[1] {
            return Err(DomainError::DuplicatePlayer(members[0].clone()));
        }
        if members[1] == members[2] {
            return Err(DomainError::DuplicatePlayer(members[1].clone()));
        }
        Ok(Self(members))
    }

    pub fn members(&self) -> &[PlayerId; 3] {
        &self.0
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.0.iter().any(|p| p == player_id)
    }
}

impl fmt::Display for Trio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0[0], self.0[1], self.0[2])
    }
}

impl FromStr for Trio {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        match parts.as_slice() {
            [a, b, c] => Trio::new(*a, *b, *c),
            _ => Err(DomainError::InvalidConfig(format!(
                "expected three comma-separated ids, got {s:?}"
            ))),
        }
    }
}

impl Serialize for Trio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Every 3-combination of `ids`, in lexicographic order.
///
/// Duplicate ids are collapsed first.
pub fn trios(ids: &[PlayerId]) -> Vec<Trio> {
    let mut ids = ids.to_vec();
    ids.sort();
    ids.dedup();

    let mut out = Vec::new();
    for i in 0..ids.len() {
        for j in i + 1..ids.len() {
            for k in j + 1..ids.len() {
                out.push(Trio([ids[i].clone(), ids[j].clone(), ids[k].clone()]));
            }
        }
    }
    out
}
