use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Hour of the day, `0..=23`.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, Hash, Serialize, Deserialize, PartialOrd)]
pub struct Hour(pub u8);

impl Hour {
    pub const LAST: Hour = Hour(23);

    /// Every hour from `from` to `to`, both ends included.
    pub fn span(from: Hour, to: Hour) -> impl Iterator<Item = Hour> {
        (from.0..=to.0).map(Hour)
    }

    pub(crate) fn is_within(&self, window: &(Hour, Hour)) -> bool {
        *self >= window.0 && *self <= window.1
    }
}

impl std::fmt::Display for Hour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl Add<u8> for Hour {
    type Output = Self;

    fn add(self, rhs: u8) -> Self::Output {
        Hour(self.0 + rhs)
    }
}
