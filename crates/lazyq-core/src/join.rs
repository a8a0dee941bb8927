use serde::{Deserialize, Serialize};

/// Which unmatched elements a join or zip keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinType {
    /// Unmatched left elements survive.
    pub fn is_left(self) -> bool {
        matches!(self, JoinType::Left | JoinType::Outer)
    }

    /// Unmatched right elements survive.
    pub fn is_right(self) -> bool {
        matches!(self, JoinType::Right | JoinType::Outer)
    }
}
