use uuid::Uuid;

use crate::models::SwipeAction;

/// Unordered pair of users, stored smallest id first so that one pair has
/// exactly one representation in the `matches` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchPair {
    first: Uuid,
    second: Uuid,
}

impl MatchPair {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> Uuid {
        self.first
    }

    pub fn second(&self) -> Uuid {
        self.second
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.first == id || self.second == id
    }

    /// The member of the pair that is not `id`
    pub fn other(&self, id: Uuid) -> Uuid {
        if self.first == id {
            self.second
        } else {
            self.first
        }
    }
}

/// What the requester wants to do to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeIntent {
    Like,
    Report,
}

impl SwipeIntent {
    pub fn action(&self) -> SwipeAction {
        match self {
            SwipeIntent::Like => SwipeAction::Like,
            SwipeIntent::Report => SwipeAction::Dislike,
        }
    }

    pub fn self_target_message(&self) -> &'static str {
        match self {
            SwipeIntent::Like => "Cannot like yourself",
            SwipeIntent::Report => "Cannot report yourself",
        }
    }
}

/// Reject swipes whose target key names the requester.
///
/// Checked on the raw keys before any lookup, and again on resolved ids
/// since the target may be given by id instead of wallet.
pub fn ensure_not_self(intent: SwipeIntent, from: &str, to: &str) -> Result<(), &'static str> {
    if from == to {
        Err(intent.self_target_message())
    } else {
        Ok(())
    }
}
