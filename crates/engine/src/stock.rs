//! Stock counters and the allocation state machine.
//!
//! Every unit of a decor item is in exactly one of three states: in store,
//! hired out or damaged. An [`AllocationAction`] moves a single unit from one
//! state to another, so the item's total stock never changes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// One of the three mutually exclusive stock states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StockCounter {
    InStore,
    Hired,
    Damaged,
}

impl StockCounter {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InStore => "in_store",
            Self::Hired => "hired",
            Self::Damaged => "damaged",
        }
    }
}

/// A single-unit transition between two stock counters.
///
/// | action  | from      | to        |
/// |---------|-----------|-----------|
/// | hire    | in_store  | hired     |
/// | return  | hired     | in_store  |
/// | damage  | in_store  | damaged   |
/// | repair  | damaged   | in_store  |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationAction {
    Hire,
    Return,
    Damage,
    Repair,
}

impl AllocationAction {
    pub const ALL: [AllocationAction; 4] = [Self::Hire, Self::Return, Self::Damage, Self::Repair];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hire => "hire",
            Self::Return => "return",
            Self::Damage => "damage",
            Self::Repair => "repair",
        }
    }

    /// Counter the unit is taken from.
    #[must_use]
    pub const fn source(self) -> StockCounter {
        match self {
            Self::Hire | Self::Damage => StockCounter::InStore,
            Self::Return => StockCounter::Hired,
            Self::Repair => StockCounter::Damaged,
        }
    }

    /// Counter the unit is moved to.
    #[must_use]
    pub const fn target(self) -> StockCounter {
        match self {
            Self::Hire => StockCounter::Hired,
            Self::Return | Self::Repair => StockCounter::InStore,
            Self::Damage => StockCounter::Damaged,
        }
    }

    /// User-facing reason shown when the source counter is empty.
    #[must_use]
    pub const fn unavailable_message(self) -> &'static str {
        match self {
            Self::Hire => "No items available to hire",
            Self::Return => "No items to return",
            Self::Damage => "No items available to mark as damaged",
            Self::Repair => "No items to repair",
        }
    }
}

impl fmt::Display for AllocationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationAction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hire" => Ok(Self::Hire),
            "return" => Ok(Self::Return),
            "damage" => Ok(Self::Damage),
            "repair" => Ok(Self::Repair),
            other => Err(EngineError::InvalidInput(format!(
                "unknown action: {other}"
            ))),
        }
    }
}

/// Snapshot of an item's three counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCounts {
    pub in_store: i32,
    pub hired: i32,
    pub damaged: i32,
}

impl StockCounts {
    #[must_use]
    pub const fn new(in_store: i32, hired: i32, damaged: i32) -> Self {
        Self {
            in_store,
            hired,
            damaged,
        }
    }

    /// Total stock owned, whatever state the units are in.
    #[must_use]
    pub fn total(self) -> i64 {
        i64::from(self.in_store) + i64::from(self.hired) + i64::from(self.damaged)
    }

    #[must_use]
    pub const fn get(self, counter: StockCounter) -> i32 {
        match counter {
            StockCounter::InStore => self.in_store,
            StockCounter::Hired => self.hired,
            StockCounter::Damaged => self.damaged,
        }
    }

    fn get_mut(&mut self, counter: StockCounter) -> &mut i32 {
        match counter {
            StockCounter::InStore => &mut self.in_store,
            StockCounter::Hired => &mut self.hired,
            StockCounter::Damaged => &mut self.damaged,
        }
    }

    /// Rejects negative counters.
    pub fn validate(self) -> ResultEngine<()> {
        for counter in [StockCounter::InStore, StockCounter::Hired, StockCounter::Damaged] {
            if self.get(counter) < 0 {
                return Err(EngineError::InvalidInput(format!(
                    "{} must not be negative",
                    counter.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Applies `action`, returning the new counters.
    ///
    /// Fails with [`EngineError::PreconditionFailed`] when the source counter
    /// is empty; `self` is never modified.
    pub fn apply(self, action: AllocationAction) -> ResultEngine<Self> {
        if self.get(action.source()) <= 0 {
            return Err(EngineError::PreconditionFailed(
                action.unavailable_message().to_string(),
            ));
        }
        let mut next = self;
        *next.get_mut(action.source()) -= 1;
        *next.get_mut(action.target()) += 1;
        Ok(next)
    }
}
