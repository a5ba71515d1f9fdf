//! Gold balance bookkeeping.

use thiserror::Error;

/// Error returned when a cost exceeds the available balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("balance of {balance} gold cannot cover a cost of {cost}")]
pub(crate) struct InsufficientGold {
    pub(crate) balance: u32,
    pub(crate) cost: u32,
}

/// Single gold balance that can never drop below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    balance: u32,
}

impl Economy {
    pub(crate) const fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub(crate) const fn balance(&self) -> u32 {
        self.balance
    }

    pub(crate) const fn can_afford(&self, cost: u32) -> bool {
        self.balance >= cost
    }

    /// Deducts the cost, leaving the balance untouched when it cannot be covered.
    pub(crate) fn spend(&mut self, cost: u32) -> Result<(), InsufficientGold> {
        if !self.can_afford(cost) {
            return Err(InsufficientGold {
                balance: self.balance,
                cost,
            });
        }
        self.balance -= cost;
        Ok(())
    }

    pub(crate) fn earn(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}
