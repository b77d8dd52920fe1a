//! Coin rewards for placed pieces
//!
//! Lives outside the engine and only reads its events.

use crate::game::GameEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewards {
    locks_per_coin: u64,
    coins: u64,
}

impl Rewards {
    /// `locks_per_coin == 0` disables rewards
    pub fn new(locks_per_coin: u64) -> Self {
        Self {
            locks_per_coin,
            coins: 0,
        }
    }

    /// Feed one event. Returns the coins granted by it.
    pub fn observe(&mut self, event: &GameEvent) -> u64 {
        match event {
            GameEvent::PieceLocked { lock_count }
                if self.locks_per_coin > 0 && lock_count % self.locks_per_coin == 0 =>
            {
                self.coins += 1;
                tracing::debug!(lock_count, coins = self.coins, "coin granted");
                1
            }
            _ => 0,
        }
    }

    pub fn observe_all<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) -> u64 {
        events.into_iter().map(|event| self.observe(event)).sum()
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }
}
