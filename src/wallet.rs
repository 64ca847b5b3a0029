//! Balance collaborator
//!
//! The simulation never keeps a running balance of its own. Every debit
//! (ball spawn) and credit (payout) is a single call on a `Wallet`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalletError {
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: f64, requested: f64 },
}

/// External balance service
///
/// Implementations must apply `debit` and `credit` atomically.
pub trait Wallet {
    fn balance(&self) -> f64;
    fn debit(&mut self, amount: f64) -> Result<(), WalletError>;
    fn credit(&mut self, amount: f64);
}

/// In-process wallet for headless runs and tests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryWallet {
    balance: f64,
}

impl MemoryWallet {
    pub fn new(balance: f64) -> Self {
        Self { balance }
    }
}

impl Wallet for MemoryWallet {
    fn balance(&self) -> f64 {
        self.balance
    }

    fn debit(&mut self, amount: f64) -> Result<(), WalletError> {
        if amount > self.balance {
            return Err(WalletError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }
}
