//! Balance Ledger
//!
//! A single map from `(account, asset)` to balance, plus per-asset issuance
//! counters. Every mutation validates fully before touching state, so a
//! returned error always means the ledger is exactly as it was.
//!
//! Conservation contract: for every asset, the sum of all balances equals
//! `minted - burned`. [`BalanceLedger::check_conservation`] recomputes this
//! from scratch for one asset, [`BalanceLedger::check_conservation_all`]
//! for every asset the ledger has seen.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::asset::AssetId;
use crate::errors::{LedgerError, LedgerResult};
use crate::primitives::{AccountId, Amount};

/// Lifetime issuance counters for one asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSupply {
    /// Total units ever minted
    pub minted: Amount,
    /// Total units ever burned
    pub burned: Amount,
}

impl AssetSupply {
    /// Units currently in circulation
    pub fn circulating(&self) -> Amount {
        self.minted.saturating_sub(self.burned)
    }
}

/// Multi-asset account balance ledger with supply tracking
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BalanceLedger {
    balances: HashMap<(AccountId, AssetId), Amount>,
    supply: HashMap<AssetId, AssetSupply>,
}

impl BalanceLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of an account in one asset (zero if never touched)
    pub fn balance_of(&self, account: AccountId, asset: AssetId) -> Amount {
        self.balances.get(&(account, asset)).copied().unwrap_or(0)
    }

    /// Issuance counters for one asset (zero if never minted)
    pub fn supply_of(&self, asset: AssetId) -> AssetSupply {
        self.supply.get(&asset).copied().unwrap_or_default()
    }

    /// Units of one asset currently in circulation
    pub fn circulating(&self, asset: AssetId) -> Amount {
        self.supply_of(asset).circulating()
    }

    /// Sum of all account balances in one asset
    pub fn total_held(&self, asset: AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((_, a), _)| *a == asset)
            .fold(0, |acc: Amount, (_, amount)| acc.saturating_add(*amount))
    }

    /// Create new units of an asset in an account.
    ///
    /// # Rules
    ///
    /// - `amount` must be positive
    /// - Both the account balance and the minted counter are updated with
    ///   checked arithmetic; on overflow nothing changes
    pub fn mint(&mut self, account: AccountId, asset: AssetId, amount: Amount) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let new_balance = self
            .balance_of(account, asset)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let mut supply = self.supply_of(asset);
        supply.minted = supply.minted.checked_add(amount).ok_or(LedgerError::Overflow)?;

        self.balances.insert((account, asset), new_balance);
        self.supply.insert(asset, supply);
        Ok(())
    }

    /// Destroy units of an asset held by an account.
    ///
    /// # Rules
    ///
    /// - `amount` must be positive
    /// - The account must hold at least `amount`
    pub fn burn(&mut self, account: AccountId, asset: AssetId, amount: Amount) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }

        let have = self.balance_of(account, asset);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        let mut supply = self.supply_of(asset);
        supply.burned = supply.burned.checked_add(amount).ok_or(LedgerError::Overflow)?;

        self.balances.insert((account, asset), have - amount);
        self.supply.insert(asset, supply);
        Ok(())
    }

    /// Validate a transfer without applying it.
    ///
    /// Multi-leg operations call this for every leg first, then apply the
    /// legs; each apply is then infallible, which keeps the whole operation
    /// atomic.
    pub fn check_transfer(
        &self,
        from: AccountId,
        to: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> LedgerResult<()> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let have = self.balance_of(from, asset);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if from != to {
            self.balance_of(to, asset)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?;
        }
        Ok(())
    }

    /// Move units of one asset between accounts.
    ///
    /// # Rules
    ///
    /// - `amount` must be positive
    /// - The sender must hold at least `amount`
    /// - A self-transfer validates like any other and then changes nothing
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> LedgerResult<()> {
        self.check_transfer(from, to, asset, amount)?;
        if from == to {
            return Ok(());
        }

        let new_from = self.balance_of(from, asset) - amount;
        let new_to = self.balance_of(to, asset) + amount;
        self.balances.insert((from, asset), new_from);
        self.balances.insert((to, asset), new_to);
        Ok(())
    }

    /// Recompute conservation for one asset from scratch: the sum of every
    /// balance must equal `minted - burned`, and burns can never exceed
    /// mints.
    pub fn check_conservation(&self, asset: AssetId) -> LedgerResult<()> {
        let mut total: Amount = 0;
        for ((_, a), amount) in &self.balances {
            if *a == asset {
                total = total.checked_add(*amount).ok_or(LedgerError::Overflow)?;
            }
        }

        let supply = self.supply_of(asset);
        if supply.burned > supply.minted {
            return Err(LedgerError::ConservationViolated(format!(
                "asset {}: burned {} exceeds minted {}",
                asset, supply.burned, supply.minted
            )));
        }
        let circulating = supply.minted - supply.burned;
        if total != circulating {
            return Err(LedgerError::ConservationViolated(format!(
                "asset {}: held {} != minted {} - burned {}",
                asset, total, supply.minted, supply.burned
            )));
        }
        Ok(())
    }

    /// Conservation sweep over every asset that appears in a balance or a
    /// supply record
    pub fn check_conservation_all(&self) -> LedgerResult<()> {
        let assets: HashSet<AssetId> = self
            .balances
            .keys()
            .map(|(_, asset)| *asset)
            .chain(self.supply.keys().copied())
            .collect();
        for asset in assets {
            self.check_conservation(asset)?;
        }
        Ok(())
    }
}
