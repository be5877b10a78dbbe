//! Shared Engine Handle
//!
//! `TreasuryEngine` methods take `&mut self`, so a single owner is serial
//! by construction. Hosts that serve multiple threads wrap the engine in
//! [`SharedTreasury`]: one mutex, one operation at a time, and every
//! acquired call runs to completion before the lock releases.

use std::sync::{Arc, Mutex};

use crate::engine::TreasuryEngine;

/// Cloneable, thread-safe handle to one treasury engine
#[derive(Clone)]
pub struct SharedTreasury {
    inner: Arc<Mutex<TreasuryEngine>>,
}

impl SharedTreasury {
    /// Wrap an engine for shared use
    pub fn new(engine: TreasuryEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Run one operation under the lock.
    ///
    /// Poisoning is recovered from: the engine mutates only after full
    /// validation, so the state left behind by a panicking caller is the
    /// state from before its operation.
    pub fn with<T>(&self, f: impl FnOnce(&mut TreasuryEngine) -> T) -> T {
        let mut guard = self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::{Capability, CapabilitySet};
    use crate::clock::FixedClock;
    use crate::config::TreasuryConfig;
    use lib_ledger::{scaled, AccountId, AssetId};
    use std::thread;

    #[test]
    fn test_concurrent_operations_conserve() {
        let root = AccountId::new([9u8; 32]);
        let mut capabilities = CapabilitySet::with_admin(root);
        capabilities.grant(Capability::Minter, root);
        let engine = TreasuryEngine::new(
            TreasuryConfig::for_testing(),
            capabilities,
            Box::new(FixedClock(1_700_000_000)),
        );
        let shared = SharedTreasury::new(engine);

        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let account = AccountId::new([i + 1; 32]);
                    for _ in 0..50 {
                        shared
                            .with(|engine| {
                                engine.mint(root, account, AssetId::Stablecoin, scaled(1))
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        shared.with(|engine| {
            assert_eq!(
                engine.ledger().supply_of(AssetId::Stablecoin).minted,
                scaled(400)
            );
            engine.verify_invariants().unwrap();
        });
    }

    #[test]
    fn test_clones_share_one_engine() {
        let root = AccountId::new([9u8; 32]);
        let mut capabilities = CapabilitySet::with_admin(root);
        capabilities.grant(Capability::Minter, root);
        let engine = TreasuryEngine::new(
            TreasuryConfig::for_testing(),
            capabilities,
            Box::new(FixedClock(1_700_000_000)),
        );
        let shared = SharedTreasury::new(engine);
        let clone = shared.clone();

        shared
            .with(|engine| engine.mint(root, root, AssetId::Stablecoin, scaled(7)))
            .unwrap();
        let seen = clone.with(|engine| engine.ledger().balance_of(root, AssetId::Stablecoin));
        assert_eq!(seen, scaled(7));
    }
}
