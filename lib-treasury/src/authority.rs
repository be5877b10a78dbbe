//! Capabilities
//!
//! Privileged operations check the caller against a capability set the host
//! constructs at startup and administers at runtime. Nothing here reads
//! ambient identity; the caller account is always passed in.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use lib_ledger::AccountId;

/// Capability enumeration for authority checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Administrative operations (configuration, series terms, pools, grants)
    Admin,
    /// Direct mint and burn of ledger assets
    Minter,
}

/// Capability set: maps capabilities to sets of authorized accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    grants: HashMap<Capability, HashSet<AccountId>>,
}

impl CapabilitySet {
    /// Create an empty capability set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set with one root administrator. The root can grant itself
    /// or others further capabilities through the engine.
    pub fn with_admin(root: AccountId) -> Self {
        let mut set = Self::default();
        set.grant(Capability::Admin, root);
        set
    }

    /// Grant a capability to an account
    pub fn grant(&mut self, capability: Capability, account: AccountId) {
        self.grants.entry(capability).or_default().insert(account);
    }

    /// Revoke a capability from an account
    pub fn revoke(&mut self, capability: Capability, account: &AccountId) {
        if let Some(set) = self.grants.get_mut(&capability) {
            set.remove(account);
        }
    }

    /// Check if an account holds a capability
    pub fn has(&self, capability: Capability, account: &AccountId) -> bool {
        self.grants
            .get(&capability)
            .map(|set| set.contains(account))
            .unwrap_or(false)
    }

    /// Get all accounts holding a capability
    pub fn accounts(&self, capability: Capability) -> impl Iterator<Item = &AccountId> {
        self.grants
            .get(&capability)
            .map(|set| set.iter())
            .into_iter()
            .flatten()
    }
}
