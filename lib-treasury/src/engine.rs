//! Treasury Engine
//!
//! The single entry point hosts drive. One engine value owns the ledger,
//! the bond registry, the liquidity pools, and the configuration; every
//! mutating operation takes `&mut self`, so operations are serial by
//! construction. Each method validates completely before its first
//! mutation and returns a receipt describing what settled.
//!
//! Pool reserves are ordinary ledger balances: every pool owns a derived
//! account that holds exactly its reserves, so the conservation law covers
//! pooled tokens the same as everything else.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use lib_ledger::{AccountId, Amount, AssetId, BalanceLedger, SCALE};
use lib_market::{
    apply_swap, required_stable_for_bond, shares_for_deposit, swap_output,
    withdrawal_for_shares, Pool, PoolId, SwapDirection,
};

use crate::authority::{Capability, CapabilitySet};
use crate::clock::{Clock, SystemClock};
use crate::config::TreasuryConfig;
use crate::custody::{self, TransferReceipt};
use crate::errors::{TreasuryError, TreasuryResult};
use crate::orders::{self, OrderReceipt};
use crate::registry::{BondRegistry, LotProperties, SeriesProperties};

// ===== RECEIPTS =====

/// Outcome of a liquidity deposit or withdrawal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityReceipt {
    /// Pool the operation settled against
    pub pool: PoolId,
    /// Bond tokens moved
    pub bond_amount: Amount,
    /// Stablecoin moved
    pub stable_amount: Amount,
    /// Shares minted (deposit) or burned (withdrawal)
    pub shares: Amount,
}

/// Outcome of a swap settled against a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    /// Pool the swap settled against
    pub pool: PoolId,
    /// Direction the swap was taken in
    pub direction: SwapDirection,
    /// Asset sold into the pool
    pub asset_in: AssetId,
    /// Asset bought out of the pool
    pub asset_out: AssetId,
    /// Input amount, fee included
    pub amount_in: Amount,
    /// Output credited to the caller
    pub amount_out: Amount,
    /// Fee portion of the input, kept by the reserves
    pub fee_paid: Amount,
}

/// Outcome of a native-currency deposit conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReceipt {
    /// Native units converted
    pub native_amount: Amount,
    /// Stablecoin minted to the depositor
    pub stablecoin_amount: Amount,
    /// Exchange rate the conversion settled at
    pub rate: Amount,
}

// ===== ENGINE =====

/// Tokenized bond treasury: ledger, registry, pools, and configuration
/// behind one serial interface
pub struct TreasuryEngine {
    ledger: BalanceLedger,
    registry: BondRegistry,
    pools: HashMap<PoolId, Pool>,
    next_pool_id: PoolId,
    config: TreasuryConfig,
    capabilities: CapabilitySet,
    clock: Box<dyn Clock>,
}

impl TreasuryEngine {
    /// Create an engine with an empty ledger and registry
    pub fn new(config: TreasuryConfig, capabilities: CapabilitySet, clock: Box<dyn Clock>) -> Self {
        tracing::info!("Treasury engine initialized");
        Self {
            ledger: BalanceLedger::new(),
            registry: BondRegistry::new(),
            pools: HashMap::new(),
            next_pool_id: 1,
            config,
            capabilities,
            clock,
        }
    }

    /// Create an engine timestamping against the wall clock
    pub fn with_system_clock(config: TreasuryConfig, capabilities: CapabilitySet) -> Self {
        Self::new(config, capabilities, Box::new(SystemClock))
    }

    /// Ledger account that holds a pool's reserves. Derived from the pool
    /// id, so reserves are plain balances covered by conservation.
    pub fn pool_account(pool: PoolId) -> AccountId {
        let mut bytes = [0u8; 32];
        bytes[..4].copy_from_slice(b"pool");
        bytes[4..8].copy_from_slice(&pool.to_le_bytes());
        AccountId::new(bytes)
    }

    fn require(&self, capability: Capability, account: AccountId) -> TreasuryResult<()> {
        if self.capabilities.has(capability, &account) {
            Ok(())
        } else {
            Err(TreasuryError::Unauthorized {
                account,
                capability,
            })
        }
    }

    // ===== CAPABILITY ADMINISTRATION =====

    /// Grant a capability to an account. Admin-only.
    pub fn grant_capability(
        &mut self,
        caller: AccountId,
        capability: Capability,
        account: AccountId,
    ) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.capabilities.grant(capability, account);
        tracing::info!("Granted {:?} to {:?}", capability, account);
        Ok(())
    }

    /// Revoke a capability from an account. Admin-only.
    pub fn revoke_capability(
        &mut self,
        caller: AccountId,
        capability: Capability,
        account: AccountId,
    ) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.capabilities.revoke(capability, &account);
        tracing::info!("Revoked {:?} from {:?}", capability, account);
        Ok(())
    }

    // ===== CONFIGURATION =====

    /// Point custody fees at a new account. Admin-only.
    pub fn set_custody_account(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.config.custody = account;
        tracing::info!("Custody account set to {:?}", account);
        Ok(())
    }

    /// Point income-tax withholding at a new account. Admin-only.
    pub fn set_income_tax_account(
        &mut self,
        caller: AccountId,
        account: AccountId,
    ) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.config.income_tax = account;
        tracing::info!("Income tax account set to {:?}", account);
        Ok(())
    }

    /// Point IOF withholding at a new account. Admin-only.
    pub fn set_iof_account(&mut self, caller: AccountId, account: AccountId) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.config.iof = account;
        tracing::info!("IOF account set to {:?}", account);
        Ok(())
    }

    /// Set the custody fee rate in parts per [`SCALE`]. Admin-only; not
    /// capped.
    pub fn set_custody_fee_rate(&mut self, caller: AccountId, rate: Amount) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.config.custody_fee_rate = rate;
        tracing::info!("Custody fee rate set to {}", rate);
        Ok(())
    }

    /// Set the native exchange rate, stablecoin per native unit, scaled.
    /// Admin-only; zero disables native conversion.
    pub fn set_exchange_rate(&mut self, caller: AccountId, rate: Amount) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.config.exchange_rate = rate;
        tracing::info!("Exchange rate set to {}", rate);
        Ok(())
    }

    // ===== SERIES AND LOTS =====

    /// Register a series or correct its terms. Admin-only; terms freeze
    /// once the series has issued a lot.
    pub fn set_series_properties(
        &mut self,
        caller: AccountId,
        series_code: u64,
        properties: SeriesProperties,
    ) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.registry.set_series(series_code, properties)?;
        tracing::info!("Series {} terms set", series_code);
        Ok(())
    }

    /// Terms of a series
    pub fn get_series_properties(&self, series_code: u64) -> TreasuryResult<SeriesProperties> {
        self.registry.series(series_code)
    }

    /// Write a lot's recorded terms. Admin-only bookkeeping override;
    /// orders record lots themselves.
    pub fn set_lot_properties(
        &mut self,
        caller: AccountId,
        lot: AssetId,
        properties: LotProperties,
    ) -> TreasuryResult<()> {
        self.require(Capability::Admin, caller)?;
        self.registry.set_lot(lot, properties)?;
        tracing::info!("Lot {} terms set", lot);
        Ok(())
    }

    /// Recorded terms of a lot
    pub fn get_lot_properties(&self, lot: AssetId) -> TreasuryResult<LotProperties> {
        self.registry.lot(lot)
    }

    // ===== SUPPLY =====

    /// Mint units of an asset to an account. Minter-only. Pool shares are
    /// reserved for liquidity operations.
    pub fn mint(
        &mut self,
        caller: AccountId,
        account: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> TreasuryResult<()> {
        self.require(Capability::Minter, caller)?;
        if matches!(asset, AssetId::PoolShare { .. }) {
            return Err(TreasuryError::InvalidParameter(
                "pool shares move only through liquidity operations".to_string(),
            ));
        }
        self.ledger.mint(account, asset, amount)?;
        tracing::info!("Minted {} of {} to {:?}", amount, asset, account);
        Ok(())
    }

    /// Burn units of an asset held by an account. Minter-only. Pool shares
    /// are reserved for liquidity operations.
    pub fn burn(
        &mut self,
        caller: AccountId,
        account: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> TreasuryResult<()> {
        self.require(Capability::Minter, caller)?;
        if matches!(asset, AssetId::PoolShare { .. }) {
            return Err(TreasuryError::InvalidParameter(
                "pool shares move only through liquidity operations".to_string(),
            ));
        }
        self.ledger.burn(account, asset, amount)?;
        tracing::info!("Burned {} of {} from {:?}", amount, asset, account);
        Ok(())
    }

    // ===== TRANSFERS =====

    /// Transfer an asset between accounts, charging the custody fee on bond
    /// tokens. No capability needed; holders move their own funds.
    pub fn transfer_with_custody(
        &mut self,
        from: AccountId,
        to: AccountId,
        asset: AssetId,
        amount: Amount,
    ) -> TreasuryResult<TransferReceipt> {
        let receipt =
            custody::apply_custody_transfer(&mut self.ledger, &self.config, from, to, asset, amount)?;
        tracing::info!(
            "Transferred {} of {} from {:?} to {:?}, custody fee {}",
            amount,
            asset,
            from,
            to,
            receipt.custody_fee
        );
        Ok(receipt)
    }

    // ===== ORDERS =====

    /// Buy into a bond series with stablecoin. Mints a fresh lot to the
    /// buyer; payment goes to the treasury account.
    pub fn order_by_stablecoin(
        &mut self,
        buyer: AccountId,
        series_code: u64,
        stablecoin_amount: Amount,
    ) -> TreasuryResult<OrderReceipt> {
        let now = self.clock.now();
        let receipt = orders::apply_stablecoin_order(
            &mut self.ledger,
            &mut self.registry,
            &self.config,
            buyer,
            series_code,
            stablecoin_amount,
            now,
        )?;
        tracing::info!(
            "Settled order for {:?}: lot {}, quantity {}, paid {}",
            buyer,
            receipt.lot,
            receipt.quantity,
            receipt.price_paid
        );
        Ok(receipt)
    }

    /// Buy into a bond series with native currency, converting at the
    /// configured exchange rate. The native leg settles outside the ledger.
    pub fn order_by_native(
        &mut self,
        buyer: AccountId,
        series_code: u64,
        native_amount: Amount,
    ) -> TreasuryResult<OrderReceipt> {
        let now = self.clock.now();
        let receipt = orders::apply_native_order(
            &mut self.ledger,
            &mut self.registry,
            &self.config,
            buyer,
            series_code,
            native_amount,
            now,
        )?;
        tracing::info!(
            "Settled native order for {:?}: lot {}, quantity {}, converted {}",
            buyer,
            receipt.lot,
            receipt.quantity,
            receipt.price_paid
        );
        Ok(receipt)
    }

    // ===== CONVERSION =====

    /// Convert a native-currency deposit into stablecoin at the configured
    /// rate and mint it to the depositor. The native leg settles outside
    /// the ledger.
    pub fn convert_native_deposit(
        &mut self,
        depositor: AccountId,
        native_amount: Amount,
    ) -> TreasuryResult<ConversionReceipt> {
        if native_amount == 0 {
            return Err(TreasuryError::InvalidParameter(
                "amount must be positive".to_string(),
            ));
        }
        let rate = self.config.exchange_rate;
        if rate == 0 {
            return Err(TreasuryError::InvalidParameter(
                "exchange rate not configured".to_string(),
            ));
        }
        let stablecoin_amount = native_amount
            .checked_mul(rate)
            .ok_or(TreasuryError::Overflow)?
            / SCALE;
        if stablecoin_amount == 0 {
            return Err(TreasuryError::InvalidParameter(
                "conversion yields no stablecoin".to_string(),
            ));
        }

        self.ledger
            .mint(depositor, AssetId::Stablecoin, stablecoin_amount)?;
        tracing::info!(
            "Converted {} native to {} stablecoin for {:?}",
            native_amount,
            stablecoin_amount,
            depositor
        );
        Ok(ConversionReceipt {
            native_amount,
            stablecoin_amount,
            rate,
        })
    }

    // ===== POOLS =====

    /// Open a pool pairing a bond token with the stablecoin. Admin-only.
    /// Ids are assigned sequentially starting at 1.
    pub fn create_pool(
        &mut self,
        caller: AccountId,
        bond_asset: AssetId,
        reference_price: Amount,
        fee_rate: Amount,
    ) -> TreasuryResult<PoolId> {
        self.require(Capability::Admin, caller)?;
        if !bond_asset.is_bond_token() {
            return Err(TreasuryError::InvalidParameter(format!(
                "{bond_asset} is not a bond token"
            )));
        }
        if reference_price == 0 {
            return Err(TreasuryError::InvalidParameter(
                "reference price must be positive".to_string(),
            ));
        }
        if fee_rate >= SCALE {
            return Err(TreasuryError::InvalidParameter(format!(
                "fee rate {fee_rate} must be below {SCALE}"
            )));
        }

        let pool_id = self.next_pool_id;
        let next = pool_id.checked_add(1).ok_or(TreasuryError::Overflow)?;
        self.pools
            .insert(pool_id, Pool::new(bond_asset, reference_price, fee_rate));
        self.next_pool_id = next;
        tracing::info!("Created pool {} for {}", pool_id, bond_asset);
        Ok(pool_id)
    }

    /// State of a pool
    pub fn get_pool(&self, pool_id: PoolId) -> TreasuryResult<&Pool> {
        self.pools
            .get(&pool_id)
            .ok_or_else(|| TreasuryError::NotFound(format!("pool {pool_id}")))
    }

    /// Deposit liquidity. The stablecoin leg is derived from the bond
    /// amount at the pool's current ratio (reference price while empty);
    /// shares are minted to the provider.
    pub fn add_liquidity(
        &mut self,
        provider: AccountId,
        pool_id: PoolId,
        bond_amount: Amount,
    ) -> TreasuryResult<LiquidityReceipt> {
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or_else(|| TreasuryError::NotFound(format!("pool {pool_id}")))?;
        let bond_asset = pool.bond_asset;
        let holder = Self::pool_account(pool_id);
        let share_asset = AssetId::pool_share(pool_id);

        let stable_amount = required_stable_for_bond(pool, bond_amount)?;
        let shares = shares_for_deposit(pool, bond_amount)?;
        if shares == 0 {
            return Err(TreasuryError::InvalidParameter(
                "deposit too small to mint a share".to_string(),
            ));
        }
        let new_reserve_bond = pool
            .reserve_bond
            .checked_add(bond_amount)
            .ok_or(TreasuryError::Overflow)?;
        let new_reserve_stable = pool
            .reserve_stable
            .checked_add(stable_amount)
            .ok_or(TreasuryError::Overflow)?;
        let new_total_shares = pool
            .total_shares
            .checked_add(shares)
            .ok_or(TreasuryError::Overflow)?;

        self.ledger
            .check_transfer(provider, holder, bond_asset, bond_amount)?;
        if stable_amount > 0 {
            self.ledger
                .check_transfer(provider, holder, AssetId::Stablecoin, stable_amount)?;
        }
        self.ledger
            .balance_of(provider, share_asset)
            .checked_add(shares)
            .ok_or(TreasuryError::Overflow)?;
        self.ledger
            .supply_of(share_asset)
            .minted
            .checked_add(shares)
            .ok_or(TreasuryError::Overflow)?;

        self.ledger
            .transfer(provider, holder, bond_asset, bond_amount)?;
        if stable_amount > 0 {
            self.ledger
                .transfer(provider, holder, AssetId::Stablecoin, stable_amount)?;
        }
        self.ledger.mint(provider, share_asset, shares)?;
        pool.reserve_bond = new_reserve_bond;
        pool.reserve_stable = new_reserve_stable;
        pool.total_shares = new_total_shares;

        tracing::info!(
            "Liquidity added to pool {}: {} bond, {} stable, {} shares to {:?}",
            pool_id,
            bond_amount,
            stable_amount,
            shares,
            provider
        );
        Ok(LiquidityReceipt {
            pool: pool_id,
            bond_amount,
            stable_amount,
            shares,
        })
    }

    /// Withdraw liquidity. Burns the provider's shares and pays out the
    /// proportional slice of both reserves, truncating.
    pub fn remove_liquidity(
        &mut self,
        provider: AccountId,
        pool_id: PoolId,
        shares: Amount,
    ) -> TreasuryResult<LiquidityReceipt> {
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or_else(|| TreasuryError::NotFound(format!("pool {pool_id}")))?;
        let bond_asset = pool.bond_asset;
        let holder = Self::pool_account(pool_id);
        let share_asset = AssetId::pool_share(pool_id);

        let (bond_out, stable_out) = withdrawal_for_shares(pool, shares)?;
        let have = self.ledger.balance_of(provider, share_asset);
        if have < shares {
            return Err(TreasuryError::InsufficientBalance { have, need: shares });
        }
        if bond_out > 0 {
            self.ledger
                .check_transfer(holder, provider, bond_asset, bond_out)?;
        }
        if stable_out > 0 {
            self.ledger
                .check_transfer(holder, provider, AssetId::Stablecoin, stable_out)?;
        }

        // Payouts are floors of proportional slices, so the reserve
        // subtractions cannot underflow.
        self.ledger.burn(provider, share_asset, shares)?;
        if bond_out > 0 {
            self.ledger
                .transfer(holder, provider, bond_asset, bond_out)?;
        }
        if stable_out > 0 {
            self.ledger
                .transfer(holder, provider, AssetId::Stablecoin, stable_out)?;
        }
        pool.reserve_bond -= bond_out;
        pool.reserve_stable -= stable_out;
        pool.total_shares -= shares;

        tracing::info!(
            "Liquidity removed from pool {}: {} shares for {} bond, {} stable to {:?}",
            pool_id,
            shares,
            bond_out,
            stable_out,
            provider
        );
        Ok(LiquidityReceipt {
            pool: pool_id,
            bond_amount: bond_out,
            stable_amount: stable_out,
            shares,
        })
    }

    /// Swap against a pool with slippage protection. The ledger legs and
    /// the reserve update settle together after every check passes.
    pub fn swap(
        &mut self,
        caller: AccountId,
        pool_id: PoolId,
        direction: SwapDirection,
        amount_in: Amount,
        min_out: Amount,
    ) -> TreasuryResult<SwapReceipt> {
        let pool = self
            .pools
            .get_mut(&pool_id)
            .ok_or_else(|| TreasuryError::NotFound(format!("pool {pool_id}")))?;
        let bond_asset = pool.bond_asset;
        let holder = Self::pool_account(pool_id);
        let (asset_in, asset_out, reserve_in, reserve_out) = match direction {
            SwapDirection::BondToStable => (
                bond_asset,
                AssetId::Stablecoin,
                pool.reserve_bond,
                pool.reserve_stable,
            ),
            SwapDirection::StableToBond => (
                AssetId::Stablecoin,
                bond_asset,
                pool.reserve_stable,
                pool.reserve_bond,
            ),
        };

        // Project the outcome and validate both ledger legs against it
        // before the pool commits.
        let amount_out = swap_output(reserve_in, reserve_out, amount_in, pool.fee_rate)?;
        if amount_out < min_out {
            return Err(TreasuryError::SlippageExceeded {
                min_out,
                computed: amount_out,
            });
        }
        self.ledger
            .check_transfer(caller, holder, asset_in, amount_in)?;
        if amount_out > 0 {
            self.ledger
                .check_transfer(holder, caller, asset_out, amount_out)?;
        }

        let outcome = apply_swap(pool, direction, amount_in, min_out)?;
        self.ledger
            .transfer(caller, holder, asset_in, amount_in)?;
        if outcome.amount_out > 0 {
            self.ledger
                .transfer(holder, caller, asset_out, outcome.amount_out)?;
        }

        tracing::info!(
            "Swap in pool {}: {} {} in, {} {} out, fee {}",
            pool_id,
            amount_in,
            asset_in,
            outcome.amount_out,
            asset_out,
            outcome.fee_paid
        );
        Ok(SwapReceipt {
            pool: pool_id,
            direction,
            asset_in,
            asset_out,
            amount_in,
            amount_out: outcome.amount_out,
            fee_paid: outcome.fee_paid,
        })
    }

    // ===== INVARIANTS AND ACCESS =====

    /// Recheck every structural invariant from scratch: ledger conservation
    /// for all assets, and each pool's reserves and shares against the
    /// ledger's view of them.
    pub fn verify_invariants(&self) -> TreasuryResult<()> {
        self.ledger.check_conservation_all()?;
        for (&pool_id, pool) in &self.pools {
            let holder = Self::pool_account(pool_id);
            let bond_held = self.ledger.balance_of(holder, pool.bond_asset);
            if bond_held != pool.reserve_bond {
                return Err(TreasuryError::Internal(format!(
                    "pool {pool_id}: bond reserve {} but account holds {}",
                    pool.reserve_bond, bond_held
                )));
            }
            let stable_held = self.ledger.balance_of(holder, AssetId::Stablecoin);
            if stable_held != pool.reserve_stable {
                return Err(TreasuryError::Internal(format!(
                    "pool {pool_id}: stable reserve {} but account holds {}",
                    pool.reserve_stable, stable_held
                )));
            }
            let shares = self.ledger.circulating(AssetId::pool_share(pool_id));
            if shares != pool.total_shares {
                return Err(TreasuryError::Internal(format!(
                    "pool {pool_id}: {} shares outstanding but {} in circulation",
                    pool.total_shares, shares
                )));
            }
        }
        Ok(())
    }

    /// Read access to the ledger
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Current configuration
    pub fn config(&self) -> &TreasuryConfig {
        &self.config
    }

    /// Current capability grants
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }
}
