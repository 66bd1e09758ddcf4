use soroban_sdk::{contracttype, Address, Env, Vec};

// Storage key types for the contract
#[contracttype]
pub enum DataKey {
    Admin,                  // Address
    DepositToken,           // Address of the lent asset
    CollateralToken,        // Address of the posted asset (canonically the same)
    RewardToken,            // Address (optional)
    Config,                 // PoolConfig
    Tiers,                  // Vec<InterestTier>
    Initialized,            // bool flag to prevent re-initialization
    TotalDeposits,          // u128 principal held for depositors
    TotalBorrowed,          // u128 principal out on active loans
    TotalShares,            // u128
    HolderFees,             // u128 undistributed holder-fee pot
    AdminFees,              // u128 claimable by admin
    PendingFees,            // u128 holder fees not yet folded into the accumulator
    FeePerShare,            // u128, scaled 1e12
    ShareBalance(Address),  // u128 per depositor
    FeeDebt(Address),       // u128 accumulator checkpoint per depositor
    Loan(Address),          // Loan per borrower; present iff the loan is active
}

const TTL_THRESHOLD: u32 = 100_000;
const TTL_EXTEND_TO: u32 = 200_000;

/// Whether settlement math uses the rate captured at origination or the
/// current tier table.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RateMode {
    Snapshot,
    Live,
}

/// Admin-mutable pool parameters, rewritten whole on every change.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub collateral_ratio_pct: u32,
    pub flash_fee_bps: u32,
    pub min_loan_fee_bps: u32,
    pub admin_cut_bps: u32,
    pub reward_surcharge_bps: u32,
    pub reward_bonus_bps: u32,
    pub rate_mode: RateMode,
    pub version: u32,
}

/// One lending term: how long the loan runs and what it costs per year.
/// `nonholder_rate_bps == 0` means the base rate applies to everyone.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InterestTier {
    pub duration_ledgers: u32,
    pub rate_bps: u32,
    pub nonholder_rate_bps: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Loan {
    pub principal: u128,
    pub collateral: u128,
    pub start_ledger: u32,
    pub duration_ledgers: u32,
    pub rate_bps: u32,
    pub tier: u32,
}

pub fn ensure_initialized(env: &Env) -> Address {
    bump_core_ttl(env);
    env.storage()
        .persistent()
        .get(&DataKey::DepositToken)
        .expect("pool not initialized")
}

pub fn bump_core_ttl(env: &Env) {
    let persistent = env.storage().persistent();
    if persistent.has(&DataKey::Admin) {
        persistent.extend_ttl(&DataKey::Admin, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::DepositToken) {
        persistent.extend_ttl(&DataKey::DepositToken, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::CollateralToken) {
        persistent.extend_ttl(&DataKey::CollateralToken, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::Config) {
        persistent.extend_ttl(&DataKey::Config, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::Tiers) {
        persistent.extend_ttl(&DataKey::Tiers, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    if persistent.has(&DataKey::Initialized) {
        persistent.extend_ttl(&DataKey::Initialized, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_account_ttl(env: &Env, account: &Address) {
    let persistent = env.storage().persistent();
    let balance_key = DataKey::ShareBalance(account.clone());
    if persistent.has(&balance_key) {
        persistent.extend_ttl(&balance_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
    let debt_key = DataKey::FeeDebt(account.clone());
    if persistent.has(&debt_key) {
        persistent.extend_ttl(&debt_key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn bump_loan_ttl(env: &Env, borrower: &Address) {
    let persistent = env.storage().persistent();
    let key = DataKey::Loan(borrower.clone());
    if persistent.has(&key) {
        persistent.extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    }
}

pub fn read_admin(env: &Env) -> Address {
    env.storage()
        .persistent()
        .get(&DataKey::Admin)
        .expect("admin not set")
}

pub fn read_collateral_token(env: &Env) -> Address {
    env.storage()
        .persistent()
        .get(&DataKey::CollateralToken)
        .expect("pool not initialized")
}

pub fn read_reward_token(env: &Env) -> Option<Address> {
    env.storage().persistent().get(&DataKey::RewardToken)
}

pub fn read_config(env: &Env) -> PoolConfig {
    env.storage()
        .persistent()
        .get(&DataKey::Config)
        .expect("config not set")
}

pub fn write_config(env: &Env, config: &PoolConfig) {
    env.storage().persistent().set(&DataKey::Config, config);
}

pub fn read_tiers(env: &Env) -> Vec<InterestTier> {
    env.storage()
        .persistent()
        .get(&DataKey::Tiers)
        .expect("tiers not set")
}

pub fn write_tiers(env: &Env, tiers: &Vec<InterestTier>) {
    env.storage().persistent().set(&DataKey::Tiers, tiers);
}

fn read_u128(env: &Env, key: &DataKey) -> u128 {
    env.storage().persistent().get(key).unwrap_or(0u128)
}

pub fn read_total_deposits(env: &Env) -> u128 {
    read_u128(env, &DataKey::TotalDeposits)
}

pub fn write_total_deposits(env: &Env, amount: u128) {
    env.storage().persistent().set(&DataKey::TotalDeposits, &amount);
}

pub fn read_total_borrowed(env: &Env) -> u128 {
    read_u128(env, &DataKey::TotalBorrowed)
}

pub fn write_total_borrowed(env: &Env, amount: u128) {
    env.storage().persistent().set(&DataKey::TotalBorrowed, &amount);
}

pub fn read_holder_fees(env: &Env) -> u128 {
    read_u128(env, &DataKey::HolderFees)
}

pub fn write_holder_fees(env: &Env, amount: u128) {
    env.storage().persistent().set(&DataKey::HolderFees, &amount);
}

pub fn read_admin_fees(env: &Env) -> u128 {
    read_u128(env, &DataKey::AdminFees)
}

pub fn write_admin_fees(env: &Env, amount: u128) {
    env.storage().persistent().set(&DataKey::AdminFees, &amount);
}

pub fn read_pending_fees(env: &Env) -> u128 {
    read_u128(env, &DataKey::PendingFees)
}

pub fn write_pending_fees(env: &Env, amount: u128) {
    env.storage().persistent().set(&DataKey::PendingFees, &amount);
}

pub fn read_fee_per_share(env: &Env) -> u128 {
    read_u128(env, &DataKey::FeePerShare)
}

pub fn write_fee_per_share(env: &Env, value: u128) {
    env.storage().persistent().set(&DataKey::FeePerShare, &value);
}

pub fn read_loan(env: &Env, borrower: &Address) -> Option<Loan> {
    env.storage()
        .persistent()
        .get(&DataKey::Loan(borrower.clone()))
}

pub fn write_loan(env: &Env, borrower: &Address, loan: &Loan) {
    env.storage()
        .persistent()
        .set(&DataKey::Loan(borrower.clone()), loan);
}

pub fn remove_loan(env: &Env, borrower: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Loan(borrower.clone()));
}

pub fn to_i128(amount: u128) -> i128 {
    if amount > i128::MAX as u128 {
        panic!("amount exceeds i128");
    }
    amount as i128
}
