pub const BPS_SCALE: u128 = 10_000u128;
pub const FEE_PER_SHARE_SCALE: u128 = 1_000_000_000_000u128; // 1e12
pub const LEDGERS_PER_YEAR: u128 = 6_307_200u128; // 365d of 5-second ledgers
pub const MAX_RATE_BPS: u32 = 100_000u32; // 1000% APR cap to prevent overflow
pub const MIN_COLLATERAL_RATIO_PCT: u32 = 100u32;
pub const MAX_COLLATERAL_RATIO_PCT: u32 = 10_000u32;
pub const MAX_MIN_LOAN_FEE_BPS: u32 = 1_000u32; // floor fee cannot exceed 10%

pub const DEFAULT_COLLATERAL_RATIO_PCT: u32 = 150u32;
pub const DEFAULT_FLASH_FEE_BPS: u32 = 9u32;
pub const DEFAULT_MIN_LOAN_FEE_BPS: u32 = 25u32;
pub const DEFAULT_ADMIN_CUT_BPS: u32 = 5u32; // 5/10000 of every fee
