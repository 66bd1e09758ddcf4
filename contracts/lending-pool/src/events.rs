use soroban_sdk::{contractevent, Address, Symbol};

use crate::storage::RateMode;

/// Emitted on deposit when shares are minted.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposited {
    #[topic]
    pub account: Address,
    pub amount: u128,
    pub shares: u128,
}

/// Emitted on withdraw; `principal` and `fee_share` sum to the payout.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    #[topic]
    pub account: Address,
    pub shares: u128,
    pub principal: u128,
    pub fee_share: u128,
}

/// Emitted when shares change hands outside of mint and burn.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ShareTransfer {
    #[topic]
    pub from: Address,
    #[topic]
    pub to: Address,
    pub shares: u128,
}

/// Emitted when a loan is opened.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Borrowed {
    #[topic]
    pub borrower: Address,
    pub amount: u128,
    pub collateral: u128,
    pub rate_bps: u32,
    pub due_ledger: u32,
    pub total_borrowed: u128,
}

/// Emitted when the borrower settles their own loan.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Repaid {
    #[topic]
    pub borrower: Address,
    pub principal: u128,
    pub fee: u128,
    pub collateral_returned: u128,
}

/// Emitted when an expired loan is settled from its collateral.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ForcedRepayment {
    #[topic]
    pub borrower: Address,
    #[topic]
    pub caller: Address,
    pub principal: u128,
    pub fee: u128,
    pub collateral_returned: u128,
}

/// Flash loan execution log.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlashLoan {
    #[topic]
    pub receiver: Address,
    pub amount: u128,
    pub fee_paid: u128,
}

/// Emitted when the admin drains claimable admin fees.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesWithdrawn {
    #[topic]
    pub admin: Address,
    pub amount: u128,
    pub remaining: u128,
}

/// Emitted when pending fees fold into the per-share accumulator.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeesSettled {
    pub amount: u128,
    pub fee_per_share: u128,
}

/// Records external contract call failures before the invocation aborts.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExternalCallFailed {
    #[topic]
    pub contract: Address,
    #[topic]
    pub function: Symbol,
    pub failure_kind: u32,
}

/// Emitted before fee math panics on overflow.
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeOverflow {
    pub principal: u128,
    pub rate_bps: u32,
    pub elapsed: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewAdmin {
    #[topic]
    pub admin: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewCollateralRatio {
    pub ratio_pct: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewFlashLoanFee {
    pub fee_bps: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewMinLoanFee {
    pub fee_bps: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewAdminFeeCut {
    pub cut_bps: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewRateMode {
    pub mode: RateMode,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewInterestTiers {
    pub count: u32,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewRewardToken {
    #[topic]
    pub token: Address,
    pub surcharge_bps: u32,
    pub bonus_bps: u32,
}
