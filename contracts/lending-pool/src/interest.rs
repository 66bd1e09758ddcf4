use soroban_sdk::{Env, Vec};

use crate::constants::{BPS_SCALE, MAX_RATE_BPS};
use crate::helpers::{checked_fee_product, mul_div};
use crate::storage::InterestTier;

/// 7, 30, and 90 days of 5-second ledgers.
pub(crate) fn default_tiers(env: &Env) -> Vec<InterestTier> {
    Vec::from_array(
        env,
        [
            InterestTier {
                duration_ledgers: 120_960,
                rate_bps: 300,
                nonholder_rate_bps: 0,
            },
            InterestTier {
                duration_ledgers: 518_400,
                rate_bps: 550,
                nonholder_rate_bps: 0,
            },
            InterestTier {
                duration_ledgers: 1_555_200,
                rate_bps: 800,
                nonholder_rate_bps: 0,
            },
        ],
    )
}

pub(crate) fn validate_tiers(tiers: &Vec<InterestTier>) {
    if tiers.is_empty() {
        panic!("no tiers");
    }
    for tier in tiers.iter() {
        if tier.duration_ledgers == 0 {
            panic!("invalid tier duration");
        }
        if tier.rate_bps > MAX_RATE_BPS || tier.nonholder_rate_bps > MAX_RATE_BPS {
            panic!("invalid tier rate");
        }
    }
}

pub(crate) fn tier_at(tiers: &Vec<InterestTier>, index: u32) -> InterestTier {
    match tiers.get(index) {
        Some(tier) => tier,
        None => panic!("unknown tier"),
    }
}

/// Base rate for share holders; the separate nonholder rate, when set,
/// for borrowers with no pool position.
pub(crate) fn select_rate(tier: &InterestTier, holds_shares: bool) -> u32 {
    if !holds_shares && tier.nonholder_rate_bps != 0 {
        tier.nonholder_rate_bps
    } else {
        tier.rate_bps
    }
}

pub(crate) fn elapsed_capped(now: u32, start: u32, duration: u32) -> u32 {
    let elapsed = now.saturating_sub(start);
    if elapsed > duration {
        duration
    } else {
        elapsed
    }
}

/// Pro-rated interest over `elapsed_ledgers`, floored at the minimum fee so
/// near-zero-duration loans never pay negligible interest.
pub(crate) fn loan_fee(
    env: &Env,
    principal: u128,
    rate_bps: u32,
    elapsed_ledgers: u32,
    min_fee_bps: u32,
) -> u128 {
    let accrued = checked_fee_product(env, principal, rate_bps, elapsed_ledgers);
    let floor = mul_div(principal, min_fee_bps as u128, BPS_SCALE);
    if accrued > floor {
        accrued
    } else {
        floor
    }
}
