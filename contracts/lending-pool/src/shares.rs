use soroban_sdk::{Address, Env};

use crate::constants::FEE_PER_SHARE_SCALE;
use crate::events::FeesSettled;
use crate::helpers::mul_div;
use crate::storage::*;

pub fn share_balance(env: &Env, account: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::ShareBalance(account.clone()))
        .unwrap_or(0u128)
}

pub fn total_shares(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::TotalShares)
        .unwrap_or(0u128)
}

pub(crate) fn mint_shares(env: &Env, account: &Address, amount: u128) {
    let balance = share_balance(env, account);
    env.storage().persistent().set(
        &DataKey::ShareBalance(account.clone()),
        &(balance + amount),
    );
    let total = total_shares(env);
    env.storage()
        .persistent()
        .set(&DataKey::TotalShares, &(total + amount));
}

pub(crate) fn burn_shares(env: &Env, account: &Address, amount: u128) {
    let balance = share_balance(env, account);
    if balance < amount {
        panic!("insufficient shares");
    }
    env.storage().persistent().set(
        &DataKey::ShareBalance(account.clone()),
        &(balance - amount),
    );
    let total = total_shares(env);
    env.storage()
        .persistent()
        .set(&DataKey::TotalShares, &(total - amount));
}

/// Move shares between holders without touching the total supply.
pub(crate) fn move_shares(env: &Env, from: &Address, to: &Address, amount: u128) {
    let from_balance = share_balance(env, from);
    if from_balance < amount {
        panic!("insufficient shares");
    }
    env.storage().persistent().set(
        &DataKey::ShareBalance(from.clone()),
        &(from_balance - amount),
    );
    let to_balance = share_balance(env, to);
    env.storage().persistent().set(
        &DataKey::ShareBalance(to.clone()),
        &(to_balance + amount),
    );
}

/// Queue a holder-portion fee for the next settlement.
pub(crate) fn credit_holder_fees(env: &Env, amount: u128) {
    if amount == 0 {
        return;
    }
    write_pending_fees(env, read_pending_fees(env) + amount);
}

/// Fold pending fees into the per-share accumulator and the holder pot.
/// Runs before any share-value computation so the ratios never go stale.
pub(crate) fn settle_fees(env: &Env) {
    let pending = read_pending_fees(env);
    if pending == 0 {
        return;
    }
    let total = total_shares(env);
    if total == 0 {
        // No one to attribute the fees to; admin pot instead of stranding.
        write_admin_fees(env, read_admin_fees(env) + pending);
        write_pending_fees(env, 0);
        return;
    }
    let fee_per_share =
        read_fee_per_share(env) + mul_div(pending, FEE_PER_SHARE_SCALE, total);
    write_fee_per_share(env, fee_per_share);
    write_holder_fees(env, read_holder_fees(env) + pending);
    write_pending_fees(env, 0);
    FeesSettled {
        amount: pending,
        fee_per_share,
    }
    .publish(env);
}

/// Reset the account's accumulator checkpoint to its current entitlement.
/// Called after every mint/burn for the account.
pub(crate) fn checkpoint_fee_debt(env: &Env, account: &Address) {
    let debt = mul_div(
        share_balance(env, account),
        read_fee_per_share(env),
        FEE_PER_SHARE_SCALE,
    );
    env.storage()
        .persistent()
        .set(&DataKey::FeeDebt(account.clone()), &debt);
}

fn read_fee_debt(env: &Env, account: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&DataKey::FeeDebt(account.clone()))
        .unwrap_or(0u128)
}

/// Fees attributed to the account's shares since its last interaction,
/// including any amount still waiting in the pending counter.
pub fn accrued_fees(env: &Env, account: &Address) -> u128 {
    let balance = share_balance(env, account);
    if balance == 0 {
        return 0;
    }
    let mut fee_per_share = read_fee_per_share(env);
    let pending = read_pending_fees(env);
    let total = total_shares(env);
    if pending > 0 && total > 0 {
        fee_per_share += mul_div(pending, FEE_PER_SHARE_SCALE, total);
    }
    let owed = mul_div(balance, fee_per_share, FEE_PER_SHARE_SCALE);
    owed.saturating_sub(read_fee_debt(env, account))
}
