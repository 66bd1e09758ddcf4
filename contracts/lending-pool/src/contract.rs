use soroban_sdk::{contract, contractimpl, token, Address, Bytes, Env, Vec};

use crate::constants::*;
use crate::events::*;
use crate::helpers::*;
use crate::interest::*;
use crate::shares::*;
use crate::storage::*;

#[soroban_sdk::contractclient(name = "RewardTokenClient")]
pub trait RewardTokenContract {
    fn mint_to(env: Env, to: Address, amount: i128);
    fn burn_from(env: Env, from: Address, amount: i128);
}

#[contract]
pub struct LendingPool;

#[contractimpl]
impl LendingPool {
    /// Initialize the pool with its admin and asset pair. Collateral is
    /// denominated 1:1 in principal units; deployments normally configure
    /// the same token for both sides. Terms and fees start at defaults and
    /// are adjusted through the admin setters.
    pub fn initialize(env: Env, admin: Address, deposit_token: Address, collateral_token: Address) {
        let storage = env.storage().persistent();
        if storage
            .get::<_, bool>(&DataKey::Initialized)
            .unwrap_or(false)
        {
            panic!("already initialized");
        }
        storage.set(&DataKey::Initialized, &true);
        admin.require_auth();

        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::DepositToken, &deposit_token);
        storage.set(&DataKey::CollateralToken, &collateral_token);

        storage.set(&DataKey::TotalDeposits, &0u128);
        storage.set(&DataKey::TotalBorrowed, &0u128);
        storage.set(&DataKey::TotalShares, &0u128);
        storage.set(&DataKey::HolderFees, &0u128);
        storage.set(&DataKey::AdminFees, &0u128);
        storage.set(&DataKey::PendingFees, &0u128);
        storage.set(&DataKey::FeePerShare, &0u128);

        write_tiers(&env, &default_tiers(&env));
        write_config(
            &env,
            &PoolConfig {
                collateral_ratio_pct: DEFAULT_COLLATERAL_RATIO_PCT,
                flash_fee_bps: DEFAULT_FLASH_FEE_BPS,
                min_loan_fee_bps: DEFAULT_MIN_LOAN_FEE_BPS,
                admin_cut_bps: DEFAULT_ADMIN_CUT_BPS,
                reward_surcharge_bps: 0,
                reward_bonus_bps: 0,
                rate_mode: RateMode::Snapshot,
                version: 1,
            },
        );
    }

    /// Deposit the pool asset and receive shares at the current ratio.
    /// The first depositor mints 1:1.
    pub fn deposit(env: Env, account: Address, amount: u128) {
        let token_address = ensure_initialized(&env);
        account.require_auth();
        if amount == 0 {
            panic!("invalid amount");
        }
        settle_fees(&env);

        let supply = total_shares(&env);
        let shares = if supply == 0 {
            amount
        } else {
            // Entry price counts undistributed holder fees, so newcomers
            // buy into the pot at fair value.
            let pool_assets = read_total_deposits(&env) + read_holder_fees(&env);
            mul_div(amount, supply, pool_assets)
        };
        if shares == 0 {
            panic!("amount below minimum");
        }

        let token_client = token::Client::new(&env, &token_address);
        token_client.transfer(&account, &env.current_contract_address(), &to_i128(amount));

        mint_shares(&env, &account, shares);
        write_total_deposits(&env, read_total_deposits(&env) + amount);
        checkpoint_fee_debt(&env, &account);
        bump_account_ttl(&env, &account);

        Deposited {
            account: account.clone(),
            amount,
            shares,
        }
        .publish(&env);
    }

    /// Burn shares for the proportional principal plus holder-fee payout.
    /// The principal portion may never dip into funds backing active loans.
    pub fn withdraw(env: Env, account: Address, shares: u128) {
        let token_address = ensure_initialized(&env);
        account.require_auth();
        if shares == 0 {
            panic!("invalid amount");
        }
        settle_fees(&env);

        let balance = share_balance(&env, &account);
        if balance < shares {
            panic!("insufficient shares");
        }

        let supply = total_shares(&env);
        let total_deposits = read_total_deposits(&env);
        let holder_fees = read_holder_fees(&env);
        let principal = mul_div(total_deposits, shares, supply);
        let fee_share = mul_div(holder_fees, shares, supply);

        if principal > total_deposits - read_total_borrowed(&env) {
            panic!("insufficient liquidity");
        }

        burn_shares(&env, &account, shares);
        write_total_deposits(&env, total_deposits - principal);
        write_holder_fees(&env, holder_fees - fee_share);
        checkpoint_fee_debt(&env, &account);
        bump_account_ttl(&env, &account);

        let token_client = token::Client::new(&env, &token_address);
        token_client.transfer(
            &env.current_contract_address(),
            &account,
            &to_i128(principal + fee_share),
        );

        Withdrawn {
            account: account.clone(),
            shares,
            principal,
            fee_share,
        }
        .publish(&env);
    }

    /// Move shares to another holder. Undistributed fee claims travel with
    /// the shares; both parties' accumulator checkpoints reset here.
    pub fn transfer_shares(env: Env, from: Address, to: Address, shares: u128) {
        let _ = ensure_initialized(&env);
        from.require_auth();
        if shares == 0 {
            panic!("invalid amount");
        }
        settle_fees(&env);

        move_shares(&env, &from, &to, shares);
        checkpoint_fee_debt(&env, &from);
        checkpoint_fee_debt(&env, &to);
        bump_account_ttl(&env, &from);
        bump_account_ttl(&env, &to);

        ShareTransfer {
            from: from.clone(),
            to: to.clone(),
            shares,
        }
        .publish(&env);
    }

    /// Open a loan against posted collateral. One active loan per borrower;
    /// the rate and duration are captured in the loan record at this point.
    pub fn borrow(env: Env, borrower: Address, amount: u128, tier: u32) {
        let token_address = ensure_initialized(&env);
        borrower.require_auth();
        if amount == 0 {
            panic!("invalid amount");
        }
        settle_fees(&env);

        if read_loan(&env, &borrower).is_some() {
            panic!("loan already active");
        }
        let tiers = read_tiers(&env);
        let term = tier_at(&tiers, tier);
        let config = read_config(&env);

        if available_liquidity(&env) < amount {
            panic!("insufficient liquidity");
        }

        let rate_bps = select_rate(&term, share_balance(&env, &borrower) > 0);
        let collateral = mul_div(amount, config.collateral_ratio_pct as u128, 100);
        // The full-tenor fee must fit inside the collateral margin so an
        // expired loan can always be settled from collateral alone.
        let tenor_fee = loan_fee(
            &env,
            amount,
            rate_bps,
            term.duration_ledgers,
            config.min_loan_fee_bps,
        );
        if collateral < amount + tenor_fee {
            panic!("collateral cannot cover fee");
        }

        let start_ledger = env.ledger().sequence();
        write_loan(
            &env,
            &borrower,
            &Loan {
                principal: amount,
                collateral,
                start_ledger,
                duration_ledgers: term.duration_ledgers,
                rate_bps,
                tier,
            },
        );
        let total_borrowed = read_total_borrowed(&env) + amount;
        write_total_borrowed(&env, total_borrowed);
        bump_loan_ttl(&env, &borrower);

        let collateral_client = token::Client::new(&env, &read_collateral_token(&env));
        collateral_client.transfer(&borrower, &env.current_contract_address(), &to_i128(collateral));
        let token_client = token::Client::new(&env, &token_address);
        token_client.transfer(&env.current_contract_address(), &borrower, &to_i128(amount));

        if config.reward_surcharge_bps > 0 {
            if let Some(reward) = read_reward_token(&env) {
                let surcharge = mul_div(amount, config.reward_surcharge_bps as u128, BPS_SCALE);
                if surcharge > 0 {
                    RewardTokenClient::new(&env, &reward)
                        .burn_from(&borrower, &to_i128(surcharge));
                }
            }
        }

        Borrowed {
            borrower: borrower.clone(),
            amount,
            collateral,
            rate_bps,
            due_ledger: start_ledger.saturating_add(term.duration_ledgers),
            total_borrowed,
        }
        .publish(&env);
    }

    /// Settle the caller's loan: principal comes back in, the accrued fee is
    /// withheld from the collateral refund. Fees accrue per ledger, capped at
    /// the tenor and floored at the minimum fee.
    pub fn repay(env: Env, borrower: Address) {
        let token_address = ensure_initialized(&env);
        borrower.require_auth();
        settle_fees(&env);

        let Some(loan) = read_loan(&env, &borrower) else {
            panic!("no active loan");
        };
        let config = read_config(&env);
        let rate_bps = settlement_rate(&env, &loan, &config, &borrower);
        let elapsed = elapsed_capped(
            env.ledger().sequence(),
            loan.start_ledger,
            loan.duration_ledgers,
        );
        let fee = loan_fee(&env, loan.principal, rate_bps, elapsed, config.min_loan_fee_bps);
        if fee > loan.collateral {
            panic!("collateral cannot cover fee");
        }

        remove_loan(&env, &borrower);
        write_total_borrowed(&env, read_total_borrowed(&env) - loan.principal);
        credit_fee_split(&env, &config, fee);

        let token_client = token::Client::new(&env, &token_address);
        token_client.transfer(&borrower, &env.current_contract_address(), &to_i128(loan.principal));
        let collateral_returned = loan.collateral - fee;
        if collateral_returned > 0 {
            let collateral_client = token::Client::new(&env, &read_collateral_token(&env));
            collateral_client.transfer(
                &env.current_contract_address(),
                &borrower,
                &to_i128(collateral_returned),
            );
        }

        if config.reward_bonus_bps > 0 {
            if let Some(reward) = read_reward_token(&env) {
                let bonus = mul_div(fee, config.reward_bonus_bps as u128, BPS_SCALE);
                if bonus > 0 {
                    RewardTokenClient::new(&env, &reward).mint_to(&borrower, &to_i128(bonus));
                }
            }
        }

        Repaid {
            borrower: borrower.clone(),
            principal: loan.principal,
            fee,
            collateral_returned,
        }
        .publish(&env);
    }

    /// Settle an expired loan from its collateral. Callable by anyone; the
    /// pool retains principal plus the full-tenor fee and the remainder goes
    /// to the original borrower. Never seizes beyond the posted collateral.
    pub fn force_repay(env: Env, caller: Address, borrower: Address) {
        let _ = ensure_initialized(&env);
        caller.require_auth();
        settle_fees(&env);

        let Some(loan) = read_loan(&env, &borrower) else {
            panic!("no active loan");
        };
        let now = env.ledger().sequence();
        if now < loan.start_ledger.saturating_add(loan.duration_ledgers) {
            panic!("loan not expired");
        }

        let config = read_config(&env);
        let rate_bps = settlement_rate(&env, &loan, &config, &borrower);
        let mut fee = loan_fee(
            &env,
            loan.principal,
            rate_bps,
            loan.duration_ledgers,
            config.min_loan_fee_bps,
        );
        let margin = loan.collateral - loan.principal;
        if fee > margin {
            fee = margin;
        }

        remove_loan(&env, &borrower);
        write_total_borrowed(&env, read_total_borrowed(&env) - loan.principal);
        credit_fee_split(&env, &config, fee);

        let collateral_returned = loan.collateral - loan.principal - fee;
        if collateral_returned > 0 {
            let collateral_client = token::Client::new(&env, &read_collateral_token(&env));
            collateral_client.transfer(
                &env.current_contract_address(),
                &borrower,
                &to_i128(collateral_returned),
            );
        }

        ForcedRepayment {
            borrower: borrower.clone(),
            caller: caller.clone(),
            principal: loan.principal,
            fee,
            collateral_returned,
        }
        .publish(&env);
    }

    /// Lend `amount` for the duration of one call. The receiver's
    /// `execute_operation` runs with the funds; repayment is enforced by the
    /// balance delta afterward, not by trusting the receiver.
    pub fn flash_loan(env: Env, initiator: Address, receiver: Address, amount: u128, params: Bytes) {
        if amount == 0 {
            panic!("invalid flash amount");
        }
        let token_address = ensure_initialized(&env);
        initiator.require_auth();
        settle_fees(&env);

        if available_liquidity(&env) < amount {
            panic!("insufficient liquidity");
        }
        let config = read_config(&env);
        let fee = mul_div(amount, config.flash_fee_bps as u128, BPS_SCALE);

        let token_client = token::Client::new(&env, &token_address);
        let balance_before_i: i128 = token_client.balance(&env.current_contract_address());
        if balance_before_i < 0 {
            panic!("invalid cash state");
        }
        let balance_before = balance_before_i as u128;

        token_client.transfer(&env.current_contract_address(), &receiver, &to_i128(amount));

        // Receiver acts on the funds and must return them before this call unwinds.
        call_contract_or_panic::<(), _>(
            &env,
            &receiver,
            "execute_operation",
            (amount, fee, initiator.clone(), params),
        );

        let balance_after_i: i128 = token_client.balance(&env.current_contract_address());
        if balance_after_i < 0 {
            panic!("invalid repayment state");
        }
        let balance_after = balance_after_i as u128;
        if balance_after < balance_before.saturating_add(fee) {
            panic!("flash loan not repaid");
        }

        let fee_paid = balance_after - balance_before;
        credit_fee_split(&env, &config, fee_paid);

        FlashLoan {
            receiver: receiver.clone(),
            amount,
            fee_paid,
        }
        .publish(&env);
    }

    /// Admin: set the collateralization ratio in percent (100..=10000).
    pub fn set_collateral_ratio(env: Env, ratio_pct: u32) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        if ratio_pct < MIN_COLLATERAL_RATIO_PCT || ratio_pct > MAX_COLLATERAL_RATIO_PCT {
            panic!("invalid collateral ratio");
        }
        let mut config = read_config(&env);
        config.collateral_ratio_pct = ratio_pct;
        config.version += 1;
        write_config(&env, &config);
        NewCollateralRatio { ratio_pct }.publish(&env);
    }

    /// Admin: set the flash loan fee in basis points of principal.
    pub fn set_flash_loan_fee(env: Env, fee_bps: u32) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        if fee_bps as u128 > BPS_SCALE {
            panic!("Invalid flash fee");
        }
        let mut config = read_config(&env);
        config.flash_fee_bps = fee_bps;
        config.version += 1;
        write_config(&env, &config);
        NewFlashLoanFee { fee_bps }.publish(&env);
    }

    /// Admin: set the minimum loan fee floor in basis points.
    pub fn set_min_loan_fee(env: Env, fee_bps: u32) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        if fee_bps > MAX_MIN_LOAN_FEE_BPS {
            panic!("invalid min fee");
        }
        let mut config = read_config(&env);
        config.min_loan_fee_bps = fee_bps;
        config.version += 1;
        write_config(&env, &config);
        NewMinLoanFee { fee_bps }.publish(&env);
    }

    /// Admin: set the admin's cut of every fee, in basis points.
    pub fn set_admin_fee_cut(env: Env, cut_bps: u32) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        if cut_bps as u128 > BPS_SCALE {
            panic!("invalid admin cut");
        }
        let mut config = read_config(&env);
        config.admin_cut_bps = cut_bps;
        config.version += 1;
        write_config(&env, &config);
        NewAdminFeeCut { cut_bps }.publish(&env);
    }

    /// Admin: choose whether settlement uses the origination rate snapshot
    /// or the live tier table.
    pub fn set_rate_mode(env: Env, mode: RateMode) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        let mut config = read_config(&env);
        config.rate_mode = mode;
        config.version += 1;
        write_config(&env, &config);
        NewRateMode { mode }.publish(&env);
    }

    /// Admin: replace the lending term table. Existing loans keep their
    /// snapshot terms unless the pool runs in live-rate mode.
    pub fn set_interest_tiers(env: Env, tiers: Vec<InterestTier>) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        validate_tiers(&tiers);
        write_tiers(&env, &tiers);
        let mut config = read_config(&env);
        config.version += 1;
        write_config(&env, &config);
        NewInterestTiers { count: tiers.len() }.publish(&env);
    }

    /// Admin: wire the reward token and its borrow surcharge / repay bonus
    /// rates. The pool must be configured as that token's minter.
    pub fn set_reward_token(env: Env, token: Address, surcharge_bps: u32, bonus_bps: u32) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        if surcharge_bps as u128 > BPS_SCALE || bonus_bps as u128 > BPS_SCALE {
            panic!("invalid reward rate");
        }
        env.storage().persistent().set(&DataKey::RewardToken, &token);
        let mut config = read_config(&env);
        config.reward_surcharge_bps = surcharge_bps;
        config.reward_bonus_bps = bonus_bps;
        config.version += 1;
        write_config(&env, &config);
        NewRewardToken {
            token: token.clone(),
            surcharge_bps,
            bonus_bps,
        }
        .publish(&env);
    }

    /// Admin: move claimable admin fees out to the admin address.
    pub fn withdraw_fees(env: Env, amount: u128) {
        let token_address = ensure_initialized(&env);
        let admin = require_admin(&env);
        if amount == 0 {
            panic!("invalid amount");
        }
        let admin_fees = read_admin_fees(&env);
        if amount > admin_fees {
            panic!("insufficient admin fees");
        }
        let remaining = admin_fees - amount;
        write_admin_fees(&env, remaining);

        let token_client = token::Client::new(&env, &token_address);
        token_client.transfer(&env.current_contract_address(), &admin, &to_i128(amount));

        FeesWithdrawn {
            admin,
            amount,
            remaining,
        }
        .publish(&env);
    }

    /// Admin: hand the role to a new address.
    pub fn set_admin(env: Env, new_admin: Address) {
        let _ = ensure_initialized(&env);
        require_admin(&env);
        env.storage().persistent().set(&DataKey::Admin, &new_admin);
        NewAdmin { admin: new_admin }.publish(&env);
    }

    pub fn get_admin(env: Env) -> Address {
        read_admin(&env)
    }

    pub fn get_config(env: Env) -> PoolConfig {
        read_config(&env)
    }

    pub fn get_deposit_token(env: Env) -> Address {
        ensure_initialized(&env)
    }

    pub fn get_collateral_token(env: Env) -> Address {
        read_collateral_token(&env)
    }

    pub fn get_reward_token(env: Env) -> Option<Address> {
        read_reward_token(&env)
    }

    pub fn get_interest_tiers(env: Env) -> Vec<InterestTier> {
        read_tiers(&env)
    }

    pub fn get_total_deposits(env: Env) -> u128 {
        read_total_deposits(&env)
    }

    pub fn get_total_borrowed(env: Env) -> u128 {
        read_total_borrowed(&env)
    }

    pub fn get_available_liquidity(env: Env) -> u128 {
        available_liquidity(&env)
    }

    pub fn get_total_shares(env: Env) -> u128 {
        total_shares(&env)
    }

    pub fn get_share_balance(env: Env, account: Address) -> u128 {
        share_balance(&env, &account)
    }

    pub fn get_holder_fees(env: Env) -> u128 {
        read_holder_fees(&env)
    }

    pub fn get_admin_fees(env: Env) -> u128 {
        read_admin_fees(&env)
    }

    /// Fees attributed to the account's shares since its last interaction.
    pub fn get_accrued_fees(env: Env, account: Address) -> u128 {
        accrued_fees(&env, &account)
    }

    pub fn get_loan(env: Env, borrower: Address) -> Option<Loan> {
        read_loan(&env, &borrower)
    }

    /// Principal and the fee due if the loan were settled this ledger.
    pub fn get_repay_quote(env: Env, borrower: Address) -> (u128, u128) {
        let Some(loan) = read_loan(&env, &borrower) else {
            panic!("no active loan");
        };
        let config = read_config(&env);
        let rate_bps = settlement_rate(&env, &loan, &config, &borrower);
        let elapsed = elapsed_capped(
            env.ledger().sequence(),
            loan.start_ledger,
            loan.duration_ledgers,
        );
        let fee = loan_fee(&env, loan.principal, rate_bps, elapsed, config.min_loan_fee_bps);
        (loan.principal, fee)
    }
}

fn require_admin(env: &Env) -> Address {
    let admin = read_admin(env);
    admin.require_auth();
    admin
}

fn available_liquidity(env: &Env) -> u128 {
    read_total_deposits(env).saturating_sub(read_total_borrowed(env))
}

/// Rate used at settlement: the loan's snapshot, or the live table when the
/// pool is configured to reprice mid-loan.
fn settlement_rate(env: &Env, loan: &Loan, config: &PoolConfig, borrower: &Address) -> u32 {
    match config.rate_mode {
        RateMode::Snapshot => loan.rate_bps,
        RateMode::Live => {
            let tiers = read_tiers(env);
            let term = tier_at(&tiers, loan.tier);
            select_rate(&term, share_balance(env, borrower) > 0)
        }
    }
}

/// Split a fee into the admin cut and the holder remainder, then fold the
/// holder portion into the accumulator right away.
fn credit_fee_split(env: &Env, config: &PoolConfig, fee: u128) {
    let admin_cut = mul_div(fee, config.admin_cut_bps as u128, BPS_SCALE);
    if admin_cut > 0 {
        write_admin_fees(env, read_admin_fees(env) + admin_cut);
    }
    credit_holder_fees(env, fee - admin_cut);
    settle_fees(env);
}
