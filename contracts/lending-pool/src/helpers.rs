use soroban_sdk::{Address, Env, IntoVal, Symbol};

use crate::constants::{BPS_SCALE, LEDGERS_PER_YEAR};
use crate::events::{ExternalCallFailed, FeeOverflow};

/// a * b / denominator with an explicit panic instead of silent wrap.
pub fn mul_div(a: u128, b: u128, denominator: u128) -> u128 {
    a.checked_mul(b).expect("math overflow") / denominator
}

/// Interest on `principal` at `rate_bps` per year over `elapsed` ledgers.
/// Factors are reduced by gcd with the denominator to avoid intermediate
/// overflow before the panic fallback.
pub fn checked_fee_product(env: &Env, principal: u128, rate_bps: u32, elapsed: u32) -> u128 {
    let mut denom = BPS_SCALE.saturating_mul(LEDGERS_PER_YEAR);
    let mut a = principal;
    let mut b = rate_bps as u128;
    let mut c = elapsed as u128;

    let g1 = gcd_u128(a, denom);
    a /= g1;
    denom /= g1;
    let g2 = gcd_u128(b, denom);
    b /= g2;
    denom /= g2;
    let g3 = gcd_u128(c, denom);
    c /= g3;
    denom /= g3;

    let numerator = a
        .checked_mul(b)
        .and_then(|v| v.checked_mul(c))
        .unwrap_or_else(|| {
            FeeOverflow {
                principal,
                rate_bps,
                elapsed,
            }
            .publish(env);
            panic!("fee overflow");
        });
    numerator / denom
}

fn gcd_u128(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum CallErrorKind {
    ContractRevert,
    HostError,
}

impl CallErrorKind {
    pub fn as_code(&self) -> u32 {
        match self {
            CallErrorKind::ContractRevert => 0,
            CallErrorKind::HostError => 1,
        }
    }
}

pub(crate) struct CallError {
    pub function: Symbol,
    pub kind: CallErrorKind,
}

pub(crate) fn emit_external_call_failure(env: &Env, contract: &Address, error: &CallError) {
    ExternalCallFailed {
        contract: contract.clone(),
        function: error.function.clone(),
        failure_kind: error.kind.as_code(),
    }
    .publish(env);
}

pub(crate) fn try_call_contract<T, A>(
    env: &Env,
    contract: &Address,
    func: &str,
    args: A,
) -> Result<T, CallError>
where
    T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
    A: IntoVal<Env, soroban_sdk::Vec<soroban_sdk::Val>>,
{
    use soroban_sdk::{InvokeError, Symbol, Val, Vec};
    let symbol = Symbol::new(env, func);
    let args_val: Vec<Val> = args.into_val(env);
    match env.try_invoke_contract::<T, InvokeError>(contract, &symbol, args_val) {
        Ok(Ok(val)) => Ok(val),
        Ok(Err(_)) => Err(CallError {
            function: symbol,
            kind: CallErrorKind::ContractRevert,
        }),
        Err(Ok(_)) | Err(Err(_)) => Err(CallError {
            function: symbol,
            kind: CallErrorKind::HostError,
        }),
    }
}

pub fn call_contract_or_panic<T, A>(env: &Env, contract: &Address, func: &str, args: A) -> T
where
    T: soroban_sdk::TryFromVal<Env, soroban_sdk::Val>,
    A: IntoVal<Env, soroban_sdk::Vec<soroban_sdk::Val>>,
{
    match try_call_contract(env, contract, func, args) {
        Ok(val) => val,
        Err(err) => {
            emit_external_call_failure(env, contract, &err);
            panic!("{} call failed", func);
        }
    }
}
