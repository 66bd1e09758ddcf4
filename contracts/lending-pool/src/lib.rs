#![no_std]

mod constants;
mod contract;
mod events;
mod helpers;
mod interest;
mod shares;
mod storage;

pub use crate::contract::{LendingPool, LendingPoolClient, RewardTokenClient, RewardTokenContract};
pub use crate::storage::{InterestTier, Loan, PoolConfig, RateMode};
