#![no_std]
use soroban_sdk::{contract, contractevent, contractimpl, contracttype, Address, Env, String};

#[contracttype]
pub enum DataKey {
    Admin,
    Minter,
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    MaxSupply,
    Balance(Address),
    Allowance(Address, Address),
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mint {
    #[topic]
    pub to: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Burn {
    #[topic]
    pub from: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transfer {
    #[topic]
    pub from: Address,
    #[topic]
    pub to: Address,
    pub amount: i128,
}

#[contract]
pub struct RewardToken;

#[contractimpl]
impl RewardToken {
    pub fn initialize(
        env: Env,
        name: String,
        symbol: String,
        decimals: u32,
        admin: Address,
        max_supply: i128,
    ) {
        if env
            .storage()
            .persistent()
            .get::<_, Address>(&DataKey::Admin)
            .is_some()
        {
            panic!("already initialized");
        }
        admin.require_auth();
        if max_supply <= 0 {
            panic!("invalid max supply");
        }
        let storage = env.storage().persistent();
        storage.set(&DataKey::Admin, &admin);
        storage.set(&DataKey::Name, &name);
        storage.set(&DataKey::Symbol, &symbol);
        storage.set(&DataKey::Decimals, &decimals);
        storage.set(&DataKey::MaxSupply, &max_supply);
        storage.set(&DataKey::TotalSupply, &0i128);
    }

    pub fn name(env: Env) -> String {
        env.storage()
            .persistent()
            .get(&DataKey::Name)
            .expect("not initialized")
    }

    pub fn symbol(env: Env) -> String {
        env.storage()
            .persistent()
            .get(&DataKey::Symbol)
            .expect("not initialized")
    }

    pub fn decimals(env: Env) -> u32 {
        env.storage()
            .persistent()
            .get(&DataKey::Decimals)
            .expect("not initialized")
    }

    pub fn total_supply(env: Env) -> i128 {
        read_total_supply(&env)
    }

    pub fn balance_of(env: Env, who: Address) -> i128 {
        read_balance(&env, &who)
    }

    pub fn allowance(env: Env, owner: Address, spender: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::Allowance(owner, spender))
            .unwrap_or(0i128)
    }

    pub fn approve(env: Env, owner: Address, spender: Address, amount: i128) {
        owner.require_auth();
        if amount < 0 {
            panic!("bad amount");
        }
        env.storage()
            .persistent()
            .set(&DataKey::Allowance(owner, spender), &amount);
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        if amount <= 0 {
            panic!("bad amount");
        }
        move_balance(&env, &from, &to, amount);
        Transfer { from, to, amount }.publish(&env);
    }

    pub fn transfer_from(env: Env, spender: Address, owner: Address, to: Address, amount: i128) {
        spender.require_auth();
        if amount <= 0 {
            panic!("bad amount");
        }
        spend_allowance(&env, &owner, &spender, amount);
        move_balance(&env, &owner, &to, amount);
        Transfer {
            from: owner,
            to,
            amount,
        }
        .publish(&env);
    }

    pub fn mint(env: Env, to: Address, amount: i128) {
        require_admin(&env);
        mint_balance(&env, &to, amount);
    }

    pub fn burn(env: Env, from: Address, amount: i128) {
        from.require_auth();
        burn_balance(&env, &from, amount);
    }

    /// Admin: appoint the contract allowed to mint and burn on behalf of
    /// the protocol, normally the lending pool.
    pub fn set_minter(env: Env, minter: Address) {
        require_admin(&env);
        env.storage().persistent().set(&DataKey::Minter, &minter);
    }

    pub fn get_minter(env: Env) -> Option<Address> {
        env.storage().persistent().get(&DataKey::Minter)
    }

    /// Minter-gated mint, subject to the same max supply cap as `mint`.
    pub fn mint_to(env: Env, to: Address, amount: i128) {
        require_minter(&env);
        mint_balance(&env, &to, amount);
    }

    /// Minter-gated burn of any holder's balance. Used by the pool to
    /// collect borrow surcharges without a user signature per loan.
    pub fn burn_from(env: Env, from: Address, amount: i128) {
        require_minter(&env);
        burn_balance(&env, &from, amount);
    }

    pub fn set_admin(env: Env, new_admin: Address) {
        require_admin(&env);
        env.storage().persistent().set(&DataKey::Admin, &new_admin);
    }
}

fn require_admin(env: &Env) -> Address {
    let admin: Address = env
        .storage()
        .persistent()
        .get(&DataKey::Admin)
        .expect("no admin");
    admin.require_auth();
    admin
}

fn require_minter(env: &Env) -> Address {
    let minter: Address = env
        .storage()
        .persistent()
        .get(&DataKey::Minter)
        .expect("minter not set");
    minter.require_auth();
    minter
}

fn read_total_supply(env: &Env) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::TotalSupply)
        .unwrap_or(0i128)
}

fn read_balance(env: &Env, who: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(who.clone()))
        .unwrap_or(0i128)
}

fn write_balance(env: &Env, who: &Address, amount: i128) {
    env.storage()
        .persistent()
        .set(&DataKey::Balance(who.clone()), &amount);
}

fn move_balance(env: &Env, from: &Address, to: &Address, amount: i128) {
    let from_balance = read_balance(env, from);
    if from_balance < amount {
        panic!("insufficient balance");
    }
    write_balance(env, from, from_balance - amount);
    write_balance(env, to, read_balance(env, to) + amount);
}

fn spend_allowance(env: &Env, owner: &Address, spender: &Address, amount: i128) {
    let key = DataKey::Allowance(owner.clone(), spender.clone());
    let allowance: i128 = env.storage().persistent().get(&key).unwrap_or(0i128);
    if allowance < amount {
        panic!("insufficient allowance");
    }
    env.storage().persistent().set(&key, &(allowance - amount));
}

fn mint_balance(env: &Env, to: &Address, amount: i128) {
    if amount <= 0 {
        panic!("bad amount");
    }
    let max_supply: i128 = env
        .storage()
        .persistent()
        .get(&DataKey::MaxSupply)
        .expect("max supply not set");
    let supply = read_total_supply(env);
    if amount > max_supply.saturating_sub(supply) {
        panic!("max supply exceeded");
    }
    env.storage()
        .persistent()
        .set(&DataKey::TotalSupply, &(supply + amount));
    write_balance(env, to, read_balance(env, to) + amount);
    Mint {
        to: to.clone(),
        amount,
    }
    .publish(env);
}

fn burn_balance(env: &Env, from: &Address, amount: i128) {
    if amount <= 0 {
        panic!("bad amount");
    }
    let current = read_balance(env, from);
    if current < amount {
        panic!("insufficient balance");
    }
    write_balance(env, from, current - amount);
    env.storage()
        .persistent()
        .set(&DataKey::TotalSupply, &(read_total_supply(env) - amount));
    Burn {
        from: from.clone(),
        amount,
    }
    .publish(env);
}
