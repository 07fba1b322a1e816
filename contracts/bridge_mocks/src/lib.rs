#![no_std]

//! Test doubles for the bridge executor: one delivering endpoint per bridge
//! transport and a target contract that records what it was called with.
//!
//! The endpoints invoke the executor directly, so the executor sees the mock
//! as the authenticated `caller` without any mocked auth.

use soroban_sdk::{
    contract, contracterror, contractimpl, symbol_short, Address, Bytes, BytesN, Env, Symbol, Vec,
};

#[soroban_sdk::contractclient(name = "ExecutorClient")]
#[allow(dead_code)]
trait ExecutorInterface {
    fn process_message_from_amb(
        env: Env,
        caller: Address,
        source_chain_id: BytesN<32>,
        sender: BytesN<32>,
        payload: Bytes,
    ) -> u64;

    fn process_message_from_root(
        env: Env,
        caller: Address,
        state_id: u64,
        root_message_sender: BytesN<32>,
        payload: Bytes,
    ) -> u64;

    fn process_message_from_relayer(env: Env, caller: Address, payload: Bytes) -> u64;
}

// ── Bridge endpoints ─────────────────────────────────────────────────────────

/// Arbitrary-message-bridge endpoint.
#[contract]
pub struct MockAmb;

#[contractimpl]
impl MockAmb {
    /// Deliver `payload` as if it came from `sender` on `source_chain_id`.
    pub fn deliver(
        env: Env,
        executor: Address,
        source_chain_id: BytesN<32>,
        sender: BytesN<32>,
        payload: Bytes,
    ) -> u64 {
        ExecutorClient::new(&env, &executor).process_message_from_amb(
            &env.current_contract_address(),
            &source_chain_id,
            &sender,
            &payload,
        )
    }
}

/// State-sync receiver predeploy.
#[contract]
pub struct MockFxChild;

#[contractimpl]
impl MockFxChild {
    pub fn on_state_receive(
        env: Env,
        executor: Address,
        state_id: u64,
        root_message_sender: BytesN<32>,
        payload: Bytes,
    ) -> u64 {
        ExecutorClient::new(&env, &executor).process_message_from_root(
            &env.current_contract_address(),
            &state_id,
            &root_message_sender,
            &payload,
        )
    }
}

/// Aliased relayer of a rollup-ticket bridge.
#[contract]
pub struct MockRelayer;

#[contractimpl]
impl MockRelayer {
    pub fn redeem(env: Env, executor: Address, payload: Bytes) -> u64 {
        ExecutorClient::new(&env, &executor)
            .process_message_from_relayer(&env.current_contract_address(), &payload)
    }
}

// ── Call target ──────────────────────────────────────────────────────────────

const RECORDS: Symbol = symbol_short!("RECORDS");
const CONTEXT: Symbol = symbol_short!("CONTEXT");

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MockTargetError {
    AlwaysFails = 1,
}

/// Records every value it receives.
#[contract]
pub struct MockTarget;

#[contractimpl]
impl MockTarget {
    /// Append `value` and return it.
    pub fn record(env: Env, value: u64) -> u64 {
        let mut records = Self::records(env.clone());
        records.push_back(value);
        env.storage().instance().set(&RECORDS, &records);
        value
    }

    /// Delegated-call shape: the acting executor comes first.
    pub fn record_as(env: Env, context: Address, value: u64) -> Address {
        env.storage().instance().set(&CONTEXT, &context);
        Self::record(env, value);
        context
    }

    pub fn fail(_env: Env) -> Result<(), MockTargetError> {
        Err(MockTargetError::AlwaysFails)
    }

    pub fn records(env: Env) -> Vec<u64> {
        env.storage()
            .instance()
            .get(&RECORDS)
            .unwrap_or(Vec::new(&env))
    }

    pub fn last_context(env: Env) -> Option<Address> {
        env.storage().instance().get(&CONTEXT)
    }
}
