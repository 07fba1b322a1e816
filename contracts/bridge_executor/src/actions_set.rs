//! ActionsSet records, the id counter and the queued-action key table.

use soroban_sdk::xdr::ToXdr;
use soroban_sdk::{contracttype, symbol_short, Address, Bytes, BytesN, Env, String, Symbol, Vec};

// ── Storage key prefixes ─────────────────────────────────────────────────────

pub(crate) const ACTIONS_SET_CTR: Symbol = symbol_short!("AS_CTR");
pub(crate) const ACTIONS_SET: Symbol = symbol_short!("AS");
pub(crate) const QUEUED_ACTION: Symbol = symbol_short!("AS_KEY");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Derived lifecycle state of an ActionsSet.
///
/// ```text
/// Queued ──► Executed   (execute, now in [execution_time, execution_time + grace))
///    │
///    ├────► Canceled   (guardian)
///    └────► Expired    (now >= execution_time + grace, never stored)
/// ```
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ActionsSetState {
    Queued = 0,
    Executed = 1,
    Canceled = 2,
    Expired = 3,
}

/// One queued batch of calls sharing a single execution time.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionsSet {
    pub id: u64,
    pub targets: Vec<Address>,
    /// Native-token amounts, one per target.
    pub values: Vec<i128>,
    /// Function names; empty means the calldata carries the full call.
    pub signatures: Vec<String>,
    pub calldatas: Vec<Bytes>,
    pub with_delegatecalls: Vec<bool>,
    pub execution_time: u64,
    pub executed: bool,
    pub canceled: bool,
}

/// A single index of an [`ActionsSet`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Action {
    pub target: Address,
    pub value: i128,
    pub signature: String,
    pub calldata: Bytes,
    pub with_delegatecall: bool,
}

impl ActionsSet {
    pub fn len(&self) -> u32 {
        self.targets.len()
    }

    /// Action at `index`, or `None` past the end.
    pub fn action(&self, index: u32) -> Option<Action> {
        Some(Action {
            target: self.targets.get(index)?,
            value: self.values.get(index)?,
            signature: self.signatures.get(index)?,
            calldata: self.calldatas.get(index)?,
            with_delegatecall: self.with_delegatecalls.get(index)?,
        })
    }

    pub fn state(&self, now: u64, grace_period: u64) -> ActionsSetState {
        if self.canceled {
            ActionsSetState::Canceled
        } else if self.executed {
            ActionsSetState::Executed
        } else if now >= self.execution_time.saturating_add(grace_period) {
            ActionsSetState::Expired
        } else {
            ActionsSetState::Queued
        }
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

pub(crate) fn count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&ACTIONS_SET_CTR)
        .unwrap_or(0u64)
}

/// Hand out the next id.  Ids start at zero, so the id equals the count of
/// ActionsSets queued before it.
pub(crate) fn next_id(env: &Env) -> u64 {
    let id = count(env);
    env.storage()
        .instance()
        .set(&ACTIONS_SET_CTR, &id.saturating_add(1));
    id
}

fn actions_set_key(id: u64) -> (Symbol, u64) {
    (ACTIONS_SET, id)
}

pub(crate) fn store(env: &Env, set: &ActionsSet) {
    let key = actions_set_key(set.id);
    env.storage().persistent().set(&key, set);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn load(env: &Env, id: u64) -> Option<ActionsSet> {
    let key = actions_set_key(id);
    let set = env.storage().persistent().get(&key)?;
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
    Some(set)
}

// ── Queued-action keys ───────────────────────────────────────────────────────

/// SHA-256 over the XDR of the action tuple and its execution time.
pub fn action_key(env: &Env, action: &Action, execution_time: u64) -> BytesN<32> {
    let preimage = (
        action.target.clone(),
        action.value,
        action.signature.clone(),
        action.calldata.clone(),
        execution_time,
        action.with_delegatecall,
    )
        .to_xdr(env);
    env.crypto().sha256(&preimage).into()
}

fn queued_action_key(key: &BytesN<32>) -> (Symbol, BytesN<32>) {
    (QUEUED_ACTION, key.clone())
}

fn holders(env: &Env, key: &BytesN<32>) -> u32 {
    env.storage()
        .persistent()
        .get(&queued_action_key(key))
        .unwrap_or(0u32)
}

pub(crate) fn is_queued(env: &Env, key: &BytesN<32>) -> bool {
    holders(env, key) > 0
}

/// Record one more live ActionsSet holding `key`.
pub(crate) fn reserve(env: &Env, key: &BytesN<32>) {
    let storage_key = queued_action_key(key);
    env.storage()
        .persistent()
        .set(&storage_key, &holders(env, key).saturating_add(1));
    env.storage()
        .persistent()
        .extend_ttl(&storage_key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub(crate) fn release(env: &Env, key: &BytesN<32>) {
    let storage_key = queued_action_key(key);
    match holders(env, key) {
        0 | 1 => env.storage().persistent().remove(&storage_key),
        n => env.storage().persistent().set(&storage_key, &(n - 1)),
    }
}

/// Release every action key held by `set`.
pub(crate) fn release_all(env: &Env, set: &ActionsSet) {
    for index in 0..set.len() {
        if let Some(action) = set.action(index) {
            release(env, &action_key(env, &action, set.execution_time));
        }
    }
}
