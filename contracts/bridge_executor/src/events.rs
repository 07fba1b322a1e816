#![allow(deprecated)] // events().publish migration tracked separately

//! Structured event publishing for the bridge executor.
//!
//! Every state transition is mirrored by exactly one event so off-chain
//! indexers can rebuild the ActionsSet table and the configuration history
//! from the event stream alone.

use soroban_sdk::{
    contracttype, symbol_short, Address, Bytes, BytesN, Env, String, Val, Vec,
};

use crate::actions_set::ActionsSet;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionsSetQueued {
    pub id: u64,
    pub targets: Vec<Address>,
    pub values: Vec<i128>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<Bytes>,
    pub with_delegatecalls: Vec<bool>,
    pub execution_time: u64,
}

pub fn publish_actions_set_queued(env: &Env, set: &ActionsSet) {
    let event = ActionsSetQueued {
        id: set.id,
        targets: set.targets.clone(),
        values: set.values.clone(),
        signatures: set.signatures.clone(),
        calldatas: set.calldatas.clone(),
        with_delegatecalls: set.with_delegatecalls.clone(),
        execution_time: set.execution_time,
    };
    env.events()
        .publish((symbol_short!("AS_QUEUED"), set.id), event);
}

pub fn publish_actions_set_executed(
    env: &Env,
    id: u64,
    initiator: &Address,
    return_data: &Vec<Val>,
) {
    env.events().publish(
        (symbol_short!("AS_EXEC"), id),
        (initiator.clone(), return_data.clone()),
    );
}

pub fn publish_actions_set_canceled(env: &Env, id: u64) {
    env.events()
        .publish((symbol_short!("AS_CANCEL"),), id);
}

// ── Executor parameters ───────────────────────────────────────────────────────

pub fn publish_delay_update(env: &Env, old: u64, new: u64) {
    env.events()
        .publish((symbol_short!("DELAY_UPD"),), (old, new));
}

pub fn publish_grace_period_update(env: &Env, old: u64, new: u64) {
    env.events()
        .publish((symbol_short!("GRACE_UPD"),), (old, new));
}

pub fn publish_minimum_delay_update(env: &Env, old: u64, new: u64) {
    env.events()
        .publish((symbol_short!("MINDL_UPD"),), (old, new));
}

pub fn publish_maximum_delay_update(env: &Env, old: u64, new: u64) {
    env.events()
        .publish((symbol_short!("MAXDL_UPD"),), (old, new));
}

pub fn publish_guardian_update(env: &Env, old: Option<Address>, new: &Address) {
    env.events()
        .publish((symbol_short!("GUARD_UPD"),), (old, new.clone()));
}

// ── Bridge identity ───────────────────────────────────────────────────────────

pub fn publish_amb_updated(env: &Env, old: Option<Address>, new: &Address) {
    env.events()
        .publish((symbol_short!("AMB_UPD"),), (old, new.clone()));
}

pub fn publish_controller_updated(env: &Env, old: Option<BytesN<32>>, new: &BytesN<32>) {
    env.events()
        .publish((symbol_short!("CTRL_UPD"),), (old, new.clone()));
}

pub fn publish_chain_id_updated(env: &Env, old: Option<BytesN<32>>, new: &BytesN<32>) {
    env.events()
        .publish((symbol_short!("CHAIN_UPD"),), (old, new.clone()));
}

pub fn publish_fx_child_update(env: &Env, old: Option<Address>, new: &Address) {
    env.events()
        .publish((symbol_short!("FXCHD_UPD"),), (old, new.clone()));
}

pub fn publish_fx_root_sender_update(env: &Env, old: Option<BytesN<32>>, new: &BytesN<32>) {
    env.events()
        .publish((symbol_short!("FXRT_UPD"),), (old, new.clone()));
}

pub fn publish_relayer_update(env: &Env, old: Option<Address>, new: &Address) {
    env.events()
        .publish((symbol_short!("RELAY_UPD"),), (old, new.clone()));
}
