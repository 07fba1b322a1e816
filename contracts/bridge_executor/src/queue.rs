//! Queueing, lifecycle state and guardian cancellation.

use soroban_sdk::{Address, BytesN, Env, Vec};

use crate::actions_set::{self, ActionsSet, ActionsSetState};
use crate::config;
use crate::decoder::ActionsSetPayload;
use crate::errors::ExecutorError;
use crate::events;

/// Queue a decoded batch and return its id.
///
/// The whole batch is rejected if two of its actions share a key; keys of
/// other live ActionsSets do not collide with it.
pub(crate) fn queue(env: &Env, payload: ActionsSetPayload) -> Result<u64, ExecutorError> {
    let execution_time = env
        .ledger()
        .timestamp()
        .saturating_add(config::delay(env));

    let mut set = ActionsSet {
        id: 0,
        targets: payload.targets,
        values: payload.values,
        signatures: payload.signatures,
        calldatas: payload.calldatas,
        with_delegatecalls: payload.with_delegatecalls,
        execution_time,
        executed: false,
        canceled: false,
    };

    let mut keys: Vec<BytesN<32>> = Vec::new(env);
    for index in 0..set.len() {
        let action = set
            .action(index)
            .ok_or(ExecutorError::InconsistentParamsLength)?;
        let key = actions_set::action_key(env, &action, execution_time);
        if keys.contains(&key) {
            return Err(ExecutorError::DuplicateAction);
        }
        keys.push_back(key);
    }

    for key in keys.iter() {
        actions_set::reserve(env, &key);
    }

    set.id = actions_set::next_id(env);
    actions_set::store(env, &set);
    events::publish_actions_set_queued(env, &set);

    Ok(set.id)
}

/// Load a stored ActionsSet, failing for ids never handed out.
pub(crate) fn load_existing(env: &Env, id: u64) -> Result<ActionsSet, ExecutorError> {
    if id >= actions_set::count(env) {
        return Err(ExecutorError::InvalidActionsSetId);
    }
    actions_set::load(env, id).ok_or(ExecutorError::InvalidActionsSetId)
}

pub(crate) fn get_current_state(env: &Env, id: u64) -> Result<ActionsSetState, ExecutorError> {
    let set = load_existing(env, id)?;
    Ok(set.state(env.ledger().timestamp(), config::grace_period(env)))
}

/// Cancel a not-yet-executed ActionsSet.  `caller` must already be
/// authenticated.
///
/// Expired sets may still be canceled, which releases their action keys.
pub(crate) fn cancel(env: &Env, caller: &Address, id: u64) -> Result<(), ExecutorError> {
    if *caller != config::guardian(env)? {
        return Err(ExecutorError::OnlyByGuardian);
    }

    let mut set = load_existing(env, id)?;
    if set.executed {
        return Err(ExecutorError::OnlyBeforeExecuted);
    }
    if set.canceled {
        return Err(ExecutorError::AlreadyCanceled);
    }

    set.canceled = true;
    actions_set::store(env, &set);
    actions_set::release_all(env, &set);
    events::publish_actions_set_canceled(env, id);

    Ok(())
}
