//! Executor configuration and the self-amendment setters.
//!
//! Configuration lives in instance storage.  Every mutating setter takes the
//! caller explicitly and refuses anyone but the executor's own address, which
//! only [`crate::executor`] can present (from inside `execute`).  Changes to
//! the delay affect future `queue` calls only; a queued ActionsSet keeps the
//! execution time computed when it was queued.

use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env, Symbol};

use crate::admission::BridgeIdentity;
use crate::errors::ExecutorError;
use crate::events;

// ── Storage keys ──────────────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const DELAY: Symbol = symbol_short!("DELAY");
const GRACE_PERIOD: Symbol = symbol_short!("GRACE");
const MINIMUM_DELAY: Symbol = symbol_short!("MIN_DLY");
const MAXIMUM_DELAY: Symbol = symbol_short!("MAX_DLY");
const GUARDIAN: Symbol = symbol_short!("GUARDIAN");
const BRIDGE: Symbol = symbol_short!("BRIDGE");
const NATIVE_TOKEN: Symbol = symbol_short!("NATIVE");

// ~30 days at 5s/ledger
const INSTANCE_TTL_THRESHOLD: u32 = 518_400;
const INSTANCE_TTL_EXTEND_TO: u32 = 1_036_800;

/// Lower bound on the grace period (10 minutes).
pub const MINIMUM_GRACE_PERIOD: u64 = 600;

/// Snapshot of the configuration returned by `get_config`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutorConfig {
    pub delay: u64,
    pub grace_period: u64,
    pub minimum_delay: u64,
    pub maximum_delay: u64,
    pub guardian: Address,
    pub bridge: BridgeIdentity,
    pub native_token: Address,
}

// ── Initialisation ────────────────────────────────────────────────────────────

pub(crate) fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub(crate) fn require_initialized(env: &Env) -> Result<(), ExecutorError> {
    if !is_initialized(env) {
        return Err(ExecutorError::NotInitialized);
    }
    extend_instance_ttl(env);
    Ok(())
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND_TO);
}

/// Write the deployment configuration.  Validation mirrors the setters so
/// that `minimum_delay <= delay <= maximum_delay` holds from the first ledger.
pub(crate) fn init(env: &Env, config: &ExecutorConfig) -> Result<(), ExecutorError> {
    if is_initialized(env) {
        return Err(ExecutorError::AlreadyInitialized);
    }
    if config.grace_period < MINIMUM_GRACE_PERIOD {
        return Err(ExecutorError::GracePeriodTooShort);
    }
    if config.minimum_delay > config.maximum_delay {
        return Err(ExecutorError::InvalidInitParams);
    }
    validate_delay(config.delay, config.minimum_delay, config.maximum_delay)?;

    let store = env.storage().instance();
    store.set(&MINIMUM_DELAY, &config.minimum_delay);
    store.set(&MAXIMUM_DELAY, &config.maximum_delay);
    store.set(&DELAY, &config.delay);
    store.set(&GRACE_PERIOD, &config.grace_period);
    store.set(&GUARDIAN, &config.guardian);
    store.set(&BRIDGE, &config.bridge);
    store.set(&NATIVE_TOKEN, &config.native_token);
    store.set(&INITIALIZED, &true);
    extend_instance_ttl(env);

    events::publish_minimum_delay_update(env, 0, config.minimum_delay);
    events::publish_maximum_delay_update(env, 0, config.maximum_delay);
    events::publish_delay_update(env, 0, config.delay);
    events::publish_grace_period_update(env, 0, config.grace_period);
    events::publish_guardian_update(env, None, &config.guardian);
    publish_bridge_identity(env, &config.bridge);

    Ok(())
}

fn publish_bridge_identity(env: &Env, identity: &BridgeIdentity) {
    match identity {
        BridgeIdentity::Amb(id) => {
            events::publish_amb_updated(env, None, &id.amb);
            events::publish_controller_updated(env, None, &id.controller);
            events::publish_chain_id_updated(env, None, &id.chain_id);
        }
        BridgeIdentity::FxPortal(id) => {
            events::publish_fx_child_update(env, None, &id.fx_child);
            events::publish_fx_root_sender_update(env, None, &id.fx_root_sender);
        }
        BridgeIdentity::RelayerAlias(id) => {
            events::publish_relayer_update(env, None, &id.relayer);
        }
    }
}

// ── Reads ─────────────────────────────────────────────────────────────────────

pub fn delay(env: &Env) -> u64 {
    env.storage().instance().get(&DELAY).unwrap_or(0)
}

pub fn grace_period(env: &Env) -> u64 {
    env.storage().instance().get(&GRACE_PERIOD).unwrap_or(0)
}

pub fn minimum_delay(env: &Env) -> u64 {
    env.storage().instance().get(&MINIMUM_DELAY).unwrap_or(0)
}

pub fn maximum_delay(env: &Env) -> u64 {
    env.storage().instance().get(&MAXIMUM_DELAY).unwrap_or(0)
}

pub fn guardian(env: &Env) -> Result<Address, ExecutorError> {
    env.storage()
        .instance()
        .get(&GUARDIAN)
        .ok_or(ExecutorError::NotInitialized)
}

pub fn bridge_identity(env: &Env) -> Result<BridgeIdentity, ExecutorError> {
    env.storage()
        .instance()
        .get(&BRIDGE)
        .ok_or(ExecutorError::NotInitialized)
}

pub fn native_token(env: &Env) -> Result<Address, ExecutorError> {
    env.storage()
        .instance()
        .get(&NATIVE_TOKEN)
        .ok_or(ExecutorError::NotInitialized)
}

pub fn snapshot(env: &Env) -> Result<ExecutorConfig, ExecutorError> {
    Ok(ExecutorConfig {
        delay: delay(env),
        grace_period: grace_period(env),
        minimum_delay: minimum_delay(env),
        maximum_delay: maximum_delay(env),
        guardian: guardian(env)?,
        bridge: bridge_identity(env)?,
        native_token: native_token(env)?,
    })
}

// ── Validation ────────────────────────────────────────────────────────────────

fn validate_delay(delay: u64, minimum_delay: u64, maximum_delay: u64) -> Result<(), ExecutorError> {
    if delay < minimum_delay {
        return Err(ExecutorError::DelayShorterThanMin);
    }
    if delay > maximum_delay {
        return Err(ExecutorError::DelayLongerThanMax);
    }
    Ok(())
}

/// The only caller the setters accept is the executor itself.
pub(crate) fn require_self(env: &Env, caller: &Address) -> Result<(), ExecutorError> {
    if *caller != env.current_contract_address() {
        return Err(ExecutorError::OnlyCallableByThis);
    }
    Ok(())
}

// ── Self-amendment setters ────────────────────────────────────────────────────

pub(crate) fn update_guardian(
    env: &Env,
    caller: &Address,
    guardian: Address,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    let old = env.storage().instance().get::<_, Address>(&GUARDIAN);
    env.storage().instance().set(&GUARDIAN, &guardian);
    events::publish_guardian_update(env, old, &guardian);
    Ok(())
}

pub(crate) fn update_delay(env: &Env, caller: &Address, delay: u64) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    validate_delay(delay, minimum_delay(env), maximum_delay(env))?;
    let old = self::delay(env);
    env.storage().instance().set(&DELAY, &delay);
    events::publish_delay_update(env, old, delay);
    Ok(())
}

pub(crate) fn update_grace_period(
    env: &Env,
    caller: &Address,
    grace_period: u64,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    if grace_period < MINIMUM_GRACE_PERIOD {
        return Err(ExecutorError::GracePeriodTooShort);
    }
    let old = self::grace_period(env);
    env.storage().instance().set(&GRACE_PERIOD, &grace_period);
    events::publish_grace_period_update(env, old, grace_period);
    Ok(())
}

pub(crate) fn update_minimum_delay(
    env: &Env,
    caller: &Address,
    minimum_delay: u64,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    if delay(env) < minimum_delay {
        return Err(ExecutorError::DelayShorterThanMin);
    }
    let old = self::minimum_delay(env);
    env.storage().instance().set(&MINIMUM_DELAY, &minimum_delay);
    events::publish_minimum_delay_update(env, old, minimum_delay);
    Ok(())
}

pub(crate) fn update_maximum_delay(
    env: &Env,
    caller: &Address,
    maximum_delay: u64,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    if delay(env) > maximum_delay {
        return Err(ExecutorError::DelayLongerThanMax);
    }
    let old = self::maximum_delay(env);
    env.storage().instance().set(&MAXIMUM_DELAY, &maximum_delay);
    events::publish_maximum_delay_update(env, old, maximum_delay);
    Ok(())
}

// ── Bridge identity setters ───────────────────────────────────────────────────

fn store_bridge_identity(env: &Env, identity: &BridgeIdentity) {
    env.storage().instance().set(&BRIDGE, identity);
}

pub(crate) fn set_amb(env: &Env, caller: &Address, amb: Address) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    match bridge_identity(env)? {
        BridgeIdentity::Amb(mut id) => {
            let old = core::mem::replace(&mut id.amb, amb.clone());
            store_bridge_identity(env, &BridgeIdentity::Amb(id));
            events::publish_amb_updated(env, Some(old), &amb);
            Ok(())
        }
        _ => Err(ExecutorError::BridgeMismatch),
    }
}

pub(crate) fn set_controller(
    env: &Env,
    caller: &Address,
    controller: BytesN<32>,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    match bridge_identity(env)? {
        BridgeIdentity::Amb(mut id) => {
            let old = core::mem::replace(&mut id.controller, controller.clone());
            store_bridge_identity(env, &BridgeIdentity::Amb(id));
            events::publish_controller_updated(env, Some(old), &controller);
            Ok(())
        }
        _ => Err(ExecutorError::BridgeMismatch),
    }
}

pub(crate) fn set_chain_id(
    env: &Env,
    caller: &Address,
    chain_id: BytesN<32>,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    match bridge_identity(env)? {
        BridgeIdentity::Amb(mut id) => {
            let old = core::mem::replace(&mut id.chain_id, chain_id.clone());
            store_bridge_identity(env, &BridgeIdentity::Amb(id));
            events::publish_chain_id_updated(env, Some(old), &chain_id);
            Ok(())
        }
        _ => Err(ExecutorError::BridgeMismatch),
    }
}

pub(crate) fn update_fx_child(
    env: &Env,
    caller: &Address,
    fx_child: Address,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    match bridge_identity(env)? {
        BridgeIdentity::FxPortal(mut id) => {
            let old = core::mem::replace(&mut id.fx_child, fx_child.clone());
            store_bridge_identity(env, &BridgeIdentity::FxPortal(id));
            events::publish_fx_child_update(env, Some(old), &fx_child);
            Ok(())
        }
        _ => Err(ExecutorError::BridgeMismatch),
    }
}

pub(crate) fn update_fx_root_sender(
    env: &Env,
    caller: &Address,
    fx_root_sender: BytesN<32>,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    match bridge_identity(env)? {
        BridgeIdentity::FxPortal(mut id) => {
            let old = core::mem::replace(&mut id.fx_root_sender, fx_root_sender.clone());
            store_bridge_identity(env, &BridgeIdentity::FxPortal(id));
            events::publish_fx_root_sender_update(env, Some(old), &fx_root_sender);
            Ok(())
        }
        _ => Err(ExecutorError::BridgeMismatch),
    }
}

pub(crate) fn update_relayer(
    env: &Env,
    caller: &Address,
    relayer: Address,
) -> Result<(), ExecutorError> {
    require_self(env, caller)?;
    match bridge_identity(env)? {
        BridgeIdentity::RelayerAlias(mut id) => {
            let old = core::mem::replace(&mut id.relayer, relayer.clone());
            store_bridge_identity(env, &BridgeIdentity::RelayerAlias(id));
            events::publish_relayer_update(env, Some(old), &relayer);
            Ok(())
        }
        _ => Err(ExecutorError::BridgeMismatch),
    }
}
