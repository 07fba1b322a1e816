#![no_std]

//! # Bridge Executor
//!
//! Timelocked executor for governance decisions relayed from a controlling
//! chain.  A DAO on the home chain ratifies a batch of calls (an
//! *ActionsSet*); a messaging bridge delivers it here, where it is:
//!
//! - **admitted** by the configured bridge gate (AMB, FxPortal or relayer alias),
//! - **queued** with `execution_time = now + delay`,
//! - **executed** by anyone once the delay has passed and before
//!   `execution_time + grace_period`, all actions or none,
//! - or **canceled** by the guardian before execution.
//!
//! The executor's own parameters (delays, guardian, bridge identity) can
//! only be changed by an ActionsSet that targets the executor itself.

pub mod actions_set;
pub mod admission;
pub mod config;
pub mod decoder;
pub mod errors;
pub mod events;
pub mod executor;
mod queue;

use soroban_sdk::{contract, contractimpl, Address, Bytes, BytesN, Env, String, Val, Vec};

use actions_set::{Action, ActionsSet, ActionsSetState};
use admission::{BridgeIdentity, Envelope, Transport};
use config::ExecutorConfig;
use errors::ExecutorError;
use executor::Executor;

#[contract]
pub struct BridgeExecutorContract;

#[contractimpl]
impl BridgeExecutorContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the executor.
    ///
    /// * `bridge`       - transport identity the admission gate checks.
    /// * `native_token` - token contract whose balance funds value-bearing actions.
    /// * `grace_period` - at least [`config::MINIMUM_GRACE_PERIOD`] seconds.
    #[allow(clippy::too_many_arguments)]
    pub fn initialize(
        env: Env,
        bridge: BridgeIdentity,
        native_token: Address,
        delay: u64,
        grace_period: u64,
        minimum_delay: u64,
        maximum_delay: u64,
        guardian: Address,
    ) -> Result<(), ExecutorError> {
        config::init(
            &env,
            &ExecutorConfig {
                delay,
                grace_period,
                minimum_delay,
                maximum_delay,
                guardian,
                bridge,
                native_token,
            },
        )
    }

    pub fn is_initialized(env: Env) -> bool {
        config::is_initialized(&env)
    }

    // ── Delivery entry points ─────────────────────────────────────────────────

    /// AMB delivery.  The bridge attests the origin chain and sender.
    pub fn process_message_from_amb(
        env: Env,
        caller: Address,
        source_chain_id: BytesN<32>,
        sender: BytesN<32>,
        payload: Bytes,
    ) -> Result<u64, ExecutorError> {
        caller.require_auth();
        Self::receive(
            &env,
            Envelope {
                transport: Transport::Amb,
                caller,
                source_chain_id: Some(source_chain_id),
                sender: Some(sender),
                payload,
            },
        )
    }

    /// FxPortal state-sync delivery.  `state_id` is informational.
    pub fn process_message_from_root(
        env: Env,
        caller: Address,
        _state_id: u64,
        root_message_sender: BytesN<32>,
        payload: Bytes,
    ) -> Result<u64, ExecutorError> {
        caller.require_auth();
        Self::receive(
            &env,
            Envelope {
                transport: Transport::FxPortal,
                caller,
                source_chain_id: None,
                sender: Some(root_message_sender),
                payload,
            },
        )
    }

    /// Delivery by the aliased relayer of a rollup-ticket bridge.
    pub fn process_message_from_relayer(
        env: Env,
        caller: Address,
        payload: Bytes,
    ) -> Result<u64, ExecutorError> {
        caller.require_auth();
        Self::receive(
            &env,
            Envelope {
                transport: Transport::RelayerAlias,
                caller,
                source_chain_id: None,
                sender: None,
                payload,
            },
        )
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Execute a queued ActionsSet.  Unprivileged; `caller` is recorded in
    /// the execution event.
    pub fn execute(env: Env, caller: Address, id: u64) -> Result<Vec<Val>, ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        Executor::new(&env).execute(&caller, id)
    }

    /// Cancel a queued or expired ActionsSet.  Guardian only.
    pub fn cancel(env: Env, caller: Address, id: u64) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        queue::cancel(&env, &caller, id)
    }

    // ── Self-amendment ────────────────────────────────────────────────────────
    //
    // These only succeed when `caller` is the executor itself, which happens
    // when an ActionsSet targeting the executor is executed.

    pub fn update_guardian(env: Env, caller: Address, guardian: Address) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_guardian(&env, &caller, guardian)
    }

    pub fn update_delay(env: Env, caller: Address, delay: u64) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_delay(&env, &caller, delay)
    }

    pub fn update_grace_period(
        env: Env,
        caller: Address,
        grace_period: u64,
    ) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_grace_period(&env, &caller, grace_period)
    }

    pub fn update_minimum_delay(
        env: Env,
        caller: Address,
        minimum_delay: u64,
    ) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_minimum_delay(&env, &caller, minimum_delay)
    }

    pub fn update_maximum_delay(
        env: Env,
        caller: Address,
        maximum_delay: u64,
    ) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_maximum_delay(&env, &caller, maximum_delay)
    }

    pub fn set_amb(env: Env, caller: Address, amb: Address) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::set_amb(&env, &caller, amb)
    }

    pub fn set_controller(
        env: Env,
        caller: Address,
        controller: BytesN<32>,
    ) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::set_controller(&env, &caller, controller)
    }

    pub fn set_chain_id(env: Env, caller: Address, chain_id: BytesN<32>) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::set_chain_id(&env, &caller, chain_id)
    }

    pub fn update_fx_child(env: Env, caller: Address, fx_child: Address) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_fx_child(&env, &caller, fx_child)
    }

    pub fn update_fx_root_sender(
        env: Env,
        caller: Address,
        fx_root_sender: BytesN<32>,
    ) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_fx_root_sender(&env, &caller, fx_root_sender)
    }

    pub fn update_relayer(env: Env, caller: Address, relayer: Address) -> Result<(), ExecutorError> {
        config::require_initialized(&env)?;
        caller.require_auth();
        config::update_relayer(&env, &caller, relayer)
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    pub fn get_current_state(env: Env, id: u64) -> Result<ActionsSetState, ExecutorError> {
        config::require_initialized(&env)?;
        queue::get_current_state(&env, id)
    }

    pub fn get_actions_set_by_id(env: Env, id: u64) -> Result<ActionsSet, ExecutorError> {
        config::require_initialized(&env)?;
        queue::load_existing(&env, id)
    }

    pub fn get_actions_set_count(env: Env) -> u64 {
        actions_set::count(&env)
    }

    pub fn get_delay(env: Env) -> u64 {
        config::delay(&env)
    }

    pub fn get_grace_period(env: Env) -> u64 {
        config::grace_period(&env)
    }

    pub fn get_minimum_delay(env: Env) -> u64 {
        config::minimum_delay(&env)
    }

    pub fn get_maximum_delay(env: Env) -> u64 {
        config::maximum_delay(&env)
    }

    pub fn get_guardian(env: Env) -> Result<Address, ExecutorError> {
        config::guardian(&env)
    }

    pub fn get_bridge_identity(env: Env) -> Result<BridgeIdentity, ExecutorError> {
        config::bridge_identity(&env)
    }

    /// Address currently allowed to deliver messages.
    pub fn get_bridge_endpoint(env: Env) -> Result<Address, ExecutorError> {
        Ok(config::bridge_identity(&env)?.endpoint().clone())
    }

    pub fn get_native_token(env: Env) -> Result<Address, ExecutorError> {
        config::native_token(&env)
    }

    pub fn get_config(env: Env) -> Result<ExecutorConfig, ExecutorError> {
        config::snapshot(&env)
    }

    /// Whether a live ActionsSet holds an action with this key.
    pub fn is_action_queued(env: Env, key: BytesN<32>) -> bool {
        actions_set::is_queued(&env, &key)
    }

    /// Key under which [`Self::is_action_queued`] tracks an action.
    pub fn action_key(
        env: Env,
        target: Address,
        value: i128,
        signature: String,
        calldata: Bytes,
        execution_time: u64,
        with_delegatecall: bool,
    ) -> BytesN<32> {
        let action = Action {
            target,
            value,
            signature,
            calldata,
            with_delegatecall,
        };
        actions_set::action_key(&env, &action, execution_time)
    }
}

impl BridgeExecutorContract {
    fn receive(env: &Env, envelope: Envelope) -> Result<u64, ExecutorError> {
        config::require_initialized(env)?;
        let payload = admission::admit(env, envelope)?;
        let decoded = decoder::decode(env, &payload)?;
        queue::queue(env, decoded)
    }
}
