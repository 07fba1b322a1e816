//! Executes a queued ActionsSet.
//!
//! The set is marked executed and stored before the first sub-call, so a
//! sub-call that reaches back into `execute` for the same id sees it as no
//! longer queued.  Any failing action returns an error, and the host rolls
//! back every effect of the invocation, earlier sub-calls included.
//!
//! An action with neither signature nor calldata is a plain native-token
//! transfer of its value to the target; nothing is invoked.
//!
//! Actions targeting the executor itself are dispatched in the current frame
//! with the executor's own address as caller: Soroban does not allow a
//! contract to re-enter itself through `invoke_contract`.

use soroban_sdk::xdr::FromXdr;
use soroban_sdk::{log, token, Address, Env, IntoVal, String, Symbol, TryFromVal, Val, Vec};

use crate::actions_set::{self, Action, ActionsSetState};
use crate::config;
use crate::errors::ExecutorError;
use crate::events;
use crate::queue;

/// Longest function name Soroban accepts as a `Symbol`.
const MAX_SYMBOL_LEN: usize = 32;

pub struct Executor<'a> {
    env: &'a Env,
}

impl<'a> Executor<'a> {
    pub fn new(env: &'a Env) -> Self {
        Self { env }
    }

    /// Run every action of ActionsSet `id` and return their results in order.
    pub fn execute(&self, initiator: &Address, id: u64) -> Result<Vec<Val>, ExecutorError> {
        let env = self.env;
        let mut set = queue::load_existing(env, id)?;

        let now = env.ledger().timestamp();
        if now < set.execution_time {
            return Err(ExecutorError::TimelockNotFinished);
        }
        if set.state(now, config::grace_period(env)) != ActionsSetState::Queued {
            return Err(ExecutorError::ActionsSetNotQueued);
        }

        set.executed = true;
        actions_set::store(env, &set);
        actions_set::release_all(env, &set);

        let mut return_data: Vec<Val> = Vec::new(env);
        for index in 0..set.len() {
            let action = set
                .action(index)
                .ok_or(ExecutorError::FailedActionExecution)?;
            match self.perform(&action) {
                Ok(result) => return_data.push_back(result),
                Err(e) => {
                    log!(env, "action failed", id, index, e as u32);
                    return Err(e);
                }
            }
        }

        events::publish_actions_set_executed(env, id, initiator, &return_data);
        Ok(return_data)
    }

    fn perform(&self, action: &Action) -> Result<Val, ExecutorError> {
        let env = self.env;
        let this = env.current_contract_address();

        if is_plain_transfer(action) && action.target != this {
            self.require_balance(action.value)?;
            if action.value > 0 {
                token::TokenClient::new(env, &config::native_token(env)?).transfer(
                    &this,
                    &action.target,
                    &action.value,
                );
            }
            return Ok(().into_val(env));
        }

        let (function, mut args) = build_call(env, action)?;

        if action.target == this {
            self.require_balance(action.value)?;
            return self.dispatch_self(&function, &args);
        }

        if action.with_delegatecall {
            // The callee acts on the executor's behalf; nothing is sent.
            self.require_balance(action.value)?;
            args.push_front(this.into_val(env));
        } else if action.value > 0 {
            self.require_balance(action.value)?;
            token::TokenClient::new(env, &config::native_token(env)?).transfer(
                &this,
                &action.target,
                &action.value,
            );
        }

        match env.try_invoke_contract::<Val, soroban_sdk::Error>(&action.target, &function, args) {
            Ok(Ok(result)) => Ok(result),
            _ => {
                log!(env, "sub-call failed", action.target, function);
                Err(ExecutorError::FailedActionExecution)
            }
        }
    }

    fn require_balance(&self, value: i128) -> Result<(), ExecutorError> {
        if value == 0 {
            return Ok(());
        }
        let native = config::native_token(self.env)?;
        let balance = token::TokenClient::new(self.env, &native)
            .balance(&self.env.current_contract_address());
        if balance < value {
            return Err(ExecutorError::InsufficientBalance);
        }
        Ok(())
    }

    /// In-frame dispatch of the executor's own entry points.  Arguments keep
    /// the public ABI: the caller first, then the value.
    fn dispatch_self(&self, function: &Symbol, args: &Vec<Val>) -> Result<Val, ExecutorError> {
        let env = self.env;
        let caller: Address = arg(env, args, 0)?;
        let name = |s: &str| *function == Symbol::new(env, s);

        if name("update_guardian") {
            config::update_guardian(env, &caller, arg(env, args, 1)?)?;
        } else if name("update_delay") {
            config::update_delay(env, &caller, arg(env, args, 1)?)?;
        } else if name("update_grace_period") {
            config::update_grace_period(env, &caller, arg(env, args, 1)?)?;
        } else if name("update_minimum_delay") {
            config::update_minimum_delay(env, &caller, arg(env, args, 1)?)?;
        } else if name("update_maximum_delay") {
            config::update_maximum_delay(env, &caller, arg(env, args, 1)?)?;
        } else if name("set_amb") {
            config::set_amb(env, &caller, arg(env, args, 1)?)?;
        } else if name("set_controller") {
            config::set_controller(env, &caller, arg(env, args, 1)?)?;
        } else if name("set_chain_id") {
            config::set_chain_id(env, &caller, arg(env, args, 1)?)?;
        } else if name("update_fx_child") {
            config::update_fx_child(env, &caller, arg(env, args, 1)?)?;
        } else if name("update_fx_root_sender") {
            config::update_fx_root_sender(env, &caller, arg(env, args, 1)?)?;
        } else if name("update_relayer") {
            config::update_relayer(env, &caller, arg(env, args, 1)?)?;
        } else if name("execute") {
            // Another ActionsSet; its own checks still apply.
            config::require_self(env, &caller)?;
            let nested = self.execute(&caller, arg(env, args, 1)?)?;
            return Ok(nested.into_val(env));
        } else {
            return Err(ExecutorError::FailedActionExecution);
        }
        Ok(().into_val(env))
    }
}

fn arg<T: TryFromVal<Env, Val>>(env: &Env, args: &Vec<Val>, index: u32) -> Result<T, ExecutorError> {
    let val = args.get(index).ok_or(ExecutorError::FailedActionExecution)?;
    T::try_from_val(env, &val).map_err(|_| ExecutorError::FailedActionExecution)
}

/// No function and no calldata: the action only pays `value` to `target`.
pub(crate) fn is_plain_transfer(action: &Action) -> bool {
    action.signature.len() == 0 && action.calldata.is_empty() && !action.with_delegatecall
}

/// Resolve the function and arguments of `action`.
///
/// With a signature, the calldata holds the XDR of the argument vector
/// (empty means no arguments).  Without one, the calldata holds the XDR of
/// the whole `(function, args)` call.
pub(crate) fn build_call(env: &Env, action: &Action) -> Result<(Symbol, Vec<Val>), ExecutorError> {
    if action.signature.len() == 0 {
        if action.calldata.is_empty() {
            return Err(ExecutorError::FailedActionExecution);
        }
        let call = Vec::<Val>::from_xdr(env, &action.calldata)
            .map_err(|_| ExecutorError::FailedActionExecution)?;
        if call.len() != 2 {
            return Err(ExecutorError::FailedActionExecution);
        }
        return Ok((arg(env, &call, 0)?, arg(env, &call, 1)?));
    }

    let function = function_symbol(env, &action.signature)?;
    let args = if action.calldata.is_empty() {
        Vec::new(env)
    } else {
        Vec::<Val>::from_xdr(env, &action.calldata)
            .map_err(|_| ExecutorError::FailedActionExecution)?
    };
    Ok((function, args))
}

/// Convert a signature to a `Symbol`, rejecting anything the host would
/// trap on.
pub(crate) fn function_symbol(env: &Env, signature: &String) -> Result<Symbol, ExecutorError> {
    let len = signature.len() as usize;
    if len == 0 || len > MAX_SYMBOL_LEN {
        return Err(ExecutorError::FailedActionExecution);
    }
    let mut buf = [0u8; MAX_SYMBOL_LEN];
    signature.copy_into_slice(&mut buf[..len]);
    let name = &buf[..len];
    if !name
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'_')
    {
        return Err(ExecutorError::FailedActionExecution);
    }
    let name = core::str::from_utf8(name).map_err(|_| ExecutorError::FailedActionExecution)?;
    Ok(Symbol::new(env, name))
}
