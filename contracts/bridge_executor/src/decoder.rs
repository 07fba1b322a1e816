//! Decodes an admitted payload into the five parallel ActionsSet sequences.
//!
//! Wire format: XDR of the tuple
//! `(Vec<Address>, Vec<i128>, Vec<String>, Vec<Bytes>, Vec<bool>)`.
//! Bytes that are not XDR at all are rejected by the host before the
//! contract sees them; a well-formed value of the wrong shape is reported as
//! [`ExecutorError::MalformedPayload`].

use soroban_sdk::xdr::{FromXdr, ToXdr};
use soroban_sdk::{Address, Bytes, Env, String, TryFromVal, Val, Vec};

use crate::errors::ExecutorError;

/// Number of parallel sequences in the wire tuple.
const WIRE_FIELDS: u32 = 5;

/// The decoded batch, not yet assigned an id or execution time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionsSetPayload {
    pub targets: Vec<Address>,
    pub values: Vec<i128>,
    pub signatures: Vec<String>,
    pub calldatas: Vec<Bytes>,
    pub with_delegatecalls: Vec<bool>,
}

impl ActionsSetPayload {
    /// Encode into the wire format accepted by [`decode`].
    pub fn to_payload(&self, env: &Env) -> Bytes {
        (
            self.targets.clone(),
            self.values.clone(),
            self.signatures.clone(),
            self.calldatas.clone(),
            self.with_delegatecalls.clone(),
        )
            .to_xdr(env)
    }
}

pub fn decode(env: &Env, payload: &Bytes) -> Result<ActionsSetPayload, ExecutorError> {
    // A tuple is an `ScVec` on the wire. Unpacking one of the wrong arity
    // straight into a tuple traps the host, so check the arity first.
    let fields = Vec::<Val>::from_xdr(env, payload).map_err(|_| ExecutorError::MalformedPayload)?;
    if fields.len() != WIRE_FIELDS {
        return Err(ExecutorError::MalformedPayload);
    }
    let targets: Vec<Address> = field(env, &fields, 0)?;
    let values: Vec<i128> = field(env, &fields, 1)?;
    let signatures: Vec<String> = field(env, &fields, 2)?;
    let calldatas: Vec<Bytes> = field(env, &fields, 3)?;
    let with_delegatecalls: Vec<bool> = field(env, &fields, 4)?;

    let n = targets.len();
    if n == 0 {
        return Err(ExecutorError::EmptyTargets);
    }
    if values.len() != n
        || signatures.len() != n
        || calldatas.len() != n
        || with_delegatecalls.len() != n
    {
        return Err(ExecutorError::InconsistentParamsLength);
    }

    // Vec elements are only type-checked on access; check them all up front
    // so the executor never traps on a stored record.
    for i in 0..n {
        targets
            .try_get(i)
            .map_err(|_| ExecutorError::MalformedPayload)?;
        let value = values
            .try_get(i)
            .map_err(|_| ExecutorError::MalformedPayload)?
            .unwrap_or(0);
        if value < 0 {
            return Err(ExecutorError::InvalidActionValue);
        }
        signatures
            .try_get(i)
            .map_err(|_| ExecutorError::MalformedPayload)?;
        calldatas
            .try_get(i)
            .map_err(|_| ExecutorError::MalformedPayload)?;
        with_delegatecalls
            .try_get(i)
            .map_err(|_| ExecutorError::MalformedPayload)?;
    }

    Ok(ActionsSetPayload {
        targets,
        values,
        signatures,
        calldatas,
        with_delegatecalls,
    })
}

fn field<T: TryFromVal<Env, Val>>(env: &Env, fields: &Vec<Val>, index: u32) -> Result<T, ExecutorError> {
    let val = fields
        .try_get(index)
        .ok()
        .flatten()
        .ok_or(ExecutorError::MalformedPayload)?;
    T::try_from_val(env, &val).map_err(|_| ExecutorError::MalformedPayload)
}
