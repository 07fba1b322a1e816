#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Bytes, Env, String, Vec};

use bridge_executor::{
    decoder::{decode, ActionsSetPayload},
    errors::ExecutorError,
};

/// Shape of a well-typed payload. Sequence lengths are independent so that
/// length mismatches and negative values are generated regularly.
#[derive(Arbitrary, Debug)]
pub struct FuzzPayload {
    targets: u8,
    values: std::vec::Vec<i64>,
    signatures: u8,
    calldatas: std::vec::Vec<std::vec::Vec<u8>>,
    delegatecalls: std::vec::Vec<bool>,
}

fuzz_target!(|input: FuzzPayload| {
    let env = Env::default();

    let n_targets = (input.targets % 6) as usize;
    let mut p = ActionsSetPayload {
        targets: Vec::new(&env),
        values: Vec::new(&env),
        signatures: Vec::new(&env),
        calldatas: Vec::new(&env),
        with_delegatecalls: Vec::new(&env),
    };
    for _ in 0..n_targets {
        p.targets.push_back(Address::generate(&env));
    }
    for v in input.values.iter().take(6) {
        p.values.push_back(*v as i128);
    }
    for _ in 0..(input.signatures % 6) {
        p.signatures.push_back(String::from_str(&env, "record"));
    }
    for c in input.calldatas.iter().take(6) {
        p.calldatas.push_back(Bytes::from_slice(&env, c));
    }
    for d in input.delegatecalls.iter().take(6) {
        p.with_delegatecalls.push_back(*d);
    }

    let n = p.targets.len();
    let expected = if n == 0 {
        Err(ExecutorError::EmptyTargets)
    } else if p.values.len() != n
        || p.signatures.len() != n
        || p.calldatas.len() != n
        || p.with_delegatecalls.len() != n
    {
        Err(ExecutorError::InconsistentParamsLength)
    } else if p.values.iter().any(|v| v < 0) {
        Err(ExecutorError::InvalidActionValue)
    } else {
        Ok(p.clone())
    };

    assert_eq!(decode(&env, &p.to_payload(&env)), expected);
});
