#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    xdr::ToXdr,
    Address, BytesN, Env, IntoVal, String, Val, Vec,
};

use bridge_executor::{
    actions_set::ActionsSetState,
    admission::{AmbIdentity, BridgeIdentity},
    decoder::ActionsSetPayload,
    BridgeExecutorContract, BridgeExecutorContractClient,
};
use bridge_mocks::{MockAmb, MockAmbClient, MockTarget};

const DELAY: u64 = 50;
const GRACE: u64 = 1_000;

/// Actions modelling the executor lifecycle entry points.
///
/// Ids and values are kept small so that executes, cancels and duplicate
/// actions hit existing ActionsSets often.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Queue { values: std::vec::Vec<u8> },
    Execute { id: u8 },
    Cancel { id: u8, by_guardian: bool },
    AmendDelay { delay: u8 },
    AdvanceTime { delta: u16 },
}

fuzz_target!(|actions: std::vec::Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let guardian = Address::generate(&env);
    let stranger = Address::generate(&env);
    let native = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let chain_id = BytesN::from_array(&env, &[1u8; 32]);
    let controller = BytesN::from_array(&env, &[2u8; 32]);

    let contract_id = env.register(BridgeExecutorContract, ());
    let client = BridgeExecutorContractClient::new(&env, &contract_id);
    let amb_id = env.register(MockAmb, ());
    let amb = MockAmbClient::new(&env, &amb_id);
    let target_id = env.register(MockTarget, ());

    let bridge = BridgeIdentity::Amb(AmbIdentity {
        amb: amb_id.clone(),
        controller: controller.clone(),
        chain_id: chain_id.clone(),
    });
    if client
        .try_initialize(&bridge, &native, &DELAY, &GRACE, &1u64, &200u64, &guardian)
        .is_err()
    {
        return;
    }

    let batch = |function: &str, args: &[(Address, std::vec::Vec<Val>)]| {
        let mut p = ActionsSetPayload {
            targets: Vec::new(&env),
            values: Vec::new(&env),
            signatures: Vec::new(&env),
            calldatas: Vec::new(&env),
            with_delegatecalls: Vec::new(&env),
        };
        for (target, call_args) in args {
            let mut encoded: Vec<Val> = Vec::new(&env);
            for a in call_args {
                encoded.push_back(*a);
            }
            p.targets.push_back(target.clone());
            p.values.push_back(0);
            p.signatures.push_back(String::from_str(&env, function));
            p.calldatas.push_back(encoded.to_xdr(&env));
            p.with_delegatecalls.push_back(false);
        }
        p.to_payload(&env)
    };

    for action in actions.into_iter().take(64) {
        let before_count = client.get_actions_set_count();
        let before_delay = client.get_delay();
        let now = env.ledger().timestamp();

        match action {
            FuzzAction::Queue { values } => {
                if values.is_empty() {
                    continue;
                }
                let calls: std::vec::Vec<_> = values
                    .iter()
                    .take(4)
                    .map(|v| {
                        let arg: Val = (*v as u64).into_val(&env);
                        (target_id.clone(), std::vec![arg])
                    })
                    .collect();
                let payload = batch("record", &calls);
                let result =
                    client.try_process_message_from_amb(&amb_id, &chain_id, &controller, &payload);
                if let Ok(Ok(id)) = result {
                    assert_eq!(id, before_count, "INVARIANT VIOLATION: id not sequential");
                    let set = client.get_actions_set_by_id(&id);
                    assert_eq!(
                        set.execution_time,
                        now.saturating_add(before_delay),
                        "INVARIANT VIOLATION: execution time != now + delay"
                    );
                }
            }
            FuzzAction::Execute { id } => {
                let id = id as u64 % 8;
                let prior = client.try_get_current_state(&id);
                let ok = client.try_execute(&guardian, &id).is_ok();
                if ok {
                    assert_eq!(
                        prior,
                        Ok(Ok(ActionsSetState::Queued)),
                        "INVARIANT VIOLATION: executed a set that was not queued"
                    );
                    let set = client.get_actions_set_by_id(&id);
                    assert!(now >= set.execution_time, "INVARIANT VIOLATION: timelock skipped");
                }
            }
            FuzzAction::Cancel { id, by_guardian } => {
                let id = id as u64 % 8;
                let caller = if by_guardian { &guardian } else { &stranger };
                let ok = client.try_cancel(caller, &id).is_ok();
                assert!(!ok || by_guardian, "INVARIANT VIOLATION: stranger canceled");
            }
            FuzzAction::AmendDelay { delay } => {
                let caller: Val = contract_id.into_val(&env);
                let value: Val = (delay as u64).into_val(&env);
                let payload = batch(
                    "update_delay",
                    &[(contract_id.clone(), std::vec![caller, value])],
                );
                let _ = amb.try_deliver(&contract_id, &chain_id, &controller, &payload);
            }
            FuzzAction::AdvanceTime { delta } => {
                env.ledger().set_timestamp(now.saturating_add(delta as u64));
            }
        }

        // ── Post-action invariant checks ──
        let delay = client.get_delay();
        assert!(
            (client.get_minimum_delay()..=client.get_maximum_delay()).contains(&delay),
            "INVARIANT VIOLATION: delay out of bounds"
        );
        let count = client.get_actions_set_count();
        assert!(count >= before_count, "INVARIANT VIOLATION: count decreased");
        for id in 0..count {
            let set = client.get_actions_set_by_id(&id);
            assert!(
                !(set.executed && set.canceled),
                "INVARIANT VIOLATION: set {} executed and canceled",
                id
            );
        }
    }
});
