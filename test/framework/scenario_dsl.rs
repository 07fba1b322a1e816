//! # Scenario DSL
//!
//! Given/When/Then scenarios over a fresh [`ExecutorTestHarness`].
//!
//! ```rust,ignore
//! Scenario::new("Queued batch executes after the delay")
//!     .given(|ctx| {
//!         let id = ctx.harness.queue(&[ctx.harness.record_call(7)]);
//!         ctx.ids.push(id);
//!     })
//!     .when("the delay elapses", |ctx| {
//!         ctx.harness.env.advance_time(50);
//!         ctx.harness.execute(ctx.ids[0]);
//!     })
//!     .then("the set is executed", |ctx| {
//!         assert_eq!(ctx.harness.state(ctx.ids[0]), ActionsSetState::Executed);
//!     })
//!     .run();
//! ```
//!
//! Steps run in phase order regardless of the order they were added. A
//! failing step is reported with its phase and label before the panic is
//! propagated.

extern crate std;

use std::boxed::Box;
use std::panic::{catch_unwind, resume_unwind, AssertUnwindSafe};
use std::string::String;
use std::vec::Vec;

use super::invariants::InvariantSet;
use super::{ExecutorParams, ExecutorTestHarness, TestEnv};

/// State shared by the steps of one scenario.
pub struct ScenarioContext<'a, 'b> {
    pub harness: &'a ExecutorTestHarness<'b>,
    /// ActionsSet ids queued so far, in queue order.
    pub ids: Vec<u64>,
}

type StepFn = Box<dyn FnOnce(&mut ScenarioContext<'_, '_>)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Given,
    When,
    Then,
}

struct Step {
    phase: Phase,
    label: String,
    body: StepFn,
}

pub struct Scenario {
    name: String,
    params: ExecutorParams,
    steps: Vec<Step>,
    invariants: Option<InvariantSet>,
}

impl Scenario {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            params: ExecutorParams::default(),
            steps: Vec::new(),
            invariants: None,
        }
    }

    pub fn with_params(mut self, params: ExecutorParams) -> Self {
        self.params = params;
        self
    }

    /// Invariants checked once every `when` step has run.
    pub fn with_invariants(mut self, invariants: InvariantSet) -> Self {
        self.invariants = Some(invariants);
        self
    }

    pub fn given<F>(self, body: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext<'_, '_>) + 'static,
    {
        self.step(Phase::Given, "setup", body)
    }

    pub fn when<F>(self, label: &str, body: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext<'_, '_>) + 'static,
    {
        self.step(Phase::When, label, body)
    }

    pub fn then<F>(self, label: &str, body: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext<'_, '_>) + 'static,
    {
        self.step(Phase::Then, label, body)
    }

    fn step<F>(mut self, phase: Phase, label: &str, body: F) -> Self
    where
        F: FnOnce(&mut ScenarioContext<'_, '_>) + 'static,
    {
        self.steps.push(Step {
            phase,
            label: label.into(),
            body: Box::new(body),
        });
        self
    }

    /// Run against a freshly initialised executor. Panics on the first
    /// failing step or invariant.
    pub fn run(mut self) {
        let mut env = TestEnv::new();
        let harness = ExecutorTestHarness::new(&mut env, self.params);
        let mut ctx = ScenarioContext {
            harness: &harness,
            ids: Vec::new(),
        };

        self.steps.sort_by_key(|s| s.phase);
        let mut checked = false;
        for step in self.steps {
            if step.phase == Phase::Then && !checked {
                check_invariants(&self.name, self.invariants.as_ref(), &harness);
                checked = true;
            }
            let Step { phase, label, body } = step;
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| body(&mut ctx))) {
                std::eprintln!("scenario '{}' failed in {:?} '{}'", self.name, phase, label);
                resume_unwind(panic);
            }
        }
        if !checked {
            check_invariants(&self.name, self.invariants.as_ref(), &harness);
        }
    }
}

fn check_invariants(name: &str, invariants: Option<&InvariantSet>, harness: &ExecutorTestHarness<'_>) {
    let Some(invariants) = invariants else {
        return;
    };
    let violations = invariants.check_all(&harness.snapshot());
    if !violations.is_empty() {
        let lines: Vec<String> = violations
            .iter()
            .map(|(invariant, msg)| std::format!("  [{}] {}", invariant, msg))
            .collect();
        panic!("scenario '{}' broke invariants:\n{}", name, lines.join("\n"));
    }
}

/// Assert that a `try_*` client call failed with the given contract error.
#[macro_export]
macro_rules! assert_contract_error {
    ($result:expr, $expected:expr) => {
        match $result {
            Err(Ok(e)) => assert_eq!(e, $expected),
            Err(Err(e)) => panic!("host error instead of {:?}: {:?}", $expected, e),
            Ok(_) => panic!("call succeeded, expected {:?}", $expected),
        }
    };
}

/// Run every scenario, returning `(passed, failed)`.
pub fn run_scenarios(scenarios: Vec<Scenario>) -> (usize, usize) {
    let mut passed = 0;
    let mut failed = 0;
    for scenario in scenarios {
        let name = scenario.name.clone();
        if catch_unwind(AssertUnwindSafe(|| scenario.run())).is_ok() {
            passed += 1;
        } else {
            std::eprintln!("FAILED: {}", name);
            failed += 1;
        }
    }
    (passed, failed)
}
