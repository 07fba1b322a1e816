//! # State Invariant Definitions & Verification
//!
//! Defines invariants that must hold across all executor state transitions.
//! Invariants are checked after every action during state exploration and
//! can be composed via the `InvariantSet` builder.
//!
//! ## Complexity
//!
//! Each check is O(n) in the number of ActionsSets in the snapshot.

extern crate std;

use std::boxed::Box;
use std::string::String;
use std::vec::Vec;

use bridge_executor::actions_set::ActionsSetState;

use super::generators::MINIMUM_GRACE_PERIOD;
use super::ExecutorSnapshot;

// ── Invariant Trait ──────────────────────────────────────────────────────────

/// A named invariant that can be verified against a state snapshot.
pub trait Invariant {
    /// Human-readable name for error messages.
    fn name(&self) -> &str;

    /// Check the invariant. Returns `Ok(())` on success, `Err(description)` on violation.
    fn check(&self, snapshot: &ExecutorSnapshot) -> Result<(), String>;
}

// ── Built-in Invariants ──────────────────────────────────────────────────────

/// **Delay Bounds**: `minimum_delay <= delay <= maximum_delay`.
pub struct DelayWithinBounds;

impl Invariant for DelayWithinBounds {
    fn name(&self) -> &str {
        "minimum_delay <= delay <= maximum_delay"
    }

    fn check(&self, snapshot: &ExecutorSnapshot) -> Result<(), String> {
        if snapshot.delay < snapshot.minimum_delay || snapshot.delay > snapshot.maximum_delay {
            return Err(std::format!(
                "delay {} outside [{}, {}]",
                snapshot.delay,
                snapshot.minimum_delay,
                snapshot.maximum_delay
            ));
        }
        Ok(())
    }
}

/// **Grace Floor**: `grace_period >= MINIMUM_GRACE_PERIOD`.
pub struct GracePeriodFloor;

impl Invariant for GracePeriodFloor {
    fn name(&self) -> &str {
        "grace_period >= minimum grace period"
    }

    fn check(&self, snapshot: &ExecutorSnapshot) -> Result<(), String> {
        if snapshot.grace_period < MINIMUM_GRACE_PERIOD {
            return Err(std::format!(
                "grace period {} below {}",
                snapshot.grace_period,
                MINIMUM_GRACE_PERIOD
            ));
        }
        Ok(())
    }
}

/// **Sequential Ids**: the stored sets are exactly `0..count`.
pub struct SequentialIds;

impl Invariant for SequentialIds {
    fn name(&self) -> &str {
        "ids == 0..count"
    }

    fn check(&self, snapshot: &ExecutorSnapshot) -> Result<(), String> {
        if snapshot.sets.len() as u64 != snapshot.count {
            return Err(std::format!(
                "count {} but {} sets stored",
                snapshot.count,
                snapshot.sets.len()
            ));
        }
        for (i, set) in snapshot.sets.iter().enumerate() {
            if set.id != i as u64 {
                return Err(std::format!("set at position {} has id {}", i, set.id));
            }
        }
        Ok(())
    }
}

/// **Exclusive Terminal Flags**: no set is both executed and canceled.
pub struct ExclusiveTerminalFlags;

impl Invariant for ExclusiveTerminalFlags {
    fn name(&self) -> &str {
        "!(executed && canceled)"
    }

    fn check(&self, snapshot: &ExecutorSnapshot) -> Result<(), String> {
        for set in &snapshot.sets {
            if set.executed && set.canceled {
                return Err(std::format!("set {} is executed and canceled", set.id));
            }
        }
        Ok(())
    }
}

/// **Derived State**: the reported state follows from the flags and time.
pub struct DerivedStateConsistent;

impl Invariant for DerivedStateConsistent {
    fn name(&self) -> &str {
        "state == f(flags, now, execution_time, grace)"
    }

    fn check(&self, snapshot: &ExecutorSnapshot) -> Result<(), String> {
        for set in &snapshot.sets {
            let expected = if set.canceled {
                ActionsSetState::Canceled
            } else if set.executed {
                ActionsSetState::Executed
            } else if snapshot.timestamp
                >= set.execution_time.saturating_add(snapshot.grace_period)
            {
                ActionsSetState::Expired
            } else {
                ActionsSetState::Queued
            };
            if set.state != expected {
                return Err(std::format!(
                    "set {} reports {:?}, expected {:?}",
                    set.id,
                    set.state,
                    expected
                ));
            }
        }
        Ok(())
    }
}

/// **Non-Empty Batches**: every stored set carries at least one action.
pub struct NonEmptyBatches;

impl Invariant for NonEmptyBatches {
    fn name(&self) -> &str {
        "every set has >= 1 action"
    }

    fn check(&self, snapshot: &ExecutorSnapshot) -> Result<(), String> {
        match snapshot.sets.iter().find(|s| s.action_count == 0) {
            Some(set) => Err(std::format!("set {} is empty", set.id)),
            None => Ok(()),
        }
    }
}

// ── Invariant Set ────────────────────────────────────────────────────────────

/// A composable collection of invariants.
pub struct InvariantSet {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantSet {
    /// Create an empty invariant set.
    pub fn new() -> Self {
        Self {
            invariants: Vec::new(),
        }
    }

    /// All built-in executor invariants.
    pub fn executor_defaults() -> Self {
        let mut set = Self::new();
        set.add(Box::new(DelayWithinBounds));
        set.add(Box::new(GracePeriodFloor));
        set.add(Box::new(SequentialIds));
        set.add(Box::new(ExclusiveTerminalFlags));
        set.add(Box::new(DerivedStateConsistent));
        set.add(Box::new(NonEmptyBatches));
        set
    }

    pub fn add(&mut self, invariant: Box<dyn Invariant>) {
        self.invariants.push(invariant);
    }

    /// Check all invariants, returning `(name, message)` for each violation.
    pub fn check_all(&self, snapshot: &ExecutorSnapshot) -> Vec<(String, String)> {
        self.invariants
            .iter()
            .filter_map(|inv| {
                inv.check(snapshot)
                    .err()
                    .map(|msg| (String::from(inv.name()), msg))
            })
            .collect()
    }

    /// Panic with a full report if any invariant is violated.
    pub fn assert_all(&self, snapshot: &ExecutorSnapshot) {
        let violations = self.check_all(snapshot);
        if !violations.is_empty() {
            let mut report = String::from("Invariant violations:\n");
            for (name, msg) in &violations {
                report.push_str(&std::format!("  [{}]: {}\n", name, msg));
            }
            panic!("{}", report);
        }
    }

    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl Default for InvariantSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Transition Invariants ────────────────────────────────────────────────────

/// An invariant over a pair of consecutive snapshots.
pub trait TransitionInvariant {
    fn name(&self) -> &str;
    fn check(&self, before: &ExecutorSnapshot, after: &ExecutorSnapshot) -> Result<(), String>;
}

/// **Terminal States Are Final**: executed and canceled flags never clear.
pub struct TerminalStatesAreFinal;

impl TransitionInvariant for TerminalStatesAreFinal {
    fn name(&self) -> &str {
        "executed/canceled flags are permanent"
    }

    fn check(&self, before: &ExecutorSnapshot, after: &ExecutorSnapshot) -> Result<(), String> {
        for old in &before.sets {
            let new = after
                .set(old.id)
                .ok_or_else(|| std::format!("set {} disappeared", old.id))?;
            if (old.executed && !new.executed) || (old.canceled && !new.canceled) {
                return Err(std::format!(
                    "set {} left a terminal state: {:?} -> {:?}",
                    old.id,
                    old.state,
                    new.state
                ));
            }
        }
        Ok(())
    }
}

/// **Execution Time Immutable**: a set's execution time never changes,
/// even across delay amendments.
pub struct ExecutionTimeImmutable;

impl TransitionInvariant for ExecutionTimeImmutable {
    fn name(&self) -> &str {
        "execution_time is fixed at queue time"
    }

    fn check(&self, before: &ExecutorSnapshot, after: &ExecutorSnapshot) -> Result<(), String> {
        for old in &before.sets {
            if let Some(new) = after.set(old.id) {
                if new.execution_time != old.execution_time {
                    return Err(std::format!(
                        "set {} execution time {} -> {}",
                        old.id,
                        old.execution_time,
                        new.execution_time
                    ));
                }
            }
        }
        Ok(())
    }
}

/// **Queue Timing**: a newly queued set runs at `queue time + delay`.
pub struct QueueTiming;

impl TransitionInvariant for QueueTiming {
    fn name(&self) -> &str {
        "new set execution_time == now + delay"
    }

    fn check(&self, before: &ExecutorSnapshot, after: &ExecutorSnapshot) -> Result<(), String> {
        for new in after.sets.iter().skip(before.sets.len()) {
            let expected = after.timestamp.saturating_add(before.delay);
            if new.execution_time != expected {
                return Err(std::format!(
                    "set {} execution time {} != {}",
                    new.id,
                    new.execution_time,
                    expected
                ));
            }
        }
        Ok(())
    }
}

/// **Count Monotonic**: the ActionsSet count never decreases.
pub struct CountMonotonic;

impl TransitionInvariant for CountMonotonic {
    fn name(&self) -> &str {
        "count never decreases"
    }

    fn check(&self, before: &ExecutorSnapshot, after: &ExecutorSnapshot) -> Result<(), String> {
        if after.count < before.count {
            return Err(std::format!("count {} -> {}", before.count, after.count));
        }
        Ok(())
    }
}

/// A composable collection of transition invariants.
pub struct TransitionInvariantSet {
    invariants: Vec<Box<dyn TransitionInvariant>>,
}

impl TransitionInvariantSet {
    pub fn new() -> Self {
        Self {
            invariants: Vec::new(),
        }
    }

    pub fn executor_defaults() -> Self {
        let mut set = Self::new();
        set.add(Box::new(TerminalStatesAreFinal));
        set.add(Box::new(ExecutionTimeImmutable));
        set.add(Box::new(QueueTiming));
        set.add(Box::new(CountMonotonic));
        set
    }

    pub fn add(&mut self, invariant: Box<dyn TransitionInvariant>) {
        self.invariants.push(invariant);
    }

    pub fn check_all(
        &self,
        before: &ExecutorSnapshot,
        after: &ExecutorSnapshot,
    ) -> Vec<(String, String)> {
        self.invariants
            .iter()
            .filter_map(|inv| {
                inv.check(before, after)
                    .err()
                    .map(|msg| (String::from(inv.name()), msg))
            })
            .collect()
    }

    pub fn assert_all(&self, before: &ExecutorSnapshot, after: &ExecutorSnapshot) {
        let violations = self.check_all(before, after);
        if !violations.is_empty() {
            let mut report = String::from("Transition invariant violations:\n");
            for (name, msg) in &violations {
                report.push_str(&std::format!("  [{}]: {}\n", name, msg));
            }
            panic!("{}", report);
        }
    }
}

impl Default for TransitionInvariantSet {
    fn default() -> Self {
        Self::new()
    }
}
