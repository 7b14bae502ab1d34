use super::clock::Clock;
use super::domain::{CaseSituation, ComputationResult};
use super::engine::DeadlineEngine;
use chrono::NaiveDate;

/// Engine paired with the clock that supplies `now` when the caller does not.
#[derive(Debug, Default)]
pub struct DeadlineService {
    engine: DeadlineEngine,
    clock: Clock,
}

impl DeadlineService {
    pub fn new(engine: DeadlineEngine, clock: Clock) -> Self {
        Self { engine, clock }
    }

    pub fn standard(clock: Clock) -> Self {
        Self::new(DeadlineEngine::standard(), clock)
    }

    pub fn engine(&self) -> &DeadlineEngine {
        &self.engine
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Evaluates the case as of `today`, or as of the clock's date when absent.
    /// The date is read once so the whole result shares it.
    pub fn compute(&self, situation: &CaseSituation, today: Option<NaiveDate>) -> ComputationResult {
        let now = self.clock.resolve(today);
        self.engine.compute(situation, now)
    }
}
