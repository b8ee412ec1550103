//! Ordered successor-producing stages.
//!
//! Each stage either handles the step or passes it to the next one. A stage
//! error stops the chain.

use bureau_state::ExecutionState;
use tracing::trace;

use crate::error::Result;
use crate::successors::Successors;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Handled,
    Pass,
}

pub trait SuccessorsStage<S: ExecutionState>: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce successors for `state`, or pass without touching `successors`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::DispatchError`] if the step can neither be handled
    /// nor passed on.
    fn process(&self, state: &mut S, successors: &mut Successors<S>) -> Result<Flow>;
}

pub struct StageChain<S> {
    stages: Vec<Box<dyn SuccessorsStage<S>>>,
}

impl<S: ExecutionState> Default for StageChain<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ExecutionState> StageChain<S> {
    #[must_use]
    pub const fn new() -> Self {
        Self { stages: Vec::new() }
    }

    #[must_use]
    pub fn with_stage(mut self, stage: impl SuccessorsStage<S> + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run stages in order until one handles the step.
    ///
    /// Returns the name of the handling stage, or `None` if every stage passed.
    ///
    /// # Errors
    ///
    /// Returns the first stage error. Later stages do not run.
    pub fn process(
        &self,
        state: &mut S,
        successors: &mut Successors<S>,
    ) -> Result<Option<&'static str>> {
        for stage in &self.stages {
            if stage.process(state, successors)? == Flow::Handled {
                trace!(stage = stage.name(), "handled");
                return Ok(Some(stage.name()));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use bureau_state::SimState;

    struct Always(&'static str, Flow);

    impl SuccessorsStage<SimState> for Always {
        fn name(&self) -> &'static str {
            self.0
        }

        fn process(&self, _: &mut SimState, succ: &mut Successors<SimState>) -> Result<Flow> {
            if self.1 == Flow::Handled {
                succ.description = self.0.to_string();
                succ.processed = true;
            }
            Ok(self.1)
        }
    }

    struct Failing;

    impl SuccessorsStage<SimState> for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn process(&self, _: &mut SimState, _: &mut Successors<SimState>) -> Result<Flow> {
            Err(DispatchError::UnsatisfiableState)
        }
    }

    #[test]
    fn test_first_handler_wins() {
        let chain = StageChain::new()
            .with_stage(Always("a", Flow::Pass))
            .with_stage(Always("b", Flow::Handled))
            .with_stage(Always("c", Flow::Handled));
        let mut succ = Successors::new();
        let handled = chain.process(&mut SimState::new(), &mut succ).unwrap();
        assert_eq!(handled, Some("b"));
        assert_eq!(succ.description, "b");
    }

    #[test]
    fn test_all_pass() {
        let chain = StageChain::new().with_stage(Always("a", Flow::Pass));
        let mut succ = Successors::new();
        let handled = chain.process(&mut SimState::new(), &mut succ).unwrap();
        assert_eq!(handled, None);
        assert!(!succ.processed);
    }

    #[test]
    fn test_error_stops_chain() {
        let chain = StageChain::new()
            .with_stage(Failing)
            .with_stage(Always("b", Flow::Handled));
        let mut succ = Successors::new();
        assert!(chain.process(&mut SimState::new(), &mut succ).is_err());
        assert!(succ.description.is_empty());
        assert_eq!(chain.stage_names(), vec!["failing", "b"]);
    }
}
