use super::goals_model::Goal;

/// Recomputes the progress percentage of numeric and habit goals when they
/// are saved.
///
/// The service clamps whatever this returns into `[0, 100]`, so
/// implementations do not need to.
pub trait ProgressDerivation: Send + Sync {
    fn derive(&self, goal: &Goal) -> f64;
}

/// Leaves the stored progress as it is.
///
/// This is the default derivation; deployments that know how their targets
/// translate to a percentage inject their own.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepStoredProgress;

impl ProgressDerivation for KeepStoredProgress {
    fn derive(&self, goal: &Goal) -> f64 {
        goal.progress
    }
}
