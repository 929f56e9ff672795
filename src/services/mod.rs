pub mod content;
pub mod exclusion;
pub mod orchestrator;
pub mod partitioner;
pub mod reconciler;

pub use exclusion::ExclusionMatcher;
pub use orchestrator::SyncOrchestrator;
pub use partitioner::{ensure_disjoint, DirectoryPartitioner};
pub use reconciler::{ReconcileSettings, Reconciler};
