//! Folding-range retrieval
//!
//! A command invocation flows readiness -> capability -> request -> filter/sort;
//! buffer mutation events cancel whatever request is in flight for that buffer.

pub mod capability;
pub mod filter;
pub mod lifecycle;
pub mod orchestrator;
pub mod range;
pub mod readiness;
pub mod registry;
pub mod requester;

pub use capability::CapabilityProbe;
pub use filter::RangeFilterSorter;
pub use lifecycle::{LifecycleNotifier, LifecycleState};
pub use orchestrator::{Collaborators, FoldingOrchestrator};
pub use range::FoldingRange;
pub use readiness::DocumentReadinessWaiter;
pub use registry::{BufferRequestRegistry, Registration};
pub use requester::FoldingRangeRequester;
