pub mod bridge;
pub mod folding;
pub mod host;
pub mod utils;

pub use bridge::BridgeServer;
pub use folding::{FoldingOrchestrator, FoldingRange};
pub use utils::config::Config;
pub use utils::error::{Error, Result};
