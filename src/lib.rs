//! pagekit - File-system page routing and block composition
//!
//! This crate turns a directory of page files into an ordered route table and
//! renders declarative block trees into HTML. It includes the block registry,
//! the blockpack marketplace, the composition engine, and the router.

pub mod categories;
pub mod config;
pub mod core;
pub mod marketplace;
pub mod routing;
pub mod runtime;
pub mod site;
mod tests;

// Re-export commonly used types
pub use categories::{register_default_blocks, BlockCategory};
pub use config::SiteConfig;
pub use core::{define_block, Block, BlockInstance, BlockMeta, BlockRegistry, Node, PageDocument};
pub use marketplace::{Blockpack, MarketplaceRegistry};
pub use routing::{build_routes, match_route, RouteRecord, RouteTable};
pub use runtime::BlockRenderer;
pub use site::{PageOutcome, Site};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
