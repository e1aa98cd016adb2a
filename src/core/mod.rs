//! Core block abstractions and types
//!
//! This module defines the block trait, metadata, prop schemas, block
//! instances, the render tree, and the registry that ties them together.

pub mod block;
pub mod instance;
pub mod node;
pub mod registry;
pub mod schema;

pub use block::{define_block, AiCapabilities, Block, BlockError, BlockMeta, BlockServerContext, FnBlock};
pub use instance::{BlockInstance, PageDocument};
pub use node::{Element, Node};
pub use registry::BlockRegistry;
pub use schema::{BlockSchema, PropType, ValidationResult};

/// Prop values passed to a block's render function
pub type Props = serde_json::Map<String, serde_json::Value>;
