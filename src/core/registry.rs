//! Block Registry - Central registry for all renderable blocks
//!
//! This module provides a registry for registering, discovering, and looking
//! up blocks by name. It supports:
//! - Registration with overwrite-on-duplicate semantics
//! - Lookup by name, by category, or by search query
//! - Stable registration order for listings

use crate::categories::BlockCategory;
use crate::core::block::Block;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Blocks in registration order plus a name index into that order
#[derive(Default)]
struct Entries {
    order: Vec<Arc<dyn Block>>,
    index: HashMap<String, usize>,
}

/// Block registry keyed by `BlockMeta::name`
///
/// The registry is a cheap handle over `Arc<RwLock<..>>`: clones share the
/// same entries. Reads run concurrently; writes are exclusive.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    blocks: Arc<RwLock<Entries>>,
}

impl BlockRegistry {
    /// Create a new empty block registry
    ///
    /// # Example
    /// ```
    /// use pagekit::core::registry::BlockRegistry;
    ///
    /// let registry = BlockRegistry::new();
    /// assert_eq!(registry.count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block under its metadata name
    ///
    /// Registering a name that is already present replaces the previous block
    /// in place (it keeps its position in `all()`) and logs a warning. The
    /// replaced block is returned.
    pub fn register(&self, block: Arc<dyn Block>) -> Option<Arc<dyn Block>> {
        let name = block.meta().name.clone();
        let mut entries = self.blocks.write();

        match entries.index.get(&name).copied() {
            Some(pos) => {
                tracing::warn!(block = %name, "block is already registered, overwriting");
                Some(std::mem::replace(&mut entries.order[pos], block))
            }
            None => {
                tracing::debug!(block = %name, category = %block.meta().category, "registered block");
                let pos = entries.order.len();
                entries.order.push(block);
                entries.index.insert(name, pos);
                None
            }
        }
    }

    /// Register a block only if its name is free.
    ///
    /// The check and the insert happen under one write lock. A taken name
    /// hands the block back unchanged.
    pub fn register_new(&self, block: Arc<dyn Block>) -> Result<(), Arc<dyn Block>> {
        let mut entries = self.blocks.write();
        if entries.index.contains_key(&block.meta().name) {
            return Err(block);
        }
        let name = block.meta().name.clone();
        tracing::debug!(block = %name, category = %block.meta().category, "registered block");
        let pos = entries.order.len();
        entries.order.push(block);
        entries.index.insert(name, pos);
        Ok(())
    }

    /// Register an owned block value
    pub fn register_block<B: Block + 'static>(&self, block: B) -> Option<Arc<dyn Block>> {
        self.register(Arc::new(block))
    }

    /// Get a block by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Block>> {
        let entries = self.blocks.read();
        entries.index.get(name).map(|&pos| entries.order[pos].clone())
    }

    /// Get all registered blocks in registration order
    pub fn all(&self) -> Vec<Arc<dyn Block>> {
        self.blocks.read().order.clone()
    }

    /// Get blocks of one category, in registration order
    pub fn by_category(&self, category: BlockCategory) -> Vec<Arc<dyn Block>> {
        self.blocks
            .read()
            .order
            .iter()
            .filter(|b| b.meta().category == category)
            .cloned()
            .collect()
    }

    /// Search for blocks by query string
    ///
    /// Matches case-insensitively against the block name and label.
    pub fn search(&self, query: &str) -> Vec<Arc<dyn Block>> {
        let query = query.to_lowercase();

        self.blocks
            .read()
            .order
            .iter()
            .filter(|b| {
                let meta = b.meta();
                meta.name.to_lowercase().contains(&query) || meta.label.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    /// Names of all registered blocks in registration order
    pub fn names(&self) -> Vec<String> {
        self.blocks.read().order.iter().map(|b| b.meta().name.clone()).collect()
    }

    /// Get the number of registered blocks
    pub fn count(&self) -> usize {
        self.blocks.read().order.len()
    }

    /// Check if a block with the given name exists
    pub fn contains(&self, name: &str) -> bool {
        self.blocks.read().index.contains_key(name)
    }

    /// Remove all registered blocks
    pub fn clear(&self) {
        let mut entries = self.blocks.write();
        entries.order.clear();
        entries.index.clear();
    }
}

impl std::fmt::Debug for BlockRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockRegistry").field("blocks", &self.names()).finish()
    }
}
