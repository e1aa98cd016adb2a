//! Marketplace registry for third-party blockpacks
//!
//! A blockpack bundles several block definitions under a name and version.
//! Admission is per block and best-effort: a block that collides with an
//! already registered name, or that declares no schema, is skipped while the
//! rest of the pack still loads.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::block::Block;
use crate::core::registry::BlockRegistry;

/// A named, versioned bundle of blocks
#[derive(Clone)]
pub struct Blockpack {
    pub name: String,
    pub version: String,
    pub blocks: Vec<Arc<dyn Block>>,
}

impl Blockpack {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_block<B: Block + 'static>(mut self, block: B) -> Self {
        self.blocks.push(Arc::new(block));
        self
    }

    /// Names of all blocks declared by the pack, admitted or not
    pub fn block_names(&self) -> Vec<String> {
        self.blocks.iter().map(|b| b.meta().name.clone()).collect()
    }
}

impl std::fmt::Debug for Blockpack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blockpack")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("blocks", &self.block_names())
            .finish()
    }
}

/// Why a block from a pack was not admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A block with the same name is already registered
    Conflict,
    /// The block declares no props
    EmptySchema,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Conflict => f.write_str("conflicts with an existing block"),
            SkipReason::EmptySchema => f.write_str("has an empty schema"),
        }
    }
}

/// Outcome of registering one blockpack
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockpackReport {
    pub admitted: Vec<String>,
    pub skipped: Vec<(String, SkipReason)>,
}

impl BlockpackReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Default)]
struct Packs {
    order: Vec<Blockpack>,
    index: HashMap<String, usize>,
}

/// Registry of installed blockpacks, admitting their blocks into a
/// `BlockRegistry`
#[derive(Clone)]
pub struct MarketplaceRegistry {
    blocks: BlockRegistry,
    packs: Arc<RwLock<Packs>>,
}

impl MarketplaceRegistry {
    /// Create a marketplace that admits blocks into `blocks`
    pub fn new(blocks: BlockRegistry) -> Self {
        Self {
            blocks,
            packs: Arc::new(RwLock::new(Packs::default())),
        }
    }

    /// The block registry this marketplace admits into
    pub fn block_registry(&self) -> &BlockRegistry {
        &self.blocks
    }

    /// Register a blockpack
    ///
    /// Each block is admitted unless its name is already registered or its
    /// schema is empty. The pack itself is always recorded, replacing any
    /// previous pack with the same name.
    pub fn register_blockpack(&self, pack: Blockpack) -> BlockpackReport {
        let mut report = BlockpackReport::default();

        for block in &pack.blocks {
            let name = block.meta().name.clone();

            let skip = if self.blocks.contains(&name) {
                Some(SkipReason::Conflict)
            } else if block.meta().schema.is_empty() {
                Some(SkipReason::EmptySchema)
            } else {
                // checked again under the registry write lock
                self.blocks.register_new(block.clone()).err().map(|_| SkipReason::Conflict)
            };

            match skip {
                Some(reason) => {
                    tracing::warn!(block = %name, pack = %pack.name, %reason, "skipping block from blockpack");
                    report.skipped.push((name, reason));
                }
                None => report.admitted.push(name),
            }
        }

        tracing::info!(
            pack = %pack.name,
            version = %pack.version,
            blocks = pack.blocks.len(),
            admitted = report.admitted.len(),
            "blockpack registered"
        );

        let mut packs = self.packs.write();
        match packs.index.get(&pack.name).copied() {
            Some(pos) => packs.order[pos] = pack,
            None => {
                let pos = packs.order.len();
                packs.index.insert(pack.name.clone(), pos);
                packs.order.push(pack);
            }
        }

        report
    }

    /// Look up a pack by name
    pub fn get_blockpack(&self, name: &str) -> Option<Blockpack> {
        let packs = self.packs.read();
        packs.index.get(name).map(|&pos| packs.order[pos].clone())
    }

    /// All registered packs in registration order
    pub fn all_blockpacks(&self) -> Vec<Blockpack> {
        self.packs.read().order.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::{define_block, BlockMeta, FnBlock};
    use crate::core::node::Node;
    use crate::core::schema::PropType;

    fn block(name: &str, with_schema: bool) -> FnBlock {
        let mut meta = BlockMeta::new(name, name);
        if with_schema {
            meta = meta.with_prop("title", PropType::String);
        }
        let tag = name.to_string();
        define_block(meta, move |_| Ok(Node::Text(tag.clone())))
    }

    #[test]
    fn test_register_blockpack_admits_valid_blocks() {
        let blocks = BlockRegistry::new();
        let market = MarketplaceRegistry::new(blocks.clone());

        let report = market.register_blockpack(
            Blockpack::new("shop", "1.0.0")
                .with_block(block("ProductCard", true))
                .with_block(block("PriceTag", true)),
        );

        assert!(report.is_complete());
        assert_eq!(report.admitted, vec!["ProductCard", "PriceTag"]);
        assert_eq!(blocks.names(), vec!["ProductCard", "PriceTag"]);
    }

    #[test]
    fn test_register_blockpack_skips_conflicts_and_empty_schemas() {
        let blocks = BlockRegistry::new();
        blocks.register_block(block("Card", true));
        let market = MarketplaceRegistry::new(blocks.clone());

        let report = market.register_blockpack(
            Blockpack::new("extras", "0.2.0")
                .with_block(block("Card", true))
                .with_block(block("Spacer", false))
                .with_block(block("Quote", true)),
        );

        assert_eq!(report.admitted, vec!["Quote"]);
        assert_eq!(
            report.skipped,
            vec![
                ("Card".to_string(), SkipReason::Conflict),
                ("Spacer".to_string(), SkipReason::EmptySchema),
            ]
        );
        assert_eq!(blocks.names(), vec!["Card", "Quote"]);
        assert!(!blocks.contains("Spacer"));

        // the original Card is untouched
        let card = blocks.get("Card").unwrap();
        assert_eq!(card.render(&Default::default()).unwrap().text_content(), "Card");

        // the full pack is still recorded
        let pack = market.get_blockpack("extras").unwrap();
        assert_eq!(pack.version, "0.2.0");
        assert_eq!(pack.block_names(), vec!["Card", "Spacer", "Quote"]);
    }

    #[test]
    fn test_reregistering_pack_replaces_record() {
        let market = MarketplaceRegistry::new(BlockRegistry::new());
        market.register_blockpack(Blockpack::new("a", "1.0.0").with_block(block("A1", true)));
        market.register_blockpack(Blockpack::new("b", "1.0.0"));
        let report = market.register_blockpack(Blockpack::new("a", "2.0.0").with_block(block("A1", true)));

        // A1 is now a conflict with the block admitted by the first version
        assert_eq!(report.skipped, vec![("A1".to_string(), SkipReason::Conflict)]);

        let packs = market.all_blockpacks();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].name, "a");
        assert_eq!(packs[0].version, "2.0.0");
        assert_eq!(packs[1].name, "b");
    }

    #[test]
    fn test_concurrent_packs_admit_each_name_once() {
        use std::thread;

        let market = MarketplaceRegistry::new(BlockRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let market = market.clone();
                thread::spawn(move || {
                    market.register_blockpack(
                        Blockpack::new(format!("pack-{}", i), "1.0.0")
                            .with_block(block("Shared", true))
                            .with_block(block(&format!("Own{}", i), true)),
                    )
                })
            })
            .collect();

        let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let shared_admissions = reports
            .iter()
            .filter(|r| r.admitted.iter().any(|n| n == "Shared"))
            .count();
        assert_eq!(shared_admissions, 1);
        assert!(reports
            .iter()
            .all(|r| r.admitted.len() + r.skipped.len() == 2));
        assert_eq!(market.block_registry().count(), 9);
        assert_eq!(market.all_blockpacks().len(), 8);
    }

    #[test]
    fn test_missing_pack_lookup() {
        let market = MarketplaceRegistry::new(BlockRegistry::new());
        assert!(market.get_blockpack("nope").is_none());
        assert!(market.all_blockpacks().is_empty());
    }
}
