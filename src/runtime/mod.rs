//! Block rendering runtime
//!
//! This module provides the composition engine that turns block instance
//! trees into render nodes.

pub mod renderer;

pub use renderer::BlockRenderer;
