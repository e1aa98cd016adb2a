//! Cross-module test suite
//!
//! Unit tests live next to the code they cover. This module holds the tests
//! that drive a whole site: pages on disk, routing, blockpacks, and rendering.
