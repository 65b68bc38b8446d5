//! Shared test fixtures for TourForge crates.
//!
//! This crate provides graphs with known optimal tours and helpers for
//! building synthetic candidate assignments. It depends only on
//! `tourforge-core` so every other crate can use it as a dev-dependency.
//!
//! - [`graphs`] - Instance graphs and their optimal objectives
//! - [`candidate`] - Synthetic per-variable values for callback tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! tourforge-test = { workspace = true }
//! ```
//!
//! ```
//! use tourforge_test::graphs::{k4, K4_OPTIMUM};
//!
//! let graph = k4();
//! assert_eq!(graph.edge_count(), 6);
//! assert_eq!(K4_OPTIMUM, 80.0);
//! ```

pub mod candidate;
pub mod graphs;

pub use candidate::selected_values;
pub use graphs::{decoy, disconnected, k4, perimeter, polygon, ring, two_triangles};
