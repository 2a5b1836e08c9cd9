//! svgtex Core Types and Definitions
//!
//! This crate provides the foundational types shared by the svgtex crates.
//! It includes:
//!
//! - **Document**: A mutable SVG/XML element tree with a deterministic writer ([`document`] module)
//! - **Namespaces**: The XML namespaces svgtex reads and writes ([`namespace`] module)
//! - **Geometry**: Points and 2D affine transforms ([`geometry`] module)
//! - **Transforms**: The tagged transform functions found in `transform` attributes ([`transform::TransformOp`])
//! - **Units**: Absolute length units and their pixel sizes ([`units::LengthUnit`])

pub mod document;
pub mod geometry;
pub mod namespace;
pub mod transform;
pub mod units;
