#![warn(clippy::all)]
//! Scaling factors and pure-component property correlations for
//! block-structured process models.
//!
//! The model data structures live in [pse_core] and are re-exported here.
//! [scaling] computes numeric scaling factors from symbolic scaling
//! expressions, [pure] builds property expressions from NIST WebBook
//! correlations.
pub use pse_core::*;

pub mod pure;
pub mod scaling;
