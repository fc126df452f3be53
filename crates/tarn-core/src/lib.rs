//! Core types for the Tarn hydrology toolkit.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! error taxonomy shared by every computation, the non-fatal [`Degeneracy`]
//! markers, parameter validation helpers, regular [`GridAxis`] geometry, and
//! the configuration structs ([`FitConfig`], [`ParallelConfig`],
//! [`BalanceConfig`], [`LevelSweep`]).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod param;

pub use config::{BalanceConfig, FitConfig, LevelSweep, ParallelConfig};
pub use error::{ConfigError, Degeneracy, ModelError};
pub use grid::{meshgrid, GridAxis};
