//! Basin storage curves from gridded bathymetry.
//!
//! The central type is [`LevelVolumeCurve`]: for a descending sweep of
//! candidate water levels over an [`ElevationSurface`] it records the
//! flooded area and stored volume at each level, then fits least-squares
//! [`Polynomial`]s so callers get a continuous level → area and
//! level → volume mapping.
//!
//! # Pipeline
//!
//! 1. [`gridding`]: scattered survey points → [`ElevationSurface`]
//! 2. [`curve`]: surface + [`LevelSweep`](tarn_core::LevelSweep) → [`LevelVolumeCurve`]
//! 3. [`stage`]: logger water levels → volume and area series

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod curve;
pub mod gridding;
pub mod polynomial;
pub mod stage;
pub mod surface;

pub use curve::{build, LevelVolumeCurve};
pub use gridding::{grid, GridMethod, ScatteredPoints};
pub use polynomial::Polynomial;
pub use stage::{apply_offset, calibrate_offset, fill_gaps_linear, StageSeries};
pub use surface::ElevationSurface;
