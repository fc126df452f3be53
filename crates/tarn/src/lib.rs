//! Tarn: groundwater heads, basin storage curves and lake water balances.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Tarn sub-crates. For most users, adding `tarn` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use tarn::prelude::*;
//!
//! // Four pumping wells on the corners of a 200 m square.
//! let wells = [(-100.0, -100.0), (100.0, -100.0), (100.0, 100.0), (-100.0, 100.0)]
//!     .into_iter()
//!     .map(|(x, y)| Well::new(x, y, 100.0, 0.1))
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let field = WellField::new(wells, 100.0).unwrap();
//! let head = field.head_at(&[0.0], &[0.0]).unwrap();
//! assert!(head[0] > 0.0);
//!
//! // A flat 10 × 10 basin floor at 0 m with 1 m cells.
//! let curve = tarn::basin::build(&[0.0; 100], 10, 1.0, 1.0, 1.0, -0.5, -0.5).unwrap();
//! assert_eq!(curve.areas(), &[100.0, 100.0, 0.0]);
//! assert_eq!(curve.volumes(), &[100.0, 50.0, 0.0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `tarn-core` | Errors, degeneracy markers, configuration, grid axes |
//! | [`wells`] | `tarn-wells` | Thiem well-field superposition |
//! | [`basin`] | `tarn-basin` | Surfaces, gridding, polynomial fits, storage curves, stage conversion |
//! | [`balance`] | `tarn-balance` | Water balance, tracers, isotope fractionation |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Errors, configuration and grid geometry (`tarn-core`).
pub use tarn_core as types;

/// Steady-state well fields (`tarn-wells`).
///
/// [`wells::head_at`] evaluates the superposed head for a slice of
/// [`wells::Well`]s; [`wells::WellField`] bundles wells with their aquifer.
pub use tarn_wells as wells;

/// Basin storage (`tarn-basin`).
///
/// Grid a survey with [`basin::grid`], sweep it into a
/// [`basin::LevelVolumeCurve`] and convert logger levels with
/// [`basin::StageSeries`].
pub use tarn_basin as basin;

/// Lake water and tracer balances (`tarn-balance`).
pub use tarn_balance as balance;

/// Common imports for typical Tarn usage.
///
/// ```rust
/// use tarn::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use tarn_core::{
        BalanceConfig, Degeneracy, FitConfig, GridAxis, LevelSweep, ModelError, ParallelConfig,
    };

    // Wells
    pub use tarn_wells::{head_at, Well, WellField, WellKind};

    // Basin
    pub use tarn_basin::{
        ElevationSurface, GridMethod, LevelVolumeCurve, Polynomial, ScatteredPoints, StageSeries,
    };

    // Balance
    pub use tarn_balance::{
        tracer_balance, water_balance, BalanceTable, Chloride, DailyRecord, Isotope,
        IsotopeTracer, Tracer,
    };
}
