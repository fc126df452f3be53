//! Daily water and solute balance of a lake or reservoir.
//!
//! Given daily wetted area and stored volume (typically from
//! `tarn-basin` stage conversion) plus rain and pan evaporation, the
//! [`water_balance`] closes `P - E - ΔV - I = 0` for the unmeasured
//! outflow `I`. A [`Tracer`] then carries a conservative solute
//! ([`Chloride`]) or a stable isotope ([`IsotopeTracer`]) through the same
//! fluxes, letting the residual be checked against sampled concentrations.
//!
//! [`Isotope`] holds the liquid–vapour fractionation and Craig–Gordon
//! evaporate composition; [`meteo`] the vapour pressure helpers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod isotope;
pub mod meteo;
pub mod table;
pub mod water_balance;

pub use isotope::Isotope;
pub use meteo::{actual_vapour_pressure, saturation_vapour_pressure, vapour_pressure_deficit};
pub use table::BalanceTable;
pub use water_balance::{
    tracer_balance, water_balance, Chloride, DailyFlux, DailyRecord, IsotopeTracer, Tracer,
};
