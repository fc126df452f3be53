//! Analytic groundwater head for a field of pumping wells.
//!
//! Each [`Well`] contributes the steady-state Thiem solution for a confined,
//! homogeneous aquifer of transmissivity `T`:
//!
//! ```text
//! h_w(x, y) = Q / (4πT) · ln(r² / r_w²),   r² = max((x - x_w)² + (y - y_w)², r_w²)
//! ```
//!
//! and the field head is the sum over wells. The squared distance is clamped
//! per well at its own casing radius, so the head is finite everywhere and is
//! exactly zero on each casing.
//!
//! Use the free function [`head_at`] for one-off evaluation over a slice of
//! wells, or build a [`WellField`] that owns its wells and transmissivity.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod field;
pub mod head;
pub mod well;

pub use field::WellField;
pub use head::{head_at, head_at_with};
pub use well::{Well, WellKind};
