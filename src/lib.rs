//! SIM lattice pattern library
//!
//! This library generates and analyses periodic binary illumination patterns for a
//! DMD-driven structured illumination microscope. Patterns are described by two integer
//! periodicity vectors; from these it builds the unit cell, tiles it over the mirror array,
//! computes Fourier components of the result and searches for multi-angle, multi-wavelength
//! pattern sets whose spurious Fourier peaks stay far from the intended ones.

pub mod config;
pub mod error;
pub mod fourier;
pub mod geometries;
pub mod interfaces;
pub mod lattice;
pub mod patterns;

pub use error::PatternError;

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, PatternError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
