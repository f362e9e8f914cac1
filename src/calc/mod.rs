//! Closed-form calculators. Pure and synchronous.

pub mod interest;
pub mod penalty;
