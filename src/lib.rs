//! A simple Renewable Portfolio Standard (RPS) policy for capacity expansion models.
//!
//! The policy is attached to a host [`model::Model`] whose decision variables live in an
//! [`optimisation::Problem`]. A typical run:
//!
//! 1. declare the policy with [`input::read_rps_policy`] (or [`rps::RpsPolicy::new`]);
//! 2. add the enforcement rows with [`rps::constraints::add_rps_constraints`];
//! 3. solve the problem;
//! 4. write the per-period report with [`output::write_rps_outputs`].
#![warn(missing_docs)]
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod optimisation;
pub mod output;
pub mod rps;
pub mod units;

#[cfg(test)]
mod fixture;
