//! Itinerary scoring core for the ATIS trip planner.
//!
//! The [`planning`] module turns raw itinerary candidates into a ranked,
//! annotated result set: hard-constraint filtering, CO2 modelling, and a
//! weighted multi-criteria score. [`analytics`] records planned trips behind
//! an injected store and derives usage reports from them.

pub mod analytics;
pub mod config;
pub mod error;
pub mod planning;
pub mod telemetry;
