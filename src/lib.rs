//! Genetic-algorithm planner for month-by-month crop land allocation.
//!
//! Searches for an allocation of a shared field across several crops
//! over a monthly horizon, maximizing total harvest under coupled
//! constraints: a land budget per month, a monthly water supply with
//! carryover, per-crop cultivability windows, and soil salinity that
//! accumulates with cultivation and depresses yield.
//!
//! # Modules
//!
//! - **`models`**: parameter tables (`Crop`, `CropCatalog`) and the
//!   reporting breakdown (`PlanReport`)
//! - **`ga`**: the search engine (plan encoding, constructive
//!   initialization, repair/crossover/mutation operators, harvest
//!   simulation, elitist generational replacement, and the run driver)
//! - **`validation`**: input integrity checks run before a search starts
//!
//! # Approach
//!
//! Infeasible intermediate plans are repaired, not penalized: every
//! offspring is rebuilt from its planting record against fresh land
//! trackers before evaluation. All randomness flows through a caller
//! supplied `rand::Rng`, so a seeded generator replays a run exactly.

pub mod ga;
pub mod models;
pub mod validation;
