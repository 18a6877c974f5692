//! Allocation-plan chromosome for the crop GA.
//!
//! # Encoding
//!
//! The chromosome consists of two flat vectors in `crop + crop_count *
//! month` layout:
//! - **allocation**: cumulative land fraction of crop *c* active in month
//!   *m* — the sum of all plantings of *c* whose growth window covers *m*.
//! - **plantings**: land fraction newly committed to crop *c* at its
//!   planting month *m*; zero everywhere else.
//!
//! For every month the allocations across crops sum to at most 1.0, and
//! a planting only exists where the cultivability mask permits the whole
//! growth window.
//!
//! # Reference
//! Michalewicz (1996), "Genetic Algorithms + Data Structures = Evolution
//! Programs", Ch. 7 (constraint handling by decoders and repair)

use rand::Rng;
use rand_distr::{ChiSquared, Distribution};
use serde::{Deserialize, Serialize};

use crate::models::CropCatalog;

/// Degrees of freedom of the chi-squared area-fraction draw.
pub(crate) const AREA_DRAW_DF: f64 = 5.0;

/// Scale applied to a chi-squared sample to turn it into an area fraction.
pub(crate) const AREA_DRAW_SCALE: f64 = 8.0 / 100.0;

/// Upper bound on planting attempts per month during construction. The
/// continuation gate decays to zero as land fills, so this cap is almost
/// never reached; it turns a probabilistic termination argument into a
/// guaranteed one.
const MAX_ATTEMPTS_PER_MONTH: usize = 64;

/// A candidate allocation plan (one GA individual).
///
/// Lower score = better plan (minimization convention; the score is the
/// negated total harvest).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    crops: usize,
    months: usize,
    /// Cumulative active land fraction per (crop, month).
    pub allocation: Vec<f64>,
    /// Newly committed land fraction per (crop, month).
    pub plantings: Vec<f64>,
    /// Cached fitness (lower = better). `INFINITY` until evaluated.
    pub score: f64,
}

impl Plan {
    /// Creates an empty plan (no plantings, unevaluated score).
    pub fn empty(crops: usize, months: usize) -> Self {
        Self {
            crops,
            months,
            allocation: vec![0.0; crops * months],
            plantings: vec![0.0; crops * months],
            score: f64::INFINITY,
        }
    }

    /// Number of crops this plan covers.
    pub fn crop_count(&self) -> usize {
        self.crops
    }

    /// Number of months this plan covers.
    pub fn months(&self) -> usize {
        self.months
    }

    pub(crate) fn idx(&self, crop: usize, month: usize) -> usize {
        debug_assert!(crop < self.crops && month < self.months);
        crop + self.crops * month
    }

    /// Active land fraction of `crop` in `month`.
    pub fn allocation_at(&self, crop: usize, month: usize) -> f64 {
        self.allocation[self.idx(crop, month)]
    }

    /// Land fraction committed to `crop` at planting month `month`.
    pub fn planting_at(&self, crop: usize, month: usize) -> f64 {
        self.plantings[self.idx(crop, month)]
    }

    /// Total land fraction in use during `month`, across all crops.
    pub fn land_use(&self, month: usize) -> f64 {
        (0..self.crops).map(|crop| self.allocation_at(crop, month)).sum()
    }

    /// Stochastically constructs a feasible plan, month by month.
    ///
    /// Per month, while the continuation gate fires: draw a crop
    /// uniformly, reject it unless its whole growth window is cultivable,
    /// draw an area fraction from the scaled chi-squared distribution,
    /// reject on the stochastic water-sufficiency test, and otherwise
    /// commit the planting across its window, consuming land and
    /// (capped at what remains) water in every covered month. Water left
    /// over after a month's plantings carries into the next month.
    pub fn generate<R: Rng>(catalog: &CropCatalog, rng: &mut R) -> Self {
        let crops = catalog.crop_count();
        let months = catalog.months;
        let mut plan = Plan::empty(crops, months);
        let mut free_land = vec![1.0; months];
        let mut water = catalog.initial_water.clone();
        let chi = ChiSquared::new(AREA_DRAW_DF).unwrap();

        for month in 0..months {
            let mut attempts = 0;
            while attempts < MAX_ATTEMPTS_PER_MONTH && continue_gate(free_land[month], rng) {
                attempts += 1;

                let crop = rng.random_range(0..crops);
                if !catalog.window_cultivable(crop, month) {
                    continue;
                }

                let area = draw_area_fraction(&chi, rng) * free_land[month];
                if area <= 0.0 {
                    continue;
                }
                if !water_sufficient(catalog, crop, month, area, &water, rng) {
                    continue;
                }

                let end = catalog.window_end(crop, month);
                for m in month..end {
                    let idx = plan.idx(crop, m);
                    plan.allocation[idx] += area;
                    free_land[m] -= area;

                    let hectares = area * catalog.total_area;
                    let demand = catalog.crops[crop].water_requirement * hectares;
                    water[m] -= demand.min(water[m]);
                }
                let planted = plan.idx(crop, month);
                plan.plantings[planted] = area;
            }

            if month + 1 < months {
                water[month + 1] += water[month];
            }
        }

        plan
    }
}

/// Planting-loop continuation gate.
///
/// The continuation probability decays sharply as the month's free land
/// shrinks: at a fully free month the gate always fires, at a full month
/// it never does. The constants are tuned empirically and are part of
/// the search's exploration character; do not adjust them.
pub(crate) fn continue_gate<R: Rng>(free_land: f64, rng: &mut R) -> bool {
    let threshold = -0.7 * (-6.0 * free_land + 5.25).exp() + 107.0;
    threshold > rng.random_range(0..100) as f64
}

/// Draws an area fraction from the scaled chi-squared distribution.
/// Draws above 1.0 count as a rejected attempt and come back as 0.0.
pub(crate) fn draw_area_fraction<R: Rng>(chi: &ChiSquared<f64>, rng: &mut R) -> f64 {
    let fraction = AREA_DRAW_SCALE * chi.sample(rng);
    if fraction > 1.0 { 0.0 } else { fraction }
}

/// Stochastic water-sufficiency test for a candidate planting.
///
/// Shortfalls are tolerated with probability `1 - shortage ratio` per
/// affected month, so small deficits usually pass and large ones usually
/// reject.
pub(crate) fn water_sufficient<R: Rng>(
    catalog: &CropCatalog,
    crop: usize,
    month: usize,
    area_fraction: f64,
    water: &[f64],
    rng: &mut R,
) -> bool {
    let hectares = area_fraction * catalog.total_area;
    let required = catalog.crops[crop].water_requirement * hectares;
    let end = catalog.window_end(crop, month);

    for m in month..end {
        let available = water[m];
        if available < required {
            let shortage = (required - available) / required;
            if rng.random::<f64>() > 1.0 - shortage {
                return false;
            }
        }
    }
    true
}
