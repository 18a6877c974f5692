//! Plan breakdown for reporting.
//!
//! Turns a finalized plan into per-month, per-crop figures a consumer
//! can render: allocated land fraction, hectares, water drawn, and the
//! potential harvest per crop. Data only; formatting belongs to the
//! consumer.

use serde::{Deserialize, Serialize};

use crate::ga::Plan;

use super::CropCatalog;

/// Per-month, per-crop breakdown of a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// One entry per month of the horizon.
    pub months: Vec<MonthReport>,
    /// Potential harvest accumulated per crop (tons), before water and
    /// salinity effects. The simulated figure is the negated plan score.
    pub harvest_by_crop: Vec<f64>,
    /// Grand total potential harvest (tons).
    pub total_harvest: f64,
    /// The plan's cached score (negated simulated harvest).
    pub score: f64,
}

/// One month's active allocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthReport {
    /// Month index (0-based).
    pub month: usize,
    /// Active crops this month; crops with no allocation are omitted.
    pub allocations: Vec<CropAllocation>,
    /// Total water drawn this month (cubic meters).
    pub water_used: f64,
}

/// One crop's share of one month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropAllocation {
    /// Crop index into the catalog.
    pub crop: usize,
    /// Active land fraction.
    pub area_fraction: f64,
    /// Active area in hectares.
    pub area_hectares: f64,
    /// Water drawn by this crop this month (cubic meters).
    pub water_used: f64,
}

impl PlanReport {
    /// Builds the breakdown for a plan against its catalog.
    pub fn from_plan(plan: &Plan, catalog: &CropCatalog) -> Self {
        let mut months = Vec::with_capacity(catalog.months);
        let mut harvest_by_crop = vec![0.0; catalog.crop_count()];
        let mut total_harvest = 0.0;

        for month in 0..catalog.months {
            let mut allocations = Vec::new();
            let mut water_used = 0.0;

            for (crop, params) in catalog.crops.iter().enumerate() {
                let area_fraction = plan.allocation_at(crop, month);
                if area_fraction <= 0.0 {
                    continue;
                }

                let area_hectares = area_fraction * catalog.total_area;
                let water = params.water_requirement * area_hectares;
                water_used += water;

                let harvest = params.max_yield * area_hectares / params.growth_months as f64;
                harvest_by_crop[crop] += harvest;
                total_harvest += harvest;

                allocations.push(CropAllocation {
                    crop,
                    area_fraction,
                    area_hectares,
                    water_used: water,
                });
            }

            months.push(MonthReport {
                month,
                allocations,
                water_used,
            });
        }

        Self {
            months,
            harvest_by_crop,
            total_harvest,
            score: plan.score,
        }
    }
}
