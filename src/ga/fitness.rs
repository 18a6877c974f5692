//! Harvest simulation and fitness scoring.
//!
//! Evaluates a plan by simulating the planning horizon month by month
//! against a working water track and a running soil-salinity level.
//! Water stress scales yield through a saturating exponential response;
//! salinity above a crop's critical threshold depresses it linearly.
//! Unused water carries into the next month; salinity accumulates from
//! the area under cultivation.
//!
//! The score is the negated total harvest, so the GA minimizes uniformly.
//!
//! # Reference
//! - Doorenbos & Kassam (1979), FAO Irrigation and Drainage Paper 33
//! - Maas & Hoffman (1977), "Crop Salt Tolerance — Current Assessment"

use crate::models::CropCatalog;

use super::chromosome::Plan;

/// Allocations at or below this fraction are treated as absent. Guards
/// the water-effect exponent, which divides by the allocated fraction.
pub(crate) const ALLOCATION_EPSILON: f64 = 1e-9;

/// Simulates the full horizon and returns the plan's score
/// (negated total harvest; lower = better).
pub fn evaluate(plan: &Plan, catalog: &CropCatalog) -> f64 {
    let months = catalog.months;
    let mut water = catalog.initial_water.clone();
    let mut salinity = catalog.initial_salinity;
    let mut total_harvest = 0.0;

    for month in 0..months {
        let demand = water_demand(plan, catalog, month);
        let coefficient = water_coefficient(demand, water[month]);

        total_harvest += monthly_harvest(plan, catalog, month, coefficient, salinity);

        if month + 1 < months {
            salinity += salinity_delta(plan, catalog, month);
            water[month + 1] += (water[month] - demand).max(0.0);
        }
    }

    -total_harvest
}

/// Total water demanded by the month's active allocations (cubic meters).
pub(crate) fn water_demand(plan: &Plan, catalog: &CropCatalog, month: usize) -> f64 {
    catalog
        .crops
        .iter()
        .enumerate()
        .map(|(crop, params)| {
            let fraction = plan.allocation_at(crop, month);
            if fraction > ALLOCATION_EPSILON {
                params.water_requirement * fraction * catalog.total_area
            } else {
                0.0
            }
        })
        .sum()
}

/// Fraction of demanded water that is actually available, clamped to
/// [0, 1]. A month without demand is unstressed.
fn water_coefficient(demand: f64, available: f64) -> f64 {
    if demand > 0.0 {
        (available / demand).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Harvest contributed by one month across all active crops.
fn monthly_harvest(
    plan: &Plan,
    catalog: &CropCatalog,
    month: usize,
    coefficient: f64,
    salinity: f64,
) -> f64 {
    let mut harvest = 0.0;
    for (crop, params) in catalog.crops.iter().enumerate() {
        let fraction = plan.allocation_at(crop, month);
        if fraction <= ALLOCATION_EPSILON {
            continue;
        }

        let expected = params.max_yield * fraction / params.growth_months as f64;

        let exponent = (coefficient * params.water_susceptibility) / fraction;
        let water_effect = 1.0 - (-exponent).exp();

        let impact = params.yield_reduction * (salinity - params.critical_salinity);
        let salinity_effect = (1.0 - impact / 100.0).clamp(0.0, 1.0);

        harvest += expected * water_effect * salinity_effect;
    }
    harvest
}

/// Soil-salinity change caused by the month's cultivated area.
fn salinity_delta(plan: &Plan, catalog: &CropCatalog, month: usize) -> f64 {
    catalog
        .crops
        .iter()
        .enumerate()
        .map(|(crop, params)| {
            params.salinity_change * plan.allocation_at(crop, month) * catalog.total_area
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Crop;

    /// One crop, two months, one-month growth, no salinity response.
    fn single_crop_catalog(susceptibility: f64, water: Vec<f64>) -> CropCatalog {
        CropCatalog::new(
            vec![Crop::new("wheat", 1)
                .with_water_requirement(1.0)
                .with_max_yield(1.0)
                .with_water_susceptibility(susceptibility)],
            2,
        )
        .with_initial_water(water)
        .with_total_area(10.0)
    }

    fn half_half_plan(catalog: &CropCatalog) -> Plan {
        let mut plan = Plan::empty(1, 2);
        plan.allocation = vec![0.5, 0.5];
        plan.plantings = vec![0.5, 0.5];
        plan.score = evaluate(&plan, catalog);
        plan
    }

    #[test]
    fn test_hand_computed_score() {
        // demand = 1.0 * 0.5 * 10 = 5 m³ against 100 m³, so the water
        // coefficient is 1 in both months and the monthly harvest is
        // 0.5 * (1 - e^{-2/0.5}).
        let susceptibility = 2.0;
        let catalog = single_crop_catalog(susceptibility, vec![100.0, 100.0]);
        let plan = half_half_plan(&catalog);

        let monthly = 0.5 * (1.0 - (-(susceptibility * 1.0) / 0.5_f64).exp());
        let expected = -(2.0 * monthly);
        assert!((plan.score - expected).abs() < 1e-12, "{} vs {expected}", plan.score);
    }

    #[test]
    fn test_dry_month_contributes_nothing() {
        // No water in month 0 drives the water coefficient, and with it
        // the water effect, to zero; month 1 gets the (zero) carryover
        // plus its own supply and harvests normally.
        let catalog = single_crop_catalog(2.0, vec![0.0, 100.0]);
        let dry = half_half_plan(&catalog);

        let wet_catalog = single_crop_catalog(2.0, vec![100.0, 100.0]);
        let wet = half_half_plan(&wet_catalog);

        let monthly = -wet.score / 2.0;
        assert!((-dry.score - monthly).abs() < 1e-12);
    }

    #[test]
    fn test_empty_plan_scores_zero() {
        let catalog = single_crop_catalog(2.0, vec![100.0, 100.0]);
        let plan = Plan::empty(1, 2);
        assert_eq!(evaluate(&plan, &catalog), 0.0);
    }

    #[test]
    fn test_epsilon_allocation_ignored() {
        // A sub-epsilon allocation would blow up the water-effect
        // exponent; it must contribute nothing instead.
        let catalog = single_crop_catalog(2.0, vec![100.0, 100.0]);
        let mut plan = Plan::empty(1, 2);
        plan.allocation = vec![1e-12, 0.0];
        assert_eq!(evaluate(&plan, &catalog), 0.0);
    }

    #[test]
    fn test_water_carryover_rescues_late_month() {
        // Month 0 has no allocation, so its full supply carries into
        // month 1 and covers a demand the month's own supply cannot.
        let catalog = single_crop_catalog(2.0, vec![10.0, 0.0]);
        let mut plan = Plan::empty(1, 2);
        plan.allocation = vec![0.0, 0.5];
        plan.plantings = vec![0.0, 0.5];

        // demand(month 1) = 5 m³ against 10 m³ carried over.
        let monthly = 0.5 * (1.0 - (-2.0 / 0.5_f64).exp());
        assert!((evaluate(&plan, &catalog) + monthly).abs() < 1e-12);
    }

    #[test]
    fn test_salinity_accumulation_depresses_yield() {
        // A salinizing crop with a harsh yield response: month 1 sees the
        // salinity added by month 0's cultivated area.
        let crop = Crop::new("cotton", 1)
            .with_water_requirement(0.0)
            .with_max_yield(1.0)
            .with_salinity_response(50.0, 0.0)
            .with_salinity_change(0.1)
            .with_water_susceptibility(100.0);
        let catalog = CropCatalog::new(vec![crop], 2)
            .with_initial_water(vec![100.0, 100.0])
            .with_total_area(10.0)
            .with_initial_salinity(0.0);

        let mut plan = Plan::empty(1, 2);
        plan.allocation = vec![0.5, 0.5];
        plan.plantings = vec![0.5, 0.5];

        // Month 0: salinity 0.0 → effect 1.0. Salinity then rises by
        // 0.1 * 0.5 * 10 = 0.5, so month 1's effect is 1 - 50*0.5/100.
        let water_effect = 1.0 - (-100.0 / 0.5_f64).exp();
        let expected = 0.5 * water_effect * 1.0 + 0.5 * water_effect * 0.75;
        assert!((evaluate(&plan, &catalog) + expected).abs() < 1e-12);
    }

    #[test]
    fn test_score_improves_with_more_allocation() {
        let catalog = single_crop_catalog(2.0, vec![1000.0, 1000.0]);
        let mut small = Plan::empty(1, 2);
        small.allocation = vec![0.2, 0.2];
        let mut large = Plan::empty(1, 2);
        large.allocation = vec![0.8, 0.8];

        assert!(evaluate(&large, &catalog) < evaluate(&small, &catalog));
    }
}
