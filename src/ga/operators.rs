//! Genetic operators: repair, crossover, mutation.
//!
//! Crossover can leave offspring over land budget, because each parent's
//! tail was grown against its own land and water trajectory. Instead of
//! penalizing such offspring, every recombined plan passes through
//! [`repair`], which rebuilds a feasible plan from the planting record
//! alone. Mutation shrinks one planting and then regrows into whatever
//! capacity that frees up.
//!
//! Each operator borrows its inputs and returns new plans; callers own
//! the results outright.
//!
//! # Reference
//! Michalewicz (1996), "Genetic Algorithms + Data Structures = Evolution
//! Programs", Ch. 7 (repair algorithms for constrained problems)

use rand::seq::IndexedRandom;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{ChiSquared, Distribution};

use crate::models::CropCatalog;

use super::chromosome::{
    continue_gate, draw_area_fraction, water_sufficient, Plan, AREA_DRAW_DF, AREA_DRAW_SCALE,
};
use super::fitness::water_demand;

/// Attempt cap on the repair redraw loop. Chi-squared(5) draws exceed
/// the unit fraction about 2–3% of the time, so the cap is effectively
/// unreachable; hitting it drops the planting instead of spinning.
const MAX_REDRAW_ATTEMPTS: usize = 32;

/// Rebuilds a feasible plan from a possibly infeasible one.
///
/// Only the input's planting record is consulted; the cumulative
/// allocation is reconstructed from scratch. Months are processed in
/// order, and within a month crops are visited in a freshly shuffled
/// permutation so no crop systematically wins land contention. A
/// recorded planting that no longer fits the month's free land is
/// replaced by a fresh chi-squared fraction of what remains.
///
/// Repair is intentionally randomized: two repairs of the same input may
/// legitimately return different feasible plans.
pub fn repair<R: Rng>(plan: &Plan, catalog: &CropCatalog, rng: &mut R) -> Plan {
    let crops = catalog.crop_count();
    let months = catalog.months;
    let mut repaired = Plan::empty(crops, months);
    let mut free_land = vec![1.0; months];
    let chi = ChiSquared::new(AREA_DRAW_DF).unwrap();
    let mut order: Vec<usize> = (0..crops).collect();

    for month in 0..months {
        order.shuffle(rng);

        for &crop in &order {
            let recorded = plan.planting_at(crop, month);
            if recorded <= 0.0 {
                continue;
            }

            let area = if recorded > free_land[month] {
                redraw_fraction(&chi, rng) * free_land[month]
            } else {
                recorded
            };

            for m in month..catalog.window_end(crop, month) {
                let idx = repaired.idx(crop, m);
                repaired.allocation[idx] += area;
                free_land[m] -= area;
            }
            let planted = repaired.idx(crop, month);
            repaired.plantings[planted] = area;
        }
    }

    repaired
}

/// Single-point tail crossover over months.
///
/// With probability `1 - crossover_rate` the parents pass through
/// unchanged. Otherwise a cut month is drawn uniformly and both the
/// allocation and planting values of every (crop, month) at or past the
/// cut are swapped between the two copies. Offspring are not guaranteed
/// feasible and must be repaired before further use.
pub fn crossover<R: Rng>(
    parent1: &Plan,
    parent2: &Plan,
    crossover_rate: f64,
    rng: &mut R,
) -> (Plan, Plan) {
    if rng.random::<f64>() >= crossover_rate {
        return (parent1.clone(), parent2.clone());
    }

    let months = parent1.months();
    let crops = parent1.crop_count();
    let cut = rng.random_range(0..months);

    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    for month in cut..months {
        for crop in 0..crops {
            let idx = child1.idx(crop, month);
            std::mem::swap(&mut child1.allocation[idx], &mut child2.allocation[idx]);
            std::mem::swap(&mut child1.plantings[idx], &mut child2.plantings[idx]);
        }
    }

    child1.score = f64::INFINITY;
    child2.score = f64::INFINITY;
    (child1, child2)
}

/// Shrink-and-regrow mutation.
///
/// Picks one nonzero planting uniformly at random (no-op when none
/// exist), shrinks it by a fraction drawn uniformly from [0.01, 0.10),
/// removes the shrunk amount from the allocation across the planting's
/// growth window, and then regrows: the freed capacity is offered back
/// to the same stochastic construction procedure used at initialization.
pub fn mutate<R: Rng>(plan: &Plan, catalog: &CropCatalog, rng: &mut R) -> Plan {
    let mut mutated = plan.clone();

    let nonzero: Vec<usize> = mutated
        .plantings
        .iter()
        .enumerate()
        .filter(|(_, &area)| area > 0.0)
        .map(|(idx, _)| idx)
        .collect();
    let Some(&target) = nonzero.choose(rng) else {
        return mutated;
    };

    let crops = catalog.crop_count();
    let crop = target % crops;
    let month = target / crops;

    let reduction = rng.random_range(0.01..0.10);
    let removed = mutated.plantings[target] * reduction;
    mutated.plantings[target] -= removed;
    for m in month..catalog.window_end(crop, month) {
        let idx = mutated.idx(crop, m);
        mutated.allocation[idx] -= removed;
    }

    regrow(&mut mutated, catalog, rng);
    mutated.score = f64::INFINITY;
    mutated
}

/// Offers freed capacity back to the stochastic growth procedure.
///
/// Land and water trackers are re-derived from the plan's current
/// allocation state, then each month gets one gated planting attempt:
/// uniform crop draw, full-window cultivability check, chi-squared area
/// draw scaled by the minimum free land across the growth window, and
/// the stochastic water-sufficiency test. Accepted plantings add to the
/// existing allocation and planting records.
fn regrow<R: Rng>(plan: &mut Plan, catalog: &CropCatalog, rng: &mut R) {
    let crops = catalog.crop_count();
    let months = catalog.months;
    let mut free_land = vec![0.0; months];
    let mut water = derived_water(plan, catalog);
    let chi = ChiSquared::new(AREA_DRAW_DF).unwrap();

    for month in 0..months {
        for m in month..months {
            free_land[m] = 1.0 - plan.land_use(m);
        }

        if !continue_gate(free_land[month], rng) {
            continue;
        }

        let crop = rng.random_range(0..crops);
        if !catalog.window_cultivable(crop, month) {
            continue;
        }

        let end = catalog.window_end(crop, month);
        let min_free = free_land[month..end]
            .iter()
            .fold(f64::INFINITY, |acc, &free| acc.min(free));

        let area = draw_area_fraction(&chi, rng) * min_free;
        if area <= 0.0 {
            continue;
        }
        if !water_sufficient(catalog, crop, month, area, &water, rng) {
            continue;
        }

        for m in month..end {
            let idx = plan.idx(crop, m);
            plan.allocation[idx] += area;

            let hectares = area * catalog.total_area;
            let demand = catalog.crops[crop].water_requirement * hectares;
            water[m] -= demand.min(water[m]);
        }
        let planted = plan.idx(crop, month);
        plan.plantings[planted] += area;
    }
}

/// Monthly water remaining after the demand implied by the plan's
/// current allocation, floored at zero.
fn derived_water(plan: &Plan, catalog: &CropCatalog) -> Vec<f64> {
    (0..catalog.months)
        .map(|month| {
            let demand = water_demand(plan, catalog, month);
            (catalog.initial_water[month] - demand).max(0.0)
        })
        .collect()
}

fn redraw_fraction<R: Rng>(chi: &ChiSquared<f64>, rng: &mut R) -> f64 {
    for _ in 0..MAX_REDRAW_ATTEMPTS {
        let fraction = AREA_DRAW_SCALE * chi.sample(rng);
        if fraction <= 1.0 {
            return fraction;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Crop;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_catalog() -> CropCatalog {
        CropCatalog::new(
            vec![
                Crop::new("wheat", 2)
                    .with_water_requirement(1.0)
                    .with_max_yield(1.2)
                    .with_water_susceptibility(2.0),
                Crop::new("maize", 3)
                    .with_water_requirement(1.4)
                    .with_max_yield(0.8)
                    .with_water_susceptibility(4.1),
            ],
            5,
        )
        .with_initial_water(vec![120.0, 110.0, 130.0, 100.0, 150.0])
        .with_total_area(100.0)
        .with_initial_salinity(0.8)
    }

    /// A feasible plan whose allocation exactly matches its plantings.
    fn consistent_plan(catalog: &CropCatalog) -> Plan {
        let mut plan = Plan::empty(2, 5);
        for (crop, start, area) in [(0usize, 0usize, 0.3), (1, 1, 0.4), (0, 3, 0.2)] {
            let idx = plan.idx(crop, start);
            plan.plantings[idx] = area;
            for m in start..catalog.window_end(crop, start) {
                let idx = plan.idx(crop, m);
                plan.allocation[idx] += area;
            }
        }
        plan
    }

    #[test]
    fn test_repair_keeps_feasible_plan_intact() {
        let catalog = sample_catalog();
        let plan = consistent_plan(&catalog);
        let mut rng = SmallRng::seed_from_u64(42);

        let repaired = repair(&plan, &catalog, &mut rng);
        for idx in 0..plan.allocation.len() {
            assert!((repaired.allocation[idx] - plan.allocation[idx]).abs() < 1e-12);
            assert!((repaired.plantings[idx] - plan.plantings[idx]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_repair_restores_land_invariant() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(17);

        // Deliberately over-committed: both crops claim most of the land
        // in overlapping windows.
        let mut broken = Plan::empty(2, 5);
        for (crop, start, area) in [(0usize, 0usize, 0.9), (1, 0, 0.8), (0, 1, 0.7)] {
            let idx = broken.idx(crop, start);
            broken.plantings[idx] = area;
            for m in start..catalog.window_end(crop, start) {
                let idx = broken.idx(crop, m);
                broken.allocation[idx] += area;
            }
        }
        assert!(broken.land_use(1) > 1.0);

        for _ in 0..20 {
            let repaired = repair(&broken, &catalog, &mut rng);
            for month in 0..catalog.months {
                assert!(repaired.land_use(month) <= 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_repair_rebuilds_allocation_from_plantings_only() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(5);

        // Garbage in the allocation vector must not survive repair.
        let mut plan = consistent_plan(&catalog);
        plan.allocation[3] += 5.0;
        let reference = consistent_plan(&catalog);

        let repaired = repair(&plan, &catalog, &mut rng);
        for idx in 0..reference.allocation.len() {
            assert!((repaired.allocation[idx] - reference.allocation[idx]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_crossover_pass_through() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Plan::generate(&catalog, &mut rng);
        let p2 = Plan::generate(&catalog, &mut rng);

        let (c1, c2) = crossover(&p1, &p2, 0.0, &mut rng);
        assert_eq!(c1.allocation, p1.allocation);
        assert_eq!(c1.plantings, p1.plantings);
        assert_eq!(c2.allocation, p2.allocation);
        assert_eq!(c2.plantings, p2.plantings);
    }

    #[test]
    fn test_crossover_swaps_a_suffix() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Plan::generate(&catalog, &mut rng);
        let p2 = Plan::generate(&catalog, &mut rng);

        let (c1, c2) = crossover(&p1, &p2, 1.0, &mut rng);

        // Every month is either untouched in both children or swapped in
        // both, and the swapped months form a suffix.
        let mut swap_started = false;
        for month in 0..catalog.months {
            let mut swapped = true;
            let mut kept = true;
            for crop in 0..catalog.crop_count() {
                let idx = p1.idx(crop, month);
                swapped &= c1.allocation[idx] == p2.allocation[idx]
                    && c2.allocation[idx] == p1.allocation[idx]
                    && c1.plantings[idx] == p2.plantings[idx]
                    && c2.plantings[idx] == p1.plantings[idx];
                kept &= c1.allocation[idx] == p1.allocation[idx]
                    && c2.allocation[idx] == p2.allocation[idx];
            }
            if swap_started {
                assert!(swapped, "non-suffix swap at month {month}");
            } else if swapped && !kept {
                swap_started = true;
            } else {
                assert!(kept, "month {month} neither kept nor swapped");
            }
        }
    }

    #[test]
    fn test_mutated_plan_stays_feasible() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(23);

        for _ in 0..30 {
            let plan = Plan::generate(&catalog, &mut rng);
            let mutated = mutate(&plan, &catalog, &mut rng);
            for month in 0..catalog.months {
                assert!(
                    mutated.land_use(month) <= 1.0 + 1e-9,
                    "month {month} overallocated after mutation"
                );
            }
        }
    }

    #[test]
    fn test_mutate_empty_plan_is_noop() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(1);
        let empty = Plan::empty(2, 5);

        let mutated = mutate(&empty, &catalog, &mut rng);
        assert_eq!(mutated.allocation, empty.allocation);
        assert_eq!(mutated.plantings, empty.plantings);
    }

    #[test]
    fn test_mutate_shrinks_or_regrows() {
        let catalog = sample_catalog();
        let mut rng = SmallRng::seed_from_u64(37);
        let plan = consistent_plan(&catalog);

        // Across many trials the mutated plan must differ from its input
        // (one planting always shrinks by at least 1%).
        let changed = (0..20)
            .map(|_| mutate(&plan, &catalog, &mut rng))
            .filter(|mutated| mutated.plantings != plan.plantings)
            .count();
        assert_eq!(changed, 20);
    }

    #[test]
    fn test_redraw_fraction_bounded() {
        let mut rng = SmallRng::seed_from_u64(2);
        let chi = ChiSquared::new(AREA_DRAW_DF).unwrap();
        for _ in 0..1000 {
            let fraction = redraw_fraction(&chi, &mut rng);
            assert!((0.0..=1.0).contains(&fraction));
        }
    }
}
