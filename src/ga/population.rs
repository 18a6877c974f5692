//! Population and generational replacement.
//!
//! One generation is a fixed-size pool of evaluated plans. `evolve`
//! produces a full complement of offspring (uniform parent selection,
//! crossover, repair, optional mutation), evaluates them, pools them
//! with the current generation, and keeps the best half: elitist (μ+λ)
//! truncation. The best score can therefore never get worse from one
//! generation to the next.
//!
//! # Reference
//! Eiben & Smith (2015), "Introduction to Evolutionary Computing",
//! Ch. 5 (survivor selection)

use rand::Rng;

use crate::models::CropCatalog;

use super::config::GaConfig;
use super::chromosome::Plan;
use super::fitness;
use super::operators::{crossover, mutate, repair};

/// A generation of candidate plans.
#[derive(Debug, Clone)]
pub struct Population {
    /// Current generation, scores evaluated.
    pub plans: Vec<Plan>,
    config: GaConfig,
}

impl Population {
    /// Builds and evaluates an initial generation of stochastically
    /// constructed plans.
    pub fn initialize<R: Rng>(catalog: &CropCatalog, config: GaConfig, rng: &mut R) -> Self {
        let mut plans: Vec<Plan> = (0..config.population_size)
            .map(|_| Plan::generate(catalog, rng))
            .collect();
        for plan in &mut plans {
            plan.score = fitness::evaluate(plan, catalog);
        }
        Self { plans, config }
    }

    /// Number of plans in the current generation.
    pub fn size(&self) -> usize {
        self.plans.len()
    }

    /// The best plan of the current generation (lowest score).
    pub fn best(&self) -> &Plan {
        self.plans
            .iter()
            .min_by(|a, b| a.score.total_cmp(&b.score))
            .expect("population is never empty")
    }

    /// Advances one generation.
    ///
    /// Produces `population_size / 2` offspring pairs: parents drawn
    /// uniformly with replacement (selection pressure comes entirely
    /// from survivor truncation), recombined, each offspring repaired
    /// and mutated with probability `mutation_rate`, then evaluated.
    /// Parents and offspring are pooled, sorted ascending by score, and
    /// truncated back to the configured size.
    pub fn evolve<R: Rng>(&mut self, catalog: &CropCatalog, rng: &mut R) {
        let size = self.config.population_size;
        let mut offspring = Vec::with_capacity(size);

        for _ in 0..size / 2 {
            let first = rng.random_range(0..self.plans.len());
            let second = rng.random_range(0..self.plans.len());
            let (child1, child2) = crossover(
                &self.plans[first],
                &self.plans[second],
                self.config.crossover_rate,
                rng,
            );

            for child in [child1, child2] {
                let mut child = repair(&child, catalog, rng);
                if rng.random::<f64>() < self.config.mutation_rate {
                    child = mutate(&child, catalog, rng);
                }
                child.score = fitness::evaluate(&child, catalog);
                offspring.push(child);
            }
        }

        self.plans.append(&mut offspring);
        self.plans.sort_by(|a, b| a.score.total_cmp(&b.score));
        self.plans.truncate(size);
    }
}
