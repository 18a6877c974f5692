//! Search configuration.

use serde::{Deserialize, Serialize};

/// Genetic-algorithm parameters.
///
/// Defaults match the tuning the search was calibrated with: population
/// 100, 100 generations, crossover 0.8, mutation 0.05.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaConfig {
    /// Plans per generation. Must be even: offspring are made in pairs.
    pub population_size: usize,
    /// Number of generations to run.
    pub generations: usize,
    /// Probability that a parent pair is recombined rather than passed
    /// through unchanged.
    pub crossover_rate: f64,
    /// Probability that an offspring is mutated after repair.
    pub mutation_rate: f64,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 100,
            crossover_rate: 0.8,
            mutation_rate: 0.05,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Sets the generation count.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }
}
