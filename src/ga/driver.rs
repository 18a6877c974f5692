//! Evolution driver: runs the configured number of generations.

use rand::Rng;

use crate::models::CropCatalog;
use crate::validation::{validate_input, ValidationError};

use super::config::GaConfig;
use super::chromosome::Plan;
use super::population::Population;

/// Outcome of a full evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best plan found across all generations.
    pub best: Plan,
    /// Score of the best plan (negated total harvest).
    pub best_score: f64,
    /// Number of generations run.
    pub generations: usize,
    /// Best score after initialization and after each generation.
    /// Non-increasing, by elitism.
    pub score_history: Vec<f64>,
}

/// Validates the inputs, then runs the full evolutionary search.
///
/// Thread a seeded generator through for replayable runs:
///
/// ```no_run
/// use agroplan::ga::{run, GaConfig};
/// use agroplan::models::CropCatalog;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let catalog = CropCatalog::new(vec![/* ... */], 8);
/// let mut rng = SmallRng::seed_from_u64(42);
/// let result = run(&catalog, &GaConfig::default(), &mut rng).unwrap();
/// println!("harvest: {}", -result.best_score);
/// ```
pub fn run<R: Rng>(
    catalog: &CropCatalog,
    config: &GaConfig,
    rng: &mut R,
) -> Result<EvolutionResult, Vec<ValidationError>> {
    validate_input(catalog, config)?;

    let mut population = Population::initialize(catalog, config.clone(), rng);
    let mut best = population.best().clone();
    let mut score_history = Vec::with_capacity(config.generations + 1);
    score_history.push(best.score);

    for _ in 0..config.generations {
        population.evolve(catalog, rng);
        let current = population.best();
        if current.score < best.score {
            best = current.clone();
        }
        score_history.push(best.score);
    }

    Ok(EvolutionResult {
        best_score: best.score,
        best,
        generations: config.generations,
        score_history,
    })
}
