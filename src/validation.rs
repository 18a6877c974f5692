//! Input validation for planning runs.
//!
//! Checks structural integrity of the crop catalog and the GA
//! configuration before any generation runs. Detects:
//! - Empty catalogs (no crops, zero-month horizon)
//! - Mask and water arrays inconsistent with the catalog dimensions
//! - Out-of-range rates, areas, and growth lengths
//! - Population sizes that cannot be paired into offspring
//!
//! Violations are fatal: the search never starts on bad input. Within
//! the algorithm itself, rejection of an individual planting attempt is
//! a normal outcome, never an error.

use crate::ga::GaConfig;
use crate::models::CropCatalog;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The catalog has no crops or no months.
    EmptyCatalog,
    /// An array's length disagrees with the catalog dimensions.
    LengthMismatch,
    /// A numeric parameter is outside its valid range.
    ValueOutOfRange,
    /// The population size cannot be split into offspring pairs.
    InvalidPopulationSize,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a catalog and configuration for a planning run.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(catalog: &CropCatalog, config: &GaConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if catalog.crops.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "catalog has no crops",
        ));
    }
    if catalog.months == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCatalog,
            "planning horizon is zero months",
        ));
    }

    let expected_mask = catalog.crops.len() * catalog.months;
    if catalog.cultivable.len() != expected_mask {
        errors.push(ValidationError::new(
            ValidationErrorKind::LengthMismatch,
            format!(
                "cultivability mask has {} entries, expected {}",
                catalog.cultivable.len(),
                expected_mask
            ),
        ));
    }
    if catalog.initial_water.len() != catalog.months {
        errors.push(ValidationError::new(
            ValidationErrorKind::LengthMismatch,
            format!(
                "initial water has {} entries, expected {}",
                catalog.initial_water.len(),
                catalog.months
            ),
        ));
    }

    if catalog.total_area <= 0.0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::ValueOutOfRange,
            format!("total area must be positive, got {}", catalog.total_area),
        ));
    }

    for crop in &catalog.crops {
        if crop.growth_months == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ValueOutOfRange,
                format!("crop '{}' has a zero-month growth length", crop.name),
            ));
        }
        if crop.water_requirement < 0.0 || crop.max_yield < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ValueOutOfRange,
                format!("crop '{}' has negative water or yield parameters", crop.name),
            ));
        }
    }

    if config.population_size == 0 || config.population_size % 2 != 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidPopulationSize,
            format!(
                "population size must be even and nonzero, got {}",
                config.population_size
            ),
        ));
    }

    for (name, rate) in [
        ("crossover", config.crossover_rate),
        ("mutation", config.mutation_rate),
    ] {
        if !(0.0..=1.0).contains(&rate) {
            errors.push(ValidationError::new(
                ValidationErrorKind::ValueOutOfRange,
                format!("{name} rate must be within [0, 1], got {rate}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
