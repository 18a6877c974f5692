//! Crop and field parameter models.
//!
//! A [`CropCatalog`] holds the agronomic constants for one planning run:
//! the crops under consideration, the monthly planning horizon, the
//! cultivability mask, the monthly water supply, the total arable area,
//! and the initial soil salinity. The catalog is read-only configuration;
//! the search never mutates it.
//!
//! # Reference
//! - Doorenbos & Kassam (1979), FAO Irrigation and Drainage Paper 33
//! - Maas & Hoffman (1977), "Crop Salt Tolerance — Current Assessment"

use serde::{Deserialize, Serialize};

/// Agronomic constants for a single crop.
///
/// Water volumes are cubic meters per hectare per month; yields are tons
/// per hectare; salinity is electrical conductivity (dS/m).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    /// Human-readable name.
    pub name: String,
    /// Growth length in months from planting to harvest.
    pub growth_months: usize,
    /// Water requirement per hectare per month.
    pub water_requirement: f64,
    /// Maximum attainable yield per hectare.
    pub max_yield: f64,
    /// Yield reduction (percent points) per salinity unit above the
    /// critical threshold.
    pub yield_reduction: f64,
    /// Salinity level above which yield starts to decline.
    pub critical_salinity: f64,
    /// Soil salinity change contributed per allocated hectare per month.
    /// Negative values model soil-improving crops.
    pub salinity_change: f64,
    /// Sensitivity of yield to water stress in the water-effect curve.
    pub water_susceptibility: f64,
}

impl Crop {
    /// Creates a crop with the given name and growth length.
    pub fn new(name: impl Into<String>, growth_months: usize) -> Self {
        Self {
            name: name.into(),
            growth_months,
            water_requirement: 0.0,
            max_yield: 0.0,
            yield_reduction: 0.0,
            critical_salinity: 0.0,
            salinity_change: 0.0,
            water_susceptibility: 0.0,
        }
    }

    /// Sets the monthly water requirement per hectare.
    pub fn with_water_requirement(mut self, requirement: f64) -> Self {
        self.water_requirement = requirement;
        self
    }

    /// Sets the maximum yield per hectare.
    pub fn with_max_yield(mut self, max_yield: f64) -> Self {
        self.max_yield = max_yield;
        self
    }

    /// Sets the salinity response: yield reduction per unit above the
    /// critical threshold.
    pub fn with_salinity_response(mut self, yield_reduction: f64, critical_salinity: f64) -> Self {
        self.yield_reduction = yield_reduction;
        self.critical_salinity = critical_salinity;
        self
    }

    /// Sets the per-hectare soil salinity change.
    pub fn with_salinity_change(mut self, change: f64) -> Self {
        self.salinity_change = change;
        self
    }

    /// Sets the water-stress susceptibility.
    pub fn with_water_susceptibility(mut self, susceptibility: f64) -> Self {
        self.water_susceptibility = susceptibility;
        self
    }
}

/// The full parameter table for a planning run.
///
/// Crop/month pairs are addressed through [`CropCatalog::index`], which
/// defines the flat layout (`crop + crop_count * month`) shared with
/// [`Plan`](crate::ga::Plan).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropCatalog {
    /// Crops under consideration, in index order.
    pub crops: Vec<Crop>,
    /// Number of months in the planning horizon.
    pub months: usize,
    /// Cultivability mask, one flag per (crop, month) in flat layout.
    pub cultivable: Vec<bool>,
    /// Fresh water supplied per month (cubic meters).
    pub initial_water: Vec<f64>,
    /// Total arable area (hectares).
    pub total_area: f64,
    /// Soil salinity at the start of the horizon (dS/m).
    pub initial_salinity: f64,
}

impl CropCatalog {
    /// Creates a catalog for the given crops and horizon.
    ///
    /// Every (crop, month) pair starts cultivable and every month starts
    /// with zero water; use the `with_*` builders to fill the table in.
    pub fn new(crops: Vec<Crop>, months: usize) -> Self {
        let mask_len = crops.len() * months;
        Self {
            crops,
            months,
            cultivable: vec![true; mask_len],
            initial_water: vec![0.0; months],
            total_area: 0.0,
            initial_salinity: 0.0,
        }
    }

    /// Sets the monthly water supply. Length must equal the horizon.
    pub fn with_initial_water(mut self, water: Vec<f64>) -> Self {
        self.initial_water = water;
        self
    }

    /// Sets the total arable area in hectares.
    pub fn with_total_area(mut self, area: f64) -> Self {
        self.total_area = area;
        self
    }

    /// Sets the initial soil salinity.
    pub fn with_initial_salinity(mut self, salinity: f64) -> Self {
        self.initial_salinity = salinity;
        self
    }

    /// Marks a (crop, month) pair as not cultivable.
    pub fn block(mut self, crop: usize, month: usize) -> Self {
        let idx = self.index(crop, month);
        self.cultivable[idx] = false;
        self
    }

    /// Number of crops in the catalog.
    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    /// Flat index of a (crop, month) pair.
    ///
    /// This is the single place the `crop + crop_count * month` layout is
    /// defined; allocation and planting vectors share it.
    pub fn index(&self, crop: usize, month: usize) -> usize {
        debug_assert!(crop < self.crops.len(), "crop {crop} out of range");
        debug_assert!(month < self.months, "month {month} out of range");
        crop + self.crops.len() * month
    }

    /// Whether the crop may grow during the given month.
    pub fn is_cultivable(&self, crop: usize, month: usize) -> bool {
        self.cultivable[self.index(crop, month)]
    }

    /// Whether the crop may grow through its entire growth window when
    /// planted at `start`. Months beyond the horizon are not checked; the
    /// window is clipped the same way planting commits are.
    pub fn window_cultivable(&self, crop: usize, start: usize) -> bool {
        let end = (start + self.crops[crop].growth_months).min(self.months);
        (start..end).all(|month| self.is_cultivable(crop, month))
    }

    /// Last month (exclusive) of a growth window planted at `start`,
    /// clipped to the horizon.
    pub fn window_end(&self, crop: usize, start: usize) -> usize {
        (start + self.crops[crop].growth_months).min(self.months)
    }
}
