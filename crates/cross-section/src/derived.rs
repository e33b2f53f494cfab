//! Derived products computed from sampled raw profiles.
//!
//! A cross-section request names a set of [`Product`]s. Each product knows
//! which raw fields it needs and how to compute itself, elementwise, from
//! the sampled profiles of those fields.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::dataset::RawField;
use crate::error::{CrossSectionError, Result};
use crate::thermo;
use crate::types::{DerivedField, VerticalProfile};

/// A quantity that can be requested along a cross section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Product {
    /// Air temperature in °F.
    Temperature,
    /// Relative humidity in percent.
    RelativeHumidity,
    /// Horizontal wind speed in mph.
    WindSpeed,
    /// Potential temperature θ in K.
    PotentialTemperature,
    /// Equivalent potential temperature θe in K.
    EquivalentPotentialTemperature,
    /// Water vapor mixing ratio in kg/kg.
    MixingRatio,
    /// Vertical velocity (omega) in native units, passed through.
    VerticalVelocity,
}

impl Product {
    pub const ALL: [Product; 7] = [
        Product::Temperature,
        Product::RelativeHumidity,
        Product::WindSpeed,
        Product::PotentialTemperature,
        Product::EquivalentPotentialTemperature,
        Product::MixingRatio,
        Product::VerticalVelocity,
    ];

    /// Raw fields that must be sampled to compute this product.
    pub fn required_fields(&self) -> &'static [RawField] {
        use RawField::*;
        match self {
            Product::Temperature => &[Temperature],
            Product::RelativeHumidity => &[Temperature, Pressure, SpecificHumidity],
            Product::WindSpeed => &[UWind, VWind],
            Product::PotentialTemperature => &[Temperature, Pressure],
            Product::EquivalentPotentialTemperature => &[Temperature, Pressure],
            Product::MixingRatio => &[SpecificHumidity],
            Product::VerticalVelocity => &[VerticalVelocity],
        }
    }

    /// Identifier used in configs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Product::Temperature => "temperature",
            Product::RelativeHumidity => "relative_humidity",
            Product::WindSpeed => "wind_speed",
            Product::PotentialTemperature => "potential_temperature",
            Product::EquivalentPotentialTemperature => "equivalent_potential_temperature",
            Product::MixingRatio => "mixing_ratio",
            Product::VerticalVelocity => "vertical_velocity",
        }
    }

    pub fn units(&self) -> &'static str {
        match self {
            Product::Temperature => "°F",
            Product::RelativeHumidity => "%",
            Product::WindSpeed => "mph",
            Product::PotentialTemperature | Product::EquivalentPotentialTemperature => "K",
            Product::MixingRatio => "kg/kg",
            Product::VerticalVelocity => "Pa/s",
        }
    }

    /// Human-readable title for plot annotations.
    pub fn title(&self) -> &'static str {
        match self {
            Product::Temperature => "Temperature",
            Product::RelativeHumidity => "Relative Humidity",
            Product::WindSpeed => "Wind Speed",
            Product::PotentialTemperature => "Potential Temperature",
            Product::EquivalentPotentialTemperature => "Theta-e",
            Product::MixingRatio => "Mixing Ratio",
            Product::VerticalVelocity => "Omega",
        }
    }

    /// Compute this product from sampled profiles.
    pub fn compute(&self, sampled: &SampledFields) -> Result<DerivedField> {
        match self {
            Product::Temperature => Ok(temperature_fahrenheit(
                sampled.require(RawField::Temperature, *self)?,
            )),
            Product::RelativeHumidity => relative_humidity(
                sampled.require(RawField::Temperature, *self)?,
                sampled.require(RawField::Pressure, *self)?,
                sampled.require(RawField::SpecificHumidity, *self)?,
            ),
            Product::WindSpeed => wind_speed(
                sampled.require(RawField::UWind, *self)?,
                sampled.require(RawField::VWind, *self)?,
            ),
            Product::PotentialTemperature => potential_temperature(
                sampled.require(RawField::Temperature, *self)?,
                sampled.require(RawField::Pressure, *self)?,
            ),
            Product::EquivalentPotentialTemperature => equivalent_potential_temperature(
                sampled.require(RawField::Temperature, *self)?,
                sampled.require(RawField::Pressure, *self)?,
            ),
            Product::MixingRatio => Ok(mixing_ratio(
                sampled.require(RawField::SpecificHumidity, *self)?,
            )),
            Product::VerticalVelocity => {
                Ok(sampled.require(RawField::VerticalVelocity, *self)?.clone())
            }
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Product {
    type Err = CrossSectionError;

    /// Parse a product name (case-insensitive, `-` accepted for `_`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Product::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| CrossSectionError::config(format!("unknown product '{}'", s)))
    }
}

/// Union of raw fields needed by `products`, always including pressure
/// (the vertical coordinate).
pub fn required_fields(products: &[Product]) -> BTreeSet<RawField> {
    let mut fields: BTreeSet<RawField> = products
        .iter()
        .flat_map(|p| p.required_fields().iter().copied())
        .collect();
    fields.insert(RawField::Pressure);
    fields
}

/// Raw profiles sampled along one path, keyed by field.
#[derive(Debug, Clone, Default)]
pub struct SampledFields {
    profiles: BTreeMap<RawField, VerticalProfile>,
}

impl SampledFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: RawField, profile: VerticalProfile) {
        self.profiles.insert(field, profile);
    }

    pub fn get(&self, field: RawField) -> Option<&VerticalProfile> {
        self.profiles.get(&field)
    }

    /// Get a profile needed by `product`, or a MissingField error.
    pub fn require(&self, field: RawField, product: Product) -> Result<&VerticalProfile> {
        self.get(field).ok_or_else(|| CrossSectionError::MissingField {
            field: field.short_name().to_string(),
            product: product.name().to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// ============================================================================
// Profile-level formulas
// ============================================================================

pub fn relative_humidity(
    t: &VerticalProfile,
    p: &VerticalProfile,
    q: &VerticalProfile,
) -> Result<DerivedField> {
    t.zip3_with(p, q, thermo::relative_humidity)
}

pub fn temperature_fahrenheit(t: &VerticalProfile) -> DerivedField {
    t.map(thermo::kelvin_to_fahrenheit)
}

pub fn wind_speed(u: &VerticalProfile, v: &VerticalProfile) -> Result<DerivedField> {
    u.zip_with(v, thermo::wind_speed_mph)
}

pub fn mixing_ratio(q: &VerticalProfile) -> DerivedField {
    q.map(thermo::mixing_ratio)
}

pub fn potential_temperature(t: &VerticalProfile, p: &VerticalProfile) -> Result<DerivedField> {
    t.zip_with(p, thermo::potential_temperature)
}

/// Saturation vapor pressure (Pa) at every sample.
pub fn saturation_vapor_pressure(t: &VerticalProfile) -> DerivedField {
    t.map(thermo::saturation_vapor_pressure)
}

pub fn saturation_mixing_ratio(
    e_sat: &VerticalProfile,
    p: &VerticalProfile,
) -> Result<DerivedField> {
    e_sat.zip_with(p, thermo::saturation_mixing_ratio)
}

pub fn latent_heat_of_vaporization(t: &VerticalProfile) -> DerivedField {
    t.map(thermo::latent_heat_of_vaporization)
}

/// θe built from the θ, saturation mixing ratio and latent heat profiles.
pub fn equivalent_potential_temperature(
    t: &VerticalProfile,
    p: &VerticalProfile,
) -> Result<DerivedField> {
    let theta = potential_temperature(t, p)?;
    let smr = saturation_mixing_ratio(&saturation_vapor_pressure(t), p)?;
    let lv = latent_heat_of_vaporization(t);
    let exponent = smr.zip3_with(&lv, t, |w, l, tk| w * l / (thermo::CP_DRY_AIR * tk))?;
    theta.zip_with(&exponent, |theta, x| theta * x.exp())
}

/// Log-pressure vertical coordinate for the renderer.
pub fn log_pressure(p: &VerticalProfile) -> VerticalProfile {
    p.map(thermo::log_pressure)
}
