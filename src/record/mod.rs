//! Substance records as returned by the remote catalog
//!
//! A `Substance` is identified by its UN registry number. Everything else is
//! descriptive and optional: the catalog may omit or null any field, and the
//! defaults are applied here, at decode time, rather than in the stores or the
//! query controller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendering used for a descriptive field the catalog left empty
pub const UNSPECIFIED: &str = "not specified";

/// UN registry number, the natural key of a substance
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct RegistryNumber(u32);

impl RegistryNumber {
    #[must_use]
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for RegistryNumber {
    fn from(number: u32) -> Self {
        Self(number)
    }
}

impl fmt::Display for RegistryNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Registry numbers are conventionally written with four digits
        write!(f, "{:04}", self.0)
    }
}

/// Temperature thresholds, in degrees Celsius
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TemperatureProperties {
    pub boiling_point: Option<f64>,
    pub freeze_point: Option<f64>,
    pub melting_point: Option<f64>,
    pub flash_point: Option<f64>,
}

/// Health effects of exposure
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthInvolve {
    pub lethal: Option<f64>,
    pub limit_concentration: Option<f64>,
    pub involve_ways: Option<String>,
    pub symptoms: Option<String>,
    pub organ_impacts: Option<String>,
}

/// First-aid instructions per exposure route
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FirstAid {
    pub eyes: Option<String>,
    pub skin: Option<String>,
    pub inhalation: Option<String>,
    pub swallowing: Option<String>,
}

/// NFPA-style hazard diamond ratings
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DangerSquare {
    pub health: Option<u8>,
    pub fire: Option<u8>,
    pub chemistry: Option<u8>,
    pub other: Option<u8>,
}

/// A hazardous-substance record
///
/// Two records with the same `oon_number` are the same logical entity; the
/// stores keep whichever was written last.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Substance {
    pub oon_number: RegistryNumber,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub dangerous_number: Option<String>,
    #[serde(default)]
    pub formula: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub aggregation_state: Option<String>,
    #[serde(default)]
    pub density_air: Option<String>,
    #[serde(default)]
    pub density_water: Option<String>,
    #[serde(default)]
    pub solubility: Option<String>,
    #[serde(default)]
    pub general_danger: Option<String>,
    #[serde(default)]
    pub water_danger: Option<String>,
    #[serde(default)]
    pub imdg: Option<String>,
    #[serde(default)]
    pub haz: Option<String>,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub respiration_recommendation: Option<String>,
    #[serde(default)]
    pub skin_defense_recommendation: Option<String>,
    #[serde(default)]
    pub molecular_weight: Option<f64>,
    #[serde(default)]
    pub flammability_class: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub temperature_properties: TemperatureProperties,
    #[serde(default, deserialize_with = "null_as_default")]
    pub health_involve: HealthInvolve,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_aid: FirstAid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub danger_square: DangerSquare,
}

impl Substance {
    /// Create a record with only its key and name set
    #[must_use]
    pub fn new(oon_number: u32, name: impl Into<String>) -> Self {
        Self {
            oon_number: RegistryNumber::new(oon_number),
            name: name.into(),
            dangerous_number: None,
            formula: None,
            description: None,
            aggregation_state: None,
            density_air: None,
            density_water: None,
            solubility: None,
            general_danger: None,
            water_danger: None,
            imdg: None,
            haz: None,
            container: None,
            respiration_recommendation: None,
            skin_defense_recommendation: None,
            molecular_weight: None,
            flammability_class: None,
            temperature_properties: TemperatureProperties::default(),
            health_involve: HealthInvolve::default(),
            first_aid: FirstAid::default(),
            danger_square: DangerSquare::default(),
        }
    }

    /// Set the chemical formula
    #[must_use]
    pub fn with_formula(mut self, formula: impl Into<String>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// The record's identity
    #[must_use]
    pub const fn key(&self) -> RegistryNumber {
        self.oon_number
    }

    /// Minimal display fields used by history entries
    #[must_use]
    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            oon_number: self.oon_number,
            name: self.name.clone(),
            formula: self.formula.clone().unwrap_or_default(),
        }
    }

    /// Render an optional text field, substituting `UNSPECIFIED` when empty
    #[must_use]
    pub fn text_or_unspecified(field: Option<&str>) -> &str {
        match field {
            Some(text) if !text.trim().is_empty() => text,
            _ => UNSPECIFIED,
        }
    }
}

/// Key plus the fields a list row needs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    pub oon_number: RegistryNumber,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub formula: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
