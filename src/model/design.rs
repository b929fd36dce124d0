//! Robot design parameters
//!
//! A design file holds the structural parameters a user edits, written in
//! display units. [`DesignFile::to_request`] converts it into the SI request
//! body the computation service accepts.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::units::{AngleUnit, LengthUnit};
use crate::model::result::TendonConfig;
use crate::yaml::{parse_yaml_file, YamlError};

/// Units the design file is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayUnits {
    pub angle: AngleUnit,
    pub length: LengthUnit,
}

/// Tendon routing as written in a design file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignTendonConfig {
    #[serde(default = "default_tendon_count")]
    pub count: u32,
    /// Eyelet radius in the file's length unit
    pub radius: f64,
    /// Eyelet offset in the file's length unit
    #[serde(default)]
    pub coupling_offset: f64,
}

fn default_tendon_count() -> u32 {
    3
}

/// Editable robot parameters, display units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignFile {
    #[serde(default)]
    pub units: DisplayUnits,
    /// Bending angle per segment
    pub bending_angles: Vec<f64>,
    /// Bending plane rotation per segment
    pub rotation_angles: Vec<f64>,
    pub backbone_lengths: Vec<f64>,
    pub coupling_lengths: Vec<f64>,
    /// Points per backbone segment
    pub discretization_steps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tendon_config: Option<DesignTendonConfig>,
}

/// Request body for the computation service, SI units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PccRequest {
    pub bending_angles: Vec<f64>,
    pub rotation_angles: Vec<f64>,
    pub backbone_lengths: Vec<f64>,
    pub coupling_lengths: Vec<f64>,
    pub discretization_steps: u32,
    pub tendon_config: TendonConfig,
}

impl DesignFile {
    /// Read a design from YAML (or JSON) on disk
    pub fn load(path: &Path) -> Result<Self, YamlError> {
        parse_yaml_file(path)
    }

    /// Convert every angle and length to SI
    pub fn to_request(&self) -> PccRequest {
        let angle = self.units.angle;
        let length = self.units.length;

        let tendon_config = match &self.tendon_config {
            Some(tc) => TendonConfig {
                count: tc.count,
                radius: length.to_si(tc.radius),
                coupling_offset: length.to_si(tc.coupling_offset),
            },
            None => TendonConfig::default(),
        };

        PccRequest {
            bending_angles: convert_all(&self.bending_angles, |v| angle.to_si(v)),
            rotation_angles: convert_all(&self.rotation_angles, |v| angle.to_si(v)),
            backbone_lengths: convert_all(&self.backbone_lengths, |v| length.to_si(v)),
            coupling_lengths: convert_all(&self.coupling_lengths, |v| length.to_si(v)),
            discretization_steps: self.discretization_steps,
            tendon_config,
        }
    }

    /// Number of bending segments
    pub fn segment_count(&self) -> usize {
        self.bending_angles.len()
    }
}

fn convert_all(values: &[f64], f: impl Fn(f64) -> f64) -> Vec<f64> {
    values.iter().map(|v| f(*v)).collect()
}
