//! Tunables for the geometry and bonding stages, and the simulation
//! environment shared by every thermodynamic calculation.
//!
//! All config structs deserialize from TOML with per-field defaults, so a
//! document only needs to name the values it changes:
//!
//! ```
//! use chemsandbox::SandboxConfig;
//!
//! let config = SandboxConfig::from_toml_str("[bonding]\nionic_threshold = 2.0\n").unwrap();
//! assert_eq!(config.bonding.ionic_threshold, 2.0);
//! assert_eq!(config.geometry.relaxation_passes, 3);
//! ```

use serde::{Deserialize, Serialize};

/// Standard ambient temperature in kelvin.
pub const STANDARD_TEMPERATURE: f64 = 298.15;

/// Standard pressure in atmospheres.
pub const STANDARD_PRESSURE: f64 = 1.0;

/// Global temperature and pressure read by the thermodynamic model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Kelvin.
    pub temperature: f64,
    /// Atmospheres, always positive.
    pub pressure: f64,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            temperature: STANDARD_TEMPERATURE,
            pressure: STANDARD_PRESSURE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Edge length of a spatial grid cell.
    pub cell_size: f64,
    /// Pairwise relaxation sweeps per resolution.
    pub relaxation_passes: usize,
    /// No two atoms are pushed closer than this.
    pub min_separation_floor: f64,
    /// Minimum separation as a fraction of the summed visual radii.
    pub separation_factor: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            relaxation_passes: 3,
            min_separation_floor: 60.0,
            separation_factor: 0.8,
        }
    }
}

impl GeometryConfig {
    pub fn min_separation(&self, radius_a: f64, radius_b: f64) -> f64 {
        (self.separation_factor * (radius_a + radius_b)).max(self.min_separation_floor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BondingConfig {
    /// Pairs farther apart than this are never considered.
    pub candidate_floor: f64,
    /// Candidate distance as a multiple of the summed visual radii.
    pub candidate_factor: f64,
    /// Single-bond threshold as a fraction of the candidate distance.
    pub single_ratio: f64,
    pub double_ratio: f64,
    pub triple_ratio: f64,
    /// Electronegativity difference above which a bond is ionic.
    pub ionic_threshold: f64,
}

impl Default for BondingConfig {
    fn default() -> Self {
        Self {
            candidate_floor: 100.0,
            candidate_factor: 1.35,
            single_ratio: 0.95,
            double_ratio: 0.75,
            triple_ratio: 0.65,
            ionic_threshold: 1.7,
        }
    }
}

/// Distance thresholds for one atom pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondThresholds {
    pub candidate: f64,
    pub single: f64,
    pub double: f64,
    pub triple: f64,
}

impl BondingConfig {
    pub fn thresholds(&self, radius_a: f64, radius_b: f64) -> BondThresholds {
        let candidate = (self.candidate_factor * (radius_a + radius_b)).max(self.candidate_floor);
        BondThresholds {
            candidate,
            single: candidate * self.single_ratio,
            double: candidate * self.double_ratio,
            triple: candidate * self.triple_ratio,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub geometry: GeometryConfig,
    pub bonding: BondingConfig,
}

impl SandboxConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SandboxConfig::default();
        assert_eq!(c.geometry.cell_size, 100.0);
        assert_eq!(c.geometry.relaxation_passes, 3);
        assert_eq!(c.bonding.ionic_threshold, 1.7);
        let env = Environment::default();
        assert_eq!(env.temperature, STANDARD_TEMPERATURE);
        assert_eq!(env.pressure, 1.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = SandboxConfig::from_toml_str("[geometry]\ncell_size = 50.0\n").unwrap();
        assert_eq!(c.geometry.cell_size, 50.0);
        assert_eq!(c.geometry.min_separation_floor, 60.0);
        assert_eq!(c.bonding, BondingConfig::default());
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(SandboxConfig::from_toml_str("").unwrap(), SandboxConfig::default());
    }

    #[test]
    fn malformed_toml_errors() {
        assert!(SandboxConfig::from_toml_str("[geometry\n").is_err());
        assert!(SandboxConfig::from_toml_str("[geometry]\ncell_size = \"big\"\n").is_err());
    }

    #[test]
    fn separation_floor_applies() {
        let g = GeometryConfig::default();
        assert_eq!(g.min_separation(26.0, 26.0), 60.0);
        assert!((g.min_separation(42.0, 42.0) - 67.2).abs() < 1e-9);
    }

    #[test]
    fn thresholds_scale_with_size() {
        let b = BondingConfig::default();
        let small = b.thresholds(26.0, 26.0);
        assert_eq!(small.candidate, 100.0);
        assert!((small.single - 95.0).abs() < 1e-9);
        assert!((small.double - 75.0).abs() < 1e-9);
        assert!((small.triple - 65.0).abs() < 1e-9);
        let large = b.thresholds(42.0, 42.0);
        assert!((large.candidate - 113.4).abs() < 1e-9);
        assert!(large.triple < large.double && large.double < large.single);
    }
}
