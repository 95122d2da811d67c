//! Generic `A + B <-> AB` reaction templates.

use serde::{Deserialize, Serialize};

use crate::bond::BondOrder;
use crate::bond_energy::bond_energy;
use crate::element::Element;

use super::error::KineticsError;

/// Intrinsic barrier of a thermoneutral reaction, kJ/mol.
pub const EVANS_POLANYI_INTERCEPT: f64 = 50.0;
/// Transfer coefficient for exothermic reactions.
pub const EVANS_POLANYI_EXOTHERMIC: f64 = 0.3;
/// Transfer coefficient for endothermic reactions.
pub const EVANS_POLANYI_ENDOTHERMIC: f64 = 0.7;
/// Smallest barrier ever assigned, kJ/mol.
pub const MIN_ACTIVATION_ENERGY: f64 = 5.0;

/// Activation energy from reaction enthalpy, `Ea = E0 + α·ΔH`.
///
/// The barrier is never below the enthalpy itself nor below
/// [`MIN_ACTIVATION_ENERGY`].
pub fn evans_polanyi(enthalpy: f64) -> f64 {
    let alpha = if enthalpy < 0.0 {
        EVANS_POLANYI_EXOTHERMIC
    } else {
        EVANS_POLANYI_ENDOTHERMIC
    };
    let ea = EVANS_POLANYI_INTERCEPT + alpha * enthalpy;
    ea.max(enthalpy.max(MIN_ACTIVATION_ENERGY))
}

fn total_bond_energy(bonds: &[(&Element, &Element, BondOrder)]) -> f64 {
    bonds.iter().map(|&(a, b, order)| bond_energy(a, b, order)).sum()
}

/// A two-reactant, one-product reaction.
///
/// Energies are kJ/mol. `enthalpy` is negative for an exothermic forward
/// reaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionTemplate {
    pub name: String,
    pub reactant_a: String,
    pub reactant_b: String,
    pub product: String,
    pub activation_energy: f64,
    pub enthalpy: f64,
    pub reversible: bool,
}

impl ReactionTemplate {
    /// Fast, strongly exothermic, one-way.
    pub fn synthesis() -> Self {
        Self {
            name: "synthesis".into(),
            reactant_a: "A".into(),
            reactant_b: "B".into(),
            product: "AB".into(),
            activation_energy: 60.0,
            enthalpy: -80.0,
            reversible: false,
        }
    }

    /// Mildly exothermic and reversible, settles into a visible balance.
    pub fn equilibrium() -> Self {
        Self {
            name: "equilibrium".into(),
            reactant_a: "A".into(),
            reactant_b: "B".into(),
            product: "AB".into(),
            activation_energy: 50.0,
            enthalpy: -20.0,
            reversible: true,
        }
    }

    /// Uphill and reversible; needs heat to make progress.
    pub fn endothermic() -> Self {
        Self {
            name: "endothermic".into(),
            reactant_a: "A".into(),
            reactant_b: "B".into(),
            product: "AB".into(),
            activation_energy: 90.0,
            enthalpy: 40.0,
            reversible: true,
        }
    }

    pub fn builtin(name: &str) -> Result<Self, KineticsError> {
        match name {
            "synthesis" => Ok(Self::synthesis()),
            "equilibrium" => Ok(Self::equilibrium()),
            "endothermic" => Ok(Self::endothermic()),
            other => Err(KineticsError::UnknownTemplate(other.to_string())),
        }
    }

    /// Derive a reversible template from the bonds a reaction breaks and
    /// forms. `ΔH = Σ broken − Σ formed` with each bond priced by the
    /// Pauling model, and the barrier follows [`evans_polanyi`].
    pub fn from_bonds(
        name: &str,
        broken: &[(&Element, &Element, BondOrder)],
        formed: &[(&Element, &Element, BondOrder)],
    ) -> Self {
        let enthalpy = total_bond_energy(broken) - total_bond_energy(formed);
        Self {
            name: name.to_string(),
            reactant_a: "A".into(),
            reactant_b: "B".into(),
            product: "AB".into(),
            activation_energy: evans_polanyi(enthalpy),
            enthalpy,
            reversible: true,
        }
    }

    pub fn with_labels(mut self, a: &str, b: &str, product: &str) -> Self {
        self.reactant_a = a.to_string();
        self.reactant_b = b.to_string();
        self.product = product.to_string();
        self
    }

    /// Barrier of the reverse reaction, `Ea − ΔH`.
    pub fn reverse_activation_energy(&self) -> f64 {
        self.activation_energy - self.enthalpy
    }

    pub fn validate(&self) -> Result<(), KineticsError> {
        let invalid = |reason: &str| KineticsError::InvalidTemplate {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if !self.activation_energy.is_finite() || self.activation_energy < 0.0 {
            return Err(invalid("activation energy must be finite and non-negative"));
        }
        if !self.enthalpy.is_finite() {
            return Err(invalid("enthalpy must be finite"));
        }
        if self.reversible && self.reverse_activation_energy() < 0.0 {
            return Err(invalid("reverse barrier would be negative"));
        }
        Ok(())
    }
}
