//! Element records and the per-element rules derived from them.
//!
//! An [`Element`] is one row of the periodic-table catalog. Everything the
//! inference engine needs to know about an element (valence electrons,
//! bonding capacity, visual radius, metallic character) is computed from
//! that row here, so the rest of the crate never inspects raw catalog text.

use serde::Serialize;

/// Electronegativity used when the catalog has none (noble gases, most
/// superheavy elements).
pub const DEFAULT_ELECTRONEGATIVITY: f64 = 2.1;

/// Valence electron count assumed for a transition metal whose common ion
/// charge is missing or unparseable.
pub const FALLBACK_TRANSITION_VALENCE: u8 = 2;

/// Closed classification of an element, resolved once at catalog load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    AlkaliMetal,
    AlkalineEarth,
    TransitionMetal,
    PostTransitionMetal,
    Metalloid,
    Nonmetal,
    Halogen,
    NobleGas,
    Lanthanide,
    Actinide,
}

impl Category {
    /// Parse a free-text category label such as `"diatomic nonmetal"`,
    /// `"alkaline earth metal"` or `"unknown, probably transition metal"`.
    ///
    /// Unrecognized labels resolve to [`Category::Nonmetal`].
    pub fn from_label(label: &str) -> Category {
        let l = label.to_ascii_lowercase();
        if l.contains("noble") {
            Category::NobleGas
        } else if l.contains("halogen") {
            Category::Halogen
        } else if l.contains("alkaline") {
            Category::AlkalineEarth
        } else if l.contains("alkali") {
            Category::AlkaliMetal
        } else if l.contains("lanthan") {
            Category::Lanthanide
        } else if l.contains("actin") {
            Category::Actinide
        } else if l.contains("post") || l.contains("poor metal") {
            Category::PostTransitionMetal
        } else if l.contains("transition") {
            Category::TransitionMetal
        } else if l.contains("metalloid") {
            Category::Metalloid
        } else if l.contains("nonmetal") || l.contains("non-metal") {
            Category::Nonmetal
        } else if l.contains("metal") {
            Category::PostTransitionMetal
        } else {
            Category::Nonmetal
        }
    }

    pub fn is_metal(self) -> bool {
        matches!(
            self,
            Category::AlkaliMetal
                | Category::AlkalineEarth
                | Category::TransitionMetal
                | Category::PostTransitionMetal
                | Category::Lanthanide
                | Category::Actinide
        )
    }

    /// d- and f-block elements, whose valence comes from ion data rather
    /// than from the periodic group.
    pub fn is_transition_like(self) -> bool {
        matches!(
            self,
            Category::TransitionMetal | Category::Lanthanide | Category::Actinide
        )
    }
}

/// One immutable catalog row. Atoms share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub symbol: String,
    pub name: String,
    pub atomic_number: u8,
    pub period: u8,
    /// Periodic group 1–18. `None` for the f-block.
    pub group: Option<u8>,
    pub category: Category,
    /// Pauling electronegativity, already defaulted to
    /// [`DEFAULT_ELECTRONEGATIVITY`] when the source had none.
    pub electronegativity: f64,
    pub atomic_mass: f64,
    /// Raw common-ion-charge text, e.g. `"+2, +3"`.
    pub common_ion_charge: Option<String>,
}

impl Element {
    pub fn is_metal(&self) -> bool {
        self.category.is_metal()
    }

    pub fn is_noble_gas(&self) -> bool {
        self.category == Category::NobleGas
    }

    /// Signed charges listed in the common-ion-charge text, in order.
    pub fn ion_charges(&self) -> Vec<i32> {
        self.common_ion_charge
            .as_deref()
            .map(parse_ion_charges)
            .unwrap_or_default()
    }

    /// Whether a systematic ionic name needs a Roman-numeral oxidation state.
    pub fn has_variable_valence(&self) -> bool {
        let charges = self.ion_charges();
        if charges.is_empty() {
            self.category == Category::TransitionMetal
        } else {
            charges.len() > 1
        }
    }

    /// Number of valence electrons.
    ///
    /// s/p-block elements take it from the group; d/f-block elements from
    /// the magnitude of their first common ion charge.
    pub fn valence_electrons(&self) -> u8 {
        match self.atomic_number {
            1 => return 1,
            2 => return 2,
            _ => {}
        }
        if self.category.is_transition_like() {
            return self
                .ion_charges()
                .first()
                .map(|c| c.unsigned_abs().min(u8::MAX as u32) as u8)
                .filter(|&v| v > 0)
                .unwrap_or(FALLBACK_TRANSITION_VALENCE);
        }
        match self.group {
            Some(g @ 1..=2) => g,
            Some(g @ 13..=18) => g - 10,
            _ => self
                .ion_charges()
                .first()
                .map(|c| c.unsigned_abs().min(u8::MAX as u32) as u8)
                .unwrap_or(FALLBACK_TRANSITION_VALENCE),
        }
    }

    /// Maximum total bond order the element may carry.
    pub fn max_bonds(&self) -> u8 {
        let valence = self.valence_electrons();
        if self.period <= 1 {
            return 2u8.saturating_sub(valence);
        }
        if self.category.is_transition_like() {
            return valence.saturating_add(2).min(6);
        }
        match self.symbol.as_str() {
            "P" => return 5,
            "S" => return 6,
            "Cl" | "I" => return 7,
            "Xe" => return 6,
            _ => {}
        }
        let octet = 8u8.saturating_sub(valence);
        if self.is_noble_gas() || self.period <= 2 {
            octet
        } else {
            octet.max(6)
        }
    }

    /// Bond count the element is satisfied with in a typical compound:
    /// the octet (or duet) deficit for main-group elements, the common
    /// ion charge for d- and f-block metals. Never above [`max_bonds`].
    ///
    /// [`max_bonds`]: Element::max_bonds
    pub fn target_bonds(&self) -> u8 {
        let valence = self.valence_electrons();
        let target = if self.period <= 1 {
            2u8.saturating_sub(valence)
        } else if self.category.is_transition_like() || valence <= 2 {
            valence
        } else {
            valence.min(8u8.saturating_sub(valence))
        };
        target.min(self.max_bonds())
    }

    /// Display radius in sandbox distance units, grows with the period.
    pub fn visual_radius(&self) -> f64 {
        18.0 + 8.0 * self.period.max(1) as f64
    }
}

/// Extract signed integers from ion-charge text.
///
/// Accepts both `"+2, +3"` and `"2+ 3+"` styles; a bare number is positive.
pub fn parse_ion_charges(text: &str) -> Vec<i32> {
    let bytes = text.as_bytes();
    let mut charges = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let magnitude: i32 = match text[start..i].parse() {
            Ok(v) => v,
            Err(_) => continue,
        };
        let before = start.checked_sub(1).map(|p| bytes[p]);
        let after = bytes.get(i).copied();
        let negative = before == Some(b'-') || (before != Some(b'+') && after == Some(b'-'));
        charges.push(if negative { -magnitude } else { magnitude });
    }
    charges
}

type Row = (
    &'static str,
    &'static str,
    u8,
    u8,
    Option<u8>,
    Category,
    Option<f64>,
    f64,
    Option<&'static str>,
);

use Category::{
    Actinide as Act, AlkaliMetal as Alk, AlkalineEarth as AlkE, Halogen as Hal, Lanthanide as Lan,
    Metalloid as Mtd, NobleGas as Nbl, Nonmetal as Non, PostTransitionMetal as Post,
    TransitionMetal as Tm,
};

// symbol, name, Z, period, group, category, EN, mass, common ion charge
pub(crate) static EMBEDDED_ELEMENTS: &[Row] = &[
    ("H", "Hydrogen", 1, 1, Some(1), Non, Some(2.20), 1.008, Some("+1")),
    ("He", "Helium", 2, 1, Some(18), Nbl, None, 4.0026, None),
    ("Li", "Lithium", 3, 2, Some(1), Alk, Some(0.98), 6.94, Some("+1")),
    ("Be", "Beryllium", 4, 2, Some(2), AlkE, Some(1.57), 9.0122, Some("+2")),
    ("B", "Boron", 5, 2, Some(13), Mtd, Some(2.04), 10.81, Some("+3")),
    ("C", "Carbon", 6, 2, Some(14), Non, Some(2.55), 12.011, Some("+4, -4")),
    ("N", "Nitrogen", 7, 2, Some(15), Non, Some(3.04), 14.007, Some("-3")),
    ("O", "Oxygen", 8, 2, Some(16), Non, Some(3.44), 15.999, Some("-2")),
    ("F", "Fluorine", 9, 2, Some(17), Hal, Some(3.98), 18.998, Some("-1")),
    ("Ne", "Neon", 10, 2, Some(18), Nbl, None, 20.180, None),
    ("Na", "Sodium", 11, 3, Some(1), Alk, Some(0.93), 22.990, Some("+1")),
    ("Mg", "Magnesium", 12, 3, Some(2), AlkE, Some(1.31), 24.305, Some("+2")),
    ("Al", "Aluminum", 13, 3, Some(13), Post, Some(1.61), 26.982, Some("+3")),
    ("Si", "Silicon", 14, 3, Some(14), Mtd, Some(1.90), 28.085, Some("+4, -4")),
    ("P", "Phosphorus", 15, 3, Some(15), Non, Some(2.19), 30.974, Some("-3")),
    ("S", "Sulfur", 16, 3, Some(16), Non, Some(2.58), 32.06, Some("-2")),
    ("Cl", "Chlorine", 17, 3, Some(17), Hal, Some(3.16), 35.45, Some("-1")),
    ("Ar", "Argon", 18, 3, Some(18), Nbl, None, 39.948, None),
    ("K", "Potassium", 19, 4, Some(1), Alk, Some(0.82), 39.098, Some("+1")),
    ("Ca", "Calcium", 20, 4, Some(2), AlkE, Some(1.00), 40.078, Some("+2")),
    ("Sc", "Scandium", 21, 4, Some(3), Tm, Some(1.36), 44.956, Some("+3")),
    ("Ti", "Titanium", 22, 4, Some(4), Tm, Some(1.54), 47.867, Some("+4, +3, +2")),
    ("V", "Vanadium", 23, 4, Some(5), Tm, Some(1.63), 50.942, Some("+5, +4, +3, +2")),
    ("Cr", "Chromium", 24, 4, Some(6), Tm, Some(1.66), 51.996, Some("+3, +2, +6")),
    ("Mn", "Manganese", 25, 4, Some(7), Tm, Some(1.55), 54.938, Some("+2, +4, +7")),
    ("Fe", "Iron", 26, 4, Some(8), Tm, Some(1.83), 55.845, Some("+3, +2")),
    ("Co", "Cobalt", 27, 4, Some(9), Tm, Some(1.88), 58.933, Some("+2, +3")),
    ("Ni", "Nickel", 28, 4, Some(10), Tm, Some(1.91), 58.693, Some("+2")),
    ("Cu", "Copper", 29, 4, Some(11), Tm, Some(1.90), 63.546, Some("+2, +1")),
    ("Zn", "Zinc", 30, 4, Some(12), Tm, Some(1.65), 65.38, Some("+2")),
    ("Ga", "Gallium", 31, 4, Some(13), Post, Some(1.81), 69.723, Some("+3")),
    ("Ge", "Germanium", 32, 4, Some(14), Mtd, Some(2.01), 72.630, Some("+4")),
    ("As", "Arsenic", 33, 4, Some(15), Mtd, Some(2.18), 74.922, Some("-3")),
    ("Se", "Selenium", 34, 4, Some(16), Non, Some(2.55), 78.971, Some("-2")),
    ("Br", "Bromine", 35, 4, Some(17), Hal, Some(2.96), 79.904, Some("-1")),
    ("Kr", "Krypton", 36, 4, Some(18), Nbl, Some(3.00), 83.798, None),
    ("Rb", "Rubidium", 37, 5, Some(1), Alk, Some(0.82), 85.468, Some("+1")),
    ("Sr", "Strontium", 38, 5, Some(2), AlkE, Some(0.95), 87.62, Some("+2")),
    ("Y", "Yttrium", 39, 5, Some(3), Tm, Some(1.22), 88.906, Some("+3")),
    ("Zr", "Zirconium", 40, 5, Some(4), Tm, Some(1.33), 91.224, Some("+4")),
    ("Nb", "Niobium", 41, 5, Some(5), Tm, Some(1.6), 92.906, Some("+5, +3")),
    ("Mo", "Molybdenum", 42, 5, Some(6), Tm, Some(2.16), 95.95, Some("+6, +4")),
    ("Tc", "Technetium", 43, 5, Some(7), Tm, Some(1.9), 98.0, Some("+7, +4")),
    ("Ru", "Ruthenium", 44, 5, Some(8), Tm, Some(2.2), 101.07, Some("+3, +4")),
    ("Rh", "Rhodium", 45, 5, Some(9), Tm, Some(2.28), 102.91, Some("+3")),
    ("Pd", "Palladium", 46, 5, Some(10), Tm, Some(2.20), 106.42, Some("+2, +4")),
    ("Ag", "Silver", 47, 5, Some(11), Tm, Some(1.93), 107.87, Some("+1")),
    ("Cd", "Cadmium", 48, 5, Some(12), Tm, Some(1.69), 112.41, Some("+2")),
    ("In", "Indium", 49, 5, Some(13), Post, Some(1.78), 114.82, Some("+3")),
    ("Sn", "Tin", 50, 5, Some(14), Post, Some(1.96), 118.71, Some("+4, +2")),
    ("Sb", "Antimony", 51, 5, Some(15), Mtd, Some(2.05), 121.76, Some("+3, +5")),
    ("Te", "Tellurium", 52, 5, Some(16), Mtd, Some(2.1), 127.60, Some("-2")),
    ("I", "Iodine", 53, 5, Some(17), Hal, Some(2.66), 126.90, Some("-1")),
    ("Xe", "Xenon", 54, 5, Some(18), Nbl, Some(2.6), 131.29, None),
    ("Cs", "Cesium", 55, 6, Some(1), Alk, Some(0.79), 132.91, Some("+1")),
    ("Ba", "Barium", 56, 6, Some(2), AlkE, Some(0.89), 137.33, Some("+2")),
    ("Ce", "Cerium", 58, 6, None, Lan, Some(1.12), 140.12, Some("+3, +4")),
    ("W", "Tungsten", 74, 6, Some(6), Tm, Some(2.36), 183.84, Some("+6, +4")),
    ("Pt", "Platinum", 78, 6, Some(10), Tm, Some(2.28), 195.08, Some("+2, +4")),
    ("Au", "Gold", 79, 6, Some(11), Tm, Some(2.54), 196.97, Some("+3, +1")),
    ("Hg", "Mercury", 80, 6, Some(12), Tm, Some(2.00), 200.59, Some("+2, +1")),
    ("Pb", "Lead", 82, 6, Some(14), Post, Some(2.33), 207.2, Some("+2, +4")),
    ("Bi", "Bismuth", 83, 6, Some(15), Post, Some(2.02), 208.98, Some("+3")),
    ("Rn", "Radon", 86, 6, Some(18), Nbl, Some(2.2), 222.0, None),
    ("U", "Uranium", 92, 7, None, Act, Some(1.38), 238.03, Some("+6, +4, +3, +5")),
];

pub(crate) fn embedded_elements() -> impl Iterator<Item = Element> {
    EMBEDDED_ELEMENTS.iter().map(
        |&(symbol, name, atomic_number, period, group, category, en, atomic_mass, ion)| Element {
            symbol: symbol.to_string(),
            name: name.to_string(),
            atomic_number,
            period,
            group,
            category,
            electronegativity: en.unwrap_or(DEFAULT_ELECTRONEGATIVITY),
            atomic_mass,
            common_ion_charge: ion.map(str::to_string),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded(symbol: &str) -> Element {
        embedded_elements()
            .find(|e| e.symbol == symbol)
            .unwrap_or_else(|| panic!("{symbol} missing from embedded table"))
    }

    #[test]
    fn category_labels() {
        assert_eq!(Category::from_label("diatomic nonmetal"), Category::Nonmetal);
        assert_eq!(Category::from_label("polyatomic nonmetal"), Category::Nonmetal);
        assert_eq!(Category::from_label("alkali metal"), Category::AlkaliMetal);
        assert_eq!(Category::from_label("alkaline earth metal"), Category::AlkalineEarth);
        assert_eq!(Category::from_label("post-transition metal"), Category::PostTransitionMetal);
        assert_eq!(
            Category::from_label("unknown, probably transition metal"),
            Category::TransitionMetal
        );
        assert_eq!(Category::from_label("Noble Gas"), Category::NobleGas);
        assert_eq!(Category::from_label("metalloid"), Category::Metalloid);
        assert_eq!(Category::from_label("lanthanide"), Category::Lanthanide);
        assert_eq!(Category::from_label("actinide"), Category::Actinide);
        assert_eq!(Category::from_label("halogen"), Category::Halogen);
        assert_eq!(Category::from_label(""), Category::Nonmetal);
    }

    #[test]
    fn ion_charge_parsing() {
        assert_eq!(parse_ion_charges("+2, +3"), vec![2, 3]);
        assert_eq!(parse_ion_charges("-2"), vec![-2]);
        assert_eq!(parse_ion_charges("3+"), vec![3]);
        assert_eq!(parse_ion_charges("2-"), vec![-2]);
        assert_eq!(parse_ion_charges("+4, -4"), vec![4, -4]);
        assert!(parse_ion_charges("n/a").is_empty());
    }

    #[test]
    fn valence_electrons_by_block() {
        assert_eq!(embedded("H").valence_electrons(), 1);
        assert_eq!(embedded("He").valence_electrons(), 2);
        assert_eq!(embedded("Na").valence_electrons(), 1);
        assert_eq!(embedded("Mg").valence_electrons(), 2);
        assert_eq!(embedded("C").valence_electrons(), 4);
        assert_eq!(embedded("O").valence_electrons(), 6);
        assert_eq!(embedded("Cl").valence_electrons(), 7);
        assert_eq!(embedded("Ar").valence_electrons(), 8);
        assert_eq!(embedded("Fe").valence_electrons(), 3);
        assert_eq!(embedded("Ni").valence_electrons(), 2);
    }

    #[test]
    fn transition_metal_without_ion_data_falls_back() {
        let mut fe = embedded("Fe");
        fe.common_ion_charge = None;
        assert_eq!(fe.valence_electrons(), FALLBACK_TRANSITION_VALENCE);
        assert!(fe.has_variable_valence());
    }

    #[test]
    fn absurd_ion_charge_saturates() {
        let mut fe = embedded("Fe");
        fe.common_ion_charge = Some("+255".to_string());
        assert_eq!(fe.valence_electrons(), 255);
        assert_eq!(fe.max_bonds(), 6);
        assert!(fe.target_bonds() <= 6);

        fe.common_ion_charge = Some("+99999".to_string());
        assert_eq!(fe.max_bonds(), 6);
    }

    #[test]
    fn max_bonds_rules() {
        assert_eq!(embedded("H").max_bonds(), 1);
        assert_eq!(embedded("He").max_bonds(), 0);
        assert_eq!(embedded("C").max_bonds(), 4);
        assert_eq!(embedded("N").max_bonds(), 3);
        assert_eq!(embedded("O").max_bonds(), 2);
        assert_eq!(embedded("F").max_bonds(), 1);
        assert_eq!(embedded("Ne").max_bonds(), 0);
        assert_eq!(embedded("P").max_bonds(), 5);
        assert_eq!(embedded("S").max_bonds(), 6);
        assert_eq!(embedded("Cl").max_bonds(), 7);
        assert_eq!(embedded("I").max_bonds(), 7);
        assert_eq!(embedded("Xe").max_bonds(), 6);
        assert_eq!(embedded("Ar").max_bonds(), 0);
        assert_eq!(embedded("Na").max_bonds(), 7);
        assert_eq!(embedded("Se").max_bonds(), 6);
        assert_eq!(embedded("Fe").max_bonds(), 5);
        assert_eq!(embedded("V").max_bonds(), 6);
    }

    #[test]
    fn target_bonds_rules() {
        assert_eq!(embedded("H").target_bonds(), 1);
        assert_eq!(embedded("He").target_bonds(), 0);
        assert_eq!(embedded("Na").target_bonds(), 1);
        assert_eq!(embedded("Mg").target_bonds(), 2);
        assert_eq!(embedded("Al").target_bonds(), 3);
        assert_eq!(embedded("C").target_bonds(), 4);
        assert_eq!(embedded("N").target_bonds(), 3);
        assert_eq!(embedded("O").target_bonds(), 2);
        assert_eq!(embedded("Cl").target_bonds(), 1);
        assert_eq!(embedded("P").target_bonds(), 3);
        assert_eq!(embedded("Ar").target_bonds(), 0);
        assert_eq!(embedded("Fe").target_bonds(), 3);
    }

    #[test]
    fn variable_valence() {
        assert!(embedded("Fe").has_variable_valence());
        assert!(embedded("Cu").has_variable_valence());
        assert!(!embedded("Na").has_variable_valence());
        assert!(!embedded("Zn").has_variable_valence());
        assert!(!embedded("Al").has_variable_valence());
    }

    #[test]
    fn radius_grows_with_period() {
        assert!(embedded("H").visual_radius() < embedded("C").visual_radius());
        assert!(embedded("C").visual_radius() < embedded("Na").visual_radius());
        assert_eq!(embedded("H").visual_radius(), 26.0);
    }

    #[test]
    fn missing_electronegativity_defaults() {
        assert_eq!(embedded("He").electronegativity, DEFAULT_ELECTRONEGATIVITY);
        assert_eq!(embedded("Ar").electronegativity, DEFAULT_ELECTRONEGATIVITY);
    }

    #[test]
    fn embedded_symbols_unique() {
        let mut symbols: Vec<_> = EMBEDDED_ELEMENTS.iter().map(|r| r.0).collect();
        let n = symbols.len();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), n);
    }

    #[test]
    fn metals() {
        assert!(embedded("Na").is_metal());
        assert!(embedded("Fe").is_metal());
        assert!(embedded("U").is_metal());
        assert!(!embedded("Si").is_metal());
        assert!(!embedded("Cl").is_metal());
    }
}
