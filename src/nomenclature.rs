//! Systematic names built from composition and bonding pattern alone.
//!
//! No compound table is consulted. Names follow a few textbook rules
//! (ionic, binary covalent, alloy, element) and fall back to
//! `"Compound <Hill formula>"` for anything else.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;

use crate::element::Element;
use crate::formula::{composition, hill_formula};
use crate::mol::Mol;
use crate::traits::HasElement;

static DIATOMIC_NAMES: &[(&str, &str)] = &[
    ("H", "Hydrogen Gas"),
    ("O", "Oxygen Gas"),
    ("N", "Nitrogen Gas"),
    ("F", "Fluorine Gas"),
    ("Cl", "Chlorine Gas"),
    ("Br", "Bromine"),
    ("I", "Iodine"),
];

static ANION_NAMES: &[(&str, &str)] = &[
    ("H", "hydride"),
    ("B", "boride"),
    ("C", "carbide"),
    ("N", "nitride"),
    ("O", "oxide"),
    ("F", "fluoride"),
    ("Si", "silicide"),
    ("P", "phosphide"),
    ("S", "sulfide"),
    ("Cl", "chloride"),
    ("As", "arsenide"),
    ("Se", "selenide"),
    ("Br", "bromide"),
    ("Te", "telluride"),
    ("I", "iodide"),
];

const PREFIXES: [&str; 12] = [
    "mono", "di", "tri", "tetra", "penta", "hexa", "hepta", "octa", "nona", "deca", "undeca",
    "dodeca",
];

/// Greek multiplier for `n` atoms, lowercase. Counts past twelve are
/// written as digits.
pub fn numeric_prefix(n: u32) -> String {
    match n {
        1..=12 => PREFIXES[(n - 1) as usize].to_string(),
        _ => format!("{n}-"),
    }
}

/// Join a prefix and a lowercase stem, eliding the prefix's final vowel
/// before a stem that starts with `a` or `o` ("monoxide", "tetroxide").
fn attach_prefix(prefix: &str, stem: &str) -> String {
    let elide = (prefix.ends_with('a') || prefix.ends_with('o'))
        && (stem.starts_with('o') || stem.starts_with('a'));
    if elide {
        format!("{}{}", &prefix[..prefix.len() - 1], stem)
    } else {
        format!("{prefix}{stem}")
    }
}

/// Capitalize the first letter of every space- or hyphen-separated word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = ch == ' ' || ch == '-' || ch == '(';
    }
    out
}

pub fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for (value, numeral) in TABLE {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

/// Lowercase anion name: a table of common anions, otherwise the element
/// name with its ending swapped for "-ide".
pub fn anion_name(element: &Element) -> String {
    if let Some((_, name)) = ANION_NAMES.iter().find(|(s, _)| *s == element.symbol) {
        return (*name).to_string();
    }
    let name = element.name.to_lowercase();
    for ending in ["ine", "gen", "on", "um", "us"] {
        if let Some(stem) = name.strip_suffix(ending) {
            return format!("{stem}ide");
        }
    }
    format!("{name}ide")
}

/// Name of a pure element sample of `count` atoms.
pub fn element_name(element: &Element, count: u32) -> String {
    if count == 1 {
        return element.name.clone();
    }
    if count == 2 {
        if let Some((_, name)) = DIATOMIC_NAMES.iter().find(|(s, _)| *s == element.symbol) {
            return (*name).to_string();
        }
    }
    if count == 3 && element.symbol == "O" {
        return "Ozone".to_string();
    }
    title_case(&attach_prefix(&numeric_prefix(count), &element.name.to_lowercase()))
}

/// Ionic charge a nonmetal is assumed to pull from a bonded metal.
fn partner_contribution<A: HasElement, B>(mol: &Mol<A, B>, partner: NodeIndex) -> i32 {
    let element = mol.atom(partner).element();
    let in_hydroxyl = |o: NodeIndex, h: NodeIndex| {
        mol.atom(o).element().symbol == "O" && mol.atom(h).element().symbol == "H"
    };
    match element.symbol.as_str() {
        "O" => {
            if mol.neighbors(partner).any(|nb| in_hydroxyl(partner, nb)) {
                1
            } else {
                2
            }
        }
        "H" => {
            if mol.neighbors(partner).any(|nb| in_hydroxyl(nb, partner)) {
                0
            } else {
                1
            }
        }
        _ => match element.group {
            Some(13) => 3,
            Some(14) => 4,
            Some(15) => 3,
            Some(16) => 2,
            Some(17) => 1,
            _ => 1,
        },
    }
}

/// Approximate oxidation state of a metal: the charge its nonmetal
/// partners pull, summed over `metal_atoms` and averaged per atom.
pub fn metal_oxidation_state<A: HasElement, B>(mol: &Mol<A, B>, metal_atoms: &[NodeIndex]) -> i32 {
    if metal_atoms.is_empty() {
        return 0;
    }
    let total: i32 = metal_atoms
        .iter()
        .flat_map(|&m| mol.neighbors(m))
        .filter(|&nb| !mol.atom(nb).element().is_metal())
        .map(|nb| partner_contribution(mol, nb))
        .sum();
    (total as f64 / metal_atoms.len() as f64).round() as i32
}

fn cation_name(element: &Element, oxidation_state: i32) -> String {
    if oxidation_state > 0 && element.has_variable_valence() {
        format!("{}({})", element.name, to_roman(oxidation_state as u32))
    } else {
        element.name.clone()
    }
}

/// Atoms of one element within a component.
struct ElementGroup<'a> {
    element: &'a Element,
    atoms: Vec<NodeIndex>,
}

/// Systematic name of the component made of `atoms`.
pub fn systematic_name<A: HasElement, B>(mol: &Mol<A, B>, atoms: &[NodeIndex]) -> String {
    let mut groups: BTreeMap<&str, ElementGroup<'_>> = BTreeMap::new();
    for &idx in atoms {
        let element = mol.atom(idx).element();
        groups
            .entry(element.symbol.as_str())
            .or_insert_with(|| ElementGroup {
                element,
                atoms: Vec::new(),
            })
            .atoms
            .push(idx);
    }

    let mut ordered: Vec<&ElementGroup<'_>> = groups.values().collect();
    ordered.sort_by(|a, b| {
        a.element
            .electronegativity
            .total_cmp(&b.element.electronegativity)
            .then_with(|| a.element.symbol.cmp(&b.element.symbol))
    });
    let metals: Vec<&ElementGroup<'_>> = ordered
        .iter()
        .copied()
        .filter(|g| g.element.is_metal())
        .collect();

    match ordered.as_slice() {
        [] => String::new(),
        [only] => element_name(only.element, only.atoms.len() as u32),
        _ if metals.len() == ordered.len() => {
            let names: Vec<&str> = ordered.iter().map(|g| g.element.name.as_str()).collect();
            format!("{} Alloy", names.join("-"))
        }
        [first, second] if metals.is_empty() => covalent_name(first, second),
        [first, second] if metals.len() == 1 => {
            let (metal, anion) = if first.element.is_metal() {
                (first, second)
            } else {
                (second, first)
            };
            let state = metal_oxidation_state(mol, &metal.atoms);
            title_case(&format!(
                "{} {}",
                cation_name(metal.element, state),
                anion_name(anion.element)
            ))
        }
        _ if metals.is_empty() => format!("Compound {}", hill_formula(&composition(mol, atoms))),
        _ => salt_name(mol, &metals, atoms),
    }
}

fn covalent_name(first: &ElementGroup<'_>, second: &ElementGroup<'_>) -> String {
    let n1 = first.atoms.len() as u32;
    let n2 = second.atoms.len() as u32;
    let lead = if n1 == 1 {
        first.element.name.to_lowercase()
    } else {
        attach_prefix(&numeric_prefix(n1), &first.element.name.to_lowercase())
    };
    let tail = attach_prefix(&numeric_prefix(n2), &anion_name(second.element));
    title_case(&format!("{lead} {tail}"))
}

fn salt_name<A: HasElement, B>(
    mol: &Mol<A, B>,
    metals: &[&ElementGroup<'_>],
    atoms: &[NodeIndex],
) -> String {
    let is_metal = move |idx: NodeIndex| mol.atom(idx).element().is_metal();
    let symbol = move |idx: NodeIndex| mol.atom(idx).element().symbol.as_str();

    let mut hydroxide = false;
    let mut oxide = false;
    let mut hydride = false;
    let mut others: BTreeMap<&str, &Element> = BTreeMap::new();

    for &idx in atoms {
        if is_metal(idx) {
            continue;
        }
        let on_metal = mol.neighbors(idx).any(is_metal);
        match symbol(idx) {
            "O" if on_metal => {
                if mol.neighbors(idx).any(|nb| symbol(nb) == "H") {
                    hydroxide = true;
                } else {
                    oxide = true;
                }
            }
            "H" if on_metal => hydride = true,
            // Hydroxyl hydrogen, already covered by "hydroxide".
            "H" if mol
                .neighbors(idx)
                .any(|nb| symbol(nb) == "O" && mol.neighbors(nb).any(is_metal)) => {}
            _ => {
                let element = mol.atom(idx).element();
                others.insert(element.symbol.as_str(), element);
            }
        }
    }

    let mut words: Vec<String> = metals
        .iter()
        .map(|g| cation_name(g.element, metal_oxidation_state(mol, &g.atoms)))
        .collect();
    if hydroxide {
        words.push("hydroxide".to_string());
    }
    if oxide {
        words.push("oxide".to_string());
    }
    if hydride {
        words.push("hydride".to_string());
    }
    words.extend(others.values().map(|e| anion_name(e)));
    title_case(&words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, AtomId};
    use crate::bond::{Bond, BondOrder};
    use crate::catalog::ElementCatalog;

    fn name(symbols: &[&str], bonds: &[(usize, usize)]) -> String {
        let catalog = ElementCatalog::embedded();
        let mut mol: Mol<Atom, Bond> = Mol::new();
        for (i, s) in symbols.iter().enumerate() {
            mol.add_atom(Atom::new(AtomId(i as u64), catalog.get(s).unwrap().clone(), [0.0, 0.0]));
        }
        for &(a, b) in bonds {
            mol.add_bond(
                NodeIndex::new(a),
                NodeIndex::new(b),
                Bond::covalent(AtomId(a as u64), AtomId(b as u64), BondOrder::Single),
            );
        }
        let all: Vec<NodeIndex> = mol.atoms().collect();
        systematic_name(&mol, &all)
    }

    #[test]
    fn elements() {
        assert_eq!(name(&["H", "H"], &[(0, 1)]), "Hydrogen Gas");
        assert_eq!(name(&["Br", "Br"], &[(0, 1)]), "Bromine");
        assert_eq!(name(&["O"], &[]), "Oxygen");
        assert_eq!(name(&["O", "O", "O"], &[(0, 1), (1, 2)]), "Ozone");
        assert_eq!(name(&["C", "C"], &[(0, 1)]), "Dicarbon");
        let sulfur: Vec<&str> = vec!["S"; 8];
        let ring: Vec<(usize, usize)> = (0..8).map(|i| (i, (i + 1) % 8)).collect();
        assert_eq!(name(&sulfur, &ring), "Octasulfur");
    }

    #[test]
    fn ionic_binary() {
        assert_eq!(name(&["Na", "Cl"], &[(0, 1)]), "Sodium Chloride");
        assert_eq!(name(&["Mg", "O"], &[(0, 1)]), "Magnesium Oxide");
        assert_eq!(
            name(&["Fe", "Cl", "Cl", "Cl"], &[(0, 1), (0, 2), (0, 3)]),
            "Iron(III) Chloride"
        );
        assert_eq!(name(&["Fe", "O"], &[(0, 1)]), "Iron(II) Oxide");
        assert_eq!(name(&["Li", "H"], &[(0, 1)]), "Lithium Hydride");
    }

    #[test]
    fn covalent_binary() {
        assert_eq!(name(&["C", "O", "O"], &[(0, 1), (0, 2)]), "Carbon Dioxide");
        assert_eq!(name(&["C", "O"], &[(0, 1)]), "Carbon Monoxide");
        assert_eq!(
            name(&["N", "N", "O", "O", "O", "O"], &[(0, 1), (0, 2), (0, 3), (1, 4), (1, 5)]),
            "Dinitrogen Tetroxide"
        );
        assert_eq!(name(&["O", "H", "H"], &[(0, 1), (0, 2)]), "Dihydrogen Monoxide");
    }

    #[test]
    fn alloy() {
        assert_eq!(name(&["Cu", "Na"], &[(0, 1)]), "Sodium-Copper Alloy");
        assert_eq!(
            name(&["Cu", "Fe", "Na"], &[(0, 1), (1, 2)]),
            "Sodium-Iron-Copper Alloy"
        );
    }

    #[test]
    fn ternary_without_metal() {
        assert_eq!(
            name(&["C", "H", "H", "O"], &[(0, 1), (0, 2), (0, 3)]),
            "Compound CH2O"
        );
    }

    #[test]
    fn ternary_with_metal() {
        assert_eq!(name(&["Na", "O", "H"], &[(0, 1), (1, 2)]), "Sodium Hydroxide");
        assert_eq!(
            name(&["Ca", "O", "O", "H", "H"], &[(0, 1), (0, 2), (1, 3), (2, 4)]),
            "Calcium Hydroxide"
        );
        assert_eq!(
            name(&["Fe", "O", "O", "O", "H", "H", "H"], &[(0, 1), (0, 2), (0, 3), (1, 4), (2, 5), (3, 6)]),
            "Iron(III) Hydroxide"
        );
    }

    #[test]
    fn anion_fallbacks() {
        let catalog = ElementCatalog::embedded();
        assert_eq!(anion_name(catalog.get("Cl").unwrap()), "chloride");
        let mut astatine = (**catalog.get("I").unwrap()).clone();
        astatine.symbol = "At".into();
        astatine.name = "Astatine".into();
        assert_eq!(anion_name(&astatine), "astatide");
        astatine.name = "Xenon".into();
        assert_eq!(anion_name(&astatine), "xenide");
        astatine.name = "Lanthanum".into();
        assert_eq!(anion_name(&astatine), "lanthanide");
        astatine.name = "Zinc".into();
        assert_eq!(anion_name(&astatine), "zincide");
    }

    #[test]
    fn prefixes_and_numerals() {
        assert_eq!(numeric_prefix(1), "mono");
        assert_eq!(numeric_prefix(10), "deca");
        assert_eq!(numeric_prefix(14), "14-");
        assert_eq!(attach_prefix("mono", "oxide"), "monoxide");
        assert_eq!(attach_prefix("di", "oxide"), "dioxide");
        assert_eq!(attach_prefix("penta", "oxide"), "pentoxide");
        assert_eq!(to_roman(3), "III");
        assert_eq!(to_roman(4), "IV");
        assert_eq!(to_roman(9), "IX");
        assert_eq!(title_case("dinitrogen tetroxide"), "Dinitrogen Tetroxide");
        assert_eq!(title_case("sodium-copper alloy"), "Sodium-Copper Alloy");
    }
}
