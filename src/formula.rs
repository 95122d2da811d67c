//! Molecular formula strings and molecular weight.
//!
//! [`hill_formula`] produces a Hill system string from element counts,
//! [`structural_formula`] a salt-style string that groups metals, hydroxide,
//! oxide and hydride by how the atoms are bonded, and [`parse_formula`]
//! reads either form back into counts.

use std::collections::BTreeMap;
use std::fmt::Write;

use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::mol::Mol;
use crate::traits::HasElement;

/// Element symbol to atom count, in symbol order.
pub type Composition = BTreeMap<String, u32>;

/// Count the elements of the given atoms.
pub fn composition<A: HasElement, B>(mol: &Mol<A, B>, atoms: &[NodeIndex]) -> Composition {
    let mut counts = Composition::new();
    for &idx in atoms {
        *counts
            .entry(mol.atom(idx).element().symbol.clone())
            .or_default() += 1;
    }
    counts
}

/// Sum of catalog atomic masses, in g/mol.
pub fn molecular_weight<A: HasElement, B>(mol: &Mol<A, B>, atoms: &[NodeIndex]) -> f64 {
    atoms
        .iter()
        .map(|&idx| mol.atom(idx).element().atomic_mass)
        .sum()
}

/// Hill system formula: C first, then H, then the rest alphabetically.
///
/// Hydrogen is listed right after carbon, or first when there is no
/// carbon. Counts of one are omitted.
///
/// ```
/// use chemsandbox::formula::{hill_formula, Composition};
///
/// let water: Composition = [("O".to_string(), 1), ("H".to_string(), 2)].into();
/// assert_eq!(hill_formula(&water), "H2O");
/// ```
pub fn hill_formula(counts: &Composition) -> String {
    let mut result = String::new();
    for first in ["C", "H"] {
        if let Some(&n) = counts.get(first) {
            append_element(&mut result, first, n);
        }
    }
    for (sym, &n) in counts {
        if sym != "C" && sym != "H" {
            append_element(&mut result, sym, n);
        }
    }
    result
}

/// Bracketed net-charge suffix: `[+]`, `[2+]`, `[-]`, `[3-]`; empty when
/// neutral.
pub fn charge_suffix(net_charge: i32) -> String {
    match net_charge {
        0 => String::new(),
        1 => "[+]".to_string(),
        -1 => "[-]".to_string(),
        c if c > 0 => format!("[{c}+]"),
        c => format!("[{}-]", c.unsigned_abs()),
    }
}

/// Salt-style formula for a component that contains a metal.
///
/// Metals come first, by ascending electronegativity. Oxygen bonded to
/// both a metal and a hydrogen forms hydroxide, oxygen bonded to a metal
/// alone forms oxide, and hydrogen bonded to a metal forms hydride. Every
/// other atom follows alphabetically.
pub fn structural_formula<A: HasElement, B>(mol: &Mol<A, B>, atoms: &[NodeIndex]) -> String {
    let is_metal = move |idx: NodeIndex| mol.atom(idx).element().is_metal();
    let symbol = move |idx: NodeIndex| mol.atom(idx).element().symbol.as_str();

    let mut metals: Vec<(&str, f64, u32)> = Vec::new();
    let mut hydroxide = 0u32;
    let mut oxide = 0u32;
    let mut hydride = 0u32;
    let mut rest = Composition::new();
    let mut claimed_h: Vec<NodeIndex> = Vec::new();

    for &idx in atoms {
        let element = mol.atom(idx).element();
        if element.is_metal() {
            match metals.iter_mut().find(|(s, _, _)| *s == element.symbol) {
                Some(entry) => entry.2 += 1,
                None => metals.push((element.symbol.as_str(), element.electronegativity, 1)),
            }
            continue;
        }
        if symbol(idx) == "O" && mol.neighbors(idx).any(is_metal) {
            let hydrogen = mol
                .neighbors(idx)
                .find(|&nb| symbol(nb) == "H" && !claimed_h.contains(&nb));
            match hydrogen {
                Some(h) => {
                    claimed_h.push(h);
                    hydroxide += 1;
                }
                None => oxide += 1,
            }
            continue;
        }
        if symbol(idx) == "H" && !claimed_h.contains(&idx) && mol.neighbors(idx).any(is_metal) {
            claimed_h.push(idx);
            hydride += 1;
        }
    }

    for &idx in atoms {
        let element = mol.atom(idx).element();
        if element.is_metal() || claimed_h.contains(&idx) {
            continue;
        }
        if element.symbol == "O" && mol.neighbors(idx).any(is_metal) {
            continue;
        }
        *rest.entry(element.symbol.clone()).or_default() += 1;
    }

    metals.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

    let mut result = String::new();
    for (sym, _, n) in &metals {
        append_element(&mut result, sym, *n);
    }
    match hydroxide {
        0 => {}
        1 => result.push_str("OH"),
        n => {
            let _ = write!(result, "(OH){n}");
        }
    }
    if oxide > 0 {
        append_element(&mut result, "O", oxide);
    }
    if hydride > 0 {
        append_element(&mut result, "H", hydride);
    }
    for (sym, &n) in &rest {
        append_element(&mut result, sym, n);
    }
    result
}

fn append_element(buf: &mut String, symbol: &str, count: u32) {
    buf.push_str(symbol);
    if count > 1 {
        let _ = write!(buf, "{count}");
    }
}

/// Errors produced when parsing a formula string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    #[error("empty formula")]
    Empty,

    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },

    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },

    #[error("invalid count at position {pos}")]
    InvalidCount { pos: usize },

    #[error("invalid charge suffix '{text}'")]
    InvalidCharge { text: String },
}

/// Element counts and net charge read from a formula string.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFormula {
    pub counts: Composition,
    pub charge: i32,
}

/// Parse a Hill or structural formula such as `"C6H12O6"`, `"Ca(OH)2"`
/// or `"NH4[+]"`.
///
/// Symbols are not checked against a catalog: any capital letter followed
/// by lowercase letters is accepted.
pub fn parse_formula(text: &str) -> Result<ParsedFormula, FormulaError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(FormulaError::Empty);
    }
    let (body, charge) = match text.find('[') {
        Some(open) => (&text[..open], parse_charge(&text[open..])?),
        None => (text, 0),
    };

    let chars: Vec<char> = body.chars().collect();
    // One frame per open parenthesis, plus the outermost.
    let mut stack: Vec<(usize, Composition)> = vec![(0, Composition::new())];
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch.is_ascii_uppercase() {
            let start = i;
            i += 1;
            while i < chars.len() && chars[i].is_ascii_lowercase() {
                i += 1;
            }
            let symbol: String = chars[start..i].iter().collect();
            let (n, next) = read_count(&chars, i)?;
            i = next;
            if let Some((_, frame)) = stack.last_mut() {
                let slot = frame.entry(symbol).or_default();
                *slot = slot
                    .checked_add(n)
                    .ok_or(FormulaError::InvalidCount { pos: start })?;
            }
        } else if ch == '(' {
            stack.push((i, Composition::new()));
            i += 1;
        } else if ch == ')' {
            if stack.len() < 2 {
                return Err(FormulaError::UnmatchedParen { pos: i });
            }
            let close = i;
            let (n, next) = read_count(&chars, i + 1)?;
            i = next;
            let Some((_, group)) = stack.pop() else {
                return Err(FormulaError::UnmatchedParen { pos: close });
            };
            if let Some((_, outer)) = stack.last_mut() {
                for (sym, count) in group {
                    let slot = outer.entry(sym).or_default();
                    let current = *slot;
                    *slot = count
                        .checked_mul(n)
                        .and_then(|c| current.checked_add(c))
                        .ok_or(FormulaError::InvalidCount { pos: close })?;
                }
            }
        } else if ch.is_whitespace() {
            i += 1;
        } else {
            return Err(FormulaError::UnexpectedChar { pos: i, ch });
        }
    }

    if stack.len() != 1 {
        let pos = stack.last().map(|(p, _)| *p).unwrap_or(0);
        return Err(FormulaError::UnmatchedParen { pos });
    }
    let counts = stack.pop().map(|(_, c)| c).unwrap_or_default();
    if counts.is_empty() {
        return Err(FormulaError::Empty);
    }
    Ok(ParsedFormula { counts, charge })
}

fn read_count(chars: &[char], mut i: usize) -> Result<(u32, usize), FormulaError> {
    let start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i == start {
        return Ok((1, i));
    }
    let digits: String = chars[start..i].iter().collect();
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => Err(FormulaError::InvalidCount { pos: start }),
        Ok(n) => Ok((n, i)),
    }
}

fn parse_charge(suffix: &str) -> Result<i32, FormulaError> {
    let invalid = || FormulaError::InvalidCharge {
        text: suffix.to_string(),
    };
    let inner = suffix
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(invalid)?;
    let (magnitude, sign) = if let Some(m) = inner.strip_suffix('+') {
        (m, 1)
    } else if let Some(m) = inner.strip_suffix('-') {
        (m, -1)
    } else {
        return Err(invalid());
    };
    let magnitude = if magnitude.is_empty() {
        1
    } else {
        magnitude.parse::<i32>().map_err(|_| invalid())?
    };
    Ok(sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, AtomId};
    use crate::bond::{Bond, BondOrder};
    use crate::catalog::ElementCatalog;

    fn counts(pairs: &[(&str, u32)]) -> Composition {
        pairs.iter().map(|(s, n)| (s.to_string(), *n)).collect()
    }

    fn build(symbols: &[&str], bonds: &[(usize, usize)]) -> (Mol<Atom, Bond>, Vec<NodeIndex>) {
        let catalog = ElementCatalog::embedded();
        let mut mol = Mol::new();
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
        let all = mol.atoms().collect();
        (mol, all)
    }

    #[test]
    fn hill_ordering() {
        assert_eq!(hill_formula(&counts(&[("H", 2)])), "H2");
        assert_eq!(hill_formula(&counts(&[("C", 1), ("H", 4)])), "CH4");
        assert_eq!(hill_formula(&counts(&[("C", 2), ("H", 6), ("O", 1)])), "C2H6O");
        assert_eq!(hill_formula(&counts(&[("Na", 1), ("Cl", 1)])), "ClNa");
        assert_eq!(hill_formula(&counts(&[("N", 1), ("H", 3)])), "H3N");
        assert_eq!(hill_formula(&counts(&[("C", 1), ("O", 2)])), "CO2");
        assert_eq!(hill_formula(&Composition::new()), "");
    }

    #[test]
    fn charge_suffixes() {
        assert_eq!(charge_suffix(0), "");
        assert_eq!(charge_suffix(1), "[+]");
        assert_eq!(charge_suffix(2), "[2+]");
        assert_eq!(charge_suffix(-1), "[-]");
        assert_eq!(charge_suffix(-3), "[3-]");
    }

    #[test]
    fn composition_and_weight() {
        let (mol, all) = build(&["O", "H", "H"], &[(0, 1), (0, 2)]);
        assert_eq!(composition(&mol, &all), counts(&[("H", 2), ("O", 1)]));
        let mw = molecular_weight(&mol, &all);
        assert!((mw - 18.015).abs() < 0.01, "got {mw}");
    }

    #[test]
    fn structural_salt() {
        let (mol, all) = build(&["Cl", "Na"], &[(0, 1)]);
        assert_eq!(structural_formula(&mol, &all), "NaCl");
    }

    #[test]
    fn structural_hydroxide() {
        // Ca bonded to two O, each O carrying an H.
        let (mol, all) = build(&["Ca", "O", "O", "H", "H"], &[(0, 1), (0, 2), (1, 3), (2, 4)]);
        assert_eq!(structural_formula(&mol, &all), "Ca(OH)2");
        let (mol, all) = build(&["Na", "O", "H"], &[(0, 1), (1, 2)]);
        assert_eq!(structural_formula(&mol, &all), "NaOH");
    }

    #[test]
    fn structural_oxide_and_hydride() {
        let (mol, all) = build(&["Mg", "O"], &[(0, 1)]);
        assert_eq!(structural_formula(&mol, &all), "MgO");
        let (mol, all) = build(&["Li", "H"], &[(0, 1)]);
        assert_eq!(structural_formula(&mol, &all), "LiH");
    }

    #[test]
    fn structural_metals_by_electronegativity() {
        // Cu (1.90) after Na (0.93).
        let (mol, all) = build(&["Cu", "Na"], &[(0, 1)]);
        assert_eq!(structural_formula(&mol, &all), "NaCu");
    }

    #[test]
    fn parse_simple_and_grouped() {
        assert_eq!(parse_formula("H2O").unwrap().counts, counts(&[("H", 2), ("O", 1)]));
        assert_eq!(
            parse_formula("Ca(OH)2").unwrap().counts,
            counts(&[("Ca", 1), ("H", 2), ("O", 2)])
        );
        assert_eq!(
            parse_formula("Al2(SO4)3").unwrap().counts,
            counts(&[("Al", 2), ("O", 12), ("S", 3)])
        );
        assert_eq!(parse_formula("C12H22O11").unwrap().counts["C"], 12);
    }

    #[test]
    fn parse_charge_suffix() {
        let p = parse_formula("H4N[+]").unwrap();
        assert_eq!(p.charge, 1);
        assert_eq!(p.counts, counts(&[("H", 4), ("N", 1)]));
        assert_eq!(parse_formula("O[2-]").unwrap().charge, -2);
        assert_eq!(parse_formula("Fe[3+]").unwrap().charge, 3);
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse_formula(""), Err(FormulaError::Empty));
        assert_eq!(parse_formula("h2o"), Err(FormulaError::UnexpectedChar { pos: 0, ch: 'h' }));
        assert!(matches!(parse_formula("Ca(OH2"), Err(FormulaError::UnmatchedParen { .. })));
        assert!(matches!(parse_formula("CaOH)2"), Err(FormulaError::UnmatchedParen { .. })));
        assert!(matches!(parse_formula("H0"), Err(FormulaError::InvalidCount { .. })));
        assert!(matches!(parse_formula("Na[x]"), Err(FormulaError::InvalidCharge { .. })));
    }

    #[test]
    fn oversized_counts_are_errors() {
        assert_eq!(
            parse_formula("H4294967295H"),
            Err(FormulaError::InvalidCount { pos: 11 })
        );
        assert_eq!(
            parse_formula("(H100000)100000"),
            Err(FormulaError::InvalidCount { pos: 8 })
        );
        assert_eq!(
            parse_formula("H4294967295(H)1"),
            Err(FormulaError::InvalidCount { pos: 13 })
        );
        assert_eq!(
            parse_formula("H4294967296"),
            Err(FormulaError::InvalidCount { pos: 1 })
        );
    }

    #[test]
    fn hill_output_parses_back() {
        for c in [
            counts(&[("C", 6), ("H", 6)]),
            counts(&[("Cl", 1), ("Na", 1)]),
            counts(&[("H", 2), ("O", 2)]),
            counts(&[("Br", 1), ("C", 2), ("F", 3), ("H", 1), ("Cl", 1)]),
        ] {
            assert_eq!(parse_formula(&hill_formula(&c)).unwrap().counts, c);
        }
    }
}
