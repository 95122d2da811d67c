use chemsandbox::kinetics::{KineticsConfig, KineticsSimulator, ReactionTemplate};
use chemsandbox::{BondKind, BondOrder, Phase, Sandbox, Species};

fn sandbox_with(atoms: &[(&str, [f64; 2])]) -> Sandbox {
    let mut sandbox = Sandbox::new();
    for (symbol, position) in atoms {
        sandbox.spawn(symbol, *position).unwrap();
    }
    sandbox
}

#[test]
fn hydrogen_pair_forms_h2() {
    let mut sandbox = sandbox_with(&[("H", [0.0, 0.0]), ("H", [40.0, 0.0])]);
    let pass = sandbox.resolve();

    assert_eq!(pass.bonds.len(), 1);
    let bond = &pass.bonds[0];
    assert_eq!(bond.order, BondOrder::Single);
    assert_eq!(bond.order.value(), 1);
    assert_eq!(bond.kind.label(), "single");

    assert_eq!(pass.molecules.len(), 1);
    let h2 = &pass.molecules[0];
    assert_eq!(h2.display_formula, "H2");
    assert_eq!(h2.species, Species::Molecule);
    assert_eq!(h2.species.label(), "molecule");
    assert_eq!(h2.systematic_name, "Hydrogen Gas");
    assert_eq!(h2.phase, Phase::Gas);
}

#[test]
fn sodium_chloride_is_ionic() {
    let mut sandbox = sandbox_with(&[("Na", [100.0, 100.0]), ("Cl", [175.0, 100.0])]);
    let pass = sandbox.resolve();

    assert_eq!(pass.bonds.len(), 1);
    assert_eq!(pass.bonds[0].kind, BondKind::Ionic);
    assert!(pass.bonds[0].is_ionic);
    assert_eq!(pass.molecules[0].systematic_name, "Sodium Chloride");
    assert_eq!(pass.molecules[0].name(), "Sodium Chloride");

    let na = pass.atoms.iter().find(|a| a.symbol() == "Na").unwrap();
    let cl = pass.atoms.iter().find(|a| a.symbol() == "Cl").unwrap();
    assert_eq!(na.formal_charge, 1);
    assert_eq!(cl.formal_charge, -1);
}

#[test]
fn overheating_decomposes() {
    let mut sandbox = sandbox_with(&[("H", [0.0, 0.0]), ("H", [60.0, 0.0])]);
    let td = sandbox.resolve().molecules[0]
        .decomposition_temperature
        .unwrap();

    sandbox.set_temperature(td * 10.0).unwrap();
    let pass = sandbox.resolve();
    let h2 = &pass.molecules[0];
    assert_eq!(h2.phase, Phase::Decomposed);
    assert!(h2.stability < 15.0, "stability {}", h2.stability);
    assert!(h2.diagnostics.is_none());
}

#[test]
fn catalyst_speeds_up_reaction() {
    let config = KineticsConfig {
        seed: Some(1),
        ..KineticsConfig::default()
    };
    let mut sim = KineticsSimulator::new(ReactionTemplate::synthesis(), config).unwrap();
    let without = sim.reaction_probability();
    sim.set_catalyst(true);
    let with = sim.reaction_probability();
    assert!(with > without, "{with} <= {without}");
}

#[test]
fn empty_sandbox_resolves_to_nothing() {
    let mut sandbox = Sandbox::new();
    let pass = sandbox.resolve();
    assert!(pass.bonds.is_empty());
    assert!(pass.molecules.is_empty());
    assert!(pass.atoms.is_empty());
}

#[test]
fn coincident_atoms_do_not_fail() {
    let mut sandbox = sandbox_with(&[("O", [10.0, 10.0]), ("O", [10.0, 10.0]), ("C", [10.0, 10.0])]);
    let pass = sandbox.resolve();
    assert_eq!(pass.atoms.len(), 3);
    let total: usize = pass.molecules.iter().map(|m| m.atom_ids.len()).sum();
    assert_eq!(total, 3);
}

#[test]
fn distant_atoms_resolve_separately() {
    let mut sandbox = sandbox_with(&[("H", [0.0, 0.0]), ("H", [1e12, 0.0]), ("O", [-1e15, 3e14])]);
    let pass = sandbox.resolve();
    assert!(pass.bonds.is_empty());
    assert_eq!(pass.molecules.len(), 3);
}

#[test]
fn water_inspector_report() {
    let mut sandbox = sandbox_with(&[("O", [0.0, 0.0]), ("H", [60.0, 0.0]), ("H", [-60.0, 0.0])]);
    let o = sandbox.atoms()[0].id;
    let pass = sandbox.resolve();
    assert_eq!(pass.molecules[0].display_formula, "H2O");
    assert_eq!(pass.molecules[0].phase, Phase::Liquid);

    let report = sandbox.inspect(o).unwrap();
    assert_eq!(report.formula, "H2O");
    assert_eq!(report.name, "Dihydrogen Monoxide");
    assert!(report.diagnostics.is_some());
}
