use wt_chem::species::{mg_l_to_mol, mw};
use wt_chem::{
    EquilibriumMode, EquilibriumSolver, Influent, OperatingPoint, SourceKind, WaterQuality,
};
use wt_core::units::celsius;

fn raw(influent: &Influent, point: OperatingPoint) -> (WaterQuality, EquilibriumSolver) {
    let mut solver = EquilibriumSolver::new();
    let water = WaterQuality::from_influent(influent, point, &mut solver).unwrap();
    (water, solver)
}

#[test]
fn influent_charge_closes_at_measured_ph() {
    let influent = Influent {
        ph: 6.8,
        alkalinity: 40.0,
        ..Influent::default()
    };
    let (water, mut solver) = raw(&influent, OperatingPoint::Average);

    let outcome = solver
        .solve(EquilibriumMode::AdjustPh, &water.equilibrium_input(false))
        .unwrap();
    assert!((outcome.ph - 6.8).abs() < 1e-3);
}

#[test]
fn acid_lowers_and_base_raises_ph() {
    let (water, mut solver) = raw(&Influent::default(), OperatingPoint::Average);
    let acid = mg_l_to_mol(20.0, mw::SULFURIC_ACID) * 2.0;

    let mut acidified = water.equilibrium_input(false);
    acidified.other_ions -= acid;
    let mut basified = water.equilibrium_input(false);
    basified.other_ions += acid;

    let low = solver.solve(EquilibriumMode::AdjustPh, &acidified).unwrap();
    let high = solver.solve(EquilibriumMode::AdjustPh, &basified).unwrap();
    assert!(low.ph < water.ph);
    assert!(high.ph > water.ph);
}

#[test]
fn repeated_solves_are_memoized() {
    let (water, mut solver) = raw(&Influent::default(), OperatingPoint::Average);
    let input = water.equilibrium_input(false);

    let first = solver.solve(EquilibriumMode::AdjustPh, &input).unwrap();
    let evaluations = solver.balance_evaluations();
    let second = solver.solve(EquilibriumMode::AdjustPh, &input).unwrap();

    assert_eq!(first, second);
    assert_eq!(solver.balance_evaluations(), evaluations);
}

#[test]
fn peak_cold_uses_cold_temperature() {
    let influent = Influent {
        temperature: celsius(22.0),
        cold_temperature: celsius(2.0),
        ..Influent::default()
    };
    let (avg, _) = raw(&influent, OperatingPoint::Average);
    let (cold, _) = raw(&influent, OperatingPoint::PeakCold);
    assert!((avg.temperature_c - 22.0).abs() < 1e-9);
    assert!((cold.temperature_c - 2.0).abs() < 1e-9);
    assert!((avg.ph - cold.ph).abs() < 1e-9);
}

#[test]
fn invalid_influent_is_rejected() {
    let mut solver = EquilibriumSolver::new();
    let influent = Influent {
        calcium_hardness: 200.0,
        total_hardness: 100.0,
        ..Influent::default()
    };
    assert!(influent.validate().is_err());

    let influent = Influent {
        toc: -1.0,
        source: SourceKind::Groundwater {
            virus_disinfection_required: true,
        },
        ..Influent::default()
    };
    assert!(influent.validate().is_err());
    assert!(
        WaterQuality::from_influent(&Influent::default(), OperatingPoint::Average, &mut solver)
            .is_ok()
    );
}
