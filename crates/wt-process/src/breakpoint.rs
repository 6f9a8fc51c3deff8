//! Breakpoint chlorination.
//!
//! Two instantaneous stoichiometric reactions, evaluated in mol/L:
//!
//! 1. `HOCl + NH3 -> NH2Cl + H2O`
//! 2. `2 NH2Cl + HOCl -> N2 + 3 HCl + H2O`, only with free chlorine left over
//!
//! The second reaction releases strong acid, which lowers the residual
//! "other ions" charge term.

use tracing::trace;
use wt_chem::WaterQuality;
use wt_chem::species::{mg_l_to_mol, mol_to_mg_l, mw};

/// Molar amounts consumed by one application.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BreakpointShift {
    pub monochloramine_formed: f64,
    pub monochloramine_oxidized: f64,
}

/// Convert free chlorine and ammonia in place. Free chlorine and chloramine
/// are carried as mg/L Cl2, ammonia as mg/L N.
pub fn apply_breakpoint(water: &mut WaterQuality) -> BreakpointShift {
    let mut cl = mg_l_to_mol(water.free_chlorine, mw::CHLORINE);
    let mut nh3 = mg_l_to_mol(water.ammonia_n, mw::NITROGEN);
    let mut nh2cl = mg_l_to_mol(water.chloramine, mw::CHLORINE);

    if cl <= 0.0 {
        return BreakpointShift::default();
    }

    let formed = cl.min(nh3).max(0.0);
    cl -= formed;
    nh3 -= formed;
    nh2cl += formed;

    let mut oxidized = 0.0;
    if cl > 0.0 && nh2cl > 0.0 {
        let y = cl.min(nh2cl / 2.0);
        cl -= y;
        oxidized = 2.0 * y;
        nh2cl -= oxidized;
        water.other_ions -= 3.0 * y;
    }

    water.free_chlorine = mol_to_mg_l(cl.max(0.0), mw::CHLORINE);
    water.ammonia_n = mol_to_mg_l(nh3.max(0.0), mw::NITROGEN);
    water.chloramine = mol_to_mg_l(nh2cl.max(0.0), mw::CHLORINE);

    trace!(formed, oxidized, "breakpoint");
    BreakpointShift {
        monochloramine_formed: formed,
        monochloramine_oxidized: oxidized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_chem::{EquilibriumSolver, Influent, OperatingPoint};

    fn water(free: f64, nh3_n: f64) -> WaterQuality {
        let mut solver = EquilibriumSolver::new();
        let mut w =
            WaterQuality::from_influent(&Influent::default(), OperatingPoint::Average, &mut solver)
                .unwrap();
        w.free_chlorine = free;
        w.ammonia_n = nh3_n;
        w
    }

    #[test]
    fn excess_ammonia_forms_chloramine_only() {
        let mut w = water(1.0, 1.0);
        let before = w.other_ions;
        let shift = apply_breakpoint(&mut w);
        assert_eq!(w.free_chlorine, 0.0);
        assert!((w.chloramine - 1.0).abs() < 1e-12);
        assert!(w.ammonia_n > 0.0);
        assert_eq!(shift.monochloramine_oxidized, 0.0);
        assert_eq!(w.other_ions, before);
    }

    #[test]
    fn past_breakpoint_leaves_free_chlorine() {
        // Cl2:N mass ratio well above 7.6
        let mut w = water(10.0, 0.5);
        let before = w.other_ions;
        apply_breakpoint(&mut w);
        assert_eq!(w.ammonia_n, 0.0);
        assert!(w.free_chlorine > 0.0);
        assert!(w.chloramine.abs() < 1e-9);
        assert!(w.other_ions < before);
    }

    #[test]
    fn no_chlorine_no_change() {
        let mut w = water(0.0, 1.0);
        let snapshot = w.clone();
        apply_breakpoint(&mut w);
        assert_eq!(w, snapshot);
    }
}
