//! Train orchestrator: one deterministic forward pass.

use tracing::{debug, info};
use wt_chem::{
    DisinfectionLedger, EquilibriumMode, EquilibriumSolver, Influent, OperatingPoint, WaterQuality,
};
use wt_core::units::VolumeRate;
use wt_credit::CtAccountant;
use wt_process::ozone::dose_ozone;
use wt_process::removal::{self, Coagulant};
use wt_process::{Cascade, DecayEngine, EmpiricalRates, RateModel};
use wt_train::{Hydraulics, Stage, StageKind, Train};

use crate::context::{OzonePhase, RunContext};
use crate::dbp::{ContactWindow, DbpPredictor, NullDbpPredictor};
use crate::dosing::{ChemicalDosing, StoichiometricDosing};
use crate::error::SimResult;
use crate::record::{RunRecord, StageRecord};

/// Options for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub point: OperatingPoint,
}

impl RunOptions {
    pub fn at(point: OperatingPoint) -> Self {
        Self { point }
    }
}

/// Drives a train with pluggable rate, dosing, and DBP collaborators.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator<R = EmpiricalRates, D = StoichiometricDosing, P = NullDbpPredictor> {
    rates: R,
    dosing: D,
    dbp: P,
    accountant: CtAccountant,
}

impl Orchestrator {
    /// Empirical rates, stoichiometric dosing, no DBP formation.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: RateModel, D: ChemicalDosing, P: DbpPredictor> Orchestrator<R, D, P> {
    pub fn with_collaborators(rates: R, dosing: D, dbp: P) -> Self {
        Self {
            rates,
            dosing,
            dbp,
            accountant: CtAccountant::new(),
        }
    }

    /// Run the train once, end to end, from a fresh context.
    ///
    /// Structural errors abort before any stage runs.
    pub fn run(
        &self,
        train: &Train,
        influent: &Influent,
        options: &RunOptions,
    ) -> SimResult<RunRecord> {
        train.validate()?;
        influent.validate()?;

        let point = options.point;
        let flow = influent.flow(point);
        info!(stages = train.len(), point = ?point, "run start");

        let mut ctx = RunContext::new(train, influent, point);
        let mut solver = EquilibriumSolver::new();
        let mut water = WaterQuality::from_influent(influent, point, &mut solver)?;
        water.ledger = DisinfectionLedger::new(ctx.plan().requirement);

        let mut stages = Vec::with_capacity(train.len());
        for (position, stage) in train.stages().iter().enumerate() {
            if position > 0 {
                let mut next = water.clone();
                ctx.observe(&stage.kind, &next);
                if stage.kind.is_dosing() {
                    self.dosing.dose(&stage.kind, &ctx, influent, &mut next);
                }
                self.dispatch(stage, &mut next, &ctx, influent, flow, &mut solver)?;

                // Precipitation stays active for the rest of a softening run.
                let softening = ctx.flags().softened;
                let outcome =
                    solver.solve(EquilibriumMode::AdjustPh, &next.equilibrium_input(softening))?;
                next.apply_equilibrium(&outcome, &mut solver);
                next.refresh_derived();
                water = next;
            }

            debug!(
                stage = %stage.id,
                kind = stage.kind.label(),
                ph = water.ph,
                toc = water.toc,
                free_chlorine = water.free_chlorine,
                chloramine = water.chloramine,
                "stage complete"
            );
            stages.push(StageRecord {
                id: stage.id,
                name: stage.name.clone(),
                kind: stage.kind.label(),
                water: water.clone(),
            });
        }

        let record = RunRecord {
            point,
            stages,
            plant_effluent: train.plant_effluent_index(),
            context: ctx,
        };
        let ratios = record.ct_ratios();
        info!(
            point = ?point,
            giardia = ?ratios.giardia,
            virus = ?ratios.virus,
            crypto = ?ratios.crypto,
            "run finished"
        );
        Ok(record)
    }

    /// Independent runs at average and peak-cold conditions.
    pub fn run_all_points(&self, train: &Train, influent: &Influent) -> SimResult<Vec<RunRecord>> {
        [OperatingPoint::Average, OperatingPoint::PeakCold]
            .into_iter()
            .map(|point| self.run(train, influent, &RunOptions::at(point)))
            .collect()
    }

    fn dispatch(
        &self,
        stage: &Stage,
        water: &mut WaterQuality,
        ctx: &RunContext,
        influent: &Influent,
        flow: VolumeRate,
        solver: &mut EquilibriumSolver,
    ) -> SimResult<()> {
        let coagulated = ctx.flags().coagulated;
        let softening = ctx.flags().softened;
        match &stage.kind {
            StageKind::Alum(d) => {
                self.coagulate(water, Coagulant::Alum, d.dose, softening, solver)?
            }
            StageKind::FerricChloride(d) => {
                self.coagulate(water, Coagulant::FerricChloride, d.dose, softening, solver)?
            }
            StageKind::FerricSulfate(d) => {
                self.coagulate(water, Coagulant::FerricSulfate, d.dose, softening, solver)?
            }
            StageKind::PowderedCarbon(d) => removal::adsorb_pac(water, d.dose),
            StageKind::OzoneContactor(o) => {
                let demand = dose_ozone(water, o.dose, &self.rates);
                debug!(dose = o.dose, demand, "ozone applied");
            }
            StageKind::SettlingBasin(_) | StageKind::PresedimentationBasin(_) => {
                removal::settle(water, coagulated)
            }
            StageKind::Filter(f) => {
                removal::filter(water, coagulated);
                if f.biological && ctx.ozone_phase() != OzonePhase::None {
                    removal::biofilter(water);
                }
            }
            StageKind::GacContactor(g) => removal::adsorb_gac(water, g),
            StageKind::Nanofiltration(nf) => removal::nanofilter(water, nf),
            StageKind::Microfiltration(_) | StageKind::Ultrafiltration(_) => {
                removal::membrane_filter(water)
            }
            _ => {}
        }

        if let Some(hydraulics) = stage.kind.hydraulics() {
            self.contact(water, hydraulics, ctx, influent, flow)?;
        }
        Ok(())
    }

    fn coagulate(
        &self,
        water: &mut WaterQuality,
        coagulant: Coagulant,
        dose: f64,
        softening: bool,
        solver: &mut EquilibriumSolver,
    ) -> SimResult<()> {
        // Sorption capacity depends on the post-dose pH.
        let outcome =
            solver.solve(EquilibriumMode::AdjustPh, &water.equilibrium_input(softening))?;
        water.apply_equilibrium(&outcome, solver);
        let removed = removal::coagulate(water, coagulant, dose);
        debug!(coagulant = ?coagulant, dose, ph = water.ph, removed, "coagulation");
        Ok(())
    }

    fn contact(
        &self,
        water: &mut WaterQuality,
        hydraulics: Hydraulics,
        ctx: &RunContext,
        influent: &Influent,
        flow: VolumeRate,
    ) -> SimResult<()> {
        let cascade = Cascade::new(
            hydraulics.theoretical_minutes(flow),
            hydraulics.t10_ratio(),
            hydraulics.tmean_ratio(),
        )?;
        let engine = DecayEngine::new(&self.rates, ctx.water_matrix());
        let credit = ctx.earns_ct_credit();
        let mut elapsed = water.contact.residence;

        let outcome = engine.run_basin(water, &cascade, |w, step| {
            if credit {
                self.accountant.record_slice(w, step);
            }
            let window = ContactWindow {
                start_minutes: elapsed,
                minutes: step.minutes,
            };
            elapsed += step.minutes;
            let delta = self.dbp.predict(ctx, w, influent, &window);
            w.byproducts.accumulate(&delta);
        });

        water.contact.residence += cascade.mean_minutes();
        water.contact.t10 += cascade.t10_minutes();
        debug!(
            reactors = outcome.reactors,
            minutes = cascade.theoretical_minutes,
            t10 = cascade.t10_minutes(),
            credit,
            "basin contact"
        );
        Ok(())
    }
}

/// Run a train with the default collaborators.
pub fn run_train(train: &Train, influent: &Influent, options: &RunOptions) -> SimResult<RunRecord> {
    Orchestrator::new().run(train, influent, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_chem::Pathogen;
    use wt_core::units::million_gallons;
    use wt_train::{BasinConfig, DoseConfig, TrainBuilder};

    fn chlorinated(dose: f64, t10_ratio: f64) -> Train {
        let mut b = TrainBuilder::new();
        b.add_stage("Raw", StageKind::Influent);
        b.add_stage("Cl2", StageKind::Chlorine(DoseConfig::new(dose)));
        b.add_stage(
            "Contact",
            StageKind::ContactTank(BasinConfig::new(million_gallons(0.4), t10_ratio, 1.0)),
        );
        b.add_stage("PE", StageKind::PlantEffluent);
        b.build().unwrap()
    }

    #[test]
    fn record_follows_train_order() {
        let t = chlorinated(2.0, 0.5);
        let record = run_train(&t, &Influent::default(), &RunOptions::default()).unwrap();
        let kinds: Vec<_> = record.stages.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, ["Influent", "Chlorine", "ContactTank", "PlantEffluent"]);
        assert_eq!(record.plant_effluent, Some(3));
        assert!(record.context.flags().past_plant_effluent);
        assert!(record.context.flags().chlorinated);
        assert_eq!(record.stage(t.stages()[2].id).unwrap().name, "Contact");
    }

    #[test]
    fn influent_record_is_untreated() {
        let t = chlorinated(2.0, 0.5);
        let influent = Influent::default();
        let record = run_train(&t, &influent, &RunOptions::default()).unwrap();
        let raw = &record.stages[0].water;
        assert_eq!(raw.free_chlorine, 0.0);
        assert_eq!(raw.ledger.ct_ratio(Pathogen::Giardia), Some(0.0));
        assert!((raw.ph - influent.ph).abs() < 1e-6);
    }

    #[test]
    fn dosing_stage_sets_residual_without_contact() {
        let t = chlorinated(2.0, 0.5);
        let record = run_train(&t, &Influent::default(), &RunOptions::default()).unwrap();
        let dosed = &record.stages[1].water;
        assert!((dosed.free_chlorine - 2.0).abs() < 1e-9);
        assert_eq!(dosed.contact.t10, 0.0);
        assert!(dosed.ph < record.stages[0].water.ph);
    }
}
