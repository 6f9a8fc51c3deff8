//! End-to-end runs of complete trains.

use std::cell::RefCell;
use std::rc::Rc;

use wt_chem::{
    Byproducts, CreditRequirement, Influent, OperatingPoint, Pathogen, SourceKind, WaterQuality,
};
use wt_core::units::{celsius, mgd, million_gallons, minutes};
use wt_process::{DecayInputs, RateModel, SaturationRate, WaterMatrix};
use wt_sim::{
    ChemicalDosing, ContactWindow, DbpModel, DbpPredictor, NullDbpPredictor, Orchestrator,
    OzonePhase, RunContext, RunOptions, SimError, StoichiometricDosing, run_train,
};
use wt_train::{
    BasinConfig, DistributionConfig, DoseConfig, FilterConfig, LimeConfig, MembraneConfig,
    OzoneContactorConfig, StageKind, Train, TrainBuilder, TrainError,
};

fn sixty_minute_basin() -> BasinConfig {
    // 10 MGD through 1/24 MG is one hour.
    BasinConfig::new(million_gallons(10.0 / 24.0), 0.5, 1.0)
}

fn scenario_a_influent() -> Influent {
    Influent {
        ph: 8.0,
        toc: 3.0,
        temperature: celsius(20.0),
        average_flow: mgd(10.0),
        ..Influent::default()
    }
}

fn train(kinds: Vec<StageKind>) -> Train {
    let mut b = TrainBuilder::new();
    b.add_stage("Raw water", StageKind::Influent);
    for kind in kinds {
        let name = kind.label().to_string();
        b.add_stage(name, kind);
    }
    b.build().unwrap()
}

fn filter(claim_credit: bool) -> StageKind {
    StageKind::Filter(FilterConfig {
        basin: BasinConfig::new(million_gallons(0.1), 0.7, 1.0),
        biological: false,
        claim_credit,
    })
}

#[test]
fn chlorinated_basin_keeps_residual_and_earns_ct() {
    let t = train(vec![
        StageKind::Chlorine(DoseConfig::new(2.0)),
        StageKind::Basin(sixty_minute_basin()),
    ]);
    let record = run_train(&t, &scenario_a_influent(), &RunOptions::default()).unwrap();

    let out = record.final_water().unwrap();
    assert!(out.free_chlorine > 0.0 && out.free_chlorine < 2.0);
    assert!(out.ledger.ct_achieved(Pathogen::Giardia) > 0.0);
    assert!(record.ct_ratios().giardia.unwrap() > 0.0);
    assert!((out.contact.t10 - 30.0).abs() < 1e-6);
}

#[test]
fn no_disinfectant_gives_zero_ratios() {
    let t = train(vec![
        StageKind::SettlingBasin(sixty_minute_basin()),
        filter(false),
        StageKind::PlantEffluent,
    ]);
    let record = run_train(&t, &Influent::default(), &RunOptions::default()).unwrap();

    let effluent = record.plant_effluent().unwrap();
    assert_eq!(effluent.kind, "PlantEffluent");
    for pathogen in Pathogen::ALL {
        assert_eq!(effluent.water.ledger.ct_ratio(pathogen), Some(0.0));
    }
}

#[test]
fn repeated_runs_are_identical() {
    let t = train(vec![
        StageKind::Alum(DoseConfig::new(25.0)),
        StageKind::Flocculation(BasinConfig::new(million_gallons(0.2), 0.3, 0.9)),
        StageKind::SettlingBasin(BasinConfig::new(million_gallons(1.0), 0.5, 1.0)),
        filter(true),
        StageKind::Chlorine(DoseConfig::new(3.0)),
        StageKind::Clearwell(BasinConfig::new(million_gallons(1.5), 0.3, 1.0)),
        StageKind::Ammonia(DoseConfig::new(0.6)),
        StageKind::PlantEffluent,
        StageKind::AverageTap(DistributionConfig {
            residence: minutes(1440.0),
        }),
    ]);
    let influent = Influent::default();
    let a = run_train(&t, &influent, &RunOptions::default()).unwrap();
    let b = run_train(&t, &influent, &RunOptions::default()).unwrap();
    assert_eq!(a.stages, b.stages);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn conventional_plant_tracks_models_and_credit() {
    let t = train(vec![
        StageKind::Alum(DoseConfig::new(30.0)),
        StageKind::SettlingBasin(BasinConfig::new(million_gallons(1.0), 0.5, 1.0)),
        filter(true),
        StageKind::Chlorine(DoseConfig::new(2.5)),
        StageKind::Clearwell(BasinConfig::new(million_gallons(1.0), 0.3, 1.0)),
        StageKind::PlantEffluent,
    ]);
    let influent = Influent::default();
    let record = run_train(&t, &influent, &RunOptions::default()).unwrap();

    let ctx = &record.context;
    assert_eq!(ctx.dbp_model(), DbpModel::Coagulated);
    assert!(ctx.flags().coagulated && ctx.flags().settled && ctx.flags().filtered);
    assert_eq!(ctx.observed_credit(), ctx.plan().non_ct_credit);
    assert_eq!(
        ctx.plan().requirement.giardia,
        CreditRequirement::Remaining(0.5)
    );
    assert_eq!(
        ctx.plan().requirement.crypto,
        CreditRequirement::MetByNonCt
    );

    let coagulated = &record.stages[1].water;
    assert!(coagulated.toc < influent.toc);
    assert!(coagulated.ph < influent.ph);

    let ratios = record.ct_ratios();
    assert!(ratios.giardia.unwrap() > 0.0);
    assert_eq!(ratios.crypto, Some(1.0));
}

#[test]
fn non_ct_credit_forces_ratio_to_one() {
    let uf = StageKind::Ultrafiltration(MembraneConfig {
        giardia_log: 4.0,
        virus_log: 0.0,
        crypto_log: 4.0,
    });
    let t = train(vec![
        uf,
        StageKind::Chlorine(DoseConfig::new(2.0)),
        StageKind::Clearwell(sixty_minute_basin()),
    ]);
    let record = run_train(&t, &Influent::default(), &RunOptions::default()).unwrap();
    for stage in &record.stages {
        assert_eq!(stage.water.ledger.ct_ratio(Pathogen::Giardia), Some(1.0));
        assert_eq!(
            stage.water.ledger.ct_ratio(Pathogen::Cryptosporidium),
            Some(1.0)
        );
    }
    assert!(record.ct_ratios().virus.unwrap() > 0.0);
}

#[test]
fn groundwater_without_virus_requirement_is_not_applicable() {
    let influent = Influent {
        source: SourceKind::Groundwater {
            virus_disinfection_required: false,
        },
        ..Influent::default()
    };
    let t = train(vec![
        StageKind::Chlorine(DoseConfig::new(1.5)),
        StageKind::StorageTank(sixty_minute_basin()),
    ]);
    let record = run_train(&t, &influent, &RunOptions::default()).unwrap();
    let ratios = record.ct_ratios();
    assert_eq!(ratios.giardia, None);
    assert_eq!(ratios.virus, None);
    assert_eq!(ratios.crypto, None);
}

#[test]
fn peak_cold_earns_less_credit() {
    let t = train(vec![
        StageKind::Chlorine(DoseConfig::new(2.0)),
        StageKind::Clearwell(sixty_minute_basin()),
    ]);
    let runs = Orchestrator::new()
        .run_all_points(&t, &Influent::default())
        .unwrap();
    assert_eq!(runs[0].point, OperatingPoint::Average);
    assert_eq!(runs[1].point, OperatingPoint::PeakCold);
    let avg = runs[0].ct_ratios().giardia.unwrap();
    let peak = runs[1].ct_ratios().giardia.unwrap();
    assert!(peak < avg);
    assert!(runs[1].context.is_peak_cold());
}

#[test]
fn distribution_earns_no_ct_credit() {
    let t = train(vec![
        StageKind::Chlorine(DoseConfig::new(3.0)),
        StageKind::Clearwell(sixty_minute_basin()),
        StageKind::PlantEffluent,
        StageKind::AverageTap(DistributionConfig {
            residence: minutes(240.0),
        }),
    ]);
    let record = run_train(&t, &Influent::default(), &RunOptions::default()).unwrap();
    let effluent = &record.plant_effluent().unwrap().water;
    let tap = record.final_water().unwrap();
    assert!(tap.free_chlorine < effluent.free_chlorine);
    assert_eq!(tap.ledger, effluent.ledger);
    assert!(tap.contact.free_chlorine > effluent.contact.free_chlorine);
}

#[test]
fn softening_precipitates_calcite() {
    let influent = Influent {
        alkalinity: 200.0,
        calcium_hardness: 250.0,
        total_hardness: 300.0,
        ..Influent::default()
    };
    let t = train(vec![StageKind::Lime(LimeConfig {
        dose: 150.0,
        softening: true,
    })]);
    let record = run_train(&t, &influent, &RunOptions::default()).unwrap();
    let out = record.final_water().unwrap();
    assert!(out.ph > influent.ph);
    assert!(out.caco3_solids > 0.0);
    assert_eq!(record.context.dbp_model(), DbpModel::Coagulated);
}

#[test]
fn soda_ash_after_softening_lime_keeps_precipitating() {
    let influent = Influent {
        alkalinity: 60.0,
        calcium_hardness: 250.0,
        total_hardness: 300.0,
        ..Influent::default()
    };
    let t = train(vec![
        StageKind::Lime(LimeConfig {
            dose: 150.0,
            softening: true,
        }),
        StageKind::SodaAsh(DoseConfig::new(200.0)),
        StageKind::SettlingBasin(sixty_minute_basin()),
    ]);
    let record = run_train(&t, &influent, &RunOptions::default()).unwrap();
    assert!(record.context.flags().softened);

    let lime = &record.stages[1].water;
    let soda = &record.stages[2].water;
    let settled = &record.stages[3].water;
    assert!(lime.caco3_solids > 0.0);
    assert!(soda.caco3_solids > lime.caco3_solids);
    assert!(soda.calcium < lime.calcium);
    assert!(settled.caco3_solids >= soda.caco3_solids);
}

#[test]
fn unsoftened_run_never_precipitates() {
    let influent = Influent {
        alkalinity: 60.0,
        calcium_hardness: 250.0,
        total_hardness: 300.0,
        ..Influent::default()
    };
    let t = train(vec![
        StageKind::Lime(LimeConfig {
            dose: 150.0,
            softening: false,
        }),
        StageKind::SodaAsh(DoseConfig::new(200.0)),
    ]);
    let record = run_train(&t, &influent, &RunOptions::default()).unwrap();
    assert!(!record.context.flags().softened);
    assert!(record.stages.iter().all(|s| s.water.caco3_solids == 0.0));
}

#[test]
fn invalid_inputs_abort_the_run() {
    let mut b = TrainBuilder::new();
    b.add_stage("Chlorine", StageKind::Chlorine(DoseConfig::new(1.0)));
    assert_eq!(b.build().unwrap_err(), TrainError::MissingInfluent);

    let t = train(vec![StageKind::PlantEffluent]);
    let influent = Influent {
        ph: f64::NAN,
        ..Influent::default()
    };
    let err = run_train(&t, &influent, &RunOptions::default()).unwrap_err();
    assert!(matches!(err, SimError::Chem(_)));
}

struct PanickingRates;

impl RateModel for PanickingRates {
    fn free_chlorine(&self, _: WaterMatrix, _: &DecayInputs) -> SaturationRate {
        panic!("rate model evaluated without a residual")
    }
    fn chloramine(&self, _: WaterMatrix, _: &DecayInputs) -> SaturationRate {
        panic!("rate model evaluated without a residual")
    }
    fn ozone_demand(&self, _: &DecayInputs) -> f64 {
        panic!("rate model evaluated without a residual")
    }
    fn ozone_decay(&self, _: &DecayInputs) -> f64 {
        panic!("rate model evaluated without a residual")
    }
    fn clo2_demand(&self, _: &DecayInputs) -> f64 {
        panic!("rate model evaluated without a residual")
    }
    fn clo2_decay(&self, _: &DecayInputs) -> f64 {
        panic!("rate model evaluated without a residual")
    }
}

#[test]
fn undisinfected_train_never_evaluates_rates() {
    let t = train(vec![
        StageKind::SettlingBasin(sixty_minute_basin()),
        StageKind::Clearwell(sixty_minute_basin()),
    ]);
    let orchestrator =
        Orchestrator::with_collaborators(PanickingRates, StoichiometricDosing, NullDbpPredictor);
    let record = orchestrator
        .run(&t, &Influent::default(), &RunOptions::default())
        .unwrap();
    assert_eq!(record.final_water().unwrap().free_chlorine, 0.0);
}

#[derive(Debug, Clone, Copy)]
struct Seen {
    model: DbpModel,
    peak_cold: bool,
    chloraminated: bool,
    window: ContactWindow,
}

#[derive(Default)]
struct RecordingPredictor {
    seen: Rc<RefCell<Vec<Seen>>>,
}

impl DbpPredictor for RecordingPredictor {
    fn predict(
        &self,
        ctx: &RunContext,
        water: &WaterQuality,
        _: &Influent,
        window: &ContactWindow,
    ) -> Byproducts {
        self.seen.borrow_mut().push(Seen {
            model: ctx.dbp_model(),
            peak_cold: ctx.is_peak_cold(),
            chloraminated: ctx.flags().chloraminated,
            window: *window,
        });
        Byproducts {
            tthm: water.free_chlorine * window.minutes,
            ..Byproducts::default()
        }
    }
}

fn recording_orchestrator(
    predictor: RecordingPredictor,
) -> Orchestrator<wt_process::EmpiricalRates, StoichiometricDosing, RecordingPredictor> {
    Orchestrator::with_collaborators(wt_process::EmpiricalRates, StoichiometricDosing, predictor)
}

#[test]
fn predictor_sees_contiguous_windows() {
    let t = train(vec![
        StageKind::Alum(DoseConfig::new(20.0)),
        StageKind::Chlorine(DoseConfig::new(2.0)),
        StageKind::Clearwell(sixty_minute_basin()),
    ]);
    let predictor = RecordingPredictor::default();
    let seen = Rc::clone(&predictor.seen);
    let record = recording_orchestrator(predictor)
        .run(&t, &Influent::default(), &RunOptions::default())
        .unwrap();
    assert!(record.final_water().unwrap().byproducts.tthm > 0.0);

    let seen = seen.borrow();
    assert!(!seen.is_empty());
    assert_eq!(seen[0].window.start_minutes, 0.0);
    for pair in seen.windows(2) {
        assert!((pair[1].window.start_minutes - pair[0].window.end_minutes()).abs() < 1e-9);
    }
    assert!(seen.iter().all(|s| s.model == DbpModel::Coagulated));
    assert!(seen.iter().all(|s| !s.peak_cold && !s.chloraminated));
    let total: f64 = seen.iter().map(|s| s.window.minutes).sum();
    assert!((total - 60.0).abs() < 1e-6);
}

#[test]
fn predictor_sees_run_flags() {
    let t = train(vec![
        StageKind::Chlorine(DoseConfig::new(3.0)),
        StageKind::Ammonia(DoseConfig::new(1.0)),
        StageKind::Clearwell(sixty_minute_basin()),
    ]);
    let predictor = RecordingPredictor::default();
    let seen = Rc::clone(&predictor.seen);
    recording_orchestrator(predictor)
        .run(
            &t,
            &Influent::default(),
            &RunOptions::at(OperatingPoint::PeakCold),
        )
        .unwrap();

    let seen = seen.borrow();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|s| s.peak_cold && s.chloraminated));
}

#[derive(Default)]
struct RecordingDosing {
    doses: Rc<RefCell<Vec<(&'static str, bool, f64)>>>,
}

impl ChemicalDosing for RecordingDosing {
    fn dose(
        &self,
        kind: &StageKind,
        ctx: &RunContext,
        influent: &Influent,
        water: &mut WaterQuality,
    ) {
        self.doses
            .borrow_mut()
            .push((kind.label(), ctx.flags().chlorinated, influent.ph));
        StoichiometricDosing.dose(kind, ctx, influent, water);
    }
}

#[test]
fn dosing_sees_context_and_influent() {
    let t = train(vec![
        StageKind::Alum(DoseConfig::new(20.0)),
        StageKind::Chlorine(DoseConfig::new(2.0)),
        StageKind::SettlingBasin(sixty_minute_basin()),
    ]);
    let influent = Influent::default();
    let dosing = RecordingDosing::default();
    let doses = Rc::clone(&dosing.doses);
    let orchestrator =
        Orchestrator::with_collaborators(wt_process::EmpiricalRates, dosing, NullDbpPredictor);
    let record = orchestrator
        .run(&t, &influent, &RunOptions::default())
        .unwrap();
    assert!(record.final_water().unwrap().free_chlorine > 0.0);

    let doses = doses.borrow();
    assert_eq!(
        *doses,
        vec![("Alum", false, influent.ph), ("Chlorine", true, influent.ph)]
    );
}

#[test]
fn ozone_and_chlorine_dioxide_earn_crypto_credit() {
    let t = train(vec![
        StageKind::OzoneContactor(OzoneContactorConfig {
            dose: 3.0,
            basin: BasinConfig::new(million_gallons(0.1), 0.6, 1.0),
        }),
        StageKind::SettlingBasin(sixty_minute_basin()),
        StageKind::ChlorineDioxide(DoseConfig::new(2.0)),
        StageKind::Clearwell(sixty_minute_basin()),
        StageKind::Clearwell(sixty_minute_basin()),
    ]);
    let influent = scenario_a_influent();
    let predictor = RecordingPredictor::default();
    let seen = Rc::clone(&predictor.seen);
    let record = recording_orchestrator(predictor)
        .run(&t, &influent, &RunOptions::default())
        .unwrap();

    let crypto: Vec<f64> = record
        .stages
        .iter()
        .map(|s| s.water.ledger.ct_ratio(Pathogen::Cryptosporidium).unwrap())
        .collect();
    assert_eq!(crypto[0], 0.0);
    assert!(crypto[1] > 0.0);
    assert!(crypto.windows(2).all(|w| w[1] >= w[0]));
    assert!(crypto[4] > crypto[3]);
    assert!(crypto[5] > crypto[4]);

    let dosed = &record.stages[3].water;
    let first = &record.stages[4].water;
    let second = &record.stages[5].water;
    assert_eq!(record.stages[3].kind, "ChlorineDioxide");
    assert!(dosed.clo2_demand_pending);
    assert_eq!(dosed.byproducts.chlorite, 0.0);
    assert!(!first.clo2_demand_pending);
    assert!(first.byproducts.chlorite > 0.0);
    assert!(second.chlorine_dioxide > 0.0);
    assert_eq!(second.byproducts.chlorite, first.byproducts.chlorite);

    assert_eq!(record.context.ozone_phase(), OzonePhase::Post);
    let seen = seen.borrow();
    let contactor_slices = wt_process::reactor_count(0.6);
    assert!(seen.len() > contactor_slices);
    assert!(seen[..contactor_slices]
        .iter()
        .all(|s| s.model == DbpModel::Ozonated));
}
