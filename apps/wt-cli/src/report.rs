//! Text and JSON reporters for completed runs.

use std::io::Write;

use wt_chem::{OperatingPoint, Pathogen};
use wt_sim::{RunRecord, RunReporter};

use crate::CliError;

fn point_label(point: OperatingPoint) -> &'static str {
    match point {
        OperatingPoint::Average => "average",
        OperatingPoint::PeakCold => "peak-cold",
    }
}

fn ratio(value: Option<f64>) -> String {
    match value {
        Some(r) => format!("{:.3}", r),
        None => "n/a".to_string(),
    }
}

/// Human-readable stage table plus the final CT ratios.
pub struct TextReporter<W> {
    out: W,
    /// File stage ids in train order.
    stage_ids: Vec<String>,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W, stage_ids: Vec<String>) -> Self {
        Self { out, stage_ids }
    }
}

impl<W: Write> RunReporter for TextReporter<W> {
    type Error = CliError;

    fn report(&mut self, record: &RunRecord) -> Result<(), CliError> {
        writeln!(self.out, "\nOperating point: {}", point_label(record.point))?;
        writeln!(
            self.out,
            "  {:<10} {:<18} {:>6} {:>7} {:>7} {:>7} {:>7} {:>7} {:>8} {:>8} {:>8}",
            "id", "kind", "pH", "TOC", "Cl2", "NH2Cl", "ClO2", "O3", "giardia", "virus", "crypto"
        )?;
        for (i, stage) in record.stages.iter().enumerate() {
            let id = self.stage_ids.get(i).map(String::as_str).unwrap_or("-");
            let w = &stage.water;
            writeln!(
                self.out,
                "  {:<10} {:<18} {:>6.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>8} {:>8} {:>8}",
                id,
                stage.kind,
                w.ph,
                w.toc,
                w.free_chlorine,
                w.chloramine,
                w.chlorine_dioxide,
                w.ozone,
                ratio(w.ledger.ct_ratio(Pathogen::Giardia)),
                ratio(w.ledger.ct_ratio(Pathogen::Virus)),
                ratio(w.ledger.ct_ratio(Pathogen::Cryptosporidium)),
            )?;
        }

        let ratios = record.ct_ratios();
        writeln!(
            self.out,
            "  CT ratios: giardia={}  virus={}  crypto={}",
            ratio(ratios.giardia),
            ratio(ratios.virus),
            ratio(ratios.crypto)
        )?;
        if let Some(pe) = record.plant_effluent() {
            let b = &pe.water.byproducts;
            writeln!(
                self.out,
                "  Plant effluent: TTHM={:.1} ug/L  HAA5={:.1} ug/L  chlorite={:.1} ug/L",
                b.tthm, b.haa5, b.chlorite
            )?;
        }
        Ok(())
    }
}

/// One JSON document per record.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RunReporter for JsonReporter<W> {
    type Error = CliError;

    fn report(&mut self, record: &RunRecord) -> Result<(), CliError> {
        serde_json::to_writer_pretty(&mut self.out, record)?;
        writeln!(self.out)?;
        Ok(())
    }
}
