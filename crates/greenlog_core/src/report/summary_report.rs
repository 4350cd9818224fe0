//! Summary report model and plain-text rendering.
//!
//! # Invariants
//! - A report always covers at least one day; empty ranges yield no report.
//! - Temperature and humidity print with one decimal, CO₂ as whole ppm.

use crate::stats::daily::DayAverage;
use crate::stats::summary::{MetricSummary, RangeSummary};
use chrono::NaiveDateTime;
use std::fmt::Write;

pub const REPORT_TITLE: &str = "Reporte de Condiciones Ambientales";

/// Everything the report generator prints for one scope.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub title: String,
    /// Greenhouse name, or the all-greenhouses label.
    pub scope: String,
    pub generated_at: NaiveDateTime,
    pub summary: RangeSummary,
    pub days: Vec<DayAverage>,
}

impl SummaryReport {
    /// Builds a report from date-sorted daily averages.
    ///
    /// Returns `None` when `days` is empty.
    pub fn build(
        scope: impl Into<String>,
        days: &[DayAverage],
        generated_at: NaiveDateTime,
    ) -> Option<Self> {
        let summary = RangeSummary::from_days(days)?;
        Some(Self {
            title: REPORT_TITLE.to_string(),
            scope: scope.into(),
            generated_at,
            summary,
            days: days.to_vec(),
        })
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        let summary = &self.summary;

        writeln!(out, "{}", self.title)?;
        writeln!(out, "{}", "=".repeat(self.title.chars().count()))?;
        writeln!(out, "Invernadero: {}", self.scope)?;
        writeln!(
            out,
            "Periodo: {} a {} ({} días, {} registros)",
            summary.first_date, summary.last_date, summary.days, summary.samples
        )?;
        writeln!(out, "Generado: {}", self.generated_at.format("%Y-%m-%d %H:%M"))?;
        writeln!(out)?;

        writeln!(out, "Resumen")?;
        writeln!(
            out,
            "{:<28}{:>10}{:>10}{:>10}",
            "Métrica", "Mínimo", "Promedio", "Máximo"
        )?;
        write_metric(out, "Temperatura promedio (°C)", &summary.temp_avg, 1)?;
        write_metric(out, "Humedad relativa (%)", &summary.hr_avg, 1)?;
        write_metric(out, "CO₂ (ppm)", &summary.co2_mean, 0)?;
        writeln!(out)?;

        writeln!(out, "Promedios diarios")?;
        writeln!(
            out,
            "{:<12}{:>12}{:>10}{:>12}",
            "Fecha", "Temp (°C)", "HR (%)", "CO₂ (ppm)"
        )?;
        for day in &self.days {
            writeln!(
                out,
                "{:<12}{:>12.1}{:>10.1}{:>12.0}",
                day.date.format("%Y-%m-%d").to_string(),
                day.temp_avg,
                day.hr_avg,
                day.co2_mean
            )?;
        }

        Ok(())
    }
}

fn write_metric(
    out: &mut String,
    label: &str,
    metric: &MetricSummary,
    decimals: usize,
) -> std::fmt::Result {
    writeln!(
        out,
        "{:<28}{:>10.prec$}{:>10.prec$}{:>10.prec$}",
        label,
        metric.min,
        metric.mean,
        metric.max,
        prec = decimals
    )
}
