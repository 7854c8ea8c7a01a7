//! Argument parsing and output formatting for the CLI.

use std::path::Path;

use serde::Serialize;

use automate_core::config::AutomateConfig;
use automate_core::geometry::{Rect, Vector};
use automate_core::reveal::RevealPlan;

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Outcome of `automate simulate`.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub revealed: bool,
    pub error: Option<String>,
    pub swipes: usize,
    pub scroll_offset: f64,
    pub frame: Rect,
}

/// Parses `x,y,width,height` into a [`Rect`].
pub fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in {s:?}: {e}"))?;
    match parts.as_slice() {
        [x, y, width, height] if *width >= 0.0 && *height >= 0.0 => Ok(Rect::new(*x, *y, *width, *height)),
        [_, _, _, _] => Err(format!("negative size in {s:?}")),
        _ => Err(format!("expected x,y,width,height, got {s:?}")),
    }
}

fn swipe(pair: &(Vector, Vector)) -> String {
    format!("{:.4},{:.4} -> {:.4},{:.4}", pair.0.dx, pair.0.dy, pair.1.dx, pair.1.dy)
}

pub fn plan(plan: &RevealPlan, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(plan).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")),
        OutputFormat::Text => format!(
            "container: {}\nregion:    {}\ndown:      {}\nup:        {}",
            plan.container,
            plan.region,
            swipe(&plan.down),
            swipe(&plan.up)
        ),
    }
}

pub fn simulation(report: &SimulationReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(report).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")),
        OutputFormat::Text => {
            let status = match &report.error {
                None => "revealed".to_string(),
                Some(error) => error.clone(),
            };
            format!(
                "{status}\nswipes: {}\noffset: {}\nframe:  {}",
                report.swipes, report.scroll_offset, report.frame
            )
        }
    }
}

pub fn config(config: &AutomateConfig, path: &Path, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::json!({
            "path": path,
            "config": config,
        })
        .to_string(),
        OutputFormat::Text => format!(
            "# {}\nswipe_length = {}\npress_duration_secs = {}\navoid_keyboard = {}\nframe_tolerance = {}",
            path.display(),
            config.swipe_length,
            config.press_duration_secs,
            config.avoid_keyboard,
            config.frame_tolerance
        ),
    }
}
