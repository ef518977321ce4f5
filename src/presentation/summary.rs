use crate::application::gate::GateDecision;
use crate::domain::model::{BoundingBox, FeatureCollection};
use colored::Colorize;
use std::fmt::Write;

/// Columns shown in the preview table.
pub const PREVIEW_COLUMNS: [&str; 6] = [
    "PARCEL_ADDR",
    "PRIMARY_OWNER",
    "SBL",
    "PRINT_KEY",
    "MAIL_CITY",
    "MAIL_ZIP",
];

/// Header block: zoom, filter and bounds of the current request.
pub fn format_request(zoom: u8, min_zoom: u8, filter: &str, bbox: Option<&BoundingBox>) -> String {
    let mut output = String::new();
    writeln!(output, "{}", "Loaded".bold().underline()).ok();
    writeln!(
        output,
        "Zoom: {} (min {})",
        zoom.to_string().bold(),
        min_zoom.to_string().bold()
    )
    .ok();
    writeln!(output, "  {}", filter.cyan()).ok();

    if let Some(b) = bbox {
        writeln!(output, "Bounds (W,S,E,N):").ok();
        writeln!(
            output,
            "  {:.5}, {:.5}, {:.5}, {:.5}",
            b.west, b.south, b.east, b.north
        )
        .ok();
    }
    output
}

pub fn format_skipped(decision: GateDecision) -> String {
    match decision.advice() {
        Some(text) if decision == GateDecision::ViewportTooLarge => {
            format!("{}\n", text.yellow())
        }
        Some(text) => format!("{}\n", text.blue()),
        None => String::new(),
    }
}

/// Feature count plus a preview of the first `rows` features.
pub fn format_collection(collection: &FeatureCollection, rows: usize) -> String {
    let mut output = String::new();
    writeln!(output, "Features: {}", collection.len().to_string().green().bold()).ok();

    if collection.is_empty() {
        writeln!(
            output,
            "{}",
            "No features found for current view + filters.".blue()
        )
        .ok();
        return output;
    }

    writeln!(output).ok();
    writeln!(output, "{}", "Preview".bold().underline()).ok();
    writeln!(output, "{}", PREVIEW_COLUMNS.join("\t").dimmed()).ok();
    for feature in collection.features.iter().take(rows) {
        let cells: Vec<String> = PREVIEW_COLUMNS
            .iter()
            .map(|c| feature.property_text(c).unwrap_or_default())
            .collect();
        writeln!(output, "{}", cells.join("\t")).ok();
    }
    if collection.len() > rows {
        writeln!(
            output,
            "{}",
            format!("… {} more", collection.len() - rows).dimmed()
        )
        .ok();
    }
    output
}
