//! Human-readable rendering of a verification report.

use std::fmt::{self, Write};

use perimeter::{AttributeKeys, FeatureCollection, MatchKind, VerificationReport};

/// Where each failing point actually lies, by label
pub type Locations = Vec<(String, Vec<usize>)>;

/// Render the report as status lines, one per point
pub fn render_text(
    report: &VerificationReport,
    collection: &FeatureCollection,
    keys: &AttributeKeys,
    locations: Option<&Locations>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let name = report.feature_name.as_deref().unwrap_or("<unnamed>");

    writeln!(out, "--- Checking {} Boundary ---", name)?;
    if let MatchKind::Relaxed { found_area } = &report.match_kind {
        writeln!(
            out,
            "! Found {} in {} but not in the requested area",
            name,
            found_area.as_deref().unwrap_or("<unknown area>")
        )?;
    }

    for verdict in &report.verdicts {
        let mark = if verdict.contained { "✅" } else { "❌" };
        writeln!(
            out,
            "{} {}: {} (Point: [{}, {}])",
            mark, verdict.label, verdict.contained, verdict.lng, verdict.lat
        )?;
        if let Some(distance) = verdict.distance_to_boundary {
            writeln!(out, "   Distance to boundary: {} degrees", distance)?;
        }
        if let Some(found) = locations
            .and_then(|l| l.iter().find(|(label, _)| *label == verdict.label))
            .map(|(_, found)| found)
        {
            let names: Vec<String> = found
                .iter()
                .filter_map(|&i| collection.get(i))
                .map(|f| match f.area(keys) {
                    Some(area) => format!("{} ({})", f.describe(keys), area),
                    None => f.describe(keys),
                })
                .collect();
            if names.is_empty() {
                writeln!(out, "   Not inside any feature")?;
            } else {
                writeln!(out, "   Actually inside: {}", names.join(", "))?;
            }
        }
    }

    if report.all_contained {
        writeln!(out, "\nAll coordinates are valid!")?;
    } else {
        writeln!(out, "\nSome coordinates are outside the boundary.")?;
    }

    Ok(out)
}
