//! JSON input and output for layout passes
//!
//! Requests use the camelCase field names hosts already send; outputs are
//! the serde form of [`LayoutOutcome`].

mod request;

use crate::error::LayoutResult;
use crate::layout::LayoutOutcome;
use crate::types::LayoutInput;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use request::RawRequest;

/// Parse a JSON layout request.
pub fn parse_layout_request(json: &str) -> LayoutResult<LayoutInput> {
    let raw: RawRequest = serde_json::from_str(json)?;
    raw.into_input()
}

/// Read and parse a layout request file.
pub fn read_layout_request<P: AsRef<Path>>(path: P) -> Result<LayoutInput> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout request {}", path.display()))?;
    let input = parse_layout_request(&json)
        .with_context(|| format!("Invalid layout request {}", path.display()))?;
    log::debug!(
        "Loaded {} regions, {} groups, {} point events from {}",
        input.regions.len(),
        input.groups.len(),
        input.point_events.len(),
        path.display()
    );
    Ok(input)
}

/// Serialise a pass result. Ready outputs carry `"status": "ready"` next to
/// the layout fields; an empty view is written as `"status": "noData"`.
pub fn write_layout_output<W: Write>(writer: W, outcome: &LayoutOutcome, pretty: bool) -> LayoutResult<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, outcome)?;
    } else {
        serde_json::to_writer(writer, outcome)?;
    }
    Ok(())
}

pub fn layout_output_to_string(outcome: &LayoutOutcome, pretty: bool) -> LayoutResult<String> {
    let mut buf = Vec::new();
    write_layout_output(&mut buf, outcome, pretty)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
