use crate::error::Result;
use crate::report::ScanReport;

/// Render the scan report as a JSON document.
pub fn render(report: &ScanReport) -> Result<String> {
    let json = serde_json::to_string_pretty(report)?;
    Ok(json)
}
