use crate::report::ScanReport;

/// Render the summary line plus a three-column results table.
pub fn render(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Scanned {} rules. Detections: {}\n",
        report.rule_count,
        report.detections()
    ));

    if report.matches.is_empty() {
        output.push_str("No YARA detections.\n");
        return output;
    }

    let target_name = report
        .target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| report.target.display().to_string());
    output.push_str(&format!("\nYARA results for {}\n\n", target_name));

    let rows: Vec<(String, String, String)> = report
        .matches
        .iter()
        .map(|m| (m.rule.clone(), m.tags_cell(), m.meta_cell()))
        .collect();

    let rule_width = rows
        .iter()
        .map(|(r, _, _)| r.len())
        .chain(std::iter::once("RULE".len()))
        .max()
        .unwrap_or(4);
    let tags_width = rows
        .iter()
        .map(|(_, t, _)| t.len())
        .chain(std::iter::once("TAGS".len()))
        .max()
        .unwrap_or(4);

    output.push_str(&format!(
        "{:<rule_width$}  {:<tags_width$}  META\n",
        "RULE", "TAGS"
    ));
    output.push_str(&format!(
        "{}\n",
        "-".repeat(rule_width + tags_width + 8)
    ));

    for (rule, tags, meta) in &rows {
        output.push_str(&format!(
            "{:<rule_width$}  {:<tags_width$}  {}\n",
            rule, tags, meta
        ));
    }

    output
}
