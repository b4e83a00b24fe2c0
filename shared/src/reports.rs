use chrono::NaiveDate;

use crate::payloads::ReportFormat;

/// Download name for a generated report, e.g. `tickets_report_2024-05-01.csv`.
pub fn report_filename(report_type: &str, format: ReportFormat, date: NaiveDate) -> String {
    let slug: String = report_type
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = if slug.is_empty() { "maintenance".to_string() } else { slug };
    format!("{}_report_{}.{}", slug, date.format("%Y-%m-%d"), format.extension())
}
