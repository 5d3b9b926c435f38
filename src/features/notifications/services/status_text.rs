use minijinja::context;

use crate::features::reports::models::{ReportStatus, WasteReport};
use crate::shared::templates::render_template;

const TITLE_TEMPLATE: &str = "report_status/title.jinja";

/// Title and message for a status-change notification.
///
/// Falls back to generic text when a template is missing or fails, so the
/// result is never empty.
pub fn status_change_text(report: &WasteReport, previous: ReportStatus) -> (String, String) {
    let ctx = context! {
        status => report.status.as_str(),
        previous_status => previous.as_str(),
        zone_name => &report.zone_name,
        place_name => &report.place_name,
        total_kg => round_kg(report.total_kg()),
        report_id => report.id.to_string(),
    };

    let title = render_template(TITLE_TEMPLATE, ctx.clone()).unwrap_or_else(|e| {
        tracing::warn!("Status title template unavailable: {}", e);
        "Report status updated".to_string()
    });

    let message_template = format!("report_status/{}.jinja", report.status);
    let message = render_template(&message_template, ctx).unwrap_or_else(|e| {
        tracing::warn!("Status message template unavailable: {}", e);
        fallback_message(report.status)
    });

    (title, message)
}

pub fn fallback_message(status: ReportStatus) -> String {
    format!("Your report status changed to {}", status)
}

fn round_kg(kg: f64) -> f64 {
    (kg * 100.0).round() / 100.0
}
