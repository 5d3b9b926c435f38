//! Embedded Jinja templates for user-facing notification text.
//!
//! Templates live under `templates/` at the crate root and are compiled into
//! the binary, so rendering never depends on the working directory.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const EMBEDDED_TEMPLATES: &[(&str, &str)] = &[
    (
        "report_status/title.jinja",
        include_str!("../../templates/report_status/title.jinja"),
    ),
    (
        "report_status/Pending.jinja",
        include_str!("../../templates/report_status/Pending.jinja"),
    ),
    (
        "report_status/Verified.jinja",
        include_str!("../../templates/report_status/Verified.jinja"),
    ),
    (
        "report_status/Collected.jinja",
        include_str!("../../templates/report_status/Collected.jinja"),
    ),
    (
        "report_status/Cancelled.jinja",
        include_str!("../../templates/report_status/Cancelled.jinja"),
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),

    #[error("Template '{0}' rendered empty")]
    Empty(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();
    for &(name, source) in EMBEDDED_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }
    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template; the result is trimmed and never empty
pub fn render_template(name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(name)
        .map_err(|_| TemplateError::NotFound(name.to_string()))?;

    let rendered = template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))?;

    let trimmed = rendered.trim();
    if trimmed.is_empty() {
        return Err(TemplateError::Empty(name.to_string()));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_all_embedded_templates_load() {
        for &(name, _) in EMBEDDED_TEMPLATES {
            assert!(get_environment().get_template(name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_missing_template() {
        let result = render_template("nope.jinja", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }

    #[test]
    fn test_render_title() {
        let title = render_template("report_status/title.jinja", context! { status => "Verified" })
            .unwrap();
        assert_eq!(title, "Report verified");
    }
}
