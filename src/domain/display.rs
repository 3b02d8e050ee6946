// Display tuning constants and their per-request query overrides
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DisplayError {
    #[error("invalid value {value:?} for `{param}`")]
    InvalidValue { param: &'static str, value: String },
}

/// Rendering parameters for one chart build. `max_count == 0` disables
/// trailing-window truncation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DisplayConstants {
    #[serde(default = "default_max_count")]
    pub max_count: usize,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(default = "default_point_radius")]
    pub point_radius: f64,
}

fn default_max_count() -> usize {
    50
}

fn default_line_width() -> f64 {
    2.0
}

fn default_point_radius() -> f64 {
    3.0
}

impl Default for DisplayConstants {
    fn default() -> Self {
        Self {
            max_count: default_max_count(),
            line_width: default_line_width(),
            point_radius: default_point_radius(),
        }
    }
}

/// Raw `count`, `width` and `radius` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayOverrides {
    pub count: Option<String>,
    pub width: Option<String>,
    pub radius: Option<String>,
}

impl DisplayConstants {
    /// Compose these defaults with the request overrides.
    ///
    /// Every override is applied independently; values that fail to parse are
    /// returned alongside so the caller can report them, and the default stays.
    pub fn with_overrides(self, overrides: &DisplayOverrides) -> (Self, Vec<DisplayError>) {
        let mut display = self;
        let mut errors = Vec::new();

        if let Some(raw) = non_empty(&overrides.count) {
            match raw.trim().parse::<usize>() {
                Ok(count) => display.max_count = count,
                Err(_) => errors.push(invalid("count", raw)),
            }
        }

        if let Some(raw) = non_empty(&overrides.width) {
            match parse_non_negative(raw) {
                Some(width) => display.line_width = width,
                None => errors.push(invalid("width", raw)),
            }
        }

        if let Some(raw) = non_empty(&overrides.radius) {
            match parse_non_negative(raw) {
                Some(radius) => display.point_radius = radius,
                None => errors.push(invalid("radius", raw)),
            }
        }

        (display, errors)
    }
}

// An empty parameter counts as absent, like `?count=`
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_non_negative(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn invalid(param: &'static str, raw: &str) -> DisplayError {
    DisplayError::InvalidValue {
        param,
        value: raw.to_string(),
    }
}
