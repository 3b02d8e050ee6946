use crate::domain::chart::{ChartLayout, SeriesLayout, Variant};
use crate::domain::display::DisplayConstants;
use crate::domain::series::SeriesKind;
use serde::Deserialize;

pub const DEFAULT_SOURCE_URL: &str = "https://raw.githubusercontent.com/microsoft/quicreach/data/data.csv";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub source: SourceSettings,
    #[serde(default)]
    pub display: DisplayConstants,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    pub url: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    pub canvas: String,
    pub title: String,
    #[serde(default)]
    pub stacked: bool,
    #[serde(default = "default_truncate")]
    pub truncate: bool,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeriesConfig {
    pub kind: SeriesKind,
    pub label: Option<String>,
    pub color: String,
}

fn default_truncate() -> bool {
    true
}

impl DashboardConfig {
    /// Explicit `[[charts]]` tables win over the built-in variant
    pub fn layouts(&self) -> Vec<ChartLayout> {
        if self.charts.is_empty() {
            return ChartLayout::variant(self.variant);
        }

        self.charts.iter().map(ChartConfig::to_layout).collect()
    }
}

impl ChartConfig {
    fn to_layout(&self) -> ChartLayout {
        ChartLayout {
            canvas: self.canvas.clone(),
            title: self.title.clone(),
            stacked: self.stacked,
            truncate: self.truncate,
            series: self
                .series
                .iter()
                .map(|s| SeriesLayout {
                    kind: s.kind,
                    label: s
                        .label
                        .clone()
                        .unwrap_or_else(|| s.kind.default_label().to_string()),
                    color: s.color.clone(),
                })
                .collect(),
        }
    }
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.bind", "0.0.0.0:8080")?
        .set_default("source.url", DEFAULT_SOURCE_URL)?)
}

/// Defaults, then `config/dashboard.*` if present, then `REACH__*` variables
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(config::Environment::with_prefix("REACH").separator("__"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
