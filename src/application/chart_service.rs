// Chart service - fetch, parse, generate series and configure charts
use crate::application::reach_source::{ReachSource, SourceError};
use crate::domain::chart::{ChartLayout, ChartSpec};
use crate::domain::display::{DisplayConstants, DisplayOverrides};
use crate::domain::reach::{parse_rows, ReachSummary, RowRecord};
use crate::domain::series::{generate, Point, SeriesError};
use serde::Serialize;
use std::sync::Arc;

/// Everything the page needs for one render
#[derive(Debug, Clone, Serialize)]
pub struct ChartPage {
    pub summary: Option<ReachSummary>,
    pub charts: Vec<ChartSpec>,
}

#[derive(Clone)]
pub struct ChartService {
    source: Arc<dyn ReachSource>,
    layouts: Vec<ChartLayout>,
    display: DisplayConstants,
}

impl ChartService {
    pub fn new(source: Arc<dyn ReachSource>, layouts: Vec<ChartLayout>, display: DisplayConstants) -> Self {
        Self {
            source,
            layouts,
            display,
        }
    }

    pub fn layouts(&self) -> &[ChartLayout] {
        &self.layouts
    }

    /// Run the whole pipeline once. Only a feed failure is an error; charts
    /// whose series cannot be generated are left out.
    pub async fn build_page(&self, overrides: &DisplayOverrides) -> Result<ChartPage, SourceError> {
        let (display, errors) = self.display.with_overrides(overrides);
        for error in errors {
            tracing::warn!("Ignoring display override: {}", error);
        }

        let text = self.source.fetch_csv().await?;
        let rows = parse_rows(&text);

        Ok(self.build_charts(&rows, &display))
    }

    pub fn build_charts(&self, rows: &[RowRecord], display: &DisplayConstants) -> ChartPage {
        let summary = ReachSummary::from_latest(rows).unwrap_or_else(|e| {
            tracing::warn!("Could not summarize latest row: {}", e);
            None
        });

        let charts = self
            .layouts
            .iter()
            .filter_map(|layout| match Self::generate_series(layout, rows) {
                Ok(series) => Some(ChartSpec::build(layout, &series, display)),
                Err(e) => {
                    tracing::warn!("Skipping chart {}: {}", layout.canvas, e);
                    None
                }
            })
            .collect();

        ChartPage { summary, charts }
    }

    fn generate_series(layout: &ChartLayout, rows: &[RowRecord]) -> Result<Vec<Vec<Point>>, SeriesError> {
        layout
            .series
            .iter()
            .map(|series| generate(series.kind, rows))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::Variant;
    use async_trait::async_trait;

    struct StubSource {
        body: Option<String>,
    }

    #[async_trait]
    impl ReachSource for StubSource {
        async fn fetch_csv(&self) -> Result<String, SourceError> {
            self.body.clone().ok_or_else(|| SourceError::Status {
                url: "stub".to_string(),
                status: 404,
            })
        }
    }

    fn service(body: Option<&str>, variant: Variant) -> ChartService {
        ChartService::new(
            Arc::new(StubSource {
                body: body.map(str::to_string),
            }),
            ChartLayout::variant(variant),
            DisplayConstants::default(),
        )
    }

    fn feed(rows: usize) -> String {
        let mut text = String::from("UtcDateTime,Total,Reachable,TooMuch,MultiRtt,QuicV2\r\n");
        for day in 0..rows {
            text.push_str(&format!("2024-01-01T{:02}:00:00Z,100,{},2,3,{}\r\n", day % 24, 50 + day, day));
        }
        text
    }

    #[tokio::test]
    async fn test_full_variant_builds_three_charts() {
        let page = service(Some(&feed(60)), Variant::Full)
            .build_page(&DisplayOverrides::default())
            .await
            .unwrap();

        assert_eq!(page.charts.len(), 3);
        for chart in &page.charts {
            for dataset in &chart.config.data.datasets {
                assert_eq!(dataset.data.len(), 50);
            }
        }

        let summary = page.summary.unwrap();
        assert_eq!(summary.reachable, 109.0);
        assert_eq!(summary.total, 100.0);
    }

    #[tokio::test]
    async fn test_count_override_changes_window() {
        let overrides = DisplayOverrides {
            count: Some("5".to_string()),
            width: Some("wide".to_string()),
            radius: None,
        };
        let page = service(Some(&feed(20)), Variant::Full).build_page(&overrides).await.unwrap();

        let reachable = &page.charts[0].config.data.datasets[0];
        assert_eq!(reachable.data.len(), 5);
        assert_eq!(reachable.data.last().unwrap().y, 69.0);
        assert_eq!(reachable.border_width, 2.0);
    }

    #[tokio::test]
    async fn test_simple_variant_keeps_all_points() {
        let page = service(Some(&feed(60)), Variant::Simple)
            .build_page(&DisplayOverrides::default())
            .await
            .unwrap();

        assert_eq!(page.charts.len(), 1);
        assert_eq!(page.charts[0].config.data.datasets[0].data.len(), 60);
    }

    #[tokio::test]
    async fn test_chart_with_missing_column_is_skipped() {
        let text = "UtcDateTime,Total,Reachable,TooMuch,MultiRtt,Retry\n2024.01.01-00:00:00,10,8,1,1,0\n";
        let page = service(Some(text), Variant::Full)
            .build_page(&DisplayOverrides::default())
            .await
            .unwrap();

        let canvases: Vec<&str> = page.charts.iter().map(|c| c.canvas.as_str()).collect();
        assert_eq!(canvases, vec!["canvasReachable", "canvasReachBreakdown"]);
    }

    #[tokio::test]
    async fn test_source_failure_is_returned() {
        let result = service(None, Variant::Full)
            .build_page(&DisplayOverrides::default())
            .await;

        assert!(matches!(result, Err(SourceError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_empty_feed_renders_empty_charts() {
        let page = service(Some(""), Variant::Simple)
            .build_page(&DisplayOverrides::default())
            .await
            .unwrap();

        assert!(page.summary.is_none());
        assert_eq!(page.charts.len(), 1);
        assert!(page.charts[0].config.data.datasets[0].data.is_empty());
    }
}
