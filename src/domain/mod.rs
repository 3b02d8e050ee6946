// Domain layer - Feed rows, series, chart layouts
pub mod chart;
pub mod display;
pub mod reach;
pub mod series;
