use crate::model::{ChartData, ChartSpec, ProviderError};
use std::ops::RangeInclusive;

pub const KEY_FINDINGS_RANGE: RangeInclusive<usize> = 3..=5;
pub const CHARTS_RANGE: RangeInclusive<usize> = 1..=8;

/// Rejects charts whose series cannot be rendered as-is.
pub fn validate_chart_data(data: &ChartData) -> Result<(), ProviderError> {
    for (index, chart) in data.charts.iter().enumerate() {
        validate_chart(chart).map_err(|reason| {
            ProviderError::SchemaViolation(format!("chart {} ({}): {}", index, chart.title, reason))
        })?;
    }
    Ok(())
}

fn validate_chart(chart: &ChartSpec) -> Result<(), String> {
    if chart.labels.len() != chart.data.len() {
        return Err(format!(
            "{} labels but {} data points",
            chart.labels.len(),
            chart.data.len()
        ));
    }
    if let Some(value) = chart.data.iter().find(|v| !v.is_finite()) {
        return Err(format!("non-finite data point {}", value));
    }
    for (name, colors) in [
        ("backgroundColor", &chart.background_color),
        ("borderColor", &chart.border_color),
    ] {
        if let Some(colors) = colors {
            // A single colour applies to the whole series.
            if colors.len() != 1 && colors.len() != chart.labels.len() {
                return Err(format!(
                    "{} has {} entries for {} labels",
                    name,
                    colors.len(),
                    chart.labels.len()
                ));
            }
        }
    }
    Ok(())
}

/// Soft checks on element counts. These are logged, never enforced.
pub fn count_warnings(data: &ChartData) -> Vec<String> {
    let mut warnings = Vec::new();
    if !KEY_FINDINGS_RANGE.contains(&data.key_findings.len()) {
        warnings.push(format!("expected 3-5 key findings, got {}", data.key_findings.len()));
    }
    if !CHARTS_RANGE.contains(&data.charts.len()) {
        warnings.push(format!("expected 1-8 charts, got {}", data.charts.len()));
    }
    warnings
}
