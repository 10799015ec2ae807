//! One builder per dashboard view, mapping derived indicators to chart specs.

use super::{AxisSpec, ChartSeries, ChartSpec};
use crate::market::domain::Sector;
use crate::market::indicators::{MortgageIndicators, SectorIndicators};
use crate::market::providers::FgtsYear;

const fn employed_color(sector: Sector) -> &'static str {
    match sector {
        Sector::Construction => "#1f77b4",
        Sector::RealEstate => "#2ca02c",
    }
}

const fn informality_color(sector: Sector) -> &'static str {
    match sector {
        Sector::Construction => "#ff7f0e",
        Sector::RealEstate => "#d62728",
    }
}

fn year_labels(indicators: &SectorIndicators) -> Vec<String> {
    indicators.rows.iter().map(|row| row.year.to_string()).collect()
}

fn some_values(values: impl IntoIterator<Item = f64>) -> Vec<Option<f64>> {
    values.into_iter().map(Some).collect()
}

/// Grouped employed-total bars with informality lines on the secondary axis.
pub fn overview_chart(indicators: &[&SectorIndicators]) -> ChartSpec {
    let mut series = Vec::new();
    for sector_indicators in indicators {
        let sector = sector_indicators.sector;
        let x = year_labels(sector_indicators);

        series.push(
            ChartSeries::bar(
                format!("Employed — {}", sector.label()),
                x.clone(),
                some_values(
                    sector_indicators
                        .rows
                        .iter()
                        .map(|row| row.employed_millions),
                ),
            )
            .colored(employed_color(sector)),
        );
        series.push(
            ChartSeries::line(
                format!("Informality (%) — {}", sector.label()),
                x,
                some_values(
                    sector_indicators
                        .rows
                        .iter()
                        .map(|row| row.informality_rate_pct),
                ),
            )
            .on_secondary()
            .colored(informality_color(sector)),
        );
    }

    ChartSpec {
        id: "overview",
        title: "Employment and Informality Trends".to_string(),
        x_axis: AxisSpec::titled("Year"),
        y_axis: AxisSpec::titled("Employed Total (millions)"),
        secondary_y_axis: Some(AxisSpec::ranged("Informality Rate (%)", [0.0, 100.0])),
        stacked: false,
        series,
    }
}

/// Informality rate over time, one line per selected sector.
pub fn informality_chart(indicators: &[&SectorIndicators]) -> ChartSpec {
    let series = indicators
        .iter()
        .map(|sector_indicators| {
            let sector = sector_indicators.sector;
            ChartSeries::line(
                sector.label(),
                year_labels(sector_indicators),
                some_values(
                    sector_indicators
                        .rows
                        .iter()
                        .map(|row| row.informality_rate_pct),
                ),
            )
            .colored(informality_color(sector))
        })
        .collect();

    ChartSpec {
        id: "informality",
        title: "Sector Informality Rate Over Time".to_string(),
        x_axis: AxisSpec::titled("Year"),
        y_axis: AxisSpec::titled("Informality Rate (%)"),
        secondary_y_axis: None,
        stacked: false,
        series,
    }
}

/// Stacked employment composition, one chart per selected sector.
pub fn composition_charts(indicators: &[&SectorIndicators]) -> Vec<ChartSpec> {
    indicators
        .iter()
        .map(|sector_indicators| {
            let sector = sector_indicators.sector;
            let x = year_labels(sector_indicators);
            let rows = &sector_indicators.rows;

            ChartSpec {
                id: match sector {
                    Sector::Construction => "composition_construction",
                    Sector::RealEstate => "composition_real_estate",
                },
                title: format!("Employment Composition — {}", sector.label()),
                x_axis: AxisSpec::titled("Year"),
                y_axis: AxisSpec::titled("Workers (millions)"),
                secondary_y_axis: None,
                stacked: true,
                series: vec![
                    ChartSeries::bar(
                        "With Formal Contract",
                        x.clone(),
                        some_values(rows.iter().map(|row| row.with_contract_millions)),
                    )
                    .colored("#1f77b4"),
                    ChartSeries::bar(
                        "Without Formal Contract",
                        x.clone(),
                        some_values(rows.iter().map(|row| row.without_contract_millions)),
                    )
                    .colored("#ff7f0e"),
                    ChartSeries::bar(
                        "Self-Employed",
                        x,
                        some_values(rows.iter().map(|row| row.self_employed_millions)),
                    )
                    .colored("#2ca02c"),
                ],
            }
        })
        .collect()
}

/// Informal/PJ workforce bars with FGTS collection on the secondary axis.
/// The FGTS trace covers only the years of the (already filtered) workforce
/// rows and is omitted when the dataset is unavailable.
pub fn informal_fgts_chart(
    construction: &SectorIndicators,
    fgts: Option<&[FgtsYear]>,
) -> ChartSpec {
    let workforce = construction.informal_workforce();
    let mut series = vec![ChartSeries::bar(
        "Informal/PJ Workforce (millions)",
        workforce.iter().map(|(year, _)| year.to_string()).collect(),
        some_values(workforce.iter().map(|(_, value)| *value)),
    )
    .colored("#ff7f0e")];

    let in_window: Vec<&FgtsYear> = fgts
        .unwrap_or(&[])
        .iter()
        .filter(|entry| workforce.iter().any(|(year, _)| *year == entry.year))
        .collect();

    let mut secondary_y_axis = None;
    if !in_window.is_empty() {
        series.push(
            ChartSeries::line(
                "FGTS Gross Collection (R$ bn)",
                in_window.iter().map(|entry| entry.year.to_string()).collect(),
                some_values(in_window.iter().map(|entry| entry.gross_collection_bn)),
            )
            .on_secondary()
            .colored("#1f77b4"),
        );
        secondary_y_axis = Some(AxisSpec::titled("FGTS Gross Collection (R$ bn)"));
    }

    ChartSpec {
        id: "informal_fgts",
        title: "Informal/PJ Workforce Growth vs. FGTS Collection".to_string(),
        x_axis: AxisSpec::titled("Year"),
        y_axis: AxisSpec::titled("Informal/PJ Workforce (millions)"),
        secondary_y_axis,
        stacked: false,
        series,
    }
}

/// Raw mortgage rate, smoothed trend, and above-mean highlights.
pub fn mortgage_chart(mortgage: &MortgageIndicators) -> ChartSpec {
    let x: Vec<String> = mortgage
        .series
        .points()
        .iter()
        .map(|point| point.date.to_string())
        .collect();

    ChartSpec {
        id: "mortgage_rates",
        title: "Mortgage Financing Rate Over Time".to_string(),
        x_axis: AxisSpec::titled("Date"),
        y_axis: AxisSpec::titled("Monthly Rate (%)"),
        secondary_y_axis: None,
        stacked: false,
        series: vec![
            ChartSeries::line(
                "Rate (% p.m.)",
                x.clone(),
                some_values(mortgage.series.values()),
            )
            .colored("#888888"),
            ChartSeries::line("6-Month Trend", x, mortgage.trend.clone()).colored("#e377c2"),
            ChartSeries::markers(
                "Above Period Mean",
                mortgage
                    .above_mean
                    .iter()
                    .map(|point| point.date.to_string())
                    .collect(),
                some_values(mortgage.above_mean.iter().map(|point| point.value)),
            )
            .colored("#d62728"),
        ],
    }
}
