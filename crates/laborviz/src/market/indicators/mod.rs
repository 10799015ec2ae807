//! Indicator derivation: turns raw provider series into the aggregates the
//! dashboard views consume. Pure and synchronous; same input, same output.

pub mod stats;

use crate::market::domain::{Metric, Sector, Series, TimeSeriesPoint, YearRange};
use crate::market::providers::FgtsYear;
use chrono::Datelike;
use serde::Serialize;

/// Window, in monthly observations, of the mortgage trend line.
pub const MORTGAGE_TREND_WINDOW: usize = 6;

/// Estimated FGTS contribution shortfall per million informal/self-employed
/// workers, in R$ bn per year.
pub const FGTS_LOSS_BN_PER_MILLION: f64 = 1.2;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DataValidationError {
    #[error("dataset is missing the employment series for {0}")]
    MissingSector(&'static str),
    #[error("expected an employed-total series for {0}")]
    WrongMetric(&'static str),
    #[error("no {0} observations in the selected period")]
    EmptyPeriod(&'static str),
}

/// One derived row of the sector table, in the units the published IBGE
/// tables use.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectorYearRow {
    pub year: i32,
    pub employed_millions: f64,
    pub self_employed_millions: f64,
    pub with_contract_millions: f64,
    pub without_contract_millions: f64,
    pub formal_balance_thousands: f64,
    pub informality_rate_pct: f64,
}

impl SectorYearRow {
    /// Self-employed plus employees without a formal contract.
    pub fn informal_workforce_millions(&self) -> f64 {
        round1(self.self_employed_millions + self.without_contract_millions)
    }
}

/// Derived annual indicators for one sector, recomputed on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorIndicators {
    pub sector: Sector,
    pub rows: Vec<SectorYearRow>,
}

impl SectorIndicators {
    /// Derives the sector table from an employed-total series.
    ///
    /// Composition shares, hiring balances, and the informality trend follow
    /// the published survey relationships: a fixed self-employment share per
    /// sector, a linear formal-balance model anchored at 2020, and a linear
    /// informality decline from the 2012 baseline. The contract decomposition
    /// is chosen so that self-employed plus without-contract workers match
    /// the informality rate.
    pub fn from_series(series: &Series) -> Result<Self, DataValidationError> {
        let sector = series.sector();
        if series.metric() != Metric::EmployedTotal {
            return Err(DataValidationError::WrongMetric(sector.label()));
        }
        if series.is_empty() {
            return Err(DataValidationError::EmptyPeriod(sector.label()));
        }

        let rows = series
            .points()
            .iter()
            .map(|point| derive_row(sector, point.date.year(), point.value))
            .collect();

        Ok(Self { sector, rows })
    }

    pub fn latest(&self) -> &SectorYearRow {
        self.rows.last().expect("constructor rejects empty series")
    }

    pub fn informal_workforce(&self) -> Vec<(i32, f64)> {
        self.rows
            .iter()
            .map(|row| (row.year, row.informal_workforce_millions()))
            .collect()
    }
}

fn derive_row(sector: Sector, year: i32, employed_millions: f64) -> SectorYearRow {
    let (self_share, balance, informality) = match sector {
        Sector::Construction => (
            0.25,
            (year - 2020) as f64 * 15.0 + 25.0,
            60.0 - (year - 2012) as f64 * 1.5,
        ),
        Sector::RealEstate => (
            0.15,
            (year - 2020) as f64 * 5.0 + 10.0,
            30.0 - (year - 2012) as f64 * 0.5,
        ),
    };

    let employed = round1(employed_millions);
    let self_employed = round1(employed * self_share);
    let informality_rate = round1(informality.clamp(0.0, 100.0));
    let informal_total = employed * informality_rate / 100.0;
    let without_contract = round1((informal_total - self_employed).max(0.0));
    let with_contract = round1((employed - self_employed - without_contract).max(0.0));

    SectorYearRow {
        year,
        employed_millions: employed,
        self_employed_millions: self_employed,
        with_contract_millions: with_contract,
        without_contract_millions: without_contract,
        formal_balance_thousands: round1(balance),
        informality_rate_pct: informality_rate,
    }
}

/// Relationship between informal employment growth and FGTS collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FgtsImpact {
    /// Pearson correlation over the overlapping years, when computable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<f64>,
    pub latest_informal_millions: f64,
    /// Contribution shortfall implied by the current informal workforce.
    pub estimated_annual_loss_bn: f64,
}

pub fn fgts_impact(construction: &SectorIndicators, fgts: &[FgtsYear]) -> FgtsImpact {
    let informal = construction.informal_workforce();

    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (year, workforce) in &informal {
        if let Some(entry) = fgts.iter().find(|entry| entry.year == *year) {
            xs.push(*workforce);
            ys.push(entry.gross_collection_bn);
        }
    }

    let latest_informal_millions = informal.last().map(|(_, value)| *value).unwrap_or(0.0);

    FgtsImpact {
        correlation: stats::pearson(&xs, &ys),
        latest_informal_millions,
        estimated_annual_loss_bn: round1(latest_informal_millions * FGTS_LOSS_BN_PER_MILLION),
    }
}

/// Headline statistics for the mortgage-rate view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MortgageSummary {
    pub latest_pct: f64,
    pub period_mean_pct: f64,
    pub period_max_pct: f64,
}

/// Mortgage-rate series restricted to the selected period, with its smoothed
/// trend and the observations sitting above the period mean.
#[derive(Debug, Clone, PartialEq)]
pub struct MortgageIndicators {
    pub series: Series,
    pub trend: Vec<Option<f64>>,
    pub above_mean: Vec<TimeSeriesPoint>,
    pub summary: MortgageSummary,
}

impl MortgageIndicators {
    pub fn from_series(series: &Series, years: YearRange) -> Result<Self, DataValidationError> {
        let clipped = series.clipped(years);
        if clipped.is_empty() {
            return Err(DataValidationError::EmptyPeriod("mortgage rate"));
        }

        let values: Vec<f64> = clipped.values().collect();
        let period_mean = stats::mean(&values).expect("non-empty period");
        let period_max = stats::max(&values).expect("non-empty period");
        let latest = clipped.latest().expect("non-empty period").value;

        let trend = stats::moving_average(&values, MORTGAGE_TREND_WINDOW);
        let above_mean = clipped
            .points()
            .iter()
            .copied()
            .filter(|point| point.value > period_mean)
            .collect();

        Ok(Self {
            series: clipped,
            trend,
            above_mean,
            summary: MortgageSummary {
                latest_pct: latest,
                period_mean_pct: period_mean,
                period_max_pct: period_max,
            },
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn employed_series(sector: Sector, values: &[(i32, f64)]) -> Series {
        Series::from_observations(
            sector,
            Metric::EmployedTotal,
            values
                .iter()
                .map(|(year, value)| {
                    (
                        NaiveDate::from_ymd_opt(*year, 1, 1).expect("valid date"),
                        *value,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn construction_rows_follow_published_relationships() {
        let series = employed_series(Sector::Construction, &[(2012, 7.9), (2022, 7.4)]);
        let indicators = SectorIndicators::from_series(&series).expect("derives");

        let first = indicators.rows[0];
        assert_eq!(first.year, 2012);
        assert_eq!(first.employed_millions, 7.9);
        assert_eq!(first.self_employed_millions, 2.0);
        assert_eq!(first.informality_rate_pct, 60.0);
        assert_eq!(first.formal_balance_thousands, -95.0);

        let last = indicators.latest();
        assert_eq!(last.informality_rate_pct, 45.0);
        assert_eq!(last.formal_balance_thousands, 55.0);
    }

    #[test]
    fn contract_decomposition_matches_the_informality_rate() {
        let series = employed_series(Sector::RealEstate, &[(2015, 1.0)]);
        let row = SectorIndicators::from_series(&series).expect("derives").rows[0];

        // Informal workforce should equal employed * rate within rounding.
        let informal = row.informal_workforce_millions();
        let expected = row.employed_millions * row.informality_rate_pct / 100.0;
        assert!((informal - expected).abs() <= 0.1);

        let total =
            row.with_contract_millions + row.without_contract_millions + row.self_employed_millions;
        assert!((total - row.employed_millions).abs() <= 0.1);
    }

    #[test]
    fn derivation_is_deterministic() {
        let series = employed_series(Sector::Construction, &[(2012, 7.9), (2020, 6.8)]);
        let first = SectorIndicators::from_series(&series).expect("derives");
        let second = SectorIndicators::from_series(&series).expect("derives");
        assert_eq!(first, second);
    }

    #[test]
    fn wrong_metric_is_rejected() {
        let series = Series::from_observations(
            Sector::Construction,
            Metric::MortgageRate,
            vec![(NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date"), 7.0)],
        );
        let error = SectorIndicators::from_series(&series).expect_err("wrong metric");
        assert_eq!(error, DataValidationError::WrongMetric("Construction"));
    }

    #[test]
    fn fgts_impact_correlates_overlapping_years() {
        let series = employed_series(
            Sector::Construction,
            &[(2012, 7.0), (2013, 7.4), (2014, 7.8), (2015, 8.2)],
        );
        let indicators = SectorIndicators::from_series(&series).expect("derives");
        let fgts: Vec<FgtsYear> = (2012..=2015)
            .map(|year| FgtsYear {
                year,
                gross_collection_bn: 80.0 + (year - 2012) as f64 * 7.0,
            })
            .collect();

        let impact = fgts_impact(&indicators, &fgts);
        assert!(impact.correlation.is_some());
        assert!(impact.latest_informal_millions > 0.0);
        assert_eq!(
            impact.estimated_annual_loss_bn,
            (impact.latest_informal_millions * FGTS_LOSS_BN_PER_MILLION * 10.0).round() / 10.0
        );
    }

    #[test]
    fn fgts_impact_without_overlap_has_no_correlation() {
        let series = employed_series(Sector::Construction, &[(2012, 7.0)]);
        let indicators = SectorIndicators::from_series(&series).expect("derives");
        let impact = fgts_impact(&indicators, &[]);
        assert_eq!(impact.correlation, None);
    }

    #[test]
    fn mortgage_indicators_flag_above_mean_observations() {
        let series = Series::from_observations(
            Sector::RealEstate,
            Metric::MortgageRate,
            (1..=10)
                .map(|month| {
                    (
                        NaiveDate::from_ymd_opt(2021, month, 1).expect("valid date"),
                        if month <= 5 { 6.0 } else { 8.0 },
                    )
                })
                .collect(),
        );

        let range = YearRange::new(2021, 2021).expect("valid range");
        let indicators = MortgageIndicators::from_series(&series, range).expect("derives");
        assert_eq!(indicators.summary.period_mean_pct, 7.0);
        assert_eq!(indicators.summary.period_max_pct, 8.0);
        assert_eq!(indicators.summary.latest_pct, 8.0);
        assert_eq!(indicators.above_mean.len(), 5);
        assert_eq!(indicators.trend.len(), 10);
        assert!(indicators.trend[..MORTGAGE_TREND_WINDOW - 1]
            .iter()
            .all(Option::is_none));
    }

    #[test]
    fn mortgage_indicators_reject_an_empty_period() {
        let series = Series::from_observations(
            Sector::RealEstate,
            Metric::MortgageRate,
            vec![(NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid date"), 7.0)],
        );
        let range = YearRange::new(2023, 2024).expect("valid range");
        let error = MortgageIndicators::from_series(&series, range).expect_err("empty period");
        assert_eq!(error, DataValidationError::EmptyPeriod("mortgage rate"));
    }
}
