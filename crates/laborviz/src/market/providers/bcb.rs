//! Banco Central SGS client for mortgage financing rates.

use super::ProviderError;
use crate::market::domain::{Metric, Sector, Series, YearRange};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

/// SGS series: average rate on earmarked mortgage credit at market rates,
/// individuals, % per month.
const MORTGAGE_SERIES_ID: u32 = 25497;

pub struct BcbClient {
    http: Client,
    base_url: String,
}

impl BcbClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetches the monthly mortgage rate series restricted to `years`.
    pub async fn mortgage_rates(&self, years: YearRange) -> Result<Series, ProviderError> {
        let url = format!("{}/bcdata.sgs.{}/dados", self.base_url, MORTGAGE_SERIES_ID);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("formato", "json".to_string()),
                ("dataInicial", format!("01/01/{}", years.from_year())),
                ("dataFinal", format!("31/12/{}", years.to_year())),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        let payload: Vec<SgsObservation> = response
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        mortgage_series_from(payload)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SgsObservation {
    pub(crate) data: String,
    pub(crate) valor: String,
}

pub(crate) fn mortgage_series_from(rows: Vec<SgsObservation>) -> Result<Series, ProviderError> {
    let mut observations = Vec::with_capacity(rows.len());
    for row in rows {
        // SGS dates are day-first.
        let date = NaiveDate::parse_from_str(&row.data, "%d/%m/%Y")
            .map_err(|_| ProviderError::Malformed(format!("invalid SGS date '{}'", row.data)))?;
        if let Some(value) = parse_decimal(&row.valor) {
            observations.push((date, value));
        }
    }

    if observations.is_empty() {
        return Err(ProviderError::Malformed(
            "SGS response contained no usable observations".to_string(),
        ));
    }

    Ok(Series::from_observations(
        Sector::RealEstate,
        Metric::MortgageRate,
        observations,
    ))
}

/// SGS encodes values as strings; older exports use a comma decimal separator.
fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = trimmed.replace(',', ".");
    let value = normalized.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
