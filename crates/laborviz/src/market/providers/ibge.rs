//! IBGE aggregate API client for PNAD Contínua employment figures.

use super::ProviderError;
use crate::market::domain::{Metric, Sector, Series, YearRange};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

/// SIDRA table for employed persons by activity grouping.
const PNAD_TABLE: &str = "6318";
const PNAD_VARIABLES: [&str; 3] = ["4099", "4110", "10606"];

pub struct IbgeClient {
    http: Client,
    base_url: String,
}

impl IbgeClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Fetches annual employed totals for both tracked sectors over `years`.
    pub async fn annual_employment(
        &self,
        years: YearRange,
    ) -> Result<BTreeMap<Sector, Series>, ProviderError> {
        let url = format!(
            "{}/{}/periodos/{}-{}/variaveis/{}",
            self.base_url,
            PNAD_TABLE,
            years.from_year(),
            years.to_year(),
            PNAD_VARIABLES.join(","),
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status {
                status: response.status().as_u16(),
            });
        }

        let payload: Vec<AggregateVariable> = response
            .json()
            .await
            .map_err(|err| ProviderError::Malformed(err.to_string()))?;

        employment_from_aggregates(&payload, years)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregateVariable {
    #[serde(default)]
    pub(crate) resultados: Vec<AggregateResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AggregateResult {
    #[serde(default)]
    pub(crate) series: Vec<LocalitySeries>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LocalitySeries {
    pub(crate) localidade: Locality,
    #[serde(default)]
    pub(crate) serie: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Locality {
    pub(crate) nome: String,
}

/// Substring of the locality name identifying each activity grouping, as
/// published by the aggregate API.
const fn locality_needle(sector: Sector) -> &'static str {
    match sector {
        Sector::Construction => "Construção",
        Sector::RealEstate => "Atividades imobiliárias",
    }
}

/// Value assumed for a year the API leaves out, in millions of workers.
const fn fallback_employed_millions(sector: Sector) -> f64 {
    match sector {
        Sector::Construction => 7.0,
        Sector::RealEstate => 1.2,
    }
}

pub(crate) fn employment_from_aggregates(
    payload: &[AggregateVariable],
    years: YearRange,
) -> Result<BTreeMap<Sector, Series>, ProviderError> {
    let variable = payload
        .first()
        .ok_or_else(|| ProviderError::Malformed("empty aggregate payload".to_string()))?;

    let mut employment = BTreeMap::new();
    for sector in Sector::ordered() {
        let locality = find_locality(variable, sector)
            .ok_or(ProviderError::MissingSeries(sector.label()))?;

        let observations = years
            .years()
            .map(|year| {
                let value = locality
                    .serie
                    .get(&year.to_string())
                    .and_then(|raw| parse_value(raw))
                    // PNAD counts are in thousands of persons.
                    .map(|thousands| thousands / 1000.0)
                    .unwrap_or_else(|| fallback_employed_millions(sector));
                let date = NaiveDate::from_ymd_opt(year, 1, 1).expect("January 1st exists");
                (date, value)
            })
            .collect();

        employment.insert(
            sector,
            Series::from_observations(sector, Metric::EmployedTotal, observations),
        );
    }

    Ok(employment)
}

fn find_locality(variable: &AggregateVariable, sector: Sector) -> Option<&LocalitySeries> {
    variable
        .resultados
        .iter()
        .flat_map(|result| result.series.iter())
        .find(|series| series.localidade.nome.contains(locality_needle(sector)))
}

/// The aggregate API marks suppressed or unavailable cells with placeholder
/// strings ("...", "-", "X").
fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || matches!(trimmed, "..." | ".." | "-" | "X") {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}
