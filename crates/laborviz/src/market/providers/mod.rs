pub mod bcb;
pub mod fgts;
pub mod ibge;

use crate::config::ProviderConfig;
use crate::market::domain::{Sector, Series, YearRange};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::warn;

pub use bcb::BcbClient;
pub use fgts::FgtsYear;
pub use ibge::IbgeClient;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Network(String),
    #[error("provider request timed out")]
    Timeout,
    #[error("provider returned HTTP status {status}")]
    Status { status: u16 },
    #[error("malformed provider response: {0}")]
    Malformed(String),
    #[error("provider response is missing the series for {0}")]
    MissingSeries(&'static str),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Everything fetched for one dashboard session. Rebuilt on refresh, never
/// persisted.
#[derive(Debug, Clone)]
pub struct MarketDataset {
    /// Annual employed totals per sector (PNAD Contínua).
    pub employment: BTreeMap<Sector, Series>,
    /// Monthly mortgage average rate (Banco Central SGS).
    pub mortgage: Series,
    /// Optional bundled FGTS collection figures; absence degrades the FGTS
    /// view instead of failing the page.
    pub fgts: Option<Vec<FgtsYear>>,
}

impl MarketDataset {
    pub fn employment(&self, sector: Sector) -> Option<&Series> {
        self.employment.get(&sector)
    }
}

/// Seam between the dashboard pipeline and the upstream statistical APIs.
/// The HTTP implementation talks to IBGE and Banco Central; tests substitute
/// fixtures.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn fetch(&self, years: YearRange) -> Result<MarketDataset, ProviderError>;
}

/// Live provider backed by the public IBGE and Banco Central APIs.
pub struct HttpMarketDataProvider {
    ibge: IbgeClient,
    bcb: BcbClient,
}

impl HttpMarketDataProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ProviderError::Network(err.to_string()))?;

        Ok(Self {
            ibge: IbgeClient::new(http.clone(), config.ibge_base_url.clone()),
            bcb: BcbClient::new(http, config.bcb_base_url.clone()),
        })
    }
}

#[async_trait]
impl MarketDataProvider for HttpMarketDataProvider {
    async fn fetch(&self, years: YearRange) -> Result<MarketDataset, ProviderError> {
        let employment = self.ibge.annual_employment(years).await?;
        let mortgage = self.bcb.mortgage_rates(years).await?;
        let fgts = match fgts::bundled() {
            Ok(rows) => Some(rows),
            Err(err) => {
                warn!(%err, "bundled FGTS dataset unreadable, FGTS view degraded");
                None
            }
        };

        Ok(MarketDataset {
            employment,
            mortgage,
            fgts,
        })
    }
}
