//! The dashboard pipeline: filters the session dataset, derives indicators,
//! and assembles the page a browser shell renders. Filter changes simply
//! re-run this pipeline; there is no state machine.

use crate::market::charts::{builders, ChartSpec};
use crate::market::domain::{Sector, YearRange};
use crate::market::indicators::{
    fgts_impact, DataValidationError, MortgageIndicators, SectorIndicators,
};
use crate::market::providers::MarketDataset;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    Overview,
    Informality,
    EmploymentComposition,
    InformalFgtsImpact,
    MortgageRates,
}

impl DashboardView {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Overview,
            Self::Informality,
            Self::EmploymentComposition,
            Self::InformalFgtsImpact,
            Self::MortgageRates,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Informality => "Informality Analysis",
            Self::EmploymentComposition => "Employment Composition",
            Self::InformalFgtsImpact => "Informal/PJ Growth + FGTS",
            Self::MortgageRates => "Mortgage Financing Rates",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Informality => "informality",
            Self::EmploymentComposition => "composition",
            Self::InformalFgtsImpact => "informal_fgts",
            Self::MortgageRates => "mortgage_rates",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|view| view.slug() == value.trim())
    }
}

/// User-selected filters for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardRequest {
    pub view: DashboardView,
    pub years: YearRange,
    /// May be empty; charts then carry no sector traces.
    pub sectors: Vec<Sector>,
}

/// Headline figure shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

/// Everything the browser shell needs to render one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPage {
    pub view: DashboardView,
    pub view_label: &'static str,
    pub years: YearRange,
    pub sectors: Vec<Sector>,
    pub cards: Vec<MetricCard>,
    pub charts: Vec<ChartSpec>,
    pub notes: Vec<String>,
}

pub fn build_page(
    dataset: &MarketDataset,
    request: &DashboardRequest,
) -> Result<DashboardPage, DataValidationError> {
    let by_sector = derive_sector_indicators(dataset, request.years)?;
    let selected: Vec<&SectorIndicators> = Sector::ordered()
        .into_iter()
        .filter(|sector| request.sectors.contains(sector))
        .map(|sector| &by_sector[&sector])
        .collect();

    let mut cards = Vec::new();
    let mut charts = Vec::new();
    let mut notes = Vec::new();

    match request.view {
        DashboardView::Overview => {
            for sector in Sector::ordered() {
                let latest = by_sector[&sector].latest();
                cards.push(MetricCard {
                    label: format!("Employed ({})", sector.label()),
                    value: format!("{:.1}M", latest.employed_millions),
                });
            }
            for sector in Sector::ordered() {
                let latest = by_sector[&sector].latest();
                cards.push(MetricCard {
                    label: format!("Informality ({})", sector.label()),
                    value: format!("{:.1}%", latest.informality_rate_pct),
                });
            }
            charts.push(builders::overview_chart(&selected));
        }
        DashboardView::Informality => {
            charts.push(builders::informality_chart(&selected));
        }
        DashboardView::EmploymentComposition => {
            charts.extend(builders::composition_charts(&selected));
        }
        DashboardView::InformalFgtsImpact => {
            // The FGTS analysis tracks construction regardless of the sector
            // toggles; real-estate informality barely moves the fund.
            let construction = &by_sector[&Sector::Construction];
            let fgts = dataset.fgts.as_deref();
            charts.push(builders::informal_fgts_chart(construction, fgts));

            notes.push(
                "Self-employed and informal workers do not contribute to the FGTS, so growth \
                 in PJ/informal hiring erodes the fund that finances social housing and \
                 infrastructure."
                    .to_string(),
            );

            let impact = fgts_impact(construction, fgts.unwrap_or(&[]));
            cards.push(MetricCard {
                label: "Informal/PJ Workforce (Construction)".to_string(),
                value: format!("{:.1}M", impact.latest_informal_millions),
            });
            cards.push(MetricCard {
                label: "Estimated FGTS Shortfall".to_string(),
                value: format!("R$ {:.1} bn/yr", impact.estimated_annual_loss_bn),
            });
            if let Some(correlation) = impact.correlation {
                notes.push(format!(
                    "Correlation between the informal/PJ workforce and FGTS collection: {:.2}. \
                     Each additional million informal workers represents roughly R$ 1.2 bn per \
                     year in foregone contributions.",
                    correlation
                ));
            } else {
                notes.push(
                    "FGTS collection figures are unavailable for the selected period, so no \
                     correlation is reported."
                        .to_string(),
                );
            }
        }
        DashboardView::MortgageRates => {
            let mortgage = MortgageIndicators::from_series(&dataset.mortgage, request.years)?;
            cards.push(MetricCard {
                label: "Current Rate".to_string(),
                value: format!("{:.2}%", mortgage.summary.latest_pct),
            });
            cards.push(MetricCard {
                label: "Period Mean".to_string(),
                value: format!("{:.2}%", mortgage.summary.period_mean_pct),
            });
            cards.push(MetricCard {
                label: "Period Max".to_string(),
                value: format!("{:.2}%", mortgage.summary.period_max_pct),
            });
            notes.push(
                "Interest rates drive the health of the real-estate sector: expensive financing \
                 curbs demand for homes and ripples through the construction supply chain."
                    .to_string(),
            );
            notes.push(format!(
                "At {:.2}% per month, a R$ 500k mortgage starts at roughly R$ {:.0} in monthly \
                 interest. Studies suggest each percentage point of increase cuts demand for \
                 new homes by 5-7%.",
                mortgage.summary.latest_pct,
                500_000.0 * mortgage.summary.latest_pct / 100.0
            ));
            charts.push(builders::mortgage_chart(&mortgage));
        }
    }

    Ok(DashboardPage {
        view: request.view,
        view_label: request.view.label(),
        years: request.years,
        sectors: request.sectors.clone(),
        cards,
        charts,
        notes,
    })
}

fn derive_sector_indicators(
    dataset: &MarketDataset,
    years: YearRange,
) -> Result<BTreeMap<Sector, SectorIndicators>, DataValidationError> {
    let mut by_sector = BTreeMap::new();
    for sector in Sector::ordered() {
        let series = dataset
            .employment(sector)
            .ok_or(DataValidationError::MissingSector(sector.label()))?;
        let indicators = SectorIndicators::from_series(&series.clipped(years))?;
        by_sector.insert(sector, indicators);
    }
    Ok(by_sector)
}

/// One row of the combined CSV download, both sectors joined on year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportRecord {
    pub year: i32,
    pub construction_employed_millions: f64,
    pub construction_self_employed_millions: f64,
    pub construction_with_contract_millions: f64,
    pub construction_without_contract_millions: f64,
    pub construction_formal_balance_thousands: f64,
    pub construction_informality_rate_pct: f64,
    pub real_estate_employed_millions: f64,
    pub real_estate_self_employed_millions: f64,
    pub real_estate_with_contract_millions: f64,
    pub real_estate_without_contract_millions: f64,
    pub real_estate_formal_balance_thousands: f64,
    pub real_estate_informality_rate_pct: f64,
}

pub fn export_records(
    dataset: &MarketDataset,
    years: YearRange,
) -> Result<Vec<ExportRecord>, DataValidationError> {
    let by_sector = derive_sector_indicators(dataset, years)?;
    let construction = &by_sector[&Sector::Construction];
    let real_estate = &by_sector[&Sector::RealEstate];

    let records = construction
        .rows
        .iter()
        .filter_map(|left| {
            real_estate
                .rows
                .iter()
                .find(|right| right.year == left.year)
                .map(|right| ExportRecord {
                    year: left.year,
                    construction_employed_millions: left.employed_millions,
                    construction_self_employed_millions: left.self_employed_millions,
                    construction_with_contract_millions: left.with_contract_millions,
                    construction_without_contract_millions: left.without_contract_millions,
                    construction_formal_balance_thousands: left.formal_balance_thousands,
                    construction_informality_rate_pct: left.informality_rate_pct,
                    real_estate_employed_millions: right.employed_millions,
                    real_estate_self_employed_millions: right.self_employed_millions,
                    real_estate_with_contract_millions: right.with_contract_millions,
                    real_estate_without_contract_millions: right.without_contract_millions,
                    real_estate_formal_balance_thousands: right.formal_balance_thousands,
                    real_estate_informality_rate_pct: right.informality_rate_pct,
                })
        })
        .collect();

    Ok(records)
}
