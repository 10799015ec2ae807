use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Construction,
    RealEstate,
}

impl Sector {
    pub const fn ordered() -> [Self; 2] {
        [Self::Construction, Self::RealEstate]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Construction => "Construction",
            Self::RealEstate => "Real Estate Activities",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Construction => "construction",
            Self::RealEstate => "real_estate",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "construction" => Some(Self::Construction),
            "real_estate" => Some(Self::RealEstate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    EmployedTotal,
    SelfEmployed,
    WithContract,
    WithoutContract,
    FormalBalance,
    InformalityRate,
    MortgageRate,
    FgtsCollection,
}

impl Metric {
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmployedTotal => "Employed Total (millions)",
            Self::SelfEmployed => "Self-Employed (millions)",
            Self::WithContract => "Employees with Formal Contract (millions)",
            Self::WithoutContract => "Employees without Formal Contract (millions)",
            Self::FormalBalance => "Formal Hiring Balance (thousands)",
            Self::InformalityRate => "Sector Informality Rate (%)",
            Self::MortgageRate => "Mortgage Rate (% p.m.)",
            Self::FgtsCollection => "FGTS Gross Collection (R$ bn)",
        }
    }
}

/// A single observation as returned by a provider. Immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub sector: Sector,
    pub metric: Metric,
    pub value: f64,
}

/// Observations for one (sector, metric) pair.
///
/// Dates are monotonically non-decreasing: the constructor sorts and no
/// mutating accessor is exposed, so the ordering cannot be broken afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    sector: Sector,
    metric: Metric,
    points: Vec<TimeSeriesPoint>,
}

impl Series {
    pub fn from_observations(
        sector: Sector,
        metric: Metric,
        observations: Vec<(NaiveDate, f64)>,
    ) -> Self {
        let mut points: Vec<TimeSeriesPoint> = observations
            .into_iter()
            .map(|(date, value)| TimeSeriesPoint {
                date,
                sector,
                metric,
                value,
            })
            .collect();
        points.sort_by_key(|point| point.date);
        Self {
            sector,
            metric,
            points,
        }
    }

    pub const fn sector(&self) -> Sector {
        self.sector
    }

    pub const fn metric(&self) -> Metric {
        self.metric
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn latest(&self) -> Option<&TimeSeriesPoint> {
        self.points.last()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.value)
    }

    /// Keeps only the observations whose date falls inside `range` (inclusive
    /// on both ends).
    pub fn clipped(&self, range: YearRange) -> Self {
        let points = self
            .points
            .iter()
            .copied()
            .filter(|point| range.contains_date(point.date))
            .collect();
        Self {
            sector: self.sector,
            metric: self.metric,
            points,
        }
    }
}

/// Inclusive year filter selected in the dashboard sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    from: i32,
    to: i32,
}

impl YearRange {
    pub fn new(from: i32, to: i32) -> Result<Self, DomainError> {
        if from > to {
            return Err(DomainError::InvalidYearRange { from, to });
        }
        Ok(Self { from, to })
    }

    pub const fn from_year(&self) -> i32 {
        self.from
    }

    pub const fn to_year(&self) -> i32 {
        self.to
    }

    pub const fn contains(&self, year: i32) -> bool {
        year >= self.from && year <= self.to
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.year())
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.from..=self.to
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid year range: {from} must not be after {to}")]
    InvalidYearRange { from: i32, to: i32 },
}
