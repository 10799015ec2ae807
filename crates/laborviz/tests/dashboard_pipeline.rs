use chrono::NaiveDate;
use laborviz::market::dashboard::{build_page, DashboardRequest, DashboardView};
use laborviz::market::domain::{Metric, Sector, Series, YearRange};
use laborviz::market::providers::{FgtsYear, MarketDataset};
use std::collections::BTreeMap;

fn date(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid date")
}

fn fixture_dataset() -> MarketDataset {
    let mut employment = BTreeMap::new();
    employment.insert(
        Sector::Construction,
        Series::from_observations(
            Sector::Construction,
            Metric::EmployedTotal,
            (2012..=2024)
                .map(|year| (date(year, 1), 7.9 - (year - 2012) as f64 * 0.08))
                .collect(),
        ),
    );
    employment.insert(
        Sector::RealEstate,
        Series::from_observations(
            Sector::RealEstate,
            Metric::EmployedTotal,
            (2012..=2024)
                .map(|year| (date(year, 1), 0.9 + (year - 2012) as f64 * 0.02))
                .collect(),
        ),
    );

    let mortgage = Series::from_observations(
        Sector::RealEstate,
        Metric::MortgageRate,
        (2015..=2024)
            .flat_map(|year| (1..=12).map(move |month| (date(year, month), 7.5)))
            .collect(),
    );

    MarketDataset {
        employment,
        mortgage,
        fgts: Some(
            (2012..=2024)
                .map(|year| FgtsYear {
                    year,
                    gross_collection_bn: 79.6 + (year - 2012) as f64 * 8.3,
                })
                .collect(),
        ),
    }
}

fn request(view: DashboardView, from: i32, to: i32) -> DashboardRequest {
    DashboardRequest {
        view,
        years: YearRange::new(from, to).expect("valid range"),
        sectors: Sector::ordered().to_vec(),
    }
}

#[test]
fn every_view_builds_from_the_same_session_dataset() {
    let dataset = fixture_dataset();
    for view in DashboardView::ordered() {
        let page = build_page(&dataset, &request(view, 2015, 2024)).expect("view builds");
        assert_eq!(page.view, view);
        assert!(!page.charts.is_empty(), "{} has charts", view.label());
    }
}

#[test]
fn chart_spec_serializes_the_front_end_contract() {
    let dataset = fixture_dataset();
    let page = build_page(&dataset, &request(DashboardView::Overview, 2012, 2024))
        .expect("overview builds");

    let value = serde_json::to_value(&page).expect("page serializes");
    assert_eq!(value["view"], "overview");
    assert_eq!(value["charts"][0]["id"], "overview");
    assert_eq!(value["charts"][0]["secondary_y_axis"]["range"][1], 100.0);

    let first_trace = &value["charts"][0]["series"][0];
    assert_eq!(first_trace["kind"], "bar");
    assert_eq!(first_trace["axis"], "primary");
    assert_eq!(first_trace["x"][0], "2012");
}

#[test]
fn year_filter_trims_every_chart_to_the_selected_window() {
    let dataset = fixture_dataset();
    let page = build_page(&dataset, &request(DashboardView::Informality, 2018, 2020))
        .expect("informality builds");

    for trace in &page.charts[0].series {
        assert_eq!(trace.x.first().map(String::as_str), Some("2018"));
        assert_eq!(trace.x.last().map(String::as_str), Some("2020"));
        assert_eq!(trace.x.len(), 3);
    }

    // The FGTS overlay must honor the same window as the workforce bars.
    let page = build_page(&dataset, &request(DashboardView::InformalFgtsImpact, 2018, 2020))
        .expect("fgts view builds");
    assert_eq!(page.charts[0].series.len(), 2);
    for trace in &page.charts[0].series {
        assert_eq!(trace.x.first().map(String::as_str), Some("2018"));
        assert_eq!(trace.x.last().map(String::as_str), Some("2020"));
        assert_eq!(trace.x.len(), 3);
    }
}

#[test]
fn fgts_view_degrades_without_the_bundled_dataset() {
    let mut dataset = fixture_dataset();
    dataset.fgts = None;

    let page = build_page(&dataset, &request(DashboardView::InformalFgtsImpact, 2012, 2024))
        .expect("view still builds");
    assert_eq!(page.charts[0].series.len(), 1);
    assert!(page
        .notes
        .iter()
        .any(|note| note.contains("unavailable")));
}

#[test]
fn rebuilding_the_page_is_deterministic() {
    let dataset = fixture_dataset();
    let req = request(DashboardView::MortgageRates, 2016, 2023);
    let first = serde_json::to_string(&build_page(&dataset, &req).expect("builds"))
        .expect("serializes");
    let second = serde_json::to_string(&build_page(&dataset, &req).expect("builds"))
        .expect("serializes");
    assert_eq!(first, second);
}
