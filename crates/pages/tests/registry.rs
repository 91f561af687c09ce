use analytics::Visual;
use configuration::{Config, Navigation, PageId, TrainingSettings};
use core_types::Dimension;
use pages::{FilterSelection, PageRegistry};
use rust_decimal::Decimal;

fn registry() -> PageRegistry {
    let config = Config {
        training: TrainingSettings {
            sample_path: "no/such/sample.csv".into(),
            ..TrainingSettings::default()
        },
        ..Config::default()
    };
    PageRegistry::build(&config, Navigation::default()).unwrap()
}

#[test]
fn test_every_listed_page_resolves_by_path() {
    let registry = registry();
    for entry in registry.navigation().entries() {
        let page = registry.by_path(&entry.path).unwrap();
        assert_eq!(page.id(), entry.page);
        assert_eq!(page.title(), entry.title);
    }
    assert!(registry.by_path("nope").is_none());
    assert_eq!(registry.home().unwrap().title(), "Dealing Dashboard");
}

#[test]
fn test_default_filters_keep_every_row() {
    let registry = registry();
    for id in PageId::ALL.into_iter().filter(|id| *id != PageId::Home) {
        let view = registry.get(id).unwrap().render(&FilterSelection::new()).unwrap();
        assert_eq!(view.rows.filtered, view.rows.generated, "page {id}");
        assert!(view.rows.generated > 0, "page {id}");
    }
}

#[test]
fn test_filtering_never_adds_rows() {
    let registry = registry();
    let selection = FilterSelection::new()
        .select(Dimension::Broker, ["JPM", "Barclays"])
        .select(Dimension::Instrument, ["Inst4"]);
    for id in PageId::ALL.into_iter().filter(|id| *id != PageId::Home) {
        let view = registry.get(id).unwrap().render(&selection).unwrap();
        assert!(view.rows.filtered <= view.rows.generated, "page {id}");
    }
}

#[test]
fn test_full_report_totals_match_unfiltered_data() {
    let registry = registry();
    let view = registry
        .get(PageId::FullReport)
        .unwrap()
        .render(&FilterSelection::new())
        .unwrap();
    let Some(Visual::Chart(by_instrument)) = view.visual("Total Slippage by Instrument") else {
        panic!("expected the instrument chart");
    };
    let Some(Visual::Chart(by_broker)) = view.visual("Total Slippage by Broker") else {
        panic!("expected the broker chart");
    };
    let a: Decimal = by_instrument.series[0].values.iter().flatten().sum();
    let b: Decimal = by_broker.series[0].values.iter().flatten().sum();
    assert_eq!(a, b);
}

#[test]
fn test_views_serialize_to_json() {
    let registry = registry();
    let view = registry
        .get(PageId::BestBrokers)
        .unwrap()
        .render(&FilterSelection::new().select(Dimension::Region, ["US"]))
        .unwrap();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["page"], "best-brokers");
    assert_eq!(json["filters"]["selected"]["region"][0], "US");
    assert!(json["sections"].as_array().unwrap().len() >= 3);
}
