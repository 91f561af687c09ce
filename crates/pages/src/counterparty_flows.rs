use crate::Page;
use crate::error::PageError;
use crate::panel::{Control, FilterPanel, FilterSelection, Placement};
use crate::tables;
use crate::view::{PageView, ViewSection};
use analytics::{CategoryChart, ChartKind, Measure, PieChart, TimeBucket, summarize};
use configuration::{DatasetParams, PageId};
use core_types::{Dataset, Dimension, FillRecord};
use generator::FillModel;

pub const AGGREGATED_TABLE: &str = "Aggregated Table";
pub const AVERAGE_BY_BROKER: &str = "Average Slippage by Broker";
pub const AVERAGE_BY_INSTRUMENT: &str = "Average Slippage by Instrument";
pub const AVERAGE_OVER_TIME: &str = "Average Slippage Over Time";
pub const SLIPPAGE_SHARE: &str = "Slippage Distribution by Broker";

/// Fills broken down by counterparty, instrument and asset type.
///
/// Filters sit in an expander at the top of the page rather than in the sidebar.
pub struct CounterpartyFlowsPage {
    title: String,
    dataset: Dataset<FillRecord>,
}

impl CounterpartyFlowsPage {
    pub fn new(title: impl Into<String>, params: &DatasetParams) -> Result<Self, PageError> {
        let model = FillModel::report().with_asset_type();
        let dataset = generator::fills(params, &model).map_err(|source| PageError::Dataset {
            page: PageId::CounterpartyFlows,
            source,
        })?;
        Ok(Self {
            title: title.into(),
            dataset,
        })
    }

    pub fn dataset(&self) -> &Dataset<FillRecord> {
        &self.dataset
    }
}

impl Page for CounterpartyFlowsPage {
    fn id(&self) -> PageId {
        PageId::CounterpartyFlows
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn panel(&self) -> FilterPanel {
        FilterPanel::new(Placement::Inline)
            .control(Control::date_range("Select date range", &self.dataset))
            .control(Some(Control::multi_select(
                "Select broker(s)",
                Dimension::Broker,
                &self.dataset,
            )))
            .control(Some(Control::multi_select(
                "Select instrument(s)",
                Dimension::Instrument,
                &self.dataset,
            )))
            .control(Some(Control::multi_select(
                "Select asset type(s)",
                Dimension::AssetClass,
                &self.dataset,
            )))
    }

    fn render(&self, selection: &FilterSelection) -> Result<PageView, PageError> {
        let resolved = self.panel().resolve(selection);
        let rows = resolved.state.apply(&self.dataset.rows);

        let aggregate = tables::fill_aggregate(
            AGGREGATED_TABLE,
            &rows,
            &[
                Dimension::Broker,
                Dimension::Instrument,
                Dimension::Side,
                Dimension::AssetClass,
            ],
        )?;

        let by_broker = summarize(rows.iter().copied(), |r| r.broker.clone(), |r| r.slippage);
        let by_instrument =
            summarize(rows.iter().copied(), |r| r.instrument.clone(), |r| r.slippage);
        let by_month = summarize(
            rows.iter().copied(),
            |r| TimeBucket::Month.start(r.date),
            |r| r.slippage,
        );
        let totals = by_broker
            .iter()
            .map(|(broker, stats)| (broker.clone(), stats.sum))
            .collect();

        let view = PageView::new(self.id(), &self.title)
            .filtered(resolved, self.dataset.len(), rows.len())
            .section(ViewSection::new(AGGREGATED_TABLE).visual(aggregate))
            .section(
                ViewSection::new("Average Slippage")
                    .visual(
                        CategoryChart::from_pairs(
                            ChartKind::Bar,
                            AVERAGE_BY_BROKER,
                            "Average Slippage",
                            tables::points(by_broker, |k| k, Measure::Mean),
                        )
                        .labels("Broker", "Average Slippage"),
                    )
                    .visual(
                        CategoryChart::from_pairs(
                            ChartKind::Bar,
                            AVERAGE_BY_INSTRUMENT,
                            "Average Slippage",
                            tables::points(by_instrument, |k| k, Measure::Mean),
                        )
                        .labels("Instrument", "Average Slippage"),
                    ),
            )
            .section(
                ViewSection::new("Slippage Over Time").visual(
                    CategoryChart::from_pairs(
                        ChartKind::Line,
                        AVERAGE_OVER_TIME,
                        "Average Slippage",
                        tables::points(by_month, |m| TimeBucket::Month.label(m), Measure::Mean),
                    )
                    .labels("Month", "Average Slippage"),
                ),
            )
            .section(ViewSection::new(tables::RAW_DATA).visual(tables::raw_fills(&rows, true)?))
            .section(
                ViewSection::new("Slippage Distribution")
                    .visual(PieChart::from_totals(SLIPPAGE_SHARE, totals)),
            );
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::Visual;
    use configuration::DatasetSettings;
    use rust_decimal::Decimal;

    fn page() -> CounterpartyFlowsPage {
        CounterpartyFlowsPage::new(
            "Counterparty Flows",
            &DatasetSettings::default().counterparty_flows,
        )
        .unwrap()
    }

    #[test]
    fn test_filters_are_inline_and_include_asset_type() {
        let panel = page().panel();
        assert_eq!(panel.placement, Placement::Inline);
        assert!(panel.controls.iter().any(|c| matches!(
            c,
            Control::MultiSelect { dimension: Dimension::AssetClass, options, .. }
                if options == &["Equity", "Credit", "Rates"]
        )));
    }

    #[test]
    fn test_asset_type_filter() {
        let page = page();
        let view = page
            .render(&FilterSelection::new().select(Dimension::AssetClass, ["Rates"]))
            .unwrap();
        let expected = page
            .dataset()
            .rows
            .iter()
            .filter(|r| r.asset_type.as_deref() == Some("Rates"))
            .count();
        assert_eq!(view.rows.filtered, expected);
        assert!(expected > 0);
    }

    #[test]
    fn test_tables_share_the_asset_type_heading() {
        let view = page().render(&FilterSelection::new()).unwrap();
        let Some(Visual::Table(aggregate)) = view.visual(AGGREGATED_TABLE) else {
            panic!("expected the aggregate table");
        };
        let Some(Visual::Table(raw)) = view.visual(tables::RAW_DATA) else {
            panic!("expected the raw table");
        };
        assert_eq!(aggregate.columns[3], "Asset_Type");
        assert!(raw.columns.iter().any(|c| c == "Asset_Type"));
        assert!(!aggregate.columns.iter().any(|c| c == "Asset Class"));
    }

    #[test]
    fn test_pie_uses_absolute_slippage() {
        let page = page();
        let view = page.render(&FilterSelection::new()).unwrap();
        let Some(Visual::Pie(pie)) = view.visual(SLIPPAGE_SHARE) else {
            panic!("expected the slippage pie");
        };
        assert!(pie.slices.iter().all(|s| s.value >= Decimal::ZERO));

        let jpm: Decimal = page
            .dataset()
            .rows
            .iter()
            .filter(|r| r.broker == "JPM")
            .map(|r| r.slippage)
            .sum();
        let slice = pie.slices.iter().find(|s| s.label == "JPM").unwrap();
        assert_eq!(slice.value, jpm.abs());
        assert_eq!(slice.negative, jpm < Decimal::ZERO);
    }
}
