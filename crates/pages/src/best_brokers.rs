use crate::Page;
use crate::error::PageError;
use crate::panel::{Control, FilterPanel, FilterSelection, Placement};
use crate::tables;
use crate::view::{PageView, ViewSection};
use analytics::{BoxPlot, CategoryChart, ChartKind, Measure, TimeBucket, group_by, ordered, summarize};
use configuration::{DatasetParams, PageId};
use core_types::{Dataset, Dimension, QuoteRecord};
use rust_decimal::Decimal;

pub const AVERAGE_SLIPPAGE: &str = "Average Slippage per Broker";
pub const SLIPPAGE_BY_BROKER: &str = "Slippage Distribution by Broker";
pub const SLIPPAGE_BY_REGION: &str = "Slippage Distribution by Region";
pub const SLIPPAGE_BY_MONTH: &str = "Slippage Distribution Over Time";

/// CDS quotes against executions, ranked by broker slippage.
pub struct BestBrokersPage {
    title: String,
    dataset: Dataset<QuoteRecord>,
}

impl BestBrokersPage {
    pub fn new(title: impl Into<String>, params: &DatasetParams) -> Result<Self, PageError> {
        let dataset = generator::cds_quotes(params).map_err(|source| PageError::Dataset {
            page: PageId::BestBrokers,
            source,
        })?;
        Ok(Self {
            title: title.into(),
            dataset,
        })
    }

    pub fn dataset(&self) -> &Dataset<QuoteRecord> {
        &self.dataset
    }
}

fn slippages(rows: Vec<&QuoteRecord>) -> Vec<Decimal> {
    rows.into_iter().map(|r| r.slippage).collect()
}

impl Page for BestBrokersPage {
    fn id(&self) -> PageId {
        PageId::BestBrokers
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn panel(&self) -> FilterPanel {
        FilterPanel::new(Placement::Sidebar)
            .control(Control::date_range("Select date range", &self.dataset))
            .control(Some(Control::multi_select(
                "Select region(s)",
                Dimension::Region,
                &self.dataset,
            )))
            .control(Some(Control::multi_select(
                "Select broker(s)",
                Dimension::Broker,
                &self.dataset,
            )))
    }

    fn render(&self, selection: &FilterSelection) -> Result<PageView, PageError> {
        let resolved = self.panel().resolve(selection);
        let rows = resolved.state.apply(&self.dataset.rows);

        // Bars follow the broker selection; brokers without rows have no bar.
        let by_broker = summarize(rows.iter().copied(), |r| r.broker.clone(), |r| r.slippage);
        let means = ordered(&by_broker, resolved.selected(Dimension::Broker), Measure::Mean)
            .into_iter()
            .map(|(broker, mean)| (broker, tables::round(mean)))
            .collect();
        let average = CategoryChart::from_pairs(ChartKind::Bar, AVERAGE_SLIPPAGE, "Average Slippage", means)
            .labels("Broker", "Average Slippage");

        let by_broker = BoxPlot::from_groups(
            SLIPPAGE_BY_BROKER,
            "Broker",
            "Slippage",
            group_by(rows.iter().copied(), |r| r.broker.clone())
                .into_iter()
                .map(|(broker, group)| (broker, slippages(group))),
        );
        let by_region = BoxPlot::from_groups(
            SLIPPAGE_BY_REGION,
            "Region",
            "Slippage",
            group_by(rows.iter().copied(), |r| r.region.clone())
                .into_iter()
                .map(|(region, group)| (region, slippages(group))),
        );
        let by_month = BoxPlot::from_groups(
            SLIPPAGE_BY_MONTH,
            "Month",
            "Slippage",
            group_by(rows.iter().copied(), |r| TimeBucket::Month.start(r.date))
                .into_iter()
                .map(|(month, group)| (TimeBucket::Month.label(month), slippages(group))),
        );

        let view = PageView::new(self.id(), &self.title)
            .filtered(resolved, self.dataset.len(), rows.len())
            .section(ViewSection::new(AVERAGE_SLIPPAGE).visual(average))
            .section(
                ViewSection::new("Slippage Distribution")
                    .visual(by_broker)
                    .visual(by_region)
                    .visual(by_month),
            )
            .section(ViewSection::new(tables::RAW_DATA).visual(tables::raw_quotes(&rows)?));
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::Visual;
    use configuration::DatasetSettings;

    fn page() -> BestBrokersPage {
        BestBrokersPage::new("Best Brokers", &DatasetSettings::default().best_brokers).unwrap()
    }

    #[test]
    fn test_average_slippage_follows_selection_order() {
        let page = page();
        let selection = FilterSelection::new().select(Dimension::Broker, ["UBS", "JPM"]);
        let view = page.render(&selection).unwrap();

        let Some(Visual::Chart(chart)) = view.visual(AVERAGE_SLIPPAGE) else {
            panic!("expected the average slippage chart");
        };
        assert_eq!(chart.categories, vec!["UBS", "JPM"]);

        let ubs: Vec<Decimal> = page
            .dataset()
            .rows
            .iter()
            .filter(|r| r.broker == "UBS")
            .map(|r| r.slippage)
            .collect();
        let mean = ubs.iter().sum::<Decimal>() / Decimal::from(ubs.len());
        assert_eq!(chart.series[0].values[0], Some(mean.round_dp(2)));
    }

    #[test]
    fn test_region_filter_reaches_every_visual() {
        let page = page();
        let view = page
            .render(&FilterSelection::new().select(Dimension::Region, ["EMEA"]))
            .unwrap();

        let Some(Visual::BoxPlot(regions)) = view.visual(SLIPPAGE_BY_REGION) else {
            panic!("expected the region box plot");
        };
        assert_eq!(regions.groups.len(), 1);
        assert_eq!(regions.groups[0].label, "EMEA");
        assert_eq!(regions.groups[0].count, view.rows.filtered);
    }

    #[test]
    fn test_months_are_chronological() {
        let page = page();
        let view = page.render(&FilterSelection::new()).unwrap();
        let Some(Visual::BoxPlot(months)) = view.visual(SLIPPAGE_BY_MONTH) else {
            panic!("expected the monthly box plot");
        };
        let labels: Vec<&str> = months.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]
        );
    }
}
