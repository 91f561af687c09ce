use crate::Page;
use crate::error::PageError;
use crate::panel::{Control, FilterPanel, FilterSelection, Placement};
use crate::tables;
use crate::view::{PageView, ViewSection};
use analytics::{CategoryChart, ChartKind, Measure, PieChart, Table, TimeBucket, pivot, summarize};
use configuration::{DatasetParams, PageId};
use core_types::{Dataset, Dimension, FlowRecord};
use generator::catalog::EQUITIES;
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub const FLOW_PIVOT: &str = "Flow Pivot";
pub const FLOW_BY_BANK_AND_SECTOR: &str = "Flow by Bank and Sector";
pub const FLOW_OVER_TIME: &str = "Flow Over Time by Bank";
pub const FLOW_SHARE: &str = "Flow Distribution by Bank";

/// Weekly equity flow per bank and sector.
pub struct BrokerFlowPage {
    title: String,
    dataset: Dataset<FlowRecord>,
}

impl BrokerFlowPage {
    pub fn new(title: impl Into<String>, params: &DatasetParams) -> Result<Self, PageError> {
        let dataset = generator::broker_flow(params).map_err(|source| PageError::Dataset {
            page: PageId::BrokerFlow,
            source,
        })?;
        Ok(Self {
            title: title.into(),
            dataset,
        })
    }

    pub fn dataset(&self) -> &Dataset<FlowRecord> {
        &self.dataset
    }
}

impl Page for BrokerFlowPage {
    fn id(&self) -> PageId {
        PageId::BrokerFlow
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn panel(&self) -> FilterPanel {
        FilterPanel::new(Placement::Sidebar)
            .control(Control::date_range("Select timeline", &self.dataset))
            .control(Some(Control::multi_select(
                "Select sector(s)",
                Dimension::Sector,
                &self.dataset,
            )))
    }

    fn render(&self, selection: &FilterSelection) -> Result<PageView, PageError> {
        let resolved = self.panel().resolve(selection);
        let state = resolved
            .state
            .clone()
            .equals(Dimension::AssetClass, EQUITIES);
        let rows = state.apply(&self.dataset.rows);
        let flow = |r: &FlowRecord| Decimal::from(r.flow);

        let banks = self.dataset.categories(Dimension::Broker);
        let sectors =
            resolved.selected_in_order(Dimension::Sector, self.dataset.categories(Dimension::Sector));

        let by_bank_sector = summarize(
            rows.iter().copied(),
            |r| (r.bank.clone(), r.sector.clone()),
            flow,
        );
        let matrix = pivot(&by_bank_sector, banks, &sectors, Measure::Sum);

        let by_date_bank = summarize(
            rows.iter().copied(),
            |r| (TimeBucket::Day.label(r.date), r.bank.clone()),
            flow,
        );
        let dates: Vec<String> = by_date_bank
            .keys()
            .map(|(date, _)| date.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let over_time = pivot(&by_date_bank, &dates, banks, Measure::Sum);

        let by_bank = summarize(rows.iter().copied(), |r| r.bank.clone(), flow);
        let totals = by_bank
            .into_iter()
            .map(|(bank, stats)| (bank, stats.sum))
            .collect();

        let view = PageView::new(self.id(), &self.title)
            .filtered(resolved, self.dataset.len(), rows.len())
            .section(
                ViewSection::new("Broker Flow Pivot Table")
                    .visual(Table::from_matrix(FLOW_PIVOT, "Bank", &matrix))
                    .visual(
                        CategoryChart::from_matrix(ChartKind::Bar, FLOW_BY_BANK_AND_SECTOR, &matrix)
                            .labels("Bank", "Flow"),
                    ),
            )
            .section(
                ViewSection::new("Flow Over Time").visual(
                    CategoryChart::from_matrix(ChartKind::Line, FLOW_OVER_TIME, &over_time)
                        .labels("Date", "Flow"),
                ),
            )
            .section(
                ViewSection::new("Flow Distribution")
                    .visual(PieChart::from_totals(FLOW_SHARE, totals)),
            )
            .section(ViewSection::new(tables::RAW_DATA).visual(tables::raw_flows(&rows)?));
        Ok(view)
    }
}
