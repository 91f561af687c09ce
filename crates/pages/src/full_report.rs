use crate::Page;
use crate::error::PageError;
use crate::panel::{Control, FilterPanel, FilterSelection, Placement};
use crate::tables;
use crate::view::{PageView, ViewSection};
use analytics::{CategoryChart, ChartKind, Measure, TimeBucket, summarize};
use configuration::{DatasetParams, PageId};
use core_types::{Dataset, Dimension, FillRecord};
use generator::FillModel;

pub const AGGREGATED_TABLE: &str = "Aggregated Table";
pub const SLIPPAGE_BY_BROKER: &str = "Total Slippage by Broker";
pub const SLIPPAGE_BY_INSTRUMENT: &str = "Total Slippage by Instrument";
pub const SLIPPAGE_OVER_TIME: &str = "Total Slippage Over Time";

/// CDS fills aggregated by broker, instrument and side.
pub struct FullReportPage {
    title: String,
    dataset: Dataset<FillRecord>,
}

impl FullReportPage {
    pub fn new(title: impl Into<String>, params: &DatasetParams) -> Result<Self, PageError> {
        let dataset =
            generator::fills(params, &FillModel::report()).map_err(|source| PageError::Dataset {
                page: PageId::FullReport,
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

impl Page for FullReportPage {
    fn id(&self) -> PageId {
        PageId::FullReport
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn panel(&self) -> FilterPanel {
        FilterPanel::new(Placement::Sidebar)
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
    }

    fn render(&self, selection: &FilterSelection) -> Result<PageView, PageError> {
        let resolved = self.panel().resolve(selection);
        let rows = resolved.state.apply(&self.dataset.rows);

        let aggregate = tables::fill_aggregate(
            AGGREGATED_TABLE,
            &rows,
            &[Dimension::Broker, Dimension::Instrument, Dimension::Side],
        )?;

        let by_broker = summarize(rows.iter().copied(), |r| r.broker.clone(), |r| r.slippage);
        let by_instrument =
            summarize(rows.iter().copied(), |r| r.instrument.clone(), |r| r.slippage);
        let by_month = summarize(
            rows.iter().copied(),
            |r| TimeBucket::Month.start(r.date),
            |r| r.slippage,
        );

        let view = PageView::new(self.id(), &self.title)
            .filtered(resolved, self.dataset.len(), rows.len())
            .section(ViewSection::new(AGGREGATED_TABLE).visual(aggregate))
            .section(ViewSection::new(tables::RAW_DATA).visual(tables::raw_fills(&rows, false)?))
            .section(
                ViewSection::new("Slippage by Broker").visual(
                    CategoryChart::from_pairs(
                        ChartKind::Bar,
                        SLIPPAGE_BY_BROKER,
                        "Slippage",
                        tables::points(by_broker, |k| k, Measure::Sum),
                    )
                    .labels("Broker", "Total Slippage"),
                ),
            )
            .section(
                ViewSection::new("Slippage by Instrument").visual(
                    CategoryChart::from_pairs(
                        ChartKind::Bar,
                        SLIPPAGE_BY_INSTRUMENT,
                        "Slippage",
                        tables::points(by_instrument, |k| k, Measure::Sum),
                    )
                    .labels("Instrument", "Total Slippage"),
                ),
            )
            .section(
                ViewSection::new("Slippage Over Time").visual(
                    CategoryChart::from_pairs(
                        ChartKind::Line,
                        SLIPPAGE_OVER_TIME,
                        "Slippage",
                        tables::points(by_month, |m| TimeBucket::Month.label(m), Measure::Sum),
                    )
                    .labels("Month", "Total Slippage"),
                ),
            );
        Ok(view)
    }
}
