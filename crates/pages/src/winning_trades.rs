use crate::Page;
use crate::error::PageError;
use crate::panel::{Control, FilterPanel, FilterSelection, Placement};
use crate::tables;
use crate::view::{Notice, PageView, ViewSection};
use analytics::{CategoryChart, Cell, ChartKind, Table, group_by};
use configuration::{DatasetParams, PageId, TrainingSettings};
use core_types::{Dataset, Dimension, FillRecord, PRICE_DP};
use generator::FillModel;
use ml_trainer::TrainingReport;
use rust_decimal::Decimal;
use std::cmp::Reverse;

pub const TOP_WINNERS: &str = "Top Winning Trades";
pub const BROKER_PERFORMANCE: &str = "Broker Performance";
pub const WIN_RATE: &str = "Win Rate per Broker";

/// How many winners the top-trades table lists.
const TOP_N: usize = 10;

/// Result of training the sample model when the page is built.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelStatus {
    Trained(TrainingReport),
    /// The sample dataset could not be loaded or fitted; holds the reason.
    Unavailable(String),
}

impl ModelStatus {
    /// Loads the configured sample file and trains on it. Failures are reported, not raised.
    pub fn train(settings: &TrainingSettings) -> Self {
        let outcome = ml_trainer::load_data(&settings.sample_path)
            .and_then(|df| ml_trainer::train_model(&df, settings));
        match outcome {
            Ok(report) => ModelStatus::Trained(report),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    file = %settings.sample_path.display(),
                    "Winning trades model is unavailable."
                );
                ModelStatus::Unavailable(e.to_string())
            }
        }
    }

    fn notice(&self) -> Notice {
        match self {
            ModelStatus::Trained(report) => {
                Notice::success(format!("Model trained with accuracy: {:.2}", report.accuracy))
            }
            ModelStatus::Unavailable(reason) => Notice::warning(format!(
                "Sample dataset unavailable ({reason}). Run `ml-trainer generate-dataset` to create it."
            )),
        }
    }
}

/// Fills that beat their sample price, with the sample model's accuracy.
pub struct WinningTradesPage {
    title: String,
    dataset: Dataset<FillRecord>,
    model: ModelStatus,
}

impl WinningTradesPage {
    pub fn new(
        title: impl Into<String>,
        params: &DatasetParams,
        training: &TrainingSettings,
    ) -> Result<Self, PageError> {
        let dataset =
            generator::fills(params, &FillModel::tight()).map_err(|source| PageError::Dataset {
                page: PageId::WinningTrades,
                source,
            })?;
        Ok(Self {
            title: title.into(),
            dataset,
            model: ModelStatus::train(training),
        })
    }

    pub fn dataset(&self) -> &Dataset<FillRecord> {
        &self.dataset
    }

    pub fn model(&self) -> &ModelStatus {
        &self.model
    }
}

fn top_winners(rows: &[&FillRecord]) -> Result<Table, PageError> {
    let mut winners: Vec<&FillRecord> = rows.iter().copied().filter(|r| r.is_winner()).collect();
    winners.sort_by_key(|r| (Reverse(r.pnl()), r.date));

    let mut table = Table::new(
        TOP_WINNERS,
        [
            "Date",
            "Broker",
            "Instrument",
            "Side",
            "Quantity",
            "avgFill",
            "samplePrice",
            "PnL",
        ],
    );
    for row in winners.into_iter().take(TOP_N) {
        table.push_row(vec![
            row.date.into(),
            row.broker.as_str().into(),
            row.instrument.as_str().into(),
            row.side.as_str().into(),
            row.quantity.into(),
            row.avg_fill.into(),
            row.sample_price.into(),
            row.pnl().into(),
        ])?;
    }
    Ok(table)
}

/// Per selected broker: trades, winners, win rate (percent) and total PnL.
fn broker_performance(
    rows: &[&FillRecord],
    brokers: &[String],
) -> Result<(Table, CategoryChart), PageError> {
    let groups = group_by(rows.iter().copied(), |r| r.broker.clone());
    let mut table = Table::new(
        BROKER_PERFORMANCE,
        ["Broker", "Trades", "Winners", "Win_Rate", "Total_PnL"],
    );
    let mut rates = Vec::with_capacity(brokers.len());

    for broker in brokers {
        let members = groups.get(broker).map(Vec::as_slice).unwrap_or(&[]);
        let winners = members.iter().filter(|r| r.is_winner()).count();
        let rate = (!members.is_empty()).then(|| {
            (Decimal::from(winners) * Decimal::ONE_HUNDRED / Decimal::from(members.len()))
                .round_dp(PRICE_DP)
        });
        let pnl: Decimal = members.iter().map(|r| r.pnl()).sum();
        table.push_row(vec![
            broker.as_str().into(),
            members.len().into(),
            winners.into(),
            rate.into(),
            if members.is_empty() { Cell::Empty } else { pnl.into() },
        ])?;
        rates.push((broker.clone(), rate));
    }

    let chart = CategoryChart::from_pairs(ChartKind::Bar, WIN_RATE, "Win Rate (%)", rates)
        .labels("Broker", "Win Rate (%)");
    Ok((table, chart))
}

impl Page for WinningTradesPage {
    fn id(&self) -> PageId {
        PageId::WinningTrades
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
    }

    fn render(&self, selection: &FilterSelection) -> Result<PageView, PageError> {
        let resolved = self.panel().resolve(selection);
        let rows = resolved.state.apply(&self.dataset.rows);
        let (performance, win_rate) =
            broker_performance(&rows, resolved.selected(Dimension::Broker))?;
        let top = top_winners(&rows)?;

        let mut view = PageView::new(self.id(), &self.title);
        view.notices.push(self.model.notice());
        let view = view
            .filtered(resolved, self.dataset.len(), rows.len())
            .section(ViewSection::new(TOP_WINNERS).visual(top))
            .section(
                ViewSection::new(BROKER_PERFORMANCE)
                    .visual(win_rate)
                    .visual(performance),
            )
            .section(ViewSection::new(tables::RAW_DATA).visual(tables::raw_fills(&rows, false)?));
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::NoticeLevel;
    use analytics::Visual;
    use configuration::DatasetSettings;

    fn unavailable_training() -> TrainingSettings {
        TrainingSettings {
            sample_path: "does/not/exist.csv".into(),
            ..TrainingSettings::default()
        }
    }

    fn page(training: &TrainingSettings) -> WinningTradesPage {
        WinningTradesPage::new(
            "Winning Trades",
            &DatasetSettings::default().winning_trades,
            training,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_sample_file_degrades_to_a_warning() {
        let page = page(&unavailable_training());
        assert!(matches!(page.model(), ModelStatus::Unavailable(_)));

        let view = page.render(&FilterSelection::new()).unwrap();
        assert_eq!(view.notices[0].level, NoticeLevel::Warning);
        assert!(view.notices[0].message.contains("generate-dataset"));
    }

    #[test]
    fn test_trained_model_reports_its_accuracy() {
        let dir = tempfile::tempdir().unwrap();
        let training = TrainingSettings {
            sample_path: dir.path().join("sample.csv"),
            ..TrainingSettings::default()
        };
        ml_trainer::generate_dataset(&DatasetSettings::default().winning_trades, &training.sample_path)
            .unwrap();

        let page = page(&training);
        let ModelStatus::Trained(report) = page.model() else {
            panic!("expected a trained model, got {:?}", page.model());
        };
        let view = page.render(&FilterSelection::new()).unwrap();
        assert_eq!(view.notices[0].level, NoticeLevel::Success);
        assert_eq!(
            view.notices[0].message,
            format!("Model trained with accuracy: {:.2}", report.accuracy)
        );
    }

    #[test]
    fn test_top_winners_are_sorted_by_pnl() {
        let page = page(&unavailable_training());
        let view = page.render(&FilterSelection::new()).unwrap();
        let Some(Visual::Table(table)) = view.visual(TOP_WINNERS) else {
            panic!("expected the top winners table");
        };
        assert_eq!(table.rows.len(), TOP_N);
        let pnl: Vec<Decimal> = table
            .rows
            .iter()
            .map(|row| match row[7] {
                Cell::Decimal(d) => d,
                ref other => panic!("unexpected PnL cell {other:?}"),
            })
            .collect();
        assert!(pnl.windows(2).all(|w| w[0] >= w[1]));
        assert!(pnl.iter().all(|p| *p > Decimal::ZERO));
    }

    #[test]
    fn test_win_rate_has_no_bar_for_brokers_without_trades() {
        let page = page(&unavailable_training());
        let from = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let view = page
            .render(
                &FilterSelection::new()
                    .dates(from, from)
                    .select(Dimension::Broker, ["JPM", "UBS"]),
            )
            .unwrap();
        let Some(Visual::Chart(chart)) = view.visual(WIN_RATE) else {
            panic!("expected the win rate chart");
        };
        assert_eq!(chart.categories, vec!["JPM", "UBS"]);
        for (broker, rate) in chart.categories.iter().zip(&chart.series[0].values) {
            let trades = page
                .dataset()
                .rows
                .iter()
                .filter(|r| r.date == from && &r.broker == broker)
                .count();
            assert_eq!(rate.is_none(), trades == 0);
        }
    }
}
