//! # Dashboard Pages
//!
//! Each page owns a generated dataset and turns a filter selection into a
//! `PageView`: notices plus ordered sections of tables and charts. Rendering is a
//! pure function of (dataset, selection), so one page instance can serve any number
//! of concurrent requests.

pub mod best_brokers;
pub mod broker_flow;
pub mod counterparty_flows;
pub mod error;
pub mod full_report;
pub mod home;
pub mod panel;
pub mod tables;
pub mod view;
pub mod winning_trades;

pub use error::PageError;
pub use panel::{Control, FilterPanel, FilterSelection, Placement, ResolvedFilters};
pub use view::{Link, Notice, NoticeLevel, PageView, RowCounts, ViewSection};

use best_brokers::BestBrokersPage;
use broker_flow::BrokerFlowPage;
use configuration::{Config, Navigation, PageId};
use counterparty_flows::CounterpartyFlowsPage;
use full_report::FullReportPage;
use home::HomePage;
use winning_trades::WinningTradesPage;

/// The core trait every dashboard page implements.
///
/// `Send + Sync` lets the web server share one instance of each page across
/// request handlers behind an `Arc`.
pub trait Page: Send + Sync {
    /// Which page this is.
    fn id(&self) -> PageId;

    /// The human-readable title shown in headings and the browser tab.
    fn title(&self) -> &str;

    /// The filter controls, with options taken from the page's dataset.
    fn panel(&self) -> FilterPanel;

    /// Builds the page for one filter selection.
    ///
    /// # Arguments
    ///
    /// * `selection` - Raw user input. Missing entries fall back to the control
    ///   defaults and unknown values are ignored, so any selection is acceptable.
    ///
    /// # Returns
    ///
    /// The view to present. An empty filter result is a normal view with a warning
    /// notice, never an error.
    fn render(&self, selection: &FilterSelection) -> Result<PageView, PageError>;
}

/// Creates a page, generating its dataset from the configuration.
///
/// Titles come from the navigation file when the page is listed there.
pub fn create_page(
    id: PageId,
    config: &Config,
    navigation: &Navigation,
) -> Result<Box<dyn Page>, PageError> {
    let title = |default: &str| {
        navigation
            .find(id)
            .map_or_else(|| default.to_string(), |entry| entry.title.clone())
    };
    let datasets = &config.datasets;

    let page: Box<dyn Page> = match id {
        PageId::Home => Box::new(HomePage::new(navigation.clone())),
        PageId::BrokerFlow => Box::new(BrokerFlowPage::new(
            title("Broker Flow"),
            &datasets.broker_flow,
        )?),
        PageId::WinningTrades => Box::new(WinningTradesPage::new(
            title("Winning Trades"),
            &datasets.winning_trades,
            &config.training,
        )?),
        PageId::CounterpartyFlows => Box::new(CounterpartyFlowsPage::new(
            title("Counterparty Flows"),
            &datasets.counterparty_flows,
        )?),
        PageId::BestBrokers => Box::new(BestBrokersPage::new(
            title("Best Brokers"),
            &datasets.best_brokers,
        )?),
        PageId::FullReport => Box::new(FullReportPage::new(
            title("Full Report"),
            &datasets.full_report,
        )?),
    };
    tracing::info!(page = %id, title = page.title(), "Page ready.");
    Ok(page)
}

/// Every page, built once at startup, plus the menu that links them.
pub struct PageRegistry {
    navigation: Navigation,
    pages: Vec<Box<dyn Page>>,
}

impl PageRegistry {
    pub fn build(config: &Config, navigation: Navigation) -> Result<Self, PageError> {
        let pages = PageId::ALL
            .into_iter()
            .map(|id| create_page(id, config, &navigation))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { navigation, pages })
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    pub fn get(&self, id: PageId) -> Option<&dyn Page> {
        self.pages
            .iter()
            .find(|page| page.id() == id)
            .map(|page| page.as_ref())
    }

    pub fn home(&self) -> Option<&dyn Page> {
        self.get(PageId::Home)
    }

    /// Looks a page up by the URL slug the navigation file gives it.
    pub fn by_path(&self, path: &str) -> Option<&dyn Page> {
        self.navigation
            .find_by_path(path)
            .and_then(|entry| self.get(entry.page))
    }
}
