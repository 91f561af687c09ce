use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifies one page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum PageId {
    Home,
    BrokerFlow,
    WinningTrades,
    CounterpartyFlows,
    BestBrokers,
    FullReport,
}

impl PageId {
    pub const ALL: [PageId; 6] = [
        PageId::Home,
        PageId::BrokerFlow,
        PageId::WinningTrades,
        PageId::CounterpartyFlows,
        PageId::BestBrokers,
        PageId::FullReport,
    ];
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageId::Home => "home",
            PageId::BrokerFlow => "broker-flow",
            PageId::WinningTrades => "winning-trades",
            PageId::CounterpartyFlows => "counterparty-flows",
            PageId::BestBrokers => "best-brokers",
            PageId::FullReport => "full-report",
        };
        f.write_str(name)
    }
}

/// The sidebar menu: ordered sections of page links.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Navigation {
    pub title: String,
    #[serde(default)]
    pub welcome: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    pub pages: Vec<PageEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageEntry {
    pub page: PageId,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    /// URL slug, e.g. `broker_flow`.
    pub path: String,
    #[serde(default)]
    pub description: String,
}

impl Navigation {
    pub fn entries(&self) -> impl Iterator<Item = &PageEntry> {
        self.sections.iter().flat_map(|s| s.pages.iter())
    }

    pub fn find_by_path(&self, path: &str) -> Option<&PageEntry> {
        self.entries().find(|e| e.path == path)
    }

    pub fn find(&self, page: PageId) -> Option<&PageEntry> {
        self.entries().find(|e| e.page == page)
    }

    /// Rejects duplicate or malformed slugs and pages listed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut paths = HashSet::new();
        let mut pages = HashSet::new();
        for entry in self.entries() {
            let valid_slug = !entry.path.is_empty()
                && entry
                    .path
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid_slug || entry.path == "api" {
                return Err(ConfigError::ValidationError(format!(
                    "invalid page path '{}' for '{}'",
                    entry.path, entry.title
                )));
            }
            if entry.page == PageId::Home {
                return Err(ConfigError::ValidationError(
                    "the home page is implicit and cannot be listed in a section".to_string(),
                ));
            }
            if !paths.insert(entry.path.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate page path '{}'",
                    entry.path
                )));
            }
            if !pages.insert(entry.page) {
                return Err(ConfigError::ValidationError(format!(
                    "page '{}' is listed more than once",
                    entry.page
                )));
            }
        }
        Ok(())
    }
}

impl Default for Navigation {
    fn default() -> Self {
        let entry = |page, title: &str, icon: &str, path: &str, description: &str| PageEntry {
            page,
            title: title.to_string(),
            icon: icon.to_string(),
            path: path.to_string(),
            description: description.to_string(),
        };
        Self {
            title: "Dealing Dashboard".to_string(),
            welcome: "Welcome to the new dealing dashboard! Use the sidebar or the links below \
                      to navigate to different sections."
                .to_string(),
            sections: vec![
                Section {
                    title: "Broker Stats".to_string(),
                    icon: "📈".to_string(),
                    pages: vec![
                        entry(
                            PageId::BrokerFlow,
                            "Broker Flow",
                            "🔄",
                            "broker_flow",
                            "Analyze equity flows by broker and sector, with interactive filters for timeline and sector.",
                        ),
                        entry(
                            PageId::WinningTrades,
                            "Winning Trades",
                            "🏆",
                            "winning_trades",
                            "Review top-performing trades and broker performance.",
                        ),
                        entry(
                            PageId::CounterpartyFlows,
                            "Counterparty Flows",
                            "🤝",
                            "counterparty_flows",
                            "Slippage by counterparty, instrument and asset type.",
                        ),
                    ],
                },
                Section {
                    title: "CDS".to_string(),
                    icon: "💹".to_string(),
                    pages: vec![
                        entry(
                            PageId::BestBrokers,
                            "Best Brokers",
                            "🌟",
                            "best_brokers",
                            "Explore slippage and execution quality by broker and region for CDS.",
                        ),
                        entry(
                            PageId::FullReport,
                            "Full Report",
                            "💬",
                            "full_report",
                            "Aggregated CDS fills by broker, instrument and side.",
                        ),
                    ],
                },
            ],
        }
    }
}
