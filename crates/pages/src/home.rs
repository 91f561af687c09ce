use crate::Page;
use crate::error::PageError;
use crate::panel::{FilterPanel, FilterSelection, Placement};
use crate::view::{Link, PageView, ViewSection};
use configuration::{Navigation, PageEntry, PageId};

/// The landing page. Everything on it comes from the navigation file.
pub struct HomePage {
    navigation: Navigation,
}

impl HomePage {
    pub fn new(navigation: Navigation) -> Self {
        Self { navigation }
    }
}

impl Page for HomePage {
    fn id(&self) -> PageId {
        PageId::Home
    }

    fn title(&self) -> &str {
        &self.navigation.title
    }

    fn panel(&self) -> FilterPanel {
        FilterPanel::new(Placement::Sidebar)
    }

    fn render(&self, _selection: &FilterSelection) -> Result<PageView, PageError> {
        let link = |entry: &PageEntry| Link {
            title: entry.title.clone(),
            icon: entry.icon.clone(),
            path: entry.path.clone(),
            description: entry.description.clone(),
        };

        let mut welcome = ViewSection::new("Welcome");
        welcome.paragraphs.push(self.navigation.welcome.clone());
        let mut view = PageView::new(self.id(), &self.navigation.title).section(welcome);

        for section in &self.navigation.sections {
            let heading = format!("{} {}", section.icon, section.title);
            let mut overview = ViewSection::new(heading.trim());
            overview.links = section.pages.iter().map(link).collect();
            view = view.section(overview);
        }

        let mut quick = ViewSection::new("Quick Navigation");
        quick.links = self.navigation.entries().map(link).collect();
        Ok(view.section(quick))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_page_lists_every_section_and_page() {
        let page = HomePage::new(Navigation::default());
        let view = page.render(&FilterSelection::new()).unwrap();

        let headings: Vec<&str> = view.sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(
            headings,
            vec!["Welcome", "📈 Broker Stats", "💹 CDS", "Quick Navigation"]
        );
        assert_eq!(view.sections[1].links.len(), 3);
        assert_eq!(view.sections[2].links.len(), 2);
        let quick: Vec<&str> = view.sections[3]
            .links
            .iter()
            .map(|l| l.path.as_str())
            .collect();
        assert_eq!(
            quick,
            vec![
                "broker_flow",
                "winning_trades",
                "counterparty_flows",
                "best_brokers",
                "full_report"
            ]
        );
        assert!(view.filters.is_none());
        assert!(page.panel().controls.is_empty());
    }
}
