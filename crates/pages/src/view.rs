use crate::panel::ResolvedFilters;
use analytics::Visual;
use configuration::PageId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// A hyperlink to another page, as shown on the landing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub title: String,
    pub icon: String,
    pub path: String,
    pub description: String,
}

/// A titled block of a page. Rendered in order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewSection {
    pub heading: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paragraphs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    pub visuals: Vec<Visual>,
}

impl ViewSection {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            ..Default::default()
        }
    }

    pub fn visual(mut self, visual: impl Into<Visual>) -> Self {
        self.visuals.push(visual.into());
        self
    }
}

/// Row counts before and after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RowCounts {
    pub generated: usize,
    pub filtered: usize,
}

/// Everything a page shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: PageId,
    pub title: String,
    /// The effective filter values, so a form can be re-rendered with them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<ResolvedFilters>,
    pub rows: RowCounts,
    pub notices: Vec<Notice>,
    pub sections: Vec<ViewSection>,
}

impl PageView {
    pub fn new(page: PageId, title: impl Into<String>) -> Self {
        Self {
            page,
            title: title.into(),
            filters: None,
            rows: RowCounts::default(),
            notices: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Records the filter outcome and warns when nothing matched.
    pub fn filtered(mut self, filters: ResolvedFilters, generated: usize, filtered: usize) -> Self {
        self.filters = Some(filters);
        self.rows = RowCounts { generated, filtered };
        if filtered == 0 {
            self.notices
                .push(Notice::warning("No rows match the current filters."));
        }
        self
    }

    pub fn section(mut self, section: ViewSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Every visual on the page, in order.
    pub fn visuals(&self) -> impl Iterator<Item = &Visual> {
        self.sections.iter().flat_map(|s| s.visuals.iter())
    }

    /// The first visual with the given title.
    pub fn visual(&self, title: &str) -> Option<&Visual> {
        self.visuals().find(|v| v.title() == title)
    }
}
