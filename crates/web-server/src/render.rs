//! Server-side HTML for the dashboard: a sidebar menu, the filter form, tables and
//! the SVG charts from [`crate::charts`]. No scripts; the filter form is a plain GET
//! form.

use crate::charts;
use crate::error::AppError;
use analytics::{Cell, Table, Visual};
use configuration::Navigation;
use pages::{Control, FilterPanel, Notice, NoticeLevel, PageView, Placement, ResolvedFilters, ViewSection};

/// Longer tables are cut off in HTML; the JSON API always has every row.
pub const MAX_TABLE_ROWS: usize = 200;

const STYLE: &str = "\
body{margin:0;display:flex;font-family:system-ui,sans-serif;color:#222}\
nav.sidebar{width:260px;min-height:100vh;padding:1rem;background:#f4f5f7;box-sizing:border-box}\
nav.sidebar a{color:#1f4e8c;text-decoration:none}nav.sidebar a.active{font-weight:bold}\
nav.sidebar ul{list-style:none;padding-left:.5rem}main{flex:1;padding:1rem 2rem;overflow-x:auto}\
fieldset{border:1px solid #ccd;margin:.5rem 0}fieldset label{display:block}\
table{border-collapse:collapse;margin:.5rem 0;font-size:.9rem}caption{text-align:left;font-weight:bold}\
th,td{border:1px solid #dde;padding:.2rem .5rem}td.num{text-align:right}\
.notice{padding:.5rem 1rem;margin:.5rem 0;border-radius:4px}.info{background:#e7f0fb}\
.success{background:#e6f4ea}.warning{background:#fdf3d8}.empty{color:#777;font-style:italic}\
figure{margin:1rem 0}figcaption{font-weight:bold}ul.legend{list-style:none;padding:0}\
ul.legend span{display:inline-block;width:.8rem;height:.8rem;margin-right:.3rem}";

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ==============================================================================
// Page Layout
// ==============================================================================

fn menu(navigation: &Navigation, active: Option<&str>) -> String {
    let mut html = format!(
        r#"<a href="/" class="{}"><h2>{}</h2></a>"#,
        if active.is_none() { "active" } else { "" },
        escape(&navigation.title)
    );
    for section in &navigation.sections {
        html.push_str(&format!(
            "<h3>{} {}</h3><ul>",
            escape(&section.icon),
            escape(&section.title)
        ));
        for entry in &section.pages {
            let class = if active == Some(entry.path.as_str()) { "active" } else { "" };
            html.push_str(&format!(
                r#"<li><a href="/{}" class="{class}">{} {}</a></li>"#,
                escape(&entry.path),
                escape(&entry.icon),
                escape(&entry.title)
            ));
        }
        html.push_str("</ul>");
    }
    html
}

fn document(navigation: &Navigation, active: Option<&str>, title: &str, sidebar: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\">\
         <title>{title} | {site}</title><style>{STYLE}</style></head>\n\
         <body><nav class=\"sidebar\">{menu}{sidebar}</nav>\n<main><h1>{title}</h1>\n{body}</main></body>\n</html>\n",
        title = escape(title),
        site = escape(&navigation.title),
        menu = menu(navigation, active),
    )
}

fn notice(notice: &Notice) -> String {
    let class = match notice.level {
        NoticeLevel::Info => "info",
        NoticeLevel::Success => "success",
        NoticeLevel::Warning => "warning",
    };
    format!(r#"<div class="notice {class}">{}</div>"#, escape(&notice.message))
}

fn section(section: &ViewSection) -> Result<String, AppError> {
    let mut html = format!("<section><h2>{}</h2>", escape(&section.heading));
    for paragraph in &section.paragraphs {
        html.push_str(&format!("<p>{}</p>", escape(paragraph)));
    }
    if !section.links.is_empty() {
        html.push_str("<ul>");
        for link in &section.links {
            html.push_str(&format!(
                r#"<li><a href="/{}">{} {}</a>"#,
                escape(&link.path),
                escape(&link.icon),
                escape(&link.title)
            ));
            if !link.description.is_empty() {
                html.push_str(&format!(": {}", escape(&link.description)));
            }
            html.push_str("</li>");
        }
        html.push_str("</ul>");
    }
    for v in &section.visuals {
        html.push_str(&visual(v)?);
    }
    html.push_str("</section>\n");
    Ok(html)
}

/// The landing page.
pub fn home(navigation: &Navigation, view: &PageView) -> Result<String, AppError> {
    let body = view.sections.iter().map(section).collect::<Result<String, _>>()?;
    Ok(document(navigation, None, &view.title, "", &body))
}

/// A dashboard page with its filter form, notices and sections.
pub fn page(
    navigation: &Navigation,
    path: &str,
    panel: &FilterPanel,
    view: &PageView,
) -> Result<String, AppError> {
    let form = filter_form(panel, view.filters.as_ref());
    let (sidebar, inline) = match panel.placement {
        Placement::Sidebar => (form, String::new()),
        Placement::Inline => (
            String::new(),
            format!(
                "<details open><summary>{}</summary>{form}</details>",
                escape(&panel.header)
            ),
        ),
    };

    let mut body = inline;
    body.extend(view.notices.iter().map(notice));
    if view.filters.is_some() {
        body.push_str(&format!(
            r#"<p class="rows">{} of {} rows match the current filters.</p>"#,
            view.rows.filtered, view.rows.generated
        ));
    }
    for s in &view.sections {
        body.push_str(&section(s)?);
    }
    Ok(document(navigation, Some(path), &view.title, &sidebar, &body))
}

// ==============================================================================
// Filter Form
// ==============================================================================

fn filter_form(panel: &FilterPanel, resolved: Option<&ResolvedFilters>) -> String {
    if panel.controls.is_empty() {
        return String::new();
    }
    let mut html = format!(
        r#"<form method="get" class="filters"><h3>{}</h3><input type="hidden" name="submitted" value="1">"#,
        escape(&panel.header)
    );
    for control in &panel.controls {
        match control {
            Control::DateRange { label, min, max, .. } => {
                let (from, to) = resolved
                    .and_then(|r| r.date_range)
                    .unwrap_or((*min, *max));
                html.push_str(&format!(
                    "<fieldset><legend>{}</legend>\
                     <label>From <input type=\"date\" name=\"from\" min=\"{min}\" max=\"{max}\" value=\"{from}\"></label>\
                     <label>To <input type=\"date\" name=\"to\" min=\"{min}\" max=\"{max}\" value=\"{to}\"></label>\
                     </fieldset>",
                    escape(label)
                ));
            }
            Control::MultiSelect {
                key,
                label,
                dimension,
                options,
            } => {
                html.push_str(&format!("<fieldset><legend>{}</legend>", escape(label)));
                for option in options {
                    let checked = resolved.is_none_or(|r| r.selected(*dimension).contains(option));
                    html.push_str(&format!(
                        r#"<label><input type="checkbox" name="{}" value="{}"{}> {}</label>"#,
                        escape(key),
                        escape(option),
                        if checked { " checked" } else { "" },
                        escape(option)
                    ));
                }
                html.push_str("</fieldset>");
            }
        }
    }
    html.push_str(r#"<button type="submit">Apply</button></form>"#);
    html
}

// ==============================================================================
// Visuals
// ==============================================================================

fn visual(visual: &Visual) -> Result<String, AppError> {
    if visual.is_empty() {
        return Ok(format!(
            r#"<figure><figcaption>{}</figcaption><p class="empty">No data for the current filters.</p></figure>"#,
            escape(visual.title())
        ));
    }
    let html = match visual {
        Visual::Table(t) => table(t),
        Visual::Chart(c) => figure(&c.title, &charts::category_chart(c)?, ""),
        Visual::Pie(p) => figure(
            &p.title,
            &charts::pie_chart(p)?,
            &legend(p.slices.iter().map(charts::slice_label)),
        ),
        Visual::BoxPlot(b) => figure(&b.title, &charts::box_plot(b)?, ""),
    };
    Ok(html)
}

fn table(table: &Table) -> String {
    let mut html = format!("<table><caption>{}</caption><thead><tr>", escape(&table.title));
    for column in &table.columns {
        html.push_str(&format!("<th>{}</th>", escape(column)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in table.rows.iter().take(MAX_TABLE_ROWS) {
        html.push_str("<tr>");
        for cell in row {
            let class = match cell {
                Cell::Int(_) | Cell::Decimal(_) => r#" class="num""#,
                _ => "",
            };
            html.push_str(&format!("<td{class}>{}</td>", escape(&cell.to_string())));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    if table.rows.len() > MAX_TABLE_ROWS {
        html.push_str(&format!(
            r#"<p class="empty">Showing the first {MAX_TABLE_ROWS} of {} rows.</p>"#,
            table.rows.len()
        ));
    }
    html
}

fn legend(entries: impl IntoIterator<Item = String>) -> String {
    let mut html = String::from(r#"<ul class="legend">"#);
    for (i, entry) in entries.into_iter().enumerate() {
        html.push_str(&format!(
            r#"<li><span style="background:{}"></span>{}</li>"#,
            charts::css_color(i),
            escape(&entry)
        ));
    }
    html.push_str("</ul>");
    html
}

fn figure(title: &str, svg: &str, legend: &str) -> String {
    format!(
        "<figure><figcaption>{}</figcaption>{svg}{legend}</figure>",
        escape(title)
    )
}
