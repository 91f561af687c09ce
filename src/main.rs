use analytics::{BoxPlot, CategoryChart, PieChart, Table, Visual};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Cell as TableCell, Table as TextTable, presets::UTF8_FULL};
use configuration::{Config, Navigation, PageId};
use core_types::Dimension;
use pages::{FilterSelection, NoticeLevel, PageView};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use web_server::AppState;

/// The main entry point for the dealing dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;
    let _guard = web_server::telemetry::init(&config.logging)?;
    let navigation = load_navigation(&cli, &config)?;

    match cli.command {
        Commands::Serve(args) => handle_serve(args, config, navigation).await,
        Commands::Pages => {
            print_pages(&navigation);
            Ok(())
        }
        Commands::Report(args) => handle_report(args, &config, &navigation),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Interactive dealing analytics: broker flow, CDS execution quality and fills.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file. Defaults to `dashboard.toml` in the working directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Page list. Defaults to `navigation_file` from the settings, then `navigation.toml`.
    #[arg(long, global = true)]
    navigation: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP.
    Serve(ServeArgs),
    /// List the pages in the navigation menu.
    Pages,
    /// Render one page in the terminal.
    Report(ReportArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to listen on, e.g. 127.0.0.1:8080. Overrides `server.host`/`server.port`.
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Parser)]
struct ReportArgs {
    /// The page to render.
    #[arg(value_enum)]
    page: PageId,

    /// First date to include (format: YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last date to include (format: YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Restrict a dimension, e.g. `broker=JPM,UBS`. Repeatable. `sector=` selects nothing.
    #[arg(long = "select", value_parser = parse_select)]
    selections: Vec<(Dimension, Vec<String>)>,

    /// Rows shown per table.
    #[arg(long, default_value_t = 20)]
    limit: usize,

    /// Print the page as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

fn parse_select(raw: &str) -> Result<(Dimension, Vec<String>), String> {
    let (dimension, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected DIMENSION=VALUE[,VALUE...], got '{raw}'"))?;
    let dimension: Dimension = dimension.trim().parse().map_err(|e| format!("{e}"))?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok((dimension, values))
}

fn load_navigation(cli: &Cli, config: &Config) -> anyhow::Result<Navigation> {
    let path = cli
        .navigation
        .clone()
        .or_else(|| config.navigation_file.clone())
        .unwrap_or_else(|| PathBuf::from(configuration::NAVIGATION_FILE));
    configuration::load_navigation(&path)
        .with_context(|| format!("Failed to load navigation from {}", path.display()))
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, config: Config, navigation: Navigation) -> anyhow::Result<()> {
    let addr = match args.addr {
        Some(addr) => addr,
        None => config.server.addr()?,
    };
    tracing::info!("Generating datasets for {} pages...", PageId::ALL.len());
    let state = tokio::task::spawn_blocking(move || AppState::build(&config, navigation)).await??;
    web_server::run_server(addr, Arc::new(state)).await
}

fn print_pages(navigation: &Navigation) {
    let mut table = TextTable::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Section", "Page", "Path", "Description"]);
    for section in &navigation.sections {
        for entry in &section.pages {
            table.add_row(vec![
                format!("{} {}", section.icon, section.title),
                format!("{} {}", entry.icon, entry.title),
                format!("/{}", entry.path),
                entry.description.clone(),
            ]);
        }
    }
    println!("{}", navigation.title);
    println!("{table}");
}

fn handle_report(args: ReportArgs, config: &Config, navigation: &Navigation) -> anyhow::Result<()> {
    let page = pages::create_page(args.page, config, navigation)?;

    let mut selection = FilterSelection::new();
    selection.from = args.from;
    selection.to = args.to;
    for (dimension, values) in args.selections {
        selection = selection.select(dimension, values);
    }

    let view = page.render(&selection)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view, args.limit);
    }
    Ok(())
}

// ==============================================================================
// Terminal Output
// ==============================================================================

fn print_view(view: &PageView, limit: usize) {
    println!("\n=== {} ===", view.title);
    if let Some(filters) = &view.filters {
        if let Some((from, to)) = filters.date_range {
            println!("Dates: {from} to {to}");
        }
        for (dimension, values) in &filters.selected {
            println!("{}: {}", dimension.label(), values.join(", "));
        }
        println!(
            "{} of {} rows match the current filters.",
            view.rows.filtered, view.rows.generated
        );
    }
    for notice in &view.notices {
        let tag = match notice.level {
            NoticeLevel::Info => "INFO",
            NoticeLevel::Success => "OK",
            NoticeLevel::Warning => "WARN",
        };
        println!("[{tag}] {}", notice.message);
    }

    for section in &view.sections {
        println!("\n--- {} ---", section.heading);
        for paragraph in &section.paragraphs {
            println!("{paragraph}");
        }
        for link in &section.links {
            println!("  {} {} (/{}) {}", link.icon, link.title, link.path, link.description);
        }
        for visual in &section.visuals {
            println!("\n{}", visual.title());
            if visual.is_empty() {
                println!("(no data for the current filters)");
                continue;
            }
            let (table, total) = match visual {
                Visual::Table(t) => (table_of_table(t, limit), t.rows.len()),
                Visual::Chart(c) => (table_of_chart(c, limit), c.categories.len()),
                Visual::Pie(p) => (table_of_pie(p), p.slices.len()),
                Visual::BoxPlot(b) => (table_of_box_plot(b), b.groups.len()),
            };
            println!("{table}");
            if total > limit && matches!(visual, Visual::Table(_) | Visual::Chart(_)) {
                println!("... {} more rows", total - limit);
            }
        }
    }
}

fn text_table(header: Vec<String>) -> TextTable {
    let mut table = TextTable::new();
    table.load_preset(UTF8_FULL).set_header(header);
    table
}

fn table_of_table(t: &Table, limit: usize) -> TextTable {
    let mut table = text_table(t.columns.clone());
    for row in t.rows.iter().take(limit) {
        table.add_row(row.iter().map(|c| TableCell::new(c.to_string())));
    }
    table
}

fn table_of_chart(c: &CategoryChart, limit: usize) -> TextTable {
    let mut header = vec![c.x_label.clone()];
    header.extend(c.series.iter().map(|s| s.name.clone()));
    let mut table = text_table(header);
    for (i, category) in c.categories.iter().enumerate().take(limit) {
        let mut row = vec![category.clone()];
        row.extend(
            c.series
                .iter()
                .map(|s| s.values[i].map_or_else(String::new, |v| format!("{v:.2}"))),
        );
        table.add_row(row);
    }
    table
}

fn table_of_pie(p: &PieChart) -> TextTable {
    let mut table = text_table(vec![
        "Label".to_string(),
        "Value".to_string(),
        "Share %".to_string(),
        "Negative".to_string(),
    ]);
    for slice in &p.slices {
        table.add_row(vec![
            slice.label.clone(),
            format!("{:.2}", slice.value),
            format!("{:.1}", slice.share),
            slice.negative.to_string(),
        ]);
    }
    table
}

fn table_of_box_plot(b: &BoxPlot) -> TextTable {
    let mut table = text_table(
        [b.x_label.as_str(), "Count", "Min", "Q1", "Median", "Q3", "Max", "Outliers"]
            .map(|s| s.to_string())
            .to_vec(),
    );
    for g in &b.groups {
        table.add_row(vec![
            g.label.clone(),
            g.count.to_string(),
            format!("{:.2}", g.min),
            format!("{:.2}", g.q1),
            format!("{:.2}", g.median),
            format!("{:.2}", g.q3),
            format!("{:.2}", g.max),
            g.outliers.len().to_string(),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select() {
        let (dimension, values) = parse_select("asset_type=Rates, Credit").unwrap();
        assert_eq!(dimension, Dimension::AssetClass);
        assert_eq!(values, vec!["Rates", "Credit"]);

        let (dimension, values) = parse_select("sector=").unwrap();
        assert_eq!(dimension, Dimension::Sector);
        assert!(values.is_empty());

        assert!(parse_select("broker").is_err());
        assert!(parse_select("colour=red").is_err());
    }

    #[test]
    fn test_cli_parses_report_arguments() {
        let cli = Cli::try_parse_from([
            "dealing",
            "report",
            "best-brokers",
            "--from",
            "2024-02-01",
            "--select",
            "broker=JPM,UBS",
            "--select",
            "region=US",
        ])
        .unwrap();
        let Commands::Report(args) = cli.command else {
            panic!("expected the report command");
        };
        assert_eq!(args.page, PageId::BestBrokers);
        assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(args.selections.len(), 2);
        assert_eq!(args.limit, 20);
    }
}
