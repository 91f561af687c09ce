//! Chart visuals drawn to SVG strings with `plotters`.
//!
//! Category axes use a float coordinate where category `i` sits at `x = i`, so bars
//! span `i - 0.5..i + 0.5` and mesh labels land on whole numbers.

use crate::error::AppError;
use analytics::{BoxPlot, CategoryChart, ChartKind, PieChart, PieSlice};
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt::Display;

const SIZE: (u32, u32) = (640, 320);
const PIE_SIZE: (u32, u32) = (420, 320);
/// Upper bound on mesh labels along a category axis; only whole positions get text.
const MAX_X_LABELS: usize = 12;

const PALETTE: [RGBColor; 8] = [
    RGBColor(0x1f, 0x77, 0xb4),
    RGBColor(0xff, 0x7f, 0x0e),
    RGBColor(0x2c, 0xa0, 0x2c),
    RGBColor(0xd6, 0x27, 0x28),
    RGBColor(0x94, 0x67, 0xbd),
    RGBColor(0x8c, 0x56, 0x4b),
    RGBColor(0xe3, 0x77, 0xc2),
    RGBColor(0x7f, 0x7f, 0x7f),
];

pub fn color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// CSS hex form of [`color`], for HTML legends.
pub fn css_color(index: usize) -> String {
    let RGBColor(r, g, b) = color(index);
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn float(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn chart_error<E: Display>(error: E) -> AppError {
    AppError::Chart(error.to_string())
}

/// Widens a value range so nothing is drawn on the frame.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 1.0, hi + 1.0)
    } else {
        let pad = (hi - lo) * 0.05;
        (lo - pad, hi + pad)
    }
}

/// The category at a mesh position, or nothing between categories.
fn category_label(categories: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

fn draw_svg(
    size: (u32, u32),
    draw: impl FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> Result<(), AppError>,
) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;
        draw(&root)?;
        root.present().map_err(chart_error)?;
    }
    Ok(svg)
}

/// Grouped bars or lines, one colour per series.
pub fn category_chart(chart: &CategoryChart) -> Result<String, AppError> {
    let (lo, hi) = chart
        .value_range()
        .map_or((0.0, 1.0), |(lo, hi)| (float(lo), float(hi)));
    // Bars grow from zero, so zero must be on the axis.
    let (lo, hi) = match chart.kind {
        ChartKind::Bar => padded(lo.min(0.0), hi.max(0.0)),
        ChartKind::Line => padded(lo, hi),
    };
    let count = chart.categories.len();

    draw_svg(SIZE, |root| {
        let mut ctx = ChartBuilder::on(root)
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(-0.5..count as f64 - 0.5, lo..hi)
            .map_err(chart_error)?;
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(MAX_X_LABELS)
            .x_label_formatter(&|x| category_label(&chart.categories, *x))
            .y_label_formatter(&|y| format!("{y:.2}"))
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(chart_error)?;

        let (plot_width, _) = ctx.plotting_area().dim_in_pixel();
        let band = f64::from(plot_width) / count.max(1) as f64;
        let bar = band * 0.8 / chart.series.len().max(1) as f64;

        for (s, series) in chart.series.iter().enumerate() {
            let style = color(s).filled();
            match chart.kind {
                ChartKind::Bar => {
                    let left = (band * 0.1 + s as f64 * bar) as u32;
                    let right = (band * 0.9 - (s + 1) as f64 * bar).max(0.0) as u32;
                    let bars = series.values.iter().enumerate().filter_map(|(i, value)| {
                        let value = float((*value)?);
                        let x = i as f64;
                        let mut rect = Rectangle::new([(x - 0.5, 0.0), (x + 0.5, value)], style);
                        rect.set_margin(0, 0, left, right);
                        Some(rect)
                    });
                    ctx.draw_series(bars)
                        .map_err(chart_error)?
                        .label(series.name.as_str())
                        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], style));
                }
                ChartKind::Line => {
                    // Missing values break the line.
                    let runs = series
                        .values
                        .iter()
                        .enumerate()
                        .collect::<Vec<_>>()
                        .split(|(_, value)| value.is_none())
                        .filter(|run| !run.is_empty())
                        .map(|run| {
                            run.iter()
                                .filter_map(|(i, value)| Some((*i as f64, float((**value)?))))
                                .collect::<Vec<_>>()
                        })
                        .collect::<Vec<_>>();
                    for (r, run) in runs.into_iter().enumerate() {
                        let line = LineSeries::new(run, color(s).stroke_width(2)).point_size(2);
                        let anno = ctx.draw_series(line).map_err(chart_error)?;
                        if r == 0 {
                            anno.label(series.name.as_str()).legend(move |(x, y)| {
                                PathElement::new(vec![(x, y), (x + 16, y)], style)
                            });
                        }
                    }
                }
            }
        }

        if chart.series.len() > 1 {
            ctx.configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(chart_error)?;
        }
        Ok(())
    })
}

/// Legend text for a slice. Magnitudes of net-negative totals say so.
pub fn slice_label(slice: &PieSlice) -> String {
    let sign = if slice.negative { " (net negative)" } else { "" };
    format!("{}: {}%{sign}", slice.label, slice.share)
}

pub fn pie_chart(pie: &PieChart) -> Result<String, AppError> {
    let sizes: Vec<f64> = pie.slices.iter().map(|s| float(s.value)).collect();
    let colors: Vec<RGBColor> = (0..sizes.len()).map(color).collect();
    let labels: Vec<String> = pie.slices.iter().map(|s| s.label.clone()).collect();

    draw_svg(PIE_SIZE, |root| {
        let (width, height) = root.dim_in_pixel();
        let center = (width as i32 / 2, height as i32 / 2);
        let radius = f64::from(height) * 0.36;
        let mut chart = Pie::new(
            &center,
            &radius,
            sizes.as_slice(),
            colors.as_slice(),
            labels.as_slice(),
        );
        chart.start_angle(-90.0);
        root.draw(&chart).map_err(chart_error)
    })
}

/// Boxes span the quartiles; whiskers end at the furthest points within 1.5 IQR.
pub fn box_plot(plot: &BoxPlot) -> Result<String, AppError> {
    let (lo, hi) = plot
        .value_range()
        .map_or((0.0, 1.0), |(lo, hi)| (float(lo), float(hi)));
    let (lo, hi) = padded(lo, hi);
    let labels: Vec<String> = plot.groups.iter().map(|g| g.label.clone()).collect();
    let count = labels.len();

    draw_svg(SIZE, |root| {
        let mut ctx = ChartBuilder::on(root)
            .margin(12)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(-0.5..count as f64 - 0.5, lo..hi)
            .map_err(chart_error)?;
        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(MAX_X_LABELS)
            .x_label_formatter(&|x| category_label(&labels, *x))
            .y_label_formatter(&|y| format!("{y:.2}"))
            .x_desc(plot.x_label.as_str())
            .y_desc(plot.y_label.as_str())
            .draw()
            .map_err(chart_error)?;

        let half = 0.25;
        ctx.draw_series(plot.groups.iter().enumerate().map(|(i, g)| {
            let x = i as f64;
            Rectangle::new(
                [(x - half, float(g.q1)), (x + half, float(g.q3))],
                color(i).mix(0.6).filled(),
            )
        }))
        .map_err(chart_error)?;

        ctx.draw_series(plot.groups.iter().enumerate().flat_map(|(i, g)| {
            let x = i as f64;
            let (low, q1, median) = (float(g.whisker_low), float(g.q1), float(g.median));
            let (q3, high) = (float(g.q3), float(g.whisker_high));
            [
                PathElement::new(vec![(x, low), (x, q1)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x, q3), (x, high)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x - half / 2.0, low), (x + half / 2.0, low)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x - half / 2.0, high), (x + half / 2.0, high)], BLACK.stroke_width(1)),
                PathElement::new(vec![(x - half, median), (x + half, median)], BLACK.stroke_width(2)),
                PathElement::new(
                    vec![(x - half, q1), (x + half, q1), (x + half, q3), (x - half, q3), (x - half, q1)],
                    BLACK.stroke_width(1),
                ),
            ]
        }))
        .map_err(chart_error)?;

        ctx.draw_series(plot.groups.iter().enumerate().flat_map(|(i, g)| {
            g.outliers
                .iter()
                .map(move |v| Circle::new((i as f64, float(*v)), 3, BLACK.stroke_width(1)))
        }))
        .map_err(chart_error)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::Series;
    use rust_decimal_macros::dec;

    fn bars() -> CategoryChart {
        let mut chart = CategoryChart::new(
            ChartKind::Bar,
            "Bars",
            vec!["Alpha".to_string(), "Beta".to_string()],
        );
        chart.series.push(Series {
            name: "first".to_string(),
            values: vec![Some(dec!(1.5)), None],
        });
        chart.series.push(Series {
            name: "second".to_string(),
            values: vec![Some(dec!(-2)), Some(dec!(3))],
        });
        chart
    }

    #[test]
    fn test_category_label_only_on_whole_positions() {
        let categories = vec!["A".to_string(), "B".to_string()];
        assert_eq!(category_label(&categories, 1.0), "B");
        assert_eq!(category_label(&categories, 0.5), "");
        assert_eq!(category_label(&categories, 2.0), "");
        assert_eq!(category_label(&categories, -1.0), "");
    }

    #[test]
    fn test_bar_chart_is_an_svg_with_a_legend() {
        let svg = category_chart(&bars()).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("first"));
        assert!(svg.contains("second"));
    }

    #[test]
    fn test_line_chart_with_gaps_renders() {
        let mut chart = bars();
        chart.kind = ChartKind::Line;
        chart.series[1].values = vec![None, Some(dec!(3))];
        let svg = category_chart(&chart).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_single_slice_pie_renders() {
        let pie = PieChart::from_totals("Share", vec![("JPM".to_string(), dec!(-4))]);
        let svg = pie_chart(&pie).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_slice_label_marks_negative_totals() {
        let pie = PieChart::from_totals(
            "Share",
            vec![("JPM".to_string(), dec!(-3)), ("UBS".to_string(), dec!(1))],
        );
        assert_eq!(slice_label(&pie.slices[0]), "JPM: 75.0% (net negative)");
        assert_eq!(slice_label(&pie.slices[1]), "UBS: 25.0%");
    }

    #[test]
    fn test_box_plot_renders_each_group() {
        let plot = BoxPlot::from_groups(
            "Spread",
            "Broker",
            "Slippage",
            vec![
                ("JPM".to_string(), vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(40)]),
                ("MS".to_string(), vec![dec!(-1), dec!(0), dec!(1)]),
            ],
        );
        let svg = box_plot(&plot).unwrap();
        assert!(svg.contains("JPM"));
        assert!(svg.contains("MS"));
        assert!(svg.contains("<circle"));
    }
}
