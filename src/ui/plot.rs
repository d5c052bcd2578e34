use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Points};

use crate::color::{BASE_COLOR, ColorMap};
use crate::data::chart::{Histogram, Scatter};

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

pub fn histogram_plot(ui: &mut Ui, hist: &Histogram) {
    ui.strong(hist.title.as_str());

    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.1} – {:.1}", b.start, b.end))
        })
        .collect();

    Plot::new("histogram")
        .height(380.0)
        .x_axis_label(hist.column.clone())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BASE_COLOR).name(&hist.column));
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Render the scatter. With a log Y axis the points are placed at `log10(y)`
/// and the tick labels are mapped back.
pub fn scatter_plot(ui: &mut Ui, scatter: &Scatter) {
    ui.strong(scatter.title.as_str());

    let colors = scatter
        .color_column
        .as_ref()
        .map(|_| ColorMap::new(scatter.series.iter().map(|s| s.label.as_str())));
    let log_y = scatter.log_y;
    let plot_y = move |y: f64| if log_y { y.log10() } else { y };
    let spans = data_spans(scatter, plot_y);

    let y_label = if log_y {
        format!("{} (log scale)", scatter.y_column)
    } else {
        scatter.y_column.clone()
    };

    let mut plot = Plot::new("scatter")
        .height(420.0)
        .legend(Legend::default())
        .x_axis_label(scatter.x_column.clone())
        .y_axis_label(y_label)
        .label_formatter(move |name, value| hover_text(scatter, name, value, spans, plot_y));
    if log_y {
        plot = plot.y_axis_formatter(|mark, _range| format_log_tick(mark.value));
    }

    plot.show(ui, |plot_ui| {
        for series in &scatter.series {
            let color = colors
                .as_ref()
                .map(|m| m.color_for(&series.label))
                .unwrap_or(BASE_COLOR);
            let points: PlotPoints = series
                .points
                .iter()
                .map(|p| [p.x, plot_y(p.y)])
                .collect();
            plot_ui.points(
                Points::new(points)
                    .radius(2.5)
                    .color(color.gamma_multiply(0.7))
                    .name(&series.label),
            );
        }
    });
}

/// Width and height of the plotted data, used to weigh hover distances.
fn data_spans(scatter: &Scatter, plot_y: impl Fn(f64) -> f64) -> (f64, f64) {
    let mut x_range = (f64::INFINITY, f64::NEG_INFINITY);
    let mut y_range = (f64::INFINITY, f64::NEG_INFINITY);
    for p in scatter.series.iter().flat_map(|s| &s.points) {
        let y = plot_y(p.y);
        x_range = (x_range.0.min(p.x), x_range.1.max(p.x));
        y_range = (y_range.0.min(y), y_range.1.max(y));
    }
    let span = |(lo, hi): (f64, f64)| if hi > lo { hi - lo } else { 1.0 };
    (span(x_range), span(y_range))
}

/// Hover label: the point's coordinates plus its extra columns.
fn hover_text(
    scatter: &Scatter,
    series_name: &str,
    value: &PlotPoint,
    (x_span, y_span): (f64, f64),
    plot_y: impl Fn(f64) -> f64,
) -> String {
    let shown_y = if scatter.log_y {
        10f64.powf(value.y)
    } else {
        value.y
    };
    let coords = format!(
        "{}: {:.2}\n{}: {:.2}",
        scatter.x_column, value.x, scatter.y_column, shown_y
    );
    let Some(series) = scatter.series.iter().find(|s| s.label == series_name) else {
        return coords;
    };

    let distance = |x: f64, y: f64| {
        let dx = (x - value.x) / x_span;
        let dy = (plot_y(y) - value.y) / y_span;
        dx * dx + dy * dy
    };
    let nearest = series.points.iter().min_by(|a, b| {
        distance(a.x, a.y)
            .partial_cmp(&distance(b.x, b.y))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    match nearest {
        Some(p) if !p.hover.is_empty() => format!("{series_name}\n{coords}\n{}", p.hover),
        _ => format!("{series_name}\n{coords}"),
    }
}

fn format_log_tick(exponent: f64) -> String {
    let value = 10f64.powf(exponent);
    if value >= 1.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}
