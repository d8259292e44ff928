use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::render::{Histogram, ScatterPlot};

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

/// Draw a scatter description, one legend entry per species.
pub fn scatter_plot(ui: &mut Ui, id: &str, plot: &ScatterPlot, height: f32) {
    if let Some(title) = &plot.title {
        ui.label(title);
    }

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(plot.x.label())
        .y_axis_label(plot.y.label())
        .height(height)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &plot.series {
                let points: PlotPoints = series.points.iter().copied().collect();
                plot_ui.points(
                    Points::new(points)
                        .name(series.species.as_str())
                        .color(series.color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Draw a histogram description; multiple series are stacked.
pub fn histogram_plot(ui: &mut Ui, id: &str, hist: &Histogram, y_label: &str, height: f32) {
    if hist.excluded > 0 {
        ui.weak(format!("{} records without {} not shown", hist.excluded, hist.attribute));
    }

    let width = hist.bin_width();
    let centers = hist.centers();

    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.series.len());
    for series in &hist.series {
        let bars: Vec<Bar> = centers
            .iter()
            .zip(&series.counts)
            .map(|(&x, &count)| Bar::new(x, count as f64).width(width))
            .collect();
        let below: Vec<&BarChart> = charts.iter().collect();
        let chart = BarChart::new(bars)
            .name(&series.label)
            .color(series.color)
            .stack_on(&below);
        charts.push(chart);
    }

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(hist.attribute.column())
        .y_axis_label(y_label)
        .height(height)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}
