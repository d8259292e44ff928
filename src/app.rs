use eframe::egui::{self, ScrollArea, Ui};

use crate::config::{Layout, SidebarSide};
use crate::data::filter::FilteredView;
use crate::render::Histogram;
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinDashApp {
    pub state: AppState,
}

impl PenguinDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PenguinDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title, tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Side panel: inputs ----
        let side = match self.state.config.sidebar {
            SidebarSide::Left => egui::SidePanel::left("sidebar"),
            SidebarSide::Right => egui::SidePanel::right("sidebar"),
        };
        side.default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // Inputs written above invalidate their dependents here.
        self.state.refresh();

        // ---- Central panel: charts or tables ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Plots => plots_tab(ui, &self.state),
            Tab::Data => data_tab(ui, &mut self.state),
        });
    }
}

/// Titled frame around one output.
fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong(title);
        ui.separator();
        add_contents(ui);
    });
}

fn plots_tab(ui: &mut Ui, state: &AppState) {
    let single = state
        .single_color_histogram()
        .zip(state.config.single_color_histogram.as_ref());

    match state.config.layout {
        Layout::Stacked => {
            ScrollArea::vertical().show(ui, |ui: &mut Ui| {
                let height = 320.0;
                if let Some((hist, settings)) = single {
                    single_color_card(ui, hist, &settings.title, height);
                }
                if let Some(hist) = state.histogram() {
                    histogram_card(ui, hist, height);
                }
                scatter_card(ui, state, height);
            });
        }
        Layout::Grid => {
            let height = (ui.available_height() / 2.0 - 80.0).max(160.0);
            ui.columns(2, |cols: &mut [Ui]| {
                if let Some(hist) = state.histogram() {
                    histogram_card(&mut cols[0], hist, height);
                }
                scatter_card(&mut cols[1], state, height);
                if let Some((hist, settings)) = single {
                    single_color_card(&mut cols[0], hist, &settings.title, height);
                }
            });
        }
    }
}

fn histogram_card(ui: &mut Ui, hist: &Histogram, height: f32) {
    card(ui, "Histogram", |ui| {
        plot::histogram_plot(ui, "histogram", hist, "count", height);
        binned_caption(ui, hist);
    });
}

fn single_color_card(ui: &mut Ui, hist: &Histogram, title: &str, height: f32) {
    card(ui, "Single-Colour Histogram", |ui| {
        ui.label(title);
        plot::histogram_plot(ui, "single_color_histogram", hist, "Count", height);
        binned_caption(ui, hist);
    });
}

fn binned_caption(ui: &mut Ui, hist: &Histogram) {
    ui.weak(format!("{} values in {} bins", hist.total(), hist.bin_count()));
}

fn scatter_card(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(scatter) = state.scatter() else {
        return;
    };
    card(ui, "Scatterplot", |ui| {
        if state.scatter_view().is_some_and(FilteredView::is_empty) {
            ui.weak("No penguins match the selected species");
        }
        plot::scatter_plot(ui, "scatterplot", scatter, height);
        ui.weak(format!(
            "{} points, {} records without both values",
            scatter.point_count(),
            scatter.omitted
        ));
    });
}

fn data_tab(ui: &mut Ui, state: &mut AppState) {
    let height = (ui.available_height() / 2.0 - 50.0).max(120.0);

    if let Some(view) = state.table() {
        card(ui, "Data Table", |ui| table::data_table(ui, view, height));
    }
    card(ui, "Data Grid", |ui| table::data_grid(ui, state, height));
}
