use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::config::{BinSettings, FilterLinking};
use crate::data::filter::FilteredView;
use crate::data::model::Attribute;
use crate::data::selection::{BinCount, BinWidget, SpeciesSelection};
use crate::reactive::Input;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Sidebar – input widgets
// ---------------------------------------------------------------------------

/// Render the sidebar. Widgets only write inputs; the caller refreshes.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sidebar");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match state.config.species_filter {
                FilterLinking::Shared => {
                    species_checkboxes(ui, "Select a Species", &mut state.inputs.species, &state.color_map);
                }
                FilterLinking::PerChart => {
                    species_checkboxes(
                        ui,
                        "Select a Species (Scatterplot)",
                        &mut state.inputs.species,
                        &state.color_map,
                    );
                    ui.add_space(6.0);
                    species_checkboxes(
                        ui,
                        "Select a Species (Histogram)",
                        &mut state.inputs.histogram_species,
                        &state.color_map,
                    );
                }
            }
            ui.separator();

            attribute_combo(ui, &mut state.inputs.attribute);
            ui.add_space(6.0);

            bin_input(
                ui,
                "Histogram Bin Count",
                &mut state.inputs.histogram_bins,
                &state.config.histogram_bins,
            );
            if let Some(single) = &state.config.single_color_histogram {
                ui.add_space(6.0);
                bin_input(
                    ui,
                    "Bin Count (Single-Colour Histogram)",
                    &mut state.inputs.single_color_bins,
                    &single.bins,
                );
            }
        });
}

/// Checkbox group over the known species, each label in its chart colour.
fn species_checkboxes(
    ui: &mut Ui,
    label: &str,
    input: &mut Input<SpeciesSelection>,
    colors: &ColorMap,
) {
    ui.strong(label);
    for (name, color) in colors.legend_entries() {
        let mut checked = input.get().contains(name);
        if ui
            .checkbox(&mut checked, RichText::new(name).color(color))
            .changed()
        {
            input.update(|sel| sel.set(name, checked));
        }
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            input.set(SpeciesSelection::all());
        }
        if ui.small_button("None").clicked() {
            input.set(SpeciesSelection::default());
        }
    });
    if input.get().is_empty() {
        ui.weak("Nothing ticked: showing all species");
    }
}

fn attribute_combo(ui: &mut Ui, input: &mut Input<Attribute>) {
    ui.strong("Histogram Attribute");
    let current = *input.get();
    egui::ComboBox::from_id_salt("histogram_attribute")
        .selected_text(current.column())
        .show_ui(ui, |ui: &mut Ui| {
            for attr in Attribute::ALL {
                if ui.selectable_label(current == attr, attr.column()).clicked() {
                    input.set(attr);
                }
            }
        });
}

/// Slider or numeric field, per config. The widget range is the clamp.
fn bin_input(ui: &mut Ui, label: &str, input: &mut Input<BinCount>, settings: &BinSettings) {
    let bounds = settings.bounds();
    let mut n = input.get().get() as u32;

    ui.strong(label);
    let response = match settings.widget {
        BinWidget::Slider => ui.add(egui::Slider::new(&mut n, bounds.min()..=bounds.max())),
        BinWidget::Numeric => ui.add(egui::DragValue::new(&mut n).range(bounds.min()..=bounds.max())),
    };
    if response.changed() {
        input.set(bounds.clamp(i64::from(n)));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title, navigation tabs and record counts.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(&state.config.title);
        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Plots, "Plots");
        ui.selectable_value(&mut state.tab, Tab::Data, "Data");

        ui.separator();
        let loaded = state.dataset.len();
        let scatter_rows = state.scatter_view().map_or(0, FilteredView::len);
        match state.config.species_filter {
            FilterLinking::Shared => {
                ui.label(format!("{loaded} penguins loaded, {scatter_rows} visible"));
            }
            FilterLinking::PerChart => {
                let histogram_rows = state.histogram_view().map_or(0, FilteredView::len);
                ui.label(format!(
                    "{loaded} penguins loaded, {scatter_rows} in the scatterplot, {histogram_rows} in the histogram"
                ));
            }
        }
    });
}
