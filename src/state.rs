use std::sync::Arc;

use eframe::egui::Color32;

use crate::color::{ColorMap, parse_color};
use crate::config::{ConfigError, DashboardConfig, FilterLinking, TableSource};
use crate::data::filter::{FilteredView, filter_species};
use crate::data::model::{Attribute, PenguinDataset};
use crate::data::selection::{BinCount, GridSort, SpeciesSelection};
use crate::reactive::{Calc, Input, Phase, Version};
use crate::render::{self, Histogram, ScatterPlot, TableView};

// ---------------------------------------------------------------------------
// Widget inputs
// ---------------------------------------------------------------------------

/// Current values of every sidebar / grid widget.
pub struct Inputs {
    /// Species checkboxes feeding the scatter plot (and everything else when
    /// the filter is shared).
    pub species: Input<SpeciesSelection>,
    /// Histogram-only species checkboxes; read only with per-chart filters.
    pub histogram_species: Input<SpeciesSelection>,
    pub attribute: Input<Attribute>,
    pub histogram_bins: Input<BinCount>,
    pub single_color_bins: Input<BinCount>,
    pub grid_sort: Input<Option<GridSort>>,
}

impl Inputs {
    fn new(config: &DashboardConfig) -> Self {
        let single_color_bins = config
            .single_color_histogram
            .as_ref()
            .map(|h| h.bins.initial())
            .unwrap_or_else(|| config.histogram_bins.initial());
        Inputs {
            species: Input::new(SpeciesSelection::all()),
            histogram_species: Input::new(SpeciesSelection::all()),
            attribute: Input::new(config.default_attribute),
            histogram_bins: Input::new(config.histogram_bins.initial()),
            single_color_bins: Input::new(single_color_bins),
            grid_sort: Input::new(None),
        }
    }
}

/// Navigation tabs of the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Plots,
    Data,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded once at startup, shared read-only by every view.
    pub dataset: Arc<PenguinDataset>,

    pub color_map: ColorMap,
    single_color: Color32,

    pub inputs: Inputs,
    pub tab: Tab,
    /// `Recomputing` only inside [`AppState::refresh`]; panels always see `Idle`.
    pub phase: Phase,

    full_view: FilteredView,
    scatter_view: Calc<Version, FilteredView>,
    histogram_view: Calc<Version, FilteredView>,
    scatter: Calc<Version, ScatterPlot>,
    histogram: Calc<(Version, Version, Version), Histogram>,
    single_color_histogram: Calc<(Version, Version, Version), Histogram>,
    table: Calc<Version, TableView>,
    grid: Calc<(Version, Version), TableView>,
}

impl AppState {
    pub fn new(config: DashboardConfig, dataset: Arc<PenguinDataset>) -> Result<Self, ConfigError> {
        let color_map = ColorMap::from_scheme(&config.colors)?;
        let single_color = match &config.single_color_histogram {
            Some(h) => parse_color(&h.color)?,
            None => Color32::LIGHT_BLUE,
        };

        let mut state = AppState {
            inputs: Inputs::new(&config),
            full_view: FilteredView::full(Arc::clone(&dataset)),
            config,
            dataset,
            color_map,
            single_color,
            tab: Tab::Plots,
            phase: Phase::Idle,
            scatter_view: Calc::new("filtered_data_scatterplot"),
            histogram_view: Calc::new("filtered_data_histogram"),
            scatter: Calc::new("scatterplot"),
            histogram: Calc::new("histogram"),
            single_color_histogram: Calc::new("single_color_histogram"),
            table: Calc::new("data_table"),
            grid: Calc::new("data_grid"),
        };
        state.refresh();
        Ok(state)
    }

    /// Bring every derived view up to date with the current inputs.
    ///
    /// Calcs whose upstream stamps did not move keep their cached value.
    /// Returns how many calcs were recomputed.
    pub fn refresh(&mut self) -> usize {
        self.set_phase(Phase::Recomputing);
        let mut recomputed = 0;
        let dataset = &self.dataset;

        // ---- Filter calculations ----
        let species = &self.inputs.species;
        recomputed += usize::from(
            self.scatter_view
                .refresh(species.version(), || filter_species(dataset, species.get())),
        );

        let histogram_species = match self.config.species_filter {
            FilterLinking::Shared => &self.inputs.species,
            FilterLinking::PerChart => &self.inputs.histogram_species,
        };
        recomputed += usize::from(self.histogram_view.refresh(histogram_species.version(), || {
            filter_species(dataset, histogram_species.get())
        }));

        // ---- Render calculations ----
        if let Some(view) = self.scatter_view.get() {
            let (x, y) = (self.config.scatter.x, self.config.scatter.y);
            let colors = &self.color_map;
            let title = self.config.scatter.title.as_deref();
            recomputed += usize::from(
                self.scatter
                    .refresh(self.scatter_view.revision(), || render::scatter(view, x, y, colors, title)),
            );
        }

        if let Some(view) = self.histogram_view.get() {
            let attribute = *self.inputs.attribute.get();
            let colors = &self.color_map;

            let bins = *self.inputs.histogram_bins.get();
            let key = (
                self.histogram_view.revision(),
                self.inputs.attribute.version(),
                self.inputs.histogram_bins.version(),
            );
            recomputed += usize::from(
                self.histogram
                    .refresh(key, || render::histogram(view, attribute, bins, colors)),
            );

            if self.config.single_color_histogram.is_some() {
                let bins = *self.inputs.single_color_bins.get();
                let color = self.single_color;
                let key = (
                    self.histogram_view.revision(),
                    self.inputs.attribute.version(),
                    self.inputs.single_color_bins.version(),
                );
                recomputed += usize::from(self.single_color_histogram.refresh(key, || {
                    render::single_color_histogram(view, attribute, bins, color)
                }));
            }
        }

        // ---- Tables ----
        let (table_source, table_key) = match self.config.tables {
            TableSource::Full => (Some(&self.full_view), 0),
            TableSource::Filtered => (self.scatter_view.get(), self.scatter_view.revision()),
        };
        if let Some(view) = table_source {
            recomputed += usize::from(self.table.refresh(table_key, || render::table(view, None)));

            let sort = *self.inputs.grid_sort.get();
            recomputed += usize::from(
                self.grid
                    .refresh((table_key, self.inputs.grid_sort.version()), || render::table(view, sort)),
            );
        }

        if recomputed > 0 {
            log::debug!(
                "refresh recomputed {recomputed} calcs ({} scatter rows, {} histogram rows)",
                self.scatter_view.get().map_or(0, FilteredView::len),
                self.histogram_view.get().map_or(0, FilteredView::len),
            );
        }
        self.set_phase(Phase::Idle);
        recomputed
    }

    /// Runs every frame, so transitions log at trace level.
    fn set_phase(&mut self, next: Phase) {
        log::trace!("phase {:?} -> {next:?}", self.phase);
        self.phase = next;
    }

    // -- Derived views, valid after `refresh` --

    pub fn scatter_view(&self) -> Option<&FilteredView> {
        self.scatter_view.get()
    }

    pub fn histogram_view(&self) -> Option<&FilteredView> {
        self.histogram_view.get()
    }

    pub fn scatter(&self) -> Option<&ScatterPlot> {
        self.scatter.get()
    }

    pub fn histogram(&self) -> Option<&Histogram> {
        self.histogram.get()
    }

    /// `None` when the variant has no single-colour histogram.
    pub fn single_color_histogram(&self) -> Option<&Histogram> {
        self.config
            .single_color_histogram
            .as_ref()
            .and(self.single_color_histogram.get())
    }

    pub fn table(&self) -> Option<&TableView> {
        self.table.get()
    }

    pub fn grid(&self) -> Option<&TableView> {
        self.grid.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::data::model::tests::penguin;
    use crate::data::model::{Column, Species};
    use crate::data::selection::BinBounds;

    fn dataset() -> Arc<PenguinDataset> {
        Arc::new(PenguinDataset::new(vec![
            penguin(Species::Adelie, Some(39.0)),
            penguin(Species::Gentoo, Some(47.0)),
            penguin(Species::Chinstrap, None),
            penguin(Species::Gentoo, Some(49.0)),
        ]))
    }

    fn state(preset: Preset) -> AppState {
        AppState::new(preset.config(), dataset()).unwrap()
    }

    #[test]
    fn initial_refresh_computes_everything() {
        let state = state(Preset::SharedFilter);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.scatter_view().unwrap().len(), 4);
        assert!(state.scatter().is_some());
        assert!(state.histogram().is_some());
        assert!(state.single_color_histogram().is_some());
        assert_eq!(state.table().unwrap().rows.len(), 4);
        assert_eq!(state.histogram().unwrap().bin_count(), 75);
    }

    #[test]
    fn unchanged_inputs_recompute_nothing() {
        let mut state = state(Preset::SharedFilter);
        assert_eq!(state.refresh(), 0);
        // Setting the same value is not a change.
        state.inputs.attribute.set(Attribute::BillLengthMm);
        assert_eq!(state.refresh(), 0);
    }

    #[test]
    fn shared_species_filter_updates_every_view() {
        let mut state = state(Preset::SharedFilter);
        state.inputs.species.update(|s| s.set("Adelie", false));
        // Both filters, scatter, two histograms, table, grid.
        assert_eq!(state.refresh(), 7);
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.scatter_view().unwrap().len(), 3);
        assert_eq!(state.histogram_view().unwrap().len(), 3);
        assert_eq!(state.table().unwrap().rows.len(), 3);
    }

    #[test]
    fn per_chart_filters_are_independent() {
        let mut state = state(Preset::SplitFilters);
        let only_gentoo: SpeciesSelection = ["Gentoo"].into_iter().collect();
        state.inputs.histogram_species.set(only_gentoo);
        // Histogram filter and histogram only.
        assert_eq!(state.refresh(), 2);
        assert_eq!(state.scatter_view().unwrap().len(), 4);
        assert_eq!(state.histogram_view().unwrap().len(), 2);
        assert_eq!(state.histogram().unwrap().total(), 2);
        // Tables show the full dataset in this variant.
        assert_eq!(state.table().unwrap().rows.len(), 4);
        assert!(state.single_color_histogram().is_none());
    }

    #[test]
    fn empty_selection_shows_everything() {
        let mut state = state(Preset::SharedFilter);
        state.inputs.species.set(SpeciesSelection::default());
        state.refresh();
        assert_eq!(state.scatter_view().unwrap().len(), 4);
    }

    #[test]
    fn bin_change_only_touches_its_histogram() {
        let mut state = state(Preset::SharedFilter);
        let bounds = BinBounds::new(1, 100);
        state.inputs.histogram_bins.set(bounds.clamp(10));
        assert_eq!(state.refresh(), 1);
        assert_eq!(state.histogram().unwrap().bin_count(), 10);
        assert_eq!(state.single_color_histogram().unwrap().bin_count(), 75);
    }

    #[test]
    fn attribute_change_rebuilds_both_histograms() {
        let mut state = state(Preset::GridLayout);
        state.inputs.attribute.set(Attribute::BodyMassG);
        assert_eq!(state.refresh(), 2);
        assert_eq!(state.histogram().unwrap().attribute, Attribute::BodyMassG);
        assert_eq!(state.histogram().unwrap().excluded, 0);
    }

    #[test]
    fn grid_sort_only_touches_the_grid() {
        let mut state = state(Preset::SharedFilter);
        let column = Column::Measurement(Attribute::BillLengthMm);
        state
            .inputs
            .grid_sort
            .update(|s| *s = GridSort::after_click(*s, column));
        assert_eq!(state.refresh(), 1);
        let grid = state.grid().unwrap();
        let first: Vec<_> = grid.rows.iter().map(|r| r[2].as_str()).collect();
        assert_eq!(first, vec!["39", "47", "49", "NA"]);
        // The plain table keeps source order.
        assert_eq!(state.table().unwrap().rows[2][2], "NA");
    }
}
