use eframe::egui::Color32;

use crate::color::ColorMap;
use crate::data::filter::FilteredView;
use crate::data::model::{Attribute, Species};

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub species: Species,
    pub color: Color32,
    pub points: Vec<[f64; 2]>,
}

/// Scatter plot description: one coloured series per species present.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlot {
    pub title: Option<String>,
    pub x: Attribute,
    pub y: Attribute,
    pub series: Vec<ScatterSeries>,
    /// Records left out because a coordinate is missing or not finite.
    pub omitted: usize,
}

impl ScatterPlot {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

pub fn scatter(
    view: &FilteredView,
    x: Attribute,
    y: Attribute,
    colors: &ColorMap,
    title: Option<&str>,
) -> ScatterPlot {
    let mut omitted = 0;
    let mut series: Vec<ScatterSeries> = Vec::new();

    for species in Species::ALL {
        let mut points = Vec::new();
        for penguin in view.records().filter(|p| p.species == species) {
            match (x.value(penguin), y.value(penguin)) {
                (Some(px), Some(py)) if px.is_finite() && py.is_finite() => points.push([px, py]),
                _ => omitted += 1,
            }
        }
        if !points.is_empty() {
            series.push(ScatterSeries {
                species,
                color: colors.color_for(species),
                points,
            });
        }
    }

    if omitted > 0 {
        log::warn!("scatter {x} vs {y}: {omitted} records without both values left out");
    }

    ScatterPlot {
        title: title.map(str::to_string),
        x,
        y,
        series,
        omitted,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Preset;
    use crate::data::filter::filter_species;
    use crate::data::model::tests::penguin;
    use crate::data::model::PenguinDataset;
    use crate::data::selection::SpeciesSelection;

    #[test]
    fn groups_points_by_species_and_skips_missing() {
        let ds = Arc::new(PenguinDataset::new(vec![
            penguin(Species::Gentoo, Some(46.0)),
            penguin(Species::Adelie, Some(39.0)),
            penguin(Species::Adelie, None),
            penguin(Species::Gentoo, Some(48.0)),
            penguin(Species::Chinstrap, Some(f64::NEG_INFINITY)),
        ]));
        let colors = ColorMap::from_scheme(&Preset::SplitFilters.config().colors).unwrap();
        let view = filter_species(&ds, &SpeciesSelection::default());

        let plot = scatter(&view, Attribute::BillLengthMm, Attribute::BodyMassG, &colors, Some("t"));
        assert_eq!(plot.omitted, 2);
        assert_eq!(plot.point_count(), 3);
        assert_eq!(plot.series.len(), 2);
        assert_eq!(plot.series[0].species, Species::Adelie);
        assert_eq!(plot.series[0].points, vec![[39.0, 4000.0]]);
        assert_eq!(plot.series[1].points, vec![[46.0, 4000.0], [48.0, 4000.0]]);
        assert_eq!(plot.series[1].color, colors.color_for(Species::Gentoo));
        assert_eq!(plot.title.as_deref(), Some("t"));
    }

    #[test]
    fn empty_view_has_no_series() {
        let ds = Arc::new(PenguinDataset::new(vec![penguin(Species::Adelie, Some(39.0))]));
        let colors = ColorMap::from_scheme(&Preset::SharedFilter.config().colors).unwrap();
        let sel: SpeciesSelection = ["Chinstrap"].into_iter().collect();
        let plot = scatter(
            &filter_species(&ds, &sel),
            Attribute::BodyMassG,
            Attribute::BillLengthMm,
            &colors,
            None,
        );
        assert!(plot.series.is_empty());
        assert_eq!(plot.omitted, 0);
    }
}
