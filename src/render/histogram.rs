use eframe::egui::Color32;

use crate::color::ColorMap;
use crate::data::filter::FilteredView;
use crate::data::model::{Attribute, Penguin, Species};
use crate::data::selection::BinCount;

// ---------------------------------------------------------------------------
// Histogram description
// ---------------------------------------------------------------------------

/// Counts for one bar colour. `counts[i]` belongs to bin `[edges[i], edges[i + 1])`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub label: String,
    pub color: Color32,
    pub counts: Vec<usize>,
}

/// Equal-width histogram; with several series the bars stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub attribute: Attribute,
    /// `bins + 1` ascending edges, or empty when no value is present.
    pub edges: Vec<f64>,
    pub series: Vec<HistogramSeries>,
    /// Records of the view left out because the attribute is missing or not finite.
    pub excluded: usize,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, .., last] => (last - first) / self.bin_count() as f64,
            _ => 0.0,
        }
    }

    /// Midpoint of every bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Number of values binned across all series.
    pub fn total(&self) -> usize {
        self.series.iter().flat_map(|s| &s.counts).sum()
    }
}

// ---------------------------------------------------------------------------
// Render functions
// ---------------------------------------------------------------------------

/// Histogram of `attribute` stacked by species, coloured by `colors`.
pub fn histogram(
    view: &FilteredView,
    attribute: Attribute,
    bins: BinCount,
    colors: &ColorMap,
) -> Histogram {
    let grouped: Vec<(Species, Vec<f64>)> = Species::ALL
        .into_iter()
        .map(|sp| {
            let values: Vec<f64> = view
                .records()
                .filter(|p| p.species == sp)
                .filter_map(|p| binnable(attribute, p))
                .collect();
            (sp, values)
        })
        .filter(|(_, values)| !values.is_empty())
        .collect();

    let groups = grouped
        .into_iter()
        .map(|(sp, values)| (sp.to_string(), colors.color_for(sp), values))
        .collect();
    build(view, attribute, bins, groups)
}

/// Histogram of `attribute` over the whole view in one colour.
pub fn single_color_histogram(
    view: &FilteredView,
    attribute: Attribute,
    bins: BinCount,
    color: Color32,
) -> Histogram {
    let values: Vec<f64> = view.records().filter_map(|p| binnable(attribute, p)).collect();
    let groups = if values.is_empty() {
        Vec::new()
    } else {
        vec![("Count".to_string(), color, values)]
    };
    build(view, attribute, bins, groups)
}

/// The value to bin, if present and finite.
fn binnable(attribute: Attribute, penguin: &Penguin) -> Option<f64> {
    attribute.value(penguin).filter(|v| v.is_finite())
}

fn build(
    view: &FilteredView,
    attribute: Attribute,
    bins: BinCount,
    groups: Vec<(String, Color32, Vec<f64>)>,
) -> Histogram {
    let present: usize = groups.iter().map(|(_, _, v)| v.len()).sum();
    let excluded = view.len() - present;
    if excluded > 0 {
        log::warn!("histogram of {attribute}: {excluded} records without a usable value left out");
    }

    let all_values = groups.iter().flat_map(|(_, _, v)| v.iter().copied());
    let Some(edges) = bin_edges(all_values, bins.get()) else {
        return Histogram {
            attribute,
            edges: Vec::new(),
            series: Vec::new(),
            excluded,
        };
    };

    let series = groups
        .into_iter()
        .map(|(label, color, values)| {
            let mut counts = vec![0; bins.get()];
            for v in values {
                counts[bin_index(&edges, v)] += 1;
            }
            HistogramSeries {
                label,
                color,
                counts,
            }
        })
        .collect();

    Histogram {
        attribute,
        edges,
        series,
        excluded,
    }
}

/// Equal-width edges spanning the values; a zero-width range is widened to a
/// unit interval centred on the value. `None` when there are no values.
fn bin_edges(values: impl Iterator<Item = f64>, bins: usize) -> Option<Vec<f64>> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi || bins == 0 {
        return None;
    }
    if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
    edges[bins] = hi;
    Some(edges)
}

/// Bins are half-open except the last, which also takes the maximum.
fn bin_index(edges: &[f64], value: f64) -> usize {
    let bins = edges.len() - 1;
    let width = (edges[bins] - edges[0]) / bins as f64;
    let idx = ((value - edges[0]) / width).floor();
    if idx < 0.0 {
        0
    } else {
        (idx as usize).min(bins - 1)
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
    use crate::data::selection::{BinBounds, SpeciesSelection};
    use crate::render::table::table;

    fn colors() -> ColorMap {
        ColorMap::from_scheme(&Preset::SharedFilter.config().colors).unwrap()
    }

    fn bins(n: i64) -> BinCount {
        BinBounds::new(1, 100).clamp(n)
    }

    #[test]
    fn missing_values_only_leave_the_chart() {
        // 10 records, 2 without bill length.
        let mut records: Vec<_> = (0..8)
            .map(|i| penguin(if i % 2 == 0 { Species::Adelie } else { Species::Gentoo }, Some(35.0 + i as f64)))
            .collect();
        records.insert(3, penguin(Species::Adelie, None));
        records.push(penguin(Species::Gentoo, None));
        let ds = Arc::new(PenguinDataset::new(records));
        let view = filter_species(&ds, &SpeciesSelection::default());

        let hist = histogram(&view, Attribute::BillLengthMm, bins(4), &colors());
        assert_eq!(hist.total(), 8);
        assert_eq!(hist.excluded, 2);

        let rows = table(&view, None);
        assert_eq!(rows.rows.len(), 10);
        assert_eq!(rows.rows[3][2], "NA");
    }

    #[test]
    fn equal_width_bins_cover_min_to_max() {
        let records = (0..10).map(|i| penguin(Species::Chinstrap, Some(i as f64))).collect();
        let ds = Arc::new(PenguinDataset::new(records));
        let view = filter_species(&ds, &SpeciesSelection::default());

        let hist = single_color_histogram(&view, Attribute::BillLengthMm, bins(5), Color32::RED);
        assert_eq!(hist.bin_count(), 5);
        assert_eq!(hist.edges.first(), Some(&0.0));
        assert_eq!(hist.edges.last(), Some(&9.0));
        assert_eq!(hist.series.len(), 1);
        assert_eq!(hist.series[0].counts, vec![2, 2, 2, 2, 2]);
        assert!((hist.bin_width() - 1.8).abs() < 1e-9);
    }

    #[test]
    fn series_stack_per_species_with_shared_edges() {
        let ds = Arc::new(PenguinDataset::new(vec![
            penguin(Species::Gentoo, Some(50.0)),
            penguin(Species::Adelie, Some(30.0)),
            penguin(Species::Adelie, Some(31.0)),
            penguin(Species::Gentoo, Some(49.0)),
        ]));
        let view = filter_species(&ds, &SpeciesSelection::default());
        let hist = histogram(&view, Attribute::BillLengthMm, bins(2), &colors());

        let labels: Vec<_> = hist.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Adelie", "Gentoo"]);
        assert_eq!(hist.series[0].counts, vec![2, 0]);
        assert_eq!(hist.series[1].counts, vec![0, 2]);
        assert_eq!(hist.series[0].color, colors().color_for(Species::Adelie));
        assert_eq!(hist.centers(), vec![35.0, 45.0]);
    }

    #[test]
    fn identical_values_get_a_unit_range() {
        let ds = Arc::new(PenguinDataset::new(vec![
            penguin(Species::Adelie, Some(40.0)),
            penguin(Species::Adelie, Some(40.0)),
        ]));
        let view = filter_species(&ds, &SpeciesSelection::default());
        let hist = histogram(&view, Attribute::BillLengthMm, bins(3), &colors());
        assert_eq!(hist.edges.first(), Some(&39.5));
        assert_eq!(hist.edges.last(), Some(&40.5));
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn non_finite_values_are_excluded() {
        let ds = Arc::new(PenguinDataset::new(vec![
            penguin(Species::Adelie, Some(40.0)),
            penguin(Species::Adelie, Some(50.0)),
            penguin(Species::Gentoo, Some(f64::NAN)),
            penguin(Species::Gentoo, Some(f64::INFINITY)),
        ]));
        let view = filter_species(&ds, &SpeciesSelection::default());

        let hist = single_color_histogram(&view, Attribute::BillLengthMm, bins(2), Color32::RED);
        assert_eq!(hist.edges, vec![40.0, 45.0, 50.0]);
        assert_eq!(hist.series[0].counts, vec![1, 1]);
        assert_eq!(hist.excluded, 2);

        let stacked = histogram(&view, Attribute::BillLengthMm, bins(2), &colors());
        assert_eq!(stacked.series.len(), 1);
        assert_eq!(stacked.excluded, 2);
    }

    #[test]
    fn no_values_gives_empty_histogram() {
        let ds = Arc::new(PenguinDataset::new(vec![penguin(Species::Adelie, None)]));
        let view = filter_species(&ds, &SpeciesSelection::default());
        let hist = histogram(&view, Attribute::BillLengthMm, bins(10), &colors());
        assert!(hist.edges.is_empty());
        assert!(hist.series.is_empty());
        assert_eq!(hist.bin_count(), 0);
        assert_eq!(hist.excluded, 1);
    }

    #[test]
    fn bin_count_matches_requested_within_bounds() {
        let records = (0..50).map(|i| penguin(Species::Gentoo, Some(i as f64 * 0.7))).collect();
        let ds = Arc::new(PenguinDataset::new(records));
        let view = filter_species(&ds, &SpeciesSelection::default());
        for requested in [0, 1, 7, 100, 1000] {
            let count = bins(requested);
            let hist = histogram(&view, Attribute::BillLengthMm, count, &colors());
            assert_eq!(hist.bin_count(), count.get());
            assert!((1..=100).contains(&hist.bin_count()));
            assert_eq!(hist.total(), 50);
        }
    }
}
