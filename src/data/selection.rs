use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Column, Species};

// ---------------------------------------------------------------------------
// Species selection: the checkbox group value
// ---------------------------------------------------------------------------

/// Species names ticked in a checkbox group.
///
/// Names are kept as plain strings, exactly as the widget reports them. An
/// empty selection means "no filter" and a name that matches no known species
/// simply matches no record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeciesSelection(BTreeSet<String>);

impl SpeciesSelection {
    /// Every known species ticked (the widgets' initial state).
    pub fn all() -> Self {
        Species::ALL.iter().map(|sp| sp.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Whether a record of `species` passes this selection.
    pub fn matches(&self, species: Species) -> bool {
        self.0.is_empty() || self.0.contains(species.as_str())
    }

    /// Tick or untick one checkbox.
    pub fn set(&mut self, name: &str, checked: bool) {
        if checked {
            self.0.insert(name.to_string());
        } else {
            self.0.remove(name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for SpeciesSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        SpeciesSelection(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// Bin count: a bounded integer owned by a slider / numeric input
// ---------------------------------------------------------------------------

/// Declared bounds of a bin-count widget. Always `1 <= min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinBounds {
    min: u32,
    max: u32,
}

impl BinBounds {
    pub fn new(min: u32, max: u32) -> Self {
        let min = min.max(1);
        BinBounds {
            min,
            max: max.max(min),
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// The widget-side clamp: the only way to obtain a [`BinCount`].
    pub fn clamp(&self, requested: i64) -> BinCount {
        let n = requested.clamp(i64::from(self.min), i64::from(self.max));
        BinCount(n as u32)
    }
}

/// A bin count already clamped to its widget's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BinCount(u32);

impl BinCount {
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

// ---------------------------------------------------------------------------
// Grid sort: the clicked column header of the data grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSort {
    pub column: Column,
    pub ascending: bool,
}

impl GridSort {
    /// Header click: a new column sorts ascending, the same column flips
    /// direction, and a third click clears the sort.
    pub fn after_click(current: Option<GridSort>, column: Column) -> Option<GridSort> {
        match current {
            Some(sort) if sort.column == column && sort.ascending => Some(GridSort {
                column,
                ascending: false,
            }),
            Some(sort) if sort.column == column => None,
            _ => Some(GridSort {
                column,
                ascending: true,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Widget flavour for bin-count inputs (config-driven)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinWidget {
    #[default]
    Slider,
    Numeric,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Attribute;

    #[test]
    fn empty_selection_matches_everything() {
        let sel = SpeciesSelection::default();
        assert!(Species::ALL.iter().all(|sp| sel.matches(*sp)));
    }

    #[test]
    fn unknown_names_match_nothing() {
        let sel: SpeciesSelection = ["Emperor"].into_iter().collect();
        assert!(!sel.is_empty());
        assert!(Species::ALL.iter().all(|sp| !sel.matches(*sp)));
    }

    #[test]
    fn toggling_checkboxes() {
        let mut sel = SpeciesSelection::all();
        assert!(Species::ALL.iter().all(|sp| sel.contains(sp.as_str())));
        sel.set("Gentoo", false);
        assert!(!sel.matches(Species::Gentoo));
        assert!(sel.matches(Species::Adelie));
        sel.set("Gentoo", true);
        assert_eq!(sel, SpeciesSelection::all());
    }

    #[test]
    fn bin_count_is_clamped_to_bounds() {
        let bounds = BinBounds::new(1, 100);
        assert_eq!(bounds.clamp(0).get(), 1);
        assert_eq!(bounds.clamp(-7).get(), 1);
        assert_eq!(bounds.clamp(42).get(), 42);
        assert_eq!(bounds.clamp(250).get(), 100);

        for requested in -10..=200 {
            let n = BinBounds::new(5, 100).clamp(requested).get();
            assert!((5..=100).contains(&n));
        }
    }

    #[test]
    fn degenerate_bounds_are_normalised() {
        let bounds = BinBounds::new(0, 0);
        assert_eq!((bounds.min(), bounds.max()), (1, 1));
        let bounds = BinBounds::new(10, 3);
        assert_eq!((bounds.min(), bounds.max()), (10, 10));
    }

    #[test]
    fn grid_sort_cycles_on_repeated_clicks() {
        let col = Column::Measurement(Attribute::BodyMassG);
        let first = GridSort::after_click(None, col);
        assert_eq!(first, Some(GridSort { column: col, ascending: true }));
        let second = GridSort::after_click(first, col);
        assert_eq!(second, Some(GridSort { column: col, ascending: false }));
        assert_eq!(GridSort::after_click(second, col), None);

        let other = GridSort::after_click(second, Column::Island);
        assert_eq!(
            other,
            Some(GridSort { column: Column::Island, ascending: true })
        );
    }
}
