use std::sync::Arc;

use super::model::{Penguin, PenguinDataset};
use super::selection::SpeciesSelection;

// ---------------------------------------------------------------------------
// Filtered view: shared dataset + surviving row indices
// ---------------------------------------------------------------------------

/// A subset of the dataset, stored as ascending row indices into the shared
/// dataset so source order is always preserved.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<PenguinDataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    /// The unfiltered view of a dataset.
    pub fn full(dataset: Arc<PenguinDataset>) -> Self {
        let indices = (0..dataset.len()).collect();
        FilteredView { dataset, indices }
    }

    /// Narrow this view to records passing `selection`.
    ///
    /// An empty selection leaves the view unchanged, and applying the same
    /// selection twice yields the same view.
    pub fn filter(&self, selection: &SpeciesSelection) -> FilteredView {
        let indices = self
            .indices
            .iter()
            .copied()
            .filter(|&i| selection.matches(self.dataset.records()[i].species))
            .collect();
        FilteredView {
            dataset: Arc::clone(&self.dataset),
            indices,
        }
    }

    /// Records of this view, in source order.
    pub fn records(&self) -> impl Iterator<Item = &Penguin> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records()[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl PartialEq for FilteredView {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.dataset, &other.dataset) && self.indices == other.indices
    }
}

/// Reactive filter calculation: the records whose species is in `selection`,
/// or the whole dataset when nothing is selected.
pub fn filter_species(dataset: &Arc<PenguinDataset>, selection: &SpeciesSelection) -> FilteredView {
    FilteredView::full(Arc::clone(dataset)).filter(selection)
}
