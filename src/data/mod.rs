/// Data layer: core types, loading, selections and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → PenguinDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ PenguinDataset  │  Vec<Penguin>, shared behind Arc
///   └────────────────┘
///        │       ◄── SpeciesSelection (checkbox group)
///        ▼
///   ┌──────────┐
///   │  filter   │  species predicate → FilteredView (row indices)
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod selection;
