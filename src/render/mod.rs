/// Pure render functions: a filtered view plus selection parameters in, a
/// chart or table description out. Nothing here touches egui widgets; the
/// `ui` module draws these descriptions.
pub mod histogram;
pub mod scatter;
pub mod table;

pub use histogram::{Histogram, histogram, single_color_histogram};
pub use scatter::{ScatterPlot, scatter};
pub use table::{TableView, table};
