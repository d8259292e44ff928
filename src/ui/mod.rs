/// egui widgets: the sidebar and top bar, chart drawing, and tables.
pub mod panels;
pub mod plot;
pub mod table;
