use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Column;
use crate::data::selection::GridSort;
use crate::render::TableView;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data table (read-only) and data grid (sortable)
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, view: &TableView, max_height: f32) {
    ui.push_id("data_table", |ui: &mut Ui| {
        build(ui, view, max_height, |ui, column| {
            ui.strong(column.name());
        });
    });
}

/// Like [`data_table`], with clickable headers cycling the sort.
pub fn data_grid(ui: &mut Ui, state: &mut AppState, max_height: f32) {
    let Some(view) = state.grid() else {
        return;
    };
    let sort = view.sort;

    let mut clicked: Option<Column> = None;
    ui.push_id("data_grid", |ui: &mut Ui| {
        build(ui, view, max_height, |ui, column| {
            let arrow = match sort {
                Some(s) if s.column == column && s.ascending => " ▲",
                Some(s) if s.column == column => " ▼",
                _ => "",
            };
            if ui.button(format!("{}{arrow}", column.name())).clicked() {
                clicked = Some(column);
            }
        });
    });

    if let Some(column) = clicked {
        state
            .inputs
            .grid_sort
            .update(|s| *s = GridSort::after_click(*s, column));
        ui.ctx().request_repaint();
    }
}

fn build(ui: &mut Ui, view: &TableView, max_height: f32, mut header_cell: impl FnMut(&mut Ui, Column)) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .max_scroll_height(max_height)
        .columns(TableColumn::auto().at_least(70.0), view.columns.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for &column in &view.columns {
                header.col(|ui: &mut Ui| header_cell(ui, column));
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.rows.len(), |mut row| {
                let cells = &view.rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
