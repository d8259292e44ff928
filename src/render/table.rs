use std::cmp::Ordering;

use crate::data::filter::FilteredView;
use crate::data::model::Column;
use crate::data::selection::GridSort;

/// Table / grid description: every field of every record in the view,
/// pre-formatted, no aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub sort: Option<GridSort>,
}

/// Render the view as rows, optionally sorted by one column. The sort is
/// stable and puts missing values last in either direction.
pub fn table(view: &FilteredView, sort: Option<GridSort>) -> TableView {
    let mut records: Vec<_> = view.records().collect();

    if let Some(GridSort { column, ascending }) = sort {
        records.sort_by(|a, b| {
            match (column.is_missing(a), column.is_missing(b)) {
                (true, true) => return Ordering::Equal,
                (true, false) => return Ordering::Greater,
                (false, true) => return Ordering::Less,
                (false, false) => {}
            }
            let ord = column.compare(a, b).unwrap_or(Ordering::Equal);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }

    let columns = Column::ALL.to_vec();
    let rows: Vec<Vec<String>> = records
        .into_iter()
        .map(|p| columns.iter().map(|c| c.cell(p)).collect())
        .collect();

    TableView {
        columns,
        rows,
        sort,
    }
}
