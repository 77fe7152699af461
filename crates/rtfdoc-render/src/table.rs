//! Table column geometry.
//!
//! Column stops are cumulative right edges in twips. Widths are truncated,
//! and the remainder of the division is left unused rather than added to
//! the last column.

use rtfdoc_style::PAGE_WIDTH;

/// Column width used for rows that declare no cells.
const EMPTY_ROW_WIDTH: usize = 10;

/// Width of one cell in a row of `num_cells` equal cells.
#[must_use]
pub fn cell_width(num_cells: usize) -> usize {
    if num_cells == 0 {
        EMPTY_ROW_WIDTH
    } else {
        PAGE_WIDTH / num_cells
    }
}

/// Right edges of the cells of a row of `num_cells` equal cells.
#[must_use]
pub fn column_stops(num_cells: usize) -> Vec<usize> {
    let width = cell_width(num_cells);
    (1..=num_cells).map(|i| i * width).collect()
}

/// Right edges, in percent of the page, of the parameter table columns.
///
/// Columns are: direction (with in/out), type (with types), name,
/// description.
#[must_use]
pub fn param_column_percentages(has_in_out: bool, has_type: bool) -> &'static [usize] {
    match (has_in_out, has_type) {
        (false, false) => &[25, 100],
        (true, false) => &[14, 35, 100],
        (false, true) => &[25, 50, 100],
        (true, true) => &[14, 35, 55, 100],
    }
}

/// Right edges of the parameter table columns in twips.
#[must_use]
pub fn param_column_stops(has_in_out: bool, has_type: bool) -> Vec<usize> {
    param_column_percentages(has_in_out, has_type)
        .iter()
        .map(|pct| PAGE_WIDTH * pct / 100)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_stops_truncate() {
        assert_eq!(column_stops(3), vec![2916, 5832, 8748]);
        assert_eq!(column_stops(5), vec![1749, 3498, 5247, 6996, 8745]);
        assert_eq!(column_stops(0), Vec::<usize>::new());
    }

    #[test]
    fn test_width_sum_bounded() {
        for n in 1..=64 {
            let total = cell_width(n) * n;
            assert!(total <= PAGE_WIDTH, "{n} cells overflow");
            assert!(total + n >= PAGE_WIDTH, "{n} cells lose more than one twip each");
            assert_eq!(column_stops(n).last().copied(), Some(total));
        }
    }

    #[test]
    fn test_param_columns() {
        assert_eq!(param_column_stops(false, false), vec![2187, 8748]);
        assert_eq!(param_column_stops(true, false), vec![1224, 3061, 8748]);
        assert_eq!(param_column_stops(false, true), vec![2187, 4374, 8748]);
        assert_eq!(param_column_stops(true, true), vec![1224, 3061, 4811, 8748]);
    }
}
