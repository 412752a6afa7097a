use csved::{TableError, TableModel};
use proptest::prelude::*;

/// Header plus rows of the same width.
fn table_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    (1usize..6).prop_flat_map(|ncols| {
        (
            prop::collection::vec("[a-z]{1,6}", ncols),
            prop::collection::vec(prop::collection::vec("[a-z0-9.]{0,5}", ncols), 0..12),
        )
    })
}

fn loaded(header: &[String], rows: &[Vec<String>]) -> TableModel {
    let mut t = TableModel::new();
    t.load(header.to_vec(), rows.to_vec()).expect("consistent shape");
    t
}

proptest! {
    #[test]
    fn load_then_snapshot_is_identity((header, rows) in table_strategy()) {
        let t = loaded(&header, &rows);
        prop_assert_eq!(t.snapshot(), (header, rows));
    }

    #[test]
    fn edit_cell_changes_exactly_one_cell(
        (header, rows) in table_strategy(),
        r in any::<prop::sample::Index>(),
        c in any::<prop::sample::Index>(),
        value in "[a-z0-9]{0,8}",
    ) {
        prop_assume!(!rows.is_empty());
        let row = r.index(rows.len());
        let col = c.index(header.len());
        let mut t = loaded(&header, &rows);
        t.edit_cell(row, col, value.clone()).unwrap();

        let mut expected = rows.clone();
        expected[row][col] = value;
        prop_assert_eq!(t.snapshot(), (header, expected));
    }

    #[test]
    fn add_row_appends_empty_row((header, rows) in table_strategy()) {
        let mut t = loaded(&header, &rows);
        t.add_row().unwrap();
        prop_assert_eq!(t.nrows(), rows.len() + 1);
        prop_assert_eq!(t.rows().last().unwrap(), &vec![String::new(); header.len()]);
    }

    #[test]
    fn delete_row_shifts_following_rows(
        (header, rows) in table_strategy(),
        r in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!rows.is_empty());
        let row = r.index(rows.len());
        let mut t = loaded(&header, &rows);
        t.delete_row(row).unwrap();

        prop_assert_eq!(t.nrows(), rows.len() - 1);
        prop_assert_eq!(&t.rows()[..row], &rows[..row]);
        prop_assert_eq!(&t.rows()[row..], &rows[row + 1..]);
    }

    #[test]
    fn numeric_columns_match_first_column_of_each_name((header, rows) in table_strategy()) {
        let t = loaded(&header, &rows);
        let expected: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|(cidx, name)| header.iter().position(|h| h == *name) == Some(*cidx))
            .filter(|(cidx, _)| {
                rows.iter().all(|r| {
                    r[*cidx].trim().parse::<f64>().map(f64::is_finite).unwrap_or(false)
                })
            })
            .map(|(_, name)| name.clone())
            .collect();
        let numeric: Vec<String> = t.numeric_columns().into_iter().collect();
        prop_assert_eq!(numeric, expected);
    }

    #[test]
    fn chart_series_only_uses_numeric_cells((header, rows) in table_strategy()) {
        let t = loaded(&header, &rows);
        if let Some(points) = t.chart_series() {
            prop_assert!(points.iter().all(|p| p.y.is_finite()));
        }
    }

    #[test]
    fn ragged_load_is_rejected_without_side_effects(
        (header, rows) in table_strategy(),
        extra in 1usize..3,
    ) {
        let mut t = loaded(&header, &rows);
        let mut bad = rows.clone();
        bad.push(vec![String::from("x"); header.len() + extra]);
        let result = t.load(header.clone(), bad);
        let is_shape_error = matches!(result, Err(TableError::Shape { .. }));
        prop_assert!(is_shape_error);
        prop_assert_eq!(t.snapshot(), (header, rows));
    }

    #[test]
    fn out_of_bounds_edits_are_rejected(
        (header, rows) in table_strategy(),
        extra in 0usize..4,
    ) {
        let mut t = loaded(&header, &rows);
        let result = t.edit_cell(rows.len() + extra, 0, "v".into());
        prop_assert_eq!(result, Err(TableError::Index { row: rows.len() + extra, col: 0 }));
        prop_assert!(t.delete_row(rows.len() + extra).is_err());
        prop_assert_eq!(t.snapshot(), (header, rows));
    }
}
