//! Synthetic candidate assignments.

/// Per-variable values with `1.0` at each index in `selected`.
///
/// # Examples
///
/// ```
/// use tourforge_test::selected_values;
///
/// assert_eq!(selected_values(4, &[1, 3]), vec![0.0, 1.0, 0.0, 1.0]);
/// ```
pub fn selected_values(var_count: usize, selected: &[usize]) -> Vec<f64> {
    let mut values = vec![0.0; var_count];
    for &index in selected {
        values[index] = 1.0;
    }
    values
}

