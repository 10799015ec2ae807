//! Small numeric helpers shared by the indicator derivations.

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().fold(None, |acc, value| match acc {
        Some(current) if current >= value => Some(current),
        _ => Some(value),
    })
}

/// Pearson correlation. `None` when the slices differ in length, hold fewer
/// than two pairs, or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }

    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

/// Trailing moving average aligned with the input: positions before the first
/// full window are `None`.
pub fn moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    values
        .iter()
        .enumerate()
        .map(|(index, _)| {
            if index + 1 < window {
                None
            } else {
                let slice = &values[index + 1 - window..=index];
                Some(slice.iter().sum::<f64>() / window as f64)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_max_of_empty_are_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn mean_and_max_basic() {
        let values = [2.0, 4.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        assert_eq!(max(&values), Some(9.0));
    }

    #[test]
    fn pearson_detects_perfect_relationships() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [10.0, 20.0, 30.0, 40.0];
        let down = [8.0, 6.0, 4.0, 2.0];

        let positive = pearson(&xs, &up).expect("correlated");
        assert!((positive - 1.0).abs() < 1e-12);

        let negative = pearson(&xs, &down).expect("anti-correlated");
        assert!((negative + 1.0).abs() < 1e-12);
    }

    #[test]
    fn pearson_rejects_degenerate_inputs() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 2.0], &[3.0]), None);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn moving_average_leaves_warmup_empty() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let averaged = moving_average(&values, 3);
        assert_eq!(averaged, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn moving_average_with_zero_window_is_all_none() {
        assert_eq!(moving_average(&[1.0, 2.0], 0), vec![None, None]);
    }
}
