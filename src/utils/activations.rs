//! Activation and output helpers for inference
//!
//! All functions work on flat row-major `f32` buffers, one row per sample.

/// ReLU applied in-place.
pub fn relu_inplace(data: &mut [f32]) {
    for value in data.iter_mut() {
        if *value < 0.0 {
            *value = 0.0;
        }
    }
}

/// Index of the largest value in `row`; the first maximum wins ties.
///
/// Returns 0 for an empty row.
pub fn argmax(row: &[f32]) -> usize {
    let mut best = 0usize;
    for (i, &value) in row.iter().enumerate().skip(1) {
        if value > row[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_inplace() {
        let mut data = vec![-1.0f32, 0.0, 2.5];
        relu_inplace(&mut data);
        assert_eq!(data, vec![0.0, 0.0, 2.5]);
    }

    #[test]
    fn test_argmax_first_maximum_wins() {
        assert_eq!(argmax(&[0.1, 0.7, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[3.0]), 0);
        assert_eq!(argmax(&[]), 0);
    }
}
