//! Small helpers for RGB triplets and float slices.

/// RGB color/energy triplet.
pub type Rgb = [f64; 3];

pub const BLACK: Rgb = [0.0; 3];

pub fn rgb_add(a: Rgb, b: Rgb) -> Rgb {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn rgb_scale(a: Rgb, s: f64) -> Rgb {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// Component-wise product.
pub fn rgb_mul(a: Rgb, b: Rgb) -> Rgb {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2]]
}

/// Sum of absolute per-channel differences.
pub fn rgb_abs_diff(a: Rgb, b: Rgb) -> f64 {
    (a[0] - b[0]).abs() + (a[1] - b[1]).abs() + (a[2] - b[2]).abs()
}

pub fn rgb_sum(a: Rgb) -> f64 {
    a[0] + a[1] + a[2]
}

/// Checks if two arrays or vectors are almost equal.
///
/// Elements in both containers must be in the same order.
pub fn almost_equal(a: &[f64], b: &[f64], eps: f64) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).all(|(&x, &y)| (x - y).abs() <= eps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_arithmetic() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.5, 0.5, 2.0];
        assert_eq!(rgb_add(a, b), [1.5, 2.5, 5.0]);
        assert_eq!(rgb_mul(a, b), [0.5, 1.0, 6.0]);
        assert_eq!(rgb_scale(a, 2.0), [2.0, 4.0, 6.0]);
        assert_eq!(rgb_sum(a), 6.0);
        assert_eq!(rgb_abs_diff(a, b), 0.5 + 1.5 + 1.0);
    }

    #[test]
    fn test_almost_equal_true() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 3.0];
        assert!(almost_equal(&a, &b, 1e-10));
    }

    #[test]
    fn test_almost_equal_false() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![1.0, 2.0, 4.0];
        assert!(!almost_equal(&a, &b, 1e-10));
        assert!(!almost_equal(&a, &b[..2], 1e-10));
    }
}
