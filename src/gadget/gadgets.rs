//! ReLU gadgets. Each function returns the pre-activation form of one or
//! two neurons; the caller places them into slots of the next layer, where a
//! ReLU is applied. Nothing here evaluates arithmetic.
//!
//! All contracts assume integer-valued inputs, which holds because the
//! network reads raw token codes.

use crate::gadget::affine::Affine;

/// Inequality test as two ReLU units, `x - y` and `y - x`.
///
/// After activation their sum is `0` iff `x == y` and at least `1` for any
/// two distinct integers. A consumer adds the two slots.
pub fn not_equal(x: usize, y: usize) -> [Affine; 2] {
    [
        Affine::slot(x).minus(Affine::slot(y)),
        Affine::slot(y).minus(Affine::slot(x)),
    ]
}

/// `value - suppression·Σ guards`.
///
/// When every guard is `0` the value passes through; when any guard is at
/// least `1` the form is at most `max(value) - suppression`, which is
/// negative, and the ReLU outputs `0`. Requires `suppression > max(value)`.
pub fn masked_contribution(value: Affine, guards: &[usize], suppression: f64) -> Affine {
    value.minus(Affine::sum_of(guards).scaled(suppression))
}

/// Thermometer half-terms `sum - class` and `class - sum`, the "above" and
/// "below" distances of `sum` from the integer `class`.
pub fn thermometer(sum: &Affine, class: u32) -> [Affine; 2] {
    let class = f64::from(class);
    [
        sum.clone().offset(-class),
        Affine::constant(class).minus(sum.clone()),
    ]
}

/// `1 - above - below`. After ReLU this is `1` when the thermometer pair
/// read a distance of zero and `0` for any integer distance of one or more.
pub fn indicator(above: usize, below: usize) -> Affine {
    Affine::constant(1.0).minus(Affine::sum_of(&[above, below]))
}

/// Forwards one slot unchanged. Lossless only for non-negative inputs.
pub fn identity(slot: usize) -> Affine {
    Affine::slot(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;

    fn relu(x: f64) -> f64 {
        ActivationFunction::ReLU.function(x)
    }

    #[test]
    fn not_equal_is_zero_only_on_equality() {
        let [fwd, back] = not_equal(0, 1);
        for x in 0..12 {
            for y in 0..12 {
                let input = [x as f64, y as f64];
                let ne = relu(fwd.evaluate(&input)) + relu(back.evaluate(&input));
                if x == y {
                    assert_eq!(ne, 0.0);
                } else {
                    assert!(ne >= 1.0);
                }
            }
        }
    }

    #[test]
    fn masked_contribution_suppresses_on_any_mismatch() {
        let big = 1000.0;
        let form = masked_contribution(Affine::slot(0), &[1, 2], big);
        for v in 1..=249 {
            let v = v as f64;
            assert_eq!(relu(form.evaluate(&[v, 0.0, 0.0])), v);
            assert_eq!(relu(form.evaluate(&[v, 1.0, 0.0])), 0.0);
            assert_eq!(relu(form.evaluate(&[v, 0.0, 7.0])), 0.0);
        }
    }

    #[test]
    fn thermometer_indicator_fires_on_exact_class_only() {
        let sum = Affine::sum_of(&[0, 1]);
        for class in 1..=5u32 {
            let [above, below] = thermometer(&sum, class);
            let ind = indicator(0, 1);
            for a in 0..=5 {
                for b in 0..=5 {
                    let input = [a as f64, b as f64];
                    let halves = [relu(above.evaluate(&input)), relu(below.evaluate(&input))];
                    let fired = relu(ind.evaluate(&halves));
                    let expected = if a + b == class { 1.0 } else { 0.0 };
                    assert_eq!(fired, expected, "sum {} class {}", a + b, class);
                }
            }
        }
    }

    #[test]
    fn identity_forwards_non_negative_values() {
        let form = identity(2);
        assert_eq!(relu(form.evaluate(&[9.0, 9.0, 1.0])), 1.0);
        assert_eq!(relu(form.evaluate(&[9.0, 9.0, 0.0])), 0.0);
    }
}
