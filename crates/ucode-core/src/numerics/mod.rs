/// Decimal exponent `e` with `10^e <= value < 10^(e+1)`.
///
/// `None` for zero, negative or non-finite input, where the magnitude is
/// undefined.
pub fn decade_exponent(value: f64) -> Option<i32> {
    if !value.is_finite() || value <= 0.0 {
        return None;
    }

    let mut exponent = value.log10().floor() as i32;
    // log10 can land one ulp either side of an exact power of ten.
    if power_of_ten(exponent) > value {
        exponent -= 1;
    } else if power_of_ten(exponent + 1) <= value {
        exponent += 1;
    }
    Some(exponent)
}

pub fn decade_magnitude(value: f64) -> Option<f64> {
    decade_exponent(value).map(power_of_ten)
}

/// `count` evenly spaced samples from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|index| {
                    if index == count - 1 {
                        end
                    } else {
                        start + step * index as f64
                    }
                })
                .collect()
        }
    }
}

/// Correctly rounded `10^exponent`; repeated multiplication drifts by an ulp
/// for negative exponents.
pub fn power_of_ten(exponent: i32) -> f64 {
    format!("1e{}", exponent)
        .parse()
        .unwrap_or_else(|_| 10f64.powi(exponent))
}

/// Lumped boundary conductance `K * L * W / M`.
pub fn conductance(hydraulic_conductivity: f64, length: f64, width: f64, thickness: f64) -> f64 {
    hydraulic_conductivity * length * width / thickness
}

#[cfg(test)]
mod tests {
    use super::{conductance, decade_exponent, decade_magnitude, linspace, power_of_ten};

    #[test]
    fn decade_exponent_floors_toward_negative_infinity() {
        assert_eq!(decade_exponent(5.0e-4), Some(-4));
        assert_eq!(decade_exponent(1.0e-3), Some(-3));
        assert_eq!(decade_exponent(0.25), Some(-1));
        assert_eq!(decade_exponent(1.0), Some(0));
        assert_eq!(decade_exponent(9.99), Some(0));
        assert_eq!(decade_exponent(1000.0), Some(3));
        assert_eq!(decade_exponent(12.0), Some(1));
    }

    #[test]
    fn decade_exponent_is_undefined_for_non_positive_values() {
        assert_eq!(decade_exponent(0.0), None);
        assert_eq!(decade_exponent(-1.0), None);
        assert_eq!(decade_exponent(f64::NAN), None);
        assert_eq!(decade_exponent(f64::INFINITY), None);
    }

    #[test]
    fn exact_powers_of_ten_stay_in_their_own_decade() {
        for exponent in -12..=12 {
            let value = power_of_ten(exponent);
            assert_eq!(decade_exponent(value), Some(exponent), "value {value}");
        }
        assert_eq!(decade_magnitude(0.3), Some(0.1));
    }

    #[test]
    fn linspace_includes_both_end_points() {
        let samples = linspace(1.0, 9.0, 5);
        assert_eq!(samples, vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(linspace(1.0, 9.0, 1), vec![1.0]);
        assert!(linspace(1.0, 9.0, 0).is_empty());
    }

    #[test]
    fn conductance_matches_river_bed_example() {
        let value = conductance(1.2e-5, 1000.0, 10.0, 10.0);
        assert!((value - 1.2e-2).abs() < 1.0e-15);
    }

    #[test]
    fn powers_of_ten_match_decimal_literals() {
        assert_eq!(power_of_ten(-7), 1.0e-7);
        assert_eq!(power_of_ten(-38), 1.0e-38);
        assert_eq!(power_of_ten(0), 1.0);
        assert_eq!(power_of_ten(5), 1.0e5);
    }
}
