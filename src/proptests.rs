//! Property-based tests for canonical form and arithmetic laws.

#[cfg(test)]
mod tests {
    use num_integer::Integer;
    use proptest::prelude::*;

    use crate::evaluator::evaluate_expression;
    use crate::rational::Rational;
    use crate::sequence::RationalSequence;

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -10_000i64..10_000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-10_000i64..=-1i64), (1i64..=10_000i64)]
    }

    fn rational() -> impl Strategy<Value = Rational> {
        (small_int(), non_zero_int()).prop_map(|(n, d)| Rational::new(n, d).unwrap())
    }

    // Denominators stay small so long sums keep a common denominator within i64
    fn small_fraction() -> impl Strategy<Value = Rational> {
        (-100i64..100i64, 1i64..=12i64).prop_map(|(n, d)| Rational::new(n, d).unwrap())
    }

    proptest! {
        #[test]
        fn construction_is_canonical(n in small_int(), d in non_zero_int()) {
            let r = Rational::new(n, d).unwrap();
            prop_assert!(r.denominator() > 0);
            prop_assert_eq!(r.numerator().gcd(&r.denominator()), 1);
            // same value as the input pair
            prop_assert_eq!(r.numerator() as i128 * d as i128, n as i128 * r.denominator() as i128);
        }

        #[test]
        fn zero_denominator_always_fails(n in any::<i64>()) {
            prop_assert!(Rational::new(n, 0).is_err());
        }

        #[test]
        fn display_round_trips(r in rational()) {
            let parsed: Rational = r.to_string().parse().unwrap();
            prop_assert_eq!(parsed, r);
        }

        #[test]
        fn add_commutative(a in rational(), b in rational()) {
            prop_assert_eq!(a.checked_add(b).unwrap(), b.checked_add(a).unwrap());
        }

        #[test]
        fn mul_commutative(a in rational(), b in rational()) {
            prop_assert_eq!(a.checked_mul(b).unwrap(), b.checked_mul(a).unwrap());
        }

        #[test]
        fn sub_then_add_is_identity(a in rational(), b in rational()) {
            prop_assert_eq!(a.checked_sub(b).unwrap().checked_add(b).unwrap(), a);
        }

        #[test]
        fn div_undoes_mul(a in rational(), b in rational()) {
            prop_assume!(!b.is_zero());
            prop_assert_eq!(a.checked_mul(b).unwrap().checked_div(b).unwrap(), a);
        }

        #[test]
        fn sum_matches_fold(values in prop::collection::vec(small_fraction(), 0..8)) {
            let seq: RationalSequence = values.iter().copied().collect();
            let mut expected = Rational::zero();
            for v in &values {
                expected = expected.checked_add(*v).unwrap();
            }
            prop_assert_eq!(seq.sum().unwrap(), expected);
        }

        #[test]
        fn sum_agrees_with_fold_on_overflow(values in prop::collection::vec(rational(), 0..16)) {
            let seq: RationalSequence = values.iter().copied().collect();
            let expected = values
                .iter()
                .try_fold(Rational::zero(), |total, v| total.checked_add(v));
            prop_assert_eq!(seq.sum(), expected);
        }

        #[test]
        fn multiplication_binds_tighter(a in rational(), b in rational(), c in rational()) {
            let line = format!("{} + {} * {}", a, b, c);
            let expected = a.checked_add(b.checked_mul(c).unwrap()).unwrap();
            prop_assert_eq!(evaluate_expression(&line).unwrap(), Some(expected));
        }
    }
}
