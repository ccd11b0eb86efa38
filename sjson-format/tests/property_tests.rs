//! Property-based tests for SJSON format primitives

use proptest::prelude::*;
use serde_json::json;
use sjson_format::{BigInt, Pattern, UniqueSet};
use std::cmp::Ordering;

fn big(value: i128) -> BigInt {
    BigInt::from(value)
}

proptest! {
    #[test]
    fn bigint_add_sub_mul_match_i128(a in any::<i64>(), b in any::<i64>()) {
        let (wa, wb) = (i128::from(a), i128::from(b));
        let sum = big(wa).add(&big(wb));
        let difference = big(wa).subtract(&big(wb));
        let product = big(wa).multiply(&big(wb));
        prop_assert_eq!(sum.as_str(), (wa + wb).to_string());
        prop_assert_eq!(difference.as_str(), (wa - wb).to_string());
        prop_assert_eq!(product.as_str(), (wa * wb).to_string());
    }

    #[test]
    fn bigint_div_mod_match_i128(a in any::<i128>(), b in any::<i64>()) {
        prop_assume!(b != 0);
        prop_assume!(a != i128::MIN);
        let wb = i128::from(b);
        let quotient = big(a).divide(&big(wb)).unwrap();
        let remainder = big(a).modulo(&big(wb)).unwrap();
        prop_assert_eq!(quotient.as_str(), (a / wb).to_string());
        prop_assert_eq!(remainder.as_str(), (a % wb).to_string());
    }

    #[test]
    fn bigint_wide_division_reconstructs_dividend(
        a in any::<i128>(),
        b in any::<i128>(),
    ) {
        prop_assume!(b != 0);
        let product = big(a).multiply(&big(b));
        let quotient = product.divide(&big(b)).unwrap();
        prop_assert_eq!(quotient.as_str(), a.to_string());
        prop_assert!(product.modulo(&big(b)).unwrap().is_zero());
    }

    #[test]
    fn bigint_ordering_matches_i128(a in any::<i128>(), b in any::<i128>()) {
        prop_assert_eq!(big(a).compare(&big(b)), a.cmp(&b));
        prop_assert_eq!(big(a) == big(b), a == b);
    }

    #[test]
    fn bigint_leading_zeros_do_not_change_value(value in any::<u64>(), zeros in 0usize..5) {
        let padded = format!("{}{}", "0".repeat(zeros), value);
        let parsed = BigInt::new(padded.clone()).unwrap();
        prop_assert_eq!(parsed.as_str(), padded.as_str());
        prop_assert_eq!(parsed.compare(&BigInt::from(value)), Ordering::Equal);
    }

    #[test]
    fn set_keeps_first_occurrences(items in prop::collection::vec(0u8..20, 0..100)) {
        let set: UniqueSet = items.iter().map(|i| json!(i)).collect();
        let mut expected = Vec::new();
        for item in &items {
            if !expected.contains(item) {
                expected.push(*item);
            }
        }
        let expected: Vec<_> = expected.into_iter().map(|i| json!(i)).collect();
        prop_assert_eq!(set.items(), expected.as_slice());
    }

    #[test]
    fn pattern_text_form_parses_back(source in "[a-z0-9.*+?]{0,12}", flags in prop::sample::subsequence(vec!['g', 'i', 'm', 's', 'u', 'y'], 0..6)) {
        let flags: String = flags.into_iter().collect();
        let pattern = Pattern::new(source, flags).unwrap();
        prop_assert_eq!(Pattern::parse(&pattern.to_string()), pattern);
    }
}
