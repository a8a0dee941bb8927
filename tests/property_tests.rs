//! Algebraic properties of chains over generated inputs.

use std::collections::HashSet;

use lazyq::{JoinRow, JoinType, Query};
use proptest::prelude::*;

fn arb_items() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-20i32..20, 0..40)
}

fn arb_pairs() -> impl Strategy<Value = Vec<(u8, i32)>> {
    prop::collection::vec((0u8..6, any::<i32>()), 0..20)
}

/// Chains whose size estimate is known, built from a small instruction list.
fn arb_known_size_chain() -> impl Strategy<Value = (Vec<i32>, Vec<(u8, usize)>)> {
    (arb_items(), prop::collection::vec((0u8..7, 0usize..10), 0..6))
}

fn apply(q: Query<i32>, steps: &[(u8, usize)]) -> Query<i32> {
    steps.iter().fold(q, |q, &(op, n)| match op {
        0 => q.skip(n),
        1 => q.take(n),
        2 => q.exclude(n / 2, n),
        3 => q.map(|x| x.wrapping_mul(3)),
        4 => q.reverse(),
        5 => q.combine(vec![n as i32; n]),
        _ => q.zip(JoinType::Outer, vec![0; n]).map(|row| row.left.unwrap_or(-1)),
    })
}

fn unmatched_right(left: &[(u8, i32)], right: &[(u8, i32)]) -> Vec<JoinRow<(u8, i32), (u8, i32)>> {
    let keys: HashSet<u8> = left.iter().map(|p| p.0).collect();
    right
        .iter()
        .filter(|r| !keys.contains(&r.0))
        .map(|r| JoinRow::new(None, Some(*r)))
        .collect()
}

proptest! {
    #[test]
    fn take_and_skip_are_complementary(items in arb_items(), k in 0usize..50) {
        let k = k.min(items.len());
        let q = Query::from(items.clone());
        let mut rebuilt = q.take(k).to_vec().unwrap();
        rebuilt.extend(q.skip(k).to_vec().unwrap());
        prop_assert_eq!(rebuilt, items);
    }

    #[test]
    fn distinct_is_idempotent(items in arb_items()) {
        let once = Query::from(items).distinct();
        prop_assert_eq!(once.distinct().to_vec().unwrap(), once.to_vec().unwrap());
    }

    #[test]
    fn double_reverse_is_identity(items in arb_items()) {
        let q = Query::from(items.clone());
        prop_assert_eq!(q.reverse().reverse().to_vec().unwrap(), items);
    }

    #[test]
    fn order_by_is_stable(pairs in arb_pairs()) {
        let sorted = Query::from(pairs.clone()).order_by(|p| p.0).to_vec().unwrap();
        let mut expected = pairs;
        expected.sort_by_key(|p| p.0);
        prop_assert_eq!(sorted, expected);
    }

    #[test]
    fn inner_rows_are_outer_rows(left in arb_pairs(), right in arb_pairs()) {
        let l = Query::from(left.clone());
        let join = |join_type| {
            l.join(join_type, right.clone(), |p| p.0, |p| p.0).to_vec().unwrap()
        };
        let inner = join(JoinType::Inner);
        let outer = join(JoinType::Outer);
        for row in &inner {
            prop_assert!(outer.contains(row));
        }

        let mut left_plus_unmatched = join(JoinType::Left);
        left_plus_unmatched.extend(unmatched_right(&left, &right));
        prop_assert_eq!(left_plus_unmatched, outer);
    }

    #[test]
    fn known_estimates_are_exact((items, steps) in arb_known_size_chain()) {
        let q = apply(Query::from(items), &steps);
        let estimate = q.size_estimate();
        prop_assert!(estimate.is_some());
        prop_assert_eq!(estimate, Some(q.iter().count()));
    }

    #[test]
    fn filtered_estimates_stay_unknown(items in arb_items()) {
        let q = Query::from(items).filter(|x| *x > 0).skip(1);
        prop_assert_eq!(q.size_estimate(), None);
        prop_assert!(q.to_vec().is_ok());
    }
}
