//! Round-Trip Properties
//!
//! For every standard binding, `deserialize(serialize(v))` gives back `v`.

use crate::common::*;
use proptest::prelude::*;

fn round_trip<T: DomainType>(value: &T) -> T {
    let text = jsonbind::serialize(value).unwrap();
    jsonbind::deserialize_as::<T>(&text).unwrap()
}

proptest! {
    #[test]
    fn ints_round_trip(i in any::<i64>()) {
        prop_assert_eq!(round_trip(&i), i);
    }

    #[test]
    fn finite_floats_round_trip(f in -1.0e15f64..1.0e15) {
        prop_assert_eq!(round_trip(&f), f);
    }

    #[test]
    fn strings_round_trip(s in any::<String>()) {
        prop_assert_eq!(round_trip(&s), s);
    }

    #[test]
    fn bytes_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(round_trip(&bytes), bytes);
    }

    #[test]
    fn int_lists_round_trip(values in prop::collection::vec(any::<i64>(), 0..32)) {
        let list = ints(&values);
        prop_assert_eq!(round_trip(&list), list);
    }

    #[test]
    fn records_round_trip(x in any::<i64>(), y in any::<i64>(), z in any::<i64>()) {
        let p = Point3 { x, y, z };
        prop_assert_eq!(round_trip(&p), p);
    }

    #[test]
    fn dicts_round_trip(entries in prop::collection::vec(("[a-z]{1,8}", any::<i64>()), 0..16)) {
        let dict: Dict = entries
            .into_iter()
            .map(|(k, v)| (k, Box::new(v) as DomainValue))
            .collect();
        prop_assert_eq!(round_trip(&dict), dict);
    }
}
