//! Property tests comparing the paging array against Vec<i64>

use proptest::prelude::*;

use pagesort::PagedArray;

proptest! {
    #[test]
    fn prop_reads_match_appends(
        values in prop::collection::vec(any::<i64>(), 0..300),
        hint in 8usize..64,
    ) {
        let mut array = PagedArray::new(hint).unwrap();
        for &v in &values {
            array.append(v).unwrap();
        }
        prop_assert_eq!(array.len(), values.len());
        for (i, &v) in values.iter().enumerate() {
            prop_assert_eq!(array.get(i).unwrap(), v);
        }
    }

    #[test]
    fn prop_sort_matches_reference(
        values in prop::collection::vec(any::<i64>(), 0..300),
        hint in 8usize..64,
    ) {
        let mut array = PagedArray::new(hint).unwrap();
        for &v in &values {
            array.append(v).unwrap();
        }
        array.sort().unwrap();

        let mut expected = values;
        expected.sort();
        for (i, &v) in expected.iter().enumerate() {
            prop_assert_eq!(array.get(i).unwrap(), v);
        }
    }

    #[test]
    fn prop_random_reads_after_partial_appends(
        values in prop::collection::vec(any::<i64>(), 1..200),
        hint in 8usize..32,
        seed in any::<prop::sample::Index>(),
    ) {
        // Interleave one read into the append stream and make sure
        // nothing is lost when writing resumes.
        let mut array = PagedArray::new(hint).unwrap();
        let split = seed.index(values.len());
        for &v in &values[..split] {
            array.append(v).unwrap();
        }
        if split > 0 {
            prop_assert_eq!(array.get(0).unwrap(), values[0]);
        }
        for &v in &values[split..] {
            array.append(v).unwrap();
        }
        for (i, &v) in values.iter().enumerate() {
            prop_assert_eq!(array.get(i).unwrap(), v);
        }
    }
}
