use std::cmp::Ordering;

use itertools::Itertools;

use crate::frequency::FrequencyTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbabilityEntry {
    pub symbol: u8,
    pub count: usize,
    pub probability: f64,
}

/// Symbols ordered by descending probability.
///
/// Equal probabilities are ordered by ascending symbol value so that the same
/// input always yields the same table, and therefore the same codes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable(Vec<ProbabilityEntry>);

// Probabilities are count / total with a shared total, so comparing counts
// orders them exactly without going through floating point.
fn cmp_entry_desc(a: &ProbabilityEntry, b: &ProbabilityEntry) -> Ordering {
    if b.count == a.count {
        return a.symbol.cmp(&b.symbol);
    }
    b.count.cmp(&a.count)
}

impl From<&FrequencyTable> for ProbabilityTable {
    fn from(frequencies: &FrequencyTable) -> Self {
        let total = frequencies.total() as f64;
        let entries = frequencies
            .iter()
            .map(|(symbol, count)| ProbabilityEntry {
                symbol,
                count,
                probability: count as f64 / total,
            })
            .sorted_by(cmp_entry_desc)
            .collect_vec();

        Self(entries)
    }
}

impl ProbabilityTable {
    pub fn entries(&self) -> &[ProbabilityEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::ProbabilityTable;
    use crate::frequency::FrequencyTable;

    fn table_for(input: &[u8]) -> ProbabilityTable {
        let frequencies = FrequencyTable::from_bytes(input).unwrap();
        ProbabilityTable::from(&frequencies)
    }

    #[test]
    fn test_probabilities_for_skewed_input() {
        let table = table_for(b"aaaabbbc");
        let rows = table
            .entries()
            .iter()
            .map(|entry| (entry.symbol, entry.probability))
            .collect::<Vec<_>>();

        assert_eq!(rows, vec![(b'a', 0.5), (b'b', 0.375), (b'c', 0.125)]);
    }

    #[rstest]
    #[case(b"cba", b"abc")]
    #[case(b"zzyyxx", b"xyz")]
    #[case(b"qqqbbaa", b"qab")]
    fn test_ties_are_ordered_by_symbol(#[case] input: &[u8], #[case] expected: &[u8]) {
        let order = table_for(input)
            .entries()
            .iter()
            .map(|entry| entry.symbol)
            .collect::<Vec<_>>();

        assert_eq!(order, expected);
    }

    proptest! {
        #[test]
        fn prop_probabilities_sum_to_one(
            input in prop::collection::vec(any::<u8>(), 1..2000)
        ) {
            let table = table_for(&input);
            let sum: f64 = table.entries().iter().map(|entry| entry.probability).sum();
            prop_assert!((sum - 1.0).abs() < 1e-6);
        }

        #[test]
        fn prop_probabilities_are_descending(
            input in prop::collection::vec(any::<u8>(), 1..2000)
        ) {
            let table = table_for(&input);
            for pair in table.entries().windows(2) {
                prop_assert!(pair[0].probability >= pair[1].probability);
            }
        }
    }
}
