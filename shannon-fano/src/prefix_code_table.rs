use itertools::Itertools;
use log::debug;

use crate::{
    codeword::Codeword,
    probability::{ProbabilityEntry, ProbabilityTable},
};

const ALPHABET_SIZE: usize = 256;

/// Codeword of every symbol in the alphabet, indexed by symbol value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable(Vec<Option<Codeword>>);

impl Default for CodeTable {
    fn default() -> Self {
        Self(vec![None; ALPHABET_SIZE])
    }
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, symbol: u8) -> Option<&Codeword> {
        self.0[symbol as usize].as_ref()
    }

    /// Returns the codeword previously stored for `symbol`, if any.
    pub fn insert(&mut self, symbol: u8, codeword: Codeword) -> Option<Codeword> {
        self.0[symbol as usize].replace(codeword)
    }

    pub fn len(&self) -> usize {
        self.0.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Codeword)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u8, code)))
    }

    pub fn max_codeword_len(&self) -> usize {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Returns the first pair `(a, b)` found where the codeword of `a` equals or
    /// is a proper prefix of the codeword of `b`.
    pub fn find_prefix_conflict(&self) -> Option<(u8, u8)> {
        self.iter()
            .collect_vec()
            .iter()
            .tuple_combinations()
            .find_map(|(&(a, code_a), &(b, code_b))| {
                if code_a == code_b || code_a.is_prefix_of(code_b) {
                    Some((a, b))
                } else if code_b.is_prefix_of(code_a) {
                    Some((b, a))
                } else {
                    None
                }
            })
    }

    pub fn is_prefix_free(&self) -> bool {
        self.find_prefix_conflict().is_none()
    }

    fn push_bit(&mut self, symbol: u8, bit: bool) {
        self.0[symbol as usize]
            .get_or_insert_with(Codeword::new)
            .push(bit)
    }
}

/// Builds a Shannon-Fano code for the symbols of `table`.
///
/// The table is split recursively into two runs of as-equal-as-possible
/// weight; every symbol in the left run gets a `0` and every symbol in the
/// right run a `1`, until each run holds a single symbol. A lone symbol gets
/// the codeword `0` so that it still consumes bits in the stream.
pub fn generate_codes(table: &ProbabilityTable) -> CodeTable {
    let entries = table.entries();
    let mut codes = CodeTable::new();

    match entries {
        [] => {}
        [only] => {
            codes.push_bit(only.symbol, false);
        }
        _ => bisect(entries, 0, entries.len() - 1, &mut codes),
    }

    debug!(
        "generated {} codewords, longest is {} bits",
        codes.len(),
        codes.max_codeword_len()
    );
    codes
}

/// Appends one bit to every symbol in `entries[lo..=hi]` and recurses on the
/// two halves. Both halves are always non-empty, so each call strictly shrinks
/// the range and every symbol stops growing once its range is a single entry.
fn bisect(entries: &[ProbabilityEntry], lo: usize, hi: usize, codes: &mut CodeTable) {
    if lo == hi {
        return;
    }

    if hi - lo == 1 {
        codes.push_bit(entries[lo].symbol, false);
        codes.push_bit(entries[hi].symbol, true);
        return;
    }

    // `2 * cumulative <= total` is `cumulative probability <= half` scaled by
    // the shared denominator.
    let total: usize = entries[lo..=hi].iter().map(|entry| entry.count).sum();
    let mut cumulative = 0;
    let split = (lo..=hi)
        .find(|&i| {
            cumulative += entries[i].count;
            2 * cumulative > total
        })
        .unwrap_or(lo + 1)
        .clamp(lo + 1, hi);

    for (i, entry) in entries.iter().enumerate().take(hi + 1).skip(lo) {
        codes.push_bit(entry.symbol, i >= split);
    }

    bisect(entries, lo, split - 1, codes);
    bisect(entries, split, hi, codes);
}
