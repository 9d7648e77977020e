use std::collections::HashMap;

use itertools::Itertools;

use crate::error::{Error, Result};

/// Occurrence count of every symbol seen in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<u8, usize>,
    total: usize,
}

impl FrequencyTable {
    pub fn from_bytes(content: &[u8]) -> Result<Self> {
        if content.is_empty() {
            return Err(Error::EmptyInput);
        }

        let counts = content
            .iter()
            .copied()
            .into_grouping_map_by(|&symbol| symbol)
            .fold(0, |acc, _key, _value| acc + 1);

        Ok(Self {
            counts,
            total: content.len(),
        })
    }

    pub fn count(&self, symbol: u8) -> Option<usize> {
        self.counts.get(&symbol).copied()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct symbols.
    pub fn alphabet_size(&self) -> usize {
        self.counts.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}
