use std::{fmt, str::FromStr};

use bit_vec::BitVec;

/// The bits assigned to one symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Codeword(BitVec);

impl Codeword {
    pub fn new() -> Self {
        Self(BitVec::new())
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter()
    }

    pub fn clear(&mut self) {
        self.0.truncate(0)
    }

    /// True when `self` is a proper prefix of `other`.
    pub fn is_prefix_of(&self, other: &Codeword) -> bool {
        self.len() < other.len() && self.bits().zip(other.bits()).all(|(a, b)| a == b)
    }
}

impl FromIterator<bool> for Codeword {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBit(pub char);

impl fmt::Display for InvalidBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected '0' or '1', found {:?}", self.0)
    }
}

pub(crate) fn parse_bit(ch: u8) -> Result<bool, InvalidBit> {
    match ch {
        b'0' => Ok(false),
        b'1' => Ok(true),
        other => Err(InvalidBit(other as char)),
    }
}

impl FromStr for Codeword {
    type Err = InvalidBit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.bytes().map(parse_bit).collect()
    }
}
