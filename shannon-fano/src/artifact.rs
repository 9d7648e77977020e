use std::{
    collections::HashSet,
    io::{BufRead, Read, Write},
};

use bit_vec::BitVec;
use itertools::Itertools;

use crate::{
    codeword::{parse_bit, Codeword},
    error::{Error, Result},
    prefix_code_table::CodeTable,
};

const MAX_ALPHABET_SIZE: usize = 256;

/// One line of the artifact header.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactRow {
    pub symbol: u8,
    pub probability: f64,
    pub codeword: Codeword,
}

/// The persisted result of an encode: the code table and the encoded bits.
///
/// On disk it is text:
///
/// ```text
/// <alphabet size>
/// <symbol byte>\t<probability>\t<codeword>     one row per symbol
/// <empty line>
/// <bits as '0'/'1' characters>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    rows: Vec<ArtifactRow>,
    bits: BitVec,
}

impl Artifact {
    pub fn new(rows: Vec<ArtifactRow>, bits: BitVec) -> Self {
        Self { rows, bits }
    }

    pub fn rows(&self) -> &[ArtifactRow] {
        &self.rows
    }

    pub fn bits(&self) -> &BitVec {
        &self.bits
    }

    pub fn code_table(&self) -> CodeTable {
        let mut codes = CodeTable::new();
        for row in &self.rows {
            codes.insert(row.symbol, row.codeword.clone());
        }
        codes
    }

    pub fn bits_as_text(&self) -> String {
        self.bits
            .iter()
            .map(|bit| if bit { '1' } else { '0' })
            .collect()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "{}", self.rows.len())?;

        for row in &self.rows {
            writer.write_all(&[row.symbol, b'\t'])?;
            writeln!(writer, "{:.6}\t{}", row.probability, row.codeword)?;
        }

        writeln!(writer)?;
        writer.write_all(self.bits_as_text().as_bytes())?;
        writer.flush()?;

        Ok(())
    }

    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self> {
        let alphabet_size = read_alphabet_size(reader)?;

        let mut rows = Vec::with_capacity(alphabet_size);
        let mut seen_symbols = HashSet::with_capacity(alphabet_size);
        for index in 0..alphabet_size {
            let line_number = index + 2;
            let row = read_row(reader, line_number)?;
            if !seen_symbols.insert(row.symbol) {
                return Err(Error::malformed(
                    line_number,
                    format!("duplicate row for symbol {:#04x}", row.symbol),
                ));
            }
            rows.push(row);
        }

        let separator_line = alphabet_size + 2;
        let separator = read_line(reader)?;
        if !separator.is_some_and(|line| trim_line_ending(&line).is_empty()) {
            return Err(Error::malformed(
                separator_line,
                "expected an empty line after the code table",
            ));
        }

        let mut remainder = Vec::new();
        reader.read_to_end(&mut remainder)?;
        let bits = parse_bits(trim_line_ending(&remainder), separator_line + 1)?;

        let artifact = Self { rows, bits };
        if let Some((prefix, longer)) = artifact.code_table().find_prefix_conflict() {
            return Err(Error::malformed(
                1,
                format!(
                    "code table is not prefix free: codeword of {prefix:#04x} is a prefix of the codeword of {longer:#04x}"
                ),
            ));
        }

        Ok(artifact)
    }
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut line = Vec::new();
    if reader.read_until(b'\n', &mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n")
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .unwrap_or(line)
}

fn read_alphabet_size<R: BufRead>(reader: &mut R) -> Result<usize> {
    let line = read_line(reader)?.ok_or_else(|| Error::malformed(1, "artifact is empty"))?;
    let text = std::str::from_utf8(trim_line_ending(&line))
        .map_err(|_| Error::malformed(1, "alphabet size is not valid text"))?;

    let alphabet_size = text
        .trim()
        .parse::<usize>()
        .map_err(|err| Error::malformed(1, format!("invalid alphabet size {text:?}: {err}")))?;

    if alphabet_size == 0 || alphabet_size > MAX_ALPHABET_SIZE {
        return Err(Error::malformed(
            1,
            format!("alphabet size {alphabet_size} is outside 1..={MAX_ALPHABET_SIZE}"),
        ));
    }

    Ok(alphabet_size)
}

// The symbol is a raw byte and may itself be a tab or a newline, so it is
// taken before the rest of the row is split into fields.
fn read_row<R: BufRead>(reader: &mut R, line_number: usize) -> Result<ArtifactRow> {
    let line = read_line(reader)?.ok_or_else(|| {
        Error::malformed(line_number, "artifact ended before all table rows were read")
    })?;

    let (symbol, rest) = match line.as_slice() {
        [b'\n'] => {
            // a newline symbol: its row continues on the next physical line
            let continuation = read_line(reader)?.ok_or_else(|| {
                Error::malformed(line_number, "artifact ended inside a table row")
            })?;
            (b'\n', continuation)
        }
        [symbol, rest @ ..] => (*symbol, rest.to_vec()),
        [] => return Err(Error::malformed(line_number, "empty table row")),
    };

    let fields = trim_line_ending(&rest)
        .strip_prefix(b"\t")
        .ok_or_else(|| Error::malformed(line_number, "expected a tab after the symbol"))?;

    let (probability, codeword) = fields
        .split(|&byte| byte == b'\t')
        .collect_tuple()
        .ok_or_else(|| {
            Error::malformed(line_number, "expected `symbol<TAB>probability<TAB>codeword`")
        })?;

    let probability = std::str::from_utf8(probability)
        .ok()
        .and_then(|text| text.trim().parse::<f64>().ok())
        .filter(|probability| (0.0..=1.0).contains(probability))
        .ok_or_else(|| Error::malformed(line_number, "invalid probability"))?;

    if codeword.is_empty() {
        return Err(Error::malformed(line_number, "empty codeword"));
    }
    let codeword = codeword
        .iter()
        .map(|&ch| parse_bit(ch))
        .collect::<std::result::Result<Codeword, _>>()
        .map_err(|err| Error::malformed(line_number, format!("invalid codeword: {err}")))?;

    Ok(ArtifactRow {
        symbol,
        probability,
        codeword,
    })
}

fn parse_bits(text: &[u8], line_number: usize) -> Result<BitVec> {
    text.iter()
        .map(|&ch| parse_bit(ch))
        .collect::<std::result::Result<BitVec, _>>()
        .map_err(|err| Error::malformed(line_number, format!("invalid bitstream: {err}")))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bit_vec::BitVec;
    use rstest::rstest;

    use super::{Artifact, ArtifactRow};
    use crate::error::Error;

    fn row(symbol: u8, probability: f64, codeword: &str) -> ArtifactRow {
        ArtifactRow {
            symbol,
            probability,
            codeword: codeword.parse().unwrap(),
        }
    }

    fn bits(text: &str) -> BitVec {
        text.chars().map(|ch| ch == '1').collect()
    }

    fn parse(text: &[u8]) -> Result<Artifact, Error> {
        Artifact::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn test_writing() {
        let artifact = Artifact::new(
            vec![row(b'a', 0.5, "0"), row(b'b', 0.375, "10"), row(b'c', 0.125, "11")],
            bits("00001010101011"),
        );

        let mut output = Vec::new();
        artifact.write_to(&mut output).unwrap();

        let expected = "3\na\t0.500000\t0\nb\t0.375000\t10\nc\t0.125000\t11\n\n00001010101011";
        assert_eq!(String::from_utf8(output).unwrap(), expected);
    }

    #[test]
    fn test_reading() {
        let artifact = parse(b"2\nx\t0.750000\t0\ny\t0.250000\t1\n\n0001").unwrap();

        assert_eq!(artifact.rows(), &[row(b'x', 0.75, "0"), row(b'y', 0.25, "1")]);
        assert_eq!(artifact.bits_as_text(), "0001");
    }

    #[rstest]
    #[case::tab(b'\t')]
    #[case::newline(b'\n')]
    #[case::carriage_return(b'\r')]
    #[case::space(b' ')]
    #[case::high_byte(0xFF)]
    fn test_whitespace_and_raw_symbols_survive(#[case] symbol: u8) {
        let artifact = Artifact::new(
            vec![row(symbol, 0.5, "0"), row(b'q', 0.5, "1")],
            bits("0110"),
        );

        let mut output = Vec::new();
        artifact.write_to(&mut output).unwrap();

        assert_eq!(parse(&output).unwrap(), artifact);
    }

    #[rstest]
    #[case::windows_line_endings(b"1\r\nz\t1.000000\t0\r\n\r\n000\r\n")]
    #[case::trailing_newline(b"1\nz\t1.000000\t0\n\n000\n")]
    fn test_line_endings_are_tolerated(#[case] text: &[u8]) {
        let artifact = parse(text).unwrap();
        assert_eq!(artifact.bits_as_text(), "000");
    }

    #[rstest]
    #[case::empty(b"", 1)]
    #[case::size_not_a_number(b"three\n", 1)]
    #[case::size_zero(b"0\n\n", 1)]
    #[case::size_too_large(b"257\n", 1)]
    #[case::row_count_mismatch(b"3\na\t0.500000\t0\nb\t0.500000\t1\n\n01", 4)]
    #[case::missing_tab(b"1\nz 1.000000\t0\n\n0", 2)]
    #[case::missing_codeword(b"1\nz\t1.000000\n\n0", 2)]
    #[case::bad_probability(b"1\nz\tlots\t0\n\n0", 2)]
    #[case::probability_out_of_range(b"1\nz\t1.500000\t0\n\n0", 2)]
    #[case::empty_codeword(b"1\nz\t1.000000\t\n\n0", 2)]
    #[case::bad_codeword(b"1\nz\t1.000000\t0a\n\n0", 2)]
    #[case::duplicate_symbol(b"2\nz\t0.500000\t0\nz\t0.500000\t1\n\n0", 3)]
    #[case::missing_separator(b"1\nz\t1.000000\t0\n0", 3)]
    #[case::bad_bitstream(b"1\nz\t1.000000\t0\n\n0120", 4)]
    #[case::not_prefix_free(b"2\na\t0.500000\t0\nb\t0.500000\t01\n\n0", 1)]
    fn test_malformed_artifacts(#[case] text: &[u8], #[case] expected_line: usize) {
        match parse(text) {
            Err(Error::MalformedArtifact { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected a malformed artifact error, got {other:?}"),
        }
    }
}
