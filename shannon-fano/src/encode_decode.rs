use std::{
    collections::HashMap,
    io::{BufRead, Read, Write},
};

use bit_vec::BitVec;
use log::{debug, info};

use crate::{
    artifact::{Artifact, ArtifactRow},
    codeword::Codeword,
    error::{Error, Result},
    frequency::FrequencyTable,
    prefix_code_table::{generate_codes, CodeTable},
    probability::ProbabilityTable,
    whitespace::printable,
};

/// Builds the code for `content` and encodes it.
pub fn encode_bytes(content: &[u8]) -> Result<Artifact> {
    let frequencies = FrequencyTable::from_bytes(content)?;
    let table = ProbabilityTable::from(&frequencies);
    debug!(
        "{} symbols over an alphabet of {}",
        frequencies.total(),
        table.len()
    );

    let codes = generate_codes(&table);
    let bits = encode_symbols(content, &codes)?;

    let rows = table
        .entries()
        .iter()
        .map(|entry| -> Result<ArtifactRow> {
            let codeword = codes
                .get(entry.symbol)
                .cloned()
                .ok_or(Error::UnknownSymbol {
                    symbol: entry.symbol,
                })?;
            debug!(
                "{}\t{:.6}\t{}",
                printable(entry.symbol),
                entry.probability,
                codeword
            );
            Ok(ArtifactRow {
                symbol: entry.symbol,
                probability: entry.probability,
                codeword,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!("encoded {} bytes into {} bits", content.len(), bits.len());
    Ok(Artifact::new(rows, bits))
}

/// Concatenates the codeword of every symbol of `content`, in order.
pub fn encode_symbols(content: &[u8], codes: &CodeTable) -> Result<BitVec> {
    let mut bits = BitVec::new();
    for &symbol in content {
        let codeword = codes
            .get(symbol)
            .ok_or(Error::UnknownSymbol { symbol })?;
        bits.extend(codeword.bits());
    }
    Ok(bits)
}

/// Reads bits one at a time, emitting a symbol whenever the bits collected
/// since the previous symbol equal a codeword.
///
/// With a prefix-free table at most one codeword can match, and a valid
/// stream always matches within the longest codeword length.
pub fn decode_bits(bits: &BitVec, codes: &CodeTable) -> Result<Vec<u8>> {
    let symbols_by_code = codes
        .iter()
        .map(|(symbol, code)| (code, symbol))
        .collect::<HashMap<&Codeword, u8>>();
    let max_codeword_len = codes.max_codeword_len();

    let mut decoded = Vec::new();
    let mut accumulator = Codeword::new();

    for bit in bits.iter() {
        accumulator.push(bit);
        if let Some(&symbol) = symbols_by_code.get(&accumulator) {
            decoded.push(symbol);
            accumulator.clear();
        } else if accumulator.len() >= max_codeword_len {
            return Err(Error::UnmatchedBits {
                bits: accumulator.to_string(),
            });
        }
    }

    if !accumulator.is_empty() {
        return Err(Error::UnmatchedBits {
            bits: accumulator.to_string(),
        });
    }

    info!("decoded {} bits into {} bytes", bits.len(), decoded.len());
    Ok(decoded)
}

pub fn decode_artifact(artifact: &Artifact) -> Result<Vec<u8>> {
    decode_bits(artifact.bits(), &artifact.code_table())
}

/// Encodes everything `reader` yields and writes the artifact to `writer`.
///
/// Nothing is written unless encoding succeeds.
pub fn encode<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<Artifact> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;

    let artifact = encode_bytes(&content)?;
    artifact.write_to(writer)?;
    Ok(artifact)
}

/// Decodes the artifact `reader` yields and writes the original bytes to
/// `writer`, returning how many were written.
///
/// Nothing is written unless decoding succeeds.
pub fn decode<R: BufRead, W: Write>(reader: &mut R, writer: &mut W) -> Result<usize> {
    let artifact = Artifact::read_from(reader)?;
    let decoded = decode_artifact(&artifact)?;

    writer.write_all(&decoded)?;
    writer.flush()?;
    Ok(decoded.len())
}
