//! Shannon-Fano prefix coding of byte streams.
//!
//! [`encode`] counts the symbols of its input, builds a prefix-free code by
//! repeatedly bisecting the probability-sorted alphabet, and writes a text
//! artifact holding the code table and the encoded bits. [`decode`] reads such
//! an artifact back into the original bytes.

pub mod artifact;
pub mod codeword;
pub mod encode_decode;
pub mod error;
pub mod frequency;
pub mod prefix_code_table;
pub mod probability;
pub mod whitespace;

pub use artifact::{Artifact, ArtifactRow};
pub use codeword::Codeword;
pub use encode_decode::{decode, decode_artifact, encode, encode_bytes};
pub use error::{Error, Result};
pub use prefix_code_table::{generate_codes, CodeTable};
