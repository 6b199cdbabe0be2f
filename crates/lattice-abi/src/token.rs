//! Typed ABI values and the head/tail tuple encoder.

use crate::error::AbiError;
use lattice_types::Address;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::One;

/// ABI word size.
pub const WORD: usize = 32;

/// A value already checked against its parameter type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Uint(BigUint),
    Int(BigInt),
    Address(Address),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
    Array(Vec<Token>),
    FixedArray(Vec<Token>),
}

impl Token {
    pub fn is_dynamic(&self) -> bool {
        match self {
            Token::String(_) | Token::Bytes(_) | Token::Array(_) => true,
            Token::FixedArray(items) => items.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    /// Bytes this token takes in the head section of its enclosing tuple.
    fn head_len(&self) -> usize {
        match self {
            Token::FixedArray(items) if !self.is_dynamic() => {
                items.iter().map(Token::head_len).sum()
            }
            _ => WORD,
        }
    }
}

/// Encode tokens as a tuple: static values and offsets in the head,
/// dynamic payloads in the tail. Offsets count from the tuple start.
///
/// Tokens produced by [`tokenize`](crate::tokenize) always encode;
/// hand-built ones are rejected if they do not fit their word.
pub fn encode(tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
    let head_len: usize = tokens.iter().map(Token::head_len).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            encode_token(token, &mut tail)?;
        } else {
            encode_token(token, &mut head)?;
        }
    }

    head.extend_from_slice(&tail);
    Ok(head)
}

fn encode_token(token: &Token, out: &mut Vec<u8>) -> Result<(), AbiError> {
    match token {
        Token::Uint(v) => out.extend_from_slice(&uint_word(v)?),
        Token::Int(v) => out.extend_from_slice(&int_word(v)?),
        Token::Address(addr) => {
            let mut word = [0u8; WORD];
            word[WORD - Address::LEN..].copy_from_slice(addr.as_bytes());
            out.extend_from_slice(&word);
        }
        Token::Bool(b) => out.extend_from_slice(&usize_word(*b as usize)),
        Token::FixedBytes(bytes) => {
            if bytes.is_empty() || bytes.len() > WORD {
                return Err(AbiError::InvalidToken(format!(
                    "bytes{} is not a fixed-size byte type",
                    bytes.len()
                )));
            }
            let mut word = [0u8; WORD];
            word[..bytes.len()].copy_from_slice(bytes);
            out.extend_from_slice(&word);
        }
        Token::String(s) => encode_packed(s.as_bytes(), out),
        Token::Bytes(bytes) => encode_packed(bytes, out),
        Token::Array(items) => {
            out.extend_from_slice(&usize_word(items.len()));
            out.extend_from_slice(&encode(items)?);
        }
        Token::FixedArray(items) => out.extend_from_slice(&encode(items)?),
    }
    Ok(())
}

/// Length word followed by the data right-padded to a word boundary.
fn encode_packed(data: &[u8], out: &mut Vec<u8>) {
    out.extend_from_slice(&usize_word(data.len()));
    out.extend_from_slice(data);
    let rem = data.len() % WORD;
    if rem != 0 {
        out.resize(out.len() + WORD - rem, 0);
    }
}

fn usize_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn uint_word(value: &BigUint) -> Result<[u8; WORD], AbiError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > WORD {
        return Err(AbiError::InvalidToken(format!("{} exceeds 256 bits", value)));
    }
    let mut word = [0u8; WORD];
    word[WORD - bytes.len()..].copy_from_slice(&bytes);
    Ok(word)
}

/// Two's complement over 256 bits.
fn int_word(value: &BigInt) -> Result<[u8; WORD], AbiError> {
    let bound = BigInt::one() << (WORD * 8 - 1);
    if *value < -bound.clone() || *value >= bound {
        return Err(AbiError::InvalidToken(format!("{} exceeds int256", value)));
    }
    match value.sign() {
        Sign::Minus => {
            let modulus = BigInt::one() << (WORD * 8);
            uint_word((modulus + value).magnitude())
        }
        _ => uint_word(value.magnitude()),
    }
}
