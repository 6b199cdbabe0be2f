//! Conversion of loosely typed arguments into tokens.

use crate::error::AbiError;
use crate::param_type::ParamType;
use crate::token::Token;
use crate::value::ArgValue;
use lattice_types::Address;
use num_bigint::BigInt;
use num_traits::{One, Signed};

/// Convert `value` to a token of type `ty`. `arg` names the argument in
/// error messages.
pub fn tokenize(arg: &str, ty: &ParamType, value: &ArgValue) -> Result<Token, AbiError> {
    match ty {
        ParamType::Uint(bits) => {
            let n = to_integer(arg, ty, value)?;
            check_range(arg, ty, &n, *bits, false)?;
            Ok(Token::Uint(n.magnitude().clone()))
        }
        ParamType::Int(bits) => {
            let n = to_integer(arg, ty, value)?;
            check_range(arg, ty, &n, *bits, true)?;
            Ok(Token::Int(n))
        }
        ParamType::Bool => match value {
            ArgValue::Bool(b) => Ok(Token::Bool(*b)),
            ArgValue::Text(s) if s == "true" => Ok(Token::Bool(true)),
            ArgValue::Text(s) if s == "false" => Ok(Token::Bool(false)),
            other => Err(mismatch(arg, ty, other)),
        },
        ParamType::String => match value {
            ArgValue::Text(s) => Ok(Token::String(s.clone())),
            other => Err(mismatch(arg, ty, other)),
        },
        ParamType::Address => match value {
            ArgValue::Text(s) => parse_address(arg, s).map(Token::Address),
            other => Err(mismatch(arg, ty, other)),
        },
        ParamType::Bytes => to_bytes(arg, ty, value).map(Token::Bytes),
        ParamType::FixedBytes(len) => {
            let bytes = to_bytes(arg, ty, value)?;
            if bytes.len() != *len {
                return Err(AbiError::LengthMismatch {
                    arg: arg.to_string(),
                    ty: ty.canonical(),
                    expected: *len,
                    actual: bytes.len(),
                });
            }
            Ok(Token::FixedBytes(bytes))
        }
        ParamType::Array(inner) => {
            let items = to_list(arg, ty, value)?;
            tokenize_items(arg, inner, &items).map(Token::Array)
        }
        ParamType::FixedArray(inner, len) => {
            let items = to_list(arg, ty, value)?;
            if items.len() != *len {
                return Err(AbiError::LengthMismatch {
                    arg: arg.to_string(),
                    ty: ty.canonical(),
                    expected: *len,
                    actual: items.len(),
                });
            }
            tokenize_items(arg, inner, &items).map(Token::FixedArray)
        }
    }
}

fn tokenize_items(arg: &str, inner: &ParamType, items: &[ArgValue]) -> Result<Vec<Token>, AbiError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| tokenize(&format!("{}[{}]", arg, i), inner, item))
        .collect()
}

fn mismatch(arg: &str, ty: &ParamType, value: &ArgValue) -> AbiError {
    AbiError::ArgumentTypeMismatch {
        arg: arg.to_string(),
        expected: ty.canonical(),
        found: value.kind(),
    }
}

fn to_integer(arg: &str, ty: &ParamType, value: &ArgValue) -> Result<BigInt, AbiError> {
    match value {
        ArgValue::Int(n) => Ok(n.clone()),
        ArgValue::Float(f) => Err(AbiError::FloatNotSupported {
            arg: arg.to_string(),
            ty: ty.canonical(),
            value: f.to_string(),
        }),
        ArgValue::Text(s) => parse_integer(arg, ty, s),
        other => Err(mismatch(arg, ty, other)),
    }
}

/// Decimal, or hex with a `0x` prefix; either may carry a leading `-`.
fn parse_integer(arg: &str, ty: &ParamType, text: &str) -> Result<BigInt, AbiError> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    // BigInt::parse_bytes takes its own sign and `_` separators; only bare
    // digits may reach it.
    let parsed = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_hexdigit()) => {
            BigInt::parse_bytes(digits.as_bytes(), 16)
        }
        Some(_) => None,
        None if !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit()) => {
            BigInt::parse_bytes(body.as_bytes(), 10)
        }
        None => None,
    };

    match parsed {
        Some(n) if negative => Ok(-n),
        Some(n) => Ok(n),
        None if trimmed.parse::<f64>().is_ok() => Err(AbiError::FloatNotSupported {
            arg: arg.to_string(),
            ty: ty.canonical(),
            value: trimmed.to_string(),
        }),
        None => Err(AbiError::InvalidNumber {
            arg: arg.to_string(),
            value: text.to_string(),
        }),
    }
}

fn check_range(
    arg: &str,
    ty: &ParamType,
    n: &BigInt,
    bits: usize,
    signed: bool,
) -> Result<(), AbiError> {
    let in_range = if signed {
        let bound = BigInt::one() << (bits - 1);
        let min = -bound.clone();
        *n >= min && *n < bound
    } else {
        !n.is_negative() && n < &(BigInt::one() << bits)
    };

    if in_range {
        Ok(())
    } else {
        Err(AbiError::IntegerOverflow {
            arg: arg.to_string(),
            ty: ty.canonical(),
            value: n.to_string(),
        })
    }
}

fn parse_address(arg: &str, text: &str) -> Result<Address, AbiError> {
    let text = text.trim();
    let parsed = if text.starts_with("0x") || text.starts_with("0X") {
        Address::from_hex(text)
    } else {
        Address::from_text(text)
    };
    parsed.map_err(|_| AbiError::InvalidAddress {
        arg: arg.to_string(),
        value: text.to_string(),
    })
}

fn to_bytes(arg: &str, ty: &ParamType, value: &ArgValue) -> Result<Vec<u8>, AbiError> {
    match value {
        ArgValue::Bytes(bytes) => Ok(bytes.clone()),
        ArgValue::Text(s) => {
            let s = s.trim();
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .ok_or_else(|| AbiError::InvalidHex {
                    arg: arg.to_string(),
                    reason: "missing 0x prefix".to_string(),
                })?;
            hex::decode(digits).map_err(|e| AbiError::InvalidHex {
                arg: arg.to_string(),
                reason: e.to_string(),
            })
        }
        other => Err(mismatch(arg, ty, other)),
    }
}

fn to_list(arg: &str, ty: &ParamType, value: &ArgValue) -> Result<Vec<ArgValue>, AbiError> {
    match value {
        ArgValue::List(items) => Ok(items.clone()),
        ArgValue::Text(s) => split_bracketed(s)
            .map(|parts| parts.into_iter().map(ArgValue::Text).collect())
            .ok_or_else(|| mismatch(arg, ty, value)),
        other => Err(mismatch(arg, ty, other)),
    }
}

/// Split `["a", "b", [1,2]]` into its top-level elements, unquoting each.
/// Returns `None` if the text is not bracketed.
fn split_bracketed(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in inner.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.checked_sub(1)?,
            (None, ',') if depth == 0 => {
                parts.push(unquote(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if quote.is_some() || depth != 0 {
        return None;
    }
    parts.push(unquote(&current));
    Some(parts)
}

fn unquote(s: &str) -> String {
    let s = s.trim();
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> ParamType {
        s.parse().unwrap()
    }

    #[test]
    fn test_uint_bounds() {
        let uint16 = ty("uint16");
        assert!(tokenize("#0", &uint16, &ArgValue::from(32767u32)).is_ok());
        assert!(tokenize("#0", &uint16, &ArgValue::from(65535u32)).is_ok());
        assert!(matches!(
            tokenize("#0", &uint16, &ArgValue::from(65536u32)),
            Err(AbiError::IntegerOverflow { .. })
        ));
        assert!(matches!(
            tokenize("#0", &uint16, &ArgValue::from(-1i32)),
            Err(AbiError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn test_int_bounds() {
        let int8 = ty("int8");
        assert_eq!(
            tokenize("#0", &int8, &"-128".into()).unwrap(),
            Token::Int(BigInt::from(-128))
        );
        assert!(tokenize("#0", &int8, &"127".into()).is_ok());
        assert!(tokenize("#0", &int8, &"128".into()).is_err());
        assert!(tokenize("#0", &int8, &"-129".into()).is_err());
    }

    #[test]
    fn test_integer_text_forms() {
        let uint256 = ty("uint256");
        assert_eq!(
            tokenize("#0", &uint256, &"0xff".into()).unwrap(),
            tokenize("#0", &uint256, &"255".into()).unwrap()
        );
        assert!(matches!(
            tokenize("#0", &uint256, &"1.5".into()),
            Err(AbiError::FloatNotSupported { .. })
        ));
        assert!(matches!(
            tokenize("#0", &uint256, &ArgValue::Float(2.0)),
            Err(AbiError::FloatNotSupported { .. })
        ));
        assert!(matches!(
            tokenize("#0", &uint256, &"ten".into()),
            Err(AbiError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_malformed_hex_integers() {
        let uint256 = ty("uint256");
        let int256 = ty("int256");
        for (t, text) in [
            (&uint256, "-0x-5"),
            (&uint256, "0x+ff"),
            (&uint256, "0x1_0"),
            (&int256, "0x-5"),
            (&uint256, "0x"),
            (&uint256, "1_0"),
        ] {
            assert!(
                matches!(
                    tokenize("#0", t, &text.into()),
                    Err(AbiError::InvalidNumber { .. })
                ),
                "{} accepted",
                text
            );
        }
        assert_eq!(
            tokenize("#0", &int256, &"-0x5".into()).unwrap(),
            Token::Int(BigInt::from(-5))
        );
    }

    #[test]
    fn test_error_names_argument() {
        let err = tokenize("#1 (_age)", &ty("uint8"), &true.into()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Argument #1 (_age): expected uint8, got boolean"
        );
    }

    #[test]
    fn test_bool_and_string() {
        assert_eq!(
            tokenize("#0", &ty("bool"), &"true".into()).unwrap(),
            Token::Bool(true)
        );
        assert!(tokenize("#0", &ty("bool"), &"yes".into()).is_err());
        assert!(tokenize("#0", &ty("string"), &ArgValue::from(1u8)).is_err());
    }

    #[test]
    fn test_address_forms() {
        let hex = "0x5f2be9a02b43f748ee460bf36eed24fafa109920";
        let text = "zltc_Z1pnS94bP4hQSYLs4aP4UwBP9pH8bEvhi";
        assert_eq!(
            tokenize("#0", &ty("address"), &hex.into()).unwrap(),
            tokenize("#0", &ty("address"), &text.into()).unwrap()
        );
        assert!(matches!(
            tokenize("#0", &ty("address"), &"zltc_bogus".into()),
            Err(AbiError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_fixed_bytes_length() {
        assert!(tokenize("#0", &ty("bytes4"), &"0x01020304".into()).is_ok());
        assert!(matches!(
            tokenize("#0", &ty("bytes4"), &"0x010203".into()),
            Err(AbiError::LengthMismatch { expected: 4, actual: 3, .. })
        ));
        assert!(matches!(
            tokenize("#0", &ty("bytes"), &"0102".into()),
            Err(AbiError::InvalidHex { .. })
        ));
    }

    #[test]
    fn test_bracketed_array_text() {
        let token = tokenize("#0", &ty("string[]"), &r#"["1", "jack"]"#.into()).unwrap();
        assert_eq!(
            token,
            Token::Array(vec![
                Token::String("1".to_string()),
                Token::String("jack".to_string()),
            ])
        );
    }

    #[test]
    fn test_nested_array_text() {
        let token = tokenize("#0", &ty("uint8[][]"), &"[[1,2],[3]]".into()).unwrap();
        let uint = |n: u8| Token::Uint(n.into());
        assert_eq!(
            token,
            Token::Array(vec![
                Token::Array(vec![uint(1), uint(2)]),
                Token::Array(vec![uint(3)]),
            ])
        );
    }

    #[test]
    fn test_fixed_array_length() {
        assert!(matches!(
            tokenize("#0", &ty("uint8[2]"), &vec![1u8].into()),
            Err(AbiError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_array_element_error_path() {
        let err = tokenize("#0 (xs)", &ty("uint8[]"), &vec![1u32, 300].into()).unwrap_err();
        assert!(matches!(err, AbiError::IntegerOverflow { ref arg, .. } if arg == "#0 (xs)[1]"));
    }

    #[test]
    fn test_split_bracketed() {
        assert_eq!(split_bracketed("[]"), Some(vec![]));
        assert_eq!(
            split_bracketed(r#"["a,b", 'c']"#),
            Some(vec!["a,b".to_string(), "c".to_string()])
        );
        assert_eq!(split_bracketed("not a list"), None);
        assert_eq!(split_bracketed("[[1,2]"), None);
    }
}
