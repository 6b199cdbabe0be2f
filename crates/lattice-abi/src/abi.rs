//! Contract descriptors: functions, constructors and the JSON ABI.

use crate::convert::tokenize;
use crate::error::AbiError;
use crate::param_type::ParamType;
use crate::token::{self, Token};
use crate::value::ArgValue;
use lattice_crypto::keccak256;
use serde::Deserialize;
use std::collections::HashMap;

/// A named, typed input parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub kind: ParamType,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Tokenize `args` against `params`, checking the count first.
fn encode_params(method: &str, params: &[Param], args: &[ArgValue]) -> Result<Vec<u8>, AbiError> {
    if params.len() != args.len() {
        return Err(AbiError::ArgumentCountMismatch {
            method: method.to_string(),
            expected: params.len(),
            actual: args.len(),
        });
    }

    let tokens = params
        .iter()
        .zip(args)
        .enumerate()
        .map(|(i, (param, arg))| {
            let label = if param.name.is_empty() {
                format!("#{}", i)
            } else {
                format!("#{} ({})", i, param.name)
            };
            tokenize(&label, &param.kind, arg)
        })
        .collect::<Result<Vec<Token>, _>>()?;

    token::encode(&tokens)
}

/// A callable contract function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub inputs: Vec<Param>,
    /// Output type names as declared. Decoding results is not supported.
    pub outputs: Vec<String>,
    pub state_mutability: Option<String>,
}

impl Function {
    pub fn new(name: impl Into<String>, inputs: Vec<Param>) -> Self {
        Self {
            name: name.into(),
            inputs,
            outputs: Vec::new(),
            state_mutability: None,
        }
    }

    /// Parse a signature such as `set(string[],uint256)`. Parameters are
    /// left unnamed.
    pub fn parse_signature(signature: &str) -> Result<Self, AbiError> {
        let signature = signature.trim();
        let open = signature
            .find('(')
            .ok_or_else(|| AbiError::Json(format!("malformed signature: {}", signature)))?;
        let body = signature[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| AbiError::Json(format!("malformed signature: {}", signature)))?;

        let inputs = if body.trim().is_empty() {
            Vec::new()
        } else {
            body.split(',')
                .map(|ty| ty.parse().map(|kind| Param::new("", kind)))
                .collect::<Result<Vec<_>, _>>()?
        };
        Ok(Self::new(signature[..open].trim(), inputs))
    }

    /// `name(type1,type2,...)` with canonical type names.
    pub fn signature(&self) -> String {
        let types: Vec<String> = self.inputs.iter().map(|p| p.kind.canonical()).collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// First four bytes of the Keccak-256 of the signature.
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.signature().as_bytes());
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&hash.as_bytes()[..4]);
        selector
    }

    /// Selector followed by the encoded arguments.
    pub fn encode_call(&self, args: &[ArgValue]) -> Result<Vec<u8>, AbiError> {
        let encoded = encode_params(&self.name, &self.inputs, args)?;
        let mut data = Vec::with_capacity(4 + encoded.len());
        data.extend_from_slice(&self.selector());
        data.extend_from_slice(&encoded);
        tracing::debug!(method = %self.signature(), len = data.len(), "encoded call");
        Ok(data)
    }

    /// [`Function::encode_call`] as `0x`-prefixed lowercase hex.
    pub fn encode_call_hex(&self, args: &[ArgValue]) -> Result<String, AbiError> {
        self.encode_call(args)
            .map(|data| format!("0x{}", hex::encode(data)))
    }
}

/// Contract constructor. Its arguments carry no selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Constructor {
    pub inputs: Vec<Param>,
}

impl Constructor {
    pub fn new(inputs: Vec<Param>) -> Self {
        Self { inputs }
    }

    /// Encoded arguments, to be appended to deployment bytecode.
    pub fn encode_args(&self, args: &[ArgValue]) -> Result<Vec<u8>, AbiError> {
        encode_params("constructor", &self.inputs, args)
    }

    pub fn encode_args_hex(&self, args: &[ArgValue]) -> Result<String, AbiError> {
        self.encode_args(args)
            .map(|data| format!("0x{}", hex::encode(data)))
    }
}

/// An event entry. Kept so descriptors round-trip; events are not encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub name: String,
    pub anonymous: bool,
}

#[derive(Deserialize)]
struct RawParam {
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct RawEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<RawParam>,
    #[serde(default)]
    outputs: Vec<RawParam>,
    #[serde(rename = "stateMutability", default)]
    state_mutability: Option<String>,
    #[serde(default)]
    anonymous: bool,
}

fn default_entry_type() -> String {
    "function".to_string()
}

fn parse_params(raw: &[RawParam]) -> Result<Vec<Param>, AbiError> {
    raw.iter()
        .map(|p| p.kind.parse().map(|kind| Param::new(p.name.clone(), kind)))
        .collect()
}

/// A parsed contract ABI.
///
/// Entries whose inputs use unsupported types (tuples, fixed-point) do not
/// make the whole descriptor fail; looking them up returns the type error.
#[derive(Clone, Debug, Default)]
pub struct Abi {
    constructor: Option<Constructor>,
    functions: Vec<Function>,
    events: Vec<Event>,
    has_fallback: bool,
    rejected: HashMap<String, AbiError>,
}

impl Abi {
    /// Parse a standard JSON ABI array.
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let entries: Vec<RawEntry> = serde_json::from_str(json)?;
        let mut abi = Abi::default();

        for entry in entries {
            match entry.kind.as_str() {
                "function" => match parse_params(&entry.inputs) {
                    Ok(inputs) => abi.functions.push(Function {
                        name: entry.name,
                        inputs,
                        outputs: entry.outputs.into_iter().map(|p| p.kind).collect(),
                        state_mutability: entry.state_mutability,
                    }),
                    Err(e) => {
                        tracing::debug!(method = %entry.name, error = %e, "skipping function");
                        abi.rejected.insert(entry.name, e);
                    }
                },
                "constructor" => match parse_params(&entry.inputs) {
                    Ok(inputs) => abi.constructor = Some(Constructor::new(inputs)),
                    Err(e) => {
                        abi.rejected.insert("constructor".to_string(), e);
                    }
                },
                "event" => abi.events.push(Event {
                    name: entry.name,
                    anonymous: entry.anonymous,
                }),
                "fallback" | "receive" => abi.has_fallback = true,
                other => {
                    return Err(AbiError::Json(format!("unknown entry type: {}", other)));
                }
            }
        }

        Ok(abi)
    }

    /// The constructor, or an argument-less one when none is declared.
    pub fn constructor(&self) -> Result<Constructor, AbiError> {
        if let Some(e) = self.rejected.get("constructor") {
            return Err(e.clone());
        }
        Ok(self.constructor.clone().unwrap_or_default())
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn has_fallback(&self) -> bool {
        self.has_fallback
    }

    /// First function with this name.
    pub fn function(&self, name: &str) -> Result<&Function, AbiError> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| self.lookup_error(name))
    }

    /// Overload of `name` taking `arity` arguments.
    pub fn function_with_arity(&self, name: &str, arity: usize) -> Result<&Function, AbiError> {
        let mut candidates = self.functions.iter().filter(|f| f.name == name).peekable();
        let first = candidates.peek().copied().ok_or_else(|| self.lookup_error(name))?;
        candidates
            .find(|f| f.inputs.len() == arity)
            .ok_or_else(|| AbiError::ArgumentCountMismatch {
                method: name.to_string(),
                expected: first.inputs.len(),
                actual: arity,
            })
    }

    /// Encode a call, picking the overload that matches the argument count.
    pub fn encode_call(&self, name: &str, args: &[ArgValue]) -> Result<Vec<u8>, AbiError> {
        self.function_with_arity(name, args.len())?.encode_call(args)
    }

    fn lookup_error(&self, name: &str) -> AbiError {
        match self.rejected.get(name) {
            Some(e) => e.clone(),
            None => AbiError::UnknownMethod(name.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ABI: &str = r#"[
        {"type": "constructor", "inputs": [{"name": "_name", "type": "string"}]},
        {"type": "function", "name": "set", "inputs": [{"name": "_names", "type": "string[]"}],
         "outputs": [], "stateMutability": "nonpayable"},
        {"type": "function", "name": "get", "inputs": [], "outputs": [{"name": "", "type": "string"}],
         "stateMutability": "view"},
        {"type": "function", "name": "get", "inputs": [{"name": "i", "type": "uint256"}], "outputs": []},
        {"type": "function", "name": "setPair", "inputs": [{"name": "p", "type": "tuple",
         "components": [{"name": "a", "type": "uint256"}]}]},
        {"type": "event", "name": "Changed", "inputs": [], "anonymous": false},
        {"type": "fallback"}
    ]"#;

    fn word(hex_tail: &str) -> String {
        format!("{:0>64}", hex_tail)
    }

    fn padded(s: &str) -> String {
        format!("{:0<64}", hex::encode(s))
    }

    #[test]
    fn test_selector_matches_keccak() {
        let f = Function::parse_signature("transfer(address,uint256)").unwrap();
        assert_eq!(hex::encode(f.selector()), "a9059cbb");
    }

    #[test]
    fn test_set_string_array_call() {
        let abi = Abi::from_json(ABI).unwrap();
        let set = abi.function("set").unwrap();
        assert_eq!(set.signature(), "set(string[])");

        let args = ArgValue::list_from_json(&json!([["1", "jack"]])).unwrap();
        let data = set.encode_call(&args).unwrap();

        let selector_hash = keccak256(b"set(string[])");
        let selector = &selector_hash.as_bytes()[..4];
        assert_eq!(&data[..4], selector);

        // offset to array, length 2, two element offsets, then each string.
        let expected = [
            word("20"),
            word("2"),
            word("40"),
            word("80"),
            word("1"),
            padded("1"),
            word("4"),
            padded("jack"),
        ]
        .concat();
        assert_eq!(hex::encode(&data[4..]), expected);
    }

    #[test]
    fn test_bracket_string_matches_list() {
        let abi = Abi::from_json(ABI).unwrap();
        let set = abi.function("set").unwrap();
        let from_text = set.encode_call(&[r#"["1","jack"]"#.into()]).unwrap();
        let from_list = set.encode_call(&[vec!["1", "jack"].into()]).unwrap();
        assert_eq!(from_text, from_list);
    }

    #[test]
    fn test_constructor_args() {
        let abi = Abi::from_json(ABI).unwrap();
        let data = abi.constructor().unwrap().encode_args(&["jack".into()]).unwrap();
        assert_eq!(
            hex::encode(data),
            [word("20"), word("4"), padded("jack")].concat()
        );
    }

    #[test]
    fn test_missing_constructor_takes_no_args() {
        let abi = Abi::from_json("[]").unwrap();
        assert!(abi.constructor().unwrap().encode_args(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_overload_by_arity() {
        let abi = Abi::from_json(ABI).unwrap();
        let no_args = abi.encode_call("get", &[]).unwrap();
        assert_eq!(no_args.len(), 4);
        let one_arg = abi.encode_call("get", &[7u8.into()]).unwrap();
        assert_eq!(one_arg.len(), 36);
        assert!(matches!(
            abi.encode_call("get", &[1u8.into(), 2u8.into()]),
            Err(AbiError::ArgumentCountMismatch { actual: 2, .. })
        ));
    }

    #[test]
    fn test_count_mismatch() {
        let f = Function::parse_signature("set(string[])").unwrap();
        assert_eq!(
            f.encode_call(&[]),
            Err(AbiError::ArgumentCountMismatch {
                method: "set".to_string(),
                expected: 1,
                actual: 0,
            })
        );
    }

    #[test]
    fn test_unknown_and_unsupported_methods() {
        let abi = Abi::from_json(ABI).unwrap();
        assert_eq!(
            abi.function("nope"),
            Err(AbiError::UnknownMethod("nope".to_string()))
        );
        assert!(matches!(
            abi.function("setPair"),
            Err(AbiError::UnsupportedType(ref t)) if t == "tuple"
        ));
        assert!(Function::parse_signature("f(fixed128x18)").is_err());
    }

    #[test]
    fn test_descriptor_metadata() {
        let abi = Abi::from_json(ABI).unwrap();
        assert_eq!(abi.events().len(), 1);
        assert!(abi.has_fallback());
        let get = abi.function("get").unwrap();
        assert_eq!(get.outputs, vec!["string".to_string()]);
        assert_eq!(get.state_mutability.as_deref(), Some("view"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Abi::from_json("{"), Err(AbiError::Json(_))));
        assert!(matches!(
            Abi::from_json(r#"[{"type": "weird"}]"#),
            Err(AbiError::Json(_))
        ));
    }

    #[test]
    fn test_hex_output() {
        let f = Function::parse_signature("flag(bool)").unwrap();
        let hex = f.encode_call_hex(&[true.into()]).unwrap();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 2 + 8 + 64);
    }
}
