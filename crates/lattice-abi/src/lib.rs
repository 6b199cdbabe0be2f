//! Contract call-data encoding.
//!
//! Turns loosely typed arguments ([`ArgValue`]) into the standard
//! head/tail ABI layout, either for a function call (with its 4-byte
//! selector) or for constructor arguments appended to deployment code.

pub mod abi;
pub mod convert;
pub mod error;
pub mod param_type;
pub mod token;
pub mod value;

pub use abi::{Abi, Constructor, Event, Function, Param};
pub use convert::tokenize;
pub use error::AbiError;
pub use param_type::ParamType;
pub use token::{encode, Token};
pub use value::ArgValue;
