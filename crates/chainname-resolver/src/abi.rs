//! Calldata and return-data codec for the registry and resolver contracts.
//!
//! Only three functions are used:
//!
//! | contract | function                      | returns   |
//! |----------|-------------------------------|-----------|
//! | registry | `resolver(bytes32)`           | `address` |
//! | resolver | `contenthash(bytes32)`        | `bytes`   |
//! | resolver | `text(bytes32,string)`        | `string`  |
//!
//! Both directions are implemented so that in-memory test nodes can decode
//! the calls they receive and answer with well-formed return data.

use alloy_core::dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::{Function, JsonAbi, Param};
use alloy_primitives::{Address, B256};
use chainname_core::Node;

use crate::error::ResolveError;

/// ABI of the functions read from the registry and resolver contracts.
pub const NAME_ABI: &str = r#"[
  {
    "type": "function",
    "name": "resolver",
    "stateMutability": "view",
    "inputs":  [{ "name": "node", "type": "bytes32" }],
    "outputs": [{ "name": "", "type": "address" }]
  },
  {
    "type": "function",
    "name": "contenthash",
    "stateMutability": "view",
    "inputs":  [{ "name": "node", "type": "bytes32" }],
    "outputs": [{ "name": "", "type": "bytes" }]
  },
  {
    "type": "function",
    "name": "text",
    "stateMutability": "view",
    "inputs":  [{ "name": "node", "type": "bytes32" }, { "name": "key", "type": "string" }],
    "outputs": [{ "name": "", "type": "string" }]
  }
]"#;

/// A decoded read against the registry or a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCall {
    Resolver { node: Node },
    ContentHash { node: Node },
    Text { node: Node, key: String },
}

/// Encoder/decoder for [`NAME_ABI`].
#[derive(Debug, Clone)]
pub struct NameAbi {
    abi: JsonAbi,
}

impl NameAbi {
    pub fn new() -> Result<Self, ResolveError> {
        Self::from_abi_json(NAME_ABI)
    }

    /// Build from an ABI JSON string. It must define `resolver`,
    /// `contenthash` and `text`.
    pub fn from_abi_json(abi_json: &str) -> Result<Self, ResolveError> {
        let abi: JsonAbi = serde_json::from_str(abi_json)
            .map_err(|e| ResolveError::Abi(format!("invalid ABI JSON: {e}")))?;
        let codec = Self { abi };
        for name in ["resolver", "contenthash", "text"] {
            codec.function(name)?;
        }
        Ok(codec)
    }

    fn function(&self, name: &str) -> Result<&Function, ResolveError> {
        self.abi
            .functions()
            .find(|f| f.name == name)
            .ok_or_else(|| ResolveError::Abi(format!("function '{name}' not found in ABI")))
    }

    fn encode_call(&self, name: &str, args: Vec<DynSolValue>) -> Result<Vec<u8>, ResolveError> {
        let func = self.function(name)?;
        let mut calldata = func.selector().to_vec();
        calldata.extend_from_slice(&DynSolValue::Tuple(args).abi_encode_params());
        Ok(calldata)
    }

    fn decode_output(
        &self,
        name: &'static str,
        data: &[u8],
    ) -> Result<DynSolValue, ResolveError> {
        let func = self.function(name)?;
        let mut values = decode_params(&func.outputs, data).map_err(|reason| {
            ResolveError::InvalidResponse {
                method: name,
                reason,
            }
        })?;
        if values.len() != 1 {
            return Err(ResolveError::InvalidResponse {
                method: name,
                reason: format!("expected one return value, got {}", values.len()),
            });
        }
        Ok(values.remove(0))
    }

    /// `resolver(node)` calldata.
    pub fn resolver_call(&self, node: &Node) -> Result<Vec<u8>, ResolveError> {
        self.encode_call("resolver", vec![bytes32(node)])
    }

    /// `contenthash(node)` calldata.
    pub fn content_hash_call(&self, node: &Node) -> Result<Vec<u8>, ResolveError> {
        self.encode_call("contenthash", vec![bytes32(node)])
    }

    /// `text(node, key)` calldata.
    pub fn text_call(&self, node: &Node, key: &str) -> Result<Vec<u8>, ResolveError> {
        self.encode_call("text", vec![bytes32(node), DynSolValue::String(key.to_string())])
    }

    pub fn decode_resolver(&self, data: &[u8]) -> Result<Address, ResolveError> {
        let value = self.decode_output("resolver", data)?;
        value.as_address().ok_or_else(|| ResolveError::InvalidResponse {
            method: "resolver",
            reason: format!("expected address, got {value:?}"),
        })
    }

    pub fn decode_content_hash(&self, data: &[u8]) -> Result<Vec<u8>, ResolveError> {
        let value = self.decode_output("contenthash", data)?;
        value
            .as_bytes()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| ResolveError::InvalidResponse {
                method: "contenthash",
                reason: format!("expected bytes, got {value:?}"),
            })
    }

    pub fn decode_text(&self, data: &[u8]) -> Result<String, ResolveError> {
        let value = self.decode_output("text", data)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ResolveError::InvalidResponse {
                method: "text",
                reason: format!("expected string, got {value:?}"),
            })
    }

    /// Identify and decode calldata produced by the `*_call` methods.
    pub fn decode_call(&self, calldata: &[u8]) -> Result<NameCall, ResolveError> {
        if calldata.len() < 4 {
            return Err(ResolveError::Abi(format!(
                "calldata too short: {} bytes",
                calldata.len()
            )));
        }
        let (selector, input) = calldata.split_at(4);
        let func = self
            .abi
            .functions()
            .find(|f| f.selector().as_slice() == selector)
            .ok_or_else(|| ResolveError::Abi(format!("unknown selector 0x{}", hex::encode(selector))))?;

        let args = decode_params(&func.inputs, input).map_err(ResolveError::Abi)?;
        let node = args
            .first()
            .and_then(|v| v.as_fixed_bytes())
            .and_then(|(bytes, _)| <Node>::try_from(bytes).ok())
            .ok_or_else(|| ResolveError::Abi("missing bytes32 node argument".into()))?;

        match func.name.as_str() {
            "resolver" => Ok(NameCall::Resolver { node }),
            "contenthash" => Ok(NameCall::ContentHash { node }),
            "text" => {
                let key = args
                    .get(1)
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| ResolveError::Abi("missing string key argument".into()))?;
                Ok(NameCall::Text {
                    node,
                    key: key.to_string(),
                })
            }
            other => Err(ResolveError::Abi(format!("unexpected function '{other}'"))),
        }
    }

    /// Return data of `resolver(node)`.
    pub fn encode_resolver_output(&self, address: Address) -> Vec<u8> {
        DynSolValue::Tuple(vec![DynSolValue::Address(address)]).abi_encode_params()
    }

    /// Return data of `contenthash(node)`.
    pub fn encode_content_hash_output(&self, bytes: &[u8]) -> Vec<u8> {
        DynSolValue::Tuple(vec![DynSolValue::Bytes(bytes.to_vec())]).abi_encode_params()
    }

    /// Return data of `text(node, key)`.
    pub fn encode_text_output(&self, value: &str) -> Vec<u8> {
        DynSolValue::Tuple(vec![DynSolValue::String(value.to_string())]).abi_encode_params()
    }
}

fn bytes32(node: &Node) -> DynSolValue {
    DynSolValue::FixedBytes(B256::from(*node), 32)
}

fn decode_params(params: &[Param], data: &[u8]) -> Result<Vec<DynSolValue>, String> {
    let types = params
        .iter()
        .map(|p| p.resolve().map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    match DynSolType::Tuple(types).abi_decode_params(data) {
        Ok(DynSolValue::Tuple(values)) => Ok(values),
        Ok(other) => Ok(vec![other]),
        Err(e) => Err(e.to_string()),
    }
}
