//! Minimal NEO 2.x script builder for contract invocations.
//!
//! Only the instructions needed to call a deployed contract are supported:
//! data and integer pushes, `PACK` and `APPCALL`.

use crate::types::UInt160;
use serde::ser::{Serialize, Serializer};
use serde_json::{Value, json};

/// NEO 2.x opcodes used by [`ScriptBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    Push0 = 0x00,
    PushData1 = 0x4c,
    PushData2 = 0x4d,
    PushData4 = 0x4e,
    PushM1 = 0x4f,
    Push1 = 0x51,
    AppCall = 0x67,
    Pack = 0xc1,
}

impl OpCode {
    pub const PUSHF: OpCode = OpCode::Push0;
    pub const PUSHT: OpCode = OpCode::Push1;
    /// Largest payload that fits a single `PUSHBYTESn` opcode.
    pub const MAX_PUSHBYTES: usize = 0x4b;
}

/// A typed argument for a contract method.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractParameter {
    Hash160(UInt160),
    Integer(i128),
    ByteArray(Vec<u8>),
    String(String),
    Boolean(bool),
    Array(Vec<ContractParameter>),
}

impl ContractParameter {
    /// Type tag as the node spells it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Hash160(_) => "Hash160",
            Self::Integer(_) => "Integer",
            Self::ByteArray(_) => "ByteArray",
            Self::String(_) => "String",
            Self::Boolean(_) => "Boolean",
            Self::Array(_) => "Array",
        }
    }
}

impl From<UInt160> for ContractParameter {
    fn from(value: UInt160) -> Self {
        Self::Hash160(value)
    }
}

impl From<u64> for ContractParameter {
    fn from(value: u64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<bool> for ContractParameter {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for ContractParameter {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// Serializes to the `{"type": ..., "value": ...}` form accepted by
/// `invokefunction`.
impl From<&ContractParameter> for Value {
    fn from(param: &ContractParameter) -> Self {
        let value = match param {
            ContractParameter::Hash160(hash) => Value::from(hash.to_hex_be()),
            ContractParameter::Integer(n) => Value::from(n.to_string()),
            ContractParameter::ByteArray(bytes) => Value::from(hex::encode(bytes)),
            ContractParameter::String(s) => Value::from(s.as_str()),
            ContractParameter::Boolean(b) => Value::from(*b),
            ContractParameter::Array(items) => items.iter().map(Value::from).collect(),
        };
        json!({"type": param.type_name(), "value": value})
    }
}

impl Serialize for ContractParameter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Value::from(self).serialize(serializer)
    }
}

/// Builds a VM script byte by byte.
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, op: OpCode) -> &mut Self {
        self.script.push(op as u8);
        self
    }

    /// Push raw bytes with the shortest encoding.
    pub fn emit_push_bytes(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len <= OpCode::MAX_PUSHBYTES {
            self.script.push(len as u8);
        } else if len <= 0xff {
            self.emit(OpCode::PushData1);
            self.script.push(len as u8);
        } else if len <= 0xffff {
            self.emit(OpCode::PushData2);
            self.script.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.emit(OpCode::PushData4);
            self.script.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.script.extend_from_slice(data);
        self
    }

    pub fn emit_push_string(&mut self, value: &str) -> &mut Self {
        self.emit_push_bytes(value.as_bytes())
    }

    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        self.emit(if value { OpCode::PUSHT } else { OpCode::PUSHF })
    }

    /// Push an integer. `-1..=16` use the dedicated opcodes, anything else is
    /// pushed as minimal little-endian two's-complement bytes.
    pub fn emit_push_integer(&mut self, value: i128) -> &mut Self {
        match value {
            -1 => self.emit(OpCode::PushM1),
            0 => self.emit(OpCode::Push0),
            1..=16 => {
                self.script.push(OpCode::Push1 as u8 + (value as u8 - 1));
                self
            }
            _ => {
                let bytes = minimal_le_bytes(value);
                self.emit_push_bytes(&bytes)
            }
        }
    }

    pub fn emit_push_parameter(&mut self, param: &ContractParameter) -> &mut Self {
        match param {
            ContractParameter::Hash160(hash) => self.emit_push_bytes(hash.as_le_bytes()),
            ContractParameter::Integer(n) => self.emit_push_integer(*n),
            ContractParameter::ByteArray(bytes) => self.emit_push_bytes(bytes),
            ContractParameter::String(s) => self.emit_push_string(s),
            ContractParameter::Boolean(b) => self.emit_push_bool(*b),
            ContractParameter::Array(items) => self.emit_push_array(items),
        }
    }

    /// Push items in reverse order, then their count, then `PACK`.
    fn emit_push_array(&mut self, items: &[ContractParameter]) -> &mut Self {
        for item in items.iter().rev() {
            self.emit_push_parameter(item);
        }
        self.emit_push_integer(items.len() as i128);
        self.emit(OpCode::Pack)
    }

    pub fn emit_app_call(&mut self, script_hash: &UInt160) -> &mut Self {
        self.emit(OpCode::AppCall);
        self.script.extend_from_slice(script_hash.as_le_bytes());
        self
    }

    /// Emit `args` packed into an array, the operation name, then `APPCALL`.
    pub fn make_invocation_script(
        &mut self,
        script_hash: &UInt160,
        operation: &str,
        args: &[ContractParameter],
    ) -> &mut Self {
        self.emit_push_array(args);
        self.emit_push_string(operation);
        self.emit_app_call(script_hash)
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.script.clone()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.script)
    }
}

fn minimal_le_bytes(value: i128) -> Vec<u8> {
    let mut bytes = value.to_le_bytes().to_vec();
    while bytes.len() > 1 {
        let last = bytes[bytes.len() - 1];
        let sign_of_prev = bytes[bytes.len() - 2] & 0x80;
        let redundant = (last == 0x00 && sign_of_prev == 0) || (last == 0xff && sign_of_prev != 0);
        if !redundant {
            break;
        }
        bytes.pop();
    }
    bytes
}
