//! NEP-5 token helper.
//!
//! Builds invocation scripts for the standard token methods, runs them with
//! `invokescript` and decodes the top stack item.

use crate::client::{self, RpcClient};
use crate::script::{ContractParameter, ScriptBuilder};
use crate::types::{InvokeResult, StackItem, UInt160};

/// Errors from NEP-5 helper calls.
///
/// Checks run in this order: node or transport error, VM fault, empty stack,
/// then local decoding.
#[derive(Debug, thiserror::Error)]
pub enum Nep5Error {
    #[error(transparent)]
    Client(#[from] client::Error),
    #[error("engine faulted")]
    Fault,
    #[error("no stack result returned")]
    EmptyStack,
    #[error("conversion failed: {0}")]
    Conversion(String),
}

pub type Result<T> = std::result::Result<T, Nep5Error>;

/// Calls NEP-5 token contracts through a node.
#[derive(Debug)]
pub struct Nep5Helper {
    client: RpcClient,
}

impl Nep5Helper {
    /// Create a helper with its own client for `endpoint`.
    pub fn new(endpoint: impl AsRef<str>) -> client::Result<Self> {
        Ok(Self::with_client(RpcClient::new(endpoint)?))
    }

    pub fn with_client(client: RpcClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    pub async fn total_supply(&self, script_hash: &UInt160) -> Result<u64> {
        let item = self.invoke(script_hash, "totalSupply", &[]).await?;
        decode_u64_le(&text_of(&item)?)
    }

    pub async fn name(&self, script_hash: &UInt160) -> Result<String> {
        let item = self.invoke(script_hash, "name", &[]).await?;
        decode_utf8(&text_of(&item)?)
    }

    pub async fn symbol(&self, script_hash: &UInt160) -> Result<String> {
        let item = self.invoke(script_hash, "symbol", &[]).await?;
        decode_utf8(&text_of(&item)?)
    }

    pub async fn decimals(&self, script_hash: &UInt160) -> Result<u8> {
        let item = self.invoke(script_hash, "decimals", &[]).await?;
        parse_decimals(&text_of(&item)?)
    }

    pub async fn balance_of(&self, script_hash: &UInt160, account: &UInt160) -> Result<u64> {
        let args = [ContractParameter::Hash160(*account)];
        let item = self.invoke(script_hash, "balanceOf", &args).await?;
        decode_u64_le(&text_of(&item)?)
    }

    /// Evaluates `transfer(from, to, amount)` and returns the contract's
    /// answer. No witness is attached, so this does not move funds on chain.
    pub async fn transfer(
        &self,
        script_hash: &UInt160,
        from: &UInt160,
        to: &UInt160,
        amount: u64,
    ) -> Result<bool> {
        let args = [
            ContractParameter::Hash160(*from),
            ContractParameter::Hash160(*to),
            ContractParameter::from(amount),
        ];
        let item = self.invoke(script_hash, "transfer", &args).await?;
        parse_bool(&text_of(&item)?)
    }

    async fn invoke(
        &self,
        script_hash: &UInt160,
        operation: &str,
        args: &[ContractParameter],
    ) -> Result<StackItem> {
        let script = build_script(script_hash, operation, args);
        tracing::debug!(contract = %script_hash, operation, "invoking nep5 method");
        let result = self.client.invoke_script(&script, &[]).await?;
        top_of_stack(result)
    }
}

/// Hex-encoded invocation script for `operation` on `script_hash`.
pub fn build_script(script_hash: &UInt160, operation: &str, args: &[ContractParameter]) -> String {
    let mut sb = ScriptBuilder::new();
    sb.make_invocation_script(script_hash, operation, args);
    sb.to_hex()
}

fn top_of_stack(result: InvokeResult) -> Result<StackItem> {
    if result.is_faulted() {
        tracing::warn!(state = %result.state, "invocation faulted");
        return Err(Nep5Error::Fault);
    }
    result.stack.into_iter().next().ok_or(Nep5Error::EmptyStack)
}

fn text_of(item: &StackItem) -> Result<String> {
    item.as_text().ok_or_else(|| {
        Nep5Error::Conversion(format!("{} stack item has no scalar value", item.item_type))
    })
}

fn decode_hex(value: &str) -> Result<Vec<u8>> {
    hex::decode(value).map_err(|e| Nep5Error::Conversion(format!("hex {value:?}: {e}")))
}

/// Decode a little-endian integer, zero-padding on the right up to 8 bytes.
pub fn decode_u64_le(value: &str) -> Result<u64> {
    let bytes = decode_hex(value)?;
    if bytes.len() > 8 {
        return Err(Nep5Error::Conversion(format!(
            "{} bytes do not fit in u64",
            bytes.len()
        )));
    }
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(&bytes);
    Ok(u64::from_le_bytes(buf))
}

fn decode_utf8(value: &str) -> Result<String> {
    String::from_utf8(decode_hex(value)?).map_err(|e| Nep5Error::Conversion(e.to_string()))
}

/// Accepts the same literals as a conventional boolean parser:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
/// Unsigned base-10 `u8`. Signs are rejected.
pub fn parse_decimals(value: &str) -> Result<u8> {
    if !value.bytes().next().is_some_and(|b| b.is_ascii_digit()) {
        return Err(Nep5Error::Conversion(format!("decimals {value:?}: not an unsigned integer")));
    }
    value
        .parse::<u8>()
        .map_err(|e| Nep5Error::Conversion(format!("decimals {value:?}: {e}")))
}

pub fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        other => Err(Nep5Error::Conversion(format!("boolean {other:?}"))),
    }
}
