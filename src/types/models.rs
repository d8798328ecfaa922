//! Response payloads returned by a NEO 2.x node.
//!
//! Field names follow the node's JSON output. Amounts are kept as the decimal
//! strings the node prints; some plugins emit them as JSON numbers, which are
//! accepted and normalized to strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

// ── Accounts / assets / contracts ─────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountState {
    pub version: u32,
    pub script_hash: String,
    pub frozen: bool,
    #[serde(default)]
    pub votes: Vec<String>,
    #[serde(default)]
    pub balances: Vec<AssetBalance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetName {
    pub lang: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetState {
    pub version: u32,
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub name: Vec<AssetName>,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    #[serde(deserialize_with = "string_or_number")]
    pub available: String,
    pub precision: u8,
    pub owner: String,
    pub admin: String,
    pub issuer: String,
    pub expiration: u32,
    pub frozen: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractProperties {
    pub storage: bool,
    pub dynamic_invoke: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractState {
    pub version: u32,
    pub hash: String,
    pub script: String,
    #[serde(default)]
    pub parameters: Vec<String>,
    pub returntype: String,
    pub name: String,
    pub code_version: String,
    pub author: String,
    pub email: String,
    pub description: String,
    pub properties: ContractProperties,
}

// ── Blocks / transactions ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Witness {
    pub invocation: String,
    pub verification: String,
}

/// Block header as returned by verbose `getblockheader`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub hash: String,
    pub size: u32,
    pub version: u32,
    pub previousblockhash: String,
    pub merkleroot: String,
    pub time: i64,
    pub index: u32,
    pub nonce: String,
    pub nextconsensus: String,
    pub script: Witness,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default)]
    pub nextblockhash: Option<String>,
}

impl BlockHeader {
    /// Block time as a UTC timestamp, if it is in range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.time, 0)
    }
}

/// Block as returned by verbose `getblock`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(flatten)]
    pub header: BlockHeader,
    #[serde(default)]
    pub tx: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAttribute {
    pub usage: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub txid: String,
    pub vout: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub n: u16,
    pub asset: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    pub address: String,
}

/// Verbose transaction. Type-specific members (`script`, `gas`, `claims`,
/// `nonce`, ...) are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub txid: String,
    pub size: u32,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub version: u8,
    #[serde(default)]
    pub attributes: Vec<TransactionAttribute>,
    #[serde(default)]
    pub vin: Vec<TransactionInput>,
    #[serde(default)]
    pub vout: Vec<TransactionOutput>,
    #[serde(deserialize_with = "string_or_number")]
    pub sys_fee: String,
    #[serde(deserialize_with = "string_or_number")]
    pub net_fee: String,
    #[serde(default)]
    pub scripts: Vec<Witness>,
    #[serde(default)]
    pub blockhash: Option<String>,
    #[serde(default)]
    pub confirmations: Option<u32>,
    #[serde(default)]
    pub blocktime: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxOut {
    pub n: u16,
    pub asset: String,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    pub address: String,
}

// ── Application log ───────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub contract: String,
    pub state: StackItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub trigger: String,
    pub contract: String,
    pub vmstate: String,
    #[serde(deserialize_with = "string_or_number")]
    pub gas_consumed: String,
    #[serde(default)]
    pub stack: Vec<StackItem>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationLog {
    pub txid: String,
    #[serde(default)]
    pub executions: Vec<Execution>,
}

// ── Invocation ────────────────────────────────────────────────

/// One VM stack entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub value: Value,
}

impl StackItem {
    /// The value as text: strings as-is, booleans and numbers in their JSON
    /// spelling. Arrays, maps and null have no text form.
    pub fn as_text(&self) -> Option<String> {
        match &self.value {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Result of `invokescript` / `invokefunction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResult {
    #[serde(default)]
    pub script: String,
    pub state: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub gas_consumed: String,
    #[serde(default)]
    pub stack: Vec<StackItem>,
    #[serde(default)]
    pub tx: Option<String>,
}

impl InvokeResult {
    /// Older nodes report composite states such as `"HALT, BREAK"`, so this
    /// checks for the `FAULT` flag rather than comparing the whole string.
    pub fn is_faulted(&self) -> bool {
        self.state.split(',').any(|flag| flag.trim() == "FAULT")
    }
}

// ── NEP-5 tracker plugin ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep5Balance {
    pub asset_hash: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub last_updated_block: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep5Balances {
    #[serde(default)]
    pub balance: Vec<Nep5Balance>,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep5Transfer {
    pub timestamp: i64,
    pub asset_hash: String,
    pub transfer_address: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub block_index: u32,
    pub transfer_notify_index: u32,
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep5Transfers {
    #[serde(default)]
    pub sent: Vec<Nep5Transfer>,
    #[serde(default)]
    pub received: Vec<Nep5Transfer>,
    pub address: String,
}

// ── UTXO / GAS claims ─────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claimable {
    pub txid: String,
    pub n: u16,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
    pub start_height: u32,
    pub end_height: u32,
    #[serde(deserialize_with = "string_or_number")]
    pub generated: String,
    #[serde(deserialize_with = "string_or_number")]
    pub sys_fee: String,
    #[serde(deserialize_with = "string_or_number")]
    pub unclaimed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimableResult {
    #[serde(default)]
    pub claimable: Vec<Claimable>,
    pub address: String,
    #[serde(deserialize_with = "string_or_number")]
    pub unclaimed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unclaimed {
    #[serde(deserialize_with = "string_or_number")]
    pub available: String,
    #[serde(deserialize_with = "string_or_number")]
    pub unavailable: String,
    #[serde(deserialize_with = "string_or_number")]
    pub unclaimed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnclaimedGas {
    #[serde(deserialize_with = "string_or_number")]
    pub available: String,
    #[serde(deserialize_with = "string_or_number")]
    pub unavailable: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unspent {
    pub txid: String,
    pub n: u16,
    #[serde(deserialize_with = "string_or_number")]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnspentBalance {
    #[serde(default)]
    pub unspent: Vec<Unspent>,
    pub asset_hash: String,
    pub asset: String,
    pub asset_symbol: String,
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unspents {
    #[serde(default)]
    pub balance: Vec<UnspentBalance>,
    pub address: String,
}

// ── Node / network ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peer {
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peers {
    #[serde(default)]
    pub unconnected: Vec<Peer>,
    #[serde(default)]
    pub bad: Vec<Peer>,
    #[serde(default)]
    pub connected: Vec<Peer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub publickey: String,
    #[serde(deserialize_with = "string_or_number")]
    pub votes: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub tcpport: Option<u16>,
    #[serde(default)]
    pub wsport: Option<u16>,
    pub nonce: u64,
    pub useragent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plugin {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub interfaces: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateAddress {
    pub address: String,
    pub isvalid: bool,
}

// ── Wallet plugin ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    #[serde(deserialize_with = "string_or_number")]
    pub balance: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub confirmed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletAddress {
    pub address: String,
    pub haskey: bool,
    #[serde(default)]
    pub label: Option<String>,
    pub watchonly: bool,
}

/// One output of a `sendmany` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferOutput {
    pub asset: String,
    pub value: String,
    pub address: String,
}

// ── State root ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateHeight {
    pub blockheight: u32,
    pub stateheight: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRoot {
    pub version: u8,
    pub index: u32,
    pub stateroot: String,
    pub prehash: String,
    #[serde(default)]
    pub witness: Option<Witness>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRootState {
    pub flag: String,
    pub stateroot: StateRoot,
}

/// Result of `getproof` / `verifyproof`. Depending on the plugin build the
/// node returns either a bare hex string or an object with a success flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProofResult {
    Detailed {
        success: bool,
        #[serde(alias = "value")]
        proof: String,
    },
    Raw(String),
}

impl ProofResult {
    /// The hex payload, or `None` if the node reported failure.
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::Detailed { success: true, proof } | Self::Raw(proof) => Some(proof.as_str()),
            Self::Detailed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invoke_result_detects_fault_flag() {
        let halt: InvokeResult =
            serde_json::from_value(json!({"state": "HALT, BREAK", "stack": []})).unwrap();
        assert!(!halt.is_faulted());

        let fault: InvokeResult =
            serde_json::from_value(json!({"state": "FAULT, BREAK", "stack": []})).unwrap();
        assert!(fault.is_faulted());
    }

    #[test]
    fn stack_item_text_forms() {
        let item = |value| StackItem {
            item_type: "Any".into(),
            value,
        };
        assert_eq!(item(json!("e803")).as_text().as_deref(), Some("e803"));
        assert_eq!(item(json!(true)).as_text().as_deref(), Some("true"));
        assert_eq!(item(json!(8)).as_text().as_deref(), Some("8"));
        assert_eq!(item(json!([])).as_text(), None);
    }

    #[test]
    fn amounts_accept_numbers() {
        let gas: UnclaimedGas =
            serde_json::from_value(json!({"available": 1.5, "unavailable": "0"})).unwrap();
        assert_eq!(gas.available, "1.5");
        assert_eq!(gas.unavailable, "0");
    }

    #[test]
    fn block_flattens_header() {
        let block: Block = serde_json::from_value(json!({
            "hash": "0xabc",
            "size": 686,
            "version": 0,
            "previousblockhash": "0xdef",
            "merkleroot": "0x123",
            "time": 1_476_647_382,
            "index": 1,
            "nonce": "7c2bac1d",
            "nextconsensus": "AZ81H31DMWzbSnFDLFkzh9vHwaDLayV7fU",
            "script": {"invocation": "40", "verification": "55"},
            "confirmations": 10,
            "tx": []
        }))
        .unwrap();
        assert_eq!(block.header.index, 1);
        assert_eq!(block.header.confirmations, 10);
        assert_eq!(
            block.header.timestamp().map(|t| t.to_rfc3339()).as_deref(),
            Some("2016-10-16T19:49:42+00:00")
        );
    }

    #[test]
    fn transaction_keeps_type_specific_fields() {
        let tx: Transaction = serde_json::from_value(json!({
            "txid": "0x01",
            "size": 10,
            "type": "InvocationTransaction",
            "version": 1,
            "attributes": [],
            "vin": [],
            "vout": [],
            "sys_fee": "0",
            "net_fee": "0",
            "scripts": [],
            "script": "00c1",
            "gas": "0"
        }))
        .unwrap();
        assert_eq!(tx.extra.get("script"), Some(&json!("00c1")));
        assert!(tx.blockhash.is_none());
    }

    #[test]
    fn proof_result_accepts_both_shapes() {
        let raw: ProofResult = serde_json::from_value(json!("abcd")).unwrap();
        assert_eq!(raw.payload(), Some("abcd"));

        let failed: ProofResult =
            serde_json::from_value(json!({"success": false, "proof": ""})).unwrap();
        assert_eq!(failed.payload(), None);
    }
}
