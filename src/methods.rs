//! Per-method request descriptors.
//!
//! Every remote method is described by an [`RpcCall`]: the method name and the
//! exact positional parameters the node expects. The constructors here are the
//! single place where parameter order and literal flags are decided.

use crate::script::ContractParameter;
use crate::types::{TransferOutput, UInt160};
use serde_json::{Value, json};

/// Verbosity flag appended to block, header and transaction queries.
pub const VERBOSE: u8 = 1;

/// How to reference a block (or a state root) on the node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockId {
    /// Block hash as hex, with or without `0x`.
    Hash(String),
    /// Block height.
    Index(u32),
}

impl From<u32> for BlockId {
    fn from(value: u32) -> Self {
        Self::Index(value)
    }
}

impl From<&str> for BlockId {
    fn from(value: &str) -> Self {
        Self::Hash(value.to_string())
    }
}

impl From<String> for BlockId {
    fn from(value: String) -> Self {
        Self::Hash(value)
    }
}

impl From<BlockId> for Value {
    fn from(value: BlockId) -> Self {
        match value {
            BlockId::Hash(hash) => Value::String(hash),
            BlockId::Index(index) => Value::from(index),
        }
    }
}

/// A JSON-RPC method name plus its positional parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcCall {
    pub method: &'static str,
    pub params: Vec<Value>,
}

fn witness_params(hashes: &[UInt160]) -> impl Iterator<Item = Value> + '_ {
    hashes.iter().map(|h| Value::String(h.to_string()))
}

impl RpcCall {
    pub fn new(method: &'static str, params: Vec<Value>) -> Self {
        Self { method, params }
    }

    fn bare(method: &'static str) -> Self {
        Self::new(method, Vec::new())
    }

    // ── Chain ────────────────────────────────────────────────────

    pub fn get_best_block_hash() -> Self {
        Self::bare("getbestblockhash")
    }

    /// `getblock` with the verbosity flag.
    pub fn get_block(block: impl Into<BlockId>) -> Self {
        let block: BlockId = block.into();
        Self::new("getblock", vec![block.into(), VERBOSE.into()])
    }

    pub fn get_block_count() -> Self {
        Self::bare("getblockcount")
    }

    /// `getblockheader` with the verbosity flag.
    pub fn get_block_header(block: impl Into<BlockId>) -> Self {
        let block: BlockId = block.into();
        Self::new("getblockheader", vec![block.into(), VERBOSE.into()])
    }

    pub fn get_block_hash(index: u32) -> Self {
        Self::new("getblockhash", vec![index.into()])
    }

    pub fn get_raw_mempool() -> Self {
        Self::bare("getrawmempool")
    }

    /// `getrawtransaction` with the verbosity flag.
    pub fn get_raw_transaction(txid: &str) -> Self {
        Self::new("getrawtransaction", vec![txid.into(), VERBOSE.into()])
    }

    pub fn get_transaction_height(txid: &str) -> Self {
        Self::new("gettransactionheight", vec![txid.into()])
    }

    pub fn get_tx_out(txid: &str, n: u16) -> Self {
        Self::new("gettxout", vec![txid.into(), n.into()])
    }

    /// `sendrawtransaction`. The trailing `1` is expected by the target node
    /// version and must stay.
    pub fn send_raw_transaction(tx_hex: &str) -> Self {
        Self::new("sendrawtransaction", vec![tx_hex.into(), VERBOSE.into()])
    }

    pub fn submit_block(block_hex: &str) -> Self {
        Self::new("submitblock", vec![block_hex.into()])
    }

    // ── State ────────────────────────────────────────────────────

    pub fn get_account_state(address: &str) -> Self {
        Self::new("getaccountstate", vec![address.into()])
    }

    pub fn get_asset_state(asset_id: &str) -> Self {
        Self::new("getassetstate", vec![asset_id.into()])
    }

    pub fn get_contract_state(script_hash: &str) -> Self {
        Self::new("getcontractstate", vec![script_hash.into()])
    }

    pub fn get_storage(script_hash: &str, key: &str) -> Self {
        Self::new("getstorage", vec![script_hash.into(), key.into()])
    }

    pub fn get_claimable(address: &str) -> Self {
        Self::new("getclaimable", vec![address.into()])
    }

    pub fn get_unclaimed(address: &str) -> Self {
        Self::new("getunclaimed", vec![address.into()])
    }

    pub fn get_unspents(address: &str) -> Self {
        Self::new("getunspents", vec![address.into()])
    }

    pub fn validate_address(address: &str) -> Self {
        Self::new("validateaddress", vec![address.into()])
    }

    // ── Node ─────────────────────────────────────────────────────

    pub fn get_connection_count() -> Self {
        Self::bare("getconnectioncount")
    }

    pub fn get_peers() -> Self {
        Self::bare("getpeers")
    }

    pub fn get_validators() -> Self {
        Self::bare("getvalidators")
    }

    pub fn get_version() -> Self {
        Self::bare("getversion")
    }

    pub fn list_plugins() -> Self {
        Self::bare("listplugins")
    }

    // ── Plugins: application logs, NEP-5 tracker ─────────────────

    pub fn get_application_log(txid: &str) -> Self {
        Self::new("getapplicationlog", vec![txid.into()])
    }

    pub fn get_nep5_balances(address: &str) -> Self {
        Self::new("getnep5balances", vec![address.into()])
    }

    pub fn get_nep5_transfers(address: &str) -> Self {
        Self::new("getnep5transfers", vec![address.into()])
    }

    // ── Invocation ───────────────────────────────────────────────

    /// `invokescript`: the script hex, followed by any script hashes the VM
    /// should treat as witnessed.
    pub fn invoke_script(script_hex: &str, witness_hashes: &[UInt160]) -> Self {
        let mut params = vec![Value::from(script_hex)];
        params.extend(witness_params(witness_hashes));
        Self::new("invokescript", params)
    }

    /// `invokefunction`. The argument array is omitted only when there are
    /// neither arguments nor witness hashes, since witness hashes are read
    /// from position three onwards.
    pub fn invoke_function(
        script_hash: &UInt160,
        operation: &str,
        args: &[ContractParameter],
        witness_hashes: &[UInt160],
    ) -> Self {
        let mut params = vec![Value::from(script_hash.to_string()), Value::from(operation)];
        if !args.is_empty() || !witness_hashes.is_empty() {
            params.push(args.iter().map(Value::from).collect());
        }
        params.extend(witness_params(witness_hashes));
        Self::new("invokefunction", params)
    }

    // ── Wallet plugin ────────────────────────────────────────────

    pub fn claim_gas(address: &str) -> Self {
        Self::new("claimgas", vec![address.into()])
    }

    pub fn get_balance(asset_id: &str) -> Self {
        Self::new("getbalance", vec![asset_id.into()])
    }

    pub fn get_new_address() -> Self {
        Self::bare("getnewaddress")
    }

    pub fn get_unclaimed_gas() -> Self {
        Self::bare("getunclaimedgas")
    }

    pub fn get_wallet_height() -> Self {
        Self::bare("getwalletheight")
    }

    pub fn import_priv_key(wif: &str) -> Self {
        Self::new("importprivkey", vec![wif.into()])
    }

    pub fn list_address() -> Self {
        Self::bare("listaddress")
    }

    pub fn send_from(
        asset_id: &str,
        from: &str,
        to: &str,
        amount: u32,
        fee: f64,
        change_address: Option<&str>,
    ) -> Self {
        let mut params: Vec<Value> = vec![
            asset_id.into(),
            from.into(),
            to.into(),
            amount.into(),
            fee.into(),
        ];
        params.extend(change_address.map(Value::from));
        Self::new("sendfrom", params)
    }

    pub fn send_to_address(
        asset_id: &str,
        to: &str,
        amount: u32,
        fee: f64,
        change_address: Option<&str>,
    ) -> Self {
        let mut params: Vec<Value> = vec![asset_id.into(), to.into(), amount.into(), fee.into()];
        params.extend(change_address.map(Value::from));
        Self::new("sendtoaddress", params)
    }

    pub fn send_many(outputs: &[TransferOutput], fee: f64, change_address: Option<&str>) -> Self {
        let outputs: Value = outputs
            .iter()
            .map(|out| json!({"asset": out.asset, "value": out.value, "address": out.address}))
            .collect();
        let mut params = vec![outputs, fee.into()];
        params.extend(change_address.map(Value::from));
        Self::new("sendmany", params)
    }

    // ── State root ───────────────────────────────────────────────

    pub fn get_proof(state_root: &str, script_hash: &str, store_key: &str) -> Self {
        Self::new(
            "getproof",
            vec![state_root.into(), script_hash.into(), store_key.into()],
        )
    }

    pub fn verify_proof(state_root: &str, proof: &str) -> Self {
        Self::new("verifyproof", vec![state_root.into(), proof.into()])
    }

    pub fn get_state_height() -> Self {
        Self::bare("getstateheight")
    }

    pub fn get_state_root(block: impl Into<BlockId>) -> Self {
        let block: BlockId = block.into();
        Self::new("getstateroot", vec![block.into()])
    }
}
