//! Async JSON-RPC client for NEO 2.x nodes.

use crate::methods::{BlockId, RpcCall};
use crate::script::ContractParameter;
use crate::types::*;
use reqwest::header::{CONNECTION, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use url::Url;

/// Overall timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const MAINNET_URL: &str = "http://seed1.ngd.network:10332";
pub const TESTNET_URL: &str = "http://seed1.ngd.network:20332";
pub const LOCAL_URL: &str = "http://localhost:10332";

/// JSON-RPC request wrapper
#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: &'a [Value],
}

/// JSON-RPC response wrapper
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[allow(dead_code)]
    #[serde(default)]
    jsonrpc: Option<String>,
    #[allow(dead_code)]
    #[serde(default)]
    id: Option<u64>,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

/// `Some` whenever the key is present, including `"result": null`.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC error object returned by the node.
#[derive(Debug, Clone, Deserialize, thiserror::Error)]
#[error("RPC error {code}: {message}")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Client error type.
///
/// Transport problems (`Http`, `Status`, `Json`) and node-reported failures
/// (`Rpc`) are separate variants so callers can tell them apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(StatusCode),
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Async client for the NEO 2.x JSON-RPC API.
///
/// Each call is a single POST on a fresh connection; nothing is retried.
///
/// # Example
///
/// ```no_run
/// use neo2_rpc::RpcClient;
///
/// #[tokio::main]
/// async fn main() -> neo2_rpc::client::Result<()> {
///     let client = RpcClient::testnet()?;
///     let height = client.get_block_count().await?;
///     println!("Height: {height}");
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RpcClient {
    client: Client,
    endpoint: Url,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for the given endpoint. Fails if the endpoint is not a
    /// valid URL.
    pub fn new(endpoint: impl AsRef<str>) -> Result<Self> {
        Self::from_url(Url::parse(endpoint.as_ref())?)
    }

    /// Create a client from an already parsed URL.
    pub fn from_url(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .pool_max_idle_per_host(0)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            request_id: AtomicU64::new(1),
        })
    }

    /// Create a client for NEO 2.x MainNet.
    pub fn mainnet() -> Result<Self> {
        Self::new(MAINNET_URL)
    }

    /// Create a client for NEO 2.x TestNet.
    pub fn testnet() -> Result<Self> {
        Self::new(TESTNET_URL)
    }

    /// Create a client for a local node (localhost:10332).
    pub fn local() -> Result<Self> {
        Self::new(LOCAL_URL)
    }

    /// Endpoint this client posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Dispatch any method descriptor and decode its result.
    pub async fn send<R: DeserializeOwned>(&self, call: RpcCall) -> Result<R> {
        let id = self.next_id();
        let request = RpcRequest {
            jsonrpc: "2.0",
            id,
            method: call.method,
            params: &call.params,
        };
        tracing::debug!(method = call.method, id, "sending rpc request");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONNECTION, HeaderValue::from_static("close"))
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let envelope: RpcResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(Error::Status(status)),
            Err(e) => return Err(e.into()),
        };

        if let Some(error) = envelope.error {
            tracing::warn!(method = call.method, id, code = error.code, "node returned error");
            return Err(error.into());
        }
        if !status.is_success() {
            tracing::warn!(method = call.method, id, %status, "http error without rpc error");
            return Err(Error::Status(status));
        }
        let result = envelope.result.ok_or_else(|| {
            <serde_json::Error as serde::de::Error>::missing_field("result")
        })?;
        Ok(serde_json::from_value(result)?)
    }

    // ── Chain ────────────────────────────────────────────────────

    /// Returns the hash of the tallest block.
    pub async fn get_best_block_hash(&self) -> Result<String> {
        self.send(RpcCall::get_best_block_hash()).await
    }

    /// Returns a verbose block by hash.
    pub async fn get_block_by_hash(&self, hash: &str) -> Result<Block> {
        self.send(RpcCall::get_block(hash)).await
    }

    /// Returns a verbose block by height.
    pub async fn get_block_by_index(&self, index: u32) -> Result<Block> {
        self.send(RpcCall::get_block(index)).await
    }

    /// Returns the number of blocks in the main chain.
    pub async fn get_block_count(&self) -> Result<u32> {
        self.send(RpcCall::get_block_count()).await
    }

    /// Returns a verbose block header by hash.
    pub async fn get_block_header_by_hash(&self, hash: &str) -> Result<BlockHeader> {
        self.send(RpcCall::get_block_header(hash)).await
    }

    /// Returns a verbose block header by height.
    pub async fn get_block_header_by_index(&self, index: u32) -> Result<BlockHeader> {
        self.send(RpcCall::get_block_header(index)).await
    }

    /// Returns the hash of the block at `index`.
    pub async fn get_block_hash(&self, index: u32) -> Result<String> {
        self.send(RpcCall::get_block_hash(index)).await
    }

    /// Returns the transaction ids in the memory pool.
    pub async fn get_raw_mempool(&self) -> Result<Vec<String>> {
        self.send(RpcCall::get_raw_mempool()).await
    }

    /// Returns a verbose transaction by id.
    pub async fn get_raw_transaction(&self, txid: &str) -> Result<Transaction> {
        self.send(RpcCall::get_raw_transaction(txid)).await
    }

    /// Returns the height of the block holding `txid`.
    pub async fn get_transaction_height(&self, txid: &str) -> Result<u32> {
        self.send(RpcCall::get_transaction_height(txid)).await
    }

    /// Returns an unspent output, or `None` if it was spent.
    pub async fn get_tx_out(&self, txid: &str, n: u16) -> Result<Option<TxOut>> {
        self.send(RpcCall::get_tx_out(txid, n)).await
    }

    /// Broadcasts a signed transaction.
    pub async fn send_raw_transaction(&self, tx_hex: &str) -> Result<bool> {
        self.send(RpcCall::send_raw_transaction(tx_hex)).await
    }

    /// Relays a serialized block.
    pub async fn submit_block(&self, block_hex: &str) -> Result<bool> {
        self.send(RpcCall::submit_block(block_hex)).await
    }

    // ── State ────────────────────────────────────────────────────

    /// Returns votes and global asset balances of an account.
    pub async fn get_account_state(&self, address: &str) -> Result<AccountState> {
        self.send(RpcCall::get_account_state(address)).await
    }

    /// Returns the registration record of a global asset.
    pub async fn get_asset_state(&self, asset_id: &str) -> Result<AssetState> {
        self.send(RpcCall::get_asset_state(asset_id)).await
    }

    /// Returns the deployment record of a contract.
    pub async fn get_contract_state(&self, script_hash: &str) -> Result<ContractState> {
        self.send(RpcCall::get_contract_state(script_hash)).await
    }

    /// Returns the stored value as hex, or `None` if the key is absent.
    pub async fn get_storage(&self, script_hash: &str, key: &str) -> Result<Option<String>> {
        self.send(RpcCall::get_storage(script_hash, key)).await
    }

    /// Returns claimable GAS outputs of an address.
    pub async fn get_claimable(&self, address: &str) -> Result<ClaimableResult> {
        self.send(RpcCall::get_claimable(address)).await
    }

    /// Returns available and unavailable GAS of an address.
    pub async fn get_unclaimed(&self, address: &str) -> Result<Unclaimed> {
        self.send(RpcCall::get_unclaimed(address)).await
    }

    /// Returns unspent outputs of an address, grouped by asset.
    pub async fn get_unspents(&self, address: &str) -> Result<Unspents> {
        self.send(RpcCall::get_unspents(address)).await
    }

    /// Checks whether `address` is a valid NEO address.
    pub async fn validate_address(&self, address: &str) -> Result<ValidateAddress> {
        self.send(RpcCall::validate_address(address)).await
    }

    // ── Node ─────────────────────────────────────────────────────

    /// Returns the number of connected peers.
    pub async fn get_connection_count(&self) -> Result<u32> {
        self.send(RpcCall::get_connection_count()).await
    }

    /// Returns connected, unconnected and bad peers.
    pub async fn get_peers(&self) -> Result<Peers> {
        self.send(RpcCall::get_peers()).await
    }

    /// Returns the current validator set and its votes.
    pub async fn get_validators(&self) -> Result<Vec<Validator>> {
        self.send(RpcCall::get_validators()).await
    }

    /// Returns the node's port, nonce and user agent.
    pub async fn get_version(&self) -> Result<Version> {
        self.send(RpcCall::get_version()).await
    }

    /// Returns the plugins loaded by the node.
    pub async fn list_plugins(&self) -> Result<Vec<Plugin>> {
        self.send(RpcCall::list_plugins()).await
    }

    // ── Plugins ──────────────────────────────────────────────────

    /// Requires the ApplicationLogs plugin.
    pub async fn get_application_log(&self, txid: &str) -> Result<ApplicationLog> {
        self.send(RpcCall::get_application_log(txid)).await
    }

    /// Requires the RpcNep5Tracker plugin.
    pub async fn get_nep5_balances(&self, address: &str) -> Result<Nep5Balances> {
        self.send(RpcCall::get_nep5_balances(address)).await
    }

    /// Requires the RpcNep5Tracker plugin.
    pub async fn get_nep5_transfers(&self, address: &str) -> Result<Nep5Transfers> {
        self.send(RpcCall::get_nep5_transfers(address)).await
    }

    // ── Invocation ───────────────────────────────────────────────

    /// Runs a script in the node's VM without persisting anything.
    pub async fn invoke_script(
        &self,
        script_hex: &str,
        witness_hashes: &[UInt160],
    ) -> Result<InvokeResult> {
        self.send(RpcCall::invoke_script(script_hex, witness_hashes))
            .await
    }

    /// Calls `operation` on a deployed contract without persisting anything.
    pub async fn invoke_function(
        &self,
        script_hash: &UInt160,
        operation: &str,
        args: &[ContractParameter],
        witness_hashes: &[UInt160],
    ) -> Result<InvokeResult> {
        self.send(RpcCall::invoke_function(
            script_hash,
            operation,
            args,
            witness_hashes,
        ))
        .await
    }

    // ── Wallet plugin ────────────────────────────────────────────

    /// Claims GAS to `address` from the open wallet.
    pub async fn claim_gas(&self, address: &str) -> Result<Transaction> {
        self.send(RpcCall::claim_gas(address)).await
    }

    /// Returns the open wallet's balance of an asset.
    pub async fn get_balance(&self, asset_id: &str) -> Result<WalletBalance> {
        self.send(RpcCall::get_balance(asset_id)).await
    }

    /// Creates a new address in the open wallet.
    pub async fn get_new_address(&self) -> Result<String> {
        self.send(RpcCall::get_new_address()).await
    }

    /// Returns unclaimed GAS in the open wallet.
    pub async fn get_unclaimed_gas(&self) -> Result<UnclaimedGas> {
        self.send(RpcCall::get_unclaimed_gas()).await
    }

    /// Returns the open wallet's synchronized height.
    pub async fn get_wallet_height(&self) -> Result<u32> {
        self.send(RpcCall::get_wallet_height()).await
    }

    /// Imports a WIF private key into the open wallet.
    pub async fn import_priv_key(&self, wif: &str) -> Result<WalletAddress> {
        self.send(RpcCall::import_priv_key(wif)).await
    }

    /// Returns every address in the open wallet.
    pub async fn list_address(&self) -> Result<Vec<WalletAddress>> {
        self.send(RpcCall::list_address()).await
    }

    /// Transfers an asset from one wallet address.
    pub async fn send_from(
        &self,
        asset_id: &str,
        from: &str,
        to: &str,
        amount: u32,
        fee: f64,
        change_address: Option<&str>,
    ) -> Result<Transaction> {
        self.send(RpcCall::send_from(
            asset_id,
            from,
            to,
            amount,
            fee,
            change_address,
        ))
        .await
    }

    /// Transfers an asset from the open wallet.
    pub async fn send_to_address(
        &self,
        asset_id: &str,
        to: &str,
        amount: u32,
        fee: f64,
        change_address: Option<&str>,
    ) -> Result<Transaction> {
        self.send(RpcCall::send_to_address(
            asset_id,
            to,
            amount,
            fee,
            change_address,
        ))
        .await
    }

    /// Sends several outputs in one transaction.
    pub async fn send_many(
        &self,
        outputs: &[TransferOutput],
        fee: f64,
        change_address: Option<&str>,
    ) -> Result<Transaction> {
        self.send(RpcCall::send_many(outputs, fee, change_address))
            .await
    }

    // ── State root ───────────────────────────────────────────────

    /// Returns a Merkle proof for a storage key against a state root.
    pub async fn get_proof(
        &self,
        state_root: &str,
        script_hash: &str,
        store_key: &str,
    ) -> Result<ProofResult> {
        self.send(RpcCall::get_proof(state_root, script_hash, store_key))
            .await
    }

    /// Verifies a proof against a state root.
    pub async fn verify_proof(&self, state_root: &str, proof: &str) -> Result<ProofResult> {
        self.send(RpcCall::verify_proof(state_root, proof)).await
    }

    /// Returns local state-root and validated heights.
    pub async fn get_state_height(&self) -> Result<StateHeight> {
        self.send(RpcCall::get_state_height()).await
    }

    /// Returns the state root at a height.
    pub async fn get_state_root_by_index(&self, index: u32) -> Result<StateRootState> {
        self.send(RpcCall::get_state_root(BlockId::Index(index)))
            .await
    }

    /// Returns the state root of a block hash.
    pub async fn get_state_root_by_hash(&self, hash: &str) -> Result<StateRootState> {
        self.send(RpcCall::get_state_root(hash)).await
    }
}
