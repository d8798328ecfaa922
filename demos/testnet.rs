//! Example: Query a NEO 2.x TestNet node and a NEP-5 token.
//!
//! Run with: cargo run --example testnet

use neo2_rpc::{Nep5Helper, RpcClient, UInt160};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = RpcClient::testnet()?;

    println!("=== NEO 2.x TestNet RPC Client ===\n");

    // 1. Node version
    println!("1. Fetching node version...");
    let version = client.get_version().await?;
    println!("   User agent: {}", version.useragent);
    println!("   Nonce: {}", version.nonce);
    println!();

    // 2. Chain height and latest block
    println!("2. Fetching latest block...");
    let height = client.get_block_count().await?;
    let block = client.get_block_by_index(height.saturating_sub(1)).await?;
    println!("   Block height: {}", block.header.index);
    println!("   Block hash: {}", block.header.hash);
    if let Some(time) = block.header.timestamp() {
        println!("   Timestamp: {time}");
    }
    println!("   Transactions: {}", block.tx.len());
    println!();

    // 3. Memory pool
    println!("3. Fetching mempool...");
    let mempool = client.get_raw_mempool().await?;
    println!("   Pending transactions: {}", mempool.len());
    println!();

    // 4. NEP-5 token metadata
    println!("4. Querying NEP-5 token...");
    let token: UInt160 = "0x9aff1e08aea2048a26a3d2ddbb3df495b932b1e7".parse()?;
    let helper = Nep5Helper::with_client(client);
    let name = helper.name(&token).await?;
    let symbol = helper.symbol(&token).await?;
    let decimals = helper.decimals(&token).await?;
    let supply = helper.total_supply(&token).await?;
    println!("   {name} ({symbol}), {decimals} decimals");
    println!("   Total supply: {supply}");

    println!("\n=== Done! ===");
    Ok(())
}
