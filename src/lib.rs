//! Rust client for the NEO 2.x JSON-RPC API.
//!
//! This crate provides typed response models, per-method request descriptors,
//! a minimal NEO 2.x script builder and an async client, plus a helper for
//! NEP-5 token contracts.
//!
//! # Features
//!
//! - **`types`, `methods`, `script` modules**: response payloads, request
//!   descriptors and script building. Available with no additional features.
//! - **`client` and `nep5` modules** (enabled by default): an async RPC client
//!   built on `reqwest` and the NEP-5 helper on top of it.
//!
//! # Quick start
//!
//! ```no_run
//! use neo2_rpc::{Nep5Helper, UInt160};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let helper = Nep5Helper::new("http://seed1.ngd.network:20332")?;
//!     let token: UInt160 = "0x9aff1e08aea2048a26a3d2ddbb3df495b932b1e7".parse()?;
//!     let symbol = helper.symbol(&token).await?;
//!     let decimals = helper.decimals(&token).await?;
//!     println!("{symbol} has {decimals} decimals");
//!     Ok(())
//! }
//! ```

pub mod methods;
pub mod script;
pub mod types;

pub use methods::{BlockId, RpcCall};
pub use script::{ContractParameter, ScriptBuilder};

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod nep5;

#[cfg(feature = "client")]
pub use client::RpcClient;
#[cfg(feature = "client")]
pub use nep5::{Nep5Error, Nep5Helper};

pub use types::*;
