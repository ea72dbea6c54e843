//! Contract backends implementing [`artshop_core::ContractClient`].
//!
//! - [`JsonRpcContract`] talks to a deployed contract through an Ethereum
//!   JSON-RPC node.
//! - [`InMemoryContract`] applies the contract's rules in process, for
//!   tests and offline use.

pub mod abi;
mod memory;
mod rpc;

pub use memory::InMemoryContract;
pub use rpc::{JsonRpcContract, RpcConfig, RpcError};
