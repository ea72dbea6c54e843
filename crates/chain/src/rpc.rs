//! Ethereum JSON-RPC backend for the artwork contract.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` so calls do
//! not block the async runtime. Writes go through `eth_sendTransaction` on
//! the signing endpoint and are confirmed by polling for the receipt; reads
//! use `eth_call` on the read endpoint, which falls back to the signing
//! endpoint when none is configured.

use std::collections::HashMap;
use std::time::Duration;

use artshop_core::{
    AccountProvider, Address, ArtistDetails, ArtworkDetails, ContractClient, ContractError,
    ContractEvent, EventBatch, LifecycleState, MinorUnits, NewArtwork, OwnerAndState,
    ProviderError,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::abi::{self, AbiError, Decoder, Token};

/// Connection settings for [`JsonRpcContract`].
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// Endpoint with unlocked signing accounts (e.g. a local development node).
    pub rpc_url: String,
    /// Optional read-only endpoint used for `eth_call` and `eth_getLogs`.
    pub read_url: Option<String>,
    pub contract_address: Address,
    /// Gas limit attached to every transaction.
    pub gas: u64,
    pub poll_interval: Duration,
    pub confirmation_attempts: u32,
    /// Event signatures such as `"Framed(uint256)"`, used to name log entries.
    pub event_signatures: Vec<String>,
}

impl RpcConfig {
    pub fn new(rpc_url: impl Into<String>, contract_address: Address) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            read_url: None,
            contract_address,
            gas: 4_500_000,
            poll_interval: Duration::from_millis(500),
            confirmation_attempts: 120,
            event_signatures: Vec::new(),
        }
    }
}

/// Failure of a single JSON-RPC round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    /// The endpoint could not be reached or returned a malformed response.
    #[error("{0}")]
    Transport(String),

    /// The node answered with a JSON-RPC error object.
    #[error("{message}")]
    Node { code: i64, message: String },
}

impl From<RpcError> for ContractError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Transport(msg) => ContractError::Transport(msg),
            RpcError::Node { message, .. } => ContractError::Rejected(message),
        }
    }
}

impl From<AbiError> for ContractError {
    fn from(err: AbiError) -> Self {
        ContractError::Transport(format!("could not decode contract response: {err}"))
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Receipt {
    transaction_hash: String,
    status: Option<String>,
    #[serde(default)]
    logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogEntry {
    #[serde(default)]
    topics: Vec<String>,
    #[serde(default)]
    data: String,
    transaction_hash: Option<String>,
    block_number: Option<String>,
}

/// A [`ContractClient`] and [`AccountProvider`] backed by a JSON-RPC node.
pub struct JsonRpcContract {
    config: RpcConfig,
    event_names: HashMap<String, String>,
}

impl JsonRpcContract {
    pub fn new(config: RpcConfig) -> Self {
        let event_names = config
            .event_signatures
            .iter()
            .map(|sig| {
                let name = sig.split('(').next().unwrap_or(sig).to_string();
                (abi::event_topic(sig), name)
            })
            .collect();
        Self {
            config,
            event_names,
        }
    }

    fn read_url(&self) -> &str {
        self.config
            .read_url
            .as_deref()
            .unwrap_or(&self.config.rpc_url)
    }

    /// Perform one JSON-RPC request.
    async fn request(&self, url: &str, method: &str, params: Value) -> Result<Value, RpcError> {
        debug!(method, url, "json-rpc request");
        let url = url.to_string();
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = tokio::task::spawn_blocking(move || {
            // Nodes may report JSON-RPC errors with a 4xx/5xx status; the body
            // still carries the message.
            let agent = ureq::Agent::new_with_config(
                ureq::Agent::config_builder()
                    .http_status_as_error(false)
                    .build(),
            );
            let response = agent
                .post(&url)
                .send_json(&body)
                .map_err(|e| RpcError::Transport(e.to_string()))?;
            let status = response.status();
            match response.into_body().read_json::<RpcResponse>() {
                Ok(parsed) if parsed.error.is_some() || status.is_success() => Ok(parsed),
                Ok(_) => Err(RpcError::Transport(format!("http status {}", status))),
                Err(_) if !status.is_success() => {
                    Err(RpcError::Transport(format!("http status {}", status)))
                }
                Err(e) => Err(RpcError::Transport(format!(
                    "failed to parse response as JSON: {}",
                    e
                ))),
            }
        })
        .await
        .map_err(|e| RpcError::Transport(format!("task join error: {}", e)))??;

        if let Some(err) = response.error {
            return Err(RpcError::Node {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn eth_call(&self, data: Vec<u8>) -> Result<Vec<u8>, RpcError> {
        let params = json!([
            {
                "to": self.config.contract_address.to_string(),
                "data": abi::to_hex(&data),
            },
            "latest"
        ]);
        let result = self.request(self.read_url(), "eth_call", params).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| RpcError::Transport("eth_call returned a non-string result".into()))?;
        abi::from_hex(hex).map_err(|e| RpcError::Transport(e.to_string()))
    }

    /// Send a transaction and wait until it is mined.
    async fn transact(
        &self,
        from: Address,
        data: Vec<u8>,
        value: MinorUnits,
    ) -> Result<Receipt, ContractError> {
        let mut tx = json!({
            "from": from.to_string(),
            "to": self.config.contract_address.to_string(),
            "data": abi::to_hex(&data),
            "gas": abi::quantity(u128::from(self.config.gas)),
        });
        if value > 0 {
            tx["value"] = Value::String(abi::quantity(value));
        }

        let result = self
            .request(&self.config.rpc_url, "eth_sendTransaction", json!([tx]))
            .await?;
        let hash = result
            .as_str()
            .ok_or_else(|| ContractError::Transport("eth_sendTransaction returned no hash".into()))?
            .to_string();
        debug!(tx_hash = %hash, "transaction submitted");

        let receipt = self.wait_for_receipt(&hash).await?;
        check_status(receipt).inspect_err(|_| warn!(tx_hash = %hash, "transaction reverted"))
    }

    async fn wait_for_receipt(&self, hash: &str) -> Result<Receipt, ContractError> {
        for _ in 0..self.config.confirmation_attempts.max(1) {
            let result = self
                .request(
                    &self.config.rpc_url,
                    "eth_getTransactionReceipt",
                    json!([hash]),
                )
                .await?;
            if let Some(receipt) = parse_receipt(hash, result)? {
                return Ok(receipt);
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
        Err(ContractError::Transport(format!(
            "transaction {} not confirmed after {} attempts",
            hash, self.config.confirmation_attempts
        )))
    }

    async fn transition(
        &self,
        signature: &str,
        from: Address,
        tokens: &[Token],
        value: MinorUnits,
    ) -> Result<(), ContractError> {
        self.transact(from, abi::encode_call(signature, tokens), value)
            .await
            .map(|_| ())
    }

    fn event_name(&self, topic: Option<&String>) -> String {
        match topic {
            Some(t) => self
                .event_names
                .get(&t.to_lowercase())
                .cloned()
                .unwrap_or_else(|| t.clone()),
            None => "anonymous".to_string(),
        }
    }
}

/// Extract the created artwork id from the first receipt log: the first
/// indexed argument if there is one, otherwise the first data word.
fn created_id(receipt: &Receipt) -> Result<u64, ContractError> {
    let log = receipt.logs.first().ok_or_else(|| {
        ContractError::Rejected(format!(
            "transaction {} emitted no creation event",
            receipt.transaction_hash
        ))
    })?;
    let bytes = match log.topics.get(1) {
        Some(topic) => abi::from_hex(topic)?,
        None => abi::from_hex(&log.data)?,
    };
    Ok(Decoder::new(&bytes).u64(0)?)
}

/// Interpret an `eth_getTransactionReceipt` result. `None` while the
/// transaction is still pending.
fn parse_receipt(hash: &str, result: Value) -> Result<Option<Receipt>, ContractError> {
    if result.is_null() {
        return Ok(None);
    }
    serde_json::from_value(result)
        .map(Some)
        .map_err(|e| ContractError::Transport(format!("malformed receipt for {}: {}", hash, e)))
}

/// Reject a mined receipt with `status == 0x0`. Receipts from before the
/// status field existed carry none and are accepted.
fn check_status(receipt: Receipt) -> Result<Receipt, ContractError> {
    let status = receipt
        .status
        .as_deref()
        .map(abi::parse_quantity)
        .transpose()?;
    if status == Some(0) {
        return Err(ContractError::Rejected(format!(
            "transaction {} reverted",
            receipt.transaction_hash
        )));
    }
    Ok(receipt)
}

fn decode_owner_and_state(data: &[u8]) -> Result<OwnerAndState, ContractError> {
    let dec = Decoder::new(data);
    Ok(OwnerAndState {
        owner: dec.address(0)?,
        state: LifecycleState::from_code(dec.u64(1)?),
    })
}

/// Decode the `fetchArtworkDetails` result for `id`. A revert or empty
/// return data means the id does not resolve.
fn decode_artwork_details(
    id: u64,
    call: Result<Vec<u8>, RpcError>,
) -> Result<ArtworkDetails, ContractError> {
    let data = match call {
        Ok(data) => data,
        Err(RpcError::Node { .. }) => return Err(ContractError::NotFound(id)),
        Err(e) => return Err(e.into()),
    };
    if data.is_empty() {
        return Err(ContractError::NotFound(id));
    }
    let dec = Decoder::new(&data);
    Ok(ArtworkDetails {
        exists: dec.bool(0)?,
        owner: dec.address(1)?,
        title: dec.string(2)?,
        year: dec.u32(3)?,
        medium: dec.string(4)?,
        style: dec.string(5)?,
        price: dec.uint(6)?,
        notes: dec.string(7)?,
        state: LifecycleState::from_code(dec.u64(8)?),
        adopter: dec.address(9)?,
        shipper: dec.address(10)?,
    })
}

fn decode_artist_details(data: &[u8]) -> Result<ArtistDetails, ContractError> {
    let dec = Decoder::new(data);
    Ok(ArtistDetails {
        origin_artist: dec.address(0)?,
        name: dec.string(1)?,
        info: dec.string(2)?,
        location: dec.string(3)?,
    })
}

impl JsonRpcContract {
    /// Turn an `eth_getLogs` result into an event batch. The next cursor is
    /// one past the highest block seen; logs without a block number (still
    /// pending) are placed at `cursor`.
    fn batch_from_logs(&self, cursor: u64, result: Value) -> Result<EventBatch, ContractError> {
        let logs: Vec<LogEntry> = serde_json::from_value(result)
            .map_err(|e| ContractError::Transport(format!("malformed log list: {}", e)))?;

        let mut next_cursor = cursor;
        let mut events = Vec::with_capacity(logs.len());
        for log in logs {
            let block_number = match log.block_number.as_deref() {
                Some(n) => u64::try_from(abi::parse_quantity(n)?).map_err(|_| {
                    ContractError::Transport(format!("block number {} out of range", n))
                })?,
                None => cursor,
            };
            next_cursor = next_cursor.max(block_number.saturating_add(1));
            events.push(ContractEvent {
                name: self.event_name(log.topics.first()),
                transaction_hash: log.transaction_hash.unwrap_or_default(),
                block_number,
            });
        }
        Ok(EventBatch {
            events,
            next_cursor,
        })
    }
}

#[async_trait]
impl ContractClient for JsonRpcContract {
    async fn create(&self, from: Address, artwork: &NewArtwork) -> Result<u64, ContractError> {
        let text = |v: &Option<String>| Token::String(v.clone().unwrap_or_default());
        let tokens = [
            text(&artwork.title),
            Token::Uint(u128::from(artwork.year)),
            text(&artwork.medium),
            text(&artwork.style),
            Token::Address(from),
            text(&artwork.artist_name),
            text(&artwork.artist_info),
            text(&artwork.artist_location),
            text(&artwork.notes),
        ];
        let receipt = self
            .transact(from, abi::encode_call(abi::CREATE, &tokens), 0)
            .await?;
        created_id(&receipt)
    }

    async fn frame(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.transition(abi::FRAME, from, &[Token::Uint(id.into())], 0)
            .await
    }

    async fn offer_for_adoption(
        &self,
        from: Address,
        id: u64,
        price: MinorUnits,
    ) -> Result<(), ContractError> {
        self.transition(
            abi::OFFER_FOR_ADOPTION,
            from,
            &[Token::Uint(id.into()), Token::Uint(price)],
            0,
        )
        .await
    }

    async fn adopt(
        &self,
        from: Address,
        id: u64,
        recipient: Address,
        payment: MinorUnits,
    ) -> Result<(), ContractError> {
        self.transition(
            abi::ADOPT,
            from,
            &[Token::Uint(id.into()), Token::Address(recipient)],
            payment,
        )
        .await
    }

    async fn pack(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.transition(abi::PACK, from, &[Token::Uint(id.into())], 0)
            .await
    }

    async fn pick_up(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.transition(abi::PICK_UP, from, &[Token::Uint(id.into())], 0)
            .await
    }

    async fn ship(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.transition(abi::SHIP, from, &[Token::Uint(id.into())], 0)
            .await
    }

    async fn deliver(&self, from: Address, id: u64) -> Result<(), ContractError> {
        self.transition(abi::DELIVER, from, &[Token::Uint(id.into())], 0)
            .await
    }

    async fn fetch_owner_and_state(&self, id: u64) -> Result<OwnerAndState, ContractError> {
        let data = self
            .eth_call(abi::encode_call(
                abi::FETCH_OWNER_AND_STATE,
                &[Token::Uint(id.into())],
            ))
            .await?;
        decode_owner_and_state(&data)
    }

    async fn fetch_artwork_details(&self, id: u64) -> Result<ArtworkDetails, ContractError> {
        let call = self
            .eth_call(abi::encode_call(
                abi::FETCH_ARTWORK_DETAILS,
                &[Token::Uint(id.into())],
            ))
            .await;
        decode_artwork_details(id, call)
    }

    async fn fetch_artist_details(&self, id: u64) -> Result<ArtistDetails, ContractError> {
        let data = self
            .eth_call(abi::encode_call(
                abi::FETCH_ARTIST_DETAILS,
                &[Token::Uint(id.into())],
            ))
            .await?;
        decode_artist_details(&data)
    }

    async fn events_since(&self, cursor: u64) -> Result<EventBatch, ContractError> {
        let params = json!([{
            "address": self.config.contract_address.to_string(),
            "fromBlock": abi::quantity(u128::from(cursor)),
            "toBlock": "latest",
        }]);
        let result = self.request(self.read_url(), "eth_getLogs", params).await?;
        self.batch_from_logs(cursor, result)
    }
}

#[async_trait]
impl AccountProvider for JsonRpcContract {
    async fn active_account(&self) -> Result<Address, ProviderError> {
        let result = self
            .request(&self.config.rpc_url, "eth_accounts", json!([]))
            .await
            .map_err(|e| ProviderError::Unreachable(e.to_string()))?;
        let first = result
            .as_array()
            .and_then(|accounts| accounts.first())
            .and_then(Value::as_str)
            .ok_or(ProviderError::NoAccounts)?;
        first
            .parse()
            .map_err(|e| ProviderError::Unreachable(format!("provider returned a bad account: {}", e)))
    }
}
