//! Minimal Solidity ABI codec for the artwork contract's call surface.
//!
//! Only what the contract needs: `uint256`, `address`, `bool` as static
//! words and `string` as a dynamic head/tail value.

use artshop_core::Address;
use sha3::{Digest, Keccak256};

const WORD: usize = 32;

// Function signatures of the deployed contract.
pub const CREATE: &str =
    "createArtwork(string,uint256,string,string,address,string,string,string,string)";
pub const FRAME: &str = "frameArtwork(uint256)";
pub const OFFER_FOR_ADOPTION: &str = "adoptableArtwork(uint256,uint256)";
pub const ADOPT: &str = "adoptArtwork(uint256,address)";
pub const PACK: &str = "packArtwork(uint256)";
pub const PICK_UP: &str = "pickUpArtwork(uint256)";
pub const SHIP: &str = "shipArtwork(uint256)";
pub const DELIVER: &str = "deliverArtwork(uint256)";
pub const FETCH_OWNER_AND_STATE: &str = "fetchArtworkOwnerAndState(uint256)";
pub const FETCH_ARTWORK_DETAILS: &str = "fetchArtworkDetails(uint256)";
pub const FETCH_ARTIST_DETAILS: &str = "fetchArtistDetails(uint256)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    #[error("return data too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },

    #[error("integer at word {0} does not fit the target type")]
    Overflow(usize),

    #[error("string at word {0} is not valid UTF-8")]
    InvalidUtf8(usize),

    #[error("invalid hex data: {0}")]
    InvalidHex(String),
}

/// An ABI value to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(u128),
    Address(Address),
    Bool(bool),
    String(String),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        matches!(self, Token::String(_))
    }
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256::digest(data).into()
}

/// The 4-byte function selector for `signature`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Topic 0 of an event with the given signature, as `0x`-prefixed hex.
pub fn event_topic(signature: &str) -> String {
    to_hex(&keccak256(signature.as_bytes()))
}

/// Selector followed by the encoded arguments.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(tokens));
    out
}

/// Encode a tuple of tokens with head/tail layout.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            head.extend(uint_word((head_len + tail.len()) as u128));
            if let Token::String(s) = token {
                tail.extend(uint_word(s.len() as u128));
                tail.extend(s.as_bytes());
                let pad = (WORD - s.len() % WORD) % WORD;
                tail.extend(std::iter::repeat(0u8).take(pad));
            }
        } else {
            head.extend(static_word(token));
        }
    }
    head.extend(tail);
    head
}

fn static_word(token: &Token) -> [u8; 32] {
    match token {
        Token::Uint(v) => uint_word(*v),
        Token::Address(a) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(a.as_bytes());
            word
        }
        Token::Bool(b) => uint_word(u128::from(*b)),
        Token::String(_) => [0u8; 32],
    }
}

fn uint_word(v: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&v.to_be_bytes());
    word
}

/// Reads words out of ABI-encoded return data.
pub struct Decoder<'a> {
    data: &'a [u8],
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], AbiError> {
        let end = offset.checked_add(len).ok_or(AbiError::TooShort {
            needed: usize::MAX,
            actual: self.data.len(),
        })?;
        self.data.get(offset..end).ok_or(AbiError::TooShort {
            needed: end,
            actual: self.data.len(),
        })
    }

    fn word(&self, index: usize) -> Result<&'a [u8], AbiError> {
        self.slice(index * WORD, WORD)
    }

    fn uint_at_offset(&self, offset: usize, index: usize) -> Result<u128, AbiError> {
        let word = self.slice(offset, WORD)?;
        if word[..16].iter().any(|b| *b != 0) {
            return Err(AbiError::Overflow(index));
        }
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&word[16..]);
        Ok(u128::from_be_bytes(bytes))
    }

    pub fn uint(&self, index: usize) -> Result<u128, AbiError> {
        self.uint_at_offset(index * WORD, index)
    }

    pub fn u64(&self, index: usize) -> Result<u64, AbiError> {
        u64::try_from(self.uint(index)?).map_err(|_| AbiError::Overflow(index))
    }

    pub fn u32(&self, index: usize) -> Result<u32, AbiError> {
        u32::try_from(self.uint(index)?).map_err(|_| AbiError::Overflow(index))
    }

    pub fn bool(&self, index: usize) -> Result<bool, AbiError> {
        Ok(self.uint(index)? != 0)
    }

    pub fn address(&self, index: usize) -> Result<Address, AbiError> {
        let word = self.word(index)?;
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&word[12..]);
        Ok(Address::from_bytes(bytes))
    }

    pub fn string(&self, index: usize) -> Result<String, AbiError> {
        let offset = usize::try_from(self.uint(index)?).map_err(|_| AbiError::Overflow(index))?;
        let len = usize::try_from(self.uint_at_offset(offset, index)?)
            .map_err(|_| AbiError::Overflow(index))?;
        let bytes = self.slice(offset + WORD, len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| AbiError::InvalidUtf8(index))
    }
}

pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

pub fn from_hex(s: &str) -> Result<Vec<u8>, AbiError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|_| AbiError::InvalidHex(s.to_string()))
}

/// Parse a JSON-RPC hex quantity such as `"0x1b4"`.
pub fn parse_quantity(s: &str) -> Result<u128, AbiError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16).map_err(|_| AbiError::InvalidHex(s.to_string()))
}

pub fn quantity(v: u128) -> String {
    format!("0x{:x}", v)
}
