//! Canonical encodings of StarkEx limit orders and transfers.
//!
//! ## Packing
//!
//! ```text
//! LimitOrder: 0 | vault_sell:31 | vault_buy:31         | amount_sell:63 | amount_buy:63 | nonce:31 | expiration:22
//! Transfer:   1 | sender:31     | receiver_vault_id:31 | amount:63      | 0:63          | nonce:31 | expiration:22
//! ```
//!
//! The packed message uses at most 242 bits, so it is always a field element.
//! The digest of an instruction is
//!
//! ```text
//! pedersen(pedersen(token_a, token_b), packed)
//! ```
//!
//! with `(token_sell, token_buy)` for limit orders and
//! `(token, receiver_public_key)` for transfers.

use crate::{
    arithmetic::parse_decimal_digits,
    Error, FieldElement, PedersenHasher, Result, U256,
};
use elliptic_curve::bigint::Encoding;

#[cfg(all(feature = "alloc", feature = "global-table"))]
use alloc::{format, string::String};

/// Bit width of vault identifiers.
pub const VAULT_ID_BITS: usize = 31;

/// Bit width of amounts.
pub const AMOUNT_BITS: usize = 63;

/// Bit width of nonces.
pub const NONCE_BITS: usize = 31;

/// Bit width of expiration timestamps.
pub const EXPIRATION_TIMESTAMP_BITS: usize = 22;

const LIMIT_ORDER_TYPE: u64 = 0;
const TRANSFER_TYPE: u64 = 1;

/// Order to exchange `amount_sell` of `token_sell` for `amount_buy` of
/// `token_buy`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LimitOrder {
    /// Vault the sold tokens are taken from.
    pub vault_sell: u32,
    /// Vault the bought tokens are credited to.
    pub vault_buy: u32,
    /// Quantity sold.
    pub amount_sell: u64,
    /// Quantity bought.
    pub amount_buy: u64,
    /// Asset identifier of the sold token.
    pub token_sell: FieldElement,
    /// Asset identifier of the bought token.
    pub token_buy: FieldElement,
    /// Replay protection nonce.
    pub nonce: u32,
    /// Expiration, in hours since the Unix epoch.
    pub expiration_timestamp: u32,
}

impl LimitOrder {
    /// Check every numeric field against its bit width.
    pub fn validate(&self) -> Result<()> {
        check_bits(self.vault_sell.into(), VAULT_ID_BITS, "vault_sell")?;
        check_bits(self.vault_buy.into(), VAULT_ID_BITS, "vault_buy")?;
        check_bits(self.amount_sell, AMOUNT_BITS, "amount_sell")?;
        check_bits(self.amount_buy, AMOUNT_BITS, "amount_buy")?;
        check_bits(self.nonce.into(), NONCE_BITS, "nonce")?;
        check_bits(
            self.expiration_timestamp.into(),
            EXPIRATION_TIMESTAMP_BITS,
            "expiration_timestamp",
        )
    }

    /// Validate and pack the numeric fields into one field element.
    pub fn packed_message(&self) -> Result<FieldElement> {
        self.validate()?;

        Ok(pack(
            LIMIT_ORDER_TYPE,
            &[
                (self.vault_sell.into(), VAULT_ID_BITS),
                (self.vault_buy.into(), VAULT_ID_BITS),
                (self.amount_sell, AMOUNT_BITS),
                (self.amount_buy, AMOUNT_BITS),
                (self.nonce.into(), NONCE_BITS),
                (self.expiration_timestamp.into(), EXPIRATION_TIMESTAMP_BITS),
            ],
        ))
    }

    /// Compute the digest to be signed.
    pub fn hash(&self, hasher: &PedersenHasher<'_>) -> Result<FieldElement> {
        let packed = self.packed_message()?;
        let tokens = hasher.hash_pair(&self.token_sell, &self.token_buy)?;
        hasher.hash_pair(&tokens, &packed)
    }
}

/// Transfer of `amount` of `token` from `sender_vault_id` to a vault owned by
/// `receiver_public_key`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Transfer {
    /// Quantity transferred.
    pub amount: u64,
    /// Replay protection nonce.
    pub nonce: u32,
    /// Vault the tokens are taken from.
    pub sender_vault_id: u32,
    /// Asset identifier of the transferred token.
    pub token: FieldElement,
    /// Vault the tokens are credited to.
    pub receiver_vault_id: u32,
    /// Stark key (public key x-coordinate) of the receiver.
    pub receiver_public_key: FieldElement,
    /// Expiration, in hours since the Unix epoch.
    pub expiration_timestamp: u32,
}

impl Transfer {
    /// Check every numeric field against its bit width.
    pub fn validate(&self) -> Result<()> {
        check_bits(self.amount, AMOUNT_BITS, "amount")?;
        check_bits(self.nonce.into(), NONCE_BITS, "nonce")?;
        check_bits(self.sender_vault_id.into(), VAULT_ID_BITS, "sender_vault_id")?;
        check_bits(
            self.receiver_vault_id.into(),
            VAULT_ID_BITS,
            "receiver_vault_id",
        )?;
        check_bits(
            self.expiration_timestamp.into(),
            EXPIRATION_TIMESTAMP_BITS,
            "expiration_timestamp",
        )
    }

    /// Validate and pack the numeric fields into one field element.
    ///
    /// Shares the limit order layout: the receiving vault takes the
    /// `vault_buy` slot and the `amount_buy` slot is zero.
    pub fn packed_message(&self) -> Result<FieldElement> {
        self.validate()?;

        Ok(pack(
            TRANSFER_TYPE,
            &[
                (self.sender_vault_id.into(), VAULT_ID_BITS),
                (self.receiver_vault_id.into(), VAULT_ID_BITS),
                (self.amount, AMOUNT_BITS),
                (0, AMOUNT_BITS),
                (self.nonce.into(), NONCE_BITS),
                (self.expiration_timestamp.into(), EXPIRATION_TIMESTAMP_BITS),
            ],
        ))
    }

    /// Compute the digest to be signed.
    pub fn hash(&self, hasher: &PedersenHasher<'_>) -> Result<FieldElement> {
        let packed = self.packed_message()?;
        let tokens = hasher.hash_pair(&self.token, &self.receiver_public_key)?;
        hasher.hash_pair(&tokens, &packed)
    }
}

/// Either kind of signable instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Instruction {
    /// Limit order.
    LimitOrder(LimitOrder),
    /// Transfer.
    Transfer(Transfer),
}

impl Instruction {
    /// Check every numeric field against its bit width.
    pub fn validate(&self) -> Result<()> {
        match self {
            Instruction::LimitOrder(order) => order.validate(),
            Instruction::Transfer(transfer) => transfer.validate(),
        }
    }

    /// Validate and pack the numeric fields into one field element.
    pub fn packed_message(&self) -> Result<FieldElement> {
        match self {
            Instruction::LimitOrder(order) => order.packed_message(),
            Instruction::Transfer(transfer) => transfer.packed_message(),
        }
    }

    /// Compute the digest to be signed.
    pub fn hash(&self, hasher: &PedersenHasher<'_>) -> Result<FieldElement> {
        match self {
            Instruction::LimitOrder(order) => order.hash(hasher),
            Instruction::Transfer(transfer) => transfer.hash(hasher),
        }
    }
}

impl From<LimitOrder> for Instruction {
    fn from(order: LimitOrder) -> Instruction {
        Instruction::LimitOrder(order)
    }
}

impl From<Transfer> for Instruction {
    fn from(transfer: Transfer) -> Instruction {
        Instruction::Transfer(transfer)
    }
}

/// Parse a decimal amount, rejecting values wider than [`AMOUNT_BITS`].
pub fn parse_amount(digits: &str, field: &'static str) -> Result<u64> {
    let uint = parse_decimal_digits(digits)?.ok_or(Error::RangeViolation { field })?;

    if uint.bits_vartime() > AMOUNT_BITS {
        return Err(Error::RangeViolation { field });
    }

    let bytes = uint.to_be_bytes();
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[bytes.len() - 8..]);
    Ok(u64::from_be_bytes(low))
}

/// Parse a `0x`-prefixed hex field element such as a token id or stark key.
pub fn parse_field_element(hex: &str, field: &'static str) -> Result<FieldElement> {
    FieldElement::from_prefixed_hex(hex).map_err(|err| match err {
        Error::NotInField => Error::RangeViolation { field },
        other => other,
    })
}

/// Compute the digest of a limit order from its textual fields.
///
/// Amounts are decimal strings, tokens `0x`-prefixed hex. The token prefixes
/// are checked before anything else is parsed. Returns the digest as
/// lowercase hex without leading zeros.
#[cfg(all(feature = "alloc", feature = "global-table"))]
#[allow(clippy::too_many_arguments)]
pub fn get_limit_order_msg(
    vault_sell: u32,
    vault_buy: u32,
    amount_sell: &str,
    amount_buy: &str,
    token_sell: &str,
    token_buy: &str,
    nonce: u32,
    expiration_timestamp: u32,
) -> Result<String> {
    for hex in [token_sell, token_buy] {
        crate::arithmetic::strip_hex_prefix(hex)?;
    }

    let order = LimitOrder {
        vault_sell,
        vault_buy,
        amount_sell: parse_amount(amount_sell, "amount_sell")?,
        amount_buy: parse_amount(amount_buy, "amount_buy")?,
        token_sell: parse_field_element(token_sell, "token_sell")?,
        token_buy: parse_field_element(token_buy, "token_buy")?,
        nonce,
        expiration_timestamp,
    };

    let digest = order.hash(&PedersenHasher::default())?;
    Ok(format!("{digest:x}"))
}

/// Compute the digest of a transfer from its textual fields.
///
/// The amount is a decimal string, token and receiver key `0x`-prefixed hex.
/// The prefixes are checked before anything else is parsed. Returns the
/// digest as lowercase hex without leading zeros.
#[cfg(all(feature = "alloc", feature = "global-table"))]
pub fn get_transfer_msg(
    amount: &str,
    nonce: u32,
    sender_vault_id: u32,
    token: &str,
    receiver_vault_id: u32,
    receiver_public_key: &str,
    expiration_timestamp: u32,
) -> Result<String> {
    for hex in [token, receiver_public_key] {
        crate::arithmetic::strip_hex_prefix(hex)?;
    }

    let transfer = Transfer {
        amount: parse_amount(amount, "amount")?,
        nonce,
        sender_vault_id,
        token: parse_field_element(token, "token")?,
        receiver_vault_id,
        receiver_public_key: parse_field_element(receiver_public_key, "receiver_public_key")?,
        expiration_timestamp,
    };

    let digest = transfer.hash(&PedersenHasher::default())?;
    Ok(format!("{digest:x}"))
}

fn check_bits(value: u64, bits: usize, field: &'static str) -> Result<()> {
    if value >> bits == 0 {
        Ok(())
    } else {
        Err(Error::RangeViolation { field })
    }
}

/// Fold `(value, width)` pairs into `acc = (acc << width) + value`, starting
/// from the instruction type.
fn pack(instruction_type: u64, fields: &[(u64, usize)]) -> FieldElement {
    let packed = fields.iter().fold(U256::from_u64(instruction_type), |acc, &(value, width)| {
        acc.shl_vartime(width).wrapping_add(&U256::from_u64(value))
    });

    FieldElement::from_uint_reduced(&packed)
}
