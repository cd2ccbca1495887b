//! Limit order and transfer digest tests.

#![cfg(all(feature = "alloc", feature = "global-table"))]

use stark_curve::{
    get_limit_order_msg, get_transfer_msg, message::parse_field_element, Error, FieldElement,
    Instruction, LimitOrder, PedersenHasher, Transfer,
};

const TOKEN_SELL: &str = "0x5fa3383597691ea9d827a79e1a4f0f7989c35ced18ca9619de8ab97e661020";
const TOKEN_BUY: &str = "0x774961c824a3b0fb3d2965f01471c9c7734bf8dbde659e0c08dca2ef18d56a";
const TRANSFER_TOKEN: &str = "0x3003a65651d3b9fb2eff934a4416db301afd112a8492aaf8d7297fc87dcd9f4";

fn limit_order() -> LimitOrder {
    LimitOrder {
        vault_sell: 21,
        vault_buy: 27,
        amount_sell: 2_154_686_749_748_910_716,
        amount_buy: 1_470_242_115_489_520_459,
        token_sell: parse_field_element(TOKEN_SELL, "token_sell").unwrap(),
        token_buy: parse_field_element(TOKEN_BUY, "token_buy").unwrap(),
        nonce: 0,
        expiration_timestamp: 438_953,
    }
}

#[test]
fn limit_order_digest() {
    let digest = get_limit_order_msg(
        21,
        27,
        "2154686749748910716",
        "1470242115489520459",
        TOKEN_SELL,
        TOKEN_BUY,
        0,
        438_953,
    )
    .unwrap();
    assert_eq!(
        digest,
        "397e76d1667c4454bfb83514e120583af836f8e32a516765497823eabe16a3f"
    );

    let hasher = PedersenHasher::default();
    assert_eq!(
        format!("{:x}", limit_order().hash(&hasher).unwrap()),
        digest
    );
    assert_eq!(
        format!("{:x}", Instruction::from(limit_order()).hash(&hasher).unwrap()),
        digest
    );
}

#[test]
fn transfer_digest() {
    let digest = get_transfer_msg(
        "2154549703648910716",
        1,
        34,
        TRANSFER_TOKEN,
        21,
        TOKEN_SELL,
        438_953,
    )
    .unwrap();
    assert_eq!(
        digest,
        "20703ebcadb328f077e9a072eeb61a57a8dfca790f5c93feb1b5146a28c52f8"
    );
}

#[test]
fn transfer_hash_pairs_token_with_receiver_key() {
    let transfer = Transfer {
        amount: 2_154_549_703_648_910_716,
        nonce: 1,
        sender_vault_id: 34,
        token: parse_field_element(TRANSFER_TOKEN, "token").unwrap(),
        receiver_vault_id: 21,
        receiver_public_key: parse_field_element(TOKEN_SELL, "receiver_public_key").unwrap(),
        expiration_timestamp: 438_953,
    };

    let hasher = PedersenHasher::default();
    let inner = hasher
        .hash_pair(&transfer.token, &transfer.receiver_public_key)
        .unwrap();
    let expected = hasher
        .hash_pair(&inner, &transfer.packed_message().unwrap())
        .unwrap();

    assert_eq!(transfer.hash(&hasher), Ok(expected));
}

#[test]
fn range_violations_name_the_field() {
    assert_eq!(
        get_limit_order_msg(1 << 31, 27, "1", "1", TOKEN_SELL, TOKEN_BUY, 0, 0),
        Err(Error::RangeViolation { field: "vault_sell" })
    );
    assert_eq!(
        get_limit_order_msg(21, 27, "9223372036854775808", "1", TOKEN_SELL, TOKEN_BUY, 0, 0),
        Err(Error::RangeViolation { field: "amount_sell" })
    );
    assert_eq!(
        get_limit_order_msg(21, 27, "1", "1", TOKEN_SELL, TOKEN_BUY, 0, 1 << 22),
        Err(Error::RangeViolation { field: "expiration_timestamp" })
    );
    assert_eq!(
        get_transfer_msg("1", 1 << 31, 34, TRANSFER_TOKEN, 21, TOKEN_SELL, 0),
        Err(Error::RangeViolation { field: "nonce" })
    );
    assert_eq!(
        get_transfer_msg(
            "1",
            1,
            34,
            TRANSFER_TOKEN,
            21,
            "0x800000000000011000000000000000000000000000000000000000000000001",
            0
        ),
        Err(Error::RangeViolation { field: "receiver_public_key" })
    );
}

#[test]
fn malformed_strings() {
    assert_eq!(
        get_limit_order_msg(21, 27, "1", "1", &TOKEN_SELL[2..], TOKEN_BUY, 0, 0),
        Err(Error::MissingHexPrefix)
    );
    assert_eq!(
        get_limit_order_msg(21, 27, "-1", "1", TOKEN_SELL, TOKEN_BUY, 0, 0),
        Err(Error::InvalidInput)
    );
    assert_eq!(
        get_transfer_msg("", 1, 34, TRANSFER_TOKEN, 21, TOKEN_SELL, 0),
        Err(Error::InvalidInput)
    );
}

#[test]
fn hex_prefixes_are_checked_before_amounts() {
    assert_eq!(
        get_limit_order_msg(21, 27, "-1", "1", TOKEN_SELL, &TOKEN_BUY[2..], 0, 0),
        Err(Error::MissingHexPrefix)
    );
    assert_eq!(
        get_limit_order_msg(
            21,
            27,
            "1",
            "9223372036854775808",
            &TOKEN_SELL[2..],
            TOKEN_BUY,
            0,
            0
        ),
        Err(Error::MissingHexPrefix)
    );
    assert_eq!(
        get_transfer_msg("", 1, 34, TRANSFER_TOKEN, 21, &TOKEN_SELL[2..], 0),
        Err(Error::MissingHexPrefix)
    );
    assert_eq!(
        get_transfer_msg("x", 1, 34, &TRANSFER_TOKEN[2..], 21, TOKEN_SELL, 0),
        Err(Error::MissingHexPrefix)
    );
}

#[test]
fn boundary_values_are_accepted() {
    let order = LimitOrder {
        vault_sell: (1 << 31) - 1,
        vault_buy: (1 << 31) - 1,
        amount_sell: (1 << 63) - 1,
        amount_buy: (1 << 63) - 1,
        token_sell: FieldElement::ONE,
        token_buy: FieldElement::ONE,
        nonce: (1 << 31) - 1,
        expiration_timestamp: (1 << 22) - 1,
    };

    assert_eq!(order.validate(), Ok(()));
    assert!(order.hash(&PedersenHasher::default()).is_ok());
}
