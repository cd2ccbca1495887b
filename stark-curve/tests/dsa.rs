//! ECDSA tests.

#![cfg(all(feature = "dsa", feature = "alloc", feature = "global-table"))]

use hex_literal::hex;
use proptest::prelude::*;
use stark_curve::{
    dsa::{
        signature::hazmat::{PrehashSigner, PrehashVerifier},
        Signature, SigningKey, VerifyingKey,
    },
    fix_message, get_limit_order_msg, sign, verify, AffinePoint, Error, FieldElement, Scalar,
};

const PRIVATE_KEY: &str = "2dccce1da22003777062ee0870e9881b460a8b7eca276870f57c601f182136c";

const PUBLIC_KEY_X: &str = "499f65ae2f71d5298d2d88823b2e5e19596a71aac1984710479e406a002439";
const PUBLIC_KEY_Y: &str = "4745865467631492cf6ecc433a3cf4ecc580d698097d6b738ad8f3da7c4d66c";

/// (digest, r, w, s) for [`PRIVATE_KEY`]. The `s` column is empty where only
/// `w` is published.
const SIGNATURES: &[(&str, &str, &str, &str)] = &[
    (
        "c465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a47",
        "5f496f6f210b5810b2711c74c15c05244dad43d18ecbbdbe6ed55584bc3b0a2",
        "777aa1a010e06e0eae0162c8121778d863f393a64f33fbc806c33140144af8b",
        "4e8657b153787f741a67c0666bad6426c3741b478c8eaa3155196fc571416f3",
    ),
    (
        "00c465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a47",
        "5f496f6f210b5810b2711c74c15c05244dad43d18ecbbdbe6ed55584bc3b0a2",
        "777aa1a010e06e0eae0162c8121778d863f393a64f33fbc806c33140144af8b",
        "4e8657b153787f741a67c0666bad6426c3741b478c8eaa3155196fc571416f3",
    ),
    (
        "c465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a47a",
        "233b88c4578f0807b4a7480c8076eca5cfefa29980dd8e2af3c46a253490e9c",
        "522ced67a42c09b6bfd74cfc16c11c49d63d79c7e81ae84ee89ff870218c919",
        "",
    ),
    (
        "7465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a47a1",
        "b6bee8010f96a723f6de06b5fa06e820418712439c93850dd4e9bde43ddf",
        "1a42d3f507da55c0347818fced04f33e4b78ee6c5b81c777215471b7104ef01",
        "1a3d2bc954ed77e22986f507d68d18115fa543d1901f5b4620db98e2f6efd80",
    ),
];

fn hex_of(scalar: Scalar) -> String {
    format!("{scalar:x}")
}

fn verifying_key() -> VerifyingKey {
    let point = AffinePoint::from_coordinates(
        FieldElement::from_hex_digits(PUBLIC_KEY_X).unwrap(),
        FieldElement::from_hex_digits(PUBLIC_KEY_Y).unwrap(),
    )
    .unwrap();
    VerifyingKey::from_affine(point).unwrap()
}

#[test]
fn public_key_derivation() {
    let signing_key = SigningKey::from_hex(PRIVATE_KEY).unwrap();
    assert_eq!(signing_key.verifying_key(), &verifying_key());
    assert_eq!(
        format!("{:x}", signing_key.verifying_key().stark_key()),
        PUBLIC_KEY_X
    );
}

#[test]
fn signing_vectors() {
    for &(digest, r, w, s) in SIGNATURES {
        let signature = sign(PRIVATE_KEY, digest).unwrap();
        assert_eq!(hex_of(signature.r()), r, "r for {digest}");
        assert_eq!(hex_of(signature.w()), w, "w for {digest}");

        if !s.is_empty() {
            assert_eq!(hex_of(signature.s()), s, "s for {digest}");
        }

        assert_eq!(verify(&verifying_key(), digest, &signature), Ok(true));
    }
}

#[test]
fn signing_under_trace_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let (digest, r, _, _) = SIGNATURES[3];
        let signature = sign(PRIVATE_KEY, digest).unwrap();
        assert_eq!(hex_of(signature.r()), r);
    });
}

#[test]
fn signing_is_deterministic() {
    let digest = SIGNATURES[0].0;
    assert_eq!(sign(PRIVATE_KEY, digest), sign(PRIVATE_KEY, digest));
}

#[test]
fn verify_parsed_signature() {
    let (digest, r, _, s) = SIGNATURES[3];
    let signature = Signature::from_hex(r, s).unwrap();
    assert_eq!(verify(&verifying_key(), digest, &signature), Ok(true));
}

#[test]
fn tampered_inputs_fail() {
    let (digest, r, _, s) = SIGNATURES[0];
    let signature = Signature::from_hex(r, s).unwrap();
    let key = verifying_key();

    assert_eq!(
        verify(&key, "c465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a48", &signature),
        Ok(false)
    );

    let other_r = Signature::from_scalars(signature.r() + Scalar::ONE, signature.s()).unwrap();
    assert_eq!(verify(&key, digest, &other_r), Ok(false));

    let other_key = VerifyingKey::from_affine(AffinePoint::GENERATOR).unwrap();
    assert_eq!(verify(&other_key, digest, &signature), Ok(false));
}

#[test]
fn rejects_oversized_digests() {
    let digest = "17465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a47a1";
    assert_eq!(
        sign(PRIVATE_KEY, digest),
        Err(Error::InvalidDigestLength { len: 64 })
    );

    let (_, r, _, s) = SIGNATURES[0];
    let signature = Signature::from_hex(r, s).unwrap();
    assert_eq!(
        verify(&verifying_key(), digest, &signature),
        Err(Error::InvalidDigestLength { len: 64 })
    );
}

#[test]
fn rejects_invalid_keys() {
    assert_eq!(sign("0", SIGNATURES[0].0), Err(Error::InvalidKey));
    assert_eq!(
        sign("800000000000010ffffffffffffffffb781126dcae7b2321e66a241adc64d2f", SIGNATURES[0].0),
        Err(Error::InvalidKey)
    );
    assert_eq!(sign("not hex", SIGNATURES[0].0), Err(Error::InvalidInput));
}

#[test]
fn fix_message_pads_63_digits() {
    assert_eq!(fix_message(SIGNATURES[0].0).unwrap(), SIGNATURES[0].0);
    assert_eq!(
        fix_message(SIGNATURES[3].0).unwrap(),
        format!("{}0", SIGNATURES[3].0)
    );
}

/// Sign a limit order digest and check it against values produced by the
/// StarkEx tooling.
#[test]
fn limit_order_settlement() {
    let digest = get_limit_order_msg(
        21,
        27,
        "2154686749748910716",
        "1470242115489520459",
        "0x5fa3383597691ea9d827a79e1a4f0f7989c35ced18ca9619de8ab97e661020",
        "0x774961c824a3b0fb3d2965f01471c9c7734bf8dbde659e0c08dca2ef18d56a",
        0,
        438_953,
    )
    .unwrap();

    let signing_key =
        SigningKey::from_hex("3c1e9550e66958296d11b60f8e8e7a7ad990d07fa65d5f7652c4a6c87d4e3cc")
            .unwrap();
    let public_key = signing_key.verifying_key().as_affine();
    assert_eq!(
        format!("{:x}", public_key.x()),
        "77a3b314db07c45076d11f62b6f9e748a39790441823307743cf00d6597ea43"
    );
    assert_eq!(
        format!("{:x}", public_key.y()),
        "54d7beec5ec728223671c627557efc5c9a6508425dc6c900b7741bf60afec06"
    );

    let signature = signing_key.sign_hex(&digest).unwrap();
    assert_eq!(
        hex_of(signature.r()),
        "173fd03d8b008ee7432977ac27d1e9d1a1f6c98b1a2f05fa84a21c84c44e882"
    );
    assert_eq!(
        hex_of(signature.w()),
        "1f2c44a7798f55192f153b4c48ea5c1241fbb69e6132cc8a0da9c5b62a4286e"
    );
    assert_eq!(
        hex_of(signature.s()),
        "4b6d75385aed025aa222f28a0adc6d58db78ff17e51c3f59e259b131cd5a1cc"
    );
    assert_eq!(signing_key.verifying_key().verify_hex(&digest, &signature), Ok(true));
}

#[test]
fn prehash_traits() {
    let signing_key = SigningKey::from_hex(PRIVATE_KEY).unwrap();
    let prehash = hex!("0c465dd6b1bbffdb05442eb17f5ca38ad1aa78a6f56bf4415bdee219114a47");

    let signature: Signature = signing_key.sign_prehash(&prehash).unwrap();
    assert_eq!(signature, sign(PRIVATE_KEY, SIGNATURES[0].0).unwrap());
    assert!(verifying_key().verify_prehash(&prehash, &signature).is_ok());
    assert!(verifying_key().verify_prehash(&[1, 2, 3], &signature).is_err());
    assert!(signing_key.sign_prehash(&[0u8; 33]).is_err());
}

#[test]
fn sec1_public_key_round_trip() {
    let key = verifying_key();
    let bytes = key.to_sec1_bytes();
    assert_eq!(bytes.len(), 33);
    assert_eq!(VerifyingKey::from_sec1_bytes(&bytes), Ok(key));
    assert_eq!(
        VerifyingKey::from_encoded_point(&key.to_encoded_point(false)),
        Ok(key)
    );
}

prop_compose! {
    fn signing_key()(bytes in any::<[u8; 32]>()) -> SigningKey {
        let mut bytes = bytes;
        bytes[0] &= 0x07;
        bytes[31] |= 0x01;
        SigningKey::from_slice(&bytes).unwrap()
    }
}

prop_compose! {
    fn digest()(bytes in any::<[u8; 31]>()) -> String {
        bytes.iter().map(|byte| format!("{byte:02x}")).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn sign_and_verify(sk in signing_key(), digest in digest()) {
        let signature = sk.sign_hex(&digest).unwrap();
        prop_assert_eq!(sk.verifying_key().verify_hex(&digest, &signature), Ok(true));
    }

    #[test]
    fn reject_invalid_signature(
        sk in signing_key(),
        digest in digest(),
        half in 0usize..2,
        byte in 0usize..32,
        bit in 0usize..8,
    ) {
        let mut signature_bytes = sk.sign_hex(&digest).unwrap().to_bytes();

        // flip a bit of r or s below its most significant byte
        let shifted_byte = half * 32 + byte.max(1);
        signature_bytes[shifted_byte] ^= 1 << bit;

        if let Ok(signature) = Signature::from_bytes(&signature_bytes) {
            prop_assert_eq!(sk.verifying_key().verify_hex(&digest, &signature), Ok(false));
        }
    }
}
