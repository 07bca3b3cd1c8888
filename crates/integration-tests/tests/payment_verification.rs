//! Tests for payment callback signature verification.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 under the
//! key secret; these tests build known-good signatures independently and
//! check that verification accepts them and rejects every single-field
//! mutation.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use mandi_api::services::razorpay::verify_payment_signature;

const SECRET: &str = "test_razorpay_secret";

fn sign(order_id: &str, payment_id: &str, secret: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn valid_signature_verifies() {
    let sig = sign("order_N5kX2x", "pay_N5kY9z", SECRET);
    assert!(verify_payment_signature(
        "order_N5kX2x",
        "pay_N5kY9z",
        &sig,
        SECRET
    ));
}

#[test]
fn any_field_mutation_fails_verification() {
    let sig = sign("order_N5kX2x", "pay_N5kY9z", SECRET);

    assert!(!verify_payment_signature("order_OTHER", "pay_N5kY9z", &sig, SECRET));
    assert!(!verify_payment_signature("order_N5kX2x", "pay_OTHER", &sig, SECRET));
    assert!(!verify_payment_signature("order_N5kX2x", "pay_N5kY9z", &sig, "other_secret"));
}

#[test]
fn flipping_one_signature_character_fails_verification() {
    let sig = sign("order_N5kX2x", "pay_N5kY9z", SECRET);

    let mut chars: Vec<char> = sig.chars().collect();
    chars[0] = if chars[0] == 'a' { 'b' } else { 'a' };
    let tampered: String = chars.into_iter().collect();

    assert!(!verify_payment_signature(
        "order_N5kX2x",
        "pay_N5kY9z",
        &tampered,
        SECRET
    ));
}

#[test]
fn swapped_order_and_payment_ids_fail_verification() {
    // The pipe separator means the pair is ordered; swapping must not verify.
    let sig = sign("order_N5kX2x", "pay_N5kY9z", SECRET);
    assert!(!verify_payment_signature(
        "pay_N5kY9z",
        "order_N5kX2x",
        &sig,
        SECRET
    ));
}

#[test]
fn empty_signature_fails_verification() {
    assert!(!verify_payment_signature("order_N5kX2x", "pay_N5kY9z", "", SECRET));
}
