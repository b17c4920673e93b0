//! Property-style tests for fingerprints and signatures.

use std::collections::HashSet;

use signet::crypto::{fingerprint, hash_and_sign, sign, verify};

use crate::helpers::*;

#[test]
fn test_fingerprint_is_deterministic() {
    for email in distinct_emails(50) {
        assert_eq!(fingerprint(&email), fingerprint(&email));
    }
    assert_eq!(fingerprint(""), fingerprint(""));
    assert_eq!(fingerprint("ünïcødé@x.com"), fingerprint("ünïcødé@x.com"));
}

#[test]
fn test_fingerprint_is_sensitive() {
    let emails = distinct_emails(2000);
    let fingerprints: HashSet<String> = emails.iter().map(|e| fingerprint(e)).collect();
    assert_eq!(fingerprints.len(), emails.len());
}

#[test]
fn test_sign_verify_many_fingerprints() {
    let private_key = test_private_key();
    let public_key = private_key.public_key();
    for email in distinct_emails(20) {
        let fp = fingerprint(&email);
        let sig = sign(&fp, private_key).unwrap();
        assert!(verify(&fp, &sig, &public_key), "failed for {email}");
    }
}

#[test]
fn test_any_flipped_character_fails() {
    let seal = hash_and_sign("tamper@x.com", test_private_key()).unwrap();
    let public_key = test_keystore().public_key().clone();

    // Every position, flipped to a different hex digit
    for i in 0..seal.signature.len() {
        let mut chars: Vec<char> = seal.signature.chars().collect();
        chars[i] = if chars[i] == '0' { '1' } else { '0' };
        let tampered: String = chars.into_iter().collect();
        assert!(
            !verify(&seal.fingerprint, &tampered, &public_key),
            "tampered signature accepted at position {i}"
        );
    }
}

#[test]
fn test_wrong_key_rejected() {
    let seal = hash_and_sign("a@x.com", test_private_key()).unwrap();
    assert!(verify(&seal.fingerprint, &seal.signature, test_keystore().public_key()));
    assert!(!verify(
        &seal.fingerprint,
        &seal.signature,
        other_keystore().public_key()
    ));
}

#[test]
fn test_truncated_and_padded_signatures_fail() {
    let seal = hash_and_sign("len@x.com", test_private_key()).unwrap();
    let public_key = test_keystore().public_key().clone();
    assert!(!verify(&seal.fingerprint, &seal.signature[..510], &public_key));
    assert!(!verify(&seal.fingerprint, &format!("{}00", seal.signature), &public_key));
    assert!(!verify(&seal.fingerprint, &format!("{}0", seal.signature), &public_key));
}
