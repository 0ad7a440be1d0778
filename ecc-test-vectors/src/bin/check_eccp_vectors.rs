//! Diagnostic check that every embedded Certicom ECCp fixture is internally
//! consistent: the modulus has the claimed bit width, the curve is
//! non-singular, the base point satisfies the curve equation, and a keypair
//! derived from the fixture's private key round-trips through sign/verify.
//!
//! Run with: cargo run --bin check_eccp_vectors
//!
//! This is a fixture sanity check, not a CLI contract: `ecc-pure` itself has
//! no notion of curve-parameter parsing or example programs, so this binary
//! lives here rather than in the core crate.

use ecc_pure::{Curve, Ecdsa, Field};
use ecc_test_vectors::{ALL, EccpFixture};
use rand::rngs::OsRng;
use std::process;

fn main() {
    let mut failures = 0;
    for fixture in ALL {
        if let Err(message) = check(fixture) {
            eprintln!("FAIL eccp-{}: {message}", fixture.bits);
            failures += 1;
        } else {
            println!("ok   eccp-{}", fixture.bits);
        }
    }
    if failures > 0 {
        process::exit(1);
    }
}

fn check(fixture: &EccpFixture) -> Result<(), String> {
    let field = Field::from_hex(fixture.p).map_err(|e| format!("parsing p: {e}"))?;
    if field.modulus_bits() != fixture.bits as usize {
        return Err(format!(
            "modulus has {} bits, fixture claims {}",
            field.modulus_bits(),
            fixture.bits
        ));
    }

    let a = field.element_from_hex(fixture.a).map_err(|e| format!("parsing a: {e}"))?;
    let b = field.element_from_hex(fixture.b).map_err(|e| format!("parsing b: {e}"))?;
    let curve = Curve::new(field.clone(), a, b).map_err(|e| format!("constructing curve: {e}"))?;

    let base_x = field
        .element_from_hex(fixture.base_x)
        .map_err(|e| format!("parsing base_x: {e}"))?;
    let base_y = field
        .element_from_hex(fixture.base_y)
        .map_err(|e| format!("parsing base_y: {e}"))?;
    let base_point = curve
        .point(base_x, base_y)
        .map_err(|e| format!("base point off curve: {e}"))?;

    let private_key = field
        .element_from_hex(fixture.private_key)
        .map_err(|e| format!("parsing private key: {e}"))?;

    let ecdsa = Ecdsa::new(field.clone(), curve, base_point);
    let public_key = ecdsa.derive_public_key(&private_key);
    if public_key.is_infinity() {
        return Err("derived public key is the point at infinity".to_string());
    }

    let message = field.element_from_hex("deadbeef").expect("literal hex is valid");
    let mut rng = OsRng;
    let signature = ecdsa.sign(&message, &private_key, &mut rng);
    if !ecdsa.verify(&public_key, &message, &signature) {
        return Err("sign/verify round trip failed".to_string());
    }

    let tampered = message.add(&field.one());
    if ecdsa.verify(&public_key, &tampered, &signature) {
        return Err("verify accepted a tampered message".to_string());
    }

    Ok(())
}
