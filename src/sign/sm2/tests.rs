use super::*;
use crate::ec::{CurveParams, Point, U256};
use crate::error::Error;
use crate::sign::{ExchangeRole, FixedScalar, Signature, SignatureEngine};
use rand::rngs::OsRng;

fn scalar(hex: &str) -> U256 {
    U256::from_be_hex(hex).unwrap()
}

#[test]
fn standard_curve_known_signature() {
    let signer = Sm2Signer::new(
        &hex::decode("3945208F7B2144B13F36E38AC6D39F95889393692860B51A42FB81EF4DF7C5B8")
            .unwrap(),
        DEFAULT_ID,
    )
    .unwrap();

    let mut nonces = FixedScalar::new(&[scalar(
        "59276E27D506861A16680F3AD9C02DCCEF3CC1FA3CDBE4CE6D54B80DEAC1BC21",
    )]);
    let sig = signer.sign(b"message digest", &mut nonces).unwrap();

    assert_eq!(
        sig.r(),
        &scalar("F5A03B0648D2C4630EEAC513E1BB81A15944DA3827D5B74143AC7EACEEE720B3")
    );
    assert_eq!(
        sig.s(),
        &scalar("B1B6AA29DF212FD8763182BC0D421CA1BB9038FD1F7F42D4840B69C485BBC1AA")
    );

    let verifier = Sm2Verifier::new(*signer.public_key(), DEFAULT_ID).unwrap();
    assert!(verifier.verify(b"message digest", &sig).unwrap());
}

// 256-bit example curve used by the published signature, encryption and
// key exchange test vectors.
fn alternate_curve() -> CurveParams {
    CurveParams {
        p: U256::from_limbs([
            0x722EDB8B08F1DFC3,
            0x457283915C45517D,
            0xE8B92435BF6FF7DE,
            0x8542D69E4C044F18,
        ]),
        a: U256::from_limbs([
            0xEC65228B3937E498,
            0x2F3C848B6831D7E0,
            0x2417842E73BBFEFF,
            0x787968B4FA32C3FD,
        ]),
        b: U256::from_limbs([
            0x6E12D1DA27C5249A,
            0xF61D59A5B16BA06E,
            0x9CF84241484BFE48,
            0x63E4C6D3B23B0C84,
        ]),
        n: U256::from_limbs([
            0x5AE74EE7C32E79B7,
            0x297720630485628D,
            0xE8B92435BF6FF7DD,
            0x8542D69E4C044F18,
        ]),
        gx: U256::from_limbs([
            0x4C4E6C147FEDD43D,
            0x32220B3BADD50BDC,
            0x746434EBC3CC315E,
            0x421DEBD61B62EAB6,
        ]),
        gy: U256::from_limbs([
            0xA85841B9E46E09A2,
            0xE5D7FDFCBFA36EA1,
            0xD47349D2153B70C4,
            0x0680512BCBB42C07,
        ]),
    }
}

#[test]
fn alternate_curve_known_signature() {
    let engine: SignatureEngine<crate::hash::Sm3> = SignatureEngine::new(alternate_curve());

    let d = scalar("128B2FA8BD433C6C068C8D803DFF79792A519A55171B1B650C23661D15897263");
    let public = Point::new(
        scalar("0AE4C7798AA0F119471BEE11825BE46202BB79E2A5844495E97C04FF4DF2548A"),
        scalar("7C0240F88F1CD4E16352A73C17B7F16F07353E53A176D684A9FE0C6BB798E857"),
    );
    assert_eq!(
        engine
            .curve()
            .scalar_mul(&d, &engine.curve().generator())
            .unwrap(),
        public
    );

    let id = b"ALICE123@YAHOO.COM";
    let z = engine.compute_z(id, &public).unwrap();
    let mut nonces = FixedScalar::new(&[scalar(
        "6CB28D99385C175C94F94E934817663FC176D925DD72B727260DBAAE1FB2F96F",
    )]);
    let sig = engine.sign(b"message digest", &d, &z, &mut nonces).unwrap();

    assert_eq!(
        sig.r(),
        &scalar("40F1EC59F793D9F49E09DCEF49130D4194F79FB1EED2CAA55BACDB49C4E755D1")
    );
    assert_eq!(
        sig.s(),
        &scalar("6FC6DAC32C5D5CF10C77DFB20F7C2EB667A457872FB09EC56327A67EC7DEEBE7")
    );
    assert!(engine.verify(b"message digest", &sig, &public, &z).unwrap());
}

#[test]
fn sign_verify_roundtrip_random_key() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let z = engine.compute_z(DEFAULT_ID, &public).unwrap();

    let msg = b"sample message for roundtrip";
    let sig = engine.sign(msg, &d, &z, &mut OsRng).unwrap();
    assert!(engine.verify(msg, &sig, &public, &z).unwrap());
}

#[test]
fn tampered_message_rejected() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let z = engine.compute_z(DEFAULT_ID, &public).unwrap();

    let sig = engine.sign(b"original", &d, &z, &mut OsRng).unwrap();
    assert!(!engine.verify(b"0riginal", &sig, &public, &z).unwrap());
}

#[test]
fn tampered_signature_rejected() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let z = engine.compute_z(DEFAULT_ID, &public).unwrap();

    let msg = b"message";
    let sig = engine.sign(msg, &d, &z, &mut OsRng).unwrap();

    let mut bytes = sig.to_bytes();
    bytes[40] ^= 0x01;
    let forged = Signature::from_bytes(&bytes).unwrap();
    assert!(!engine.verify(msg, &forged, &public, &z).unwrap());
}

#[test]
fn wrong_identity_rejected() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let z = engine.compute_z(DEFAULT_ID, &public).unwrap();

    let msg = b"message";
    let sig = engine.sign(msg, &d, &z, &mut OsRng).unwrap();

    let other_z = engine.compute_z(b"someone else", &public).unwrap();
    assert!(!engine.verify(msg, &sig, &public, &other_z).unwrap());
}

#[test]
fn out_of_range_components_rejected_without_error() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let z = engine.compute_z(DEFAULT_ID, &public).unwrap();

    let msg = b"message";
    let sig = engine.sign(msg, &d, &z, &mut OsRng).unwrap();

    let zero = Signature::new(U256::ZERO, *sig.s());
    assert!(!engine.verify(msg, &zero, &public, &z).unwrap());

    let over = Signature::new(*sig.r(), engine.curve().n);
    assert!(!engine.verify(msg, &over, &public, &z).unwrap());
}

#[test]
fn signature_byte_roundtrip() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let z = engine.compute_z(DEFAULT_ID, &public).unwrap();

    let sig = engine.sign(b"bytes", &d, &z, &mut OsRng).unwrap();
    let decoded = Signature::from_bytes(&sig.to_bytes()).unwrap();
    assert_eq!(sig, decoded);

    assert!(matches!(
        Signature::from_bytes(&[0u8; 63]),
        Err(Error::Length { .. })
    ));
}

#[test]
fn signer_rejects_out_of_range_key() {
    assert!(matches!(
        Sm2Signer::new(&[0u8; 32], DEFAULT_ID),
        Err(Error::Range { .. })
    ));
    assert!(matches!(
        Sm2Signer::new(&[0xFFu8; 32], DEFAULT_ID),
        Err(Error::Range { .. })
    ));
}

#[test]
fn verifier_rejects_off_curve_point() {
    let (_, public) = generate_keypair(&mut OsRng).unwrap();
    let mut bytes = public.to_bytes();
    bytes[5] ^= 0x40;
    assert!(matches!(
        Sm2Verifier::from_bytes(&bytes, DEFAULT_ID),
        Err(Error::Point { .. })
    ));
}

#[test]
fn oversized_identity_rejected() {
    let (_, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let id = vec![0u8; 8192];
    assert!(matches!(
        engine.compute_z(&id, &public),
        Err(Error::Parameter { .. })
    ));
}

#[test]
fn alternate_curve_known_ciphertext() {
    let engine: SignatureEngine<crate::hash::Sm3> = SignatureEngine::new(alternate_curve());

    let d = scalar("1649AB77A00637BD5E2EFE283FBF353534AA7F7CB89463F208DDBC2920BB0DA0");
    let public = engine
        .curve()
        .scalar_mul(&d, &engine.curve().generator())
        .unwrap();
    assert_eq!(
        public.x(),
        &scalar("435B39CCA8F3B508C1488AFC67BE491A0F7BA07E581A0E4849A5CF70628A7E0A")
    );

    let mut nonces = FixedScalar::new(&[scalar(
        "4C62EEFD6ECFC2B95B92FD6C3D9575148AFA17425546D49018E5388D49DD7B4F",
    )]);
    let ciphertext = engine
        .encrypt(b"encryption standard", &public, &mut nonces)
        .unwrap();

    // Layout: ephemeral point, digest, masked message
    let expected = concat!(
        "245c26fb68b1ddddb12c4b6bf9f2b6d5fe60a383b0d18d1c4144abf17f6252e7",
        "76cb9264c2a7e88e52b19903fdc47378f605e36811f5c07423a24b84400f01b8",
        "9c3d7360c30156fab7c80a0276712da9d8094a634b766d3a285e07480653426d",
        "650053a89b41c418b0c3aad00d886c00286467",
    );
    assert_eq!(hex::encode(&ciphertext), expected);

    let plain = engine.decrypt(&ciphertext, &d).unwrap();
    assert_eq!(plain, b"encryption standard");
}

#[test]
fn alternate_curve_key_exchange_known_key() {
    let engine: SignatureEngine<crate::hash::Sm3> = SignatureEngine::new(alternate_curve());
    let curve = engine.curve().clone();

    let da = scalar("6FCBA2EF9AE0AB902BC3BDE3FF915D44BA4CC78F88E2F8E7F8996D3B8CCEEDEE");
    let db = scalar("5E35D7D3F3C54DBAC72E61819E730B019A84208CA3A35E4C2E353DFCCB2A3B53");
    let pa = curve.scalar_mul(&da, &curve.generator()).unwrap();
    let pb = curve.scalar_mul(&db, &curve.generator()).unwrap();
    let za = engine.compute_z(b"ALICE123@YAHOO.COM", &pa).unwrap();
    let zb = engine.compute_z(b"BILL456@YAHOO.COM", &pb).unwrap();

    let mut ra = FixedScalar::new(&[scalar(
        "83A2C9C8B96E5AF70BD480B472409A9A327257F1EBB73F5B073354B248668563",
    )]);
    let (ephemeral_a, ta) = engine.begin_key_exchange(&da, &mut ra).unwrap();
    assert_eq!(
        ephemeral_a.x(),
        &scalar("6CB5633816F4DD560B1DEC458310CBCC6856C09505324A6D23150C408F162BF0")
    );

    let mut rb = FixedScalar::new(&[scalar(
        "33FE21940342161C55619C4A0C060293D543C80AF19748CE176D83477DE71C80",
    )]);
    let (ephemeral_b, tb) = engine.begin_key_exchange(&db, &mut rb).unwrap();

    let key_a = engine
        .end_key_exchange(16, &ta, &ephemeral_b, &pb, &za, &zb, ExchangeRole::Initiator)
        .unwrap();
    let key_b = engine
        .end_key_exchange(16, &tb, &ephemeral_a, &pa, &zb, &za, ExchangeRole::Responder)
        .unwrap();

    assert_eq!(hex::encode(&key_a), "55b0ac62a6b927ba23703832c853ded4");
    assert_eq!(key_a, key_b);
}

#[test]
fn encrypt_decrypt_roundtrip() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let msg = b"confidentiality through an ephemeral shared point";

    let ciphertext = encrypt(msg, &public, &mut OsRng).unwrap();
    assert_eq!(ciphertext.len(), msg.len() + PUBLIC_KEY_BYTES + 32);
    assert_ne!(&ciphertext[PUBLIC_KEY_BYTES + 32..], msg.as_slice());

    let plain = decrypt(&ciphertext, &d.to_be_bytes()).unwrap();
    assert_eq!(plain, msg);
}

#[test]
fn encrypt_rejects_empty_plaintext() {
    let (_, public) = generate_keypair(&mut OsRng).unwrap();
    assert!(matches!(
        encrypt(b"", &public, &mut OsRng),
        Err(Error::Parameter { .. })
    ));
}

#[test]
fn decrypt_rejects_tampered_ciphertext() {
    let (d, public) = generate_keypair(&mut OsRng).unwrap();
    let engine = new_engine();
    let ciphertext = engine.encrypt(b"integrity", &public, &mut OsRng).unwrap();

    // Masked message byte
    let mut tampered = ciphertext.clone();
    *tampered.last_mut().unwrap() ^= 0x01;
    assert!(matches!(
        engine.decrypt(&tampered, &d),
        Err(Error::Processing { .. })
    ));

    // Digest byte
    let mut tampered = ciphertext.clone();
    tampered[PUBLIC_KEY_BYTES] ^= 0x01;
    assert!(matches!(
        engine.decrypt(&tampered, &d),
        Err(Error::Processing { .. })
    ));

    // Ephemeral point knocked off the curve
    let mut tampered = ciphertext.clone();
    tampered[3] ^= 0x01;
    assert!(matches!(
        engine.decrypt(&tampered, &d),
        Err(Error::Point { .. })
    ));

    // Nothing left after the point and digest
    assert!(matches!(
        engine.decrypt(&ciphertext[..PUBLIC_KEY_BYTES + 32], &d),
        Err(Error::Length { .. })
    ));
}

#[test]
fn key_exchange_roundtrip() {
    let (da, _) = generate_keypair(&mut OsRng).unwrap();
    let (db, _) = generate_keypair(&mut OsRng).unwrap();

    let alice = Sm2Exchange::new(&da.to_be_bytes(), b"alice@example.com").unwrap();
    let bob = Sm2Exchange::new(&db.to_be_bytes(), b"bob@example.com").unwrap();

    let (ra, ta) = alice.begin(&mut OsRng).unwrap();
    let (rb, tb) = bob.begin(&mut OsRng).unwrap();

    let key_a = alice
        .end(
            32,
            &ta,
            &rb,
            bob.public_key(),
            b"bob@example.com",
            ExchangeRole::Initiator,
        )
        .unwrap();
    let key_b = bob
        .end(
            32,
            &tb,
            &ra,
            alice.public_key(),
            b"alice@example.com",
            ExchangeRole::Responder,
        )
        .unwrap();

    assert_eq!(key_a, key_b);
    assert_eq!(key_a.len(), 32);
}

#[test]
fn key_exchange_identity_mismatch_diverges() {
    let (da, _) = generate_keypair(&mut OsRng).unwrap();
    let (db, _) = generate_keypair(&mut OsRng).unwrap();

    let alice = Sm2Exchange::new(&da.to_be_bytes(), b"alice@example.com").unwrap();
    let bob = Sm2Exchange::new(&db.to_be_bytes(), b"bob@example.com").unwrap();

    let (ra, ta) = alice.begin(&mut OsRng).unwrap();
    let (rb, tb) = bob.begin(&mut OsRng).unwrap();

    let key_a = alice
        .end(
            16,
            &ta,
            &rb,
            bob.public_key(),
            b"mallory@example.com",
            ExchangeRole::Initiator,
        )
        .unwrap();
    let key_b = bob
        .end(
            16,
            &tb,
            &ra,
            alice.public_key(),
            b"alice@example.com",
            ExchangeRole::Responder,
        )
        .unwrap();

    assert_ne!(key_a, key_b);
}

#[test]
fn fixed_scalar_skips_rejected_draws() {
    use crate::sign::ScalarSource;

    // The zero draw is rejected and sampling moves on to the next scalar
    let n = curve().n;
    let mut source = FixedScalar::new(&[U256::ZERO, U256::from_u64(7)]);
    assert_eq!(source.next_scalar(&n).unwrap(), U256::from_u64(7));
}

#[test]
#[should_panic(expected = "fixed scalar sequence exhausted")]
fn fixed_scalar_exhaustion_panics() {
    use crate::sign::ScalarSource;

    let n = curve().n;
    let mut source = FixedScalar::new(&[]);
    let _ = source.next_scalar(&n);
}
