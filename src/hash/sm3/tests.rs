use super::*;
use crate::hash::HashFunction;

#[test]
fn test_sm3_abc() {
    let digest = Sm3::digest(b"abc").unwrap();
    assert_eq!(
        digest.to_hex(),
        "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
    );
}

#[test]
fn test_sm3_full_block() {
    // Exactly one 64-byte block, forcing the two-block padding path
    let digest = Sm3::digest(b"abcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcd")
        .unwrap();
    assert_eq!(
        digest.to_hex(),
        "debe9ff92275b8a138604889c18e5a4d6fdb70e5387e5765293dcba39c0c5732"
    );
}

#[test]
fn test_sm3_empty() {
    let digest = Sm3::digest(b"").unwrap();
    assert_eq!(
        digest.to_hex(),
        "1ab21d8355cfa17f8e61194831e81a8f22bec8c728fefb747ed035eb5082aa2b"
    );
}

#[test]
fn test_sm3_interleaved_value() {
    // `value` peeks at the running digest without disturbing the stream
    let mut h = Sm3::new();
    h.update(b"abc").unwrap();
    assert_eq!(
        h.value().to_hex(),
        "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
    );
    h.update(b"dabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcdabcda")
        .unwrap();
    assert_eq!(
        h.value().to_hex(),
        "0d24d8847bb36d29b998d0e191a65e4c39a311303e7b8332fe7fec8341169ad7"
    );
}

#[test]
fn test_sm3_streaming_equivalence() {
    let message = b"The quick brown fox jumps over the lazy dog, repeatedly and at length.";
    let expected = Sm3::digest(message).unwrap();

    // Every split point must agree with the one-shot digest
    for split in 0..message.len() {
        let mut h = Sm3::new();
        h.update(&message[..split]).unwrap();
        h.update(&message[split..]).unwrap();
        assert_eq!(h.finalize().unwrap(), expected, "split at {}", split);
    }
}

#[test]
fn test_sm3_reset_reuse() {
    let mut h = Sm3::new();
    h.update(b"garbage that should vanish").unwrap();
    h.reset();
    h.update(b"abc").unwrap();
    assert_eq!(
        h.finalize().unwrap().to_hex(),
        "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
    );

    // finalize resets as well; the state is reusable afterwards
    h.update(b"abc").unwrap();
    assert_eq!(
        h.finalize().unwrap().to_hex(),
        "66c7f0f462eeedd9d1f2d46bdc10e4e24167c4875cf2f7a2297da02b8f4ba8e0"
    );
}

#[test]
fn test_sm3_algorithm_constants() {
    assert_eq!(Sm3::output_size(), 32);
    assert_eq!(Sm3::block_size(), 64);
    assert_eq!(Sm3::name(), "SM3");
}
