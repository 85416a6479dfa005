use super::*;
use crate::sign::sm2;

fn u(hex_str: &str) -> U256 {
    U256::from_be_hex(hex_str).unwrap()
}

#[test]
fn test_u256_byte_roundtrip() {
    let value = u("32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7");
    let bytes = value.to_be_bytes();
    assert_eq!(
        hex::encode(bytes),
        "32c4ae2c1f1981195f9904466a39c9948fe30bbff2660be1715a4589334c74c7"
    );
    assert_eq!(U256::from_be_bytes(&bytes).unwrap(), value);

    assert!(U256::from_be_bytes(&bytes[..31]).is_err());
}

#[test]
fn test_u256_ordering() {
    assert!(U256::ZERO < U256::ONE);
    assert!(u("ff") > u("fe"));
    assert!(u("0100000000000000") > u("ffffffffffffff"));
    assert_eq!(u("42"), U256::from_u64(0x42));
    assert!(U256::ZERO.is_zero());
    assert!(!U256::ONE.is_zero());
}

#[test]
fn test_modular_arithmetic() {
    let p = sm2::curve().p;
    let x = u("deadbeef12345678deadbeef12345678deadbeef12345678deadbeef12345678");
    let y = u("1020304050607080102030405060708010203040506070801020304050607080");

    assert_eq!(
        x.mod_add(&y, &p),
        u("eecdef2f6294c6f8eecdef2f6294c6f8eecdef2f6294c6f8eecdef2f6294c6f8")
    );
    assert_eq!(
        x.mod_mul(&y, &p),
        u("622f6eb0e8e23e02d707358d67661cc983b6d62215f8867308d02d87298dfbff")
    );
    assert_eq!(
        x.mod_inv(&p).unwrap(),
        u("765c7f5a3c31ba23ca9ec516c9bb3a7ea550d4b1b010d5c0da704bde500ac6b6")
    );

    // sub is the inverse of add
    let sum = x.mod_add(&y, &p);
    assert_eq!(sum.mod_sub(&y, &p), x);

    // a * a^-1 = 1
    let inv = x.mod_inv(&p).unwrap();
    assert_eq!(x.mod_mul(&inv, &p), U256::ONE);

    // zero has no inverse
    assert!(U256::ZERO.mod_inv(&p).is_err());
}

#[test]
fn test_generator_on_curve() {
    let curve = sm2::curve();
    let g = curve.generator();
    assert!(curve.is_on_curve(&g));
    assert!(curve.validate_point(&g).is_ok());
}

#[test]
fn test_point_double_known_value() {
    let curve = sm2::curve();
    let g2 = curve.double(&curve.generator()).unwrap();
    assert_eq!(
        *g2.x(),
        u("56cefd60d7c87c000d58ef57fa73ba4d9c0dfa08c08a7331495c2e1da3f2bd52")
    );
    assert_eq!(
        *g2.y(),
        u("31b7e7e6cc8189f668535ce0f8eaf1bd6de84c182f6c8e716f780d3a970a23c3")
    );
    assert!(curve.is_on_curve(&g2));
}

#[test]
fn test_scalar_mul_known_value() {
    let curve = sm2::curve();
    let k = u("123456789abcdef");
    let result = curve.scalar_mul(&k, &curve.generator()).unwrap();
    assert_eq!(
        *result.x(),
        u("8723bdf5f6c2d64f3042660741bd12c8bb1c025af7813f7c6cb1ab26d3d5370a")
    );
    assert_eq!(
        *result.y(),
        u("d781f805c5f5aad467976352375d2a5854e44e38bef025462cdcb819c23af678")
    );
}

#[test]
fn test_add_double_consistency() {
    // G + G through `add` must match `double`
    let curve = sm2::curve();
    let g = curve.generator();
    assert_eq!(curve.add(&g, &g).unwrap(), curve.double(&g).unwrap());

    // 2G + G == 3G computed by scalar multiplication
    let g2 = curve.double(&g).unwrap();
    let g3 = curve.add(&g2, &g).unwrap();
    assert_eq!(g3, curve.scalar_mul(&U256::from_u64(3), &g).unwrap());
}

#[test]
fn test_group_order() {
    let curve = sm2::curve();
    let g = curve.generator();

    // n * G = identity
    let ng = curve.scalar_mul(&curve.n, &g).unwrap();
    assert!(ng.is_identity());

    // (n-1) * G + G = identity
    let (n_minus_1, _) = curve.n.overflowing_sub(&U256::ONE);
    let almost = curve.scalar_mul(&n_minus_1, &g).unwrap();
    assert!(curve.add(&almost, &g).unwrap().is_identity());

    // 0 * G = identity
    assert!(curve
        .scalar_mul(&U256::ZERO, &g)
        .unwrap()
        .is_identity());
}

#[test]
fn test_identity_arithmetic() {
    let curve = sm2::curve();
    let g = curve.generator();
    let id = Point::identity();

    assert_eq!(curve.add(&id, &g).unwrap(), g);
    assert_eq!(curve.add(&g, &id).unwrap(), g);
    assert!(curve.double(&id).unwrap().is_identity());
}

#[test]
fn test_point_validation_rejects_bad_points() {
    let curve = sm2::curve();

    // identity is not a valid public point
    assert!(curve.validate_point(&Point::identity()).is_err());

    // x tweaked off the curve
    let g = curve.generator();
    let bogus = Point::new(g.x().mod_add(&U256::ONE, &curve.p), *g.y());
    assert!(!curve.is_on_curve(&bogus));
    assert!(matches!(
        curve.validate_point(&bogus),
        Err(crate::error::Error::Point { .. })
    ));
}

#[test]
fn test_point_byte_roundtrip() {
    let curve = sm2::curve();
    let g = curve.generator();
    let bytes = g.to_bytes();
    assert_eq!(bytes.len(), 64);
    let parsed = Point::from_bytes(&bytes).unwrap();
    assert_eq!(parsed, g);

    assert!(Point::from_bytes(&bytes[..63]).is_err());
}
