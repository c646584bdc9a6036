use ed25519_dalek::SigningKey;
use finality_authorities::types::{
    authority_list::AuthorityList, crypto_primitives::VerifyingKey, data_types::Weight,
};
use rand_core::OsRng;

/// Create `count` deterministic verifying keys. Keys created with different `seed`s never collide
/// as long as the ranges `seed..seed + count` do not overlap.
pub(crate) fn verifying_keys(seed: u8, count: u8) -> Vec<VerifyingKey> {
    (seed..seed + count)
        .map(|i| SigningKey::from_bytes(&[i; 32]).verifying_key())
        .collect()
}

/// Create an authority list with `count` deterministic authorities, each with weight 1.
pub(crate) fn authorities(seed: u8, count: u8) -> AuthorityList {
    verifying_keys(seed, count)
        .into_iter()
        .map(|id| (id, Weight::new(1)))
        .collect()
}

/// Generate one authority per entry of `weights`, with that weight.
pub(crate) fn random_authorities(weights: &[u64]) -> (Vec<SigningKey>, AuthorityList) {
    let mut csprg = OsRng {};
    let signing_keys: Vec<SigningKey> = weights
        .iter()
        .map(|_| SigningKey::generate(&mut csprg))
        .collect();
    let authorities = signing_keys
        .iter()
        .zip(weights)
        .map(|(key, weight)| (key.verifying_key(), Weight::new(*weight)))
        .collect();
    (signing_keys, authorities)
}
