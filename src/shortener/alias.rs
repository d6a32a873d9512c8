use rand::RngExt;

/// Alphabet for generated short ids: digits, lowercase, uppercase
pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of generated short ids
pub const ALIAS_LEN: usize = 7;

/// Draw a random fixed-length alias. Collisions are possible by
/// construction; callers retry against the store.
pub fn generate() -> String {
    let mut rng = rand::rng();
    (0..ALIAS_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
