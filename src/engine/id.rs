use rand::Rng;

/// Length of generated book ids.
pub const ID_LENGTH: usize = 8;

/// URL-safe alphabet ids are drawn from.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Generates a random id of `len` characters from the URL-safe alphabet.
///
/// Collisions are not checked against the collection.
pub fn generate(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}
