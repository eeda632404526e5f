use std::hash::Hasher;

use rustc_hash::FxHasher;

/// Prefix of every hashed identifier, keeping them clear of user-visible
/// names in the emitted script.
pub const SYMBOL_PREFIX: &str = "$CS_";

/// Map a source name to a stable, content-derived identifier that is valid
/// in the target language.
///
/// FxHash is unseeded, so the same name hashes the same way on every run.
pub fn make_symbol(name: &str) -> String {
    let mut hasher = FxHasher::default();
    hasher.write(name.as_bytes());
    hasher.write_u8(0xff);
    format!("{SYMBOL_PREFIX}{:016x}", hasher.finish())
}
