// src/common/id_generator.rs
//! Prefixed Crockford Base32 identifiers, e.g. `U_K7NP3X` for users.
//!
//! The alphabet leaves out I, L, O and U so ids survive being read aloud or retyped.

use rand::Rng;

const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// U_
    User,
    /// R_
    Revision,
}

impl EntityPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "U",
            EntityPrefix::Revision => "R",
        }
    }

    /// Random characters after the prefix; revisions accumulate faster than users
    fn random_len(&self) -> usize {
        match self {
            EntityPrefix::User => 6,
            EntityPrefix::Revision => 10,
        }
    }
}

fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CROCKFORD_ALPHABET[rng.gen_range(0..32)] as char)
        .collect()
}

pub fn generate_id(prefix: EntityPrefix) -> String {
    format!(
        "{}_{}",
        prefix.as_str(),
        generate_crockford_string(prefix.random_len())
    )
}

pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

pub fn generate_revision_id() -> String {
    generate_id(EntityPrefix::Revision)
}
