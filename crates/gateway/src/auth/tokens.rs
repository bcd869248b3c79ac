// Random tokens for sessions and OAuth state
// Decision: Session tokens are 32 random bytes (64 hex chars), stored only as SHA-256 digests
// Decision: OAuth state is shorter (16 bytes) and lives in a short-lived cookie

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use teamspace_core::SessionToken;

const SESSION_TOKEN_BYTES: usize = 32;
const OAUTH_STATE_BYTES: usize = 16;

fn random_hex(len: usize) -> String {
    let mut rng = rand::thread_rng();
    let bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
    hex::encode(bytes)
}

/// Generate a new session token
pub fn generate_session_token() -> SessionToken {
    SessionToken::new(random_hex(SESSION_TOKEN_BYTES))
}

/// Generate a random state string for OAuth (32 hex characters)
pub fn generate_oauth_state() -> String {
    random_hex(OAUTH_STATE_BYTES)
}

/// Hash a token for storage/lookup
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Constant-time string comparison for secrets read back from cookies
pub fn tokens_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_token_format() {
        let token = generate_session_token();
        assert_eq!(token.as_str().len(), SESSION_TOKEN_BYTES * 2);
        assert!(token.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_session_token(), generate_session_token());
        assert_ne!(generate_oauth_state(), generate_oauth_state());
    }

    #[test]
    fn test_oauth_state_length() {
        assert_eq!(generate_oauth_state().len(), 32);
    }

    #[test]
    fn test_hash_token_is_stable() {
        let hash = hash_token("abc");
        assert_eq!(hash, hash_token("abc"));
        assert_ne!(hash, hash_token("abd"));
        // sha256("abc")
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_tokens_match() {
        assert!(tokens_match("deadbeef", "deadbeef"));
        assert!(!tokens_match("deadbeef", "deadbeee"));
        assert!(!tokens_match("deadbeef", "dead"));
        assert!(tokens_match("", ""));
        assert!(!tokens_match("", "deadbeef"));

        let state = generate_oauth_state();
        assert!(tokens_match(&state, &state.clone()));
        assert!(!tokens_match(&state, &generate_oauth_state()));
    }
}
