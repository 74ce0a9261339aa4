//! # Token Forgery Attacks
//!
//! ## Attack Vectors:
//!
//! 1. **Blind guessing**: random well-formed tokens
//! 2. **Bit flipping**: a valid token with one hex digit changed
//! 3. **Key path injection**: tokens that try to escape the cache prefix
//! 4. **Salt-less derivation**: computing a token without the deployment salt
//! 5. **Record planting**: writing arbitrary bytes under a token's key
//! 6. **Hostile invalidation**: revoking someone else's token without the key

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::Rng;
    use sd_token_broker::{CacheBackend, ErrorKind, Token, TokenBrokerApi};

    use crate::fixtures::{Harness, TEST_SALT};

    fn random_token() -> String {
        let bytes: [u8; 32] = rand::thread_rng().gen();
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    #[tokio::test]
    async fn test_blind_guessing_finds_nothing() {
        let h = Harness::new();
        let path = h.file("secret.pdf", b"%PDF");
        h.broker.register_path(&path, "k1", None).await.unwrap();

        for _ in 0..200 {
            let guess = random_token();
            let err = h.broker.retrieve(&guess, "k1").await.unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::DocumentExpired));
        }
    }

    #[tokio::test]
    async fn test_bit_flipped_token_is_unknown() {
        let h = Harness::new();
        let path = h.file("secret.pdf", b"%PDF");
        let token = h.broker.register_path(&path, "k1", None).await.unwrap();

        let mut tampered: Vec<char> = token.as_str().chars().collect();
        tampered[10] = if tampered[10] == '0' { '1' } else { '0' };
        let tampered: String = tampered.into_iter().collect();

        let err = h.broker.retrieve(&tampered, "k1").await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::DocumentExpired));

        // The genuine token is unaffected.
        assert!(h.broker.retrieve(token.as_str(), "k1").await.is_ok());
    }

    #[tokio::test]
    async fn test_prefix_escape_attempts_are_malformed() {
        let h = Harness::new();
        let path = h.file("secret.pdf", b"%PDF");
        let token = h.broker.register_path(&path, "k1", None).await.unwrap();

        let attempts = [
            format!("../{}", token),
            format!("{}/", token),
            format!(" {}", token),
            token.as_str().to_uppercase(),
            format!("{}\0", token),
        ];
        for attempt in &attempts {
            let err = h.broker.retrieve(attempt, "k1").await.unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::DocumentExpired), "{attempt:?}");
        }
    }

    #[tokio::test]
    async fn test_token_without_salt_is_useless() {
        let h = Harness::new();
        let path = h.file("secret.pdf", b"%PDF");
        let real = h.broker.register_path(&path, "k1", None).await.unwrap();

        for guessed_salt in ["", "salt", "secure_download_bundle", "screamzSecureDownloader"] {
            let forged = Token::derive(guessed_salt, &path);
            assert_ne!(forged, real);
            let err = h.broker.retrieve(forged.as_str(), "k1").await.unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::DocumentExpired));
        }
    }

    #[tokio::test]
    async fn test_planted_record_is_not_trusted() {
        let h = Harness::new();
        let token = Token::derive(TEST_SALT, "/etc/shadow");
        let key = h.broker.store().key_for(&token);

        for planted in [
            b"O:8:\"stdClass\":0:{}".to_vec(),
            b"SDTX".to_vec(),
            [&b"SDTX\x01"[..], &[0xffu8; 32][..]].concat(),
            Vec::new(),
        ] {
            h.cache
                .put(&key, planted, Duration::from_secs(60))
                .await
                .unwrap();

            let err = h.broker.retrieve(token.as_str(), "").await.unwrap_err();
            let rejection = err.rejection().unwrap();
            assert_eq!(rejection.kind(), ErrorKind::InvalidStoredType);
            assert!(rejection.transaction().payload().is_none());
        }
    }

    #[tokio::test]
    async fn test_invalidation_without_key_is_refused() {
        let h = Harness::new();
        let path = h.file("secret.pdf", b"%PDF");
        let token = h.broker.register_path(&path, "owner", None).await.unwrap();

        for key in ["", "Owner", "owner ", "owne"] {
            assert!(h
                .broker
                .invalidate_transaction(token.as_str(), key)
                .await
                .is_err());
        }
        assert!(h.broker.is_authorized(token.as_str(), "owner").await.unwrap());
    }
}
