use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use k256::ecdsa::{SigningKey, VerifyingKey};
use keyauth::auth::{
    AccountId, AuthError, Authenticator, GenerateSecretRequest, KeyVerifier, PermissionEntry,
    SignatureVerifier,
};
use keyauth::chain::{ChainError, ChainLookup};
use keyauth::keys::{KeySignature, PublicKey};
use rand_core::OsRng;

/// Issuance never touches the chain.
struct NoChain;

#[async_trait]
impl ChainLookup for NoChain {
    async fn resolve_account(&self, display_name: &str) -> Result<AccountId, AuthError> {
        Err(AuthError::NameResolution {
            name: display_name.to_string(),
            source: ChainError::EmptyResolution,
        })
    }

    async fn fetch_permissions(
        &self,
        _account_id: &str,
        _legacy_key_format: bool,
    ) -> Result<Vec<PermissionEntry>, AuthError> {
        Ok(Vec::new())
    }
}

fn bench_verify_candidates(c: &mut Criterion) {
    let message = b"3c6e0b8a9c15224a8228b9a98ca1531d5e8c1f2b";
    let keys: Vec<SigningKey> = (0..3).map(|_| SigningKey::random(&mut OsRng)).collect();
    let candidates: Vec<PermissionEntry> = keys
        .iter()
        .zip(["owner", "active", "posting"])
        .map(|(key, name)| {
            let text = PublicKey::from_verifying_key(VerifyingKey::from(key)).to_string();
            PermissionEntry::new(Some(text), name)
        })
        .collect();

    // Signed by the last candidate, so every key is tried
    let (signature, recovery_id) = keys[2].sign_recoverable(message).unwrap();
    let signature = KeySignature::from_recoverable(signature, recovery_id).to_string();

    let verifier = KeyVerifier::new();
    match verifier.verify(message, &signature, &candidates) {
        Ok(Some(_)) => {
            c.bench_function("verify_three_candidates", |b| {
                b.iter(|| {
                    verifier
                        .verify(black_box(message), black_box(&signature), black_box(&candidates))
                        .unwrap()
                })
            });
        }
        other => {
            panic!("Signature did not verify before benchmarking: {:?}", other);
        }
    }
}

fn bench_issue_secret(c: &mut Criterion) {
    // Short TTL keeps the store bounded across iterations
    let auth = Authenticator::new(Arc::new(NoChain), "commun")
        .with_secret_ttl(Some(Duration::from_secs(1)));
    let mut n = 0u64;
    c.bench_function("issue_secret", |b| {
        b.iter(|| {
            n += 1;
            auth.generate_secret(black_box(&GenerateSecretRequest {
                channel_id: format!("bench-{}", n),
            }))
        })
    });
}

criterion_group!(benches, bench_verify_candidates, bench_issue_secret);
criterion_main!(benches);
