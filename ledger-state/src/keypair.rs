//! Per-account asymmetric keypair
//!
//! Each account owns a secp256k1 keypair that the collaborator uses to
//! obscure short strings (sender/receiver names) in read responses.
//! Sealing works as an ephemeral ECDH key agreement feeding an
//! AES-256-GCM cipher; balances and transfer values are never
//! encrypted.

use crate::{StateError, StateResult};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;
use secp256k1::ecdh::SharedSecret;
use secp256k1::{PublicKey, Secp256k1, SecretKey};

const EPHEMERAL_KEY_LEN: usize = 33;
const NONCE_LEN: usize = 12;

/// secp256k1 keypair usable for sealing short strings
#[derive(Debug, Clone)]
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    /// Generate a fresh keypair
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let (secret, public) = secp.generate_keypair(&mut rand::rng());
        Self { secret, public }
    }

    /// The public half
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Textual rendering of the public key (compressed, hex)
    pub fn public_key_hex(&self) -> String {
        self.public.to_string()
    }

    /// Seal a short plaintext to a recipient public key
    ///
    /// Output layout: ephemeral public key (33 bytes) || nonce
    /// (12 bytes) || AES-256-GCM ciphertext.
    pub fn seal_to(recipient: &PublicKey, plaintext: &[u8]) -> StateResult<Vec<u8>> {
        let secp = Secp256k1::new();
        let mut rng = rand::rng();
        let (ephemeral_secret, ephemeral_public) = secp.generate_keypair(&mut rng);

        let shared = SharedSecret::new(recipient, &ephemeral_secret);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&shared.secret_bytes()));

        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext)
            .map_err(|_| StateError::Crypto("sealing failed".to_string()))?;

        let mut sealed = Vec::with_capacity(EPHEMERAL_KEY_LEN + NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&ephemeral_public.serialize());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Seal a short plaintext to this keypair's own public key
    pub fn seal(&self, plaintext: &[u8]) -> StateResult<Vec<u8>> {
        Self::seal_to(&self.public, plaintext)
    }

    /// Open a sealed box produced by [`Keypair::seal_to`]
    pub fn open(&self, sealed: &[u8]) -> StateResult<Vec<u8>> {
        if sealed.len() < EPHEMERAL_KEY_LEN + NONCE_LEN {
            return Err(StateError::Crypto("sealed box too short".to_string()));
        }

        let (key_bytes, rest) = sealed.split_at(EPHEMERAL_KEY_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let ephemeral_public = PublicKey::from_slice(key_bytes)
            .map_err(|e| StateError::Crypto(e.to_string()))?;
        let shared = SharedSecret::new(&ephemeral_public, &self.secret);
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&shared.secret_bytes()));

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| StateError::Crypto("opening failed".to_string()))
    }
}
