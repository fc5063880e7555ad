//! Manage session tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_AUDIENCE: &str = env!("CARGO_PKG_NAME");

/// Token lifetime in seconds.
pub const EXPIRATION_TIME: u64 = 60 * 15; // 15 minutes.

/// Pieces of information asserted on a token.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Recipients that the token is intended for.
    pub aud: String,
    /// Identifies the expiration time on or after which the token must not
    /// be accepted for processing.
    pub exp: u64,
    /// Identifies the time at which the token was issued.
    #[serde(rename = "iat")]
    pub iat: u64,
    /// Identifies the instance that issued the token.
    pub iss: String,
    /// User ID.
    pub sub: String,
}

/// Manage session tokens.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    name: String,
    audience: String,
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance.
    pub fn new(name: &str, secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            name: name.to_owned(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    /// Set `audience` field on tokens.
    pub fn audience(&mut self, audience: &str) {
        self.audience = audience.to_owned();
    }

    /// Create a new token for a user.
    pub fn create(&self, user_id: i64) -> Result<String> {
        let time =
            SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
        let header = Header::new(self.algorithm);
        let claims = Claims {
            aud: self.audience.clone(),
            exp: time + EXPIRATION_TIME,
            iat: time,
            iss: self.name.clone(),
            sub: user_id.to_string(),
        };

        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Decode and check a token.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[&self.audience]);

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }
}
