//! JWT service for session token issuance and verification
//!
//! Tokens are HS256-signed with a process-wide secret and carry only the
//! username, the issue time and the expiry. The server keeps no record of
//! issued tokens.

use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AuthError, AuthResult};

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret used to sign and verify tokens
    pub secret: String,
    /// Access token expiration time in seconds (default: 1 hour)
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Signing secret (required, must not be empty)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 3600, must parse)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let access_token_expiry = match std::env::var("JWT_ACCESS_TOKEN_EXPIRY") {
            Ok(value) => value.parse::<u64>().map_err(|e| {
                anyhow::anyhow!("Invalid JWT_ACCESS_TOKEN_EXPIRY '{}': {}", value, e)
            })?,
            Err(_) => 3600,
        };

        Ok(JwtConfig {
            secret,
            access_token_expiry,
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username
    pub sub: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// A freshly issued session token
#[derive(Debug, Clone)]
pub struct SessionToken {
    /// Encoded, signed token handed to the client
    pub access_token: String,
    pub subject: String,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Issue a session token for `username`
    pub fn issue(&self, username: &str) -> AuthResult<SessionToken> {
        self.issue_at(username, now()?)
    }

    fn issue_at(&self, username: &str, issued_at: u64) -> AuthResult<SessionToken> {
        let claims = Claims {
            sub: username.to_string(),
            iat: issued_at,
            exp: issued_at
                .checked_add(self.config.access_token_expiry)
                .ok_or_else(|| AuthError::Crypto("Token expiry out of range".to_string()))?,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("Failed to sign token: {}", e)))?;

        Ok(SessionToken {
            access_token,
            subject: claims.sub,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }

    /// Verify a raw token and return the username it was issued to
    ///
    /// The signature is checked before any claim is read; expiry is checked
    /// only on a correctly signed token.
    pub fn verify(&self, token: &str) -> AuthResult<String> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::Malformed,
                }
            })?;

        Ok(token_data.claims.sub)
    }
}

fn now() -> AuthResult<u64> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AuthError::Crypto(format!("Failed to get current time: {}", e)))
}
