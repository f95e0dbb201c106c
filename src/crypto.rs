use super::*;

/// Signed token together with the claims it was signed over.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    raw: String,
    claims: Claims,
}

impl Token {
    pub fn as_str(&self) -> &str {
        &self.raw
    }
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
    pub fn into_string(self) -> String {
        self.raw
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// HMAC signer and verifier pinned to one algorithm and one secret.
pub struct Crypto {
    algorithm: Algorithm,
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
}

impl Crypto {
    pub fn new(algorithm: Algorithm, secret: &[u8]) -> Self {
        // expiry is checked against our own clock in `decode`
        let mut validation = jsonwebtoken::Validation::new(algorithm.into());
        validation.leeway = 0;
        validation.validate_exp = false;
        validation.validate_aud = false;
        Self {
            algorithm,
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            validation,
        }
    }
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
    pub fn encode(&self, claims: Claims) -> Result<Token, AuthError> {
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(self.algorithm.into()),
            &claims,
            &self.encoding,
        )
        .map(|raw| Token { raw, claims })
        .map_err(|e| AuthError::Signing(e.to_string()))
    }
    /// Verifies signature and algorithm, then requires `exp > now`.
    pub fn decode(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)?;
        if claims.expired_at(now) {
            return Err(AuthError::Expired);
        }
        Ok(claims)
    }
}
