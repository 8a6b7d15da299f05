use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use std::{error::Error as StdError, fmt};

use crate::services::auth::claims::AuthClaim;

// Errors returned by token verification. Callers map every variant to "unauthenticated".
#[derive(Debug)]
pub enum VerifyError {
    Jwt(jsonwebtoken::errors::Error),
    MissingSubject,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::MissingSubject => write!(f, "missing 'sub'/'id' claim"),
        }
    }
}

impl StdError for VerifyError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Jwt(e) => Some(e),
            Self::MissingSubject => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// HMAC (HS256/384/512) access-token verifier.
///
/// - Signature, `exp` (required) and `nbf` (when present) are checked by jsonwebtoken.
/// - `iss`/`aud` are only checked when configured.
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(
        secret: &str,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = leeway_seconds;
        validation.set_required_spec_claims(&["exp"]);

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            // Without a configured audience a token's `aud` claim is informational only
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify and decode a token into an [`AuthClaim`].
    pub fn verify(&self, token: &str) -> Result<AuthClaim, VerifyError> {
        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;

        AuthClaim::from_fields(data.claims).ok_or(VerifyError::MissingSubject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn sign(claims: &Value, secret: &str, alg: Algorithm) -> String {
        jsonwebtoken::encode(
            &Header::new(alg),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_seconds(delta: i64) -> i64 {
        chrono::Utc::now().timestamp() + delta
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET, None, None, 0)
    }

    #[test]
    fn valid_token_yields_claim() {
        let token = sign(
            &json!({"sub": "user-1", "exp": in_seconds(3600), "role": "patient"}),
            SECRET,
            Algorithm::HS256,
        );

        let claim = verifier().verify(&token).unwrap();
        assert_eq!(claim.subject(), "user-1");
        assert_eq!(claim.get("role"), Some(&json!("patient")));
    }

    #[test]
    fn legacy_id_claim_and_other_hmac_algorithms_are_accepted() {
        let token = sign(
            &json!({"id": "user-2", "exp": in_seconds(3600)}),
            SECRET,
            Algorithm::HS512,
        );
        assert_eq!(verifier().verify(&token).unwrap().subject(), "user-2");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = sign(
            &json!({"sub": "user-1", "exp": in_seconds(3600)}),
            "another-secret",
            Algorithm::HS256,
        );
        assert!(matches!(verifier().verify(&token), Err(VerifyError::Jwt(_))));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = sign(
            &json!({"sub": "user-1", "exp": in_seconds(-3600)}),
            SECRET,
            Algorithm::HS256,
        );
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn token_without_exp_is_rejected() {
        let token = sign(&json!({"sub": "user-1"}), SECRET, Algorithm::HS256);
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn token_not_yet_valid_is_rejected() {
        let token = sign(
            &json!({"sub": "user-1", "exp": in_seconds(7200), "nbf": in_seconds(3600)}),
            SECRET,
            Algorithm::HS256,
        );
        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn token_without_subject_is_rejected() {
        let token = sign(&json!({"exp": in_seconds(3600)}), SECRET, Algorithm::HS256);
        assert!(matches!(
            verifier().verify(&token),
            Err(VerifyError::MissingSubject)
        ));
    }

    #[test]
    fn issuer_and_audience_are_enforced_when_configured() {
        let verifier = TokenVerifier::new(SECRET, Some("issuer-a"), Some("health"), 0);

        let good = sign(
            &json!({"sub": "u", "exp": in_seconds(60), "iss": "issuer-a", "aud": "health"}),
            SECRET,
            Algorithm::HS256,
        );
        assert!(verifier.verify(&good).is_ok());

        let wrong_iss = sign(
            &json!({"sub": "u", "exp": in_seconds(60), "iss": "issuer-b", "aud": "health"}),
            SECRET,
            Algorithm::HS256,
        );
        assert!(verifier.verify(&wrong_iss).is_err());
    }

    #[test]
    fn unconfigured_audience_does_not_reject_tokens_carrying_aud() {
        let token = sign(
            &json!({"sub": "u", "exp": in_seconds(60), "aud": "somebody"}),
            SECRET,
            Algorithm::HS256,
        );
        assert!(verifier().verify(&token).is_ok());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = sign(
            &json!({"sub": "user-1", "exp": in_seconds(3600)}),
            SECRET,
            Algorithm::HS256,
        );
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload =
            URL_SAFE_NO_PAD.encode(json!({"sub": "admin", "exp": in_seconds(3600)}).to_string());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(verifier().verify(&forged).is_err());
    }

    #[test]
    fn unsigned_alg_none_token_is_rejected() {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload =
            URL_SAFE_NO_PAD.encode(json!({"sub": "admin", "exp": in_seconds(3600)}).to_string());
        let token = format!("{header}.{payload}.");

        assert!(verifier().verify(&token).is_err());
    }

    #[test]
    fn garbage_never_panics() {
        let v = verifier();
        for input in [
            "",
            ".",
            "..",
            "abc.def.ghi",
            "rawtoken123",
            "a.b",
            "\u{0}\u{1}.\u{2}.",
            "eyJhbGciOiJIUzI1NiJ9.e30.",
            "eyJhbGciOiJIUzI1NiJ9.%%%%.sig",
        ] {
            assert!(v.verify(input).is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn debug_does_not_print_key_material() {
        let printed = format!("{:?}", verifier());
        assert!(!printed.contains(SECRET));
    }
}
