use super::*;
use chrono::Duration;

fn service(secret: &str, expiry: u64) -> JwtService {
    JwtService::new(&JwtConfig {
        secret: secret.to_string(),
        access_token_expiry_secs: expiry,
    })
}

#[test]
fn test_claims_new_sets_correct_fields() {
    let user_id = Uuid::new_v4();
    let society_id = Uuid::new_v4();
    let expires_at = Utc::now() + Duration::hours(1);

    let claims = Claims::new(user_id, Some((society_id, "admin")), expires_at);

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.society_id(), Some(society_id));
    assert_eq!(claims.role.as_deref(), Some("admin"));
    assert!(claims.iat <= Utc::now().timestamp());
    assert_eq!(claims.exp, expires_at.timestamp());
}

#[test]
fn test_claims_without_society() {
    let claims = Claims::new(Uuid::new_v4(), None, Utc::now() + Duration::hours(1));
    assert!(claims.society_id().is_none());
    assert!(claims.role.is_none());

    let json = serde_json::to_value(&claims).unwrap();
    assert!(json.get("soc").is_none());
}

#[test]
fn test_generate_and_validate_token() {
    let service = service("test-secret-key-for-testing", 900);
    let user_id = Uuid::new_v4();
    let society_id = Uuid::new_v4();

    let token = service
        .generate_access_token(user_id, Some((society_id, "member")))
        .unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.society_id(), Some(society_id));
    assert_eq!(claims.role.as_deref(), Some("member"));
    assert_eq!(service.access_token_expires_in(), 900);
}

#[test]
fn test_invalid_token() {
    let service = service("test-secret-key-for-testing", 900);
    assert!(matches!(
        service.validate_token("invalid.token.here"),
        Err(JwtError::Invalid(_))
    ));
}

#[test]
fn test_token_signed_with_other_secret_is_rejected() {
    let issuer = service("secret-one", 900);
    let verifier = service("secret-two", 900);

    let token = issuer.generate_access_token(Uuid::new_v4(), None).unwrap();
    assert!(verifier.validate_token(&token).is_err());
}

#[test]
fn test_expired_token() {
    let service = service("test-secret", 900);
    let claims = Claims {
        sub: Uuid::new_v4(),
        soc: None,
        role: None,
        iat: (Utc::now() - Duration::hours(2)).timestamp(),
        exp: (Utc::now() - Duration::hours(1)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::Expired)
    ));
}

#[test]
fn test_overflowing_expiry_fails_to_issue() {
    let service = service("test-secret", u64::MAX);
    assert!(matches!(
        service.generate_access_token(Uuid::new_v4(), None),
        Err(JwtError::Encode(_))
    ));
}

#[test]
fn test_errors_map_to_unauthorized() {
    assert_eq!(AppError::from(JwtError::Expired).status_code(), 401);
    assert_eq!(AppError::from(JwtError::Invalid("sig".into())).status_code(), 401);
    assert!(AppError::from(JwtError::Encode("key".into())).is_server_error());
}
