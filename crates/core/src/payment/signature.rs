//! HMAC-SHA256 signature handling.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::types::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex signature the gateway sends for an order/payment pair.
///
/// # Errors
///
/// Returns `PaymentError::MissingSecret` for an empty secret.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> Result<String, PaymentError> {
    let mac = keyed_mac(secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a gateway signature in constant time.
///
/// # Errors
///
/// Returns `PaymentError::MissingSecret` for an empty secret and
/// `PaymentError::InvalidSignature` when the signature does not match.
pub fn verify_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<(), PaymentError> {
    let mac = keyed_mac(secret, order_id, payment_id)?;
    let expected = hex::decode(signature.trim()).map_err(|_| PaymentError::InvalidSignature)?;
    mac.verify_slice(&expected)
        .map_err(|_| PaymentError::InvalidSignature)
}

fn keyed_mac(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256, PaymentError> {
    if secret.is_empty() {
        return Err(PaymentError::MissingSecret);
    }
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentError::MissingSecret)?;
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    Ok(mac)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "secret";

    #[test]
    fn test_sign_then_verify() {
        let signature = sign(SECRET, "order_1", "pay_1").unwrap();
        assert_eq!(signature.len(), 64);
        assert!(signature.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
        assert!(verify_signature(SECRET, "order_1", "pay_1", &signature).is_ok());
        assert!(
            verify_signature(SECRET, "order_1", "pay_1", &signature.to_uppercase()).is_ok()
        );
    }

    #[test]
    fn test_rejects_tampered_fields() {
        let signature = sign(SECRET, "order_1", "pay_1").unwrap();
        assert_eq!(
            verify_signature(SECRET, "order_1", "pay_2", &signature),
            Err(PaymentError::InvalidSignature)
        );
        assert_eq!(
            verify_signature("other", "order_1", "pay_1", &signature),
            Err(PaymentError::InvalidSignature)
        );
    }

    #[test]
    fn test_rejects_malformed_hex() {
        assert_eq!(
            verify_signature(SECRET, "o", "p", "zz"),
            Err(PaymentError::InvalidSignature)
        );
        assert_eq!(
            verify_signature(SECRET, "o", "p", "abc"),
            Err(PaymentError::InvalidSignature)
        );
        assert_eq!(
            verify_signature(SECRET, "o", "p", "é1"),
            Err(PaymentError::InvalidSignature)
        );
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert_eq!(sign("", "o", "p"), Err(PaymentError::MissingSecret));
        assert_eq!(
            verify_signature("", "o", "p", "00"),
            Err(PaymentError::MissingSecret)
        );
    }

    #[test]
    fn test_separator_is_part_of_message() {
        // "a|bc" and "ab|c" must not collide.
        let first = sign(SECRET, "a", "bc").unwrap();
        let second = sign(SECRET, "ab", "c").unwrap();
        assert_ne!(first, second);
    }
}
