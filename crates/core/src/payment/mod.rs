//! Payment gateway confirmation.
//!
//! The gateway signs `{order_id}|{payment_id}` with HMAC-SHA256 using the
//! shared webhook secret and sends the hex digest. A confirmation is only
//! accepted once that signature checks out.

mod signature;
mod types;

pub use signature::{sign, verify_signature};
pub use types::{GatewayPayment, PaymentError, PaymentTarget, validate_confirmation};
