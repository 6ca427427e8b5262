use super::*;
use rust_decimal_macros::dec;
use std::str::FromStr;

#[test]
fn test_whole_amounts() {
    assert!(is_whole_amount(dec!(3334)));
    assert!(!is_whole_amount(dec!(33.5)));
    assert!(is_positive_whole_amount(dec!(1)));
    assert!(!is_positive_whole_amount(dec!(0)));
    assert!(!is_positive_whole_amount(dec!(-10)));
    assert!(!is_positive_whole_amount(dec!(0.5)));
}

#[test]
fn test_currency_default_is_inr() {
    assert_eq!(Currency::default(), Currency::Inr);
}

#[test]
fn test_currency_display() {
    assert_eq!(format!("{}", Currency::Inr), "INR");
    assert_eq!(format!("{}", Currency::Usd), "USD");
    assert_eq!(format!("{}", Currency::Eur), "EUR");
    assert_eq!(format!("{}", Currency::Aed), "AED");
    assert_eq!(format!("{}", Currency::Sgd), "SGD");
}

#[test]
fn test_currency_from_str() {
    assert_eq!(Currency::from_str("INR").unwrap(), Currency::Inr);
    assert_eq!(Currency::from_str("inr").unwrap(), Currency::Inr);
    assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
    assert!(Currency::from_str("INVALID").is_err());
    assert!(Currency::from_str("").is_err());
}
