use super::*;

#[test]
fn test_new_ids_are_v7() {
    let first = DueId::new();
    let second = DueId::new();
    assert_eq!(first.into_inner().get_version_num(), 7);
    assert_ne!(first, second);
}

#[test]
fn test_uuid_conversions() {
    let uuid = Uuid::new_v4();
    let flat = FlatId::from(uuid);
    assert_eq!(flat, FlatId::from_uuid(uuid));
    assert_eq!(Uuid::from(flat), uuid);
    assert_eq!(flat.to_string(), uuid.to_string());
}

#[test]
fn test_parse() {
    let uuid = Uuid::new_v4();
    let parsed: PenaltyId = uuid.to_string().parse().unwrap();
    assert_eq!(parsed.into_inner(), uuid);
    assert!("A-101".parse::<PenaltyId>().is_err());
}

#[test]
fn test_serialized_as_bare_uuid() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&MemberId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));

    let back: HousingUnitId = serde_json::from_str(&json).unwrap();
    assert_eq!(back.into_inner(), uuid);
}
