use chrono::{TimeZone, Utc};
use discord_rs::utils::snowflake::Snowflake;

#[test]
fn test_snowflake_timestamp() {
    let id: Snowflake = "175928847299117063".parse().unwrap();
    let expected = Utc.timestamp_millis_opt(1_462_015_105_796).unwrap();
    assert_eq!(id.timestamp(), expected);
}

#[test]
fn test_snowflake_ordering_follows_time() {
    let older: Snowflake = "175928847299117063".parse().unwrap();
    let newer: Snowflake = "782164174821523467".parse().unwrap();
    assert!(older < newer);
    assert!(older.timestamp() < newer.timestamp());
}

#[test]
fn test_snowflake_json_forms() {
    let from_string: Snowflake = serde_json::from_str("\"41771983423143937\"").unwrap();
    let from_number: Snowflake = serde_json::from_str("41771983423143937").unwrap();
    assert_eq!(from_string, from_number);
    assert_eq!(
        serde_json::to_string(&from_number).unwrap(),
        "\"41771983423143937\""
    );
}

#[test]
fn test_snowflake_rejects_garbage() {
    assert!("abc".parse::<Snowflake>().is_err());
    assert!(serde_json::from_str::<Snowflake>("\"12ab\"").is_err());
    assert!(serde_json::from_str::<Snowflake>("true").is_err());
}
