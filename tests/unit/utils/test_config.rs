use discord_rs::utils::config::{get_env_or_default, get_env_or_none, read_json_file};
use serde_json::Value;

#[test]
fn test_get_env_or_default_unset() {
    let value: u64 = get_env_or_default("DISCORD_RS_TEST_UNSET_VARIABLE", 42);
    assert_eq!(value, 42);
}

#[test]
fn test_get_env_or_none_unset() {
    let value: Option<u32> = get_env_or_none("DISCORD_RS_TEST_UNSET_VARIABLE");
    assert_eq!(value, None);
}

#[test]
fn test_read_json_file() {
    let path = std::env::temp_dir().join(format!("discord-rs-{}.json", nanoid::nanoid!()));
    std::fs::write(&path, r#"{"a": [1, 2]}"#).unwrap();
    let value: Value = read_json_file(&path).unwrap();
    assert_eq!(value["a"][1], 2);
    std::fs::remove_file(path).unwrap();
}
