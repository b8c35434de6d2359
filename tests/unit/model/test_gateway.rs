use assert_json_diff::assert_json_eq;
use discord_rs::model::gateway::{
    GatewayPayload, Hello, Opcode, PresenceUpdate, Ready, Resume,
};
use serde_json::json;

#[test]
fn test_decode_hello() {
    let payload: GatewayPayload =
        serde_json::from_str(r#"{"op":10,"d":{"heartbeat_interval":41250},"s":null,"t":null}"#)
            .unwrap();
    assert_eq!(payload.opcode(), Ok(Opcode::Hello));
    let hello: Hello = serde_json::from_value(payload.d).unwrap();
    assert_eq!(hello.heartbeat_interval, 41250);
}

#[test]
fn test_encode_resume() {
    let resume = Resume {
        token: "abc".to_string(),
        session_id: "session".to_string(),
        seq: 1337,
    };
    let payload = GatewayPayload::new(Opcode::Resume, resume).unwrap();
    assert_json_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({"op": 6, "d": {"token": "abc", "session_id": "session", "seq": 1337}})
    );
}

#[test]
fn test_encode_presence() {
    let payload = GatewayPayload::new(Opcode::PresenceUpdate, PresenceUpdate::status("dnd")).unwrap();
    assert_json_eq!(
        serde_json::to_value(&payload).unwrap(),
        json!({"op": 3, "d": {"since": null, "activities": [], "status": "dnd", "afk": false}})
    );
}

#[test]
fn test_decode_ready() {
    let ready: Ready = serde_json::from_value(json!({
        "v": 10,
        "user": {"id": "80351110224678912", "username": "Nelly", "discriminator": "1337", "bot": true},
        "guilds": [],
        "session_id": "9f2a",
        "resume_gateway_url": "wss://gateway-us-east1-b.discord.gg",
        "shard": [0, 1],
        "application": {"id": "1", "flags": 0}
    }))
    .unwrap();
    assert_eq!(ready.v, 10);
    assert_eq!(ready.session_id, "9f2a");
    assert_eq!(ready.shard, Some([0, 1]));
    assert_eq!(ready.user.username, "Nelly");
}

#[test]
fn test_invalid_session_flag() {
    let payload: GatewayPayload = serde_json::from_str(r#"{"op":9,"d":false}"#).unwrap();
    assert_eq!(payload.opcode(), Ok(Opcode::InvalidSession));
    assert_eq!(payload.d.as_bool(), Some(false));
}
