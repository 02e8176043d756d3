use super::*;

#[test]
fn messages_carry_their_stage_prefix() {
    let cases = [
        (VideoError::validation("x"), "validation error: x"),
        (VideoError::animation("x"), "animation error: x"),
        (VideoError::evaluation("x"), "evaluation error: x"),
        (VideoError::encode("x"), "encode error: x"),
    ];
    for (err, want) in cases {
        assert_eq!(err.to_string(), want);
    }
}

#[test]
fn serde_errors_keep_context_and_position() {
    let err = serde_json::from_str::<serde_json::Value>("{ \"id\": ")
        .map_err(VideoError::serde("parse composition JSON"))
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("serialization error: parse composition JSON: "), "{msg}");
    assert!(msg.contains("line 1"), "{msg}");
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn other_preserves_context_chain() {
    use anyhow::Context as _;

    let err: VideoError = std::fs::read("/definitely/not/here.png")
        .context("read asset bytes")
        .unwrap_err()
        .into();
    assert!(matches!(err, VideoError::Other(_)));
    assert_eq!(err.to_string(), "read asset bytes");
}
