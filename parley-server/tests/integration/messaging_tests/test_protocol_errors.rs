use serde_json::json;

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{TestPeer, join_room};

#[tokio::test]
async fn test_unsupported_type_is_reported_to_sender_only() {
    init_tracing();

    let rooms = create_test_manager();

    let (mut doctor, _) = join_room(&rooms, "room_abc", "d1", "doctor")
        .await
        .expect("doctor join failed");
    let (mut patient, _) = join_room(&rooms, "room_abc", "p1", "patient")
        .await
        .expect("patient join failed");
    doctor.recv_type("user-joined").await.expect("no user-joined");

    patient.send_raw(r#"{"type":"frobnicate"}"#).await;

    let err = patient.recv().await.expect("no reply");
    assert_eq!(
        err,
        json!({"type": "error", "data": "Unsupported message type: frobnicate"})
    );
    assert!(doctor.is_silent().await);
    assert_eq!(rooms.room("room_abc").map(|r| r.participants()), Some(2));
}

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    init_tracing();

    let rooms = create_test_manager();
    let mut peer = TestPeer::connect(&rooms, "noise").await;

    for raw in ["not json", "[]", r#"{"sdp":"v=0"}"#, ""] {
        peer.send_raw(raw).await;
        let err = peer.recv_type("error").await.expect("no error reply");
        assert_eq!(err["data"], "Invalid message format");
    }

    assert!(!peer.transport.is_closed());

    // Still usable afterwards.
    peer.send_json(&crate::utils::join_frame("d1", "doctor")).await;
    peer.recv_type("room-state").await.expect("join after errors failed");
}

#[tokio::test]
async fn test_signal_before_join_is_refused() {
    init_tracing();

    let rooms = create_test_manager();

    let (mut doctor, _) = join_room(&rooms, "gate", "d1", "doctor")
        .await
        .expect("doctor join failed");
    let mut stranger = TestPeer::connect(&rooms, "gate").await;

    stranger
        .send_json(&json!({"type": "offer", "to": "d1", "sdp": "v=0"}))
        .await;

    let err = stranger.recv_type("error").await.expect("no error reply");
    assert_eq!(err["data"], "Not joined to room");
    assert!(doctor.is_silent().await);
}
