use parley_server::RoomConfig;

use crate::integration::{create_test_manager_with, init_tracing};
use crate::utils::{TestPeer, join_frame, join_room};

#[tokio::test]
async fn test_third_participant_is_refused_when_capped() {
    init_tracing();

    let rooms = create_test_manager_with(RoomConfig {
        max_participants: Some(2),
        ..RoomConfig::default()
    });

    let (mut doctor, _) = join_room(&rooms, "consult", "d1", "doctor")
        .await
        .expect("doctor join failed");
    let (_patient, _) = join_room(&rooms, "consult", "p1", "patient")
        .await
        .expect("patient join failed");
    doctor.recv_type("user-joined").await.expect("no user-joined");

    let mut extra = TestPeer::connect(&rooms, "consult").await;
    extra.send_json(&join_frame("x1", "patient")).await;

    let err = extra.recv_type("error").await.expect("no error reply");
    assert_eq!(err["data"], "Room is full");
    assert!(!extra.transport.is_closed());
    assert!(doctor.is_silent().await);

    // Reconnecting an existing participant is still allowed.
    let (_doctor_again, state) = join_room(&rooms, "consult", "d1", "doctor")
        .await
        .expect("rejoin refused");
    assert_eq!(state["data"]["users"][0]["id"], "p1");
}
