use serde_json::json;

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{join_room, roster_ids};

#[tokio::test]
async fn test_rooms_do_not_leak_into_each_other() {
    init_tracing();

    let rooms = create_test_manager();

    let (mut a_doctor, _) = join_room(&rooms, "room_a", "d1", "doctor")
        .await
        .expect("join room_a failed");
    let (mut b_doctor, state) = join_room(&rooms, "room_b", "d2", "doctor")
        .await
        .expect("join room_b failed");
    assert!(roster_ids(&state).is_empty(), "room_b starts empty");

    let (mut a_patient, _) = join_room(&rooms, "room_a", "p1", "patient")
        .await
        .expect("join room_a patient failed");
    a_doctor.recv_type("user-joined").await.expect("no user-joined");

    a_patient
        .send_json(&json!({"type": "offer", "sdp": "v=0"}))
        .await;
    a_doctor.recv_type("offer").await.expect("room_a offer missing");

    a_patient.disconnect().await;
    a_doctor.recv_type("user-left").await.expect("room_a user-left missing");

    assert!(b_doctor.is_silent().await, "room_b saw room_a traffic");
    assert_eq!(rooms.room_count(), 2);
}

#[tokio::test]
async fn test_same_id_in_two_rooms_is_two_participants() {
    init_tracing();

    let rooms = create_test_manager();

    let (mut first, _) = join_room(&rooms, "left", "d1", "doctor")
        .await
        .expect("join left failed");
    let (mut second, _) = join_room(&rooms, "right", "d1", "doctor")
        .await
        .expect("join right failed");

    // Neither session replaced the other.
    assert!(first.is_silent().await);
    assert!(second.is_silent().await);
    assert!(!first.transport.is_closed());
    assert!(!second.transport.is_closed());
}

#[tokio::test]
async fn test_concurrent_joins_across_rooms() {
    init_tracing();

    let rooms = create_test_manager();

    let mut tasks = Vec::new();
    for r in 0..8 {
        for p in 0..4 {
            let rooms = rooms.clone();
            tasks.push(tokio::spawn(async move {
                join_room(&rooms, &format!("room-{r}"), &format!("peer-{p}"), "patient").await
            }));
        }
    }

    let mut peers = Vec::new();
    for task in tasks {
        let (peer, _) = task.await.expect("task panicked").expect("join failed");
        peers.push(peer);
    }

    assert_eq!(rooms.room_count(), 8);
    assert_eq!(rooms.connection_count(), 32);
    assert!(
        crate::utils::wait_until(|| rooms.stats().details.values().all(|n| *n == 4), 1000).await
    );
    assert_eq!(rooms.stats().clients, 32);
}
