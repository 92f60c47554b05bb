use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{TestPeer, join_room, roster_ids, wait_until};

#[tokio::test]
async fn test_room_removed_after_last_disconnect() {
    init_tracing();

    let rooms = create_test_manager();

    let (doctor, _) = join_room(&rooms, "short-lived", "d1", "doctor")
        .await
        .expect("doctor join failed");
    let (patient, _) = join_room(&rooms, "short-lived", "p1", "patient")
        .await
        .expect("patient join failed");
    assert_eq!(rooms.room_count(), 1);

    doctor.disconnect().await;
    patient.disconnect().await;

    assert!(wait_until(|| rooms.room_count() == 0, 1000).await, "room not evicted");

    let (_again, state) = join_room(&rooms, "short-lived", "d1", "doctor")
        .await
        .expect("rejoin failed");
    assert!(roster_ids(&state).is_empty(), "no state survives eviction");
}

#[tokio::test]
async fn test_room_kept_while_unjoined_connection_attached() {
    init_tracing();

    let rooms = create_test_manager();

    let (doctor, _) = join_room(&rooms, "lobby", "d1", "doctor")
        .await
        .expect("doctor join failed");
    let observer = TestPeer::connect(&rooms, "lobby").await;

    doctor.disconnect().await;
    let handle = rooms.room("lobby").expect("room exists");
    assert!(wait_until(|| handle.participants() == 0, 1000).await);
    assert_eq!(rooms.room_count(), 1, "attached socket keeps the room");

    observer.disconnect().await;
    assert!(wait_until(|| rooms.room_count() == 0, 1000).await);
}

#[tokio::test]
async fn test_stats_reflect_rooms_and_clients() {
    init_tracing();

    let rooms = create_test_manager();

    let (_a, _) = join_room(&rooms, "alpha", "d1", "doctor")
        .await
        .expect("join failed");
    let (_b, _) = join_room(&rooms, "alpha", "p1", "patient")
        .await
        .expect("join failed");
    let (_c, _) = join_room(&rooms, "beta", "d2", "doctor")
        .await
        .expect("join failed");
    let _lurker = TestPeer::connect(&rooms, "beta").await;

    assert!(
        wait_until(
            || rooms.stats().details.get("alpha") == Some(&2)
                && rooms.stats().details.get("beta") == Some(&1),
            1000
        )
        .await
    );

    let stats = rooms.stats();
    assert_eq!(stats.rooms, 2);
    assert_eq!(stats.clients, 3, "only joined participants are clients");
    assert_eq!(rooms.connection_count(), 4, "every attached socket is a connection");
}
