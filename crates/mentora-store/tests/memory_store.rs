use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use mentora_schedule::{Frequency, RecurrenceRule, SessionLocation, SessionStatus, generate};
use mentora_store::error::StoreError;
use mentora_store::model::{BookingFilter, NewSession, SessionFilter};
use mentora_store::{InMemorySessionStore, SessionStore};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, day, hour, 0, 0).unwrap()
}

fn single(tutor_id: Uuid, day: u32, hour: u32) -> NewSession {
    NewSession {
        tutor_id,
        subject: "Algebra".to_string(),
        price: 100.0,
        location: SessionLocation::Online,
        capacity: 1,
        start_time: at(day, hour),
        end_time: at(day, hour) + TimeDelta::hours(1),
        status: SessionStatus::Available,
        recurrence: None,
    }
}

#[test_log::test(tokio::test)]
async fn insert_batch_stores_generated_sessions() {
    let store = InMemorySessionStore::new();
    let tutor_id = Uuid::now_v7();
    let rule = RecurrenceRule {
        subject: "Physics".to_string(),
        price: 180.0,
        frequency: Frequency::Weekly,
        day_of_week: 1,
        time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
        duration_minutes: 90,
        end_date: NaiveDate::from_ymd_opt(2026, 2, 16).unwrap(),
        location: SessionLocation::Hybrid,
        capacity: 6,
        timezone: Tz::UTC,
    };
    let rows = generate(&rule, at(7, 12))
        .unwrap()
        .into_iter()
        .map(|session| NewSession::from_generated(tutor_id, session))
        .collect();

    let stored = store.insert_batch(rows).await.unwrap();

    assert_eq!(stored.len(), 6);
    assert_eq!(store.len().await, 6);
    assert!(stored.iter().all(|s| s.tutor_id == tutor_id));
    assert!(stored.iter().all(|s| s.recurrence == Some(rule.metadata())));
}

#[test_log::test(tokio::test)]
async fn insert_batch_is_all_or_nothing() {
    let store = InMemorySessionStore::new();
    let tutor_id = Uuid::now_v7();
    let mut broken = single(tutor_id, 13, 10);
    broken.end_time = broken.start_time;

    let result = store
        .insert_batch(vec![single(tutor_id, 12, 10), broken])
        .await;

    assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn list_orders_by_start_and_filters_by_tutor() {
    let store = InMemorySessionStore::new();
    let alice = Uuid::now_v7();
    let bob = Uuid::now_v7();
    store
        .insert_batch(vec![
            single(alice, 20, 9),
            single(bob, 15, 9),
            single(alice, 14, 9),
        ])
        .await
        .unwrap();

    let all = store.list(SessionFilter::default()).await.unwrap();
    let starts: Vec<_> = all.iter().map(|s| s.start_time).collect();
    assert_eq!(starts, vec![at(14, 9), at(15, 9), at(20, 9)]);

    let only_alice = store
        .list(SessionFilter {
            tutor_id: Some(alice),
        })
        .await
        .unwrap();
    assert_eq!(only_alice.len(), 2);
    assert!(only_alice.iter().all(|s| s.tutor_id == alice));
}

#[tokio::test]
async fn find_overlapping_uses_half_open_intervals() {
    let store = InMemorySessionStore::new();
    let tutor_id = Uuid::now_v7();
    store
        .insert_batch(vec![single(tutor_id, 12, 10)])
        .await
        .unwrap();

    // Back-to-back slots do not overlap.
    let touching = store
        .find_overlapping(tutor_id, at(12, 11), at(12, 12))
        .await
        .unwrap();
    assert!(touching.is_empty());

    let clash = store
        .find_overlapping(tutor_id, at(12, 10) + TimeDelta::minutes(30), at(12, 12))
        .await
        .unwrap();
    assert_eq!(clash.len(), 1);

    let other_tutor = store
        .find_overlapping(Uuid::now_v7(), at(12, 10), at(12, 11))
        .await
        .unwrap();
    assert!(other_tutor.is_empty());
}

#[test_log::test(tokio::test)]
async fn book_is_conditional_on_availability() {
    let store = InMemorySessionStore::new();
    let tutor_id = Uuid::now_v7();
    let stored = store
        .insert_batch(vec![single(tutor_id, 12, 10)])
        .await
        .unwrap();
    let id = stored[0].id;
    let first_student = Uuid::now_v7();

    let booking = store.book(id, first_student).await.unwrap();
    assert_eq!(booking.session_id, id);
    assert_eq!(booking.tutor_id, tutor_id);
    assert_eq!(booking.student_id, first_student);

    let second = store.book(id, Uuid::now_v7()).await;
    assert!(matches!(second, Err(StoreError::Conflict(_))));

    let reloaded = store.get(id).await.unwrap().unwrap();
    assert_eq!(reloaded.status, SessionStatus::Booked);
    assert_eq!(reloaded.booked_students, vec![first_student]);
}

#[test_log::test(tokio::test)]
async fn book_keeps_session_open_until_capacity_is_reached() {
    let store = InMemorySessionStore::new();
    let mut group = single(Uuid::now_v7(), 12, 10);
    group.capacity = 2;
    let id = store.insert_batch(vec![group]).await.unwrap()[0].id;
    let student = Uuid::now_v7();

    store.book(id, student).await.unwrap();
    let open = store.get(id).await.unwrap().unwrap();
    assert_eq!(open.status, SessionStatus::Available);
    assert_eq!(open.remaining_seats(), 1);

    assert_eq!(
        store.book(id, student).await,
        Err(StoreError::Conflict(
            "You have already booked this session".to_string()
        ))
    );

    store.book(id, Uuid::now_v7()).await.unwrap();
    let full = store.get(id).await.unwrap().unwrap();
    assert_eq!(full.status, SessionStatus::Booked);
    assert_eq!(full.remaining_seats(), 0);
}

#[tokio::test]
async fn book_rejects_overlapping_booking_for_same_student() {
    let store = InMemorySessionStore::new();
    let stored = store
        .insert_batch(vec![
            single(Uuid::now_v7(), 12, 10),
            single(Uuid::now_v7(), 12, 10),
            single(Uuid::now_v7(), 12, 11),
        ])
        .await
        .unwrap();
    let student = Uuid::now_v7();

    store.book(stored[0].id, student).await.unwrap();
    assert_eq!(
        store.book(stored[1].id, student).await,
        Err(StoreError::Conflict(
            "You already have a booking at this time".to_string()
        ))
    );
    // Back-to-back is fine.
    store.book(stored[2].id, student).await.unwrap();

    let mine = store
        .list_bookings(BookingFilter {
            student_id: Some(student),
            tutor_id: None,
        })
        .await
        .unwrap();
    let sessions: Vec<_> = mine.iter().map(|b| b.session_id).collect();
    assert_eq!(sessions, vec![stored[0].id, stored[2].id]);

    let for_tutor = store
        .list_bookings(BookingFilter {
            student_id: None,
            tutor_id: Some(stored[2].tutor_id),
        })
        .await
        .unwrap();
    assert_eq!(for_tutor.len(), 1);
    assert_eq!(for_tutor[0].session_id, stored[2].id);
}

#[tokio::test]
async fn insert_if_free_rejects_overlap() {
    let store = InMemorySessionStore::new();
    let tutor_id = Uuid::now_v7();
    store.insert_if_free(single(tutor_id, 12, 10)).await.unwrap();

    let mut clash = single(tutor_id, 12, 10);
    clash.start_time += TimeDelta::minutes(30);
    clash.end_time += TimeDelta::minutes(30);
    assert_eq!(
        store.insert_if_free(clash).await,
        Err(StoreError::Conflict("Time slot already booked".to_string()))
    );

    store.insert_if_free(single(tutor_id, 12, 11)).await.unwrap();
    assert_eq!(store.len().await, 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_for_one_slot_have_one_winner() {
    let store = InMemorySessionStore::new();
    let tutor_id = Uuid::now_v7();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.insert_if_free(single(tutor_id, 12, 10)).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn book_unknown_session_is_not_found() {
    let store = InMemorySessionStore::new();
    let id = Uuid::now_v7();
    assert_eq!(
        store.book(id, Uuid::now_v7()).await,
        Err(StoreError::NotFound(id))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_have_one_winner() {
    let store = InMemorySessionStore::new();
    let tutor_id = Uuid::now_v7();
    let id = store
        .insert_batch(vec![single(tutor_id, 12, 10)])
        .await
        .unwrap()[0]
        .id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.book(id, Uuid::now_v7()).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
