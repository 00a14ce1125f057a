mod common;

use common::*;
use quickcourt_backend::entities::{BookingStatus, UserRole};
use quickcourt_backend::error::AppError;
use quickcourt_backend::models::CreateBookingRequest;

fn request(venue_id: i64, date: &str, start: &str, end: &str) -> CreateBookingRequest {
    CreateBookingRequest {
        venue_id,
        court_name: None,
        date: date.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        notes: None,
        discount_card_id: None,
    }
}

#[tokio::test]
async fn overlapping_bookings_are_rejected() {
    let pool = setup_test_db().await;
    let service = booking_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let date = date_string(tomorrow());
    let first = service
        .create_booking(&current(&player), request(venue.id, &date, "10:00", "12:00"))
        .await
        .expect("First booking should succeed");
    assert_eq!(first.booking.status, BookingStatus::Booked);
    assert_eq!(first.booking.total_amount, 1000); // 2h at 500/hr
    assert!(first.discount_applied.is_none());

    let clash = service
        .create_booking(&current(&player), request(venue.id, &date, "11:00", "13:00"))
        .await;
    assert!(matches!(clash, Err(AppError::Conflict(_))));

    // back-to-back is allowed, the interval is half-open
    let adjacent = service
        .create_booking(&current(&player), request(venue.id, &date, "12:00", "14:00"))
        .await;
    assert!(adjacent.is_ok());
}

#[tokio::test]
async fn named_courts_only_clash_with_themselves() {
    let pool = setup_test_db().await;
    let service = booking_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;
    create_test_court(&pool, venue.id, "Court 1", None).await;
    create_test_court(&pool, venue.id, "Court 2", Some(600)).await;

    let date = date_string(tomorrow());
    let mut req = request(venue.id, &date, "10:00", "11:00");
    req.court_name = Some("Court 1".to_string());
    service
        .create_booking(&current(&player), req)
        .await
        .expect("Court 1 booking should succeed");

    // same window on a different court is fine, and the court rate wins
    let mut req = request(venue.id, &date, "10:00", "11:00");
    req.court_name = Some("Court 2".to_string());
    let other = service
        .create_booking(&current(&player), req)
        .await
        .expect("Court 2 booking should succeed");
    assert_eq!(other.booking.total_amount, 600);

    // an unnamed booking holds the whole venue, so it hits both courts
    let whole_venue = service
        .create_booking(&current(&player), request(venue.id, &date, "10:30", "11:30"))
        .await;
    assert!(matches!(whole_venue, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn window_validation_rejects_bad_slots() {
    let pool = setup_test_db().await;
    let service = booking_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let date = date_string(tomorrow());

    let inverted = service
        .create_booking(&current(&player), request(venue.id, &date, "12:00", "10:00"))
        .await;
    assert!(matches!(inverted, Err(AppError::ValidationError(_))));

    // venue opens at 06:00
    let too_early = service
        .create_booking(&current(&player), request(venue.id, &date, "05:00", "07:00"))
        .await;
    assert!(matches!(too_early, Err(AppError::ValidationError(_))));

    let past = service
        .create_booking(
            &current(&player),
            request(venue.id, &date_string(yesterday()), "10:00", "12:00"),
        )
        .await;
    assert!(matches!(past, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn cancel_is_terminal_and_never_touches_loyalty() {
    let pool = setup_test_db().await;
    let service = booking_service(&pool);
    let loyalty = loyalty_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let created = service
        .create_booking(
            &current(&player),
            request(venue.id, &date_string(tomorrow()), "10:00", "12:00"),
        )
        .await
        .expect("Booking should succeed");

    let stranger = create_test_user(&pool, "other@test.com", UserRole::Player).await;
    let denied = service
        .cancel_booking(&current(&stranger), created.booking.id)
        .await;
    assert!(matches!(denied, Err(AppError::PermissionDenied)));

    let cancelled = service
        .cancel_booking(&current(&player), created.booking.id)
        .await
        .expect("Owner cancel should succeed");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // second cancel finds nothing in 'booked'
    let again = service
        .cancel_booking(&current(&player), created.booking.id)
        .await;
    assert!(matches!(again, Err(AppError::ValidationError(_))));

    // completing a cancelled booking is also rejected
    let complete = service
        .complete_booking(&current(&manager), created.booking.id)
        .await;
    assert!(matches!(complete, Err(AppError::ValidationError(_))));

    let status = loyalty.status(player.id, venue.id).await.unwrap();
    assert_eq!(status.booking_count, 0);
}

#[tokio::test]
async fn complete_increments_loyalty_once() {
    let pool = setup_test_db().await;
    let service = booking_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let created = service
        .create_booking(
            &current(&player),
            request(venue.id, &date_string(tomorrow()), "10:00", "12:00"),
        )
        .await
        .expect("Booking should succeed");

    // players cannot complete bookings
    let denied = service
        .complete_booking(&current(&player), created.booking.id)
        .await;
    assert!(matches!(denied, Err(AppError::PermissionDenied)));

    // a manager who does not own the venue cannot either
    let other_manager =
        create_test_user(&pool, "other-manager@test.com", UserRole::FacilityManager).await;
    let denied = service
        .complete_booking(&current(&other_manager), created.booking.id)
        .await;
    assert!(matches!(denied, Err(AppError::PermissionDenied)));

    let completed = service
        .complete_booking(&current(&manager), created.booking.id)
        .await
        .expect("Owner manager complete should succeed");
    assert_eq!(completed.booking.status, BookingStatus::Completed);
    assert_eq!(completed.loyalty_update.booking_count, 1);
    assert!(!completed.loyalty_update.card_earned);

    // transitions out of 'booked' happen at most once
    let again = service
        .complete_booking(&current(&manager), created.booking.id)
        .await;
    assert!(matches!(again, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn auto_complete_sweep_is_idempotent() {
    let pool = setup_test_db().await;
    let service = booking_service(&pool);
    let loyalty = loyalty_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    insert_booking(
        &pool,
        player.id,
        venue.id,
        yesterday(),
        time(10, 0),
        time(12, 0),
        BookingStatus::Booked,
    )
    .await;
    insert_booking(
        &pool,
        player.id,
        venue.id,
        yesterday(),
        time(14, 0),
        time(16, 0),
        BookingStatus::Booked,
    )
    .await;
    // future booking must be left alone
    let future = insert_booking(
        &pool,
        player.id,
        venue.id,
        tomorrow(),
        time(10, 0),
        time(12, 0),
        BookingStatus::Booked,
    )
    .await;

    let summary = service.auto_complete_past_due().await.unwrap();
    assert_eq!(summary.completed_bookings, 2);
    assert_eq!(summary.rewards_earned, 0);

    let status = loyalty.status(player.id, venue.id).await.unwrap();
    assert_eq!(status.booking_count, 2);

    // second sweep finds nothing
    let summary = service.auto_complete_past_due().await.unwrap();
    assert_eq!(summary.completed_bookings, 0);

    let untouched = service
        .get_user_bookings(player.id, &Default::default())
        .await;
    let _ = future;
    let page = untouched.unwrap();
    let still_booked = page
        .items
        .iter()
        .filter(|b| b.status == BookingStatus::Booked)
        .count();
    assert_eq!(still_booked, 1);
}

#[tokio::test]
async fn discount_card_prices_the_booking_and_is_spent() {
    let pool = setup_test_db().await;
    // fixed 45% tier keeps the arithmetic deterministic
    let service = booking_service_fixed_tier(&pool);
    let loyalty = loyalty_service_fixed_tier(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    // five accrual ticks mint one card
    let mut card_id = None;
    for _ in 0..5 {
        let update = loyalty
            .record_completed_booking(player.id, venue.id)
            .await
            .unwrap();
        if update.card_earned {
            card_id = update.card.map(|c| c.id);
        }
    }
    let card_id = card_id.expect("Fifth completion should mint a card");

    // an unscratched card cannot be redeemed
    let mut req = request(venue.id, &date_string(tomorrow()), "18:00", "20:00");
    req.discount_card_id = Some(card_id);
    let unscratched = service.create_booking(&current(&player), req).await;
    assert!(matches!(unscratched, Err(AppError::ValidationError(_))));

    let revealed = loyalty.scratch_card(player.id, card_id).await.unwrap();
    assert_eq!(revealed.discount_percentage, 45);

    let mut req = request(venue.id, &date_string(tomorrow()), "18:00", "20:00");
    req.discount_card_id = Some(card_id);
    let booked = service
        .create_booking(&current(&player), req)
        .await
        .expect("Discounted booking should succeed");

    let applied = booked.discount_applied.expect("Breakdown should be present");
    assert_eq!(applied.original, 1000);
    assert_eq!(applied.discount, 450);
    assert_eq!(applied.final_amount, 550);
    assert_eq!(applied.percentage, 45);
    assert_eq!(booked.booking.total_amount, 550);
    assert_eq!(booked.booking.discount_card_id, Some(card_id));

    // the card is spent; a second redemption must fail and leave no booking
    let mut req = request(venue.id, &date_string(tomorrow()), "20:00", "21:00");
    req.discount_card_id = Some(card_id);
    let reused = service.create_booking(&current(&player), req).await;
    assert!(reused.is_err());

    let page = service
        .get_user_bookings(player.id, &Default::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 1, "Failed redemption must not leave a booking");
}
