mod common;

use common::*;
use quickcourt_backend::entities::{CardState, UserRole};
use quickcourt_backend::error::AppError;
use quickcourt_backend::models::CardStatus;

#[tokio::test]
async fn card_is_minted_on_every_fifth_completion() {
    let pool = setup_test_db().await;
    let loyalty = loyalty_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    for i in 1..=4 {
        let update = loyalty
            .record_completed_booking(player.id, venue.id)
            .await
            .unwrap();
        assert_eq!(update.booking_count, i);
        assert!(!update.card_earned, "No card before the milestone");
    }

    let fifth = loyalty
        .record_completed_booking(player.id, venue.id)
        .await
        .unwrap();
    assert_eq!(fifth.booking_count, 5);
    assert!(fifth.card_earned);
    let card = fifth.card.expect("Milestone update should carry the card");
    // percentage stays hidden until the card is scratched
    assert_eq!(card.discount_percentage, None);
    assert_eq!(card.status, CardStatus::Earned);

    let status = loyalty.status(player.id, venue.id).await.unwrap();
    assert_eq!(status.booking_count, 5);
    assert_eq!(status.bookings_to_next_reward, 5);
    assert_eq!(status.next_milestone, 10);
    assert_eq!(status.available_cards.len(), 1);
    assert!(status.scratched_cards.is_empty());

    // the tenth completion mints a second card, and only the tenth
    for _ in 0..4 {
        let update = loyalty
            .record_completed_booking(player.id, venue.id)
            .await
            .unwrap();
        assert!(!update.card_earned);
    }
    let tenth = loyalty
        .record_completed_booking(player.id, venue.id)
        .await
        .unwrap();
    assert!(tenth.card_earned);
    assert_eq!(tenth.booking_count, 10);
}

#[tokio::test]
async fn scratch_happens_at_most_once() {
    let pool = setup_test_db().await;
    let loyalty = loyalty_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let card = insert_card(&pool, player.id, venue.id, CardState::Earned, 30).await;

    let revealed = loyalty.scratch_card(player.id, card.id).await.unwrap();
    assert!([35, 45, 55].contains(&revealed.discount_percentage));

    let again = loyalty.scratch_card(player.id, card.id).await;
    assert!(matches!(again, Err(AppError::ValidationError(_))));

    let status = loyalty.status(player.id, venue.id).await.unwrap();
    assert_eq!(status.scratched_cards.len(), 1);
    assert!(status.available_cards.is_empty());
}

#[tokio::test]
async fn foreign_cards_are_invisible() {
    let pool = setup_test_db().await;
    let loyalty = loyalty_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let owner = create_test_user(&pool, "owner@test.com", UserRole::Player).await;
    let thief = create_test_user(&pool, "thief@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let card = insert_card(&pool, owner.id, venue.id, CardState::Earned, 30).await;

    let stolen = loyalty.scratch_card(thief.id, card.id).await;
    assert!(matches!(stolen, Err(AppError::NotFound(_))));

    // the owner's card is untouched
    let ok = loyalty.scratch_card(owner.id, card.id).await;
    assert!(ok.is_ok());
}

#[tokio::test]
async fn expired_cards_reject_both_transitions() {
    let pool = setup_test_db().await;
    let loyalty = loyalty_service(&pool);
    let bookings = booking_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let expired_earned = insert_card(&pool, player.id, venue.id, CardState::Earned, -1).await;
    let scratch = loyalty.scratch_card(player.id, expired_earned.id).await;
    assert!(matches!(scratch, Err(AppError::ValidationError(_))));

    let expired_scratched = insert_card(&pool, player.id, venue.id, CardState::Scratched, -1).await;
    let redeem = bookings
        .create_booking(
            &current(&player),
            quickcourt_backend::models::CreateBookingRequest {
                venue_id: venue.id,
                court_name: None,
                date: date_string(tomorrow()),
                start_time: "10:00".to_string(),
                end_time: "12:00".to_string(),
                notes: None,
                discount_card_id: Some(expired_scratched.id),
            },
        )
        .await;
    assert!(matches!(redeem, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn card_is_only_valid_at_its_venue() {
    let pool = setup_test_db().await;
    let bookings = booking_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let home = create_test_venue(&pool, manager.id, "Smash Arena").await;
    let away = create_test_venue(&pool, manager.id, "Volley Palace").await;

    let card = insert_card(&pool, player.id, home.id, CardState::Scratched, 30).await;

    let elsewhere = bookings
        .create_booking(
            &current(&player),
            quickcourt_backend::models::CreateBookingRequest {
                venue_id: away.id,
                court_name: None,
                date: date_string(tomorrow()),
                start_time: "10:00".to_string(),
                end_time: "12:00".to_string(),
                notes: None,
                discount_card_id: Some(card.id),
            },
        )
        .await;
    assert!(matches!(elsewhere, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn listed_cards_report_derived_status() {
    let pool = setup_test_db().await;
    let loyalty = loyalty_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    insert_card(&pool, player.id, venue.id, CardState::Earned, 30).await;
    insert_card(&pool, player.id, venue.id, CardState::Scratched, 30).await;
    insert_card(&pool, player.id, venue.id, CardState::Earned, -1).await;

    let cards = loyalty.list_cards(player.id).await.unwrap();
    assert_eq!(cards.len(), 3);

    let count = |status: CardStatus| cards.iter().filter(|c| c.status == status).count();
    assert_eq!(count(CardStatus::Earned), 1);
    assert_eq!(count(CardStatus::Scratched), 1);
    assert_eq!(count(CardStatus::Expired), 1);

    // hidden until scratched, visible afterwards
    for card in &cards {
        match card.status {
            CardStatus::Earned | CardStatus::Expired => {
                assert_eq!(card.discount_percentage, None)
            }
            CardStatus::Scratched | CardStatus::Used => {
                assert!(card.discount_percentage.is_some())
            }
        }
    }
}
