mod common;

use common::*;
use quickcourt_backend::entities::{
    court_entity as courts, discount_card_entity as cards, loyalty_record_entity as loyalty,
    venue_entity as venues, BookingStatus, CardState, UserRole,
};
use quickcourt_backend::error::AppError;
use quickcourt_backend::services::VenueService;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

#[tokio::test]
async fn venue_deletion_waits_for_open_bookings_and_leaves_no_orphans() {
    let pool = setup_test_db().await;
    let venue_service = VenueService::new(pool.clone());
    let booking_service = booking_service(&pool);
    let loyalty_service = loyalty_service(&pool);

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    create_test_court(&pool, venue.id, "Court A", None).await;
    loyalty_service
        .record_completed_booking(player.id, venue.id)
        .await
        .unwrap();
    insert_card(&pool, player.id, venue.id, CardState::Earned, 30).await;

    let open = insert_booking(
        &pool,
        player.id,
        venue.id,
        tomorrow(),
        time(10, 0),
        time(12, 0),
        BookingStatus::Booked,
    )
    .await;

    let blocked = venue_service.delete_venue(&current(&manager), venue.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    booking_service
        .cancel_booking(&current(&player), open.id)
        .await
        .unwrap();

    venue_service
        .delete_venue(&current(&manager), venue.id)
        .await
        .expect("Deletion should succeed once no booking is open");

    assert!(venues::Entity::find_by_id(venue.id)
        .one(&pool)
        .await
        .unwrap()
        .is_none());

    let leftover_courts = courts::Entity::find()
        .filter(courts::Column::VenueId.eq(venue.id))
        .all(&pool)
        .await
        .unwrap();
    assert!(leftover_courts.is_empty());

    let leftover_records = loyalty::Entity::find()
        .filter(loyalty::Column::VenueId.eq(venue.id))
        .all(&pool)
        .await
        .unwrap();
    assert!(leftover_records.is_empty());

    let leftover_cards = cards::Entity::find()
        .filter(cards::Column::VenueId.eq(venue.id))
        .all(&pool)
        .await
        .unwrap();
    assert!(leftover_cards.is_empty());
}

#[tokio::test]
async fn only_the_owner_or_an_admin_deletes_a_venue() {
    let pool = setup_test_db().await;
    let venue_service = VenueService::new(pool.clone());

    let manager = create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let rival = create_test_user(&pool, "rival@test.com", UserRole::FacilityManager).await;
    let admin = create_test_user(&pool, "admin@test.com", UserRole::Admin).await;
    let venue = create_test_venue(&pool, manager.id, "Smash Arena").await;

    let denied = venue_service.delete_venue(&current(&rival), venue.id).await;
    assert!(matches!(denied, Err(AppError::PermissionDenied)));

    venue_service
        .delete_venue(&current(&admin), venue.id)
        .await
        .expect("Admin should be able to delete any venue");
}
