mod common;

use common::*;
use quickcourt_backend::entities::{user_entity as users, RequestStatus, UserRole};
use quickcourt_backend::error::AppError;
use quickcourt_backend::models::CreateFacilityRequestRequest;
use quickcourt_backend::services::FacilityRequestService;
use sea_orm::EntityTrait;

fn invite(email: &str) -> CreateFacilityRequestRequest {
    CreateFacilityRequestRequest {
        email: email.to_string(),
        message: Some("Welcome aboard".to_string()),
    }
}

#[tokio::test]
async fn accepting_an_invitation_promotes_the_user() {
    let pool = setup_test_db().await;
    let service = FacilityRequestService::new(pool.clone());

    let admin = create_test_user(&pool, "admin@test.com", UserRole::Admin).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;

    let created = service
        .create(&current(&admin), invite("player@test.com"))
        .await
        .expect("Invitation should be created");
    assert_eq!(created.status, RequestStatus::Pending);

    // only the invitee may respond
    let outsider = create_test_user(&pool, "other@test.com", UserRole::Player).await;
    let denied = service.respond(&current(&outsider), created.id, true).await;
    assert!(matches!(denied, Err(AppError::PermissionDenied)));

    let accepted = service
        .respond(&current(&player), created.id, true)
        .await
        .expect("Invitee accept should succeed");
    assert_eq!(accepted.status, RequestStatus::Accepted);
    assert!(accepted.responded_at.is_some());

    let promoted = users::Entity::find_by_id(player.id)
        .one(&pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(promoted.role, UserRole::FacilityManager);

    // responses happen at most once
    let again = service.respond(&current(&player), created.id, false).await;
    assert!(matches!(again, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn duplicate_pending_invitations_are_rejected() {
    let pool = setup_test_db().await;
    let service = FacilityRequestService::new(pool.clone());

    let admin = create_test_user(&pool, "admin@test.com", UserRole::Admin).await;
    create_test_user(&pool, "player@test.com", UserRole::Player).await;

    service
        .create(&current(&admin), invite("player@test.com"))
        .await
        .expect("First invitation should succeed");

    let duplicate = service
        .create(&current(&admin), invite("player@test.com"))
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // inviting someone who already manages facilities makes no sense
    create_test_user(&pool, "manager@test.com", UserRole::FacilityManager).await;
    let pointless = service
        .create(&current(&admin), invite("manager@test.com"))
        .await;
    assert!(matches!(pointless, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn rejecting_leaves_the_role_alone_and_deletion_needs_pending() {
    let pool = setup_test_db().await;
    let service = FacilityRequestService::new(pool.clone());

    let admin = create_test_user(&pool, "admin@test.com", UserRole::Admin).await;
    let player = create_test_user(&pool, "player@test.com", UserRole::Player).await;

    let created = service
        .create(&current(&admin), invite("player@test.com"))
        .await
        .unwrap();

    let rejected = service
        .respond(&current(&player), created.id, false)
        .await
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);

    let unchanged = users::Entity::find_by_id(player.id)
        .one(&pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.role, UserRole::Player);

    // only pending invitations can be withdrawn
    let gone = service.delete(created.id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
}
