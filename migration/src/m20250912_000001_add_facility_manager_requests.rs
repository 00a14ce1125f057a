use sea_orm_migration::prelude::*;

/// Admin-initiated invitations promoting a user to facility_manager.
#[derive(DeriveIden)]
enum FacilityManagerRequests {
    Table,
    Id,
    UserId,
    InvitedBy,
    Status,
    Message,
    RespondedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FacilityManagerRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FacilityManagerRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FacilityManagerRequests::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FacilityManagerRequests::InvitedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FacilityManagerRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(FacilityManagerRequests::Message).text())
                    .col(
                        ColumnDef::new(FacilityManagerRequests::RespondedAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(FacilityManagerRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(FacilityManagerRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_facility_manager_requests_user")
                    .table(FacilityManagerRequests::Table)
                    .col(FacilityManagerRequests::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(FacilityManagerRequests::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
