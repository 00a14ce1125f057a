use sea_orm_migration::prelude::*;

/// Loyalty records (per user+venue completed-booking counter)
#[derive(DeriveIden)]
enum LoyaltyRecords {
    Table,
    Id,
    UserId,
    VenueId,
    BookingCount,
    CreatedAt,
    UpdatedAt,
}

/// Discount cards minted at loyalty milestones
#[derive(DeriveIden)]
enum DiscountCards {
    Table,
    Id,
    UserId,
    VenueId,
    CardCode,
    DiscountPercentage,
    State,
    EarnedAt,
    ScratchedAt,
    UsedAt,
    ExpiresAt,
    BookingId,
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
                    .table(LoyaltyRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LoyaltyRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRecords::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRecords::VenueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRecords::BookingCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(LoyaltyRecords::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // one record per user+venue pair
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_loyalty_records_user_venue_unique")
                    .table(LoyaltyRecords::Table)
                    .col(LoyaltyRecords::UserId)
                    .col(LoyaltyRecords::VenueId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DiscountCards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DiscountCards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DiscountCards::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscountCards::VenueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiscountCards::CardCode).string().not_null())
                    .col(
                        ColumnDef::new(DiscountCards::DiscountPercentage)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DiscountCards::State)
                            .string()
                            .not_null()
                            .default("earned"),
                    )
                    .col(
                        ColumnDef::new(DiscountCards::EarnedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiscountCards::ScratchedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(DiscountCards::UsedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(DiscountCards::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DiscountCards::BookingId).big_integer())
                    .col(
                        ColumnDef::new(DiscountCards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DiscountCards::UpdatedAt)
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
                    .name("idx_discount_cards_code_unique")
                    .table(DiscountCards::Table)
                    .col(DiscountCards::CardCode)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_discount_cards_user")
                    .table(DiscountCards::Table)
                    .col(DiscountCards::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DiscountCards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LoyaltyRecords::Table).to_owned())
            .await?;
        Ok(())
    }
}
