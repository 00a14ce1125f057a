use sea_orm_migration::prelude::*;

/// Denylist slots a facility manager blocks off (maintenance, private events).
/// Consulted by the booking conflict check alongside existing bookings.
#[derive(DeriveIden)]
enum TimeSlotBlocks {
    Table,
    Id,
    VenueId,
    CourtName,
    Date,
    StartTime,
    EndTime,
    Reason,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TimeSlotBlocks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeSlotBlocks::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TimeSlotBlocks::VenueId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimeSlotBlocks::CourtName).string())
                    .col(ColumnDef::new(TimeSlotBlocks::Date).date().not_null())
                    .col(ColumnDef::new(TimeSlotBlocks::StartTime).time().not_null())
                    .col(ColumnDef::new(TimeSlotBlocks::EndTime).time().not_null())
                    .col(ColumnDef::new(TimeSlotBlocks::Reason).text())
                    .col(
                        ColumnDef::new(TimeSlotBlocks::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimeSlotBlocks::CreatedAt)
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
                    .name("idx_time_slot_blocks_venue_date")
                    .table(TimeSlotBlocks::Table)
                    .col(TimeSlotBlocks::VenueId)
                    .col(TimeSlotBlocks::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeSlotBlocks::Table).to_owned())
            .await?;
        Ok(())
    }
}
