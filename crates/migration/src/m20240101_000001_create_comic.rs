//! Create `comic` table.
//! Ids come from a BIGSERIAL so they are sequential and never reused.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comic::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comic::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(text(Comic::Title).not_null())
                    .col(text(Comic::Author).not_null())
                    .col(text(Comic::Publisher).not_null())
                    .col(integer(Comic::Year).not_null())
                    .col(text(Comic::Genre).not_null())
                    .col(text(Comic::Description).not_null())
                    .col(double(Comic::Price).not_null())
                    .col(boolean(Comic::InStock).not_null())
                    .col(timestamp_with_time_zone(Comic::CreatedAt).not_null())
                    .col(ColumnDef::new(Comic::UpdatedAt).timestamp_with_time_zone().null())
                    .check(Expr::col(Comic::Year).gte(1900))
                    .check(Expr::col(Comic::Price).between(0.0, 1000.0))
                    .to_owned(),
            )
            .await?;

        // Listing is newest-first
        manager
            .create_index(
                Index::create()
                    .name("idx_comic_created_at")
                    .table(Comic::Table)
                    .col(Comic::CreatedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Comic::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Comic {
    Table,
    Id,
    Title,
    Author,
    Publisher,
    Year,
    Genre,
    Description,
    Price,
    InStock,
    CreatedAt,
    UpdatedAt,
}
