use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GameHistories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameHistories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameHistories::StudentId).uuid().not_null())
                    .col(ColumnDef::new(GameHistories::WordId).uuid().not_null())
                    .col(ColumnDef::new(GameHistories::Word).string().not_null())
                    .col(ColumnDef::new(GameHistories::Category).string().not_null())
                    .col(
                        ColumnDef::new(GameHistories::IsSuccess)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameHistories::Attempts)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameHistories::WrongLetters)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameHistories::PlayedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // History reads are per student, optionally bounded by played_at
        manager
            .create_index(
                Index::create()
                    .name("idx_game_histories_student_id")
                    .table(GameHistories::Table)
                    .col(GameHistories::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_histories_played_at")
                    .table(GameHistories::Table)
                    .col(GameHistories::PlayedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GameHistories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GameHistories {
    Table,
    Id,
    StudentId,
    WordId,
    Word,
    Category,
    IsSuccess,
    Attempts,
    WrongLetters,
    PlayedAt,
}
