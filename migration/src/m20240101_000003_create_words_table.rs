use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Words::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Words::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Words::Word).string().not_null())
                    .col(ColumnDef::new(Words::Category).string().not_null())
                    .col(ColumnDef::new(Words::Difficulty).integer().not_null())
                    .col(ColumnDef::new(Words::CourseId).uuid().not_null())
                    .col(ColumnDef::new(Words::TeacherId).uuid().not_null())
                    .col(
                        ColumnDef::new(Words::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Game starts select by course, teacher, or both
        manager
            .create_index(
                Index::create()
                    .name("idx_words_course_id")
                    .table(Words::Table)
                    .col(Words::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_words_teacher_id")
                    .table(Words::Table)
                    .col(Words::TeacherId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Words::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Words {
    Table,
    Id,
    Word,
    Category,
    Difficulty,
    CourseId,
    TeacherId,
    CreatedAt,
}
