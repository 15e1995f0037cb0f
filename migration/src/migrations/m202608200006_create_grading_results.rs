use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200006_create_grading_results"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("grading_results"))
                    .if_not_exists()
                    // One result per submission; a re-grade overwrites the row.
                    .col(
                        ColumnDef::new(Alias::new("submission_id"))
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alias::new("score")).double().not_null())
                    .col(ColumnDef::new(Alias::new("subject")).string().null())
                    .col(ColumnDef::new(Alias::new("feedback")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("strengths"))
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("suggestions"))
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("correct_answers"))
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("total_questions"))
                            .integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("graded_by"))
                            .string()
                            .not_null()
                            .default("Gemini AI"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("graded_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grading_submission")
                            .from(Alias::new("grading_results"), Alias::new("submission_id"))
                            .to(Alias::new("homework_submissions"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("grading_results")).to_owned())
            .await
    }
}
