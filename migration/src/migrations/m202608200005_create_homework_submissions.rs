use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202608200005_create_homework_submissions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // homework_submissions
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("homework_submissions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("student_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("attendance_event_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("image_count"))
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Alias::new("submitted_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Alias::new("attempts"))
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Alias::new("academy_id")).big_integer().null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hw_sub_event")
                            .from(
                                Alias::new("homework_submissions"),
                                Alias::new("attendance_event_id"),
                            )
                            .to(Alias::new("attendance_events"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The sweep scans by status + age.
        manager
            .create_index(
                Index::create()
                    .name("idx_hw_sub_status_submitted")
                    .table(Alias::new("homework_submissions"))
                    .col(Alias::new("status"))
                    .col(Alias::new("submitted_at"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_hw_sub_student")
                    .table(Alias::new("homework_submissions"))
                    .col(Alias::new("student_id"))
                    .to_owned(),
            )
            .await?;

        // homework_images
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("homework_images"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("submission_id"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("image_index"))
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("image_data")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .primary_key(
                        Index::create()
                            .col(Alias::new("submission_id"))
                            .col(Alias::new("image_index")),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hw_img_submission")
                            .from(Alias::new("homework_images"), Alias::new("submission_id"))
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
            .drop_table(Table::drop().table(Alias::new("homework_images")).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(Alias::new("homework_submissions"))
                    .to_owned(),
            )
            .await
    }
}
