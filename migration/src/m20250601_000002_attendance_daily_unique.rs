use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Attendance {
    Table,
    AttendeeId,
    Date,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 每个签到人每个自然日最多一条记录，由存储层保证（重复插入返回唯一约束错误）
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attendance_attendee_date_unique")
                    .table(Attendance::Table)
                    .col(Attendance::AttendeeId)
                    .col(Attendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_attendance_attendee_date_unique")
                    .table(Attendance::Table)
                    .to_owned(),
            )
            .await
    }
}
