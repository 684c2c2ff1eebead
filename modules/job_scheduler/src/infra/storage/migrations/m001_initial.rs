use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teams::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teams::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Teams::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Uid).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::TeamId).string().null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Jobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Jobs::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Jobs::Date).string().not_null())
                    .col(ColumnDef::new(Jobs::Time).string().not_null())
                    .col(ColumnDef::new(Jobs::EstimatedTime).string().not_null())
                    .col(ColumnDef::new(Jobs::ContractNumber).string().not_null())
                    .col(ColumnDef::new(Jobs::ClientAddress).string().not_null())
                    .col(ColumnDef::new(Jobs::ClientPhone).string().not_null())
                    .col(ColumnDef::new(Jobs::WindowCount).integer().not_null())
                    .col(ColumnDef::new(Jobs::SquareMeters).double().not_null())
                    .col(ColumnDef::new(Jobs::Circumference).double().not_null())
                    .col(ColumnDef::new(Jobs::InnerSills).boolean().not_null().default(false))
                    .col(ColumnDef::new(Jobs::OuterSills).boolean().not_null().default(false))
                    .col(ColumnDef::new(Jobs::Finishing).boolean().not_null().default(false))
                    .col(ColumnDef::new(Jobs::Tape).boolean().not_null().default(false))
                    .col(ColumnDef::new(Jobs::Extras).boolean().not_null().default(false))
                    .col(ColumnDef::new(Jobs::Notes).text().not_null().default(""))
                    .col(ColumnDef::new(Jobs::Status).string().not_null())
                    .col(ColumnDef::new(Jobs::TeamId).string().not_null())
                    .col(ColumnDef::new(Jobs::TeamName).string().not_null())
                    .col(ColumnDef::new(Jobs::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Jobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_jobs_team_date")
                    .table(Jobs::Table)
                    .col(Jobs::TeamId)
                    .col(Jobs::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Teams::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Teams {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Uid,
    Email,
    Name,
    Role,
    TeamId,
    PasswordHash,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
    Date,
    Time,
    EstimatedTime,
    ContractNumber,
    ClientAddress,
    ClientPhone,
    WindowCount,
    SquareMeters,
    Circumference,
    InnerSills,
    OuterSills,
    Finishing,
    Tape,
    Extras,
    Notes,
    Status,
    TeamId,
    TeamName,
    CreatedBy,
    CreatedAt,
}
