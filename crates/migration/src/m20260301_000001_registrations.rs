//! Registration rows, mirroring the hosted `inscricoes` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Inscricoes {
    Table,
    Id,
    Nome,
    Whatsapp,
    Sexo,
    Idade,
    TamanhoCamisa,
    StatusPagamento,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Inscricoes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Inscricoes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Inscricoes::Nome).string().not_null())
                    .col(ColumnDef::new(Inscricoes::Whatsapp).string().not_null())
                    .col(ColumnDef::new(Inscricoes::Sexo).string().not_null())
                    .col(ColumnDef::new(Inscricoes::Idade).integer().not_null())
                    .col(ColumnDef::new(Inscricoes::TamanhoCamisa).string().not_null())
                    .col(
                        ColumnDef::new(Inscricoes::StatusPagamento)
                            .string()
                            .not_null()
                            .default("pendente"),
                    )
                    .col(
                        ColumnDef::new(Inscricoes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Inscricoes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-inscricoes-created_at")
                    .table(Inscricoes::Table)
                    .col(Inscricoes::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Inscricoes::Table).to_owned())
            .await
    }
}
