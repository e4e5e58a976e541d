use model::company::{Company, CompanyRecord};
use sqlx::{Executor, Sqlite};
use utility::let_also::LetAlso;

use crate::data_model::company::CompanyRow;

use super::convert_error;

pub async fn get_all<'c, E>(executor: E) -> crate::Result<Vec<CompanyRecord>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let results: Vec<CompanyRow> = sqlx::query_as("SELECT * FROM estabelecimentos;")
        .fetch_all(executor)
        .await
        .map_err(convert_error)?;
    results
        .into_iter()
        .map(CompanyRow::to_model)
        .collect::<Vec<_>>()
        .let_owned(Ok)
}

pub async fn insert<'c, E>(executor: E, company: &Company) -> crate::Result<CompanyRecord>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_as(
        "
        INSERT INTO estabelecimentos(
            nome,
            tipo,
            endereco,
            email,
            telefone,
            website,
            observacoes,
            aceita_lightning,
            aceita_onchain,
            aceita_contactless,
            data_verificacao,
            logo_filename
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *;
        ",
    )
    .bind(&company.name)
    .bind(&company.kind)
    .bind(&company.address)
    .bind(&company.email)
    .bind(&company.phone)
    .bind(&company.website)
    .bind(&company.notes)
    .bind(company.accepts_lightning)
    .bind(company.accepts_onchain)
    .bind(company.accepts_contactless)
    .bind(&company.verification_date)
    .bind(&company.logo_filename)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: CompanyRow| row.to_model())
}
