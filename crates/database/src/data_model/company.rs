use model::company::{Company, CompanyRecord};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct CompanyRow {
    pub id: i64,
    pub nome: String,
    pub tipo: String,
    pub endereco: String,
    pub email: Option<String>,
    pub telefone: Option<String>,
    pub website: Option<String>,
    pub observacoes: Option<String>,
    pub aceita_lightning: Option<bool>,
    pub aceita_onchain: Option<bool>,
    pub aceita_contactless: Option<bool>,
    pub data_verificacao: Option<String>,
    pub logo_filename: Option<String>,
}

impl CompanyRow {
    pub fn to_model(self) -> CompanyRecord {
        CompanyRecord {
            id: self.id,
            company: Company {
                name: self.nome,
                kind: self.tipo,
                address: self.endereco,
                email: self.email,
                phone: self.telefone,
                website: self.website,
                notes: self.observacoes,
                accepts_lightning: self.aceita_lightning.unwrap_or(false),
                accepts_onchain: self.aceita_onchain.unwrap_or(false),
                accepts_contactless: self.aceita_contactless.unwrap_or(false),
                verification_date: self.data_verificacao,
                logo_filename: self.logo_filename,
            },
        }
    }
}
