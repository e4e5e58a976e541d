use std::collections::HashMap;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use database::SqliteDatabase;
use model::company::{Company, CompanyRecord};
use serde_json::json;

use crate::{upload::LogoStore, RouteResult, WebState};

const LOGO_FIELD: &str = "logo";

pub(crate) fn routes(logos: &LogoStore) -> Router<WebState> {
    Router::new().route(
        "/api/estabelecimentos",
        get(list)
            .post(create)
            .layer(DefaultBodyLimit::max(logos.max_bytes())),
    )
}

/// Text fields and the optional logo of one registration form.
#[derive(Debug, Default)]
struct CompanyForm {
    fields: HashMap<String, String>,
    logo: Option<(String, Vec<u8>)>,
}

impl CompanyForm {
    async fn read(mut multipart: Multipart) -> RouteResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };
            if name == LOGO_FIELD {
                let file_name = field.file_name().map(str::to_owned);
                let contents = field.bytes().await?;
                if let Some(file_name) = file_name.filter(|file_name| !file_name.is_empty()) {
                    form.logo = Some((file_name, contents.to_vec()));
                }
            } else {
                form.fields.insert(name, field.text().await?);
            }
        }
        Ok(form)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn flag(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|value| value == "true")
    }

    fn company(&self, logo_filename: Option<String>) -> Company {
        Company {
            name: self.text("nome").unwrap_or_default(),
            kind: self.text("tipo").unwrap_or_default(),
            address: self.text("endereco").unwrap_or_default(),
            email: self.text("email"),
            phone: self.text("telefone"),
            website: self.text("website"),
            notes: self.text("observacoes"),
            accepts_lightning: self.flag("aceita_lightning"),
            accepts_onchain: self.flag("aceita_onchain"),
            accepts_contactless: self.flag("aceita_contactless"),
            verification_date: self.text("data_verificacao"),
            logo_filename,
        }
    }
}

async fn create(
    State(database): State<SqliteDatabase>,
    State(logos): State<LogoStore>,
    multipart: Multipart,
) -> RouteResult<impl IntoResponse> {
    let form = CompanyForm::read(multipart).await?;

    let logo_filename = match &form.logo {
        Some((file_name, contents)) => Some(logos.save(file_name, contents).await?),
        None => None,
    };

    if let Err(why) = database
        .insert_company(&form.company(logo_filename.clone()))
        .await
    {
        if let Some(logo_filename) = &logo_filename {
            if let Err(remove_error) = logos.remove(logo_filename).await {
                log::error!("Could not remove orphaned logo '{logo_filename}': {remove_error}");
            }
        }
        return Err(why.into());
    }

    Ok(Json(json!({
        "success": true,
        "message": "Establishment registered successfully."
    })))
}

async fn list(State(database): State<SqliteDatabase>) -> RouteResult<Json<Vec<CompanyRecord>>> {
    Ok(Json(database.companies().await?))
}
