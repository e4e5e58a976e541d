use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A self-registered establishment of the local directory. Field names on
/// the wire follow the registration form of the website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Company {
    #[serde(rename = "nome")]
    pub name: String,

    #[serde(rename = "tipo")]
    pub kind: String,

    #[serde(rename = "endereco")]
    pub address: String,

    pub email: Option<String>,

    #[serde(rename = "telefone")]
    pub phone: Option<String>,

    pub website: Option<String>,

    #[serde(rename = "observacoes")]
    pub notes: Option<String>,

    #[serde(rename = "aceita_lightning")]
    pub accepts_lightning: bool,

    #[serde(rename = "aceita_onchain")]
    pub accepts_onchain: bool,

    #[serde(rename = "aceita_contactless")]
    pub accepts_contactless: bool,

    #[serde(rename = "data_verificacao")]
    pub verification_date: Option<String>,

    pub logo_filename: Option<String>,
}

/// A stored company together with the key the database assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompanyRecord {
    pub id: i64,
    #[serde(flatten)]
    pub company: Company,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_flat_with_form_names() {
        let record = CompanyRecord {
            id: 3,
            company: Company {
                name: "Padaria".to_owned(),
                kind: "loja".to_owned(),
                address: "Rua B, 2".to_owned(),
                accepts_lightning: true,
                ..Default::default()
            },
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 3);
        assert_eq!(value["nome"], "Padaria");
        assert_eq!(value["tipo"], "loja");
        assert_eq!(value["aceita_lightning"], true);
        assert_eq!(value["aceita_onchain"], false);
        assert!(value["logo_filename"].is_null());
    }
}
