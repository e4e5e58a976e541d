use std::{env, error, fmt, path::PathBuf, result};

use model::company::{Company, CompanyRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

pub mod data_model;
pub mod queries;

pub const DEFAULT_DATABASE_PATH: &str = "database.db";

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl DatabaseConfig {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        let path = env::var("DB_FILE_PATH")
            .ok()
            .filter(|path| !path.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_owned());
        Self::new(path)
    }
}

#[derive(Debug)]
pub enum DatabaseError {
    NotFound,
    Other(Box<dyn error::Error + Send + Sync>),
}

impl error::Error for DatabaseError {}

impl fmt::Display for DatabaseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Row not found."),
            Self::Other(why) => write!(f, "Database error: {why}"),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(why: sqlx::Error) -> Self {
        queries::convert_error(why)
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(why: sqlx::migrate::MigrateError) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// The local establishment directory, stored in a single SQLite file.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Opens (creating if needed) the database file and makes sure the
    /// schema exists. Safe to call on a database that is already set up.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        log::info!("Opened database '{}'.", config.path.display());

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn insert_company(&self, company: &Company) -> Result<CompanyRecord> {
        queries::company::insert(&self.pool, company).await
    }

    /// Every stored company in the engine's natural row order.
    pub async fn companies(&self) -> Result<Vec<CompanyRecord>> {
        queries::company::get_all(&self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padaria() -> Company {
        Company {
            name: "Padaria Central".to_owned(),
            kind: "loja".to_owned(),
            address: "Rua XV, 10".to_owned(),
            email: Some("contato@padaria.example".to_owned()),
            phone: None,
            website: Some("https://padaria.example".to_owned()),
            notes: Some("Aceita desde 2023".to_owned()),
            accepts_lightning: true,
            accepts_onchain: false,
            accepts_contactless: true,
            verification_date: Some("2024-05-01".to_owned()),
            logo_filename: Some("1714557600000_logo.png".to_owned()),
        }
    }

    #[tokio::test]
    async fn inserted_company_is_listed_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let database = SqliteDatabase::connect(&DatabaseConfig::new(dir.path().join("db.sqlite")))
            .await
            .unwrap();

        let record = database.insert_company(&padaria()).await.unwrap();
        let companies = database.companies().await.unwrap();

        assert_eq!(companies, vec![record.clone()]);
        assert_eq!(record.company, padaria());
    }

    #[tokio::test]
    async fn ids_are_assigned_in_insertion_order() {
        let dir = tempfile::tempdir().unwrap();
        let database = SqliteDatabase::connect(&DatabaseConfig::new(dir.path().join("db.sqlite")))
            .await
            .unwrap();

        let first = database.insert_company(&padaria()).await.unwrap();
        let second = database
            .insert_company(&Company {
                name: "Bar do Zé".to_owned(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(second.id > first.id);
        let names = database
            .companies()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.company.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Padaria Central", "Bar do Zé"]);
    }

    #[tokio::test]
    async fn reconnecting_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig::new(dir.path().join("db.sqlite"));

        let database = SqliteDatabase::connect(&config).await.unwrap();
        database.insert_company(&padaria()).await.unwrap();
        database.pool().close().await;

        let database = SqliteDatabase::connect(&config).await.unwrap();
        assert_eq!(database.companies().await.unwrap().len(), 1);
    }
}
