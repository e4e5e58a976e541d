use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use chrono::Utc;
use tokio::{fs, io::AsyncWriteExt};

const FALLBACK_FILENAME: &str = "logo";

/// Directory holding uploaded company logos.
#[derive(Debug, Clone)]
pub struct LogoStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl LogoStore {
    pub fn new<P: Into<PathBuf>>(dir: P, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Largest accepted request body for an upload.
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub async fn prepare(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }

    /// Stores `contents` as `<unix-millis>_<sanitized name>` and returns the
    /// stored file name. Existing files are never overwritten: on collision a
    /// `-<n>` counter is inserted before the extension.
    pub async fn save(&self, original_name: &str, contents: &[u8]) -> io::Result<String> {
        let base = format!(
            "{}_{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_name)
        );

        let mut attempt = 0;
        loop {
            let name = with_counter(&base, attempt);
            let path = self.dir.join(&name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    if let Err(why) = file.write_all(contents).await {
                        drop(file);
                        let _ = fs::remove_file(&path).await;
                        return Err(why);
                    }
                    file.flush().await?;
                    log::info!("Stored logo '{}'.", path.display());
                    return Ok(name);
                }
                Err(why) if why.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(why) => return Err(why),
            }
        }
    }

    pub async fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.dir.join(name)).await
    }
}

/// Keeps only the last path component and replaces everything but ASCII
/// letters, digits, `.`, `-` and `_`.
pub fn sanitize_filename(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let sanitized = name
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' | '_' => c,
            _ => '_',
        })
        .collect::<String>();
    let sanitized = sanitized.trim_start_matches('.');
    if sanitized.is_empty() {
        FALLBACK_FILENAME.to_owned()
    } else {
        sanitized.to_owned()
    }
}

fn with_counter(name: &str, counter: usize) -> String {
    if counter == 0 {
        return name.to_owned();
    }
    match name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem}-{counter}.{extension}"),
        _ => format!("{name}-{counter}"),
    }
}
