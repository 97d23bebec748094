use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use url::Url;
use uuid::Uuid;

/// Stored upload. Read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct File {
    pub id: Uuid,
    pub name: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

/// Avatar as rendered in a user profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Avatar {
    pub id: Uuid,
    pub path: String,
    pub url: String,
}

/// Builds public URLs for stored files: `<base>/files/<path>`
#[derive(Debug, Clone)]
pub struct FileUrls {
    base: Url,
}

impl FileUrls {
    pub fn new(public_url: &str) -> Result<Self, url::ParseError> {
        let mut base = Url::parse(public_url)?;
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base })
    }

    pub fn url_for(&self, path: &str) -> String {
        match self.base.join("files/").and_then(|files| files.join(path)) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}files/{}", self.base, path),
        }
    }

    pub fn avatar(&self, file: &File) -> Avatar {
        Avatar {
            id: file.id,
            path: file.path.clone(),
            url: self.url_for(&file.path),
        }
    }
}
