//! Write a saved photo back out as a file.

use camino::{Utf8Path, Utf8PathBuf};
use entity::photo;
use thiserror::Error;

use crate::error::StoreError;

/// Exporting sits outside the store, so its failures get their own type.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Unable to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// `<name>.jpg`, with characters that can't appear in a file name replaced.
pub fn file_name(photo: &photo::Model) -> String {
    let stem: String = photo
        .name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let stem = match stem.trim() {
        "" | "." | ".." => format!("photo-{}", photo.id),
        stem => stem.to_owned(),
    };
    format!("{stem}.jpg")
}

/// Write the image bytes into `directory`, replacing any file of the same name.
#[tracing::instrument(name = "Exporting photo", skip(photo), fields(id = photo.id))]
pub async fn export_photo(
    photo: &photo::Model,
    directory: &Utf8Path,
) -> Result<Utf8PathBuf, ExportError> {
    let destination = directory.join(file_name(photo));
    if let Err(source) = tokio::fs::write(&destination, &photo.blob).await {
        tracing::error!("Unable to write {destination}: {source}");
        return Err(ExportError::Write {
            path: destination,
            source,
        });
    }
    tracing::info!("Exported photo to {destination}");
    Ok(destination)
}
