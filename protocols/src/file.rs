//! `file://` handler. A directory is treated as a generated listing so
//! that recursion into a local tree works the same way HTML recursion
//! does: a directory becomes a tiny HTML document of anchors, handed back
//! as `content` so the shared HTML extractor in `linkchecker-extract` can
//! walk it without a separate code path.

use std::path::{Path, PathBuf};
use std::time::Instant;

use linkchecker_types::WarningTag;
use url::Url;

use crate::common::CheckOutcome;
use crate::errors::ProtocolError;
use crate::http::CheckVerdict;

pub struct FileHandler;

impl FileHandler {
    /// # Errors
    /// [`ProtocolError::UrlParse`] if `canonical_url` isn't a valid `file:`
    /// URL (should not happen — normalization already validated it).
    pub async fn check(&self, canonical_url: &str) -> Result<(CheckOutcome, CheckVerdict), ProtocolError> {
        let started = Instant::now();
        let url = Url::parse(canonical_url)?;
        let path = url
            .to_file_path()
            .map_err(|()| ProtocolError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a filesystem path")))?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) => {
                return Ok((
                    CheckOutcome {
                        duration: started.elapsed(),
                        ..CheckOutcome::default()
                    },
                    CheckVerdict::invalid(WarningTag::UrlUnreachable, err.to_string()),
                ));
            }
        };

        if metadata.is_dir() {
            let listing = directory_listing(&path).await?;
            return Ok((
                CheckOutcome {
                    content: Some(listing),
                    content_type: Some("text/html".to_string()),
                    size: Some(metadata.len()),
                    duration: started.elapsed(),
                    final_url: Some(canonical_url.to_string()),
                },
                CheckVerdict::Valid,
            ));
        }

        let content_type = guess_content_type(&path);
        let should_read = content_type.as_deref() == Some("text/html") || content_type.as_deref() == Some("text/css");
        let content = if should_read {
            tokio::fs::read_to_string(&path).await.ok()
        } else {
            None
        };

        Ok((
            CheckOutcome {
                content,
                content_type,
                size: Some(metadata.len()),
                duration: started.elapsed(),
                final_url: Some(canonical_url.to_string()),
            },
            CheckVerdict::Valid,
        ))
    }
}

async fn directory_listing(dir: &Path) -> Result<String, ProtocolError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.path());
    }
    names.sort();

    let mut html = String::from("<html><body><ul>\n");
    for path in names {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        html.push_str(&format!("<li><a href=\"{name}\">{name}</a></li>\n"));
    }
    html.push_str("</ul></body></html>\n");
    Ok(html)
}

fn guess_content_type(path: &Path) -> Option<String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => Some("text/html".to_string()),
        Some("css") => Some("text/css".to_string()),
        Some("xhtml") => Some("application/xhtml+xml".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_invalid() {
        let handler = FileHandler;
        let url = Url::from_file_path("/no/such/path/surely").unwrap();
        let (_, verdict) = handler.check(url.as_str()).await.unwrap();
        assert!(matches!(verdict, CheckVerdict::Invalid { tag: WarningTag::UrlUnreachable, .. }));
    }

    #[tokio::test]
    async fn directory_produces_an_anchor_listing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hi").unwrap();
        let url = Url::from_file_path(dir.path()).unwrap();

        let handler = FileHandler;
        let (outcome, verdict) = handler.check(url.as_str()).await.unwrap();
        assert!(matches!(verdict, CheckVerdict::Valid));
        let content = outcome.content.unwrap();
        assert!(content.contains("a.txt"));
    }

    #[tokio::test]
    async fn plain_text_file_is_not_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("note.txt");
        std::fs::write(&file_path, b"hello").unwrap();
        let url = Url::from_file_path(&file_path).unwrap();

        let handler = FileHandler;
        let (outcome, verdict) = handler.check(url.as_str()).await.unwrap();
        assert!(matches!(verdict, CheckVerdict::Valid));
        assert!(outcome.content.is_none());
    }
}
