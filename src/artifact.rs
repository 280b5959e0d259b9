use crate::core::error::ChatError;
use crate::viewer;
use image::ImageFormat;
use rand::Rng;
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};

/// A generated image saved to local storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArtifact {
    pub url: String,
    pub path: PathBuf,
}

/// Downloads generated images and writes them out as PNG files.
#[derive(Clone)]
pub struct ArtifactStore {
    http: Client,
    output_dir: PathBuf,
    preview: bool,
}

impl ArtifactStore {
    pub fn new(output_dir: impl Into<PathBuf>, preview: bool) -> Self {
        Self {
            http: Client::new(),
            output_dir: output_dir.into(),
            preview,
        }
    }

    pub async fn persist(&self, url: &str) -> Result<ImageArtifact, ChatError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ChatError::Image(format!(
                "download of {} failed with status {}",
                url,
                response.status()
            )));
        }
        let bytes = response.bytes().await?;

        let suffix = rand::thread_rng().gen_range(0..1000);
        let path = self.output_dir.join(artifact_filename(url, suffix));
        let target = path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), ChatError> {
            let decoded = image::load_from_memory(&bytes)?;
            decoded.save_with_format(&target, ImageFormat::Png)?;
            Ok(())
        })
        .await
        .map_err(|e| ChatError::Image(format!("image encoding task failed: {}", e)))??;

        if self.preview {
            preview(&path);
        }

        Ok(ImageArtifact {
            url: url.to_string(),
            path,
        })
    }
}

fn preview(path: &Path) {
    if let Err(e) = viewer::show_image(path) {
        log::warn!("could not open image viewer for {}: {}", path.display(), e);
    }
}

/// `<last path segment of url, query stripped><suffix>.png`
pub fn artifact_filename(url: &str, suffix: u32) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.last().map(str::to_string))
            .unwrap_or_default(),
        Err(_) => {
            let without_query = url.split(['?', '#']).next().unwrap_or_default();
            without_query.rsplit('/').next().unwrap_or_default().to_string()
        }
    };
    let stem = if segment.is_empty() { "image" } else { segment.as_str() };
    format!("{}{}.png", stem, suffix)
}
