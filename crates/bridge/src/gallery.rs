//! Image gallery listing.

use std::sync::Arc;

use tb_backend::TelemetryBackend;
use tb_domain::ImageEntry;

/// Images published by the backend, or none when it cannot be reached.
pub async fn list_images(backend: &Arc<dyn TelemetryBackend>) -> Vec<ImageEntry> {
    match backend.images().await {
        Ok(images) => images,
        Err(e) => {
            tracing::warn!(error = %e, "image listing failed");
            Vec::new()
        }
    }
}
