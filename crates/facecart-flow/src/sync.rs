//! Replay of face registrations that failed at checkout.

use crate::backend::FaceBackend;
use facecart_core::{Identity, OrderStore, StoreError};

#[derive(Debug, Default)]
pub struct SyncReport {
    pub synced: Vec<Identity>,
    pub failed: Vec<(Identity, String)>,
}

/// Retry every queued registration once. Successes leave the queue;
/// failures stay for the next run.
pub async fn sync_registrations(
    backend: &dyn FaceBackend,
    store: &dyn OrderStore,
) -> Result<SyncReport, StoreError> {
    let mut report = SyncReport::default();

    for pending in store.unsynced()? {
        match backend.register_face(&pending.face_img, &pending.name).await {
            Ok(_) => {
                store.mark_synced(&pending.name)?;
                tracing::info!(name = %pending.name, order_id = %pending.order_id, "registration synced");
                report.synced.push(pending.name);
            }
            Err(e) => {
                tracing::warn!(name = %pending.name, error = %e, "registration still failing");
                report.failed.push((pending.name, e.to_string()));
            }
        }
    }

    Ok(report)
}
