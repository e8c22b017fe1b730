//! Opportunistic accelerator placement for flat indices.
//!
//! [`PlacementManager::try_place`] replicates an index onto every
//! detected device and smoke-searches the replicas before handing back
//! a [`PlacedIndex`]. Any failure (no device, upload error, smoke-test
//! error) degrades to the host index with a warning, never an error.
//! Device memory is released deterministically when the placement is
//! dropped; callers hold a placement only for the search that needed it.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, warn};

use tessera_core::constants::{SMOKE_BATCH, SMOKE_TOP_K};
use tessera_core::errors::{RetrievalError, TesseraResult};
use tessera_core::traits::{AcceleratorDevice, DeviceSlot};

use crate::flat::FlatIndex;

/// Owns the set of accelerator devices visible to this process.
#[derive(Clone)]
pub struct PlacementManager {
    devices: Vec<Arc<dyn AcceleratorDevice>>,
}

impl PlacementManager {
    pub fn new(devices: Vec<Arc<dyn AcceleratorDevice>>) -> Self {
        Self { devices }
    }

    /// Probe the process environment for accelerator devices.
    ///
    /// No accelerator runtime is linked into this build, so detection
    /// yields an empty set and every placement falls back to host
    /// memory; deployments with a device register it through
    /// [`PlacementManager::new`].
    pub fn detect() -> Self {
        Self::new(Vec::new())
    }

    pub fn has_devices(&self) -> bool {
        !self.devices.is_empty()
    }

    /// Attempt to replicate `index` onto all available devices.
    ///
    /// Returns `None` (with a logged warning) on any failure; the caller
    /// must then search the host index unmodified.
    pub fn try_place(&self, index: &FlatIndex) -> Option<PlacedIndex> {
        if self.devices.is_empty() {
            warn!("no accelerator devices available, searching on host");
            return None;
        }

        let mut replicas: Vec<(Arc<dyn AcceleratorDevice>, DeviceSlot)> = Vec::new();
        for device in &self.devices {
            match device.upload(index.dim(), index.vectors()) {
                Ok(slot) => replicas.push((Arc::clone(device), slot)),
                Err(e) => {
                    warn!(
                        device = device.name(),
                        error = %e,
                        "index upload failed, falling back to host search"
                    );
                    release_all(&replicas);
                    return None;
                }
            }
        }

        // Smoke-search every replica before trusting the placement.
        let k = SMOKE_TOP_K.min(index.len());
        let queries = random_queries(index.dim(), SMOKE_BATCH);
        for (device, slot) in &replicas {
            match device.search(*slot, &queries, k) {
                Ok(rows) if rows.len() == SMOKE_BATCH => {}
                Ok(rows) => {
                    warn!(
                        device = device.name(),
                        expected = SMOKE_BATCH,
                        got = rows.len(),
                        "smoke search returned wrong row count, falling back to host"
                    );
                    release_all(&replicas);
                    return None;
                }
                Err(e) => {
                    warn!(
                        device = device.name(),
                        error = %e,
                        "smoke search failed, falling back to host"
                    );
                    release_all(&replicas);
                    return None;
                }
            }
        }

        debug!(
            devices = replicas.len(),
            vectors = index.len(),
            "index placed on accelerator"
        );
        Some(PlacedIndex {
            replicas,
            len: index.len(),
        })
    }
}

fn release_all(replicas: &[(Arc<dyn AcceleratorDevice>, DeviceSlot)]) {
    for (device, slot) in replicas {
        device.release(*slot);
    }
}

fn random_queries(dim: usize, count: usize) -> Vec<f32> {
    let mut rng = rand::thread_rng();
    (0..dim * count).map(|_| rng.gen::<f32>()).collect()
}

/// An index replicated on one or more accelerator devices.
///
/// Dropping the value releases every replica's device memory; there is
/// no garbage-collected path.
pub struct PlacedIndex {
    replicas: Vec<(Arc<dyn AcceleratorDevice>, DeviceSlot)>,
    len: usize,
}

impl PlacedIndex {
    /// Number of vectors in the placed index.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inner-product search for `k` neighbors of a single query.
    pub fn search(&self, query: &[f32], k: usize) -> TesseraResult<Vec<(usize, f32)>> {
        let (device, slot) = self.replicas.first().ok_or_else(|| {
            RetrievalError::SearchFailed {
                reason: "placed index has no replicas".to_string(),
            }
        })?;
        let mut rows = device.search(*slot, query, k.min(self.len))?;
        rows.pop().ok_or_else(|| {
            RetrievalError::SearchFailed {
                reason: format!("device {} returned no result rows", device.name()),
            }
            .into()
        })
    }
}

impl Drop for PlacedIndex {
    fn drop(&mut self) {
        release_all(&self.replicas);
    }
}
