use crate::errors::TesseraResult;

/// Handle to one index replica resident on an accelerator device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceSlot(pub u64);

/// A compute accelerator capable of holding a replicated vector index
/// and serving batched inner-product searches against it.
///
/// Implementations own their device memory bookkeeping; `release` must
/// be idempotent so teardown paths can call it unconditionally.
pub trait AcceleratorDevice: Send + Sync {
    /// Replicate `vectors` (row-major, `dim` floats per row) onto the
    /// device, returning a slot handle for later searches.
    fn upload(&self, dim: usize, vectors: &[f32]) -> TesseraResult<DeviceSlot>;

    /// Inner-product search of `queries` (row-major, one or more rows of
    /// the uploaded dimension) for the top `k` neighbors each. Returns
    /// one `(id, score)` list per query row, best first; lists may be
    /// shorter than `k` when the replica holds fewer vectors.
    fn search(
        &self,
        slot: DeviceSlot,
        queries: &[f32],
        k: usize,
    ) -> TesseraResult<Vec<Vec<(usize, f32)>>>;

    /// Free device memory for `slot`.
    fn release(&self, slot: DeviceSlot);

    /// Human-readable device name.
    fn name(&self) -> &str;
}
