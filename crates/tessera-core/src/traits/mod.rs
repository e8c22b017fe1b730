//! Seams between the retrieval engine and its externally-owned
//! collaborators: the two query encoders and the accelerator runtime.

mod device;
mod encoder;

pub use device::{AcceleratorDevice, DeviceSlot};
pub use encoder::{DenseEncoder, ThemeEncoder};
