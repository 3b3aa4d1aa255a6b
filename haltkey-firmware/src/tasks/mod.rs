//! Embassy async tasks (core 0)
//!
//! Only the USB stack runs on the executor. The safety loop runs on core 1
//! outside any executor, see `crate::control`.

pub mod hid;
pub mod usb;

pub use hid::hid_task;
pub use usb::{build_usb, usb_task};
