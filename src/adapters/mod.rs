//! Framework adapters. Presentation frameworks get thin reactive wrappers;
//! the SDK itself never renders anything.

#[cfg(feature = "dioxus")]
pub mod dioxus;
