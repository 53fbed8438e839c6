//! Terminal UI layer for the chat screen.
//!
//! - [`chat_loop`]: the event loop that turns key presses into turns and
//!   webhook replies into transcript updates.
//! - [`renderer`] and [`transcript`]: frame layout and transcript rows.
//! - [`markdown`] and [`wrap`]: reply rendering and width-aware wrapping.
//! - [`theme`] and [`branding`]: colors, title and banner.
//!
//! Ownership boundary: this layer presents and captures interaction state,
//! while [`crate::core`] owns the conversation and the webhook client.

pub mod branding;
pub mod chat_loop;
pub mod markdown;
pub mod renderer;
pub mod theme;
pub mod transcript;
pub mod wrap;
