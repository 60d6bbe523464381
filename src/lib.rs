//! Pulseboard - polling status dashboard
//!
//! Polls a fixed set of HTTP JSON endpoints on a timer and renders each
//! response as a key/value table or a pretty-printed text block. Failures
//! blank the affected target and raise a banner entry that expires on its own.
//!
//! The pipeline is [`poller`] → [`render`] (display store) → [`banner`],
//! driven by [`cycle::CycleDriver`] and served by [`api`] and [`cli`].

pub mod api;
pub mod banner;
pub mod cli;
pub mod config;
pub mod cycle;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod poller;
pub mod render;
