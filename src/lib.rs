#![doc(test(attr(deny(warnings))))]

//! Form Wizard drives a six step application form: a persisted answer store,
//! a step sequencer, per-step controllers, and a review and submit flow, hosted
//! by an interactive terminal wizard and a line oriented script mode.

pub mod answers;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod review;
pub mod sequencer;
pub mod steps;
pub mod store;
pub mod submission;
pub mod utils;
pub mod validation;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Form Wizard tracing initialized.");
    });
}
