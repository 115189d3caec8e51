//! Core types shared across simrec facilities
//!
//! This crate provides the canonical field keys and event names used by the
//! error and logging facilities, so that every crate emits the same
//! structured log schema.

pub mod schema;
