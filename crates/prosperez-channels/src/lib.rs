//! # prosperez-channels
//!
//! Messaging backends for Prosperez.

pub mod whatsapp;
