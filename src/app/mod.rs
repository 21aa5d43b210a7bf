//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules for the dimmer: the on/off
//! state machine, remembered-brightness policy and encoder event
//! consumption.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod controller;
pub mod events;
pub mod ports;
pub mod state;
