//! Input/output drivers, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod encoder;
pub mod hw_init;
pub mod led_bank;
