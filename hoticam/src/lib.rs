#![no_std]

/// modules
pub mod config;
pub mod err;
pub mod pwm;
