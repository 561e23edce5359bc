//! Hardware-independent core for the kinelog data-acquisition device.
//!
//! Everything in this crate is driven by a cooperative `tick(now_ms)` loop:
//! debounced button edges, the cyclic operating-mode menu, the storage
//! session (mount state, filename sequencing, the active capture file), and
//! the sample-capture loop. Hardware enters only through narrow traits
//! ([`input::AxisSource`], [`capture::SampleSource`],
//! [`storage::VolumeDriver`], [`storage::DiagnosticSink`]), so the crate is
//! `#![no_std]` and compiles for both the embedded target and desktop hosts
//! (for the simulator and tests).

#![no_std]

pub mod app;
pub mod capture;
pub mod config;
pub mod input;
pub mod render;
pub mod storage;
