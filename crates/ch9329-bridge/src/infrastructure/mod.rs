//! Infrastructure layer for the bridge.
//!
//! Contains the adapters that touch the outside world: the serial port and
//! the configuration file.
//!
//! **Dependency rule**: this layer may depend on `ch9329_core`, and the
//! application layer depends on its `Transport` trait only.
//!
//! # Sub-modules
//!
//! - **`transport`** – The `Transport` trait, the `serialport`-backed
//!   implementation, and an in-memory recorder for tests.
//!
//! - **`storage`** – TOML configuration in the platform config directory.

pub mod storage;
pub mod transport;
