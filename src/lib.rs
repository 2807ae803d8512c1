//! Sweep an IPv4 block for SSH services.
//!
//! Every usable host in a CIDR block gets a TCP connect on the SSH port and
//! one short read. Hosts that answer with an identification line end up as
//! [`ScanResult`]s carrying the protocol version and a slice of the bytes
//! that follow it.
//!
//! ```no_run
//! use sshscope::scanner::{ScanConfig, Scanner};
//!
//! # async fn sweep() -> sshscope::error::Result<()> {
//! let scanner = Scanner::new(ScanConfig::default().concurrency(100));
//! let report = scanner.scan("192.168.1.0/24").await?;
//! for host in &report.results {
//!     println!("{} {}", host.address, host.protocol_version);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod error;
pub mod network;
pub mod output;
pub mod scanner;

pub use error::ScanError;
pub use network::{parse_cidr, AddressRange};
pub use scanner::{ScanConfig, ScanReport, ScanResult, Scanner};
