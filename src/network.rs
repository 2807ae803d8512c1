use std::fmt;
use std::net::Ipv4Addr;

use ipnet::{Ipv4AddrRange, Ipv4Net};

use crate::error::{Result, ScanError};

/// The usable host addresses of an IPv4 CIDR block, in ascending order.
///
/// Network and broadcast addresses are excluded for prefixes up to /30.
/// A /31 yields both addresses and a /32 yields the single address, the
/// same as [`Ipv4Net::hosts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    network: Ipv4Net,
}

impl AddressRange {
    pub fn network(&self) -> Ipv4Net {
        self.network
    }

    pub fn iter(&self) -> Ipv4AddrRange {
        self.network.hosts()
    }

    /// Number of addresses [`iter`](Self::iter) yields.
    pub fn len(&self) -> u64 {
        match self.network.prefix_len() {
            32 => 1,
            31 => 2,
            prefix => (1u64 << (32 - prefix)) - 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for &AddressRange {
    type Item = Ipv4Addr;
    type IntoIter = Ipv4AddrRange;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.network)
    }
}

impl std::str::FromStr for AddressRange {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self> {
        parse_cidr(s)
    }
}

/// Parses a block like `192.168.1.0/24`. Fails if the address has any
/// host bits set rather than silently masking them.
pub fn parse_cidr(cidr: &str) -> Result<AddressRange> {
    let cidr = cidr.trim();
    let network: Ipv4Net = cidr.parse().map_err(|_| ScanError::InvalidRange {
        input: cidr.to_string(),
        reason: "not an IPv4 CIDR block".to_string(),
    })?;

    if network.addr() != network.network() {
        return Err(ScanError::InvalidRange {
            input: cidr.to_string(),
            reason: format!("host bits set, did you mean {}?", network.trunc()),
        });
    }

    Ok(AddressRange { network })
}
