//! Address ranges considered local to the monitored system.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use topo_error::{Error, Result};

/// One CIDR range, IPv4 or IPv6. A bare address parses as a single-host range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNet {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpNet {
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self> {
        let max = max_prefix_len(&addr);
        if prefix_len > max {
            return Err(Error::malformed_network(format!("{addr}/{prefix_len}"))
                .with_context("max_prefix_len", max.to_string()));
        }
        Ok(Self { addr, prefix_len })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Whether `ip` falls inside this range. Families never match each other.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(net), IpAddr::V4(ip)) => {
                let mask = prefix_mask_u32(self.prefix_len);
                u32::from(net) & mask == u32::from(*ip) & mask
            }
            (IpAddr::V6(net), IpAddr::V6(ip)) => {
                let mask = prefix_mask_u128(self.prefix_len);
                u128::from(net) & mask == u128::from(*ip) & mask
            }
            _ => false,
        }
    }
}

fn max_prefix_len(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn prefix_mask_u32(prefix_len: u8) -> u32 {
    match prefix_len {
        0 => 0,
        n => u32::MAX << (32 - u32::from(n)),
    }
}

fn prefix_mask_u128(prefix_len: u8) -> u128 {
    match prefix_len {
        0 => 0,
        n => u128::MAX << (128 - u32::from(n)),
    }
}

impl FromStr for IpNet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bad = || Error::malformed_network(s).with_operation("report::IpNet::from_str");
        let (addr, prefix_len) = match s.split_once('/') {
            Some((addr, len)) => {
                let addr: IpAddr = addr.parse().map_err(|_| bad())?;
                let len: u8 = len.parse().map_err(|_| bad())?;
                (addr, len)
            }
            None => {
                let addr: IpAddr = s.parse().map_err(|_| bad())?;
                (addr, max_prefix_len(&addr))
            }
        };
        IpNet::new(addr, prefix_len).map_err(|_| bad())
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

/// A set of [`IpNet`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Networks(Vec<IpNet>);

impl Networks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, net: IpNet) {
        if !self.0.contains(&net) {
            self.0.push(net);
        }
    }

    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.iter().any(|net| net.contains(ip))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IpNet> {
        self.0.iter()
    }
}

impl FromIterator<IpNet> for Networks {
    fn from_iter<I: IntoIterator<Item = IpNet>>(iter: I) -> Self {
        let mut networks = Networks::new();
        for net in iter {
            networks.add(net);
        }
        networks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topo_error::ErrorKind;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_v4_containment() {
        let net: IpNet = "10.32.0.0/12".parse().unwrap();
        assert!(net.contains(&ip("10.32.0.1")));
        assert!(net.contains(&ip("10.47.255.255")));
        assert!(!net.contains(&ip("10.48.0.0")));
        assert!(!net.contains(&ip("::1")));
    }

    #[test]
    fn test_v6_containment() {
        let net: IpNet = "fd00::/8".parse().unwrap();
        assert!(net.contains(&ip("fd12:3456::1")));
        assert!(!net.contains(&ip("fe80::1")));
    }

    #[test]
    fn test_bare_address_and_zero_prefix() {
        let host: IpNet = "192.168.1.7".parse().unwrap();
        assert_eq!(host.prefix_len(), 32);
        assert!(host.contains(&ip("192.168.1.7")));
        assert!(!host.contains(&ip("192.168.1.8")));

        let all: IpNet = "0.0.0.0/0".parse().unwrap();
        assert!(all.contains(&ip("8.8.8.8")));
    }

    #[test]
    fn test_rejects_bad_cidr() {
        for bad in ["10.0.0.0/33", "10.0.0/8", "nonsense", "10.0.0.0/x"] {
            let err = bad.parse::<IpNet>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedNetwork, "{bad}");
        }
    }

    #[test]
    fn test_networks_dedup() {
        let networks: Networks = ["10.0.0.0/8", "10.0.0.0/8", "172.16.0.0/12"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(networks.len(), 2);
        assert!(networks.contains(&ip("172.17.0.2")));
        assert!(!networks.contains(&ip("8.8.8.8")));
    }
}
