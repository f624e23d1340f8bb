//! Satellite identifiers, as they appear in SP3 files
use gnss::prelude::SV;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Three character satellite identifier, for example "G01" or "R24".
/// Shorter inputs are zero padded, longer inputs are truncated,
/// comparison is case sensitive and byte exact.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteId([u8; 3]);

impl SatelliteId {
    /// Builds an identifier from the first 3 bytes of `id`.
    pub fn new(id: &str) -> Self {
        let mut bytes = [0_u8; 3];
        for (dst, src) in bytes.iter_mut().zip(id.bytes()) {
            *dst = src;
        }
        Self(bytes)
    }
    /// Raw identifier bytes
    pub fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }
    /// Converts to [SV], when this identifier designates a satellite
    /// of a known constellation.
    pub fn to_sv(&self) -> Option<SV> {
        if !self.0[0].is_ascii_alphabetic() || self.0.contains(&0) {
            return None;
        }
        SV::from_str(&self.to_string()).ok()
    }
}

impl std::fmt::Display for SatelliteId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for b in self.0.iter().take_while(|b| **b != 0) {
            write!(f, "{}", *b as char)?;
        }
        Ok(())
    }
}

impl From<&str> for SatelliteId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<SV> for SatelliteId {
    fn from(sv: SV) -> Self {
        Self::new(&sv.to_string())
    }
}
