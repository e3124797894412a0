use std::{fmt, sync::LazyLock};

use regex::Regex;

use super::ModemError;

// IMSIs are 14 or 15 digits
#[allow(clippy::unwrap_used)]
static IMSI_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{14,15}$").unwrap());

/// Identity of a SIM card (its IMSI).
///
/// Only constructed through [`SimIdentity::parse`], so every value is a
/// 14 or 15 digit string and can be sliced into a [`NetworkId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimIdentity(String);

impl SimIdentity {
    /// Validates a raw IMSI.
    ///
    /// # Errors
    /// Returns `ModemError::InvalidIdentity` unless `raw` is 14 or 15 ASCII digits
    pub fn parse(raw: &str) -> Result<Self, ModemError> {
        if IMSI_RE.is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ModemError::InvalidIdentity(raw.to_string()))
        }
    }

    /// The IMSI digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Mobile country and network code of the issuing operator.
    pub fn network_id(&self) -> NetworkId {
        NetworkId {
            mcc: self.0[0..3].to_string(),
            mnc: self.0[3..5].to_string(),
        }
    }
}

impl fmt::Display for SimIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operator that issued a SIM: mobile country code and mobile network code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetworkId {
    /// Mobile country code, three digits
    pub mcc: String,
    /// Mobile network code
    pub mnc: String,
}

impl NetworkId {
    /// Creates a network id from its two codes.
    pub fn new(mcc: impl Into<String>, mnc: impl Into<String>) -> Self {
        Self {
            mcc: mcc.into(),
            mnc: mnc.into(),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.mcc, self.mnc)
    }
}
