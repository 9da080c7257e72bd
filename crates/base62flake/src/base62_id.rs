use crate::base62;
use crate::error::DecodeError;
use crate::flake_id::{FlakeId, MAX_ID};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// An identifier encoded as a base62 string.
///
/// Values built through [`FromStr`] or deserialization are validated, so the
/// string always decodes to the identifier it carries. Equality, hashing and
/// ordering follow the decoded value: `"0Az"` and `"Az"` are the same id.
#[derive(Clone)]
pub struct Base62Id {
    code: SmolStr,
    value: u64,
}

impl Base62Id {
    /// Encodes `id` without padding.
    pub fn encode(id: FlakeId) -> Self {
        let value = id.to_u64();
        Self {
            code: SmolStr::new(base62::encode(value)),
            value,
        }
    }

    /// Encodes `id` padded to a fixed width, so lexicographic order of the
    /// strings matches numeric order of the ids.
    pub fn encode_padded(id: FlakeId) -> Self {
        let value = id.to_u64();
        Self {
            code: SmolStr::new(base62::encode_padded(value)),
            value,
        }
    }

    /// Returns the encoded identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Returns the decoded integer value.
    pub fn to_u64(&self) -> u64 {
        self.value
    }

    /// Splits the decoded value into its snowflake fields.
    pub fn to_flake_id(&self) -> FlakeId {
        FlakeId::from_u64(self.value)
    }
}

impl PartialEq for Base62Id {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Base62Id {}

impl Hash for Base62Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Base62Id {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Base62Id {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl std::fmt::Debug for Base62Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Base62Id").field(&self.code).finish()
    }
}

impl Display for Base62Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

impl AsRef<str> for Base62Id {
    fn as_ref(&self) -> &str {
        &self.code
    }
}

impl FromStr for Base62Id {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = base62::decode(s)?;
        if value > MAX_ID {
            return Err(DecodeError::ReservedBit { value });
        }
        Ok(Self {
            code: SmolStr::new(s),
            value,
        })
    }
}

impl From<FlakeId> for Base62Id {
    fn from(id: FlakeId) -> Self {
        Base62Id::encode(id)
    }
}

impl From<Base62Id> for String {
    fn from(id: Base62Id) -> Self {
        id.code.into()
    }
}

impl Serialize for Base62Id {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.code.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Base62Id {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
