//! Connection settings and the capability flags that qualify them.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::db::{DbResult, StoreError};

/// Which [`DatabaseSettings`] fields are meaningful for an engine.
///
/// Fields whose flag is not set are ignored by adapters and must not be
/// surfaced or persisted by anything built on top of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities(u8);

impl Capabilities {
    pub const NONE: Self = Self(0);
    /// `dbname` is a path on the local filesystem.
    pub const NAME_IS_FILENAME: Self = Self(1 << 0);
    pub const HAS_HOST: Self = Self(1 << 1);
    pub const HAS_PORT: Self = Self(1 << 2);
    pub const HAS_USER: Self = Self(1 << 3);
    pub const HAS_PASSWORD: Self = Self(1 << 4);

    /// Flags shared by the client/server engines.
    pub const SERVER: Self =
        Self(Self::HAS_HOST.0 | Self::HAS_PORT.0 | Self::HAS_USER.0 | Self::HAS_PASSWORD.0);

    const NAMES: [(Self, &'static str); 5] = [
        (Self::NAME_IS_FILENAME, "name_is_filename"),
        (Self::HAS_HOST, "has_host"),
        (Self::HAS_PORT, "has_port"),
        (Self::HAS_USER, "has_user"),
        (Self::HAS_PASSWORD, "has_password"),
    ];

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Names of the set flags, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(_, flag_name)| *flag_name == name)
            .map(|(flag, _)| *flag)
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", names.join(", "))
        }
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.names().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Capabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(Self::NONE, |acc, name| {
            Self::from_name(name)
                .map(|flag| acc | flag)
                .ok_or_else(|| D::Error::custom(format!("unknown capability '{}'", name)))
        })
    }
}

/// How to reach one storage engine instance.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Registry name of the engine (`sqlite`, `mysql`, `postgres`).
    pub engine: String,
    /// Database name, or a file path when `NAME_IS_FILENAME` is set.
    #[serde(default)]
    pub dbname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    /// Prompt for the password instead of storing it.
    #[serde(default)]
    pub ask_password: bool,
    #[serde(default)]
    pub capabilities: Capabilities,
}

fn is_zero(port: &u16) -> bool {
    *port == 0
}

impl DatabaseSettings {
    pub fn new(engine: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            engine: engine.into(),
            capabilities,
            ..Self::default()
        }
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn name_is_filename(&self) -> bool {
        self.has(Capabilities::NAME_IS_FILENAME)
    }

    pub fn active_host(&self) -> Option<&str> {
        self.has(Capabilities::HAS_HOST)
            .then_some(self.host.as_str())
            .filter(|host| !host.is_empty())
    }

    pub fn active_port(&self) -> Option<u16> {
        self.has(Capabilities::HAS_PORT)
            .then_some(self.port)
            .filter(|port| *port != 0)
    }

    pub fn active_user(&self) -> Option<&str> {
        self.has(Capabilities::HAS_USER)
            .then_some(self.user.as_str())
            .filter(|user| !user.is_empty())
    }

    pub fn active_password(&self) -> Option<&str> {
        self.has(Capabilities::HAS_PASSWORD)
            .then_some(self.password.as_str())
            .filter(|password| !password.is_empty())
    }

    /// Check that every field the engine relies on is populated.
    pub fn validate(&self) -> DbResult<()> {
        if self.engine.is_empty() {
            return Err(StoreError::other("Settings do not name an engine"));
        }
        if self.dbname.is_empty() {
            return Err(StoreError::other(format!(
                "Settings for engine '{}' have no database name",
                self.engine
            )));
        }
        if self.has(Capabilities::HAS_HOST) && self.host.is_empty() {
            return Err(StoreError::other(format!(
                "Settings for engine '{}' have no host",
                self.engine
            )));
        }
        Ok(())
    }

    /// Copy with inactive fields cleared, fit for display or persistence.
    ///
    /// The password is dropped as well when it is asked for at runtime.
    pub fn sanitized(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            dbname: self.dbname.clone(),
            host: self.active_host().unwrap_or_default().to_string(),
            port: self.active_port().unwrap_or_default(),
            user: self.active_user().unwrap_or_default().to_string(),
            password: if self.ask_password {
                String::new()
            } else {
                self.active_password().unwrap_or_default().to_string()
            },
            ask_password: self.ask_password && self.has(Capabilities::HAS_PASSWORD),
            capabilities: self.capabilities,
        }
    }
}
