//! Immutable connection parameters for one physical cluster.

use crate::core::domain::error::{BmcResult, ValidationError};
use crate::core::domain::value_object::{BmcHost, BmcPassword, BmcUrl, BmcUsername};

/// Which generation of the BMC wire protocol to speak.
///
/// This is a configuration choice, not a code fork: both flavors share
/// the same command table and envelope handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    /// First-generation firmware: plain HTTP, POST requests, no
    /// authentication.
    Legacy,
    /// Current firmware: HTTPS, GET requests, basic authentication,
    /// optionally skipping certificate verification.
    #[default]
    Current,
}

impl Protocol {
    /// The URL scheme this flavor uses.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Legacy => "http",
            Self::Current => "https",
        }
    }
}

/// Connection parameters to one physical cluster. Immutable after
/// construction.
pub struct BmcConnection {
    host: BmcHost,
    username: Option<BmcUsername>,
    password: Option<BmcPassword>,
    protocol: Protocol,
    accept_invalid_certs: bool,
    url: BmcUrl,
}

impl BmcConnection {
    /// Creates a connection, deriving the base URL from the host and
    /// protocol flavor.
    ///
    /// The current protocol requires credentials; the legacy protocol
    /// has none and ignores any that are supplied.
    pub fn new(
        host: BmcHost,
        username: Option<BmcUsername>,
        password: Option<BmcPassword>,
        protocol: Protocol,
        accept_invalid_certs: bool,
    ) -> BmcResult<Self> {
        if protocol == Protocol::Current && (username.is_none() || password.is_none()) {
            return Err(ValidationError::Field {
                field: "credentials".to_string(),
                message: "The current protocol requires a username and password".to_string(),
            }
            .into());
        }

        let url = BmcUrl::new(protocol.scheme(), host.as_str())?;
        Ok(Self {
            host,
            username,
            password,
            protocol,
            accept_invalid_certs,
            url,
        })
    }

    /// Test-only constructor that takes the base URL as-is, so tests can
    /// point the current protocol at a plain-HTTP mock server.
    #[cfg(test)]
    pub(crate) fn with_url(
        host: BmcHost,
        username: Option<BmcUsername>,
        password: Option<BmcPassword>,
        protocol: Protocol,
        accept_invalid_certs: bool,
        url: BmcUrl,
    ) -> Self {
        Self {
            host,
            username,
            password,
            protocol,
            accept_invalid_certs,
            url,
        }
    }

    pub fn host(&self) -> &BmcHost {
        &self.host
    }

    pub fn username(&self) -> Option<&BmcUsername> {
        self.username.as_ref()
    }

    pub fn password(&self) -> Option<&BmcPassword> {
        self.password.as_ref()
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn accepts_invalid_certs(&self) -> bool {
        self.accept_invalid_certs
    }

    pub fn url(&self) -> &BmcUrl {
        &self.url
    }
}
