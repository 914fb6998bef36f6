use crate::error::{Error, Result};
use sdp::util::ConnectionRole;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ICE credentials of the remote transport.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceParameters {
    pub username_fragment: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ice_lite: Option<bool>,
}

impl IceParameters {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.username_fragment.is_empty() {
            return Err(Error::malformed("missing ICE usernameFragment"));
        }
        if self.password.is_empty() {
            return Err(Error::malformed("missing ICE password"));
        }
        Ok(())
    }

    pub(crate) fn is_ice_lite(&self) -> bool {
        self.ice_lite == Some(true)
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceProtocol {
    #[default]
    Udp,
    Tcp,
}

impl fmt::Display for IceProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IceProtocol::Udp => write!(f, "udp"),
            IceProtocol::Tcp => write!(f, "tcp"),
        }
    }
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceCandidateType {
    #[default]
    Host,
    Srflx,
    Prflx,
    Relay,
}

impl fmt::Display for IceCandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            IceCandidateType::Host => "host",
            IceCandidateType::Srflx => "srflx",
            IceCandidateType::Prflx => "prflx",
            IceCandidateType::Relay => "relay",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceTcpType {
    Active,
    Passive,
    So,
}

impl fmt::Display for IceTcpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            IceTcpType::Active => "active",
            IceTcpType::Passive => "passive",
            IceTcpType::So => "so",
        };
        write!(f, "{s}")
    }
}

/// A remote ICE candidate as announced by the server.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub foundation: String,
    pub ip: String,
    pub port: u16,
    pub priority: u32,
    pub protocol: IceProtocol,
    #[serde(rename = "type")]
    pub typ: IceCandidateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_type: Option<IceTcpType>,
}

impl IceCandidate {
    /// marshal returns the value of an `a=candidate` attribute.
    ///
    /// Component is always RTP (1) since rtcp-mux is mandatory.
    pub fn marshal(&self) -> String {
        let mut value = format!(
            "{} 1 {} {} {} {} typ {}",
            self.foundation, self.protocol, self.priority, self.ip, self.port, self.typ
        );
        if let Some(tcp_type) = &self.tcp_type {
            value += &format!(" tcptype {tcp_type}");
        }
        value
    }
}

/// DTLSRole indicates the role of the DTLS transport.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DtlsRole {
    /// Auto defines the DTLS role is determined based on
    /// the resolved ICE role.
    #[default]
    Auto,

    /// Client defines the DTLS client role.
    Client,

    /// Server defines the DTLS server role.
    Server,
}

impl DtlsRole {
    /// to_connection_role maps the role to the `a=setup` value announced for it
    pub fn to_connection_role(self) -> ConnectionRole {
        match self {
            DtlsRole::Client => ConnectionRole::Active,
            DtlsRole::Server => ConnectionRole::Passive,
            DtlsRole::Auto => ConnectionRole::Actpass,
        }
    }

    pub(crate) fn from_connection_role(role: ConnectionRole) -> Option<Self> {
        match role {
            ConnectionRole::Active => Some(DtlsRole::Client),
            ConnectionRole::Passive => Some(DtlsRole::Server),
            ConnectionRole::Actpass => Some(DtlsRole::Auto),
            _ => None,
        }
    }
}

impl fmt::Display for DtlsRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DtlsRole::Auto => write!(f, "auto"),
            DtlsRole::Client => write!(f, "client"),
            DtlsRole::Server => write!(f, "server"),
        }
    }
}

/// DTLSFingerprint specifies the hash function algorithm and certificate
/// fingerprint as described in <https://tools.ietf.org/html/rfc4572>.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtlsFingerprint {
    /// Algorithm specifies one of the the hash function algorithms defined in
    /// the 'Hash function Textual Names' registry.
    pub algorithm: String,

    /// Value specifies the value of the certificate fingerprint as a hex string.
    pub value: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtlsParameters {
    #[serde(default)]
    pub role: DtlsRole,
    pub fingerprints: Vec<DtlsFingerprint>,
}

impl DtlsParameters {
    /// latest_fingerprint returns the last announced fingerprint, which wins
    /// when several are supplied.
    pub fn latest_fingerprint(&self) -> Result<&DtlsFingerprint> {
        self.fingerprints
            .last()
            .ok_or_else(|| Error::malformed("DTLS parameters carry no fingerprint"))
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SctpParameters {
    pub port: u16,
    #[serde(rename = "OS")]
    pub os: u16,
    #[serde(rename = "MIS")]
    pub mis: u16,
    pub max_message_size: u32,
}
