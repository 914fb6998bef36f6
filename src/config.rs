use rand::Rng;
use std::net::{IpAddr, Ipv4Addr};

pub(crate) const DEFAULT_ORIGIN_USERNAME: &str = "remote-sdp";
pub(crate) const DEFAULT_MEDIA_PORT: u16 = 7;
pub(crate) const DEFAULT_ICE_OPTIONS: &str = "renomination";

/// RemoteSdpConfig provides the cosmetic parts of the generated remote description.
///
/// The engine never performs real transport, so the connection address and the
/// media port of open sections are fixed placeholders.
#[derive(Debug, Clone)]
pub struct RemoteSdpConfig {
    pub(crate) origin_username: String,
    pub(crate) session_id: u64,
    pub(crate) connection_address: IpAddr,
    pub(crate) media_port: u16,
    pub(crate) ice_options: Option<String>,
    pub(crate) end_of_candidates: bool,
}

impl Default for RemoteSdpConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteSdpConfig {
    /// create new config with a random origin session id
    pub fn new() -> Self {
        Self {
            origin_username: DEFAULT_ORIGIN_USERNAME.to_owned(),
            // <https://datatracker.ietf.org/doc/html/rfc8829#section-5.2.1>
            session_id: rand::thread_rng().gen_range(1..(1u64 << 62)),
            connection_address: IpAddr::V4(Ipv4Addr::LOCALHOST),
            media_port: DEFAULT_MEDIA_PORT,
            ice_options: Some(DEFAULT_ICE_OPTIONS.to_owned()),
            end_of_candidates: true,
        }
    }

    /// build with origin username
    pub fn with_origin_username(mut self, origin_username: impl Into<String>) -> Self {
        self.origin_username = origin_username.into();
        self
    }

    /// build with origin session id
    pub fn with_session_id(mut self, session_id: u64) -> Self {
        self.session_id = session_id;
        self
    }

    /// build with the placeholder connection address written in every c= line
    pub fn with_connection_address(mut self, connection_address: IpAddr) -> Self {
        self.connection_address = connection_address;
        self
    }

    /// build with the placeholder port of open media sections, must not be 0
    pub fn with_media_port(mut self, media_port: u16) -> Self {
        if media_port != 0 {
            self.media_port = media_port;
        }
        self
    }

    /// build with ice-options, None omits the attribute
    pub fn with_ice_options(mut self, ice_options: Option<String>) -> Self {
        self.ice_options = ice_options;
        self
    }

    /// build with end-of-candidates emission
    pub fn with_end_of_candidates(mut self, end_of_candidates: bool) -> Self {
        self.end_of_candidates = end_of_candidates;
        self
    }

    pub fn origin_username(&self) -> &str {
        &self.origin_username
    }

    pub fn session_id(&self) -> u64 {
        self.session_id
    }

    pub fn connection_address(&self) -> IpAddr {
        self.connection_address
    }

    pub fn media_port(&self) -> u16 {
        self.media_port
    }
}
