pub(crate) mod answer;
pub(crate) mod offer;

pub use answer::AnswerMediaSection;
pub use offer::OfferMediaSection;

use crate::config::RemoteSdpConfig;
use crate::description::media_direction::{MediaDirection, StreamDirection};
use crate::description::{
    ATTR_KEY_CANDIDATE, ATTR_KEY_END_OF_CANDIDATES, ATTR_KEY_EXTMAP_ALLOW_MIXED,
    ATTR_KEY_FMTP, ATTR_KEY_ICE_OPTIONS, ATTR_KEY_MAX_MESSAGE_SIZE, ATTR_KEY_RID,
    ATTR_KEY_RTCP_FB, ATTR_KEY_RTPMAP, ATTR_KEY_SCTP_PORT, ATTR_KEY_SIMULCAST, ATTR_KEY_SSRC,
    ATTR_KEY_SSRC_GROUP,
};
use crate::parameters::rtp::MediaKind;
use crate::parameters::transport::{DtlsRole, IceCandidate, IceParameters};
use crate::types::{Mid, PayloadType, SSRC};
use log::debug;
use sdp::description::common::{Address, ConnectionInformation};
use sdp::description::media::{MediaName, RangedPort};
use sdp::description::session::{
    ATTR_KEY_CONNECTION_SETUP, ATTR_KEY_EXT_MAP, ATTR_KEY_MID, ATTR_KEY_RTCPMUX,
    ATTR_KEY_RTCPRSIZE,
};
use sdp::util::ConnectionRole;
use sdp::MediaDescription;
use std::net::IpAddr;

/// Port written in the m= line of a closed section.
pub(crate) const CLOSED_PORT: u16 = 0;

/// `a=rtpmap:<payload> <codec>/<rate>[/<encoding>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpMapEntry {
    pub payload: PayloadType,
    pub codec: String,
    pub rate: u32,
    pub encoding: Option<u16>,
}

/// `a=fmtp:<payload> <config>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtpEntry {
    pub payload: PayloadType,
    pub config: String,
}

/// `a=rtcp-fb:<payload> <type> [<subtype>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtcpFbEntry {
    pub payload: PayloadType,
    pub typ: String,
    pub subtype: String,
}

/// `a=extmap:<value> <uri>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtMapEntry {
    pub uri: String,
    pub value: u16,
}

/// `a=ssrc:<id> <attribute>:<value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsrcAttribute {
    pub id: SSRC,
    pub attribute: String,
    pub value: String,
}

/// `a=ssrc-group:<semantics> <ssrc>...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsrcGroup {
    pub semantics: String,
    pub ssrcs: Vec<SSRC>,
}

/// `a=simulcast:<direction> <list>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulcast {
    pub direction: StreamDirection,
    pub list: String,
}

/// `a=rid:<id> <direction>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rid {
    pub id: String,
    pub direction: StreamDirection,
}

/// MediaObject holds the fields shared by every m= section of the remote description.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaObject {
    pub mid: Mid,
    pub kind: MediaKind,
    pub protocol: String,
    pub port: u16,
    pub connection_address: IpAddr,
    pub direction: MediaDirection,
    pub setup: ConnectionRole,

    pub ice_ufrag: String,
    pub ice_pwd: String,
    pub candidates: Vec<IceCandidate>,
    pub end_of_candidates: bool,
    pub ice_options: Option<String>,

    pub rtp: Vec<RtpMapEntry>,
    pub fmtp: Vec<FmtpEntry>,
    pub rtcp_fb: Vec<RtcpFbEntry>,
    pub payloads: String,
    pub extensions: Vec<ExtMapEntry>,
    pub extmap_allow_mixed: bool,
    pub rtcp_mux: bool,
    pub rtcp_rsize: bool,

    pub ssrcs: Vec<SsrcAttribute>,
    pub ssrc_groups: Vec<SsrcGroup>,
    pub simulcast: Option<Simulcast>,
    pub rids: Vec<Rid>,

    pub sctp_port: Option<u16>,
    pub max_message_size: Option<u32>,
}

impl MediaObject {
    pub(crate) fn new(
        mid: Mid,
        kind: MediaKind,
        protocol: String,
        ice_parameters: &IceParameters,
        ice_candidates: &[IceCandidate],
        config: &RemoteSdpConfig,
    ) -> Self {
        Self {
            mid,
            kind,
            protocol,
            port: config.media_port,
            connection_address: config.connection_address,
            direction: MediaDirection::Unspecified,
            setup: ConnectionRole::Actpass,
            ice_ufrag: ice_parameters.username_fragment.clone(),
            ice_pwd: ice_parameters.password.clone(),
            candidates: ice_candidates.to_vec(),
            end_of_candidates: config.end_of_candidates,
            ice_options: config.ice_options.clone(),
            rtp: vec![],
            fmtp: vec![],
            rtcp_fb: vec![],
            payloads: String::new(),
            extensions: vec![],
            extmap_allow_mixed: false,
            rtcp_mux: false,
            rtcp_rsize: false,
            ssrcs: vec![],
            ssrc_groups: vec![],
            simulcast: None,
            rids: vec![],
            sctp_port: None,
            max_message_size: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.port == CLOSED_PORT
    }

    fn set_ice_parameters(&mut self, ice_parameters: &IceParameters) {
        self.ice_ufrag = ice_parameters.username_fragment.clone();
        self.ice_pwd = ice_parameters.password.clone();
    }

    fn disable(&mut self) {
        self.direction = MediaDirection::Inactive;

        self.extensions.clear();
        self.ssrcs.clear();
        self.ssrc_groups.clear();
        self.simulcast = None;
        self.rids.clear();
    }

    fn close(&mut self) {
        self.disable();

        self.port = CLOSED_PORT;
        self.extmap_allow_mixed = false;
    }

    /// to_media_description converts the section into the SDP codec's m= section.
    pub fn to_media_description(&self) -> MediaDescription {
        let address_type = if self.connection_address.is_ipv4() {
            "IP4"
        } else {
            "IP6"
        };

        let mut media = MediaDescription {
            media_name: MediaName {
                media: self.kind.to_string(),
                port: RangedPort {
                    value: self.port as isize,
                    range: None,
                },
                protos: self.protocol.split('/').map(ToOwned::to_owned).collect(),
                formats: self
                    .payloads
                    .split_whitespace()
                    .map(ToOwned::to_owned)
                    .collect(),
            },
            media_title: None,
            connection_information: Some(ConnectionInformation {
                network_type: "IN".to_owned(),
                address_type: address_type.to_owned(),
                address: Some(Address {
                    address: self.connection_address.to_string(),
                    ttl: None,
                    range: None,
                }),
            }),
            bandwidth: vec![],
            encryption_key: None,
            attributes: vec![],
        };

        for rtp in &self.rtp {
            let mut value = format!("{} {}/{}", rtp.payload, rtp.codec, rtp.rate);
            if let Some(encoding) = rtp.encoding {
                value += &format!("/{encoding}");
            }
            media = media.with_value_attribute(ATTR_KEY_RTPMAP.to_owned(), value);
        }
        for fmtp in &self.fmtp {
            media = media.with_value_attribute(
                ATTR_KEY_FMTP.to_owned(),
                format!("{} {}", fmtp.payload, fmtp.config),
            );
        }
        for fb in &self.rtcp_fb {
            let value = if fb.subtype.is_empty() {
                format!("{} {}", fb.payload, fb.typ)
            } else {
                format!("{} {} {}", fb.payload, fb.typ, fb.subtype)
            };
            media = media.with_value_attribute(ATTR_KEY_RTCP_FB.to_owned(), value);
        }
        for ext in &self.extensions {
            media = media.with_value_attribute(
                ATTR_KEY_EXT_MAP.to_owned(),
                format!("{} {}", ext.value, ext.uri),
            );
        }
        if self.extmap_allow_mixed {
            media = media.with_property_attribute(ATTR_KEY_EXTMAP_ALLOW_MIXED.to_owned());
        }

        media = media
            .with_value_attribute(ATTR_KEY_CONNECTION_SETUP.to_owned(), self.setup.to_string())
            .with_value_attribute(ATTR_KEY_MID.to_owned(), self.mid.clone());
        if self.direction != MediaDirection::Unspecified {
            media = media.with_property_attribute(self.direction.to_string());
        }
        media = media.with_ice_credentials(self.ice_ufrag.clone(), self.ice_pwd.clone());

        for candidate in &self.candidates {
            media = media.with_value_attribute(ATTR_KEY_CANDIDATE.to_owned(), candidate.marshal());
        }
        if self.end_of_candidates {
            media = media.with_property_attribute(ATTR_KEY_END_OF_CANDIDATES.to_owned());
        }
        if let Some(ice_options) = &self.ice_options {
            media = media.with_value_attribute(ATTR_KEY_ICE_OPTIONS.to_owned(), ice_options.clone());
        }

        for ssrc in &self.ssrcs {
            media = media.with_value_attribute(
                ATTR_KEY_SSRC.to_owned(),
                format!("{} {}:{}", ssrc.id, ssrc.attribute, ssrc.value),
            );
        }
        for group in &self.ssrc_groups {
            let ssrcs: Vec<String> = group.ssrcs.iter().map(|ssrc| ssrc.to_string()).collect();
            media = media.with_value_attribute(
                ATTR_KEY_SSRC_GROUP.to_owned(),
                format!("{} {}", group.semantics, ssrcs.join(" ")),
            );
        }

        if self.rtcp_mux {
            media = media.with_property_attribute(ATTR_KEY_RTCPMUX.to_owned());
        }
        if self.rtcp_rsize {
            media = media.with_property_attribute(ATTR_KEY_RTCPRSIZE.to_owned());
        }

        for rid in &self.rids {
            media = media.with_value_attribute(
                ATTR_KEY_RID.to_owned(),
                format!("{} {}", rid.id, rid.direction),
            );
        }
        if let Some(simulcast) = &self.simulcast {
            media = media.with_value_attribute(
                ATTR_KEY_SIMULCAST.to_owned(),
                format!("{} {}", simulcast.direction, simulcast.list),
            );
        }

        if let Some(sctp_port) = self.sctp_port {
            media = media.with_value_attribute(ATTR_KEY_SCTP_PORT.to_owned(), sctp_port.to_string());
        }
        if let Some(max_message_size) = self.max_message_size {
            media = media.with_value_attribute(
                ATTR_KEY_MAX_MESSAGE_SIZE.to_owned(),
                max_message_size.to_string(),
            );
        }

        media
    }
}

/// MediaSection is one m= section of the remote description, either proposed
/// by the remote side (offer) or built in response to a local offer (answer).
#[derive(Debug, Clone, PartialEq)]
pub enum MediaSection {
    Offer(OfferMediaSection),
    Answer(AnswerMediaSection),
}

impl MediaSection {
    pub fn object(&self) -> &MediaObject {
        match self {
            MediaSection::Offer(section) => &section.object,
            MediaSection::Answer(section) => &section.object,
        }
    }

    fn object_mut(&mut self) -> &mut MediaObject {
        match self {
            MediaSection::Offer(section) => &mut section.object,
            MediaSection::Answer(section) => &mut section.object,
        }
    }

    pub fn mid(&self) -> &str {
        &self.object().mid
    }

    pub fn is_closed(&self) -> bool {
        self.object().is_closed()
    }

    pub fn is_offer(&self) -> bool {
        matches!(self, MediaSection::Offer(_))
    }

    pub(crate) fn set_ice_parameters(&mut self, ice_parameters: &IceParameters) {
        self.object_mut().set_ice_parameters(ice_parameters);
    }

    /// set_dtls_role rewrites `a=setup`; an offer always stays actpass so the
    /// remote peer can choose.
    pub(crate) fn set_dtls_role(&mut self, role: DtlsRole) {
        match self {
            MediaSection::Offer(section) => section.object.setup = ConnectionRole::Actpass,
            MediaSection::Answer(section) => section.object.setup = role.to_connection_role(),
        }
    }

    /// disable keeps the section open but inactive, stripping its stream description.
    pub(crate) fn disable(&mut self) {
        debug!("disabling media section mid:{}", self.mid());
        self.object_mut().disable();
    }

    /// close does everything disable does, and additionally zeroes the port.
    pub(crate) fn close(&mut self) {
        debug!("closing media section mid:{}", self.mid());
        self.object_mut().close();
    }

    pub fn to_media_description(&self) -> MediaDescription {
        self.object().to_media_description()
    }
}
