pub(crate) mod media_direction;
pub(crate) mod media_section;
pub(crate) mod negotiation;
pub(crate) mod offer_media;
pub(crate) mod utils;

use crate::config::RemoteSdpConfig;
use crate::description::media_section::{AnswerMediaSection, MediaSection, OfferMediaSection};
use crate::description::negotiation::negotiate_codec_options;
use crate::description::offer_media::OfferMedia;
use crate::error::{Error, Result};
use crate::parameters::codec_options::ProducerCodecOptions;
use crate::parameters::rtp::{MediaKind, RtpParameters};
use crate::parameters::transport::{
    DtlsFingerprint, DtlsParameters, DtlsRole, IceCandidate, IceParameters, SctpParameters,
};
use crate::types::Mid;
use log::{debug, trace};
use sdp::description::session::{ATTR_KEY_GROUP, ATTR_KEY_ICELITE, ATTR_KEY_MID};
use sdp::{MediaDescription, SessionDescription};
use std::collections::HashMap;
use std::io::Cursor;

pub(crate) const ATTR_KEY_CANDIDATE: &str = "candidate";
pub(crate) const ATTR_KEY_END_OF_CANDIDATES: &str = "end-of-candidates";
pub(crate) const ATTR_KEY_EXTMAP_ALLOW_MIXED: &str = "extmap-allow-mixed";
pub(crate) const ATTR_KEY_FINGERPRINT: &str = "fingerprint";
pub(crate) const ATTR_KEY_FMTP: &str = "fmtp";
pub(crate) const ATTR_KEY_ICE_OPTIONS: &str = "ice-options";
pub(crate) const ATTR_KEY_ICE_UFRAG: &str = "ice-ufrag";
pub(crate) const ATTR_KEY_MAX_MESSAGE_SIZE: &str = "max-message-size";
pub(crate) const ATTR_KEY_MSID_SEMANTIC: &str = "msid-semantic";
pub(crate) const ATTR_KEY_RID: &str = "rid";
pub(crate) const ATTR_KEY_RTCP_FB: &str = "rtcp-fb";
pub(crate) const ATTR_KEY_RTPMAP: &str = "rtpmap";
pub(crate) const ATTR_KEY_SCTP_PORT: &str = "sctp-port";
pub(crate) const ATTR_KEY_SIMULCAST: &str = "simulcast";
pub(crate) const ATTR_KEY_SSRC: &str = "ssrc";
pub(crate) const ATTR_KEY_SSRC_GROUP: &str = "ssrc-group";

pub(crate) const PROTOCOL_RTP: &str = "UDP/TLS/RTP/SAVPF";
pub(crate) const PROTOCOL_SCTP: &str = "UDP/DTLS/SCTP";
pub(crate) const SCTP_PAYLOADS: &str = "webrtc-datachannel";
pub(crate) const MSID_SEMANTIC_WMS: &str = "WMS *";
pub(crate) const GROUP_BUNDLE: &str = "BUNDLE";
pub(crate) const ORIGIN_UNICAST_ADDRESS: &str = "0.0.0.0";

/// Mid of the offer section describing the data channel association opened
/// by the remote side.
pub const DATACHANNEL_MID: &str = "datachannel";

/// parse reads a textual session description.
pub fn parse(sdp: &str) -> Result<SessionDescription> {
    let mut reader = Cursor::new(sdp.as_bytes());
    SessionDescription::unmarshal(&mut reader).map_err(|err| Error::Codec(err.to_string()))
}

pub(crate) fn get_mid_value(media: &MediaDescription) -> Option<&str> {
    media.attribute(ATTR_KEY_MID).flatten()
}

/// get_media_by_mid finds the m= section of a parsed description carrying the given mid.
pub fn get_media_by_mid<'a>(
    description: &'a SessionDescription,
    mid: &str,
) -> Option<&'a MediaDescription> {
    description
        .media_descriptions
        .iter()
        .find(|media| get_mid_value(media) == Some(mid))
}

/// MediaSectionIdx tells where the next media section goes: either a closed
/// slot whose mid can be reused, or the end of the section list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSectionIdx {
    pub idx: usize,
    pub reuse_mid: Option<Mid>,
}

/// RemoteSdp is the description of the remote (server) side of a transport,
/// built incrementally from structured parameters as streams are added,
/// reused and closed.
///
/// Section positions are never removed, since the local description of the
/// transport mirrors them position for position.
#[derive(Debug, Clone)]
pub struct RemoteSdp {
    config: RemoteSdpConfig,
    ice_parameters: IceParameters,
    ice_candidates: Vec<IceCandidate>,
    dtls_parameters: DtlsParameters,
    sctp_parameters: Option<SctpParameters>,

    session_version: u64,
    ice_lite: bool,
    dtls_fingerprint: DtlsFingerprint,
    bundle_mids: Vec<Mid>,

    media_sections: Vec<MediaSection>,
    mid_to_index: HashMap<Mid, usize>,
    first_mid: Option<Mid>,
}

impl RemoteSdp {
    pub fn new(
        ice_parameters: IceParameters,
        ice_candidates: Vec<IceCandidate>,
        dtls_parameters: DtlsParameters,
        sctp_parameters: Option<SctpParameters>,
        config: RemoteSdpConfig,
    ) -> Result<Self> {
        ice_parameters.validate()?;
        let dtls_fingerprint = dtls_parameters.latest_fingerprint()?.clone();
        let ice_lite = ice_parameters.is_ice_lite();

        Ok(Self {
            config,
            ice_parameters,
            ice_candidates,
            dtls_parameters,
            sctp_parameters,
            session_version: 0,
            ice_lite,
            dtls_fingerprint,
            bundle_mids: vec![],
            media_sections: vec![],
            mid_to_index: HashMap::new(),
            first_mid: None,
        })
    }

    pub fn config(&self) -> &RemoteSdpConfig {
        &self.config
    }

    pub fn media_sections(&self) -> &[MediaSection] {
        &self.media_sections
    }

    pub fn media_section(&self, mid: &str) -> Option<&MediaSection> {
        self.mid_to_index
            .get(mid)
            .and_then(|idx| self.media_sections.get(*idx))
    }

    pub fn media_section_index(&self, mid: &str) -> Option<usize> {
        self.mid_to_index.get(mid).copied()
    }

    pub fn bundle_mids(&self) -> &[Mid] {
        &self.bundle_mids
    }

    pub fn first_mid(&self) -> Option<&str> {
        self.first_mid.as_deref()
    }

    pub fn session_version(&self) -> u64 {
        self.session_version
    }

    pub fn ice_lite(&self) -> bool {
        self.ice_lite
    }

    pub fn dtls_fingerprint(&self) -> &DtlsFingerprint {
        &self.dtls_fingerprint
    }

    pub fn dtls_role(&self) -> DtlsRole {
        self.dtls_parameters.role
    }

    /// update_ice_parameters rewrites ICE credentials of every section,
    /// typically after an ICE restart.
    pub fn update_ice_parameters(&mut self, ice_parameters: IceParameters) -> Result<()> {
        trace!("update_ice_parameters");
        ice_parameters.validate()?;

        if ice_parameters.is_ice_lite() {
            self.ice_lite = true;
        }
        for section in self.media_sections.iter_mut() {
            section.set_ice_parameters(&ice_parameters);
        }
        self.ice_parameters = ice_parameters;

        Ok(())
    }

    /// update_dtls_role rewrites `a=setup` of every section; offer sections stay actpass.
    pub fn update_dtls_role(&mut self, role: DtlsRole) {
        trace!("update_dtls_role [role:{role}]");

        self.dtls_parameters.role = role;
        for section in self.media_sections.iter_mut() {
            section.set_dtls_role(role);
        }
    }

    /// get_next_media_section_idx returns the first closed slot, or the end of
    /// the section list when none is closed.
    pub fn get_next_media_section_idx(&self) -> MediaSectionIdx {
        for (idx, section) in self.media_sections.iter().enumerate() {
            if section.is_closed() {
                return MediaSectionIdx {
                    idx,
                    reuse_mid: Some(section.mid().to_owned()),
                };
            }
        }

        MediaSectionIdx {
            idx: self.media_sections.len(),
            reuse_mid: None,
        }
    }

    /// create_answer answers an m= section of the local offer with the RTP
    /// parameters the server accepts.
    ///
    /// With `reuse_mid` the answer replaces the section at that mid's position,
    /// otherwise it is appended. Returns the offer parameters as updated by the
    /// codec options.
    pub fn create_answer(
        &mut self,
        offer_media: &OfferMedia,
        reuse_mid: Option<&str>,
        offer_rtp_parameters: &RtpParameters,
        answer_rtp_parameters: &RtpParameters,
        codec_options: Option<&ProducerCodecOptions>,
    ) -> Result<RtpParameters> {
        trace!(
            "create_answer [mid:{}, kind:{}, reuse_mid:{:?}]",
            offer_media.mid,
            offer_media.kind,
            reuse_mid
        );

        let negotiated =
            negotiate_codec_options(offer_rtp_parameters, answer_rtp_parameters, codec_options)?;
        let section = AnswerMediaSection::new(
            &self.ice_parameters,
            &self.ice_candidates,
            self.dtls_parameters.role,
            self.sctp_parameters.as_ref(),
            offer_media,
            Some(&negotiated.answer),
            &self.config,
        )?;

        let section = MediaSection::Answer(section);
        match reuse_mid {
            Some(reuse_mid) => self.replace_media_section(section, reuse_mid)?,
            None => self.add_media_section(section)?,
        }

        Ok(negotiated.offer)
    }

    /// create_offer proposes a sendonly section for a stream the server sends.
    ///
    /// A closed section with the same mid is reused in place.
    pub fn create_offer(
        &mut self,
        mid: impl Into<Mid>,
        kind: MediaKind,
        offer_rtp_parameters: &RtpParameters,
        stream_id: &str,
        track_id: &str,
    ) -> Result<()> {
        let mid = mid.into();
        trace!("create_offer [mid:{mid}, kind:{kind}, stream_id:{stream_id}, track_id:{track_id}]");

        let section = OfferMediaSection::new(
            &self.ice_parameters,
            &self.ice_candidates,
            self.sctp_parameters.as_ref(),
            mid.clone(),
            kind,
            Some(offer_rtp_parameters),
            stream_id,
            track_id,
            &self.config,
        )?;

        let section = MediaSection::Offer(section);
        let reuse = self
            .media_section(&mid)
            .is_some_and(|existing| existing.is_closed());
        if reuse {
            self.replace_media_section(section, &mid)
        } else {
            self.add_media_section(section)
        }
    }

    /// send_sctp_association answers the application section of the local
    /// offer, used when the local side opens the first data channel.
    pub fn send_sctp_association(&mut self, offer_media: &OfferMedia) -> Result<()> {
        trace!("send_sctp_association [mid:{}]", offer_media.mid);

        if offer_media.kind != MediaKind::Application {
            return Err(Error::malformed(format!(
                "SCTP association answered with a {} section",
                offer_media.kind
            )));
        }
        let section = AnswerMediaSection::new(
            &self.ice_parameters,
            &self.ice_candidates,
            self.dtls_parameters.role,
            self.sctp_parameters.as_ref(),
            offer_media,
            None,
            &self.config,
        )?;

        self.add_media_section(MediaSection::Answer(section))
    }

    /// recv_sctp_association offers the application section, used when the
    /// remote side opens data channels.
    pub fn recv_sctp_association(&mut self) -> Result<()> {
        trace!("recv_sctp_association");

        let section = OfferMediaSection::new(
            &self.ice_parameters,
            &self.ice_candidates,
            self.sctp_parameters.as_ref(),
            DATACHANNEL_MID.to_owned(),
            MediaKind::Application,
            None,
            "",
            "",
            &self.config,
        )?;

        self.add_media_section(MediaSection::Offer(section))
    }

    /// disable_media_section keeps the section open but inactive.
    pub fn disable_media_section(&mut self, mid: &str) -> Result<()> {
        trace!("disable_media_section [mid:{mid}]");

        let idx = self.index_of(mid)?;
        self.media_sections[idx].disable();
        self.regenerate_bundle_mids();

        Ok(())
    }

    /// close_media_section closes the section, or disables it when it is the
    /// first one since it anchors the bundled transport.
    pub fn close_media_section(&mut self, mid: &str) -> Result<()> {
        trace!("close_media_section [mid:{mid}]");

        let idx = self.index_of(mid)?;
        if self.first_mid.as_deref() == Some(mid) {
            debug!("cannot close first media section mid:{mid}, disabling it instead");
            self.media_sections[idx].disable();
        } else {
            self.media_sections[idx].close();
        }
        self.regenerate_bundle_mids();

        Ok(())
    }

    /// get_sdp bumps the session version and serializes the description.
    ///
    /// The version increases on every call, whether or not sections changed
    /// since the previous one.
    pub fn get_sdp(&mut self) -> String {
        self.session_version += 1;
        debug!("get_sdp [session_version:{}]", self.session_version);

        self.to_session_description().marshal()
    }

    /// to_session_description builds the structured description handed to the SDP codec.
    pub fn to_session_description(&self) -> SessionDescription {
        let mut d = SessionDescription::new_jsep_session_description(false);
        d.origin.username = self.config.origin_username.clone();
        d.origin.session_id = self.config.session_id;
        d.origin.session_version = self.session_version;
        d.origin.unicast_address = ORIGIN_UNICAST_ADDRESS.to_owned();

        // RFC 5245 S15.3
        if self.ice_lite {
            d = d.with_property_attribute(ATTR_KEY_ICELITE.to_owned());
        }
        d = d
            .with_fingerprint(
                self.dtls_fingerprint.algorithm.clone(),
                self.dtls_fingerprint.value.to_uppercase(),
            )
            .with_value_attribute(
                ATTR_KEY_MSID_SEMANTIC.to_owned(),
                MSID_SEMANTIC_WMS.to_owned(),
            );
        if !self.bundle_mids.is_empty() {
            d = d.with_value_attribute(
                ATTR_KEY_GROUP.to_owned(),
                format!("{GROUP_BUNDLE} {}", self.bundle_mids.join(" ")),
            );
        }

        for section in &self.media_sections {
            d = d.with_media(section.to_media_description());
        }

        d
    }

    fn index_of(&self, mid: &str) -> Result<usize> {
        self.mid_to_index
            .get(mid)
            .copied()
            .ok_or_else(|| Error::NotFound(mid.to_owned()))
    }

    fn add_media_section(&mut self, section: MediaSection) -> Result<()> {
        let mid = section.mid().to_owned();
        if self.mid_to_index.contains_key(&mid) {
            return Err(Error::malformed(format!(
                "media section with mid {mid:?} already exists"
            )));
        }

        if self.first_mid.is_none() {
            self.first_mid = Some(mid.clone());
        }
        debug!(
            "adding media section mid:{mid} at index {}",
            self.media_sections.len()
        );
        self.mid_to_index.insert(mid, self.media_sections.len());
        self.media_sections.push(section);
        self.regenerate_bundle_mids();

        Ok(())
    }

    fn replace_media_section(&mut self, section: MediaSection, reuse_mid: &str) -> Result<()> {
        let idx = self.index_of(reuse_mid)?;
        let mid = section.mid().to_owned();
        if mid != reuse_mid && self.mid_to_index.contains_key(&mid) {
            return Err(Error::malformed(format!(
                "media section with mid {mid:?} already exists"
            )));
        }

        debug!("replacing media section mid:{reuse_mid} at index {idx} with mid:{mid}");
        self.mid_to_index.remove(reuse_mid);
        self.mid_to_index.insert(mid.clone(), idx);
        if idx == 0 {
            self.first_mid = Some(mid);
        }
        self.media_sections[idx] = section;
        self.regenerate_bundle_mids();

        Ok(())
    }

    fn regenerate_bundle_mids(&mut self) {
        self.bundle_mids = self
            .media_sections
            .iter()
            .filter(|section| !section.is_closed())
            .map(|section| section.mid().to_owned())
            .collect();
    }
}
