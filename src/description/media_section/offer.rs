use super::MediaObject;
use crate::config::RemoteSdpConfig;
use crate::description::media_direction::MediaDirection;
use crate::description::negotiation::{codec_table, offer_header_extensions, ssrc_entries};
use crate::description::{PROTOCOL_RTP, PROTOCOL_SCTP, SCTP_PAYLOADS};
use crate::error::{Error, Result};
use crate::parameters::rtp::{MediaKind, RtpParameters};
use crate::parameters::transport::{IceCandidate, IceParameters, SctpParameters};
use crate::types::Mid;
use sdp::util::ConnectionRole;

/// OfferMediaSection is an m= section proposed to the peer, for a stream the
/// server sends or for the data channel association the peer opened.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferMediaSection {
    pub(crate) object: MediaObject,
}

impl OfferMediaSection {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ice_parameters: &IceParameters,
        ice_candidates: &[IceCandidate],
        sctp_parameters: Option<&SctpParameters>,
        mid: Mid,
        kind: MediaKind,
        offer_rtp_parameters: Option<&RtpParameters>,
        stream_id: &str,
        track_id: &str,
        config: &RemoteSdpConfig,
    ) -> Result<Self> {
        let protocol = if kind.is_rtp() {
            PROTOCOL_RTP
        } else {
            PROTOCOL_SCTP
        };
        let mut object = MediaObject::new(
            mid,
            kind,
            protocol.to_owned(),
            ice_parameters,
            ice_candidates,
            config,
        );
        object.setup = ConnectionRole::Actpass;

        if kind.is_rtp() {
            let params = offer_rtp_parameters.ok_or_else(|| {
                Error::malformed(format!("{kind} offer section requires RTP parameters"))
            })?;
            if params.codecs.is_empty() {
                return Err(Error::malformed("offer RTP parameters carry no codec"));
            }

            let table = codec_table(&params.codecs);
            let (ssrcs, ssrc_groups) = ssrc_entries(params, stream_id, track_id)?;

            object.direction = MediaDirection::Sendonly;
            object.rtp = table.rtp;
            object.fmtp = table.fmtp;
            object.rtcp_fb = table.rtcp_fb;
            object.payloads = table.payloads;
            object.extensions = offer_header_extensions(&params.header_extensions)?;
            object.rtcp_mux = true;
            object.rtcp_rsize = true;
            object.ssrcs = ssrcs;
            object.ssrc_groups = ssrc_groups;
        } else {
            let sctp = sctp_parameters.ok_or_else(|| {
                Error::malformed("application offer section requires SCTP parameters")
            })?;

            object.payloads = SCTP_PAYLOADS.to_owned();
            object.sctp_port = Some(sctp.port);
            object.max_message_size = Some(sctp.max_message_size);
        }

        Ok(Self { object })
    }

    pub fn object(&self) -> &MediaObject {
        &self.object
    }
}
