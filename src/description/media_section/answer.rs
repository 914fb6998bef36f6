use super::MediaObject;
use crate::config::RemoteSdpConfig;
use crate::description::media_direction::MediaDirection;
use crate::description::negotiation::{answer_simulcast, codec_table, intersect_header_extensions};
use crate::description::offer_media::OfferMedia;
use crate::description::SCTP_PAYLOADS;
use crate::error::{Error, Result};
use crate::parameters::rtp::{MediaKind, RtpParameters};
use crate::parameters::transport::{DtlsRole, IceCandidate, IceParameters, SctpParameters};

/// AnswerMediaSection responds to an m= section the local transport offered,
/// staying within what that offer allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerMediaSection {
    pub(crate) object: MediaObject,
}

impl AnswerMediaSection {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        ice_parameters: &IceParameters,
        ice_candidates: &[IceCandidate],
        dtls_role: DtlsRole,
        sctp_parameters: Option<&SctpParameters>,
        offer_media: &OfferMedia,
        answer_rtp_parameters: Option<&RtpParameters>,
        config: &RemoteSdpConfig,
    ) -> Result<Self> {
        let mut object = MediaObject::new(
            offer_media.mid.clone(),
            offer_media.kind,
            offer_media.protocol.clone(),
            ice_parameters,
            ice_candidates,
            config,
        );
        object.setup = dtls_role.to_connection_role();

        match offer_media.kind {
            MediaKind::Audio | MediaKind::Video => {
                let params = answer_rtp_parameters.ok_or_else(|| {
                    Error::malformed(format!(
                        "{} answer section requires RTP parameters",
                        offer_media.kind
                    ))
                })?;
                if params.codecs.is_empty() {
                    return Err(Error::malformed("answer RTP parameters carry no codec"));
                }

                let table = codec_table(&params.codecs);
                object.direction = MediaDirection::Recvonly;
                object.rtp = table.rtp;
                object.fmtp = table.fmtp;
                object.rtcp_fb = table.rtcp_fb;
                object.payloads = table.payloads;
                object.extensions = intersect_header_extensions(
                    &params.header_extensions,
                    &offer_media.extensions,
                )?;
                object.extmap_allow_mixed = offer_media.extmap_allow_mixed;
                object.rtcp_mux = true;
                object.rtcp_rsize = true;

                if offer_media.kind == MediaKind::Video {
                    let (simulcast, rids) = answer_simulcast(offer_media);
                    object.simulcast = simulcast;
                    object.rids = rids;
                }
            }
            MediaKind::Application => {
                let sctp = sctp_parameters.ok_or_else(|| {
                    Error::malformed("application answer section requires SCTP parameters")
                })?;

                object.payloads = SCTP_PAYLOADS.to_owned();
                object.sctp_port = Some(sctp.port);
                object.max_message_size = Some(sctp.max_message_size);
            }
        }

        Ok(Self { object })
    }

    pub fn object(&self) -> &MediaObject {
        &self.object
    }
}
