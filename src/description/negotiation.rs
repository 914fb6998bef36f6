use crate::description::media_direction::StreamDirection;
use crate::description::media_section::{
    ExtMapEntry, FmtpEntry, Rid, RtcpFbEntry, RtpMapEntry, Simulcast, SsrcAttribute, SsrcGroup,
};
use crate::description::offer_media::OfferMedia;
use crate::error::{Error, Result};
use crate::parameters::codec_options::ProducerCodecOptions;
use crate::parameters::rtp::{
    CodecParameters, RtpCodecParameters, RtpHeaderExtensionParameters, RtpParameters,
};
use log::{debug, warn};
use url::Url;

pub(crate) const SSRC_GROUP_FID: &str = "FID";
pub(crate) const SCALABILITY_MODE_S1T3: &str = "S1T3";

const PARAM_OPUS_SPROP_STEREO: &str = "sprop-stereo";
const PARAM_OPUS_STEREO: &str = "stereo";
const PARAM_OPUS_USE_INBAND_FEC: &str = "useinbandfec";
const PARAM_OPUS_USE_DTX: &str = "usedtx";
const PARAM_OPUS_MAX_PLAYBACK_RATE: &str = "maxplaybackrate";
const PARAM_OPUS_PTIME: &str = "ptime";
const PARAM_GOOGLE_START_BITRATE: &str = "x-google-start-bitrate";
const PARAM_GOOGLE_MAX_BITRATE: &str = "x-google-max-bitrate";
const PARAM_GOOGLE_MIN_BITRATE: &str = "x-google-min-bitrate";

/// CodecMimeType is the closed set of codecs the tuning policy knows about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodecMimeType {
    Opus,
    Vp8,
    Vp9,
    H264,
    H265,
    Other,
}

impl From<&str> for CodecMimeType {
    fn from(mime_type: &str) -> Self {
        match mime_type.to_ascii_lowercase().as_str() {
            "audio/opus" => CodecMimeType::Opus,
            "video/vp8" => CodecMimeType::Vp8,
            "video/vp9" => CodecMimeType::Vp9,
            "video/h264" => CodecMimeType::H264,
            "video/h265" => CodecMimeType::H265,
            _ => CodecMimeType::Other,
        }
    }
}

/// Codec lines of an m= section.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodecTable {
    pub(crate) rtp: Vec<RtpMapEntry>,
    pub(crate) fmtp: Vec<FmtpEntry>,
    pub(crate) rtcp_fb: Vec<RtcpFbEntry>,
    pub(crate) payloads: String,
}

/// fmtp_config formats codec parameters as `key=value;key=value` in key order.
pub fn fmtp_config(parameters: &CodecParameters) -> String {
    parameters
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<String>>()
        .join(";")
}

/// codec_table builds rtpmap, fmtp and rtcp-fb lines plus the m= line payload list.
pub(crate) fn codec_table(codecs: &[RtpCodecParameters]) -> CodecTable {
    let mut table = CodecTable::default();
    let mut payloads = vec![];

    for codec in codecs {
        table.rtp.push(RtpMapEntry {
            payload: codec.payload_type,
            codec: codec.codec_name().to_owned(),
            rate: codec.clock_rate,
            encoding: codec.channels.filter(|channels| *channels > 1),
        });

        let config = fmtp_config(&codec.parameters);
        if !config.is_empty() {
            table.fmtp.push(FmtpEntry {
                payload: codec.payload_type,
                config,
            });
        }

        for fb in &codec.rtcp_feedback {
            table.rtcp_fb.push(RtcpFbEntry {
                payload: codec.payload_type,
                typ: fb.typ.clone(),
                subtype: fb.parameter.clone(),
            });
        }

        payloads.push(codec.payload_type.to_string());
    }

    table.payloads = payloads.join(" ");
    table
}

fn validate_extension_uri(uri: &str) -> Result<()> {
    Url::parse(uri)
        .map(|_| ())
        .map_err(|err| Error::malformed(format!("invalid header extension uri {uri:?}: {err}")))
}

/// offer_header_extensions lists every extension of a first proposal as-is.
pub(crate) fn offer_header_extensions(
    extensions: &[RtpHeaderExtensionParameters],
) -> Result<Vec<ExtMapEntry>> {
    extensions
        .iter()
        .map(|ext| {
            validate_extension_uri(&ext.uri)?;
            Ok(ExtMapEntry {
                uri: ext.uri.clone(),
                value: ext.id,
            })
        })
        .collect()
}

/// intersect_header_extensions keeps the answer extensions whose URI was
/// offered, the others are dropped.
pub(crate) fn intersect_header_extensions(
    answer: &[RtpHeaderExtensionParameters],
    offered: &[ExtMapEntry],
) -> Result<Vec<ExtMapEntry>> {
    let mut extensions = vec![];
    for ext in answer {
        if !offered.iter().any(|offered| offered.uri == ext.uri) {
            warn!("dropping header extension {} absent from the offer", ext.uri);
            continue;
        }
        validate_extension_uri(&ext.uri)?;
        extensions.push(ExtMapEntry {
            uri: ext.uri.clone(),
            value: ext.id,
        });
    }
    Ok(extensions)
}

/// ssrc_entries describes the first encoding with cname and msid, pairing an
/// RTX stream to its primary with a FID group.
///
/// Nothing is emitted when the parameters carry no RTCP cname.
pub(crate) fn ssrc_entries(
    params: &RtpParameters,
    stream_id: &str,
    track_id: &str,
) -> Result<(Vec<SsrcAttribute>, Vec<SsrcGroup>)> {
    let encoding = params
        .encodings
        .first()
        .ok_or_else(|| Error::malformed("RTP parameters carry no encoding"))?;
    let ssrc = encoding
        .ssrc
        .ok_or_else(|| Error::malformed("first RTP encoding carries no ssrc"))?;
    let rtx_ssrc = encoding.rtx.map(|rtx| rtx.ssrc);

    let cname = match &params.rtcp.cname {
        Some(cname) => cname,
        None => {
            debug!("no RTCP cname, omitting ssrc attributes for ssrc {ssrc}");
            return Ok((vec![], vec![]));
        }
    };
    let msid = format!("{stream_id} {track_id}");

    let mut ssrcs = vec![];
    let mut groups = vec![];
    for id in std::iter::once(ssrc).chain(rtx_ssrc) {
        ssrcs.push(SsrcAttribute {
            id,
            attribute: "cname".to_owned(),
            value: cname.clone(),
        });
        ssrcs.push(SsrcAttribute {
            id,
            attribute: "msid".to_owned(),
            value: msid.clone(),
        });
    }
    if let Some(rtx_ssrc) = rtx_ssrc {
        groups.push(SsrcGroup {
            semantics: SSRC_GROUP_FID.to_owned(),
            ssrcs: vec![ssrc, rtx_ssrc],
        });
    }

    Ok((ssrcs, groups))
}

/// answer_simulcast mirrors the offered simulcast description in the receive
/// direction, keeping only the rids the offer sends.
pub(crate) fn answer_simulcast(offer: &OfferMedia) -> (Option<Simulcast>, Vec<Rid>) {
    let simulcast = match &offer.simulcast {
        Some(simulcast) if !offer.rids.is_empty() => simulcast,
        _ => return (None, vec![]),
    };

    let rids = offer
        .rids
        .iter()
        .filter(|rid| rid.direction == StreamDirection::Send)
        .map(|rid| Rid {
            id: rid.id.clone(),
            direction: rid.direction.reverse(),
        })
        .collect();

    (
        Some(Simulcast {
            direction: StreamDirection::Recv,
            list: simulcast.list.clone(),
        }),
        rids,
    )
}

/// RTP parameters of both sides after codec options have been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiatedParameters {
    pub offer: RtpParameters,
    pub answer: RtpParameters,
}

fn set_flag(parameters: &mut CodecParameters, key: &str, enabled: bool) {
    parameters.insert(key.to_owned(), enabled.into());
}

/// negotiate_codec_options applies per-codec tuning to the answer parameters.
///
/// Opus stereo, FEC and DTX are also written into the offer codec with the same
/// payload type; the updated offer is part of the result.
pub fn negotiate_codec_options(
    offer: &RtpParameters,
    answer: &RtpParameters,
    options: Option<&ProducerCodecOptions>,
) -> Result<NegotiatedParameters> {
    let mut negotiated = NegotiatedParameters {
        offer: offer.clone(),
        answer: answer.clone(),
    };

    let options = match options {
        Some(options) if !options.is_empty() => options,
        _ => return Ok(negotiated),
    };

    for codec in negotiated.answer.codecs.iter_mut() {
        let mime_type = CodecMimeType::from(codec.mime_type.as_str());
        match mime_type {
            CodecMimeType::Opus => {
                let offer_codec = negotiated
                    .offer
                    .codecs
                    .iter_mut()
                    .find(|offer_codec| offer_codec.payload_type == codec.payload_type)
                    .ok_or_else(|| {
                        Error::malformed(format!(
                            "no offered codec with payload type {}",
                            codec.payload_type
                        ))
                    })?;

                if let Some(stereo) = options.opus_stereo {
                    set_flag(&mut offer_codec.parameters, PARAM_OPUS_SPROP_STEREO, stereo);
                    set_flag(&mut codec.parameters, PARAM_OPUS_STEREO, stereo);
                }
                if let Some(fec) = options.opus_fec {
                    set_flag(&mut offer_codec.parameters, PARAM_OPUS_USE_INBAND_FEC, fec);
                    set_flag(&mut codec.parameters, PARAM_OPUS_USE_INBAND_FEC, fec);
                }
                if let Some(dtx) = options.opus_dtx {
                    set_flag(&mut offer_codec.parameters, PARAM_OPUS_USE_DTX, dtx);
                    set_flag(&mut codec.parameters, PARAM_OPUS_USE_DTX, dtx);
                }
                if let Some(rate) = options.opus_max_playback_rate {
                    codec
                        .parameters
                        .insert(PARAM_OPUS_MAX_PLAYBACK_RATE.to_owned(), rate.into());
                }
                if let Some(ptime) = options.opus_ptime {
                    codec
                        .parameters
                        .insert(PARAM_OPUS_PTIME.to_owned(), ptime.into());
                }
                if options.has_video_options() {
                    warn!("ignoring video codec options for {}", codec.mime_type);
                }
            }
            CodecMimeType::Vp8 | CodecMimeType::Vp9 | CodecMimeType::H264 | CodecMimeType::H265 => {
                if let Some(bitrate) = options.video_google_start_bitrate {
                    codec
                        .parameters
                        .insert(PARAM_GOOGLE_START_BITRATE.to_owned(), bitrate.into());
                }
                if let Some(bitrate) = options.video_google_max_bitrate {
                    codec
                        .parameters
                        .insert(PARAM_GOOGLE_MAX_BITRATE.to_owned(), bitrate.into());
                }
                if let Some(bitrate) = options.video_google_min_bitrate {
                    codec
                        .parameters
                        .insert(PARAM_GOOGLE_MIN_BITRATE.to_owned(), bitrate.into());
                }
                if options.has_opus_options() {
                    warn!("ignoring opus codec options for {}", codec.mime_type);
                }
            }
            CodecMimeType::Other => {}
        }
    }

    Ok(negotiated)
}

/// apply_simulcast_scalability_mode forces temporal-only layering on every
/// encoding when several are sent with VP8 or H264.
///
/// Returns whether the encodings were changed.
pub fn apply_simulcast_scalability_mode(params: &mut RtpParameters) -> bool {
    if params.encodings.len() <= 1 {
        return false;
    }
    let mime_type = match params.codecs.first() {
        Some(codec) => CodecMimeType::from(codec.mime_type.as_str()),
        None => return false,
    };
    if !matches!(mime_type, CodecMimeType::Vp8 | CodecMimeType::H264) {
        return false;
    }

    for encoding in params.encodings.iter_mut() {
        encoding.scalability_mode = Some(SCALABILITY_MODE_S1T3.to_owned());
    }
    true
}
