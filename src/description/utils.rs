use crate::description::negotiation::{CodecMimeType, SSRC_GROUP_FID};
use crate::description::{
    ATTR_KEY_FINGERPRINT, ATTR_KEY_FMTP, ATTR_KEY_ICE_UFRAG, ATTR_KEY_SSRC, ATTR_KEY_SSRC_GROUP,
};
use crate::error::{Error, Result};
use crate::parameters::rtp::{RtpEncodingParameters, RtpParameters, RtxParameters};
use crate::parameters::transport::{DtlsFingerprint, DtlsParameters, DtlsRole};
use crate::types::SSRC;
use log::{trace, warn};
use sdp::description::common::Attribute;
use sdp::description::session::ATTR_KEY_CONNECTION_SETUP;
use sdp::util::ConnectionRole;
use sdp::{MediaDescription, SessionDescription};

const SSRC_ATTRIBUTE_CNAME: &str = "cname";
const PARAM_SPROP_STEREO: &str = "sprop-stereo";
const PARAM_STEREO: &str = "stereo";

/// `a=ssrc:<id> <attribute>:<value>` split into its parts
fn parse_ssrc_line(value: &str) -> Option<(SSRC, &str, &str)> {
    let (id, rest) = value.split_once(' ')?;
    let id = id.parse::<SSRC>().ok()?;
    let (attribute, value) = rest.split_once(':').unwrap_or((rest, ""));
    Some((id, attribute, value))
}

fn attribute_values<'a>(media: &'a MediaDescription, key: &'a str) -> impl Iterator<Item = &'a str> {
    media
        .attributes
        .iter()
        .filter(move |attr| attr.key == key)
        .filter_map(|attr| attr.value.as_deref())
}

/// get_cname returns the cname of the first ssrc carrying one.
pub fn get_cname(media: &MediaDescription) -> Option<String> {
    attribute_values(media, ATTR_KEY_SSRC)
        .filter_map(parse_ssrc_line)
        .find(|(_, attribute, _)| *attribute == SSRC_ATTRIBUTE_CNAME)
        .map(|(_, _, cname)| cname.to_owned())
}

/// get_rtp_encodings lists one encoding per primary SSRC of a sending m=
/// section, attaching the RTX SSRC announced through an `FID` group.
pub fn get_rtp_encodings(media: &MediaDescription) -> Result<Vec<RtpEncodingParameters>> {
    let mut ssrcs: Vec<SSRC> = vec![];
    for (id, _, _) in attribute_values(media, ATTR_KEY_SSRC).filter_map(parse_ssrc_line) {
        if !ssrcs.contains(&id) {
            ssrcs.push(id);
        }
    }
    if ssrcs.is_empty() {
        return Err(Error::malformed("media section carries no ssrc"));
    }

    let mut rtx_pairs: Vec<(SSRC, SSRC)> = vec![];
    for group in attribute_values(media, ATTR_KEY_SSRC_GROUP) {
        let mut fields = group.split_whitespace();
        if fields.next() != Some(SSRC_GROUP_FID) {
            continue;
        }
        let members: Vec<SSRC> = fields.filter_map(|ssrc| ssrc.parse().ok()).collect();
        match members.as_slice() {
            [ssrc, rtx_ssrc] if ssrcs.contains(ssrc) => {
                ssrcs.retain(|id| id != rtx_ssrc);
                rtx_pairs.push((*ssrc, *rtx_ssrc));
            }
            _ => warn!("ignoring malformed FID group {group:?}"),
        }
    }

    let encodings = ssrcs
        .into_iter()
        .map(|ssrc| RtpEncodingParameters {
            ssrc: Some(ssrc),
            rtx: rtx_pairs
                .iter()
                .find(|(primary, _)| *primary == ssrc)
                .map(|(_, rtx_ssrc)| RtxParameters { ssrc: *rtx_ssrc }),
            ..Default::default()
        })
        .collect();

    Ok(encodings)
}

fn parse_fingerprint(value: &str) -> Option<DtlsFingerprint> {
    let (algorithm, value) = value.trim().split_once(' ')?;
    Some(DtlsFingerprint {
        algorithm: algorithm.to_owned(),
        value: value.trim().to_owned(),
    })
}

/// extract_dtls_parameters reads the fingerprint and the `a=setup` role of
/// the first open m= section carrying ICE credentials.
pub fn extract_dtls_parameters(description: &SessionDescription) -> Result<DtlsParameters> {
    let media = description.media_descriptions.iter().find(|media| {
        media.media_name.port.value != 0 && media.attribute(ATTR_KEY_ICE_UFRAG).is_some()
    });

    let fingerprint = media
        .and_then(|media| media.attribute(ATTR_KEY_FINGERPRINT).flatten())
        .or_else(|| description.attribute(ATTR_KEY_FINGERPRINT))
        .and_then(parse_fingerprint)
        .ok_or_else(|| Error::malformed("no DTLS fingerprint found in description"))?;

    let role = media
        .and_then(|media| media.attribute(ATTR_KEY_CONNECTION_SETUP).flatten())
        .and_then(|setup| DtlsRole::from_connection_role(ConnectionRole::from(setup)))
        .unwrap_or_default();
    trace!("extracted DTLS role {role} with {} fingerprint", fingerprint.algorithm);

    Ok(DtlsParameters {
        role,
        fingerprints: vec![fingerprint],
    })
}

/// apply_codec_parameters copies the offered opus `sprop-stereo` flag into
/// the `stereo` fmtp parameter of the local answer for receiving sections.
pub fn apply_codec_parameters(offer_rtp_parameters: &RtpParameters, answer_media: &mut MediaDescription) {
    for codec in &offer_rtp_parameters.codecs {
        if CodecMimeType::from(codec.mime_type.as_str()) != CodecMimeType::Opus {
            continue;
        }
        let sprop_stereo = match codec.parameters.get(PARAM_SPROP_STEREO) {
            Some(value) => value.to_string() == "1",
            None => continue,
        };

        let prefix = format!("{} ", codec.payload_type);
        let fmtp = answer_media.attributes.iter_mut().find(|attr| {
            attr.key == ATTR_KEY_FMTP
                && attr
                    .value
                    .as_deref()
                    .is_some_and(|value| value.starts_with(&prefix))
        });

        let stereo = format!("{PARAM_STEREO}={}", u8::from(sprop_stereo));
        match fmtp {
            Some(attr) => {
                let config = attr
                    .value
                    .as_deref()
                    .and_then(|value| value.strip_prefix(&prefix))
                    .unwrap_or_default();
                let mut params: Vec<String> = config
                    .split(';')
                    .map(str::trim)
                    .filter(|param| !param.is_empty())
                    .filter(|param| param.split('=').next() != Some(PARAM_STEREO))
                    .map(ToOwned::to_owned)
                    .collect();
                params.push(stereo);
                attr.value = Some(format!("{prefix}{}", params.join(";")));
            }
            None => answer_media.attributes.push(Attribute {
                key: ATTR_KEY_FMTP.to_owned(),
                value: Some(format!("{prefix}{stereo}")),
            }),
        }
    }
}
