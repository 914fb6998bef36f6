use crate::types::{PayloadType, SSRC};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub(crate) const MEDIA_KIND_AUDIO_STR: &str = "audio";
pub(crate) const MEDIA_KIND_VIDEO_STR: &str = "video";
pub(crate) const MEDIA_KIND_APPLICATION_STR: &str = "application";

/// MediaKind is the media type of an m= section.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
    Application,
}

impl MediaKind {
    pub fn is_rtp(&self) -> bool {
        matches!(self, MediaKind::Audio | MediaKind::Video)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            MEDIA_KIND_AUDIO_STR => Some(MediaKind::Audio),
            MEDIA_KIND_VIDEO_STR => Some(MediaKind::Video),
            MEDIA_KIND_APPLICATION_STR => Some(MediaKind::Application),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            MediaKind::Audio => MEDIA_KIND_AUDIO_STR,
            MediaKind::Video => MEDIA_KIND_VIDEO_STR,
            MediaKind::Application => MEDIA_KIND_APPLICATION_STR,
        };
        write!(f, "{s}")
    }
}

/// A single codec parameter value, as found in fmtp lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CodecParameterValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for CodecParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecParameterValue::Integer(v) => write!(f, "{v}"),
            CodecParameterValue::Float(v) => write!(f, "{v}"),
            CodecParameterValue::String(v) => write!(f, "{v}"),
        }
    }
}

impl From<i64> for CodecParameterValue {
    fn from(v: i64) -> Self {
        CodecParameterValue::Integer(v)
    }
}

impl From<u32> for CodecParameterValue {
    fn from(v: u32) -> Self {
        CodecParameterValue::Integer(v as i64)
    }
}

impl From<bool> for CodecParameterValue {
    fn from(v: bool) -> Self {
        CodecParameterValue::Integer(v as i64)
    }
}

impl From<&str> for CodecParameterValue {
    fn from(v: &str) -> Self {
        CodecParameterValue::String(v.to_owned())
    }
}

/// Codec parameters keyed by name; iteration is in ascending key order.
pub type CodecParameters = BTreeMap<String, CodecParameterValue>;

/// rtcpfeedback signals the connection to use additional RTCP packet types.
/// <https://draft.ortc.org/#dom-rtcrtcpfeedback>
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcpFeedback {
    /// Type is the type of feedback.
    /// valid: ack, ccm, nack, goog-remb, transport-cc
    #[serde(rename = "type")]
    pub typ: String,

    /// The parameter value depends on the type.
    /// For example, type="nack" parameter="pli" will send Picture Loss Indicator packets.
    #[serde(default)]
    pub parameter: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpCodecParameters {
    pub mime_type: String,
    pub payload_type: PayloadType,
    pub clock_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u16>,
    #[serde(default)]
    pub parameters: CodecParameters,
    #[serde(default)]
    pub rtcp_feedback: Vec<RtcpFeedback>,
}

impl RtpCodecParameters {
    /// codec name as written in rtpmap, the mime type without its `audio/` or `video/` prefix
    pub fn codec_name(&self) -> &str {
        match self.mime_type.split_once('/') {
            Some((kind, name))
                if kind.eq_ignore_ascii_case(MEDIA_KIND_AUDIO_STR)
                    || kind.eq_ignore_ascii_case(MEDIA_KIND_VIDEO_STR) =>
            {
                name
            }
            _ => &self.mime_type,
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpHeaderExtensionParameters {
    pub uri: String,
    pub id: u16,
    #[serde(default)]
    pub encrypt: bool,
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtxParameters {
    pub ssrc: SSRC,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpEncodingParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssrc: Option<SSRC>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_payload_type: Option<PayloadType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtx: Option<RtxParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dtx: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalability_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcpParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reduced_size: Option<bool>,
}

/// RtpParameters is a list of negotiated codecs, header extensions and encodings
/// for one sender or receiver.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtpParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    #[serde(default)]
    pub codecs: Vec<RtpCodecParameters>,
    #[serde(default)]
    pub header_extensions: Vec<RtpHeaderExtensionParameters>,
    #[serde(default)]
    pub encodings: Vec<RtpEncodingParameters>,
    #[serde(default)]
    pub rtcp: RtcpParameters,
}
