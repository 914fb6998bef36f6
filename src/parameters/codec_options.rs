use serde::{Deserialize, Serialize};

/// Per-producer codec tuning applied while building an answer section.
///
/// Opus stereo, FEC and DTX are signalled on both sides of the negotiation;
/// every other option only affects the answer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerCodecOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opus_stereo: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opus_fec: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opus_dtx: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opus_max_playback_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opus_ptime: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_google_start_bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_google_max_bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_google_min_bitrate: Option<u32>,
}

impl ProducerCodecOptions {
    pub fn is_empty(&self) -> bool {
        *self == ProducerCodecOptions::default()
    }

    pub(crate) fn has_opus_options(&self) -> bool {
        self.opus_stereo.is_some()
            || self.opus_fec.is_some()
            || self.opus_dtx.is_some()
            || self.opus_max_playback_rate.is_some()
            || self.opus_ptime.is_some()
    }

    pub(crate) fn has_video_options(&self) -> bool {
        self.video_google_start_bitrate.is_some()
            || self.video_google_max_bitrate.is_some()
            || self.video_google_min_bitrate.is_some()
    }
}
