#![warn(rust_2018_idioms)]

pub(crate) mod config;
pub(crate) mod description;
pub(crate) mod error;
pub(crate) mod parameters;
pub(crate) mod types;

pub use config::RemoteSdpConfig;
pub use description::{
    get_media_by_mid,
    media_direction::{MediaDirection, StreamDirection},
    media_section::{
        AnswerMediaSection, ExtMapEntry, FmtpEntry, MediaObject, MediaSection, OfferMediaSection,
        Rid, RtcpFbEntry, RtpMapEntry, Simulcast, SsrcAttribute, SsrcGroup,
    },
    negotiation::{
        apply_simulcast_scalability_mode, fmtp_config, negotiate_codec_options, CodecMimeType,
        NegotiatedParameters,
    },
    offer_media::OfferMedia,
    parse,
    utils::{apply_codec_parameters, extract_dtls_parameters, get_cname, get_rtp_encodings},
    MediaSectionIdx, RemoteSdp, DATACHANNEL_MID,
};
pub use error::{Error, Result};
pub use parameters::{
    codec_options::ProducerCodecOptions,
    rtp::{
        CodecParameterValue, CodecParameters, MediaKind, RtcpFeedback, RtcpParameters,
        RtpCodecParameters, RtpEncodingParameters, RtpHeaderExtensionParameters, RtpParameters,
        RtxParameters,
    },
    transport::{
        DtlsFingerprint, DtlsParameters, DtlsRole, IceCandidate, IceCandidateType, IceParameters,
        IceProtocol, IceTcpType, SctpParameters,
    },
};
pub use types::{Mid, PayloadType, SSRC};
