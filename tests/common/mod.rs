#![allow(dead_code)]

use log::info;
use log::LevelFilter::Debug;
use remote_sdp::{
    CodecParameterValue, DtlsFingerprint, DtlsParameters, DtlsRole, ExtMapEntry, IceCandidate,
    IceCandidateType, IceParameters, IceProtocol, IceTcpType, MediaKind, OfferMedia, RemoteSdp,
    RemoteSdpConfig, RtcpFeedback, RtcpParameters, RtpCodecParameters, RtpEncodingParameters,
    RtpHeaderExtensionParameters, RtpParameters, RtxParameters, SctpParameters,
};
use std::io::Write;

pub const SESSION_ID: u64 = 4_611_686_018_427_387;

pub const EXT_MID: &str = "urn:ietf:params:rtp-hdrext:sdes:mid";
pub const EXT_ABS_SEND_TIME: &str = "http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time";
pub const EXT_TRANSPORT_CC: &str =
    "http://www.ietf.org/id/draft-holmer-rmcat-transport-wide-cc-extensions-01";
pub const EXT_AUDIO_LEVEL: &str = "urn:ietf:params:rtp-hdrext:ssrc-audio-level";

pub fn setup() -> anyhow::Result<()> {
    // every test of a binary calls setup, only the first one installs the logger
    let _ = env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{} [{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                chrono::Local::now().format("%H:%M:%S.%6f"),
                record.args()
            )
        })
        .filter(None, Debug)
        .is_test(true)
        .try_init();

    info!("common setup");

    Ok(())
}

pub fn ice_parameters() -> IceParameters {
    IceParameters {
        username_fragment: "server-ufrag".to_owned(),
        password: "server-password".to_owned(),
        ice_lite: Some(true),
    }
}

pub fn ice_candidates() -> Vec<IceCandidate> {
    vec![
        IceCandidate {
            foundation: "udpcandidate".to_owned(),
            ip: "9.9.9.9".to_owned(),
            port: 40533,
            priority: 1078862079,
            protocol: IceProtocol::Udp,
            typ: IceCandidateType::Host,
            tcp_type: None,
        },
        IceCandidate {
            foundation: "tcpcandidate".to_owned(),
            ip: "9.9.9.9".to_owned(),
            port: 41333,
            priority: 1078862078,
            protocol: IceProtocol::Tcp,
            typ: IceCandidateType::Host,
            tcp_type: Some(IceTcpType::Passive),
        },
    ]
}

pub fn dtls_parameters() -> DtlsParameters {
    DtlsParameters {
        role: DtlsRole::Auto,
        fingerprints: vec![
            DtlsFingerprint {
                algorithm: "sha-1".to_owned(),
                value: "aa:bb:cc".to_owned(),
            },
            DtlsFingerprint {
                algorithm: "sha-256".to_owned(),
                value: "d1:e2:f3".to_owned(),
            },
        ],
    }
}

pub fn sctp_parameters() -> SctpParameters {
    SctpParameters {
        port: 5000,
        os: 1024,
        mis: 1024,
        max_message_size: 262144,
    }
}

pub fn config() -> RemoteSdpConfig {
    RemoteSdpConfig::new().with_session_id(SESSION_ID)
}

pub fn remote_sdp() -> anyhow::Result<RemoteSdp> {
    Ok(RemoteSdp::new(
        ice_parameters(),
        ice_candidates(),
        dtls_parameters(),
        Some(sctp_parameters()),
        config(),
    )?)
}

pub fn opus_codec(payload_type: u8) -> RtpCodecParameters {
    let mut codec = RtpCodecParameters {
        mime_type: "audio/opus".to_owned(),
        payload_type,
        clock_rate: 48000,
        channels: Some(2),
        ..Default::default()
    };
    codec
        .parameters
        .insert("minptime".to_owned(), CodecParameterValue::Integer(10));
    codec
        .parameters
        .insert("useinbandfec".to_owned(), CodecParameterValue::Integer(1));
    codec.rtcp_feedback.push(RtcpFeedback {
        typ: "transport-cc".to_owned(),
        parameter: String::new(),
    });
    codec
}

pub fn pcmu_codec() -> RtpCodecParameters {
    RtpCodecParameters {
        mime_type: "audio/PCMU".to_owned(),
        payload_type: 0,
        clock_rate: 8000,
        channels: Some(1),
        ..Default::default()
    }
}

pub fn vp8_codec(payload_type: u8) -> RtpCodecParameters {
    RtpCodecParameters {
        mime_type: "video/VP8".to_owned(),
        payload_type,
        clock_rate: 90000,
        channels: None,
        parameters: Default::default(),
        rtcp_feedback: vec![
            RtcpFeedback {
                typ: "nack".to_owned(),
                parameter: String::new(),
            },
            RtcpFeedback {
                typ: "nack".to_owned(),
                parameter: "pli".to_owned(),
            },
        ],
    }
}

pub fn rtx_codec(payload_type: u8, apt: u8) -> RtpCodecParameters {
    let mut codec = RtpCodecParameters {
        mime_type: "video/rtx".to_owned(),
        payload_type,
        clock_rate: 90000,
        ..Default::default()
    };
    codec
        .parameters
        .insert("apt".to_owned(), CodecParameterValue::Integer(apt as i64));
    codec
}

pub fn header_extension(uri: &str, id: u16) -> RtpHeaderExtensionParameters {
    RtpHeaderExtensionParameters {
        uri: uri.to_owned(),
        id,
        encrypt: false,
    }
}

pub fn audio_rtp_parameters() -> RtpParameters {
    RtpParameters {
        mid: Some("0".to_owned()),
        codecs: vec![opus_codec(111), pcmu_codec()],
        header_extensions: vec![
            header_extension(EXT_MID, 1),
            header_extension(EXT_AUDIO_LEVEL, 10),
        ],
        encodings: vec![RtpEncodingParameters {
            ssrc: Some(1111),
            ..Default::default()
        }],
        rtcp: RtcpParameters {
            cname: Some("audio-cname".to_owned()),
            reduced_size: Some(true),
        },
    }
}

pub fn video_rtp_parameters() -> RtpParameters {
    RtpParameters {
        mid: Some("1".to_owned()),
        codecs: vec![vp8_codec(96), rtx_codec(97, 96)],
        header_extensions: vec![
            header_extension(EXT_MID, 1),
            header_extension(EXT_ABS_SEND_TIME, 4),
            header_extension(EXT_TRANSPORT_CC, 5),
        ],
        encodings: vec![RtpEncodingParameters {
            ssrc: Some(2222),
            rtx: Some(RtxParameters { ssrc: 3333 }),
            ..Default::default()
        }],
        rtcp: RtcpParameters {
            cname: Some("video-cname".to_owned()),
            reduced_size: Some(true),
        },
    }
}

/// offer_media describes an m= section of the local offer with the given extensions.
pub fn offer_media(mid: &str, kind: MediaKind, extensions: &[(&str, u16)]) -> OfferMedia {
    let protocol = if kind == MediaKind::Application {
        "UDP/DTLS/SCTP"
    } else {
        "UDP/TLS/RTP/SAVPF"
    };
    let mut offer = OfferMedia::new(mid, kind, protocol);
    offer.extensions = extensions
        .iter()
        .map(|(uri, value)| ExtMapEntry {
            uri: (*uri).to_owned(),
            value: *value,
        })
        .collect();
    offer
}

/// assert_bundle_invariant checks bundle mids are the mids of open sections in position order.
pub fn assert_bundle_invariant(remote_sdp: &RemoteSdp) {
    let expected: Vec<String> = remote_sdp
        .media_sections()
        .iter()
        .filter(|section| !section.is_closed())
        .map(|section| section.mid().to_owned())
        .collect();
    assert_eq!(remote_sdp.bundle_mids(), expected.as_slice());

    for (idx, section) in remote_sdp.media_sections().iter().enumerate() {
        assert_eq!(remote_sdp.media_section_index(section.mid()), Some(idx));
    }
}
