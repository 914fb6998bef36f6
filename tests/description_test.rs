use crate::common::{audio_rtp_parameters, remote_sdp, setup, video_rtp_parameters, SESSION_ID};
use remote_sdp::{
    apply_codec_parameters, extract_dtls_parameters, get_cname, get_media_by_mid,
    get_rtp_encodings, parse, DtlsRole, Error, MediaKind, OfferMedia, RtxParameters,
    StreamDirection,
};

// importing common module.
mod common;

const LOCAL_OFFER: &str = "v=0\r
o=- 3497579305088229251 2 IN IP4 127.0.0.1\r
s=-\r
t=0 0\r
a=group:BUNDLE 0 1\r
a=msid-semantic:WMS stream\r
m=audio 9 UDP/TLS/RTP/SAVPF 111\r
c=IN IP4 0.0.0.0\r
a=mid:0\r
a=ice-ufrag:AbCd\r
a=ice-pwd:EfGhIjKlMnOpQrStUvWxYz01\r
a=fingerprint:sha-256 0F:74:31:25:CB:A2:13:EC:28:6F:6D:2C:61:FF:5D:C2\r
a=setup:active\r
a=sendonly\r
a=extmap:1 urn:ietf:params:rtp-hdrext:sdes:mid\r
a=extmap:10 urn:ietf:params:rtp-hdrext:ssrc-audio-level\r
a=rtpmap:111 opus/48000/2\r
a=fmtp:111 minptime=10;useinbandfec=1\r
a=ssrc:1111 cname:local-cname\r
a=ssrc:1111 msid:stream audio\r
m=video 9 UDP/TLS/RTP/SAVPF 96 97\r
c=IN IP4 0.0.0.0\r
a=mid:1\r
a=ice-ufrag:AbCd\r
a=ice-pwd:EfGhIjKlMnOpQrStUvWxYz01\r
a=fingerprint:sha-256 0F:74:31:25:CB:A2:13:EC:28:6F:6D:2C:61:FF:5D:C2\r
a=setup:active\r
a=sendonly\r
a=extmap:1 urn:ietf:params:rtp-hdrext:sdes:mid\r
a=extmap:4 http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time\r
a=extmap-allow-mixed\r
a=rtpmap:96 VP8/90000\r
a=rtpmap:97 rtx/90000\r
a=fmtp:97 apt=96\r
a=rid:r0 send\r
a=rid:r1 send\r
a=rid:r2 send\r
a=simulcast:send r0;r1;r2\r
";

const ANSWER_ATTRIBUTE_ORDER: [&str; 21] = [
    "rtpmap",
    "fmtp",
    "rtcp-fb",
    "extmap",
    "extmap-allow-mixed",
    "setup",
    "mid",
    "recvonly",
    "ice-ufrag",
    "ice-pwd",
    "candidate",
    "end-of-candidates",
    "ice-options",
    "ssrc",
    "ssrc-group",
    "rtcp-mux",
    "rtcp-rsize",
    "rid",
    "simulcast",
    "sctp-port",
    "max-message-size",
];

#[test]
fn test_get_sdp_layout() -> anyhow::Result<()> {
    setup()?;

    let mut remote_sdp = remote_sdp()?;
    remote_sdp.create_offer("0", MediaKind::Audio, &audio_rtp_parameters(), "stream", "audio")?;
    remote_sdp.create_offer("1", MediaKind::Video, &video_rtp_parameters(), "stream", "video")?;
    remote_sdp.create_offer("2", MediaKind::Audio, &audio_rtp_parameters(), "stream", "other")?;
    remote_sdp.close_media_section("2")?;

    let sdp = remote_sdp.get_sdp();
    assert!(sdp.starts_with("v=0\r\n"));
    let expected_lines = [
        format!("o=remote-sdp {SESSION_ID} 1 IN IP4 0.0.0.0"),
        "s=-".to_owned(),
        "t=0 0".to_owned(),
        "a=ice-lite".to_owned(),
        "a=fingerprint:sha-256 D1:E2:F3".to_owned(),
        "a=msid-semantic:WMS *".to_owned(),
        "a=group:BUNDLE 0 1".to_owned(),
        "m=audio 7 UDP/TLS/RTP/SAVPF 111 0".to_owned(),
        "c=IN IP4 127.0.0.1".to_owned(),
        "a=rtpmap:111 opus/48000/2".to_owned(),
        "a=rtpmap:0 PCMU/8000".to_owned(),
        "a=fmtp:111 minptime=10;useinbandfec=1".to_owned(),
        "a=rtcp-fb:111 transport-cc".to_owned(),
        "a=extmap:1 urn:ietf:params:rtp-hdrext:sdes:mid".to_owned(),
        "a=setup:actpass".to_owned(),
        "a=mid:0".to_owned(),
        "a=sendonly".to_owned(),
        "a=ice-ufrag:server-ufrag".to_owned(),
        "a=ice-pwd:server-password".to_owned(),
        "a=candidate:udpcandidate 1 udp 1078862079 9.9.9.9 40533 typ host".to_owned(),
        "a=candidate:tcpcandidate 1 tcp 1078862078 9.9.9.9 41333 typ host tcptype passive"
            .to_owned(),
        "a=end-of-candidates".to_owned(),
        "a=ice-options:renomination".to_owned(),
        "a=ssrc:1111 cname:audio-cname".to_owned(),
        "a=ssrc:1111 msid:stream audio".to_owned(),
        "a=rtcp-mux".to_owned(),
        "a=rtcp-rsize".to_owned(),
        "m=video 7 UDP/TLS/RTP/SAVPF 96 97".to_owned(),
        "a=rtcp-fb:96 nack pli".to_owned(),
        "a=fmtp:97 apt=96".to_owned(),
        "a=ssrc-group:FID 2222 3333".to_owned(),
        "m=audio 0 UDP/TLS/RTP/SAVPF 111 0".to_owned(),
    ];
    let lines: Vec<&str> = sdp.split("\r\n").collect();
    for expected in &expected_lines {
        assert!(
            lines.contains(&expected.as_str()),
            "missing {expected:?} in\n{sdp}"
        );
    }
    // the closed section keeps its codecs but loses its streams
    assert_eq!(sdp.matches("a=ssrc:1111 ").count(), 2);

    Ok(())
}

#[test]
fn test_parse_invalid() -> anyhow::Result<()> {
    setup()?;

    assert!(matches!(parse("not a session description"), Err(Error::Codec(_))));

    Ok(())
}

#[test]
fn test_local_offer_helpers() -> anyhow::Result<()> {
    setup()?;

    let local = parse(LOCAL_OFFER)?;

    let dtls = extract_dtls_parameters(&local)?;
    assert_eq!(dtls.role, DtlsRole::Client);
    assert_eq!(dtls.fingerprints.len(), 1);
    assert_eq!(dtls.fingerprints[0].algorithm, "sha-256");
    assert!(dtls.fingerprints[0].value.starts_with("0F:74"));

    let audio = get_media_by_mid(&local, "0").ok_or_else(|| anyhow::anyhow!("no mid 0"))?;
    assert_eq!(get_cname(audio).as_deref(), Some("local-cname"));
    let encodings = get_rtp_encodings(audio)?;
    assert_eq!(encodings.len(), 1);
    assert_eq!(encodings[0].ssrc, Some(1111));
    assert_eq!(encodings[0].rtx, None::<RtxParameters>);

    let video = get_media_by_mid(&local, "1").ok_or_else(|| anyhow::anyhow!("no mid 1"))?;
    assert!(get_rtp_encodings(video).is_err());
    let offer = OfferMedia::from_media_description(video)?;
    assert_eq!(offer.kind, MediaKind::Video);
    assert_eq!(offer.protocol, "UDP/TLS/RTP/SAVPF");
    assert_eq!(offer.extensions.len(), 2);
    assert!(offer.extmap_allow_mixed);
    assert_eq!(offer.rids.len(), 3);
    assert_eq!(
        offer.simulcast.as_ref().map(|simulcast| simulcast.direction),
        Some(StreamDirection::Send)
    );

    Ok(())
}

#[test]
fn test_extract_dtls_parameters_session_fingerprint() -> anyhow::Result<()> {
    setup()?;

    let sdp = "v=0\r
o=- 1 1 IN IP4 127.0.0.1\r
s=-\r
t=0 0\r
a=fingerprint:sha-512 AA:BB\r
m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r
c=IN IP4 0.0.0.0\r
a=mid:0\r
a=ice-ufrag:AbCd\r
a=ice-pwd:EfGhIjKlMnOpQrStUvWxYz01\r
a=setup:actpass\r
a=sctp-port:5000\r
";
    let dtls = extract_dtls_parameters(&parse(sdp)?)?;
    assert_eq!(dtls.role, DtlsRole::Auto);
    assert_eq!(dtls.fingerprints[0].algorithm, "sha-512");
    assert_eq!(dtls.fingerprints[0].value, "AA:BB");

    let without_fingerprint = sdp.replace("a=fingerprint:sha-512 AA:BB\r\n", "");
    assert!(matches!(
        extract_dtls_parameters(&parse(&without_fingerprint)?),
        Err(Error::MalformedInput(_))
    ));

    Ok(())
}

#[test]
fn test_answer_local_offer() -> anyhow::Result<()> {
    setup()?;

    let local = parse(LOCAL_OFFER)?;
    let mut remote_sdp = remote_sdp()?;
    remote_sdp.update_dtls_role(DtlsRole::Server);

    for (mid, params) in [("0", audio_rtp_parameters()), ("1", video_rtp_parameters())] {
        let media = get_media_by_mid(&local, mid).ok_or_else(|| anyhow::anyhow!("no {mid}"))?;
        let offer = OfferMedia::from_media_description(media)?;
        let idx = remote_sdp.get_next_media_section_idx();
        remote_sdp.create_answer(&offer, idx.reuse_mid.as_deref(), &params, &params, None)?;
    }

    let answer = parse(&remote_sdp.get_sdp())?;
    assert_eq!(answer.media_descriptions.len(), 2);

    let audio = get_media_by_mid(&answer, "0").ok_or_else(|| anyhow::anyhow!("no mid 0"))?;
    assert_eq!(audio.attribute("setup").flatten(), Some("passive"));
    assert!(audio.attribute("recvonly").is_some());
    let extmaps: Vec<&str> = audio
        .attributes
        .iter()
        .filter(|attr| attr.key == "extmap")
        .filter_map(|attr| attr.value.as_deref())
        .collect();
    assert_eq!(extmaps, ["1 urn:ietf:params:rtp-hdrext:sdes:mid", "10 urn:ietf:params:rtp-hdrext:ssrc-audio-level"]);

    let video = get_media_by_mid(&answer, "1").ok_or_else(|| anyhow::anyhow!("no mid 1"))?;
    assert_eq!(video.attribute("simulcast").flatten(), Some("recv r0;r1;r2"));
    assert!(video.attribute("extmap-allow-mixed").is_some());

    // attribute order of an answer section
    let mut last = 0;
    for attr in &video.attributes {
        let position = ANSWER_ATTRIBUTE_ORDER
            .iter()
            .position(|key| *key == attr.key)
            .ok_or_else(|| anyhow::anyhow!("unexpected attribute {}", attr.key))?;
        assert!(position >= last, "{} out of order", attr.key);
        last = position;
    }

    Ok(())
}

#[test]
fn test_apply_codec_parameters_on_local_answer() -> anyhow::Result<()> {
    setup()?;

    let mut offer_params = audio_rtp_parameters();
    offer_params.codecs[0]
        .parameters
        .insert("sprop-stereo".to_owned(), 1i64.into());

    let mut local = parse(LOCAL_OFFER)?;
    let media = local
        .media_descriptions
        .iter_mut()
        .find(|media| media.media_name.media == "audio")
        .ok_or_else(|| anyhow::anyhow!("no audio section"))?;
    apply_codec_parameters(&offer_params, media);

    assert_eq!(
        media.attribute("fmtp").flatten(),
        Some("111 minptime=10;useinbandfec=1;stereo=1")
    );

    Ok(())
}
