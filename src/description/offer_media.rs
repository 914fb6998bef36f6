use crate::description::media_direction::StreamDirection;
use crate::description::media_section::{ExtMapEntry, Rid, Simulcast};
use crate::description::{
    get_mid_value, ATTR_KEY_EXTMAP_ALLOW_MIXED, ATTR_KEY_RID, ATTR_KEY_SIMULCAST,
};
use crate::error::{Error, Result};
use crate::parameters::rtp::MediaKind;
use crate::types::Mid;
use log::warn;
use sdp::description::session::ATTR_KEY_EXT_MAP;
use sdp::MediaDescription;

/// OfferMedia is the structured view of an m= section produced by the local
/// transport executor, the input an answer section is built against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferMedia {
    pub mid: Mid,
    pub kind: MediaKind,
    pub protocol: String,
    pub extensions: Vec<ExtMapEntry>,
    pub extmap_allow_mixed: bool,
    pub simulcast: Option<Simulcast>,
    pub rids: Vec<Rid>,
}

impl OfferMedia {
    pub fn new(mid: impl Into<Mid>, kind: MediaKind, protocol: impl Into<String>) -> Self {
        Self {
            mid: mid.into(),
            kind,
            protocol: protocol.into(),
            extensions: vec![],
            extmap_allow_mixed: false,
            simulcast: None,
            rids: vec![],
        }
    }

    /// from_media_description reads the fields an answer depends on from a parsed m= section.
    pub fn from_media_description(media: &MediaDescription) -> Result<Self> {
        let mid = get_mid_value(media)
            .filter(|mid| !mid.is_empty())
            .ok_or_else(|| Error::malformed("offered media section without mid"))?;
        let kind = MediaKind::parse(&media.media_name.media).ok_or_else(|| {
            Error::malformed(format!(
                "offered media section with unknown kind {:?}",
                media.media_name.media
            ))
        })?;

        let mut offer = OfferMedia::new(mid, kind, media.media_name.protos.join("/"));

        for attr in &media.attributes {
            match attr.key.as_str() {
                ATTR_KEY_EXT_MAP => {
                    if let Some(value) = &attr.value {
                        offer.extensions.push(parse_extmap(value)?);
                    }
                }
                ATTR_KEY_EXTMAP_ALLOW_MIXED => offer.extmap_allow_mixed = true,
                ATTR_KEY_SIMULCAST => {
                    offer.simulcast = attr.value.as_deref().and_then(parse_simulcast);
                    if offer.simulcast.is_none() {
                        warn!("ignoring unsupported simulcast attribute {:?}", attr.value);
                    }
                }
                ATTR_KEY_RID => {
                    if let Some(rid) = attr.value.as_deref().and_then(parse_rid) {
                        offer.rids.push(rid);
                    } else {
                        warn!("ignoring unsupported rid attribute {:?}", attr.value);
                    }
                }
                _ => {}
            }
        }

        Ok(offer)
    }
}

/// parse_extmap reads `<id>[/<direction>] <uri> [<attributes>]`
pub(crate) fn parse_extmap(value: &str) -> Result<ExtMapEntry> {
    let mut fields = value.split_whitespace();
    let id = fields
        .next()
        .and_then(|id| id.split('/').next())
        .and_then(|id| id.parse::<u16>().ok())
        .ok_or_else(|| Error::malformed(format!("invalid extmap id in {value:?}")))?;
    let uri = fields
        .next()
        .ok_or_else(|| Error::malformed(format!("missing extmap uri in {value:?}")))?;

    Ok(ExtMapEntry {
        uri: uri.to_owned(),
        value: id,
    })
}

/// parse_simulcast keeps the first direction and its stream list, e.g. `send r0;r1;r2`
fn parse_simulcast(value: &str) -> Option<Simulcast> {
    let mut fields = value.split_whitespace();
    let direction = StreamDirection::parse(fields.next()?)?;
    let list = fields.next()?;

    Some(Simulcast {
        direction,
        list: list.to_owned(),
    })
}

/// parse_rid reads `<id> <direction> [<restrictions>]`
fn parse_rid(value: &str) -> Option<Rid> {
    let mut fields = value.split_whitespace();
    let id = fields.next()?;
    let direction = StreamDirection::parse(fields.next()?)?;

    Some(Rid {
        id: id.to_owned(),
        direction,
    })
}
