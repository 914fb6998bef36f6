use std::fmt;

const UNSPECIFIED_STR: &str = "Unspecified";

/// MediaDirection is the direction attribute of an m= section.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum MediaDirection {
    #[default]
    Unspecified,

    /// Sendonly indicates the section only sends RTP.
    Sendonly,

    /// Recvonly indicates the section only receives RTP.
    Recvonly,

    /// Inactive indicates the section neither sends nor receives RTP.
    Inactive,
}

const MEDIA_DIRECTION_SENDONLY_STR: &str = "sendonly";
const MEDIA_DIRECTION_RECVONLY_STR: &str = "recvonly";
const MEDIA_DIRECTION_INACTIVE_STR: &str = "inactive";

impl fmt::Display for MediaDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MediaDirection::Sendonly => write!(f, "{MEDIA_DIRECTION_SENDONLY_STR}"),
            MediaDirection::Recvonly => write!(f, "{MEDIA_DIRECTION_RECVONLY_STR}"),
            MediaDirection::Inactive => write!(f, "{MEDIA_DIRECTION_INACTIVE_STR}"),
            MediaDirection::Unspecified => write!(f, "{UNSPECIFIED_STR}"),
        }
    }
}

/// StreamDirection is the direction of a simulcast stream list or of a rid.
/// <https://datatracker.ietf.org/doc/html/rfc8853#section-5.1>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StreamDirection {
    Send,
    Recv,
}

const STREAM_DIRECTION_SEND_STR: &str = "send";
const STREAM_DIRECTION_RECV_STR: &str = "recv";

impl StreamDirection {
    pub(crate) fn parse(raw: &str) -> Option<Self> {
        match raw {
            STREAM_DIRECTION_SEND_STR => Some(StreamDirection::Send),
            STREAM_DIRECTION_RECV_STR => Some(StreamDirection::Recv),
            _ => None,
        }
    }

    /// reverse indicate the opposite direction
    pub fn reverse(&self) -> StreamDirection {
        match *self {
            StreamDirection::Send => StreamDirection::Recv,
            StreamDirection::Recv => StreamDirection::Send,
        }
    }
}

impl fmt::Display for StreamDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            StreamDirection::Send => write!(f, "{STREAM_DIRECTION_SEND_STR}"),
            StreamDirection::Recv => write!(f, "{STREAM_DIRECTION_RECV_STR}"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_media_direction_string() {
        let tests = vec![
            (MediaDirection::Unspecified, "Unspecified"),
            (MediaDirection::Sendonly, "sendonly"),
            (MediaDirection::Recvonly, "recvonly"),
            (MediaDirection::Inactive, "inactive"),
        ];

        for (d, expected_string) in tests {
            assert_eq!(d.to_string(), expected_string);
        }
    }

    #[test]
    fn test_stream_direction_reverse() {
        assert_eq!(StreamDirection::Send.reverse(), StreamDirection::Recv);
        assert_eq!(StreamDirection::Recv.reverse(), StreamDirection::Send);
        assert_eq!(StreamDirection::parse("send"), Some(StreamDirection::Send));
        assert_eq!(StreamDirection::parse("sendrecv"), None);
    }
}
