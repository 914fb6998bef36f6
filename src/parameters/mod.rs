pub(crate) mod codec_options;
pub(crate) mod rtp;
pub(crate) mod transport;
