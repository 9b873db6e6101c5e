use thiserror::Error;

/// Validation failures raised before a scan starts.
///
/// None of these produce a partial histogram.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScanError {
    #[error("event stream is empty")]
    EmptyStream,

    #[error("no streams to scan")]
    NoStreams,

    #[error("reset time must be positive and finite, got {0}")]
    InvalidResetTime(f64),

    #[error("number of bins must be positive")]
    InvalidBinCount,

    #[error("{requested} bins exceeds the limit of {max}")]
    TooManyBins { requested: usize, max: usize },

    #[error("bin width must be positive and finite, got {0}")]
    InvalidBinWidth(f64),

    #[error("dead-time delay must be positive and finite, got {0}")]
    InvalidDelay(f64),

    #[error("policy '{0}' requires a channel for every event")]
    MissingChannels(&'static str),

    #[error("channel data has {channels} entries but the stream has {events} events")]
    ChannelLengthMismatch { events: usize, channels: usize },

    #[error("anchor range {start}..{end} is outside a stream of {len} events")]
    InvalidAnchorRange { start: usize, end: usize, len: usize },

    #[error("anchor ranges only apply to Type I binning")]
    AnchorRangeUnsupported,

    #[error("histogram geometry mismatch: {0}")]
    GeometryMismatch(String),

    #[error("invalid rebin factor {factor} for {num_bins} bins")]
    InvalidRebinFactor { factor: usize, num_bins: usize },
}

pub type Result<T> = std::result::Result<T, ScanError>;
