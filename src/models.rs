#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    Audio,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioFormat {
    #[default]
    Mp3,
    Wav,
    Flac,
    Aac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 4] = [Self::Mp3, Self::Wav, Self::Flac, Self::Aac];

    /// Codec name as yt-dlp expects it after `--audio-format`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Flac => "flac",
            Self::Aac => "aac",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoFormat {
    #[default]
    Webm,
    Mp4,
}

impl VideoFormat {
    pub const ALL: [VideoFormat; 2] = [Self::Webm, Self::Mp4];

    /// Container name as yt-dlp expects it after `--merge-output-format`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Webm => "webm",
            Self::Mp4 => "mp4",
        }
    }
}

/// Snapshot of everything the user entered in the form.
///
/// Blank `output_folder` / `output_name` fall back to defaults at build time.
/// `start_time` and `end_time` hold the raw `HH:MM:SS` text; blank or
/// `00:00:00` leaves that side of the trim window open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub url: String,
    pub output_folder: String,
    pub output_name: String,
    pub media_kind: MediaKind,
    pub audio_format: AudioFormat,
    pub video_format: VideoFormat,
    pub start_time: String,
    pub end_time: String,
}

/// One modal per failure category, plus the completion notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserMessage {
    NetworkError,
    EmptyUrl,
    MalformedTime,
    InvalidTimeRange,
    InvalidUrl,
    DownloadFailed,
    DownloadComplete,
}

impl UserMessage {
    /// Localization keys for the window title and body.
    pub fn keys(self) -> (&'static str, &'static str) {
        match self {
            Self::NetworkError => ("network-error-title", "network-error-message"),
            Self::EmptyUrl => ("url-empty-title", "url-empty-message"),
            Self::MalformedTime => ("time-format-title", "time-format-message"),
            Self::InvalidTimeRange => ("time-range-title", "time-range-message"),
            Self::InvalidUrl => ("invalid-url-title", "invalid-url-message"),
            Self::DownloadFailed => ("download-error-title", "download-error-message"),
            Self::DownloadComplete => ("download-complete-title", "download-complete-message"),
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, Self::DownloadComplete)
    }
}

#[derive(Default)]
pub struct AppState {
    pub form: FormState,
    pub is_downloading: bool,
    pub status: String,
    pub message: Option<UserMessage>,
}
