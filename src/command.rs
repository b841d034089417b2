//! Translation of a [`FormState`] snapshot into a yt-dlp argument vector.
//!
//! Everything here is pure: no filesystem access, no process spawning. The
//! caller creates [`CommandPlan::output_folder`] and runs the plan.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{FormState, MediaKind};

pub const EXECUTABLE: &str = "yt-dlp";
pub const DEFAULT_OUTPUT_FOLDER: &str = "./output/";
/// yt-dlp output template field for the source's own title.
pub const TITLE_TOKEN: &str = "%(title)s";
/// yt-dlp output template field for the final file extension.
pub const EXT_TOKEN: &str = "%(ext)s";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimBound {
    Start,
    End,
}

impl fmt::Display for TrimBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no URL was provided")]
    EmptyUrl,
    #[error("start time {start} must be earlier than end time {end}")]
    InvalidTimeRange { start: Timestamp, end: Timestamp },
    #[error("{bound} time {value:?} is not a valid HH:MM:SS duration")]
    MalformedDuration { bound: TrimBound, value: String },
}

/// An `HH:MM:SS` offset into the media. Zero means "not specified".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    hours: u32,
    minutes: u8,
    seconds: u8,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn new(hours: u32, minutes: u8, seconds: u8) -> Option<Self> {
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        Some(Self {
            hours,
            minutes,
            seconds,
        })
    }

    /// Parses `H:MM:SS`. Blank input is the zero sentinel.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Some(Self::ZERO);
        }

        let mut parts = text.split(':');
        let hours = parse_field(parts.next()?)?;
        let minutes = parse_field(parts.next()?)?;
        let seconds = parse_field(parts.next()?)?;
        if parts.next().is_some() {
            return None;
        }

        Self::new(
            hours,
            u8::try_from(minutes).ok()?,
            u8::try_from(seconds).ok()?,
        )
    }

    pub fn is_specified(self) -> bool {
        self != Self::ZERO
    }

    pub fn total_seconds(self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

fn parse_field(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// A ready-to-spawn yt-dlp invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub executable: &'static str,
    pub arguments: Vec<String>,
    pub output_template: String,
    /// Folder the template points into. Must exist before the plan runs.
    pub output_folder: PathBuf,
}

impl fmt::Display for CommandPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable)?;
        for arg in &self.arguments {
            write!(f, " {arg:?}")?;
        }
        Ok(())
    }
}

pub fn build(state: &FormState) -> Result<CommandPlan, ValidationError> {
    let url = state.url.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let start = parse_bound(TrimBound::Start, &state.start_time)?;
    let end = parse_bound(TrimBound::End, &state.end_time)?;
    if start.is_specified() && end.is_specified() && start.total_seconds() >= end.total_seconds() {
        return Err(ValidationError::InvalidTimeRange { start, end });
    }

    let output_folder = match state.output_folder.trim() {
        "" => PathBuf::from(DEFAULT_OUTPUT_FOLDER),
        folder => PathBuf::from(folder),
    };
    let output_name = match state.output_name.trim() {
        "" => TITLE_TOKEN,
        name => name,
    };
    let template_path = output_folder.join(format!("{output_name}.{EXT_TOKEN}"));
    // An absolute or nested name moves the file away from `output_folder`.
    let output_folder = template_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(output_folder);
    let output_template = template_path.to_string_lossy().to_string();

    let mut arguments = Vec::new();
    match state.media_kind {
        MediaKind::Audio => {
            arguments.push("-x".to_string());
            arguments.push("--audio-format".to_string());
            arguments.push(state.audio_format.as_str().to_string());
        }
        MediaKind::Video => {
            arguments.push("--merge-output-format".to_string());
            arguments.push(state.video_format.as_str().to_string());
        }
    }

    arguments.push("-o".to_string());
    arguments.push(output_template.clone());

    if let Some(trim) = postprocessor_args(start, end) {
        arguments.push("--postprocessor-args".to_string());
        arguments.push(trim);
    }

    // End of options: a URL starting with `-` must not be read as a flag.
    arguments.push("--".to_string());
    arguments.push(url.to_string());

    Ok(CommandPlan {
        executable: EXECUTABLE,
        arguments,
        output_template,
        output_folder,
    })
}

fn parse_bound(bound: TrimBound, text: &str) -> Result<Timestamp, ValidationError> {
    Timestamp::parse(text).ok_or_else(|| ValidationError::MalformedDuration {
        bound,
        value: text.to_string(),
    })
}

fn postprocessor_args(start: Timestamp, end: Timestamp) -> Option<String> {
    let mut flags = Vec::new();
    if start.is_specified() {
        flags.push(format!("-ss {start}"));
    }
    if end.is_specified() {
        flags.push(format!("-to {end}"));
    }

    if flags.is_empty() {
        None
    } else {
        Some(flags.join(" "))
    }
}
