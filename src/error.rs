use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type used throughout this crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reason a template rule could not be scanned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleErrorKind {
    /// `%x[` without a closing `]`
    Unterminated,
    /// No `,` between row and column
    MissingComma,
    /// Row is not a signed integer
    InvalidRow,
    /// Column is not a signed integer
    InvalidColumn,
    /// The line is not valid UTF-8
    InvalidUtf8,
}

/// A malformed macro inside a single template rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleError {
    /// Byte offset in the rule text where the problem starts
    pub offset: usize,
    pub kind: RuleErrorKind,
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.kind {
            RuleErrorKind::Unterminated => "unterminated macro, expected `]`",
            RuleErrorKind::MissingComma => "macro must have the form %x[row,col]",
            RuleErrorKind::InvalidRow => "macro row must be a signed integer",
            RuleErrorKind::InvalidColumn => "macro column must be a signed integer",
            RuleErrorKind::InvalidUtf8 => "invalid UTF-8",
        };
        write!(f, "{} at byte {}", reason, self.offset)
    }
}

impl std::error::Error for RuleError {}

/// Errors produced while loading, expanding or writing data
#[derive(Debug)]
pub enum Error {
    /// A template line holds a macro that is not `%x[row,col]`
    MalformedTemplateLine {
        /// One-based line number in the template file
        line: usize,
        content: String,
        source: RuleError,
    },
    /// A data line could not be turned into a token
    MalformedDataLine {
        /// One-based line number in the data file
        line: usize,
        reason: String,
    },
    /// A macro column is negative or past the end of the token's feature list.
    ///
    /// Unlike a row pointing outside the sequence, this is never tolerated.
    FeatureIndexOutOfRange {
        /// Canonical text of the rule being expanded
        rule: String,
        /// Index of the sequence in the data file
        sequence: usize,
        /// Position the rule was expanded at
        position: usize,
        /// Index of the token the macro resolved to
        target: usize,
        col: i32,
        num_features: usize,
    },
    /// A token would be written as a blank line, which reads as the end of
    /// a sequence. Happens when the label column is off and nothing else
    /// is left on the line.
    EmptyItem {
        /// Index of the sequence in the data file
        sequence: usize,
        position: usize,
    },
    /// Rejected configuration value or unknown parameter name
    InvalidParameter(String),
    /// Underlying I/O failure, with the file involved when known
    Io {
        path: Option<PathBuf>,
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Error::InvalidParameter(msg.into())
    }

    pub(crate) fn io_at<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Error::Io {
            path: Some(path.into()),
            source,
        }
    }

    /// Attach the index of the sequence being expanded
    pub(crate) fn in_sequence(mut self, index: usize) -> Self {
        if let Error::FeatureIndexOutOfRange { sequence, .. } = &mut self {
            *sequence = index;
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedTemplateLine {
                line,
                content,
                source,
            } => write!(
                f,
                "malformed template line {}: {:?}: {}",
                line, content, source
            ),
            Error::MalformedDataLine { line, reason } => {
                write!(f, "malformed data line {}: {}", line, reason)
            }
            Error::FeatureIndexOutOfRange {
                rule,
                sequence,
                position,
                target,
                col,
                num_features,
            } => write!(
                f,
                "rule {:?} references column {} but token {} of sequence {} has {} features (expanding position {})",
                rule, col, target, sequence, num_features, position
            ),
            Error::EmptyItem { sequence, position } => write!(
                f,
                "token {} of sequence {} expands to an empty line; enable the label column or drop empty rules",
                position, sequence
            ),
            Error::InvalidParameter(msg) => f.write_str(msg),
            Error::Io {
                path: Some(path),
                source,
            } => write!(f, "{}: {}", path.display(), source),
            Error::Io { path: None, source } => fmt::Display::fmt(source, f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::MalformedTemplateLine { source, .. } => Some(source),
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::Io { path: None, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_sequence_only_touches_feature_errors() {
        let err = Error::FeatureIndexOutOfRange {
            rule: "%x[0,3]".to_string(),
            sequence: 0,
            position: 1,
            target: 1,
            col: 3,
            num_features: 2,
        }
        .in_sequence(7);
        match err {
            Error::FeatureIndexOutOfRange { sequence, .. } => assert_eq!(sequence, 7),
            other => panic!("unexpected error: {}", other),
        }

        let err = Error::invalid_parameter("nope").in_sequence(7);
        assert_eq!(err.to_string(), "nope");
    }

    #[test]
    fn test_template_error_message() {
        let err = Error::MalformedTemplateLine {
            line: 3,
            content: "%x[0]".to_string(),
            source: RuleError {
                offset: 0,
                kind: RuleErrorKind::MissingComma,
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("malformed template line 3"));
        assert!(msg.contains("%x[row,col]"));
    }
}
