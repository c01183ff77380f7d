//! Loaders for CRF++ data and template files
//!
//! Both formats are line oriented. Files are read whole and split with
//! `bstr`, so `\n` and `\r\n` endings are handled alike and invalid UTF-8
//! is reported with its line number.

use std::fs;
use std::mem;
use std::path::Path;

use bstr::ByteSlice;

use crate::error::{Error, Result, RuleError, RuleErrorKind};
use crate::sequence::{Sequence, Token};
use crate::template::{Rule, Template};

/// Prefix of a template comment line
const COMMENT: &[u8] = b"#";

/// Parse labeled data into sequences.
///
/// Each non-blank line is one token: whitespace separated features followed
/// by the label. Blank lines end the current sequence; runs of them never
/// produce empty sequences.
pub fn parse_data(data: &[u8]) -> Result<Vec<Sequence>> {
    let mut sequences = Vec::new();
    let mut current = Sequence::default();

    for (index, line) in data.lines().enumerate() {
        let lineno = index + 1;
        let line = line.to_str().map_err(|e| Error::MalformedDataLine {
            line: lineno,
            reason: format!("invalid UTF-8: {}", e),
        })?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        match fields.split_last() {
            None => {
                if !current.is_empty() {
                    sequences.push(mem::take(&mut current));
                }
            }
            Some((label, features)) if !features.is_empty() => {
                current.push(Token::new(features.iter().copied(), *label));
            }
            Some(_) => {
                return Err(Error::MalformedDataLine {
                    line: lineno,
                    reason: format!(
                        "expected at least one feature and a label, found {:?}",
                        line.trim()
                    ),
                });
            }
        }
    }

    if !current.is_empty() {
        sequences.push(current);
    }
    Ok(sequences)
}

/// Parse template text into rules, skipping blank lines and `#` comments
pub fn parse_template(data: &[u8]) -> Result<Template> {
    let mut rules = Vec::new();

    for (index, line) in data.lines().enumerate() {
        let lineno = index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT) {
            continue;
        }
        let text = line.to_str().map_err(|e| Error::MalformedTemplateLine {
            line: lineno,
            content: line.to_str_lossy().into_owned(),
            source: RuleError {
                offset: e.valid_up_to(),
                kind: RuleErrorKind::InvalidUtf8,
            },
        })?;
        let rule: Rule = text.parse().map_err(|source| Error::MalformedTemplateLine {
            line: lineno,
            content: text.to_string(),
            source,
        })?;
        rules.push(rule);
    }

    Ok(Template::from(rules))
}

/// Load every sequence of a data file
pub fn load_data<P: AsRef<Path>>(path: P) -> Result<Vec<Sequence>> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::io_at(path, e))?;
    let sequences = parse_data(&data)?;
    tracing::debug!(
        path = %path.display(),
        sequences = sequences.len(),
        "loaded data file"
    );
    Ok(sequences)
}

/// Load the rules of a template file
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<Template> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::io_at(path, e))?;
    let template = parse_template(&data)?;
    tracing::debug!(
        path = %path.display(),
        rules = template.len(),
        "loaded template file"
    );
    Ok(template)
}
