use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{KeyferryError, Result};
use crate::core::models::key_record::{PublicKeyRecord, ValidatedKeys};

/// Key lines counted toward acceptance. Only rsa and dss types are
/// recognized here even though any `ssh-` line opens a record; responses
/// carrying only other types therefore fail the line-count check. Kept
/// as-is for compatibility with the keyserver heuristic this replaces.
static STRICT_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ssh-(rsa|dss) [A-Za-z0-9: ./=+-]+ ").unwrap());

/// A record stops absorbing continuation lines once its comment field has
/// begun: key type, blob, and a space after the blob.
static RECORD_COMPLETE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ssh-[^ ]+ [^ ]+ ").unwrap());

/// Characters allowed to survive normalization.
fn keep_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@: ./=+-".contains(c)
}

/// One normalized output line, before the accept/reject count.
#[derive(Debug)]
enum Line {
    /// A key line plus its blank separator and trailing blank.
    Record(String),
    /// A line that belongs to no record. Never counted as a key, so any
    /// orphan rejects the whole response.
    Orphan(String),
}

impl Line {
    fn height(&self) -> usize {
        match self {
            Line::Record(_) => 3,
            Line::Orphan(_) => 1,
        }
    }
}

#[derive(Debug, PartialEq)]
enum State {
    SeekKeyStart,
    AccumulateContinuation,
}

/// Strictly validate one raw keyserver response.
///
/// Line-oriented state machine: blank lines and lines beginning with a
/// carriage return are dropped; a line starting with `ssh-` opens a key
/// record; while a record is incomplete, following lines are continuations
/// of its wrapped base64 blob and are concatenated with line breaks
/// stripped. Every surviving line is filtered to `[A-Za-z0-9@: ./=+-]`.
///
/// Acceptance is all-or-nothing: with `L` total normalized lines (each
/// record spans its key line, blank separator, and trailing blank) and `K`
/// lines matching the strict rsa/dss pattern, the response is accepted iff
/// `L > 0` and `3*K == L`. A single orphan or unrecognized record rejects
/// everything.
pub fn validate(raw: &str) -> Result<ValidatedKeys> {
    let mut lines: Vec<Line> = Vec::new();
    let mut state = State::SeekKeyStart;
    let mut current = String::new();

    let flush = |current: &mut String, lines: &mut Vec<Line>| {
        if !current.is_empty() {
            lines.push(Line::Record(std::mem::take(current)));
        }
    };

    for raw_line in raw.split('\n') {
        if raw_line.is_empty() || raw_line.starts_with('\r') {
            continue;
        }
        let line = raw_line.trim_end_matches('\r');

        if line.starts_with("ssh-") {
            // A new key line always terminates the previous record.
            flush(&mut current, &mut lines);
            current.push_str(line);
            state = if RECORD_COMPLETE.is_match(&current) {
                flush(&mut current, &mut lines);
                State::SeekKeyStart
            } else {
                State::AccumulateContinuation
            };
        } else if state == State::AccumulateContinuation {
            current.push_str(line);
            if RECORD_COMPLETE.is_match(&current) {
                flush(&mut current, &mut lines);
                state = State::SeekKeyStart;
            }
        } else {
            lines.push(Line::Orphan(line.to_string()));
        }
    }
    flush(&mut current, &mut lines);

    // Character filtering applies to records and orphans alike.
    for line in &mut lines {
        match line {
            Line::Record(text) | Line::Orphan(text) => text.retain(keep_char),
        }
    }

    let total: usize = lines.iter().map(Line::height).sum();
    let strict: usize = lines
        .iter()
        .filter(|line| matches!(line, Line::Record(text) if STRICT_KEY.is_match(text)))
        .count();

    if total == 0 {
        return Err(KeyferryError::InvalidResponse {
            detail: "response contains no key material".into(),
        });
    }
    if 3 * strict != total {
        return Err(KeyferryError::InvalidResponse {
            detail: format!("{strict} recognized key(s) across {total} lines"),
        });
    }

    let records = lines
        .into_iter()
        .filter_map(|line| match line {
            Line::Record(text) => Some(PublicKeyRecord { line: text }),
            Line::Orphan(_) => None,
        })
        .collect();
    Ok(ValidatedKeys::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSA_KEY: &str = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQABAAABgQDj3v6m7z user@host";

    #[test]
    fn single_valid_key_normalizes_to_three_lines() {
        let keys = validate(&format!("{RSA_KEY}\n")).unwrap();
        assert_eq!(keys.len(), 1);
        let text = keys.to_appendable_text();
        assert_eq!(text, format!("{RSA_KEY}\n\n\n"));
        assert_eq!(text.matches('\n').count(), 3);
    }

    #[test]
    fn empty_response_is_rejected() {
        assert!(validate("").is_err());
        assert!(validate("\n\n\n").is_err());
    }

    #[test]
    fn garbage_after_valid_key_rejects_everything() {
        let raw = format!("{RSA_KEY}\nthis is not a key\n");
        assert!(validate(&raw).is_err(), "partial acceptance is not allowed");
    }

    #[test]
    fn garbage_before_valid_key_rejects_everything() {
        let raw = format!("<html><body>\n{RSA_KEY}\n");
        assert!(validate(&raw).is_err());
    }

    #[test]
    fn wrapped_blob_lines_are_joined() {
        let raw = "ssh-rsa AAAAB3NzaC1yc2EAAAADAQ\nABAAABgQDj3v6m7z user@host\n";
        let keys = validate(raw).unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.records()[0].line, RSA_KEY);
    }

    #[test]
    fn carriage_return_lines_are_dropped() {
        let raw = format!("\rproxy noise\n{RSA_KEY}\r\n");
        let keys = validate(&raw).unwrap();
        assert_eq!(keys.records()[0].line, RSA_KEY);
    }

    #[test]
    fn disallowed_characters_are_stripped() {
        let raw = "ssh-rsa AAAA\"B3Nz;aC1 user@host\n";
        let keys = validate(raw).unwrap();
        assert_eq!(keys.records()[0].line, "ssh-rsa AAAAB3NzaC1 user@host");
    }

    #[test]
    fn dss_keys_are_accepted() {
        let keys = validate("ssh-dss AAAAB3NzaC1kc3MAAACBAO user@host\n").unwrap();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn ed25519_key_fails_the_strict_count() {
        // The join and filter steps tolerate any ssh- type, but only
        // rsa/dss lines are counted, so this response is rejected whole.
        let result = validate("ssh-ed25519 AAAAC3NzaC1lZDI1NTE5 user@host\n");
        assert!(result.is_err());
    }

    #[test]
    fn multiple_rsa_keys_are_accepted_in_order() {
        let raw = "ssh-rsa AAAAfirst a@h\nssh-rsa AAAAsecond b@h\n";
        let keys = validate(raw).unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.records()[0].line, "ssh-rsa AAAAfirst a@h");
        assert_eq!(keys.records()[1].line, "ssh-rsa AAAAsecond b@h");
    }

    #[test]
    fn key_without_comment_is_rejected() {
        // The strict pattern requires a space after the blob.
        assert!(validate("ssh-rsa AAAAB3NzaC1yc2EA\n").is_err());
    }
}
