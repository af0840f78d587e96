use serde::Serialize;
use thiserror::Error;

use crate::models::{ShapeError, ShapeId};

const SEPARATOR: char = ',';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionRecordError {
    #[error("malformed session record entry {index} ('{token}'): {source}")]
    MalformedSessionRecord {
        index: usize,
        token: String,
        #[source]
        source: ShapeError,
    },
}

/// An entry dropped by `SessionLog::deserialize_lenient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedEntry {
    pub index: usize,
    pub token: String,
}

/// Ordered, append-only history of spawned shapes. The serialized form is the
/// persisted session record: comma-separated decimal ids, nothing else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    entries: Vec<ShapeId>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = ShapeId>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn append(&mut self, id: ShapeId) {
        self.entries.push(id);
    }

    pub fn entries(&self) -> &[ShapeId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.entries.iter().copied()
    }

    pub fn serialize(&self) -> String {
        self.entries
            .iter()
            .map(ShapeId::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Strict parse: any bad token fails the whole record.
    pub fn deserialize(text: &str) -> Result<Self, SessionRecordError> {
        tokens(text)
            .map(|(index, token)| {
                ShapeId::parse(token).map_err(|source| {
                    SessionRecordError::MalformedSessionRecord {
                        index,
                        token: token.trim().to_string(),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|entries| Self { entries })
    }

    /// Keeps every well-formed entry in order and reports the rest.
    pub fn deserialize_lenient(text: &str) -> (Self, Vec<SkippedEntry>) {
        let mut log = Self::new();
        let mut skipped = Vec::new();
        for (index, token) in tokens(text) {
            match ShapeId::parse(token) {
                Ok(id) => log.append(id),
                Err(_) => skipped.push(SkippedEntry {
                    index,
                    token: token.trim().to_string(),
                }),
            }
        }
        (log, skipped)
    }
}

impl<'a> IntoIterator for &'a SessionLog {
    type Item = &'a ShapeId;
    type IntoIter = std::slice::Iter<'a, ShapeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A blank record is an empty session, not one malformed entry.
fn tokens(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let body = text.trim();
    let parts = if body.is_empty() {
        None
    } else {
        Some(body.split(SEPARATOR))
    };
    parts.into_iter().flatten().enumerate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_of(values: &[i64]) -> SessionLog {
        SessionLog::from_entries(values.iter().map(|v| ShapeId::new(*v).unwrap()))
    }

    #[test]
    fn serializes_as_comma_separated_ids() {
        assert_eq!(log_of(&[1, 0, 2]).serialize(), "1,0,2");
        assert_eq!(SessionLog::new().serialize(), "");
    }

    #[test]
    fn round_trips() {
        for values in [&[][..], &[0][..], &[2, 2, 1, 0, 1][..]] {
            let log = log_of(values);
            assert_eq!(SessionLog::deserialize(&log.serialize()), Ok(log));
        }
    }

    #[test]
    fn blank_record_is_empty_session() {
        assert!(SessionLog::deserialize("").unwrap().is_empty());
        assert!(SessionLog::deserialize("  \n").unwrap().is_empty());
    }

    #[test]
    fn tolerates_whitespace_around_tokens() {
        assert_eq!(SessionLog::deserialize(" 1, 0 ,2\n"), Ok(log_of(&[1, 0, 2])));
    }

    #[test]
    fn strict_parse_reports_first_bad_entry() {
        assert_eq!(
            SessionLog::deserialize("1,x,7"),
            Err(SessionRecordError::MalformedSessionRecord {
                index: 1,
                token: "x".into(),
                source: ShapeError::NotANumber("x".into()),
            })
        );
        assert!(matches!(
            SessionLog::deserialize("1,,2"),
            Err(SessionRecordError::MalformedSessionRecord { index: 1, .. })
        ));
    }

    #[test]
    fn lenient_parse_skips_instead_of_coercing() {
        let (log, skipped) = SessionLog::deserialize_lenient("2,banana,1,9");
        assert_eq!(log, log_of(&[2, 1]));
        assert_eq!(
            skipped,
            vec![
                SkippedEntry {
                    index: 1,
                    token: "banana".into()
                },
                SkippedEntry {
                    index: 3,
                    token: "9".into()
                },
            ]
        );
    }

    #[test]
    fn append_preserves_order() {
        let mut log = SessionLog::new();
        log.append(ShapeId::SPHERE);
        log.append(ShapeId::CUBE);
        log.append(ShapeId::SPHERE);
        assert_eq!(
            log.entries(),
            &[ShapeId::SPHERE, ShapeId::CUBE, ShapeId::SPHERE]
        );
    }
}
