// Quartets – a word-grouping puzzle
// Copyright (C) 2025  Quartets contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;
use super::puzzle;
use puzzle::{Group, Puzzle, PuzzleError, N_GROUPS, WORDS_PER_GROUP};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;

/// Name of the localStorage slot holding the most recent puzzle.
pub const STORAGE_KEY: &str = "quartets.puzzle.v1";
/// Name of the query parameter carrying the share token.
pub const TOKEN_PARAM: &str = "puzzle";

#[derive(Debug, PartialEq, Eq)]
pub enum GroupField {
    Theme,
    WordCount,
    Word(usize),
}

#[derive(Debug, PartialEq, Eq)]
pub enum DecodeError {
    CorruptTransport,
    MalformedPayload,
    WrongGroupCount(usize),
    InvalidGroup(usize, GroupField),
    DuplicateWord(String),
}

#[derive(Debug, PartialEq, Eq)]
pub enum LoadError {
    Decode(DecodeError),
    NoDataFound,
}

// The payload shape before validation. The word list is kept as a Vec
// so that a group with the wrong number of words can be reported as
// that group's problem instead of a generic parse failure.
#[derive(Deserialize)]
struct RawGroup {
    theme: String,
    words: Vec<String>,
}

// The stored slot kept its schema across two generations: the current
// form is the same tagged group list as the share payload, the legacy
// form is a bare list of word lists from before themes existed.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredPuzzle {
    Tagged(Vec<RawGroup>),
    Legacy(Vec<Vec<String>>),
}

/// Serializes a puzzle to its URL-safe share token.
///
/// The canonical form is the JSON list of groups, theme first and
/// words in input order, wrapped in unpadded URL-safe base64 so it can
/// sit in a query string without further escaping.
pub fn encode(puzzle: &Puzzle) -> String {
    let payload = serde_json::to_string(puzzle.groups()).unwrap();

    URL_SAFE_NO_PAD.encode(payload)
}

/// Decodes a share token back into a puzzle.
///
/// All-or-nothing: either the token describes a fully valid puzzle or
/// a `DecodeError` says what is wrong with it.
pub fn decode(token: &str) -> Result<Puzzle, DecodeError> {
    let Ok(payload) = URL_SAFE_NO_PAD.decode(token)
    else {
        return Err(DecodeError::CorruptTransport);
    };

    let Ok(payload) = std::str::from_utf8(&payload)
    else {
        return Err(DecodeError::CorruptTransport);
    };

    let Ok(raw_groups) = serde_json::from_str::<Vec<RawGroup>>(payload)
    else {
        return Err(DecodeError::MalformedPayload);
    };

    validate_groups(raw_groups)
}

/// Serializes a puzzle to the form kept in the local storage slot.
pub fn encode_stored(puzzle: &Puzzle) -> String {
    serde_json::to_string(puzzle.groups()).unwrap()
}

/// Decodes the local storage slot, accepting both schema versions.
pub fn decode_stored(stored: &str) -> Result<Puzzle, DecodeError> {
    let Ok(stored) = serde_json::from_str::<StoredPuzzle>(stored)
    else {
        return Err(DecodeError::MalformedPayload);
    };

    match stored {
        StoredPuzzle::Tagged(raw_groups) => validate_groups(raw_groups),
        StoredPuzzle::Legacy(word_lists) => validate_legacy(word_lists),
    }
}

/// Picks the puzzle for a new session: the share token when one is
/// present, otherwise the stored slot.
pub fn load_puzzle(
    token: Option<&str>,
    stored: Option<&str>,
) -> Result<Puzzle, LoadError> {
    match (token, stored) {
        (Some(token), _) => Ok(decode(token)?),
        (None, Some(stored)) => Ok(decode_stored(stored)?),
        (None, None) => Err(LoadError::NoDataFound),
    }
}

fn validate_groups(
    raw_groups: Vec<RawGroup>,
) -> Result<Puzzle, DecodeError> {
    if raw_groups.len() != N_GROUPS {
        return Err(DecodeError::WrongGroupCount(raw_groups.len()));
    }

    let mut groups = Vec::with_capacity(N_GROUPS);

    for (group_num, raw_group) in raw_groups.into_iter().enumerate() {
        if raw_group.theme.trim().is_empty() {
            return Err(DecodeError::InvalidGroup(
                group_num,
                GroupField::Theme,
            ));
        }

        groups.push(Group {
            theme: raw_group.theme,
            words: validate_words(group_num, raw_group.words)?,
        });
    }

    Ok(Puzzle::new(groups)?)
}

fn validate_legacy(
    word_lists: Vec<Vec<String>>,
) -> Result<Puzzle, DecodeError> {
    if word_lists.len() != N_GROUPS {
        return Err(DecodeError::WrongGroupCount(word_lists.len()));
    }

    let mut groups = Vec::with_capacity(N_GROUPS);

    for (group_num, words) in word_lists.into_iter().enumerate() {
        // The legacy saves predate themes so the groups get numbered
        // placeholders instead
        groups.push(Group {
            theme: format!("Group {}", group_num + 1),
            words: validate_words(group_num, words)?,
        });
    }

    Ok(Puzzle::new(groups)?)
}

fn validate_words(
    group_num: usize,
    words: Vec<String>,
) -> Result<[String; WORDS_PER_GROUP], DecodeError> {
    let words: [String; WORDS_PER_GROUP] = words.try_into().map_err(|_| {
        DecodeError::InvalidGroup(group_num, GroupField::WordCount)
    })?;

    for (word_num, word) in words.iter().enumerate() {
        if word.trim().is_empty() {
            return Err(DecodeError::InvalidGroup(
                group_num,
                GroupField::Word(word_num),
            ));
        }
    }

    Ok(words)
}

impl From<PuzzleError> for DecodeError {
    fn from(error: PuzzleError) -> DecodeError {
        match error {
            PuzzleError::WrongGroupCount(n_groups) => {
                DecodeError::WrongGroupCount(n_groups)
            },
            PuzzleError::EmptyTheme(group_num) => {
                DecodeError::InvalidGroup(group_num, GroupField::Theme)
            },
            PuzzleError::EmptyWord(group_num, word_num) => {
                DecodeError::InvalidGroup(
                    group_num,
                    GroupField::Word(word_num),
                )
            },
            PuzzleError::DuplicateWord(word) => {
                DecodeError::DuplicateWord(word)
            },
        }
    }
}

impl From<DecodeError> for LoadError {
    fn from(error: DecodeError) -> LoadError {
        LoadError::Decode(error)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DecodeError::CorruptTransport => {
                write!(f, "the share token could not be decoded")
            },
            DecodeError::MalformedPayload => {
                write!(f, "the puzzle data is not in the expected format")
            },
            DecodeError::WrongGroupCount(n_groups) => {
                write!(
                    f,
                    "expected {} groups but the puzzle has {}",
                    N_GROUPS,
                    n_groups,
                )
            },
            DecodeError::InvalidGroup(group_num, GroupField::Theme) => {
                write!(f, "group {} has an empty theme", group_num + 1)
            },
            DecodeError::InvalidGroup(group_num, GroupField::WordCount) => {
                write!(
                    f,
                    "group {} has the wrong number of words",
                    group_num + 1,
                )
            },
            DecodeError::InvalidGroup(
                group_num,
                GroupField::Word(word_num),
            ) => {
                write!(
                    f,
                    "group {}: word {} is empty",
                    group_num + 1,
                    word_num + 1,
                )
            },
            DecodeError::DuplicateWord(word) => {
                write!(f, "“{}” appears in more than one group", word)
            },
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Decode(e) => write!(f, "{}", e),
            LoadError::NoDataFound => {
                write!(
                    f,
                    "no puzzle found, follow a share link or create a game \
                     first",
                )
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::puzzle::test_groups;

    fn test_puzzle() -> Puzzle {
        Puzzle::new(test_groups()).unwrap()
    }

    fn token_for(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    #[test]
    fn round_trip() {
        let puzzle = test_puzzle();

        assert_eq!(decode(&encode(&puzzle)).unwrap(), puzzle);
    }

    #[test]
    fn token_is_url_safe() {
        let token = encode(&test_puzzle());

        assert!(token.chars().all(|ch| {
            ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
        }));
    }

    #[test]
    fn corrupt_transport() {
        assert_eq!(
            decode("not!base64?").unwrap_err(),
            DecodeError::CorruptTransport,
        );
        // Valid base64 of invalid UTF-8
        assert_eq!(
            decode(&URL_SAFE_NO_PAD.encode([0xffu8, 0xfe])).unwrap_err(),
            DecodeError::CorruptTransport,
        );
    }

    #[test]
    fn malformed_payload() {
        assert_eq!(
            decode(&token_for("this is not json")).unwrap_err(),
            DecodeError::MalformedPayload,
        );
        assert_eq!(
            decode(&token_for("{\"theme\":\"a\"}")).unwrap_err(),
            DecodeError::MalformedPayload,
        );
        assert_eq!(
            &DecodeError::MalformedPayload.to_string(),
            "the puzzle data is not in the expected format",
        );
    }

    #[test]
    fn wrong_group_count() {
        let json = "[{\"theme\":\"a\",\
                     \"words\":[\"b\",\"c\",\"d\",\"e\"]}]";

        let error = decode(&token_for(json)).unwrap_err();

        assert_eq!(error, DecodeError::WrongGroupCount(1));
        assert_eq!(
            &error.to_string(),
            "expected 4 groups but the puzzle has 1",
        );
    }

    #[test]
    fn invalid_group() {
        let mut groups = test_groups();
        groups[1].theme = " ".to_string();
        let json = serde_json::to_string(&groups).unwrap();

        let error = decode(&token_for(&json)).unwrap_err();

        assert_eq!(error, DecodeError::InvalidGroup(1, GroupField::Theme));
        assert_eq!(&error.to_string(), "group 2 has an empty theme");

        let mut groups = test_groups();
        groups[2].words[3] = String::new();
        let json = serde_json::to_string(&groups).unwrap();

        let error = decode(&token_for(&json)).unwrap_err();

        assert_eq!(
            error,
            DecodeError::InvalidGroup(2, GroupField::Word(3)),
        );
        assert_eq!(&error.to_string(), "group 3: word 4 is empty");
    }

    #[test]
    fn wrong_word_count() {
        let json = "[{\"theme\":\"a\",\"words\":[\"b\",\"c\",\"d\",\"e\"]},\
                     {\"theme\":\"f\",\"words\":[\"g\",\"h\",\"i\"]},\
                     {\"theme\":\"j\",\"words\":[\"k\",\"l\",\"m\",\"n\"]},\
                     {\"theme\":\"o\",\"words\":[\"p\",\"q\",\"r\",\"s\"]}]";

        let error = decode(&token_for(json)).unwrap_err();

        assert_eq!(
            error,
            DecodeError::InvalidGroup(1, GroupField::WordCount),
        );
        assert_eq!(
            &error.to_string(),
            "group 2 has the wrong number of words",
        );
    }

    #[test]
    fn duplicate_word() {
        let mut groups = test_groups();
        groups[0].words[0] = "cat".to_string();
        let json = serde_json::to_string(&groups).unwrap();

        assert_eq!(
            decode(&token_for(&json)).unwrap_err(),
            DecodeError::DuplicateWord("Cat".to_string()),
        );
    }

    #[test]
    fn stored_round_trip() {
        let puzzle = test_puzzle();

        assert_eq!(decode_stored(&encode_stored(&puzzle)).unwrap(), puzzle);
    }

    #[test]
    fn legacy_stored_form() {
        let stored = "[[\"Red\",\"Blue\",\"Green\",\"Yellow\"],\
                      [\"Circle\",\"Square\",\"Triangle\",\"Hexagon\"],\
                      [\"Cat\",\"Dog\",\"Bird\",\"Fish\"],\
                      [\"Apple\",\"Pear\",\"Grape\",\"Mango\"]]";

        let puzzle = decode_stored(stored).unwrap();

        assert_eq!(puzzle.theme(0), "Group 1");
        assert_eq!(puzzle.theme(3), "Group 4");
        assert_eq!(&puzzle.groups()[1].words[2], "Triangle");
    }

    #[test]
    fn legacy_stored_form_errors() {
        assert_eq!(
            decode_stored("[[\"a\",\"b\",\"c\",\"d\"]]").unwrap_err(),
            DecodeError::WrongGroupCount(1),
        );
        assert_eq!(
            decode_stored(
                "[[\"a\",\"b\",\"c\",\"d\"],\
                 [\"e\",\"f\",\"g\"],\
                 [\"h\",\"i\",\"j\",\"k\"],\
                 [\"l\",\"m\",\"n\",\"o\"]]"
            ).unwrap_err(),
            DecodeError::InvalidGroup(1, GroupField::WordCount),
        );
        assert_eq!(
            decode_stored("[1, 2, 3, 4]").unwrap_err(),
            DecodeError::MalformedPayload,
        );
    }

    #[test]
    fn load_prefers_token() {
        let puzzle = test_puzzle();
        let token = encode(&puzzle);

        let mut other_groups = test_groups();
        other_groups[0].theme = "Hues".to_string();
        let stored_puzzle = Puzzle::new(other_groups).unwrap();
        let stored = encode_stored(&stored_puzzle);

        assert_eq!(
            load_puzzle(Some(&token), Some(&stored)).unwrap(),
            puzzle,
        );
        assert_eq!(
            load_puzzle(None, Some(&stored)).unwrap(),
            stored_puzzle,
        );
    }

    #[test]
    fn bad_token_does_not_fall_back() {
        let stored = encode_stored(&test_puzzle());

        assert_eq!(
            load_puzzle(Some("???"), Some(&stored)).unwrap_err(),
            LoadError::Decode(DecodeError::CorruptTransport),
        );
    }

    #[test]
    fn no_data_found() {
        let error = load_puzzle(None, None).unwrap_err();

        assert_eq!(error, LoadError::NoDataFound);
        assert_eq!(
            &error.to_string(),
            "no puzzle found, follow a share link or create a game first",
        );
    }
}
