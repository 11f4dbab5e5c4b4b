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

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const N_GROUPS: usize = 4;
pub const WORDS_PER_GROUP: usize = 4;
pub const N_CARDS: usize = N_GROUPS * WORDS_PER_GROUP;

// The field order here is also the canonical order in the share
// payload: theme first, then the words in the order they were typed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub theme: String,
    pub words: [String; WORDS_PER_GROUP],
}

/// A complete game definition: four themed groups of four words.
///
/// A `Puzzle` can only be built through [`Puzzle::new`], so any value
/// of this type is structurally valid and has no duplicate words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    groups: [Group; N_GROUPS],
}

#[derive(Debug, PartialEq, Eq)]
pub enum PuzzleError {
    WrongGroupCount(usize),
    EmptyTheme(usize),
    EmptyWord(usize, usize),
    DuplicateWord(String),
}

impl Puzzle {
    pub fn new(groups: Vec<Group>) -> Result<Puzzle, PuzzleError> {
        let n_groups = groups.len();

        let groups: [Group; N_GROUPS] = groups
            .try_into()
            .map_err(|_| PuzzleError::WrongGroupCount(n_groups))?;

        for (group_num, group) in groups.iter().enumerate() {
            if group.theme.trim().is_empty() {
                return Err(PuzzleError::EmptyTheme(group_num));
            }

            for (word_num, word) in group.words.iter().enumerate() {
                if word.trim().is_empty() {
                    return Err(PuzzleError::EmptyWord(group_num, word_num));
                }
            }
        }

        // Duplicate words would make a guess ambiguous, so they are
        // rejected here rather than tolerated by the evaluator
        let mut seen = HashSet::new();

        for group in groups.iter() {
            for word in group.words.iter() {
                if !seen.insert(word.to_lowercase()) {
                    return Err(PuzzleError::DuplicateWord(word.clone()));
                }
            }
        }

        Ok(Puzzle { groups })
    }

    pub fn groups(&self) -> &[Group; N_GROUPS] {
        &self.groups
    }

    pub fn theme(&self, group_num: usize) -> &str {
        &self.groups[group_num].theme
    }
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PuzzleError::WrongGroupCount(n_groups) => {
                write!(
                    f,
                    "a puzzle needs exactly {} groups but {} were given",
                    N_GROUPS,
                    n_groups,
                )
            },
            PuzzleError::EmptyTheme(group_num) => {
                write!(f, "group {} has an empty theme", group_num + 1)
            },
            PuzzleError::EmptyWord(group_num, word_num) => {
                write!(
                    f,
                    "group {}: word {} is empty",
                    group_num + 1,
                    word_num + 1,
                )
            },
            PuzzleError::DuplicateWord(word) => {
                write!(f, "“{}” appears in more than one group", word)
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn test_groups() -> Vec<Group> {
    [
        ("Colors", ["Red", "Blue", "Green", "Yellow"]),
        ("Shapes", ["Circle", "Square", "Triangle", "Hexagon"]),
        ("Animals", ["Cat", "Dog", "Bird", "Fish"]),
        ("Fruits", ["Apple", "Pear", "Grape", "Mango"]),
    ]
    .into_iter()
    .map(|(theme, words)| Group {
        theme: theme.to_string(),
        words: words.map(str::to_string),
    })
    .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn valid_puzzle() {
        let puzzle = Puzzle::new(test_groups()).unwrap();

        assert_eq!(puzzle.groups().len(), N_GROUPS);
        assert_eq!(puzzle.theme(0), "Colors");
        assert_eq!(puzzle.theme(3), "Fruits");
        assert_eq!(&puzzle.groups()[2].words[1], "Dog");
    }

    #[test]
    fn wrong_group_count() {
        let mut groups = test_groups();
        groups.pop();

        assert_eq!(
            Puzzle::new(groups).unwrap_err(),
            PuzzleError::WrongGroupCount(3),
        );

        assert_eq!(
            &Puzzle::new(Vec::new()).unwrap_err().to_string(),
            "a puzzle needs exactly 4 groups but 0 were given",
        );
    }

    #[test]
    fn empty_theme() {
        let mut groups = test_groups();
        groups[2].theme = "  ".to_string();

        let error = Puzzle::new(groups).unwrap_err();

        assert_eq!(error, PuzzleError::EmptyTheme(2));
        assert_eq!(&error.to_string(), "group 3 has an empty theme");
    }

    #[test]
    fn empty_word() {
        let mut groups = test_groups();
        groups[1].words[3] = String::new();

        let error = Puzzle::new(groups).unwrap_err();

        assert_eq!(error, PuzzleError::EmptyWord(1, 3));
        assert_eq!(&error.to_string(), "group 2: word 4 is empty");
    }

    #[test]
    fn duplicate_word() {
        let mut groups = test_groups();
        groups[3].words[0] = "RED".to_string();

        let error = Puzzle::new(groups).unwrap_err();

        assert_eq!(error, PuzzleError::DuplicateWord("RED".to_string()));
        assert_eq!(
            &error.to_string(),
            "“RED” appears in more than one group",
        );
    }

    #[test]
    fn structural_errors_reported_before_duplicates() {
        let mut groups = test_groups();
        groups[0].words[1] = "Red".to_string();
        groups[3].theme = String::new();

        assert_eq!(
            Puzzle::new(groups).unwrap_err(),
            PuzzleError::EmptyTheme(3),
        );
    }
}
