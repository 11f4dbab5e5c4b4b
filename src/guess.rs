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

use std::collections::HashSet;
use super::puzzle;
use puzzle::{Puzzle, WORDS_PER_GROUP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The selection exactly matches the unsolved group at this index.
    Correct(usize),
    /// No unsolved group matches. A selection equal to an
    /// already-solved group also lands here: its cards are no longer
    /// selectable so the match is deliberately not looked for.
    Incorrect,
    /// The selection does not have exactly four words. Callers gate
    /// submission on the selection size, so seeing this is a caller
    /// bug rather than a user error.
    InvalidCount,
}

/// Decides whether a four-word selection matches one of the puzzle's
/// unsolved groups. Case-insensitive and order-independent: both
/// sides are lowercased and sorted before comparing. Pure function,
/// nothing is mutated.
pub fn evaluate(
    selection: &[&str],
    puzzle: &Puzzle,
    solved: &HashSet<usize>,
) -> Outcome {
    if selection.len() != WORDS_PER_GROUP {
        return Outcome::InvalidCount;
    }

    let selection = normalized(selection.iter().copied());

    for (group_num, group) in puzzle.groups().iter().enumerate() {
        if solved.contains(&group_num) {
            continue;
        }

        let group_words =
            normalized(group.words.iter().map(String::as_str));

        if selection == group_words {
            return Outcome::Correct(group_num);
        }
    }

    Outcome::Incorrect
}

fn normalized<'a>(
    words: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let mut words = words
        .map(str::to_lowercase)
        .collect::<Vec<String>>();

    words.sort_unstable();

    words
}
