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
use rand::Rng;
use super::puzzle;
use puzzle::{Puzzle, N_GROUPS, WORDS_PER_GROUP};
use super::guess;
use super::shuffle::shuffle;

pub const MAX_MISTAKES: u32 = 4;

/// One tile of the board. The origin group index stays attached to
/// the word through the shuffle so a selection can always be resolved
/// back to its groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    word: String,
    group: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    InProgress,
    Won,
    Lost,
}

/// What a submission did to the session. `Won` and `Lost` replace the
/// plain `Solved`/`Mistake` results when the same guess also ended
/// the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Solved { group: usize },
    Won { mistakes: u32 },
    Mistake { remaining: u32 },
    Lost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub won: bool,
    pub mistakes: u32,
}

/// A solved group as the display wants it: rows ordered by group
/// index, each row's words in alphabetical order.
#[derive(Debug, PartialEq, Eq)]
pub struct SolvedRow<'a> {
    pub group: usize,
    pub theme: &'a str,
    pub words: Vec<&'a str>,
}

/// The state of one playthrough of a puzzle.
///
/// The board is shuffled once when the session is created and never
/// reordered afterwards. All mutation goes through [`toggle_card`]
/// and [`submit`]; everything else is a read-only query for the
/// renderer.
///
/// [`toggle_card`]: Session::toggle_card
/// [`submit`]: Session::submit
pub struct Session {
    puzzle: Puzzle,
    cards: Vec<Card>,
    selection: Vec<usize>,
    solved: HashSet<usize>,
    mistakes: u32,
    phase: Phase,
}

impl Card {
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn group(&self) -> usize {
        self.group
    }
}

impl Session {
    pub fn new(puzzle: Puzzle) -> Session {
        Session::with_rng(puzzle, &mut rand::thread_rng())
    }

    pub fn with_rng(puzzle: Puzzle, rng: &mut impl Rng) -> Session {
        let mut cards = puzzle
            .groups()
            .iter()
            .enumerate()
            .flat_map(|(group_num, group)| {
                group.words.iter().map(move |word| Card {
                    word: word.clone(),
                    group: group_num,
                })
            })
            .collect::<Vec<Card>>();

        shuffle(&mut cards, rng);

        Session {
            puzzle,
            cards,
            selection: Vec::with_capacity(WORDS_PER_GROUP),
            solved: HashSet::new(),
            mistakes: 0,
            phase: Phase::InProgress,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_card_solved(&self, card_num: usize) -> bool {
        self.solved.contains(&self.cards[card_num].group)
    }

    pub fn is_card_selected(&self, card_num: usize) -> bool {
        self.selection.contains(&card_num)
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn can_submit(&self) -> bool {
        self.phase == Phase::InProgress
            && self.selection.len() == WORDS_PER_GROUP
    }

    /// Selects or deselects a card. Returns whether anything changed:
    /// input is ignored once the game is over, on cards of solved
    /// groups, and when a fifth card is selected.
    pub fn toggle_card(&mut self, card_num: usize) -> bool {
        if self.phase != Phase::InProgress
            || card_num >= self.cards.len()
            || self.is_card_solved(card_num)
        {
            return false;
        }

        if let Some(position) =
            self.selection.iter().position(|&n| n == card_num)
        {
            self.selection.remove(position);
            return true;
        }

        if self.selection.len() >= WORDS_PER_GROUP {
            return false;
        }

        self.selection.push(card_num);

        true
    }

    /// Evaluates the current four-card selection. Returns `None` when
    /// submission isn't possible, which the UI prevents anyway by
    /// disabling the button.
    pub fn submit(&mut self) -> Option<SubmitOutcome> {
        if !self.can_submit() {
            return None;
        }

        let outcome = {
            let words = self
                .selection
                .iter()
                .map(|&card_num| self.cards[card_num].word.as_str())
                .collect::<Vec<&str>>();

            guess::evaluate(&words, &self.puzzle, &self.solved)
        };

        self.selection.clear();

        match outcome {
            guess::Outcome::Correct(group_num) => {
                self.solved.insert(group_num);

                if self.solved.len() == N_GROUPS {
                    self.phase = Phase::Won;
                    Some(SubmitOutcome::Won { mistakes: self.mistakes })
                } else {
                    Some(SubmitOutcome::Solved { group: group_num })
                }
            },
            guess::Outcome::Incorrect => {
                self.mistakes += 1;

                if self.mistakes >= MAX_MISTAKES {
                    self.phase = Phase::Lost;
                    Some(SubmitOutcome::Lost)
                } else {
                    Some(SubmitOutcome::Mistake {
                        remaining: MAX_MISTAKES - self.mistakes,
                    })
                }
            },
            // can_submit() guarantees a four-card selection
            guess::Outcome::InvalidCount => unreachable!(),
        }
    }

    pub fn mistakes(&self) -> u32 {
        self.mistakes
    }

    pub fn mistakes_remaining(&self) -> u32 {
        MAX_MISTAKES - self.mistakes
    }

    pub fn n_solved(&self) -> usize {
        self.solved.len()
    }

    pub fn is_group_solved(&self, group_num: usize) -> bool {
        self.solved.contains(&group_num)
    }

    pub fn is_over(&self) -> bool {
        self.phase != Phase::InProgress
    }

    pub fn did_win(&self) -> bool {
        self.phase == Phase::Won
    }

    pub fn summary(&self) -> Option<Summary> {
        match self.phase {
            Phase::InProgress => None,
            Phase::Won => Some(Summary {
                won: true,
                mistakes: self.mistakes,
            }),
            Phase::Lost => Some(Summary {
                won: false,
                mistakes: self.mistakes,
            }),
        }
    }

    pub fn solved_rows(&self) -> Vec<SolvedRow> {
        let mut rows = Vec::with_capacity(self.solved.len());

        for (group_num, group) in self.puzzle.groups().iter().enumerate() {
            if !self.solved.contains(&group_num) {
                continue;
            }

            let mut words = group
                .words
                .iter()
                .map(String::as_str)
                .collect::<Vec<&str>>();

            words.sort_unstable_by_key(|word| word.to_lowercase());

            rows.push(SolvedRow {
                group: group_num,
                theme: &group.theme,
                words,
            });
        }

        rows
    }
}
