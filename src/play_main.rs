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

mod puzzle;
mod token;
mod shuffle;
mod guess;
mod game;

use std::process::ExitCode;
use game::{Session, SubmitOutcome};

fn print_board(session: &Session) {
    for row in session.solved_rows() {
        println!("[{}] {}", row.theme, row.words.join(", "));
    }

    let mut n_printed = 0;

    for (card_num, card) in session.cards().iter().enumerate() {
        if session.is_card_solved(card_num) {
            continue;
        }

        print!("{:>2}:{:<12}", card_num + 1, card.word());

        n_printed += 1;

        if n_printed % 4 == 0 {
            println!();
        }
    }

    if n_printed % 4 != 0 {
        println!();
    }
}

fn clear_selection(session: &mut Session) {
    for card_num in 0..session.cards().len() {
        if session.is_card_selected(card_num) {
            session.toggle_card(card_num);
        }
    }
}

fn select_cards(session: &mut Session, line: &str) -> bool {
    clear_selection(session);

    for number in line.split_whitespace() {
        let selected = number
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(|card_num| session.toggle_card(card_num))
            .unwrap_or(false);

        if !selected {
            eprintln!("bad card number: {}", number);
            clear_selection(session);
            return false;
        }
    }

    if !session.can_submit() {
        eprintln!("enter four different card numbers");
        clear_selection(session);
        return false;
    }

    true
}

fn report(session: &Session, outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Solved { group } => {
            println!("Correct! {}", session.puzzle().theme(group));
        },
        SubmitOutcome::Won { mistakes } => {
            println!(
                "You found all the connections with {} mistake{}!",
                mistakes,
                if mistakes == 1 { "" } else { "s" },
            );
        },
        SubmitOutcome::Mistake { remaining } => {
            println!(
                "Try again! {} mistake{} left.",
                remaining,
                if remaining == 1 { "" } else { "s" },
            );
        },
        SubmitOutcome::Lost => {
            println!("Game over! You ran out of tries.");
        },
    }
}

fn main() -> ExitCode {
    let mut args = std::env::args_os();

    if args.len() != 2 {
        eprintln!("usage: play <token>");
        return ExitCode::FAILURE;
    }

    let share_token = args.nth(1).unwrap();

    let Some(share_token) = share_token.to_str()
    else {
        eprintln!("the token is not valid UTF-8");
        return ExitCode::FAILURE;
    };

    let puzzle = match token::decode(share_token) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let mut session = Session::new(puzzle);

    print_board(&session);

    for line in std::io::stdin().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            },
        };

        if line.trim().is_empty() {
            continue;
        }

        if !select_cards(&mut session, &line) {
            continue;
        }

        // select_cards only returns true with a submittable selection
        let outcome = session.submit().unwrap();

        report(&session, outcome);

        if session.is_over() {
            return ExitCode::SUCCESS;
        }

        print_board(&session);
    }

    ExitCode::SUCCESS
}
