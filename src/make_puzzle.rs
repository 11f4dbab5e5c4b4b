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

use std::fmt;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use clap::Parser;
use puzzle::{Group, Puzzle, WORDS_PER_GROUP};

#[derive(Parser)]
#[command(name = "make-puzzle")]
#[command(about = "Builds the share token for a word-grouping puzzle")]
struct Args {
    /// Base URL of the player page to embed the token in
    #[arg(short, long)]
    url: Option<String>,
    /// File with one “theme: word, word, word, word” line per group,
    /// read from stdin when omitted
    file: Option<PathBuf>,
}

#[derive(Debug)]
enum ParseError {
    MissingColon(usize),
    WrongWordCount(usize, usize),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::MissingColon(line_num) => {
                write!(f, "line {}: missing colon", line_num + 1)
            },
            ParseError::WrongWordCount(line_num, n_words) => {
                write!(
                    f,
                    "line {}: expected {} words but found {}",
                    line_num + 1,
                    WORDS_PER_GROUP,
                    n_words,
                )
            },
        }
    }
}

fn parse_group(line_num: usize, line: &str) -> Result<Group, ParseError> {
    let Some((theme, words)) = line.split_once(':')
    else {
        return Err(ParseError::MissingColon(line_num));
    };

    let words = words
        .split(',')
        .map(|word| word.trim().to_string())
        .collect::<Vec<String>>();

    let n_words = words.len();

    let Ok(words) = <[String; WORDS_PER_GROUP]>::try_from(words)
    else {
        return Err(ParseError::WrongWordCount(line_num, n_words));
    };

    Ok(Group {
        theme: theme.trim().to_string(),
        words,
    })
}

fn parse_groups(source: &str) -> Result<Vec<Group>, ParseError> {
    let mut groups = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        groups.push(parse_group(line_num, line)?);
    }

    Ok(groups)
}

fn read_source(file: Option<&PathBuf>) -> Result<String, io::Error> {
    match file {
        Some(file) => std::fs::read_to_string(file),
        None => {
            let mut source = String::new();

            for line in io::stdin().lock().lines() {
                source.push_str(&line?);
                source.push('\n');
            }

            Ok(source)
        },
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let source = match read_source(args.file.as_ref()) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let groups = match parse_groups(&source) {
        Ok(groups) => groups,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let puzzle = match Puzzle::new(groups) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let share_token = token::encode(&puzzle);

    match args.url {
        Some(url) => {
            println!("{}?{}={}", url, token::TOKEN_PARAM, share_token)
        },
        None => println!("{}", share_token),
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_a_group() {
        let group =
            parse_group(0, "Colors: Red, Blue, Green, Yellow").unwrap();

        assert_eq!(&group.theme, "Colors");
        assert_eq!(
            group.words,
            ["Red", "Blue", "Green", "Yellow"].map(str::to_string),
        );
    }

    #[test]
    fn missing_colon() {
        assert_eq!(
            &parse_groups("Colors: a, b, c, d\nno colon here")
                .unwrap_err()
                .to_string(),
            "line 2: missing colon",
        );
    }

    #[test]
    fn wrong_word_count() {
        assert_eq!(
            &parse_groups("Colors: Red, Blue, Green")
                .unwrap_err()
                .to_string(),
            "line 1: expected 4 words but found 3",
        );
    }

    #[test]
    fn full_puzzle_round_trips() {
        let source = "Colors: Red, Blue, Green, Yellow\n\
                      Shapes: Circle, Square, Triangle, Hexagon\n\
                      \n\
                      Animals: Cat, Dog, Bird, Fish\n\
                      Fruits: Apple, Pear, Grape, Mango\n";

        let puzzle = Puzzle::new(parse_groups(source).unwrap()).unwrap();

        assert_eq!(
            token::decode(&token::encode(&puzzle)).unwrap(),
            puzzle,
        );
    }
}
