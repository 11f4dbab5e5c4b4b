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

pub mod puzzle;
pub mod token;
pub mod shuffle;
pub mod guess;
pub mod game;

#[cfg(target_arch = "wasm32")]
mod wasm_game;
