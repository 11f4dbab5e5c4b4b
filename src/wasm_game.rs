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

use wasm_bindgen::prelude::*;
use web_sys::console;
use super::puzzle;
use puzzle::{Group, Puzzle, N_GROUPS, WORDS_PER_GROUP, N_CARDS};
use super::token;
use super::game;
use game::{Session, SubmitOutcome};

// How long the shake animation on a wrong guess runs before the cards
// are released again. Matches the CSS animation duration.
const SHAKE_TIMEOUT_MS: i32 = 400;

const CREATOR_PAGE: &str = "creator.html";

fn show_error(message: &str) {
    console::log_1(&message.into());

    let Some(window) = web_sys::window()
    else {
        return;
    };

    let Some(document) = window.document()
    else {
        return;
    };

    let Some(message_elem) = document.get_element_by_id("message")
    else {
        return;
    };

    message_elem.set_text_content(Some(message));
}

struct Context {
    document: web_sys::Document,
    window: web_sys::Window,
    message: web_sys::HtmlElement,
}

impl Context {
    fn new() -> Result<Context, String> {
        let Some(window) = web_sys::window()
        else {
            return Err("failed to get window".to_string());
        };

        let Some(document) = window.document()
        else {
            return Err("failed to get document".to_string());
        };

        let Some(message) = document.get_element_by_id("message")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get message div".to_string());
        };

        Ok(Context {
            document,
            window,
            message,
        })
    }
}

fn query_token(window: &web_sys::Window) -> Option<String> {
    let search = window.location().search().ok()?;

    if search.is_empty() {
        return None;
    }

    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;

    params.get(token::TOKEN_PARAM)
}

fn stored_puzzle(window: &web_sys::Window) -> Option<String> {
    window.local_storage()
        .ok()
        .flatten()?
        .get_item(token::STORAGE_KEY)
        .ok()
        .flatten()
}

type EventClosure = Closure::<dyn FnMut()>;

struct Quartets {
    context: Context,
    session: Session,
    game_grid: web_sys::HtmlElement,
    solved_area: web_sys::HtmlElement,
    submit_button: web_sys::HtmlButtonElement,
    card_elements: Vec<web_sys::HtmlElement>,

    card_closures: Vec<EventClosure>,
    submit_closure: Option<EventClosure>,
    shake_closure: Option<EventClosure>,

    // Set while the shake animation runs so that clicks during the
    // delay can't alter the selection the animation refers to
    input_locked: bool,

    floating_pointer: Option<*mut Quartets>,
}

impl Quartets {
    fn new(
        context: Context,
        session: Session,
    ) -> Result<*mut Quartets, String> {
        let Some(game_grid) = context.document.get_element_by_id("game-grid")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get game grid".to_string());
        };

        let Some(solved_area) =
            context.document.get_element_by_id("solved-groups")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get solved groups area".to_string());
        };

        let Some(submit_button) =
            context.document.get_element_by_id("submit-button")
            .and_then(|c| c.dyn_into::<web_sys::HtmlButtonElement>().ok())
        else {
            return Err("failed to get submit button".to_string());
        };

        let mut card_elements = Vec::with_capacity(N_CARDS);

        for card in session.cards().iter() {
            let Some(element) = context.document.create_element("div").ok()
                .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
            else {
                return Err("failed to create card element".to_string());
            };

            let _ = element.set_attribute("class", "card");

            let text = context.document.create_text_node(card.word());
            let _ = element.append_with_node_1(&text);

            let _ = game_grid.append_with_node_1(&element);

            card_elements.push(element);
        }

        context.message.set_text_content(None);
        let _ = game_grid.style().set_property("display", "grid");

        let quartets = Quartets {
            context,
            session,
            game_grid,
            solved_area,
            submit_button,
            card_elements,
            card_closures: Vec::with_capacity(N_CARDS),
            submit_closure: None,
            shake_closure: None,
            input_locked: false,
            floating_pointer: None,
        };

        // Leak the game object so that it will live as long as the
        // web page. The closures installed below point back into it.
        let floating_pointer = Box::into_raw(Box::new(quartets));

        unsafe {
            (*floating_pointer).floating_pointer = Some(floating_pointer);
            (*floating_pointer).install_handlers();
            (*floating_pointer).update_controls();
        }

        Ok(floating_pointer)
    }

    fn install_handlers(&mut self) {
        let floating_pointer = self.floating_pointer.unwrap();

        for (card_num, element) in self.card_elements.iter().enumerate() {
            let closure = EventClosure::new(move || unsafe {
                (*floating_pointer).handle_card_click(card_num);
            });

            let _ = element.add_event_listener_with_callback(
                "click",
                closure.as_ref().unchecked_ref(),
            );

            self.card_closures.push(closure);
        }

        let closure = EventClosure::new(move || unsafe {
            (*floating_pointer).handle_submit();
        });

        let _ = self.submit_button.add_event_listener_with_callback(
            "click",
            closure.as_ref().unchecked_ref(),
        );

        self.submit_closure = Some(closure);
    }

    fn handle_card_click(&mut self, card_num: usize) {
        if self.input_locked {
            return;
        }

        if self.session.toggle_card(card_num) {
            self.context.message.set_text_content(None);
            self.update_cards();
            self.update_controls();
        }
    }

    fn handle_submit(&mut self) {
        if self.input_locked {
            return;
        }

        if self.session.is_over() {
            // Playing again needs a brand-new puzzle, so go back to
            // the creator page
            let _ = self.context.window.location().set_href(CREATOR_PAGE);
            return;
        }

        let selected = (0..self.card_elements.len())
            .filter(|&card_num| self.session.is_card_selected(card_num))
            .collect::<Vec<usize>>();

        let Some(outcome) = self.session.submit()
        else {
            return;
        };

        match outcome {
            SubmitOutcome::Solved { group } => {
                self.show_message(&format!(
                    "Correct! {}",
                    self.session.puzzle().theme(group),
                ));
                self.update_cards();
                self.update_solved_rows();
                self.update_controls();
            },
            SubmitOutcome::Won { mistakes } => {
                self.update_cards();
                self.update_solved_rows();
                self.show_message(&format!(
                    "You found all the connections with {} mistake{}!",
                    mistakes,
                    if mistakes == 1 { "" } else { "s" },
                ));
                self.update_controls();
            },
            SubmitOutcome::Mistake { remaining } => {
                self.show_message(&format!(
                    "Try again! {} mistake{} left.",
                    remaining,
                    if remaining == 1 { "" } else { "s" },
                ));
                self.start_shake(&selected);
            },
            SubmitOutcome::Lost => {
                self.show_message("Game over! You ran out of tries.");
                self.update_cards();
                self.update_controls();
            },
        }
    }

    fn start_shake(&mut self, selected: &[usize]) {
        for &card_num in selected {
            let _ = self.card_elements[card_num]
                .set_attribute("class", "card shake");
        }

        self.input_locked = true;

        let floating_pointer = self.floating_pointer.unwrap();

        let closure = EventClosure::new(move || unsafe {
            (*floating_pointer).handle_shake_timeout();
        });

        let _ = self.context.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                SHAKE_TIMEOUT_MS,
            );

        self.shake_closure = Some(closure);
    }

    // Only cosmetic cleanup happens here; the guess was already
    // evaluated when it was submitted
    fn handle_shake_timeout(&mut self) {
        self.input_locked = false;
        self.shake_closure = None;
        self.update_cards();
        self.update_controls();
    }

    fn show_message(&self, message: &str) {
        self.context.message.set_text_content(Some(message));
    }

    fn update_cards(&self) {
        for (card_num, element) in self.card_elements.iter().enumerate() {
            if self.session.is_card_solved(card_num) {
                let _ = element.set_attribute("class", "card solved");
                let _ = element.style().set_property("display", "none");
            } else if self.session.is_card_selected(card_num) {
                let _ = element.set_attribute("class", "card selected");
            } else {
                let _ = element.set_attribute("class", "card");
            }
        }
    }

    fn update_solved_rows(&self) {
        while let Some(child) = self.solved_area.first_child() {
            let _ = self.solved_area.remove_child(&child);
        }

        for row in self.session.solved_rows() {
            let Ok(row_element) = self.context.document.create_element("div")
            else {
                continue;
            };

            let _ = row_element.set_attribute("class", "solved-group-row");

            if let Ok(theme_element) =
                self.context.document.create_element("h3")
            {
                theme_element.set_text_content(Some(row.theme));
                let _ = row_element.append_with_node_1(&theme_element);
            }

            for word in row.words.iter() {
                let Ok(word_element) =
                    self.context.document.create_element("div")
                else {
                    continue;
                };

                word_element.set_text_content(Some(word));
                let _ = word_element.set_attribute("class", "solved-word");
                let _ = row_element.append_with_node_1(&word_element);
            }

            let _ = self.solved_area.append_with_node_1(&row_element);
        }
    }

    fn update_controls(&self) {
        if self.session.is_over() {
            self.submit_button.set_text_content(Some("Play again"));
            self.submit_button.set_disabled(false);
            let _ = self.game_grid.style()
                .set_property("pointer-events", "none");
        } else {
            self.submit_button.set_disabled(!self.session.can_submit());
        }
    }
}

#[wasm_bindgen]
pub fn init_quartets() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let context = match Context::new() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    let query_token = query_token(&context.window);
    let stored_puzzle = stored_puzzle(&context.window);

    let puzzle = match token::load_puzzle(
        query_token.as_deref(),
        stored_puzzle.as_deref(),
    ) {
        Ok(p) => p,
        Err(e) => {
            // No game starts on a load failure: the grid is never
            // built so the submit path stays locked
            show_error(&e.to_string());
            return;
        },
    };

    let session = Session::new(puzzle);

    if let Err(e) = Quartets::new(context, session) {
        show_error(&e);
    }
}

/// Called by the creator page with the four themes and the sixteen
/// words in group order. Returns the share token and saves the puzzle
/// to the local slot so the creator can try it straight away.
#[wasm_bindgen]
pub fn encode_puzzle(
    themes: js_sys::Array,
    words: js_sys::Array,
) -> Result<String, JsValue> {
    if themes.length() as usize != N_GROUPS
        || words.length() as usize != N_CARDS
    {
        return Err(JsValue::from_str("expected 4 themes and 16 words"));
    }

    let mut groups = Vec::with_capacity(N_GROUPS);

    for group_num in 0..N_GROUPS {
        let Some(theme) = themes.get(group_num as u32).as_string()
        else {
            return Err(JsValue::from_str("themes must be strings"));
        };

        let mut group_words = Vec::with_capacity(WORDS_PER_GROUP);

        for word_num in 0..WORDS_PER_GROUP {
            let position = (group_num * WORDS_PER_GROUP + word_num) as u32;

            let Some(word) = words.get(position).as_string()
            else {
                return Err(JsValue::from_str("words must be strings"));
            };

            group_words.push(word);
        }

        let Ok(words) = <[String; WORDS_PER_GROUP]>::try_from(group_words)
        else {
            return Err(JsValue::from_str("expected 4 words per group"));
        };

        groups.push(Group {
            theme,
            words,
        });
    }

    let puzzle = Puzzle::new(groups)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    if let Some(storage) = web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
    {
        let _ = storage.set_item(
            token::STORAGE_KEY,
            &token::encode_stored(&puzzle),
        );
    }

    Ok(token::encode(&puzzle))
}
