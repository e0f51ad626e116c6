use crate::entity::Field;
use crate::web_renderer::WebRenderer;
use crate::{Game, Input, Renderer};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

const FIELD_WIDTH: f64 = 800.0;
const FIELD_HEIGHT: f64 = 500.0;

struct GameLoop {
    game: Game,
    renderer: WebRenderer,
}

impl GameLoop {
    fn new() -> Result<Self, JsValue> {
        let game = Game::new(Field::new(FIELD_WIDTH, FIELD_HEIGHT));
        let mut renderer = WebRenderer::new("pong-canvas")?;
        renderer.init().map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self { game, renderer })
    }

    fn update_frame(&mut self, current_time: f64) -> Result<(), JsValue> {
        // Drain pointer input sampled since the last frame
        if let Some(input) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            match input {
                Input::PointerMove(y) => self.game.set_player_target(y),
                Input::Nudge(dy) => self.game.nudge_player(dy),
                Input::Quit => {
                    // In web, we can't really quit, just log it
                    web_sys::console::log_1(&"Game quit".into());
                }
            }
        }

        // One physics step and one draw per animation frame
        self.game.update(current_time);
        self.renderer
            .render(&self.game)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(())
    }
}

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    // Set panic hook for better error messages
    console_error_panic_hook::set_once();

    let game_loop = Rc::new(RefCell::new(GameLoop::new()?));

    let window = web_sys::window().ok_or("no window")?;
    let performance = window.performance().ok_or("no performance")?;

    // Self-rescheduling requestAnimationFrame closure
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    let game_loop_clone = game_loop.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let current_time = performance.now();

        if let Err(e) = game_loop_clone.borrow_mut().update_frame(current_time) {
            web_sys::console::error_1(&e);
            return; // Stop loop on error
        }

        // Schedule next frame
        let window = web_sys::window().unwrap();
        window
            .request_animation_frame(f.borrow().as_ref().unwrap().as_ref().unchecked_ref())
            .unwrap();
    }) as Box<dyn FnMut()>));

    // Start the loop
    window
        .request_animation_frame(g.borrow().as_ref().unwrap().as_ref().unchecked_ref())
        .unwrap();

    web_sys::console::log_1(&"[WASM] Game loop started".into());

    Ok(())
}
