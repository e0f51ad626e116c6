use crate::game::Game;
use crate::renderer::{Input, Renderer};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

// Colors matching the page theme
const COLOR_PADDLE: &str = "#fafafa";
const COLOR_BALL: &str = "#f5b041";
const COLOR_NET: &str = "#444";

const NET_WIDTH: f64 = 4.0;
const NET_SEGMENT: f64 = 18.0;
const NET_PITCH: f64 = 30.0;

pub struct WebRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    player_score_el: Element,
    ai_score_el: Element,

    // Input state
    pending_input: Rc<RefCell<Option<Input>>>,
}

impl WebRenderer {
    pub fn new(canvas_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let player_score_el = document
            .get_element_by_id("player-score")
            .ok_or("player score element not found")?;
        let ai_score_el = document
            .get_element_by_id("ai-score")
            .ok_or("ai score element not found")?;

        Ok(Self {
            canvas,
            context,
            player_score_el,
            ai_score_el,
            pending_input: Rc::new(RefCell::new(None)),
        })
    }

    fn setup_pointer_listener(&self) {
        let pending_input = self.pending_input.clone();
        let canvas = self.canvas.clone();

        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            // Pointer Y relative to the canvas top edge; the game clamps it.
            let rect = canvas.get_bounding_client_rect();
            let y = event.client_y() as f64 - rect.top();
            *pending_input.borrow_mut() = Some(Input::PointerMove(y));
        }) as Box<dyn FnMut(MouseEvent)>);

        self.canvas
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .unwrap();

        closure.forget(); // Keep listener alive
    }

    fn draw_net(&self, game: &Game) {
        self.context.set_fill_style_str(COLOR_NET);
        let x = game.field.width / 2.0 - NET_WIDTH / 2.0;
        let mut y = 0.0;
        while y < game.field.height {
            self.context.fill_rect(x, y, NET_WIDTH, NET_SEGMENT);
            y += NET_PITCH;
        }
    }

    fn draw_paddles(&self, game: &Game) {
        self.context.set_fill_style_str(COLOR_PADDLE);
        self.context.fill_rect(
            game.field.player_x,
            game.player.y,
            game.field.paddle_width,
            game.field.paddle_height,
        );
        self.context.fill_rect(
            game.field.ai_x,
            game.ai.y,
            game.field.paddle_width,
            game.field.paddle_height,
        );
    }

    fn draw_ball(&self, game: &Game) {
        self.context.set_fill_style_str(COLOR_BALL);
        self.context.begin_path();
        self.context
            .arc(
                game.ball.center_x(&game.field),
                game.ball.center_y(&game.field),
                game.field.ball_size / 2.0,
                0.0,
                std::f64::consts::PI * 2.0,
            )
            .unwrap();
        self.context.fill();
    }

    fn draw_scores(&self, game: &Game) {
        // Idempotent: reflects the current counters every frame.
        self.player_score_el
            .set_text_content(Some(&game.player_score.to_string()));
        self.ai_score_el
            .set_text_content(Some(&game.ai_score.to_string()));
    }
}

impl Renderer for WebRenderer {
    fn init(&mut self) -> io::Result<()> {
        self.setup_pointer_listener();
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Size the canvas to the field on first render (and if it changes).
        let width = game.field.width as u32;
        let height = game.field.height as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }

        self.context
            .clear_rect(0.0, 0.0, game.field.width, game.field.height);

        self.draw_net(game);
        self.draw_paddles(game);
        self.draw_ball(game);
        self.draw_scores(game);

        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        // No cleanup needed for web
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        Ok(self.pending_input.borrow_mut().take())
    }
}
