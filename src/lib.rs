pub mod entity;
pub mod game;
pub mod renderer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;
#[cfg(target_arch = "wasm32")]
pub mod web_main;
#[cfg(target_arch = "wasm32")]
pub mod web_renderer;

pub use entity::{Ball, Field, Paddle};
pub use game::{Game, Phase};
pub use renderer::{Input, Renderer};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
