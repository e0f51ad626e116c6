use crossterm::terminal;
use std::io;
use std::time::{Duration, Instant};
use volley::{CliRenderer, Field, Game, Input, Renderer};

// Game logic update rate (controls gameplay speed)
const GAME_UPDATE_RATE: Duration = Duration::from_millis(16); // ~60 updates/sec

fn main() -> io::Result<()> {
    // Size the field to the terminal, reserving two lines for the score bar
    let (term_width, term_height) = terminal::size()?;
    let width = (term_width as f64).max(40.0);
    let height = (term_height.saturating_sub(2) as f64).max(15.0);

    let field = Field::with_metrics(
        width,
        height,
        1.0,                          // paddle width in cells
        (height / 5.0).round().max(3.0), // paddle height in cells
        1.0,                          // ball size in cells
        2.0,                          // paddle inset from the side walls
    );

    let mut game = Game::new(field);
    let mut renderer = CliRenderer::new();
    renderer.init()?;

    let start = Instant::now();
    let mut last_update = Instant::now();

    loop {
        if let Some(input) = renderer.poll_input()? {
            match input {
                Input::PointerMove(y) => game.set_player_target(y),
                Input::Nudge(dy) => game.nudge_player(dy),
                Input::Quit => break,
            }
        }

        if last_update.elapsed() >= GAME_UPDATE_RATE {
            let now_ms = start.elapsed().as_secs_f64() * 1000.0;
            game.update(now_ms);
            last_update = Instant::now();
        }

        // Renderer manages its own frame rate internally
        renderer.render(&game)?;
    }

    renderer.cleanup()?;
    Ok(())
}
