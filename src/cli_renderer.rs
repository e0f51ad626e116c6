use crate::game::{Game, Phase};
use crate::renderer::{Input, Renderer};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, MouseEvent, MouseEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

// Keyboard fallback for terminals without mouse reporting.
const KEY_NUDGE: f64 = 2.0;

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS for smooth rendering
            target_frame_time: Duration::from_millis(33),
        }
    }

    fn cell_glyph(game: &Game, x: f64, y: f64) -> char {
        let field = &game.field;

        let on_paddle = |paddle_x: f64, paddle_y: f64| {
            x >= paddle_x
                && x < paddle_x + field.paddle_width
                && y >= paddle_y.floor()
                && y < (paddle_y + field.paddle_height).ceil()
        };

        let ball_x = game.ball.x.round();
        let ball_y = game.ball.y.round();
        if x >= ball_x && x < ball_x + field.ball_size && y >= ball_y && y < ball_y + field.ball_size
        {
            return '●';
        }
        if on_paddle(field.player_x, game.player.y) || on_paddle(field.ai_x, game.ai.y) {
            return '█';
        }
        // Dashed center net
        if x == (field.width / 2.0).floor() && (y as i64) % 2 == 0 {
            return '┊';
        }
        ' '
    }

    fn draw_info(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, game.field.height as u16),
            ResetColor,
            Print(format!(
                "You: {}   CPU: {}     ",
                game.player_score, game.ai_score
            ))
        )?;

        let status = match game.phase {
            Phase::ScoredPause { .. } => "Point!  ",
            Phase::Playing => "        ",
        };
        queue!(
            stdout,
            cursor::MoveTo(0, game.field.height as u16 + 1),
            Print(format!(
                "{}Controls: Mouse / Up+Down to move | Q to quit",
                status
            ))
        )?;

        Ok(())
    }
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            event::EnableMouseCapture
        )?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }
        self.last_render = Instant::now();

        let mut stdout = io::stdout();
        queue!(stdout, cursor::MoveTo(0, 0), SetForegroundColor(Color::White))?;

        let width = game.field.width as u16;
        let height = game.field.height as u16;
        let mut row = String::with_capacity(width as usize);
        for y in 0..height {
            row.clear();
            for x in 0..width {
                row.push(Self::cell_glyph(game, x as f64, y as f64));
            }
            queue!(stdout, cursor::MoveTo(0, y), Print(&row))?;
        }

        self.draw_info(game, &mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(5))? {
            match event::read()? {
                Event::Key(KeyEvent { code, .. }) => match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(Some(Input::Quit));
                    }
                    KeyCode::Up => return Ok(Some(Input::Nudge(-KEY_NUDGE))),
                    KeyCode::Down => return Ok(Some(Input::Nudge(KEY_NUDGE))),
                    _ => {}
                },
                Event::Mouse(MouseEvent { kind, row, .. }) => {
                    if matches!(kind, MouseEventKind::Moved) {
                        return Ok(Some(Input::PointerMove(row as f64)));
                    }
                }
                _ => {}
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
