use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{ExecutableCommand, QueueableCommand};
use unicode_width::UnicodeWidthStr;

use stroke_maze::{
    Cell, Dir, MoveOutcome, Phase, Pos, SessionController, Settings, Snapshot, SpeedTier,
    SystemClock,
};

const CELL_W: usize = 2;
const HUD_ROWS: u16 = 2;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Player,
    Pursuer,
    Wall,
    Empty,
    Highlight,
    Symbol(char),
}

#[derive(Clone, Copy, PartialEq)]
struct Paint {
    glyph: Glyph,
    color: Color,
}

struct Renderer {
    last: Vec<Paint>,
    last_hud: [String; 2],
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    fn new(size: usize) -> Self {
        Self {
            last: vec![
                Paint {
                    glyph: Glyph::Empty,
                    color: Color::Reset,
                };
                size * size
            ],
            last_hud: Default::default(),
            needs_full: true,
            origin_x: 0,
            origin_y: HUD_ROWS,
        }
    }
}

type Session = SessionController<SystemClock>;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let settings = Settings::from_env();
    let mut session = SessionController::new(settings, SystemClock::default())?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut session);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run(stdout: &mut Stdout, session: &mut Session) -> anyhow::Result<()> {
    let mut renderer = Renderer::new(session.settings().board_size);
    let frame_time = session.settings().frame_time();
    let mut status = String::from("Collect the kanji in stroke order (arrows or hjkl)");

    loop {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('r') => {
                    session.restart()?;
                    status = String::from("Restarted at level 1");
                    renderer.needs_full = true;
                }
                KeyCode::Char('n') if session.state().phase() == Phase::Won => {
                    session.next_level()?;
                    status = format!("Level {}", session.state().progress().level);
                    renderer.needs_full = true;
                }
                code => {
                    if let Some(dir) = dir_for_key(code) {
                        let outcome = session.handle_input(dir);
                        if let Some(msg) = cue_for(outcome, &session.snapshot()) {
                            status = msg;
                        }
                    }
                }
            }
        }

        if let Some(outcome) = session.update() {
            if let Some(msg) = cue_for(outcome, &session.snapshot()) {
                status = msg;
            }
        }
        render(stdout, &session.snapshot(), &status, &mut renderer)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

fn dir_for_key(code: KeyCode) -> Option<Dir> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(Dir::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Dir::Down),
        KeyCode::Left | KeyCode::Char('h') => Some(Dir::Left),
        KeyCode::Right | KeyCode::Char('l') => Some(Dir::Right),
        _ => None,
    }
}

/// Status line standing in for the pickup and collision sounds.
fn cue_for(outcome: MoveOutcome, snap: &Snapshot) -> Option<String> {
    match outcome {
        MoveOutcome::Collected => Some(format!("Got it! +{}", (snap.current_stage - 1) * 100)),
        MoveOutcome::Won => Some(String::from("Level clear! n: next level, q: quit")),
        MoveOutcome::Lost if snap.stages_cleared > 0 => Some(format!(
            "Caught after {} stage(s). r: restart, q: quit",
            snap.stages_cleared
        )),
        MoveOutcome::Lost => Some(String::from("Caught! r: restart, q: quit")),
        MoveOutcome::Moved | MoveOutcome::Rejected => None,
    }
}

fn render(
    stdout: &mut Stdout,
    snap: &Snapshot,
    status: &str,
    renderer: &mut Renderer,
) -> io::Result<()> {
    let size = snap.grid.size();
    let needed_h = size as u16 + HUD_ROWS;
    let needed_w = (size * CELL_W) as u16;

    stdout.queue(MoveTo(0, 0))?;

    let (term_w, term_h) = terminal::size()?;
    if term_w < needed_w || term_h < needed_h {
        stdout.queue(Clear(ClearType::All))?;
        let msg = format!(
            "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
            needed_w, needed_h, term_w, term_h
        );
        stdout.queue(Print(msg))?;
        stdout.flush()?;
        renderer.needs_full = true;
        return Ok(());
    }

    let origin_x = (term_w - needed_w) / 2;
    let origin_y = (term_h - needed_h) / 2 + HUD_ROWS;
    if origin_x != renderer.origin_x || origin_y != renderer.origin_y {
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
        renderer.needs_full = true;
    }
    if renderer.last.len() != size * size {
        *renderer = Renderer::new(size);
        renderer.origin_x = origin_x;
        renderer.origin_y = origin_y;
    }
    if renderer.needs_full {
        stdout.queue(Clear(ClearType::All))?;
    }

    let hud = hud_lines(snap, status);
    for (row, line) in hud.iter().enumerate() {
        if renderer.needs_full || *line != renderer.last_hud[row] {
            stdout.queue(MoveTo(renderer.origin_x, renderer.origin_y - HUD_ROWS + row as u16))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(line))?;
            stdout.queue(ResetColor)?;
        }
    }
    renderer.last_hud = hud;

    for (pos, cell) in snap.grid.cells() {
        let paint = paint_for(snap, pos, cell);
        let idx = pos.y * size + pos.x;
        if renderer.needs_full || paint != renderer.last[idx] {
            renderer.last[idx] = paint;
            draw_cell(stdout, renderer, pos, paint)?;
        }
    }
    renderer.needs_full = false;

    stdout.flush()?;
    Ok(())
}

fn hud_lines(snap: &Snapshot, status: &str) -> [String; 2] {
    let target = match (snap.phase, snap.target) {
        (Phase::Won, _) => String::from("all collected"),
        (_, Some(symbol)) => format!("{} ({} strokes)", symbol, snap.current_stage),
        (_, None) => String::from("-"),
    };
    let mut top = format!(
        "Level {}  Score {}  Next: {}  Left: {}",
        snap.level, snap.score, target, snap.remaining
    );
    if let Some(secs) = snap.hint_countdown_secs {
        top.push_str(&format!("  Hint in {}s", secs));
    }
    [top, status.to_string()]
}

fn paint_for(snap: &Snapshot, pos: Pos, cell: Cell) -> Paint {
    let (glyph, color) = match cell {
        Cell::Player => (Glyph::Player, Color::Yellow),
        Cell::Pursuer {
            tier: SpeedTier::Fast,
            ..
        } => (Glyph::Pursuer, Color::Magenta),
        Cell::Pursuer { .. } => (Glyph::Pursuer, Color::Red),
        Cell::Wall => (Glyph::Wall, Color::Blue),
        Cell::Collectible(c) if snap.is_hinted(&cell) => (Glyph::Symbol(c.symbol), Color::Green),
        Cell::Collectible(c) => (Glyph::Symbol(c.symbol), Color::White),
        Cell::Empty if snap.phase == Phase::Playing && snap.highlights.contains(&pos) => {
            (Glyph::Highlight, Color::DarkGrey)
        }
        Cell::Empty => (Glyph::Empty, Color::Reset),
    };
    Paint { glyph, color }
}

fn draw_cell(stdout: &mut Stdout, renderer: &Renderer, pos: Pos, paint: Paint) -> io::Result<()> {
    let text = match paint.glyph {
        Glyph::Player => String::from("私"),
        Glyph::Pursuer => String::from("敵"),
        Glyph::Wall => String::from("██"),
        Glyph::Empty => String::from("  "),
        Glyph::Highlight => String::from("· "),
        Glyph::Symbol(symbol) => symbol.to_string(),
    };
    let x_pos = renderer.origin_x + (pos.x * CELL_W) as u16;
    let y_pos = renderer.origin_y + pos.y as u16;
    stdout.queue(MoveTo(x_pos, y_pos))?;
    stdout.queue(SetForegroundColor(paint.color))?;
    stdout.queue(Print(&text))?;
    let w = UnicodeWidthStr::width(text.as_str());
    if w < CELL_W {
        for _ in 0..(CELL_W - w) {
            stdout.queue(Print(' '))?;
        }
    }
    stdout.queue(ResetColor)?;
    Ok(())
}
