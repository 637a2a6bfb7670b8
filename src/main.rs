mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Stdout, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::warn;
use rand::thread_rng;

use platform_shooter::compute::input::InputState;
use platform_shooter::compute::{init_level, newly_decided, should_return_to_menu, tick};
use platform_shooter::config::GameConfig;
use platform_shooter::entities::LevelState;
use platform_shooter::error::GameError;
use platform_shooter::levels::LevelManager;
use platform_shooter::map_loader::MapLoader;

// ── Held-key detection ────────────────────────────────────────────────────────

/// Frames a key stays down after its last press or repeat event. Terminals
/// without release events only send repeats, at 15 Hz or faster, so eight
/// frames (about 133 ms) never lapse while the key is really held.
const HOLD_WINDOW: u64 = 8;

/// Returns true if any of `keys` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| {
        key_frame
            .get(key)
            .map_or(false, |&last| frame.saturating_sub(last) <= HOLD_WINDOW)
    })
}

fn held_input(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> InputState {
    use KeyCode::{Char, Down, Left, Right, Up};
    InputState {
        left: is_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: is_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        up: is_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: is_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        shoot: is_held(key_frame, &[Char(' '), Char('p'), Char('P')], frame),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is in raw mode, so log lines go to a file. Nothing is
/// installed unless `RUST_LOG` asks for it.
fn init_logging(config: &GameConfig) {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    match std::fs::File::create(&config.log_file) {
        Ok(file) => {
            let _ = env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .try_init();
        }
        Err(e) => eprintln!("cannot open log file {}: {}", config.log_file.display(), e),
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(usize),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    manager: &LevelManager,
) -> std::io::Result<MenuResult> {
    display::render_menu(out, manager.levels())?;

    // Block until an unlocked level is picked or the player quits
    while let Ok(ev) = rx.recv() {
        let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = ev else {
            continue;
        };
        match code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                if manager.level(index).map_or(false, |l| l.unlocked) {
                    return Ok(MenuResult::Start(index));
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break,
            _ => {}
        }
    }
    Ok(MenuResult::Quit)
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum LevelExit {
    Menu,
    Quit,
}

/// One level run. `key_frame` remembers the frame of each key's latest
/// event; every tick feeds the still-fresh keys to the simulation, so
/// shooting while running works on terminals without release events.
fn game_loop<W: Write>(
    out: &mut W,
    mut state: LevelState,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    manager: &mut LevelManager,
) -> std::io::Result<LevelExit> {
    let mut rng = thread_rng();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut paused = false;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Input ─────────────────────────────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            if kind == KeyEventKind::Release {
                key_frame.remove(&code);
                continue;
            }
            key_frame.insert(code.clone(), frame);
            if kind == KeyEventKind::Repeat {
                continue;
            }

            match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(LevelExit::Quit);
                }
                KeyCode::Char('q') | KeyCode::Char('Q') if paused => return Ok(LevelExit::Quit),
                KeyCode::Char('m') | KeyCode::Char('M') if paused => return Ok(LevelExit::Menu),
                KeyCode::Char('c') | KeyCode::Char('C') if paused => paused = false,
                KeyCode::Esc => paused = !paused,
                _ => {}
            }
        }

        if !paused {
            let input = held_input(&key_frame, frame);
            let next = tick(&state, &input, &mut rng);

            // Unlock as soon as the round is won, not when the banner ends
            if let Some(result) = newly_decided(&state, &next) {
                if result.player_won {
                    if let Err(e) = manager.unlock_next_level(next.level_id) {
                        warn!("could not save level progress to {}: {}", manager.dir().display(), e);
                    }
                }
            }
            state = next;

            if should_return_to_menu(&state) {
                return Ok(LevelExit::Menu);
            }
        }

        display::render(out, &state, config, paused)?;

        let elapsed = frame_start.elapsed();
        if elapsed < config.frame {
            thread::sleep(config.frame - elapsed);
        }
    }
}

// ── Terminal session ──────────────────────────────────────────────────────────

/// Raw mode plus alternate screen for as long as the value lives. Dropping it
/// puts the terminal back, also on early returns.
struct Session {
    out: BufWriter<Stdout>,
    /// Key-release reporting was accepted (kitty protocol terminals).
    release_events: bool,
}

impl Session {
    fn open() -> std::io::Result<Self> {
        let mut out = BufWriter::new(stdout());
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        let release_events = out
            .execute(PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
            .is_ok();
        Ok(Session { out, release_events })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.release_events {
            let _ = self.out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking reads happen on their own thread; the loops only poll the channel.
fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                return;
            }
        }
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let config = GameConfig::from_env();
    init_logging(&config);

    // Level data is hand-authored; a broken file is fatal before the
    // terminal is touched.
    let mut manager = match LevelManager::load(config.levels_dir()) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let result = {
        let mut session = Session::open()?;
        let events = spawn_event_reader();
        run(&mut session.out, &events, &config, &mut manager)
    };

    match result {
        Ok(()) => Ok(()),
        Err(RunError::Io(e)) => Err(e),
        Err(RunError::Game(e)) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

enum RunError {
    Io(std::io::Error),
    Game(GameError),
}

impl From<std::io::Error> for RunError {
    fn from(e: std::io::Error) -> Self {
        RunError::Io(e)
    }
}

impl From<GameError> for RunError {
    fn from(e: GameError) -> Self {
        RunError::Game(e)
    }
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    manager: &mut LevelManager,
) -> Result<(), RunError> {
    let mut maps = MapLoader::new();
    let mut rng = thread_rng();

    loop {
        match show_menu(out, rx, manager)? {
            MenuResult::Quit => break,
            MenuResult::Start(index) => {
                let Some(record) = manager.level(index).cloned() else {
                    continue;
                };
                let (cols, rows) = terminal::size()?;
                let (width, height) = config.field_size(cols, rows);
                let map_path = config.maps_dir().join(&record.map);
                let map = maps.load(&map_path, width as u32, height as u32)?;
                let state = init_level(&record, map, &mut rng)?;

                match game_loop(out, state, rx, config, manager)? {
                    LevelExit::Quit => break,
                    LevelExit::Menu => {}
                }
            }
        }
    }
    Ok(())
}
