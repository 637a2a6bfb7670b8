//! Terminal rendering. All crossterm output happens here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! level state. No game logic is performed; this module only translates
//! simulation pixels into terminal cells.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use platform_shooter::config::GameConfig;
use platform_shooter::entities::{
    Bullet, EnemyVariant, Entity, EntityKind, EntityState, LevelState, Rect, RoundPhase,
};
use platform_shooter::levels::LevelRecord;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_PLATFORM: Color = Color::DarkBlue;
const C_HUD_NAME: Color = Color::White;
const C_HUD_LIVES: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_SHRINKER: Color = Color::Yellow;
const C_ENEMY_INVISIBLE: Color = Color::DarkMagenta;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_HINT: Color = Color::DarkGrey;

/// Simulation-pixel → terminal-cell mapping for one frame.
struct Cells {
    cell_w: f32,
    cell_h: f32,
    cols: u16,
    rows: u16,
}

impl Cells {
    fn new(config: &GameConfig, state: &LevelState) -> Self {
        Cells {
            cell_w: config.cell_width,
            cell_h: config.cell_height,
            cols: (state.map.width / config.cell_width) as u16,
            rows: (state.map.height / config.cell_height) as u16,
        }
    }

    /// Inclusive cell span covered by `rect`, or `None` when fully off screen.
    fn span(&self, rect: &Rect) -> Option<(u16, u16, u16, u16)> {
        let x0 = (rect.left() / self.cell_w).floor();
        let y0 = (rect.top() / self.cell_h).floor();
        let x1 = ((rect.right() - 1.0) / self.cell_w).floor().max(x0);
        let y1 = ((rect.bottom() - 1.0) / self.cell_h).floor().max(y0);
        if x1 < 0.0 || y1 < 0.0 || x0 >= self.cols as f32 || y0 >= self.rows as f32 {
            return None;
        }
        let clamp_x = |v: f32| v.max(0.0).min(self.cols as f32 - 1.0) as u16;
        let clamp_y = |v: f32| v.max(0.0).min(self.rows as f32 - 1.0) as u16;
        Some((clamp_x(x0), clamp_y(y0), clamp_x(x1), clamp_y(y1)))
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete frame of a level.
pub fn render<W: Write>(
    out: &mut W,
    state: &LevelState,
    config: &GameConfig,
    paused: bool,
) -> std::io::Result<()> {
    let cells = Cells::new(config, state);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_platforms(out, state, &cells)?;

    for entity in state.players.iter().chain(state.enemies.iter()) {
        if entity.is_visible() {
            draw_entity(out, entity, &cells)?;
        }
    }
    for bullet in &state.player_bullets {
        draw_bullet(out, bullet, C_BULLET_PLAYER, &cells)?;
    }
    for bullet in &state.enemy_bullets {
        draw_bullet(out, bullet, C_BULLET_ENEMY, &cells)?;
    }

    draw_hud(out, state, &cells)?;
    draw_controls_hint(out, &cells)?;

    match state.phase() {
        RoundPhase::Running => {}
        RoundPhase::PlayerWon => draw_banner(out, &cells, "MISSION COMPLETED", Color::Green)?,
        RoundPhase::PlayerLost => draw_banner(out, &cells, "MISSION FAILED", Color::Red)?,
    }
    if paused {
        draw_pause(out, &cells)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, cells.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Level selection screen.
pub fn render_menu<W: Write>(out: &mut W, levels: &[LevelRecord]) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let top = (height / 2).saturating_sub(levels.len() as u16 / 2 + 3);

    let title = "GUN  MAYHEM";
    out.queue(cursor::MoveTo(cx.saturating_sub(title.len() as u16 / 2), top))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    for (i, level) in levels.iter().enumerate() {
        let row = top + 2 + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(12), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        if level.unlocked {
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(Print(&level.name))?;
        } else {
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("{}  (locked)", level.name)))?;
        }
    }

    let hint = "← → / A D : Move   ↑ W : Jump   ↓ S : Drop   SPACE P : Shoot   Q : Quit";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(hint.chars().count() as u16 / 2),
        top + 3 + levels.len() as u16,
    ))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Map ───────────────────────────────────────────────────────────────────────

fn draw_platforms<W: Write>(out: &mut W, state: &LevelState, cells: &Cells) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_PLATFORM))?;
    for tile in state.map.platforms.values().flatten() {
        if let Some((x0, y0, x1, _)) = cells.span(tile) {
            out.queue(cursor::MoveTo(x0, y0))?;
            out.queue(Print("▀".repeat((x1 - x0 + 1) as usize)))?;
        }
    }
    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

/// One panel per entity: name and remaining lives.
fn draw_hud<W: Write>(out: &mut W, state: &LevelState, cells: &Cells) -> std::io::Result<()> {
    let panels: Vec<(String, u32)> = state
        .players
        .iter()
        .chain(state.enemies.iter())
        .map(|e| (e.name.clone(), e.lives))
        .collect();

    let total: usize = panels.iter().map(|(n, l)| n.chars().count() + *l as usize + 3).sum();
    let mut x = (cells.cols / 2).saturating_sub(total as u16 / 2);

    for (name, lives) in panels {
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_NAME))?;
        out.queue(Print(&name))?;
        out.queue(Print(" "))?;
        out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
        out.queue(Print("♥".repeat(lives as usize)))?;
        x += (name.chars().count() + lives as usize + 3) as u16;
    }

    let title = format!("[ {} ]", state.level_name);
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(title))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn entity_color(entity: &Entity) -> Color {
    match &entity.kind {
        EntityKind::Player => C_PLAYER,
        EntityKind::Enemy(brain) => match brain.variant {
            EnemyVariant::Default => C_ENEMY,
            EnemyVariant::Shrinker => C_ENEMY_SHRINKER,
            EnemyVariant::Invisible => C_ENEMY_INVISIBLE,
        },
    }
}

/// Filled body, a face on the leading edge, and the name above.
fn draw_entity<W: Write>(out: &mut W, entity: &Entity, cells: &Cells) -> std::io::Result<()> {
    let Some((x0, y0, x1, y1)) = cells.span(&entity.rect) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(entity_color(entity)))?;

    let fill = match entity.state {
        EntityState::Idle => "█",
        EntityState::Running => "▓",
        EntityState::Jumping => "▒",
    };
    let body_w = (x1 - x0 + 1) as usize;
    for row in y0..=y1 {
        out.queue(cursor::MoveTo(x0, row))?;
        out.queue(Print(fill.repeat(body_w)))?;
    }

    let face = if entity.shooting { "*" } else if entity.facing_right { ">" } else { "<" };
    let face_x = if entity.facing_right { x1 } else { x0 };
    out.queue(cursor::MoveTo(face_x, y0))?;
    out.queue(Print(face))?;

    if y0 > 1 {
        let name_x = (x0 + x1) / 2;
        let name_x = name_x.saturating_sub(entity.name.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(name_x, y0 - 1))?;
        out.queue(Print(&entity.name))?;
    }
    Ok(())
}

fn draw_bullet<W: Write>(out: &mut W, bullet: &Bullet, color: Color, cells: &Cells) -> std::io::Result<()> {
    if let Some((x0, y0, x1, _)) = cells.span(&bullet.rect) {
        let glyph = if bullet.facing_right { "═►" } else { "◄═" };
        let x = if bullet.facing_right { x1.saturating_sub(1) } else { x0 };
        out.queue(cursor::MoveTo(x, y0))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, cells: &Cells) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, cells.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← → : Move   ↑ : Jump   ↓ : Drop   SPACE : Shoot   ESC : Pause"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_boxed<W: Write>(out: &mut W, cells: &Cells, lines: &[(&str, Color)]) -> std::io::Result<()> {
    let cx = cells.cols / 2;
    let start_row = (cells.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_banner<W: Write>(out: &mut W, cells: &Cells, text: &str, color: Color) -> std::io::Result<()> {
    let bar = "═".repeat(text.chars().count() + 4);
    let top = format!("╔{}╗", bar);
    let mid = format!("║  {}  ║", text);
    let bottom = format!("╚{}╝", bar);
    draw_boxed(out, cells, &[(&top, color), (&mid, color), (&bottom, color)])
}

fn draw_pause<W: Write>(out: &mut W, cells: &Cells) -> std::io::Result<()> {
    draw_boxed(
        out,
        cells,
        &[
            ("╔══════════════════╗", Color::Yellow),
            ("║      PAUSED      ║", Color::Yellow),
            ("╚══════════════════╝", Color::Yellow),
            ("ESC/C - Continue   M - Menu   Q - Quit", Color::White),
        ],
    )
}
