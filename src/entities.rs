//! Simulation types. Pure data; the logic lives in `compute`.

use std::rc::Rc;

use crate::map::MapData;
use crate::physics::Physics;

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned rectangle in play-field pixels. `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Rect { x: cx - w / 2.0, y: cy - h / 2.0, w, h }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Strict overlap; rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.w > 0.0
            && self.h > 0.0
            && other.w > 0.0
            && other.h > 0.0
            && self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

// ── Enums ─────────────────────────────────────────────────────────────────────

/// Drives animation selection only; falling is reported as `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityState {
    Idle,
    Running,
    Jumping,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyVariant {
    /// Regular enemy.
    Default,
    /// Half the size of a regular enemy.
    Shrinker,
    /// Only drawn while shooting or being knocked back.
    Invisible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeaponKind {
    /// One bullet per shot.
    Single,
    /// Three bullets stacked vertically, two bullet heights apart.
    TripleShotter,
}

// ── Weapons & projectiles ─────────────────────────────────────────────────────

/// Stateless shooting strategy owned by an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub rect: Rect,
    /// Signed horizontal speed; negative travels left.
    pub speed: f32,
    /// Knockback added to the entity hit. Same sign as `speed`.
    pub damage: f32,
    /// Sprite orientation, the mirrored image for left-flying bullets.
    pub facing_right: bool,
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Enemy-only decision parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyBrain {
    pub variant: EnemyVariant,
    /// Horizontal distance of the bullet-dodge probe from the enemy.
    pub vision_range: f32,
    /// Whether the enemy fires at the player when sharing its platform.
    pub shoots: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Player,
    Enemy(EnemyBrain),
}

/// Shared shape of the player and every enemy variant.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub name: String,
    pub lives: u32,
    pub kind: EntityKind,

    pub width: f32,
    pub height: f32,
    pub rect: Rect,

    pub vx: f32,
    pub vy: f32,
    /// Horizontal impulse from bullet hits, decays every tick.
    pub knockback_x: f32,

    /// Top of the platform last landed on.
    pub platform: f32,
    pub on_ground: bool,
    /// One-shot: fall through the current platform once.
    pub skip_platform: bool,

    pub facing_right: bool,
    pub shooting: bool,
    pub frame_index: f32,
    pub state: EntityState,

    pub weapon: Weapon,
    pub physics: Physics,
}

impl Entity {
    pub fn brain(&self) -> Option<&EnemyBrain> {
        match &self.kind {
            EntityKind::Enemy(brain) => Some(brain),
            EntityKind::Player => None,
        }
    }

    /// Invisible enemies only show up while shooting or being pushed right.
    pub fn is_visible(&self) -> bool {
        match &self.kind {
            EntityKind::Enemy(EnemyBrain { variant: EnemyVariant::Invisible, .. }) => {
                self.knockback_x > 0.0 || self.shooting
            }
            _ => true,
        }
    }
}

// ── Round lifecycle ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Running,
    PlayerLost,
    PlayerWon,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelResult {
    pub player_won: bool,
    /// Tick at which the round was decided.
    pub finish_tick: u64,
}

/// What enemies know about the player each tick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PlayerView {
    pub center_x: f32,
    pub platform: f32,
}

/// The entire state of one level run. Cloneable so the per-tick update can
/// return a new copy and leave its input untouched.
#[derive(Clone, Debug)]
pub struct LevelState {
    pub level_id: u32,
    pub level_name: String,
    pub map: Rc<MapData>,
    /// Holds the player until its last life is lost.
    pub players: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    /// Last known player position, kept after the player is removed.
    pub player_view: PlayerView,
    pub result: Option<LevelResult>,
    pub frame: u64,
}

impl LevelState {
    pub fn phase(&self) -> RoundPhase {
        match self.result {
            None => RoundPhase::Running,
            Some(LevelResult { player_won: true, .. }) => RoundPhase::PlayerWon,
            Some(LevelResult { player_won: false, .. }) => RoundPhase::PlayerLost,
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.players.first()
    }
}
