//! Pointer and keyboard translation
//!
//! Turns raw screen positions and key codes into simulation [`Intent`]s using
//! the on-screen control layout for the current viewport.

use glam::Vec2;

use crate::consts::COMPACT_BREAKPOINT;
use crate::sim::{GamePhase, Intent};

/// Side length of the bottom-left corner that never drops boba
const DEAD_ZONE: f32 = 300.0;

/// Axis-aligned screen rectangle; edges are exclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.origin + self.size;
        p.x > self.origin.x && p.x < max.x && p.y > self.origin.y && p.y < max.y
    }
}

/// On-screen buttons in the drink-making phase, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Serve,
    Reset,
    Tea,
    Milk,
}

impl Control {
    pub const ALL: [Control; 4] = [Control::Serve, Control::Reset, Control::Tea, Control::Milk];

    pub fn label(&self) -> &'static str {
        match self {
            Control::Serve => "Serve",
            Control::Reset => "Reset",
            Control::Tea => "Tea",
            Control::Milk => "Milk",
        }
    }

    fn intent(&self) -> Intent {
        match self {
            Control::Serve => Intent::Serve,
            Control::Reset => Intent::Reset,
            Control::Tea => Intent::BeginTeaPour,
            Control::Milk => Intent::BeginMilkPour,
        }
    }
}

/// Button rectangles for a viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlLayout {
    pub viewport: Vec2,
    pub start_button: Rect,
    pub controls: [(Control, Rect); 4],
}

impl ControlLayout {
    pub fn from_viewport(width: f32, height: f32) -> Self {
        let compact = width < COMPACT_BREAKPOINT;

        let (start_w, start_h, start_drop) = if compact {
            (150.0, 50.0, 50.0)
        } else {
            (200.0, 60.0, 80.0)
        };
        let start_button = Rect::new(
            width / 2.0 - start_w / 2.0,
            height / 2.0 + start_drop,
            start_w,
            start_h,
        );

        let (w, h, x, y0, spacing) = if compact {
            (100.0, 38.0, width - 110.0, 30.0, 45.0)
        } else {
            (120.0, 42.0, width - 135.0, 40.0, 50.0)
        };
        let controls = Control::ALL.map(|c| {
            let row = c as usize as f32;
            (c, Rect::new(x, y0 + spacing * row, w, h))
        });

        Self {
            viewport: Vec2::new(width, height),
            start_button,
            controls,
        }
    }

    pub fn control_at(&self, pos: Vec2) -> Option<Control> {
        self.controls
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(c, _)| *c)
    }

    /// Bottom-left corner reserved for overlay toggles
    pub fn in_dead_zone(&self, pos: Vec2) -> bool {
        pos.x < DEAD_ZONE && pos.y > self.viewport.y - DEAD_ZONE
    }

    /// Intent for a press at `pos` in `phase`
    pub fn pointer_down(&self, phase: GamePhase, pos: Vec2) -> Option<Intent> {
        match phase {
            GamePhase::Opening => self.start_button.contains(pos).then_some(Intent::Start),
            GamePhase::Ordering => Some(Intent::SubmitOrder),
            GamePhase::MakingDrink => {
                if self.in_dead_zone(pos) {
                    return None;
                }
                Some(
                    self.control_at(pos)
                        .map_or(Intent::DropBoba, |c| c.intent()),
                )
            }
            _ => None,
        }
    }
}

/// Releasing the pointer ends both pours
pub fn pointer_up() -> [Intent; 2] {
    [Intent::EndTeaPour, Intent::EndMilkPour]
}

/// Intent for a key press (`KeyboardEvent.code`)
pub fn key_down(phase: GamePhase, code: &str) -> Option<Intent> {
    if phase != GamePhase::MakingDrink {
        return None;
    }
    match code {
        "Space" => Some(Intent::BeginTeaPour),
        "KeyM" => Some(Intent::BeginMilkPour),
        "KeyI" => Some(Intent::DropIce),
        _ => None,
    }
}

/// Intent for a key release, honoured in any phase
pub fn key_up(code: &str) -> Option<Intent> {
    match code {
        "Space" => Some(Intent::EndTeaPour),
        "KeyM" => Some(Intent::EndMilkPour),
        _ => None,
    }
}
