use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Player record handed to the engine by the scheduling layer.
///
/// The engine never mutates this struct. Per-game adjustments (home court,
/// fatigue, foul trouble) live on `PlayerInGame`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PlayerInput {
    pub id: u32,
    pub name: String,
    pub pos: Position,
    pub age: u32,
    /// Overall value used to rank lineups (roughly 40..=80)
    pub value: f64,
    pub ratings: CompositeRatings,
    #[serde(default)]
    pub injury: InjuryStatus,
    /// Coach playing-time setting (0 = bench unless needed, 1 = normal)
    #[serde(default = "default_pt_modifier")]
    pub pt_modifier: f64,
}

fn default_pt_modifier() -> f64 {
    1.0
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct InjuryStatus {
    /// Playing through a nagging injury (higher re-injury risk)
    #[serde(default)]
    pub playing_through: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
    G,
    F,
    GF,
    FC,
}

impl Position {
    pub fn is_guard(&self) -> bool {
        matches!(self, Position::PG | Position::SG | Position::G | Position::GF)
    }

    pub fn is_point_guard(&self) -> bool {
        matches!(self, Position::PG)
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, Position::SF | Position::PF | Position::F | Position::GF | Position::FC)
    }

    pub fn is_center(&self) -> bool {
        matches!(self, Position::C)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
            Position::G => "G",
            Position::F => "F",
            Position::GF => "GF",
            Position::FC => "FC",
        }
    }
}

/// Composite ratings, each normalized to [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CompositeRatings {
    pub passing: f64,
    pub rebounding: f64,
    pub defense: f64,
    pub defense_perimeter: f64,
    pub defense_interior: f64,
    pub blocking: f64,
    pub fouling: f64,
    pub drawing_fouls: f64,
    pub turnovers: f64,
    pub usage: f64,
    pub dribbling: f64,
    pub shooting_at_rim: f64,
    pub shooting_low_post: f64,
    pub shooting_mid_range: f64,
    pub shooting_three_pointer: f64,
    pub shooting_ft: f64,
    pub athleticism: f64,
    pub endurance: f64,
    pub jump_ball: f64,
}

/// Names of the composite ratings, used for weighted player selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingKind {
    Passing,
    Rebounding,
    Defense,
    DefensePerimeter,
    DefenseInterior,
    Blocking,
    Fouling,
    DrawingFouls,
    Turnovers,
    Usage,
    Dribbling,
    ShootingAtRim,
    ShootingLowPost,
    ShootingMidRange,
    ShootingThreePointer,
    ShootingFt,
    Athleticism,
    Endurance,
    JumpBall,
}

impl RatingKind {
    pub const ALL: [RatingKind; 19] = [
        RatingKind::Passing,
        RatingKind::Rebounding,
        RatingKind::Defense,
        RatingKind::DefensePerimeter,
        RatingKind::DefenseInterior,
        RatingKind::Blocking,
        RatingKind::Fouling,
        RatingKind::DrawingFouls,
        RatingKind::Turnovers,
        RatingKind::Usage,
        RatingKind::Dribbling,
        RatingKind::ShootingAtRim,
        RatingKind::ShootingLowPost,
        RatingKind::ShootingMidRange,
        RatingKind::ShootingThreePointer,
        RatingKind::ShootingFt,
        RatingKind::Athleticism,
        RatingKind::Endurance,
        RatingKind::JumpBall,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RatingKind::Passing => "passing",
            RatingKind::Rebounding => "rebounding",
            RatingKind::Defense => "defense",
            RatingKind::DefensePerimeter => "defense_perimeter",
            RatingKind::DefenseInterior => "defense_interior",
            RatingKind::Blocking => "blocking",
            RatingKind::Fouling => "fouling",
            RatingKind::DrawingFouls => "drawing_fouls",
            RatingKind::Turnovers => "turnovers",
            RatingKind::Usage => "usage",
            RatingKind::Dribbling => "dribbling",
            RatingKind::ShootingAtRim => "shooting_at_rim",
            RatingKind::ShootingLowPost => "shooting_low_post",
            RatingKind::ShootingMidRange => "shooting_mid_range",
            RatingKind::ShootingThreePointer => "shooting_three_pointer",
            RatingKind::ShootingFt => "shooting_ft",
            RatingKind::Athleticism => "athleticism",
            RatingKind::Endurance => "endurance",
            RatingKind::JumpBall => "jump_ball",
        }
    }
}

impl CompositeRatings {
    /// Every rating set to the same value
    pub fn uniform(value: f64) -> Self {
        Self {
            passing: value,
            rebounding: value,
            defense: value,
            defense_perimeter: value,
            defense_interior: value,
            blocking: value,
            fouling: value,
            drawing_fouls: value,
            turnovers: value,
            usage: value,
            dribbling: value,
            shooting_at_rim: value,
            shooting_low_post: value,
            shooting_mid_range: value,
            shooting_three_pointer: value,
            shooting_ft: value,
            athleticism: value,
            endurance: value,
            jump_ball: value,
        }
    }

    pub fn get(&self, kind: RatingKind) -> f64 {
        match kind {
            RatingKind::Passing => self.passing,
            RatingKind::Rebounding => self.rebounding,
            RatingKind::Defense => self.defense,
            RatingKind::DefensePerimeter => self.defense_perimeter,
            RatingKind::DefenseInterior => self.defense_interior,
            RatingKind::Blocking => self.blocking,
            RatingKind::Fouling => self.fouling,
            RatingKind::DrawingFouls => self.drawing_fouls,
            RatingKind::Turnovers => self.turnovers,
            RatingKind::Usage => self.usage,
            RatingKind::Dribbling => self.dribbling,
            RatingKind::ShootingAtRim => self.shooting_at_rim,
            RatingKind::ShootingLowPost => self.shooting_low_post,
            RatingKind::ShootingMidRange => self.shooting_mid_range,
            RatingKind::ShootingThreePointer => self.shooting_three_pointer,
            RatingKind::ShootingFt => self.shooting_ft,
            RatingKind::Athleticism => self.athleticism,
            RatingKind::Endurance => self.endurance,
            RatingKind::JumpBall => self.jump_ball,
        }
    }

    pub fn get_mut(&mut self, kind: RatingKind) -> &mut f64 {
        match kind {
            RatingKind::Passing => &mut self.passing,
            RatingKind::Rebounding => &mut self.rebounding,
            RatingKind::Defense => &mut self.defense,
            RatingKind::DefensePerimeter => &mut self.defense_perimeter,
            RatingKind::DefenseInterior => &mut self.defense_interior,
            RatingKind::Blocking => &mut self.blocking,
            RatingKind::Fouling => &mut self.fouling,
            RatingKind::DrawingFouls => &mut self.drawing_fouls,
            RatingKind::Turnovers => &mut self.turnovers,
            RatingKind::Usage => &mut self.usage,
            RatingKind::Dribbling => &mut self.dribbling,
            RatingKind::ShootingAtRim => &mut self.shooting_at_rim,
            RatingKind::ShootingLowPost => &mut self.shooting_low_post,
            RatingKind::ShootingMidRange => &mut self.shooting_mid_range,
            RatingKind::ShootingThreePointer => &mut self.shooting_three_pointer,
            RatingKind::ShootingFt => &mut self.shooting_ft,
            RatingKind::Athleticism => &mut self.athleticism,
            RatingKind::Endurance => &mut self.endurance,
            RatingKind::JumpBall => &mut self.jump_ball,
        }
    }

    /// First rating outside [0, 1] (or non-finite), if any
    pub fn out_of_range(&self) -> Option<(RatingKind, f64)> {
        RatingKind::ALL
            .iter()
            .map(|&kind| (kind, self.get(kind)))
            .find(|(_, v)| !v.is_finite() || *v < 0.0 || *v > 1.0)
    }
}

impl PlayerInput {
    pub fn validate(&self) -> Result<(), String> {
        if let Some((kind, value)) = self.ratings.out_of_range() {
            return Err(format!(
                "player {} rating {} out of range [0, 1]: {}",
                self.id,
                kind.name(),
                value
            ));
        }
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(format!("player {} value must be >= 0, got {}", self.id, self.value));
        }
        if !self.pt_modifier.is_finite() || self.pt_modifier < 0.0 {
            return Err(format!(
                "player {} pt_modifier must be >= 0, got {}",
                self.id, self.pt_modifier
            ));
        }
        Ok(())
    }
}
