// 宝可梦种族数据模块
// 一条 CreatureRecord 对应种群中的一个条目：基础、双体融合或三体融合

use super::{Evolution, PokemonType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub pokedex_entry: String,
    pub primary_type: PokemonType,
    #[serde(default)]
    pub secondary_type: Option<PokemonType>,
    pub base_stats: Stats,
    pub evs: Stats,
    pub base_exp: u32,
    pub growth_rate: GrowthRate,
    pub gender_ratio: GenderRatio,
    pub catch_rate: u32,
    pub happiness: u32,
    pub egg_groups: Vec<EggGroup>,
    pub hatch_steps: u32,
    pub height: u32,
    pub weight: u32,
    pub color: Color,
    pub shape: Shape,
    pub habitat: Habitat,
    pub sprite_metrics: SpriteMetrics,
    #[serde(default)]
    pub moves: Vec<LearnedMove>,
    #[serde(default)]
    pub tutor_moves: Vec<String>,
    #[serde(default)]
    pub egg_moves: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub hidden_abilities: Vec<String>,
    #[serde(default)]
    pub evolutions: Vec<Evolution>,
}

// 条目种类，由编号中的分段数决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Base,
    Fusion,
    Triple,
}

impl CreatureKind {
    pub fn of(id: &str) -> Self {
        match id.split('.').count() {
            1 => CreatureKind::Base,
            2 => CreatureKind::Fusion,
            _ => CreatureKind::Triple,
        }
    }
}

impl CreatureRecord {
    pub fn kind(&self) -> CreatureKind {
        CreatureKind::of(&self.id)
    }

    // 组成该条目的基础编号
    pub fn component_ids(&self) -> impl Iterator<Item = &str> {
        self.id.split('.')
    }

    pub fn ability(&self, slot: usize) -> Option<&str> {
        self.abilities.get(slot).map(String::as_str)
    }

    pub fn hidden_ability(&self, slot: usize) -> Option<&str> {
        self.hidden_abilities.get(slot).map(String::as_str)
    }
}

// 六项能力值，种族值与努力值共用
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

// 精灵图显示坐标，对融合逻辑不透明
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteMetrics {
    pub back_sprite_x: i32,
    pub back_sprite_y: i32,
    pub front_sprite_x: i32,
    pub front_sprite_y: i32,
    pub front_sprite_altitude: i32,
    pub shadow_x: i32,
    pub shadow_size: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LearnedMove {
    #[serde(rename = "move")]
    pub move_id: String,
    pub level: u32,
}

impl LearnedMove {
    pub fn new(move_id: impl Into<String>, level: u32) -> Self {
        Self { move_id: move_id.into(), level }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrowthRate {
    Medium,
    Erratic,
    Fluctuating,
    Parabolic,
    Fast,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderRatio {
    AlwaysMale,
    FemaleOneEighth,
    Female25Percent,
    Female50Percent,
    Female75Percent,
    FemaleSevenEighths,
    AlwaysFemale,
    Genderless,
}

impl GenderRatio {
    // 声明顺序即平局时的优先顺序
    pub const TABLE: [GenderRatio; 8] = [
        GenderRatio::AlwaysMale,
        GenderRatio::FemaleOneEighth,
        GenderRatio::Female25Percent,
        GenderRatio::Female50Percent,
        GenderRatio::Female75Percent,
        GenderRatio::FemaleSevenEighths,
        GenderRatio::AlwaysFemale,
        GenderRatio::Genderless,
    ];

    /// 雌性概率（0-255），无性别返回 `None`。
    pub fn female_chance(&self) -> Option<u32> {
        match self {
            GenderRatio::AlwaysMale => Some(0),
            GenderRatio::FemaleOneEighth => Some(32),
            GenderRatio::Female25Percent => Some(64),
            GenderRatio::Female50Percent => Some(128),
            GenderRatio::Female75Percent => Some(192),
            GenderRatio::FemaleSevenEighths => Some(224),
            GenderRatio::AlwaysFemale => Some(255),
            GenderRatio::Genderless => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EggGroup {
    Monster,
    Water1,
    Bug,
    Flying,
    Field,
    Fairy,
    Grass,
    Humanlike,
    Water3,
    Mineral,
    Amorphous,
    Water2,
    Ditto,
    Dragon,
    Undiscovered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Green,
    Black,
    Brown,
    Purple,
    Gray,
    White,
    Pink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Head,
    Serpentine,
    Finned,
    HeadArms,
    HeadBase,
    BipedalTail,
    HeadLegs,
    Quadruped,
    Winged,
    Multiped,
    MultiBody,
    Bipedal,
    MultiWinged,
    Insectoid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Habitat {
    None,
    Grassland,
    Forest,
    WatersEdge,
    Sea,
    Cave,
    Mountain,
    RoughTerrain,
    Urban,
    Rare,
}
