// Pokemon属性系统
// 上游数据以全大写符号表示属性，这里原样映射

use serde::{Deserialize, Serialize};
use std::fmt;

// Pokemon属性类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PokemonType {
    Normal,     // 一般
    Fighting,   // 格斗
    Flying,     // 飞行
    Poison,     // 毒
    Ground,     // 地面
    Rock,       // 岩石
    Bug,        // 虫
    Ghost,      // 幽灵
    Steel,      // 钢
    Qmarks,     // ???
    Fire,       // 火
    Water,      // 水
    Grass,      // 草
    Electric,   // 电
    Psychic,    // 超能力
    Ice,        // 冰
    Dragon,     // 龙
    Dark,       // 恶
    Fairy,      // 妖精
}

impl PokemonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PokemonType::Normal => "NORMAL",
            PokemonType::Fighting => "FIGHTING",
            PokemonType::Flying => "FLYING",
            PokemonType::Poison => "POISON",
            PokemonType::Ground => "GROUND",
            PokemonType::Rock => "ROCK",
            PokemonType::Bug => "BUG",
            PokemonType::Ghost => "GHOST",
            PokemonType::Steel => "STEEL",
            PokemonType::Qmarks => "QMARKS",
            PokemonType::Fire => "FIRE",
            PokemonType::Water => "WATER",
            PokemonType::Grass => "GRASS",
            PokemonType::Electric => "ELECTRIC",
            PokemonType::Psychic => "PSYCHIC",
            PokemonType::Ice => "ICE",
            PokemonType::Dragon => "DRAGON",
            PokemonType::Dark => "DARK",
            PokemonType::Fairy => "FAIRY",
        }
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
