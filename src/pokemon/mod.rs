// 宝可梦数据模型模块
// 种群条目、属性、进化边与谱系标注

pub mod evolution;
pub mod species;
pub mod types;

// 重新导出主要类型
pub use evolution::{ChainLink, Evolution, EvolutionChain, EvolutionLink, LineageEntry};
pub use species::{
    Color, CreatureKind, CreatureRecord, EggGroup, GenderRatio, GrowthRate, Habitat, LearnedMove, Shape,
    SpriteMetrics, Stats,
};
pub use types::PokemonType;
