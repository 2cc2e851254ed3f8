// 谱系模块
// 反向进化边与共享进化链的计算

pub mod builder;
mod chain;
pub mod graph;

pub use builder::{Lineage, LineageBuilder};
pub use graph::EvolutionGraph;
