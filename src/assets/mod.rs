// 资源模块 - 精灵图路径解析与作者署名

pub mod credits;
pub mod sprites;

pub use credits::{SpriteCredit, SpriteCredits, SpriteType};
pub use sprites::{NoSprites, SpriteDirectories, SpriteResolver};
