// 数据模块
// 上游种族数据的读取，以及图鉴的 JSON / SQLite 导出

pub mod database;
pub mod export;
pub mod species;

pub use database::SqliteExporter;
pub use export::JsonExporter;
pub use species::{load_pokedex_overrides, load_species, parse_species, SpeciesData};
