// 应用程序核心 - 图鉴构建流程
// 加载 -> 合成 -> 谱系 -> 导出，每一步都从配置读取输入输出位置

use log::info;

use crate::assets::{NoSprites, SpriteCredits, SpriteDirectories, SpriteResolver};
use crate::core::config::DexConfig;
use crate::core::error::Result;
use crate::data::{load_pokedex_overrides, load_species, JsonExporter, SpeciesData, SqliteExporter};
use crate::fusion::{build_population, FusionEngine, Population, SplitNameTable};
use crate::pokedex::Pokedex;
use crate::pokemon::{CreatureKind, CreatureRecord};
use crate::{dex_error, profile};

// 一次构建的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub base: usize,
    pub fusions: usize,
    pub triples: usize,
    pub chains: usize,
    pub dangling_edges: usize,
    pub pokedex_overrides: usize,
    pub sprite_credits: Option<usize>,
    pub json_written: Option<usize>,
    pub sqlite_written: Option<usize>,
}

pub struct App {
    config: DexConfig,
}

impl App {
    pub fn new(config: DexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    pub fn load_names(&self) -> Result<SplitNameTable> {
        profile!("加载名称表", {
            SplitNameTable::from_file(&self.config.input.split_names_path, self.config.input.max_name_id)
        })
    }

    pub fn load_species(&self) -> Result<SpeciesData> {
        profile!("加载种族数据", { load_species(&self.config.input.species_path) })
    }

    fn sprites(&self) -> Box<dyn SpriteResolver> {
        if self.config.sprites.enabled {
            Box::new(SpriteDirectories::from_config(&self.config.sprites))
        } else {
            Box::new(NoSprites)
        }
    }

    /// 未配置署名表时返回 None。
    pub fn load_credits(&self) -> Result<Option<SpriteCredits>> {
        match &self.config.sprites.credits_path {
            Some(path) => Ok(Some(profile!("加载署名", { SpriteCredits::load(path, &self.config.sprites)? }))),
            None => Ok(None),
        }
    }

    /// 构建完整图鉴，返回图鉴与其中应用的图鉴文本覆盖数。
    pub fn build_pokedex(&self) -> Result<(Pokedex, usize)> {
        let engine = FusionEngine::new(self.load_names()?);
        let species = self.load_species()?;

        let population = profile!("构建种群", {
            build_population(&engine, species.base, species.triples, self.config.synthesis.options())?
        });
        let (population, applied) = self.apply_pokedex_overrides(population)?;

        let sprites = self.sprites();
        let pokedex = profile!("构建谱系", { Pokedex::build(population, sprites.as_ref())? });
        Ok((pokedex, applied))
    }

    fn apply_pokedex_overrides(&self, population: Population) -> Result<(Population, usize)> {
        match &self.config.input.pokedex_overrides_path {
            Some(path) => {
                let overrides = load_pokedex_overrides(path)?;
                let (population, applied) = population.with_pokedex_overrides(&overrides);
                info!("图鉴文本覆盖 {} 条", applied);
                Ok((population, applied))
            }
            None => Ok((population, 0)),
        }
    }

    pub fn run(&self) -> Result<RunSummary> {
        info!("开始构建图鉴");
        let (pokedex, pokedex_overrides) = self.build_pokedex()?;
        let population = pokedex.population();

        let mut summary = RunSummary {
            base: population.count_kind(CreatureKind::Base),
            fusions: population.count_kind(CreatureKind::Fusion),
            triples: population.count_kind(CreatureKind::Triple),
            chains: pokedex.lineage().chain_count(),
            dangling_edges: pokedex.lineage().dangling_edges(),
            pokedex_overrides,
            ..RunSummary::default()
        };

        let credits = self.load_credits()?;
        summary.sprite_credits = credits.as_ref().map(SpriteCredits::len);

        let json_exporter = JsonExporter::new(self.config.output.progress_interval);
        if let Some(path) = self.config.output.json_target() {
            summary.json_written = Some(profile!("导出 JSON", { json_exporter.export(&pokedex, path)? }));
        }

        if let Some(path) = &self.config.output.sqlite_path {
            let mut exporter = SqliteExporter::open(path, self.config.output.chunk_size)?;
            summary.sqlite_written = Some(profile!("导出 SQLite", { exporter.export(&pokedex)? }));
            if let Some(credits) = &credits {
                exporter.export_credits(credits)?;
            }
        }

        if let (Some(credits), Some(path)) = (&credits, &self.config.output.artists_json_path) {
            json_exporter.export_credits(credits, path)?;
        }

        info!("图鉴构建完成: {:?}", summary);
        Ok(summary)
    }

    /// 只合成一对 (头, 身体)，不构建完整种群。
    pub fn fuse_one(&self, head_id: &str, body_id: &str) -> Result<CreatureRecord> {
        let engine = FusionEngine::new(self.load_names()?);
        let species = self.load_species()?;

        let find = |id: &str| {
            species
                .base
                .iter()
                .find(|record| record.id == id)
                .ok_or_else(|| dex_error!(InvalidInput, "基础条目不存在: {}", id))
        };
        engine.synthesize(find(head_id)?, find(body_id)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DexError;
    use crate::data::species::fixtures::raw_species;
    use crate::fusion::names::fixtures::SPLIT_NAMES_RB;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_inputs(dir: &Path) -> DexConfig {
        let species = Value::Array(vec![
            raw_species("BULBASAUR", 1, "Bulbasaur", json!([["CHARMANDER", "Level", 16, false]])),
            raw_species("CHARMANDER", 2, "Charmander", json!([["BULBASAUR", "Level", 16, true]])),
            raw_species("SQUIRTLE", 3, "Squirtle", json!([])),
            raw_species("TRIPLE_KANTO1", 4, "Bulbmantle", json!([])),
        ]);
        fs::write(dir.join("species.json"), species.to_string()).unwrap();
        fs::write(dir.join("SplitNames.rb"), SPLIT_NAMES_RB).unwrap();
        fs::write(dir.join("dex.json"), r#"[{"sprite": "1.2.png", "entry": "Custom."}]"#).unwrap();

        let mut config = DexConfig::default();
        config.input.species_path = dir.join("species.json");
        config.input.split_names_path = dir.join("SplitNames.rb");
        config.input.pokedex_overrides_path = Some(dir.join("dex.json"));
        config.input.max_name_id = 4;
        config.sprites.enabled = false;
        config.sprites.base_dir = dir.join("base");
        config.sprites.fusion_dir = dir.join("fusion");
        config.sprites.triple_dir = dir.join("triple");
        config.output.json_path = Some(dir.join("pokemons_data.json"));
        config.output.sqlite_path = Some(dir.join("data.sqlite"));
        config.output.chunk_size = 4;
        config
    }

    #[test]
    fn test_full_run() {
        let temp = TempDir::new().unwrap();
        let app = App::new(write_inputs(temp.path())).unwrap();
        let summary = app.run().unwrap();

        assert_eq!(summary.base, 3);
        assert_eq!(summary.fusions, 9);
        assert_eq!(summary.triples, 1);
        assert_eq!(summary.pokedex_overrides, 1);
        assert_eq!(summary.dangling_edges, 0);
        assert_eq!(summary.json_written, Some(13));
        assert_eq!(summary.sqlite_written, Some(13));

        let json: Value = serde_json::from_str(&fs::read_to_string(temp.path().join("pokemons_data.json")).unwrap()).unwrap();
        assert_eq!(json["1.2"]["pokedex_entry"], "Custom.");
        assert_eq!(json["1.2"]["name"], "Bulbmander");
        assert_eq!(json["2"]["evolves_from"][0]["id"], "1");
        assert_eq!(json["1.1"]["evolution_chain"][0]["id"], "1.1");
    }

    #[test]
    fn test_run_with_credits_and_without_json() {
        let temp = TempDir::new().unwrap();
        let mut config = write_inputs(temp.path());
        fs::create_dir_all(temp.path().join("fusion")).unwrap();
        fs::write(temp.path().join("fusion").join("1.2.png"), b"png").unwrap();
        fs::write(temp.path().join("fusion").join("1.2a.png"), b"png").unwrap();
        fs::write(temp.path().join("credits.csv"), "1.2,Alice & Bob,main,\n").unwrap();
        config.sprites.credits_path = Some(temp.path().join("credits.csv"));
        config.output.json_enabled = false;
        config.output.artists_json_path = Some(temp.path().join("artists.json"));

        let summary = App::new(config).unwrap().run().unwrap();
        assert_eq!(summary.sprite_credits, Some(2));
        assert_eq!(summary.json_written, None);
        assert!(!temp.path().join("pokemons_data.json").exists());

        let exporter = SqliteExporter::open(&temp.path().join("data.sqlite"), 4).unwrap();
        assert_eq!(exporter.credit_count().unwrap(), 2);

        let artists: Value = serde_json::from_str(&fs::read_to_string(temp.path().join("artists.json")).unwrap()).unwrap();
        assert_eq!(artists, json!([{"sprite_id": "1.2", "base_id": "1.2"}, {"sprite_id": "1.2a", "base_id": "1.2"}]));
    }

    #[test]
    fn test_fuse_one() {
        let temp = TempDir::new().unwrap();
        let app = App::new(write_inputs(temp.path())).unwrap();
        let fused = app.fuse_one("2", "1").unwrap();
        assert_eq!(fused.id, "2.1");
        assert_eq!(fused.name, "Charbasaur");

        assert!(matches!(app.fuse_one("2", "99"), Err(DexError::InvalidInput(_))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DexConfig::default();
        config.output.json_path = None;
        assert!(App::new(config).is_err());
    }
}
