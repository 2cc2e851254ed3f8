// 种族数据加载
// 读取上游导出的 species JSON，规整成基础条目与三体条目

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::core::error::Result;
use crate::pokemon::{
    Color, CreatureKind, CreatureRecord, EggGroup, Evolution, GenderRatio, GrowthRate, Habitat, LearnedMove,
    PokemonType, Shape, SpriteMetrics, Stats,
};
use crate::utils::{compare_ids, unique, unique_hashed};

// 三体的符号编号 -> 点分编号
const TRIPLETS: [(&str, &str); 20] = [
    ("ZAPMOLTICUNO", "144.145.146"),
    ("ENRAICUNE", "243.244.245"),
    ("KYODONQUAZA", "340.341.342"),
    ("PALDIATINA", "343.344.345"),
    ("ZEKYUSHIRAM", "349.350.351"),
    ("CELEMEWCHI", "151.251.381"),
    ("VENUSTOIZARD", "3.6.9"),
    ("MEGALIGASION", "154.157.160"),
    ("SWAMPTILIKEN", "278.281.284"),
    ("TORTERNEON", "318.321.324"),
    ("DEOSECTWO", "150.348.380"),
    ("TRIPLE_KANTO1", "1.4.7"),
    ("TRIPLE_KANTO2", "2.5.8"),
    ("TRIPLE_JOHTO1", "152.155.158"),
    ("TRIPLE_JOHTO2", "153.156.159"),
    ("TRIPLE_HOENN1", "276.279.282"),
    ("TRIPLE_HOENN2", "277.280.283"),
    ("TRIPLE_SINNOH1", "316.319.322"),
    ("TRIPLE_SINNOH2", "317.320.323"),
    ("REGITRIO", "447.448.449"),
];

// 首领数据不进入种群
const BOSSES: [&str; 8] = [
    "BIRDBOSS",
    "BIRDBOSS_1",
    "BIRDBOSS_2",
    "BIRDBOSS_3",
    "SILVERBOSS_1",
    "SILVERBOSS_2",
    "SILVERBOSS_3",
    "TYRANTRUM_CARDBOARD",
];

// 重名条目的显示名
const NAME_OVERRIDES: [(&str, &str); 11] = [
    ("29", "Nidoran F"),
    ("32", "Nidoran M"),
    ("430", "Oricorio Baile Style"),
    ("431", "Oricorio Pom-Pom Style"),
    ("432", "Oricorio Pa'u Style"),
    ("433", "Oricorio Sensu Style"),
    ("464", "Lycanroc Midday"),
    ("465", "Lycanroc Midnight"),
    ("466", "Meloetta Aria Forme"),
    ("467", "Meloetta Pirouette Forme"),
    ("470", "Ultra Necrozma"),
];

fn triple_id(symbol: &str) -> Option<&'static str> {
    TRIPLETS.iter().find(|(name, _)| *name == symbol).map(|(_, id)| *id)
}

fn name_override(id: &str) -> Option<&'static str> {
    NAME_OVERRIDES.iter().find(|(key, _)| *key == id).map(|(_, name)| *name)
}

// 究极奈克洛兹玛在上游数据中没有进化来源
fn evolution_override(id: &str) -> Option<Vec<Evolution>> {
    match id {
        "450" => Some(vec![Evolution::new("U_NECROZMA", "NECROZMA", "")]),
        _ => None,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSpecies {
    pub id: String,
    pub id_number: u32,
    pub real_name: String,
    pub real_category: String,
    pub real_pokedex_entry: String,
    pub type1: PokemonType,
    #[serde(default)]
    pub type2: Option<PokemonType>,
    pub base_stats: RawStats,
    pub evs: RawStats,
    pub base_exp: u32,
    pub growth_rate: GrowthRate,
    pub gender_ratio: GenderRatio,
    pub catch_rate: u32,
    pub happiness: u32,
    #[serde(default)]
    pub egg_groups: Vec<EggGroup>,
    pub hatch_steps: u32,
    pub height: u32,
    pub weight: u32,
    pub color: Color,
    pub shape: Shape,
    pub habitat: Habitat,
    #[serde(flatten)]
    pub sprite_metrics: SpriteMetrics,
    // [等级, 招式]
    #[serde(default)]
    pub moves: Vec<(u32, String)>,
    #[serde(default)]
    pub tutor_moves: Vec<String>,
    #[serde(default)]
    pub egg_moves: Vec<String>,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub hidden_abilities: Vec<String>,
    #[serde(default)]
    pub evolutions: Vec<RawEvolution>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RawStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl From<RawStats> for Stats {
    fn from(raw: RawStats) -> Self {
        Stats {
            hp: raw.hp,
            attack: raw.attack,
            defense: raw.defense,
            special_attack: raw.special_attack,
            special_defense: raw.special_defense,
            speed: raw.speed,
        }
    }
}

// [目标, 方式, 参数, 是否为退化边]
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawEvolution(pub String, pub String, pub Value, pub bool);

impl RawEvolution {
    fn is_prevolution(&self) -> bool {
        self.3
    }

    fn param_string(&self) -> String {
        match &self.2 {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl RawSpecies {
    fn into_record(self, id: String) -> CreatureRecord {
        let name = name_override(&id).map(str::to_string).unwrap_or(self.real_name);

        let secondary_type = self.type2.filter(|secondary| *secondary != self.type1);

        let egg_groups = if self.egg_groups.is_empty() {
            vec![EggGroup::Undiscovered]
        } else {
            unique_hashed([self.egg_groups])
        };

        let evolutions = match evolution_override(&id) {
            Some(evolutions) => evolutions,
            // 参数仍是原始 JSON 值，只能按结构相等去重
            None => unique([self.evolutions.into_iter().filter(|raw| !raw.is_prevolution())])
                .into_iter()
                .map(|raw| Evolution::new(raw.0.clone(), raw.1.clone(), raw.param_string()))
                .collect(),
        };

        let moves = self
            .moves
            .into_iter()
            .map(|(level, move_id)| LearnedMove::new(move_id, level))
            .collect::<Vec<_>>();

        CreatureRecord {
            id,
            name,
            category: self.real_category,
            pokedex_entry: self.real_pokedex_entry,
            primary_type: self.type1,
            secondary_type,
            base_stats: self.base_stats.into(),
            evs: self.evs.into(),
            base_exp: self.base_exp,
            growth_rate: self.growth_rate,
            gender_ratio: self.gender_ratio,
            catch_rate: self.catch_rate,
            happiness: self.happiness,
            egg_groups,
            hatch_steps: self.hatch_steps,
            height: self.height,
            weight: self.weight,
            color: self.color,
            shape: self.shape,
            habitat: self.habitat,
            sprite_metrics: self.sprite_metrics,
            moves: unique_hashed([moves]),
            tutor_moves: unique_hashed([self.tutor_moves]),
            egg_moves: unique_hashed([self.egg_moves]),
            abilities: unique_hashed([self.abilities]),
            hidden_abilities: unique_hashed([self.hidden_abilities]),
            evolutions,
        }
    }
}

// 加载结果：基础条目保持原顺序，三体按编号排序
#[derive(Debug, Clone, Default)]
pub struct SpeciesData {
    pub base: Vec<CreatureRecord>,
    pub triples: Vec<CreatureRecord>,
}

pub fn load_species(path: &Path) -> Result<SpeciesData> {
    info!("加载种族数据: {:?}", path);
    let source = fs::read_to_string(path)?;
    parse_species(&source)
}

pub fn parse_species(source: &str) -> Result<SpeciesData> {
    let raw: Vec<RawSpecies> = serde_json::from_str(source)?;
    debug!("原始条目 {} 条", raw.len());

    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut id_map: HashMap<String, String> = HashMap::with_capacity(raw.len());
    let mut data = SpeciesData::default();
    let mut skipped = 0;

    for entry in raw {
        if !seen.insert(entry.id.clone()) {
            debug!("跳过重复条目: {}", entry.id);
            continue;
        }
        if BOSSES.contains(&entry.id.as_str()) {
            skipped += 1;
            continue;
        }

        let id = match triple_id(&entry.id) {
            Some(id) => id.to_string(),
            None => entry.id_number.to_string(),
        };
        id_map.insert(entry.id.clone(), id.clone());

        let record = entry.into_record(id);
        match record.kind() {
            CreatureKind::Triple => data.triples.push(record),
            _ => data.base.push(record),
        }
    }

    let unknown = remap_evolutions(&mut data.base, &id_map) + remap_evolutions(&mut data.triples, &id_map);
    if unknown > 0 {
        warn!("{} 条进化边的目标符号无法映射, 保留原值", unknown);
    }

    data.triples.sort_by(|a, b| compare_ids(&a.id, &b.id));

    info!(
        "种族数据加载完成: 基础 {} 条, 三体 {} 条, 跳过首领 {} 条",
        data.base.len(),
        data.triples.len(),
        skipped
    );
    Ok(data)
}

// 把进化目标从符号编号换成种群编号，返回无法映射的数量
fn remap_evolutions(records: &mut [CreatureRecord], id_map: &HashMap<String, String>) -> usize {
    let mut unknown = 0;
    for record in records.iter_mut() {
        for evolution in record.evolutions.iter_mut() {
            match id_map.get(&evolution.target) {
                Some(id) => evolution.target = id.clone(),
                None => {
                    debug!("{} 的进化目标 {} 不在种族数据中", record.id, evolution.target);
                    unknown += 1;
                }
            }
        }
    }
    unknown
}

#[derive(Debug, Deserialize)]
struct DexOverride {
    sprite: String,
    entry: String,
}

/// 读取 dex.json 中的图鉴文本覆盖，键为条目编号。
pub fn load_pokedex_overrides(path: &Path) -> Result<HashMap<String, String>> {
    info!("加载图鉴覆盖: {:?}", path);
    let source = fs::read_to_string(path)?;
    parse_pokedex_overrides(&source)
}

pub fn parse_pokedex_overrides(source: &str) -> Result<HashMap<String, String>> {
    let entries: Vec<DexOverride> = serde_json::from_str(source)?;
    let mut overrides = HashMap::with_capacity(entries.len());
    for DexOverride { sprite, entry } in entries {
        match sprite.strip_suffix(".png") {
            // 同一编号出现多次时取第一条
            Some(id) => {
                overrides.entry(id.to_string()).or_insert(entry);
            }
            None => debug!("忽略无法识别的图鉴覆盖: {}", sprite),
        }
    }
    Ok(overrides)
}


#[cfg(test)]
mod tests {
    use super::fixtures::raw_species;
    use super::*;
    use serde_json::json;

    fn parse(entries: Vec<Value>) -> SpeciesData {
        parse_species(&Value::Array(entries).to_string()).unwrap()
    }

    #[test]
    fn test_base_record_normalized() {
        let data = parse(vec![
            raw_species("BULBASAUR", 1, "Bulbasaur", json!([["IVYSAUR", "Level", 16, false]])),
            raw_species("IVYSAUR", 2, "Ivysaur", json!([["BULBASAUR", "Level", 16, true]])),
        ]);
        assert_eq!(data.base.len(), 2);
        let bulbasaur = &data.base[0];
        assert_eq!(bulbasaur.id, "1");
        assert_eq!(bulbasaur.secondary_type, Some(PokemonType::Poison));
        assert_eq!(bulbasaur.base_stats.special_attack, 65);
        assert_eq!(bulbasaur.sprite_metrics.front_sprite_y, 17);
        assert_eq!(bulbasaur.moves, vec![LearnedMove::new("TACKLE", 1), LearnedMove::new("GROWL", 3)]);
        assert_eq!(bulbasaur.evolutions, vec![Evolution::new("2", "Level", "16")]);

        // 退化边不保留
        assert!(data.base[1].evolutions.is_empty());
    }

    #[test]
    fn test_bosses_and_duplicates_skipped() {
        let data = parse(vec![
            raw_species("BULBASAUR", 1, "Bulbasaur", json!([])),
            raw_species("BULBASAUR", 1, "Bulbasaur", json!([])),
            raw_species("BIRDBOSS", 500, "Boss", json!([])),
        ]);
        assert_eq!(data.base.len(), 1);
        assert!(data.triples.is_empty());
    }

    #[test]
    fn test_triples_mapped_and_sorted() {
        let data = parse(vec![
            raw_species("REGITRIO", 480, "Regitrio", json!([])),
            raw_species("VENUSTOIZARD", 471, "Venustoizard", json!([])),
            raw_species("TRIPLE_KANTO1", 472, "Bulbmantle", json!([["VENUSTOIZARD", "Level", 50, false]])),
        ]);
        let ids: Vec<&str> = data.triples.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1.4.7", "3.6.9", "447.448.449"]);
        assert_eq!(data.triples[0].evolutions[0].target, "3.6.9");
    }

    #[test]
    fn test_name_and_evolution_overrides() {
        let data = parse(vec![
            raw_species("NIDORANfE", 29, "Nidoran", json!([])),
            raw_species("NECROZMA", 450, "Necrozma", json!([])),
            raw_species("U_NECROZMA", 470, "Necrozma", json!([])),
        ]);
        assert_eq!(data.base[0].name, "Nidoran F");
        assert_eq!(data.base[1].evolutions, vec![Evolution::new("470", "NECROZMA", "")]);
        assert_eq!(data.base[2].name, "Ultra Necrozma");
    }

    #[test]
    fn test_duplicate_raw_evolutions_deduplicated() {
        let data = parse(vec![
            raw_species(
                "EEVEE",
                133,
                "Eevee",
                json!([
                    ["VAPOREON", "Item", "WATERSTONE", false],
                    ["VAPOREON", "Item", "WATERSTONE", false],
                    ["JOLTEON", "Item", "THUNDERSTONE", false]
                ]),
            ),
            raw_species("VAPOREON", 134, "Vaporeon", json!([])),
            raw_species("JOLTEON", 135, "Jolteon", json!([])),
        ]);
        assert_eq!(
            data.base[0].evolutions,
            vec![
                Evolution::new("134", "Item", "WATERSTONE"),
                Evolution::new("135", "Item", "THUNDERSTONE"),
            ]
        );
    }

    #[test]
    fn test_unknown_evolution_target_kept() {
        let data = parse(vec![raw_species("EEVEE", 133, "Eevee", json!([["SYLVEON", "Happiness", "", false]]))]);
        assert_eq!(data.base[0].evolutions, vec![Evolution::new("SYLVEON", "Happiness", "")]);
    }

    #[test]
    fn test_mono_type_and_empty_egg_groups() {
        let mut raw = raw_species("PIKACHU", 25, "Pikachu", json!([]));
        raw["type1"] = json!("ELECTRIC");
        raw["type2"] = json!("ELECTRIC");
        raw["egg_groups"] = json!([]);
        let data = parse(vec![raw]);
        assert_eq!(data.base[0].secondary_type, None);
        assert_eq!(data.base[0].egg_groups, vec![EggGroup::Undiscovered]);
    }

    #[test]
    fn test_missing_field_is_fatal() {
        let mut raw = raw_species("BULBASAUR", 1, "Bulbasaur", json!([]));
        raw.as_object_mut().unwrap().remove("base_stats");
        assert!(parse_species(&Value::Array(vec![raw]).to_string()).is_err());
    }

    #[test]
    fn test_pokedex_overrides() {
        let source = r#"[
            {"sprite": "1.4.png", "entry": "A fused entry."},
            {"sprite": "1.4.png", "entry": "Later duplicate."},
            {"sprite": "README", "entry": "Ignored."}
        ]"#;
        let overrides = parse_pokedex_overrides(source).unwrap();
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides["1.4"], "A fused entry.");
    }
}
