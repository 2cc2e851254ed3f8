// 融合合成引擎
// 设计原则：确定性、无副作用、头身不对称

use log::trace;

use super::names::SplitNameTable;
use super::rules::{
    average, calc_ev, calc_stat, resolve_gender_ratio, resolve_growth_rate, resolve_habitat, resolve_types,
};
use crate::core::error::Result;
use crate::pokemon::{CreatureRecord, EggGroup, Evolution, Stats};
use crate::utils::{splice_text, unique_hashed};

pub struct FusionEngine {
    names: SplitNameTable,
}

impl FusionEngine {
    pub fn new(names: SplitNameTable) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &SplitNameTable {
        &self.names
    }

    /// 以 `head` 为头、`body` 为身体合成融合条目。
    ///
    /// 唯一的失败情形是名称表中缺少任一亲代编号。
    pub fn synthesize(&self, head: &CreatureRecord, body: &CreatureRecord) -> Result<CreatureRecord> {
        let id = format!("{}.{}", head.id, body.id);
        let name = self.names.fuse_names(&head.id, &body.id)?;
        trace!("合成 {} ({})", id, name);

        let category = splice_text(&head.category, &body.category, " ");
        let pokedex_entry = format!(
            "{}.",
            splice_text(
                &rename_in_entry(&head.pokedex_entry, &head.name, &name),
                &rename_in_entry(&body.pokedex_entry, &body.name, &name),
                ".",
            )
        );

        let (primary_type, secondary_type) = resolve_types(
            (head.primary_type, head.secondary_type),
            (body.primary_type, body.secondary_type),
        );

        // 固定的显隐性分配：体力/特攻/特防取头部，攻击/防御/速度取身体
        let base_stats = Stats {
            hp: calc_stat(head.base_stats.hp, body.base_stats.hp),
            attack: calc_stat(body.base_stats.attack, head.base_stats.attack),
            defense: calc_stat(body.base_stats.defense, head.base_stats.defense),
            special_attack: calc_stat(head.base_stats.special_attack, body.base_stats.special_attack),
            special_defense: calc_stat(head.base_stats.special_defense, body.base_stats.special_defense),
            speed: calc_stat(body.base_stats.speed, head.base_stats.speed),
        };

        let evs = Stats {
            hp: calc_ev(head.evs.hp, body.evs.hp),
            attack: calc_ev(head.evs.attack, body.evs.attack),
            defense: calc_ev(head.evs.defense, body.evs.defense),
            special_attack: calc_ev(head.evs.special_attack, body.evs.special_attack),
            special_defense: calc_ev(head.evs.special_defense, body.evs.special_defense),
            speed: calc_ev(head.evs.speed, body.evs.speed),
        };

        let mut egg_groups = unique_hashed([head.egg_groups.iter().copied(), body.egg_groups.iter().copied()]);
        if egg_groups.is_empty() {
            egg_groups.push(EggGroup::Undiscovered);
        }

        let abilities = unique_hashed([[body.ability(0), head.ability(1).or(head.ability(0))]
            .into_iter()
            .flatten()
            .map(str::to_string)]);

        let hidden_abilities = unique_hashed([[
            head.ability(0),
            body.ability(1).or(body.ability(0)),
            body.hidden_ability(0),
            head.hidden_ability(0),
        ]
        .into_iter()
        .flatten()
        .map(str::to_string)]);

        let head_evolutions: Vec<Evolution> = head
            .evolutions
            .iter()
            .map(|evolution| Evolution {
                target: format!("{}.{}", evolution.target, body.id),
                method: evolution.method.clone(),
                param: evolution.param.clone(),
            })
            .collect();
        let body_evolutions: Vec<Evolution> = body
            .evolutions
            .iter()
            .map(|evolution| Evolution {
                target: format!("{}.{}", head.id, evolution.target),
                method: evolution.method.clone(),
                param: evolution.param.clone(),
            })
            .collect();

        Ok(CreatureRecord {
            id,
            name,
            category,
            pokedex_entry,
            primary_type,
            secondary_type,
            base_stats,
            evs,
            base_exp: average(head.base_exp, body.base_exp),
            growth_rate: resolve_growth_rate(head.growth_rate, body.growth_rate),
            gender_ratio: resolve_gender_ratio(head.gender_ratio, body.gender_ratio),
            catch_rate: head.catch_rate.min(body.catch_rate),
            happiness: head.happiness,
            egg_groups,
            hatch_steps: average(head.hatch_steps, body.hatch_steps),
            height: average(head.height, body.height),
            weight: average(head.weight, body.weight),
            color: head.color,
            shape: body.shape,
            habitat: resolve_habitat(head.habitat, body.habitat),
            sprite_metrics: body.sprite_metrics,
            moves: unique_hashed([head.moves.iter().cloned(), body.moves.iter().cloned()]),
            tutor_moves: unique_hashed([head.tutor_moves.iter().cloned(), body.tutor_moves.iter().cloned()]),
            egg_moves: unique_hashed([head.egg_moves.iter().cloned(), body.egg_moves.iter().cloned()]),
            abilities,
            hidden_abilities,
            evolutions: unique_hashed([head_evolutions, body_evolutions]),
        })
    }
}

// 把亲代图鉴文本中的自身名称替换为融合名称；空名称不做替换
fn rename_in_entry(entry: &str, own_name: &str, fused_name: &str) -> String {
    if own_name.is_empty() {
        entry.to_string()
    } else {
        entry.replace(own_name, fused_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::names::SplitName;
    use crate::pokemon::species::fixtures::record;
    use crate::pokemon::{GenderRatio, GrowthRate, Habitat, LearnedMove, PokemonType, SpriteMetrics};

    fn engine() -> FusionEngine {
        FusionEngine::new(SplitNameTable::from_entries([
            ("1", SplitName::new("bulb", "basaur")),
            ("4", SplitName::new("char", "mander")),
            ("7", SplitName::new("squir", "rtle")),
        ]))
    }

    fn bulbasaur() -> CreatureRecord {
        let mut bulbasaur = record("1", "Bulbasaur");
        bulbasaur.secondary_type = Some(PokemonType::Poison);
        bulbasaur.habitat = Habitat::Cave;
        bulbasaur.abilities = vec!["OVERGROW".to_string()];
        bulbasaur.hidden_abilities = vec!["CHLOROPHYLL".to_string()];
        bulbasaur.evolutions = vec![Evolution::new("2", "Level", "16")];
        bulbasaur
    }

    fn charmander() -> CreatureRecord {
        let mut charmander = record("4", "Charmander");
        charmander.category = "Lizard Pokémon".to_string();
        charmander.pokedex_entry = "Charmander has a flame. The flame shows its health.".to_string();
        charmander.primary_type = PokemonType::Fire;
        charmander.base_stats = Stats {
            hp: 39,
            attack: 52,
            defense: 43,
            special_attack: 60,
            special_defense: 50,
            speed: 65,
        };
        charmander.evs = Stats { speed: 1, ..Stats::default() };
        charmander.base_exp = 62;
        charmander.growth_rate = GrowthRate::Parabolic;
        charmander.habitat = Habitat::None;
        charmander.egg_groups = vec![EggGroup::Monster, EggGroup::Dragon];
        charmander.height = 6;
        charmander.weight = 85;
        charmander.sprite_metrics = SpriteMetrics { front_sprite_y: 12, shadow_size: 2, ..SpriteMetrics::default() };
        charmander.moves = vec![LearnedMove::new("SCRATCH", 1), LearnedMove::new("TACKLE", 1)];
        charmander.abilities = vec!["BLAZE".to_string()];
        charmander.hidden_abilities = vec!["SOLARPOWER".to_string()];
        charmander.evolutions = vec![Evolution::new("5", "Level", "16")];
        charmander
    }

    #[test]
    fn test_fusion_identity_and_name() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(fused.id, "1.4");
        assert_eq!(fused.name, "Bulbmander");
    }

    #[test]
    fn test_fusion_is_asymmetric() {
        let engine = engine();
        let a = engine.synthesize(&bulbasaur(), &charmander()).unwrap();
        let b = engine.synthesize(&charmander(), &bulbasaur()).unwrap();
        assert_eq!(b.id, "4.1");
        assert_ne!(a, b);
        assert_ne!(a.base_stats, b.base_stats);
    }

    #[test]
    fn test_fusion_habitat_and_catch_rate() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(fused.habitat, Habitat::Cave);
        assert_eq!(fused.catch_rate, 45);
    }

    #[test]
    fn test_fusion_text_fields() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(fused.category, "Seed Pokémon");
        assert_eq!(fused.pokedex_entry, "Bulbmander is a test creature. The flame shows its health.");
    }

    #[test]
    fn test_fusion_stats_follow_dominance() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(fused.base_stats.hp, calc_stat(45, 39));
        assert_eq!(fused.base_stats.attack, calc_stat(52, 49));
        assert_eq!(fused.base_stats.defense, calc_stat(43, 49));
        assert_eq!(fused.base_stats.special_attack, calc_stat(65, 60));
        assert_eq!(fused.base_stats.special_defense, calc_stat(65, 50));
        assert_eq!(fused.base_stats.speed, calc_stat(65, 45));
        assert_eq!(fused.evs.special_attack, 0);
        assert_eq!(fused.evs.speed, 0);
        assert_eq!(fused.base_exp, 63);
    }

    #[test]
    fn test_fusion_breeding_fields() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(fused.growth_rate, GrowthRate::Parabolic);
        assert_eq!(fused.gender_ratio, GenderRatio::FemaleOneEighth);
        assert_eq!(fused.egg_groups, vec![EggGroup::Monster, EggGroup::Dragon]);
        assert_eq!(fused.height, 6);
        assert_eq!(fused.weight, 77);
        assert_eq!(fused.happiness, 70);
    }

    #[test]
    fn test_fusion_appearance_fields() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(fused.color, bulbasaur().color);
        assert_eq!(fused.shape, charmander().shape);
        assert_eq!(fused.sprite_metrics, charmander().sprite_metrics);
        assert_eq!(fused.primary_type, PokemonType::Grass);
        assert_eq!(fused.secondary_type, Some(PokemonType::Fire));
    }

    #[test]
    fn test_fusion_moves_union() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(
            fused.moves,
            vec![LearnedMove::new("TACKLE", 1), LearnedMove::new("SCRATCH", 1)]
        );
    }

    #[test]
    fn test_fusion_abilities() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(fused.abilities, vec!["BLAZE", "OVERGROW"]);
        assert_eq!(fused.hidden_abilities, vec!["OVERGROW", "BLAZE", "SOLARPOWER", "CHLOROPHYLL"]);
    }

    #[test]
    fn test_fusion_second_ability_preferred() {
        let mut head = bulbasaur();
        head.abilities.push("LEAFGUARD".to_string());
        let fused = engine().synthesize(&head, &charmander()).unwrap();
        assert_eq!(fused.abilities, vec!["BLAZE", "LEAFGUARD"]);
    }

    #[test]
    fn test_self_fusion_deduplicates() {
        let fused = engine().synthesize(&bulbasaur(), &bulbasaur()).unwrap();
        assert_eq!(fused.id, "1.1");
        assert_eq!(fused.abilities, vec!["OVERGROW"]);
        assert_eq!(fused.moves, bulbasaur().moves);
        assert_eq!(
            fused.evolutions,
            vec![Evolution::new("2.1", "Level", "16"), Evolution::new("1.2", "Level", "16")]
        );
    }

    #[test]
    fn test_fusion_evolutions_retargeted() {
        let fused = engine().synthesize(&bulbasaur(), &charmander()).unwrap();
        assert_eq!(
            fused.evolutions,
            vec![Evolution::new("2.4", "Level", "16"), Evolution::new("1.5", "Level", "16")]
        );
    }

    #[test]
    fn test_empty_egg_groups_fall_back() {
        let mut head = bulbasaur();
        head.egg_groups.clear();
        let mut body = charmander();
        body.egg_groups.clear();
        let fused = engine().synthesize(&head, &body).unwrap();
        assert_eq!(fused.egg_groups, vec![EggGroup::Undiscovered]);
    }

    #[test]
    fn test_missing_name_entry_is_fatal() {
        let mut stranger = charmander();
        stranger.id = "999".to_string();
        assert!(engine().synthesize(&bulbasaur(), &stranger).is_err());
    }
}
