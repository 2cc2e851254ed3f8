// 融合规则
// 每个字段的合成公式，全部为纯函数

use crate::pokemon::{GenderRatio, GrowthRate, Habitat, PokemonType};

// 成长速度优先级，取第一个与任一亲代匹配的
pub const GROWTH_RATE_PRIORITY: [GrowthRate; 6] = [
    GrowthRate::Slow,
    GrowthRate::Erratic,
    GrowthRate::Fluctuating,
    GrowthRate::Parabolic,
    GrowthRate::Medium,
    GrowthRate::Fast,
];

// 稀有栖息地，按顺序优先
pub const RARE_HABITATS: [Habitat; 3] = [Habitat::Rare, Habitat::Sea, Habitat::Cave];

/// 种族值：`max(1, floor((2·dominant + recessive) / 3))`。
pub fn calc_stat(dominant: u32, recessive: u32) -> u32 {
    ((2 * u64::from(dominant) + u64::from(recessive)) / 3).max(1) as u32
}

/// 努力值：两亲代平均值向下取整，无主次之分。
pub fn calc_ev(a: u32, b: u32) -> u32 {
    average(a, b)
}

pub fn average(a: u32, b: u32) -> u32 {
    ((u64::from(a) + u64::from(b)) / 2) as u32
}

/// 主属性取头部（一般/飞行的头部改为飞行）；副属性取身体副属性，
/// 与主属性相同时改取身体主属性。单属性身体的副属性视为其主属性，
/// 结果与主属性相同时副属性为空。
pub fn resolve_types(
    head: (PokemonType, Option<PokemonType>),
    body: (PokemonType, Option<PokemonType>),
) -> (PokemonType, Option<PokemonType>) {
    let (head_primary, head_secondary) = head;
    let primary = if head_primary == PokemonType::Normal && head_secondary == Some(PokemonType::Flying) {
        PokemonType::Flying
    } else {
        head_primary
    };

    let (body_primary, body_secondary) = body;
    let body_secondary = body_secondary.unwrap_or(body_primary);
    let secondary = if primary == body_secondary {
        body_primary
    } else {
        body_secondary
    };

    (primary, (secondary != primary).then_some(secondary))
}

pub fn resolve_growth_rate(head: GrowthRate, body: GrowthRate) -> GrowthRate {
    GROWTH_RATE_PRIORITY
        .into_iter()
        .find(|rate| *rate == head || *rate == body)
        .unwrap_or(GrowthRate::Medium)
}

/// 无性别优先，其次纯雄、纯雌；否则对雌性概率取平均，
/// 选表中最接近的一项，距离相同时按表的声明顺序取第一个。
pub fn resolve_gender_ratio(head: GenderRatio, body: GenderRatio) -> GenderRatio {
    for dominant in [GenderRatio::Genderless, GenderRatio::AlwaysMale, GenderRatio::AlwaysFemale] {
        if head == dominant || body == dominant {
            return dominant;
        }
    }

    let (Some(a), Some(b)) = (head.female_chance(), body.female_chance()) else {
        return GenderRatio::Genderless;
    };
    let target = average(a, b);

    let mut best = GenderRatio::Female50Percent;
    let mut best_distance = u32::MAX;
    for ratio in GenderRatio::TABLE {
        if let Some(chance) = ratio.female_chance() {
            let distance = chance.abs_diff(target);
            if distance < best_distance {
                best = ratio;
                best_distance = distance;
            }
        }
    }
    best
}

pub fn resolve_habitat(head: Habitat, body: Habitat) -> Habitat {
    if head == body {
        return head;
    }
    if head == Habitat::None {
        return body;
    }
    if body == Habitat::None {
        return head;
    }
    RARE_HABITATS
        .into_iter()
        .find(|habitat| *habitat == head || *habitat == body)
        .unwrap_or(head)
}
