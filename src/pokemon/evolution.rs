// 宝可梦进化数据
// 作者编写的只有前向边；反向边与进化链由谱系构建器计算

use serde::{Deserialize, Serialize};
use std::sync::Arc;

// 记录上编写的前向进化边
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evolution {
    pub target: String,
    pub method: String,
    #[serde(default)]
    pub param: String,
}

impl Evolution {
    pub fn new(target: impl Into<String>, method: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            method: method.into(),
            param: param.into(),
        }
    }

    // 空参数在输出中表示为 null
    pub fn param_value(&self) -> Option<String> {
        if self.param.is_empty() {
            None
        } else {
            Some(self.param.clone())
        }
    }
}

/// 已解析的进化边。
///
/// 作为 `evolves_to` 时 `id` 是目标编号；作为 `evolves_from` 时 `id`
/// 是来源编号、`target` 是自身编号。`name` 在目标缺失时保持 `None`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionLink {
    pub id: String,
    pub name: Option<String>,
    pub target: String,
    pub method: String,
    pub param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// 进化链中的一个节点
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub id: String,
    pub name: String,
    // 遍历中的前驱，根节点为 None
    pub parent: Option<String>,
    pub target: Option<String>,
    pub method: Option<String>,
    pub param: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

// 一个连通谱系共享的整条链
pub type EvolutionChain = Arc<Vec<ChainLink>>;

// 单个条目的谱系标注
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageEntry {
    pub evolves_from: Vec<EvolutionLink>,
    pub evolves_to: Vec<EvolutionLink>,
    pub evolution_chain: EvolutionChain,
}

impl LineageEntry {
    pub fn is_root(&self) -> bool {
        self.evolves_from.is_empty()
    }

    pub fn chain_ids(&self) -> Vec<&str> {
        self.evolution_chain.iter().map(|link| link.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_param_is_null() {
        assert_eq!(Evolution::new("2", "Level", "16").param_value(), Some("16".to_string()));
        assert_eq!(Evolution::new("450", "NECROZMA", "").param_value(), None);
    }

    #[test]
    fn test_link_without_image_omits_field() {
        let link = EvolutionLink {
            id: "2".to_string(),
            name: None,
            target: "2".to_string(),
            method: "Level".to_string(),
            param: Some("16".to_string()),
            image: None,
        };
        let value = serde_json::to_value(&link).unwrap();
        assert!(value.get("image").is_none());
        assert!(value["name"].is_null());
    }
}
