// 结构相等去重工具
// 所有合并步骤（招式、特性、蛋组、进化边）都经过这里去重，保持首次出现的顺序

use indexmap::IndexSet;
use std::hash::Hash;

/// 合并若干序列并按结构相等去重，保留首次出现的顺序。
///
/// 相等性完全由 `PartialEq` 决定：序列按位置逐项比较，记录按字段比较。
/// 对 `serde_json::Value` 而言对象的键顺序无关，而 `1` 与 `1.0`
/// 属于不同数值表示，不会被视为相等。
///
/// 元素无法哈希时使用（如带原始 JSON 参数的进化边），其余合并走 [`unique_hashed`]。
pub fn unique<I, T>(sequences: I) -> Vec<T>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = T>,
    T: PartialEq,
{
    let mut output: Vec<T> = Vec::new();
    for sequence in sequences {
        for value in sequence {
            if !output.contains(&value) {
                output.push(value);
            }
        }
    }
    output
}

/// 与 [`unique`] 语义相同，用哈希集合避免平方级比较。
/// 融合时每条记录都要合并上百个招式，走这条路径。
pub fn unique_hashed<I, T>(sequences: I) -> Vec<T>
where
    I: IntoIterator,
    I::Item: IntoIterator<Item = T>,
    T: Hash + Eq,
{
    let mut seen: IndexSet<T> = IndexSet::new();
    for sequence in sequences {
        seen.extend(sequence);
    }
    seen.into_iter().collect()
}
