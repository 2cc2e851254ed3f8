// 融合名称合成
// 名称片段只存在于上游 SplitNames.rb 中，这里用固定模式的扫描器读取，结构不符即失败

use crate::core::error::{DexError, Result};
use lazy_static::lazy_static;
use log::{debug, info};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::utils::capitalize_first;

lazy_static! {
    static ref WS_RE: Regex = Regex::new(r"^[ \t\r\n]*").unwrap();
    static ref COMMENT_RE: Regex = Regex::new(r"^#[^\n]*(\n|$)[ \t\r\n]*").unwrap();
    static ref START_RE: Regex = Regex::new(r"^module GameData").unwrap();
    static ref SPLIT_NAMES_START_RE: Regex = Regex::new(r"^SPLIT_NAMES = \[").unwrap();
    static ref SPLIT_NAMES_DATA_RE: Regex = Regex::new(r#"^\["([^"]*)", "([^"]*)"\],"#).unwrap();
    static ref SPLIT_NAMES_END_RE: Regex = Regex::new(r"^\]").unwrap();
    static ref NAT_DEX_START_RE: Regex = Regex::new(r"^NAT_DEX_MAPPING = \{").unwrap();
    static ref NAT_DEX_DATA_RE: Regex = Regex::new(r"^([1-9][0-9]*) => ([1-9][0-9]*),").unwrap();
    static ref NAT_DEX_END_RE: Regex = Regex::new(r"^\}").unwrap();
    static ref END_RE: Regex = Regex::new(r"^end").unwrap();
}

// 上游名称表覆盖的最大编号
pub const MAX_NAME_ID: u32 = 470;

// 名称前后缀
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitName {
    pub prefix: String,
    pub suffix: String,
}

impl SplitName {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

// 编号 -> (前缀, 后缀) 名称表，初始化时构建一次
#[derive(Debug, Clone, Default)]
pub struct SplitNameTable {
    entries: HashMap<String, SplitName>,
}

// 在源文本上推进的游标
struct Scanner<'a> {
    source: &'a str,
    index: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self { source, index: 0 }
    }

    fn matches(&mut self, re: &Regex) -> Option<Captures<'a>> {
        let rest: &'a str = &self.source[self.index..];
        let captures = re.captures(rest)?;
        self.index += captures.get(0).map_or(0, |m| m.end());
        Some(captures)
    }

    fn skip_whitespace(&mut self) {
        self.matches(&WS_RE);
    }

    fn skip_comments(&mut self) {
        while self.matches(&COMMENT_RE).is_some() {}
    }

    fn expect(&mut self, re: &Regex, stage: &str) -> Result<()> {
        match self.matches(re) {
            Some(_) => Ok(()),
            None => Err(DexError::NameTable(format!("{} (偏移 {})", stage, self.index))),
        }
    }

    fn at_end(&self) -> bool {
        self.index >= self.source.len()
    }
}

impl SplitNameTable {
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, SplitName)>,
        K: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(id, name)| (id.into(), name)).collect(),
        }
    }

    pub fn from_file(path: &Path, max_id: u32) -> Result<Self> {
        info!("加载名称表: {:?}", path);
        let source = fs::read_to_string(path)?;
        Self::parse(&source, max_id)
    }

    /// 解析 SplitNames.rb，为 `1..=max_id` 的每个编号生成名称前后缀。
    ///
    /// 编号 `i` 取 `SPLIT_NAMES[NAT_DEX_MAPPING[i]]`，没有映射时取 `SPLIT_NAMES[i]`。
    pub fn parse(source: &str, max_id: u32) -> Result<Self> {
        let mut scanner = Scanner::new(source);

        scanner.skip_whitespace();
        scanner.expect(&START_RE, "未找到模块起始")?;

        scanner.skip_whitespace();
        scanner.expect(&SPLIT_NAMES_START_RE, "未找到 SPLIT_NAMES 数据起始")?;

        let mut split_names: Vec<SplitName> = Vec::new();
        scanner.skip_whitespace();
        while scanner.matches(&SPLIT_NAMES_END_RE).is_none() {
            let data = scanner
                .matches(&SPLIT_NAMES_DATA_RE)
                .ok_or_else(|| DexError::NameTable(format!("SPLIT_NAMES 数据块格式错误 (偏移 {})", scanner.index)))?;
            split_names.push(SplitName::new(&data[1], &data[2]));
            scanner.skip_whitespace();
        }

        scanner.skip_whitespace();
        scanner.expect(&NAT_DEX_START_RE, "未找到 NAT_DEX_MAPPING 数据起始")?;

        let mut nat_dex_mapping: HashMap<u32, usize> = HashMap::new();
        loop {
            scanner.skip_whitespace();
            scanner.skip_comments();
            if scanner.matches(&NAT_DEX_END_RE).is_some() {
                break;
            }
            let data = scanner
                .matches(&NAT_DEX_DATA_RE)
                .ok_or_else(|| DexError::NameTable(format!("NAT_DEX_MAPPING 数据块格式错误 (偏移 {})", scanner.index)))?;
            let from = parse_index(&data[1])?;
            let to = parse_index(&data[2])?;
            nat_dex_mapping.insert(from, to as usize);
        }

        scanner.skip_whitespace();
        scanner.expect(&END_RE, "未找到模块结尾")?;

        scanner.skip_whitespace();
        if !scanner.at_end() {
            return Err(DexError::NameTable(format!("模块结尾后存在多余数据 (偏移 {})", scanner.index)));
        }

        debug!("SPLIT_NAMES {} 条, NAT_DEX_MAPPING {} 条", split_names.len(), nat_dex_mapping.len());

        let mut entries = HashMap::with_capacity(max_id as usize);
        for id in 1..=max_id {
            let index = nat_dex_mapping.get(&id).copied().unwrap_or(id as usize);
            let name = split_names.get(index).cloned().ok_or_else(|| {
                DexError::NameTable(format!("编号 {} 指向不存在的 SPLIT_NAMES 下标 {}", id, index))
            })?;
            entries.insert(id.to_string(), name);
        }

        info!("名称表构建完成: {} 个编号", entries.len());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Result<&SplitName> {
        self.entries
            .get(id)
            .ok_or_else(|| DexError::UnknownNameId(id.to_string()))
    }

    /// 头部取前缀、身体取后缀；前缀末字符与后缀首字符相同时去掉前缀的末字符。
    pub fn fuse_names(&self, head_id: &str, body_id: &str) -> Result<String> {
        let prefix = &self.get(head_id)?.prefix;
        let suffix = &self.get(body_id)?.suffix;

        let mut prefix = prefix.clone();
        if let (Some(last), Some(first)) = (prefix.chars().last(), suffix.chars().next()) {
            if last == first {
                prefix.pop();
            }
        }

        Ok(capitalize_first(&format!("{prefix}{suffix}")))
    }
}

fn parse_index(token: &str) -> Result<u32> {
    token
        .parse::<u32>()
        .map_err(|e| DexError::NameTable(format!("无效编号 {token}: {e}")))
}
