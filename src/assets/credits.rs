// 精灵图作者署名
// Sprite Credits.csv 与精灵图目录合并：每个图片文件一条，区分主图与备选图

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::sprites::scan_png_files;
use crate::core::config::SpriteConfig;
use crate::core::error::Result;
use crate::utils::compare_ids;

lazy_static! {
    static ref BASE_ID_RE: Regex = Regex::new(r"^\d+(\.\d+)*[a-zA-Z]?").unwrap();
}

const ARTIST_SEPARATOR: &str = " & ";
const CREDITED_MARKER: &str = " by ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteType {
    Main,
    Alt,
}

impl SpriteType {
    // 末尾为字母（如 `25a`）或带有 ` by ` 的都是备选图
    pub fn of(sprite_id: &str) -> Self {
        let trailing_letter = sprite_id.chars().last().is_some_and(|c| c.is_ascii_alphabetic());
        if trailing_letter || sprite_id.contains(CREDITED_MARKER) {
            SpriteType::Alt
        } else {
            SpriteType::Main
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SpriteType::Main => "main",
            SpriteType::Alt => "alt",
        }
    }
}

/// 去掉备选图的字母后缀或作者部分：`"1.4b"` → `"1.4"`，`"25 by someone"` → `"25"`。
pub fn base_sprite_id(sprite_id: &str) -> &str {
    match BASE_ID_RE.find(sprite_id) {
        Some(found) => {
            let matched = found.as_str();
            matched.strip_suffix(|c: char| c.is_ascii_alphabetic()).unwrap_or(matched)
        }
        None => sprite_id.split(CREDITED_MARKER).next().unwrap_or(sprite_id),
    }
}

// CSV 中的一行: id,artist,type,notes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditRow {
    pub artist: Option<String>,
    pub notes: Option<String>,
}

/// 逐行按逗号切分，同一编号出现多次时以最后一行为准。
pub fn parse_credit_rows(source: &str) -> HashMap<String, CreditRow> {
    let non_empty = |field: Option<&str>| field.map(str::trim).filter(|f| !f.is_empty()).map(str::to_string);

    source
        .trim()
        .lines()
        .map(|line| {
            let mut fields = line.trim_end_matches('\r').split(',');
            let id = fields.next().unwrap_or_default().to_string();
            let artist = non_empty(fields.next());
            let _declared_type = fields.next();
            let notes = non_empty(fields.next());
            (id, CreditRow { artist, notes })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteCredit {
    pub sprite_id: String,
    pub sprite_type: SpriteType,
    pub base_id: String,
    pub artists: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl SpriteCredit {
    fn new(sprite_id: String, row: Option<&CreditRow>) -> Self {
        let sprite_type = SpriteType::of(&sprite_id);
        let base_id = match sprite_type {
            SpriteType::Alt => base_sprite_id(&sprite_id).to_string(),
            SpriteType::Main => sprite_id.clone(),
        };
        let artists = row
            .and_then(|row| row.artist.as_deref())
            .map(|artist| artist.split(ARTIST_SEPARATOR).map(str::to_string).collect());

        Self {
            sprite_id,
            sprite_type,
            base_id,
            artists,
            notes: row.and_then(|row| row.notes.clone()),
        }
    }

    // 同一基础编号内的顺序：主图、字母备选图、其他、带作者的变体
    fn variant_rank(&self) -> u8 {
        let id = self.sprite_id.as_str();
        let credited = id.contains(CREDITED_MARKER);
        if credited {
            3
        } else if !id.chars().any(|c| c.is_ascii_alphabetic()) {
            0
        } else if id.chars().last().is_some_and(|c| c.is_ascii_alphabetic()) {
            1
        } else {
            2
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SpriteCredits {
    entries: Vec<SpriteCredit>,
}

impl SpriteCredits {
    /// 每个精灵图编号生成一条署名，CSV 中没有的编号作者为空。
    pub fn build<I>(rows: &HashMap<String, CreditRow>, sprite_ids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut entries: Vec<SpriteCredit> = sprite_ids
            .into_iter()
            .map(|sprite_id| {
                let row = rows.get(&sprite_id);
                SpriteCredit::new(sprite_id, row)
            })
            .collect();

        entries.sort_by(|a, b| {
            match compare_ids(base_sprite_id(&a.sprite_id), base_sprite_id(&b.sprite_id)) {
                Ordering::Equal => a.variant_rank().cmp(&b.variant_rank()),
                ordering => ordering,
            }
        });
        Self { entries }
    }

    /// 读取署名 CSV，并扫描基础、融合、三体三个精灵图目录。
    pub fn load(credits_path: &Path, config: &SpriteConfig) -> Result<Self> {
        let rows = parse_credit_rows(&fs::read_to_string(credits_path)?);
        debug!("署名记录 {} 条: {:?}", rows.len(), credits_path);

        let directories: [&PathBuf; 3] = [&config.base_dir, &config.fusion_dir, &config.triple_dir];
        let sprite_ids: Vec<String> = directories
            .into_iter()
            .flat_map(|dir| scan_png_files(dir))
            .filter_map(|file| file.strip_suffix(".png").map(str::to_string))
            .collect();

        let credits = Self::build(&rows, sprite_ids);
        info!("精灵图署名 {} 条", credits.len());
        Ok(credits)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteCredit> {
        self.entries.iter()
    }
}
