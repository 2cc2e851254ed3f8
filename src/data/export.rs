// JSON 导出
// 整个图鉴是一个以编号为键的对象，逐条写出，不在内存中拼接整份文档

use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::assets::SpriteCredits;
use crate::constants::DEFAULT_PROGRESS_INTERVAL;
use crate::core::error::Result;
use crate::pokedex::Pokedex;

// 署名列表只保留编号与基础编号
#[derive(Serialize)]
struct CreditLink<'a> {
    sprite_id: &'a str,
    base_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct JsonExporter {
    progress_interval: usize,
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self {
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl JsonExporter {
    pub fn new(progress_interval: usize) -> Self {
        Self {
            progress_interval: progress_interval.max(1),
        }
    }

    pub fn export(&self, pokedex: &Pokedex, path: &Path) -> Result<usize> {
        info!("导出 JSON: {:?}", path);
        let mut writer = BufWriter::new(File::create(path)?);
        let written = self.write_to(pokedex, &mut writer)?;
        writer.flush()?;
        info!("JSON 导出完成: {} 条", written);
        Ok(written)
    }

    /// 写出 `{ "<id>": {...}, ... }`，返回写出的条目数。
    pub fn write_to<W: Write>(&self, pokedex: &Pokedex, writer: &mut W) -> Result<usize> {
        writer.write_all(b"{\n")?;

        let mut written = 0;
        for entry in pokedex.entries() {
            if written > 0 {
                writer.write_all(b",\n")?;
            }
            serde_json::to_writer(&mut *writer, &entry.record.id)?;
            writer.write_all(b": ")?;
            serde_json::to_writer_pretty(&mut *writer, &entry)?;

            if written % self.progress_interval == 0 {
                info!("已处理 {} 条", written);
            }
            written += 1;
        }

        writer.write_all(b"\n}")?;
        Ok(written)
    }

    /// 写出 `[{ "sprite_id": ..., "base_id": ... }, ...]`。
    pub fn export_credits(&self, credits: &SpriteCredits, path: &Path) -> Result<usize> {
        let links: Vec<CreditLink<'_>> = credits
            .iter()
            .map(|credit| CreditLink {
                sprite_id: &credit.sprite_id,
                base_id: &credit.base_id,
            })
            .collect();

        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &links)?;
        writer.flush()?;
        info!("署名 JSON 已写出: {:?} ({} 条)", path, links.len());
        Ok(links.len())
    }
}
