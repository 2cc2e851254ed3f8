// 精灵图路径解析
// 只用于标注进化边与进化链，不参与任何推导

use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::SpriteConfig;
use crate::pokemon::CreatureKind;

pub trait SpriteResolver {
    // 返回条目的图片路径，没有图片时返回 None
    fn resolve(&self, id: &str) -> Option<String>;
}

// 不做任何标注
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSprites;

impl SpriteResolver for NoSprites {
    fn resolve(&self, _id: &str) -> Option<String> {
        None
    }
}

/// 按目录约定解析图片：
/// 基础条目 `<base>/<id>.png`，三体 `<triple>/<id>.png`，
/// 融合优先用自定义 `<fusion>/<id>.png`，否则用 `<autogen>/<head>/<id>.png`。
#[derive(Debug, Clone)]
pub struct SpriteDirectories {
    base_dir: PathBuf,
    fusion_dir: PathBuf,
    triple_dir: PathBuf,
    autogen_dir: PathBuf,
    // 自定义融合图文件名，构建时扫描一次
    custom_fusions: HashSet<String>,
}

impl SpriteDirectories {
    pub fn new(base_dir: PathBuf, fusion_dir: PathBuf, triple_dir: PathBuf, autogen_dir: PathBuf) -> Self {
        let custom_fusions: HashSet<String> = scan_png_files(&fusion_dir).into_iter().collect();
        debug!("自定义融合图 {} 张: {:?}", custom_fusions.len(), fusion_dir);
        Self {
            base_dir,
            fusion_dir,
            triple_dir,
            autogen_dir,
            custom_fusions,
        }
    }

    pub fn from_config(config: &SpriteConfig) -> Self {
        Self::new(
            config.base_dir.clone(),
            config.fusion_dir.clone(),
            config.triple_dir.clone(),
            config.autogen_dir.clone(),
        )
    }
}

impl SpriteResolver for SpriteDirectories {
    fn resolve(&self, id: &str) -> Option<String> {
        let file_name = format!("{id}.png");
        let path = match CreatureKind::of(id) {
            CreatureKind::Base => self.base_dir.join(&file_name),
            CreatureKind::Triple => self.triple_dir.join(&file_name),
            CreatureKind::Fusion => {
                if self.custom_fusions.contains(&file_name) {
                    self.fusion_dir.join(&file_name)
                } else {
                    let head = id.split('.').next().unwrap_or(id);
                    self.autogen_dir.join(head).join(&file_name)
                }
            }
        };
        Some(path.to_string_lossy().into_owned())
    }
}

// 目录中的 .png 文件名，按名称排序；目录不可读时为空
pub(super) fn scan_png_files(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("无法读取精灵图目录 {:?}: {}", dir, e);
            return Vec::new();
        }
    };

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "png"))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn directories(root: &Path) -> SpriteDirectories {
        SpriteDirectories::new(
            root.join("base"),
            root.join("fusion"),
            root.join("triple"),
            root.join("autogen"),
        )
    }

    #[test]
    fn test_base_and_triple_paths() {
        let temp = TempDir::new().unwrap();
        let sprites = directories(temp.path());
        let base = sprites.resolve("25").unwrap();
        assert!(base.ends_with("25.png"));
        assert!(Path::new(&base).starts_with(temp.path().join("base")));

        let triple = sprites.resolve("144.145.146").unwrap();
        assert!(Path::new(&triple).starts_with(temp.path().join("triple")));
    }

    #[test]
    fn test_fusion_prefers_custom_sprite() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("fusion")).unwrap();
        fs::write(temp.path().join("fusion").join("1.4.png"), b"png").unwrap();

        let sprites = directories(temp.path());
        let custom = sprites.resolve("1.4").unwrap();
        assert_eq!(Path::new(&custom), temp.path().join("fusion").join("1.4.png"));

        let autogen = sprites.resolve("4.1").unwrap();
        assert_eq!(Path::new(&autogen), temp.path().join("autogen").join("4").join("4.1.png"));
    }

    #[test]
    fn test_no_sprites() {
        assert_eq!(NoSprites.resolve("1"), None);
    }
}
