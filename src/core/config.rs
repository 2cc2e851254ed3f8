// 配置管理
// TOML 配置文件，缺省字段取默认值，命令行参数在加载之后覆盖

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_PROGRESS_INTERVAL};
use crate::core::error::{DexError, Result};
use crate::fusion::{FusionOptions, MAX_NAME_ID};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DexConfig {
    pub input: InputConfig,
    pub synthesis: SynthesisConfig,
    pub sprites: SpriteConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub species_path: PathBuf,
    pub split_names_path: PathBuf,
    // dex.json，可选
    pub pokedex_overrides_path: Option<PathBuf>,
    pub max_name_id: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub include_self_fusions: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub enabled: bool,
    pub base_dir: PathBuf,
    pub fusion_dir: PathBuf,
    pub triple_dir: PathBuf,
    pub autogen_dir: PathBuf,
    // Sprite Credits.csv，设置后生成作者署名
    pub credits_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    // TOML 无法写空值，关闭 JSON 导出用这个开关
    pub json_enabled: bool,
    pub json_path: Option<PathBuf>,
    // 署名列表 [{sprite_id, base_id}]
    pub artists_json_path: Option<PathBuf>,
    pub sqlite_path: Option<PathBuf>,
    pub chunk_size: usize,
    pub progress_interval: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            species_path: PathBuf::from("data/species.json"),
            split_names_path: PathBuf::from("data/SplitNames.rb"),
            pokedex_overrides_path: None,
            max_name_id: MAX_NAME_ID,
        }
    }
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            include_self_fusions: true,
        }
    }
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_dir: PathBuf::from("graphics/custom-sprites/Other/BaseSprites"),
            fusion_dir: PathBuf::from("graphics/custom-sprites/CustomBattlers"),
            triple_dir: PathBuf::from("graphics/custom-sprites/Other/Triples"),
            autogen_dir: PathBuf::from("graphics/autogen-sprites"),
            credits_path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_enabled: true,
            json_path: Some(PathBuf::from("pokemons_data.json")),
            artists_json_path: None,
            sqlite_path: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl OutputConfig {
    /// 实际生效的 JSON 输出路径。
    pub fn json_target(&self) -> Option<&Path> {
        self.json_path.as_deref().filter(|_| self.json_enabled)
    }
}

impl SynthesisConfig {
    pub fn options(&self) -> FusionOptions {
        FusionOptions {
            include_self_fusions: self.include_self_fusions,
        }
    }
}

impl DexConfig {
    /// 读取配置文件，文件不存在时使用默认配置。
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("配置文件不存在，使用默认配置: {:?}", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: DexConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("成功加载配置文件: {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        debug!("配置已保存到: {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.max_name_id == 0 {
            return Err(DexError::Config("名称表最大编号必须大于 0".to_string()));
        }
        if self.output.chunk_size == 0 {
            return Err(DexError::Config("数据库批量大小必须大于 0".to_string()));
        }
        if self.output.progress_interval == 0 {
            return Err(DexError::Config("进度日志间隔必须大于 0".to_string()));
        }
        if self.output.json_target().is_none() && self.output.sqlite_path.is_none() {
            return Err(DexError::Config("至少需要一个输出目标 (JSON 或 SQLite)".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = DexConfig::default();
        assert_eq!(config.input.max_name_id, 470);
        assert_eq!(config.output.chunk_size, 10_000);
        assert!(config.synthesis.include_self_fusions);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: DexConfig = toml::from_str(
            r#"
            [output]
            sqlite_path = "data.sqlite"
            chunk_size = 500

            [synthesis]
            include_self_fusions = false
            "#,
        )
        .unwrap();
        assert_eq!(config.output.chunk_size, 500);
        assert_eq!(config.output.sqlite_path, Some(PathBuf::from("data.sqlite")));
        assert_eq!(config.output.json_target(), Some(Path::new("pokemons_data.json")));
        assert!(!config.synthesis.options().include_self_fusions);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_validation() {
        let mut config = DexConfig::default();
        config.output.chunk_size = 0;
        assert!(matches!(config.validate(), Err(DexError::Config(_))));

        let mut config = DexConfig::default();
        config.output.json_path = None;
        assert!(config.validate().is_err());

        config.output.sqlite_path = Some(PathBuf::from("data.sqlite"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_output_can_be_disabled() {
        let config: DexConfig = toml::from_str(
            r#"
            [output]
            sqlite_path = "data.sqlite"
            json_enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.output.json_target(), None);
        assert_eq!(config.output.sqlite_path, Some(PathBuf::from("data.sqlite")));
        assert!(config.validate().is_ok());

        let config: DexConfig = toml::from_str("[output]\njson_enabled = false\n").unwrap();
        assert!(matches!(config.validate(), Err(DexError::Config(_))));
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join("fusiondex.toml");

        let mut config = DexConfig::default();
        config.input.pokedex_overrides_path = Some(PathBuf::from("lib/data/dex.json"));
        config.sprites.credits_path = Some(PathBuf::from("graphics/Sprite Credits.csv"));
        config.output.json_enabled = false;
        config.output.sqlite_path = Some(PathBuf::from("data.sqlite"));
        config.save(&config_path).unwrap();
        assert!(config_path.exists());

        let loaded = DexConfig::load(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = DexConfig::load(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, DexConfig::default());
    }
}
