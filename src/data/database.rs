// SQLite 导出
// 标量字段各占一列，列表与谱系以 JSON 文本存储

use log::{debug, info};
use rusqlite::{params, CachedStatement, Connection};
use serde::Serialize;
use std::path::Path;

use crate::assets::SpriteCredits;
use crate::core::error::{DexError, Result};
use crate::pokedex::{DexEntry, Pokedex};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS pokemon (
    id TEXT PRIMARY KEY,
    name TEXT,
    category TEXT,
    pokedex_entry TEXT,
    base_pokemons JSON,
    primary_type TEXT,
    secondary_type TEXT,
    base_hp INTEGER,
    base_atk INTEGER,
    base_def INTEGER,
    base_sp_atk INTEGER,
    base_sp_def INTEGER,
    base_spd INTEGER,
    ev_hp INTEGER,
    ev_atk INTEGER,
    ev_def INTEGER,
    ev_sp_atk INTEGER,
    ev_sp_def INTEGER,
    ev_spd INTEGER,
    base_exp INTEGER,
    growth_rate TEXT,
    gender_ratio TEXT,
    catch_rate INTEGER,
    happiness INTEGER,
    egg_groups JSON,
    hatch_steps INTEGER,
    height INTEGER,
    weight INTEGER,
    color TEXT,
    shape TEXT,
    habitat TEXT,
    back_sprite_x INTEGER,
    back_sprite_y INTEGER,
    front_sprite_x INTEGER,
    front_sprite_y INTEGER,
    front_sprite_a INTEGER,
    shadow_x INTEGER,
    shadow_size INTEGER,
    moves JSON,
    tutor_moves JSON,
    egg_moves JSON,
    abilities JSON,
    hidden_abilities JSON,
    evolves_from JSON,
    evolves_to JSON,
    evolution_chain JSON
)";

const CREATE_ARTISTS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS artists (
    sprite_id TEXT PRIMARY KEY,
    sprite_type TEXT,
    base_id TEXT,
    artists JSON,
    notes TEXT
)";

const INSERT_ARTIST_SQL: &str = "INSERT OR REPLACE INTO artists (sprite_id, sprite_type, base_id, artists, notes)
VALUES (?1, ?2, ?3, ?4, ?5)";

const INSERT_SQL: &str = "INSERT OR REPLACE INTO pokemon (
    id, name, category, pokedex_entry, base_pokemons, primary_type, secondary_type,
    base_hp, base_atk, base_def, base_sp_atk, base_sp_def, base_spd,
    ev_hp, ev_atk, ev_def, ev_sp_atk, ev_sp_def, ev_spd,
    base_exp, growth_rate, gender_ratio, catch_rate, happiness,
    egg_groups, hatch_steps, height, weight, color, shape, habitat,
    back_sprite_x, back_sprite_y, front_sprite_x, front_sprite_y,
    front_sprite_a, shadow_x, shadow_size,
    moves, tutor_moves, egg_moves, abilities, hidden_abilities,
    evolves_from, evolves_to, evolution_chain
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
          ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30, ?31, ?32, ?33, ?34, ?35, ?36, ?37, ?38, ?39, ?40,
          ?41, ?42, ?43, ?44, ?45, ?46)";

pub struct SqliteExporter {
    connection: Connection,
    chunk_size: usize,
}

impl SqliteExporter {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        info!("打开数据库: {:?}", path);
        Self::with_connection(Connection::open(path)?, chunk_size)
    }

    pub fn in_memory(chunk_size: usize) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, chunk_size)
    }

    fn with_connection(connection: Connection, chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(DexError::Config("数据库批量大小必须大于 0".to_string()));
        }
        connection.execute_batch(CREATE_TABLE_SQL)?;
        connection.execute_batch(CREATE_ARTISTS_TABLE_SQL)?;
        debug!("数据表 pokemon / artists 已就绪");
        Ok(Self { connection, chunk_size })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn row_count(&self) -> Result<usize> {
        let count: i64 = self.connection.query_row("SELECT COUNT(*) FROM pokemon", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn credit_count(&self) -> Result<usize> {
        let count: i64 = self.connection.query_row("SELECT COUNT(*) FROM artists", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 每 `chunk_size` 条提交一次事务，返回写入的条目数。
    pub fn export(&mut self, pokedex: &Pokedex) -> Result<usize> {
        info!("写入数据库: {} 条, 每批 {} 条", pokedex.len(), self.chunk_size);
        let entries: Vec<DexEntry<'_>> = pokedex.entries().collect();

        let mut written = 0;
        for chunk in entries.chunks(self.chunk_size) {
            let tx = self.connection.transaction()?;
            {
                let mut statement = tx.prepare_cached(INSERT_SQL)?;
                for entry in chunk {
                    insert_entry(&mut statement, entry)?;
                }
            }
            tx.commit()?;
            written += chunk.len();
            debug!("已提交 {}/{}", written, entries.len());
        }

        info!("数据库写入完成: {} 条", written);
        Ok(written)
    }

    /// 写入精灵图署名，分批方式与图鉴相同。
    pub fn export_credits(&mut self, credits: &SpriteCredits) -> Result<usize> {
        info!("写入署名: {} 条", credits.len());
        let entries: Vec<_> = credits.iter().collect();

        let mut written = 0;
        for chunk in entries.chunks(self.chunk_size) {
            let tx = self.connection.transaction()?;
            {
                let mut statement = tx.prepare_cached(INSERT_ARTIST_SQL)?;
                for credit in chunk {
                    let artists = credit.artists.as_ref().map(serde_json::to_string).transpose()?;
                    statement.execute(params![
                        credit.sprite_id,
                        credit.sprite_type.as_str(),
                        credit.base_id,
                        artists,
                        credit.notes,
                    ])?;
                }
            }
            tx.commit()?;
            written += chunk.len();
            debug!("署名已提交 {}/{}", written, entries.len());
        }
        Ok(written)
    }
}

fn insert_entry(statement: &mut CachedStatement<'_>, entry: &DexEntry<'_>) -> Result<()> {
    let record = entry.record;
    let lineage = entry.lineage;
    let stats = &record.base_stats;
    let evs = &record.evs;
    let sprite = &record.sprite_metrics;

    statement.execute(params![
        record.id,
        record.name,
        record.category,
        record.pokedex_entry,
        serde_json::to_string(&entry.base_pokemons)?,
        token(&record.primary_type)?,
        record.secondary_type.as_ref().map(token).transpose()?,
        stats.hp,
        stats.attack,
        stats.defense,
        stats.special_attack,
        stats.special_defense,
        stats.speed,
        evs.hp,
        evs.attack,
        evs.defense,
        evs.special_attack,
        evs.special_defense,
        evs.speed,
        record.base_exp,
        token(&record.growth_rate)?,
        token(&record.gender_ratio)?,
        record.catch_rate,
        record.happiness,
        serde_json::to_string(&record.egg_groups)?,
        record.hatch_steps,
        record.height,
        record.weight,
        token(&record.color)?,
        token(&record.shape)?,
        token(&record.habitat)?,
        sprite.back_sprite_x,
        sprite.back_sprite_y,
        sprite.front_sprite_x,
        sprite.front_sprite_y,
        sprite.front_sprite_altitude,
        sprite.shadow_x,
        sprite.shadow_size,
        serde_json::to_string(&record.moves)?,
        serde_json::to_string(&record.tutor_moves)?,
        serde_json::to_string(&record.egg_moves)?,
        serde_json::to_string(&record.abilities)?,
        serde_json::to_string(&record.hidden_abilities)?,
        serde_json::to_string(&lineage.evolves_from)?,
        serde_json::to_string(&lineage.evolves_to)?,
        serde_json::to_string(&lineage.evolution_chain)?,
    ])?;
    Ok(())
}

// 枚举按其序列化形式写入，与 JSON 导出保持一致
fn token<T: Serialize>(value: &T) -> Result<String> {
    match serde_json::to_value(value)? {
        serde_json::Value::String(token) => Ok(token),
        other => Err(DexError::InvalidInput(format!("无法作为文本列写入: {other}"))),
    }
}
