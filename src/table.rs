use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use bytes_probe::{RawKind, probe};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::{Field, Row};
use parquet::schema::types::Type;
use serde::{Deserialize, Deserializer, Serialize};

/// One offensive play as read from the play-by-play feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub posteam: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub play_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub game_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub week: i64,
    #[serde(default)]
    pub epa: Option<f64>,
}

impl PlayRecord {
    pub fn new(posteam: &str, play_type: &str, game_id: &str, week: i64, epa: f64) -> Self {
        Self {
            posteam: posteam.to_string(),
            play_type: play_type.to_string(),
            game_id: game_id.to_string(),
            week,
            epa: Some(epa),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub team: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub report_status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub full_name: String,
}

impl InjuryRecord {
    pub fn new(team: &str, position: &str, report_status: &str, full_name: &str) -> Self {
        Self {
            team: team.to_string(),
            position: position.to_string(),
            report_status: report_status.to_string(),
            full_name: full_name.to_string(),
        }
    }
}

// Feed exports carry nulls for columns that do not apply to a row.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub const PLAY_COLUMNS: [&str; 5] = ["posteam", "play_type", "game_id", "week", "epa"];
pub const INJURY_COLUMNS: [&str; 4] = ["team", "position", "report_status", "full_name"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayTable {
    pub rows: Vec<PlayRecord>,
}

impl PlayTable {
    pub fn new(rows: Vec<PlayRecord>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn append(&mut self, other: PlayTable) {
        self.rows.extend(other.rows);
    }
}

/// Injury report rows. An empty table is a valid state (feed offline).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InjuryTable {
    pub rows: Vec<InjuryRecord>,
}

impl InjuryTable {
    pub fn new(rows: Vec<InjuryRecord>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn append(&mut self, other: InjuryTable) {
        self.rows.extend(other.rows);
    }
}

/// Decodes a raw provider payload into a `PlayTable`, whatever shape it arrived in.
pub fn plays_from_bytes(bytes: &[u8]) -> Result<PlayTable> {
    match probe(bytes) {
        RawKind::Parquet => {
            let rows = read_parquet_rows(bytes, &PLAY_COLUMNS, |row| {
                let mut rec = PlayRecord {
                    posteam: String::new(),
                    play_type: String::new(),
                    game_id: String::new(),
                    week: 0,
                    epa: None,
                };
                for (name, field) in row.get_column_iter() {
                    match name.as_str() {
                        "posteam" => rec.posteam = field_str(field),
                        "play_type" => rec.play_type = field_str(field),
                        "game_id" => rec.game_id = field_str(field),
                        "week" => rec.week = field_num(field).map(|w| w as i64).unwrap_or(0),
                        "epa" => rec.epa = field_num(field),
                        _ => {}
                    }
                }
                rec
            })?;
            Ok(PlayTable::new(rows))
        }
        RawKind::JsonRecords => {
            let rows: Vec<PlayRecord> =
                serde_json::from_slice(bytes).context("decode play-by-play json records")?;
            Ok(PlayTable::new(rows))
        }
        RawKind::Unknown => Err(anyhow!(
            "unrecognized play-by-play payload ({} bytes)",
            bytes.len()
        )),
    }
}

pub fn injuries_from_bytes(bytes: &[u8]) -> Result<InjuryTable> {
    match probe(bytes) {
        RawKind::Parquet => {
            let rows = read_parquet_rows(bytes, &INJURY_COLUMNS, |row| {
                let mut rec = InjuryRecord::new("", "", "", "");
                for (name, field) in row.get_column_iter() {
                    match name.as_str() {
                        "team" => rec.team = field_str(field),
                        "position" => rec.position = field_str(field),
                        "report_status" => rec.report_status = field_str(field),
                        "full_name" => rec.full_name = field_str(field),
                        _ => {}
                    }
                }
                rec
            })?;
            Ok(InjuryTable::new(rows))
        }
        RawKind::JsonRecords => {
            let rows: Vec<InjuryRecord> =
                serde_json::from_slice(bytes).context("decode injury json records")?;
            Ok(InjuryTable::new(rows))
        }
        RawKind::Unknown => Err(anyhow!(
            "unrecognized injury payload ({} bytes)",
            bytes.len()
        )),
    }
}

pub fn plays_from_file(path: &Path) -> Result<PlayTable> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    plays_from_bytes(&bytes).with_context(|| format!("decode {}", path.display()))
}

pub fn injuries_from_file(path: &Path) -> Result<InjuryTable> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    injuries_from_bytes(&bytes).with_context(|| format!("decode {}", path.display()))
}

/// Reads only the `required` columns. Any row that fails to decode fails the
/// whole load so a rating is never computed over a silently partial table.
fn read_parquet_rows<T>(
    raw: &[u8],
    required: &[&str],
    map: impl Fn(&Row) -> T,
) -> Result<Vec<T>> {
    let data = bytes::Bytes::copy_from_slice(raw);
    let reader = SerializedFileReader::new(data).context("open parquet reader")?;
    let root = reader.metadata().file_metadata().schema_descr().root_schema();
    let fields: Vec<_> = root
        .get_fields()
        .iter()
        .filter(|f| required.contains(&f.name()))
        .cloned()
        .collect();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|c| !fields.iter().any(|f| f.name() == *c))
        .collect();
    if !missing.is_empty() {
        return Err(anyhow!("parquet file is missing columns {missing:?}"));
    }
    let projection = Type::group_type_builder(root.name())
        .with_fields(fields)
        .build()
        .context("build parquet column projection")?;
    let iter = reader
        .get_row_iter(Some(projection))
        .context("iterate parquet rows")?;

    let expected = reader.metadata().file_metadata().num_rows().max(0) as usize;
    let mut out = Vec::with_capacity(expected);
    for (idx, row) in iter.enumerate() {
        let row = row.with_context(|| format!("decode parquet row {idx}"))?;
        out.push(map(&row));
    }
    Ok(out)
}

fn field_str(field: &Field) -> String {
    match field {
        Field::Str(s) => s.clone(),
        Field::Null => String::new(),
        other => other.to_string(),
    }
}

fn field_num(field: &Field) -> Option<f64> {
    match field {
        Field::Double(v) => Some(*v),
        Field::Float(v) => Some(*v as f64),
        Field::Long(v) => Some(*v as f64),
        Field::Int(v) => Some(*v as f64),
        Field::Short(v) => Some(*v as f64),
        Field::Byte(v) => Some(*v as f64),
        Field::UInt(v) => Some(*v as f64),
        Field::ULong(v) => Some(*v as f64),
        Field::Str(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite())
}

mod bytes_probe {
    const PARQUET_MAGIC: &[u8] = b"PAR1";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RawKind {
        Parquet,
        JsonRecords,
        Unknown,
    }

    pub fn probe(bytes: &[u8]) -> RawKind {
        if bytes.len() >= 8 && bytes.starts_with(PARQUET_MAGIC) && bytes.ends_with(PARQUET_MAGIC)
        {
            return RawKind::Parquet;
        }
        let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
        match first {
            Some(b'[') => RawKind::JsonRecords,
            _ => RawKind::Unknown,
        }
    }
}
