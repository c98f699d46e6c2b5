use crate::domain::{ParameterRecord, ParameterTable, ParserResult, UcodeError};
use crate::modules::serialization::read_task_input;
use serde::Deserialize;
use std::path::Path;

/// One row of the wide geology table: a zone and its four hydraulic
/// properties, plus the lithology used for facies grouping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneProperties {
    #[serde(rename = "Zone", alias = "zone")]
    pub zone: u32,
    #[serde(rename = "Kx", alias = "K_m_s")]
    pub kx: f64,
    pub vani: f64,
    #[serde(rename = "Ss")]
    pub ss: f64,
    #[serde(rename = "Sy")]
    pub sy: f64,
    #[serde(rename = "Lithology", alias = "lithology", default)]
    pub lithology: Option<String>,
}

impl ZoneProperties {
    pub fn property(&self, group: &str) -> Option<f64> {
        match group {
            "Kx" => Some(self.kx),
            "vani" => Some(self.vani),
            "Ss" => Some(self.ss),
            "Sy" => Some(self.sy),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ParameterRow {
    #[serde(default)]
    layer: Option<u32>,
    #[serde(rename = "GroupName")]
    group_name: String,
    #[serde(rename = "ParamName")]
    param_name: String,
    #[serde(rename = "StartValue")]
    start_value: f64,
}

pub fn read_zone_table(path: &Path) -> ParserResult<Vec<ZoneProperties>> {
    let source = read_task_input(path, "IO.ZONE_TABLE_READ")?;
    parse_zone_table(&source, &path.display().to_string())
}

pub fn parse_zone_table(source: &str, origin: &str) -> ParserResult<Vec<ZoneProperties>> {
    let mut reader = csv_reader(source);
    let mut zones = Vec::new();
    for (index, row) in reader.deserialize::<ZoneProperties>().enumerate() {
        let mut zone = row.map_err(|source| csv_error("INPUT.ZONE_TABLE", origin, index, source))?;
        zone.lithology = zone
            .lithology
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());
        zones.push(zone);
    }

    if zones.is_empty() {
        return Err(UcodeError::input_validation(
            "INPUT.ZONE_TABLE",
            format!("zone table '{}' has no rows", origin),
        ));
    }
    tracing::debug!(origin, zones = zones.len(), "parsed zone table");
    Ok(zones)
}

pub fn read_parameter_table(path: &Path) -> ParserResult<ParameterTable> {
    let source = read_task_input(path, "IO.PARAMETER_TABLE_READ")?;
    parse_parameter_table(&source, &path.display().to_string())
}

/// Long-form parameters: `layer` (optional), `GroupName`, `ParamName`,
/// `StartValue`. Extra columns are ignored.
pub fn parse_parameter_table(source: &str, origin: &str) -> ParserResult<ParameterTable> {
    let mut reader = csv_reader(source);
    let mut table = ParameterTable::new();
    for (index, row) in reader.deserialize::<ParameterRow>().enumerate() {
        let row = row.map_err(|source| csv_error("INPUT.PARAMETER_TABLE", origin, index, source))?;
        let mut record = ParameterRecord::new(
            row.param_name.trim(),
            row.group_name.trim(),
            row.start_value,
        );
        record.layer = row.layer;
        table.push(record).map_err(|error| error.in_file(origin))?;
    }
    tracing::debug!(origin, parameters = table.len(), "parsed parameter table");
    Ok(table)
}

fn csv_reader(source: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source.as_bytes())
}

fn csv_error(
    placeholder: &'static str,
    origin: &str,
    index: usize,
    source: csv::Error,
) -> UcodeError {
    UcodeError::input_validation(
        placeholder,
        format!("malformed record {} in '{}': {}", index + 1, origin, source),
    )
}
