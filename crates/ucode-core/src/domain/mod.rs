pub mod errors;

pub use errors::{
    ParserResult, TaskResult, UcodeError, UcodeErrorCategory, UcodeResult,
};

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_LOWER_VALUE: f64 = 1.0e-38;
pub const DEFAULT_UPPER_VALUE: f64 = 1.0e38;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowTask {
    Pdata,
    Observations,
    Parallel,
    Model,
}

impl WorkflowTask {
    /// Order used when every configured task runs in one invocation.
    pub const ALL: [Self; 4] = [Self::Pdata, Self::Observations, Self::Parallel, Self::Model];

    /// `ALL`, except that observations move after the model when the
    /// simulator runs, since that run rewrites the head-observation output.
    pub const fn workflow_order(run_simulator: bool) -> [Self; 4] {
        if run_simulator {
            [Self::Pdata, Self::Parallel, Self::Model, Self::Observations]
        } else {
            Self::ALL
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdata => "PDATA",
            Self::Observations => "OBSERVATIONS",
            Self::Parallel => "PARALLEL",
            Self::Model => "MODEL",
        }
    }
}

impl Display for WorkflowTask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    pub task: WorkflowTask,
    pub workspace: PathBuf,
}

impl TaskRequest {
    pub fn new(task: WorkflowTask, workspace: impl Into<PathBuf>) -> Self {
        Self {
            task,
            workspace: workspace.into(),
        }
    }

    /// Relative paths are anchored at the model workspace.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace.join(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskArtifact {
    pub relative_path: PathBuf,
}

impl TaskArtifact {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBounds {
    pub lower_value: f64,
    pub upper_value: f64,
    pub constrain: bool,
    pub lower_constraint: f64,
    pub upper_constraint: f64,
}

impl ParameterBounds {
    /// Bounds whose constraint columns mirror the value range, unconstrained.
    pub fn with_range(lower_value: f64, upper_value: f64) -> Self {
        Self {
            lower_value,
            upper_value,
            constrain: false,
            lower_constraint: lower_value,
            upper_constraint: upper_value,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lower_value <= value && value <= self.upper_value
    }
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self::with_range(DEFAULT_LOWER_VALUE, DEFAULT_UPPER_VALUE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRecord {
    pub name: String,
    pub group: String,
    pub start_value: f64,
    pub layer: Option<u32>,
    pub zone: Option<u32>,
    pub bounds: ParameterBounds,
}

impl ParameterRecord {
    pub fn new(name: impl Into<String>, group: impl Into<String>, start_value: f64) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            start_value,
            layer: None,
            zone: None,
            bounds: ParameterBounds::default(),
        }
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn with_zone(mut self, zone: u32) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Zone recorded at melt time, else the numeric suffix of `Kx_12`-style names.
    pub fn zone_index(&self) -> Option<u32> {
        self.zone.or_else(|| {
            self.name
                .rsplit_once('_')
                .and_then(|(_, suffix)| suffix.parse::<u32>().ok())
        })
    }
}

/// Ordered parameter rows with unique `ParamName` values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterTable {
    records: Vec<ParameterRecord>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<ParameterRecord>) -> UcodeResult<Self> {
        let mut table = Self::new();
        for record in records {
            table.push(record)?;
        }
        Ok(table)
    }

    pub fn push(&mut self, record: ParameterRecord) -> UcodeResult<()> {
        if record.name.trim().is_empty() {
            return Err(UcodeError::input_validation(
                "INPUT.PARAM_NAME",
                format!(
                    "parameter in group '{}' has an empty ParamName",
                    record.group
                ),
            ));
        }
        if self.find(&record.name).is_some() {
            return Err(UcodeError::input_validation(
                "INPUT.PARAM_DUPLICATE",
                format!("duplicate ParamName '{}'", record.name),
            ));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn extend(&mut self, other: ParameterTable) -> UcodeResult<()> {
        for record in other.records {
            self.push(record)?;
        }
        Ok(())
    }

    pub fn records(&self) -> &[ParameterRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [ParameterRecord] {
        &mut self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParameterRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&ParameterRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    pub fn start_value(&self, name: &str) -> UcodeResult<f64> {
        self.find(name)
            .map(|record| record.start_value)
            .ok_or_else(|| {
                UcodeError::input_validation(
                    "INPUT.PARAM_LOOKUP",
                    format!("parameter '{}' is missing from the parameter table", name),
                )
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    pub name: String,
    pub observed_value: f64,
    pub group: String,
    pub simulated_value: Option<f64>,
    pub statistic: Option<f64>,
    pub stat_flag: Option<String>,
}

impl ObservationRecord {
    pub fn new(name: impl Into<String>, observed_value: f64, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observed_value,
            group: group.into(),
            simulated_value: None,
            statistic: None,
            stat_flag: None,
        }
    }
}

/// Head observations in output order; names are unique so the `.jif`
/// index and the `.dat` table stay one-to-one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationTable {
    records: Vec<ObservationRecord>,
}

impl ObservationTable {
    pub fn from_records(records: Vec<ObservationRecord>) -> UcodeResult<Self> {
        let mut seen = BTreeSet::new();
        for record in &records {
            if record.name.trim().is_empty() {
                return Err(UcodeError::input_validation(
                    "INPUT.OBS_NAME",
                    "observation with an empty name",
                ));
            }
            if record.name.chars().any(char::is_whitespace) {
                return Err(UcodeError::input_validation(
                    "INPUT.OBS_NAME",
                    format!("observation name '{}' contains whitespace", record.name),
                ));
            }
            if !seen.insert(record.name.as_str()) {
                return Err(UcodeError::input_validation(
                    "INPUT.OBS_DUPLICATE",
                    format!("duplicate observation name '{}'", record.name),
                ));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [ObservationRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerDescriptor {
    pub name: String,
    pub directory: String,
    pub run_time: f64,
}
