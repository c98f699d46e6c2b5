mod bounds;
mod facies;
mod parser;

pub use bounds::{assign_bounds, melt_zone_properties};
pub use facies::{LithologyLookup, regroup_by_facies};
pub use parser::{
    ZoneProperties, parse_parameter_table, parse_zone_table, read_parameter_table,
    read_zone_table,
};

use super::TaskExecutor;
use super::serialization::{format_table_value, write_task_artifact};
use super::table::FixedWidthTable;
use crate::common::config::ParameterConfig;
use crate::common::constants::PDATA_TABLE_LABEL;
use crate::domain::{
    ParameterTable, TaskArtifact, TaskRequest, UcodeError, UcodeResult, WorkflowTask,
};

pub const PDATA_COLUMN_LABELS: [&str; 8] = [
    "ParamName",
    "GroupName",
    "StartValue",
    "LowerValue",
    "UpperValue",
    "Constrain",
    "LowerConstraint",
    "UpperConstraint",
];

pub fn pdata_table(table: &ParameterTable) -> UcodeResult<FixedWidthTable> {
    let mut pdata = FixedWidthTable::new(PDATA_TABLE_LABEL, PDATA_COLUMN_LABELS);
    for record in table.iter() {
        let bounds = record.bounds;
        pdata.push_row([
            record.name.clone(),
            record.group.clone(),
            format_table_value(record.start_value),
            format_table_value(bounds.lower_value),
            format_table_value(bounds.upper_value),
            if bounds.constrain { "Yes" } else { "No" }.to_string(),
            format_table_value(bounds.lower_constraint),
            format_table_value(bounds.upper_constraint),
        ])?;
    }
    Ok(pdata)
}

/// Builds the bounded parameter table from the zone geology and writes the
/// `Parameter_Data` file, plus the facies-grouped variant when configured.
#[derive(Debug, Clone)]
pub struct PdataTask {
    config: ParameterConfig,
}

impl PdataTask {
    pub fn new(config: ParameterConfig) -> Self {
        Self { config }
    }

    pub fn build_table(
        &self,
        request: &TaskRequest,
    ) -> UcodeResult<(ParameterTable, Vec<ZoneProperties>)> {
        let zones = read_zone_table(&request.resolve(&self.config.zone_table))?;
        let mut table = melt_zone_properties(&zones)?;
        for extra in &self.config.extra_parameters {
            table.extend(read_parameter_table(&request.resolve(extra))?)?;
        }
        assign_bounds(&mut table)?;
        Ok((table, zones))
    }
}

impl TaskExecutor for PdataTask {
    fn execute(&self, request: &TaskRequest) -> UcodeResult<Vec<TaskArtifact>> {
        if request.task != WorkflowTask::Pdata {
            return Err(UcodeError::input_validation(
                "INPUT.PDATA_TASK",
                format!("PDATA task expects PDATA, got {}", request.task),
            ));
        }

        let (table, zones) = self.build_table(request)?;

        // Both tables render before either file is written.
        let mut outputs = vec![(self.config.output.clone(), pdata_table(&table)?.render())];
        if let Some(facies) = &self.config.facies {
            let lookup = LithologyLookup::from_zones(&zones);
            let regrouped = regroup_by_facies(&table, &lookup, facies)?;
            outputs.push((facies.output.clone(), pdata_table(&regrouped)?.render()));
        }

        let mut artifacts = Vec::with_capacity(outputs.len());
        for (output, rendered) in outputs {
            write_task_artifact(&request.resolve(&output), &rendered, "IO.PDATA_WRITE")?;
            artifacts.push(TaskArtifact::new(output));
        }

        tracing::info!(
            parameters = table.len(),
            artifacts = artifacts.len(),
            "prepared UCODE parameter data"
        );
        Ok(artifacts)
    }
}

#[cfg(test)]
mod tests {
    use super::{PdataTask, pdata_table};
    use crate::common::config::{FaciesConfig, ParameterConfig};
    use crate::domain::{ParameterRecord, ParameterTable, TaskRequest, WorkflowTask};
    use crate::modules::TaskExecutor;
    use crate::modules::table::parse_fixed_width_table;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn pdata_rows_carry_bounds_and_constraint_columns() {
        let table = ParameterTable::from_records(vec![ParameterRecord::new("k_rb", "riv", 1.2e-5)])
            .expect("table should build");
        let rendered = pdata_table(&table).expect("table should render").render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "BEGIN Parameter_Data Table");
        assert_eq!(lines[1], "NROW=1 NCOL=8 COLUMNLABELS");
        assert_eq!(
            lines[3].split_whitespace().collect::<Vec<_>>(),
            ["k_rb", "riv", "1.2e-05", "1e-38", "1e+38", "No", "1e-38", "1e+38"]
        );
        assert_eq!(lines[4], "END Parameter_Data Table");
    }

    #[test]
    fn execute_writes_plain_and_facies_pdata() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(
            temp.path().join("zones.csv"),
            "Zone,K_m_s,vani,Ss,Sy,Lithology\n1,5e-4,10,1e-5,0.2,Sand\n2,1e-6,100,2e-5,0.05,\n",
        )
        .expect("zone table should be written");
        fs::write(
            temp.path().join("recharge.csv"),
            "GroupName,ParamName,StartValue\nrch,rch_1,0.5\n",
        )
        .expect("recharge table should be written");

        let mut config = ParameterConfig::new("zones.csv");
        config.extra_parameters.push("recharge.csv".into());
        config.facies = Some(FaciesConfig::default());
        let request = TaskRequest::new(WorkflowTask::Pdata, temp.path());

        let artifacts = PdataTask::new(config)
            .execute(&request)
            .expect("pdata task should succeed");
        assert_eq!(artifacts.len(), 2);

        let pdata = parse_fixed_width_table(
            &fs::read_to_string(temp.path().join("pdata.dat")).expect("pdata should exist"),
        )
        .expect("pdata should re-parse");
        assert_eq!(pdata.rows().len(), 9);
        let name = pdata.column_index("ParamName").expect("ParamName column");
        let lower = pdata.column_index("LowerValue").expect("LowerValue column");
        let kx = pdata
            .rows()
            .iter()
            .find(|row| row[name] == "Kx_1")
            .expect("Kx_1 row");
        assert_eq!(kx[lower], "1e-07");
        let recharge = pdata
            .rows()
            .iter()
            .find(|row| row[name] == "rch_1")
            .expect("rch_1 row");
        assert_eq!(recharge[pdata.column_index("UpperValue").expect("UpperValue")], "2.0");

        let facies = parse_fixed_width_table(
            &fs::read_to_string(temp.path().join("pdata_facies.dat"))
                .expect("facies pdata should exist"),
        )
        .expect("facies pdata should re-parse");
        assert_eq!(facies.rows().len(), 4);
        let group = facies.column_index("GroupName").expect("GroupName column");
        assert!(facies.rows().iter().all(|row| row[group] == "tprogs"));
    }

    #[test]
    fn unwritable_facies_group_leaves_no_partial_output() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(
            temp.path().join("zones.csv"),
            "Zone,K_m_s,vani,Ss,Sy,Lithology\n1,5e-4,10,1e-5,0.2,Bay Mud\n",
        )
        .expect("zone table should be written");

        let mut config = ParameterConfig::new("zones.csv");
        config.facies = Some(FaciesConfig::default());
        let request = TaskRequest::new(WorkflowTask::Pdata, temp.path());

        let error = PdataTask::new(config)
            .execute(&request)
            .expect_err("group name with a space cannot be tabulated");
        assert_eq!(error.placeholder(), "INPUT.TABLE_FIELD");
        assert!(error.message().contains("Bay Mud"));
        assert!(!temp.path().join("pdata.dat").exists());
        assert!(!temp.path().join("pdata_facies.dat").exists());
    }

    #[test]
    fn execute_rejects_mismatched_task() {
        let request = TaskRequest::new(WorkflowTask::Model, "unused");
        let error = PdataTask::new(ParameterConfig::new("zones.csv"))
            .execute(&request)
            .expect_err("wrong task should be rejected");
        assert_eq!(error.placeholder(), "INPUT.PDATA_TASK");
    }

    #[test]
    fn missing_zone_table_reports_the_path() {
        let temp = TempDir::new().expect("tempdir should be created");
        let request = TaskRequest::new(WorkflowTask::Pdata, temp.path());
        let error = PdataTask::new(ParameterConfig::new("absent_zones.csv"))
            .execute(&request)
            .expect_err("missing input should fail");
        assert_eq!(error.placeholder(), "IO.ZONE_TABLE_READ");
        assert!(error.message().contains("absent_zones.csv"));
    }
}
