use crate::common::config::BoundaryGeometry;
use crate::domain::{ParameterTable, UcodeError, UcodeResult};
use crate::numerics::conductance;
use serde::Serialize;

/// Lumped conductance of a river or GHB reach, repeated for every stress period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryConductance {
    pub parameter: String,
    pub hydraulic_conductivity: f64,
    pub conductance: f64,
    pub periods: Vec<f64>,
}

impl BoundaryConductance {
    pub fn from_parameters(
        table: &ParameterTable,
        geometry: &BoundaryGeometry,
        stress_periods: usize,
    ) -> UcodeResult<Self> {
        if !(geometry.thickness.is_finite() && geometry.thickness > 0.0) {
            return Err(UcodeError::input_validation(
                "INPUT.MODEL_BOUNDARY",
                format!(
                    "boundary '{}' needs a positive thickness, got {}",
                    geometry.parameter, geometry.thickness
                ),
            ));
        }
        if stress_periods == 0 {
            return Err(UcodeError::input_validation(
                "INPUT.MODEL_GRID",
                "model grid needs at least one stress period",
            ));
        }

        let hydraulic_conductivity = table.start_value(&geometry.parameter)?;
        let value = conductance(
            hydraulic_conductivity,
            geometry.length,
            geometry.width,
            geometry.thickness,
        );
        tracing::debug!(
            parameter = %geometry.parameter,
            conductance = value,
            stress_periods,
            "computed boundary conductance"
        );

        Ok(Self {
            parameter: geometry.parameter.clone(),
            hydraulic_conductivity,
            conductance: value,
            periods: vec![value; stress_periods],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::BoundaryConductance;
    use crate::common::config::BoundaryGeometry;
    use crate::domain::{ParameterRecord, ParameterTable};

    fn table() -> ParameterTable {
        ParameterTable::from_records(vec![
            ParameterRecord::new("k_rb", "riv", 1.0e-5),
            ParameterRecord::new("hk_hillside", "GHB", 2.0e-6),
        ])
        .expect("table should build")
    }

    #[test]
    fn river_conductance_uses_reach_geometry() {
        let geometry = BoundaryGeometry {
            parameter: "k_rb".to_string(),
            length: 1000.0,
            width: 10.0,
            thickness: 10.0,
        };
        let river = BoundaryConductance::from_parameters(&table(), &geometry, 3)
            .expect("conductance should compute");
        assert!((river.conductance - 1.0e-2).abs() < 1.0e-15);
        assert_eq!(river.periods.len(), 3);
        assert!(river.periods.iter().all(|value| *value == river.conductance));
    }

    #[test]
    fn ghb_conductance_uses_hillside_geometry() {
        let geometry = BoundaryGeometry {
            parameter: "hk_hillside".to_string(),
            length: 1000.0,
            width: 50.0,
            thickness: 1000.0,
        };
        let ghb = BoundaryConductance::from_parameters(&table(), &geometry, 1)
            .expect("conductance should compute");
        assert!((ghb.conductance - 1.0e-4).abs() < 1.0e-18);
    }

    #[test]
    fn missing_parameter_and_bad_geometry_are_rejected() {
        let mut geometry = BoundaryGeometry {
            parameter: "k_missing".to_string(),
            length: 1.0,
            width: 1.0,
            thickness: 1.0,
        };
        let error = BoundaryConductance::from_parameters(&table(), &geometry, 1)
            .expect_err("parameter is missing");
        assert_eq!(error.placeholder(), "INPUT.PARAM_LOOKUP");

        geometry.parameter = "k_rb".to_string();
        geometry.thickness = 0.0;
        let error = BoundaryConductance::from_parameters(&table(), &geometry, 1)
            .expect_err("zero thickness");
        assert_eq!(error.placeholder(), "INPUT.MODEL_BOUNDARY");
    }
}
