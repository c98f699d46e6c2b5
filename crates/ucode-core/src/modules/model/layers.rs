use crate::common::config::{ColumnMultiplier, ModelGrid};
use crate::common::constants::{LPF_GROUP_HK, LPF_GROUP_VANI, LPF_GROUP_VKCB};
use crate::domain::{ParameterTable, UcodeError, UcodeResult};
use crate::modules::serialization::format_fixed_f64;
use crate::numerics::linspace;
use faer::Mat;

/// LPF arrays, one `nrow x ncol` matrix per layer.
#[derive(Debug, Clone)]
pub struct LayerProperties {
    grid: ModelGrid,
    hk: Vec<Mat<f64>>,
    vka: Vec<Mat<f64>>,
    vkcb: Vec<Mat<f64>>,
}

impl LayerProperties {
    pub fn from_parameters(table: &ParameterTable, grid: ModelGrid) -> UcodeResult<Self> {
        if grid.nlay == 0 || grid.nrow == 0 || grid.ncol == 0 {
            return Err(UcodeError::input_validation(
                "INPUT.MODEL_GRID",
                format!(
                    "model grid needs positive dimensions, got nlay={} nrow={} ncol={}",
                    grid.nlay, grid.nrow, grid.ncol
                ),
            ));
        }

        let mut hk = Vec::with_capacity(grid.nlay);
        let mut vka = Vec::with_capacity(grid.nlay);
        let mut vkcb = Vec::with_capacity(grid.nlay);
        for layer in 1..=grid.nlay {
            hk.push(uniform_layer(&grid, layer_value(table, LPF_GROUP_HK, layer)?));
            vka.push(uniform_layer(&grid, layer_value(table, LPF_GROUP_VANI, layer)?));
            vkcb.push(uniform_layer(&grid, layer_value(table, LPF_GROUP_VKCB, layer)?));
        }

        Ok(Self {
            grid,
            hk,
            vka,
            vkcb,
        })
    }

    pub fn grid(&self) -> ModelGrid {
        self.grid
    }

    pub fn hk(&self, layer: usize) -> Option<&Mat<f64>> {
        layer.checked_sub(1).and_then(|index| self.hk.get(index))
    }

    pub fn vka(&self, layer: usize) -> Option<&Mat<f64>> {
        layer.checked_sub(1).and_then(|index| self.vka.get(index))
    }

    pub fn vkcb(&self, layer: usize) -> Option<&Mat<f64>> {
        layer.checked_sub(1).and_then(|index| self.vkcb.get(index))
    }

    /// Scales one layer of `hk` by a column gradient repeated down every row.
    pub fn apply_column_multiplier(&mut self, multiplier: &ColumnMultiplier) -> UcodeResult<()> {
        let index = multiplier
            .layer
            .checked_sub(1)
            .filter(|index| *index < self.grid.nlay)
            .ok_or_else(|| {
                UcodeError::input_validation(
                    "INPUT.MODEL_MULTIPLIER",
                    format!(
                        "multiplier layer {} is outside layers 1..={}",
                        multiplier.layer, self.grid.nlay
                    ),
                )
            })?;

        let factors = linspace(multiplier.start, multiplier.end, self.grid.ncol);
        let layer = &self.hk[index];
        let scaled = Mat::from_fn(self.grid.nrow, self.grid.ncol, |row, col| {
            layer[(row, col)] * factors[col]
        });
        self.hk[index] = scaled;
        Ok(())
    }
}

fn layer_value(table: &ParameterTable, group: &str, layer: usize) -> UcodeResult<f64> {
    let mut matches = table.iter().filter(|record| {
        record.group == group && record.layer.map(|value| value as usize) == Some(layer)
    });
    let first = matches.next().ok_or_else(|| {
        UcodeError::input_validation(
            "INPUT.MODEL_LAYER_PARAMETER",
            format!("no '{}' parameter for layer {}", group, layer),
        )
    })?;
    if let Some(second) = matches.next() {
        return Err(UcodeError::input_validation(
            "INPUT.MODEL_LAYER_PARAMETER",
            format!(
                "layer {} has more than one '{}' parameter ('{}' and '{}')",
                layer, group, first.name, second.name
            ),
        ));
    }
    Ok(first.start_value)
}

fn uniform_layer(grid: &ModelGrid, value: f64) -> Mat<f64> {
    Mat::from_fn(grid.nrow, grid.ncol, |_, _| value)
}

/// MODFLOW free-format array body, one model row per line.
pub fn render_external_array(array: &Mat<f64>) -> String {
    let mut out = String::new();
    for row in 0..array.nrows() {
        let line = (0..array.ncols())
            .map(|col| format_fixed_f64(array[(row, col)], 14, 6))
            .collect::<Vec<_>>()
            .join("");
        out.push_str(&line);
        out.push('\n');
    }
    out
}
