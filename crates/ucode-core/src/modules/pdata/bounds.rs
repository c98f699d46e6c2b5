use super::parser::ZoneProperties;
use crate::common::constants::{
    DECADE_SCALED_GROUPS, DECADE_SCALED_LOWER_EXPONENT, DECADE_SCALED_UPPER_EXPONENT, GROUP_SY,
    RECHARGE_LOWER_EXPONENT, RECHARGE_NAME_MARKER, RECHARGE_UPPER_VALUE,
    SPECIFIC_YIELD_LOWER_EXPONENT, SPECIFIC_YIELD_UPPER_VALUE, ZONE_PROPERTY_GROUPS,
};
use crate::domain::{ParameterBounds, ParameterRecord, ParameterTable, UcodeError, UcodeResult};
use crate::numerics::{decade_exponent, power_of_ten};

#[derive(Debug, Clone, Copy, PartialEq)]
enum UpperBound {
    Decades(i32),
    Fixed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ScalingRule {
    lower_exponent: i32,
    upper: UpperBound,
}

/// Wide to long: every property column becomes one row per zone, property
/// by property, named `<property>_<zone>`.
pub fn melt_zone_properties(zones: &[ZoneProperties]) -> UcodeResult<ParameterTable> {
    let mut table = ParameterTable::new();
    for group in ZONE_PROPERTY_GROUPS {
        for zone in zones {
            let value = zone.property(group).ok_or_else(|| {
                UcodeError::internal(
                    "SYS.PDATA_MELT",
                    format!("zone property '{}' has no column mapping", group),
                )
            })?;
            table.push(
                ParameterRecord::new(format!("{}_{}", group, zone.zone), group, value)
                    .with_zone(zone.zone),
            )?;
        }
    }
    Ok(table)
}

/// Resets every row to the wide default range, then narrows the rows a
/// scaling rule applies to around the decade of their start value.
pub fn assign_bounds(table: &mut ParameterTable) -> UcodeResult<()> {
    let mut scaled = 0usize;
    for record in table.records_mut() {
        record.bounds = match scaling_rule(record) {
            Some(rule) => {
                scaled += 1;
                scaled_bounds(record, rule)?
            }
            None => ParameterBounds::default(),
        };
    }
    tracing::debug!(parameters = table.len(), scaled, "assigned parameter bounds");
    Ok(())
}

fn scaling_rule(record: &ParameterRecord) -> Option<ScalingRule> {
    if record.name.contains(RECHARGE_NAME_MARKER) {
        return Some(ScalingRule {
            lower_exponent: RECHARGE_LOWER_EXPONENT,
            upper: UpperBound::Fixed(RECHARGE_UPPER_VALUE),
        });
    }
    if record.group == GROUP_SY {
        return Some(ScalingRule {
            lower_exponent: SPECIFIC_YIELD_LOWER_EXPONENT,
            upper: UpperBound::Fixed(SPECIFIC_YIELD_UPPER_VALUE),
        });
    }
    DECADE_SCALED_GROUPS
        .contains(&record.group.as_str())
        .then_some(ScalingRule {
            lower_exponent: DECADE_SCALED_LOWER_EXPONENT,
            upper: UpperBound::Decades(DECADE_SCALED_UPPER_EXPONENT),
        })
}

fn scaled_bounds(record: &ParameterRecord, rule: ScalingRule) -> UcodeResult<ParameterBounds> {
    let exponent = decade_exponent(record.start_value).ok_or_else(|| {
        UcodeError::input_validation(
            "INPUT.PDATA_START_VALUE",
            format!(
                "parameter '{}' in group '{}' needs a positive start value for magnitude scaling, got {}",
                record.name, record.group, record.start_value
            ),
        )
    })?;

    let lower = power_of_ten(exponent + rule.lower_exponent);
    let upper = match rule.upper {
        UpperBound::Decades(offset) => power_of_ten(exponent + offset),
        UpperBound::Fixed(cap) => cap,
    };

    if record.start_value > upper {
        return Err(UcodeError::input_validation(
            "INPUT.PDATA_START_VALUE",
            format!(
                "parameter '{}' start value {} exceeds its upper bound {}",
                record.name, record.start_value, upper
            ),
        ));
    }
    Ok(ParameterBounds::with_range(lower, upper))
}
