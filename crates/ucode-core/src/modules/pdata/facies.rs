use super::parser::ZoneProperties;
use crate::common::config::{FaciesConfig, UnmatchedZonePolicy};
use crate::common::constants::ZONE_PROPERTY_GROUPS;
use crate::domain::{ParameterRecord, ParameterTable, UcodeError, UcodeResult};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LithologyLookup {
    by_zone: BTreeMap<u32, String>,
}

impl LithologyLookup {
    pub fn from_zones(zones: &[ZoneProperties]) -> Self {
        let by_zone = zones
            .iter()
            .filter_map(|zone| {
                zone.lithology
                    .as_ref()
                    .map(|lithology| (zone.zone, lithology.clone()))
            })
            .collect();
        Self { by_zone }
    }

    pub fn insert(&mut self, zone: u32, lithology: impl Into<String>) {
        self.by_zone.insert(zone, lithology.into());
    }

    pub fn get(&self, zone: u32) -> Option<&str> {
        self.by_zone.get(&zone).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_zone.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_zone.is_empty()
    }
}

/// Zone-property rows regrouped by lithology. Lithologies in the umbrella
/// set share one group; rows without a lithology follow `unmatched_zones`.
pub fn regroup_by_facies(
    table: &ParameterTable,
    lookup: &LithologyLookup,
    config: &FaciesConfig,
) -> UcodeResult<ParameterTable> {
    let mut regrouped = ParameterTable::new();
    let mut dropped = Vec::new();

    for record in table
        .iter()
        .filter(|record| ZONE_PROPERTY_GROUPS.contains(&record.group.as_str()))
    {
        let lithology = record.zone_index().and_then(|zone| lookup.get(zone));
        let Some(lithology) = lithology else {
            match config.unmatched_zones {
                UnmatchedZonePolicy::Exclude => {
                    dropped.push(record.name.as_str());
                    continue;
                }
                UnmatchedZonePolicy::Fail => {
                    return Err(UcodeError::input_validation(
                        "INPUT.FACIES_ZONE",
                        format!(
                            "parameter '{}' has no lithology for zone {}",
                            record.name,
                            record
                                .zone_index()
                                .map_or_else(|| "?".to_string(), |zone| zone.to_string())
                        ),
                    ));
                }
            }
        };

        let group = if config
            .umbrella_lithologies
            .iter()
            .any(|name| name == lithology)
        {
            config.umbrella_group.clone()
        } else {
            lithology.to_string()
        };

        regrouped.push(ParameterRecord {
            group,
            ..record.clone()
        })?;
    }

    if !dropped.is_empty() {
        tracing::warn!(
            dropped = dropped.len(),
            parameters = %dropped.join(","),
            "excluded parameters whose zone has no lithology"
        );
    }
    Ok(regrouped)
}

#[cfg(test)]
mod tests {
    use super::{LithologyLookup, regroup_by_facies};
    use crate::common::config::{FaciesConfig, UnmatchedZonePolicy};
    use crate::domain::{ParameterRecord, ParameterTable};
    use crate::modules::pdata::bounds::melt_zone_properties;
    use crate::modules::pdata::parser::ZoneProperties;

    fn zones() -> Vec<ZoneProperties> {
        [
            (1, Some("Gravel")),
            (2, Some("Mud")),
            (3, Some("Laguna")),
            (4, None),
        ]
        .into_iter()
        .map(|(zone, lithology)| ZoneProperties {
            zone,
            kx: 1.0e-4,
            vani: 10.0,
            ss: 1.0e-5,
            sy: 0.1,
            lithology: lithology.map(str::to_string),
        })
        .collect()
    }

    #[test]
    fn umbrella_lithologies_collapse_and_others_keep_their_name() {
        let zones = zones();
        let mut table = melt_zone_properties(&zones).expect("melt should succeed");
        table
            .push(ParameterRecord::new("rch_1", "rch", 0.5))
            .expect("recharge row should be accepted");
        let lookup = LithologyLookup::from_zones(&zones);

        let regrouped = regroup_by_facies(&table, &lookup, &FaciesConfig::default())
            .expect("regroup should succeed");

        assert_eq!(regrouped.len(), 12);
        assert_eq!(regrouped.find("Kx_1").expect("Kx_1").group, "tprogs");
        assert_eq!(regrouped.find("Sy_2").expect("Sy_2").group, "tprogs");
        assert_eq!(regrouped.find("vani_3").expect("vani_3").group, "Laguna");
        assert!(regrouped.find("Kx_4").is_none());
        assert!(regrouped.find("rch_1").is_none());
        for record in regrouped.iter() {
            assert!(record.group == "tprogs" || record.group == "Laguna");
        }
    }

    #[test]
    fn fail_policy_turns_missing_lithology_into_an_error() {
        let zones = zones();
        let table = melt_zone_properties(&zones).expect("melt should succeed");
        let lookup = LithologyLookup::from_zones(&zones);
        let config = FaciesConfig {
            unmatched_zones: UnmatchedZonePolicy::Fail,
            ..FaciesConfig::default()
        };

        let error = regroup_by_facies(&table, &lookup, &config)
            .expect_err("zone 4 has no lithology");
        assert_eq!(error.placeholder(), "INPUT.FACIES_ZONE");
        assert!(error.message().contains("Kx_4"));
    }

    #[test]
    fn zones_resolve_from_multi_digit_name_suffixes() {
        let table = ParameterTable::from_records(vec![ParameterRecord::new("Kx_12", "Kx", 1.0e-3)])
            .expect("table should build");
        let mut lookup = LithologyLookup::default();
        lookup.insert(1, "Gravel");
        lookup.insert(12, "Bedrock");

        let regrouped = regroup_by_facies(&table, &lookup, &FaciesConfig::default())
            .expect("regroup should succeed");
        assert_eq!(regrouped.records()[0].group, "Bedrock");
    }

    #[test]
    fn bounds_survive_regrouping() {
        let zones = zones();
        let mut table = melt_zone_properties(&zones).expect("melt should succeed");
        crate::modules::pdata::bounds::assign_bounds(&mut table).expect("bounds should assign");
        let lookup = LithologyLookup::from_zones(&zones);

        let regrouped = regroup_by_facies(&table, &lookup, &FaciesConfig::default())
            .expect("regroup should succeed");
        let before = table.find("Kx_1").expect("Kx_1").bounds;
        let after = regrouped.find("Kx_1").expect("Kx_1").bounds;
        assert_eq!(before, after);
        assert_eq!(lookup.len(), 3);
    }
}
