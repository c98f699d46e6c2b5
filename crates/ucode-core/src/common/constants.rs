//! Group names, file names and scaling factors shared by the workflow tasks.

pub const GROUP_KX: &str = "Kx";
pub const GROUP_VANI: &str = "vani";
pub const GROUP_SS: &str = "Ss";
pub const GROUP_SY: &str = "Sy";
pub const GROUP_GHB: &str = "GHB";

/// Melt order for the wide zone-property table.
pub const ZONE_PROPERTY_GROUPS: [&str; 4] = [GROUP_KX, GROUP_VANI, GROUP_SS, GROUP_SY];

/// Groups bounded three orders of magnitude either side of the start value.
pub const DECADE_SCALED_GROUPS: [&str; 4] = [GROUP_KX, GROUP_SS, GROUP_VANI, GROUP_GHB];
pub const DECADE_SCALED_LOWER_EXPONENT: i32 = -3;
pub const DECADE_SCALED_UPPER_EXPONENT: i32 = 3;

pub const SPECIFIC_YIELD_LOWER_EXPONENT: i32 = -2;
pub const SPECIFIC_YIELD_UPPER_VALUE: f64 = 1.0;

pub const RECHARGE_NAME_MARKER: &str = "rch_";
pub const RECHARGE_LOWER_EXPONENT: i32 = -3;
pub const RECHARGE_UPPER_VALUE: f64 = 2.0;

pub const FACIES_UMBRELLA_GROUP: &str = "tprogs";
pub const FACIES_UMBRELLA_LITHOLOGIES: [&str; 4] = ["Gravel", "Sand", "Sandy Mud", "Mud"];

pub const PDATA_TABLE_LABEL: &str = "Parameter_Data";
pub const OBSERVATION_TABLE_LABEL: &str = "Observation_Data";
pub const RUNNER_TABLE_LABEL: &str = "Parallel_Runners";

pub const DEFAULT_PDATA_FILE: &str = "pdata.dat";
pub const DEFAULT_FACIES_PDATA_FILE: &str = "pdata_facies.dat";
pub const DEFAULT_HOB_OUTPUT_FILE: &str = "MF.hob.out";
pub const DEFAULT_JIF_FILE: &str = "MF.hob.out.jif";
pub const DEFAULT_OBSERVATION_DATA_FILE: &str = "hob_obs_table.dat";
pub const DEFAULT_OBSERVATION_GROUP: &str = "Heads";
pub const DEFAULT_RUNNER_BATCH_FILE: &str = "00_runner_all_ucode.bat";
pub const DEFAULT_RUNNER_TABLE_FILE: &str = "00_runner_all_ucode_table.txt";
pub const DEFAULT_EXPECTED_RUNTIME: f64 = 600.0;
pub const DEFAULT_MODEL_SUMMARY_FILE: &str = "model_packages.json";

pub const LPF_GROUP_HK: &str = "hk";
pub const LPF_GROUP_VANI: &str = "vani";
pub const LPF_GROUP_VKCB: &str = "vkcb";
pub const LPF_IPAKCB: i32 = 53;

pub const RIVER_CONDUCTIVITY_PARAMETER: &str = "k_rb";
pub const GHB_CONDUCTIVITY_PARAMETER: &str = "hk_hillside";
