use crate::domain::{ObservationRecord, ObservationTable, ParserResult, UcodeError};

const COLUMN_SIMULATED: &str = "SIMULATED EQUIVALENT";
const COLUMN_OBSERVED: &str = "OBSERVED VALUE";
const COLUMN_NAME: &str = "OBSERVATION NAME";
const COLUMN_STATISTIC: &str = "STATISTIC";
const COLUMN_STAT_FLAG: &str = "STATFLAG";

#[derive(Debug, Clone, Copy)]
struct HobColumns {
    name: usize,
    observed: usize,
    simulated: Option<usize>,
    statistic: Option<usize>,
    stat_flag: Option<usize>,
    count: usize,
}

/// Reads a HOB output listing: a header of (optionally quoted) column
/// names followed by one whitespace-separated row per observation.
pub fn parse_hob_output(source: &str, group: &str) -> ParserResult<ObservationTable> {
    let mut lines = source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines.next().ok_or_else(|| {
        UcodeError::input_validation("INPUT.HOB_HEADER", "HOB output is empty")
    })?;
    let columns = resolve_columns(&tokenize_header(header)?)?;

    let mut records = Vec::new();
    for (index, line) in lines {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != columns.count {
            return Err(UcodeError::input_validation(
                "INPUT.HOB_ROW",
                format!(
                    "line {}: expected {} fields, found {}",
                    index + 1,
                    columns.count,
                    fields.len()
                ),
            ));
        }

        let mut record = ObservationRecord::new(
            fields[columns.name],
            parse_number(fields[columns.observed], index, COLUMN_OBSERVED)?,
            group,
        );
        if let Some(column) = columns.simulated {
            record.simulated_value = Some(parse_number(fields[column], index, COLUMN_SIMULATED)?);
        }
        if let Some(column) = columns.statistic {
            record.statistic = Some(parse_number(fields[column], index, COLUMN_STATISTIC)?);
        }
        if let Some(column) = columns.stat_flag {
            record.stat_flag = Some(fields[column].to_string());
        }
        records.push(record);
    }

    ObservationTable::from_records(records)
}

fn tokenize_header(header: &str) -> ParserResult<Vec<String>> {
    let mut tokens = Vec::new();
    let mut chars = header.trim().chars().peekable();
    while let Some(&next) = chars.peek() {
        if next.is_whitespace() {
            chars.next();
            continue;
        }
        if next == '"' {
            chars.next();
            let mut token = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '"' {
                    closed = true;
                    break;
                }
                token.push(ch);
            }
            if !closed {
                return Err(UcodeError::input_validation(
                    "INPUT.HOB_HEADER",
                    format!("unterminated quote in HOB header '{}'", header.trim()),
                ));
            }
            tokens.push(token.trim().to_string());
        } else {
            let mut token = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
            tokens.push(token);
        }
    }
    Ok(tokens)
}

fn resolve_columns(tokens: &[String]) -> ParserResult<HobColumns> {
    let find = |name: &str| {
        tokens
            .iter()
            .position(|token| token.eq_ignore_ascii_case(name))
    };
    let required = |name: &str| {
        find(name).ok_or_else(|| {
            UcodeError::input_validation(
                "INPUT.HOB_HEADER",
                format!("HOB output header is missing column \"{}\"", name),
            )
        })
    };

    Ok(HobColumns {
        name: required(COLUMN_NAME)?,
        observed: required(COLUMN_OBSERVED)?,
        simulated: find(COLUMN_SIMULATED),
        statistic: find(COLUMN_STATISTIC),
        stat_flag: find(COLUMN_STAT_FLAG),
        count: tokens.len(),
    })
}

fn parse_number(token: &str, index: usize, column: &str) -> ParserResult<f64> {
    // MODFLOW listings can carry Fortran D exponents.
    token.replace(['D', 'd'], "E").parse::<f64>().map_err(|_| {
        UcodeError::input_validation(
            "INPUT.HOB_ROW",
            format!(
                "line {}: {} '{}' is not a number",
                index + 1,
                column.to_ascii_lowercase(),
                token
            ),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::parse_hob_output;

    const HOB_OUTPUT: &str = r#" "SIMULATED EQUIVALENT"   "OBSERVED VALUE"    "OBSERVATION NAME"
  101.25000       100.00000      well_1
  98.500000       99.100000      well_2
  97.000000       96.5D0         well_3
"#;

    #[test]
    fn reads_quoted_modflow_header() {
        let table = parse_hob_output(HOB_OUTPUT, "Heads").expect("HOB output should parse");
        assert_eq!(table.len(), 3);
        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, ["well_1", "well_2", "well_3"]);
        let first = &table.records()[0];
        assert_eq!(first.observed_value, 100.0);
        assert_eq!(first.simulated_value, Some(101.25));
        assert_eq!(first.group, "Heads");
        assert_eq!(table.records()[2].observed_value, 96.5);
    }

    #[test]
    fn reads_optional_statistic_columns() {
        let source = "\"OBSERVATION NAME\" \"OBSERVED VALUE\" Statistic StatFlag\nh1 10.5 0.25 SD\n";
        let table = parse_hob_output(source, "Heads").expect("HOB output should parse");
        let record = &table.records()[0];
        assert_eq!(record.statistic, Some(0.25));
        assert_eq!(record.stat_flag.as_deref(), Some("SD"));
        assert_eq!(record.simulated_value, None);
    }

    #[test]
    fn missing_required_column_is_reported() {
        let error = parse_hob_output("\"SIMULATED EQUIVALENT\" \"OBSERVATION NAME\"\n1.0 h1\n", "Heads")
            .expect_err("observed column is required");
        assert_eq!(error.placeholder(), "INPUT.HOB_HEADER");
        assert!(error.message().contains("OBSERVED VALUE"));
    }

    #[test]
    fn short_rows_and_bad_numbers_are_rejected() {
        let short = format!("{}  1.0 h9\n", HOB_OUTPUT);
        let error = parse_hob_output(&short, "Heads").expect_err("short row should fail");
        assert_eq!(error.placeholder(), "INPUT.HOB_ROW");
        assert!(error.message().contains("line 5"));

        let bad = "\"OBSERVED VALUE\" \"OBSERVATION NAME\"\nabc h1\n";
        let error = parse_hob_output(bad, "Heads").expect_err("bad number should fail");
        assert!(error.message().contains("abc"));
    }

    #[test]
    fn duplicate_observation_names_break_the_one_to_one_index() {
        let source = "\"OBSERVED VALUE\" \"OBSERVATION NAME\"\n1.0 h1\n2.0 h1\n";
        let error = parse_hob_output(source, "Heads").expect_err("duplicate should fail");
        assert_eq!(error.placeholder(), "INPUT.OBS_DUPLICATE");
    }

    #[test]
    fn unterminated_header_quote_is_rejected() {
        let error = parse_hob_output("\"OBSERVED VALUE\n", "Heads").expect_err("bad header");
        assert!(error.message().contains("unterminated"));
    }
}
