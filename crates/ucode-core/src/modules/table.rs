//! UCODE keyword tables.
//!
//! ```text
//! BEGIN Parameter_Data Table
//! NROW=2 NCOL=3 COLUMNLABELS
//! ParamName    GroupName    StartValue
//! Kx_1         Kx           0.0005
//! Kx_2         Kx           0.001
//! END Parameter_Data Table
//! ```
//!
//! Every field, labels included, is left-justified to [`COLUMN_WIDTH`] and
//! joined by a single space; longer fields are never truncated.

use crate::domain::{ParserResult, UcodeError};

pub const COLUMN_WIDTH: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedWidthTable {
    label: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FixedWidthTable {
    pub fn new<I, S>(label: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, S>(&mut self, fields: I) -> ParserResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.len() != self.columns.len() {
            return Err(UcodeError::internal(
                "SYS.TABLE_ROW_WIDTH",
                format!(
                    "{} table row {} has {} fields for {} columns",
                    self.label,
                    self.rows.len() + 1,
                    fields.len(),
                    self.columns.len()
                ),
            ));
        }
        if let Some(field) = fields
            .iter()
            .find(|field| field.is_empty() || field.chars().any(char::is_whitespace))
        {
            return Err(UcodeError::input_validation(
                "INPUT.TABLE_FIELD",
                format!(
                    "{} table field '{}' must be non-empty and free of whitespace",
                    self.label, field
                ),
            ));
        }
        self.rows.push(fields);
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("BEGIN {} Table\n", self.label));
        out.push_str(&format!(
            "NROW={} NCOL={} COLUMNLABELS\n",
            self.rows.len(),
            self.columns.len()
        ));
        out.push_str(&justify_line(&self.columns));
        out.push('\n');
        for row in &self.rows {
            out.push_str(&justify_line(row));
            out.push('\n');
        }
        out.push_str(&format!("END {} Table\n", self.label));
        out
    }
}

fn justify_line(fields: &[String]) -> String {
    fields
        .iter()
        .map(|field| format!("{field:<width$}", width = COLUMN_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parse_fixed_width_table(source: &str) -> ParserResult<FixedWidthTable> {
    let mut lines = source
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header) = lines
        .next()
        .ok_or_else(|| table_error(0, "table is empty"))?;
    let label = parse_begin_line(header).ok_or_else(|| {
        table_error(1, format!("expected 'BEGIN <label> Table', found '{}'", header.trim()))
    })?;

    let (dims_index, dims_line) = lines
        .next()
        .ok_or_else(|| table_error(2, "missing NROW/NCOL line"))?;
    let (nrow, ncol) = parse_dimensions(dims_line).ok_or_else(|| {
        table_error(
            dims_index + 1,
            format!("malformed dimensions line '{}'", dims_line.trim()),
        )
    })?;

    let (labels_index, labels_line) = lines
        .next()
        .ok_or_else(|| table_error(3, "missing column labels"))?;
    let columns: Vec<String> = labels_line.split_whitespace().map(str::to_string).collect();
    if columns.len() != ncol {
        return Err(table_error(
            labels_index + 1,
            format!("declared NCOL={} but found {} labels", ncol, columns.len()),
        ));
    }

    let mut table = FixedWidthTable::new(label.clone(), columns);
    let mut saw_end = false;
    for (index, line) in lines {
        let trimmed = line.trim();
        if is_end_line(trimmed, &label) {
            saw_end = true;
            break;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != ncol {
            return Err(table_error(
                index + 1,
                format!("row has {} fields, expected {}", fields.len(), ncol),
            ));
        }
        table.push_row(fields)?;
    }

    if !saw_end {
        return Err(table_error(0, format!("missing 'END {} Table' line", label)));
    }
    if table.rows.len() != nrow {
        return Err(table_error(
            0,
            format!("declared NROW={} but found {} rows", nrow, table.rows.len()),
        ));
    }
    Ok(table)
}

fn parse_begin_line(line: &str) -> Option<String> {
    let mut tokens = line.split_whitespace();
    let begin = tokens.next()?;
    let label = tokens.next()?;
    let kind = tokens.next()?;
    (begin.eq_ignore_ascii_case("BEGIN") && kind.eq_ignore_ascii_case("Table"))
        .then(|| label.to_string())
}

fn parse_dimensions(line: &str) -> Option<(usize, usize)> {
    let mut nrow = None;
    let mut ncol = None;
    let mut labelled = false;
    for token in line.split_whitespace() {
        let upper = token.to_ascii_uppercase();
        if let Some(value) = upper.strip_prefix("NROW=") {
            nrow = value.parse().ok();
        } else if let Some(value) = upper.strip_prefix("NCOL=") {
            ncol = value.parse().ok();
        } else if upper == "COLUMNLABELS" {
            labelled = true;
        }
    }
    labelled.then_some((nrow?, ncol?))
}

fn is_end_line(line: &str, label: &str) -> bool {
    let mut tokens = line.split_whitespace();
    matches!(
        (tokens.next(), tokens.next()),
        (Some(end), Some(found)) if end.eq_ignore_ascii_case("END") && found == label
    )
}

fn table_error(line: usize, message: impl Into<String>) -> UcodeError {
    let message = message.into();
    let message = if line == 0 {
        message
    } else {
        format!("line {}: {}", line, message)
    };
    UcodeError::input_validation("INPUT.TABLE_LAYOUT", message)
}

#[cfg(test)]
mod tests {
    use super::{FixedWidthTable, parse_fixed_width_table};

    fn sample_table() -> FixedWidthTable {
        let mut table = FixedWidthTable::new("Parameter_Data", ["ParamName", "GroupName", "StartValue"]);
        table
            .push_row(["Kx_1", "Kx", "0.0005"])
            .expect("row should be accepted");
        table
            .push_row(["vani_1", "vani", "10.0"])
            .expect("row should be accepted");
        table
    }

    #[test]
    fn render_matches_ucode_layout_byte_for_byte() {
        let rendered = sample_table().render();
        let expected = concat!(
            "BEGIN Parameter_Data Table\n",
            "NROW=2 NCOL=3 COLUMNLABELS\n",
            "ParamName    GroupName    StartValue  \n",
            "Kx_1         Kx           0.0005      \n",
            "vani_1       vani         10.0        \n",
            "END Parameter_Data Table\n",
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn long_fields_are_not_truncated() {
        let mut table = FixedWidthTable::new("Observation_Data", ["ObsName"]);
        table
            .push_row(["well_with_a_long_name_01"])
            .expect("row should be accepted");
        assert!(table.render().contains("\nwell_with_a_long_name_01\n"));
    }

    #[test]
    fn reparsing_rendered_output_recovers_every_field() {
        let table = sample_table();
        let parsed = parse_fixed_width_table(&table.render()).expect("table should parse");
        assert_eq!(parsed, table);
        assert_eq!(parsed.column_index("StartValue"), Some(2));
    }

    #[test]
    fn rows_must_match_column_count() {
        let mut table = FixedWidthTable::new("Parallel_Runners", ["RunnerName", "RunnerDir"]);
        let error = table
            .push_row(["Runner000"])
            .expect_err("short row should be rejected");
        assert_eq!(error.placeholder(), "SYS.TABLE_ROW_WIDTH");
    }

    #[test]
    fn fields_with_whitespace_are_rejected() {
        let mut table = FixedWidthTable::new("Parameter_Data", ["GroupName"]);
        let error = table
            .push_row(["Sandy Mud"])
            .expect_err("embedded space would break column alignment");
        assert_eq!(error.placeholder(), "INPUT.TABLE_FIELD");
    }

    #[test]
    fn parser_rejects_mismatched_declared_counts() {
        let source = concat!(
            "BEGIN Parameter_Data Table\n",
            "NROW=3 NCOL=1 COLUMNLABELS\n",
            "ParamName\n",
            "Kx_1\n",
            "END Parameter_Data Table\n",
        );
        let error = parse_fixed_width_table(source).expect_err("row count mismatch should fail");
        assert!(error.message().contains("NROW=3"));

        let missing_end = "BEGIN X Table\nNROW=0 NCOL=1 COLUMNLABELS\nA\n";
        let error = parse_fixed_width_table(missing_end).expect_err("missing END should fail");
        assert!(error.message().contains("END X Table"));
    }
}
