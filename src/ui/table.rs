use tabled::{settings::Style, Table, Tabled};

use crate::range::FunctionRange;
use crate::report::VariableBinding;

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

#[derive(Tabled)]
struct VariableRow {
    #[tabled(rename = "Variable")]
    name: String,
    #[tabled(rename = "Type")]
    type_name: String,
    #[tabled(rename = "Origin")]
    origin: String,
}

/// One row per visible variable, in result order.
pub fn variables_table(bindings: &[VariableBinding]) -> String {
    if bindings.is_empty() {
        return String::new();
    }

    let rows: Vec<VariableRow> = bindings
        .iter()
        .map(|binding| VariableRow {
            name: binding.name.clone(),
            type_name: binding.type_name.clone(),
            origin: binding.origin.to_string(),
        })
        .collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct RangeRow {
    #[tabled(rename = "Function")]
    function: String,
    #[tabled(rename = "Start")]
    start: u32,
    #[tabled(rename = "End")]
    end: u32,
}

/// One row per located function range; `name` pairs with `range.function`.
pub fn ranges_table(rows: &[(String, FunctionRange)]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let rows: Vec<RangeRow> = rows
        .iter()
        .map(|(name, range)| RangeRow {
            function: name.clone(),
            start: range.start,
            end: range.end,
        })
        .collect();
    Table::new(&rows).with(Style::rounded()).to_string()
}
