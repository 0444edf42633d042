use common::{DemandError, Result, Stage};

/// A declared input column. Headers match `name` or one of `aliases`,
/// ignoring ASCII case and surrounding whitespace.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl Column {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            required: true,
        }
    }

    const fn optional(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            required: false,
        }
    }

    fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(self.name)
            || self.aliases.iter().any(|a| header.eq_ignore_ascii_case(a))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub table: &'static str,
    pub columns: &'static [Column],
}

pub const HISTORY_SCHEMA: TableSchema = TableSchema {
    table: "history",
    columns: &[
        Column::required("sku"),
        Column::required("channel"),
        Column::required("category"),
        Column::required("brand"),
        Column::required("ds"),
        Column::required("y"),
        Column::required("availability"),
    ],
};

pub const TRANSITION_SCHEMA: TableSchema = TableSchema {
    table: "transitions",
    columns: &[
        Column::required("sku_old"),
        Column::required("sku_new"),
        Column {
            name: "status",
            aliases: &["old/new?", "old/new"],
            required: true,
        },
        Column::required("date_in"),
        Column::required("date_out"),
    ],
};

pub const CUSTOM_SKU_SCHEMA: TableSchema = TableSchema {
    table: "custom_skus",
    columns: &[
        Column::required("sku"),
        Column::optional("category"),
        Column::optional("brand"),
    ],
};

/// Header positions for each declared column, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    indices: Vec<Option<usize>>,
}

impl ResolvedColumns {
    /// Cell for the schema column at `column`, trimmed; blank cells read as `None`.
    pub fn cell<'a>(&self, row: &'a [String], column: usize) -> Option<&'a str> {
        let idx = self.indices.get(column).copied().flatten()?;
        let value = row.get(idx)?.trim();
        (!value.is_empty()).then_some(value)
    }
}

impl TableSchema {
    /// Locate every declared column in `headers`.
    ///
    /// Fails on the first required column that is absent.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns> {
        let mut indices = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            let idx = headers.iter().position(|h| column.matches(h));
            if idx.is_none() && column.required {
                return Err(DemandError::MissingColumn {
                    stage: Stage::Ingest,
                    table: self.table,
                    column: column.name,
                });
            }
            indices.push(idx);
        }
        Ok(ResolvedColumns { indices })
    }
}
