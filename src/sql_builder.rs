//! Parameterized SELECT builder for the record explorer.
//!
//! Values are always bound through `?` placeholders. Column names and ORDER BY
//! clauses are interpolated, so callers must only pass trusted identifiers
//! (the explorer maps user choices onto a fixed column list first).
//!
//! # Example
//!
//! ```rust
//! use sales_dashboard::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("sales")
//!     .where_eq("state", "Bahia")
//!     .where_contains("product", "guitarra")
//!     .where_number_gte("price", 100.0)
//!     .order_by(&["price DESC"])
//!     .limit(10)
//!     .build();
//! assert_eq!(params, vec!["Bahia", "%guitarra%", "100"]);
//! ```

pub struct SqlBuilder {
    table: String,
    columns: Vec<String>,
    distinct: bool,
    conditions: Vec<String>,
    bindings: Vec<String>,
    ordering: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl SqlBuilder {
    /// Create a builder selecting `*` from the given table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: vec!["*".to_string()],
            distinct: false,
            conditions: Vec::new(),
            bindings: Vec::new(),
            ordering: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Record a condition together with the values bound to its placeholders.
    fn push<I, S>(&mut self, condition: String, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions.push(condition);
        self.bindings.extend(values.into_iter().map(Into::into));
        self
    }

    /// Set the columns to select (replaces the default `*`).
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.columns = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Add a raw WHERE condition with one `?` per entry in `params`.
    pub fn where_clause(&mut self, condition: &str, params: &[&str]) -> &mut Self {
        self.push(condition.to_string(), params.iter().copied())
    }

    /// `{column} = ?`
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.push(format!("{column} = ?"), [value])
    }

    /// Case-insensitive LIKE with a caller-supplied pattern.
    pub fn where_like(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.push(format!("LOWER({column}) LIKE LOWER(?)"), [pattern])
    }

    /// Case-insensitive substring match. `%` and `_` in `needle` match
    /// literally.
    pub fn where_contains(&mut self, column: &str, needle: &str) -> &mut Self {
        let escaped = needle
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        self.push(
            format!("LOWER({column}) LIKE LOWER(?) ESCAPE '\\'"),
            [format!("%{escaped}%")],
        )
    }

    /// `{column} IN (?, ...)`. An empty list matches nothing.
    pub fn where_in(&mut self, column: &str, values: &[&str]) -> &mut Self {
        if values.is_empty() {
            return self.push("FALSE".to_string(), Vec::<String>::new());
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        self.push(format!("{column} IN ({placeholders})"), values.iter().copied())
    }

    /// `{column} >= ?` compared as text (ISO dates compare correctly).
    pub fn where_gte(&mut self, column: &str, value: &str) -> &mut Self {
        self.push(format!("{column} >= ?"), [value])
    }

    /// `{column} <= ?` compared as text.
    pub fn where_lte(&mut self, column: &str, value: &str) -> &mut Self {
        self.push(format!("{column} <= ?"), [value])
    }

    /// `{column} >= CAST(? AS DOUBLE)`
    pub fn where_number_gte(&mut self, column: &str, value: f64) -> &mut Self {
        self.push(format!("{column} >= CAST(? AS DOUBLE)"), [value.to_string()])
    }

    /// `{column} <= CAST(? AS DOUBLE)`
    pub fn where_number_lte(&mut self, column: &str, value: f64) -> &mut Self {
        self.push(format!("{column} <= CAST(? AS DOUBLE)"), [value.to_string()])
    }

    /// Append ORDER BY terms (e.g. `"price DESC"`).
    pub fn order_by(&mut self, terms: &[&str]) -> &mut Self {
        self.ordering.extend(terms.iter().map(|t| t.to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset = Some(n);
        self
    }

    /// Render the statement, one clause per line, and its bound values.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut sql = format!(
            "SELECT {}{}\nFROM {}",
            if self.distinct { "DISTINCT " } else { "" },
            self.columns.join(", "),
            self.table
        );
        if !self.conditions.is_empty() {
            sql.push_str(&format!("\nWHERE {}", self.conditions.join(" AND ")));
        }
        if !self.ordering.is_empty() {
            sql.push_str(&format!("\nORDER BY {}", self.ordering.join(", ")));
        }
        if let Some(n) = self.limit {
            sql.push_str(&format!("\nLIMIT {n}"));
        }
        if let Some(n) = self.offset {
            sql.push_str(&format!("\nOFFSET {n}"));
        }
        (sql, self.bindings.clone())
    }
}
