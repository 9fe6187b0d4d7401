use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A row selection against a single table, rendered as PostgREST query parameters.
///
/// ```rust,ignore
/// let q = RowQuery::new().select("*").eq("is_active", true).order("display_order", Direction::Asc);
/// // select=*&is_active=eq.true&order=display_order.asc
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<(String, Direction)>,
    limit: Option<u32>,
}

impl RowQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns and embedded relations, e.g. `*, category:categories(id, name, slug)`.
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.to_string());
        self
    }

    pub fn eq<V: Display>(mut self, column: &str, value: V) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive substring match. LIKE wildcards in `needle` are matched literally.
    pub fn ilike_contains(mut self, column: &str, needle: &str) -> Self {
        let escaped = needle
            .chars()
            .filter(|c| *c != '*')
            .fold(String::with_capacity(needle.len()), |mut acc, c| {
                if matches!(c, '%' | '_' | '\\') {
                    acc.push('\\');
                }
                acc.push(c);
                acc
            });
        self.filters.push((column.to_string(), format!("ilike.*{escaped}*")));
        self
    }

    pub fn is_null(mut self, column: &str) -> Self {
        self.filters.push((column.to_string(), "is.null".to_string()));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order.push((column.to_string(), direction));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.replace(' ', "")));
        }
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|(col, dir)| format!("{col}.{}", dir.as_str()))
                .collect::<Vec<String>>()
                .join(",");
            params.push(("order".to_string(), order));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}
