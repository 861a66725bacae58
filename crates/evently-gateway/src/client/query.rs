//! PostgREST query builder
//!
//! Builds the query-string half of a data API request. Filters are plain
//! equality, which is all the application needs.

use std::fmt::Display;

/// A request against one table of the data API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: &'static str,
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Option<String>,
    on_conflict: Option<String>,
}

impl Query {
    /// Start a query against a table
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            select: None,
            filters: Vec::new(),
            order: None,
            on_conflict: None,
        }
    }

    /// Columns (and embedded resources) to return, e.g. `*, profiles(*)`
    pub fn select(mut self, columns: &str) -> Self {
        self.select = Some(columns.replace(' ', ""));
        self
    }

    /// Add a `column = value` filter
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Order by a column
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{direction}"));
        self
    }

    /// Conflict target for upserts
    pub fn on_conflict(mut self, columns: &[&str]) -> Self {
        self.on_conflict = Some(columns.join(","));
        self
    }

    /// Table name
    pub fn table_name(&self) -> &'static str {
        self.table
    }

    /// True when an upsert conflict target is set
    pub fn is_upsert(&self) -> bool {
        self.on_conflict.is_some()
    }

    /// Query-string pairs in a stable order
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 3);
        if let Some(select) = &self.select {
            params.push(("select".to_string(), select.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            params.push(("order".to_string(), order.clone()));
        }
        if let Some(on_conflict) = &self.on_conflict {
            params.push(("on_conflict".to_string(), on_conflict.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
        expected
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_list_by_organizer() {
        let user_id = Uuid::nil();
        let query = Query::table("events")
            .select("*")
            .eq("user_id", user_id)
            .order("date", true);

        assert_eq!(query.table_name(), "events");
        assert_eq!(
            query.params(),
            pairs(&[
                ("select", "*"),
                ("user_id", "eq.00000000-0000-0000-0000-000000000000"),
                ("order", "date.asc"),
            ])
        );
    }

    #[test]
    fn test_embedded_select_strips_spaces() {
        let query = Query::table("event_attendees").select("*, profiles(*)");
        assert_eq!(query.params(), pairs(&[("select", "*,profiles(*)")]));
    }

    #[test]
    fn test_upsert_target() {
        let query = Query::table("event_attendees").on_conflict(&["event_id", "user_id"]);
        assert!(query.is_upsert());
        assert_eq!(query.params(), pairs(&[("on_conflict", "event_id,user_id")]));
        assert!(!Query::table("events").is_upsert());
    }

    #[test]
    fn test_descending_order() {
        let query = Query::table("events").order("created_at", false);
        assert_eq!(query.params(), pairs(&[("order", "created_at.desc")]));
    }
}
