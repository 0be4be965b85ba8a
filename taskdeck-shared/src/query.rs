/// Query composition for task listings
///
/// A task listing is produced under a `(filter, sort, search)` triple:
/// the filter and search select rows, the sort orders them. Composition is
/// filter ∧ search, then sort. Sorting is presentation only and never
/// touches stored positions; an empty result is a valid outcome, not an
/// error.
///
/// The composer emits SQL fragments that `Task::list_visible` splices into
/// its SELECT. Fragments are static strings or bound patterns, so user
/// input never reaches the SQL text itself.

use serde::{Deserialize, Serialize};

/// Completion filter for a task listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    /// No completion filter
    #[default]
    All,

    /// Only tasks not yet completed
    Active,

    /// Only completed tasks
    Completed,
}

impl TaskFilter {
    /// Parses a query-string value, falling back to `All` on unknown input
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => TaskFilter::Active,
            "completed" => TaskFilter::Completed,
            _ => TaskFilter::All,
        }
    }

    /// WHERE fragment for this filter, None when no restriction applies
    pub(crate) fn where_sql(&self) -> Option<&'static str> {
        match self {
            TaskFilter::All => None,
            TaskFilter::Active => Some("t.completed = FALSE"),
            TaskFilter::Completed => Some("t.completed = TRUE"),
        }
    }
}

/// Presentation order for a task listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskSort {
    /// Stored position ascending (the drag-and-drop order)
    #[default]
    Position,

    /// Due date ascending, tasks without a due date last
    Due,

    /// Creation time ascending
    Created,
}

impl TaskSort {
    /// Parses a query-string value, falling back to `Position` on unknown input
    pub fn parse(s: &str) -> Self {
        match s {
            "due" => TaskSort::Due,
            "created" => TaskSort::Created,
            _ => TaskSort::Position,
        }
    }

    /// ORDER BY clause for this sort mode
    pub(crate) fn order_by_sql(&self) -> &'static str {
        match self {
            TaskSort::Position => "ORDER BY t.position ASC, t.id ASC",
            TaskSort::Due => "ORDER BY t.due_date ASC NULLS LAST, t.id ASC",
            TaskSort::Created => "ORDER BY t.created_at ASC, t.id ASC",
        }
    }
}

/// A complete listing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Completion filter
    pub filter: TaskFilter,

    /// Presentation order
    pub sort: TaskSort,

    /// Free-text search over task text; empty or whitespace matches everything
    pub search: Option<String>,
}

impl TaskQuery {
    /// ILIKE pattern for the search term, None when the search is empty
    ///
    /// The term is matched as a case-insensitive substring of the task
    /// text, so LIKE metacharacters in user input are escaped.
    pub(crate) fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)))
    }
}

/// Escapes LIKE/ILIKE metacharacters (`\`, `%`, `_`) in a search term
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_parse_defaults_to_all() {
        assert_eq!(TaskFilter::parse("active"), TaskFilter::Active);
        assert_eq!(TaskFilter::parse("completed"), TaskFilter::Completed);
        assert_eq!(TaskFilter::parse("all"), TaskFilter::All);
        assert_eq!(TaskFilter::parse("bogus"), TaskFilter::All);
        assert_eq!(TaskFilter::parse(""), TaskFilter::All);
    }

    #[test]
    fn test_sort_parse_defaults_to_position() {
        assert_eq!(TaskSort::parse("due"), TaskSort::Due);
        assert_eq!(TaskSort::parse("created"), TaskSort::Created);
        assert_eq!(TaskSort::parse("position"), TaskSort::Position);
        assert_eq!(TaskSort::parse("anything"), TaskSort::Position);
    }

    #[test]
    fn test_filter_where_fragments() {
        assert_eq!(TaskFilter::All.where_sql(), None);
        assert_eq!(TaskFilter::Active.where_sql(), Some("t.completed = FALSE"));
        assert_eq!(TaskFilter::Completed.where_sql(), Some("t.completed = TRUE"));
    }

    #[test]
    fn test_sort_order_fragments() {
        assert!(TaskSort::Position.order_by_sql().contains("t.position ASC"));
        assert!(TaskSort::Due.order_by_sql().contains("NULLS LAST"));
        assert!(TaskSort::Created.order_by_sql().contains("t.created_at ASC"));
    }

    #[test]
    fn test_search_pattern_trims_and_wraps() {
        let query = TaskQuery {
            search: Some("  groceries ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search_pattern().as_deref(), Some("%groceries%"));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let query = TaskQuery::default();
        assert_eq!(query.search_pattern(), None);

        let query = TaskQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.search_pattern(), None);
    }

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("50%_done"), "50\\%\\_done");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_filter_and_sort_are_independent() {
        // Every (filter, sort) pair composes without interaction: the
        // filter only contributes a WHERE fragment, the sort only an
        // ORDER BY fragment.
        for filter in [TaskFilter::All, TaskFilter::Active, TaskFilter::Completed] {
            for sort in [TaskSort::Position, TaskSort::Due, TaskSort::Created] {
                let query = TaskQuery {
                    filter,
                    sort,
                    search: Some("foo".to_string()),
                };
                if let Some(clause) = query.filter.where_sql() {
                    assert!(clause.starts_with("t.completed"));
                }
                assert!(query.sort.order_by_sql().starts_with("ORDER BY"));
                assert_eq!(query.search_pattern().as_deref(), Some("%foo%"));
            }
        }
    }
}
