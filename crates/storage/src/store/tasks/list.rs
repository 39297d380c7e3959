#![forbid(unsafe_code)]

use super::*;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tl_core::EntityRef;
use tl_core::filter::{PageLimits, TaskFilter, TaskQuery};
use tl_core::model::TaskPage;
use tracing::debug_span;

impl SqliteStore {
    /// Filtered, paginated task listing, newest first.
    ///
    /// `total` and `items` come from the same predicate inside one read transaction, so the count
    /// always describes the set the page was cut from.
    pub fn list_tasks(&self, actor: UserId, query: &TaskQuery) -> Result<TaskPage, StoreError> {
        let _span = debug_span!(
            "task.list",
            actor = %actor,
            workspace_id = %query.workspace_id
        )
        .entered();

        let limits = PageLimits {
            default_limit: self.config.default_page_limit,
            max_limit: self.config.max_page_limit,
        };
        let tx = self.read_tx()?;
        authorize_member_tx(&tx, actor, EntityRef::Workspace(query.workspace_id))?;
        if let Some(project_id) = query.project_id {
            authorize_member_tx(&tx, actor, EntityRef::Project(project_id))?;
        }
        let filter = query.resolve(actor, limits)?;

        let (predicate, mut values) = task_predicate(&filter);
        let total = tx.query_row(
            &format!(
                "SELECT COUNT(1) FROM tasks t JOIN projects p ON p.id = t.project_id \
                 WHERE {predicate}"
            ),
            params_from_iter(values.iter()),
            |row| row.get::<_, i64>(0),
        )?;

        values.push(Value::Integer(to_sqlite_i64(filter.limit)));
        values.push(Value::Integer(to_sqlite_i64(filter.offset)));
        let items = collect_rows(
            &tx,
            &format!(
                "SELECT {TASK_COLUMNS} FROM tasks t JOIN projects p ON p.id = t.project_id \
                 WHERE {predicate} \
                 ORDER BY t.created_at_ms DESC, t.id DESC \
                 LIMIT ? OFFSET ?"
            ),
            params_from_iter(values.iter()),
            task_row,
        )?;

        Ok(TaskPage {
            total: u64::try_from(total).unwrap_or(0),
            limit: filter.limit,
            offset: filter.offset,
            items,
        })
    }
}

/// Builds the shared WHERE clause with positional `?` placeholders, in push order.
fn task_predicate(filter: &TaskFilter) -> (String, Vec<Value>) {
    let mut clauses = vec!["p.workspace_id = ?".to_string()];
    let mut values = vec![Value::Integer(filter.workspace_id.get())];

    if let Some(project_id) = filter.project_id {
        clauses.push("t.project_id = ?".to_string());
        values.push(Value::Integer(project_id.get()));
    }
    if let Some(assignee_id) = filter.assignee_id {
        clauses.push("t.assignee_id = ?".to_string());
        values.push(Value::Integer(assignee_id.get()));
    }
    match filter.completed {
        Some(true) => clauses.push("t.completed_at_ms IS NOT NULL".to_string()),
        Some(false) => clauses.push("t.completed_at_ms IS NULL".to_string()),
        None => {}
    }
    if let Some(since_ms) = filter.completed_since_ms {
        clauses.push("t.completed_at_ms IS NOT NULL AND t.completed_at_ms >= ?".to_string());
        values.push(Value::Integer(since_ms));
    }

    (clauses.join(" AND "), values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::ids::WorkspaceId;

    #[test]
    fn predicate_placeholders_match_values() {
        let filter = TaskFilter {
            workspace_id: WorkspaceId::new(1),
            project_id: Some(ProjectId::new(2)),
            assignee_id: Some(UserId::new(3)),
            completed: Some(false),
            completed_since_ms: Some(10),
            limit: 20,
            offset: 0,
        };
        let (predicate, values) = task_predicate(&filter);
        assert_eq!(predicate.matches('?').count(), values.len());
        assert!(predicate.contains("t.completed_at_ms IS NULL"));
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn bare_filter_scopes_to_workspace_only() {
        let filter = TaskFilter {
            workspace_id: WorkspaceId::new(9),
            project_id: None,
            assignee_id: None,
            completed: None,
            completed_since_ms: None,
            limit: 5,
            offset: 0,
        };
        let (predicate, values) = task_predicate(&filter);
        assert_eq!(predicate, "p.workspace_id = ?");
        assert_eq!(values, vec![Value::Integer(9)]);
    }
}
