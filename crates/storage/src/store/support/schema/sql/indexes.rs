#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_workspace_members_user
            ON workspace_members(user_id, workspace_id);
        CREATE INDEX IF NOT EXISTS idx_team_members_user ON team_members(user_id, team_id);
        CREATE INDEX IF NOT EXISTS idx_teams_workspace ON teams(workspace_id, created_at_ms, id);
        CREATE INDEX IF NOT EXISTS idx_projects_workspace
            ON projects(workspace_id, created_at_ms, id);
        CREATE INDEX IF NOT EXISTS idx_sections_project ON sections(project_id, position, id);
        CREATE INDEX IF NOT EXISTS idx_tasks_project_created
            ON tasks(project_id, created_at_ms, id);
        CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_task_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks(assignee_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_section ON tasks(section_id);
        CREATE INDEX IF NOT EXISTS idx_comments_task ON comments(task_id, created_at_ms, id);
        CREATE INDEX IF NOT EXISTS idx_attachments_task ON attachments(task_id);
        CREATE INDEX IF NOT EXISTS idx_attachments_comment ON attachments(comment_id);
        CREATE INDEX IF NOT EXISTS idx_task_tags_tag ON task_tags(tag_id);
        CREATE INDEX IF NOT EXISTS idx_custom_fields_project
            ON custom_fields(project_id, created_at_ms, id);
        CREATE INDEX IF NOT EXISTS idx_custom_field_values_field
            ON custom_field_values(custom_field_id);
        CREATE INDEX IF NOT EXISTS idx_task_followers_user ON task_followers(user_id);
"#;
