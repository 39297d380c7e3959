#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS tags (
          id INTEGER PRIMARY KEY,
          workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          color TEXT,
          created_at_ms INTEGER NOT NULL,
          UNIQUE (name, workspace_id)
        );

        CREATE TABLE IF NOT EXISTS task_tags (
          task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
          tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE,
          created_at_ms INTEGER NOT NULL,
          PRIMARY KEY (task_id, tag_id)
        );

        -- field_type is checked against the type table on read.
        CREATE TABLE IF NOT EXISTS custom_fields (
          id INTEGER PRIMARY KEY,
          project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          field_type TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS custom_field_options (
          id INTEGER PRIMARY KEY,
          custom_field_id INTEGER NOT NULL REFERENCES custom_fields(id) ON DELETE CASCADE,
          value TEXT NOT NULL,
          color TEXT,
          position INTEGER NOT NULL DEFAULT 0,
          UNIQUE (custom_field_id, value)
        );

        CREATE TABLE IF NOT EXISTS custom_field_values (
          id INTEGER PRIMARY KEY,
          task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
          custom_field_id INTEGER NOT NULL REFERENCES custom_fields(id) ON DELETE CASCADE,
          value_text TEXT,
          value_number REAL,
          value_date INTEGER,
          value_boolean INTEGER CHECK (value_boolean IS NULL OR value_boolean IN (0, 1)),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          UNIQUE (task_id, custom_field_id),
          CHECK (
            (value_text IS NOT NULL) + (value_number IS NOT NULL)
              + (value_date IS NOT NULL) + (value_boolean IS NOT NULL) = 1
          )
        );
"#;
