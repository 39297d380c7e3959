#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS projects (
          id INTEGER PRIMARY KEY,
          workspace_id INTEGER NOT NULL REFERENCES workspaces(id) ON DELETE CASCADE,
          team_id INTEGER REFERENCES teams(id) ON DELETE SET NULL,
          owner_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
          name TEXT NOT NULL,
          description TEXT,
          is_public INTEGER NOT NULL DEFAULT 1 CHECK (is_public IN (0, 1)),
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS sections (
          id INTEGER PRIMARY KEY,
          project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          position INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL
        );

        -- completed == (completed_at_ms IS NOT NULL)
        CREATE TABLE IF NOT EXISTS tasks (
          id INTEGER PRIMARY KEY,
          project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
          section_id INTEGER REFERENCES sections(id) ON DELETE SET NULL,
          parent_task_id INTEGER REFERENCES tasks(id) ON DELETE CASCADE,
          assignee_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
          creator_id INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
          name TEXT NOT NULL,
          description TEXT,
          due_at_ms INTEGER,
          completed_at_ms INTEGER,
          position INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          CHECK (parent_task_id IS NULL OR parent_task_id <> id)
        );

        CREATE TABLE IF NOT EXISTS comments (
          id INTEGER PRIMARY KEY,
          task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
          author_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
          content TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS attachments (
          id INTEGER PRIMARY KEY,
          task_id INTEGER REFERENCES tasks(id) ON DELETE CASCADE,
          comment_id INTEGER REFERENCES comments(id) ON DELETE CASCADE,
          uploader_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
          filename TEXT NOT NULL,
          url TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          CHECK ((task_id IS NOT NULL) + (comment_id IS NOT NULL) = 1)
        );

        CREATE TABLE IF NOT EXISTS task_followers (
          task_id INTEGER NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
          user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
          created_at_ms INTEGER NOT NULL,
          PRIMARY KEY (task_id, user_id)
        );
"#;
