/// Complete database schema for the node store.
///
/// Uses CREATE TABLE/INDEX IF NOT EXISTS for idempotent execution.
/// All statements are designed to be run in a single batch.
pub const INITIAL_SCHEMA: &str = r#"
-- Files table: one row per note file with display title and timestamps
CREATE TABLE IF NOT EXISTS files (
    file TEXT PRIMARY KEY,
    title TEXT,
    atime INTEGER,
    mtime INTEGER
);

-- Nodes table: one row per note heading
CREATE TABLE IF NOT EXISTS nodes (
    id TEXT PRIMARY KEY,
    file TEXT NOT NULL,
    level INTEGER NOT NULL,
    point INTEGER NOT NULL,
    todo TEXT,
    priority TEXT,
    scheduled TEXT,
    deadline TEXT,
    title TEXT NOT NULL,
    properties TEXT,
    olp TEXT,
    FOREIGN KEY (file) REFERENCES files(file) ON DELETE CASCADE
);

-- One-to-many relations, each keyed by node id
CREATE TABLE IF NOT EXISTS tags (
    node_id TEXT NOT NULL,
    tag TEXT NOT NULL,
    PRIMARY KEY (node_id, tag),
    FOREIGN KEY (node_id) REFERENCES nodes(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS aliases (
    node_id TEXT NOT NULL,
    alias TEXT NOT NULL,
    PRIMARY KEY (node_id, alias),
    FOREIGN KEY (node_id) REFERENCES nodes(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS refs (
    node_id TEXT NOT NULL,
    type TEXT NOT NULL,
    ref TEXT NOT NULL,
    PRIMARY KEY (node_id, type, ref),
    FOREIGN KEY (node_id) REFERENCES nodes(id) ON DELETE CASCADE
);

-- Index for joining nodes to their containing file
CREATE INDEX IF NOT EXISTS idx_nodes_file ON nodes(file);

-- Index for the modification-time sort push-down
CREATE INDEX IF NOT EXISTS idx_files_mtime ON files(mtime);

-- Indexes for efficient relation lookups by node
CREATE INDEX IF NOT EXISTS idx_tags_node ON tags(node_id);
CREATE INDEX IF NOT EXISTS idx_aliases_node ON aliases(node_id);
CREATE INDEX IF NOT EXISTS idx_refs_node ON refs(node_id);
"#;
