//! SQLite schema definitions and SQL query constants.
//!
//! All SQL statements used by the SQLite repository live here as pure
//! data; the repository supplies parameters and maps rows.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Categories table
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    kind TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Transactions table
CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    amount TEXT NOT NULL,
    category_id TEXT NOT NULL,
    date TEXT NOT NULL,
    description TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

-- Indexes for the user-scoped query paths
CREATE INDEX IF NOT EXISTS idx_transactions_user_id ON transactions(user_id);
CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);
CREATE INDEX IF NOT EXISTS idx_transactions_user_category ON transactions(user_id, category_id);
CREATE INDEX IF NOT EXISTS idx_categories_user_id ON categories(user_id);
"#;

// Transaction queries
pub const INSERT_TRANSACTION: &str = r#"
INSERT INTO transactions (id, user_id, kind, title, amount, category_id, date, description, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
"#;

pub const SELECT_TRANSACTION_BY_ID: &str = r#"
SELECT id, user_id, kind, title, amount, category_id, date, description, created_at, updated_at
FROM transactions
WHERE id = ?1
"#;

pub const SELECT_TRANSACTIONS_BY_USER: &str = r#"
SELECT id, user_id, kind, title, amount, category_id, date, description, created_at, updated_at
FROM transactions
WHERE user_id = ?1
ORDER BY date ASC
"#;

pub const SELECT_TRANSACTIONS_BY_USER_AND_DATE_RANGE: &str = r#"
SELECT id, user_id, kind, title, amount, category_id, date, description, created_at, updated_at
FROM transactions
WHERE user_id = ?1 AND date >= ?2 AND date <= ?3
ORDER BY date ASC
"#;

pub const COUNT_TRANSACTIONS_BY_USER_AND_CATEGORY: &str = r#"
SELECT COUNT(*)
FROM transactions
WHERE user_id = ?1 AND category_id = ?2
"#;

pub const UPDATE_TRANSACTION: &str = r#"
UPDATE transactions
SET kind = ?2, title = ?3, amount = ?4, category_id = ?5, date = ?6, description = ?7, updated_at = ?8
WHERE id = ?1
"#;

pub const DELETE_TRANSACTION: &str = r#"
DELETE FROM transactions
WHERE id = ?1
"#;

// Category queries
pub const INSERT_CATEGORY: &str = r#"
INSERT INTO categories (id, user_id, name, kind, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const SELECT_CATEGORY_BY_ID: &str = r#"
SELECT id, user_id, name, kind, created_at
FROM categories
WHERE id = ?1
"#;

pub const SELECT_CATEGORIES_BY_USER: &str = r#"
SELECT id, user_id, name, kind, created_at
FROM categories
WHERE user_id = ?1
ORDER BY name ASC
"#;

pub const SELECT_CATEGORIES_BY_USER_AND_KIND: &str = r#"
SELECT id, user_id, name, kind, created_at
FROM categories
WHERE user_id = ?1 AND kind = ?2
ORDER BY name ASC
"#;

pub const UPDATE_CATEGORY: &str = r#"
UPDATE categories
SET name = ?2, kind = ?3
WHERE id = ?1
"#;

pub const DELETE_CATEGORY: &str = r#"
DELETE FROM categories
WHERE id = ?1
"#;
