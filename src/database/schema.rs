//! Engine-independent declaration of the FitForge tables.
//!
//! Tables are plain data; `Dialect` turns them into `CREATE TABLE IF NOT EXISTS`
//! statements for the backend in use.

use crate::models::{DietType, PlanType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    /// Auto-assigned integer primary key.
    Serial,
    Integer,
    /// Bounded text (`VARCHAR(n)` where the engine has one).
    Varchar(u16),
    Text,
    Decimal { precision: u8, scale: u8 },
    Enum(Vec<&'static str>),
    /// Structured document; shape not enforced.
    Json,
    /// Timestamp defaulting to insertion time.
    CreatedAt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub not_null: bool,
    pub unique: bool,
}

impl Column {
    fn new(name: &'static str, ty: ColumnType) -> Self {
        Self {
            name,
            ty,
            not_null: false,
            unique: false,
        }
    }

    fn required(mut self) -> Self {
        self.not_null = true;
        self
    }

    fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub references_table: &'static str,
    pub references_column: &'static str,
    pub on_delete_cascade: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: &'static str,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}

/// A rendered create statement, ready for a session to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStatement {
    pub name: String,
    pub sql: String,
}

fn user_ref() -> ForeignKey {
    ForeignKey {
        column: "user_id",
        references_table: "users",
        references_column: "id",
        on_delete_cascade: true,
    }
}

/// The four tables, in dependency order.
pub fn fitforge_tables() -> Vec<Table> {
    vec![
        Table {
            name: "users",
            columns: vec![
                Column::new("id", ColumnType::Serial),
                Column::new("username", ColumnType::Varchar(50)).required(),
                Column::new("email", ColumnType::Varchar(100))
                    .required()
                    .unique(),
                Column::new("password", ColumnType::Varchar(100)).required(),
                Column::new("age", ColumnType::Integer),
                Column::new(
                    "weight",
                    ColumnType::Decimal {
                        precision: 5,
                        scale: 2,
                    },
                ),
                Column::new("created_at", ColumnType::CreatedAt),
            ],
            foreign_keys: vec![],
        },
        Table {
            name: "admins",
            columns: vec![
                Column::new("id", ColumnType::Serial),
                Column::new("username", ColumnType::Varchar(50)).required(),
                Column::new("email", ColumnType::Varchar(100))
                    .required()
                    .unique(),
                Column::new("password", ColumnType::Varchar(100)).required(),
                Column::new("created_at", ColumnType::CreatedAt),
            ],
            foreign_keys: vec![],
        },
        Table {
            name: "exercise_plans",
            columns: vec![
                Column::new("id", ColumnType::Serial),
                Column::new("user_id", ColumnType::Integer).required(),
                Column::new("plan_type", ColumnType::Enum(PlanType::labels())).required(),
                Column::new("exercises", ColumnType::Json).required(),
                Column::new("created_at", ColumnType::CreatedAt),
            ],
            foreign_keys: vec![user_ref()],
        },
        Table {
            name: "diet_charts",
            columns: vec![
                Column::new("id", ColumnType::Serial),
                Column::new("user_id", ColumnType::Integer).required(),
                Column::new("diet_type", ColumnType::Enum(DietType::labels())).required(),
                Column::new("diet_details", ColumnType::Text).required(),
                Column::new("created_at", ColumnType::CreatedAt),
            ],
            foreign_keys: vec![user_ref()],
        },
    ]
}

fn quote_literals(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Dialect {
    fn column_sql(&self, column: &Column) -> String {
        let name = column.name;
        let mut sql = match (self, &column.ty) {
            (Dialect::MySql, ColumnType::Serial) => format!("{name} INT AUTO_INCREMENT PRIMARY KEY"),
            (Dialect::Sqlite, ColumnType::Serial) => {
                format!("{name} INTEGER PRIMARY KEY AUTOINCREMENT")
            }
            (Dialect::MySql, ColumnType::Integer) => format!("{name} INT"),
            (Dialect::Sqlite, ColumnType::Integer) => format!("{name} INTEGER"),
            (Dialect::MySql, ColumnType::Varchar(len)) => format!("{name} VARCHAR({len})"),
            (Dialect::Sqlite, ColumnType::Varchar(_)) => format!("{name} TEXT"),
            (_, ColumnType::Text) => format!("{name} TEXT"),
            (Dialect::MySql, ColumnType::Decimal { precision, scale }) => {
                format!("{name} DECIMAL({precision},{scale})")
            }
            // NUMERIC affinity stores whole numbers as INTEGER; REAL keeps them floats.
            (Dialect::Sqlite, ColumnType::Decimal { .. }) => format!("{name} REAL"),
            (Dialect::MySql, ColumnType::Enum(values)) => {
                format!("{name} ENUM({})", quote_literals(values))
            }
            (Dialect::Sqlite, ColumnType::Enum(_)) => format!("{name} TEXT"),
            (Dialect::MySql, ColumnType::Json) => format!("{name} JSON"),
            (Dialect::Sqlite, ColumnType::Json) => format!("{name} TEXT"),
            (_, ColumnType::CreatedAt) => format!("{name} TIMESTAMP DEFAULT CURRENT_TIMESTAMP"),
        };

        if column.not_null {
            sql.push_str(" NOT NULL");
        }
        if column.unique {
            sql.push_str(" UNIQUE");
        }

        // SQLite has no ENUM or JSON column types; enforce them with checks.
        if *self == Dialect::Sqlite {
            match &column.ty {
                ColumnType::Enum(values) => {
                    sql.push_str(&format!(" CHECK ({name} IN ({}))", quote_literals(values)))
                }
                ColumnType::Json => sql.push_str(&format!(" CHECK (json_valid({name}))")),
                _ => {}
            }
        }

        sql
    }

    fn foreign_key_sql(&self, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            fk.column, fk.references_table, fk.references_column
        );
        if fk.on_delete_cascade {
            sql.push_str(" ON DELETE CASCADE");
        }
        sql
    }

    pub fn create_table(&self, table: &Table) -> String {
        let definitions = table
            .columns
            .iter()
            .map(|c| self.column_sql(c))
            .chain(table.foreign_keys.iter().map(|fk| self.foreign_key_sql(fk)))
            .map(|line| format!("    {line}"))
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            table.name, definitions
        )
    }

    pub fn create_database(&self, name: &str) -> Option<String> {
        match self {
            Dialect::MySql => Some(format!("CREATE DATABASE IF NOT EXISTS {name}")),
            Dialect::Sqlite => None,
        }
    }

    pub fn use_database(&self, name: &str) -> Option<String> {
        match self {
            Dialect::MySql => Some(format!("USE {name}")),
            Dialect::Sqlite => None,
        }
    }

    /// Insert-or-ignore for the admin row, keyed on the unique email.
    pub fn insert_admin(&self) -> &'static str {
        match self {
            Dialect::MySql => {
                "INSERT IGNORE INTO admins (username, email, password) VALUES (?, ?, ?)"
            }
            Dialect::Sqlite => {
                "INSERT OR IGNORE INTO admins (username, email, password) VALUES (?, ?, ?)"
            }
        }
    }

    pub fn table_exists(&self) -> &'static str {
        match self {
            Dialect::MySql => {
                "SELECT COUNT(*) FROM information_schema.tables \
                 WHERE table_schema = DATABASE() AND table_name = ?"
            }
            Dialect::Sqlite => "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        }
    }

    pub fn render(&self, tables: &[Table]) -> Vec<TableStatement> {
        tables
            .iter()
            .map(|t| TableStatement {
                name: t.name.to_string(),
                sql: self.create_table(t),
            })
            .collect()
    }
}
