// ABOUTME: Fixed set of tables carried from SQLite to D1
// ABOUTME: Shared by the export and verify commands so both always agree on the table list

use std::fmt;

/// A table migrated from the local SQLite database to D1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MigrationTable {
    Bgg,
    Notes,
    Log,
    SavedQueries,
}

impl MigrationTable {
    /// Every migrated table, in the order they are exported and verified
    pub const ALL: [MigrationTable; 4] = [
        MigrationTable::Bgg,
        MigrationTable::Notes,
        MigrationTable::Log,
        MigrationTable::SavedQueries,
    ];

    /// SQL name of the table, identical on both sides of the migration
    pub fn as_str(&self) -> &'static str {
        match self {
            MigrationTable::Bgg => "bgg",
            MigrationTable::Notes => "notes",
            MigrationTable::Log => "log",
            MigrationTable::SavedQueries => "saved_queries",
        }
    }

    /// Name of the exported statement file for this table
    pub fn file_name(&self) -> String {
        format!("{}.sql", self.as_str())
    }
}

impl fmt::Display for MigrationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
