//! Key/value slots over the `storage` table. Each slot holds one whole
//! document that is read and overwritten in full.

use rusqlite::{Connection, OptionalExtension};

pub fn get_item(conn: &Connection, key: &str) -> Result<Option<String>, String> {
    conn.query_row("SELECT value FROM storage WHERE key = ?1", [key], |row| {
        row.get::<_, String>(0)
    })
    .optional()
    .map_err(|e| format!("Failed to read storage slot '{}': {}", key, e))
}

pub fn set_item(conn: &Connection, key: &str, value: &str) -> Result<(), String> {
    conn.execute(
        "INSERT INTO storage (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        [key, value],
    )
    .map_err(|e| format!("Failed to write storage slot '{}': {}", key, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_test_connection;

    #[test]
    fn test_get_item_absent() {
        let conn = establish_test_connection().unwrap();
        assert_eq!(get_item(&conn, "transactions").unwrap(), None);
    }

    #[test]
    fn test_set_item_overwrites() {
        let conn = establish_test_connection().unwrap();
        set_item(&conn, "transactions", "[1]").unwrap();
        set_item(&conn, "transactions", "[2]").unwrap();

        assert_eq!(get_item(&conn, "transactions").unwrap().as_deref(), Some("[2]"));
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM storage", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_get_item_without_table_errors() {
        let conn = Connection::open_in_memory().unwrap();
        let result = get_item(&conn, "transactions");
        assert!(result.unwrap_err().contains("Failed to read storage slot"));
    }
}
