use crate::db::storage;
use crate::models::transaction::Transaction;
use rusqlite::Connection;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const TRANSACTIONS_KEY: &str = "transactions";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Transaction with ID {0} already exists")]
    DuplicateId(String),
    #[error("Failed to serialize transactions: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Persist(String),
}

/// The in-memory transaction collection and its persisted copy.
///
/// Every mutation rewrites the whole collection into the storage slot.
pub struct RecordStore {
    conn: Connection,
    transactions: Vec<Transaction>,
}

impl RecordStore {
    pub fn open(conn: Connection) -> Self {
        let transactions = load(&conn);
        info!(count = transactions.len(), "Loaded transactions");
        Self { conn, transactions }
    }

    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn add(&mut self, transaction: Transaction) -> Result<(), StoreError> {
        if self.get(&transaction.id).is_some() {
            return Err(StoreError::DuplicateId(transaction.id));
        }
        debug!(id = %transaction.id, "Adding transaction");
        self.transactions.push(transaction);
        self.save()
    }

    /// Removes the transaction with `id`. Returns false, without touching
    /// storage, when no such transaction exists.
    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            debug!(id, "Remove requested for unknown transaction");
            return Ok(false);
        };
        self.transactions.remove(pos);
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<(), StoreError> {
        let document = serde_json::to_string(&self.transactions)?;
        storage::set_item(&self.conn, TRANSACTIONS_KEY, &document).map_err(StoreError::Persist)
    }
}

/// Reads the persisted collection. A missing slot, a read failure or a
/// document that does not parse all count as no data.
pub fn load(conn: &Connection) -> Vec<Transaction> {
    let document = match storage::get_item(conn, TRANSACTIONS_KEY) {
        Ok(Some(document)) => document,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(error = %e, "Could not read stored transactions");
            return Vec::new();
        }
    };

    let parsed: Vec<Transaction> = match serde_json::from_str(&document) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(error = %e, "Stored transactions are unreadable, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    parsed
        .into_iter()
        .filter(|t| {
            let fresh = seen.insert(t.id.clone());
            if !fresh {
                warn!(id = %t.id, "Dropping stored transaction with duplicate id");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::{establish_connection, establish_test_connection};
    use crate::models::transaction::{NewTransaction, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn create_test_transaction(amount: i64, transaction_type: TransactionType, category: &str) -> Transaction {
        Transaction::create(
            NewTransaction {
                name: "Test Transaction".to_string(),
                amount: Decimal::new(amount, 0),
                transaction_type,
                category: category.to_string(),
                date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            },
            1_736_899_200_000,
        )
        .unwrap()
    }

    #[test]
    fn test_open_empty_storage() {
        let store = RecordStore::open(establish_test_connection().unwrap());
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_open_corrupt_storage() {
        let conn = establish_test_connection().unwrap();
        storage::set_item(&conn, TRANSACTIONS_KEY, "{not json").unwrap();
        let store = RecordStore::open(conn);
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_open_structurally_incompatible_storage() {
        let conn = establish_test_connection().unwrap();
        storage::set_item(&conn, TRANSACTIONS_KEY, r#"{"transactions": []}"#).unwrap();
        assert!(RecordStore::open(conn).all().is_empty());

        let conn = establish_test_connection().unwrap();
        storage::set_item(&conn, TRANSACTIONS_KEY, r#"[{"id": "1", "name": "x"}]"#).unwrap();
        assert!(RecordStore::open(conn).all().is_empty());
    }

    #[test]
    fn test_add_persists_full_collection() {
        let conn = establish_test_connection().unwrap();
        let mut store = RecordStore::open(conn);
        store.add(create_test_transaction(1000, TransactionType::Income, "Salary")).unwrap();
        store.add(create_test_transaction(400, TransactionType::Expense, "Food")).unwrap();

        let reloaded = load(&store.conn);
        assert_eq!(reloaded, store.all());
    }

    #[test]
    fn test_add_duplicate_id() {
        let mut store = RecordStore::open(establish_test_connection().unwrap());
        let tx = create_test_transaction(10, TransactionType::Expense, "Food");
        store.add(tx.clone()).unwrap();

        let result = store.add(tx);
        assert!(matches!(result, Err(StoreError::DuplicateId(_))));
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn test_remove_existing() {
        let mut store = RecordStore::open(establish_test_connection().unwrap());
        let keep = create_test_transaction(10, TransactionType::Expense, "Food");
        let drop = create_test_transaction(20, TransactionType::Expense, "Housing");
        store.add(keep.clone()).unwrap();
        store.add(drop.clone()).unwrap();

        assert!(store.remove(&drop.id).unwrap());
        assert_eq!(store.all(), &[keep.clone()]);
        assert_eq!(load(&store.conn), vec![keep]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = RecordStore::open(establish_test_connection().unwrap());
        store.add(create_test_transaction(10, TransactionType::Expense, "Food")).unwrap();
        let before = store.all().to_vec();

        assert!(!store.remove("does-not-exist").unwrap());
        assert_eq!(store.all(), before.as_slice());
    }

    #[test]
    fn test_add_remove_sequence_keeps_survivors_unique() {
        let mut store = RecordStore::open(establish_test_connection().unwrap());
        let mut expected = Vec::new();
        for i in 0..6 {
            let tx = create_test_transaction(i + 1, TransactionType::Expense, "Other");
            store.add(tx.clone()).unwrap();
            expected.push(tx);
        }
        let victims = [expected[1].id.clone(), expected[4].id.clone()];
        for victim in victims.iter().chain(victims.iter()) {
            store.remove(victim).unwrap();
        }
        expected.retain(|t| !victims.contains(&t.id));

        let ids: HashSet<&str> = store.all().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), store.all().len());
        assert_eq!(store.all(), expected.as_slice());
    }

    #[test]
    fn test_removing_last_transaction_keeps_empty_slot() {
        let mut store = RecordStore::open(establish_test_connection().unwrap());
        let tx = create_test_transaction(10, TransactionType::Expense, "Food");
        store.add(tx.clone()).unwrap();
        assert!(store.remove(&tx.id).unwrap());

        let slot = storage::get_item(&store.conn, TRANSACTIONS_KEY).unwrap();
        assert_eq!(slot.as_deref(), Some("[]"));
    }

    #[test]
    fn test_persist_failure_keeps_mutation_in_memory() {
        let mut store = RecordStore::open(establish_test_connection().unwrap());
        let first = create_test_transaction(10, TransactionType::Expense, "Food");
        store.add(first.clone()).unwrap();
        store.conn.execute("DROP TABLE storage", []).unwrap();

        let second = create_test_transaction(20, TransactionType::Income, "Gifts");
        let result = store.add(second.clone());
        assert!(matches!(result, Err(StoreError::Persist(_))));
        assert_eq!(store.all(), &[first.clone(), second.clone()]);

        let result = store.remove(&first.id);
        assert!(matches!(result, Err(StoreError::Persist(_))));
        assert_eq!(store.all(), &[second]);
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let conn = establish_test_connection().unwrap();
        let tx = create_test_transaction(10, TransactionType::Expense, "Food");
        let doc = serde_json::to_string(&vec![tx.clone(), tx.clone()]).unwrap();
        storage::set_item(&conn, TRANSACTIONS_KEY, &doc).unwrap();

        assert_eq!(load(&conn), vec![tx]);
    }

    #[test]
    fn test_round_trip_through_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fintrack.db");

        let written = {
            let mut store = RecordStore::open(establish_connection(&path).unwrap());
            store.add(create_test_transaction(1000, TransactionType::Income, "Salary")).unwrap();
            store.add(create_test_transaction(75, TransactionType::Expense, "Utilities")).unwrap();
            store.all().to_vec()
        };

        let reopened = RecordStore::open(establish_connection(&path).unwrap());
        assert_eq!(reopened.all(), written.as_slice());
    }
}
