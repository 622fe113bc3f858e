use crate::domain::invoice::InvoiceId;
use crate::domain::payment::Payment;
use crate::domain::ports::{CounterStore, PaymentStore, StudentStore};
use crate::domain::student::{Student, StudentId};
use crate::error::{BillingError, Result};
use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A persistent store backed by SQLite.
///
/// Implements all three storage ports over a single database file, so one
/// opened handle can be boxed once per port (`Clone` shares the underlying
/// connection). The schema is created on open.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens or creates the database at the given path and ensures the
    /// students, payments and invoice-counter tables exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS students (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                address TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                phone TEXT NOT NULL DEFAULT '',
                alt_phone TEXT NOT NULL DEFAULT '',
                course TEXT NOT NULL DEFAULT '',
                duration TEXT NOT NULL DEFAULT '',
                joining_date TEXT NOT NULL DEFAULT '',
                fee INTEGER NOT NULL DEFAULT 0,
                discount INTEGER NOT NULL DEFAULT 0,
                approved TEXT NOT NULL DEFAULT '',
                total_installments INTEGER NOT NULL DEFAULT 0,
                salutation TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS payments (
                id INTEGER PRIMARY KEY,
                student_id INTEGER NOT NULL REFERENCES students(id),
                invoice TEXT NOT NULL,
                amount INTEGER NOT NULL,
                date TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS invoice_counter (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                value INTEGER NOT NULL
            );",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-process database that vanishes on drop. Test helper.
    pub fn open_in_memory() -> Result<Self> {
        Self::open(":memory:")
    }
}

fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get("id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        alt_phone: row.get("alt_phone")?,
        course: row.get("course")?,
        duration: row.get("duration")?,
        joining_date: row.get("joining_date")?,
        fee: row.get("fee")?,
        discount: row.get("discount")?,
        approved: row.get("approved")?,
        total_installments: row.get("total_installments")?,
        salutation: row.get("salutation")?,
    })
}

fn row_to_payment(row: &Row<'_>) -> rusqlite::Result<Payment> {
    let invoice: String = row.get("invoice")?;
    Ok(Payment {
        id: row.get("id")?,
        student: row.get("student_id")?,
        invoice: InvoiceId::from_raw(invoice),
        amount: row.get("amount")?,
        date: row.get("date")?,
    })
}

const STUDENT_COLUMNS: &str = "id, name, address, email, phone, alt_phone, course, duration, \
     joining_date, fee, discount, approved, total_installments, salutation";

#[async_trait]
impl StudentStore for SqliteStore {
    async fn insert(&self, student: Student) -> Result<StudentId> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO students (name, address, email, phone, alt_phone, course, duration, \
             joining_date, fee, discount, approved, total_installments, salutation) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                student.name,
                student.address,
                student.email,
                student.phone,
                student.alt_phone,
                student.course,
                student.duration,
                student.joining_date,
                student.fee,
                student.discount,
                student.approved,
                student.total_installments,
                student.salutation,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn update(&self, student: Student) -> Result<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE students SET name = ?2, address = ?3, email = ?4, phone = ?5, \
             alt_phone = ?6, course = ?7, duration = ?8, joining_date = ?9, fee = ?10, \
             discount = ?11, approved = ?12, total_installments = ?13, salutation = ?14 \
             WHERE id = ?1",
            params![
                student.id,
                student.name,
                student.address,
                student.email,
                student.phone,
                student.alt_phone,
                student.course,
                student.duration,
                student.joining_date,
                student.fee,
                student.discount,
                student.approved,
                student.total_installments,
                student.salutation,
            ],
        )?;
        if changed == 0 {
            return Err(BillingError::Storage(format!(
                "no student row with id {}",
                student.id
            )));
        }
        Ok(())
    }

    async fn get(&self, id: StudentId) -> Result<Option<Student>> {
        let conn = self.conn.lock().await;
        let found = conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
                params![id],
                row_to_student,
            )
            .optional()?;
        Ok(found)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Student>> {
        if email.is_empty() {
            return Ok(None);
        }
        let conn = self.conn.lock().await;
        let found = conn
            .query_row(
                &format!(
                    "SELECT {STUDENT_COLUMNS} FROM students \
                     WHERE email <> '' AND lower(email) = lower(?1) ORDER BY id LIMIT 1"
                ),
                params![email],
                row_to_student,
            )
            .optional()?;
        Ok(found)
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Student>> {
        if phone.is_empty() {
            return Ok(None);
        }
        let conn = self.conn.lock().await;
        let found = conn
            .query_row(
                &format!(
                    "SELECT {STUDENT_COLUMNS} FROM students \
                     WHERE phone <> '' AND phone = ?1 ORDER BY id LIMIT 1"
                ),
                params![phone],
                row_to_student,
            )
            .optional()?;
        Ok(found)
    }

    async fn all(&self) -> Result<Vec<Student>> {
        let conn = self.conn.lock().await;
        let mut stmt =
            conn.prepare(&format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_student)?;
        let mut students = Vec::new();
        for row in rows {
            students.push(row?);
        }
        Ok(students)
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM students", [])?;
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for SqliteStore {
    async fn append(&self, payment: Payment) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO payments (student_id, invoice, amount, date) VALUES (?1, ?2, ?3, ?4)",
            params![
                payment.student,
                payment.invoice.as_str(),
                payment.amount,
                payment.date
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn for_student(&self, student: StudentId) -> Result<Vec<Payment>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, student_id, invoice, amount, date FROM payments \
             WHERE student_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![student], row_to_payment)?;
        let mut payments = Vec::new();
        for row in rows {
            payments.push(row?);
        }
        Ok(payments)
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM payments", [])?;
        Ok(())
    }
}

#[async_trait]
impl CounterStore for SqliteStore {
    async fn load(&self) -> Result<u64> {
        let conn = self.conn.lock().await;
        let value: Option<i64> = conn
            .query_row(
                "SELECT value FROM invoice_counter WHERE id = 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            Some(v) if v >= 1 => Ok(v as u64),
            Some(v) => Err(BillingError::Storage(format!(
                "invoice counter corrupt: {v}"
            ))),
            None => {
                conn.execute("INSERT INTO invoice_counter (id, value) VALUES (1, 1)", [])?;
                Ok(1)
            }
        }
    }

    async fn save(&self, value: u64) -> Result<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO invoice_counter (id, value) VALUES (1, ?1) \
             ON CONFLICT(id) DO UPDATE SET value = excluded.value",
            params![value as i64],
        )?;
        Ok(())
    }
}
