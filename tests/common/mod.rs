use std::fs::File;
use std::io::{Error, Write};
use std::path::Path;

pub fn write_form_json(
    path: &Path,
    email: &str,
    paid_amount: i64,
    invoice_date: &str,
) -> Result<(), Error> {
    let mut file = File::create(path)?;
    write!(
        file,
        r#"{{
            "name": "Asha Rao",
            "email": "{email}",
            "phone": "9876543210",
            "course": "Data Science",
            "invoice_date": "{invoice_date}",
            "joining_date": "2025-01-01",
            "fee": 10000,
            "discount": 1000,
            "paid_amount": {paid_amount},
            "already_paid": 0,
            "total_installments": 3
        }}"#
    )?;
    Ok(())
}

pub fn write_students_csv(path: &Path, rows: &[(&str, &str, &str)]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(["name", "email", "phone", "course", "fee"])?;
    for (name, email, phone) in rows {
        wtr.write_record([name, email, phone, "Data Science", "10000"])?;
    }

    wtr.flush()?;
    Ok(())
}
