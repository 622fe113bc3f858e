use clap::{Parser, Subcommand};
use coachbill::application::directory::StudentDirectory;
use coachbill::application::ledger::PaymentLedger;
use coachbill::application::sequencer::InvoiceSequencer;
use coachbill::application::workflow::BillingWorkflow;
use coachbill::domain::receipt::BillingForm;
use coachbill::domain::student::Student;
use coachbill::error::BillingError;
use coachbill::infrastructure::in_memory::{
    InMemoryCounterStore, InMemoryPaymentStore, InMemoryStudentStore,
};
use coachbill::infrastructure::sqlite::SqliteStore;
use coachbill::interfaces::csv::student_reader::StudentReader;
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the SQLite database (optional). Uses in-memory storage
    /// when omitted.
    #[arg(long)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a student, or update the record matching their email/phone
    Register {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        alt_phone: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long, default_value = "")]
        course: String,
        #[arg(long, default_value = "")]
        duration: String,
        #[arg(long, default_value = "")]
        joining_date: String,
        #[arg(long, default_value_t = 0)]
        fee: i64,
        #[arg(long, default_value_t = 0)]
        discount: i64,
        #[arg(long, default_value_t = 0)]
        total_installments: u32,
        #[arg(long, default_value = "")]
        salutation: String,
    },
    /// Bulk-register students from a CSV file
    Import {
        /// Input students CSV file
        input: PathBuf,
    },
    /// Search by name, email or phone and print the billing prefill summary
    Search { query: String },
    /// Issue a receipt from a billing form (JSON file, or stdin when omitted)
    Receipt { form: Option<PathBuf> },
    /// Erase all students and payments and reset the invoice counter to 1
    Reset {
        /// Confirm the wipe; without this flag nothing is touched
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let workflow = if let Some(db_path) = &cli.db_path {
        let store = SqliteStore::open(db_path).into_diagnostic()?;
        BillingWorkflow::new(
            StudentDirectory::new(Box::new(store.clone())),
            PaymentLedger::new(Box::new(store.clone())),
            InvoiceSequencer::new(Box::new(store)),
        )
    } else {
        BillingWorkflow::new(
            StudentDirectory::new(Box::new(InMemoryStudentStore::new())),
            PaymentLedger::new(Box::new(InMemoryPaymentStore::new())),
            InvoiceSequencer::new(Box::new(InMemoryCounterStore::new())),
        )
    };

    match cli.command {
        Command::Register {
            name,
            email,
            phone,
            alt_phone,
            address,
            course,
            duration,
            joining_date,
            fee,
            discount,
            total_installments,
            salutation,
        } => {
            let id = workflow
                .register(Student {
                    id: 0,
                    name,
                    address,
                    email,
                    phone,
                    alt_phone,
                    course,
                    duration,
                    joining_date,
                    fee,
                    discount,
                    approved: String::new(),
                    total_installments,
                    salutation,
                })
                .await
                .into_diagnostic()?;
            println!("registered student {id}");
        }
        Command::Import { input } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = StudentReader::new(file);
            let mut imported = 0usize;
            for row in reader.students() {
                match row {
                    Ok(student) => match workflow.register(student).await {
                        Ok(_) => imported += 1,
                        Err(e) => eprintln!("Error registering student: {e}"),
                    },
                    Err(e) => eprintln!("Error reading student: {e}"),
                }
            }
            println!("imported {imported} students");
        }
        Command::Search { query } => match workflow.search(&query).await {
            Ok(summary) => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&summary).into_diagnostic()?
                );
            }
            Err(BillingError::NotFound(message)) => {
                let payload = json!({ "status": "not_found", "query": query, "message": message });
                println!("{payload}");
                std::process::exit(1);
            }
            Err(e) => return Err(e).into_diagnostic(),
        },
        Command::Receipt { form } => {
            let form: BillingForm = match form {
                Some(path) => {
                    let file = File::open(path).into_diagnostic()?;
                    serde_json::from_reader(file).into_diagnostic()?
                }
                None => serde_json::from_reader(io::stdin()).into_diagnostic()?,
            };
            let receipt = workflow.issue_receipt(form).await.into_diagnostic()?;
            println!(
                "{}",
                serde_json::to_string_pretty(&receipt).into_diagnostic()?
            );
        }
        Command::Reset { yes } => {
            if !yes {
                eprintln!("refusing to clear the database without --yes");
                std::process::exit(1);
            }
            workflow.reset().await.into_diagnostic()?;
            println!("reset complete: all students and payments erased, invoice counter back to 1");
        }
    }

    Ok(())
}
