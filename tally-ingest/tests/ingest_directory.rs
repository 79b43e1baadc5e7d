use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook};
use std::fs;
use std::path::Path;
use tally_core::{AdapterUsed, BankId};
use tally_ingest::{IngestOptions, ingest_dir};

const OUTPUT: &str = "Personal_Expense_Tracker.xlsx";

enum V<'a> {
    S(&'a str),
    N(f64),
    /// Excel serial date
    D(f64),
}

fn write_xlsx(path: &Path, rows: &[Vec<V>]) {
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    for (r, row) in rows.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            let (r, c) = (r as u32, c as u16);
            match v {
                V::S("") => {}
                V::S(s) => {
                    ws.write_string(r, c, *s).unwrap();
                }
                V::N(n) => {
                    ws.write_number(r, c, *n).unwrap();
                }
                V::D(serial) => {
                    ws.write_number_with_format(r, c, *serial, &date_format).unwrap();
                }
            }
        }
    }
    wb.save(path).unwrap();
}

fn day(d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, d)
}

/// AXIS with noise rows and a footer, HDFC1 without its header keywords, and an unknown bank.
fn seed_statements(dir: &Path) {
    use V::*;

    write_xlsx(
        &dir.join("918010053388907_axis.xlsx"),
        &[
            vec![S("AXIS BANK LTD")],
            vec![S("Statement of Account No: 918010053388907 for the period")],
            vec![S("Tran Date"), S("CHQNO"), S("PARTICULARS"), S("DR"), S("CR"), S("BAL"), S("SOL")],
            vec![S("01-01-2024"), S(""), S("UPI/P2M/SWIGGY"), S("450.00"), S(""), S("10,550.00"), N(1234.0)],
            vec![S("03-01-2024"), N(789.0), S("NEFT/SALARY"), S(""), S("85,000.00"), S("95,550.00"), N(1234.0)],
            vec![S(""), S(""), S("TRANSACTION TOTAL"), S("450.00"), S("85,000.00"), S("")],
        ],
    );

    write_xlsx(
        &dir.join("Acct_XXXX3895.xlsx"),
        &[
            vec![S("Txn Date"), S("Description"), S("Debit"), S("Credit"), S("Balance")],
            vec![D(45293.0), S("ATM WDL"), N(2000.0), S(""), N(8000.0)],
            vec![D(45296.0), S("INTEREST"), S(""), S("12.50"), S("8,012.50")],
        ],
    );

    write_xlsx(
        &dir.join("statement.xlsx"),
        &[
            vec![S("Date"), S("Narration"), S("Withdrawal"), S("Deposit"), S("Balance")],
            vec![S("04/01/2024"), S("BOOKSTORE"), S("(120.00)"), S(""), S("4,880.00")],
        ],
    );
}

#[test]
fn test_three_banks_with_hdfc_fallback() {
    let dir = tempfile::tempdir().unwrap();
    seed_statements(dir.path());

    let ingestion = ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT)
        .unwrap()
        .expect("three readable files");

    assert_eq!(ingestion.log.len(), 3);
    assert!(ingestion.skipped.is_empty());

    let banks: Vec<BankId> = ingestion.log.iter().map(|e| e.bank).collect();
    assert_eq!(banks, vec![BankId::Axis, BankId::Hdfc1, BankId::Unknown]);

    let axis = &ingestion.log[0];
    assert_eq!(axis.adapter, AdapterUsed::Bank);
    assert_eq!((axis.rows_parsed, axis.rows_dropped), (2, 1));

    let hdfc = &ingestion.log[1];
    assert_eq!(hdfc.bank, BankId::Hdfc1);
    assert_eq!(hdfc.adapter, AdapterUsed::Fallback);
    assert!(hdfc.fallback_reason.is_some());
    assert_eq!((hdfc.rows_parsed, hdfc.rows_dropped), (2, 0));

    let unknown = &ingestion.log[2];
    assert_eq!(unknown.adapter, AdapterUsed::Fallback);
    assert_eq!(unknown.fallback_reason, None);

    let ledger = ingestion.ledger.transactions();
    assert_eq!(ledger.len(), 5);

    let dates: Vec<_> = ledger.iter().map(|t| t.date).collect();
    assert_eq!(dates, vec![day(1), day(2), day(3), day(4), day(5)]);

    let order: Vec<BankId> = ledger.iter().map(|t| t.bank).collect();
    assert_eq!(
        order,
        vec![BankId::Axis, BankId::Hdfc1, BankId::Axis, BankId::Unknown, BankId::Hdfc1]
    );

    assert_eq!(ledger[0].debit, Some(450.0));
    assert_eq!(ledger[0].balance, Some(10_550.0));
    assert_eq!(ledger[1].description, "ATM WDL");
    assert_eq!(ledger[2].credit, Some(85_000.0));
    assert_eq!(ledger[2].reference.as_deref(), Some("789"));
    assert_eq!(ledger[3].description, "BOOKSTORE");
    assert_eq!(ledger[3].debit, Some(-120.0));
    assert_eq!(ledger[4].credit, Some(12.5));
}

#[test]
fn test_rerun_is_identical() {
    let dir = tempfile::tempdir().unwrap();
    seed_statements(dir.path());

    let first = ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT).unwrap().unwrap();
    let second = ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT).unwrap().unwrap();
    assert_eq!(first.ledger, second.ledger);
    assert_eq!(first.log, second.log);
}

#[test]
fn test_corrupt_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    seed_statements(dir.path());
    fs::write(dir.path().join("icici_corrupt.xlsx"), b"garbage").unwrap();

    let ingestion = ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT).unwrap().unwrap();
    assert_eq!(ingestion.log.len(), 3);
    assert_eq!(ingestion.skipped.len(), 1);
    assert_eq!(ingestion.skipped[0].file, "icici_corrupt.xlsx");
    assert_eq!(ingestion.ledger.len(), 5);
}

#[test]
fn test_output_artifact_is_not_an_input() {
    let dir = tempfile::tempdir().unwrap();
    seed_statements(dir.path());
    write_xlsx(
        &dir.path().join(OUTPUT),
        &[
            vec![V::S("Date"), V::S("Description")],
            vec![V::S("09/01/2024"), V::S("already consolidated")],
        ],
    );

    let ingestion = ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT).unwrap().unwrap();
    assert_eq!(ingestion.log.len(), 3);
}

#[test]
fn test_no_inputs_yields_nothing() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT).unwrap().is_none());

    fs::write(dir.path().join("axis_bad.xlsx"), b"garbage").unwrap();
    assert!(ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT).unwrap().is_none());
}

#[test]
fn test_icici_csv_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut text = String::new();
    for i in 0..5 {
        text.push_str(&format!("Disclaimer {i}\n"));
    }
    text.push_str("S No.,Value Date,Transaction Date,Cheque Number,Transaction Remarks,Withdrawal Amount (INR ),Deposit Amount (INR ),Balance (INR )\n");
    text.push_str("1,10/01/2024,10/01/2024,-,UPI/RENT,\"15,000.00\",0.00,\"42,000.00\"\n");
    text.push_str("2,11/01/2024,11/01/2024,-,NEFT/REFUND,0.00,250.00,\"42,250.00\"\n");
    text.push_str("Legends Used in Account Statement\n");
    fs::write(dir.path().join("OpTransactionHistory11-01-2024.csv"), text).unwrap();

    let opts = IngestOptions {
        extensions: vec!["csv".to_string()],
        ..IngestOptions::default()
    };
    let ingestion = ingest_dir(dir.path(), &opts, OUTPUT).unwrap().unwrap();

    let entry = &ingestion.log[0];
    assert_eq!(entry.bank, BankId::Icici);
    assert_eq!(entry.adapter, AdapterUsed::Bank);
    assert_eq!((entry.rows_parsed, entry.rows_dropped), (2, 1));

    let ledger = ingestion.ledger.transactions();
    assert_eq!(ledger[0].description, "UPI/RENT");
    assert_eq!(ledger[0].debit, Some(15_000.0));
    assert_eq!(ledger[0].date, day(10));
    assert_eq!(ledger[1].credit, Some(250.0));
    assert_eq!(ledger[1].reference.as_deref(), Some("-"));
}

#[test]
fn test_unknown_bank_with_blank_first_row() {
    use V::*;
    let dir = tempfile::tempdir().unwrap();
    write_xlsx(
        &dir.path().join("statement.xlsx"),
        &[
            vec![S("")],
            vec![S("Date"), S("Description"), S("Debit"), S("Credit"), S("Balance")],
            vec![S("07/01/2024"), S("PHARMACY"), S("310.00"), S(""), S("4,570.00")],
        ],
    );

    let ingestion = ingest_dir(dir.path(), &IngestOptions::default(), OUTPUT).unwrap().unwrap();
    let entry = &ingestion.log[0];
    assert_eq!(entry.bank, BankId::Unknown);
    assert_eq!((entry.rows_parsed, entry.rows_dropped), (1, 0));

    let ledger = ingestion.ledger.transactions();
    assert_eq!(ledger[0].date, day(7));
    assert_eq!(ledger[0].description, "PHARMACY");
    assert_eq!(ledger[0].debit, Some(310.0));
}
