use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;
use scylla::batch::{Batch, BatchType};
use scylla::prepared_statement::PreparedStatement;
use scylla::statement::Consistency;
use scylla::{Session, SessionBuilder};

mod common;
mod data_generator;

use common::{
    account_number, generate_from_options_with_rng, group_digits, posted_date_string,
};
use data_generator::{generate_transaction_record, TransactionRecord};

// Connection settings
const CASSANDRA_HOST: &str = "localhost";
const CASSANDRA_PORT: u16 = 9043;
const KEYSPACE: &str = "transaction_datastore";
const TABLE: &str = "dda_pstd_fincl_txn_cnsmr_by_accntnbr";

// Test data parameters
const TOTAL_RECORDS: usize = 250_000;
const BATCH_SIZE: usize = 100;
const ACCOUNTS_PER_COMPANY: usize = 50;
const COMPANIES: [&str; 5] = ["COMP001", "COMP002", "COMP003", "COMP004", "COMP005"];
const PRODUCTS: [&str; 3] = ["PRD001", "PRD002", "PRD003"];

const DATE_WINDOW_DAYS: usize = 30;
const PROGRESS_INTERVAL: usize = 10_000;

/// Records each account receives in the structured phase. Truncating division
/// can leave a shortfall that the fallback loop tops up.
fn records_per_account(total_records: usize, companies: usize, accounts_per_company: usize) -> usize {
    (total_records / (companies * accounts_per_company)).max(1)
}

async fn prepare_insert(session: &Session) -> Result<PreparedStatement> {
    let statement = format!(
        "INSERT INTO {TABLE} (\
         cmpny_id, accnt_nbr, prdct_cde, pstd_dt, txn_seq, \
         accnt_id, accnt_nbr_hash, accnt_bal, avail_bal, \
         txn_amt, taxbl_pmt_amt, tot_pmt_amt, prncpl_amt, \
         txn_id, txn_uid, txn_cde, txn_typ, txn_status, txn_desc, txn_drctn, \
         txn_crncy_cde, pstd_ts, txn_ts, pnt_of_sale_ts, \
         sub_prdct_cde, src_nm, ref_nbr, \
         enrchd_merch_nm, enrchd_merch_loc_city, enrchd_merch_loc_ste, \
         z_audit_crtd_by_txt, z_audit_evnt_id, z_audit_crtd_ts) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, \
         ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    );
    let prepared = session
        .prepare(statement)
        .await
        .context("failed to prepare insert statement")?;
    info!("prepared insert statement for {TABLE}");
    Ok(prepared)
}

/// Submit one batch group at consistency ONE. The caller hands over the
/// accumulator, so a fresh one replaces it after every submission.
async fn submit_batch(
    session: &Session,
    insert: &PreparedStatement,
    rows: Vec<TransactionRecord>,
) -> Result<()> {
    let mut batch = Batch::new(BatchType::Logged);
    batch.set_consistency(Consistency::One);
    for _ in 0..rows.len() {
        batch.append_statement(insert.clone());
    }
    debug!("submitting batch of {} records", rows.len());
    session.batch(&batch, rows).await?;
    Ok(())
}

fn report_progress(record_count: usize, start: Instant) {
    let rate = record_count as f64 / start.elapsed().as_secs_f64();
    println!(
        "  Inserted {} records ({:.0} records/sec)",
        group_digits(record_count as i64),
        rate
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    println!("Connecting to Cassandra at {CASSANDRA_HOST}:{CASSANDRA_PORT}");
    let session = SessionBuilder::new()
        .known_node(format!("{CASSANDRA_HOST}:{CASSANDRA_PORT}"))
        .use_keyspace(KEYSPACE, false)
        .build()
        .await?;
    info!("connected, keyspace {KEYSPACE}");

    let insert = prepare_insert(&session).await?;

    println!("Generating {TOTAL_RECORDS} records...");
    let start = Instant::now();
    let mut rng = rand::thread_rng();

    let mut record_count = 0usize;
    let mut batch_rows: Vec<TransactionRecord> = Vec::with_capacity(BATCH_SIZE);

    // Generate records across multiple companies, accounts, and dates
    let base_date = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    let per_account = records_per_account(TOTAL_RECORDS, COMPANIES.len(), ACCOUNTS_PER_COMPANY);

    'structured: for (company_idx, company_id) in COMPANIES.iter().enumerate() {
        for account_idx in 0..ACCOUNTS_PER_COMPANY {
            let account_num = account_number(company_idx * ACCOUNTS_PER_COMPANY + account_idx + 1);
            let product_code = generate_from_options_with_rng(&PRODUCTS, &mut rng);

            for txn_idx in 0..per_account {
                if record_count >= TOTAL_RECORDS {
                    break 'structured;
                }

                // Distribute across the 30-day window by cycling the offset
                let posted_date =
                    posted_date_string(base_date, (txn_idx % DATE_WINDOW_DAYS) as i64);
                let txn_seq = format!("SEQ{:06}", txn_idx + 1);

                batch_rows.push(generate_transaction_record(
                    &mut rng,
                    company_id,
                    &account_num,
                    &product_code,
                    &posted_date,
                    &txn_seq,
                ));
                record_count += 1;

                if batch_rows.len() >= BATCH_SIZE {
                    let rows =
                        std::mem::replace(&mut batch_rows, Vec::with_capacity(BATCH_SIZE));
                    submit_batch(&session, &insert, rows).await?;
                    if record_count % PROGRESS_INTERVAL == 0 {
                        report_progress(record_count, start);
                    }
                }
            }
        }
    }

    // Top up with fully random records if the structured phase fell short
    while record_count < TOTAL_RECORDS {
        let company_id = generate_from_options_with_rng(&COMPANIES, &mut rng);
        let account_num =
            account_number(rng.gen_range(1..=COMPANIES.len() * ACCOUNTS_PER_COMPANY));
        let product_code = generate_from_options_with_rng(&PRODUCTS, &mut rng);
        let posted_date =
            posted_date_string(base_date, rng.gen_range(0..DATE_WINDOW_DAYS) as i64);
        let txn_seq = format!("SEQ{:06}", record_count + 1);

        batch_rows.push(generate_transaction_record(
            &mut rng,
            &company_id,
            &account_num,
            &product_code,
            &posted_date,
            &txn_seq,
        ));
        record_count += 1;

        if batch_rows.len() >= BATCH_SIZE {
            let rows = std::mem::replace(&mut batch_rows, Vec::with_capacity(BATCH_SIZE));
            submit_batch(&session, &insert, rows).await?;
            if record_count % PROGRESS_INTERVAL == 0 {
                report_progress(record_count, start);
            }
        }
    }

    // Flush the final partial batch
    if !batch_rows.is_empty() {
        submit_batch(&session, &insert, batch_rows).await?;
    }

    let elapsed = start.elapsed().as_secs_f64();
    let rate = record_count as f64 / elapsed;

    println!();
    println!(
        "✅ Successfully inserted {} records",
        group_digits(record_count as i64)
    );
    println!("   Time: {elapsed:.2} seconds");
    println!("   Rate: {rate:.0} records/second");

    // Verify count
    let (count,) = session
        .query(format!("SELECT COUNT(*) FROM {TABLE}"), ())
        .await
        .context("verification count query failed")?
        .single_row_typed::<(i64,)>()?;
    println!();
    println!("✅ Verified: {} records in table", group_digits(count));

    Ok(())
}
