use chrono::{DateTime, Utc};
use rand::Rng;
use scylla::SerializeRow;

use crate::common::{
    generate_from_options_with_rng, generate_prefixed_id_with_rng, round_to_cents,
};

pub const MERCHANTS: [&str; 8] = [
    "Walmart",
    "Amazon",
    "Shell",
    "Starbucks",
    "CVS",
    "Whole Foods",
    "Target",
    "Best Buy",
];
pub const TRANSACTION_STATUSES: [&str; 3] = ["COMPLETED", "PENDING", "FAILED"];
pub const MERCHANT_CITIES: [&str; 5] = [
    "San Francisco",
    "Oakland",
    "Palo Alto",
    "Berkeley",
    "San Jose",
];

/// One synthetic row for the consumer posted-transactions table. Field names
/// match the table's column names so the prepared INSERT binds by name.
#[derive(Debug, Clone, SerializeRow)]
pub struct TransactionRecord {
    pub cmpny_id: String,
    pub accnt_nbr: String,
    pub prdct_cde: String,
    pub pstd_dt: String,
    pub txn_seq: String,
    pub accnt_id: String,
    pub accnt_nbr_hash: String,
    pub accnt_bal: f64,
    pub avail_bal: f64,
    pub txn_amt: f64,
    pub taxbl_pmt_amt: f64,
    pub tot_pmt_amt: f64,
    pub prncpl_amt: f64,
    pub txn_id: String,
    pub txn_uid: String,
    pub txn_cde: String,
    pub txn_typ: String,
    pub txn_status: String,
    pub txn_desc: String,
    pub txn_drctn: String,
    pub txn_crncy_cde: String,
    pub pstd_ts: DateTime<Utc>,
    pub txn_ts: DateTime<Utc>,
    pub pnt_of_sale_ts: DateTime<Utc>,
    pub sub_prdct_cde: String,
    pub src_nm: String,
    pub ref_nbr: String,
    pub enrchd_merch_nm: String,
    pub enrchd_merch_loc_city: String,
    pub enrchd_merch_loc_ste: String,
    pub z_audit_crtd_by_txt: String,
    pub z_audit_evnt_id: String,
    pub z_audit_crtd_ts: DateTime<Utc>,
}

/// Generate a single transaction record. The amount is drawn uniformly from
/// [-1000, 1000]; a negative amount marks the row as CREDIT, everything else
/// as DEBIT, and both txn_typ and txn_drctn carry that value.
pub fn generate_transaction_record<R: Rng>(
    rng: &mut R,
    company_id: &str,
    account_num: &str,
    product_code: &str,
    posted_date: &str,
    txn_seq: &str,
) -> TransactionRecord {
    let txn_amt = round_to_cents(rng.gen_range(-1000.0..=1000.0));
    let txn_type = if txn_amt < 0.0 { "CREDIT" } else { "DEBIT" };
    let now = Utc::now();

    TransactionRecord {
        cmpny_id: company_id.to_string(),
        accnt_nbr: account_num.to_string(),
        prdct_cde: product_code.to_string(),
        pstd_dt: posted_date.to_string(),
        txn_seq: txn_seq.to_string(),
        accnt_id: format!("ACC_ID_{account_num}"),
        accnt_nbr_hash: format!("HASH{account_num}"),
        accnt_bal: round_to_cents(rng.gen_range(1000.0..=10000.0)),
        avail_bal: round_to_cents(rng.gen_range(500.0..=9500.0)),
        txn_amt,
        taxbl_pmt_amt: if txn_amt > 0.0 { txn_amt.abs() } else { 0.0 },
        tot_pmt_amt: txn_amt.abs(),
        prncpl_amt: txn_amt.abs(),
        txn_id: generate_prefixed_id_with_rng("TXN", 100_000, 999_999, rng),
        txn_uid: generate_prefixed_id_with_rng("UID", 100_000, 999_999, rng),
        txn_cde: generate_prefixed_id_with_rng("TXN_CODE_", 1, 100, rng),
        txn_typ: txn_type.to_string(),
        txn_status: generate_from_options_with_rng(&TRANSACTION_STATUSES, rng),
        txn_desc: generate_from_options_with_rng(&MERCHANTS, rng),
        txn_drctn: txn_type.to_string(),
        txn_crncy_cde: "USD".to_string(),
        pstd_ts: now,
        txn_ts: now,
        pnt_of_sale_ts: now,
        sub_prdct_cde: generate_prefixed_id_with_rng("SUB_PRD_", 1, 10, rng),
        src_nm: generate_prefixed_id_with_rng("SOURCE_", 1, 10, rng),
        ref_nbr: generate_prefixed_id_with_rng("REF", 100_000, 999_999, rng),
        enrchd_merch_nm: generate_from_options_with_rng(&MERCHANTS, rng),
        enrchd_merch_loc_city: generate_from_options_with_rng(&MERCHANT_CITIES, rng),
        enrchd_merch_loc_ste: "CA".to_string(),
        z_audit_crtd_by_txt: "SYSTEM".to_string(),
        z_audit_evnt_id: generate_prefixed_id_with_rng("EVT", 100_000, 999_999, rng),
        z_audit_crtd_ts: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn sample_record<R: Rng>(rng: &mut R) -> TransactionRecord {
        generate_transaction_record(rng, "COMP001", "ACC0001", "PRD001", "2024-12-01", "SEQ000001")
    }

    #[test]
    fn transaction_type_follows_amount_sign() {
        let mut rng = thread_rng();
        for _ in 0..500 {
            let record = sample_record(&mut rng);
            assert!((-1000.0..=1000.0).contains(&record.txn_amt));
            let expected = if record.txn_amt < 0.0 { "CREDIT" } else { "DEBIT" };
            assert_eq!(record.txn_typ, expected);
            assert_eq!(record.txn_drctn, record.txn_typ);
        }
    }

    #[test]
    fn derived_amounts_match_transaction_amount() {
        let mut rng = thread_rng();
        for _ in 0..500 {
            let record = sample_record(&mut rng);
            assert_eq!(record.tot_pmt_amt, record.txn_amt.abs());
            assert_eq!(record.prncpl_amt, record.txn_amt.abs());
            if record.txn_amt > 0.0 {
                assert_eq!(record.taxbl_pmt_amt, record.txn_amt);
            } else {
                assert_eq!(record.taxbl_pmt_amt, 0.0);
            }
        }
    }

    #[test]
    fn key_fields_carry_caller_values() {
        let mut rng = thread_rng();
        let record = sample_record(&mut rng);
        assert_eq!(record.cmpny_id, "COMP001");
        assert_eq!(record.accnt_nbr, "ACC0001");
        assert_eq!(record.prdct_cde, "PRD001");
        assert_eq!(record.pstd_dt, "2024-12-01");
        assert_eq!(record.txn_seq, "SEQ000001");
        assert_eq!(record.accnt_id, "ACC_ID_ACC0001");
        assert_eq!(record.accnt_nbr_hash, "HASHACC0001");
    }

    #[test]
    fn enrichment_fields_come_from_fixed_pools() {
        let mut rng = thread_rng();
        for _ in 0..100 {
            let record = sample_record(&mut rng);
            assert!(MERCHANTS.contains(&record.txn_desc.as_str()));
            assert!(MERCHANTS.contains(&record.enrchd_merch_nm.as_str()));
            assert!(MERCHANT_CITIES.contains(&record.enrchd_merch_loc_city.as_str()));
            assert!(TRANSACTION_STATUSES.contains(&record.txn_status.as_str()));
            assert_eq!(record.enrchd_merch_loc_ste, "CA");
            assert_eq!(record.txn_crncy_cde, "USD");
            assert_eq!(record.z_audit_crtd_by_txt, "SYSTEM");
        }
    }

    #[test]
    fn identifier_fields_use_expected_prefixes() {
        let mut rng = thread_rng();
        let record = sample_record(&mut rng);
        assert!(record.txn_id.starts_with("TXN"));
        assert!(record.txn_uid.starts_with("UID"));
        assert!(record.txn_cde.starts_with("TXN_CODE_"));
        assert!(record.ref_nbr.starts_with("REF"));
        assert!(record.z_audit_evnt_id.starts_with("EVT"));
        assert!(record.sub_prdct_cde.starts_with("SUB_PRD_"));
        assert!(record.src_nm.starts_with("SOURCE_"));
    }
}
