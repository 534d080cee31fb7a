use std::env;
use std::process;

use anyhow::{Context, Result};
use log::{debug, info};
use scylla::{Session, SessionBuilder};

mod token_ranges;

use token_ranges::{group_digits, range_size, split_ranges, TokenStats, SPLIT_COUNTS};

// Migration planning always targets the customer table; the table and its
// partition key are not exposed as arguments.
const TABLE_NAME: &str = "customer";
const PARTITION_KEY: &str = "customer_id";

#[derive(Debug)]
struct CliArgs {
    host: String,
    port: String,
    username: String,
    password: String,
    keyspace: String,
}

fn parse_args(args: &[String]) -> Option<CliArgs> {
    match args {
        [host, port, username, password, keyspace] => Some(CliArgs {
            host: host.clone(),
            port: port.clone(),
            username: username.clone(),
            password: password.clone(),
            keyspace: keyspace.clone(),
        }),
        _ => None,
    }
}

async fn connect(cli: &CliArgs) -> Result<Session> {
    let port: u16 = cli
        .port
        .parse()
        .with_context(|| format!("invalid port: {}", cli.port))?;

    debug!("connecting to {}:{} as {}", cli.host, port, cli.username);
    let session = SessionBuilder::new()
        .known_node(format!("{}:{}", cli.host, port))
        .user(&cli.username, &cli.password)
        .use_keyspace(&cli.keyspace, false)
        .build()
        .await
        .with_context(|| format!("failed to connect to {}:{}", cli.host, port))?;

    info!("connected to {}:{}, keyspace {}", cli.host, port, cli.keyspace);
    Ok(session)
}

async fn fetch_token_stats(
    session: &Session,
    table_name: &str,
    partition_key: &str,
) -> Result<TokenStats> {
    let query = format!(
        "SELECT \
         MIN(TOKEN({partition_key})) as min_token, \
         MAX(TOKEN({partition_key})) as max_token, \
         COUNT(*) as total_rows, \
         COUNT(DISTINCT TOKEN({partition_key})) as unique_tokens \
         FROM {table_name}"
    );

    let (min_token, max_token, total_rows, unique_tokens) = session
        .query(query, ())
        .await
        .context("token statistics query failed")?
        .single_row_typed::<(i64, i64, i64, i64)>()?;

    Ok(TokenStats {
        min_token,
        max_token,
        total_rows,
        unique_tokens,
    })
}

async fn analyze_token_ranges(
    session: &Session,
    table_name: &str,
    partition_key: &str,
) -> Result<()> {
    println!("=== ANALYZING TOKEN RANGES FOR {table_name} ===");
    println!();

    // 1. Overall statistics
    let stats = fetch_token_stats(session, table_name, partition_key).await?;

    println!("📊 OVERALL STATISTICS:");
    println!("   Total Rows: {}", group_digits(stats.total_rows));
    println!("   Unique Tokens: {}", group_digits(stats.unique_tokens));
    println!("   Min Token: {}", stats.min_token);
    println!("   Max Token: {}", stats.max_token);
    println!("   Token Range: {}", group_digits(stats.token_span()));
    println!();

    // 2. Per-token row counts, first 100 tokens ascending
    let query = format!(
        "SELECT TOKEN({partition_key}) as token_value, COUNT(*) as row_count \
         FROM {table_name} \
         GROUP BY TOKEN({partition_key}) \
         ORDER BY token_value \
         LIMIT 100"
    );

    let distribution = session
        .query(query, ())
        .await
        .context("token distribution query failed")?;

    println!("📈 TOKEN DISTRIBUTION (First 100 tokens):");
    println!("   {:<20} {:<10}", "Token Value", "Row Count");
    println!("   {} {}", "-".repeat(20), "-".repeat(10));

    for row in distribution.rows_typed::<(i64, i64)>()? {
        let (token_value, row_count) = row?;
        println!("   {:<20} {:<10}", token_value, group_digits(row_count));
    }
    println!();

    // 3. Candidate equal-width ranges for each split count
    println!("🎯 OPTIMAL TOKEN RANGES FOR DIFFERENT SPLITS:");
    println!();

    for num_splits in SPLIT_COUNTS {
        let size = range_size(stats.min_token, stats.max_token, num_splits);
        println!("   {} splits (range size: {}):", num_splits, group_digits(size));

        let ranges = split_ranges(stats.min_token, stats.max_token, num_splits);
        for (i, range) in ranges.iter().enumerate() {
            println!("     Range {}: {} to {}", i + 1, range.start, range.end);
        }
        println!();
    }

    Ok(())
}

async fn run(cli: CliArgs) -> Result<()> {
    let session = connect(&cli).await?;
    analyze_token_ranges(&session, TABLE_NAME, PARTITION_KEY).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(cli) = parse_args(&args[1..]) else {
        println!("Usage: range-analyzer <host> <port> <username> <password> <keyspace>");
        println!("Example: range-analyzer localhost 9042 cassandra cassandra my_keyspace");
        process::exit(1);
    };

    if let Err(e) = run(cli).await {
        println!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::parse_args;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_exactly_five_arguments() {
        let parsed = parse_args(&args(&[
            "localhost",
            "9042",
            "cassandra",
            "cassandra",
            "my_keyspace",
        ]))
        .unwrap();
        assert_eq!(parsed.host, "localhost");
        assert_eq!(parsed.port, "9042");
        assert_eq!(parsed.keyspace, "my_keyspace");
    }

    #[test]
    fn rejects_wrong_argument_counts() {
        assert!(parse_args(&args(&[])).is_none());
        assert!(parse_args(&args(&["localhost", "9042", "cassandra", "cassandra"])).is_none());
        assert!(parse_args(&args(&[
            "localhost",
            "9042",
            "cassandra",
            "cassandra",
            "my_keyspace",
            "extra",
        ]))
        .is_none());
    }
}
