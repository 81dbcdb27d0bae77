use dm_core::app_error::AppResult;
use dm_core::config::ConfigV1;
use dm_core::store::{MetadataStore, Record};

pub const EXIT_NOT_FOUND: i32 = 2;

fn summary_line(record: &Record) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        record.id, record.created_at, record.filename, record.hash
    )
}

fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("no records");
        return;
    }
    for record in records {
        println!("{}", summary_line(record));
    }
}

pub fn run_list(config: &ConfigV1) -> AppResult<()> {
    let store = MetadataStore::open(&config.db_path())?;
    print_records(&store.list_all()?);
    Ok(())
}

pub fn run_history(config: &ConfigV1, filename: &str) -> AppResult<()> {
    let store = MetadataStore::open(&config.db_path())?;
    print_records(&store.history(filename)?);
    Ok(())
}

pub fn run_show(config: &ConfigV1, id: i64) -> AppResult<i32> {
    let store = MetadataStore::open(&config.db_path())?;
    let Some(record) = store.get(id)? else {
        eprintln!("record {id} not found");
        return Ok(EXIT_NOT_FOUND);
    };

    println!("id: {}", record.id);
    println!("filename: {}", record.filename);
    println!("created_at: {}", record.created_at);
    println!("hash: {}", record.hash);
    if !record.verify_integrity()? {
        tracing::warn!(id = record.id, "stored metadata no longer matches stored hash");
        println!("integrity: mismatch");
    }
    print!("{}", record.metadata()?.to_lines());
    Ok(0)
}
