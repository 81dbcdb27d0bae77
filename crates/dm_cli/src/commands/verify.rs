use crate::commands::extract::extract_file;
use crate::commands::records::EXIT_NOT_FOUND;
use dm_core::app_error::AppResult;
use dm_core::config::ConfigV1;
use dm_core::store::MetadataStore;

pub const EXIT_MISMATCH: i32 = 3;

/// Re-extracts `path` and compares its hash with record `id`. Returns the process exit code.
pub fn run_verify(config: &ConfigV1, id: i64, path: &str) -> AppResult<i32> {
    let store = MetadataStore::open(&config.db_path())?;
    let Some(record) = store.get(id)? else {
        eprintln!("record {id} not found");
        return Ok(EXIT_NOT_FOUND);
    };
    let current = extract_file(config, path)?;

    if current.hash == record.hash {
        println!("match {}", record.hash);
        return Ok(0);
    }

    println!("mismatch");
    println!("stored:  {}", record.hash);
    println!("current: {}", current.hash);
    let stored = record.metadata()?;
    for (name, value) in current.canonical.iter() {
        match stored.get(name) {
            Some(old) if old == value => {}
            Some(old) => println!("~ {name}: {old} -> {value}"),
            None => println!("+ {name}={value}"),
        }
    }
    for (name, value) in stored.iter() {
        if current.canonical.get(name).is_none() {
            println!("- {name}={value}");
        }
    }
    Ok(EXIT_MISMATCH)
}
