use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use cedict_db::Dictionary;
use cedict_frequency::FrequencyTable;

fn main() -> Result<()> {
    let source = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p cedict-db --example stats -- <path-to-cedict>")?;

    let dict = Dictionary::load(&source, &FrequencyTable::empty(), None)
        .with_context(|| format!("loading CC-CEDICT from {}", source.display()))?;

    let mut definition_count = 0usize;
    let mut multi_reading = 0usize;
    let mut max_readings = (0usize, String::new());
    for record in dict.iter() {
        definition_count += record.definitions.len();
        let readings = record.pronunciations().count();
        if readings > 1 {
            multi_reading += 1;
        }
        if readings > max_readings.0 {
            max_readings = (readings, record.traditional.clone());
        }
    }

    println!("Source       : {}", source.display());
    for (key, value) in dict.metadata() {
        println!("  {key:<11}: {value}");
    }
    println!("Lines merged : {}", dict.processed());
    println!("Lines skipped: {}", dict.skipped());
    println!("Headwords    : {}", dict.len());
    println!("Definitions  : {}", definition_count);
    println!("Multi-reading headwords: {}", multi_reading);
    println!("Most readings: {} ({})", max_readings.1, max_readings.0);

    // Spot-check a couple of headwords.
    for headword in ["中國", "行"] {
        match dict.get(headword) {
            Some(record) => println!(
                "{headword}: [{}] {}",
                record.pronunciation,
                record.definitions.join(" / ")
            ),
            None => println!("{headword}: missing"),
        }
    }

    Ok(())
}
