use std::env;
use std::path::PathBuf;

use cedict_db::Dictionary;
use cedict_frequency::FrequencyTable;

fn source() -> Option<PathBuf> {
    env::var("CEDICT_PATH").ok().map(PathBuf::from)
}

#[test]
fn loads_published_cc_cedict() {
    let Some(path) = source() else {
        eprintln!("skipping: CEDICT_PATH not set");
        return;
    };
    let dict = Dictionary::load(&path, &FrequencyTable::empty(), None).expect("load cc-cedict");

    assert!(dict.len() > 100_000, "dictionary too small");
    assert!(dict.processed() >= dict.len());
    assert!(dict.metadata().contains_key("version"));
    let zhongguo = dict.get("中國").expect("中國 present");
    assert_eq!(zhongguo.simplified, "中国");
    assert!(zhongguo.definitions.iter().any(|d| d == "China"));
}
