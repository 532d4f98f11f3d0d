use std::collections::HashSet;

use bitindex::{
    base::{Key, Len},
    codec::{dump_index, load_index},
    error::Error,
    indexer::{CsvIndexer, CsvOptions, Indexer},
};

const PEOPLE_FRUITS: &str = "\
person;fruit
100;1
100;3
101;4
102;4
102;2
102;3
";

fn csv_options() -> CsvOptions {
    CsvOptions {
        header: true,
        delimiter: b';',
        ..Default::default()
    }
}

fn as_set(keys: Vec<Key>) -> HashSet<Key> {
    keys.into_iter().collect()
}

#[test]
fn test_build_and_query() {
    let index = CsvIndexer::new(PEOPLE_FRUITS.as_bytes(), &csv_options())
        .to_index()
        .expect("Error while building the index");

    assert_eq!(index.domain().members(), &[1, 3, 4, 2]);
    assert_eq!(index.table().len(), 3);

    assert_eq!(as_set(index.any(&[1, 2]).unwrap()), HashSet::from([100, 102]));
    assert_eq!(as_set(index.all(&[1, 3]).unwrap()), HashSet::from([100]));
    assert_eq!(as_set(index.not_any(&[1, 3]).unwrap()), HashSet::from([101]));
    assert_eq!(as_set(index.not_all(&[2, 4]).unwrap()), HashSet::from([100, 101]));
}

#[test]
fn test_build_dump_load() {
    let index = CsvIndexer::new(PEOPLE_FRUITS.as_bytes(), &csv_options())
        .to_index()
        .unwrap();

    let mut blob = Vec::new();
    dump_index(&mut blob, &index).unwrap();
    let loaded = load_index(blob.as_slice()).unwrap();

    let result = loaded.query_with(&[3], &[], &[], &[2]).unwrap();
    assert_eq!(as_set(result.items()), HashSet::from([100]));
    assert_eq!(as_set(result.complement()), HashSet::from([101, 102]));
}

#[test]
fn test_custom_parser() {
    // Keys are given as "k<number>"
    let data = "k1,7\nk2,8\nk1,8\n";
    let mut indexer = CsvIndexer::with_parser(
        data.as_bytes(),
        &CsvOptions::default(),
        Box::new(|record: &csv::StringRecord, line: u64| {
            let key = record[0]
                .trim_start_matches('k')
                .parse()
                .map_err(|_| Error::InvalidField {
                    line,
                    column: 0,
                    value: record[0].to_string(),
                })?;
            let member = record[1].parse().map_err(|_| Error::InvalidField {
                line,
                column: 1,
                value: record[1].to_string(),
            })?;
            Ok((key, member))
        }),
    );

    let index = indexer.to_index().unwrap();
    assert!(index.has(1, 8).unwrap());
    assert!(!index.has(2, 7).unwrap());
}

#[test]
fn test_empty_input() {
    let index = CsvIndexer::new("person;fruit\n".as_bytes(), &csv_options())
        .to_index()
        .unwrap();

    assert_eq!(index.table().len(), 0);
    assert!(matches!(index.sparsity(), Err(Error::EmptyTable)));
}
