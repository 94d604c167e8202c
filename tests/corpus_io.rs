//! Reading corpora from disk and writing result files.

use std::fs;
use std::path::PathBuf;

use simsearch::{
    output_file_name, write_pairs_to_path, Corpus, Metric, SearchConfig, SimSearch, Strategy,
};

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("simsearch-{}-{}", std::process::id(), name))
}

#[test]
fn test_search_file_end_to_end() {
    let input = scratch_path("words.txt");
    fs::write(&input, "cat\r\nbat\ncats\ndog\ncat\n").unwrap();

    let corpus = Corpus::read(&input, false).unwrap();
    assert_eq!(corpus.len(), 4);

    let config = SearchConfig::new(1, Metric::Levenshtein).with_threads(2);
    let search = SimSearch::new(corpus.strings(), config.clone()).unwrap();
    let pairs = search.run(Strategy::SemiPatterns, None).unwrap();

    let output = output_file_name(&input, Strategy::SemiPatterns, config.cutoff, config.metric);
    assert!(output.to_string_lossy().ends_with("words.txt_s_1_L"));
    write_pairs_to_path(&output, &corpus, &pairs).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, "0\t0\n0\t1\n0\t2\n1\t1\n2\t2\n3\t3\n");

    fs::remove_file(&input).ok();
    fs::remove_file(&output).ok();
}

#[test]
fn test_duplicate_positions_in_output() {
    let input = scratch_path("dups.txt");
    fs::write(&input, "abcd\nabce\nabcd\nzzzz\n").unwrap();

    let corpus = Corpus::read(&input, true).unwrap();
    assert_eq!(corpus.strings(), &["abcd", "abce", "zzzz"]);
    assert_eq!(corpus.positions("abcd"), Some(&[0, 2][..]));

    let config = SearchConfig::new(1, Metric::Hamming)
        .with_include_eye(false)
        .with_threads(1);
    let pairs = SimSearch::new(corpus.strings(), config)
        .unwrap()
        .run(Strategy::SemiPatterns, None)
        .unwrap();

    let output = scratch_path("dups.out");
    write_pairs_to_path(&output, &corpus, &pairs).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "0\t1\t0,2\t1\n");

    fs::remove_file(&input).ok();
    fs::remove_file(&output).ok();
}

#[test]
fn test_config_file() {
    let path = scratch_path("search.toml");
    fs::write(
        &path,
        "cutoff = 1\nmetric = \"H\"\nregion = { prefix = 2 }\nsink = \"shared\"\n",
    )
    .unwrap();

    let config = SearchConfig::load(&path).unwrap();
    assert_eq!(config.cutoff, 1);
    assert_eq!(config.metric, Metric::Hamming);

    fs::write(&path, "cutoff = \"two\"\n").unwrap();
    assert!(matches!(
        SearchConfig::load(&path),
        Err(simsearch::SearchError::ConfigParse { .. })
    ));

    fs::remove_file(&path).ok();
}
