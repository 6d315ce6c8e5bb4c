//! 学習結果の保存・読み込み

use std::fs;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use minishogi_core::config::{MctsConfig, TdUcbConfig};
use minishogi_core::knowledge::{
    KnowledgeError, KnowledgeFile, MctsKnowledge, TdKnowledge, decode_mcts, encode_mcts,
};
use minishogi_core::position::Position;
use minishogi_core::search::{Engine, MctsEngine, TdUcbEngine};

fn mcts_config(compress: bool) -> MctsConfig {
    MctsConfig {
        iterations: 80,
        rollout_depth: 20,
        compress,
        ..MctsConfig::default()
    }
}

#[test]
fn test_mcts_engine_saves_after_each_move() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("mcts.txt.gz");
    let pos = Position::initial();

    let engine = MctsEngine::persistent(&mcts_config(true), 3, &path);
    engine.next_move(&pos).unwrap();
    assert!(path.exists());
    assert!(!engine.knowledge().is_dirty());
    let first = engine.knowledge().entries_for(&pos.key()).unwrap();

    let reloaded = MctsEngine::persistent(&mcts_config(true), 4, &path);
    assert_eq!(reloaded.knowledge().entries_for(&pos.key()).unwrap(), first);

    // 前回の統計を引き継いで訪問数が増える
    reloaded.next_move(&pos).unwrap();
    let second = reloaded.knowledge().entries_for(&pos.key()).unwrap();
    let total = |m: &std::collections::HashMap<String, minishogi_core::knowledge::MoveStats>| {
        m.values().map(|s| u64::from(s.visits)).sum::<u64>()
    };
    assert_eq!(total(&second), total(&first) + 80);
}

#[test]
fn test_transient_engines_write_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let pos = Position::initial();
    let mcts = MctsEngine::new(&mcts_config(false), 1);
    mcts.next_move(&pos).unwrap();
    mcts.save_if_needed().unwrap();
    let td = TdUcbEngine::new(&TdUcbConfig { simulations: 20, ..TdUcbConfig::default() }, 1);
    td.next_move(&pos).unwrap();
    td.save_if_needed().unwrap();
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_td_ucb_flush_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("td_ucb.txt");
    let config = TdUcbConfig {
        simulations: 30,
        rollout_depth: 10,
        ..TdUcbConfig::default()
    };
    let engine = TdUcbEngine::persistent(&config, 2, &path);
    engine.next_move(&Position::initial()).unwrap();
    assert!(!path.exists());
    engine.save_if_needed().unwrap();
    let written = fs::read_to_string(&path).unwrap();
    // 変更がなければ書き直さない
    fs::remove_file(&path).unwrap();
    engine.save_if_needed().unwrap();
    assert!(!path.exists());

    fs::write(&path, &written).unwrap();
    let reloaded = TdUcbEngine::persistent(&config, 3, &path);
    assert_eq!(reloaded.knowledge().len(), written.lines().count());
}

#[test]
fn test_legacy_json_is_accepted_and_rewritten_as_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mcts.txt");
    let legacy = r#"{"states":{"abc":{"c2c3":{"visits":3,"wins":1.5}}}}"#;
    fs::write(&path, legacy).unwrap();

    let file = KnowledgeFile::new(&path, false);
    let store = MctsKnowledge::open(file).unwrap();
    let stats = store.entries_for("abc").unwrap();
    assert_eq!(stats["c2c3"].visits, 3);

    store.record("abc".to_string(), stats);
    store.save_if_needed().unwrap();
    let body = fs::read_to_string(&path).unwrap();
    assert_eq!(body.trim_end(), "abc\tc2c3:3:1.5");
    let decoded = decode_mcts(&KnowledgeFile::new(&path, false).read().unwrap().unwrap()).unwrap();
    assert_eq!(encode_mcts(&decoded), body);
}

#[test]
fn test_gzip_is_detected_regardless_of_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("td.txt");
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(b"S\tk#b\t0.5\nM\tk#b\tc2c3\t2\t1\n").unwrap();
    fs::write(&path, enc.finish().unwrap()).unwrap();

    let store = TdKnowledge::open(KnowledgeFile::new(&path, false), false).unwrap();
    assert_eq!(store.value_of("k#b"), Some(0.5));
    assert_eq!(store.move_stats_for("k#b").unwrap()["c2c3"].visits, 2);
}

#[test]
fn test_corrupt_knowledge_is_an_error_but_engine_recovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("td.txt");
    fs::write(&path, "X\tbogus\n").unwrap();
    let err = TdKnowledge::open(KnowledgeFile::new(&path, false), false).unwrap_err();
    assert!(matches!(err, KnowledgeError::Malformed { .. }));

    // エンジンは空の表で続行する
    let engine = TdUcbEngine::persistent(&TdUcbConfig::default(), 1, &path);
    assert!(engine.knowledge().is_empty());
}
