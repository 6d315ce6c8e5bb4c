//! TD-UCB の知識（局面の価値と、局面・手ごとの訪問数・累積リターン）
//!
//! 行形式（タブ区切り、先頭がレコード種別）:
//!
//! - `S\t<局面キー>\t<価値>`
//! - `M\t<局面キー>\t<手>\t<訪問数>\t<累積リターン>`
//!
//! 旧 JSON 形式:
//! `{"values":{"<局面キー>":V},"moves":{"<局面キー>":{"<手>":{"visits":N,"total":T}}}}`
//!
//! 価値はすべて Bottom 視点。

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};

use super::error::KnowledgeError;
use super::file::{KnowledgeFile, KnowledgeText};

/// 局面価値レコードのタグ
pub const TD_RECORD_STATE: &str = "S";
/// 手の統計レコードのタグ
pub const TD_RECORD_MOVE: &str = "M";

/// 局面・手ごとの統計
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TdMoveStat {
    pub visits: u32,
    pub total: f64,
}

impl TdMoveStat {
    /// 平均リターン（未訪問なら 0）
    #[inline]
    pub fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total / f64::from(self.visits)
        }
    }
}

/// TD-UCB の学習表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TdTables {
    #[serde(default)]
    pub values: HashMap<String, f64>,
    #[serde(default)]
    pub moves: HashMap<String, HashMap<String, TdMoveStat>>,
}

/// 行形式にエンコード（キー順）。`include_moves` が偽なら `S` レコードのみ
pub fn encode_td(tables: &TdTables, include_moves: bool) -> String {
    let mut out = String::new();
    let values: BTreeMap<&String, &f64> = tables.values.iter().collect();
    for (key, value) in values {
        let _ = writeln!(out, "{TD_RECORD_STATE}\t{key}\t{value}");
    }
    if include_moves {
        let states: BTreeMap<&String, &HashMap<String, TdMoveStat>> = tables.moves.iter().collect();
        for (key, moves) in states {
            let moves: BTreeMap<&String, &TdMoveStat> = moves.iter().collect();
            for (mv, stat) in moves.into_iter().filter(|(_, s)| s.visits > 0) {
                let _ = writeln!(
                    out,
                    "{TD_RECORD_MOVE}\t{key}\t{mv}\t{}\t{}",
                    stat.visits, stat.total
                );
            }
        }
    }
    out
}

/// 行形式・旧 JSON 形式をデコード
pub fn decode_td(text: &KnowledgeText) -> Result<TdTables, KnowledgeError> {
    match text {
        KnowledgeText::LegacyJson(json) => Ok(serde_json::from_str(json)?),
        KnowledgeText::Lines(body) => {
            let mut tables = TdTables::default();
            for (idx, line) in body.lines().enumerate() {
                parse_record(&mut tables, idx + 1, line)?;
            }
            Ok(tables)
        }
    }
}

fn parse_record(tables: &mut TdTables, line_no: usize, line: &str) -> Result<(), KnowledgeError> {
    if line.trim().is_empty() {
        return Ok(());
    }
    let fields: Vec<&str> = line.split('\t').collect();
    match fields[0] {
        TD_RECORD_STATE => {
            let [_, key, value] = fields[..] else {
                return Err(KnowledgeError::malformed(line_no, "malformed state record"));
            };
            let value = parse_f64(line_no, value)?;
            tables.values.insert(key.to_string(), value);
        }
        TD_RECORD_MOVE => {
            let [_, key, mv, visits, total] = fields[..] else {
                return Err(KnowledgeError::malformed(line_no, "malformed move record"));
            };
            let visits = visits.parse::<u32>().map_err(|_| {
                KnowledgeError::malformed(line_no, format!("invalid visits value {visits:?}"))
            })?;
            let total = parse_f64(line_no, total)?;
            tables
                .moves
                .entry(key.to_string())
                .or_default()
                .insert(mv.to_string(), TdMoveStat { visits, total });
        }
        other => {
            return Err(KnowledgeError::malformed(
                line_no,
                format!("unknown record kind {other:?}"),
            ));
        }
    }
    Ok(())
}

fn parse_f64(line_no: usize, s: &str) -> Result<f64, KnowledgeError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| KnowledgeError::malformed(line_no, format!("invalid number {s:?}")))
}

#[derive(Debug)]
struct Inner {
    tables: TdTables,
    dirty: bool,
}

/// TD-UCB の知識ストア
///
/// 保存先がなくても学習はメモリ上で行う（未保存フラグだけが立たない）。
#[derive(Debug)]
pub struct TdKnowledge {
    file: Option<KnowledgeFile>,
    persist_move_stats: bool,
    inner: Mutex<Inner>,
}

impl TdKnowledge {
    fn with_tables(
        file: Option<KnowledgeFile>,
        persist_move_stats: bool,
        tables: TdTables,
    ) -> Self {
        TdKnowledge {
            file,
            persist_move_stats,
            inner: Mutex::new(Inner {
                tables,
                dirty: false,
            }),
        }
    }

    /// メモリ上だけのストア
    pub fn transient() -> Self {
        Self::with_tables(None, false, TdTables::default())
    }

    /// 保存先に紐づく空のストア（読み込みに失敗したときの代替）
    pub fn empty(file: KnowledgeFile, persist_move_stats: bool) -> Self {
        Self::with_tables(Some(file), persist_move_stats, TdTables::default())
    }

    /// 保存先から読み込む。ファイルがなければ空
    ///
    /// `S`・`M` のどちらのレコードも読み込む。`persist_move_stats` は保存時にだけ効く。
    pub fn open(file: KnowledgeFile, persist_move_stats: bool) -> Result<Self, KnowledgeError> {
        let tables = match file.read()? {
            Some(text) => decode_td(&text)?,
            None => TdTables::default(),
        };
        log::info!(
            "td-ucb: loaded {} values and {} move tables from {}",
            tables.values.len(),
            tables.moves.len(),
            file.path().display()
        );
        Ok(Self::with_tables(Some(file), persist_move_stats, tables))
    }

    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    /// 1 回の思考の間、表を排他的に借りる
    pub fn session(&self) -> TdSession<'_> {
        TdSession {
            inner: self.inner.lock(),
            persistent: self.is_persistent(),
        }
    }

    /// 局面の価値
    pub fn value_of(&self, key: &str) -> Option<f64> {
        self.inner.lock().tables.values.get(key).copied()
    }

    /// 局面の手の統計
    pub fn move_stats_for(&self, key: &str) -> Option<HashMap<String, TdMoveStat>> {
        self.inner.lock().tables.moves.get(key).cloned()
    }

    /// 価値を記録済みの局面数
    pub fn len(&self) -> usize {
        self.inner.lock().tables.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_dirty(&self) -> bool {
        self.inner.lock().dirty
    }

    /// 未保存の変更があれば書き出す。書き出したら `true`
    pub fn save_if_needed(&self) -> Result<bool, KnowledgeError> {
        let Some(file) = &self.file else {
            return Ok(false);
        };
        let mut inner = self.inner.lock();
        if !inner.dirty {
            return Ok(false);
        }
        file.write(&encode_td(&inner.tables, self.persist_move_stats))?;
        inner.dirty = false;
        Ok(true)
    }
}

/// `TdKnowledge::session` が返すロック済みの表
pub struct TdSession<'a> {
    inner: MutexGuard<'a, Inner>,
    persistent: bool,
}

impl TdSession<'_> {
    /// 局面の価値（未記録なら 0）
    pub fn value(&self, key: &str) -> f64 {
        self.inner.tables.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn set_value(&mut self, key: &str, value: f64) {
        self.inner.tables.values.insert(key.to_string(), value);
    }

    /// 未記録の場合だけ価値を設定
    pub fn set_value_if_absent(&mut self, key: &str, value: f64) {
        self.inner.tables.values.entry(key.to_string()).or_insert(value);
    }

    /// 局面・手の統計
    pub fn move_stat(&self, key: &str, mv: &str) -> Option<TdMoveStat> {
        self.inner.tables.moves.get(key)?.get(mv).copied()
    }

    /// 局面・手の平均リターン（未記録なら 0）
    pub fn move_mean(&self, key: &str, mv: &str) -> f64 {
        self.move_stat(key, mv).map_or(0.0, |s| s.mean())
    }

    /// 局面の全手の訪問数の合計
    pub fn total_visits(&self, key: &str) -> u64 {
        self.inner
            .tables
            .moves
            .get(key)
            .map_or(0, |moves| moves.values().map(|s| u64::from(s.visits)).sum())
    }

    /// 局面・手の統計に 1 回分のリターンを加える
    pub fn record_move(&mut self, key: &str, mv: &str, value: f64) {
        let stat = self
            .inner
            .tables
            .moves
            .entry(key.to_string())
            .or_default()
            .entry(mv.to_string())
            .or_default();
        stat.visits = stat.visits.saturating_add(1);
        stat.total += value;
    }

    /// 保存先がある場合だけ未保存にする
    pub fn mark_dirty(&mut self) {
        if self.persistent {
            self.inner.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write as _;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    #[test]
    fn test_encode_without_move_stats() {
        let mut tables = TdTables::default();
        tables.values.insert("b".to_string(), -0.25);
        tables.values.insert("a".to_string(), 0.5);
        tables
            .moves
            .entry("a".to_string())
            .or_default()
            .insert("c3c4".to_string(), TdMoveStat { visits: 2, total: 1.5 });

        assert_eq!(encode_td(&tables, false), "S\ta\t0.5\nS\tb\t-0.25\n");
        assert_eq!(
            encode_td(&tables, true),
            "S\ta\t0.5\nS\tb\t-0.25\nM\ta\tc3c4\t2\t1.5\n"
        );
    }

    #[test]
    fn test_decode_both_record_kinds() {
        let text = KnowledgeText::Lines("S\tk#0\t0.125\n\nM\tk#0\tP@a5\t4\t-1\n".to_string());
        let tables = decode_td(&text).unwrap();
        assert_eq!(tables.values.get("k#0"), Some(&0.125));
        let stat = tables.moves["k#0"]["P@a5"];
        assert_eq!(stat.visits, 4);
        assert_eq!(stat.mean(), -0.25);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let cases = [
            "S\tk\t0.1\textra",
            "S\tk\tnope",
            "M\tk\tc3c4\t1",
            "M\tk\tc3c4\tx\t0.5",
            "X\tk\t0.1",
        ];
        for bad in cases {
            let text = KnowledgeText::Lines(bad.to_string());
            assert!(
                matches!(decode_td(&text), Err(KnowledgeError::Malformed { line: 1, .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_decode_legacy_json() {
        let json = r#"{"values":{"k#1":-0.5},"moves":{"k#1":{"b3b4":{"visits":1,"total":-0.5}}}}"#;
        let tables = decode_td(&KnowledgeText::LegacyJson(json.to_string())).unwrap();
        assert_eq!(tables.values["k#1"], -0.5);
        assert_eq!(tables.moves["k#1"]["b3b4"].visits, 1);
    }

    #[test]
    fn test_load_legacy_gzip_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("td.bin");
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(b"S\tlegacy\t0.12500000\n").unwrap();
        std::fs::write(&path, enc.finish().unwrap()).unwrap();

        let store = TdKnowledge::open(KnowledgeFile::new(&path, false), false).unwrap();
        assert_eq!(store.value_of("legacy"), Some(0.125));
    }

    #[test]
    fn test_session_updates() {
        let store = TdKnowledge::transient();
        {
            let mut s = store.session();
            assert_eq!(s.value("k"), 0.0);
            s.set_value("k", 0.3);
            s.set_value_if_absent("k", 0.9);
            s.record_move("k", "c3c4", 1.0);
            s.record_move("k", "c3c4", 0.0);
            s.record_move("k", "b3b4", -1.0);
            s.mark_dirty();
            assert_eq!(s.total_visits("k"), 3);
            assert_eq!(s.move_mean("k", "c3c4"), 0.5);
            assert_eq!(s.move_mean("k", "a1a2"), 0.0);
        }
        assert_eq!(store.value_of("k"), Some(0.3));
        // 保存先がないので未保存にはならない
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_save_plain_text_values_only() {
        let dir = tempfile::tempdir().unwrap();
        let file = KnowledgeFile::new(dir.path().join("td.txt"), false);
        let store = TdKnowledge::open(file.clone(), false).unwrap();
        {
            let mut s = store.session();
            s.set_value("k#0", 0.1 + 0.2);
            s.record_move("k#0", "c3c4", 0.3);
            s.mark_dirty();
        }
        assert!(store.save_if_needed().unwrap());

        let body = std::fs::read_to_string(file.path()).unwrap();
        assert!(body.starts_with("S\tk#0\t"));
        assert!(!body.contains("\nM\t"));

        let reopened = TdKnowledge::open(file, false).unwrap();
        let value = reopened.value_of("k#0").unwrap();
        assert!((value - (0.1 + 0.2)).abs() < 1e-12);
        assert!(reopened.move_stats_for("k#0").is_none());
    }

    #[test]
    fn test_record_move_saturates_visits() {
        let dir = tempfile::tempdir().unwrap();
        let file = KnowledgeFile::new(dir.path().join("td.txt"), false);
        std::fs::write(file.path(), format!("M\tk#0\tc3c4\t{}\t2\n", u32::MAX)).unwrap();
        let store = TdKnowledge::open(file, true).unwrap();
        {
            let mut s = store.session();
            s.record_move("k#0", "c3c4", 1.0);
            assert_eq!(s.total_visits("k#0"), u64::from(u32::MAX));
        }
        let stat = store.move_stats_for("k#0").unwrap()["c3c4"];
        assert_eq!(stat.visits, u32::MAX);
        assert_eq!(stat.total, 3.0);
    }
}
