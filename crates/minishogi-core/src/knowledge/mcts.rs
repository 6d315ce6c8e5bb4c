//! MCTS の知識（局面キー → 手 → 訪問数・勝ち点）
//!
//! 行形式: `<局面キー>\t<手>:<訪問数>:<勝ち点>,<手>:...`（キー順・手順にソート）
//!
//! 旧 JSON 形式: `{"states":{"<局面キー>":{"<手>":{"visits":N,"wins":W}}}}`

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::error::KnowledgeError;
use super::file::{KnowledgeFile, KnowledgeText};

/// 手ごとの統計
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveStats {
    pub visits: u32,
    pub wins: f64,
}

type Entries = HashMap<String, HashMap<String, MoveStats>>;

#[derive(Deserialize)]
struct LegacyMcts {
    #[serde(default)]
    states: Option<Entries>,
}

/// 行形式にエンコード
pub fn encode_mcts(entries: &Entries) -> String {
    let sorted: BTreeMap<&String, &HashMap<String, MoveStats>> = entries.iter().collect();
    let mut out = String::new();
    for (key, moves) in sorted {
        out.push_str(key);
        if !moves.is_empty() {
            let moves: BTreeMap<&String, &MoveStats> = moves.iter().collect();
            out.push('\t');
            for (i, (mv, stats)) in moves.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                let _ = write!(out, "{mv}:{}:{}", stats.visits, stats.wins);
            }
        }
        out.push('\n');
    }
    out
}

/// 行形式・旧 JSON 形式をデコード
pub fn decode_mcts(text: &KnowledgeText) -> Result<Entries, KnowledgeError> {
    match text {
        KnowledgeText::LegacyJson(json) => {
            let legacy: LegacyMcts = serde_json::from_str(json)?;
            Ok(legacy.states.unwrap_or_default())
        }
        KnowledgeText::Lines(body) => decode_lines(body),
    }
}

fn decode_lines(body: &str) -> Result<Entries, KnowledgeError> {
    let mut entries = Entries::new();
    for (idx, raw) in body.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let (key, move_part) = line.split_once('\t').unwrap_or((line, ""));
        if key.is_empty() {
            return Err(KnowledgeError::malformed(line_no, "missing state key"));
        }
        let mut moves = HashMap::new();
        for segment in move_part.split(',').filter(|s| !s.is_empty()) {
            let mut fields = segment.splitn(3, ':');
            let (Some(mv), Some(visits), Some(wins)) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(KnowledgeError::malformed(
                    line_no,
                    format!("invalid move entry {segment:?}"),
                ));
            };
            let visits = visits.parse::<u32>().map_err(|_| {
                KnowledgeError::malformed(line_no, format!("invalid visits value {visits:?}"))
            })?;
            let wins = wins.parse::<f64>().map_err(|_| {
                KnowledgeError::malformed(line_no, format!("invalid wins value {wins:?}"))
            })?;
            moves.insert(mv.to_string(), MoveStats { visits, wins });
        }
        entries.insert(key.to_string(), moves);
    }
    Ok(entries)
}

struct Inner {
    entries: Entries,
    dirty: bool,
}

/// MCTS の知識ストア
///
/// 保存先を持たない場合は何も記録しない。
pub struct MctsKnowledge {
    file: Option<KnowledgeFile>,
    inner: Mutex<Inner>,
}

impl MctsKnowledge {
    fn with_entries(file: Option<KnowledgeFile>, entries: Entries) -> Self {
        MctsKnowledge {
            file,
            inner: Mutex::new(Inner {
                entries,
                dirty: false,
            }),
        }
    }

    /// 保存先を持たないストア
    pub fn disabled() -> Self {
        Self::with_entries(None, Entries::new())
    }

    /// 保存先に紐づく空のストア（読み込みに失敗したときの代替）
    pub fn empty(file: KnowledgeFile) -> Self {
        Self::with_entries(Some(file), Entries::new())
    }

    /// 保存先から読み込む。ファイルがなければ空
    pub fn open(file: KnowledgeFile) -> Result<Self, KnowledgeError> {
        let entries = match file.read()? {
            Some(text) => decode_mcts(&text)?,
            None => Entries::new(),
        };
        log::info!(
            "mcts: loaded {} positions from {}",
            entries.len(),
            file.path().display()
        );
        Ok(Self::with_entries(Some(file), entries))
    }

    pub fn is_persistent(&self) -> bool {
        self.file.is_some()
    }

    pub fn file(&self) -> Option<&KnowledgeFile> {
        self.file.as_ref()
    }

    /// 局面の統計の複製（なければ空）
    pub fn snapshot(&self, key: &str) -> HashMap<String, MoveStats> {
        if !self.is_persistent() {
            return HashMap::new();
        }
        self.inner.lock().entries.get(key).cloned().unwrap_or_default()
    }

    /// 局面の統計を置き換え、未保存にする
    pub fn record(&self, key: String, moves: HashMap<String, MoveStats>) {
        if !self.is_persistent() {
            return;
        }
        let mut inner = self.inner.lock();
        inner.entries.insert(key, moves);
        inner.dirty = true;
    }

    /// 局面の統計（読み取り専用の問い合わせ）
    pub fn entries_for(&self, key: &str) -> Option<HashMap<String, MoveStats>> {
        self.inner.lock().entries.get(key).cloned()
    }

    /// 記録済みの局面数
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
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
        file.write(&encode_mcts(&inner.entries))?;
        inner.dirty = false;
        Ok(true)
    }
}
