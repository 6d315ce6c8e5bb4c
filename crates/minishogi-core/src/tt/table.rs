//! 置換表本体

use std::collections::HashMap;

use super::entry::{TtEntry, TtKey};

/// 置換表
///
/// 同じキーへの書き込みは常に上書きする（深さによる置換方針は持たない）。
#[derive(Debug, Default)]
pub struct TranspositionTable {
    entries: HashMap<TtKey, TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを取得
    #[inline]
    pub fn probe(&self, key: &TtKey) -> Option<TtEntry> {
        self.entries.get(key).copied()
    }

    /// エントリを保存
    #[inline]
    pub fn store(&mut self, key: TtKey, entry: TtEntry) {
        self.entries.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
