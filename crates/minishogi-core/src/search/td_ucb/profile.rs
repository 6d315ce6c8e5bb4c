//! TD-UCB の区間別計測
//!
//! `next_move` 全体、1 シミュレーション、手の選択、合法手生成、着手の 5 区間について
//! 回数・合計・最大時間を積算する。スナップショットはミリ秒で返す。

use std::time::{Duration, Instant};

use serde::Serialize;

/// 1 区間の集計値（ミリ秒）
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMetric {
    pub count: u64,
    pub total_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
}

/// 区間別計測のスナップショット
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TdUcbProfile {
    pub next_move: ProfileMetric,
    pub simulation: ProfileMetric,
    pub move_selection: ProfileMetric,
    pub legal_generation: ProfileMetric,
    pub move_apply: ProfileMetric,
}

#[derive(Clone, Copy, Debug, Default)]
struct Metric {
    count: u64,
    total: Duration,
    max: Duration,
}

impl Metric {
    fn add(&mut self, elapsed: Duration) {
        self.count = self.count.saturating_add(1);
        self.total = self.total.saturating_add(elapsed);
        self.max = self.max.max(elapsed);
    }

    fn snapshot(&self) -> ProfileMetric {
        if self.count == 0 {
            return ProfileMetric::default();
        }
        let total_ms = millis(self.total);
        ProfileMetric {
            count: self.count,
            total_ms,
            avg_ms: total_ms / self.count as f64,
            max_ms: millis(self.max),
        }
    }
}

#[inline]
fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// 計測区間
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Section {
    NextMove,
    Simulation,
    MoveSelection,
    LegalGeneration,
    MoveApply,
}

#[derive(Debug, Default)]
pub(super) struct Profiler {
    next_move: Metric,
    simulation: Metric,
    move_selection: Metric,
    legal_generation: Metric,
    move_apply: Metric,
}

impl Profiler {
    pub(super) fn observe(&mut self, section: Section, elapsed: Duration) {
        let metric = match section {
            Section::NextMove => &mut self.next_move,
            Section::Simulation => &mut self.simulation,
            Section::MoveSelection => &mut self.move_selection,
            Section::LegalGeneration => &mut self.legal_generation,
            Section::MoveApply => &mut self.move_apply,
        };
        metric.add(elapsed);
    }

    /// `f` の実行時間を `section` に積算する
    #[inline]
    pub(super) fn time<T>(&mut self, section: Section, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let out = f();
        self.observe(section, start.elapsed());
        out
    }

    pub(super) fn snapshot(&self) -> TdUcbProfile {
        TdUcbProfile {
            next_move: self.next_move.snapshot(),
            simulation: self.simulation.snapshot(),
            move_selection: self.move_selection.snapshot(),
            legal_generation: self.legal_generation.snapshot(),
            move_apply: self.move_apply.snapshot(),
        }
    }

    pub(super) fn reset(&mut self) {
        *self = Profiler::default();
    }
}
