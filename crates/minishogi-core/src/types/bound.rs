//! 境界値種別（Bound）

/// 境界値種別（置換表に格納する値の種類）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// 正確な値
    Exact,
    /// 下界（fail-high: 真の値はこれ以上）
    Lower,
    /// 上界（fail-low: 真の値はこれ以下）
    Upper,
}

impl Bound {
    /// 探索開始時の窓 (alpha, beta) に対する探索結果の分類
    #[inline]
    pub const fn classify(score: i32, alpha_orig: i32, beta_orig: i32) -> Bound {
        if score <= alpha_orig {
            Bound::Upper
        } else if score >= beta_orig {
            Bound::Lower
        } else {
            Bound::Exact
        }
    }
}
