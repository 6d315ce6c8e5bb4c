//! 手番（Color）

/// 手番（下手/上手）
///
/// `Bottom` は 1 段目を自陣とし段の大きい方向へ進む。`Top` はその逆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    Bottom = 0,
    Top = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全手番（固定順）
    pub const ALL: [Color; 2] = [Color::Bottom, Color::Top];

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Bottom => Color::Top,
            Color::Top => Color::Bottom,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 表示用ラベル
    pub const fn label(self) -> &'static str {
        match self {
            Color::Bottom => "Bottom (moves up)",
            Color::Top => "Top (moves down)",
        }
    }

    /// ファイル名などに使う短い名前
    pub const fn key(self) -> &'static str {
        match self {
            Color::Bottom => "bottom",
            Color::Top => "top",
        }
    }
}
