//! 手駒（Hand）

use super::PieceType;

/// 手駒（駒種ごとの枚数）
///
/// 取った駒は成りを解除した駒種で加算される。枚数は負にならない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand([u8; PieceType::NUM]);

impl Hand {
    /// 空の手駒
    pub const EMPTY: Hand = Hand([0; PieceType::NUM]);

    /// 指定駒種の枚数を取得
    #[inline]
    pub const fn count(self, pt: PieceType) -> u32 {
        self.0[pt.index()] as u32
    }

    /// 指定駒種を持っているか
    #[inline]
    pub const fn has(self, pt: PieceType) -> bool {
        self.0[pt.index()] > 0
    }

    /// 1枚追加
    #[inline]
    pub fn add(&mut self, pt: PieceType) {
        self.0[pt.index()] += 1;
    }

    /// 1枚減らす
    #[inline]
    pub fn sub(&mut self, pt: PieceType) {
        debug_assert!(self.has(pt), "hand has no {pt:?}");
        self.0[pt.index()] = self.0[pt.index()].saturating_sub(1);
    }

    /// 指定枚数をセット
    #[inline]
    pub fn set(&mut self, pt: PieceType, count: u8) {
        self.0[pt.index()] = count;
    }

    /// 空かどうか
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// 持っている駒種と枚数を固定順で列挙
    pub fn iter(self) -> impl Iterator<Item = (PieceType, u32)> {
        PieceType::ALL
            .into_iter()
            .map(move |pt| (pt, self.count(pt)))
            .filter(|&(_, n)| n > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_add_sub() {
        let mut hand = Hand::EMPTY;
        assert!(hand.is_empty());
        hand.add(PieceType::Pawn);
        hand.add(PieceType::Pawn);
        hand.add(PieceType::Gold);
        assert_eq!(hand.count(PieceType::Pawn), 2);
        assert_eq!(hand.count(PieceType::Gold), 1);
        hand.sub(PieceType::Pawn);
        assert_eq!(hand.count(PieceType::Pawn), 1);
        assert!(!hand.is_empty());
    }

    #[test]
    fn test_hand_iter_order() {
        let mut hand = Hand::EMPTY;
        hand.set(PieceType::Pawn, 3);
        hand.set(PieceType::Gold, 1);
        let items: Vec<_> = hand.iter().collect();
        assert_eq!(items, vec![(PieceType::Gold, 1), (PieceType::Pawn, 3)]);
    }
}
