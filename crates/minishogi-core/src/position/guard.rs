//! 手の巻き戻し用の差分とスコープガード

use std::ops::Deref;

use crate::types::{Color, Move, Piece};

use super::pos::Position;

/// `do_move_as` が返す差分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass to undo_move to restore the position"]
pub struct UndoInfo {
    pub(super) mv: Move,
    pub(super) mover: Color,
    /// 移動前の駒（駒打ちなら `None`）
    pub(super) moved: Option<Piece>,
    /// 移動先にあった駒
    pub(super) captured: Option<Piece>,
}

/// 手を適用した状態を借用し、drop 時に必ず巻き戻すガード
///
/// 早期 return や `continue` を含むどの経路でも `undo_move` が対になって呼ばれる。
pub struct MoveGuard<'a> {
    pos: &'a mut Position,
    undo: Option<UndoInfo>,
}

impl<'a> MoveGuard<'a> {
    pub(super) fn new(pos: &'a mut Position, undo: UndoInfo) -> Self {
        MoveGuard {
            pos,
            undo: Some(undo),
        }
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.pos
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        if let Some(undo) = self.undo.take() {
            self.pos.undo_move(undo);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::position::Position;
    use crate::types::{Color, Move, PieceType, Square};

    #[test]
    fn test_guard_restores_on_drop() {
        let mut pos = Position::initial();
        let snapshot = pos.clone();
        let mv = Move::new_move(Square::new(2, 2), Square::new(2, 3), false);
        {
            let guard = pos.try_move_as(Color::Bottom, mv);
            assert_eq!(guard.hand(Color::Bottom).count(PieceType::Pawn), 1);
        }
        assert_eq!(pos, snapshot);
    }

    #[test]
    fn test_guard_restores_on_early_exit() {
        fn lands_piece(pos: &mut Position, mv: Move) -> bool {
            let guard = pos.try_move_as(Color::Bottom, mv);
            if guard.piece_on(mv.to()).is_some() {
                return true;
            }
            false
        }
        let mut pos = Position::initial();
        let snapshot = pos.clone();
        let mv = Move::new_move(Square::new(0, 0), Square::new(0, 1), false);
        assert!(lands_piece(&mut pos, mv));
        assert_eq!(pos, snapshot);
    }
}
