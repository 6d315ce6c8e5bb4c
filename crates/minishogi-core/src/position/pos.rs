//! Position 本体

use crate::types::{Color, Hand, Move, Piece, PieceType, SQUARE_NB, Square};

use super::guard::{MoveGuard, UndoInfo};

/// 局面
///
/// 盤面・手駒・手番のみを持つ値型。`clone` は共有状態を持たない完全な複製になる。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    board: [Option<Piece>; SQUARE_NB],
    hands: [Hand; Color::NUM],
    side_to_move: Color,
}

impl Default for Position {
    fn default() -> Self {
        Self::empty(Color::Bottom)
    }
}

impl Position {
    /// 駒のない局面
    pub fn empty(side_to_move: Color) -> Position {
        Position {
            board: [None; SQUARE_NB],
            hands: [Hand::EMPTY; Color::NUM],
            side_to_move,
        }
    }

    /// 初期局面
    ///
    /// 1 段目と 6 段目に 銀金玉金銀、3 段目と 4 段目の b〜d 筋に歩。Bottom の手番。
    pub fn initial() -> Position {
        const MAJOR: [PieceType; 5] = [
            PieceType::Silver,
            PieceType::Gold,
            PieceType::King,
            PieceType::Gold,
            PieceType::Silver,
        ];
        let mut pos = Position::empty(Color::Bottom);
        for (file, pt) in MAJOR.into_iter().enumerate() {
            pos.put_piece(Square::new(file, 0), Piece::new(Color::Bottom, pt));
            pos.put_piece(Square::new(file, 5), Piece::new(Color::Top, pt));
        }
        for file in 1..4 {
            pos.put_piece(Square::new(file, 2), Piece::new(Color::Bottom, PieceType::Pawn));
            pos.put_piece(Square::new(file, 3), Piece::new(Color::Top, PieceType::Pawn));
        }
        pos
    }

    /// 手番
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// 手番を設定
    #[inline]
    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    /// 手番を相手に渡す
    #[inline]
    pub fn pass_turn(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
    }

    /// 升の駒
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq.index()]
    }

    /// 駒を置く（既存の駒は上書き）
    #[inline]
    pub fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.board[sq.index()] = Some(piece);
    }

    /// 駒を取り除いて返す
    #[inline]
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.board[sq.index()].take()
    }

    /// 手駒
    #[inline]
    pub fn hand(&self, color: Color) -> Hand {
        self.hands[color.index()]
    }

    /// 手駒の枚数を設定
    #[inline]
    pub fn set_hand_count(&mut self, color: Color, pt: PieceType, count: u8) {
        self.hands[color.index()].set(pt, count);
    }

    /// 盤上の駒を行優先で列挙
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_on(sq).map(|p| (sq, p)))
    }

    /// 玉の位置
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.color == color && p.piece_type == PieceType::King)
            .map(|(sq, _)| sq)
    }

    /// 手番側として手を適用した新しい局面を返す（手番は変えない）
    pub fn apply_move(&self, mv: Move) -> Position {
        let mut next = self.clone();
        next.do_move(mv);
        next
    }

    /// 手番側として手を適用し、手番を相手に渡す
    pub fn play_move(&mut self, mv: Move) {
        self.do_move(mv);
        self.pass_turn();
    }

    /// 手番側として手をその場で適用し、巻き戻し用の差分を返す
    #[inline]
    pub fn do_move(&mut self, mv: Move) -> UndoInfo {
        self.do_move_as(self.side_to_move, mv)
    }

    /// `mover` の手としてその場で適用し、巻き戻し用の差分を返す（手番は変えない）
    ///
    /// - 駒打ち: 手駒を 1 枚減らし、生駒を置く
    /// - 移動: 移動先の駒を取って（成りを解除して）手駒に加え、必要なら成って置く
    pub fn do_move_as(&mut self, mover: Color, mv: Move) -> UndoInfo {
        match mv {
            Move::Drop { piece_type, to } => {
                self.hands[mover.index()].sub(piece_type);
                let captured = self.board[to.index()];
                self.put_piece(to, Piece::new(mover, piece_type));
                UndoInfo {
                    mv,
                    mover,
                    moved: None,
                    captured,
                }
            }
            Move::Normal { from, to, promote } => {
                let moved = self.remove_piece(from);
                let captured = self.remove_piece(to);
                if let Some(cap) = captured {
                    self.hands[mover.index()].add(cap.piece_type);
                }
                if let Some(piece) = moved {
                    let placed = if promote { piece.promote() } else { piece };
                    self.put_piece(to, placed);
                }
                UndoInfo {
                    mv,
                    mover,
                    moved,
                    captured,
                }
            }
        }
    }

    /// `do_move_as` の差分を巻き戻す
    pub fn undo_move(&mut self, undo: UndoInfo) {
        let UndoInfo {
            mv,
            mover,
            moved,
            captured,
        } = undo;
        match mv {
            Move::Drop { piece_type, to } => {
                self.board[to.index()] = captured;
                self.hands[mover.index()].add(piece_type);
            }
            Move::Normal { from, to, .. } => {
                if let Some(cap) = captured {
                    self.hands[mover.index()].sub(cap.piece_type);
                }
                self.board[to.index()] = captured;
                self.board[from.index()] = moved;
            }
        }
    }

    /// `mover` の手を試しに適用し、スコープを抜けると自動で巻き戻すガードを返す
    pub fn try_move_as(&mut self, mover: Color, mv: Move) -> MoveGuard<'_> {
        let undo = self.do_move_as(mover, mv);
        MoveGuard::new(self, undo)
    }
}
