//! 詰み探索
//!
//! 攻め方の手番では「どれか 1 手で詰む」、受け方の手番では「どの応手でも詰む」を
//! 残り手数の範囲で調べる（AND/OR 木の全幅探索）。

use crate::movegen::{generate_legal, in_check, is_checkmate};
use crate::position::Position;
use crate::types::{Color, Move};

/// `attacker` が `ply_limit` 手以内に詰ませられるかを調べ、詰み手順を返す
///
/// 手番は `pos.side_to_move()` に従う。攻め方の手番から始めれば奇数手詰め、
/// 受け方の手番から始めれば応手を含めた手順になる。
/// `ply_limit <= 0` は常に `None`。受け方がすでに詰んでいれば空の手順を返す。
pub fn mate_search(pos: &Position, attacker: Color, ply_limit: i32) -> Option<Vec<Move>> {
    let mut work = pos.clone();
    search(&mut work, attacker, ply_limit)
}

fn search(pos: &mut Position, attacker: Color, depth: i32) -> Option<Vec<Move>> {
    if depth <= 0 {
        return None;
    }
    let side = pos.side_to_move();
    let moves = generate_legal(pos, side);
    if moves.is_empty() {
        return (side != attacker && in_check(pos, side)).then(Vec::new);
    }
    if side == attacker {
        attack(pos, attacker, depth, &moves)
    } else {
        defend(pos, attacker, depth, &moves)
    }
}

/// 攻め方: 1 手でも詰みに至れば成功
fn attack(pos: &mut Position, attacker: Color, depth: i32, moves: &[Move]) -> Option<Vec<Move>> {
    let defender = attacker.opponent();
    for &mv in moves {
        let undo = pos.do_move(mv);
        pos.pass_turn();
        let line = if is_checkmate(pos, defender) {
            Some(Vec::new())
        } else {
            search(pos, attacker, depth - 1)
        };
        pos.pass_turn();
        pos.undo_move(undo);

        if let Some(mut line) = line {
            line.insert(0, mv);
            return Some(line);
        }
    }
    None
}

/// 受け方: すべての応手が詰めば成功。最短の手順を返す
fn defend(pos: &mut Position, attacker: Color, depth: i32, moves: &[Move]) -> Option<Vec<Move>> {
    let mut shortest: Option<Vec<Move>> = None;
    for &mv in moves {
        let undo = pos.do_move(mv);
        pos.pass_turn();
        let line = search(pos, attacker, depth - 1);
        pos.pass_turn();
        pos.undo_move(undo);

        let mut line = line?;
        line.insert(0, mv);
        if shortest.as_ref().is_none_or(|best| line.len() < best.len()) {
            shortest = Some(line);
        }
    }
    shortest
}
