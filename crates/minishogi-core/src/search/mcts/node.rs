//! MCTS の探索木
//!
//! ノードは `Vec` に格納し、親子関係はインデックスで持つ。

use std::collections::HashMap;

use rand::Rng;

use crate::knowledge::MoveStats;
use crate::movegen::generate_legal;
use crate::position::Position;
use crate::types::Move;

pub(super) type NodeId = usize;

pub(super) const ROOT: NodeId = 0;

pub(super) struct Node {
    pub pos: Position,
    pub mv: Option<Move>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub untried: Vec<Move>,
    pub visits: u32,
    pub wins: f64,
}

impl Node {
    #[inline]
    pub fn win_ratio(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / f64::from(self.visits)
        }
    }

    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }
}

pub(super) struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(root: Position) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        tree.push(root, None, None);
        tree
    }

    fn push(&mut self, pos: Position, mv: Option<Move>, parent: Option<NodeId>) -> NodeId {
        let untried = generate_legal(&pos, pos.side_to_move());
        let id = self.nodes.len();
        self.nodes.push(Node {
            pos,
            mv,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            wins: 0.0,
        });
        if let Some(parent) = parent {
            self.nodes[parent].children.push(id);
        }
        id
    }

    fn child_position(&self, id: NodeId, mv: Move) -> Position {
        let mut pos = self.nodes[id].pos.clone();
        pos.play_move(mv);
        pos
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 知識にある手を訪問数・勝ち点つきの子として先に展開する
    pub fn seed_root(&mut self, prior: &HashMap<String, MoveStats>) {
        if prior.is_empty() {
            return;
        }
        let untried = std::mem::take(&mut self.nodes[ROOT].untried);
        let mut remaining = Vec::with_capacity(untried.len());
        for mv in untried {
            let Some(stats) = prior.get(&mv.to_string()) else {
                remaining.push(mv);
                continue;
            };
            let pos = self.child_position(ROOT, mv);
            let child = self.push(pos, Some(mv), Some(ROOT));
            self.nodes[child].visits = stats.visits;
            self.nodes[child].wins = stats.wins;
        }
        self.nodes[ROOT].untried = remaining;
    }

    /// 完全展開済みで子を持つ間、UCB1 で子をたどる
    pub fn select(&self, exploration: f64) -> NodeId {
        let mut id = ROOT;
        loop {
            let node = &self.nodes[id];
            if !node.is_fully_expanded() || node.children.is_empty() {
                return id;
            }
            match self.best_ucb_child(id, exploration) {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    /// UCB1 最大の子。未訪問の子があれば最初のものを返す
    fn best_ucb_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let parent_visits = f64::from(self.nodes[id].visits.max(1));
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for &child in &self.nodes[id].children {
            let node = &self.nodes[child];
            if node.visits == 0 {
                return Some(child);
            }
            let explore = exploration * (parent_visits.ln() / f64::from(node.visits)).sqrt();
            let score = node.win_ratio() + explore;
            if score > best_score {
                best_score = score;
                best = Some(child);
            }
        }
        best
    }

    /// 未試行の手を 1 つランダムに展開する。未試行がなければ自身を返す
    pub fn expand<R: Rng + ?Sized>(&mut self, id: NodeId, rng: &mut R) -> NodeId {
        let untried = &mut self.nodes[id].untried;
        if untried.is_empty() {
            return id;
        }
        let idx = rng.random_range(0..untried.len());
        let mv = untried.swap_remove(idx);
        let pos = self.child_position(id, mv);
        self.push(pos, Some(mv), Some(id))
    }

    /// 葉から根まで訪問数と報酬を加算（訪問数は `u32::MAX` で頭打ち）
    pub fn backpropagate(&mut self, leaf: NodeId, reward: f64) {
        let mut cursor = Some(leaf);
        while let Some(id) = cursor {
            let node = &mut self.nodes[id];
            node.visits = node.visits.saturating_add(1);
            node.wins += reward;
            cursor = node.parent;
        }
    }

    /// 根の子のうち訪問数最大のもの（同数なら先に展開されたもの）
    pub fn best_root_child(&self) -> Option<NodeId> {
        let mut best = None;
        let mut best_visits = None;
        for &child in &self.nodes[ROOT].children {
            let visits = self.nodes[child].visits;
            if best_visits.is_none_or(|b| visits > b) {
                best = Some(child);
                best_visits = Some(visits);
            }
        }
        best
    }

    /// 根の子の統計を手の表記をキーにして返す
    pub fn root_stats(&self) -> HashMap<String, MoveStats> {
        self.nodes[ROOT]
            .children
            .iter()
            .filter_map(|&child| {
                let node = &self.nodes[child];
                node.mv.map(|mv| {
                    (
                        mv.to_string(),
                        MoveStats {
                            visits: node.visits,
                            wins: node.wins,
                        },
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    use crate::types::{Color, Square};

    #[test]
    fn test_expand_consumes_untried() {
        let mut tree = Tree::new(Position::initial());
        let total = tree.node(ROOT).untried.len();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let child = tree.expand(ROOT, &mut rng);
        assert_ne!(child, ROOT);
        assert_eq!(tree.node(ROOT).untried.len(), total - 1);
        assert_eq!(tree.node(ROOT).children, vec![child]);
        // 子の局面は手番が交代している
        assert_eq!(tree.node(child).pos.side_to_move(), Color::Top);
    }

    #[test]
    fn test_backpropagate_reaches_root() {
        let mut tree = Tree::new(Position::initial());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(5);
        let child = tree.expand(ROOT, &mut rng);
        let grandchild = tree.expand(child, &mut rng);
        tree.backpropagate(grandchild, 1.0);
        tree.backpropagate(child, 0.5);
        assert_eq!(tree.node(ROOT).visits, 2);
        assert_eq!(tree.node(ROOT).wins, 1.5);
        assert_eq!(tree.node(grandchild).visits, 1);
        assert_eq!(tree.best_root_child(), Some(child));
    }

    #[test]
    fn test_seed_root_moves_prior_into_children() {
        let mut tree = Tree::new(Position::initial());
        let total = tree.node(ROOT).untried.len();
        let mv = Move::new_move(Square::new(2, 2), Square::new(2, 3), false);
        let mut prior = HashMap::new();
        prior.insert(mv.to_string(), MoveStats { visits: 9, wins: 4.0 });
        prior.insert("zzzz".to_string(), MoveStats { visits: 1, wins: 1.0 });
        tree.seed_root(&prior);

        assert_eq!(tree.node(ROOT).untried.len(), total - 1);
        assert!(!tree.node(ROOT).untried.contains(&mv));
        let child = tree.best_root_child().unwrap();
        assert_eq!(tree.node(child).mv, Some(mv));
        assert_eq!(tree.node(child).visits, 9);
        assert_eq!(tree.root_stats()[&mv.to_string()], MoveStats { visits: 9, wins: 4.0 });
    }

    #[test]
    fn test_select_prefers_unvisited_child() {
        let mut tree = Tree::new(Position::initial());
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(11);
        while !tree.node(ROOT).is_fully_expanded() {
            tree.expand(ROOT, &mut rng);
        }
        let first = tree.node(ROOT).children[0];
        tree.backpropagate(first, 1.0);
        let picked = tree.select(1.2);
        assert_ne!(picked, first);
        assert_eq!(tree.node(picked).visits, 0);
    }
}
