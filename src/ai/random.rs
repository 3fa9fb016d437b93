//! 随机策略

use super::{AIStrategy, NODE_COUNT};
use crate::board::Board;
use rand::prelude::*;
use std::sync::atomic::Ordering;

/// 随机 AI - 在候选格中均匀随机选择
pub struct RandomAI {
    rng: StdRng,
}

impl RandomAI {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        RandomAI { rng }
    }
}

impl AIStrategy for RandomAI {
    fn choose_cell(&self, board: &Board) -> Option<usize> {
        NODE_COUNT.fetch_add(1, Ordering::Relaxed);
        let candidates = board.candidate_cells();
        let mut rng = self.rng.clone();
        candidates.choose(&mut rng).copied()
    }
}
