//! Exact 策略 - 完整规则模拟的前瞻搜索
//!
//! 与默认 minimax 不同，递归中的每一步假想走子都经过真实规则引擎：
//! 三子淘汰、封锁格、自碰撞在每一层都被如实模拟。
//! 作为独立的可选策略提供，从不作为默认。

use super::{evaluate, AIConfig, AIStrategy, NODE_COUNT};
use crate::board::Board;
use crate::types::{GameResult, Side};
use log::debug;
use std::sync::atomic::Ordering;

/// Exact AI
pub struct ExactRulesAI {
    max_depth: u32,
}

impl ExactRulesAI {
    pub fn new(config: &AIConfig) -> Self {
        ExactRulesAI {
            max_depth: config.depth,
        }
    }

    /// 完整规则 minimax（带 Alpha-Beta 剪枝）
    ///
    /// 每层都克隆棋盘并走真实的 try_move，胜负分数与默认策略同样按深度修正
    fn search(&self, board: &Board, depth: u32, side: Side, mut alpha: i32, mut beta: i32) -> i32 {
        NODE_COUNT.fetch_add(1, Ordering::Relaxed);

        if let GameResult::Win(winner) = board.result() {
            return if winner == side {
                10 - depth as i32
            } else {
                -10 + depth as i32
            };
        }
        if depth == self.max_depth {
            return evaluate(board.cells(), side);
        }

        let candidates = board.candidate_cells();
        if candidates.is_empty() {
            // 无子可走：当作平局局面
            return 0;
        }

        let is_max = board.current_turn() == side;
        let mut best = if is_max { -1000 } else { 1000 };

        for cell in candidates {
            let mut child = board.clone();
            if child.try_move(cell).is_err() {
                continue;
            }
            let val = self.search(&child, depth + 1, side, alpha, beta);

            if is_max {
                best = best.max(val);
                alpha = alpha.max(best);
            } else {
                best = best.min(val);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

impl AIStrategy for ExactRulesAI {
    fn choose_cell(&self, board: &Board) -> Option<usize> {
        let side = board.current_turn();
        let candidates = board.candidate_cells();
        if candidates.is_empty() {
            return None;
        }

        let mut best_val = -1000;
        let mut best_move = None;

        for &cell in &candidates {
            let mut child = board.clone();
            if child.try_move(cell).is_err() {
                continue;
            }
            let val = self.search(&child, 1, side, -1000, 1000);
            if val > best_val {
                best_val = val;
                best_move = Some(cell);
            }
        }

        debug!(
            "exact root: side={} depth={} best={:?} score={}",
            side, self.max_depth, best_move, best_val
        );
        best_move
    }
}
