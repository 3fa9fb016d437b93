//! 对局会话状态机
//!
//! 包装规则引擎并提供 UI 协作方消费的命令面：选格、重置、切换模式和难度。
//! 电脑走子采用显式调度契约：引擎接受一步把回合交给电脑方的人类走子后，
//! 会话进入"电脑走子待发"状态；宿主可以延迟任意时长（包括零）再调用
//! `play_computer_move`，延迟只是表现层的节奏控制，不影响正确性。

use crate::ai::AIEngine;
use crate::board::Board;
use crate::types::{Difficulty, GameMode, GameResult, MoveError, Side};
use log::{debug, info};

/// 电脑固定执 O（后手）
pub const COMPUTER_SIDE: Side = Side::O;

/// 一局游戏的完整会话状态
pub struct Game {
    board: Board,
    mode: GameMode,
    difficulty: Difficulty,
    ai_seed: Option<u64>,
    /// 平局标志：只由搜索层找不到候选格时置位（见 outcome 的说明）
    draw: bool,
}

impl Default for Game {
    fn default() -> Self {
        Game::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Game {
            board: Board::new(),
            mode: GameMode::Pvp,
            difficulty: Difficulty::Medium,
            ai_seed: None,
            draw: false,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// 对局结果
    ///
    /// 规则引擎从不产生 Draw；平局只会经由电脑走子路径
    /// （搜索无候选格）置位。人人对战中填满且无连线的棋盘
    /// 会一直保持 Ongoing，这是有意保留的源行为。
    pub fn outcome(&self) -> GameResult {
        if self.draw {
            GameResult::Draw
        } else {
            self.board.result()
        }
    }

    /// UI 入口：人类点击了某格
    ///
    /// 人机模式下轮到电脑时忽略人类输入；其余情况转发给规则引擎。
    /// 所有拒绝对 UI 而言都是无事发生，原因码仅供调试
    pub fn select_cell(&mut self, cell: usize) -> Result<(), MoveError> {
        if self.draw {
            return Err(MoveError::GameOver);
        }
        if self.mode == GameMode::VsComputer && self.board.current_turn() == COMPUTER_SIDE {
            return Err(MoveError::OutOfTurn);
        }
        self.board.try_move(cell).map(|_| ())
    }

    /// 电脑走子是否待发
    pub fn computer_pending(&self) -> bool {
        self.mode == GameMode::VsComputer
            && !self.draw
            && self.board.result() == GameResult::Ongoing
            && self.board.current_turn() == COMPUTER_SIDE
    }

    /// 执行待发的电脑走子
    ///
    /// 按当前难度构建搜索引擎并通过同一条 try_move 路径落子。
    /// 搜索返回 None（无候选格）是唯一的平局信号路径
    pub fn play_computer_move(&mut self) -> Result<Option<usize>, MoveError> {
        if !self.computer_pending() {
            return Err(MoveError::OutOfTurn);
        }

        let engine = AIEngine::from_difficulty(self.difficulty, self.ai_seed);
        match engine.choose_cell(&self.board) {
            Some(cell) => {
                self.board.try_move(cell)?;
                debug!("computer played cell {}", cell);
                Ok(Some(cell))
            }
            None => {
                info!("no candidate cells for computer: signaling draw");
                self.draw = true;
                Ok(None)
            }
        }
    }

    /// 重置对局（保留模式与难度设置）
    pub fn reset(&mut self) {
        self.board.reset();
        self.draw = false;
    }

    /// 切换游戏模式（不重置棋盘，与源行为一致）
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
    }

    /// 切换难度
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// 固定 AI 随机种子（测试与复现用）
    pub fn set_ai_seed(&mut self, seed: Option<u64>) {
        self.ai_seed = seed;
    }
}
