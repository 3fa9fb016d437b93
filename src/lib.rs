//! Fading Tic-Tac-Toe AI Engine
//!
//! 褪子棋（三子限制井字棋）规则引擎与走子搜索 - 支持状态串输入输出

pub mod ai;
pub mod board;
pub mod game;
pub mod notation;
pub mod test_positions;
pub mod types;

pub use ai::{
    evaluate, get_node_count, reset_node_count, AIConfig, AIEngine, AIStrategy, ExactRulesAI,
    MinimaxAI, RandomAI, AVAILABLE_STRATEGIES, DEFAULT_STRATEGY,
};
pub use board::{Board, MoveRecord};
pub use game::{Game, COMPUTER_SIDE};
pub use notation::{format_state, parse_state};
pub use types::{
    Difficulty, GameMode, GameResult, Mark, MoveError, Side, CELL_COUNT, MARKS_PER_SIDE, WIN_LINES,
};
