//! 褪子棋核心类型定义
//!
//! 定义三子限制井字棋（fading tic-tac-toe）中所有基础数据类型

use std::fmt;

/// 棋盘格子数（3x3，行优先索引 0-8）
pub const CELL_COUNT: usize = 9;

/// 每方同时存活的最大标记数
pub const MARKS_PER_SIDE: usize = 3;

/// 8 条胜利线（3 行、3 列、2 对角线）
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

lazy_static::lazy_static! {
    /// 按格子索引预计算的穿过该格的胜利线表
    pub static ref LINES_THROUGH: [Vec<[usize; 3]>; 9] = {
        let mut table: [Vec<[usize; 3]>; 9] = Default::default();
        for line in WIN_LINES {
            for cell in line {
                table[cell].push(line);
            }
        }
        table
    };
}

/// 阵营（显示为 X / O）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    X,
    O,
}

impl Side {
    /// 获取对方阵营
    pub fn opposite(&self) -> Side {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// 从状态串字符解析（小写）
    pub fn from_state_char(c: char) -> Option<Side> {
        match c.to_ascii_lowercase() {
            'x' => Some(Side::X),
            'o' => Some(Side::O),
            _ => None,
        }
    }

    /// 转换为状态串字符（小写）
    pub fn to_state_char(&self) -> char {
        match self {
            Side::X => 'x',
            Side::O => 'o',
        }
    }

    /// 棋盘显示字符（大写）
    pub fn to_board_char(&self) -> char {
        match self {
            Side::X => 'X',
            Side::O => 'O',
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_board_char())
    }
}

/// 一枚已落的标记
///
/// 创建后不可变，只会被整体淘汰（evict），不会原地修改
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pub owner: Side,
    pub cell: usize,
    /// 落子时的回合计数，用作年龄戳
    pub placed_at_turn: u32,
}

impl Mark {
    pub fn new(owner: Side, cell: usize, placed_at_turn: u32) -> Self {
        Mark {
            owner,
            cell,
            placed_at_turn,
        }
    }
}

/// 游戏模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// 双人对战
    Pvp,
    /// 人机对战（电脑执 O）
    VsComputer,
}

impl GameMode {
    pub fn from_name(name: &str) -> Option<GameMode> {
        match name.to_lowercase().as_str() {
            "pvp" => Some(GameMode::Pvp),
            "computer" | "vs_computer" => Some(GameMode::VsComputer),
            _ => None,
        }
    }
}

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Insane,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Difficulty> {
        match name.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "insane" => Some(Difficulty::Insane),
            _ => None,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Insane => "insane",
        };
        write!(f, "{}", name)
    }
}

/// 游戏结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Ongoing,
    Win(Side),
    Draw,
}

/// 走子被拒绝的原因
///
/// 规则引擎对外统一表现为"无事发生"，原因码仅用于测试和调试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    /// 索引越界（不在 0-8）
    OutOfRange,
    /// 目标格已有标记
    AlreadyOccupied,
    /// 目标格是封锁格
    CellBlocked,
    /// 对局已结束
    GameOver,
    /// 不是该方的回合
    OutOfTurn,
    /// 己方已有三子时落在即将淘汰的最老子上
    SelfCollision,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MoveError::OutOfRange => "cell index out of range",
            MoveError::AlreadyOccupied => "cell already occupied",
            MoveError::CellBlocked => "cell is blocked",
            MoveError::GameOver => "game is already over",
            MoveError::OutOfTurn => "not this side's turn",
            MoveError::SelfCollision => "cell collides with own oldest mark",
        };
        write!(f, "{}", msg)
    }
}
