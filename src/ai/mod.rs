//! AI 策略模块
//!
//! 提供多种走子策略实现：随机、默认 minimax、以及完整规则模拟的 exact 变体

mod exact;
mod minimax;
mod random;

pub use exact::ExactRulesAI;
pub use minimax::{evaluate, MinimaxAI};
pub use random::RandomAI;

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::board::Board;
use crate::types::Difficulty;

/// 全局节点计数器
pub static NODE_COUNT: AtomicU64 = AtomicU64::new(0);

/// 重置节点计数器
pub fn reset_node_count() {
    NODE_COUNT.store(0, AtomicOrdering::Relaxed);
}

/// 获取当前节点计数
pub fn get_node_count() -> u64 {
    NODE_COUNT.load(AtomicOrdering::Relaxed)
}

/// 可用策略名称
pub const AVAILABLE_STRATEGIES: [&str; 3] = ["random", "minimax", "exact"];

/// 默认策略
pub const DEFAULT_STRATEGY: &str = "minimax";

/// AI 配置
#[derive(Debug, Clone)]
pub struct AIConfig {
    /// 搜索深度上限
    pub depth: u32,
    /// 直接随机走子的概率（0.0-1.0），易/中难度的掷硬币分支
    pub random_ratio: f64,
    /// 随机种子
    pub seed: Option<u64>,
}

impl Default for AIConfig {
    fn default() -> Self {
        AIConfig {
            depth: 3,
            random_ratio: 0.0,
            seed: None,
        }
    }
}

impl AIConfig {
    /// 难度到搜索参数的映射
    ///
    /// easy: 70% 随机 / 30% 深度 2；medium: 30% 随机 / 70% 深度 3；
    /// hard: 总是深度 4；insane: 总是深度 6
    pub fn from_difficulty(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let (depth, random_ratio) = match difficulty {
            Difficulty::Easy => (2, 0.7),
            Difficulty::Medium => (3, 0.3),
            Difficulty::Hard => (4, 0.0),
            Difficulty::Insane => (6, 0.0),
        };
        AIConfig {
            depth,
            random_ratio,
            seed,
        }
    }
}

/// AI 策略接口
pub trait AIStrategy {
    /// 为当前行棋方选择一个候选格
    ///
    /// 无候选格时返回 None（由会话层转化为平局信号）
    fn choose_cell(&self, board: &Board) -> Option<usize>;
}

/// AI 引擎 - 统一的策略入口
pub struct AIEngine {
    strategy: Box<dyn AIStrategy>,
}

impl AIEngine {
    /// 创建随机 AI
    pub fn random(seed: Option<u64>) -> Self {
        AIEngine {
            strategy: Box::new(RandomAI::new(seed)),
        }
    }

    /// 创建默认 minimax AI
    pub fn minimax(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(MinimaxAI::new(config)),
        }
    }

    /// 创建完整规则模拟的 exact AI
    pub fn exact(config: &AIConfig) -> Self {
        AIEngine {
            strategy: Box::new(ExactRulesAI::new(config)),
        }
    }

    /// 从难度创建（默认 minimax 策略）
    pub fn from_difficulty(difficulty: Difficulty, seed: Option<u64>) -> Self {
        Self::minimax(&AIConfig::from_difficulty(difficulty, seed))
    }

    /// 从策略名称创建
    pub fn from_strategy(name: &str, config: &AIConfig) -> Result<Self, String> {
        match name.to_lowercase().as_str() {
            "random" => Ok(Self::random(config.seed)),
            "minimax" => Ok(Self::minimax(config)),
            "exact" => Ok(Self::exact(config)),
            _ => Err(format!(
                "Unknown strategy: {}. Available: {}",
                name,
                AVAILABLE_STRATEGIES.join(", ")
            )),
        }
    }

    /// 为当前行棋方选择一个候选格
    pub fn choose_cell(&self, board: &Board) -> Option<usize> {
        self.strategy.choose_cell(board)
    }
}
