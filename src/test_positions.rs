//! 褪子棋测试局面库
//!
//! 提供命名的状态串测试局面，方便测试、基准和调试
//!
//! 命名规范:
//! - START: 初始局面
//! - EARLY_n: 开局后 1-4 步
//! - MID_n: 双方饱和的中局
//! - WIN_n: 一步可胜的局面
//! - SPECIAL_n: 特殊情况（封锁格、伪威胁等）

// =============================================================================
// 开局 (START / EARLY)
// =============================================================================

/// 初始局面 - 空棋盘，X 先行
pub const START: &str = "3/3/3 - 1 x -";

/// X 第一步占中心
pub const EARLY_1: &str = "3/1X1/3 x4@1 2 o -";

/// O 回应占角
pub const EARLY_2: &str = "O2/1X1/3 x4@1,o0@2 3 x -";

/// 4 步后的典型开局
pub const EARLY_3: &str = "O2/1X1/1OX x4@1,o0@2,x8@3,o7@4 5 x -";

// =============================================================================
// 中局 (MID) - 双方各三子饱和，下一子触发淘汰
// =============================================================================

/// X: {0,1,8}，O: {5,6,7}，轮到 X，第四子将淘汰 0
pub const MID_1: &str = "XX1/2O/OOX x0@1,o5@2,x1@3,o6@4,x8@5,o7@6 7 x -";

/// X: {1,4,8}，O: {5,6,7}，0 是封锁格（X 刚淘汰过 0）
pub const MID_2: &str = "1X1/1XO/OOX o5@2,x1@3,o6@4,x8@5,o7@6,x4@7 8 o 0";

// =============================================================================
// 一步可胜 (WIN)
// =============================================================================

/// 轮到 O，落 6 连成左列 0-3-6
pub const WIN_O_AT_6: &str = "O2/OXX/2X x4@1,o0@2,x8@3,o3@4,x5@5 6 o -";

/// 轮到 X，落 2 连成顶行 0-1-2
pub const WIN_X_AT_2: &str = "XX1/OO1/3 x0@1,o3@2,x1@3,o4@4 5 x -";

// =============================================================================
// 特殊情况 (SPECIAL)
// =============================================================================

/// O 在 6 可连线，但 6 恰是封锁格
pub const SPECIAL_BLOCKED_WIN: &str = "O2/O2/3 o0@2,o3@4 5 o 6";

/// X 的 0-1-2 与 0-4-8 都是伪威胁：落子会先淘汰最老的 0
pub const SPECIAL_FAKE_THREATS: &str = "XX1/O2/OOX x0@1,o6@2,x1@3,o7@4,x8@5,o3@6 7 x -";
