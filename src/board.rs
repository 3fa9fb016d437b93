//! 褪子棋规则引擎
//!
//! 负责棋盘状态转移：合法性检查、落子、最老子淘汰、封锁格生命周期、胜负判定。
//!
//! 核心一致性不变量：`cells` 永远是 `history` 在格子索引上的投影，
//! 两者不允许出现任何分歧。

use crate::types::{
    GameResult, Mark, MoveError, Side, CELL_COUNT, LINES_THROUGH, MARKS_PER_SIDE, WIN_LINES,
};
use log::debug;

/// 一次被接受走子的记录
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub mark: Mark,
    /// 本次走子淘汰掉的最老子（若有）
    pub evicted: Option<Mark>,
}

/// 规则引擎棋盘
#[derive(Debug, Clone)]
pub struct Board {
    /// 9 个格子（行优先），每格为空或一枚标记
    cells: [Option<Mark>; CELL_COUNT],
    /// 所有存活标记，落子顺序即年龄顺序，是淘汰决策的唯一依据
    history: Vec<Mark>,
    /// 当前行棋方
    current: Side,
    /// 回合计数，从 1 开始，每次接受走子后递增
    turn_count: u32,
    /// 封锁格：最近一次淘汰腾出的格子，除 reset 外永不清除
    blocked: Option<usize>,
    /// 对局结果（本组件只会产生 Ongoing / Win，从不产生 Draw）
    result: GameResult,
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl Board {
    /// 创建初始棋盘，X 先行
    pub fn new() -> Self {
        Board {
            cells: [None; CELL_COUNT],
            history: Vec::new(),
            current: Side::X,
            turn_count: 1,
            blocked: None,
            result: GameResult::Ongoing,
        }
    }

    /// 从已有状态组装棋盘（notation 解析用）
    pub(crate) fn from_parts(
        history: Vec<Mark>,
        current: Side,
        turn_count: u32,
        blocked: Option<usize>,
    ) -> Board {
        let mut cells: [Option<Mark>; CELL_COUNT] = [None; CELL_COUNT];
        for mark in &history {
            cells[mark.cell] = Some(*mark);
        }
        let result = match Self::winner_on(&cells) {
            Some(side) => GameResult::Win(side),
            None => GameResult::Ongoing,
        };
        Board {
            cells,
            history,
            current,
            turn_count,
            blocked,
            result,
        }
    }

    #[inline]
    pub fn current_turn(&self) -> Side {
        self.current
    }

    #[inline]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[inline]
    pub fn blocked_cell(&self) -> Option<usize> {
        self.blocked
    }

    #[inline]
    pub fn result(&self) -> GameResult {
        self.result
    }

    /// 获取某格的标记
    #[inline]
    pub fn mark_at(&self, cell: usize) -> Option<&Mark> {
        if cell >= CELL_COUNT {
            return None;
        }
        self.cells[cell].as_ref()
    }

    /// 所有存活标记（落子顺序）
    #[inline]
    pub fn history(&self) -> &[Mark] {
        &self.history
    }

    /// 9 格快照，供 AI 做纯填格模拟
    #[inline]
    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    /// 某方当前存活标记数
    pub fn live_marks(&self, side: Side) -> usize {
        self.history.iter().filter(|m| m.owner == side).count()
    }

    /// 某方当前最老的存活标记
    ///
    /// history 本身就是落子顺序，第一个命中即最老（年龄戳相同时也由此定序）
    pub fn oldest_mark(&self, side: Side) -> Option<&Mark> {
        self.history.iter().find(|m| m.owner == side)
    }

    /// 派生显示查询：该格的标记是否是其主人即将被淘汰的最老子
    ///
    /// 仅当该方恰好已有 3 枚存活标记时才成立；按需重算，不作为引擎状态保存
    pub fn is_oldest_mark(&self, cell: usize) -> bool {
        let Some(mark) = self.mark_at(cell) else {
            return false;
        };
        if self.live_marks(mark.owner) < MARKS_PER_SIDE {
            return false;
        }
        self.oldest_mark(mark.owner)
            .is_some_and(|oldest| oldest.cell == cell)
    }

    /// 所有候选格：空且未被封锁，按索引升序
    pub fn candidate_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT)
            .filter(|&i| self.cells[i].is_none() && Some(i) != self.blocked)
            .collect()
    }

    /// 以当前行棋方走子
    pub fn try_move(&mut self, cell: usize) -> Result<MoveRecord, MoveError> {
        self.try_move_as(cell, self.current)
    }

    /// 以指定阵营走子
    ///
    /// 被拒绝时状态完全不变，只返回原因码
    pub fn try_move_as(&mut self, cell: usize, side: Side) -> Result<MoveRecord, MoveError> {
        if cell >= CELL_COUNT {
            return Err(MoveError::OutOfRange);
        }
        if self.result != GameResult::Ongoing {
            return Err(MoveError::GameOver);
        }
        if side != self.current {
            return Err(MoveError::OutOfTurn);
        }
        if self.cells[cell].is_some() {
            // 已有三子时落在自己即将淘汰的最老子上是独立的自碰撞规则，
            // 不能与普通的占用拒绝混为一谈
            if self.live_marks(side) >= MARKS_PER_SIDE
                && self.oldest_mark(side).is_some_and(|m| m.cell == cell)
            {
                return Err(MoveError::SelfCollision);
            }
            return Err(MoveError::AlreadyOccupied);
        }
        if Some(cell) == self.blocked {
            return Err(MoveError::CellBlocked);
        }

        // 已有三子：第四子触发最老子淘汰，腾出的格子进入封锁
        let evicted = if self.live_marks(side) >= MARKS_PER_SIDE {
            self.oldest_mark(side).copied()
        } else {
            None
        };
        if let Some(oldest) = evicted {
            self.cells[oldest.cell] = None;
            self.history.retain(|m| m.cell != oldest.cell);
            self.blocked = Some(oldest.cell);
        }

        let mark = Mark::new(side, cell, self.turn_count);
        self.cells[cell] = Some(mark);
        self.history.push(mark);

        self.current = self.current.opposite();
        self.turn_count += 1;

        // 只需检查穿过新落子格的线
        if LINES_THROUGH[cell]
            .iter()
            .any(|line| self.line_owned_by(line, side))
        {
            self.result = GameResult::Win(side);
        }

        debug!(
            "move accepted: side={} cell={} evicted={:?} blocked={:?} turn={}",
            side, cell, evicted.map(|m| m.cell), self.blocked, self.turn_count
        );

        Ok(MoveRecord { mark, evicted })
    }

    #[inline]
    fn line_owned_by(&self, line: &[usize; 3], side: Side) -> bool {
        line.iter()
            .all(|&i| self.cells[i].is_some_and(|m| m.owner == side))
    }

    /// 纯函数：扫描 8 条胜利线，返回赢家
    ///
    /// 同时被引擎和 AI 的填格模拟使用
    pub fn winner_on(cells: &[Option<Mark>; CELL_COUNT]) -> Option<Side> {
        for line in &WIN_LINES {
            if let Some(first) = cells[line[0]] {
                if line[1..]
                    .iter()
                    .all(|&i| cells[i].is_some_and(|m| m.owner == first.owner))
                {
                    return Some(first.owner);
                }
            }
        }
        None
    }

    /// 重置到初始状态，幂等
    pub fn reset(&mut self) {
        *self = Board::new();
    }

    /// 校验核心一致性不变量（测试与解析用）
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        let live_on_board = self.cells.iter().filter(|c| c.is_some()).count();
        if live_on_board != self.history.len() {
            return Err(format!(
                "board has {} marks but history has {}",
                live_on_board,
                self.history.len()
            ));
        }
        for mark in &self.history {
            match self.cells.get(mark.cell).and_then(|c| c.as_ref()) {
                Some(on_board) if *on_board == *mark => {}
                _ => return Err(format!("history mark at cell {} not on board", mark.cell)),
            }
        }
        for side in [Side::X, Side::O] {
            if self.live_marks(side) > MARKS_PER_SIDE {
                return Err(format!("side {} has more than 3 live marks", side));
            }
        }
        if let Some(b) = self.blocked {
            if b >= CELL_COUNT {
                return Err(format!("blocked cell {} out of range", b));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(board: &mut Board, cells: &[usize]) {
        for &cell in cells {
            board.try_move(cell).unwrap();
        }
    }

    #[test]
    fn test_first_move_center() {
        let mut board = Board::new();
        let rec = board.try_move(4).unwrap();

        assert_eq!(rec.mark.owner, Side::X);
        assert_eq!(rec.mark.placed_at_turn, 1);
        assert!(rec.evicted.is_none());
        assert_eq!(board.mark_at(4).unwrap().owner, Side::X);
        assert_eq!(board.current_turn(), Side::O);
        assert_eq!(board.turn_count(), 2);
        board.check_consistency().unwrap();
    }

    #[test]
    fn test_reject_occupied() {
        let mut board = Board::new();
        play(&mut board, &[4]);
        let before = board.clone();

        assert_eq!(board.try_move(4), Err(MoveError::AlreadyOccupied));
        assert_eq!(board.cells(), before.cells());
        assert_eq!(board.turn_count(), before.turn_count());
    }

    #[test]
    fn test_reject_out_of_turn() {
        let mut board = Board::new();
        assert_eq!(board.try_move_as(0, Side::O), Err(MoveError::OutOfTurn));
        assert_eq!(board.turn_count(), 1);
    }

    #[test]
    fn test_reject_out_of_range() {
        let mut board = Board::new();
        assert_eq!(board.try_move(9), Err(MoveError::OutOfRange));
    }

    #[test]
    fn test_fourth_mark_evicts_oldest() {
        let mut board = Board::new();
        // X: {0,1,8} / O: {5,6,7}，双方各三子
        play(&mut board, &[0, 5, 1, 6, 8, 7]);

        // X 已有 {0,1,8}，第四子落 2 淘汰最老的 0
        let rec = board.try_move(2).unwrap();
        let evicted = rec.evicted.unwrap();
        assert_eq!(evicted.cell, 0);
        assert_eq!(evicted.owner, Side::X);
        assert_eq!(evicted.placed_at_turn, 1);

        assert!(board.mark_at(0).is_none());
        assert_eq!(board.mark_at(2).unwrap().owner, Side::X);
        assert_eq!(board.blocked_cell(), Some(0));
        assert_eq!(board.live_marks(Side::X), 3);
        board.check_consistency().unwrap();
    }

    #[test]
    fn test_blocked_cell_rejected_and_permanent() {
        let mut board = Board::new();
        play(&mut board, &[0, 5, 1, 6, 8, 7]);
        board.try_move(2).unwrap(); // X 淘汰 0，封锁 0

        // O 落封锁格被拒
        assert_eq!(board.try_move(0), Err(MoveError::CellBlocked));
        assert_eq!(board.blocked_cell(), Some(0));

        // 多个回合后封锁依然存在：除 reset 外永不清除
        board.try_move(3).unwrap(); // O 第四子，淘汰 O 最老的 5，封锁变为 5
        assert_eq!(board.blocked_cell(), Some(5));
        board.reset();
        assert_eq!(board.blocked_cell(), None);
    }

    #[test]
    fn test_self_collision_on_own_oldest() {
        let mut board = Board::new();
        play(&mut board, &[0, 5, 1, 6, 8, 7]);
        let before_turn = board.turn_count();

        // X 已有三子，最老是 0；落回 0 属于自碰撞而非封锁
        assert_eq!(board.try_move(0), Err(MoveError::SelfCollision));
        assert_eq!(board.turn_count(), before_turn);
        assert!(board.mark_at(0).is_some());
        assert_eq!(board.blocked_cell(), None);
    }

    #[test]
    fn test_win_detection_all_lines() {
        for line in &WIN_LINES {
            let mut cells: [Option<Mark>; CELL_COUNT] = [None; CELL_COUNT];
            for &i in line {
                cells[i] = Some(Mark::new(Side::O, i, 1));
            }
            assert_eq!(Board::winner_on(&cells), Some(Side::O), "line {:?}", line);
        }
        // 无连线时不产生赢家
        let mut cells: [Option<Mark>; CELL_COUNT] = [None; CELL_COUNT];
        cells[0] = Some(Mark::new(Side::X, 0, 1));
        cells[1] = Some(Mark::new(Side::O, 1, 2));
        cells[2] = Some(Mark::new(Side::X, 2, 3));
        assert_eq!(Board::winner_on(&cells), None);
    }

    #[test]
    fn test_win_ends_game() {
        let mut board = Board::new();
        play(&mut board, &[0, 3, 1, 4, 2]); // X: 0-1-2
        assert_eq!(board.result(), GameResult::Win(Side::X));

        // 结束后任何走子都被拒绝
        assert_eq!(board.try_move(5), Err(MoveError::GameOver));
    }

    #[test]
    fn test_eviction_can_break_win_line() {
        let mut board = Board::new();
        // X: {0,1,8}，O: {5,6,7}；X 第四子落 2 淘汰 0，因此 0-1-2 不成线
        play(&mut board, &[0, 5, 1, 6, 8, 7]);
        board.try_move(2).unwrap();
        assert_eq!(board.result(), GameResult::Ongoing);
    }

    #[test]
    fn test_board_never_signals_draw() {
        // 规则引擎自身从不产生 Draw：双方标记数饱和且无人连线时保持 Ongoing。
        // 这是源行为的已知怪癖，平局只由搜索层在无候选时发出信号。
        let mut board = Board::new();
        play(&mut board, &[0, 1, 2, 5, 3, 8]);
        // X: {0,2,3} O: {1,5,8}，无人连线
        assert_eq!(board.result(), GameResult::Ongoing);
        assert_eq!(board.live_marks(Side::X), 3);
        assert_eq!(board.live_marks(Side::O), 3);
    }

    #[test]
    fn test_history_projection_invariant() {
        let mut board = Board::new();
        for cell in [4, 0, 1, 8, 7, 2, 3, 6] {
            // 非法走子直接跳过，合法走子后校验不变量
            let _ = board.try_move(cell);
            board.check_consistency().unwrap();
        }
    }

    #[test]
    fn test_candidate_cells_exclude_blocked() {
        let mut board = Board::new();
        play(&mut board, &[0, 5, 1, 6, 8, 7]);
        board.try_move(2).unwrap(); // 封锁 0

        let candidates = board.candidate_cells();
        assert!(!candidates.contains(&0), "blocked cell must be excluded");
        assert!(!candidates.contains(&2), "occupied cell must be excluded");
        assert_eq!(candidates, vec![3, 4]);
    }

    #[test]
    fn test_is_oldest_mark_query() {
        let mut board = Board::new();
        play(&mut board, &[0, 5, 1, 6]);
        // X 只有两子时没有"最老子"高亮
        assert!(!board.is_oldest_mark(0));

        play(&mut board, &[8, 7]);
        assert!(board.is_oldest_mark(0)); // X 三子，最老是 0
        assert!(board.is_oldest_mark(5)); // O 三子，最老是 5
        assert!(!board.is_oldest_mark(1));
        assert!(!board.is_oldest_mark(3)); // 空格
    }

    #[test]
    fn test_reset_idempotent() {
        let mut board = Board::new();
        play(&mut board, &[0, 5, 1, 6, 8, 7]);
        board.try_move(2).unwrap();

        board.reset();
        board.reset();
        assert_eq!(board.turn_count(), 1);
        assert_eq!(board.current_turn(), Side::X);
        assert_eq!(board.blocked_cell(), None);
        assert!(board.history().is_empty());
        assert_eq!(board.result(), GameResult::Ongoing);
    }
}
