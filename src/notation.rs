//! 状态串解析和生成
//!
//! 让 CLI 可以无状态地驱动引擎。
//!
//! 格式: `<棋盘> <历史> <回合> <行棋方> <封锁格>`
//!
//! - 棋盘：3 行以 `/` 分隔，`X`/`O` 为标记，数字 (1-3) 为连续空格，如 `XO1/3/1O1`
//! - 历史：落子顺序的 `<方><格>@<回合>` 逗号列表，如 `x4@1,o0@2`；空历史为 `-`
//! - 回合：当前回合计数（从 1 开始）
//! - 行棋方：`x` 或 `o`
//! - 封锁格：格子索引或 `-`
//!
//! 解析时校验核心不变量：棋盘必须恰好是历史的投影，每方至多 3 枚存活标记。

use crate::board::Board;
use crate::types::{Mark, Side, CELL_COUNT, MARKS_PER_SIDE};

/// 解析状态串
pub fn parse_state(state: &str) -> Result<Board, String> {
    let parts: Vec<&str> = state.split_whitespace().collect();
    if parts.len() != 5 {
        return Err(format!(
            "Invalid state format: expected '<board> <history> <turn> <side> <blocked>', got: {}",
            state
        ));
    }

    let grid = parse_grid(parts[0])?;
    let history = parse_history(parts[1])?;

    let turn_count: u32 = parts[2]
        .parse()
        .map_err(|_| format!("Invalid turn count: {}", parts[2]))?;
    if turn_count == 0 {
        return Err("Turn count starts at 1".to_string());
    }

    let current = {
        let mut chars = parts[3].chars();
        match (chars.next().and_then(Side::from_state_char), chars.next()) {
            (Some(side), None) => side,
            _ => return Err(format!("Invalid side: {}", parts[3])),
        }
    };

    let blocked = match parts[4] {
        "-" => None,
        s => {
            let cell: usize = s.parse().map_err(|_| format!("Invalid blocked cell: {}", s))?;
            if cell >= CELL_COUNT {
                return Err(format!("Blocked cell out of range: {}", cell));
            }
            Some(cell)
        }
    };

    // 棋盘必须是历史的精确投影
    let mut projected: [Option<Side>; CELL_COUNT] = [None; CELL_COUNT];
    for mark in &history {
        if projected[mark.cell].is_some() {
            return Err(format!("Duplicate history entry for cell {}", mark.cell));
        }
        projected[mark.cell] = Some(mark.owner);
    }
    if projected != grid {
        return Err("Board is not the projection of history".to_string());
    }

    for side in [Side::X, Side::O] {
        let count = history.iter().filter(|m| m.owner == side).count();
        if count > MARKS_PER_SIDE {
            return Err(format!("Side {} has {} live marks (max 3)", side, count));
        }
    }

    // 年龄戳必须严格递增且早于当前回合
    for pair in history.windows(2) {
        if pair[0].placed_at_turn >= pair[1].placed_at_turn {
            return Err("History turn stamps must be strictly increasing".to_string());
        }
    }
    if let Some(last) = history.last() {
        if last.placed_at_turn >= turn_count {
            return Err("History turn stamps must be earlier than the turn count".to_string());
        }
    }

    if let Some(b) = blocked {
        if grid[b].is_some() {
            return Err(format!("Blocked cell {} is occupied", b));
        }
    }

    let board = Board::from_parts(history, current, turn_count, blocked);
    board.check_consistency()?;
    Ok(board)
}

/// 生成状态串
pub fn format_state(board: &Board) -> String {
    let mut grid = String::new();
    for row in 0..3 {
        if row > 0 {
            grid.push('/');
        }
        let mut empty_run = 0;
        for col in 0..3 {
            match board.mark_at(row * 3 + col) {
                Some(mark) => {
                    if empty_run > 0 {
                        grid.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    grid.push(mark.owner.to_board_char());
                }
                None => empty_run += 1,
            }
        }
        if empty_run > 0 {
            grid.push_str(&empty_run.to_string());
        }
    }

    let history = if board.history().is_empty() {
        "-".to_string()
    } else {
        board
            .history()
            .iter()
            .map(|m| format!("{}{}@{}", m.owner.to_state_char(), m.cell, m.placed_at_turn))
            .collect::<Vec<_>>()
            .join(",")
    };

    let blocked = match board.blocked_cell() {
        Some(cell) => cell.to_string(),
        None => "-".to_string(),
    };

    format!(
        "{} {} {} {} {}",
        grid,
        history,
        board.turn_count(),
        board.current_turn().to_state_char(),
        blocked
    )
}

fn parse_grid(s: &str) -> Result<[Option<Side>; CELL_COUNT], String> {
    let rows: Vec<&str> = s.split('/').collect();
    if rows.len() != 3 {
        return Err(format!("Board must have 3 rows: {}", s));
    }

    let mut grid: [Option<Side>; CELL_COUNT] = [None; CELL_COUNT];
    for (row_idx, row) in rows.iter().enumerate() {
        let mut col = 0usize;
        for c in row.chars() {
            match c {
                'X' => {
                    if col >= 3 {
                        return Err(format!("Row {} too long", row_idx));
                    }
                    grid[row_idx * 3 + col] = Some(Side::X);
                    col += 1;
                }
                'O' => {
                    if col >= 3 {
                        return Err(format!("Row {} too long", row_idx));
                    }
                    grid[row_idx * 3 + col] = Some(Side::O);
                    col += 1;
                }
                '1'..='3' => {
                    col += c as usize - '0' as usize;
                    if col > 3 {
                        return Err(format!("Row {} too long", row_idx));
                    }
                }
                _ => return Err(format!("Invalid board char: {}", c)),
            }
        }
        if col != 3 {
            return Err(format!("Row {} has {} cells, expected 3", row_idx, col));
        }
    }
    Ok(grid)
}

fn parse_history(s: &str) -> Result<Vec<Mark>, String> {
    if s == "-" {
        return Ok(Vec::new());
    }

    let mut history = Vec::new();
    for entry in s.split(',') {
        let (head, stamp) = entry
            .split_once('@')
            .ok_or_else(|| format!("Invalid history entry: {}", entry))?;

        let mut chars = head.chars();
        let side = chars
            .next()
            .and_then(Side::from_state_char)
            .ok_or_else(|| format!("Invalid history side in: {}", entry))?;
        let cell: usize = chars
            .as_str()
            .parse()
            .map_err(|_| format!("Invalid history cell in: {}", entry))?;
        if cell >= CELL_COUNT {
            return Err(format!("History cell out of range: {}", cell));
        }

        let placed_at_turn: u32 = stamp
            .parse()
            .map_err(|_| format!("Invalid history turn in: {}", entry))?;

        history.push(Mark::new(side, cell, placed_at_turn));
    }
    Ok(history)
}
