//! Fading TTT AI CLI
//!
//! 命令行界面，用于测试引擎和 AI
//!
//! 支持两种模式：
//! 1. 单次命令模式：每次执行一个命令（moves / best / eval）
//! 2. Server 模式：长驻进程持有一局 Game，通过 stdin/stdout 通信

use clap::{Parser, Subcommand};
use fading_ttt_ai::{
    evaluate, format_state, get_node_count, parse_state, reset_node_count, AIConfig, AIEngine,
    Difficulty, Game, GameMode, GameResult, Side,
};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "fading-ttt-ai")]
#[command(about = "Fading tic-tac-toe (three-mark variant) AI engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 获取候选格
    Moves {
        /// 状态串
        #[arg(long)]
        state: String,
    },

    /// 选择最佳落子格
    Best {
        /// 状态串
        #[arg(long)]
        state: String,

        /// AI 难度 (easy, medium, hard, insane)
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// AI 策略，给定时覆盖难度 (random, minimax, exact)
        #[arg(long)]
        strategy: Option<String>,

        /// 策略模式下的搜索深度
        #[arg(long, default_value = "4")]
        depth: u32,

        /// 随机种子
        #[arg(long)]
        seed: Option<u64>,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 评估局面分数（行棋方视角的静态启发值）
    Eval {
        /// 状态串
        #[arg(long)]
        state: String,

        /// JSON 输出
        #[arg(long)]
        json: bool,
    },

    /// 启动 server 模式（stdin/stdout 通信）
    Server {
        /// 电脑走子前的延迟毫秒数（表现层节奏，不影响结果）
        #[arg(long, default_value = "0")]
        delay_ms: u64,

        /// AI 随机种子
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Serialize, Deserialize)]
struct BestResponse {
    cell: Option<usize>,
    nodes: u64,
    elapsed_ms: f64,
    nps: f64,
}

// Server 模式的请求和响应结构
#[derive(Serialize, Deserialize)]
struct ServerRequest {
    cmd: String,
    #[serde(default)]
    cell: Option<usize>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

#[derive(Serialize, Deserialize, Default)]
struct ServerResponse {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    computer_cell: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServerResponse {
    fn snapshot(game: &Game) -> Self {
        Self {
            ok: true,
            state: Some(format_state(game.board())),
            outcome: Some(outcome_str(game.outcome()).to_string()),
            ..Default::default()
        }
    }

    fn error(msg: &str) -> Self {
        Self {
            ok: false,
            error: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

fn outcome_str(result: GameResult) -> &'static str {
    match result {
        GameResult::Ongoing => "ongoing",
        GameResult::Win(Side::X) => "x_win",
        GameResult::Win(Side::O) => "o_win",
        GameResult::Draw => "draw",
    }
}

fn calc_nps(nodes: u64, elapsed_secs: f64) -> f64 {
    if elapsed_secs > 0.0 {
        nodes as f64 / elapsed_secs
    } else {
        0.0
    }
}

fn build_engine(
    difficulty: &str,
    strategy: Option<&str>,
    depth: u32,
    seed: Option<u64>,
) -> Result<AIEngine, String> {
    match strategy {
        Some(name) => {
            let config = AIConfig {
                depth,
                random_ratio: 0.0,
                seed,
            };
            AIEngine::from_strategy(name, &config)
        }
        None => {
            let level = Difficulty::from_name(difficulty)
                .ok_or_else(|| format!("Unknown difficulty: {}", difficulty))?;
            Ok(AIEngine::from_difficulty(level, seed))
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Moves { state } => match parse_state(&state) {
            Ok(board) => {
                let cells = board.candidate_cells();
                println!("Candidate cells ({}):", cells.len());
                for cell in &cells {
                    println!("  {}", cell);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Best {
            state,
            difficulty,
            strategy,
            depth,
            seed,
            json,
        } => {
            let board = match parse_state(&state) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let engine = match build_engine(&difficulty, strategy.as_deref(), depth, seed) {
                Ok(engine) => engine,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            reset_node_count();
            let start = Instant::now();
            let cell = engine.choose_cell(&board);
            let elapsed = start.elapsed().as_secs_f64();
            let nodes = get_node_count();
            let nps = calc_nps(nodes, elapsed);

            if json {
                let response = BestResponse {
                    cell,
                    nodes,
                    elapsed_ms: elapsed * 1000.0,
                    nps,
                };
                println!("{}", serde_json::to_string_pretty(&response).unwrap());
            } else {
                match cell {
                    Some(c) => println!(
                        "Best cell ({}): {}",
                        strategy.as_deref().unwrap_or(&difficulty),
                        c
                    ),
                    None => println!("No candidate cells: draw"),
                }
                println!(
                    "Stats: nodes={}, time={:.3}s, nps={:.0}",
                    nodes, elapsed, nps
                );
            }
        }

        Commands::Eval { state, json } => match parse_state(&state) {
            Ok(board) => {
                let side = board.current_turn();
                let score = evaluate(board.cells(), side);

                if json {
                    println!(
                        "{{\"state\": {:?}, \"side\": \"{}\", \"score\": {}}}",
                        state,
                        side.to_state_char(),
                        score
                    );
                } else {
                    println!("Eval ({} to move): {}", side, score);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },

        Commands::Server { delay_ms, seed } => {
            run_server(delay_ms, seed);
        }
    }
}

/// Server 模式主循环
///
/// 长驻进程持有一局 Game，从 stdin 读取 JSON 请求，返回 JSON 响应到 stdout。
/// 人类走子把回合交给电脑后，server 作为宿主按 delay_ms 延迟后立即代为
/// 执行电脑走子（延迟为零时即同步），对应原 UI 的 500ms 节奏延迟
fn run_server(delay_ms: u64, seed: Option<u64>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let mut game = Game::new();
    game.set_ai_seed(seed);

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        // 空行跳过
        if line.trim().is_empty() {
            continue;
        }

        let request: ServerRequest = match serde_json::from_str(&line) {
            Ok(r) => r,
            Err(e) => {
                let response = ServerResponse::error(&format!("Invalid JSON: {}", e));
                println!("{}", serde_json::to_string(&response).unwrap());
                let _ = stdout.flush();
                continue;
            }
        };

        let response = match request.cmd.as_str() {
            "select" => handle_select(&mut game, &request, delay_ms),
            "state" => ServerResponse::snapshot(&game),
            "reset" => {
                game.reset();
                ServerResponse::snapshot(&game)
            }
            "mode" => handle_mode(&mut game, &request),
            "difficulty" => handle_difficulty(&mut game, &request),
            "quit" => break,
            _ => ServerResponse::error(&format!("Unknown command: {}", request.cmd)),
        };

        println!("{}", serde_json::to_string(&response).unwrap());
        let _ = stdout.flush();
    }
}

/// 处理 select 命令：人类选格，必要时代为执行电脑走子
fn handle_select(game: &mut Game, request: &ServerRequest, delay_ms: u64) -> ServerResponse {
    let Some(cell) = request.cell else {
        return ServerResponse::error("select requires a cell");
    };

    // 引擎对非法走子的对外表现是无事发生，原因码仅放进响应便于调试
    let rejected = game.select_cell(cell).err();

    let mut response = ServerResponse::snapshot(game);
    response.rejected = rejected.map(|e| e.to_string());

    if rejected.is_none() && game.computer_pending() {
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
        match game.play_computer_move() {
            Ok(cell) => {
                response = ServerResponse::snapshot(game);
                response.computer_cell = cell;
            }
            Err(e) => return ServerResponse::error(&format!("Computer move failed: {}", e)),
        }
    }

    response
}

/// 处理 mode 命令
fn handle_mode(game: &mut Game, request: &ServerRequest) -> ServerResponse {
    let Some(name) = request.mode.as_deref() else {
        return ServerResponse::error("mode requires a mode name");
    };
    match GameMode::from_name(name) {
        Some(mode) => {
            game.set_mode(mode);
            ServerResponse::snapshot(game)
        }
        None => ServerResponse::error(&format!("Unknown mode: {}. Available: pvp, computer", name)),
    }
}

/// 处理 difficulty 命令
fn handle_difficulty(game: &mut Game, request: &ServerRequest) -> ServerResponse {
    let Some(name) = request.difficulty.as_deref() else {
        return ServerResponse::error("difficulty requires a level name");
    };
    match Difficulty::from_name(name) {
        Some(level) => {
            game.set_difficulty(level);
            ServerResponse::snapshot(game)
        }
        None => ServerResponse::error(&format!(
            "Unknown difficulty: {}. Available: easy, medium, hard, insane",
            name
        )),
    }
}
