use std::fs::File;
use std::io::{self, IsTerminal, Read, Write as _};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute, queue,
    terminal::{
        BeginSynchronizedUpdate, EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
        disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use hexgrid::app::App;

/// Terminal hex editor with a fixed 16-byte grid
#[derive(Parser, Debug)]
#[command(name = "hexgrid")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read-only mode
    #[arg(short, long)]
    readonly: bool,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 端末はUIが使うので、ログは指定されたファイルにのみ出力
    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    // 標準入力からデータを読み込む（パイプされている場合）
    let stdin_data = if args.file.is_none() && !io::stdin().is_terminal() {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        Some(data)
    } else {
        None
    };

    // ターミナルの初期化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // アプリケーションの実行
    let result = run_app(&mut terminal, args, stdin_data);

    // ターミナルの後処理
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableBracketedPaste, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    info!("hexgrid v{} starting...", env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, args: Args, stdin_data: Option<Vec<u8>>) -> Result<()> {
    let mut app = App::new();

    // データを読み込む（優先順位: ファイル > 標準入力）
    if let Some(ref path) = args.file {
        app.open(path, args.readonly)?;
    } else if let Some(data) = stdin_data {
        app.load_bytes(data, args.readonly);
    }

    let mut title = String::new();

    // メインループ
    loop {
        // タイトルは変更時のみ更新
        let new_title = window_title(&app);
        if new_title != title {
            execute!(terminal.backend_mut(), SetTitle(&new_title))?;
            title = new_title;
        }

        // Synchronized Update: 描画のちらつきを防止
        queue!(terminal.backend_mut(), BeginSynchronizedUpdate)?;
        terminal.draw(|f| app.draw(f))?;
        queue!(terminal.backend_mut(), EndSynchronizedUpdate)?;
        terminal.backend_mut().flush()?;

        app.handle_event()?;

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}

/// ウィンドウタイトル
fn window_title(app: &App) -> String {
    format!(
        "hexgrid - {}{}",
        app.filename().unwrap_or("[New File]"),
        if app.is_modified() { " [+]" } else { "" }
    )
}
