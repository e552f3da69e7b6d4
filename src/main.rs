// src/main.rs

use clap::{Parser, Subcommand};
use path_absolutize::Absolutize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vue_convention_routes::{ConventionRoutes, HistoryMode, Options, build_routes};

/// CLI 引数定義
#[derive(Parser, Debug)]
#[command(
    name = "vue-convention-routes",
    version,
    about = "ページディレクトリから vue-router のルーティングを生成し、エントリファイルに組み込む CLI ツール"
)]
struct Cli {
    /// プロジェクトルート
    #[arg(short = 'r', long = "root", value_name = "DIR", default_value = ".", global = true)]
    root: PathBuf,

    /// 設定ファイル (JSON: `{ "pageDir": "...", "history": "history" | "hash" }`)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// ページディレクトリ (設定ファイルより優先)
    #[arg(long, value_name = "DIR", global = true)]
    page_dir: Option<PathBuf>,

    /// 履歴モード (設定ファイルより優先)
    #[arg(long, value_enum, global = true)]
    history: Option<HistoryMode>,

    /// ログを詳しくする (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 仮想モジュールのソースを出力する
    Generate {
        /// 出力先 (省略時は標準出力)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// ルートツリーを JSON で出力する
    Routes,
    /// エントリファイルを変換して出力する
    Transform {
        /// 変換するファイル
        file: PathBuf,
        /// 出力先 (省略時は標準出力)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1) CLI 引数をパースし、ログを初期化
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 2) 設定ファイル → CLI 引数の順に設定をマージ
    let mut options = match &cli.config {
        Some(path) => Options::from_file(path)?,
        None => Options::default(),
    };
    if let Some(page_dir) = cli.page_dir {
        options = options.with_page_dir(page_dir);
    }
    if let Some(history) = cli.history {
        options = options.with_history(history);
    }

    let project_dir = cli.root.absolutize()?.to_path_buf();
    info!(root = %project_dir.display(), ?options, "設定を確定しました");

    match cli.command {
        Command::Generate { out } => {
            let plugin = ConventionRoutes::new(options);
            plugin.config_resolved(&project_dir)?;
            info!(
                plugin = plugin.name(),
                page_dir = %plugin.options().page_dir.display(),
                history = ?plugin.options().history,
                "ルートモジュールを生成しました"
            );
            let module = plugin
                .resolve_id(vue_convention_routes::VIRTUAL_MODULE_ID)
                .and_then(|id| plugin.load(id))
                .unwrap_or_default();
            write_output(out.as_deref(), module)?;
        }
        Command::Routes => {
            // 3) ルートツリーを JSON 化して標準出力
            let routes = build_routes(&project_dir, &options)?;
            let json = serde_json::to_string_pretty(&routes)?;
            println!("{}", json);
        }
        Command::Transform { file, out } => {
            let file = file.absolutize()?.to_path_buf();
            let code = fs::read_to_string(&file)?;

            let plugin = ConventionRoutes::new(options);
            plugin.config_resolved(&project_dir)?;
            info!(
                plugin = plugin.name(),
                page_dir = %plugin.options().page_dir.display(),
                history = ?plugin.options().history,
                "ルートモジュールを生成しました"
            );
            let output = match plugin.transform(&code, &file.to_string_lossy())? {
                Some(transformed) => transformed,
                None => {
                    info!(file = %file.display(), "エントリファイルではないため変換しません");
                    code
                }
            };
            write_output(out.as_deref(), &output)?;
        }
    }

    Ok(())
}

/// RUST_LOG があればそれを優先し、なければ -v の数でレベルを決める
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn write_output(out: Option<&Path>, contents: &str) -> std::io::Result<()> {
    match out {
        Some(path) => fs::write(path, contents),
        None => {
            print!("{}", contents);
            Ok(())
        }
    }
}
