use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clothing-rec")]
#[command(about = "Upload a clothing photo, show detected tags and similar items", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// APIのベースURL（設定ファイル・環境変数より優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をアップロードしてタグと類似アイテムを表示
    Recommend {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 類似アイテムの取得件数（デフォルト: 設定ファイルの値）
        #[arg(short, long)]
        limit: Option<usize>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 保存せずにタグ付けのみ行う
    Tag {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,
    },

    /// アップロード済みアイテムのIDから類似アイテムを取得
    Similar {
        /// アイテムID
        #[arg(required = true)]
        id: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// 画像URLから推薦アイテムを取得
    ByUrl {
        /// 画像URL
        #[arg(required = true)]
        url: String,

        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// カタログCSVの再処理をバックエンドに依頼
    ProcessCatalog,

    /// 設定の表示・変更
    Config {
        /// APIのベースURLを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
