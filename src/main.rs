//! sitelog - 呼び出し位置を扱うロギングファサードの動作確認ツール

mod cli;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}
