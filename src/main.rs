use anyhow::Result;
use clap::Parser;
use mock_interview::{logger, App, Cli, Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::load(cli.config.as_deref())?;

    // 初始化日志
    logger::init_with_verbosity(cli.verbose || config.verbose_logging);

    // 离线解析不需要 API 密钥
    if !matches!(cli.command, Command::ParseQuiz { .. }) {
        config.validate()?;
    }

    // 初始化并运行应用
    let app = App::initialize(config, &cli.command)?;
    app.run(cli.command).await?;

    Ok(())
}
