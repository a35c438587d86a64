// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::Parser;
use serpscout::config::settings::Settings;
use serpscout::presentation::cli::{self, Cli};
use serpscout::utils::telemetry;
use tracing::{debug, info};

/// 主函数
///
/// 加载 .env 和配置，初始化日志后分发子命令
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load .env before anything reads the environment
    let dotenv = dotenvy::dotenv();

    // 2. Parse arguments and initialize logging
    let args = Cli::parse();
    telemetry::init_telemetry(args.log_json);
    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => return Err(e.into()),
    }

    // 3. Load configuration
    let settings = Settings::new()?;
    info!("Configuration loaded");

    // 4. Dispatch
    cli::run(args.command, settings).await
}
