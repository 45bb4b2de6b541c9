use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use usagebar::autostart::LoginItem;
use usagebar::config::{Command, Config};
use usagebar::notify::DesktopNotifier;
use usagebar::tray::App;
use usagebar_core::menu::ClickOutcome;
use usagebar_core::usage::UsageSource;
use usagebar_core::UsageCoreBuilder;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Config::parse_args();

    // Setup logging
    setup_logging(cli.debug);

    let data_dir = cli.data_dir()?;
    let core = UsageCoreBuilder::new(&data_dir).build();

    match cli.command() {
        Command::Run(run) => {
            let sources = run.build_sources()?;
            if sources.is_empty() {
                tracing::warn!("No usage sources configured; tray title stays empty");
            }
            let providers = sources
                .iter()
                .map(|s| (s.name().to_string(), s.tag().to_string()))
                .collect();

            let login_item = LoginItem::new(cli.launch_args())?;
            let app = App::new(core, login_item, providers);
            let stdin = BufReader::new(tokio::io::stdin());
            app.run(sources, DesktopNotifier::new(), stdin).await
        }
        Command::Settings => print_settings(&core.settings()),
        Command::Click { action_id, .. } => {
            let login_item = LoginItem::new(cli.launch_args())?;
            let mut menu = core.menu_controller(login_item);
            match menu.handle_click(&action_id)? {
                ClickOutcome::SettingsUpdated(settings) => print_settings(&settings),
                outcome => {
                    println!("{:?}", outcome);
                    Ok(())
                }
            }
        }
    }
}

fn print_settings(settings: &usagebar_core::config::Settings) -> Result<()> {
    let json = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    println!("{}", json);
    Ok(())
}

fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("usagebar=debug,usagebar_core=debug")
    } else {
        EnvFilter::new("usagebar=info,usagebar_core=info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
