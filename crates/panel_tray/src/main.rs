use anyhow::{Context, Result};
use gtk::prelude::*;
use libappindicator::{AppIndicator, AppIndicatorStatus};
use panel_sync::{
    emit_entry_activated, emit_resync, names, proxy::PanelServiceProxy, run_reconciler, Geometry, PanelEntry,
    PanelItemRow, PanelService,
};
use std::{path::PathBuf, time::Duration};

mod opts;

/// Entry the stand-in service registers for our indicator.
const SERVED_ENTRY_ID: &str = "panel-entry-1";
const SERVED_PANEL_ID: &str = "panel0";

fn main() {
    let opts = opts::Opt::from_env();

    let log_level_filter = if opts.log_debug { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    if std::env::var("RUST_LOG").is_ok() {
        pretty_env_logger::init_timed();
    } else {
        pretty_env_logger::formatted_timed_builder()
            .filter(Some("panel_tray"), log_level_filter)
            .filter(Some("panel_sync"), log_level_filter)
            .init();
    }

    let result = match opts.action {
        opts::Action::Run { sync_timeout, icon_dir } => run_indicator(Duration::from_secs(sync_timeout), icon_dir),
        opts::Action::Serve { activate_every } => run_service(Duration::from_secs(activate_every)),
    };

    if let Err(err) = result {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

/// Show the indicator and reconcile its panel entry until the menu quits us.
fn run_indicator(sync_timeout: Duration, icon_dir: Option<PathBuf>) -> Result<()> {
    gtk::init().context("Failed to initialize gtk")?;

    let icon_dir = match icon_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    let mut indicator = AppIndicator::new(names::INDICATOR_NAME, "icon");
    indicator.set_icon_theme_path(icon_dir.to_str().context("Icon directory path is not valid unicode")?);
    indicator.set_status(AppIndicatorStatus::Active);

    let mut menu = gtk::Menu::new();
    let quit = gtk::MenuItem::with_label("Quit");
    quit.connect_activate(|_| gtk::main_quit());
    menu.append(&quit);
    menu.show_all();
    indicator.set_menu(&mut menu);

    init_async_part(sync_timeout);

    gtk::main();
    log::info!("main application thread finished");
    Ok(())
}

fn init_async_part(sync_timeout: Duration) {
    std::thread::spawn(move || {
        let rt =
            tokio::runtime::Builder::new_current_thread().enable_all().build().expect("Failed to initialize tokio runtime");
        rt.block_on(async {
            if let Err(err) = watch_panel_service(sync_timeout).await {
                log::error!("panel-service reconciliation stopped: {}", err);
            }
        })
    });
}

async fn watch_panel_service(sync_timeout: Duration) -> panel_sync::Result<()> {
    let con = zbus::Connection::session().await?;
    let proxy = PanelServiceProxy::new(&con).await?;

    let mut entry = PanelEntry::new(|geometry| {
        log::info!(
            "entry activated at ({}, {}), size {}x{}",
            geometry.x,
            geometry.y,
            geometry.width,
            geometry.height
        );
    });
    run_reconciler(&proxy, &mut entry, sync_timeout).await
}

/// Stand-in for the desktop shell's panel service: registers one entry for our
/// indicator, announces it, then periodically pretends the user activated it.
fn run_service(activate_every: Duration) -> Result<()> {
    let rt =
        tokio::runtime::Builder::new_current_thread().enable_all().build().context("Failed to initialize tokio runtime")?;
    rt.block_on(serve(activate_every))
}

async fn serve(activate_every: Duration) -> Result<()> {
    let con = zbus::Connection::session().await.context("Failed to connect to the session bus")?;

    let service = PanelService::new();
    service.push_row(PanelItemRow::new(names::APPLICATION_MODULE, SERVED_ENTRY_ID, names::INDICATOR_NAME));
    service.attach_to(&con).await.context("Failed to take over the panel-service name")?;
    log::info!("panel service up as {}", names::PANEL_BUS);

    emit_resync(&con, names::APPLICATION_MODULE).await?;

    let geometry = Geometry { x: 24, y: 0, width: 24, height: 24 };
    let mut ticker = tokio::time::interval(activate_every);
    ticker.tick().await; // the first tick completes immediately
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                log::info!("activating {}", SERVED_ENTRY_ID);
                emit_entry_activated(&con, SERVED_PANEL_ID, SERVED_ENTRY_ID, geometry).await?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
