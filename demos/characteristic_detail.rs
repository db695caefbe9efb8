use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Central as _, Peripheral as _, ScanFilter};
use chardetail::api::central::PeripheralId;
use chardetail::api::dialogs::{PromptResult, UserDialogs};
use chardetail::config::DetailConfig;
use chardetail::logging::init_logging;
use chardetail::platform::Central;
use chardetail::viewmodel::{CharacteristicDetail, StateChange};
use log::LevelFilter;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

type Input = Arc<Mutex<Lines<BufReader<Stdin>>>>;

#[tokio::main]
async fn main() -> chardetail::Result<()> {
    init_logging(LevelFilter::Info);

    let Some(address) = std::env::args().nth(1) else {
        eprintln!("usage: characteristic_detail <device address>");
        return Ok(());
    };
    let config = DetailConfig::from_env()?;
    let central = Central::first_adapter().await?;
    connect(&central, &address).await?;

    let input: Input = Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()));
    let dialogs = Arc::new(ConsoleDialogs {
        input: input.clone(),
    });
    let params = config.navigation_params(PeripheralId::new(address.as_str()));
    let detail = CharacteristicDetail::spawn(config, Arc::new(central), dialogs);

    // echo the log as it grows
    let mut changes = detail.changes();
    tokio::spawn(async move {
        while let Ok(change) = changes.recv().await {
            if let StateChange::MessageAdded(message) = change {
                println!("> {message}");
            }
        }
    });

    detail.prepare(params).await?;
    let state = detail.state();
    println!("permissions: {} / write: {}", state.permissions, state.write_permissions);

    loop {
        println!("[r]ead, [w]rite, [t]oggle updates, [q]uit");
        let line = input.lock().await.next_line().await.ok().flatten();
        match line.as_deref().map(str::trim) {
            Some("r") => detail.read().await?,
            Some("w") => detail.write().await?,
            Some("t") => {
                detail.toggle_updates().await?;
                println!("{}", detail.state().update_button_text);
            }
            Some("q") | None => break,
            Some(_) => {}
        }
    }

    detail.view_disappeared().await
}

async fn connect(central: &Central, address: &str) -> chardetail::Result<()> {
    let adapter = central.adapter();
    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(Duration::from_secs(5)).await;
    adapter.stop_scan().await?;

    for peripheral in adapter.peripherals().await? {
        if peripheral.address().to_string() == address {
            if !peripheral.is_connected().await? {
                peripheral.connect().await?;
            }
            peripheral.discover_services().await?;
            return Ok(());
        }
    }
    Err(chardetail::Error::PeripheralNotFound(PeripheralId::new(address)))
}

struct ConsoleDialogs {
    input: Input,
}

#[async_trait]
impl UserDialogs for ConsoleDialogs {
    fn show_loading(&self, title: &str) {
        println!("... {title}");
    }

    fn hide_loading(&self) {}

    async fn alert(&self, message: &str) {
        println!("!! {message}");
    }

    async fn prompt(&self, message: &str, title: &str, placeholder: &str) -> PromptResult {
        println!("{title}: {message}\n  [{placeholder}]");
        match self.input.lock().await.next_line().await {
            Ok(Some(text)) => PromptResult::accepted(text),
            _ => PromptResult::cancelled(),
        }
    }
}
