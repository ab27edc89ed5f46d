use teloxide::{dptree, prelude::*, types::ParseMode, utils::command::BotCommands};
use tracing::{error, info};

use common::config::Config;
use common::models::{MarketSnapshot, Symbol};
use strategy::{forecast, signals};

use crate::state::SharedState;

const INVALID_COMMAND_REPLY: &str =
    "❌ Unknown command. Use /start to see what this bot can do.";
const GENERIC_FAILURE_REPLY: &str = "Failed to process your request, please try again later.";

#[derive(Debug, BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show what this bot can do.")]
    Start,
    #[command(description = "Bitcoin snapshot and signal.")]
    Btc,
    #[command(description = "gold snapshot and signal.")]
    Xau,
    #[command(description = "alias for /xau.")]
    Gold,
}

/// Runs the dispatcher until ctrl-c. Commands only ever read the snapshot
/// map; all mutation happens on the ingest task.
pub async fn run(bot: Bot, state: SharedState, config: Config) {
    info!("Starting Telegram command dispatcher");

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            // Anything else that looks like a command gets the fixed reply.
            dptree::filter(|msg: Message| {
                msg.text().map(|text| text.starts_with('/')).unwrap_or(false)
            })
            .endpoint(handle_unknown),
        );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, config])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: SharedState,
    config: Config,
) -> ResponseResult<()> {
    let reply = match cmd {
        Command::Start => start_text(),
        Command::Btc => render_symbol(&state, Symbol::Btc, config.extended_signals).await,
        Command::Xau | Command::Gold => {
            render_symbol(&state, Symbol::Xau, config.extended_signals).await
        }
    };

    if let Err(e) = bot
        .send_message(msg.chat.id, reply)
        .parse_mode(ParseMode::Markdown)
        .await
    {
        error!("Failed to send reply: {}", e);
        bot.send_message(msg.chat.id, GENERIC_FAILURE_REPLY).await?;
    }

    Ok(())
}

async fn handle_unknown(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, INVALID_COMMAND_REPLY).await?;
    Ok(())
}

fn start_text() -> String {
    "💎 *MARKET SIGNAL BOT* 💎\n\n\
     📊 Live prices with RSI(14) momentum\n\
     📌 Commands:\n\
     /btc - Bitcoin analysis\n\
     /xau - Gold analysis (also /gold)\n\n\
     🔄 Prices refresh automatically"
        .to_string()
}

async fn render_symbol(state: &SharedState, symbol: Symbol, extended: bool) -> String {
    let snapshot = { state.lock().await.get(&symbol).cloned() };
    match snapshot {
        Some(snapshot) => render_snapshot(&snapshot, extended),
        None => GENERIC_FAILURE_REPLY.to_string(),
    }
}

fn render_snapshot(snapshot: &MarketSnapshot, extended: bool) -> String {
    let rsi_text = snapshot
        .rsi
        .map(|rsi| format!("{rsi:.2}"))
        .unwrap_or_else(|| "Calculating...".to_string());

    let (signal, outlook_line) = if extended {
        let predicted = forecast::predict_price(
            &mut rand::thread_rng(),
            snapshot.price,
            snapshot.symbol.volatility(),
        );
        // No headline source is wired in, so sentiment sits at the neutral
        // default.
        let sentiment = forecast::sentiment_score(&[]);
        (
            signals::classify_extended(snapshot.price, predicted, sentiment),
            format!("\n🔮 Projected: {}", format_usd(predicted)),
        )
    } else {
        (
            signals::classify(snapshot.rsi, snapshot.trend),
            String::new(),
        )
    };

    format!(
        "📊 *{name} ({pair})*\n\n\
         💰 Price: {price}{outlook_line}\n\
         📈 RSI(14): {rsi_text}\n\
         🎯 Signal: {signal}\n\n\
         ⏱ Updated: {time}",
        name = snapshot.symbol.display_name(),
        pair = snapshot.symbol.pair(),
        price = format_usd(snapshot.price),
        signal = signal.label(),
        time = snapshot.updated_at.format("%H:%M:%S"),
    )
}

/// Currency formatting with thousands grouping and two decimals, e.g.
/// `$50,000.00`.
fn format_usd(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some(parts) => parts,
        None => (formatted.as_str(), "00"),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}
