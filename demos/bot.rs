use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};
use wirebox::{capability, global, Injected};

trait SuperAwesomeBot: Send + Sync {
    fn greet(&self) -> String;
}

trait Quotes: Send + Sync {
    fn pick(&self) -> &'static str;
}

struct StarWarsQuotes;

impl Quotes for StarWarsQuotes {
    fn pick(&self) -> &'static str {
        "The Force will be with you. Always."
    }
}

struct StarWarsBot {
    quotes: Arc<dyn Quotes>,
}

impl SuperAwesomeBot for StarWarsBot {
    fn greet(&self) -> String {
        format!("Bot says: {}", self.quotes.pick())
    }
}

capability!(dyn Quotes = [StarWarsQuotes]);
capability!(dyn SuperAwesomeBot = [StarWarsBot]);

struct Chat {
    bot: Injected<dyn SuperAwesomeBot>,
}

impl Chat {
    fn start(&self) {
        match self.bot.get_or_default() {
            Some(bot) => println!("{}", bot.greet()),
            None => println!("Nobody is here"),
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let chat = Chat { bot: Injected::global() };
    chat.start();

    let registry = global();
    registry.register_transient::<dyn Quotes, _, _>(|| Ok(StarWarsQuotes));
    registry.register_lazy_singleton::<dyn SuperAwesomeBot, _, _>(|| {
        let quotes = global().resolve::<dyn Quotes>()?;
        Ok(StarWarsBot { quotes })
    });

    if let Err(err) = registry.validate_all_lazy(&Default::default()) {
        info!(%err, "Validation failed");
        return;
    }

    chat.start();

    let bot = registry.resolve::<dyn SuperAwesomeBot>().unwrap();
    info!(greeting = bot.greet(), "Resolved directly");

    registry.clear_all();
    chat.start();
}
