//! One-shot chatbot query (`floorwatch ask`).

use std::sync::Arc;

use anyhow::Result;

use floorwatch::config::FloorConfig;
use floorwatch::factory::bot::{Bot, HttpAnswerProvider, KeywordResponder};
use floorwatch::factory::store::DataStore;

pub async fn cmd_ask(config: &FloorConfig, question: &str) -> Result<()> {
    let store = DataStore::from_path(&config.data_path());
    let mut bot = Bot::new(KeywordResponder::new(store, config.production_target()));
    if let Some(url) = config.answer_url() {
        bot = bot.with_remote(Arc::new(HttpAnswerProvider::new(url)), config.answer_timeout());
    }

    println!("{}", bot.reply(question).await);
    Ok(())
}
