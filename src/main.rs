use hitler_engine::bots::{LogBroadcast, RandomBots};
use hitler_engine::config::Config;
use hitler_engine::game::PlayerId;
use hitler_engine::session::{lock, SessionManager};
use rand::RngCore;
use std::sync::Arc;

/// Plays one game between bots, narrating it to the log.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::try_init().ok();

    let config = Config::from_env()?;
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    log::info!("Running a {}-player game with seed {}", config.players, seed);

    let manager: &'static SessionManager = Box::leak(Box::new(SessionManager::new(config.opts)));
    let timeout = config.inactivity_timeout;
    tokio::spawn(manager.watch_inactivity(timeout));

    let admin = PlayerId::new("P1");
    let session = manager.create_session(admin.clone(), Arc::new(RandomBots::new(seed)), Arc::new(LogBroadcast));
    let id = {
        let mut session = lock(&session)?;
        for i in 2..=config.players {
            session.join(PlayerId::new(format!("P{i}")))?;
        }
        session.start(&admin, seed)?;
        session.id().to_string()
    };

    let result = manager.finish_game(&id).await?;
    log::info!("{} win ({}) in session {}", result.winner, result.outcome, id);
    for (player, role) in &result.roles {
        log::info!("  {}: {}", player, role);
    }
    Ok(())
}
