//! Taskdeck HTTP server binary.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use taskdeck_api::config::ApiConfig;
use taskdeck_api::{AppState, router};
use taskdeck_core::auth::CredentialService;
use taskdeck_core::cache::redis::RedisCache;
use taskdeck_core::mail::{Mailer, NoopMailer, SmtpMailer};
use taskdeck_core::store::DocumentStore;
use taskdeck_core::store::mongo::{MongoTaskRepository, MongoUserRepository};
use taskdeck_core::tasks::TaskService;
use taskdeck_core::users::UserService;

/// CLI arguments. Most configuration comes from the environment (see
/// `ApiConfig::from_env`); flags here override the basics.
#[derive(Parser, Debug)]
#[command(name = "taskdeck_server", about = "Taskdeck task-management API server")]
struct Args {
    /// Address to listen on, overriding BIND_ADDR.
    #[arg(long)]
    bind: Option<std::net::SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,taskdeck_api=debug,taskdeck_core=debug"
                    .parse()
                    .unwrap()
            }),
        )
        .init();

    let args = Args::parse();
    let mut config = ApiConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }

    info!(bind_addr = %config.bind_addr, database = %config.store.database, "starting taskdeck_server");

    let store = DocumentStore::connect(&config.store).await?;
    let cache = Arc::new(RedisCache::connect(&config.cache).await?);

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => Arc::new(SmtpMailer::new(mail)?),
        None => {
            warn!("no mail server configured, password reset emails will be logged only");
            Arc::new(NoopMailer)
        }
    };

    let users = Arc::new(MongoUserRepository::new(&store));
    let tasks = Arc::new(MongoTaskRepository::new(&store));

    let state = AppState {
        auth: CredentialService::new(users.clone(), cache.clone(), mailer, config.auth.clone()),
        tasks: TaskService::new(tasks, cache),
        users: UserService::new(users),
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
