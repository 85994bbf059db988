use std::{future::IntoFuture, process, sync::Arc};

use quire::{
    application::{
        clock::{Clock, SiteClock},
        error::AppError,
        form_token::FormTokenSigner,
        posts::PostService,
        repos::{PostsRepo, PostsWriteRepo},
    },
    config,
    infra::{
        db::SqliteRepositories,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tokio::{net::TcpListener, signal};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(InfraError::from)?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let security = settings.security().map_err(InfraError::from)?;
    let tokens = Arc::new(FormTokenSigner::new(&security.secret_key));
    let repositories = init_repositories(&settings.database).await?;

    let posts_repo: Arc<dyn PostsRepo> = repositories.clone();
    let posts_write_repo: Arc<dyn PostsWriteRepo> = repositories.clone();
    let clock: Arc<dyn Clock> = Arc::new(SiteClock::new(settings.site.timezone));

    let http_state = HttpState {
        posts: PostService::new(posts_repo, posts_write_repo, clock),
        tokens,
        db: repositories,
        site_title: Arc::from(settings.site.title.as_str()),
    };

    serve_http(&settings.server, http_state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    init_repositories(&settings.database).await?;
    info!(
        target = "quire::migrate",
        database = %settings.database.url,
        "Migrations applied"
    );
    Ok(())
}

async fn init_repositories(
    database: &config::DatabaseSettings,
) -> Result<Arc<SqliteRepositories>, AppError> {
    let pool = SqliteRepositories::connect(&database.url, database.max_connections.get())
        .await
        .map_err(|err| InfraError::database("connect", err))?;

    SqliteRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database("migration", err))?;

    Ok(Arc::new(SqliteRepositories::new(pool)))
}

async fn serve_http(
    server: &config::ServerSettings,
    http_state: HttpState,
) -> Result<(), AppError> {
    let router = http::build_router(http_state);

    let listener = TcpListener::bind(server.addr)
        .await
        .map_err(|source| InfraError::Bind {
            addr: server.addr,
            source,
        })?;

    info!(target = "quire::http", addr = %server.addr, "Listening");

    let grace = server.graceful_shutdown;
    let serve = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    // In-flight requests get `grace` to finish once the signal arrives.
    tokio::select! {
        result = serve => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            shutdown_signal().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(target = "quire::http", "graceful shutdown timed out");
        }
    }

    info!(target = "quire::http", "Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
