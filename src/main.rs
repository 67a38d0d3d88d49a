use std::{process, sync::Arc};

use mestiere::{
    application::{
        careers::CareersService,
        chrome::ChromeService,
        error::AppError,
        job_page::JobPageService,
        repos::{JobsRepo, SiteRepo, TeamsRepo},
        sitemap::SitemapService,
    },
    config,
    infra::{
        content::ContentStore,
        error::InfraError,
        http::{self, HttpState},
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
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
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::CheckArchive(_) => run_check(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = load_content(&settings).await?;
    let state = build_http_state(store);
    serve_http(&settings, state).await
}

async fn run_check(settings: config::Settings) -> Result<(), AppError> {
    let store = load_content(&settings).await?;
    info!(
        target = "mestiere::check",
        archive = %settings.content.archive.display(),
        postings = store.posting_count(),
        teams = store.team_count(),
        "Content archive OK"
    );
    Ok(())
}

async fn load_content(settings: &config::Settings) -> Result<Arc<ContentStore>, AppError> {
    let store = ContentStore::load(&settings.content.archive)
        .await
        .map_err(AppError::from)?;
    Ok(Arc::new(store))
}

fn build_http_state(store: Arc<ContentStore>) -> HttpState {
    let jobs: Arc<dyn JobsRepo> = store.clone();
    let teams: Arc<dyn TeamsRepo> = store.clone();
    let site: Arc<dyn SiteRepo> = store;

    HttpState {
        chrome: Arc::new(ChromeService::new(site.clone(), jobs.clone())),
        careers: Arc::new(CareersService::new(jobs.clone())),
        sitemap: Arc::new(SitemapService::new(jobs.clone(), site.clone())),
        job_page: Arc::new(JobPageService::new(jobs, teams, site)),
    }
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "mestiere::serve",
        addr = %settings.server.public_addr,
        "Serving careers site"
    );

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
